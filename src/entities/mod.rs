pub mod blind_box_items;
pub mod blind_boxes;
pub mod comments;
pub mod inventories;
pub mod orders;
pub mod shows;
pub mod users;

pub use blind_box_items::Rarity;
pub use blind_boxes::BoxCategory;
pub use orders::OrderType;

pub use blind_box_items as box_item_entity;
pub use blind_boxes as blind_box_entity;
pub use comments as comment_entity;
pub use inventories as inventory_entity;
pub use orders as order_entity;
pub use shows as show_entity;
pub use users as user_entity;
