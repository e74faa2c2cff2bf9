pub mod auth;
pub mod blind_box;
pub mod home;
pub mod inventory;
pub mod order;
pub mod show;
pub mod user;

pub use auth::auth_config;
pub use blind_box::blind_box_config;
pub use home::home_config;
pub use inventory::inventory_config;
pub use order::order_config;
pub use show::show_config;
pub use user::user_config;
