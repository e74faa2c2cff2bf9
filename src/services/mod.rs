pub mod auth_service;
pub mod blind_box_service;
pub mod inventory_service;
pub mod order_service;
pub mod purchase_service;
pub mod show_service;
pub mod user_service;

pub use auth_service::*;
pub use blind_box_service::*;
pub use inventory_service::*;
pub use order_service::*;
pub use purchase_service::*;
pub use show_service::*;
pub use user_service::*;
