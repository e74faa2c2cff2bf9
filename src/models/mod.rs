pub mod blind_box;
pub mod common;
pub mod inventory;
pub mod order;
pub mod pagination;
pub mod show;
pub mod user;

pub use blind_box::*;
pub use common::*;
pub use inventory::*;
pub use order::*;
pub use pagination::*;
pub use show::*;
pub use user::*;
