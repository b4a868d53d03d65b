pub mod api;
pub mod item;
pub mod record;
pub mod task;
pub mod user;

pub use api::*;
pub use item::*;
pub use record::*;
pub use task::*;
pub use user::*;
