pub mod auth;
pub mod common;
pub mod draw;
pub mod log_entry;
pub mod setting;

pub use auth::*;
pub use common::*;
pub use draw::*;
pub use log_entry::*;
pub use setting::*;
