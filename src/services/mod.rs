pub mod auth_service;
pub mod draw_service;
pub mod log_service;
pub mod notification_service;
pub mod registration_service;
pub mod settings_service;
pub mod winner_service;

pub use auth_service::*;
pub use draw_service::*;
pub use log_service::*;
pub use notification_service::*;
pub use registration_service::*;
pub use settings_service::*;
pub use winner_service::*;
