pub mod draws;
pub mod participants;
pub mod settings;

pub use draws as draw_entity;
pub use participants as participant_entity;
pub use settings as setting_entity;
