pub mod jwt;
pub mod lucky_number;
pub mod password;
pub mod template;
pub mod validation;

pub use jwt::*;
pub use lucky_number::*;
pub use password::*;
pub use template::*;
pub use validation::*;
