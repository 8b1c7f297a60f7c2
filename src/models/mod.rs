pub mod auth_result;
pub mod session;

pub use auth_result::AuthResult;
pub use session::{Session, SessionError};
