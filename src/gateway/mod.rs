pub mod errors;
pub mod gateway;

pub use errors::{classify_error_body, classify_transport_error};
pub use gateway::{AuthApi, HttpAuthGateway, LOGIN_PATH, SIGNUP_PATH, SIGNUP_SUCCESS_CODE};
