//! Login and signup forms.
//!
//! A form is where request outcomes stop: every [`AuthResult`](crate::models::AuthResult)
//! ends up either as a navigation or as message lines on the form, and the
//! form is always editable again afterwards.

pub mod login;
pub mod signup;
pub mod submit;

pub use login::LoginForm;
pub use signup::SignupForm;
pub use submit::{FormOutcome, SubmitState};

#[cfg(test)]
pub(crate) mod fakes;
