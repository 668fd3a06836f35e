//! Account handlers: sign-in, registration and sign-out.

mod register;
mod sign_in;
mod sign_out;

pub use register::{RegisterCommand, RegisterHandler};
pub use sign_in::{SignInCommand, SignInHandler};
pub use sign_out::SignOutHandler;
