//! Auth features - Login e politica di sign-in

pub mod login;
pub mod sign_in;

pub use login::{LoginCommand, LoginHandler};
pub use sign_in::{LockoutPolicy, SignInManager, SignInResult};
