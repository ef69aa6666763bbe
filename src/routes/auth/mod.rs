mod delete_user;
mod forgot_password;
mod login;
mod logout;
mod me;
mod register;
mod reset_password;
mod verify_reset_code;
mod verify_token;

pub use delete_user::*;
pub use forgot_password::*;
pub use login::*;
pub use logout::*;
pub use me::*;
pub use register::*;
pub use reset_password::*;
pub use verify_reset_code::*;
pub use verify_token::*;
