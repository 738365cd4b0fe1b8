pub mod prelude;

pub mod auth_tokens;
pub mod users;
