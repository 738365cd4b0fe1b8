pub use super::auth_tokens::Entity as AuthTokens;
pub use super::users::Entity as Users;
