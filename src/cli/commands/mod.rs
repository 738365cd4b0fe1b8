mod create_superuser;
mod init;
mod serve;

pub use create_superuser::cmd_create_superuser;
pub use init::cmd_init;
pub use serve::cmd_serve;
