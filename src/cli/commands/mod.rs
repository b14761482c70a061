pub mod build;
pub mod envs;
pub mod init;
pub mod resolve;
