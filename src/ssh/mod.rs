// SSH模块入口
pub mod client;
pub mod connector;

pub use client::{AuthMethod, SshClient};
pub use connector::SshConnector;
