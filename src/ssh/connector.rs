// SSH连接建立
use crate::dispatch::Connector;
use crate::session::Transport;
use crate::ssh::client::{AuthMethod, SshClient};
use anyhow::{Context, Result};

/// Opens password (or agent) authenticated SSH connections to nodes.
#[derive(Debug, Clone)]
pub struct SshConnector {
    pub port: u16,
}

impl SshConnector {
    pub fn new(port: u16) -> Self {
        Self { port }
    }
}

impl Default for SshConnector {
    fn default() -> Self {
        Self::new(22)
    }
}

impl Connector for SshConnector {
    fn connect(
        &self,
        host: &str,
        user: Option<&str>,
        password: Option<&str>,
    ) -> Result<Box<dyn Transport>> {
        // 未指定用户时使用本地登录名
        let username = match user {
            Some(user) => user.to_string(),
            None => std::env::var("USER")
                .or_else(|_| std::env::var("LOGNAME"))
                .context("No login user given and USER is not set")?,
        };

        let auth = match password {
            Some(password) => AuthMethod::Password(password.to_string()),
            None => AuthMethod::Agent,
        };

        let client = SshClient::connect(host, self.port, &username, &auth)?;
        Ok(Box::new(client))
    }
}
