// SSH客户端封装
use crate::session::Transport;
use crate::utils::error::BottleError;
use anyhow::{Context, Result};
use log::debug;
use ssh2::{ExtendedData, Session};
use std::io::prelude::*;
use std::net::TcpStream;

#[derive(Debug, Clone)]
pub enum AuthMethod {
    Password(String),
    Agent,
}

pub struct SshClient {
    pub session: Session,
    host: String,
}

impl SshClient {
    pub fn connect(host: &str, port: u16, username: &str, auth: &AuthMethod) -> Result<Self> {
        debug!("Connecting to {}@{}:{}...", username, host, port);

        let tcp = TcpStream::connect((host, port))
            .with_context(|| format!("Failed to connect to SSH server {}:{}", host, port))?;

        let mut session = Session::new().context("Failed to create SSH session")?;
        session.set_tcp_stream(tcp);
        session.handshake().context("SSH handshake failed")?;

        match auth {
            AuthMethod::Password(password) => {
                session
                    .userauth_password(username, password)
                    .context("Password authentication failed")?;
            }
            AuthMethod::Agent => {
                session
                    .userauth_agent(username)
                    .context("SSH agent authentication failed")?;
            }
        }

        if !session.authenticated() {
            return Err(BottleError::AuthenticationFailed {
                user: username.to_string(),
                host: host.to_string(),
            }
            .into());
        }

        debug!("Authenticated to {}", host);
        Ok(SshClient {
            session,
            host: host.to_string(),
        })
    }

    /// Runs `command` in a fresh channel; stderr is merged into stdout.
    pub fn exec(&self, command: &str) -> Result<String> {
        let mut channel = self
            .session
            .channel_session()
            .context("Failed to create SSH channel")?;

        channel
            .handle_extended_data(ExtendedData::Merge)
            .context("Failed to merge stderr into stdout")?;
        channel.exec(command).context("Failed to execute command")?;

        let mut output = String::new();
        channel
            .read_to_string(&mut output)
            .context("Failed to read command output")?;

        channel.wait_close().context("Failed to close channel")?;

        Ok(output)
    }
}

impl Transport for SshClient {
    fn run(&mut self, instruction: &str) -> Result<String> {
        self.exec(instruction)
    }
}

impl Drop for SshClient {
    fn drop(&mut self) {
        if let Err(e) = self.session.disconnect(None, "scroll finished", None) {
            debug!("Disconnect from {} failed: {}", self.host, e);
        }
    }
}
