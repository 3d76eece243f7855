#![allow(dead_code)]

use anyhow::{bail, Result};
use ssh_bottle::dispatch::Connector;
use ssh_bottle::session::Transport;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Answers instructions from a canned table, matching on prefix.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    responses: Vec<(String, String)>,
    fail_on: Option<String>,
    pub issued: Arc<Mutex<Vec<String>>>,
    pub closed: Arc<Mutex<bool>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, prefix: &str, output: &str) -> Self {
        self.responses.push((prefix.to_string(), output.to_string()));
        self
    }

    /// Instructions starting with `prefix` fail like a dropped channel.
    pub fn fail_on(mut self, prefix: &str) -> Self {
        self.fail_on = Some(prefix.to_string());
        self
    }

    pub fn issued(&self) -> Vec<String> {
        self.issued.lock().unwrap().clone()
    }
}

impl Transport for ScriptedTransport {
    fn run(&mut self, instruction: &str) -> Result<String> {
        self.issued.lock().unwrap().push(instruction.to_string());
        if let Some(prefix) = &self.fail_on {
            if instruction.starts_with(prefix.as_str()) {
                bail!("channel closed");
            }
        }
        Ok(self
            .responses
            .iter()
            .find(|(prefix, _)| instruction.starts_with(prefix.as_str()))
            .map(|(_, output)| output.clone())
            .unwrap_or_default())
    }
}

impl Drop for ScriptedTransport {
    fn drop(&mut self) {
        *self.closed.lock().unwrap() = true;
    }
}

pub enum Behaviour {
    Answer(ScriptedTransport),
    Refuse,
    Panic,
}

/// Hands out scripted transports per host and records login attempts.
#[derive(Default)]
pub struct FakeConnector {
    hosts: HashMap<String, Behaviour>,
    pub logins: Mutex<Vec<(String, Option<String>, Option<String>)>>,
}

impl FakeConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn host(mut self, host: &str, behaviour: Behaviour) -> Self {
        self.hosts.insert(host.to_string(), behaviour);
        self
    }
}

impl Connector for FakeConnector {
    fn connect(
        &self,
        host: &str,
        user: Option<&str>,
        password: Option<&str>,
    ) -> Result<Box<dyn Transport>> {
        self.logins.lock().unwrap().push((
            host.to_string(),
            user.map(str::to_string),
            password.map(str::to_string),
        ));
        match self.hosts.get(host) {
            Some(Behaviour::Answer(transport)) => Ok(Box::new(transport.clone())),
            Some(Behaviour::Panic) => panic!("transport exploded for {}", host),
            Some(Behaviour::Refuse) | None => bail!("Connection refused: {}", host),
        }
    }
}

pub const DF_OUTPUT: &str = "\
Filesystem      Size  Used Avail Use% Mounted on
/dev/root        10G  4.0G  5.5G  43% /
devtmpfs        1.8G     0  1.8G   0% /dev
";

pub const FREE_OUTPUT: &str = "\
              total        used        free      shared  buff/cache   available
Mem:           7.6G        2.1G        3.2G        120M        2.3G        5.0G
Swap:          100M          0B        100M
";

pub const PING_OK: &str = "\
PING 8.8.8.8 (8.8.8.8) 56(84) bytes of data.
64 bytes from 8.8.8.8: icmp_seq=1 ttl=117 time=12.3 ms
";

pub const PING_DOWN: &str = "\
PING 8.8.8.8 (8.8.8.8) 56(84) bytes of data.

--- 8.8.8.8 ping statistics ---
1 packets transmitted, 0 received, 100% packet loss, time 0ms
";

pub fn connector(fake: FakeConnector) -> Arc<dyn Connector> {
    Arc::new(fake)
}
