// 单节点会话：执行 scroll 并收集结果
use crate::catalog::NodeResults;
use crate::probe::ConnectivityProbe;
use crate::scroll::Scroll;
use anyhow::{Context, Result};
use log::debug;
use std::fmt::Debug;
use std::process::Command;

/// A channel that can run one shell instruction and hand back its output.
pub trait Transport: Send {
    /// Runs `instruction` and returns stdout and stderr combined.
    fn run(&mut self, instruction: &str) -> Result<String>;
}

/// Execution context for one node's scroll.
///
/// The session owns its transport; it is dropped (and the connection
/// closed) when [`Session::execute`] returns, whatever the outcome.
pub struct Session {
    host: String,
    transport: Option<Box<dyn Transport>>,
    dns_server: String,
    debug: bool,
    probe: ConnectivityProbe,
    results: NodeResults,
}

impl Session {
    pub fn remote(
        host: impl Into<String>,
        transport: Box<dyn Transport>,
        dns_server: impl Into<String>,
        debug: bool,
    ) -> Self {
        Self::new(host.into(), Some(transport), dns_server.into(), debug)
    }

    /// A session that runs instructions on this machine.
    pub fn local(host: impl Into<String>, dns_server: impl Into<String>, debug: bool) -> Self {
        Self::new(host.into(), None, dns_server.into(), debug)
    }

    fn new(
        host: String,
        transport: Option<Box<dyn Transport>>,
        dns_server: String,
        debug: bool,
    ) -> Self {
        Self {
            host,
            transport,
            dns_server,
            debug,
            probe: ConnectivityProbe::default(),
            results: NodeResults::new(),
        }
    }

    pub fn with_probe(mut self, probe: ConnectivityProbe) -> Self {
        self.probe = probe;
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn dns_server(&self) -> &str {
        &self.dns_server
    }

    pub fn probe(&self) -> &ConnectivityProbe {
        &self.probe
    }

    pub fn is_remote(&self) -> bool {
        self.transport.is_some()
    }

    /// Performs every invocation in order and returns the collected results.
    pub fn execute(mut self, scroll: &Scroll) -> Result<NodeResults> {
        for invocation in scroll.invocations() {
            let operation = invocation.operation;
            let result = operation
                .perform(&mut self, &invocation.args)
                .with_context(|| format!("{} failed on {}", operation, self.host))?;
            self.trace(operation.name(), &result);
            self.results.insert(operation, result);
        }

        Ok(self.results)
    }

    /// Runs one instruction over the bound transport, or locally if unbound.
    pub fn run(&mut self, instruction: &str) -> Result<String> {
        let output = match self.transport.as_mut() {
            Some(transport) => transport.run(instruction)?,
            None => run_local(instruction)?,
        };

        if self.debug {
            debug!("{}: `{}` -> {:?}", self.host, instruction, output);
        }
        Ok(output)
    }

    /// Debug trace of an intermediate value, only when debugging is on.
    pub fn trace<T: Debug + ?Sized>(&self, label: &str, value: &T) {
        if self.debug {
            debug!("{}: {}: {:?}", self.host, label, value);
        }
    }
}

fn run_local(instruction: &str) -> Result<String> {
    let output = Command::new("sh")
        .arg("-c")
        .arg(instruction)
        .output()
        .with_context(|| format!("Failed to execute local command: {}", instruction))?;

    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));
    Ok(combined)
}
