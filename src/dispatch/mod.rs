//! Fan-out of one scroll across every resolved node
//!
//! Each node runs in its own pool job with its own transport. A job's
//! failure, error or panic, only ever turns that node's entry into `None`.

pub mod progress;

use crate::catalog::{AggregateResult, NodeResults};
use crate::config::Config;
use crate::probe::ConnectivityProbe;
use crate::scroll::Scroll;
use crate::session::{Session, Transport};
use crate::ssh::SshConnector;
use crate::target::{resolve_targets, NodeDescriptor};
use crate::threadpool::ThreadPool;
use anyhow::{Context, Result};
use crossbeam_channel::unbounded;
use log::{error, info, warn};
use progress::CastProgress;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Opens a transport to a node.
pub trait Connector: Send + Sync {
    fn connect(
        &self,
        host: &str,
        user: Option<&str>,
        password: Option<&str>,
    ) -> Result<Box<dyn Transport>>;
}

pub struct Dispatcher {
    scroll: Option<String>,
    nodes: Vec<NodeDescriptor>,
    config: Arc<Config>,
    connector: Arc<dyn Connector>,
    probe: ConnectivityProbe,
}

impl Dispatcher {
    pub fn new(mut config: Config) -> Self {
        let nodes = resolve_targets(
            config.domain.as_deref(),
            &config.targets,
            &config.pwlist,
            config.password.as_deref(),
            config.user.as_deref(),
        );
        let scroll = config.scroll.take();
        let connector = Arc::new(SshConnector::new(config.port));

        Self {
            scroll,
            nodes,
            config: Arc::new(config),
            connector,
            probe: ConnectivityProbe::default(),
        }
    }

    pub fn with_connector(mut self, connector: Arc<dyn Connector>) -> Self {
        self.connector = connector;
        self
    }

    pub fn with_probe(mut self, probe: ConnectivityProbe) -> Self {
        self.probe = probe;
        self
    }

    /// Runs the scroll on every node and collects the results.
    ///
    /// The scroll is consumed: casting again returns an empty map.
    pub fn cast(&mut self) -> AggregateResult {
        let mut aggregate = AggregateResult::new();
        let Some(text) = self.scroll.take() else {
            return aggregate;
        };

        let scroll = match Scroll::parse(&text) {
            Ok(scroll) => Some(Arc::new(scroll)),
            Err(e) => {
                error!("Invalid scroll: {}", e);
                None
            }
        };

        if self.nodes.is_empty() {
            let host = local_hostname();
            let results = scroll.and_then(|scroll| {
                let session = Session::local(host.clone(), &self.config.dns_server, self.config.debug)
                    .with_probe(self.probe.clone());
                report(&host, session.execute(&scroll))
            });
            aggregate.insert(host, results);
            return aggregate;
        }

        for node in &self.nodes {
            aggregate.insert(node.host.clone(), None);
        }
        let Some(scroll) = scroll else {
            return aggregate;
        };

        let workers = match self.config.threads {
            0 => self.nodes.len(),
            n => n.min(self.nodes.len()),
        };
        info!("Casting at {} node(s) with {} worker(s)", self.nodes.len(), workers);

        let pool = ThreadPool::new(workers);
        let progress = CastProgress::new(self.nodes.len(), self.config.progress);
        let (tx, rx) = unbounded();

        for node in &self.nodes {
            let identity = node.login_identity();
            let password = node.password.clone();
            let tx = tx.clone();
            let scroll = Arc::clone(&scroll);
            let config = Arc::clone(&self.config);
            let connector = Arc::clone(&self.connector);
            let probe = self.probe.clone();
            let progress = progress.clone();

            let job = move || {
                let (user, host) = NodeDescriptor::split_identity(&identity);
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                    let transport = connector
                        .connect(host, user, password.as_deref())
                        .with_context(|| format!("Could not open a session to {}", identity))?;
                    Session::remote(host, transport, &config.dns_server, config.debug)
                        .with_probe(probe)
                        .execute(&scroll)
                }));

                let results = match outcome {
                    Ok(result) => report(host, result),
                    Err(_) => {
                        error!("{}: session panicked", host);
                        None
                    }
                };
                progress.node_done(host, results.is_some());
                // 接收端在所有任务结束前一直存在
                let _ = tx.send((host.to_string(), results));
            };

            if let Err(e) = pool.execute(job) {
                error!("Could not schedule {}: {}", node.host, e);
            }
        }
        drop(tx);

        if let Err(e) = pool.join() {
            error!("{}", e);
        }
        for (host, results) in rx.iter() {
            aggregate.insert(host, results);
        }
        progress.finish();

        aggregate
    }
}

fn report(host: &str, result: Result<NodeResults>) -> Option<NodeResults> {
    match result {
        Ok(results) => Some(results),
        Err(e) => {
            warn!("{}: {:#}", host, e);
            None
        }
    }
}

fn local_hostname() -> String {
    match hostname::get() {
        Ok(name) => name.to_string_lossy().trim().to_string(),
        Err(e) => {
            warn!("Could not determine local hostname: {}", e);
            "localhost".to_string()
        }
    }
}
