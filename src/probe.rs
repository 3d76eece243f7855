// 连通性探测 (pingecho)
use hickory_resolver::config::{NameServerConfigGroup, ResolverConfig, ResolverOpts};
use hickory_resolver::Resolver;
use log::{debug, warn};
use std::io::ErrorKind;
use std::net::{IpAddr, SocketAddr, TcpStream, ToSocketAddrs};
use std::thread;
use std::time::{Duration, Instant};

/// TCP echo service; nothing is expected to listen there, a refusal is the answer.
pub const ECHO_PORT: u16 = 7;
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);
pub const DNS_PORT: u16 = 53;

/// Measures reachability by timing raw TCP connects to a closed port.
///
/// A refused connection proves the host answered, and the time it took is
/// the latency sample.
#[derive(Debug, Clone)]
pub struct ConnectivityProbe {
    pub port: u16,
    pub timeout: Duration,
    pub extra_attempts: usize,
    pub delay: Duration,
}

impl Default for ConnectivityProbe {
    fn default() -> Self {
        Self {
            port: ECHO_PORT,
            timeout: PROBE_TIMEOUT,
            extra_attempts: 4,
            delay: Duration::from_millis(100),
        }
    }
}

impl ConnectivityProbe {
    /// Minimum connect latency to `host` in milliseconds, or `None` if the
    /// first attempt gets no answer.
    ///
    /// Names are looked up through `dns_server` when one is given; an empty
    /// or absent server means the system resolver.
    pub fn ping(&self, host: &str, dns_server: Option<&str>) -> Option<f64> {
        let addr = self.resolve(host, dns_server)?;

        let first = self.attempt(&addr)?;
        let mut best = first;

        for _ in 0..self.extra_attempts {
            thread::sleep(self.delay);
            if let Some(sample) = self.attempt(&addr) {
                best = best.min(sample);
            }
        }

        Some(round_millis(best))
    }

    fn resolve(&self, host: &str, dns_server: Option<&str>) -> Option<SocketAddr> {
        if let Ok(ip) = host.parse::<IpAddr>() {
            return Some(SocketAddr::new(ip, self.port));
        }

        let server = match dns_server.map(str::trim).filter(|s| !s.is_empty()) {
            Some(server) => server,
            None => {
                return match (host, self.port).to_socket_addrs() {
                    Ok(mut addrs) => addrs.next(),
                    Err(e) => {
                        debug!("Could not resolve {}: {}", host, e);
                        None
                    }
                };
            }
        };

        let Some(nameserver) = parse_nameserver(server) else {
            warn!("Invalid DNS server '{}', cannot resolve {}", server, host);
            return None;
        };

        let ip = self.lookup(host, nameserver)?;
        Some(SocketAddr::new(ip, self.port))
    }

    /// Queries a single nameserver for `host`, bounded by the connect timeout.
    fn lookup(&self, host: &str, nameserver: SocketAddr) -> Option<IpAddr> {
        let config = ResolverConfig::from_parts(
            None,
            vec![],
            NameServerConfigGroup::from_ips_clear(&[nameserver.ip()], nameserver.port(), true),
        );
        let mut opts = ResolverOpts::default();
        opts.timeout = self.timeout;
        opts.attempts = 1;

        // the sync resolver drives its own runtime; keep it off any tokio thread
        thread::scope(|scope| {
            scope
                .spawn(|| {
                    let resolver = match Resolver::new(config, opts) {
                        Ok(resolver) => resolver,
                        Err(e) => {
                            debug!("Could not build resolver for {}: {}", nameserver, e);
                            return None;
                        }
                    };
                    match resolver.lookup_ip(host) {
                        Ok(lookup) => lookup.iter().next(),
                        Err(e) => {
                            debug!("Could not resolve {} via {}: {}", host, nameserver, e);
                            None
                        }
                    }
                })
                .join()
                .ok()
                .flatten()
        })
    }

    /// One connect attempt; `Some(ms)` when the host answered.
    fn attempt(&self, addr: &SocketAddr) -> Option<f64> {
        let start = Instant::now();
        match TcpStream::connect_timeout(addr, self.timeout) {
            Ok(_) => Some(0.0),
            Err(e) if e.kind() == ErrorKind::ConnectionRefused => {
                Some(start.elapsed().as_secs_f64() * 1000.0)
            }
            Err(e) => {
                debug!("Probe to {} failed: {}", addr, e);
                None
            }
        }
    }
}

/// Accepts `ip` or `ip:port`; a bare address uses port 53.
fn parse_nameserver(server: &str) -> Option<SocketAddr> {
    if let Ok(ip) = server.parse::<IpAddr>() {
        return Some(SocketAddr::new(ip, DNS_PORT));
    }
    server.parse::<SocketAddr>().ok()
}

fn round_millis(ms: f64) -> f64 {
    (ms * 1000.0).round() / 1000.0
}
