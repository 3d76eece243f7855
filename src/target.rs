// 目标主机解析
use log::warn;
use std::collections::HashMap;

/// A resolved, connectable target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeDescriptor {
    pub host: String,
    pub login_user: Option<String>,
    pub password: Option<String>,
}

impl NodeDescriptor {
    /// `user@host`, or just `host` when no login user is set.
    pub fn login_identity(&self) -> String {
        match &self.login_user {
            Some(user) => format!("{}@{}", user, self.host),
            None => self.host.clone(),
        }
    }

    /// Splits a login identity back into `(user, host)`.
    pub fn split_identity(identity: &str) -> (Option<&str>, &str) {
        match identity.split_once('@') {
            Some((user, host)) => (Some(user), host),
            None => (None, identity),
        }
    }
}

/// Turns short target names into node descriptors.
///
/// Entries are keyed by login identity. When two names resolve to the same
/// identity the later one replaces the earlier, keeping the earlier position.
pub fn resolve_targets(
    domain: Option<&str>,
    targets: &[String],
    pwlist: &HashMap<String, String>,
    password: Option<&str>,
    user: Option<&str>,
) -> Vec<NodeDescriptor> {
    let mut nodes: Vec<NodeDescriptor> = Vec::with_capacity(targets.len());

    for name in targets {
        let host = match domain {
            Some(domain) => format!("{}.{}", name, domain),
            None => name.clone(),
        };
        let node = NodeDescriptor {
            host,
            login_user: user.map(str::to_string),
            password: pwlist
                .get(name)
                .cloned()
                .or_else(|| password.map(str::to_string)),
        };

        let identity = node.login_identity();
        match nodes.iter_mut().find(|n| n.login_identity() == identity) {
            Some(existing) => {
                warn!("Duplicate target {}, keeping the last definition", identity);
                *existing = node;
            }
            None => nodes.push(node),
        }
    }

    nodes
}
