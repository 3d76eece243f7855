// 操作结果类型
use super::Operation;
use serde::Serialize;
use std::collections::BTreeMap;

/// One `df -h` row: size, used and available space as printed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiskEntry {
    pub size: String,
    pub used: String,
    pub avail: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiskUsage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<DiskEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sda1: Option<DiskEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemoryUsage {
    pub total: String,
    pub used: String,
    pub available: String,
}

/// Typed result of a single catalog operation.
///
/// Serialized untagged: the operation name is already the key in
/// [`NodeResults`], so JSON only carries the bare value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OperationResult {
    Date(String),
    Pwd(String),
    Temperature(String),
    DiskSpace(DiskUsage),
    Memory(Option<MemoryUsage>),
    Echo(String),
    FileExists(bool),
    DirectoryExists(bool),
    FileWrite(String),
    Installable(bool),
    Installed(Option<bool>),
    Install(String),
    Internet(bool),
    Ping(Option<f64>),
}

/// Per-node result map, keyed by canonical operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct NodeResults(BTreeMap<Operation, OperationResult>);

impl NodeResults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a result, replacing any earlier result of the same operation.
    pub fn insert(&mut self, operation: Operation, result: OperationResult) {
        self.0.insert(operation, result);
    }

    pub fn get(&self, operation: Operation) -> Option<&OperationResult> {
        self.0.get(&operation)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Host name to node results; `None` marks a node that failed as a whole.
pub type AggregateResult = BTreeMap<String, Option<NodeResults>>;
