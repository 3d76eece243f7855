//! The closed set of diagnostic operations a scroll may invoke
//!
//! Each operation owns one instruction template and one parsing rule. The
//! table in [`Operation::spec`] is the only place operation names, aliases
//! and argument counts are declared.

pub mod parse;
pub mod result;

use crate::session::Session;
use crate::utils::error::BottleError;
use crate::utils::shell::{escape_double_quoted, quote};
use anyhow::Result;
use log::debug;
use serde::Serialize;
use std::fmt;

pub use result::{
    AggregateResult, DiskEntry, DiskUsage, MemoryUsage, NodeResults, OperationResult,
};

pub const NO_ROUTE: &str = "no route to internet";
pub const ALREADY_INSTALLED: &str = "already installed";

const TEMPERATURE_FILE: &str = "/sys/class/thermal/thermal_zone0/temp";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Operation {
    #[serde(rename = "date")]
    Date,
    #[serde(rename = "pwd")]
    Pwd,
    #[serde(rename = "temperature")]
    Temperature,
    #[serde(rename = "disk_space")]
    DiskSpace,
    #[serde(rename = "memory")]
    Memory,
    #[serde(rename = "echo")]
    Echo,
    #[serde(rename = "file_exists?")]
    FileExists,
    #[serde(rename = "directory_exists?")]
    DirectoryExists,
    #[serde(rename = "file_write")]
    FileWrite,
    #[serde(rename = "installable?")]
    Installable,
    #[serde(rename = "installed?")]
    Installed,
    #[serde(rename = "install")]
    Install,
    #[serde(rename = "internet?")]
    Internet,
    #[serde(rename = "ping")]
    Ping,
}

/// Static description of a catalog entry.
pub struct OperationSpec {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub args: &'static [&'static str],
    pub summary: &'static str,
}

impl Operation {
    pub const ALL: [Operation; 14] = [
        Operation::Date,
        Operation::Pwd,
        Operation::Temperature,
        Operation::DiskSpace,
        Operation::Memory,
        Operation::Echo,
        Operation::FileExists,
        Operation::DirectoryExists,
        Operation::FileWrite,
        Operation::Installable,
        Operation::Installed,
        Operation::Install,
        Operation::Internet,
        Operation::Ping,
    ];

    pub fn spec(self) -> OperationSpec {
        match self {
            Operation::Date => entry("date", &[], &[], "current date on the node"),
            Operation::Pwd => entry("pwd", &[], &[], "working directory of the login shell"),
            Operation::Temperature => entry(
                "temperature",
                &[],
                &[],
                "raw CPU thermal zone reading (millidegrees)",
            ),
            Operation::DiskSpace => entry(
                "disk_space",
                &["df"],
                &[],
                "size/used/avail of /dev/root and /dev/sda1",
            ),
            Operation::Memory => entry("memory", &[], &[], "total/used/available memory"),
            Operation::Echo => entry("echo", &[], &["text"], "echo text back"),
            Operation::FileExists => {
                entry("file_exists?", &[], &["path"], "is path a regular file")
            }
            Operation::DirectoryExists => entry(
                "directory_exists?",
                &["dir_exists?"],
                &["path"],
                "is path a directory",
            ),
            Operation::FileWrite => entry(
                "file_write",
                &[],
                &["path", "content"],
                "append a line to a file",
            ),
            Operation::Installable => {
                entry("installable?", &[], &["package"], "is the package known to apt")
            }
            Operation::Installed => entry(
                "installed?",
                &[],
                &["package"],
                "is the package installed (null if unknown)",
            ),
            Operation::Install => entry("install", &[], &["package"], "apt-get install the package"),
            Operation::Internet => entry("internet?", &[], &[], "can the node ping the DNS server"),
            Operation::Ping => entry("ping", &[], &[], "connect latency to the node in ms"),
        }
    }

    pub fn name(self) -> &'static str {
        self.spec().name
    }

    pub fn arity(self) -> usize {
        self.spec().args.len()
    }

    /// Looks an operation up by its name or one of its aliases.
    pub fn from_name(name: &str) -> Result<Operation, BottleError> {
        Operation::ALL
            .into_iter()
            .find(|op| {
                let spec = op.spec();
                spec.name == name || spec.aliases.contains(&name)
            })
            .ok_or_else(|| BottleError::UnknownOperation {
                name: name.to_string(),
            })
    }

    /// Shell instruction for this operation with the given arguments.
    ///
    /// `install` and `ping` are composite and have no single instruction.
    pub fn instruction(self, args: &[String], dns_server: &str) -> Option<String> {
        let arg = |i: usize| args.get(i).map(String::as_str).unwrap_or_default();
        let instruction = match self {
            Operation::Date => "date".to_string(),
            Operation::Pwd => "pwd".to_string(),
            Operation::Temperature => format!("cat {}", TEMPERATURE_FILE),
            Operation::DiskSpace => "df -h".to_string(),
            Operation::Memory => "free -h".to_string(),
            Operation::Echo => format!("echo {}", quote(arg(0))),
            Operation::FileExists => format!("test -f {}; echo $?", quote(arg(0))),
            Operation::DirectoryExists => format!("test -d {}; echo $?", quote(arg(0))),
            Operation::FileWrite => format!(
                "echo \"{}\" >> {}",
                escape_double_quoted(arg(1)),
                quote(arg(0))
            ),
            Operation::Installable => {
                format!("apt-cache search --names-only {}", quote(&format!("^{}$", arg(0))))
            }
            Operation::Installed => format!("dpkg --get-selections | grep -i {}", quote(arg(0))),
            Operation::Internet => format!("ping {} -W 1 -c 1", quote(dns_server)),
            Operation::Install | Operation::Ping => return None,
        };
        Some(instruction)
    }

    /// Runs the operation in `session` and parses its output.
    ///
    /// Parse misses never fail; only transport or local execution errors do.
    pub fn perform(self, session: &mut Session, args: &[String]) -> Result<OperationResult> {
        if args.len() != self.arity() {
            return Err(BottleError::WrongArity {
                operation: self.name().to_string(),
                expected: self.arity(),
                got: args.len(),
            }
            .into());
        }

        let result = match self {
            Operation::Date => OperationResult::Date(parse::parse_text(&self.run(session, args)?)),
            Operation::Pwd => OperationResult::Pwd(parse::parse_text(&self.run(session, args)?)),
            Operation::Temperature => {
                OperationResult::Temperature(parse::parse_text(&self.run(session, args)?))
            }
            Operation::DiskSpace => {
                let output = self.run(session, args)?;
                session.trace("root row", &parse::device_line(&output, "/dev/root"));
                session.trace("sda1 row", &parse::device_line(&output, "/dev/sda1"));
                OperationResult::DiskSpace(parse::parse_disk_space(&output))
            }
            Operation::Memory => {
                let output = self.run(session, args)?;
                session.trace("mem row", &parse::memory_line(&output));
                OperationResult::Memory(parse::parse_memory(&output))
            }
            Operation::Echo => OperationResult::Echo(parse::parse_text(&self.run(session, args)?)),
            Operation::FileExists => {
                OperationResult::FileExists(parse::parse_exit_status(&self.run(session, args)?))
            }
            Operation::DirectoryExists => OperationResult::DirectoryExists(
                parse::parse_exit_status(&self.run(session, args)?),
            ),
            Operation::FileWrite => OperationResult::FileWrite(self.run(session, args)?),
            Operation::Installable => {
                OperationResult::Installable(parse::parse_installable(&self.run(session, args)?))
            }
            Operation::Installed => {
                OperationResult::Installed(Self::installed(session, &args[0])?)
            }
            Operation::Install => OperationResult::Install(Self::install(session, &args[0])?),
            Operation::Internet => OperationResult::Internet(Self::internet(session)?),
            Operation::Ping => OperationResult::Ping(
                session
                    .probe()
                    .ping(session.host(), Some(session.dns_server())),
            ),
        };
        Ok(result)
    }

    fn run(self, session: &mut Session, args: &[String]) -> Result<String> {
        let instruction = self
            .instruction(args, session.dns_server())
            .ok_or_else(|| anyhow::anyhow!("{} has no direct instruction", self))?;
        session.run(&instruction)
    }

    fn internet(session: &mut Session) -> Result<bool> {
        let output = Operation::Internet.run(session, &[])?;
        Ok(parse::parse_internet(&output))
    }

    fn installed(session: &mut Session, package: &str) -> Result<Option<bool>> {
        let output = Operation::Installed.run(session, &[package.to_string()])?;
        Ok(parse::parse_installed(&output, package))
    }

    fn install(session: &mut Session, package: &str) -> Result<String> {
        if !Self::internet(session)? {
            debug!("{}: no route to internet, skipping install of {}", session.host(), package);
            return Ok(NO_ROUTE.to_string());
        }
        if Self::installed(session, package)? == Some(true) {
            return Ok(ALREADY_INSTALLED.to_string());
        }

        let instruction = format!("apt-get update && apt-get install {} -y", quote(package));
        let output = session.run(&instruction)?;
        Ok(parse::parse_text(&output))
    }
}

const fn entry(
    name: &'static str,
    aliases: &'static [&'static str],
    args: &'static [&'static str],
    summary: &'static str,
) -> OperationSpec {
    OperationSpec {
        name,
        aliases,
        args,
        summary,
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
