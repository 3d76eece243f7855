//! Output parsing rules for catalog operations
//!
//! Every rule is total: a missing line or a short row leaves the field out
//! (or `None`) instead of failing the operation.

use super::result::{DiskEntry, DiskUsage, MemoryUsage};
use crate::utils::shell::chomp;

/// Extracts the `/dev/root` and `/dev/sda1` rows from `df -h` output.
pub fn parse_disk_space(output: &str) -> DiskUsage {
    DiskUsage {
        root: disk_entry(output, "/dev/root"),
        sda1: disk_entry(output, "/dev/sda1"),
    }
}

/// First `df` row whose device column is `device`.
pub fn device_line<'a>(output: &'a str, device: &str) -> Option<&'a str> {
    output
        .lines()
        .find(|l| l.split_whitespace().next() == Some(device))
}

/// The `Mem:` row of `free -h` output.
pub fn memory_line(output: &str) -> Option<&str> {
    output.lines().nth(1)
}

fn disk_entry(output: &str, device: &str) -> Option<DiskEntry> {
    let line = device_line(output, device)?;

    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 4 {
        return None;
    }

    Some(DiskEntry {
        size: fields[1].to_string(),
        used: fields[2].to_string(),
        avail: fields[3].to_string(),
    })
}

/// Reads total, used and available from the `Mem:` row of `free -h`.
///
/// Format: `Mem:  total  used  free  shared  buff/cache  available`
pub fn parse_memory(output: &str) -> Option<MemoryUsage> {
    let line = memory_line(output)?;
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 4 {
        return None;
    }

    Some(MemoryUsage {
        total: fields[1].to_string(),
        used: fields[2].to_string(),
        available: fields[fields.len() - 1].to_string(),
    })
}

/// `test -f x; echo $?` style output: true when the status is `0`.
pub fn parse_exit_status(output: &str) -> bool {
    output.trim() == "0"
}

/// Any match from `apt-cache search` means the package can be installed.
pub fn parse_installable(output: &str) -> bool {
    !output.trim().is_empty()
}

/// Interprets `dpkg --get-selections | grep -i <pkg>`.
///
/// No output at all means the state is unknown. Multi-arch selections
/// carry an architecture suffix (`libc6:amd64`) which is ignored.
pub fn parse_installed(output: &str, package: &str) -> Option<bool> {
    if output.trim().is_empty() {
        return None;
    }

    Some(output.lines().any(|l| {
        l.split_whitespace()
            .next()
            .and_then(|name| name.split(':').next())
            == Some(package)
    }))
}

/// A single `ping -c 1` reply shows up as `icmp_seq` on the second line.
pub fn parse_internet(output: &str) -> bool {
    output
        .lines()
        .nth(1)
        .map(|l| l.contains("icmp_seq"))
        .unwrap_or(false)
}

pub fn parse_text(output: &str) -> String {
    chomp(output).to_string()
}
