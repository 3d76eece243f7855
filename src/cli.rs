// 命令行参数解析
use crate::config::{DEFAULT_DNS_SERVER, DEFAULT_THREADS};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ssh-bottle")]
#[command(about = "Cast a scroll of diagnostic commands at hosts over SSH")]
#[command(version = "0.1.0")]
pub struct Cli {
    /// Scroll text, e.g. "date; disk_space; installed? vim"
    pub scroll: Option<String>,

    /// Read the scroll from a file ("-" for stdin)
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Domain appended to every target name
    #[arg(short, long)]
    pub domain: Option<String>,

    /// Target host short name (repeatable or comma-separated); none runs locally
    #[arg(short, long)]
    pub target: Vec<String>,

    /// SSH login user for every target
    #[arg(short, long)]
    pub user: Option<String>,

    /// Default SSH password
    #[arg(short = 'P', long)]
    pub password: Option<String>,

    /// Per-host password as NAME=SECRET (repeatable)
    #[arg(long)]
    pub pw: Vec<String>,

    /// Prompt for the default password
    #[arg(long, conflicts_with = "password")]
    pub ask_password: bool,

    /// SSH server port
    #[arg(short, long, default_value = "22")]
    pub port: u16,

    /// Number of parallel nodes (0 = one thread per node)
    #[arg(short = 'j', long, default_value_t = DEFAULT_THREADS)]
    pub threads: usize,

    /// DNS server used by internet?
    #[arg(long, default_value = DEFAULT_DNS_SERVER)]
    pub dns_server: String,

    /// Trace commands and intermediate values
    #[arg(long)]
    pub debug: bool,

    /// Show a progress bar while nodes answer
    #[arg(long)]
    pub progress: bool,

    /// List the available operations and exit
    #[arg(long)]
    pub list: bool,
}
