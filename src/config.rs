// 配置管理
use crate::cli::Cli;
use crate::utils::error::BottleError;
use anyhow::{Context, Result};
use dialoguer::Password;
use std::collections::HashMap;
use std::fs;
use std::io::Read;

pub const DEFAULT_DNS_SERVER: &str = "8.8.8.8";
pub const DEFAULT_THREADS: usize = 16;

#[derive(Debug, Clone)]
pub struct Config {
    /// Scroll text; taken by the first cast.
    pub scroll: Option<String>,
    pub domain: Option<String>,
    pub targets: Vec<String>,
    pub pwlist: HashMap<String, String>,
    pub password: Option<String>,
    pub user: Option<String>,
    pub port: u16,
    /// Worker threads; 0 means one per node.
    pub threads: usize,
    pub debug: bool,
    pub dns_server: String,
    pub progress: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scroll: None,
            domain: None,
            targets: Vec::new(),
            pwlist: HashMap::new(),
            password: None,
            user: None,
            port: 22,
            threads: DEFAULT_THREADS,
            debug: false,
            dns_server: DEFAULT_DNS_SERVER.to_string(),
            progress: false,
        }
    }
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let scroll = Self::read_scroll(cli)?;
        let pwlist = Self::parse_pwlist(&cli.pw)?;

        let targets: Vec<String> = cli
            .target
            .iter()
            .flat_map(|t| t.split(','))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();

        let password = if cli.ask_password {
            let prompt = match &cli.user {
                Some(user) => format!("Default SSH password for {}", user),
                None => "Default SSH password".to_string(),
            };
            Some(Password::new().with_prompt(prompt).interact()?)
        } else {
            cli.password.clone()
        };

        Ok(Config {
            scroll: Some(scroll),
            domain: cli.domain.clone(),
            targets,
            pwlist,
            password,
            user: cli.user.clone(),
            port: cli.port,
            threads: cli.threads,
            debug: cli.debug,
            dns_server: cli.dns_server.clone(),
            progress: cli.progress,
        })
    }

    fn read_scroll(cli: &Cli) -> Result<String> {
        match (&cli.file, &cli.scroll) {
            (Some(path), _) if path.as_os_str() == "-" => {
                let mut text = String::new();
                std::io::stdin()
                    .read_to_string(&mut text)
                    .context("Failed to read scroll from stdin")?;
                Ok(text)
            }
            (Some(path), _) => fs::read_to_string(path)
                .with_context(|| format!("Failed to read scroll file {}", path.display())),
            (None, Some(text)) => Ok(text.clone()),
            (None, None) => Err(anyhow::anyhow!(
                "No scroll given; pass it as an argument or with --file"
            )),
        }
    }

    /// Parses repeated `NAME=SECRET` entries.
    pub fn parse_pwlist(entries: &[String]) -> Result<HashMap<String, String>, BottleError> {
        entries
            .iter()
            .map(|entry| match entry.split_once('=') {
                Some((name, secret)) if !name.is_empty() => {
                    Ok((name.to_string(), secret.to_string()))
                }
                _ => Err(BottleError::InvalidPasswordEntry {
                    entry: entry.clone(),
                }),
            })
            .collect()
    }
}
