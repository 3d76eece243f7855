use anyhow::Result;
use clap::Parser;
use ssh_bottle::catalog::Operation;
use ssh_bottle::{cli::Cli, config::Config, run_cast};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    if cli.list {
        print_catalog();
        return Ok(());
    }

    let config = match Config::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {:#}", e);
            std::process::exit(1);
        }
    };

    let results = run_cast(config).await?;
    println!("{}", serde_json::to_string_pretty(&results)?);

    Ok(())
}

fn print_catalog() {
    for op in Operation::ALL {
        let spec = op.spec();
        let mut usage = spec.name.to_string();
        for arg in spec.args {
            usage.push_str(&format!(" <{}>", arg));
        }
        if spec.aliases.is_empty() {
            println!("{:<32} {}", usage, spec.summary);
        } else {
            println!(
                "{:<32} {} (alias: {})",
                usage,
                spec.summary,
                spec.aliases.join(", ")
            );
        }
    }
}
