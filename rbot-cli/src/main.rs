//! rbot CLI: run the routine bot or list its routines. Config from env and optional CLI args.

use anyhow::Result;
use clap::Parser;
use rbot_cli::{demo_registry, load_config, run_bot, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let registry = demo_registry()?;

    match &cli.command {
        Commands::Run { .. } => {
            let config = load_config(&cli.command)?;
            run_bot(config, registry).await
        }
        Commands::Routines => {
            for name in registry.names() {
                if let Some(routine) = registry.lookup(&name) {
                    println!("{}{}", name, routine.signature());
                }
            }
            Ok(())
        }
    }
}
