//! Visor Yield - CLI Entry Point
//!
//! Runs the Gamma vault yield computation and prints the pool records as JSON.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{info, Level};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;
use visor_yield::adaptor::{GammaAdaptor, YieldAdaptor, GAMMA_DESCRIPTOR};
use visor_yield::config::Config;
use visor_yield::registry::ChainRegistry;
use visor_yield::subgraph::SubgraphClient;

/// Visor Yield CLI
#[derive(Parser)]
#[command(name = "visor-yield")]
#[command(version, about = "Fee yield estimates for Gamma hypervisor vaults")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute pool yields and print them as JSON
    Apy {
        /// Restrict the run to these chains (repeatable)
        #[arg(short, long)]
        chain: Vec<String>,

        /// Pretty-print the JSON output
        #[arg(short, long)]
        pretty: bool,

        /// Write the JSON to a file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },

    /// List the supported chains and their subgraph endpoints
    Chains,

    /// Print the adaptor descriptor
    Describe,
}

#[derive(Serialize)]
struct ChainRow {
    name: &'static str,
    slug: &'static str,
    chain_id: u64,
    url: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging()?;

    let config = Config::load()?;
    config.validate()?;

    match cli.command.unwrap_or(Commands::Apy {
        chain: Vec::new(),
        pretty: false,
        output: None,
    }) {
        Commands::Apy {
            chain,
            pretty,
            output,
        } => run_apy(&config, &chain, pretty, output.as_deref()).await,
        Commands::Chains => show_chains(&config),
        Commands::Describe => {
            println!("{}", serde_json::to_string_pretty(&GAMMA_DESCRIPTOR)?);
            Ok(())
        }
    }
}

async fn run_apy(
    config: &Config,
    chains: &[String],
    pretty: bool,
    output: Option<&str>,
) -> Result<()> {
    let registry = if chains.is_empty() {
        ChainRegistry::builtin()
    } else {
        ChainRegistry::builtin().select(chains)?
    };

    info!(
        chains = ?registry.names().collect::<Vec<_>>(),
        skip_failed_chains = config.pipeline.skip_failed_chains,
        max_retries = config.retry.max_retries,
        "Starting yield computation"
    );

    let adaptor = GammaAdaptor::new(config, registry)?;
    let pools = adaptor.apy().await?;

    let json = if pretty {
        serde_json::to_string_pretty(&pools)?
    } else {
        serde_json::to_string(&pools)?
    };

    match output {
        Some(path) => {
            std::fs::write(path, json).with_context(|| format!("Failed to write {}", path))?;
            info!("Wrote {} pools to {}", pools.len(), path);
        }
        None => println!("{}", json),
    }

    Ok(())
}

fn show_chains(config: &Config) -> Result<()> {
    let client = SubgraphClient::new(config)?;
    let rows: Vec<ChainRow> = ChainRegistry::builtin()
        .entries()
        .iter()
        .map(|e| ChainRow {
            name: e.name,
            slug: e.slug,
            chain_id: e.chain_id,
            url: client.url_for(e.slug),
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&rows)?);
    Ok(())
}

/// Initialize logging to stderr and an hourly rolling file.
///
/// Stdout is reserved for the JSON result.
fn init_logging() -> Result<()> {
    use tracing_subscriber::fmt::writer::MakeWriterExt;

    std::fs::create_dir_all("logs")?;

    let file_appender = tracing_appender::rolling::hourly("logs", "visor-yield.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    // Keep the writer alive for the program duration
    Box::leak(Box::new(guard));

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("visor_yield=debug".parse()?)
                .add_directive(Level::INFO.into()),
        )
        .with_writer(std::io::stderr.and(file_writer))
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(false)
        .init();

    Ok(())
}
