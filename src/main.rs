//! txnstack main entry point

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Runtime;
use txnstack_api::{shutdown_signal, start_server, AppState};
use txnstack_config::Config;
use txnstack_core::{TransactionService, TransactionStore};
use txnstack_flags::FeatureGate;
use txnstack_loader::JsonFileSource;

#[derive(Parser, Debug)]
#[command(name = "txnstack")]
#[command(version)]
#[command(about = "Read-only transactions API with feature-gated filtering", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Override server.port
    #[arg(long, env = "PORT")]
    port: Option<u16>,

    /// Override data.path
    #[arg(long, env = "DATA_PATH")]
    data_path: Option<PathBuf>,

    /// Override features.api_key
    #[arg(long, env = "FLAGS_API_KEY", hide_env_values = true)]
    flags_api_key: Option<String>,

    /// Print the default configuration file and exit
    #[arg(long)]
    print_default_config: bool,
}

fn load_config(args: &Args) -> anyhow::Result<Config> {
    let mut config = if args.config.exists() {
        match Config::load(&args.config) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("[ERROR] Config error [{}]: {}", e.code(), e);
                for suggestion in e.suggestions() {
                    eprintln!("  - {}", suggestion);
                }
                return Err(e).with_context(|| format!("invalid config {}", args.config.display()));
            }
        }
    } else {
        eprintln!(
            "[WARN] Config file {} not found, using defaults",
            args.config.display()
        );
        Config::default()
    };

    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(path) = &args.data_path {
        config.data.path = path.clone();
    }
    if let Some(key) = &args.flags_api_key {
        config.features.api_key = key.clone();
    }

    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.print_default_config {
        print!("{}", Config::generate_default());
        return Ok(());
    }

    let config = load_config(&args)?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .init();

    let rt = Runtime::new()?;
    rt.block_on(run(config))
}

async fn run(config: Config) -> anyhow::Result<()> {
    let source = JsonFileSource::new(config.transactions_path());
    log::info!("Loading transactions from {}", source.path().display());

    // No store, no service
    let store = TransactionStore::load(&source)
        .await
        .context("failed to load transactions")?;

    let gate = Arc::new(FeatureGate::from_config(&config.features).await);
    let service = TransactionService::new(Arc::new(store), gate.clone());

    let state = AppState {
        service: Arc::new(service),
        config: Arc::new(config),
    };

    let result = start_server(state, shutdown_signal()).await;

    gate.shutdown().await;
    result
}
