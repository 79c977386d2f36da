//! readwrite: read and update the message stored in a ReadWrite contract.
//!
//! ```text
//! readwrite [--config FILE] [--contract ADDR] [--rpc-url URL] [--wallet-url URL] <COMMAND>
//!
//!   status          check the wallet connection
//!   fetch           show the stored message
//!   set <MESSAGE>   store a new message and wait for confirmation
//!   shell           interactive session
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tokio::io::BufReader;

use readwrite_client::app::shell::run_shell;
use readwrite_client::app::view::render;
use readwrite_client::config::{load_config, ConfigOverrides};
use readwrite_client::observability::init_logging;
use readwrite_client::{AppState, ContractClient};

#[derive(Parser)]
#[command(name = "readwrite")]
#[command(about = "Read and write the message stored in a ReadWrite contract", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Deployed contract address (overrides READWRITE_CONTRACT_ADDRESS).
    #[arg(long)]
    contract: Option<String>,

    /// JSON-RPC endpoint (overrides READWRITE_RPC_URL).
    #[arg(long)]
    rpc_url: Option<String>,

    /// EIP-1193 wallet endpoint (overrides READWRITE_WALLET_URL).
    #[arg(long)]
    wallet_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the wallet connection without prompting
    Status,
    /// Fetch the current message
    Fetch,
    /// Set a new message
    Set {
        /// Text to store
        message: String,
    },
    /// Interactive session
    Shell,
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let overrides = ConfigOverrides {
        contract_address: cli.contract,
        rpc_url: cli.rpc_url,
        wallet_endpoint: cli.wallet_url,
    };
    let config = match load_config(cli.config.as_deref(), &overrides) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(ExitCode::FAILURE);
        }
    };
    init_logging(&config.observability.log_level);

    tracing::info!(
        rpc_url = %config.chain.rpc_url,
        chain_id = config.chain.chain_id,
        contract = %config.contract.address,
        "Configuration loaded"
    );

    let client = match ContractClient::from_config(&config) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(ExitCode::FAILURE);
        }
    };
    let mut state = AppState::new();
    let interactive = matches!(cli.command, Commands::Shell);

    let ok = match cli.command {
        Commands::Status => {
            client.check_connection(&mut state).await;
            state.wallet_status.connected_address().is_some()
        }
        Commands::Fetch => {
            client.check_connection(&mut state).await;
            client.fetch_message(&mut state).await.is_ok()
        }
        Commands::Set { message } => {
            client.check_connection(&mut state).await;
            // The old message goes into the last-update line; a failed
            // read leaves it empty and does not block the write.
            let _ = client.fetch_message(&mut state).await;
            state.pending_input = message;
            client.submit_message(&mut state).await.is_ok()
        }
        Commands::Shell => {
            let stdin = BufReader::new(tokio::io::stdin());
            run_shell(&client, &mut state, stdin, tokio::io::stdout()).await?;
            true
        }
    };

    if !interactive {
        print!("{}", render(&state));
    }

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
