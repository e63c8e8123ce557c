use clap::{Parser, Subcommand};
use serde_json::Value;
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use galley::config::GalleyConfig;
use galley::domain::foundation::ValidationError;
use galley::{Galley, OperationOutcome};

#[derive(Parser, Debug)]
#[command(name = "galley", version, about = "Requirements hearings and stack provisioning")]
struct Cli {
    /// Data directory (overrides GALLEY__STORAGE__DATA_DIR)
    #[arg(long, value_name = "DIR", global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create the data directory layout
    Init,
    /// Run one operation given as a JSON request
    Call {
        /// `{"operation": "<name>", ...}`; read from stdin when omitted
        request: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match GalleyConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(data_dir) = cli.data_dir {
        config.storage.data_dir = data_dir;
    }
    if let Err(e) = config.validate() {
        eprintln!("error: {e}");
        return ExitCode::FAILURE;
    }
    config.logging.init_tracing();

    let galley = Galley::from_config(&config);
    let outcome = match cli.command {
        Commands::Init => OperationOutcome::from_result(galley.init_data_dir().await),
        Commands::Call { request } => match read_request(request) {
            Ok(request) => galley.call_json(request).await,
            Err(e) => OperationOutcome::failure(&e),
        },
    };

    match serde_json::to_string_pretty(&outcome) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    }

    if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn read_request(arg: Option<String>) -> Result<Value, ValidationError> {
    let text = match arg {
        Some(text) => text,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| ValidationError::invalid_format("request", e.to_string()))?;
            buf
        }
    };
    serde_json::from_str(&text).map_err(|e| ValidationError::invalid_format("request", e.to_string()))
}
