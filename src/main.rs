//! `cmci_delete [ARGS_FILE]`
//!
//! Reads the invocation arguments as JSON from `ARGS_FILE` (or stdin), runs
//! the delete operation and prints the outcome as JSON on stdout. Exits
//! with status 1 when the outcome is failed. Logs go to stderr and are
//! controlled with `RUST_LOG`.

use std::io::Read;
use std::process::ExitCode;

use cmci::operation::{execute, CmciArguments, CmciOutcome, DeleteOperation};
use cmci::{CmciError, ValidationError};

fn read_arguments() -> Result<CmciArguments, ValidationError> {
    let input = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(&path).map_err(|e| {
            ValidationError::InvalidArguments {
                reason: format!("cannot read {path}: {e}"),
            }
        })?,
        None => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .map_err(|e| ValidationError::InvalidArguments {
                    reason: format!("cannot read stdin: {e}"),
                })?;
            input
        }
    };
    CmciArguments::from_json(&input)
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let outcome = match read_arguments() {
        Ok(arguments) => execute(&DeleteOperation, &arguments).await,
        Err(error) => CmciOutcome::failure(&CmciError::from(error), None),
    };

    match serde_json::to_string_pretty(&outcome) {
        Ok(json) => println!("{json}"),
        Err(error) => {
            tracing::error!(%error, "Could not serialize outcome");
            return ExitCode::FAILURE;
        }
    }

    if outcome.failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
