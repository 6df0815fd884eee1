use clap::Parser;
use console::style;
use std::process::ExitCode;

use ciphersweep::Cli;

#[tokio::main]
async fn main() -> ExitCode {
  let cli = Cli::parse();

  match ciphersweep::run(cli).await {
    Ok(outcome) => ExitCode::from(outcome.code()),
    Err(e) => {
      eprintln!("{} {e:#}", style("Error:").red().bold());
      ExitCode::from(ciphersweep::error_code(&e))
    }
  }
}
