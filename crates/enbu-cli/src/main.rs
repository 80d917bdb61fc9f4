mod bootstrap;
mod cli_args;
mod init_cmd;
mod progress_printer;
mod report;
mod run_cmd;

use clap::Parser;

use crate::cli_args::{Cli, Command};

/// Runs the selected (sub)command and maps its outcome onto §6's exit
/// codes: `0` success, `1` one or more flows failed, `2` a setup/argument
/// error before any `FlowResult` could be produced.
async fn dispatch(cli: Cli) -> i32 {
    let result = match cli.command {
        Some(Command::Init) => std::env::current_dir()
            .map_err(anyhow::Error::from)
            .and_then(|cwd| init_cmd::run_init(&cwd))
            .map(|()| 0),
        None => run_cmd::run_command(cli.run).await,
    };

    match result {
        Ok(exit_code) => exit_code,
        Err(error) => {
            eprintln!("enbu: {error:#}");
            2
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    bootstrap::init_tracing(cli.verbose);
    std::process::exit(dispatch(cli).await);
}
