//! simcfg: inspect simulation configuration from the command line.
//!
//! Every configuration error is fatal here: it is logged and the process
//! exits with the code from [`exit_codes::ExitCode`].

use clap::Parser;
use exit_codes::ExitCode;

mod commands;
mod exit_codes;
mod logging;

#[derive(Parser, Debug)]
#[command(name = "simcfg", version, about = "Hierarchical simulation configuration tool")]
struct Cli {
    /// Log every setting read (debug level)
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: commands::Command,
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.log_json);

    match commands::run(cli.command) {
        Ok(()) => ExitCode::Clean.into(),
        Err(err) => {
            tracing::error!(code = err.code(), "{err}");
            ExitCode::from(&err).into()
        }
    }
}
