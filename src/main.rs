//! folio binary entry point.

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use folio::cli::{self, Cli};
use folio::ui::output;

/// Install the log subscriber. Logs go to stderr so stdout stays scriptable.
fn init_tracing(quiet: bool, debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else if quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    init_tracing(cli.quiet, cli.debug);

    match cli::run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}
