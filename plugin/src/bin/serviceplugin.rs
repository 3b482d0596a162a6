use std::io;
use std::process::ExitCode;

use pagerduty_plugin::logging::init_tracing;
use pagerduty_plugin::{serve, ServicePlugin};

fn main() -> ExitCode {
    init_tracing();
    let mut plugin = ServicePlugin::pagerduty();
    match serve(io::stdin().lock(), io::stdout().lock(), &mut plugin) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "stdio transport failed");
            ExitCode::FAILURE
        }
    }
}
