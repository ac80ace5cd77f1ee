//! Logging configuration and initialization

use tracing::{debug, trace};
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;

/// Filter used when neither RUST_LOG nor the config provides one
pub fn verbosity_directive(verbose: u8) -> &'static str {
  match verbose {
    0 => "warn",
    1 => "info",
    2 => "debug",
    _ => "trace,sqlx=debug",
  }
}

/// Initialize tracing. Logs go to stderr so command output stays clean.
pub fn init_logging(config: &AppConfig, verbose: u8) {
  let filter = EnvFilter::try_from_default_env()
    .ok()
    .or_else(|| {
      config
        .log_filter
        .as_deref()
        .and_then(|f| EnvFilter::try_new(f).ok())
    })
    .unwrap_or_else(|| EnvFilter::new(verbosity_directive(verbose)));

  let _ = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_target(verbose >= 2) // Show target module for -vv and above
    .with_line_number(verbose >= 3) // Show line numbers for -vvv
    .try_init();

  debug!("workout-tracker started with verbosity level: {}", verbose);
  trace!("Full CLI args: {:?}", std::env::args().collect::<Vec<_>>());
}
