//! Logging.
//!
//! Diagnostics go through the [`log`] facade. [`init_logging`] installs an `env_logger` backend
//! once per process; applications already using another `log` backend simply don’t call it.

use std::io::Write;
use std::sync::Once;

use log::LevelFilter;

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. `"info"`,
/// `"glcontext=debug,glcontext_glfw=warn"`). When it is not set, `RUST_LOG` is used, and
/// `min_level` when neither is present.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
  /// Filter directives in `env_logger` syntax; takes precedence over `RUST_LOG`.
  pub env_filter: Option<String>,
  /// Maximum level logged when no filter is given.
  pub min_level: LevelFilter,
  /// Whether to colorize the output.
  pub write_style: env_logger::WriteStyle,
  /// Prefix every line with its severity and source location.
  pub with_location: bool,
}

impl Default for LoggingConfig {
  fn default() -> Self {
    Self {
      env_filter: None,
      min_level: LevelFilter::Info,
      write_style: env_logger::WriteStyle::Auto,
      with_location: true,
    }
  }
}

static INIT: Once = Once::new();

/// Initializes the global logger once.
///
/// This function is idempotent and thread-safe; subsequent calls are ignored.
pub fn init_logging(config: LoggingConfig) {
  INIT.call_once(|| {
    let mut builder = env_logger::Builder::new();

    if let Some(filter) = config.env_filter {
      builder.parse_filters(&filter);
    } else if let Ok(filter) = std::env::var("RUST_LOG") {
      builder.parse_filters(&filter);
    } else {
      builder.filter_level(config.min_level);
    }

    builder.write_style(config.write_style);

    if config.with_location {
      builder.format(|buf, record| {
        writeln!(
          buf,
          "[{}] {}:{} {}: {}",
          record.level(),
          record.file().unwrap_or("<unknown>"),
          record.line().unwrap_or(0),
          record.target(),
          record.args()
        )
      });
    }

    // another logger might have been installed by the application already
    if builder.try_init().is_err() {
      return;
    }

    log::debug!("logging initialized");
  });
}

/// Change the process-wide maximum log level.
pub fn set_min_level(level: LevelFilter) {
  log::set_max_level(level);
}

/// Whether [`init_logging`] already ran.
pub fn is_initialized() -> bool {
  INIT.is_completed()
}
