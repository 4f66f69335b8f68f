use tracing::subscriber::SetGlobalDefaultError;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Registry};

/// Configuration of the diagnostic stream.
///
/// **Fields**
/// - `filter`: `EnvFilter` directives used when `RUST_LOG` is unset,
///   e.g. `"playback_event_log=debug"`.
/// - `enable_stdout`: if `true`, a `tracing_subscriber::fmt` layer prints
///   diagnostic lines to stdout; otherwise events are filtered but not
///   printed, leaving room for layers installed by the host.
/// - `with_target`: include the event target in printed lines.
#[derive(Clone, Debug)]
pub struct DiagnosticsConfig {
    pub filter: String,
    pub enable_stdout: bool,
    pub with_target: bool,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            filter: "playback_event_log=debug".to_string(),
            enable_stdout: true,
            with_target: false,
        }
    }
}

/// Install a global `tracing` subscriber for the diagnostic stream.
///
/// `RUST_LOG` takes precedence over [`DiagnosticsConfig::filter`]. Fails if
/// a global subscriber is already installed.
pub fn init_tracing_with_config(config: DiagnosticsConfig) -> Result<(), SetGlobalDefaultError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.filter));

    // Two subscriber shapes so the types line up with and without `fmt`.
    if config.enable_stdout {
        let fmt_layer = tracing_subscriber::fmt::layer().with_target(config.with_target);
        let subscriber = Registry::default().with(filter).with(fmt_layer);
        tracing::subscriber::set_global_default(subscriber)
    } else {
        let subscriber = Registry::default().with(filter);
        tracing::subscriber::set_global_default(subscriber)
    }
}

/// Install the diagnostic subscriber with [`DiagnosticsConfig::default`].
pub fn init_tracing() -> Result<(), SetGlobalDefaultError> {
    init_tracing_with_config(DiagnosticsConfig::default())
}
