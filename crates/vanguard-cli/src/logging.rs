use std::io;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _};

const DEFAULT_DIRECTIVES: &str = "vanguard=info,tower_http=info";

/// Installs the global subscriber.
///
/// Events go to stderr so that JSON written to stdout stays machine readable.
/// `RUST_LOG` overrides the default directives.
pub(crate) fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .init();
}
