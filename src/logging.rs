use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber. `RUST_LOG` wins over the built-in default.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "obra_maps=info".into());

    let result = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init();

    if let Err(e) = result {
        eprintln!("logging already initialised: {e}");
    }
}
