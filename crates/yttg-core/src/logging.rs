use tracing_subscriber::{fmt, EnvFilter};

use crate::Result;

/// Initialize the global `tracing` subscriber.
///
/// Default: info for our crates. Can be overridden with `RUST_LOG`.
/// Calling this more than once is harmless (later calls are ignored).
pub fn init(service_name: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "info,yttg_core=info,yttg_telegram=info,yttg_youtube=info,{service_name}=info"
        ))
    });

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(true)
        .try_init();

    Ok(())
}
