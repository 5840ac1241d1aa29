pub mod config;
pub mod tracing;
pub mod wiring;

pub use self::config::{load_config, load_runtime_config, resolve_config, RuntimeConfig};
pub use self::tracing::init_tracing_subscriber;
pub use self::wiring::{wire_dependencies, HistoryBackend, WiringError, WiringResult};
