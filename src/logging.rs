// 📝 Logging - tracing subscriber setup shared by the binaries

use tracing::Level;

/// Parse a level name, falling back to INFO
pub fn parse_level(name: &str) -> Level {
    name.trim().parse().unwrap_or(Level::INFO)
}

/// Install the fmt subscriber once; later calls are no-ops.
pub fn init(level: &str) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(parse_level(level))
        .with_target(false)
        .try_init();
}
