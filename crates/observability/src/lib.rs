//! Tracing and logging setup shared by every app.

/// Tracing configuration (filters, output format).
pub mod tracing;

pub use self::tracing::LogFormat;

/// Initialize process-wide logging with the format named by `LOG_FORMAT`
/// (`json` by default).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    let format = std::env::var("LOG_FORMAT")
        .map(|v| LogFormat::parse(&v))
        .unwrap_or_default();
    self::tracing::init(format);
}
