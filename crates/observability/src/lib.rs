//! Logging setup shared by the card portal binaries.

/// Initialize process-wide logging with the default `info` filter.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    subscriber::init("info");
}

/// Like `init`, with a different default when `RUST_LOG` is unset.
pub fn init_with_default(directive: &str) {
    subscriber::init(directive);
}

/// Subscriber configuration (filter, format, writer).
pub mod subscriber;
