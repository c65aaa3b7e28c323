//! Process-wide tracing/logging setup.

pub mod tracing;

pub use self::tracing::{LogFormat, UnknownLogFormat};

/// Initialize logging for the process.
///
/// Safe to call multiple times; only the first call installs a subscriber.
pub fn init(format: LogFormat) {
    self::tracing::init(format);
}
