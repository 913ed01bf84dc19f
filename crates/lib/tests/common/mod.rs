#![allow(dead_code)]
//! # Common Test Utilities

use civdoc::{ExtractionBridge, ExtractionSettings};
use civdoc_test_utils::MockAiProvider;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;
use tracing::subscriber::DefaultGuard;

static INIT: Once = Once::new();

/// Initializes the tracing subscriber once per test binary.
pub fn setup_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .compact()
            .try_init();
    });
}

/// Wraps a mock provider in a bridge with the default generation settings.
pub fn bridge_with(provider: &MockAiProvider, timeout: Duration) -> ExtractionBridge {
    ExtractionBridge::new(
        Box::new(provider.clone()),
        ExtractionSettings {
            timeout,
            ..Default::default()
        },
    )
}

/// An in-memory sink for formatted log lines.
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.contents().contains(needle)
    }
}

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Routes every event on the current thread into a buffer until the guard drops.
///
/// Pair with the default current-thread `#[tokio::test]` runtime so events
/// from the awaited futures land on this thread.
pub fn capture_logs() -> (LogBuffer, DefaultGuard) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    (buffer, tracing::subscriber::set_default(subscriber))
}
