//! Test utilities for tmnl crates.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use tempfile::TempDir;

/// Creates a temporary directory that is cleaned up on drop.
pub fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Creates a project directory holding `.tmnl/layers.yaml` with `content`.
pub fn temp_config_dir(content: &str) -> (TempDir, PathBuf) {
    let dir = temp_dir();
    let config_dir = dir.path().join(".tmnl");
    std::fs::create_dir_all(&config_dir).expect("Failed to create config dir");
    let path = config_dir.join("layers.yaml");
    std::fs::write(&path, content).expect("Failed to write config file");
    (dir, path)
}

/// Installs a test-writer tracing subscriber once per test binary.
///
/// Later calls are no-ops, so every test may call it.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(tracing_subscriber::EnvFilter::new("debug"))
        .try_init();
}

/// Records values handed to a callback.
///
/// Clones share the same log, so one clone can be moved into a closure
/// while the test keeps another for assertions.
#[derive(Debug)]
pub struct CallRecorder<T> {
    calls: Arc<Mutex<Vec<T>>>,
}

impl<T> CallRecorder<T> {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Record a call.
    pub fn record(&self, value: T) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(value);
    }

    /// Number of recorded calls.
    pub fn len(&self) -> usize {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone> CallRecorder<T> {
    /// Snapshot of all recorded calls.
    pub fn calls(&self) -> Vec<T> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Most recent call.
    pub fn last(&self) -> Option<T> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

impl<T> Clone for CallRecorder<T> {
    fn clone(&self) -> Self {
        Self {
            calls: Arc::clone(&self.calls),
        }
    }
}

impl<T> Default for CallRecorder<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Assert that a Result is Ok and return the value.
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
}

/// Assert that a Result is Err and return the error.
#[macro_export]
macro_rules! assert_err {
    ($expr:expr) => {
        match $expr {
            Ok(v) => panic!("Expected Err, got Ok: {:?}", v),
            Err(e) => e,
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_temp_config_dir_layout() {
        let (dir, path) = temp_config_dir("ids:\n  strategy: uuid\n");
        assert!(path.starts_with(dir.path()));
        assert!(path.ends_with(".tmnl/layers.yaml"));
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("uuid"));
    }

    #[test]
    fn test_recorder_shares_log_between_clones() {
        let recorder = CallRecorder::new();
        let inner = recorder.clone();
        inner.record(1);
        inner.record(2);

        assert_eq!(recorder.len(), 2);
        assert_eq!(recorder.calls(), vec![1, 2]);
        assert_eq!(recorder.last(), Some(2));
    }

    #[test]
    fn test_assert_macros() {
        let ok: Result<i32, String> = Ok(3);
        assert_eq!(assert_ok!(ok), 3);

        let err: Result<i32, String> = Err("boom".to_string());
        assert_eq!(assert_err!(err), "boom");
    }

    proptest! {
        #[test]
        fn test_temp_config_content_roundtrip(content in "\\PC*") {
            let (_dir, path) = temp_config_dir(&content);
            let read_content = std::fs::read_to_string(&path).unwrap();
            prop_assert_eq!(content, read_content);
        }
    }
}
