//! Hardware sink — newline-terminated ASCII writes to sysfs control points.

use std::collections::HashSet;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

// ── Error type ──

/// Sink I/O errors. Each variant carries the resolved control-point path and
/// the underlying OS error.
#[derive(Debug)]
pub enum SinkError {
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl SinkError {
    /// Resolved path of the control point the failed write targeted.
    pub fn path(&self) -> &Path {
        match self {
            SinkError::Open { path, .. } | SinkError::Write { path, .. } => path,
        }
    }
}

impl fmt::Display for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SinkError::Open { path, source } => {
                write!(f, "Failed to open {}: {source}", path.display())
            }
            SinkError::Write { path, source } => {
                write!(f, "Failed to write {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for SinkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SinkError::Open { source, .. } | SinkError::Write { source, .. } => Some(source),
        }
    }
}

pub type Result<T> = std::result::Result<T, SinkError>;

// ── Trait ──

/// Write primitive for hardware control points.
///
/// Each call is one complete open-write-close cycle against the named control
/// point; the sink holds no file descriptors between calls. Implementations
/// report every failure to the caller, but are expected to log at most once
/// per control point so a permanently absent device node cannot flood the log.
pub trait LightSink {
    fn write_int(&self, point: &'static str, value: u32) -> Result<()>;
    fn write_str(&self, point: &'static str, token: &str) -> Result<()>;
}

// ── Deduplicating failure reporter ──

/// Logs the first failure per control point, suppresses the rest until
/// process restart. The error itself is still returned to the caller on
/// every failure.
#[derive(Debug, Default)]
pub struct WarnOnce {
    seen: Mutex<HashSet<&'static str>>,
}

impl WarnOnce {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `err` for `point`. Only the first report per point is logged.
    pub fn report(&self, point: &'static str, what: &str, err: &std::io::Error) {
        if self.first(point) {
            log::warn!("{what} {point}: {err} (suppressing further reports for this control point)");
        }
    }

    fn first(&self, point: &'static str) -> bool {
        let mut seen = self.seen.lock().unwrap_or_else(|e| e.into_inner());
        seen.insert(point)
    }
}

// ── Sysfs implementation ──

/// Production sink writing through the filesystem.
///
/// `root` is prepended to the absolute control-point paths, so tests and
/// tooling can target a scratch tree instead of the live `/sys`.
#[derive(Debug)]
pub struct SysfsSink {
    root: PathBuf,
    warned: WarnOnce,
}

impl SysfsSink {
    /// Sink over the live filesystem.
    pub fn new() -> Self {
        Self::with_root("/")
    }

    /// Sink rooted at `root`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        SysfsSink {
            root: root.into(),
            warned: WarnOnce::new(),
        }
    }

    /// Filesystem path a control point resolves to under this sink's root.
    pub fn resolve(&self, point: &str) -> PathBuf {
        self.root.join(point.trim_start_matches('/'))
    }

    fn write_line(&self, point: &'static str, line: &str) -> Result<()> {
        let path = self.resolve(point);
        let mut file = OpenOptions::new().write(true).open(&path).map_err(|e| {
            self.warned.report(point, "failed to open", &e);
            SinkError::Open {
                path: path.clone(),
                source: e,
            }
        })?;
        file.write_all(line.as_bytes()).map_err(|e| {
            self.warned.report(point, "failed to write", &e);
            SinkError::Write { path, source: e }
        })
    }
}

impl Default for SysfsSink {
    fn default() -> Self {
        Self::new()
    }
}

impl LightSink for SysfsSink {
    fn write_int(&self, point: &'static str, value: u32) -> Result<()> {
        self.write_line(point, &format!("{value}\n"))
    }

    fn write_str(&self, point: &'static str, token: &str) -> Result<()> {
        self.write_line(point, &format!("{token}\n"))
    }
}

// ── Mock sink for testing ──

/// In-memory mock sink for unit and integration tests.
///
/// Always compiled (zero runtime cost), hidden from public docs.
#[doc(hidden)]
pub mod mock {
    use super::*;

    /// A single recorded write.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum SinkWrite {
        Int { point: &'static str, value: u32 },
        Str { point: &'static str, token: String },
    }

    impl SinkWrite {
        pub fn int(point: &'static str, value: u32) -> Self {
            SinkWrite::Int { point, value }
        }

        pub fn str(point: &'static str, token: &str) -> Self {
            SinkWrite::Str {
                point,
                token: token.into(),
            }
        }
    }

    /// Sink that records writes in order. State is `Mutex`-guarded rather
    /// than `RefCell` so threaded tests can share one instance.
    #[derive(Debug, Default)]
    pub struct MockSink {
        writes: Mutex<Vec<SinkWrite>>,
        fail_points: Mutex<HashSet<&'static str>>,
    }

    impl MockSink {
        pub fn new() -> Self {
            Self::default()
        }

        /// Make every write to `point` fail as if the node were absent.
        pub fn fail_point(&self, point: &'static str) {
            self.fail_points
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .insert(point);
        }

        /// Snapshot of all writes recorded so far, in order.
        pub fn writes(&self) -> Vec<SinkWrite> {
            self.writes
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .clone()
        }

        pub fn write_count(&self) -> usize {
            self.writes.lock().unwrap_or_else(|e| e.into_inner()).len()
        }

        /// Discard recorded writes (failure injection is kept).
        pub fn clear(&self) {
            self.writes
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .clear();
        }

        fn record(&self, point: &'static str, write: SinkWrite) -> Result<()> {
            if self
                .fail_points
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .contains(point)
            {
                return Err(SinkError::Open {
                    path: PathBuf::from(point),
                    source: std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        "mock: control point failure injected",
                    ),
                });
            }
            self.writes
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push(write);
            Ok(())
        }
    }

    impl LightSink for MockSink {
        fn write_int(&self, point: &'static str, value: u32) -> Result<()> {
            self.record(point, SinkWrite::int(point, value))
        }

        fn write_str(&self, point: &'static str, token: &str) -> Result<()> {
            self.record(point, SinkWrite::str(point, token))
        }
    }
}
