//! Configuration loading and parsing.
//!
//! Parses `mdedit.toml` (or an override path provided by the binary):
//!
//! ```toml
//! [buffer]
//! chunk_size = 100
//!
//! [view]
//! height = 0          # 0 = terminal rows minus the status row
//!
//! [input.repeat]
//! delay_ms = 500
//! interval_ms = 50
//! ```
//!
//! Unknown fields are ignored. A missing file or a parse error yields the
//! defaults; the parse error is logged at WARN. The visible height depends on
//! the terminal, so it is resolved later by [`Config::apply_context`].

use anyhow::Result;
use serde::Deserialize;
use std::{fs, path::PathBuf, time::Duration};
use tracing::{info, warn};

pub const CONFIG_FILE_NAME: &str = "mdedit.toml";

/// Rows reserved below the text area for the status line.
pub const STATUS_ROWS: u16 = 1;

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct BufferConfig {
    #[serde(default = "BufferConfig::default_chunk_size")]
    pub chunk_size: usize,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            chunk_size: Self::default_chunk_size(),
        }
    }
}

impl BufferConfig {
    const fn default_chunk_size() -> usize {
        100
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ViewConfig {
    #[serde(default)]
    pub height: u16,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct RepeatConfig {
    #[serde(default = "RepeatConfig::default_delay_ms")]
    pub delay_ms: u64,
    #[serde(default = "RepeatConfig::default_interval_ms")]
    pub interval_ms: u64,
}

impl Default for RepeatConfig {
    fn default() -> Self {
        Self {
            delay_ms: Self::default_delay_ms(),
            interval_ms: Self::default_interval_ms(),
        }
    }
}

impl RepeatConfig {
    const fn default_delay_ms() -> u64 {
        500
    }
    const fn default_interval_ms() -> u64 {
        50
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct InputConfig {
    #[serde(default)]
    pub repeat: RepeatConfig,
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    #[serde(default)]
    pub buffer: BufferConfig,
    #[serde(default)]
    pub view: ViewConfig,
    #[serde(default)]
    pub input: InputConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub file: ConfigFile, // parsed (or default) data
    pub effective_height: usize,
}

/// `./mdedit.toml` when present, else the platform config dir
/// (`$XDG_CONFIG_HOME/mdedit/mdedit.toml`, `%APPDATA%\mdedit\mdedit.toml`).
pub fn discover() -> PathBuf {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("mdedit").join(CONFIG_FILE_NAME);
    }
    local
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        info!(target: "config", path = %path.display(), "config_missing_using_defaults");
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => {
            info!(target: "config", path = %path.display(), "config_loaded");
            Ok(Config {
                file,
                effective_height: 0,
            })
        }
        Err(e) => {
            warn!(
                target: "config",
                path = %path.display(),
                error = %e,
                "config_parse_failed_using_defaults"
            );
            Ok(Config::default())
        }
    }
}

impl Config {
    /// Chunk size bound, never below one unit.
    pub fn chunk_size(&self) -> usize {
        self.file.buffer.chunk_size.max(1)
    }

    pub fn repeat_delay(&self) -> Duration {
        Duration::from_millis(self.file.input.repeat.delay_ms)
    }

    pub fn repeat_interval(&self) -> Duration {
        Duration::from_millis(self.file.input.repeat.interval_ms.max(1))
    }

    /// Resolve the visible text height for a terminal with `terminal_rows`
    /// rows. An explicit `[view] height` wins (still capped by the terminal
    /// when one is known); otherwise all rows but the status line are used.
    /// Never below one.
    pub fn apply_context(&mut self, terminal_rows: u16) -> usize {
        let text_rows = terminal_rows.saturating_sub(STATUS_ROWS);
        let configured = self.file.view.height;
        let height = match (configured, text_rows) {
            (0, rows) => rows,
            (h, 0) => h,
            (h, rows) => {
                if h > rows {
                    info!(
                        target: "config",
                        configured = h,
                        text_rows = rows,
                        "view_height_clamped"
                    );
                }
                h.min(rows)
            }
        };
        self.effective_height = usize::from(height.max(1));
        self.effective_height
    }

    /// Recompute after a terminal resize. `Some(new)` when the height changed.
    pub fn recompute_after_resize(&mut self, terminal_rows: u16) -> Option<usize> {
        let prev = self.effective_height;
        let current = self.apply_context(terminal_rows);
        (current != prev).then_some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex, MutexGuard};
    use tracing::Level;
    use tracing::subscriber::with_default;
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone)]
    struct BufferWriter {
        inner: Arc<Mutex<Vec<u8>>>,
    }

    impl BufferWriter {
        fn new() -> (Self, Arc<Mutex<Vec<u8>>>) {
            let buf = Arc::new(Mutex::new(Vec::new()));
            (Self { inner: buf.clone() }, buf)
        }
    }

    struct LockedWriter<'a> {
        guard: MutexGuard<'a, Vec<u8>>,
    }

    impl<'a> Write for LockedWriter<'a> {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.guard.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for BufferWriter {
        type Writer = LockedWriter<'a>;

        fn make_writer(&'a self) -> Self::Writer {
            LockedWriter {
                guard: self.inner.lock().expect("log buffer poisoned"),
            }
        }
    }

    fn write_config(body: &str) -> tempfile::NamedTempFile {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), body).unwrap();
        tmp
    }

    #[test]
    fn defaults_when_missing_file() {
        let cfg = load_from(Some(PathBuf::from("__nonexistent_hopefully__.toml"))).unwrap();
        assert_eq!(cfg.chunk_size(), 100);
        assert_eq!(cfg.file.view.height, 0);
        assert_eq!(cfg.repeat_delay(), Duration::from_millis(500));
        assert_eq!(cfg.repeat_interval(), Duration::from_millis(50));
    }

    #[test]
    fn parses_all_sections() {
        let tmp = write_config(
            "[buffer]\nchunk_size = 16\n[view]\nheight = 12\n\
             [input.repeat]\ndelay_ms = 300\ninterval_ms = 20\n",
        );
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.chunk_size(), 16);
        assert_eq!(cfg.file.view.height, 12);
        assert_eq!(cfg.repeat_delay(), Duration::from_millis(300));
        assert_eq!(cfg.repeat_interval(), Duration::from_millis(20));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let tmp = write_config("[input.repeat]\ninterval_ms = 30\n[unknown]\nkey = 1\n");
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.file.input.repeat.delay_ms, 500);
        assert_eq!(cfg.file.input.repeat.interval_ms, 30);
        assert_eq!(cfg.chunk_size(), 100);
    }

    #[test]
    fn zero_chunk_size_is_clamped() {
        let tmp = write_config("[buffer]\nchunk_size = 0\n");
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.chunk_size(), 1);
    }

    #[test]
    fn height_derived_from_terminal() {
        let mut cfg = Config::default();
        assert_eq!(cfg.apply_context(25), 24);
        assert_eq!(cfg.apply_context(1), 1);
        assert_eq!(cfg.apply_context(0), 1);
    }

    #[test]
    fn explicit_height_capped_by_terminal() {
        let tmp = write_config("[view]\nheight = 40\n");
        let mut cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.apply_context(25), 24);
        assert_eq!(cfg.apply_context(0), 40);
        let tmp = write_config("[view]\nheight = 5\n");
        let mut cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.apply_context(25), 5);
    }

    #[test]
    fn recompute_after_resize_reports_changes() {
        let mut cfg = Config::default();
        cfg.apply_context(30);
        assert_eq!(cfg.recompute_after_resize(20), Some(19));
        assert_eq!(cfg.recompute_after_resize(20), None);
    }

    #[test]
    fn parse_error_falls_back_and_warns() {
        let tmp = write_config("[buffer\nchunk_size = = 3\n");
        let (writer, buffer) = BufferWriter::new();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::INFO)
            .with_target(true)
            .with_ansi(false)
            .without_time()
            .with_writer(writer)
            .finish();

        let cfg = with_default(subscriber, || load_from(Some(tmp.path().to_path_buf())).unwrap());

        let log_output = String::from_utf8(buffer.lock().unwrap().clone()).unwrap();
        assert!(log_output.contains("WARN config:"));
        assert!(log_output.contains("config_parse_failed_using_defaults"));
        assert_eq!(cfg.chunk_size(), 100);
        assert_eq!(cfg.file.view.height, 0);
    }
}
