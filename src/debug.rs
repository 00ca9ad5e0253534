//! Logging bridge for profile-manager.
//!
//! Routes every `log::info!()`, `log::warn!()` etc. from both crates to
//! `profile_manager_debug.log` in the temp directory (`/tmp` on Unix/macOS,
//! `%TEMP%` on Windows). When `RUST_LOG` is set, lines are mirrored to stderr
//! as well, so stdout stays clean for command output.
//!
//! Level precedence: `--log-level` flag, then `RUST_LOG`, then the
//! `log_level` config field, then `warn`.

use log::{LevelFilter, Log, Metadata, Record};
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// File name of the debug log inside the temp directory.
pub const LOG_FILE_NAME: &str = "profile_manager_debug.log";

/// Level used when nothing else selects one.
pub const DEFAULT_LEVEL: LevelFilter = LevelFilter::Warn;

/// Full path of the debug log.
pub fn log_path() -> PathBuf {
    std::env::temp_dir().join(LOG_FILE_NAME)
}

struct LogBridge {
    file: Mutex<Option<File>>,
    mirror_stderr: bool,
}

impl LogBridge {
    fn new(mirror_stderr: bool) -> Self {
        // An unopenable log file only disables file output.
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path())
            .ok();
        Self {
            file: Mutex::new(file),
            mirror_stderr,
        }
    }
}

impl Log for LogBridge {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!(
            "[{}] [{:<5}] [{}] {}\n",
            get_timestamp(),
            record.level(),
            record.target(),
            record.args()
        );
        if let Some(file) = self.file.lock().as_mut() {
            let _ = file.write_all(line.as_bytes());
        }
        if self.mirror_stderr {
            eprint!("{line}");
        }
    }

    fn flush(&self) {
        if let Some(file) = self.file.lock().as_mut() {
            let _ = file.flush();
        }
    }
}

static BRIDGE: OnceLock<LogBridge> = OnceLock::new();

/// Set when the level came from the CLI or `RUST_LOG`; the config level is
/// then ignored.
static LEVEL_PINNED: AtomicBool = AtomicBool::new(false);

fn get_timestamp() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}.{:06}", now.as_secs(), now.subsec_micros())
}

/// Level requested through `RUST_LOG`, if it names a plain level.
fn env_level() -> Option<LevelFilter> {
    std::env::var("RUST_LOG")
        .ok()
        .and_then(|value| value.trim().parse::<LevelFilter>().ok())
}

/// Pick the starting level from the CLI flag and `RUST_LOG`.
///
/// Returns the level and whether it is pinned against config overrides.
pub fn initial_level(
    cli_level: Option<LevelFilter>,
    env_level: Option<LevelFilter>,
) -> (LevelFilter, bool) {
    match cli_level.or(env_level) {
        Some(level) => (level, true),
        None => (DEFAULT_LEVEL, false),
    }
}

/// Install the bridge as the global logger.
///
/// Safe to call more than once; later calls only adjust the level.
pub fn init_log_bridge(cli_level: Option<LevelFilter>) {
    let mirror_stderr = std::env::var_os("RUST_LOG").is_some();
    let (level, pinned) = initial_level(cli_level, env_level());

    let bridge = BRIDGE.get_or_init(|| LogBridge::new(mirror_stderr));
    if log::set_logger(bridge).is_ok() {
        bridge.log(
            &Record::builder()
                .level(log::Level::Info)
                .target("profile_manager::debug")
                .args(format_args!(
                    "profile-manager {} session started (level={})",
                    crate::VERSION,
                    level
                ))
                .build(),
        );
    }
    LEVEL_PINNED.store(pinned, Ordering::Relaxed);
    log::set_max_level(level);
}

/// Apply the level from the application config unless the CLI or
/// `RUST_LOG` already chose one.
pub fn apply_config_level(level: LevelFilter) {
    if LEVEL_PINNED.load(Ordering::Relaxed) {
        return;
    }
    log::set_max_level(level);
    log::debug!("Log level set from config: {}", level);
}
