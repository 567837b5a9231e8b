//! Runtime configuration for the journal client.
//!
//! Every option can come from a flag or an environment variable; flags win.

use clap::Args;
use journal_core::{default_log_level, LoggingConfig, RequestContext};
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_DB_FILE_NAME: &str = "micro_journal.sqlite3";

#[derive(Debug, Clone, Args)]
pub struct GlobalOptions {
    /// SQLite database file (created and migrated on first use)
    #[arg(long = "db", env = "JOURNAL_DB_PATH", global = true, value_name = "PATH")]
    pub db_path: Option<PathBuf>,

    /// Log level: trace|debug|info|warn|error
    #[arg(long, env = "JOURNAL_LOG_LEVEL", global = true, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Absolute directory for rotating log files (stderr when unset)
    #[arg(long, env = "JOURNAL_LOG_DIR", global = true, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Give up on the request after this many milliseconds
    #[arg(long, global = true, value_name = "MS")]
    pub timeout_ms: Option<u64>,
}

impl GlobalOptions {
    pub fn resolved_db_path(&self) -> PathBuf {
        match &self.db_path {
            Some(path) if !path.as_os_str().is_empty() => path.clone(),
            _ => std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
        }
    }

    pub fn logging_config(&self) -> LoggingConfig {
        let level = self
            .log_level
            .clone()
            .unwrap_or_else(|| default_log_level().to_string());
        LoggingConfig {
            level,
            log_dir: self.log_dir.clone(),
        }
    }

    /// Fresh request context honoring `--timeout-ms`.
    pub fn request_context(&self) -> RequestContext {
        match self.timeout_ms {
            Some(ms) => RequestContext::with_timeout(Duration::from_millis(ms)),
            None => RequestContext::background(),
        }
    }
}
