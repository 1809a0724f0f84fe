/// Logger configuration
///
/// Holds the level threshold and the per-tag debug/verbose sets. Built from
/// the parsed command line at startup; defaults apply until then.
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::HashSet;
use std::path::PathBuf;

use super::levels::LogLevel;
use super::tags::LogTag;
use crate::arguments::Arguments;

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Messages above this level are dropped (Debug/Verbose have extra gates)
    pub min_level: LogLevel,

    /// Tags with debug output enabled (debug keys)
    pub debug_tags: HashSet<String>,

    /// Tags with verbose output enabled (debug keys)
    pub verbose_tags: HashSet<String>,

    /// When non-empty, only these tags are shown
    pub enabled_tags: HashSet<String>,

    /// Directory for the daily log file, None disables file output
    pub log_dir: Option<PathBuf>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Info,
            debug_tags: HashSet::new(),
            verbose_tags: HashSet::new(),
            enabled_tags: HashSet::new(),
            log_dir: None,
        }
    }
}

static LOGGER_CONFIG: Lazy<RwLock<LoggerConfig>> =
    Lazy::new(|| RwLock::new(LoggerConfig::default()));

/// Snapshot of the current logger configuration
pub fn get_logger_config() -> LoggerConfig {
    LOGGER_CONFIG.read().clone()
}

/// Replace the logger configuration
pub fn set_logger_config(config: LoggerConfig) {
    *LOGGER_CONFIG.write() = config;
}

/// Mutate the logger configuration in place
pub fn update_logger_config<F: FnOnce(&mut LoggerConfig)>(f: F) {
    f(&mut LOGGER_CONFIG.write());
}

/// Build the logger configuration from parsed command-line arguments
pub fn init_from_args(args: &Arguments, log_dir: Option<PathBuf>) {
    let mut config = LoggerConfig {
        log_dir,
        ..LoggerConfig::default()
    };

    if args.quiet {
        config.min_level = LogLevel::Warning;
    }
    if args.verbose {
        config.min_level = LogLevel::Verbose;
    }

    for module in &args.debug {
        let key = module.trim().to_lowercase();
        if key == "all" {
            config
                .debug_tags
                .extend(LogTag::known_debug_keys().iter().map(|k| k.to_string()));
        } else if !key.is_empty() {
            config.debug_tags.insert(key);
        }
    }

    set_logger_config(config);
}

pub fn is_debug_enabled_for_tag(tag: &LogTag) -> bool {
    LOGGER_CONFIG.read().debug_tags.contains(&tag.to_debug_key())
}

pub fn is_verbose_enabled_for_tag(tag: &LogTag) -> bool {
    LOGGER_CONFIG.read().verbose_tags.contains(&tag.to_debug_key())
}
