/// Centralized argument handling for aquasonda
///
/// The command line is parsed once with clap and stored globally so any
/// module can check its debug flag without threading the arguments through.
use clap::Parser;
use once_cell::sync::OnceCell;
use std::path::PathBuf;

use crate::logger::LogTag;

#[derive(Debug, Clone, Default, Parser)]
#[command(name = "aquasonda", version, about = "Water-quality monitoring backend")]
pub struct Arguments {
    /// Path to the TOML configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Bind address override
    #[arg(long)]
    pub host: Option<String>,

    /// Port override
    #[arg(long)]
    pub port: Option<u16>,

    /// Enable debug output for a module (repeatable, `all` for everything)
    #[arg(long, value_name = "MODULE")]
    pub debug: Vec<String>,

    /// Enable verbose output for every module
    #[arg(long)]
    pub verbose: bool,

    /// Only show warnings and errors
    #[arg(long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Parsed arguments, set once at startup
static CMD_ARGS: OnceCell<Arguments> = OnceCell::new();

/// Parse the process arguments and store them globally
pub fn init() -> &'static Arguments {
    CMD_ARGS.get_or_init(Arguments::parse)
}

/// Checks whether `--debug <module>` (or `--debug all`) was given
pub fn is_debug_enabled_for(module: &str) -> bool {
    CMD_ARGS
        .get()
        .map(|args| {
            args.debug
                .iter()
                .any(|m| m.eq_ignore_ascii_case(module) || m.eq_ignore_ascii_case("all"))
        })
        .unwrap_or(false)
}

/// Ingestion service debug mode
pub fn is_debug_ingest_enabled() -> bool {
    is_debug_enabled_for(&LogTag::Ingest.to_debug_key())
}

/// Broadcaster debug mode
pub fn is_debug_broadcast_enabled() -> bool {
    is_debug_enabled_for(&LogTag::Broadcast.to_debug_key())
}

/// WebSocket connection debug mode
pub fn is_debug_websocket_enabled() -> bool {
    is_debug_enabled_for(&LogTag::Websocket.to_debug_key())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_repeated_debug_flags() {
        let args = Arguments::parse_from([
            "aquasonda",
            "--debug",
            "ingest",
            "--debug",
            "websocket",
            "--port",
            "4000",
        ]);
        assert_eq!(args.debug, vec!["ingest", "websocket"]);
        assert_eq!(args.port, Some(4000));
        assert!(!args.verbose);
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        let result = Arguments::try_parse_from(["aquasonda", "--quiet", "--verbose"]);
        assert!(result.is_err());
    }
}
