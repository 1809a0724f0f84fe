/// Log tags identify the subsystem a message comes from.
///
/// Each tag has a debug key (`--debug <key>`) and a fixed display label.

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LogTag {
    System,
    Config,
    Database,
    Ingest,
    Broadcast,
    Websocket,
    Webserver,
    Api,
    Test,
    Other(String),
}

impl LogTag {
    /// Key matched against `--debug <module>` values
    pub fn to_debug_key(&self) -> String {
        match self {
            LogTag::System => "system".to_string(),
            LogTag::Config => "config".to_string(),
            LogTag::Database => "database".to_string(),
            LogTag::Ingest => "ingest".to_string(),
            LogTag::Broadcast => "broadcast".to_string(),
            LogTag::Websocket => "websocket".to_string(),
            LogTag::Webserver => "webserver".to_string(),
            LogTag::Api => "api".to_string(),
            LogTag::Test => "test".to_string(),
            LogTag::Other(s) => s.to_lowercase(),
        }
    }

    /// Uncolored label written to log files
    pub fn to_plain_string(&self) -> String {
        match self {
            LogTag::System => "SYSTEM".to_string(),
            LogTag::Config => "CONFIG".to_string(),
            LogTag::Database => "DATABASE".to_string(),
            LogTag::Ingest => "INGEST".to_string(),
            LogTag::Broadcast => "BROADCAST".to_string(),
            LogTag::Websocket => "WS".to_string(),
            LogTag::Webserver => "WEBSERVER".to_string(),
            LogTag::Api => "API".to_string(),
            LogTag::Test => "TEST".to_string(),
            LogTag::Other(s) => s.to_uppercase(),
        }
    }

    /// All debug keys accepted on the command line
    pub fn known_debug_keys() -> &'static [&'static str] {
        &[
            "system",
            "config",
            "database",
            "ingest",
            "broadcast",
            "websocket",
            "webserver",
            "api",
        ]
    }
}

impl std::fmt::Display for LogTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_plain_string())
    }
}
