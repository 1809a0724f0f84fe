/// Configuration schemas - every config structure defined once with defaults
///
/// Each struct uses `config_struct!`, so a TOML file only needs the keys it
/// wants to change.
use crate::config_struct;

// ============================================================================
// WEBSERVER CONFIGURATION
// ============================================================================

config_struct! {
    /// HTTP / WebSocket listener configuration
    pub struct WebserverConfig {
        host: String = "0.0.0.0".to_string(),
        port: u16 = 3300,

        /// Allow any origin (otherwise only `cors_origins`)
        cors_allow_any: bool = true,
        cors_origins: Vec<String> = Vec::new(),
    }
}

// ============================================================================
// DATABASE CONFIGURATION
// ============================================================================

config_struct! {
    /// SQLite reading store configuration
    pub struct DatabaseConfig {
        path: String = "data/aquasonda.db".to_string(),
        write_pool_size: u32 = 2,
        read_pool_size: u32 = 8,
        busy_timeout_ms: u64 = 5_000,
    }
}

// ============================================================================
// WEBSOCKET CONFIGURATION
// ============================================================================

config_struct! {
    /// Real-time channel configuration
    pub struct WebsocketConfig {
        /// Per-subscription queue capacity; overflow drops messages
        buffer_size: usize = 256,

        /// Send a ping after this much client silence
        heartbeat_secs: u64 = 30,

        /// Close the connection after this much client silence
        client_idle_timeout_secs: u64 = 90,
    }
}

// ============================================================================
// READINGS / PAGINATION
// ============================================================================

config_struct! {
    /// Reading history query limits
    pub struct ReadingsConfig {
        list_default_limit: i64 = 500,
        list_max_limit: i64 = 5_000,
    }
}

config_struct! {
    /// CRUD list pagination limits
    pub struct PaginationConfig {
        default_limit: i64 = 50,
        max_limit: i64 = 200,
        max_offset: i64 = 1_000_000,
    }
}

// ============================================================================
// ROOT
// ============================================================================

config_struct! {
    /// Root configuration
    pub struct Config {
        webserver: WebserverConfig = WebserverConfig::default(),
        database: DatabaseConfig = DatabaseConfig::default(),
        websocket: WebsocketConfig = WebsocketConfig::default(),
        readings: ReadingsConfig = ReadingsConfig::default(),
        pagination: PaginationConfig = PaginationConfig::default(),
    }
}
