//! Shared constants for confdrift.

/// Crate version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Rule environment scope that applies to every environment.
pub const ALL_ENVIRONMENTS: &str = "*";

/// Environments in which `allowed_in_prod = false` rules are enforced.
pub const DEFAULT_RESTRICTED_ENVIRONMENTS: [&str; 1] = ["prod"];

/// Default SQLite database location for the server.
pub const DEFAULT_DATABASE_PATH: &str = "./data/confdrift.db";

/// Default server the agent reports to.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8080";

/// Environment name reported by an agent that was not told otherwise.
pub const DEFAULT_AGENT_ENVIRONMENT: &str = "default";

/// Snapshot ingestion endpoint, relative to the server URL.
pub const SNAPSHOT_ENDPOINT: &str = "/api/v1/config-snapshots";

// ---- Agent scheduling ----

/// Interval between two snapshot collections.
pub const DEFAULT_COLLECTION_INTERVAL_MS: u64 = 60_000;

/// Delay before the first collection after agent start.
pub const DEFAULT_INITIAL_DELAY_MS: u64 = 10_000;

// ---- Snapshot delivery ----

/// Extra attempts after the first failed delivery.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// First retry delay; doubles on each further retry.
pub const DEFAULT_INITIAL_BACKOFF_MS: u64 = 1_000;

/// Upper bound for a single retry delay.
pub const DEFAULT_MAX_BACKOFF_MS: u64 = 30_000;

/// Per-attempt HTTP timeout.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

// ---- Secrets ----

/// Prefix marking a value that was replaced by its digest.
pub const SECRET_HASH_PREFIX: &str = "HASH:";

/// Number of hex characters of the SHA-256 digest that are kept.
pub const SECRET_HASH_LENGTH: usize = 16;

/// Key patterns (case-insensitive regexes) that mark a value as secret.
pub const DEFAULT_SECRET_PATTERNS: [&str; 7] = [
    ".*password.*",
    ".*secret.*",
    ".*key.*",
    ".*token.*",
    ".*credential.*",
    ".*api[_-]?key.*",
    ".*auth[_-]?token.*",
];

/// Environment variable prefixes the collector skips by default.
pub const DEFAULT_IGNORED_ENV_PREFIXES: [&str; 2] = ["CARGO_", "RUSTUP_"];
