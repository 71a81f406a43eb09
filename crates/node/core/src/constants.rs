//! Constants used throughout netswitch.

// =============================================================================
// Node Root
// =============================================================================

/// Environment variable naming the node root directory.
pub const ROOT_ENV_VAR: &str = "CHIA_ROOT";

/// Default node root, relative to the user's home directory.
pub const DEFAULT_ROOT_DIR: &str = ".chia/mainnet";

/// Directory holding the node config file.
pub const CONFIG_DIR_NAME: &str = "config";

/// Node config file name.
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Directory holding databases and cache files.
pub const DB_DIR_NAME: &str = "db";

// =============================================================================
// Tool Configuration
// =============================================================================

/// Environment variable prefix for tool configuration.
pub const ENV_PREFIX: &str = "NETSWITCH_";
