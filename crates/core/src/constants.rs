/// Constants used throughout the lifeguard workspace
// Environment variable names
pub const LIFEGUARD_MODE_VAR: &str = "LIFEGUARD_MODE";
pub const LIFEGUARD_TEST_NAME_LENGTH_VAR: &str = "LIFEGUARD_TEST_NAME_LENGTH";
pub const LIFEGUARD_STRICT_DROP_VAR: &str = "LIFEGUARD_STRICT_DROP";
pub const LIFEGUARD_CONFIG_VAR: &str = "LIFEGUARD_CONFIG";
pub const LIFEGUARD_LOG_VAR: &str = "LIFEGUARD_LOG";

// Generated test names
pub const DEFAULT_TEST_NAME_LENGTH: usize = 20;
pub const MAX_TEST_NAME_LENGTH: usize = 256;

// Default log filter when neither LIFEGUARD_LOG nor RUST_LOG is set
pub const DEFAULT_LOG_FILTER: &str = "warn";
