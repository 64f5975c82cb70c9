// =============================================================================
// Social / Presence Backend Constants
// =============================================================================

// =============================================================================
// SERVER CONFIGURATION
// =============================================================================

/// Port used when PORT is unset or unparsable
pub const DEFAULT_SERVER_PORT: u16 = 3000;

/// Pool size used when DB_MAX_CONNECTIONS is unset or unparsable
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

// =============================================================================
// PROFILE VALIDATION
// =============================================================================

/// Longest nickname accepted, in characters
pub const MAX_NICKNAME_CHARS: usize = 64;

/// Longest profile picture url accepted, in bytes
pub const MAX_PROFILE_PICTURE_URL_LEN: usize = 2048;
