//! Shared constants for end-to-end tests
//!
//! When the mock dataset changes, update only this file.

// ============================================================================
// Songs known to the built-in mock enrichment dataset
// ============================================================================

pub const MUSE: &str = "Muse";
pub const RADIOHEAD: &str = "Radiohead";

pub const STARLIGHT: &str = "Starlight";
pub const STARLIGHT_RELEASE_DATE: &str = "2006-07-16";
pub const STARLIGHT_TEXT: &str = "Far away, this ship is taking me far away...";
pub const STARLIGHT_LINK: &str = "https://youtube.com";

pub const SUPERMASSIVE_BLACK_HOLE: &str = "Supermassive Black Hole";

pub const CREEP: &str = "Creep";
pub const CREEP_RELEASE_DATE: &str = "1992-09-21";

/// A song the mock enrichment service does not know
pub const UNKNOWN: &str = "Unknown";

// ============================================================================
// Timeouts
// ============================================================================

/// Maximum time to wait for the server to become ready
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Interval between readiness polls
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 50;

/// Timeout for individual HTTP requests made by the test client
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Enrichment timeout configured on the test server
pub const ENRICHMENT_TIMEOUT_SECS: u64 = 5;
