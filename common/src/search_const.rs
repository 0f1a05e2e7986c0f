//! Constants shared by request defaults and response shaping.

/// Row count used when a request does not carry a `limit`.
pub const DEFAULT_LIMIT: u32 = 10;

/// `latest_10_approved` always returns this many documents.
pub const LATEST_APPROVED_FIXED_ROWS: u32 = 10;

pub const DEFAULT_EXPORT_FILENAME: &str = "patent_results";
pub const EXPORT_SHEET_NAME: &str = "Patent Results";
