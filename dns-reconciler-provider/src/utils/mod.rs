//! Utility modules.

/// Log sanitization for page bodies and session cookies.
pub mod log_sanitizer;
