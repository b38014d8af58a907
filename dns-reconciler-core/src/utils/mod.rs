//! Utility modules.

/// Label / FQDN conversion helpers.
pub mod name;

/// TXT quoted-field encoding helpers.
pub mod txt;
