//! Validation utilities
//!
//! Re-reads a written library file and checks its internal references

mod roundtrip;

pub use roundtrip::{parse_plist, validate_document, validate_export, ValidationReport};
