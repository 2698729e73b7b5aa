//! Extraction tests
//!
//! End-to-end runs of the extractor against an in-memory source:
//! - Track selection per fallback policy
//! - Rendition fallback and error mapping
//! - Normalized output invariants
