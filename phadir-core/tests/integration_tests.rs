//! Integration tests for the `phadir` core library
//!
//! These tests drive the whole import pipeline through `ImportController`
//! against an in-memory store.

// Allow common test patterns that Clippy warns about
#![allow(clippy::redundant_clone)]
#![allow(clippy::too_many_lines)]

mod integration;
