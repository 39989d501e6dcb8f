#![allow(clippy::unwrap_used, clippy::expect_used, clippy::arithmetic_side_effects)]
//! Property-based test suite entry point.
//!
//! ```bash
//! cargo test -p meta_tx_relay --test property
//! PROPTEST_CASES=128 cargo test -p meta_tx_relay --test property
//! ```
