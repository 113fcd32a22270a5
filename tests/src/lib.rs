//! # Forwarder Factory Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── integration/      # End-to-end provisioning and settlement flows
//! │   └── flows.rs
//! │
//! └── properties.rs     # Randomized sampling of domain guarantees
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p forwarder-tests
//!
//! # By category
//! cargo test -p forwarder-tests integration::
//! cargo test -p forwarder-tests properties::
//! ```

#![allow(unused_imports)]
#![allow(dead_code)]

pub mod integration;
pub mod properties;
