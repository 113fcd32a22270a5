//! Cross-layer integration flows.

pub mod flows;
