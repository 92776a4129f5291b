//! Domain modules organized as vertical slices.
//!
//! Each sub-module contains:
//! - `mod.rs` — Rich domain types (validated, conversion-ready)
//! - `wire.rs` — Raw serde structs matching API responses
//! - `convert.rs` — `TryFrom`/`From` conversions with validation
//! - `state.rs` — State containers with update methods
//! - `fallback.rs` — Fixed data shown when a fetch fails
//! - `client.rs` — Sub-client with HTTP methods

pub mod history;
pub mod quote;
