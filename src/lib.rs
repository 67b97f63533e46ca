//! Blockfall (workspace facade crate).
//!
//! Re-exports the dedicated crates under `crates/` as
//! `blockfall::{types, core, engine, records}`.

pub use blockfall_core as core;
pub use blockfall_engine as engine;
pub use blockfall_records as records;
pub use blockfall_types as types;
