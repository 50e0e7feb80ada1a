//! `tilegfx-rs` reads and writes the tile-based graphics files of several
//! early-1990s DOS games, and ships a `tilegfx` CLI for inspecting and
//! exporting them.
//!
//! All functionality lives in [`tilegfx_types`]; this crate re-exports it,
//! including the [`tilegfx_types::prelude`] module.

pub use tilegfx_types::*;
