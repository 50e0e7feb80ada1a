//! Tileset containers and tile handles.

pub mod entry;
pub mod fat;

pub use entry::{TileEntry, TileHandle, TileIndex};
pub use fat::FatTileset;
