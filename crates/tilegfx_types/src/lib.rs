//! This crate provides core data types and file format support for the `tilegfx-rs` project.
//!
//! Each supported file is a *tileset*: a run of small fixed-palette images
//! packed into one file, located either by an offset table at the start of
//! the file or purely by arithmetic on the file size.
//!
//! # File Formats
//!
//! - **Dangerous Dave**: offset-table tilesets in CGA, EGA and VGA flavours
//! - **Zone 66**: offset-table tileset with compressed tile data (container access only)
//! - **Monster Bash**: headerless fixed-stride EGA tilesets, background and foreground
//! - **Captain Comic**: fixed-stride EGA tile and sprite sets with header attributes
//! - **Halloween Harry**: fixed-count VGA tilesets (CHR) and size-prefixed icon sets (ICO)
//!
//! # Examples
//!
//! Using the prelude (recommended):
//!
//! ```no_run
//! use tilegfx_types::prelude::*;
//!
//! # fn main() -> Result<(), TilesetError> {
//! let store = Store::open("EGADAVE.DAV")?;
//! let tileset = tilegfx_types::format::ddave::open_ega(store, None)?;
//! for handle in tileset.handles() {
//!     let tile = tileset.open_image(handle)?;
//!     println!("{}x{}", tile.width(), tile.height());
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod format;
pub mod image;
pub mod palette;
pub mod store;
pub mod tileset;

/// `use tilegfx_types::prelude::*;` to import commonly used items.
pub mod prelude;
