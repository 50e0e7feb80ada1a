//! Prelude module for `tilegfx_types`.
//!
//! This module provides a convenient way to import commonly used types, traits, and constants.
//!
//! # Examples
//!
//! ```no_run
//! use tilegfx_types::prelude::*;
//!
//! let layout = PlaneLayout::ega_solid();
//! let codec = PlanarCodec::new(16, 16, layout);
//! ```

#[doc(inline)]
pub use crate::error::TilesetError;

#[doc(inline)]
pub use crate::store::Store;

// Image types
#[doc(inline)]
pub use crate::image::{
	CgaCodec,
	LinearCodec,
	PlanarCodec,
	PlaneLayout,
	PlaneRole,
	Tile,

	// Mask bit constants
	MASK_HIT,
	MASK_TRANSPARENT,
};

// Palette types
#[doc(inline)]
pub use crate::palette::{CgaVariant, Color, Palette};

// Container types
#[doc(inline)]
pub use crate::tileset::{FatTileset, TileEntry, TileHandle};

// Format detection
#[doc(inline)]
pub use crate::format::{Certainty, FormatConfig, FormatDescriptor};

// Re-export the format module for direct driver access
#[doc(inline)]
pub use crate::format;
