//! Zone 66 tilesets.
//!
//! Same count-plus-table container as Dangerous Dave, but offsets are
//! counted from the end of the table, so the first stored offset is
//! always zero. Tile data is compressed with a custom RLE scheme this
//! library does not decode; only container-level operations are offered.
//! The game ships the palette in a separate `tpal.z66` file.

use crate::error::TilesetError;
use crate::format::{
	check_offset_table, Certainty, FormatConfig, IndexLayout, OffsetBase, PixelFormat, TileSize,
};
use crate::palette::Palette;
use crate::store::Store;
use crate::tileset::FatTileset;

/// Format code.
pub const CODE: &str = "tls-zone66";

/// Configuration of the format.
pub fn config() -> FormatConfig {
	FormatConfig {
		code: CODE,
		name: "Zone 66 tileset",
		layout: IndexLayout::Table {
			base: OffsetBase::FromEndOfTable,
		},
		tile_size: TileSize::Variable,
		dims: None,
		pixels: PixelFormat::Opaque,
		len_header: 0,
		capacity: None,
		frozen_count: false,
		layout_width: 8,
		attribute_names: &[],
		external_palette: true,
	}
}

/// Checks whether `data` is a Zone 66 tileset.
pub fn is_instance(data: &[u8]) -> Certainty {
	match check_offset_table(data, OffsetBase::FromEndOfTable) {
		Certainty::DefinitelyNo => Certainty::DefinitelyNo,
		// The mandatory zero first offset is enough of a signature.
		_ => Certainty::DefinitelyYes,
	}
}

/// Opens a Zone 66 tileset. The palette normally comes from the
/// accompanying `tpal.z66` file.
pub fn open(store: Store, palette: Option<Palette>) -> Result<FatTileset, TilesetError> {
	let palette = palette.unwrap_or_else(Palette::default_vga);
	FatTileset::open(store, config(), Some(palette))
}
