//! Monster Bash tilesets.
//!
//! No index at all: the file is nothing but 16x16 planar EGA tiles packed
//! back to back. Background sets hold exactly 511 four-plane tiles of 128
//! bytes; foreground sets hold exactly 128 five-plane tiles of 160 bytes,
//! the extra plane being a transparency mask stored first. Some shipped
//! files carry a single stray trailing byte, which is tolerated and
//! ignored.

use crate::error::TilesetError;
use crate::format::{Certainty, FormatConfig, IndexLayout, PixelFormat, TileSize};
use crate::image::{PlaneLayout, PlaneRole};
use crate::palette::Palette;
use crate::store::Store;
use crate::tileset::FatTileset;

/// Format code of the background variant.
pub const BG_CODE: &str = "tls-bash-bg";
/// Format code of the foreground variant.
pub const FG_CODE: &str = "tls-bash-fg";

const TILE_WIDTH: u32 = 16;
const TILE_HEIGHT: u32 = 16;
const PLANE_LEN: usize = (TILE_WIDTH as usize / 8) * TILE_HEIGHT as usize;

const BG_TILE_LEN: usize = PLANE_LEN * 4;
const FG_TILE_LEN: usize = PLANE_LEN * 5;
const BG_NUM_TILES: u32 = 511;
const FG_NUM_TILES: u32 = 128;

/// Plane order for background tiles: intensity first, then red, green,
/// blue.
fn bg_layout() -> PlaneLayout {
	PlaneLayout::new()
		.with(PlaneRole::Intensity, 1)
		.with(PlaneRole::Red, 2)
		.with(PlaneRole::Green, 3)
		.with(PlaneRole::Blue, 4)
}

/// Foreground tiles put a transparency plane ahead of the colour planes.
fn fg_layout() -> PlaneLayout {
	PlaneLayout::new()
		.with(PlaneRole::Opacity, 1)
		.with(PlaneRole::Intensity, 2)
		.with(PlaneRole::Red, 3)
		.with(PlaneRole::Green, 4)
		.with(PlaneRole::Blue, 5)
}

fn config(
	code: &'static str,
	name: &'static str,
	tile_len: usize,
	num_tiles: u32,
	layout: PlaneLayout,
) -> FormatConfig {
	FormatConfig {
		code,
		name,
		layout: IndexLayout::FixedStride {
			header_len: 0,
			stride: tile_len,
		},
		tile_size: TileSize::Fixed(tile_len),
		dims: Some((TILE_WIDTH, TILE_HEIGHT)),
		pixels: PixelFormat::Planar(layout),
		len_header: 0,
		capacity: Some(num_tiles),
		frozen_count: false,
		layout_width: 20,
		attribute_names: &[],
		external_palette: false,
	}
}

/// Configuration of the background variant.
pub fn bg_config() -> FormatConfig {
	config(
		BG_CODE,
		"Monster Bash background tileset",
		BG_TILE_LEN,
		BG_NUM_TILES,
		bg_layout(),
	)
}

/// Configuration of the foreground variant.
pub fn fg_config() -> FormatConfig {
	config(
		FG_CODE,
		"Monster Bash foreground tileset",
		FG_TILE_LEN,
		FG_NUM_TILES,
		fg_layout(),
	)
}

fn is_instance(data: &[u8], tile_len: usize, num_tiles: u32) -> Certainty {
	let expected = num_tiles as usize * tile_len;
	// Some shipped files have one stray byte at the end.
	if data.len() == expected || data.len() == expected + 1 {
		Certainty::PossiblyYes
	} else {
		Certainty::DefinitelyNo
	}
}

/// Checks whether `data` is a background tileset.
pub fn is_instance_bg(data: &[u8]) -> Certainty {
	is_instance(data, BG_TILE_LEN, BG_NUM_TILES)
}

/// Checks whether `data` is a foreground tileset.
pub fn is_instance_fg(data: &[u8]) -> Certainty {
	is_instance(data, FG_TILE_LEN, FG_NUM_TILES)
}

/// Opens a background tileset.
pub fn open_bg(store: Store, palette: Option<Palette>) -> Result<FatTileset, TilesetError> {
	let palette = palette.unwrap_or_else(Palette::default_ega);
	FatTileset::open(store, bg_config(), Some(palette))
}

/// Opens a foreground tileset.
pub fn open_fg(store: Store, palette: Option<Palette>) -> Result<FatTileset, TilesetError> {
	let palette = palette.unwrap_or_else(Palette::default_ega);
	FatTileset::open(store, fg_config(), Some(palette))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::image::Tile;

	#[test]
	fn test_exact_and_stray_byte_sizes() {
		let exact = vec![0u8; BG_NUM_TILES as usize * BG_TILE_LEN];
		assert_eq!(is_instance_bg(&exact), Certainty::PossiblyYes);
		let mut stray = exact.clone();
		stray.push(0xFF);
		assert_eq!(is_instance_bg(&stray), Certainty::PossiblyYes);
		stray.push(0xFF);
		assert_eq!(is_instance_bg(&stray), Certainty::DefinitelyNo);
		assert_eq!(is_instance_fg(&exact), Certainty::DefinitelyNo);
	}

	#[test]
	fn test_stray_byte_not_counted_as_tile() {
		let mut data = vec![0u8; BG_NUM_TILES as usize * BG_TILE_LEN];
		data.push(0xFF);
		let ts = open_bg(Store::from_bytes(data), None).unwrap();
		assert_eq!(ts.len(), BG_NUM_TILES as usize);
	}

	#[test]
	fn test_fg_mask_decoding() {
		let mut data = vec![0u8; FG_NUM_TILES as usize * FG_TILE_LEN];
		// Tile 0, opacity plane, first row: leftmost pixel opaque.
		data[0] = 0b1000_0000;
		// Blue plane, same pixel set.
		data[4 * PLANE_LEN] = 0b1000_0000;
		let ts = open_fg(Store::from_bytes(data), None).unwrap();
		let tile = ts.open_image(ts.handle_at(0).unwrap()).unwrap();
		assert_eq!(tile.get_pixel(0, 0), 1);
		let mask = tile.mask().unwrap();
		assert_eq!(mask[0] & crate::image::MASK_TRANSPARENT, 0);
		assert_ne!(mask[1] & crate::image::MASK_TRANSPARENT, 0);
	}

	#[test]
	fn test_write_image_roundtrip() {
		let data = vec![0u8; BG_NUM_TILES as usize * BG_TILE_LEN];
		let mut ts = open_bg(Store::from_bytes(data), None).unwrap();
		let h = ts.handle_at(5).unwrap();
		let mut tile = Tile::blank(TILE_WIDTH, TILE_HEIGHT, false);
		tile.put_pixel(2, 3, 12);
		ts.write_image(h, &tile).unwrap();
		let back = ts.open_image(h).unwrap();
		assert_eq!(back.get_pixel(2, 3), 12);
		// Neighbouring tiles untouched.
		let other = ts.open_image(ts.handle_at(6).unwrap()).unwrap();
		assert!(other.pixels().iter().all(|&p| p == 0));
	}
}
