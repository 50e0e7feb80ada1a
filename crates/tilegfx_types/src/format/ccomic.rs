//! Captain Comic tilesets and sprite sets.
//!
//! Both are headerless runs of 16x16 planar EGA images. Tile files (.TT2)
//! start with four one-byte attributes describing tile behaviour, after
//! which 128-byte four-plane tiles run to EOF, so a valid file is always
//! 4 bytes longer than a multiple of 128. Sprite files have no header and
//! use 160-byte five-plane images, the fifth plane being a transparency
//! mask.

use crate::error::TilesetError;
use crate::format::{Certainty, FormatConfig, IndexLayout, PixelFormat, TileSize};
use crate::image::{PlaneLayout, PlaneRole};
use crate::palette::Palette;
use crate::store::Store;
use crate::tileset::FatTileset;

/// Format code of the tile variant.
pub const TILE_CODE: &str = "tls-ccomic";
/// Format code of the sprite variant.
pub const SPRITE_CODE: &str = "tls-ccomic-sprite";

const TILE_WIDTH: u32 = 16;
const TILE_HEIGHT: u32 = 16;
const PLANE_LEN: usize = (TILE_WIDTH as usize / 8) * TILE_HEIGHT as usize;

const SOLID_TILE_LEN: usize = PLANE_LEN * 4;
const MASKED_TILE_LEN: usize = PLANE_LEN * 5;
const HEADER_LEN: usize = 4;

const ATTRIBUTE_NAMES: &[&str] = &[
	"Last non-blocking tile",
	"Last tile, unknown 1",
	"Last tile, unknown 2",
	"Flags",
];

/// Plane order shared by both variants: blue first, then green, red,
/// intensity. Sprites append the transparency plane.
fn solid_layout() -> PlaneLayout {
	PlaneLayout::new()
		.with(PlaneRole::Blue, 1)
		.with(PlaneRole::Green, 2)
		.with(PlaneRole::Red, 3)
		.with(PlaneRole::Intensity, 4)
}

fn masked_layout() -> PlaneLayout {
	solid_layout().with(PlaneRole::Opacity, 5)
}

/// Configuration of the tile variant.
pub fn tiles_config() -> FormatConfig {
	FormatConfig {
		code: TILE_CODE,
		name: "Captain Comic tileset",
		layout: IndexLayout::FixedStride {
			header_len: HEADER_LEN,
			stride: SOLID_TILE_LEN,
		},
		tile_size: TileSize::Fixed(SOLID_TILE_LEN),
		dims: Some((TILE_WIDTH, TILE_HEIGHT)),
		pixels: PixelFormat::Planar(solid_layout()),
		len_header: 0,
		capacity: None,
		frozen_count: false,
		layout_width: 4,
		attribute_names: ATTRIBUTE_NAMES,
		external_palette: false,
	}
}

/// Configuration of the sprite variant.
pub fn sprites_config() -> FormatConfig {
	FormatConfig {
		code: SPRITE_CODE,
		name: "Captain Comic sprite set",
		layout: IndexLayout::FixedStride {
			header_len: 0,
			stride: MASKED_TILE_LEN,
		},
		tile_size: TileSize::Fixed(MASKED_TILE_LEN),
		dims: Some((TILE_WIDTH, TILE_HEIGHT)),
		pixels: PixelFormat::Planar(masked_layout()),
		len_header: 0,
		capacity: None,
		frozen_count: false,
		layout_width: 4,
		attribute_names: &[],
		external_palette: false,
	}
}

/// Checks whether `data` is a tile file.
pub fn is_instance_tiles(data: &[u8]) -> Certainty {
	if data.len() % SOLID_TILE_LEN == HEADER_LEN {
		Certainty::PossiblyYes
	} else {
		Certainty::DefinitelyNo
	}
}

/// Checks whether `data` is a sprite file.
pub fn is_instance_sprites(data: &[u8]) -> Certainty {
	if data.len() % MASKED_TILE_LEN == 0 {
		Certainty::PossiblyYes
	} else {
		Certainty::DefinitelyNo
	}
}

/// Opens a tile file.
pub fn open_tiles(store: Store, palette: Option<Palette>) -> Result<FatTileset, TilesetError> {
	let palette = palette.unwrap_or_else(Palette::default_ega);
	FatTileset::open(store, tiles_config(), Some(palette))
}

/// Opens a sprite file.
pub fn open_sprites(store: Store, palette: Option<Palette>) -> Result<FatTileset, TilesetError> {
	let palette = palette.unwrap_or_else(Palette::default_ega);
	FatTileset::open(store, sprites_config(), Some(palette))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_length_checks() {
		assert_eq!(is_instance_tiles(&[0u8; 4]), Certainty::PossiblyYes);
		assert_eq!(
			is_instance_tiles(&[0u8; 4 + 3 * SOLID_TILE_LEN]),
			Certainty::PossiblyYes
		);
		assert_eq!(is_instance_tiles(&[0u8; 128]), Certainty::DefinitelyNo);
		assert_eq!(
			is_instance_sprites(&[0u8; 2 * MASKED_TILE_LEN]),
			Certainty::PossiblyYes
		);
		assert_eq!(is_instance_sprites(&[0u8; 161]), Certainty::DefinitelyNo);
	}

	#[test]
	fn test_header_attributes_read_and_flush() {
		let mut data = vec![10, 20, 30, 0];
		data.extend_from_slice(&[0u8; 2 * SOLID_TILE_LEN]);
		let mut ts = open_tiles(Store::from_bytes(data), None).unwrap();
		assert_eq!(ts.len(), 2);
		assert_eq!(ts.attribute_count(), 4);
		assert_eq!(ts.attribute(0).unwrap(), 10);
		assert_eq!(ts.attribute_name(0), Some("Last non-blocking tile"));

		ts.set_attribute(0, 11).unwrap();
		// Deferred until flush.
		assert_eq!(ts.store().as_bytes()[0], 10);
		ts.flush().unwrap();
		assert_eq!(ts.store().as_bytes()[0], 11);
		// Second flush writes nothing further.
		ts.flush().unwrap();
		assert_eq!(ts.store().as_bytes()[0], 11);
	}

	#[test]
	fn test_tiles_start_after_header() {
		let mut data = vec![0u8; 4];
		data.extend_from_slice(&[0xAB; SOLID_TILE_LEN]);
		let ts = open_tiles(Store::from_bytes(data), None).unwrap();
		let h = ts.handle_at(0).unwrap();
		assert_eq!(ts.entry(h).unwrap().offset(), 4);
		assert_eq!(ts.open_raw(h).unwrap(), &[0xAB; SOLID_TILE_LEN]);
	}

	#[test]
	fn test_sprite_mask_plane_is_last() {
		let mut data = vec![0u8; MASKED_TILE_LEN];
		// Opacity plane occupies the final 32 bytes of the sprite.
		data[4 * PLANE_LEN] = 0b1000_0000;
		let ts = open_sprites(Store::from_bytes(data), None).unwrap();
		let tile = ts.open_image(ts.handle_at(0).unwrap()).unwrap();
		let mask = tile.mask().unwrap();
		assert_eq!(mask[0] & crate::image::MASK_TRANSPARENT, 0);
		assert_ne!(mask[1] & crate::image::MASK_TRANSPARENT, 0);
	}
}
