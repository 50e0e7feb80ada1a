//! Halloween Harry tilesets (.CHR) and icon sets (.ICO).
//!
//! CHR files are exactly 255 uncompressed 16x16 VGA tiles of 256 bytes
//! each with no index; the tile count is part of the format and cannot
//! change. ICO files have no index either but each image starts with its
//! own `u16le` width and height, so the set is recovered by walking the
//! headers. Both take their palette from the game's separate palette
//! file.

use crate::error::TilesetError;
use crate::format::{Certainty, FormatConfig, IndexLayout, PixelFormat, TileSize};
use crate::palette::Palette;
use crate::store::Store;
use crate::tileset::FatTileset;

/// Format code of the CHR variant.
pub const CHR_CODE: &str = "tls-harry-chr";
/// Format code of the ICO variant.
pub const ICO_CODE: &str = "tls-harry-ico";

const CHR_TILE_WIDTH: u32 = 16;
const CHR_TILE_HEIGHT: u32 = 16;
const CHR_TILE_LEN: usize = (CHR_TILE_WIDTH * CHR_TILE_HEIGHT) as usize;
const CHR_NUM_TILES: u32 = 255;

/// Configuration of the CHR variant.
pub fn chr_config() -> FormatConfig {
	FormatConfig {
		code: CHR_CODE,
		name: "Halloween Harry CHR tileset",
		layout: IndexLayout::FixedStride {
			header_len: 0,
			stride: CHR_TILE_LEN,
		},
		tile_size: TileSize::Fixed(CHR_TILE_LEN),
		dims: Some((CHR_TILE_WIDTH, CHR_TILE_HEIGHT)),
		pixels: PixelFormat::Linear,
		len_header: 0,
		capacity: Some(CHR_NUM_TILES),
		frozen_count: true,
		layout_width: 16,
		attribute_names: &[],
		external_palette: true,
	}
}

/// Configuration of the ICO variant.
pub fn ico_config() -> FormatConfig {
	FormatConfig {
		code: ICO_CODE,
		name: "Halloween Harry ICO tileset",
		layout: IndexLayout::DimsHeaderWalk,
		tile_size: TileSize::Variable,
		dims: None,
		pixels: PixelFormat::Linear,
		len_header: 4,
		capacity: None,
		frozen_count: false,
		layout_width: 8,
		attribute_names: &[],
		external_palette: true,
	}
}

/// Checks whether `data` is a CHR tileset: nothing but the exact size
/// distinguishes one.
pub fn is_instance_chr(data: &[u8]) -> Certainty {
	if data.len() == CHR_NUM_TILES as usize * CHR_TILE_LEN {
		Certainty::PossiblyYes
	} else {
		Certainty::DefinitelyNo
	}
}

/// Checks whether `data` is an ICO tileset by walking the size headers,
/// which must land exactly on EOF.
pub fn is_instance_ico(data: &[u8]) -> Certainty {
	if data.is_empty() {
		return Certainty::DefinitelyNo;
	}
	let mut pos = 0usize;
	let mut count = 0u32;
	while pos < data.len() {
		count += 1;
		if count > crate::format::MAX_SANE_TILES {
			return Certainty::DefinitelyNo;
		}
		if pos + 4 > data.len() {
			return Certainty::DefinitelyNo;
		}
		let width = u16::from_le_bytes([data[pos], data[pos + 1]]) as usize;
		let height = u16::from_le_bytes([data[pos + 2], data[pos + 3]]) as usize;
		pos += 4 + width * height;
	}
	if pos == data.len() {
		Certainty::PossiblyYes
	} else {
		Certainty::DefinitelyNo
	}
}

/// Opens a CHR tileset. The palette normally comes from the game's
/// palette file.
pub fn open_chr(store: Store, palette: Option<Palette>) -> Result<FatTileset, TilesetError> {
	let palette = palette.unwrap_or_else(Palette::default_vga);
	FatTileset::open(store, chr_config(), Some(palette))
}

/// Opens an ICO tileset.
pub fn open_ico(store: Store, palette: Option<Palette>) -> Result<FatTileset, TilesetError> {
	let palette = palette.unwrap_or_else(Palette::default_vga);
	FatTileset::open(store, ico_config(), Some(palette))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::image::Tile;

	fn ico_two_tiles() -> Vec<u8> {
		let mut data = Vec::new();
		data.extend_from_slice(&4u16.to_le_bytes());
		data.extend_from_slice(&2u16.to_le_bytes());
		data.extend_from_slice(&[1u8; 8]);
		data.extend_from_slice(&2u16.to_le_bytes());
		data.extend_from_slice(&2u16.to_le_bytes());
		data.extend_from_slice(&[2u8; 4]);
		data
	}

	#[test]
	fn test_chr_size_check() {
		assert_eq!(
			is_instance_chr(&vec![0u8; CHR_NUM_TILES as usize * CHR_TILE_LEN]),
			Certainty::PossiblyYes
		);
		assert_eq!(is_instance_chr(&[0u8; 256]), Certainty::DefinitelyNo);
	}

	#[test]
	fn test_chr_count_is_frozen() {
		let data = vec![0u8; CHR_NUM_TILES as usize * CHR_TILE_LEN];
		let mut ts = open_chr(Store::from_bytes(data), None).unwrap();
		assert_eq!(ts.len(), CHR_NUM_TILES as usize);
		let h = ts.handle_at(0).unwrap();
		assert!(matches!(
			ts.insert(None, None),
			Err(TilesetError::FixedSizeViolation)
		));
		assert!(matches!(ts.remove(h), Err(TilesetError::FixedSizeViolation)));
	}

	#[test]
	fn test_ico_header_walk() {
		assert_eq!(is_instance_ico(&ico_two_tiles()), Certainty::PossiblyYes);
		// Truncated last tile.
		let mut bad = ico_two_tiles();
		bad.pop();
		assert_eq!(is_instance_ico(&bad), Certainty::DefinitelyNo);
		assert_eq!(is_instance_ico(&[]), Certainty::DefinitelyNo);
	}

	#[test]
	fn test_ico_per_tile_dimensions() {
		let ts = open_ico(Store::from_bytes(ico_two_tiles()), None).unwrap();
		assert_eq!(ts.len(), 2);
		let a = ts.open_image(ts.handle_at(0).unwrap()).unwrap();
		assert_eq!((a.width(), a.height()), (4, 2));
		let b = ts.open_image(ts.handle_at(1).unwrap()).unwrap();
		assert_eq!((b.width(), b.height()), (2, 2));
		assert!(b.pixels().iter().all(|&p| p == 2));
	}

	#[test]
	fn test_ico_insert_survives_reopen() {
		let mut ts = open_ico(Store::from_bytes(ico_two_tiles()), None).unwrap();
		let h = ts.insert(None, Some(8)).unwrap();
		ts.write_raw(h, &[5u8; 8]).unwrap();
		assert_eq!(ts.len(), 3);

		// The new tile's size header must agree with its data, so the file
		// image walks back to the same index it was created with.
		let reopened = open_ico(ts.into_store(), None).unwrap();
		assert_eq!(reopened.len(), 3);
		let back = reopened.open_image(reopened.handle_at(2).unwrap()).unwrap();
		assert_eq!((back.width(), back.height()), (8, 1));
		assert_eq!(back.pixels(), &[5u8; 8]);
	}

	#[test]
	fn test_ico_insert_oversized_rejected() {
		let mut ts = open_ico(Store::from_bytes(ico_two_tiles()), None).unwrap();
		assert!(matches!(
			ts.insert(None, Some(0x1_0000)),
			Err(TilesetError::UnsupportedCapability(_))
		));
		assert_eq!(ts.len(), 2);
	}

	#[test]
	fn test_ico_insert_then_draw() {
		let mut ts = open_ico(Store::from_bytes(ico_two_tiles()), None).unwrap();
		let first = ts.handle_at(0).unwrap();
		let h = ts.insert(Some(first), Some(0)).unwrap();
		assert_eq!(ts.len(), 3);
		// The new tile starts as 0x0; giving it pixels sizes it.
		let tile = Tile::new(3, 1, vec![7, 8, 9], None);
		ts.write_image(h, &tile).unwrap();
		let back = ts.open_image(h).unwrap();
		assert_eq!(back.pixels(), &[7, 8, 9]);
		// Following tiles survive the shift.
		let a = ts.open_image(first).unwrap();
		assert_eq!((a.width(), a.height()), (4, 2));
	}
}
