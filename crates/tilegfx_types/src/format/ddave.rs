//! Dangerous Dave tilesets (VGADAVE.DAV, EGADAVE.DAV, CGADAVE.DAV).
//!
//! All three releases share one container: a `u32le` tile count, a table
//! of absolute `u32le` offsets, then 16x16 tiles packed to EOF. Only the
//! pixel encoding differs, which also fixes the first tile's size and is
//! how the three variants are told apart: 64 bytes for CGA, 128 for EGA,
//! 256 for VGA.
//!
//! The VGA release ships its palette in a separate `vga.pal` file; the
//! CGA release implies the bright cyan/magenta hardware palette; the EGA
//! release uses the standard 16-colour EGA palette.

use crate::error::TilesetError;
use crate::format::{
	check_offset_table, Certainty, FormatConfig, IndexLayout, OffsetBase, PixelFormat, TileSize,
};
use crate::image::PlaneLayout;
use crate::palette::{CgaVariant, Palette};
use crate::store::Store;
use crate::tileset::FatTileset;

/// Format code of the CGA variant.
pub const CGA_CODE: &str = "tls-ddave-cga";
/// Format code of the EGA variant.
pub const EGA_CODE: &str = "tls-ddave-ega";
/// Format code of the VGA variant.
pub const VGA_CODE: &str = "tls-ddave-vga";

const TILE_WIDTH: u32 = 16;
const TILE_HEIGHT: u32 = 16;

const CGA_TILE_LEN: usize = (TILE_WIDTH as usize / 4) * TILE_HEIGHT as usize;
const EGA_TILE_LEN: usize = (TILE_WIDTH as usize / 8) * TILE_HEIGHT as usize * 4;
const VGA_TILE_LEN: usize = (TILE_WIDTH * TILE_HEIGHT) as usize;

fn config(code: &'static str, name: &'static str, tile_len: usize, pixels: PixelFormat) -> FormatConfig {
	FormatConfig {
		code,
		name,
		layout: IndexLayout::Table {
			base: OffsetBase::Absolute,
		},
		tile_size: TileSize::Fixed(tile_len),
		dims: Some((TILE_WIDTH, TILE_HEIGHT)),
		pixels,
		len_header: 0,
		capacity: None,
		frozen_count: false,
		layout_width: 10,
		attribute_names: &[],
		external_palette: matches!(pixels, PixelFormat::Linear),
	}
}

/// Configuration of the CGA variant.
pub fn cga_config() -> FormatConfig {
	config(CGA_CODE, "Dangerous Dave CGA tileset", CGA_TILE_LEN, PixelFormat::Cga)
}

/// Configuration of the EGA variant.
pub fn ega_config() -> FormatConfig {
	config(
		EGA_CODE,
		"Dangerous Dave EGA tileset",
		EGA_TILE_LEN,
		PixelFormat::Planar(PlaneLayout::ega_solid()),
	)
}

/// Configuration of the VGA variant.
pub fn vga_config() -> FormatConfig {
	config(VGA_CODE, "Dangerous Dave VGA tileset", VGA_TILE_LEN, PixelFormat::Linear)
}

/// Shared structural check, then a first-tile size test that separates the
/// three variants.
fn is_instance(data: &[u8], tile_len: usize) -> Certainty {
	if check_offset_table(data, OffsetBase::Absolute) == Certainty::DefinitelyNo {
		return Certainty::DefinitelyNo;
	}
	let count = u32::from_le_bytes([data[0], data[1], data[2], data[3]]) as usize;
	if count > 0 {
		let first = u32::from_le_bytes([data[4], data[5], data[6], data[7]]) as usize;
		let second = if count > 1 {
			u32::from_le_bytes([data[8], data[9], data[10], data[11]]) as usize
		} else {
			data.len()
		};
		if second - first != tile_len {
			return Certainty::DefinitelyNo;
		}
	}
	// A valid table whose first tile matches this variant's size is as
	// strong a signature as the format offers.
	Certainty::DefinitelyYes
}

/// Checks whether `data` is a CGA-variant tileset.
pub fn is_instance_cga(data: &[u8]) -> Certainty {
	is_instance(data, CGA_TILE_LEN)
}

/// Checks whether `data` is an EGA-variant tileset.
pub fn is_instance_ega(data: &[u8]) -> Certainty {
	is_instance(data, EGA_TILE_LEN)
}

/// Checks whether `data` is a VGA-variant tileset.
pub fn is_instance_vga(data: &[u8]) -> Certainty {
	is_instance(data, VGA_TILE_LEN)
}

/// Opens a CGA-variant tileset. The palette is the bright cyan/magenta
/// hardware set unless the caller supplies another.
pub fn open_cga(store: Store, palette: Option<Palette>) -> Result<FatTileset, TilesetError> {
	let palette = palette.unwrap_or_else(|| Palette::cga(CgaVariant::CyanMagentaBright as u8));
	FatTileset::open(store, cga_config(), Some(palette))
}

/// Opens an EGA-variant tileset with the standard EGA palette.
pub fn open_ega(store: Store, palette: Option<Palette>) -> Result<FatTileset, TilesetError> {
	let palette = palette.unwrap_or_else(Palette::default_ega);
	FatTileset::open(store, ega_config(), Some(palette))
}

/// Opens a VGA-variant tileset. The palette normally comes from the
/// accompanying `vga.pal` file; without one the default VGA palette is
/// used.
pub fn open_vga(store: Store, palette: Option<Palette>) -> Result<FatTileset, TilesetError> {
	let palette = palette.unwrap_or_else(Palette::default_vga);
	FatTileset::open(store, vga_config(), Some(palette))
}

#[cfg(test)]
mod tests {
	use super::*;

	fn build(tile_len: usize, count: usize) -> Vec<u8> {
		let mut data = (count as u32).to_le_bytes().to_vec();
		let first = 4 + count * 4;
		for i in 0..count {
			data.extend_from_slice(&((first + i * tile_len) as u32).to_le_bytes());
		}
		data.extend_from_slice(&vec![0u8; count * tile_len]);
		data
	}

	#[test]
	fn test_variants_distinguished_by_first_tile() {
		let cga = build(CGA_TILE_LEN, 2);
		assert_eq!(is_instance_cga(&cga), Certainty::DefinitelyYes);
		assert_eq!(is_instance_ega(&cga), Certainty::DefinitelyNo);
		assert_eq!(is_instance_vga(&cga), Certainty::DefinitelyNo);

		let vga = build(VGA_TILE_LEN, 1);
		assert_eq!(is_instance_vga(&vga), Certainty::DefinitelyYes);
		assert_eq!(is_instance_cga(&vga), Certainty::DefinitelyNo);
	}

	#[test]
	fn test_empty_tileset_accepted() {
		assert_eq!(is_instance_ega(&[0, 0, 0, 0]), Certainty::DefinitelyYes);
	}

	#[test]
	fn test_open_assigns_palettes() {
		let ts = open_cga(Store::from_bytes(build(CGA_TILE_LEN, 1)), None).unwrap();
		assert_eq!(ts.palette().unwrap().len(), 4);
		let ts = open_vga(Store::from_bytes(build(VGA_TILE_LEN, 1)), None).unwrap();
		assert_eq!(ts.palette().unwrap().len(), 256);
	}
}
