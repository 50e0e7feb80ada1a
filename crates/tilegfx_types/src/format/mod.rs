//! Format drivers for the supported tileset containers.
//!
//! Each driver describes one on-disk format as data (a [`FormatConfig`])
//! plus a signature check. The generic container in
//! [`crate::tileset::FatTileset`] does the actual parsing and mutation;
//! drivers only tell it where the index lives, how big tiles are, and
//! which pixel codec applies.

pub mod bash;
pub mod ccomic;
pub mod ddave;
pub mod harry;
pub mod zone66;

use serde::Serialize;

use crate::error::TilesetError;
use crate::image::PlaneLayout;
use crate::palette::Palette;
use crate::store::Store;
use crate::tileset::FatTileset;

/// Upper bound on the tile count any driver will accept while probing a
/// candidate file. A count above this is treated as garbage rather than a
/// very large tileset.
pub const MAX_SANE_TILES: u32 = 4096;

/// How confident a signature check is that a byte sequence belongs to a
/// given format.
///
/// Checks never fail with an error; a file that cannot possibly be the
/// format is simply `DefinitelyNo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Certainty {
	/// The data violates a structural requirement of the format.
	DefinitelyNo,
	/// The data is consistent with the format but carries no signature
	/// that would rule out a coincidence.
	PossiblyYes,
	/// The data carries format-specific structure beyond mere consistency.
	DefinitelyYes,
}

/// How offsets in an index table relate to file positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OffsetBase {
	/// Stored offsets are absolute file positions.
	Absolute,
	/// Stored offsets are counted from the end of the index table, so the
	/// first tile always stores offset 0.
	FromEndOfTable,
}

/// Where the tiles live within the file and how they are found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexLayout {
	/// A `u32le` count followed by one `u32le` offset per tile, with tile
	/// data contiguous from the end of the table to EOF.
	Table { base: OffsetBase },
	/// No index at all: tiles are laid out back to back at a fixed stride
	/// after an optional file header.
	FixedStride { header_len: usize, stride: usize },
	/// No index: each tile starts with a `u16le` width and `u16le` height
	/// header and the next tile follows immediately after its pixel data.
	DimsHeaderWalk,
}

/// Whether tiles may vary in size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileSize {
	/// Every tile occupies exactly this many bytes of pixel data.
	Fixed(usize),
	/// Tiles may be any size.
	Variable,
}

/// Which codec converts between stored bytes and [`crate::image::Tile`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
	/// Row-planar EGA data decoded by [`crate::image::PlanarCodec`].
	Planar(PlaneLayout),
	/// One byte per pixel, decoded by [`crate::image::LinearCodec`].
	Linear,
	/// Packed 2bpp CGA data decoded by [`crate::image::CgaCodec`].
	Cga,
	/// Tile data is opaque to this library (for example compressed);
	/// only container-level operations are available.
	Opaque,
}

/// Static description of one container format.
#[derive(Debug, Clone)]
pub struct FormatConfig {
	/// Short machine-readable identifier, e.g. `"tls-ddave-vga"`.
	pub code: &'static str,
	/// Human-readable name.
	pub name: &'static str,
	/// Index structure of the container.
	pub layout: IndexLayout,
	/// Tile size rule.
	pub tile_size: TileSize,
	/// Tile dimensions when the format fixes them; `None` when each tile
	/// carries its own dimensions.
	pub dims: Option<(u32, u32)>,
	/// Pixel codec for tile data.
	pub pixels: PixelFormat,
	/// Per-tile header length in bytes (part of the stored size, excluded
	/// from the real size).
	pub len_header: usize,
	/// Hard cap on the number of tiles, if the format has one.
	pub capacity: Option<u32>,
	/// `true` when the tile count is part of the format itself and
	/// insert/remove are forbidden.
	pub frozen_count: bool,
	/// Suggested number of tiles per row when arranging the set visually.
	pub layout_width: u32,
	/// Names of the one-byte attributes stored in the file header, in file
	/// order. Empty for formats without header attributes.
	pub attribute_names: &'static [&'static str],
	/// `true` when the format is accompanied by an external palette file.
	pub external_palette: bool,
}

/// One probe-and-open entry in the format registry.
pub struct FormatDescriptor {
	/// Short machine-readable identifier.
	pub code: &'static str,
	/// Human-readable name.
	pub name: &'static str,
	/// Signature check against raw file contents.
	pub is_instance: fn(&[u8]) -> Certainty,
	/// Opens a store as this format.
	pub open: fn(Store, Option<Palette>) -> Result<FatTileset, TilesetError>,
}

/// All known formats, in probe order.
pub fn registry() -> Vec<FormatDescriptor> {
	vec![
		FormatDescriptor {
			code: ddave::CGA_CODE,
			name: "Dangerous Dave CGA tileset",
			is_instance: ddave::is_instance_cga,
			open: ddave::open_cga,
		},
		FormatDescriptor {
			code: ddave::EGA_CODE,
			name: "Dangerous Dave EGA tileset",
			is_instance: ddave::is_instance_ega,
			open: ddave::open_ega,
		},
		FormatDescriptor {
			code: ddave::VGA_CODE,
			name: "Dangerous Dave VGA tileset",
			is_instance: ddave::is_instance_vga,
			open: ddave::open_vga,
		},
		FormatDescriptor {
			code: zone66::CODE,
			name: "Zone 66 tileset",
			is_instance: zone66::is_instance,
			open: zone66::open,
		},
		FormatDescriptor {
			code: bash::BG_CODE,
			name: "Monster Bash background tileset",
			is_instance: bash::is_instance_bg,
			open: bash::open_bg,
		},
		FormatDescriptor {
			code: bash::FG_CODE,
			name: "Monster Bash foreground tileset",
			is_instance: bash::is_instance_fg,
			open: bash::open_fg,
		},
		FormatDescriptor {
			code: ccomic::TILE_CODE,
			name: "Captain Comic tileset",
			is_instance: ccomic::is_instance_tiles,
			open: ccomic::open_tiles,
		},
		FormatDescriptor {
			code: ccomic::SPRITE_CODE,
			name: "Captain Comic sprite set",
			is_instance: ccomic::is_instance_sprites,
			open: ccomic::open_sprites,
		},
		FormatDescriptor {
			code: harry::CHR_CODE,
			name: "Halloween Harry CHR tileset",
			is_instance: harry::is_instance_chr,
			open: harry::open_chr,
		},
		FormatDescriptor {
			code: harry::ICO_CODE,
			name: "Halloween Harry ICO tileset",
			is_instance: harry::is_instance_ico,
			open: harry::open_ico,
		},
	]
}

/// Structural walk over a `u32le` count plus offset table.
///
/// Returns `PossiblyYes` when every offset is in range and non-decreasing,
/// since a table of plausible offsets is consistent with the format but is
/// not a signature. Drivers upgrade or reject from there using their own
/// constraints (fixed tile sizes, a mandatory first offset, and so on).
pub(crate) fn check_offset_table(data: &[u8], base: OffsetBase) -> Certainty {
	let Some(count_bytes) = data.get(0..4) else {
		return Certainty::DefinitelyNo;
	};
	let count = u32::from_le_bytes([
		count_bytes[0],
		count_bytes[1],
		count_bytes[2],
		count_bytes[3],
	]);
	if count > MAX_SANE_TILES {
		return Certainty::DefinitelyNo;
	}
	let table_end = 4 + count as usize * 4;
	if data.len() < table_end {
		return Certainty::DefinitelyNo;
	}
	// An empty tileset is exactly the 4-byte count and nothing else.
	if count == 0 {
		return if data.len() == 4 {
			Certainty::PossiblyYes
		} else {
			Certainty::DefinitelyNo
		};
	}

	let mut prev = 0u32;
	for i in 0..count as usize {
		let at = 4 + i * 4;
		let raw = u32::from_le_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]]);
		let absolute = match base {
			OffsetBase::Absolute => raw as usize,
			OffsetBase::FromEndOfTable => table_end + raw as usize,
		};
		if i == 0 {
			// The first tile must start exactly at the end of the table.
			if absolute != table_end {
				return Certainty::DefinitelyNo;
			}
		} else if raw < prev {
			return Certainty::DefinitelyNo;
		}
		if absolute > data.len() {
			return Certainty::DefinitelyNo;
		}
		prev = raw;
	}
	Certainty::PossiblyYes
}

#[cfg(test)]
mod tests {
	use super::*;

	fn table(count: u32, offsets: &[u32], tail: &[u8]) -> Vec<u8> {
		let mut out = count.to_le_bytes().to_vec();
		for o in offsets {
			out.extend_from_slice(&o.to_le_bytes());
		}
		out.extend_from_slice(tail);
		out
	}

	#[test]
	fn test_empty_table_is_possible() {
		assert_eq!(
			check_offset_table(&[0, 0, 0, 0], OffsetBase::Absolute),
			Certainty::PossiblyYes
		);
	}

	#[test]
	fn test_truncated_table_rejected() {
		let data = table(3, &[16], &[]);
		assert_eq!(
			check_offset_table(&data, OffsetBase::Absolute),
			Certainty::DefinitelyNo
		);
	}

	#[test]
	fn test_absolute_offsets_walk() {
		let data = table(2, &[12, 20], &[0u8; 24]);
		assert_eq!(
			check_offset_table(&data, OffsetBase::Absolute),
			Certainty::PossiblyYes
		);
	}

	#[test]
	fn test_first_offset_must_touch_table_end() {
		let data = table(2, &[16, 20], &[0u8; 24]);
		assert_eq!(
			check_offset_table(&data, OffsetBase::Absolute),
			Certainty::DefinitelyNo
		);
	}

	#[test]
	fn test_decreasing_offsets_rejected() {
		let data = table(2, &[12, 8], &[0u8; 24]);
		assert_eq!(
			check_offset_table(&data, OffsetBase::Absolute),
			Certainty::DefinitelyNo
		);
	}

	#[test]
	fn test_end_of_table_base() {
		// First stored offset must be 0 in this base.
		let good = table(2, &[0, 8], &[0u8; 16]);
		assert_eq!(
			check_offset_table(&good, OffsetBase::FromEndOfTable),
			Certainty::PossiblyYes
		);
		let bad = table(2, &[4, 8], &[0u8; 16]);
		assert_eq!(
			check_offset_table(&bad, OffsetBase::FromEndOfTable),
			Certainty::DefinitelyNo
		);
	}

	#[test]
	fn test_insane_count_rejected() {
		let data = table(MAX_SANE_TILES + 1, &[], &[]);
		assert_eq!(
			check_offset_table(&data, OffsetBase::Absolute),
			Certainty::DefinitelyNo
		);
	}
}
