//! Linear 8bpp VGA codec.
//!
//! VGA-era tiles store one palette index per byte, row major, with no
//! padding. The on-disk layout already matches the normalized form, so this
//! codec is little more than a bounds-checked copy.

use crate::error::TilesetError;
use crate::image::Tile;

/// Codec for raw 8bpp VGA pixel data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinearCodec {
	width: u32,
	height: u32,
}

impl LinearCodec {
	/// Creates a codec for images of the given dimensions.
	pub fn new(width: u32, height: u32) -> Self {
		Self {
			width,
			height,
		}
	}

	/// Image dimensions in pixels.
	pub fn dimensions(&self) -> (u32, u32) {
		(self.width, self.height)
	}

	/// Total encoded length in bytes: one byte per pixel.
	pub fn encoded_len(&self) -> usize {
		(self.width * self.height) as usize
	}

	/// Decodes raw VGA data into a tile.
	///
	/// # Errors
	///
	/// Fails with [`TilesetError::TruncatedInput`] if `data` is shorter than
	/// `width * height` bytes.
	pub fn decode(&self, data: &[u8]) -> Result<Tile, TilesetError> {
		let need = self.encoded_len();
		if data.len() < need {
			return Err(TilesetError::truncated(need, data.len()));
		}
		Ok(Tile::new(self.width, self.height, data[..need].to_vec(), None))
	}

	/// Encodes a tile back into raw VGA bytes.
	///
	/// # Errors
	///
	/// Fails with [`TilesetError::TruncatedInput`] if the tile's dimensions
	/// do not match the codec's.
	pub fn encode(&self, tile: &Tile) -> Result<Vec<u8>, TilesetError> {
		if tile.width() != self.width || tile.height() != self.height {
			return Err(TilesetError::truncated(self.encoded_len(), tile.pixels().len()));
		}
		Ok(tile.pixels().to_vec())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_roundtrip() {
		let codec = LinearCodec::new(4, 2);
		let data: Vec<u8> = (0..8).collect();
		let tile = codec.decode(&data).unwrap();
		assert_eq!(tile.get_pixel(3, 1), 7);
		assert_eq!(codec.encode(&tile).unwrap(), data);
	}

	#[test]
	fn test_short_input() {
		let codec = LinearCodec::new(16, 16);
		assert!(matches!(
			codec.decode(&[0u8; 100]),
			Err(TilesetError::TruncatedInput { expected: 256, actual: 100 })
		));
	}
}
