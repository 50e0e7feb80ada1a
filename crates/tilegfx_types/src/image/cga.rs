//! Packed 2bpp CGA codec.
//!
//! CGA graphics pack four pixels per byte, two bits each, most significant
//! pair first. Rows are padded to a whole byte (a multiple of four pixels).
//! Decoded values are indices 0-3 into a four-colour CGA palette.

use crate::error::TilesetError;
use crate::image::Tile;

/// Codec for packed 2bpp CGA pixel data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CgaCodec {
	width: u32,
	height: u32,
}

impl CgaCodec {
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

	fn row_bytes(&self) -> usize {
		(self.width as usize + 3) / 4
	}

	/// Total encoded length in bytes.
	pub fn encoded_len(&self) -> usize {
		self.row_bytes() * self.height as usize
	}

	/// Decodes packed CGA data into a tile.
	///
	/// # Errors
	///
	/// Fails with [`TilesetError::TruncatedInput`] if `data` is shorter than
	/// the encoded length.
	pub fn decode(&self, data: &[u8]) -> Result<Tile, TilesetError> {
		let need = self.encoded_len();
		if data.len() < need {
			return Err(TilesetError::truncated(need, data.len()));
		}

		let mut pixels = Vec::with_capacity((self.width * self.height) as usize);
		for y in 0..self.height as usize {
			for x in 0..self.width as usize {
				let byte = data[y * self.row_bytes() + x / 4];
				let shift = 6 - 2 * (x % 4);
				pixels.push((byte >> shift) & 0x03);
			}
		}
		Ok(Tile::new(self.width, self.height, pixels, None))
	}

	/// Encodes a tile into packed CGA bytes. Row padding bits are zero.
	///
	/// # Errors
	///
	/// Fails with [`TilesetError::TruncatedInput`] if the tile's dimensions
	/// do not match the codec's.
	pub fn encode(&self, tile: &Tile) -> Result<Vec<u8>, TilesetError> {
		if tile.width() != self.width || tile.height() != self.height {
			return Err(TilesetError::truncated(
				(self.width * self.height) as usize,
				tile.pixels().len(),
			));
		}

		let mut out = vec![0u8; self.encoded_len()];
		for y in 0..self.height as usize {
			for x in 0..self.width as usize {
				let value = tile.pixels()[y * self.width as usize + x] & 0x03;
				let shift = 6 - 2 * (x % 4);
				out[y * self.row_bytes() + x / 4] |= value << shift;
			}
		}
		Ok(out)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_roundtrip() {
		let codec = CgaCodec::new(16, 16);
		assert_eq!(codec.encoded_len(), 64);

		let mut tile = Tile::blank(16, 16, false);
		for y in 0..16 {
			for x in 0..16 {
				tile.put_pixel(x, y, ((x + y) % 4) as u8);
			}
		}
		let bytes = codec.encode(&tile).unwrap();
		assert_eq!(codec.decode(&bytes).unwrap(), tile);
	}

	#[test]
	fn test_pixel_order() {
		// 0xCF = pairs 11 00 11 11
		let codec = CgaCodec::new(4, 1);
		let tile = codec.decode(&[0xCF]).unwrap();
		assert_eq!(tile.pixels(), &[3, 0, 3, 3]);
	}

	#[test]
	fn test_unaligned_width() {
		let codec = CgaCodec::new(6, 2);
		assert_eq!(codec.encoded_len(), 4);
		let mut tile = Tile::blank(6, 2, false);
		tile.put_pixel(5, 1, 2);
		let bytes = codec.encode(&tile).unwrap();
		assert_eq!(bytes, vec![0x00, 0x00, 0x00, 0b0010_0000]);
		assert_eq!(codec.decode(&bytes).unwrap(), tile);
	}
}
