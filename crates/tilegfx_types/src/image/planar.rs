//! Byte-planar EGA codec.
//!
//! EGA-era formats store an image as up to six consecutive one-bit-per-pixel
//! planes. Four of them carry the colour signal (blue, green, red,
//! intensity), the others per-pixel transparency or collision data. Each
//! plane is row major with rows padded to a whole byte, most significant bit
//! first, so a plane occupies `ceil(width / 8) * height` bytes and the full
//! image `planes` times that.

use crate::error::TilesetError;
use crate::image::{MASK_HIT, MASK_TRANSPARENT, Tile};

/// The semantic purpose of one bit plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneRole {
	/// Colour bit 0
	Blue,
	/// Colour bit 1
	Green,
	/// Colour bit 2
	Red,
	/// Colour bit 3 (most significant)
	Intensity,
	/// Collision bit: 1 = solid for hit testing
	Hitmap,
	/// Transparency bit: 1 = opaque
	Opacity,
}

impl PlaneRole {
	const ALL: [PlaneRole; 6] = [
		PlaneRole::Blue,
		PlaneRole::Green,
		PlaneRole::Red,
		PlaneRole::Intensity,
		PlaneRole::Hitmap,
		PlaneRole::Opacity,
	];

	fn slot_index(self) -> usize {
		match self {
			PlaneRole::Blue => 0,
			PlaneRole::Green => 1,
			PlaneRole::Red => 2,
			PlaneRole::Intensity => 3,
			PlaneRole::Hitmap => 4,
			PlaneRole::Opacity => 5,
		}
	}

	/// Bit position this role contributes to the colour index, if it is a
	/// colour plane.
	fn color_bit(self) -> Option<u8> {
		match self {
			PlaneRole::Blue => Some(0),
			PlaneRole::Green => Some(1),
			PlaneRole::Red => Some(2),
			PlaneRole::Intensity => Some(3),
			_ => None,
		}
	}
}

/// Maps each plane role to its position in the on-disk plane sequence.
///
/// Positions are 1-based; 0 marks the role as absent. Different games store
/// the same four colour planes in wildly different orders, and may bolt a
/// transparency or hitmap plane before or after them, so this mapping is the
/// one parameter that fully determines the bit interleave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlaneLayout {
	slots: [u8; 6],
}

impl PlaneLayout {
	/// Creates an empty layout with every role unused.
	pub fn new() -> Self {
		Self::default()
	}

	/// Assigns `role` to the 1-based plane position `slot` (builder style).
	#[must_use]
	pub fn with(mut self, role: PlaneRole, slot: u8) -> Self {
		self.slots[role.slot_index()] = slot;
		self
	}

	/// The common solid EGA ordering: blue, green, red, intensity in plane
	/// positions 1-4.
	pub fn ega_solid() -> Self {
		Self::new()
			.with(PlaneRole::Blue, 1)
			.with(PlaneRole::Green, 2)
			.with(PlaneRole::Red, 3)
			.with(PlaneRole::Intensity, 4)
	}

	/// Returns the 1-based plane position of `role`, or `None` if unused.
	pub fn slot(&self, role: PlaneRole) -> Option<u8> {
		match self.slots[role.slot_index()] {
			0 => None,
			s => Some(s),
		}
	}

	/// Returns the number of planes the layout spans (the highest used
	/// position).
	pub fn plane_count(&self) -> usize {
		self.slots.iter().copied().max().unwrap_or(0) as usize
	}

	/// Returns `true` if the layout carries a hitmap or opacity plane.
	pub fn has_mask(&self) -> bool {
		self.slot(PlaneRole::Hitmap).is_some() || self.slot(PlaneRole::Opacity).is_some()
	}
}

/// Bidirectional converter between a planar byte buffer and a [`Tile`].
///
/// The codec is a pure transform: it never touches the backing store, only
/// byte slices handed to it by the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanarCodec {
	width: u32,
	height: u32,
	layout: PlaneLayout,
}

impl PlanarCodec {
	/// Creates a codec for images of the given dimensions and plane layout.
	pub fn new(width: u32, height: u32, layout: PlaneLayout) -> Self {
		Self {
			width,
			height,
			layout,
		}
	}

	/// Image dimensions in pixels.
	pub fn dimensions(&self) -> (u32, u32) {
		(self.width, self.height)
	}

	/// Returns the plane layout.
	pub fn layout(&self) -> PlaneLayout {
		self.layout
	}

	/// Bytes per plane row: rows are padded to a whole byte.
	fn row_bytes(&self) -> usize {
		(self.width as usize + 7) / 8
	}

	/// Bytes per plane.
	fn plane_len(&self) -> usize {
		self.row_bytes() * self.height as usize
	}

	/// Total encoded length in bytes.
	pub fn encoded_len(&self) -> usize {
		self.plane_len() * self.layout.plane_count()
	}

	/// Returns `true` if decoding produces a mask buffer.
	pub fn has_mask(&self) -> bool {
		self.layout.has_mask()
	}

	fn bit_addr(&self, slot: u8, x: u32, y: u32) -> (usize, u8) {
		let base = (slot as usize - 1) * self.plane_len();
		let byte = base + y as usize * self.row_bytes() + x as usize / 8;
		(byte, 7 - (x % 8) as u8)
	}

	/// Decodes a planar byte buffer into a tile.
	///
	/// Row padding bits are ignored. Excess trailing bytes beyond
	/// [`encoded_len`](Self::encoded_len) are ignored as well; some formats
	/// pad tiles with a stray byte.
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

		let n = (self.width * self.height) as usize;
		let mut pixels = vec![0u8; n];
		let mut mask = self.has_mask().then(|| vec![0u8; n]);

		for y in 0..self.height {
			for x in 0..self.width {
				let pos = (y * self.width + x) as usize;
				for role in PlaneRole::ALL {
					let Some(slot) = self.layout.slot(role) else {
						continue;
					};
					let (byte, bit) = self.bit_addr(slot, x, y);
					let set = (data[byte] >> bit) & 1 != 0;
					match role.color_bit() {
						Some(colour_bit) => {
							if set {
								pixels[pos] |= 1 << colour_bit;
							}
						}
						None => {
							// Mask planes: a set opacity bit means opaque, so the
							// transparency flag is its inverse.
							if let Some(m) = mask.as_mut() {
								match role {
									PlaneRole::Hitmap if set => m[pos] |= MASK_HIT,
									PlaneRole::Opacity if !set => m[pos] |= MASK_TRANSPARENT,
									_ => {}
								}
							}
						}
					}
				}
			}
		}

		Ok(Tile::new(self.width, self.height, pixels, mask))
	}

	/// Encodes a tile into a freshly allocated, zero-filled planar buffer.
	///
	/// # Errors
	///
	/// Fails with [`TilesetError::TruncatedInput`] if the tile's dimensions
	/// do not match the codec's.
	pub fn encode(&self, tile: &Tile) -> Result<Vec<u8>, TilesetError> {
		let mut out = vec![0u8; self.encoded_len()];
		self.encode_into(tile, &mut out)?;
		Ok(out)
	}

	/// Encodes a tile into an existing buffer.
	///
	/// Only the plane regions named by the layout are written; any other
	/// bytes of `out` keep their previous content, so a partial rewrite of a
	/// shared buffer cannot corrupt unrelated data. Row padding bits are
	/// written as zero. A tile without a mask encodes as fully opaque and
	/// non-solid when mask planes are configured.
	///
	/// # Errors
	///
	/// Fails with [`TilesetError::TruncatedInput`] if `out` is shorter than
	/// the encoded length or the tile's dimensions do not match the codec's.
	pub fn encode_into(&self, tile: &Tile, out: &mut [u8]) -> Result<(), TilesetError> {
		let need = self.encoded_len();
		if out.len() < need {
			return Err(TilesetError::truncated(need, out.len()));
		}
		if tile.width() != self.width || tile.height() != self.height {
			return Err(TilesetError::truncated(
				(self.width * self.height) as usize,
				tile.pixels().len(),
			));
		}

		// Clear the configured plane regions first so stale bits (including
		// row padding) end up zero.
		let plane_len = self.plane_len();
		for role in PlaneRole::ALL {
			if let Some(slot) = self.layout.slot(role) {
				let base = (slot as usize - 1) * plane_len;
				out[base..base + plane_len].fill(0);
			}
		}

		for y in 0..self.height {
			for x in 0..self.width {
				let pos = (y * self.width + x) as usize;
				let pixel = tile.pixels()[pos];
				let flags = tile.mask().map_or(0, |m| m[pos]);
				for role in PlaneRole::ALL {
					let Some(slot) = self.layout.slot(role) else {
						continue;
					};
					let set = match role.color_bit() {
						Some(colour_bit) => (pixel >> colour_bit) & 1 != 0,
						None => match role {
							PlaneRole::Hitmap => flags & MASK_HIT != 0,
							PlaneRole::Opacity => flags & MASK_TRANSPARENT == 0,
							// Colour roles always report a colour bit
							_ => false,
						},
					};
					if set {
						let (byte, bit) = self.bit_addr(slot, x, y);
						out[byte] |= 1 << bit;
					}
				}
			}
		}
		Ok(())
	}
}
