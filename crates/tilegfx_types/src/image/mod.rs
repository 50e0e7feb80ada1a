//! Normalized in-memory images and the codecs that produce them.
//!
//! Every on-disk pixel format in this crate converts to and from the same
//! in-memory shape: a [`Tile`] holding one palette index per pixel, row
//! major, plus an optional mask buffer with one flag byte per pixel. The
//! codecs are pure transforms with no I/O; the container layer hands them
//! byte ranges and gets tiles back.

pub mod cga;
pub mod linear;
pub mod planar;

pub use cga::CgaCodec;
pub use linear::LinearCodec;
pub use planar::{PlanarCodec, PlaneLayout, PlaneRole};

/// Mask flag: the pixel is transparent.
pub const MASK_TRANSPARENT: u8 = 0x01;

/// Mask flag: the pixel is solid for collision purposes.
pub const MASK_HIT: u8 = 0x02;

/// A decoded sub-image: palette indices plus an optional per-pixel mask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
	width: u32,
	height: u32,
	pixels: Vec<u8>,
	mask: Option<Vec<u8>>,
}

impl Tile {
	/// Creates a tile from pixel data.
	///
	/// `pixels` and (if present) `mask` must both hold exactly
	/// `width * height` bytes.
	pub fn new(width: u32, height: u32, pixels: Vec<u8>, mask: Option<Vec<u8>>) -> Self {
		let expected = (width * height) as usize;
		debug_assert_eq!(pixels.len(), expected);
		if let Some(m) = &mask {
			debug_assert_eq!(m.len(), expected);
		}
		Self {
			width,
			height,
			pixels,
			mask,
		}
	}

	/// Creates a blank tile with every pixel set to palette index 0.
	pub fn blank(width: u32, height: u32, with_mask: bool) -> Self {
		let n = (width * height) as usize;
		Self {
			width,
			height,
			pixels: vec![0; n],
			mask: with_mask.then(|| vec![0; n]),
		}
	}

	/// Returns the tile width in pixels.
	pub fn width(&self) -> u32 {
		self.width
	}

	/// Returns the tile height in pixels.
	pub fn height(&self) -> u32 {
		self.height
	}

	/// Returns the pixel buffer: one palette index per pixel, row major.
	pub fn pixels(&self) -> &[u8] {
		&self.pixels
	}

	/// Returns a mutable reference to the pixel buffer.
	pub fn pixels_mut(&mut self) -> &mut [u8] {
		&mut self.pixels
	}

	/// Returns the mask buffer, if this tile carries one.
	///
	/// Each byte is a combination of [`MASK_TRANSPARENT`] and [`MASK_HIT`].
	pub fn mask(&self) -> Option<&[u8]> {
		self.mask.as_deref()
	}

	/// Returns a mutable reference to the mask buffer, if present.
	pub fn mask_mut(&mut self) -> Option<&mut [u8]> {
		self.mask.as_deref_mut()
	}

	/// Gets the palette index at (x, y).
	pub fn get_pixel(&self, x: u32, y: u32) -> u8 {
		self.pixels[(y * self.width + x) as usize]
	}

	/// Sets the palette index at (x, y).
	pub fn put_pixel(&mut self, x: u32, y: u32, value: u8) {
		self.pixels[(y * self.width + x) as usize] = value;
	}
}

impl std::fmt::Display for Tile {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"Tile {}x{}{}",
			self.width,
			self.height,
			if self.mask.is_some() { " (masked)" } else { "" }
		)
	}
}
