//! Palette tables for indexed-colour images.
//!
//! Every image codec in this crate produces palette indices, not RGB values;
//! a [`Palette`] maps those indices back to colours. Formats that ship a
//! palette on disk load it into one of these, while CGA/EGA/VGA formats with
//! hardware-defined colours use the generator constructors, which reproduce
//! the exact tables the original display adapters used.

use std::fmt;

use serde::Serialize;

/// RGBA colour representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Color {
	/// Red component (0-255)
	pub r: u8,
	/// Green component (0-255)
	pub g: u8,
	/// Blue component (0-255)
	pub b: u8,
	/// Alpha component (0-255)
	pub a: u8,
}

impl Color {
	/// Creates a new RGBA colour.
	pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
		Self {
			r,
			g,
			b,
			a,
		}
	}

	/// Creates a new RGB colour with full opacity.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self::new(r, g, b, 255)
	}

	/// Creates a new grey colour.
	pub const fn gray(value: u8) -> Self {
		Self::rgb(value, value, value)
	}

	/// Creates a fully opaque colour from 6-bit-per-channel VGA DAC values.
	///
	/// Each 6-bit value is widened to 8 bits by bit replication:
	/// `v8 = v6 << 2 | v6 >> 4`.
	pub const fn from_vga6(r: u8, g: u8, b: u8) -> Self {
		Self::rgb(vga_6to8(r), vga_6to8(g), vga_6to8(b))
	}
}

/// Widens a 6-bit VGA DAC value to 8 bits by bit replication.
const fn vga_6to8(v: u8) -> u8 {
	v << 2 | v >> 4
}

impl fmt::Display for Color {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "RGBA({}, {}, {}, {})", self.r, self.g, self.b, self.a)
	}
}

/// CGA palette selector.
///
/// The high nibble picks one of the six hardware palette variants, the low
/// nibble picks the background colour (entry 0) from the 16-colour CGA
/// master palette. Combine with `|`, e.g.
/// `CgaVariant::CyanMagentaBright as u8 | 0x01`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CgaVariant {
	/// Palette 0, low intensity: green, red, brown
	GreenRed = 0x00,
	/// Palette 0, high intensity: light green, light red, yellow
	GreenRedBright = 0x10,
	/// Palette 1, low intensity: cyan, magenta, light grey
	CyanMagenta = 0x20,
	/// Palette 1, high intensity: light cyan, light magenta, white
	CyanMagentaBright = 0x30,
	/// Third "palette", low intensity: cyan, red, light grey
	CyanRed = 0x40,
	/// Third "palette", high intensity: light cyan, light red, white
	CyanRedBright = 0x50,
}

/// An ordered table of RGBA colours.
///
/// The number of entries is fixed by the colour depth that produced the
/// table (2, 4, 16, 64 or 256). Generated tables are immutable in practice;
/// a tileset's palette may be swapped wholesale but never edited in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
	colors: Vec<Color>,
}

impl Palette {
	/// Creates a palette from an explicit colour list.
	pub fn from_colors(colors: Vec<Color>) -> Self {
		Self {
			colors,
		}
	}

	/// Default monochrome palette: black and white.
	pub fn default_mono() -> Self {
		Self::from_colors(vec![Color::rgb(0, 0, 0), Color::rgb(255, 255, 255)])
	}

	/// The full 16-colour CGA master palette.
	pub fn full_cga() -> Self {
		let mut colors = Vec::with_capacity(16);
		for i in 0..16u8 {
			let level = |bit: u8| -> u8 {
				match (i & bit != 0, i & 8 != 0) {
					(true, true) => 0xFF,
					(true, false) => 0xAA,
					(false, true) => 0x55,
					(false, false) => 0x00,
				}
			};
			let mut c = Color::rgb(level(4), level(2), level(1));
			if i == 6 {
				// Colour 6 is brown, not dark yellow: the monitor halves green
				c.g = 0x55;
			}
			colors.push(c);
		}
		Self::from_colors(colors)
	}

	/// A 4-colour CGA palette.
	///
	/// The selector combines a [`CgaVariant`] (high nibble) with a background
	/// colour index 0-15 (low nibble).
	pub fn cga(selector: u8) -> Self {
		let master = Self::full_cga();
		let mut colors = Vec::with_capacity(4);
		colors.push(master.colors[(selector & 0x0F) as usize]);

		for i in 1..=3u8 {
			let entry = match selector & 0xF0 {
				0x00 => i << 1,
				0x10 => 8 | (i << 1),
				0x20 => (i << 1) | 1,
				0x30 => 8 | (i << 1) | 1,
				0x40 => (i << 1) | (i & 1),
				_ => 8 | (i << 1) | (i & 1),
			};
			colors.push(master.colors[entry as usize]);
		}
		Self::from_colors(colors)
	}

	/// The full 64-colour EGA master palette.
	///
	/// Bits 0-2 of the index are the high-intensity blue/green/red signals,
	/// bits 3-5 the low-intensity ones.
	pub fn full_ega() -> Self {
		let low = 0x55u8;
		let mut colors = Vec::with_capacity(64);
		for i in 0..64u8 {
			colors.push(Color::rgb(
				(if i & 4 != 0 { !low } else { 0 }) | (if i & 32 != 0 { low } else { 0 }),
				(if i & 2 != 0 { !low } else { 0 }) | (if i & 16 != 0 { low } else { 0 }),
				(if i & 1 != 0 { !low } else { 0 }) | (if i & 8 != 0 { low } else { 0 }),
			));
		}
		Self::from_colors(colors)
	}

	/// The default 16-colour EGA palette (the BIOS power-on selection from
	/// the 64-colour master).
	pub fn default_ega() -> Self {
		const DEFAULT_MAP: [u8; 16] =
			[0, 1, 2, 3, 4, 5, 20, 7, 56, 57, 58, 59, 60, 61, 62, 63];
		let master = Self::full_ega();
		Self::from_colors(
			DEFAULT_MAP.iter().map(|&i| master.colors[i as usize]).collect(),
		)
	}

	/// The default 256-colour VGA palette.
	///
	/// Entries 0-15 match the default EGA palette, 16-31 are a greyscale
	/// ramp, and 32-247 repeat a 72-colour hue ramp at three brightness
	/// tiers. The final eight entries are undefined by the hardware and
	/// filled with black. All source values are 6-bit DAC levels widened by
	/// bit replication.
	pub fn default_vga() -> Self {
		let mut colors = Self::default_ega().colors;
		colors.reserve(256 - 16);

		const GREY_RAMP: [u8; 16] = [
			0x00, 0x05, 0x08, 0x0B, 0x0E, 0x11, 0x14, 0x18, 0x1C, 0x20, 0x24, 0x28,
			0x2D, 0x32, 0x38, 0x3F,
		];
		for v in GREY_RAMP {
			colors.push(Color::from_vga6(v, v, v));
		}

		// 72 hues, repeated at normal, dim and really-dim brightness.
		const HUE_RAMP: [[u8; 3]; 72] = [
			[0x00, 0x00, 0x3F], [0x10, 0x00, 0x3F], [0x1F, 0x00, 0x3F],
			[0x2F, 0x00, 0x3F], [0x3F, 0x00, 0x3F], [0x3F, 0x00, 0x2F],
			[0x3F, 0x00, 0x1F], [0x3F, 0x00, 0x10], [0x3F, 0x00, 0x00],
			[0x3F, 0x10, 0x00], [0x3F, 0x1F, 0x00], [0x3F, 0x2F, 0x00],
			[0x3F, 0x3F, 0x00], [0x2F, 0x3F, 0x00], [0x1F, 0x3F, 0x00],
			[0x10, 0x3F, 0x00], [0x00, 0x3F, 0x00], [0x00, 0x3F, 0x10],
			[0x00, 0x3F, 0x1F], [0x00, 0x3F, 0x2F], [0x00, 0x3F, 0x3F],
			[0x00, 0x2F, 0x3F], [0x00, 0x1F, 0x3F], [0x00, 0x10, 0x3F],
			[0x1F, 0x1F, 0x3F], [0x27, 0x1F, 0x3F], [0x2F, 0x1F, 0x3F],
			[0x37, 0x1F, 0x3F], [0x3F, 0x1F, 0x3F], [0x3F, 0x1F, 0x37],
			[0x3F, 0x1F, 0x2F], [0x3F, 0x1F, 0x27], [0x3F, 0x1F, 0x1F],
			[0x3F, 0x27, 0x1F], [0x3F, 0x2F, 0x1F], [0x3F, 0x37, 0x1F],
			[0x3F, 0x3F, 0x1F], [0x37, 0x3F, 0x1F], [0x2F, 0x3F, 0x1F],
			[0x27, 0x3F, 0x1F], [0x1F, 0x3F, 0x1F], [0x1F, 0x3F, 0x27],
			[0x1F, 0x3F, 0x2F], [0x1F, 0x3F, 0x37], [0x1F, 0x3F, 0x3F],
			[0x1F, 0x37, 0x3F], [0x1F, 0x2F, 0x3F], [0x1F, 0x27, 0x3F],
			[0x2D, 0x2D, 0x3F], [0x31, 0x2D, 0x3F], [0x36, 0x2D, 0x3F],
			[0x3A, 0x2D, 0x3F], [0x3F, 0x2D, 0x3F], [0x3F, 0x2D, 0x3A],
			[0x3F, 0x2D, 0x36], [0x3F, 0x2D, 0x31], [0x3F, 0x2D, 0x2D],
			[0x3F, 0x31, 0x2D], [0x3F, 0x36, 0x2D], [0x3F, 0x3A, 0x2D],
			[0x3F, 0x3F, 0x2D], [0x3A, 0x3F, 0x2D], [0x36, 0x3F, 0x2D],
			[0x31, 0x3F, 0x2D], [0x2D, 0x3F, 0x2D], [0x2D, 0x3F, 0x31],
			[0x2D, 0x3F, 0x36], [0x2D, 0x3F, 0x3A], [0x2D, 0x3F, 0x3F],
			[0x2D, 0x3A, 0x3F], [0x2D, 0x36, 0x3F], [0x2D, 0x31, 0x3F],
		];
		for multiplier in [1.0f64, 0.453, 0.259] {
			for [r, g, b] in HUE_RAMP {
				colors.push(Color::from_vga6(
					(f64::from(r) * multiplier) as u8,
					(f64::from(g) * multiplier) as u8,
					(f64::from(b) * multiplier) as u8,
				));
			}
		}

		while colors.len() < 256 {
			colors.push(Color::rgb(0, 0, 0));
		}
		Self::from_colors(colors)
	}

	/// Loads a VGA palette from raw 6-bit RGB triplets (a `.pal` file).
	///
	/// Short input yields a short palette; trailing bytes that do not form a
	/// complete triplet are ignored.
	pub fn from_vga_pal(data: &[u8]) -> Self {
		Self::from_colors(
			data.chunks_exact(3)
				.map(|c| Color::from_vga6(c[0] & 0x3F, c[1] & 0x3F, c[2] & 0x3F))
				.collect(),
		)
	}

	/// Returns the number of colours in the palette.
	pub fn len(&self) -> usize {
		self.colors.len()
	}

	/// Returns `true` if the palette has no entries.
	pub fn is_empty(&self) -> bool {
		self.colors.is_empty()
	}

	/// Gets a colour by index, or `None` if the index is out of range.
	pub fn get(&self, index: usize) -> Option<Color> {
		self.colors.get(index).copied()
	}

	/// Returns a reference to the colour list.
	pub fn colors(&self) -> &[Color] {
		&self.colors
	}

	/// Returns an iterator over the colours.
	pub fn iter(&self) -> impl Iterator<Item = &Color> {
		self.colors.iter()
	}
}

impl std::ops::Index<usize> for Palette {
	type Output = Color;

	fn index(&self, index: usize) -> &Self::Output {
		&self.colors[index]
	}
}

impl fmt::Display for Palette {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Palette: {} colours", self.colors.len())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_mono() {
		let pal = Palette::default_mono();
		assert_eq!(pal.len(), 2);
		assert_eq!(pal[0], Color::rgb(0, 0, 0));
		assert_eq!(pal[1], Color::rgb(255, 255, 255));
	}

	#[test]
	fn test_full_cga_brown() {
		let pal = Palette::full_cga();
		assert_eq!(pal.len(), 16);
		// Colour 6 has the brown fix applied
		assert_eq!(pal[6], Color::rgb(0xAA, 0x55, 0x00));
		assert_eq!(pal[15], Color::rgb(0xFF, 0xFF, 0xFF));
	}

	#[test]
	fn test_cga_cyan_magenta_bright() {
		let pal = Palette::cga(CgaVariant::CyanMagentaBright as u8);
		assert_eq!(pal.len(), 4);
		assert_eq!(pal[0], Color::rgb(0x00, 0x00, 0x00));
		assert_eq!(pal[1], Color::rgb(0x55, 0xFF, 0xFF)); // light cyan
		assert_eq!(pal[2], Color::rgb(0xFF, 0x55, 0xFF)); // light magenta
		assert_eq!(pal[3], Color::rgb(0xFF, 0xFF, 0xFF)); // white
	}

	#[test]
	fn test_cga_background_selector() {
		let pal = Palette::cga(CgaVariant::GreenRed as u8 | 0x04);
		assert_eq!(pal[0], Palette::full_cga()[4]);
		assert_eq!(pal[1], Color::rgb(0x00, 0xAA, 0x00)); // green
	}

	#[test]
	fn test_full_ega() {
		let pal = Palette::full_ega();
		assert_eq!(pal.len(), 64);
		assert_eq!(pal[0], Color::rgb(0, 0, 0));
		// Entry 7: RGB high bits set, low bits clear
		assert_eq!(pal[7], Color::rgb(0xAA, 0xAA, 0xAA));
		assert_eq!(pal[63], Color::rgb(0xFF, 0xFF, 0xFF));
	}

	#[test]
	fn test_default_ega_bright_half() {
		let pal = Palette::default_ega();
		assert_eq!(pal.len(), 16);
		// Entry 6 is brown, picked from master entry 20
		assert_eq!(pal[6], Palette::full_ega()[20]);
		assert_eq!(pal[8], Color::rgb(0x55, 0x55, 0x55));
		assert_eq!(pal[15], Color::rgb(0xFF, 0xFF, 0xFF));
	}

	#[test]
	fn test_default_vga_greyscale_ramp() {
		let pal = Palette::default_vga();
		assert_eq!(pal.len(), 256);
		// The greyscale ramp starts at 16 with DAC level 0; 6-bit 0x05 sits
		// at index 17 and widens to 0x14.
		assert_eq!(pal[16], Color::rgb(0x00, 0x00, 0x00));
		assert_eq!(pal[17], Color::rgb(0x14, 0x14, 0x14));
		assert_eq!(pal[17].a, 0xFF);
		assert_eq!(pal[31], Color::rgb(0xFF, 0xFF, 0xFF));
	}

	#[test]
	fn test_default_vga_ega_compatible_head() {
		let pal = Palette::default_vga();
		let ega = Palette::default_ega();
		for i in 0..16 {
			assert_eq!(pal[i], ega[i]);
		}
		// Undefined tail is black
		assert_eq!(pal[255], Color::rgb(0, 0, 0));
	}

	#[test]
	fn test_vga6_replication() {
		assert_eq!(Color::from_vga6(0x3F, 0x00, 0x05), Color::rgb(0xFF, 0x00, 0x14));
	}

	#[test]
	fn test_from_vga_pal() {
		let pal = Palette::from_vga_pal(&[0x3F, 0x00, 0x00, 0x00, 0x3F, 0x00]);
		assert_eq!(pal.len(), 2);
		assert_eq!(pal[0], Color::rgb(0xFF, 0x00, 0x00));
		assert_eq!(pal[1], Color::rgb(0x00, 0xFF, 0x00));
	}
}
