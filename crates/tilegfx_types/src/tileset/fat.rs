//! Generic container for tilesets whose tiles sit contiguously in one file.
//!
//! All supported formats share the same shape: an optional file header,
//! then tile data packed back to back until EOF. The differences are how
//! tiles are located (an offset table, a fixed stride, or per-tile size
//! headers) and which pixel codec applies. A [`FatTileset`] carries those
//! differences as a [`FormatConfig`] and implements every container
//! operation once.

use crate::error::TilesetError;
use crate::format::{
	FormatConfig, IndexLayout, OffsetBase, PixelFormat, TileSize, MAX_SANE_TILES,
};
use crate::image::{CgaCodec, LinearCodec, PlanarCodec, Tile};
use crate::palette::Palette;
use crate::store::Store;
use crate::tileset::entry::{TileEntry, TileHandle, TileIndex};

/// One mutable byte attribute stored in the file header.
#[derive(Debug, Clone)]
struct HeaderAttribute {
	offset: usize,
	value: u8,
	changed: bool,
}

/// A tileset backed by a single contiguous file.
#[derive(Debug)]
pub struct FatTileset {
	store: Store,
	index: TileIndex,
	config: FormatConfig,
	palette: Option<Palette>,
	attributes: Vec<HeaderAttribute>,
}

impl FatTileset {
	/// Parses `store` according to `config` and builds the tile index.
	///
	/// # Errors
	///
	/// Fails with [`TilesetError::TruncatedInput`] when the store is shorter
	/// than the format's header, or [`TilesetError::CorruptIndex`] when the
	/// index structure is internally inconsistent.
	pub fn open(
		store: Store,
		config: FormatConfig,
		palette: Option<Palette>,
	) -> Result<Self, TilesetError> {
		let mut tileset = Self {
			store,
			index: TileIndex::new(),
			config,
			palette,
			attributes: Vec::new(),
		};
		tileset.read_index()?;
		tileset.read_attributes()?;
		Ok(tileset)
	}

	/// Creates a new empty tileset of the given format.
	///
	/// Formats with a frozen tile count come into existence already holding
	/// their full complement of blank tiles.
	pub fn create(config: FormatConfig, palette: Option<Palette>) -> Self {
		let mut data = Vec::new();
		match config.layout {
			IndexLayout::Table { .. } => data.extend_from_slice(&0u32.to_le_bytes()),
			IndexLayout::FixedStride { header_len, stride } => {
				data.resize(header_len, 0);
				if config.frozen_count {
					if let Some(capacity) = config.capacity {
						data.resize(header_len + capacity as usize * stride, 0);
					}
				}
			},
			IndexLayout::DimsHeaderWalk => {},
		}
		let mut tileset = Self {
			store: Store::from_bytes(data),
			index: TileIndex::new(),
			config,
			palette,
			attributes: Vec::new(),
		};
		// Both walks cannot fail on a store this function just built.
		let _ = tileset.read_index();
		let _ = tileset.read_attributes();
		tileset
	}

	/// Returns the format description this container was opened with.
	pub fn config(&self) -> &FormatConfig {
		&self.config
	}

	/// Returns the number of tiles.
	pub fn len(&self) -> usize {
		self.index.len()
	}

	/// Returns `true` if the tileset holds no tiles.
	pub fn is_empty(&self) -> bool {
		self.index.is_empty()
	}

	/// Returns the handle of the tile at on-disk position `index`.
	pub fn handle_at(&self, index: usize) -> Option<TileHandle> {
		self.index.handle_at(index)
	}

	/// Returns all handles in on-disk order.
	pub fn handles(&self) -> Vec<TileHandle> {
		(0..self.index.len())
			.filter_map(|i| self.index.handle_at(i))
			.collect()
	}

	/// Resolves a handle to its index entry.
	///
	/// # Errors
	///
	/// Fails with [`TilesetError::InvalidHandle`] if the tile has been
	/// removed or the handle belongs to another tileset.
	pub fn entry(&self, handle: TileHandle) -> Result<&TileEntry, TilesetError> {
		self.index
			.get(handle)
			.filter(|e| e.is_valid())
			.ok_or(TilesetError::InvalidHandle(handle.0))
	}

	/// Tile dimensions shared by every tile, if the format fixes them.
	pub fn dimensions(&self) -> Option<(u32, u32)> {
		self.config.dims
	}

	/// Suggested number of tiles per row for visual arrangement.
	pub fn layout_width(&self) -> u32 {
		self.config.layout_width
	}

	/// Whether every tile must keep its exact on-disk size.
	pub fn is_fixed_size(&self) -> bool {
		matches!(self.config.tile_size, TileSize::Fixed(_))
	}

	/// The palette associated with this tileset, if any.
	pub fn palette(&self) -> Option<&Palette> {
		self.palette.as_ref()
	}

	/// Replaces the associated palette.
	///
	/// The palette lives outside the tileset file, so this only affects
	/// decoding in memory.
	///
	/// # Errors
	///
	/// Fails with [`TilesetError::UnsupportedCapability`] for formats with
	/// no palette association at all.
	pub fn set_palette(&mut self, palette: Palette) -> Result<(), TilesetError> {
		if self.palette.is_none() && !self.config.external_palette {
			return Err(TilesetError::UnsupportedCapability(
				"this format has no palette association",
			));
		}
		self.palette = Some(palette);
		Ok(())
	}

	/// Read-only view of the complete file image.
	pub fn store(&self) -> &Store {
		&self.store
	}

	/// Flushes pending changes and returns the file image.
	pub fn into_store(mut self) -> Store {
		// Flushing attribute bytes cannot fail on an index that was valid
		// at open time.
		let _ = self.flush();
		self.store
	}

	/// Raw stored bytes of one tile, excluding any per-tile header.
	///
	/// # Errors
	///
	/// Fails with [`TilesetError::InvalidHandle`] for a dead handle.
	pub fn open_raw(&self, handle: TileHandle) -> Result<&[u8], TilesetError> {
		let entry = self.entry(handle)?;
		self.store
			.read(entry.offset() + entry.len_header(), entry.real_size())
	}

	/// Replaces the stored bytes of one tile without decoding.
	///
	/// Variable-size formats resize the tile to fit; fixed-size formats
	/// require `bytes` to match the tile's data length exactly.
	///
	/// # Errors
	///
	/// Fails with [`TilesetError::FixedSizeViolation`] when the length
	/// differs in a fixed-size format.
	pub fn write_raw(&mut self, handle: TileHandle, bytes: &[u8]) -> Result<(), TilesetError> {
		let entry = self.entry(handle)?;
		if bytes.len() != entry.real_size() {
			match self.config.tile_size {
				TileSize::Fixed(_) => return Err(TilesetError::FixedSizeViolation),
				TileSize::Variable => self.resize(handle, bytes.len())?,
			}
		}
		let entry = self.entry(handle)?;
		self.store
			.write(entry.offset() + entry.len_header(), bytes)
	}

	/// Decodes one tile into pixels.
	///
	/// # Errors
	///
	/// Fails with [`TilesetError::UnsupportedCapability`] when the format
	/// stores tile data this library cannot decode, or with the codec's own
	/// error when the stored data is too short.
	pub fn open_image(&self, handle: TileHandle) -> Result<Tile, TilesetError> {
		if self.config.pixels == PixelFormat::Opaque {
			return Err(TilesetError::UnsupportedCapability(
				"tile data in this format is compressed",
			));
		}
		let entry = self.entry(handle)?;
		let (width, height) = self.tile_dims(entry)?;
		let raw = self
			.store
			.read(entry.offset() + entry.len_header(), entry.real_size())?;
		match self.config.pixels {
			PixelFormat::Planar(layout) => PlanarCodec::new(width, height, layout).decode(raw),
			PixelFormat::Linear => LinearCodec::new(width, height).decode(raw),
			PixelFormat::Cga => CgaCodec::new(width, height).decode(raw),
			PixelFormat::Opaque => Err(TilesetError::UnsupportedCapability(
				"tile data in this format is compressed",
			)),
		}
	}

	/// Replaces the pixel data of one tile.
	///
	/// For formats where each tile carries its own dimensions the tile may
	/// change size; for all other formats its dimensions must match the
	/// format's.
	///
	/// # Errors
	///
	/// Fails with [`TilesetError::UnsupportedCapability`] for formats whose
	/// tile data is opaque, or [`TilesetError::FixedSizeViolation`] when the
	/// tile's dimensions differ from the format's fixed dimensions.
	pub fn write_image(&mut self, handle: TileHandle, tile: &Tile) -> Result<(), TilesetError> {
		let entry = self.entry(handle)?;
		let offset = entry.offset();
		let len_header = entry.len_header();
		let encoded = match self.config.pixels {
			PixelFormat::Planar(layout) => {
				PlanarCodec::new(tile.width(), tile.height(), layout).encode(tile)?
			},
			PixelFormat::Linear => LinearCodec::new(tile.width(), tile.height()).encode(tile)?,
			PixelFormat::Cga => CgaCodec::new(tile.width(), tile.height()).encode(tile)?,
			PixelFormat::Opaque => {
				return Err(TilesetError::UnsupportedCapability(
					"tile data in this format is compressed",
				));
			},
		};
		if self.config.layout == IndexLayout::DimsHeaderWalk {
			let (Ok(width), Ok(height)) =
				(u16::try_from(tile.width()), u16::try_from(tile.height()))
			else {
				return Err(TilesetError::UnsupportedCapability(
					"tile dimensions exceed a dimension header",
				));
			};
			// Each tile owns its dimensions; resize the stored region and
			// rewrite the size header to match the new image.
			if encoded.len() != self.entry(handle)?.real_size() {
				self.resize(handle, encoded.len())?;
			}
			let offset = self.entry(handle)?.offset();
			self.store.write(offset, &width.to_le_bytes())?;
			self.store.write(offset + 2, &height.to_le_bytes())?;
			return self.store.write(offset + 4, &encoded);
		}
		let (width, height) = self.tile_dims(self.entry(handle)?)?;
		if tile.width() != width || tile.height() != height {
			return Err(TilesetError::FixedSizeViolation);
		}
		self.store.write(offset + len_header, &encoded)
	}

	/// Inserts a blank tile before `before`, or at the end when `before` is
	/// `None`. Returns the handle of the new tile.
	///
	/// For variable-size formats `initial_size` sets the pixel data length
	/// of the new tile; fixed-size formats ignore it. Formats that store
	/// per-tile dimension headers record the new tile as `initial_size` x 1,
	/// so the file image stays a valid tileset even before pixels are
	/// written.
	///
	/// # Errors
	///
	/// Fails with [`TilesetError::FixedSizeViolation`] when the format's
	/// tile count is frozen, or [`TilesetError::CapacityExceeded`] when the
	/// format caps its tile count.
	pub fn insert(
		&mut self,
		before: Option<TileHandle>,
		initial_size: Option<usize>,
	) -> Result<TileHandle, TilesetError> {
		if self.config.frozen_count {
			return Err(TilesetError::FixedSizeViolation);
		}
		if let Some(max) = self.config.capacity {
			if self.index.len() as u32 >= max {
				return Err(TilesetError::CapacityExceeded {
					max,
				});
			}
		}
		let pos = match before {
			Some(handle) => self
				.index
				.position(handle)
				.ok_or(TilesetError::InvalidHandle(handle.0))?,
			None => self.index.len(),
		};
		let real_size = match self.config.tile_size {
			TileSize::Fixed(n) => n,
			TileSize::Variable => initial_size.unwrap_or(0),
		};
		if self.config.layout == IndexLayout::DimsHeaderWalk && real_size > usize::from(u16::MAX) {
			return Err(TilesetError::UnsupportedCapability(
				"tile size exceeds a dimension header",
			));
		}
		let len_header = self.config.len_header;
		let stored_size = len_header + real_size;

		// Grow the index table first so the data shift below lands past it;
		// the extra table slot pushes every data offset up by four bytes.
		let mut data_at = self.data_offset_of(pos);
		if let IndexLayout::Table { .. } = self.config.layout {
			let table_end = 4 + self.index.len() * 4;
			self.store.insert(table_end, 4)?;
			data_at += 4;
		}
		self.store.insert(data_at, stored_size)?;
		if self.config.layout == IndexLayout::DimsHeaderWalk && real_size > 0 {
			// A new tile of n bytes is recorded as n x 1 so the size header
			// agrees with the data that follows it.
			self.store.write(data_at, &(real_size as u16).to_le_bytes())?;
			self.store.write(data_at + 2, &1u16.to_le_bytes())?;
		}
		let handle = self
			.index
			.insert_at(pos, stored_size, real_size, len_header);
		self.rebuild_offsets();
		self.write_table()?;
		Ok(handle)
	}

	/// Removes one tile, closing the gap it leaves.
	///
	/// # Errors
	///
	/// Fails with [`TilesetError::FixedSizeViolation`] when the format's
	/// tile count is frozen, or [`TilesetError::InvalidHandle`] for a dead
	/// handle.
	pub fn remove(&mut self, handle: TileHandle) -> Result<(), TilesetError> {
		if self.config.frozen_count {
			return Err(TilesetError::FixedSizeViolation);
		}
		let pos = self
			.index
			.position(handle)
			.ok_or(TilesetError::InvalidHandle(handle.0))?;
		let entry = self.index.remove_at(pos);
		self.store.remove(entry.offset(), entry.stored_size())?;
		if let IndexLayout::Table { .. } = self.config.layout {
			// Data is gone; drop the now-surplus last table slot.
			let table_end = 4 + self.index.len() * 4;
			self.store.remove(table_end, 4)?;
		}
		self.rebuild_offsets();
		self.write_table()?;
		Ok(())
	}

	/// Exchanges the on-disk positions of two tiles.
	///
	/// Both handles keep resolving to the same tile content afterwards; only
	/// the on-disk order (and, for unequal sizes, the offsets of everything
	/// between them) changes. Works on frozen-count formats too, since the
	/// tile count is unaffected.
	///
	/// # Errors
	///
	/// Fails with [`TilesetError::InvalidHandle`] if either handle is dead.
	pub fn swap(&mut self, a: TileHandle, b: TileHandle) -> Result<(), TilesetError> {
		let pos_a = self
			.index
			.position(a)
			.ok_or(TilesetError::InvalidHandle(a.0))?;
		let pos_b = self
			.index
			.position(b)
			.ok_or(TilesetError::InvalidHandle(b.0))?;
		if pos_a == pos_b {
			return Ok(());
		}
		let (lo, hi) = if pos_a < pos_b {
			(pos_a, pos_b)
		} else {
			(pos_b, pos_a)
		};
		let first = self.index.entries()[lo].clone();
		let second = self.index.entries()[hi].clone();
		let first_bytes = self.store.read(first.offset(), first.stored_size())?.to_vec();
		let second_bytes = self
			.store
			.read(second.offset(), second.stored_size())?
			.to_vec();

		// Replace the higher range first so the lower offsets stay valid.
		self.store.remove(second.offset(), second.stored_size())?;
		self.store.insert(second.offset(), first_bytes.len())?;
		self.store.write(second.offset(), &first_bytes)?;
		self.store.remove(first.offset(), first.stored_size())?;
		self.store.insert(first.offset(), second_bytes.len())?;
		self.store.write(first.offset(), &second_bytes)?;

		self.index.swap_at(lo, hi);
		self.rebuild_offsets();
		self.write_table()?;
		Ok(())
	}

	/// Changes the pixel data length of one tile, zero-filling on growth.
	///
	/// # Errors
	///
	/// Fails with [`TilesetError::FixedSizeViolation`] for fixed-size
	/// formats unless `new_len` equals the fixed length (a no-op).
	pub fn resize(&mut self, handle: TileHandle, new_len: usize) -> Result<(), TilesetError> {
		let entry = self.entry(handle)?;
		if let TileSize::Fixed(n) = self.config.tile_size {
			if new_len == n {
				return Ok(());
			}
			return Err(TilesetError::FixedSizeViolation);
		}
		let offset = entry.offset();
		let len_header = entry.len_header();
		let old_len = entry.real_size();
		if new_len > old_len {
			self.store
				.insert(offset + len_header + old_len, new_len - old_len)?;
		} else if new_len < old_len {
			self.store
				.remove(offset + len_header + new_len, old_len - new_len)?;
		} else {
			return Ok(());
		}
		if let Some(e) = self.index.get_mut(handle) {
			e.real_size = new_len;
			e.stored_size = len_header + new_len;
		}
		self.rebuild_offsets();
		self.write_table()?;
		Ok(())
	}

	/// Number of one-byte attributes stored in the file header.
	pub fn attribute_count(&self) -> usize {
		self.attributes.len()
	}

	/// Human-readable name of one header attribute.
	pub fn attribute_name(&self, index: usize) -> Option<&'static str> {
		self.config.attribute_names.get(index).copied()
	}

	/// Reads one header attribute.
	///
	/// # Errors
	///
	/// Fails with [`TilesetError::UnsupportedCapability`] when `index` is
	/// out of range for this format.
	pub fn attribute(&self, index: usize) -> Result<u8, TilesetError> {
		self.attributes
			.get(index)
			.map(|a| a.value)
			.ok_or(TilesetError::UnsupportedCapability("no such attribute"))
	}

	/// Updates one header attribute. The change is held in memory until
	/// [`FatTileset::flush`].
	///
	/// # Errors
	///
	/// Fails with [`TilesetError::UnsupportedCapability`] when `index` is
	/// out of range for this format.
	pub fn set_attribute(&mut self, index: usize, value: u8) -> Result<(), TilesetError> {
		let attr = self
			.attributes
			.get_mut(index)
			.ok_or(TilesetError::UnsupportedCapability("no such attribute"))?;
		if attr.value != value {
			attr.value = value;
			attr.changed = true;
		}
		Ok(())
	}

	/// Writes pending header attribute changes back to the store.
	///
	/// Structural changes (insert, remove, resize, pixel writes) are
	/// applied immediately; only attribute bytes are deferred, so calling
	/// this twice in a row is a no-op the second time.
	pub fn flush(&mut self) -> Result<(), TilesetError> {
		for i in 0..self.attributes.len() {
			if self.attributes[i].changed {
				let (offset, value) = (self.attributes[i].offset, self.attributes[i].value);
				self.store.write(offset, &[value])?;
				self.attributes[i].changed = false;
			}
		}
		Ok(())
	}

	/// Flushes and writes the file image to disk.
	///
	/// # Errors
	///
	/// Returns an error if the file cannot be written.
	pub fn save(&mut self, path: impl AsRef<std::path::Path>) -> Result<(), TilesetError> {
		self.flush()?;
		self.store.save(path)
	}

	// Index construction ------------------------------------------------

	fn read_index(&mut self) -> Result<(), TilesetError> {
		match self.config.layout {
			IndexLayout::Table { base } => self.read_table_index(base),
			IndexLayout::FixedStride { header_len, stride } => {
				self.read_stride_index(header_len, stride)
			},
			IndexLayout::DimsHeaderWalk => self.read_header_walk_index(),
		}
	}

	fn read_table_index(&mut self, base: OffsetBase) -> Result<(), TilesetError> {
		let count = self.store.read_u32le(0)?;
		if count > MAX_SANE_TILES {
			return Err(TilesetError::corrupt(format!(
				"tile count {count} above safety limit {MAX_SANE_TILES}"
			)));
		}
		let table_end = 4 + count as usize * 4;
		if self.store.size() < table_end {
			return Err(TilesetError::truncated(table_end, self.store.size()));
		}
		let mut offsets = Vec::with_capacity(count as usize);
		for i in 0..count as usize {
			let raw = self.store.read_u32le(4 + i * 4)? as usize;
			let absolute = match base {
				OffsetBase::Absolute => raw,
				OffsetBase::FromEndOfTable => table_end + raw,
			};
			offsets.push(absolute);
		}
		for i in 0..offsets.len() {
			let offset = offsets[i];
			let end = if i + 1 < offsets.len() {
				offsets[i + 1]
			} else {
				self.store.size()
			};
			// Tile data must start exactly at the end of the table and run
			// contiguously; sizes are derived from the following offset.
			if i == 0 && offset != table_end {
				return Err(TilesetError::corrupt(format!(
					"first tile at {offset}, expected {table_end}"
				)));
			}
			if offset < table_end || end < offset || end > self.store.size() {
				return Err(TilesetError::corrupt(format!(
					"tile {i} spans {offset}..{end} outside {table_end}..{}",
					self.store.size()
				)));
			}
			let stored = end - offset;
			let len_header = self.config.len_header;
			if stored < len_header {
				return Err(TilesetError::corrupt(format!(
					"tile {i} is {stored} bytes, shorter than its {len_header} byte header"
				)));
			}
			self.index.push(offset, stored, stored - len_header, len_header);
		}
		Ok(())
	}

	fn read_stride_index(&mut self, header_len: usize, stride: usize) -> Result<(), TilesetError> {
		if self.store.size() < header_len {
			return Err(TilesetError::truncated(header_len, self.store.size()));
		}
		let body = self.store.size() - header_len;
		let count = body / stride;
		if count > MAX_SANE_TILES as usize {
			return Err(TilesetError::corrupt(format!(
				"tile count {count} above safety limit {MAX_SANE_TILES}"
			)));
		}
		// Trailing bytes short of a full stride are ignored; some shipped
		// files carry a stray final byte.
		for i in 0..count {
			let offset = header_len + i * stride;
			let len_header = self.config.len_header;
			self.index
				.push(offset, stride, stride - len_header, len_header);
		}
		Ok(())
	}

	fn read_header_walk_index(&mut self) -> Result<(), TilesetError> {
		let mut pos = 0usize;
		while pos < self.store.size() {
			if self.index.len() as u32 >= MAX_SANE_TILES {
				return Err(TilesetError::corrupt(format!(
					"tile count above safety limit {MAX_SANE_TILES}"
				)));
			}
			let width = self.store.read_u16le(pos)? as usize;
			let height = self.store.read_u16le(pos + 2)? as usize;
			let real = width * height;
			let stored = 4 + real;
			if pos + stored > self.store.size() {
				return Err(TilesetError::corrupt(format!(
					"tile {} spans past end of file",
					self.index.len()
				)));
			}
			self.index.push(pos, stored, real, 4);
			pos += stored;
		}
		Ok(())
	}

	fn read_attributes(&mut self) -> Result<(), TilesetError> {
		self.attributes.clear();
		for i in 0..self.config.attribute_names.len() {
			let value = self.store.read(i, 1)?[0];
			self.attributes.push(HeaderAttribute {
				offset: i,
				value,
				changed: false,
			});
		}
		Ok(())
	}

	// Offset bookkeeping ------------------------------------------------

	/// Byte position where the tile at on-disk position `pos` starts (or
	/// would start, for `pos == len`), derived from the current index.
	fn data_offset_of(&self, pos: usize) -> usize {
		let first = match self.config.layout {
			IndexLayout::Table { .. } => 4 + self.index.len() * 4,
			IndexLayout::FixedStride { header_len, .. } => header_len,
			IndexLayout::DimsHeaderWalk => 0,
		};
		first
			+ self.index.entries()[..pos]
				.iter()
				.map(TileEntry::stored_size)
				.sum::<usize>()
	}

	/// Recomputes every entry's offset from the table geometry and the
	/// stored sizes, in on-disk order.
	fn rebuild_offsets(&mut self) {
		let first = match self.config.layout {
			IndexLayout::Table { .. } => 4 + self.index.len() * 4,
			IndexLayout::FixedStride { header_len, .. } => header_len,
			IndexLayout::DimsHeaderWalk => 0,
		};
		let mut offset = first;
		for i in 0..self.index.len() {
			if let Some(handle) = self.index.handle_at(i) {
				if let Some(entry) = self.index.get_mut(handle) {
					entry.offset = offset;
					offset += entry.stored_size;
				}
			}
		}
		debug_assert!(self.index.is_contiguous());
	}

	/// Rewrites the count field and the full offset table from the index.
	fn write_table(&mut self) -> Result<(), TilesetError> {
		let IndexLayout::Table { base } = self.config.layout else {
			return Ok(());
		};
		let count = self.index.len() as u32;
		self.store.write_u32le(0, count)?;
		let table_end = 4 + count as usize * 4;
		for (i, entry) in self.index.entries().iter().enumerate() {
			let stored = match base {
				OffsetBase::Absolute => entry.offset() as u32,
				OffsetBase::FromEndOfTable => (entry.offset() - table_end) as u32,
			};
			self.store.write_u32le(4 + i * 4, stored)?;
		}
		Ok(())
	}

	fn tile_dims(&self, entry: &TileEntry) -> Result<(u32, u32), TilesetError> {
		if let Some(dims) = self.config.dims {
			return Ok(dims);
		}
		// Per-tile dimensions live in the tile's own header.
		let width = self.store.read_u16le(entry.offset())?;
		let height = self.store.read_u16le(entry.offset() + 2)?;
		Ok((u32::from(width), u32::from(height)))
	}
}
