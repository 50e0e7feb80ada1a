//! Tile index entries and the ordered collection that owns them.

/// Stable, copyable identifier for one tile.
///
/// Handles survive inserts and removals of other tiles: they are arena ids,
/// not positions, so reshuffling the index never invalidates a handle the
/// caller still holds. A handle whose tile has been removed simply stops
/// resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileHandle(pub(crate) u32);

/// The location of one tile within the backing store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileEntry {
	pub(crate) id: u32,
	pub(crate) index: u32,
	pub(crate) offset: usize,
	pub(crate) stored_size: usize,
	pub(crate) real_size: usize,
	pub(crate) len_header: usize,
	pub(crate) valid: bool,
}

impl TileEntry {
	/// Position of the tile in on-disk order (0-based).
	pub fn index(&self) -> u32 {
		self.index
	}

	/// Absolute byte offset of the tile within the backing store, including
	/// any per-tile header.
	pub fn offset(&self) -> usize {
		self.offset
	}

	/// On-disk footprint of the tile in bytes (header included).
	pub fn stored_size(&self) -> usize {
		self.stored_size
	}

	/// Size of the tile's pixel data in bytes, excluding any per-tile header.
	pub fn real_size(&self) -> usize {
		self.real_size
	}

	/// Length of the per-tile header preceding the pixel data, in bytes.
	pub fn len_header(&self) -> usize {
		self.len_header
	}

	/// Whether the entry refers to live data.
	pub fn is_valid(&self) -> bool {
		self.valid
	}
}

/// The ordered collection of tile entries for one container.
///
/// Insertion order equals on-disk order; entries stay sorted by ascending
/// offset. The index is the single source of truth for where each tile
/// lives; structural changes go through the container, which re-derives
/// every affected offset before returning.
#[derive(Debug, Clone, Default)]
pub struct TileIndex {
	entries: Vec<TileEntry>,
	next_id: u32,
}

impl TileIndex {
	/// Creates an empty index.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the number of entries.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns `true` if the index has no entries.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Returns the entries in on-disk order.
	pub fn entries(&self) -> &[TileEntry] {
		&self.entries
	}

	/// Returns the handle of the entry at on-disk position `index`.
	pub fn handle_at(&self, index: usize) -> Option<TileHandle> {
		self.entries.get(index).map(|e| TileHandle(e.id))
	}

	/// Resolves a handle to its current on-disk position.
	pub fn position(&self, handle: TileHandle) -> Option<usize> {
		self.entries.iter().position(|e| e.id == handle.0)
	}

	/// Resolves a handle to its entry.
	pub fn get(&self, handle: TileHandle) -> Option<&TileEntry> {
		self.entries.iter().find(|e| e.id == handle.0)
	}

	pub(crate) fn get_mut(&mut self, handle: TileHandle) -> Option<&mut TileEntry> {
		self.entries.iter_mut().find(|e| e.id == handle.0)
	}

	/// Appends an entry during container open. Offsets are taken as given;
	/// the caller has already validated them.
	pub(crate) fn push(
		&mut self,
		offset: usize,
		stored_size: usize,
		real_size: usize,
		len_header: usize,
	) -> TileHandle {
		let id = self.alloc_id();
		let index = self.entries.len() as u32;
		self.entries.push(TileEntry {
			id,
			index,
			offset,
			stored_size,
			real_size,
			len_header,
			valid: true,
		});
		TileHandle(id)
	}

	/// Inserts a fresh entry at on-disk position `pos`. The offset is a
	/// placeholder until the container re-derives all offsets.
	pub(crate) fn insert_at(
		&mut self,
		pos: usize,
		stored_size: usize,
		real_size: usize,
		len_header: usize,
	) -> TileHandle {
		let id = self.alloc_id();
		self.entries.insert(pos, TileEntry {
			id,
			index: pos as u32,
			offset: 0,
			stored_size,
			real_size,
			len_header,
			valid: true,
		});
		self.reindex();
		TileHandle(id)
	}

	/// Exchanges the on-disk positions of two entries.
	pub(crate) fn swap_at(&mut self, a: usize, b: usize) {
		self.entries.swap(a, b);
		self.reindex();
	}

	/// Removes the entry at on-disk position `pos`.
	pub(crate) fn remove_at(&mut self, pos: usize) -> TileEntry {
		let entry = self.entries.remove(pos);
		self.reindex();
		entry
	}

	/// Recomputes the `index` field of every entry after a structural change.
	fn reindex(&mut self) {
		for (i, entry) in self.entries.iter_mut().enumerate() {
			entry.index = i as u32;
		}
	}

	/// Verifies ascending, contiguous offsets (used by debug assertions and
	/// tests).
	pub fn is_contiguous(&self) -> bool {
		self.entries
			.windows(2)
			.all(|w| w[0].offset + w[0].stored_size == w[1].offset)
	}

	fn alloc_id(&mut self) -> u32 {
		let id = self.next_id;
		self.next_id += 1;
		id
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_handles_survive_removal() {
		let mut index = TileIndex::new();
		let a = index.push(0, 64, 64, 0);
		let b = index.push(64, 64, 64, 0);
		let c = index.push(128, 64, 64, 0);

		index.remove_at(index.position(b).unwrap());

		assert_eq!(index.position(a), Some(0));
		assert_eq!(index.position(b), None);
		assert_eq!(index.position(c), Some(1));
		assert_eq!(index.get(c).unwrap().index(), 1);
	}

	#[test]
	fn test_insert_reindexes() {
		let mut index = TileIndex::new();
		index.push(0, 10, 10, 0);
		let b = index.push(10, 10, 10, 0);
		index.insert_at(1, 10, 10, 0);
		assert_eq!(index.len(), 3);
		assert_eq!(index.position(b), Some(2));
		assert_eq!(index.entries()[1].index(), 1);
	}

	#[test]
	fn test_contiguity_check() {
		let mut index = TileIndex::new();
		index.push(4, 64, 64, 0);
		index.push(68, 32, 32, 0);
		assert!(index.is_contiguous());
		index.push(200, 8, 8, 0);
		assert!(!index.is_contiguous());
	}
}
