//! Random-access byte store backing a tileset.
//!
//! A [`Store`] owns the complete on-disk byte image of one tileset file and
//! offers the structural primitives the container layer needs: bounds-checked
//! reads and writes, and grow/shrink operations that shift the tail of the
//! file. A store is exclusively owned by one container for its lifetime;
//! there is no shared access.

use std::io::Read;
use std::path::Path;

use crate::error::TilesetError;

/// Exclusively-owned, in-memory byte store.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Store {
	data: Vec<u8>,
}

impl Store {
	/// Creates a new empty store.
	pub fn new() -> Self {
		Self {
			data: Vec::new(),
		}
	}

	/// Creates a store from existing file content.
	pub fn from_bytes(data: impl Into<Vec<u8>>) -> Self {
		Self {
			data: data.into(),
		}
	}

	/// Loads a store from a file on disk.
	///
	/// # Errors
	///
	/// Returns an error if the file cannot be opened or read.
	pub fn open(path: impl AsRef<Path>) -> Result<Self, TilesetError> {
		Ok(Self {
			data: std::fs::read(path)?,
		})
	}

	/// Loads a store from any reader.
	///
	/// # Errors
	///
	/// Returns an error if the reader fails.
	pub fn from_reader<R: Read>(reader: &mut R) -> Result<Self, TilesetError> {
		let mut data = Vec::new();
		reader.read_to_end(&mut data)?;
		Ok(Self {
			data,
		})
	}

	/// Writes the store back to a file on disk.
	///
	/// # Errors
	///
	/// Returns an error if the file cannot be written.
	pub fn save(&self, path: impl AsRef<Path>) -> Result<(), TilesetError> {
		std::fs::write(path, &self.data)?;
		Ok(())
	}

	/// Returns the total size in bytes.
	pub fn size(&self) -> usize {
		self.data.len()
	}

	/// Returns the complete content as a byte slice.
	pub fn as_bytes(&self) -> &[u8] {
		&self.data
	}

	/// Consumes the store and returns its content.
	pub fn into_bytes(self) -> Vec<u8> {
		self.data
	}

	/// Reads `len` bytes starting at `offset`.
	///
	/// # Errors
	///
	/// Fails with [`TilesetError::TruncatedInput`] if the range extends past
	/// the end of the store.
	pub fn read(&self, offset: usize, len: usize) -> Result<&[u8], TilesetError> {
		let end = offset.checked_add(len).ok_or_else(|| {
			TilesetError::corrupt(format!("byte range {offset}+{len} overflows"))
		})?;
		if end > self.data.len() {
			return Err(TilesetError::truncated(end, self.data.len()));
		}
		Ok(&self.data[offset..end])
	}

	/// Reads a little-endian u32 at `offset`.
	///
	/// # Errors
	///
	/// Fails with [`TilesetError::TruncatedInput`] if fewer than four bytes
	/// remain at `offset`.
	pub fn read_u32le(&self, offset: usize) -> Result<u32, TilesetError> {
		let b = self.read(offset, 4)?;
		Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
	}

	/// Reads a little-endian u16 at `offset`.
	///
	/// # Errors
	///
	/// Fails with [`TilesetError::TruncatedInput`] if fewer than two bytes
	/// remain at `offset`.
	pub fn read_u16le(&self, offset: usize) -> Result<u16, TilesetError> {
		let b = self.read(offset, 2)?;
		Ok(u16::from_le_bytes([b[0], b[1]]))
	}

	/// Overwrites bytes starting at `offset` without changing the store size.
	///
	/// # Errors
	///
	/// Fails with [`TilesetError::TruncatedInput`] if the range extends past
	/// the end of the store.
	pub fn write(&mut self, offset: usize, bytes: &[u8]) -> Result<(), TilesetError> {
		let end = offset + bytes.len();
		if end > self.data.len() {
			return Err(TilesetError::truncated(end, self.data.len()));
		}
		self.data[offset..end].copy_from_slice(bytes);
		Ok(())
	}

	/// Overwrites a little-endian u32 at `offset`.
	///
	/// # Errors
	///
	/// Fails with [`TilesetError::TruncatedInput`] if fewer than four bytes
	/// remain at `offset`.
	pub fn write_u32le(&mut self, offset: usize, value: u32) -> Result<(), TilesetError> {
		self.write(offset, &value.to_le_bytes())
	}

	/// Grows the store by `len` zero bytes at `offset`, shifting the tail
	/// forward.
	///
	/// # Errors
	///
	/// Fails with [`TilesetError::TruncatedInput`] if `offset` is past the end
	/// of the store.
	pub fn insert(&mut self, offset: usize, len: usize) -> Result<(), TilesetError> {
		if offset > self.data.len() {
			return Err(TilesetError::truncated(offset, self.data.len()));
		}
		self.data.splice(offset..offset, std::iter::repeat_n(0u8, len));
		Ok(())
	}

	/// Shrinks the store by removing `len` bytes at `offset`, shifting the
	/// tail backward.
	///
	/// # Errors
	///
	/// Fails with [`TilesetError::TruncatedInput`] if the range extends past
	/// the end of the store.
	pub fn remove(&mut self, offset: usize, len: usize) -> Result<(), TilesetError> {
		let end = offset + len;
		if end > self.data.len() {
			return Err(TilesetError::truncated(end, self.data.len()));
		}
		self.data.drain(offset..end);
		Ok(())
	}

	/// Truncates or zero-extends the store to exactly `new_len` bytes.
	pub fn truncate(&mut self, new_len: usize) {
		self.data.resize(new_len, 0);
	}
}

impl From<Vec<u8>> for Store {
	fn from(data: Vec<u8>) -> Self {
		Self::from_bytes(data)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_read_write() {
		let mut store = Store::from_bytes(vec![0u8; 8]);
		store.write_u32le(2, 0x0403_0201).unwrap();
		assert_eq!(store.read_u32le(2).unwrap(), 0x0403_0201);
		assert_eq!(store.read(0, 2).unwrap(), &[0, 0]);
	}

	#[test]
	fn test_read_past_end() {
		let store = Store::from_bytes(vec![1, 2, 3]);
		assert!(matches!(
			store.read(2, 4),
			Err(TilesetError::TruncatedInput { expected: 6, actual: 3 })
		));
	}

	#[test]
	fn test_insert_shifts_tail() {
		let mut store = Store::from_bytes(vec![1, 2, 3, 4]);
		store.insert(2, 2).unwrap();
		assert_eq!(store.as_bytes(), &[1, 2, 0, 0, 3, 4]);
	}

	#[test]
	fn test_remove_shifts_tail() {
		let mut store = Store::from_bytes(vec![1, 2, 3, 4, 5]);
		store.remove(1, 3).unwrap();
		assert_eq!(store.as_bytes(), &[1, 5]);
	}
}
