//! Error types for tileset parsing and manipulation.

use thiserror::Error;

/// Errors that can occur when opening or manipulating a tileset.
#[derive(Debug, Error)]
pub enum TilesetError {
	/// The backing store is shorter than a structurally required minimum.
	#[error("truncated input: expected at least {expected} bytes, got {actual} bytes")]
	TruncatedInput {
		/// Minimum number of bytes required
		expected: usize,
		/// Actual number of bytes available
		actual: usize,
	},

	/// The on-disk index table is structurally invalid (non-monotonic or
	/// out-of-range offsets, or a tile count above the format's safety ceiling).
	#[error("corrupt index: {0}")]
	CorruptIndex(String),

	/// The operation targets a tile that is not present in the index.
	#[error("invalid tile handle {0}")]
	InvalidHandle(u32),

	/// A resize, insert or remove was attempted on a format that forbids it.
	#[error("tiles in this tileset are a fixed size")]
	FixedSizeViolation,

	/// An insert would exceed the format's maximum tile count.
	#[error("tile count limit of {max} exceeded")]
	CapacityExceeded {
		/// Format-defined maximum number of tiles
		max: u32,
	},

	/// A mask, palette or image operation was requested on a format lacking it.
	#[error("operation not supported by this format: {0}")]
	UnsupportedCapability(&'static str),

	/// Backing store I/O failure.
	#[error(transparent)]
	Io(#[from] std::io::Error),
}

impl TilesetError {
	/// Shorthand for a [`TilesetError::TruncatedInput`].
	pub fn truncated(expected: usize, actual: usize) -> Self {
		Self::TruncatedInput {
			expected,
			actual,
		}
	}

	/// Shorthand for a [`TilesetError::CorruptIndex`].
	pub fn corrupt(msg: impl Into<String>) -> Self {
		Self::CorruptIndex(msg.into())
	}
}
