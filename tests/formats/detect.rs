//! Cross-format detection checks over the whole registry.

use tilegfx_rs::format::{registry, Certainty, MAX_SANE_TILES};

/// An empty offset-table tileset: just a zero count.
const EMPTY_TABLE: &[u8] = &[0, 0, 0, 0];

#[test]
fn test_registry_codes_unique() {
	let registry = registry();
	for (i, a) in registry.iter().enumerate() {
		for b in &registry[i + 1..] {
			assert_ne!(a.code, b.code);
		}
	}
}

#[test]
fn test_detection_never_panics_on_noise() {
	// Arbitrary short and misaligned inputs must always produce a verdict.
	let samples: [&[u8]; 6] = [
		&[],
		&[0x00],
		&[0xFF; 3],
		&[0x12, 0x34, 0x56, 0x78, 0x9A],
		EMPTY_TABLE,
		&[0xFF; 129],
	];
	for desc in registry() {
		for sample in samples {
			let _ = (desc.is_instance)(sample);
		}
	}
}

#[test]
fn test_detection_is_deterministic() {
	let mut data = 2u32.to_le_bytes().to_vec();
	data.extend_from_slice(&12u32.to_le_bytes());
	data.extend_from_slice(&76u32.to_le_bytes());
	data.extend_from_slice(&[0u8; 128]);
	for desc in registry() {
		let first = (desc.is_instance)(&data);
		assert_eq!((desc.is_instance)(&data), first, "{}", desc.code);
	}
}

#[test]
fn test_table_formats_reject_insane_counts() {
	let data = (MAX_SANE_TILES + 1).to_le_bytes().to_vec();
	for desc in registry() {
		if desc.code.starts_with("tls-ddave") || desc.code == "tls-zone66" {
			assert_eq!(
				(desc.is_instance)(&data),
				Certainty::DefinitelyNo,
				"{}",
				desc.code
			);
		}
	}
}

#[test]
fn test_fixed_length_formats_are_mutually_exclusive() {
	// A Monster Bash background file matches no other fixed-length format.
	let bash_bg = vec![0u8; 511 * 128];
	let mut verdicts = Vec::new();
	for desc in registry() {
		if (desc.is_instance)(&bash_bg) != Certainty::DefinitelyNo {
			verdicts.push(desc.code);
		}
	}
	assert_eq!(verdicts, ["tls-bash-bg"]);
}
