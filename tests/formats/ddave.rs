//! Dangerous Dave CGA container tests.
//!
//! Every mutation is checked against the complete expected file image, so
//! table rewrites, tile shifts and count updates are all covered at once.

use tilegfx_rs::format::ddave;
use tilegfx_rs::format::Certainty;
use tilegfx_rs::prelude::*;

/// A 16x16 CGA tile: a distinctive first and last row around a hollow
/// rectangle. `first` and `last` vary per tile so misplaced tiles are
/// caught.
fn tile(first: u8, last: u8) -> Vec<u8> {
	let mut out = vec![first, 0xFF, 0xFF, 0xFF];
	for _ in 0..14 {
		out.extend_from_slice(&[0x40, 0x00, 0x00, 0x02]);
	}
	out.extend_from_slice(&[0x6A, 0xAA, 0xAA, last]);
	out
}

fn tile1() -> Vec<u8> {
	tile(0xCF, 0xA1)
}

fn tile2() -> Vec<u8> {
	tile(0xDF, 0xA5)
}

fn tile3() -> Vec<u8> {
	tile(0xEF, 0xA9)
}

fn tile4() -> Vec<u8> {
	tile(0xFF, 0xAD)
}

fn build(offsets: &[u32], tiles: &[Vec<u8>]) -> Vec<u8> {
	let mut out = (tiles.len() as u32).to_le_bytes().to_vec();
	for o in offsets {
		out.extend_from_slice(&o.to_le_bytes());
	}
	for t in tiles {
		out.extend_from_slice(t);
	}
	out
}

fn initial_state() -> Vec<u8> {
	build(&[0x0C, 0x4C], &[tile1(), tile2()])
}

fn open_initial() -> FatTileset {
	ddave::open_cga(Store::from_bytes(initial_state()), None).unwrap()
}

#[test]
fn test_is_instance_initial_state() {
	assert_eq!(
		ddave::is_instance_cga(&initial_state()),
		Certainty::DefinitelyYes
	);
}

#[test]
fn test_is_instance_too_short() {
	assert_eq!(
		ddave::is_instance_cga(&[0x00, 0x00]),
		Certainty::DefinitelyNo
	);
}

#[test]
fn test_is_instance_garbage_count() {
	let mut data = initial_state();
	// Count field overwritten with a huge value.
	data[0] = 0xFF;
	data[1] = 0xFF;
	data[2] = 0x01;
	data[3] = 0x00;
	assert_eq!(ddave::is_instance_cga(&data), Certainty::DefinitelyNo);
}

#[test]
fn test_open_and_decode() {
	let ts = open_initial();
	assert_eq!(ts.len(), 2);
	assert_eq!(ts.dimensions(), Some((16, 16)));

	// 0xDF unpacks to pixel values 3,1,3,3.
	let t2 = ts.open_image(ts.handle_at(1).unwrap()).unwrap();
	assert_eq!(t2.get_pixel(0, 0), 3);
	assert_eq!(t2.get_pixel(1, 0), 1);
	assert_eq!(t2.get_pixel(2, 0), 3);
}

#[test]
fn test_insert_at_end() {
	let mut ts = open_initial();
	let h = ts.insert(None, None).unwrap();
	ts.write_raw(h, &tile3()).unwrap();
	assert_eq!(
		ts.store().as_bytes(),
		build(&[0x10, 0x50, 0x90], &[tile1(), tile2(), tile3()])
	);
}

#[test]
fn test_insert_in_middle() {
	let mut ts = open_initial();
	let second = ts.handle_at(1).unwrap();
	let h = ts.insert(Some(second), None).unwrap();
	ts.write_raw(h, &tile3()).unwrap();
	assert_eq!(
		ts.store().as_bytes(),
		build(&[0x10, 0x50, 0x90], &[tile1(), tile3(), tile2()])
	);
	// The displaced tile keeps its handle and data.
	assert_eq!(ts.open_raw(second).unwrap(), tile2());
}

#[test]
fn test_insert_twice() {
	let mut ts = open_initial();
	let second = ts.handle_at(1).unwrap();
	let h3 = ts.insert(Some(second), None).unwrap();
	ts.write_raw(h3, &tile3()).unwrap();
	let h4 = ts.insert(Some(second), None).unwrap();
	ts.write_raw(h4, &tile4()).unwrap();
	assert_eq!(
		ts.store().as_bytes(),
		build(
			&[0x14, 0x54, 0x94, 0xD4],
			&[tile1(), tile3(), tile4(), tile2()]
		)
	);
}

#[test]
fn test_swap_reorders_in_place() {
	let mut ts = open_initial();
	let first = ts.handle_at(0).unwrap();
	let second = ts.handle_at(1).unwrap();
	ts.swap(first, second).unwrap();
	assert_eq!(
		ts.store().as_bytes(),
		build(&[0x0C, 0x4C], &[tile2(), tile1()])
	);
	// Handles track their tiles across the reorder.
	assert_eq!(ts.open_raw(first).unwrap(), tile1());
	assert_eq!(ts.entry(first).unwrap().index(), 1);
}

#[test]
fn test_remove_first() {
	let mut ts = open_initial();
	let first = ts.handle_at(0).unwrap();
	ts.remove(first).unwrap();
	assert_eq!(ts.store().as_bytes(), build(&[0x08], &[tile2()]));

	let last = ts.handle_at(0).unwrap();
	ts.remove(last).unwrap();
	assert_eq!(ts.store().as_bytes(), &0u32.to_le_bytes());
	assert!(ts.is_empty());
}

#[test]
fn test_insert_then_remove() {
	let mut ts = open_initial();
	let first = ts.handle_at(0).unwrap();
	let h = ts.insert(Some(first), None).unwrap();
	ts.write_raw(h, &tile3()).unwrap();
	ts.remove(first).unwrap();
	assert_eq!(
		ts.store().as_bytes(),
		build(&[0x0C, 0x4C], &[tile3(), tile2()])
	);
}

#[test]
fn test_fixed_size_enforced() {
	let mut ts = open_initial();
	let h = ts.handle_at(0).unwrap();
	assert!(matches!(
		ts.resize(h, 65),
		Err(TilesetError::FixedSizeViolation)
	));
	assert!(matches!(
		ts.write_raw(h, &[0u8; 63]),
		Err(TilesetError::FixedSizeViolation)
	));
	// Resizing to the fixed size is a no-op.
	ts.resize(h, 64).unwrap();
	assert_eq!(ts.store().as_bytes(), initial_state());
}

#[test]
fn test_image_roundtrip_preserves_bytes() {
	let mut ts = open_initial();
	let h = ts.handle_at(0).unwrap();
	let decoded = ts.open_image(h).unwrap();
	ts.write_image(h, &decoded).unwrap();
	assert_eq!(ts.store().as_bytes(), initial_state());
}
