//! Tileset CLI utility.
//!
//! A command-line tool for inspecting and exporting DOS game tilesets.
//!
//! # Features
//!
//! - **detect**: Probe a file against every known format
//! - **info**: Show the tile table and header attributes of a tileset
//! - **export**: Write each tile out as a PNG image
//! - **dump**: Hex-dump the raw stored bytes of one tile
//!
//! # Usage Examples
//!
//! ```bash
//! # Which formats could this file be?
//! tilegfx detect EGADAVE.DAV
//!
//! # Tile table as JSON
//! tilegfx info EGADAVE.DAV --format tls-ddave-ega --output json
//!
//! # One PNG per tile, palette taken from vga.pal
//! tilegfx export VGADAVE.DAV --format tls-ddave-vga --palette vga.pal -o tiles/
//!
//! # Raw bytes of tile 7
//! tilegfx dump EGADAVE.DAV --format tls-ddave-ega --tile 7
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::{info, warn};
use serde::Serialize;

use tilegfx_rs::format::{self, Certainty, FormatDescriptor};
use tilegfx_rs::image::{MASK_TRANSPARENT, Tile};
use tilegfx_rs::palette::Palette;
use tilegfx_rs::store::Store;
use tilegfx_rs::tileset::FatTileset;

#[derive(Parser)]
#[command(name = "tilegfx")]
#[command(author = "tilegfx-rs project")]
#[command(version)]
#[command(about = "DOS game tileset utility - detect, inspect, export and dump", long_about = None)]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Probe a file against every known format
	Detect {
		/// Tileset file to probe
		#[arg(value_name = "INPUT")]
		input: PathBuf,

		/// Output format
		#[arg(short, long, value_enum, default_value = "table")]
		output: OutputFormat,
	},

	/// Show the tile table and header attributes of a tileset
	Info {
		/// Tileset file
		#[arg(value_name = "INPUT")]
		input: PathBuf,

		/// Format code (e.g. "tls-ddave-ega"); autodetected when omitted
		#[arg(short, long, value_name = "CODE")]
		format: Option<String>,

		/// Output format
		#[arg(short, long, value_enum, default_value = "table")]
		output: OutputFormat,
	},

	/// Export each tile as a PNG image
	Export {
		/// Tileset file
		#[arg(value_name = "INPUT")]
		input: PathBuf,

		/// Format code (e.g. "tls-ddave-vga"); autodetected when omitted
		#[arg(short, long, value_name = "CODE")]
		format: Option<String>,

		/// External palette file (raw 6-bit VGA triplets)
		#[arg(short, long, value_name = "FILE")]
		palette: Option<PathBuf>,

		/// Output directory
		#[arg(short, long, value_name = "DIR", default_value = ".")]
		out_dir: PathBuf,
	},

	/// Hex-dump the raw stored bytes of one tile
	Dump {
		/// Tileset file
		#[arg(value_name = "INPUT")]
		input: PathBuf,

		/// Format code; autodetected when omitted
		#[arg(short, long, value_name = "CODE")]
		format: Option<String>,

		/// Tile index to dump
		#[arg(short, long, value_name = "N", default_value = "0")]
		tile: usize,
	},
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
	Table,
	Json,
}

#[derive(Serialize)]
struct DetectRow {
	code: &'static str,
	name: &'static str,
	certainty: Certainty,
}

#[derive(Serialize)]
struct TileRow {
	index: u32,
	offset: usize,
	stored_size: usize,
	real_size: usize,
	width: Option<u32>,
	height: Option<u32>,
}

fn main() {
	env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

	let cli = Cli::parse();

	let result = match cli.command {
		Commands::Detect {
			input,
			output,
		} => handle_detect(&input, output),
		Commands::Info {
			input,
			format,
			output,
		} => handle_info(&input, format.as_deref(), output),
		Commands::Export {
			input,
			format,
			palette,
			out_dir,
		} => handle_export(&input, format.as_deref(), palette.as_deref(), &out_dir),
		Commands::Dump {
			input,
			format,
			tile,
		} => handle_dump(&input, format.as_deref(), tile),
	};

	if let Err(e) = result {
		eprintln!("Error: {e:#}");
		std::process::exit(1);
	}
}

fn handle_detect(input: &Path, output: OutputFormat) -> Result<()> {
	let data = fs::read(input).with_context(|| format!("reading {}", input.display()))?;
	let rows: Vec<DetectRow> = format::registry()
		.iter()
		.map(|desc| DetectRow {
			code: desc.code,
			name: desc.name,
			certainty: (desc.is_instance)(&data),
		})
		.collect();

	match output {
		OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
		OutputFormat::Table => {
			println!("{:<20} {:<36} {}", "CODE", "NAME", "CERTAINTY");
			for row in &rows {
				println!("{:<20} {:<36} {:?}", row.code, row.name, row.certainty);
			}
		},
	}
	Ok(())
}

/// Opens `input` either as the named format or as the best match across
/// the registry.
fn open_tileset(input: &Path, code: Option<&str>, palette: Option<Palette>) -> Result<FatTileset> {
	let data = fs::read(input).with_context(|| format!("reading {}", input.display()))?;
	let registry = format::registry();

	let desc: &FormatDescriptor = match code {
		Some(code) => registry
			.iter()
			.find(|d| d.code == code)
			.ok_or_else(|| anyhow!("unknown format code {code:?}"))?,
		None => {
			let best = registry
				.iter()
				.map(|d| ((d.is_instance)(&data), d))
				.max_by_key(|(c, _)| *c)
				.ok_or_else(|| anyhow!("empty format registry"))?;
			if best.0 == Certainty::DefinitelyNo {
				return Err(anyhow!(
					"no known format matches {}; use --format to force one",
					input.display()
				));
			}
			if best.0 == Certainty::PossiblyYes {
				warn!("{} only possibly matches {}", input.display(), best.1.code);
			}
			best.1
		},
	};
	info!("opening {} as {}", input.display(), desc.code);
	Ok((desc.open)(Store::from_bytes(data), palette)?)
}

fn handle_info(input: &Path, code: Option<&str>, output: OutputFormat) -> Result<()> {
	let tileset = open_tileset(input, code, None)?;
	let dims = tileset.dimensions();
	let rows: Vec<TileRow> = tileset
		.handles()
		.into_iter()
		.filter_map(|h| tileset.entry(h).ok())
		.map(|e| TileRow {
			index: e.index(),
			offset: e.offset(),
			stored_size: e.stored_size(),
			real_size: e.real_size(),
			width: dims.map(|d| d.0),
			height: dims.map(|d| d.1),
		})
		.collect();

	match output {
		OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
		OutputFormat::Table => {
			println!("{}: {} tiles", tileset.config().name, tileset.len());
			if let Some((w, h)) = dims {
				println!("tile size: {w}x{h}");
			}
			for i in 0..tileset.attribute_count() {
				let name = tileset.attribute_name(i).unwrap_or("?");
				println!("attribute {i} ({name}): {}", tileset.attribute(i)?);
			}
			println!("{:<6} {:<10} {:<12} {}", "INDEX", "OFFSET", "STORED", "REAL");
			for row in &rows {
				println!(
					"{:<6} {:<10} {:<12} {}",
					row.index, row.offset, row.stored_size, row.real_size
				);
			}
		},
	}
	Ok(())
}

fn handle_export(
	input: &Path,
	code: Option<&str>,
	palette_path: Option<&Path>,
	out_dir: &Path,
) -> Result<()> {
	let palette = match palette_path {
		Some(path) => {
			let raw = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
			Some(Palette::from_vga_pal(&raw))
		},
		None => None,
	};
	let tileset = open_tileset(input, code, palette)?;

	fs::create_dir_all(out_dir)
		.with_context(|| format!("creating {}", out_dir.display()))?;
	let stem = input
		.file_stem()
		.map(|s| s.to_string_lossy().into_owned())
		.unwrap_or_else(|| "tile".to_string());

	let mut exported = 0usize;
	for (i, handle) in tileset.handles().into_iter().enumerate() {
		let tile = tileset
			.open_image(handle)
			.with_context(|| format!("decoding tile {i}"))?;
		if tile.width() == 0 || tile.height() == 0 {
			warn!("skipping empty tile {i}");
			continue;
		}
		let path = out_dir.join(format!("{stem}_{i:03}.png"));
		write_png(&tile, tileset.palette(), &path)?;
		exported += 1;
	}
	info!("exported {exported} tiles to {}", out_dir.display());
	Ok(())
}

/// Renders the tile through its palette into an RGBA PNG, using the mask
/// (when present) for the alpha channel.
fn write_png(tile: &Tile, palette: Option<&Palette>, path: &Path) -> Result<()> {
	let pal = palette.cloned().unwrap_or_else(Palette::default_vga);
	let mut img = image::RgbaImage::new(tile.width(), tile.height());
	for y in 0..tile.height() {
		for x in 0..tile.width() {
			let index = tile.get_pixel(x, y);
			let color = pal
				.get(index as usize)
				.ok_or_else(|| anyhow!("pixel index {index} outside palette"))?;
			let mut alpha = color.a;
			if let Some(mask) = tile.mask() {
				if mask[(y * tile.width() + x) as usize] & MASK_TRANSPARENT != 0 {
					alpha = 0;
				}
			}
			img.put_pixel(x, y, image::Rgba([color.r, color.g, color.b, alpha]));
		}
	}
	img.save(path)
		.with_context(|| format!("writing {}", path.display()))?;
	Ok(())
}

fn handle_dump(input: &Path, code: Option<&str>, tile: usize) -> Result<()> {
	let tileset = open_tileset(input, code, None)?;
	let handle = tileset
		.handle_at(tile)
		.ok_or_else(|| anyhow!("tile {tile} out of range (0..{})", tileset.len()))?;
	let entry = tileset.entry(handle)?;
	println!(
		"tile {tile}: offset {}, {} bytes stored, {} bytes data",
		entry.offset(),
		entry.stored_size(),
		entry.real_size()
	);
	let raw = tileset.open_raw(handle)?;
	for (i, chunk) in raw.chunks(16).enumerate() {
		println!("{:08x}  {}", i * 16, hex::encode(chunk));
	}
	Ok(())
}
