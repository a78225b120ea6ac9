//! Synthesizes the `timestamp filename` list the SLAM run reads for a folder of images.

use crate::error::Result;
use crate::num::Number;

use itertools::Itertools;
use log::info;
use std::cmp::Ordering;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

pub const DEFAULT_OFFSET: usize = 10;
pub const DEFAULT_FPS: Number = 10.0;

const HEADER: [&str; 3] = ["# yaml:", "# images:", "# timestamp filename"];

/// A run of digits or of text in a file name.
#[derive(Debug, Clone)]
enum Chunk {
    Text(String),
    Digits(String),
}

impl Ord for Chunk {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Chunk::Digits(a), Chunk::Digits(b)) => {
                let a = a.trim_start_matches('0');
                let b = b.trim_start_matches('0');
                a.len().cmp(&b.len()).then_with(|| a.cmp(b))
            }
            (Chunk::Text(a), Chunk::Text(b)) => a.cmp(b),
            (Chunk::Text(_), Chunk::Digits(_)) => Ordering::Less,
            (Chunk::Digits(_), Chunk::Text(_)) => Ordering::Greater,
        }
    }
}

impl PartialEq for Chunk {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Chunk {}

impl PartialOrd for Chunk {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Sort key comparing digit runs by value and text case-insensitively.
///
/// Keys always alternate text and digits starting with text, so names that
/// begin with a digit sort before names that begin with a letter.
fn natural_key(name: &str) -> Vec<Chunk> {
    let mut key = vec![];
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        key.push(Chunk::Text(String::new()));
    }
    let runs = name.chars().group_by(|c| c.is_ascii_digit());
    for (digits, run) in &runs {
        let run: String = run.collect();
        key.push(if digits {
            Chunk::Digits(run)
        } else {
            Chunk::Text(run.to_lowercase())
        });
    }
    key
}

/// Sorts `names` naturally, keeps images, and pairs each with a timestamp
/// `i / fps` for `i` counting up from `offset`.
pub fn image_timestamps<I>(names: I, offset: usize, fps: Number) -> Vec<(Number, String)>
where
    I: IntoIterator<Item = String>,
{
    names
        .into_iter()
        .sorted_by_key(|name| natural_key(name))
        .map(|name| format!("images/{}", name))
        .filter(|path| path.ends_with("jpg") || path.ends_with(".png"))
        .enumerate()
        .map(|(i, path)| ((i + offset) as Number / fps, path))
        .collect()
}

pub fn write_timestamps<W: Write>(mut writer: W, entries: &[(Number, String)]) -> Result<()> {
    for line in HEADER.iter() {
        writeln!(writer, "{}", line)?;
    }
    for (timestamp, path) in entries {
        writeln!(writer, "{:.2} {}", timestamp, path)?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes the timestamp file for every image in `image_dir`; returns the image count.
pub fn create_timestamps_file(image_dir: &Path, out_file: &Path) -> Result<usize> {
    let names = fs::read_dir(image_dir)?
        .map(|entry| entry.map(|e| e.file_name().to_string_lossy().into_owned()))
        .collect::<std::io::Result<Vec<_>>>()?;
    let entries = image_timestamps(names, DEFAULT_OFFSET, DEFAULT_FPS);
    info!("number of images: {}", entries.len());

    write_timestamps(BufWriter::new(File::create(out_file)?), &entries)?;
    info!("created timestamps file {}", out_file.display());
    Ok(entries.len())
}
