//! Flat instance record files: one `name x y bitsize` line per instance.
//!
//! Blank lines and lines starting with `#` are ignored on input.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use tracing::debug;

use crate::error::{Error, RecordError};
use crate::grid::InstanceGrid;
use crate::instance::Instance;

/// Parses every record from `reader`
///
/// # Errors
/// [`RecordError::Io`] on read failure, [`RecordError::Malformed`] with the
/// 1-based line number on the first bad line.
pub fn read_records<R: BufRead>(reader: R) -> Result<Vec<Instance>, RecordError> {
    let mut instances = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let inst = trimmed
            .parse::<Instance>()
            .map_err(|reason| RecordError::Malformed { line: idx + 1, reason })?;
        instances.push(inst);
    }
    Ok(instances)
}

/// Reads a record file
///
/// # Errors
/// See [`read_records`].
pub fn read_records_from_path(path: impl AsRef<Path>) -> Result<Vec<Instance>, RecordError> {
    let path = path.as_ref();
    let instances = read_records(BufReader::new(File::open(path)?))?;
    debug!(path = %path.display(), count = instances.len(), "read instance records");
    Ok(instances)
}

/// Writes one record line per instance
///
/// # Errors
/// [`RecordError::Io`] on write failure.
pub fn write_records<'a, W, I>(writer: W, instances: I) -> Result<(), RecordError>
where
    W: Write,
    I: IntoIterator<Item = &'a Instance>,
{
    let mut out = BufWriter::new(writer);
    for inst in instances {
        writeln!(out, "{inst}")?;
    }
    out.flush()?;
    Ok(())
}

/// Writes a record file, replacing any existing one
///
/// # Errors
/// [`RecordError::Io`] on create or write failure.
pub fn write_records_to_path<'a, I>(path: impl AsRef<Path>, instances: I) -> Result<(), RecordError>
where
    I: IntoIterator<Item = &'a Instance>,
{
    write_records(File::create(path)?, instances)
}

impl InstanceGrid {
    /// Builds a grid from record text
    ///
    /// # Errors
    /// [`Error::Grid`] for a bad bin size, [`Error::Record`] for bad input.
    pub fn from_reader<R: BufRead>(bin_size: f64, reader: R) -> Result<Self, Error> {
        let instances = read_records(reader)?;
        let mut grid = Self::with_capacity(bin_size, instances.len())?;
        grid.extend(instances);
        Ok(grid)
    }

    /// Builds a grid from a record file
    ///
    /// # Errors
    /// [`Error::Grid`] for a bad bin size, [`Error::Record`] for bad input.
    pub fn from_path(bin_size: f64, path: impl AsRef<Path>) -> Result<Self, Error> {
        let instances = read_records_from_path(path)?;
        let mut grid = Self::with_capacity(bin_size, instances.len())?;
        grid.extend(instances);
        Ok(grid)
    }
}
