//! Binary plate snapshots.
//!
//! Layout, little endian:
//! `[u64 rows][u64 cols][f64 cell(0,0)] ... [f64 cell(rows-1, cols-1)]`
//! with cells in row-major order.

use crate::error::*;
use crate::grid::*;
use crate::plate::*;
use std::io::prelude::*;
use std::path::Path;

const HEADER_BYTES: u64 = 16;
const CELL_BYTES: u64 = std::mem::size_of::<f64>() as u64;

fn read_u64<R: Read>(
    reader: &mut R,
    path: &Path,
    what: &'static str,
) -> Result<u64> {
    let mut bytes = [0u8; 8];
    reader.read_exact(&mut bytes).map_err(|e| truncated(e, path, what))?;
    Ok(u64::from_le_bytes(bytes))
}

fn truncated(e: std::io::Error, path: &Path, what: &'static str) -> Error {
    if e.kind() == std::io::ErrorKind::UnexpectedEof {
        Error::Truncated {
            path: path.to_path_buf(),
            what,
        }
    } else {
        Error::io(path, e)
    }
}

fn dimension(value: u64, rows: u64, cols: u64) -> Result<usize> {
    usize::try_from(value).map_err(|_| Error::Dimensions {
        rows: rows.try_into().unwrap_or(usize::MAX),
        cols: cols.try_into().unwrap_or(usize::MAX),
    })
}

/// Read a grid of any size.
/// `path` is only used for error messages,
/// `available` is the stream length when known.
pub fn read_grid_from<R: Read>(
    reader: &mut R,
    path: &Path,
    available: Option<u64>,
) -> Result<Grid> {
    let rows = read_u64(reader, path, "row count")?;
    let cols = read_u64(reader, path, "column count")?;

    // Reject short files before allocating for them
    if let Some(available) = available {
        let needed = rows
            .checked_mul(cols)
            .and_then(|cells| cells.checked_mul(CELL_BYTES))
            .and_then(|bytes| bytes.checked_add(HEADER_BYTES));
        if needed.map_or(true, |needed| needed > available) {
            return Err(Error::Truncated {
                path: path.to_path_buf(),
                what: "cells",
            });
        }
    }

    let mut grid = Grid::allocate(
        dimension(rows, rows, cols)?,
        dimension(cols, rows, cols)?,
    )?;
    reader
        .read_exact(bytemuck::cast_slice_mut(grid.buffer_mut()))
        .map_err(|e| truncated(e, path, "cells"))?;
    if cfg!(target_endian = "big") {
        for v in grid.buffer_mut() {
            *v = f64::from_bits(u64::from_le(v.to_bits()));
        }
    }
    Ok(grid)
}

/// Write a grid in snapshot layout.
pub fn write_grid_to<W: Write>(
    writer: &mut W,
    grid: &Grid,
) -> std::io::Result<()> {
    writer.write_all(&(grid.rows() as u64).to_le_bytes())?;
    writer.write_all(&(grid.cols() as u64).to_le_bytes())?;
    if cfg!(target_endian = "little") {
        writer.write_all(bytemuck::cast_slice(grid.buffer()))?;
    } else {
        for v in grid.buffer() {
            writer.write_all(&v.to_le_bytes())?;
        }
    }
    Ok(())
}

/// Byte length of regular files only, pipes and devices report none.
fn known_length(metadata: &std::fs::Metadata) -> Option<u64> {
    metadata.is_file().then(|| metadata.len())
}

pub fn read_grid<P: AsRef<Path>>(path: P) -> Result<Grid> {
    profiling::scope!("snapshot::read");
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|e| Error::io(path, e))?;
    let available = file.metadata().ok().as_ref().and_then(known_length);
    let mut reader = std::io::BufReader::new(file);
    read_grid_from(&mut reader, path, available)
}

pub fn write_grid<P: AsRef<Path>>(path: P, grid: &Grid) -> Result<()> {
    profiling::scope!("snapshot::write");
    let path = path.as_ref();
    log::debug!("Writing: {:?}", path);
    let file = std::fs::File::create(path).map_err(|e| Error::io(path, e))?;
    let mut writer = std::io::BufWriter::new(file);
    write_grid_to(&mut writer, grid)
        .and_then(|_| writer.flush())
        .map_err(|e| Error::io(path, e))
}

/// Load the initial state of a plate, `next` starts as a copy of it.
pub fn load_plate<P: AsRef<Path>>(
    path: P,
    params: PlateParams,
    chunk_size: usize,
) -> Result<Plate> {
    let initial = read_grid(path)?;
    Plate::new(params, initial, chunk_size)
}

#[cfg(test)]
mod unit_tests {
    use super::*;
    use std::io::Cursor;

    fn sample_grid() -> Grid {
        let mut g = Grid::allocate(4, 3).unwrap();
        g.par_set_values(|r, c| (r as f64) * 1.5 - (c as f64) / 3.0, 5);
        g.set(2, 1, f64::MIN_POSITIVE);
        g.set(3, 2, -0.0);
        g
    }

    #[test]
    fn round_trip() {
        let g = sample_grid();
        let mut bytes = Vec::new();
        write_grid_to(&mut bytes, &g).unwrap();
        assert_eq!(bytes.len(), 16 + 12 * 8);
        let n = bytes.len() as u64;

        let back =
            read_grid_from(&mut Cursor::new(bytes), Path::new("mem"), Some(n))
                .unwrap();
        assert_eq!(back.rows(), g.rows());
        assert_eq!(back.cols(), g.cols());
        for (a, b) in back.buffer().iter().zip(g.buffer()) {
            assert_eq!(a.to_bits(), b.to_bits());
        }
    }

    #[test]
    fn layout_is_little_endian() {
        let g = Grid::from_buffer(1, 1, vec![1.0]);
        let mut bytes = Vec::new();
        write_grid_to(&mut bytes, &g).unwrap();
        assert_eq!(&bytes[0..8], &[1, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(&bytes[8..16], &[1, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(&bytes[16..24], &1.0f64.to_le_bytes());
    }

    #[test]
    fn truncated_header() {
        let bytes = vec![3u8, 0, 0, 0];
        let r = read_grid_from(&mut Cursor::new(bytes), Path::new("h"), None);
        assert!(matches!(
            r,
            Err(Error::Truncated {
                what: "row count",
                ..
            })
        ));
    }

    #[test]
    fn truncated_cells() {
        let mut bytes = Vec::new();
        write_grid_to(&mut bytes, &sample_grid()).unwrap();
        bytes.truncate(bytes.len() - 3);
        let n = bytes.len() as u64;

        // Known length: rejected before allocating
        let r = read_grid_from(
            &mut Cursor::new(bytes.clone()),
            Path::new("c"),
            Some(n),
        );
        assert!(matches!(r, Err(Error::Truncated { what: "cells", .. })));

        // Unknown length: short read
        let r = read_grid_from(&mut Cursor::new(bytes), Path::new("c"), None);
        assert!(matches!(r, Err(Error::Truncated { what: "cells", .. })));
    }

    #[test]
    fn absurd_dimensions() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&u64::MAX.to_le_bytes());
        bytes.extend_from_slice(&u64::MAX.to_le_bytes());
        let n = bytes.len() as u64;
        let r =
            read_grid_from(&mut Cursor::new(bytes), Path::new("x"), Some(n));
        assert!(matches!(r, Err(Error::Truncated { .. })));
    }

    #[test]
    fn length_only_for_regular_files() {
        let dir = std::env::temp_dir()
            .join(format!("heatplate_length_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("plate.bin");
        write_grid(&path, &sample_grid()).unwrap();

        let file = std::fs::metadata(&path).unwrap();
        assert_eq!(known_length(&file), Some(16 + 12 * 8));
        let not_a_file = std::fs::metadata(&dir).unwrap();
        assert_eq!(known_length(&not_a_file), None);

        assert_eq!(read_grid(&path).unwrap(), sample_grid());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_file() {
        let r = read_grid("/nonexistent/heatplate/plate.bin");
        match r {
            Err(Error::Io { path, .. }) => {
                assert!(path.ends_with("plate.bin"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
