//! Node coordinates from an external layout.
//!
//! Layout files hold one `id,x,y` row per node. Coordinates live in two
//! dense `f32` arrays indexed by id, plus a presence bitmap, so lookup by
//! id is a single index and an origin point is never mistaken for unset.

use std::fs::File;
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use tracing::info;

use crate::model::{Coordinate, PublicationId};
use crate::{Error, Result};

/// Rows between progress log lines.
pub const PROGRESS_INTERVAL: usize = 1_000_000;

const READ_BUFFER: usize = 64 * 1024;

/// Dense id-indexed coordinate storage.
#[derive(Debug, Clone)]
pub struct PointStore {
    xs: Vec<f32>,
    ys: Vec<f32>,
    present: Vec<u64>,
    len: usize,
}

impl PointStore {
    /// Allocate storage for ids `0..capacity`.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            xs: vec![0.0; capacity],
            ys: vec![0.0; capacity],
            present: vec![0; capacity.div_ceil(64)],
            len: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.xs.len()
    }

    /// Number of ids with a coordinate.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Store a coordinate. Fails if `id` is outside the capacity.
    pub fn set(&mut self, id: u64, point: Coordinate) -> Result<()> {
        let capacity = self.capacity();
        let idx = usize::try_from(id)
            .ok()
            .filter(|i| *i < capacity)
            .ok_or(Error::CapacityExceeded { id, capacity })?;
        self.xs[idx] = point.x;
        self.ys[idx] = point.y;
        let (word, bit) = (idx / 64, 1u64 << (idx % 64));
        if self.present[word] & bit == 0 {
            self.present[word] |= bit;
            self.len += 1;
        }
        Ok(())
    }

    /// Coordinate of `id`, or `None` if none was loaded.
    pub fn get(&self, id: PublicationId) -> Option<Coordinate> {
        self.get_index(id.index())
    }

    fn get_index(&self, idx: usize) -> Option<Coordinate> {
        let word = *self.present.get(idx / 64)?;
        (idx < self.capacity() && word & (1u64 << (idx % 64)) != 0)
            .then(|| Coordinate::new(self.xs[idx], self.ys[idx]))
    }

    /// Dense view: unset ids read as [`Coordinate::ABSENT`].
    pub fn get_or_absent(&self, id: PublicationId) -> Coordinate {
        self.get(id).unwrap_or(Coordinate::ABSENT)
    }

    /// All stored coordinates in id order.
    pub fn iter(&self) -> impl Iterator<Item = (PublicationId, Coordinate)> + '_ {
        (0..self.capacity()).filter_map(move |idx| {
            self.get_index(idx).map(|c| (PublicationId(idx as u32), c))
        })
    }

    /// Load `id,x,y` rows into this store. Returns the number of rows read.
    pub fn load<R: BufRead>(&mut self, reader: R) -> Result<usize> {
        let mut rows = 0;
        for (lineno, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            if rows % PROGRESS_INTERVAL == 0 {
                info!(rows, "Loading points...");
            }
            let (id, point) = parse_row(&line, lineno + 1)?;
            self.set(id, point)?;
            rows += 1;
        }
        Ok(rows)
    }

    /// Read a layout with a pre-pass that sizes storage to the largest id.
    pub fn from_reader_sized<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut reader = BufReader::with_capacity(READ_BUFFER, reader);
        let mut max_id: Option<u64> = None;
        for (lineno, line) in (&mut reader).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let (id, _) = parse_row(&line, lineno + 1)?;
            max_id = Some(max_id.map_or(id, |m| m.max(id)));
        }
        let capacity = match max_id {
            Some(id) => usize::try_from(id)
                .ok()
                .and_then(|i| i.checked_add(1))
                .ok_or(Error::CapacityExceeded { id, capacity: usize::MAX })?,
            None => 0,
        };
        reader.seek(SeekFrom::Start(0))?;
        let mut store = Self::with_capacity(capacity);
        store.load(reader)?;
        Ok(store)
    }

    /// Open a layout file. With `capacity` the store has that fixed size,
    /// otherwise it is sized from a pre-pass.
    pub fn open(path: impl AsRef<Path>, capacity: Option<usize>) -> Result<Self> {
        let path = path.as_ref();
        info!(path = %path.display(), "Processing nodes from input file");
        let file = File::open(path)?;
        let store = match capacity {
            Some(capacity) => {
                let mut store = Self::with_capacity(capacity);
                store.load(BufReader::with_capacity(READ_BUFFER, file))?;
                store
            }
            None => Self::from_reader_sized(file)?,
        };
        info!(points = store.len(), capacity = store.capacity(), "Points loaded");
        Ok(store)
    }
}

/// Parse one `id,x,y` row. Surrounding whitespace and quotes are tolerated.
fn parse_row(line: &str, lineno: usize) -> Result<(u64, Coordinate)> {
    let parse_err = |message: String| Error::Parse { line: lineno, message };
    let mut cols = line.split(',').map(|c| c.trim().trim_matches('"'));
    let (Some(id), Some(x), Some(y)) = (cols.next(), cols.next(), cols.next()) else {
        return Err(parse_err(format!("expected 3 columns: {line:?}")));
    };
    let id = id
        .parse::<u64>()
        .map_err(|e| parse_err(format!("invalid id {id:?}: {e}")))?;
    let x = x
        .parse::<f32>()
        .map_err(|e| parse_err(format!("invalid x {x:?}: {e}")))?;
    let y = y
        .parse::<f32>()
        .map_err(|e| parse_err(format!("invalid y {y:?}: {e}")))?;
    if !x.is_finite() || !y.is_finite() {
        return Err(parse_err(format!("non-finite coordinate: {line:?}")));
    }
    Ok((id, Coordinate::new(x, y)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_load_and_lookup() {
        let mut store = PointStore::with_capacity(100);
        let rows = store.load("42,100,200\n7,1.5,-2.5\n".as_bytes()).unwrap();
        assert_eq!(rows, 2);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(PublicationId(42)), Some(Coordinate::new(100.0, 200.0)));
        assert_eq!(store.get(PublicationId(7)), Some(Coordinate::new(1.5, -2.5)));
        assert_eq!(store.get(PublicationId(8)), None);
        assert_eq!(store.get_or_absent(PublicationId(8)), Coordinate::ABSENT);
    }

    #[test]
    fn test_origin_point_is_present() {
        let mut store = PointStore::with_capacity(10);
        store.load("0,0,0\n".as_bytes()).unwrap();
        assert_eq!(store.get(PublicationId(0)), Some(Coordinate::ABSENT));
        assert_eq!(store.iter().count(), 1);
    }

    #[test]
    fn test_capacity_exceeded() {
        let mut store = PointStore::with_capacity(10);
        let err = store.load("10,1,1\n".as_bytes()).unwrap_err();
        assert!(matches!(err, Error::CapacityExceeded { id: 10, capacity: 10 }));
    }

    #[test]
    fn test_malformed_rows() {
        let mut store = PointStore::with_capacity(10);
        let err = store.load("1,1,1\n2,abc,1\n".as_bytes()).unwrap_err();
        assert!(matches!(err, Error::Parse { line: 2, .. }));
        let err = store.load("3,1\n".as_bytes()).unwrap_err();
        assert!(matches!(err, Error::Parse { line: 1, .. }));
    }

    #[test]
    fn test_non_finite_coordinates_rejected() {
        for rows in ["1,NaN,90\n", "1,10,inf\n", "1,-infinity,0\n"] {
            let mut store = PointStore::with_capacity(10);
            let err = store.load(rows.as_bytes()).unwrap_err();
            assert!(matches!(err, Error::Parse { line: 1, .. }), "{rows:?} gave {err:?}");
        }
        assert!(PointStore::from_reader_sized(Cursor::new("2,1,1\n3,nan,1\n")).is_err());
    }

    #[test]
    fn test_sized_from_prepass() {
        let store = PointStore::from_reader_sized(Cursor::new("5,1,2\n\n130,3,4\n")).unwrap();
        assert_eq!(store.capacity(), 131);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(PublicationId(130)), Some(Coordinate::new(3.0, 4.0)));
    }

    #[test]
    fn test_reload_does_not_double_count() {
        let mut store = PointStore::with_capacity(10);
        store.load("1,1,1\n1,2,2\n".as_bytes()).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(PublicationId(1)), Some(Coordinate::new(2.0, 2.0)));
    }
}
