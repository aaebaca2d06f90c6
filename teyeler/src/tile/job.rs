//! Tile writes as worker pool jobs.

use std::sync::Arc;

use super::types::Tile;
use super::writer::{TileWriter, WriteError};
use crate::coord::TileAddress;
use crate::executor::Job;

/// Writes one tile through a shared [`TileWriter`].
pub struct WriteTileJob {
    tile: Tile,
    writer: Arc<dyn TileWriter>,
}

impl WriteTileJob {
    pub fn new(tile: Tile, writer: Arc<dyn TileWriter>) -> Self {
        Self { tile, writer }
    }
}

impl Job for WriteTileJob {
    type Key = TileAddress;
    type Error = WriteError;

    fn key(&self) -> TileAddress {
        self.tile.address()
    }

    fn run(self) -> Result<(), WriteError> {
        self.writer.write(&self.tile).map(|_| ())
    }
}

impl std::fmt::Debug for WriteTileJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WriteTileJob")
            .field("address", &self.tile.address())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::{FailureReason, WorkerPool};
    use crate::raster::Raster;
    use parking_lot::Mutex;
    use std::io;
    use std::path::PathBuf;

    /// Records written addresses and fails on a chosen one.
    #[derive(Default)]
    struct MockWriter {
        written: Mutex<Vec<TileAddress>>,
        fail_on: Option<TileAddress>,
    }

    impl TileWriter for MockWriter {
        fn write(&self, tile: &Tile) -> Result<PathBuf, WriteError> {
            if Some(tile.address()) == self.fail_on {
                return Err(WriteError::Write {
                    path: PathBuf::from("mock"),
                    source: io::Error::new(io::ErrorKind::Other, "disk full"),
                });
            }
            self.written.lock().push(tile.address());
            Ok(PathBuf::from(tile.address().to_string()))
        }
    }

    fn tile(level: u32, major: u32, minor: u32) -> Tile {
        Tile::new(
            Raster::new(2, 2, 1).unwrap(),
            TileAddress::new(level, major, minor),
        )
    }

    #[test]
    fn test_job_key_is_tile_address() {
        let writer: Arc<dyn TileWriter> = Arc::new(MockWriter::default());
        let job = WriteTileJob::new(tile(1, 2, 3), writer);
        assert_eq!(job.key(), TileAddress::new(1, 2, 3));
    }

    #[test]
    fn test_jobs_through_pool() {
        let failing = TileAddress::new(1, 0, 1);
        let writer = Arc::new(MockWriter {
            written: Mutex::new(Vec::new()),
            fail_on: Some(failing),
        });

        let mut pool = WorkerPool::new(3);
        pool.start().unwrap();
        for major in 0..2 {
            for minor in 0..2 {
                pool.submit(WriteTileJob::new(tile(1, major, minor), writer.clone()))
                    .unwrap();
            }
        }
        let report = pool.stop().unwrap();

        assert_eq!(report.completed, 4);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].key, failing);
        assert!(matches!(
            report.failures[0].reason,
            FailureReason::Error(ref msg) if msg.contains("disk full")
        ));
        assert_eq!(writer.written.lock().len(), 3);
    }
}
