//! Orchestration of a tiling run.
//!
//! The calling thread walks the pyramid and hands every tile to a pool of
//! writer threads, so encoding and disk I/O overlap with downsampling.
//!
//! ```text
//!  Raster ──► PyramidWalker ──► WorkerPool<WriteTileJob> ──► TileWriter
//!             (producer)        (N threads)
//! ```

use std::path::Path;
use std::sync::Arc;

use crate::config::TilingConfig;
use crate::coord::TileAddress;
use crate::error::TilerError;
use crate::executor::{JobFailure, WorkerPool};
use crate::log::Logger;
use crate::pyramid::{PyramidPlan, PyramidWalker};
use crate::raster::{decode_image, Raster};
use crate::tile::{TileWriter, WriteTileJob};
use crate::{log_error, log_info};

/// Outcome of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TilingReport {
    pub levels: u32,
    pub tiles_submitted: u64,
    pub tiles_written: u64,
    /// Tiles that could not be written, with the reason.
    pub failures: Vec<JobFailure<TileAddress>>,
}

impl TilingReport {
    /// True when every tile was written.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty() && self.tiles_written == self.tiles_submitted
    }
}

/// Builds a tile pyramid from a raster and writes it out.
pub struct Tiler {
    config: TilingConfig,
    writer: Arc<dyn TileWriter>,
    logger: Arc<dyn Logger>,
}

impl Tiler {
    pub fn new(config: TilingConfig, writer: Arc<dyn TileWriter>, logger: Arc<dyn Logger>) -> Self {
        Self {
            config,
            writer,
            logger,
        }
    }

    pub fn config(&self) -> &TilingConfig {
        &self.config
    }

    /// The levels and tile counts a run over an image of `raster_shape`
    /// would produce.
    pub fn plan(&self, raster_shape: (u32, u32)) -> Result<PyramidPlan, TilerError> {
        self.config.validate()?;
        Ok(PyramidPlan::new(
            raster_shape,
            self.config.tile_shape,
            self.config.levels,
        )?)
    }

    /// Decodes the image at `path` and tiles it.
    pub fn run_file(&self, path: &Path) -> Result<TilingReport, TilerError> {
        let raster = decode_image(path)?;
        self.run(raster)
    }

    /// Tiles `raster`, blocking until every tile has been written or has
    /// failed.
    pub fn run(&self, raster: Raster) -> Result<TilingReport, TilerError> {
        let config = &self.config;
        config.validate()?;

        let walker = PyramidWalker::new(
            config.tile_shape,
            raster,
            config.levels,
            config.corner,
            config.order,
            Arc::clone(&self.logger),
        )?;
        let levels = walker.levels();

        let mut pool = WorkerPool::with_capacity(config.workers, config.queue_capacity)
            .with_logger(Arc::clone(&self.logger));
        pool.start()?;

        // An early return drops the pool, which finishes queued writes first.
        let mut submitted = 0u64;
        for tile in walker {
            pool.submit(WriteTileJob::new(tile?, Arc::clone(&self.writer)))?;
            submitted += 1;
        }

        log_info!(self.logger, "Waiting for threads to finish writing.");
        let drained = pool.stop()?;

        for failure in &drained.failures {
            log_error!(
                self.logger,
                "Failed to write tile {}: {}",
                failure.key,
                failure.reason
            );
        }

        Ok(TilingReport {
            levels,
            tiles_submitted: submitted,
            tiles_written: drained.succeeded() as u64,
            failures: drained.failures,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;
    use crate::coord::TileShape;
    use crate::log::{LogLevel, NoOpLogger, RecordingLogger};
    use crate::tile::{Tile, WriteError};
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::path::PathBuf;

    /// Keeps written tiles in memory.
    #[derive(Default)]
    struct MemoryWriter {
        tiles: Mutex<HashMap<TileAddress, Raster>>,
        fail_level: Option<u32>,
    }

    impl TileWriter for MemoryWriter {
        fn write(&self, tile: &Tile) -> Result<PathBuf, WriteError> {
            if Some(tile.level()) == self.fail_level {
                return Err(WriteError::Write {
                    path: PathBuf::from(tile.address().to_string()),
                    source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
                });
            }
            self.tiles
                .lock()
                .insert(tile.address(), tile.raster().clone());
            Ok(PathBuf::from(tile.address().to_string()))
        }
    }

    fn config(tile: u32) -> TilingConfig {
        TilingConfig::default()
            .with_tile_shape(TileShape::square(tile).unwrap())
            .with_workers(3)
            .with_queue_capacity(Some(2))
    }

    #[test]
    fn test_run_writes_every_tile() {
        let writer = Arc::new(MemoryWriter::default());
        let tiler = Tiler::new(config(2), writer.clone(), Arc::new(NoOpLogger));

        let report = tiler.run(Raster::new(8, 8, 4).unwrap()).unwrap();
        assert_eq!(report.levels, 3);
        assert_eq!(report.tiles_submitted, 21);
        assert_eq!(report.tiles_written, 21);
        assert!(report.is_success());

        let tiles = writer.tiles.lock();
        assert_eq!(tiles.len(), 21);
        assert!(tiles.contains_key(&TileAddress::new(0, 0, 0)));
        assert!(tiles.contains_key(&TileAddress::new(2, 3, 3)));
    }

    #[test]
    fn test_run_matches_plan() {
        let tiler = Tiler::new(
            config(3),
            Arc::new(MemoryWriter::default()),
            Arc::new(NoOpLogger),
        );
        let plan = tiler.plan((10, 7)).unwrap();
        let report = tiler.run(Raster::new(10, 7, 1).unwrap()).unwrap();
        assert_eq!(report.levels, plan.level_count());
        assert_eq!(report.tiles_submitted, plan.total_tiles());
    }

    #[test]
    fn test_failed_writes_are_reported() {
        let writer = Arc::new(MemoryWriter {
            tiles: Mutex::new(HashMap::new()),
            fail_level: Some(1),
        });
        let logger = Arc::new(RecordingLogger::new());
        let tiler = Tiler::new(config(2), writer, logger.clone());

        let report = tiler.run(Raster::new(8, 8, 1).unwrap()).unwrap();
        assert_eq!(report.tiles_submitted, 21);
        assert_eq!(report.tiles_written, 17);
        assert_eq!(report.failures.len(), 4);
        assert!(report.failures.iter().all(|f| f.key.level == 1));
        assert!(!report.is_success());

        assert_eq!(logger.messages_at(LogLevel::Error).len(), 4);
        assert!(logger
            .messages_at(LogLevel::Info)
            .contains(&"Waiting for threads to finish writing.".to_string()));
    }

    #[test]
    fn test_invalid_config_is_rejected_before_work() {
        let writer = Arc::new(MemoryWriter::default());
        let tiler = Tiler::new(config(2).with_workers(0), writer.clone(), Arc::new(NoOpLogger));
        let err = tiler.run(Raster::new(4, 4, 1).unwrap()).unwrap_err();
        assert!(matches!(err, TilerError::Config(ConfigError::ZeroWorkers)));
        assert!(writer.tiles.lock().is_empty());
    }

    #[test]
    fn test_zero_levels_config() {
        let tiler = Tiler::new(
            config(2).with_levels(Some(0)),
            Arc::new(MemoryWriter::default()),
            Arc::new(NoOpLogger),
        );
        assert!(matches!(
            tiler.plan((4, 4)),
            Err(TilerError::Config(ConfigError::ZeroLevels))
        ));
    }

    #[test]
    fn test_missing_input_file() {
        let tiler = Tiler::new(
            config(2),
            Arc::new(MemoryWriter::default()),
            Arc::new(NoOpLogger),
        );
        let err = tiler.run_file(Path::new("/nonexistent/input.png")).unwrap_err();
        assert!(matches!(err, TilerError::Decode(_)));
    }
}
