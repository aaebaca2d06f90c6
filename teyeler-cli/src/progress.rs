//! Progress display for tile writes.

use std::path::PathBuf;
use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};
use teyeler::tile::{Tile, TileWriter, WriteError};

const TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} tiles ({eta})";

/// Progress bar over `total` tiles, or a hidden one.
pub fn tile_progress_bar(total: u64, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let style = ProgressStyle::with_template(TEMPLATE)
        .map(|style| style.progress_chars("#>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    ProgressBar::new(total).with_style(style)
}

/// Advances a progress bar after every write attempt.
pub struct ProgressTileWriter {
    inner: Arc<dyn TileWriter>,
    bar: ProgressBar,
}

impl ProgressTileWriter {
    pub fn new(inner: Arc<dyn TileWriter>, bar: ProgressBar) -> Self {
        Self { inner, bar }
    }
}

impl TileWriter for ProgressTileWriter {
    fn write(&self, tile: &Tile) -> Result<PathBuf, WriteError> {
        let result = self.inner.write(tile);
        self.bar.inc(1);
        result
    }
}
