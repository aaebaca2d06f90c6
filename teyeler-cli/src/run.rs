//! The tiling command.

use std::sync::Arc;

use console::style;
use teyeler::log::{Logger, TracingLogger};
use teyeler::logging::{init_logging, LogOptions};
use teyeler::pyramid::PyramidPlan;
use teyeler::raster::decode_image;
use teyeler::tile::{DiskTileWriter, ImageTileEncoder, TileWriter};
use teyeler::tiler::{Tiler, TilingReport};
use teyeler::{log_info, TilerError};

use crate::args::Args;
use crate::error::CliError;
use crate::progress::{tile_progress_bar, ProgressTileWriter};

/// Tiles the input image described by `args`.
pub fn run(args: &Args) -> Result<TilingReport, CliError> {
    let options = LogOptions::default()
        .with_level(args.log_level())
        .with_log_file(args.log_file.clone());
    let _logging = init_logging(&options)?;

    let config = args.resolve_config()?;
    let logger: Arc<dyn Logger> = Arc::new(TracingLogger::new());

    log_info!(logger, "Reading {}", args.input.display());
    let raster = decode_image(&args.input).map_err(TilerError::from)?;

    let plan = PyramidPlan::new((raster.rows(), raster.cols()), config.tile_shape, config.levels)
        .map_err(TilerError::from)?;
    log_info!(
        logger,
        "Writing {} {} tiles in {} levels to {}",
        plan.total_tiles(),
        config.format.name(),
        plan.level_count(),
        args.output.display()
    );

    let encoder = Arc::new(ImageTileEncoder::new(config.format));
    let disk: Arc<dyn TileWriter> =
        Arc::new(DiskTileWriter::new(&args.output, encoder).with_logger(Arc::clone(&logger)));
    let bar = tile_progress_bar(plan.total_tiles(), args.show_progress());
    let writer = Arc::new(ProgressTileWriter::new(disk, bar.clone()));

    let tiler = Tiler::new(config, writer, Arc::clone(&logger));
    let report = tiler.run(raster);
    bar.finish_and_clear();
    let report = report?;

    if !report.is_success() {
        for failure in &report.failures {
            eprintln!("  {} {}", style("✗").red(), failure);
        }
        return Err(CliError::IncompleteOutput {
            failed: report.failures.len(),
            total: report.tiles_submitted,
        });
    }

    log_info!(logger, "Done.");
    if !args.silent {
        println!(
            "{} Wrote {} tiles in {} levels to {}",
            style("✓").green(),
            style(report.tiles_written).bold(),
            report.levels,
            style(args.output.display()).cyan()
        );
    }
    Ok(report)
}
