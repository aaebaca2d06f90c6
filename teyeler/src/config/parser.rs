//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This is the single place where INI key names are mapped to struct fields.

use std::str::FromStr;

use ini::Ini;

use super::file::ConfigFileError;
use super::settings::{ConfigFile, LevelSetting};
use crate::pyramid::MAX_LEVELS;
use crate::tile::TileFormat;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Unknown sections and keys are ignored.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [tiling] section
    if let Some(section) = ini.section(Some("tiling")) {
        if let Some(v) = section.get("tile_height") {
            config.tiling.tile_height = Some(positive("tiling", "tile_height", v)?);
        }
        if let Some(v) = section.get("tile_width") {
            config.tiling.tile_width = Some(positive("tiling", "tile_width", v)?);
        }
        if let Some(v) = section.get("corner") {
            config.tiling.corner = Some(parse_value(
                "tiling",
                "corner",
                v,
                "must be one of: south-west, north-west, south-east, north-east",
            )?);
        }
        if let Some(v) = section.get("order") {
            config.tiling.order = Some(parse_value(
                "tiling",
                "order",
                v,
                "must be 'column-major' or 'row-major'",
            )?);
        }
        if let Some(v) = section.get("levels") {
            config.tiling.levels = Some(parse_levels(v)?);
        }
    }

    // [output] section
    if let Some(section) = ini.section(Some("output")) {
        if let Some(v) = section.get("format") {
            config.output.format = Some(parse_value::<TileFormat>(
                "output",
                "format",
                v,
                "must be one of: png, jpeg, webp",
            )?);
        }
        if let Some(v) = section.get("jpeg_quality") {
            let quality: u8 =
                parse_value("output", "jpeg_quality", v, "must be between 1 and 100")?;
            if !(1..=100).contains(&quality) {
                return Err(invalid("output", "jpeg_quality", v, "must be between 1 and 100"));
            }
            config.output.jpeg_quality = Some(quality);
        }
    }

    // [writer] section
    if let Some(section) = ini.section(Some("writer")) {
        if let Some(v) = section.get("threads") {
            config.writer.threads = Some(positive("writer", "threads", v)?);
        }
        if let Some(v) = section.get("queue_capacity") {
            config.writer.queue_capacity = Some(parse_value(
                "writer",
                "queue_capacity",
                v,
                "must be a non-negative integer (0 = unbounded)",
            )?);
        }
    }

    Ok(config)
}

fn parse_levels(value: &str) -> Result<LevelSetting, ConfigFileError> {
    const REASON: &str = "must be 'auto' or a positive integer";
    if value.trim().eq_ignore_ascii_case("auto") {
        return Ok(LevelSetting::Auto);
    }
    match parse_value::<u32>("tiling", "levels", value, REASON)? {
        0 => Err(invalid("tiling", "levels", value, REASON)),
        n if n > MAX_LEVELS => Err(invalid(
            "tiling",
            "levels",
            value,
            &format!("must be at most {}", MAX_LEVELS),
        )),
        n => Ok(LevelSetting::Count(n)),
    }
}

fn parse_value<T: FromStr>(
    section: &str,
    key: &str,
    value: &str,
    reason: &str,
) -> Result<T, ConfigFileError> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(section, key, value, reason))
}

fn positive<T>(section: &str, key: &str, value: &str) -> Result<T, ConfigFileError>
where
    T: FromStr + PartialEq + Default,
{
    let parsed: T = parse_value(section, key, value, "must be a positive integer")?;
    if parsed == T::default() {
        return Err(invalid(section, key, value, "must be a positive integer"));
    }
    Ok(parsed)
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
