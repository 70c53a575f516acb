//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This module contains the `parse_ini()` function and its helpers.
//! It is the single place where INI key names are mapped to struct fields.

use ini::{Ini, Properties};
use std::path::PathBuf;

use super::defaults::DEFAULT_WMS_MAX_LEVEL;
use super::file::ConfigFileError;
use super::settings::{ConfigFile, DatasetSettings, DatasetSource};
use crate::addressing::MAX_LEVEL;
use crate::tile::TileDataType;

/// Prefix of dataset section names.
pub const DATASET_SECTION_PREFIX: &str = "dataset.";

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [cache] section
    if let Some(section) = ini.section(Some("cache")) {
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                config.cache.directory = expand_tilde(v);
            }
        }
    }

    // [network] section
    if let Some(section) = ini.section(Some("network")) {
        if let Some(v) = section.get("threads") {
            config.network.threads = match v.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(invalid(
                        "network",
                        "threads",
                        v,
                        "must be a positive integer",
                    ))
                }
            };
        }
        if let Some(v) = section.get("timeout") {
            config.network.timeout = match v.trim().parse::<u64>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(invalid(
                        "network",
                        "timeout",
                        v,
                        "must be a positive integer (seconds)",
                    ))
                }
            };
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.directory = expand_tilde(v);
            }
        }
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = v.to_string();
            }
        }
    }

    // [dataset.<id>] sections
    for (name, section) in ini.iter() {
        let Some(id) = name.and_then(|n| n.strip_prefix(DATASET_SECTION_PREFIX)) else {
            continue;
        };
        let section_name = format!("{}{}", DATASET_SECTION_PREFIX, id);
        if id.is_empty() || config.dataset(id).is_some() {
            return Err(invalid(
                &section_name,
                "",
                id,
                "dataset ids must be non-empty and unique",
            ));
        }
        config
            .datasets
            .push(parse_dataset(id, &section_name, section)?);
    }

    Ok(config)
}

fn parse_dataset(
    id: &str,
    section_name: &str,
    section: &Properties,
) -> Result<DatasetSettings, ConfigFileError> {
    let type_value = require(section, section_name, "type")?;
    let data_type: TileDataType = type_value
        .parse()
        .map_err(|_| invalid(section_name, "type", type_value, "must be one of: float32, uint8, u8vec3"))?;

    let source_value = section.get("source").map(str::trim).unwrap_or("file");
    let source = match source_value.to_lowercase().as_str() {
        "file" => {
            let files_value = require(section, section_name, "files")?;
            let files: Vec<PathBuf> = files_value
                .split(',')
                .map(str::trim)
                .filter(|f| !f.is_empty())
                .map(expand_tilde)
                .collect();
            if files.len() != data_type.components() {
                return Err(invalid(
                    section_name,
                    "files",
                    files_value,
                    &format!(
                        "{} needs {} file(s), got {}",
                        data_type,
                        data_type.components(),
                        files.len()
                    ),
                ));
            }
            DatasetSource::File { files }
        }
        "wms" => {
            let max_level = match section.get("max_level") {
                Some(v) => match v.trim().parse::<u32>() {
                    Ok(level) if level <= MAX_LEVEL => level,
                    _ => {
                        return Err(invalid(
                            section_name,
                            "max_level",
                            v,
                            &format!("must be an integer between 0 and {}", MAX_LEVEL),
                        ))
                    }
                },
                None => DEFAULT_WMS_MAX_LEVEL,
            };
            DatasetSource::Wms {
                url: require(section, section_name, "url")?.to_string(),
                layers: require(section, section_name, "layers")?.to_string(),
                styles: section.get("styles").map(str::trim).unwrap_or("").to_string(),
                max_level,
            }
        }
        _ => {
            return Err(invalid(
                section_name,
                "source",
                source_value,
                "must be 'file' or 'wms'",
            ))
        }
    };

    Ok(DatasetSettings {
        id: id.to_string(),
        name: section
            .get("name")
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(id)
            .to_string(),
        copyright: section.get("copyright").map(str::trim).unwrap_or("").to_string(),
        data_type,
        source,
    })
}

fn require<'a>(
    section: &'a Properties,
    section_name: &str,
    key: &str,
) -> Result<&'a str, ConfigFileError> {
    section
        .get(key)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ConfigFileError::MissingKey {
            section: section_name.to_string(),
            key: key.to_string(),
        })
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Expand ~ to home directory in paths.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
