//! Writes the export files for one run into a directory, plus a zip archive
//! holding the same files.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use wwtp_core::{Coordinate, PipelineResult};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::ExportError;
use crate::map::MapTemplates;
use crate::rows::{plant_rows, verified_rows, write_plants_csv, write_verified_csv};

pub const ALL_PLANTS_FILE: &str = "all_searched_plants.csv";
pub const VERIFIED_FILE: &str = "verified_wwtp_locations.csv";
pub const MAP_FILE: &str = "verified_wwtp_map.html";
pub const ARCHIVE_FILE: &str = "wwtp_search_results.zip";

/// Paths of the files a bundle wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportBundle {
    pub all_plants: PathBuf,
    pub verified: PathBuf,
    /// `None` when nothing was verified; no map is written in that case.
    pub map: Option<PathBuf>,
    pub archive: PathBuf,
}

/// Writes both CSV tables, and the map when `result.verified` is non-empty,
/// into `dir` (created if missing), then packs them into [`ARCHIVE_FILE`]
/// under their file names. Existing files are overwritten.
///
/// # Errors
///
/// Returns [`ExportError`] if rendering fails or the directory, a file, or
/// the archive cannot be written.
pub fn write_bundle(
    dir: &Path,
    center: Coordinate,
    result: &PipelineResult,
) -> Result<ExportBundle, ExportError> {
    fs::create_dir_all(dir).map_err(|source| ExportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let all_plants = dir.join(ALL_PLANTS_FILE);
    let mut plants_csv = Vec::new();
    write_plants_csv(&mut plants_csv, &plant_rows(result)).map_err(|source| {
        ExportError::Csv {
            path: all_plants.clone(),
            source,
        }
    })?;

    let verified = dir.join(VERIFIED_FILE);
    let mut verified_csv = Vec::new();
    write_verified_csv(&mut verified_csv, &verified_rows(result)).map_err(|source| {
        ExportError::Csv {
            path: verified.clone(),
            source,
        }
    })?;

    let mut entries = vec![
        (ALL_PLANTS_FILE, plants_csv),
        (VERIFIED_FILE, verified_csv),
    ];
    let map = if result.verified.is_empty() {
        None
    } else {
        let templates = MapTemplates::new()?;
        let markers = templates.markers(&result.verified)?;
        let html = templates.render_page(center, &markers)?;
        entries.push((MAP_FILE, html.into_bytes()));
        Some(dir.join(MAP_FILE))
    };

    for (name, bytes) in &entries {
        let path = dir.join(name);
        fs::write(&path, bytes).map_err(|source| ExportError::Io { path, source })?;
    }

    let archive = dir.join(ARCHIVE_FILE);
    write_archive(&archive, &entries)?;

    tracing::info!(
        dir = %dir.display(),
        plants = result.all_candidates.len(),
        verified = result.verified.len(),
        map = map.is_some(),
        "export bundle written"
    );

    Ok(ExportBundle {
        all_plants,
        verified,
        map,
        archive,
    })
}

fn write_archive(path: &Path, entries: &[(&str, Vec<u8>)]) -> Result<(), ExportError> {
    let zip_err = |source| ExportError::Zip {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (name, bytes) in entries {
        zip.start_file(*name, options).map_err(zip_err)?;
        zip.write_all(bytes).map_err(|source| ExportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    }
    zip.finish().map_err(zip_err)?;
    Ok(())
}
