//! Turns a [`wwtp_core::PipelineResult`] into files: two CSV tables, a
//! Leaflet map of the verified sites, and a zip archive of those files.
//!
//! Row and marker construction is pure; only [`write_bundle`] touches disk.

pub mod bundle;
pub mod error;
pub mod map;
pub mod rows;

pub use bundle::{
    write_bundle, ExportBundle, ALL_PLANTS_FILE, ARCHIVE_FILE, MAP_FILE, VERIFIED_FILE,
};
pub use error::ExportError;
pub use map::{MapMarker, MapTemplates};
pub use rows::{
    plant_rows, verified_rows, write_plants_csv, write_verified_csv, PlantRow, VerifiedRow,
};
