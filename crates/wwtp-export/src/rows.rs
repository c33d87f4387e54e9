//! Tabular rows for the two CSV exports.

use std::io::Write;

use serde::Serialize;
use wwtp_core::{PipelineResult, VerifiedCandidate};

pub const PLANT_HEADERS: [&str; 3] = ["Name", "Latitude", "Longitude"];

pub const VERIFIED_HEADERS: [&str; 8] = [
    "Name",
    "Latitude",
    "Longitude",
    "Address",
    "Status",
    "Map URL",
    "Reasoning",
    "Estimated Capacity (MLD)",
];

/// One searched plant. Field order matches [`PLANT_HEADERS`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlantRow {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

/// One verified plant. Field order matches [`VERIFIED_HEADERS`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerifiedRow {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    /// Empty when the address lookup failed or returned nothing.
    pub address: String,
    pub status: String,
    pub map_url: String,
    pub reasoning: String,
    pub capacity_estimate: String,
}

impl From<&VerifiedCandidate> for VerifiedRow {
    fn from(v: &VerifiedCandidate) -> Self {
        Self {
            name: v.candidate.name.clone(),
            lat: v.candidate.coordinate.lat(),
            lng: v.candidate.coordinate.lng(),
            address: v.candidate.address.clone().unwrap_or_default(),
            status: v.status_label.clone(),
            map_url: v.imagery_url.clone(),
            reasoning: v.verdict.reasoning.clone(),
            capacity_estimate: v.verdict.capacity_estimate.clone(),
        }
    }
}

/// Every candidate the search surfaced, in discovery order.
#[must_use]
pub fn plant_rows(result: &PipelineResult) -> Vec<PlantRow> {
    result
        .all_candidates
        .iter()
        .map(|c| PlantRow {
            name: c.name.clone(),
            lat: c.coordinate.lat(),
            lng: c.coordinate.lng(),
        })
        .collect()
}

#[must_use]
pub fn verified_rows(result: &PipelineResult) -> Vec<VerifiedRow> {
    result.verified.iter().map(VerifiedRow::from).collect()
}

/// Writes the header line and `rows`. The header is written even when
/// `rows` is empty.
///
/// # Errors
///
/// Returns [`csv::Error`] if serialization or the underlying writer fails.
pub fn write_plants_csv<W: Write>(writer: W, rows: &[PlantRow]) -> Result<(), csv::Error> {
    write_csv(writer, &PLANT_HEADERS, rows)
}

/// Same contract as [`write_plants_csv`] for verified rows.
///
/// # Errors
///
/// Returns [`csv::Error`] if serialization or the underlying writer fails.
pub fn write_verified_csv<W: Write>(writer: W, rows: &[VerifiedRow]) -> Result<(), csv::Error> {
    write_csv(writer, &VERIFIED_HEADERS, rows)
}

fn write_csv<W: Write, R: Serialize>(
    writer: W,
    headers: &[&str],
    rows: &[R],
) -> Result<(), csv::Error> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    wtr.write_record(headers)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}
