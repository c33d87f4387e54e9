//! `discover` command: validate input, run the pipeline, export the bundle.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;
use wwtp_core::{load_app_config, validate_radius_km, AppConfig, Coordinate, PipelineResult};
use wwtp_export::write_bundle;
use wwtp_imagery::ImageryClient;
use wwtp_pipeline::{DiscoveryOptions, DiscoveryPipeline};
use wwtp_places::PlacesClient;
use wwtp_vision::GeminiClient;

#[derive(Debug)]
pub(crate) struct DiscoverArgs {
    pub lat: f64,
    pub lng: f64,
    pub radius_km: f64,
    pub output_dir: PathBuf,
    pub max_in_flight: Option<usize>,
}

/// Runs one discovery and writes its export bundle.
///
/// Input is validated before any configuration is read or any request is
/// made. An empty result prints a notice and writes nothing.
///
/// # Errors
///
/// Returns an error for invalid coordinates or radius, missing configuration,
/// client construction failure, or if the bundle cannot be written.
pub(crate) async fn run_discover(args: DiscoverArgs) -> anyhow::Result<()> {
    let center = Coordinate::new(args.lat, args.lng).context("invalid search centre")?;
    let radius_km = validate_radius_km(args.radius_km).context("invalid search radius")?;

    let mut config = load_app_config().context("failed to load configuration")?;
    if let Some(max_in_flight) = args.max_in_flight {
        config.max_in_flight = max_in_flight.max(1);
    }

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pipeline = build_pipeline(&config)?;
    let result = pipeline.run_discovery(center, radius_km).await?;

    for line in summary_lines(&result) {
        println!("{line}");
    }
    if result.is_empty() {
        return Ok(());
    }

    let bundle = write_bundle(&args.output_dir, center, &result)?;
    println!("Wrote {}", bundle.all_plants.display());
    println!("Wrote {}", bundle.verified.display());
    if let Some(map) = bundle.map {
        println!("Wrote {}", map.display());
    }
    println!("Wrote {}", bundle.archive.display());
    Ok(())
}

fn build_pipeline(config: &AppConfig) -> anyhow::Result<DiscoveryPipeline> {
    let places = PlacesClient::with_base_url(
        &config.google_maps_api_key,
        config.request_timeout_secs,
        &config.user_agent,
        &config.maps_base_url,
    )?
    .with_retry_policy(config.places_max_retries, config.retry_backoff_base_secs);

    let imagery = ImageryClient::with_base_url(
        &config.google_maps_api_key,
        config.request_timeout_secs,
        &config.user_agent,
        &config.maps_base_url,
    )?;

    let vision = GeminiClient::with_base_url(
        &config.gemini_api_key,
        &config.gemini_model,
        config.request_timeout_secs,
        &config.user_agent,
        &config.gemini_base_url,
    )?;

    Ok(DiscoveryPipeline::new(
        Arc::new(places),
        Arc::new(imagery),
        Arc::new(vision),
        DiscoveryOptions::from_config(config),
    ))
}

/// Console summary of a run.
pub(crate) fn summary_lines(result: &PipelineResult) -> Vec<String> {
    if result.is_empty() {
        return vec!["No WWTPs found in the specified area".to_string()];
    }

    let mut lines = vec![
        format!("All plants: {}", result.all_candidates.len()),
        format!("Verified WWTPs: {}", result.verified.len()),
    ];
    for v in &result.verified {
        lines.push(format!(
            "  {} [{}] {}",
            v.candidate.name, v.verdict.capacity_estimate, v.status_label
        ));
    }
    if !result.warnings.is_empty() {
        lines.push(format!("Skipped steps: {}", result.warnings.len()));
        for w in &result.warnings {
            lines.push(format!("  {} {}: {}", w.stage, w.subject, w.message));
        }
    }
    lines
}
