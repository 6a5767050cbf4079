#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line runner for the permit compliance toolkit.
//!
//! Reads a JSON snapshot of zones, hazard zones, categories, and stored
//! businesses, then either evaluates one new application against it,
//! clusters the approved businesses, or reports malformed boundaries.
//! Results are written to stdout as JSON; logs go to stderr and are
//! controlled by `RUST_LOG`.

mod config;
mod snapshot;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use permit_analytics::{analyze_clusters, cluster_inputs};
use permit_analytics_models::ClusterMode;
use permit_compliance::ComplianceEvaluator;
use permit_compliance_models::ComplianceResult;
use permit_spatial::{GeometryIssue, SpatialIndex};
use serde::Serialize;

use crate::config::AppConfig;
use crate::snapshot::{Snapshot, load_application};

#[derive(Parser)]
#[command(name = "permit_cli", about = "Business permit compliance toolkit")]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a new application against a reference data snapshot
    Evaluate {
        /// Snapshot JSON file
        #[arg(long)]
        snapshot: PathBuf,
        /// Application request JSON file
        #[arg(long)]
        application: PathBuf,
    },
    /// Cluster approved businesses for density analytics
    Cluster {
        /// Snapshot JSON file
        #[arg(long)]
        snapshot: PathBuf,
        /// Neighbour radius in meters
        #[arg(long)]
        radius: Option<f64>,
        /// Minimum businesses per cluster
        #[arg(long)]
        min_points: Option<usize>,
        /// Use the legacy single-pass grouping
        #[arg(long)]
        legacy: bool,
    },
    /// Report zone and hazard boundaries that cannot be used
    Validate {
        /// Snapshot JSON file
        #[arg(long)]
        snapshot: PathBuf,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EvaluationOutput<'a> {
    #[serde(flatten)]
    result: ComplianceResult,
    geometry_issues: &'a [GeometryIssue],
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Evaluate {
            snapshot,
            application,
        } => evaluate(&config, &snapshot, &application)?,
        Commands::Cluster {
            snapshot,
            radius,
            min_points,
            legacy,
        } => {
            let mut params = config.clustering;
            if let Some(radius) = radius {
                params.radius_meters = radius;
            }
            if let Some(min_points) = min_points {
                params.min_points = min_points;
            }
            if legacy {
                params.mode = ClusterMode::Legacy;
            }

            let snapshot = Snapshot::load(&snapshot)?;
            let inputs = cluster_inputs(&snapshot.businesses, &snapshot.categories);
            let report = analyze_clusters(&inputs, &params)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Validate { snapshot } => {
            let snapshot = Snapshot::load(&snapshot)?;
            let index =
                SpatialIndex::with_config(snapshot.zones, snapshot.hazard_zones, &config.index);
            println!("{}", serde_json::to_string_pretty(index.issues())?);
        }
    }

    Ok(())
}

fn evaluate(
    config: &AppConfig,
    snapshot_path: &Path,
    application_path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let request = load_application(application_path)?;
    let Snapshot {
        zones,
        hazard_zones,
        categories,
        businesses,
    } = Snapshot::load(snapshot_path)?;

    let index = SpatialIndex::with_config(zones, hazard_zones, &config.index);
    let evaluator = ComplianceEvaluator::new(config.evaluator);
    let result = evaluator.evaluate_request(&request, &categories, &index, &businesses)?;

    log::info!(
        "Application {} -> {}",
        request.business_name.as_deref().unwrap_or("(unnamed)"),
        result.status
    );

    let output = EvaluationOutput {
        result,
        geometry_issues: index.issues(),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
