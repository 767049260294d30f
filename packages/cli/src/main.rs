#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Demo CLI for the audience-atlas engines.
//!
//! Runs the full pipeline (stores, baseline, overlap, market
//! aggregation, report composition) over a deterministic synthetic
//! dataset and prints results as JSON. Real deployments replace the
//! synthetic sources with implementations of the collaborator traits.

mod sample;

use audience_atlas_analytics::baseline::BaselineCalculator;
use audience_atlas_audience::AudienceMembershipIndex;
use audience_atlas_geo::GeoRecordStore;
use audience_atlas_insights::{all_rules, evaluate};
use audience_atlas_markets::{GeoAggregationEngine, GeoLevel};
use audience_atlas_overlap::OverlapEngine;
use audience_atlas_report::{ReportBuilder, ReportCache, ReportKey};
use audience_atlas_sources::baseline_store::{BaselineStore, JsonFileBaselineStore, MemoryBaselineStore};
use chrono::Utc;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "audience-atlas", about = "Audience research demo over synthetic data")]
struct Cli {
    /// Persist the baseline to this JSON file instead of memory.
    #[arg(long)]
    baseline_path: Option<std::path::PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compose and print a segment report.
    Report {
        /// Segment name (case-insensitive substring, e.g. "coffee").
        segment: String,
        /// Optional audience category tag.
        #[arg(long)]
        category: Option<String>,
    },
    /// Rank aggregated markets at a level.
    Markets {
        /// Rollup level.
        #[arg(value_enum, default_value = "metro")]
        level: LevelArg,
        /// Number of markets to print.
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Show (or force-recompute) the cross-segment baseline.
    Baseline {
        /// Recompute even when a fresh snapshot exists.
        #[arg(long)]
        recalculate: bool,
    },
    /// Evaluate the static insight rules for a segment.
    Insight {
        /// Segment name.
        segment: String,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum LevelArg {
    Region,
    State,
    Metro,
    County,
    City,
}

impl From<LevelArg> for GeoLevel {
    fn from(level: LevelArg) -> Self {
        match level {
            LevelArg::Region => Self::Region,
            LevelArg::State => Self::State,
            LevelArg::Metro => Self::Metro,
            LevelArg::County => Self::County,
            LevelArg::City => Self::City,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let geo = GeoRecordStore::from_records(sample::geo_records());
    let audience = AudienceMembershipIndex::from_rows(sample::membership_rows());
    log::info!(
        "synthetic universe ready: {} geographies, {} segments",
        geo.len(),
        audience.segment_count(),
    );

    let baseline_store: Box<dyn BaselineStore> = cli.baseline_path.map_or_else(
        || Box::new(MemoryBaselineStore::new()) as Box<dyn BaselineStore>,
        |path| Box::new(JsonFileBaselineStore::new(path)) as Box<dyn BaselineStore>,
    );
    let now = Utc::now();

    match cli.command {
        Command::Report { segment, category } => {
            let overlap = OverlapEngine::new(&geo, &audience);
            let builder = ReportBuilder::new(&geo, &audience, &overlap, baseline_store.as_ref());
            let cache = ReportCache::default();
            let key = ReportKey {
                segment,
                category,
                include_non_residential: false,
            };
            let report = cache.get_or_build(&key, now, || builder.build(&key, now))?;
            println!("{}", serde_json::to_string_pretty(&*report)?);
        }
        Command::Markets { level, limit } => {
            let engine = GeoAggregationEngine::new(&geo);
            let markets = engine.aggregate_level(level.into());
            let shown: Vec<_> = markets.iter().take(limit).collect();
            println!("{}", serde_json::to_string_pretty(&shown)?);
        }
        Command::Baseline { recalculate } => {
            let calculator = BaselineCalculator::new(&geo, &audience, baseline_store.as_ref());
            let snapshot = if recalculate {
                calculator.recalculate(now)?
            } else {
                calculator.current(now)?
            };
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
        Command::Insight { segment } => {
            let rules = all_rules();
            let matched = evaluate(&rules, &segment);
            println!(
                "{}",
                serde_json::json!({
                    "ruleId": matched.rule_id,
                    "template": matched.template,
                    "confidence": matched.confidence,
                })
            );
        }
    }

    Ok(())
}
