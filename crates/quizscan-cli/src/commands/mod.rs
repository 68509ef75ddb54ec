//! Subcommand implementations and the setup they share.

pub mod add;
pub mod delete_student;
pub mod grade;
pub mod history;
pub mod init;
pub mod review;
pub mod scan;
pub mod stats;
pub mod students;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::debug;

use quizscan_core::gateway::ExtractionGateway;
use quizscan_core::gradebook::Gradebook;
use quizscan_core::pipeline::ScanPipeline;
use quizscan_imaging::EnhancingPreprocessor;
use quizscan_providers::config::{load_config_from, QuizscanConfig};
use quizscan_store::JsonFileStore;

/// Flags accepted by every subcommand.
pub struct GlobalOpts {
    pub config: Option<PathBuf>,
    pub data: Option<PathBuf>,
}

pub struct Session {
    pub config: QuizscanConfig,
    pub gradebook: Gradebook,
}

/// Load configuration and open the data file.
pub async fn open_session(opts: &GlobalOpts) -> Result<Session> {
    let config = load_config_from(opts.config.as_deref())?;
    let data_path = opts
        .data
        .clone()
        .unwrap_or_else(|| config.data_path.clone());
    debug!(data = %data_path.display(), provider = %config.default_provider, "opening session");
    let store = JsonFileStore::open(&data_path)
        .await
        .with_context(|| format!("failed to open data file: {}", data_path.display()))?;
    Ok(Session {
        config,
        gradebook: Gradebook::new(Arc::new(store)),
    })
}

/// Assemble the scan pipeline for the chosen provider.
pub fn build_pipeline(config: &QuizscanConfig, provider: Option<&str>) -> Result<ScanPipeline> {
    let provider = config.provider(provider)?;
    debug!(provider = provider.name(), "built scan pipeline");
    Ok(ScanPipeline::new(
        Arc::new(EnhancingPreprocessor::default()),
        ExtractionGateway::new(Arc::from(provider)),
    ))
}

/// Marks without a trailing `.0` when they are whole.
pub fn fmt_marks(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}

pub fn fmt_percent(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |p| format!("{p:.1}%"))
}
