//! Batch exports: dashboard and gap workbooks plus the status chart.

mod chart;
mod workbook;

use crate::controls::{gap_list, ControlDataset, ComplianceSummary};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub use chart::render_status_chart;
pub use workbook::{write_dashboard_workbook, write_gap_workbook};

pub const DASHBOARD_FILE: &str = "Compliance_Dashboard.xlsx";
pub const GAPS_FILE: &str = "Compliance_Gaps.xlsx";
pub const CHART_FILE: &str = "status_chart.png";

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("failed to prepare output directory: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to write workbook: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),
    #[error("failed to render chart: {0}")]
    Chart(String),
}

#[derive(Debug, Clone, Copy)]
pub struct ExportOptions {
    pub chart: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self { chart: true }
    }
}

/// Files written by a single export run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportArtifacts {
    pub dashboard: PathBuf,
    pub gaps: PathBuf,
    pub chart: Option<PathBuf>,
}

impl ReportArtifacts {
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        [Some(&self.dashboard), Some(&self.gaps), self.chart.as_ref()]
            .into_iter()
            .flatten()
            .map(PathBuf::as_path)
    }
}

pub fn export_reports(
    outdir: &Path,
    dataset: &ControlDataset,
    summary: &ComplianceSummary,
    options: ExportOptions,
) -> Result<ReportArtifacts, ReportError> {
    fs::create_dir_all(outdir)?;

    let dashboard = outdir.join(DASHBOARD_FILE);
    write_dashboard_workbook(&dashboard, dataset, summary)?;
    info!(path = %dashboard.display(), "wrote dashboard workbook");

    let gaps = gap_list(dataset);
    let gaps_path = outdir.join(GAPS_FILE);
    write_gap_workbook(&gaps_path, dataset.columns(), &gaps)?;
    info!(path = %gaps_path.display(), gaps = gaps.len(), "wrote gap workbook");

    let chart = if !options.chart {
        None
    } else if summary.status.is_empty() {
        warn!("no frameworks to chart; skipping status chart");
        None
    } else {
        let chart_path = outdir.join(CHART_FILE);
        render_status_chart(&chart_path, &summary.status)?;
        info!(path = %chart_path.display(), "wrote status chart");
        Some(chart_path)
    };

    Ok(ReportArtifacts {
        dashboard,
        gaps: gaps_path,
        chart,
    })
}
