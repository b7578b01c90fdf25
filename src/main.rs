use clap::Parser;
use compliance_mapping::config::{AppConfig, ReportConfig};
use compliance_mapping::controls::{ComplianceSummary, ControlDataset};
use compliance_mapping::error::AppError;
use compliance_mapping::report::{export_reports, ExportOptions, ReportArtifacts};
use compliance_mapping::telemetry::{self, LogOutput};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "compliance-dashboard",
    about = "Generate compliance mapping dashboards.",
    version
)]
struct Cli {
    /// Path to compliance mapping CSV [default: compliance_mapping.csv]
    #[arg(long)]
    input: Option<PathBuf>,
    /// Output directory for reports [default: build]
    #[arg(long)]
    outdir: Option<PathBuf>,
    /// Skip writing a status chart PNG
    #[arg(long)]
    no_chart: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ReportRequest {
    input: PathBuf,
    outdir: PathBuf,
    chart: bool,
}

impl ReportRequest {
    fn resolve(cli: Cli, defaults: &ReportConfig) -> Self {
        Self {
            input: cli.input.unwrap_or_else(|| defaults.input.clone()),
            outdir: cli.outdir.unwrap_or_else(|| defaults.outdir.clone()),
            chart: !cli.no_chart,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry, LogOutput::Stderr)?;

    let request = ReportRequest::resolve(cli, &config.report);
    let artifacts = generate_reports(&request)?;

    for path in artifacts.paths() {
        println!("Wrote {}", path.display());
    }
    println!("Done. Open the Excel files in the output directory.");
    Ok(())
}

fn generate_reports(request: &ReportRequest) -> Result<ReportArtifacts, AppError> {
    if !request.input.exists() {
        return Err(AppError::MissingInput(request.input.clone()));
    }

    let dataset = ControlDataset::from_path(&request.input)?;
    let summary = ComplianceSummary::from_dataset(&dataset);
    info!(
        input = %request.input.display(),
        controls = dataset.len(),
        frameworks = summary.compliance.len(),
        "summarized control mapping"
    );

    let options = ExportOptions {
        chart: request.chart,
    };
    Ok(export_reports(&request.outdir, &dataset, &summary, options)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn sample_input() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("compliance_mapping.csv")
    }

    fn defaults() -> ReportConfig {
        ReportConfig {
            input: PathBuf::from("compliance_mapping.csv"),
            outdir: PathBuf::from("build"),
        }
    }

    #[test]
    fn flags_fall_back_to_configured_defaults() {
        let cli = Cli::try_parse_from(["compliance-dashboard"]).expect("no flags parse");
        let request = ReportRequest::resolve(cli, &defaults());
        assert_eq!(
            request,
            ReportRequest {
                input: PathBuf::from("compliance_mapping.csv"),
                outdir: PathBuf::from("build"),
                chart: true,
            }
        );
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "compliance-dashboard",
            "--input",
            "controls.csv",
            "--outdir",
            "reports",
            "--no-chart",
        ])
        .expect("flags parse");
        let request = ReportRequest::resolve(cli, &defaults());
        assert_eq!(request.input, PathBuf::from("controls.csv"));
        assert_eq!(request.outdir, PathBuf::from("reports"));
        assert!(!request.chart);
    }

    #[test]
    fn missing_input_is_reported_before_any_output() {
        let dir = tempfile::tempdir().expect("temp dir");
        let request = ReportRequest {
            input: dir.path().join("absent.csv"),
            outdir: dir.path().join("build"),
            chart: true,
        };

        let err = generate_reports(&request).expect_err("input is missing");
        assert!(matches!(err, AppError::MissingInput(_)));
        assert!(!request.outdir.exists());
    }

    #[test]
    fn invalid_mapping_fails_without_writing_reports() {
        let dir = tempfile::tempdir().expect("temp dir");
        let input = dir.path().join("controls.csv");
        std::fs::write(&input, "Control_ID,Framework\nC1,NIST\n").expect("csv written");
        let request = ReportRequest {
            input,
            outdir: dir.path().join("build"),
            chart: false,
        };

        let err = generate_reports(&request).expect_err("validation fails");
        assert!(matches!(err, AppError::Import(_)));
        assert!(!request.outdir.exists());
    }

    #[test]
    fn sample_mapping_produces_all_artifacts() {
        let dir = tempfile::tempdir().expect("temp dir");
        let request = ReportRequest {
            input: sample_input(),
            outdir: dir.path().join("build"),
            chart: true,
        };

        let artifacts = generate_reports(&request).expect("reports generated");
        assert!(artifacts.dashboard.exists());
        assert!(artifacts.gaps.exists());
        assert!(artifacts.chart.expect("chart requested").exists());
    }
}
