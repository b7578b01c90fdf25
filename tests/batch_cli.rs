use std::path::Path;
use std::process::Command;

fn command() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_compliance-dashboard"));
    command.env_remove("RUST_LOG").env("APP_LOG_LEVEL", "warn");
    command
}

#[test]
fn missing_input_exits_with_status_one() {
    let dir = tempfile::tempdir().expect("temp dir");
    let output = command()
        .current_dir(dir.path())
        .args(["--input", "does-not-exist.csv"])
        .output()
        .expect("binary runs");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("input CSV not found: does-not-exist.csv"));
}

#[test]
fn missing_columns_exit_with_status_one() {
    let dir = tempfile::tempdir().expect("temp dir");
    std::fs::write(dir.path().join("controls.csv"), "Control_ID,Status\nC1,Implemented\n")
        .expect("csv written");

    let output = command()
        .current_dir(dir.path())
        .args(["--input", "controls.csv", "--no-chart"])
        .output()
        .expect("binary runs");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Missing required columns: [Framework"));
    assert!(!dir.path().join("build").exists());
}

#[test]
fn sample_mapping_writes_reports_to_outdir() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = Path::new(env!("CARGO_MANIFEST_DIR")).join("compliance_mapping.csv");

    let output = command()
        .current_dir(dir.path())
        .arg("--input")
        .arg(&input)
        .args(["--outdir", "reports", "--no-chart"])
        .output()
        .expect("binary runs");

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let reports = dir.path().join("reports");
    assert!(reports.join("Compliance_Dashboard.xlsx").exists());
    assert!(reports.join("Compliance_Gaps.xlsx").exists());
    assert!(!reports.join("status_chart.png").exists());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Compliance_Dashboard.xlsx"));
    assert!(stdout.contains("Done."));
}
