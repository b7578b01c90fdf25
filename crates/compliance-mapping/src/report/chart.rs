use super::ReportError;
use crate::controls::CountPivot;
use plotters::prelude::*;
use plotters::style::{register_font, FontStyle};
use std::path::Path;

const CHART_SIZE: (u32, u32) = (960, 600);
const GROUP_WIDTH: f64 = 0.8;
const FONT_FAMILY: &str = "sans-serif";
const DEJAVU_SANS: &[u8] = include_bytes!("../../assets/DejaVuSans.ttf");

/// Grouped bar chart of control counts: one group per framework, one bar per status.
pub fn render_status_chart(path: &Path, status: &CountPivot) -> Result<(), ReportError> {
    if status.is_empty() {
        return Err(ReportError::Chart("no frameworks to chart".to_string()));
    }
    register_font(FONT_FAMILY, FontStyle::Normal, DEJAVU_SANS)
        .map_err(|_| ReportError::Chart("embedded chart font is not a valid TTF".to_string()))?;
    draw_grouped_bars(path, status).map_err(|err| ReportError::Chart(err.to_string()))
}

fn draw_grouped_bars(path: &Path, status: &CountPivot) -> Result<(), Box<dyn std::error::Error>> {
    let frameworks = status.frameworks.len();
    let categories = status.categories.len().max(1);
    let bar_width = GROUP_WIDTH / categories as f64;
    let y_max = status.max_count() as f64 + 1.0;

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Compliance Status by Framework", (FONT_FAMILY, 24))
        .margin(16)
        .x_label_area_size(48)
        .y_label_area_size(56)
        .build_cartesian_2d(-0.5..frameworks as f64 - 0.5, 0f64..y_max)?;

    let framework_label = |x: &f64| framework_tick_label(&status.frameworks, *x);
    let count_label = |y: &f64| whole_number_label(*y);

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(frameworks)
        .x_desc("Framework")
        .y_desc("Number of Controls")
        .x_label_formatter(&framework_label)
        .y_label_formatter(&count_label)
        .draw()?;

    for (slot, category) in status.categories.iter().enumerate() {
        let color = Palette99::pick(slot).to_rgba();
        let offset = -GROUP_WIDTH / 2.0 + slot as f64 * bar_width;

        let bars = status.rows().enumerate().map(|(index, (_, counts))| {
            let left = index as f64 + offset;
            let height = counts.get(slot).copied().unwrap_or(0) as f64;
            Rectangle::new([(left, 0.0), (left + bar_width, height)], color.filled())
        });

        chart
            .draw_series(bars)?
            .label(category.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Framework name at whole-number positions, blank between groups.
fn framework_tick_label(frameworks: &[String], x: f64) -> String {
    let rounded = x.round();
    if (x - rounded).abs() > 1e-6 || rounded < 0.0 {
        return String::new();
    }
    frameworks
        .get(rounded as usize)
        .cloned()
        .unwrap_or_default()
}

fn whole_number_label(y: f64) -> String {
    let rounded = y.round();
    if (y - rounded).abs() > 1e-6 {
        return String::new();
    }
    format!("{rounded:.0}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_png_for_grouped_counts() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("chart.png");
        let pivot = CountPivot {
            dimension: "Status",
            frameworks: vec!["ISO".to_string(), "NIST".to_string()],
            categories: vec!["Implemented".to_string(), "Not Started".to_string()],
            counts: vec![vec![2, 1], vec![0, 3]],
        };

        render_status_chart(&path, &pivot).expect("chart renders");

        let bytes = std::fs::read(&path).expect("chart written");
        assert!(bytes.starts_with(&[0x89, b'P', b'N', b'G']));
    }

    #[test]
    fn single_framework_chart_renders() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("chart.png");
        let pivot = CountPivot {
            dimension: "Status",
            frameworks: vec!["NIST 800-53".to_string()],
            categories: vec!["In Progress".to_string()],
            counts: vec![vec![4]],
        };

        render_status_chart(&path, &pivot).expect("chart renders");
        assert!(path.exists());
    }

    #[test]
    fn ticks_label_frameworks_only_at_group_centers() {
        let frameworks = vec!["ISO 27001".to_string(), "NIST 800-53".to_string()];
        assert_eq!(framework_tick_label(&frameworks, 0.0), "ISO 27001");
        assert_eq!(framework_tick_label(&frameworks, 1.0), "NIST 800-53");
        assert_eq!(framework_tick_label(&frameworks, 0.5), "");
        assert_eq!(framework_tick_label(&frameworks, -0.5), "");
        assert_eq!(framework_tick_label(&frameworks, 2.0), "");
    }

    #[test]
    fn count_axis_labels_whole_numbers() {
        assert_eq!(whole_number_label(3.0), "3");
        assert_eq!(whole_number_label(2.5), "");
    }

    #[test]
    fn refuses_empty_pivot() {
        let dir = tempfile::tempdir().expect("temp dir");
        let pivot = CountPivot {
            dimension: "Status",
            frameworks: Vec::new(),
            categories: Vec::new(),
            counts: Vec::new(),
        };

        let err = render_status_chart(&dir.path().join("chart.png"), &pivot)
            .expect_err("nothing to draw");
        assert!(matches!(err, ReportError::Chart(_)));
    }
}
