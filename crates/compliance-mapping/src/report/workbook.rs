use crate::controls::{ComplianceSummary, ControlDataset, ControlRecord, CountPivot};
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use std::path::Path;

pub const CONTROLS_SHEET: &str = "Controls";
pub const STATUS_SHEET: &str = "Status_Summary";
pub const EVIDENCE_SHEET: &str = "Evidence_Summary";
pub const COMPLIANCE_SHEET: &str = "Compliance_%";
pub const GAPS_SHEET: &str = "Gaps";

const FRAMEWORK_HEADER: &str = "Framework";
const COMPLIANCE_HEADER: &str = "Compliance_%";
const PIVOT_FIRST_ROW: u32 = 2;

/// Writes the four-sheet dashboard: controls, both pivots, and compliance percentages.
pub fn write_dashboard_workbook(
    path: &Path,
    dataset: &ControlDataset,
    summary: &ComplianceSummary,
) -> Result<(), XlsxError> {
    let header = header_format();
    let mut workbook = Workbook::new();

    let controls = workbook.add_worksheet().set_name(CONTROLS_SHEET)?;
    write_control_rows(controls, dataset.columns(), dataset.records(), &header)?;

    let status = workbook.add_worksheet().set_name(STATUS_SHEET)?;
    write_pivot(status, &summary.status, &header)?;

    let evidence = workbook.add_worksheet().set_name(EVIDENCE_SHEET)?;
    write_pivot(evidence, &summary.evidence, &header)?;

    let compliance = workbook.add_worksheet().set_name(COMPLIANCE_SHEET)?;
    compliance.write_string_with_format(0, 0, FRAMEWORK_HEADER, &header)?;
    compliance.write_string_with_format(0, 1, COMPLIANCE_HEADER, &header)?;
    for (row, entry) in (1u32..).zip(&summary.compliance) {
        compliance.write_string(row, 0, &entry.framework)?;
        compliance.write_number(row, 1, entry.percent)?;
    }
    compliance.autofit();

    workbook.save(path)
}

/// Writes the gap controls as a single sheet with the full control columns.
pub fn write_gap_workbook(
    path: &Path,
    columns: &[String],
    gaps: &[&ControlRecord],
) -> Result<(), XlsxError> {
    let header = header_format();
    let mut workbook = Workbook::new();

    let sheet = workbook.add_worksheet().set_name(GAPS_SHEET)?;
    write_control_rows(sheet, columns, gaps.iter().copied(), &header)?;

    workbook.save(path)
}

fn header_format() -> Format {
    Format::new().set_bold()
}

fn write_control_rows<'a, I>(
    sheet: &mut Worksheet,
    columns: &[String],
    records: I,
    header: &Format,
) -> Result<(), XlsxError>
where
    I: IntoIterator<Item = &'a ControlRecord>,
{
    for (col, column) in (0u16..).zip(columns) {
        sheet.write_string_with_format(0, col, column, header)?;
    }

    for (row, record) in (1u32..).zip(records) {
        for (col, column) in (0u16..).zip(columns) {
            if let Some(value) = record.field(column) {
                sheet.write_string(row, col, value)?;
            }
        }
    }

    sheet.autofit();
    Ok(())
}

/// Lays a pivot out the way a dataframe export does: the category axis name
/// and category headers on row 0, the `Framework` index name alone on row 1,
/// and one framework per row from row 2.
fn write_pivot(sheet: &mut Worksheet, pivot: &CountPivot, header: &Format) -> Result<(), XlsxError> {
    sheet.write_string_with_format(0, 0, pivot.dimension, header)?;
    for (col, category) in (1u16..).zip(&pivot.categories) {
        sheet.write_string_with_format(0, col, category, header)?;
    }
    sheet.write_string_with_format(1, 0, FRAMEWORK_HEADER, header)?;

    for (row, (framework, counts)) in (PIVOT_FIRST_ROW..).zip(pivot.rows()) {
        sheet.write_string_with_format(row, 0, framework, header)?;
        for (col, count) in (1u16..).zip(counts) {
            sheet.write_number(row, col, *count as f64)?;
        }
    }

    sheet.autofit();
    Ok(())
}
