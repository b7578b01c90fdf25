use compliance_mapping::controls::{ComplianceSummary, ControlDataset, ControlRecord, CountPivot};

const TITLE: &str = "Compliance Mapping Dashboard - NIST 800-53 & ISO 27001";
const CAPTION: &str = "Upload your mapping CSV to explore status, evidence and gaps.";
const START_HINT: &str =
    "Upload a CSV to begin. A sample 'compliance_mapping.csv' is included in the repository.";

/// Landing page: upload form plus a hint about the sample mapping.
pub(crate) fn intro_page() -> String {
    page(&notice("info", START_HINT))
}

/// Upload form with an inline failure message in place of any tables.
pub(crate) fn error_page(message: &str) -> String {
    page(&notice("error", message))
}

pub(crate) fn dashboard_page(
    file_name: &str,
    dataset: &ControlDataset,
    summary: &ComplianceSummary,
    gaps: &[&ControlRecord],
) -> String {
    let mut body = String::new();
    body.push_str(&notice(
        "success",
        &format!(
            "Loaded {} controls from {}.",
            dataset.len(),
            file_name
        ),
    ));

    body.push_str("<h2>Controls</h2>");
    body.push_str(&control_table(dataset.columns(), dataset.records().iter()));

    body.push_str("<h2>Status Summary</h2>");
    body.push_str(&pivot_table(&summary.status));

    body.push_str("<h2>Evidence Summary</h2>");
    body.push_str(&pivot_table(&summary.evidence));

    body.push_str("<h2>Compliance %</h2>");
    body.push_str("<table><thead><tr><th>Framework</th><th>Implemented</th><th>Total</th><th>Compliance_%</th></tr></thead><tbody>");
    for entry in &summary.compliance {
        body.push_str(&format!(
            "<tr><td>{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td><td class=\"num\">{:.1}</td></tr>",
            escape_html(&entry.framework),
            entry.implemented,
            entry.total,
            entry.percent
        ));
    }
    body.push_str("</tbody></table>");

    body.push_str("<h2>Gaps (Not Implemented or Missing Evidence)</h2>");
    if gaps.is_empty() {
        body.push_str(&notice("info", "No gaps: every control is implemented with evidence."));
    } else {
        body.push_str(&control_table(dataset.columns(), gaps.iter().copied()));
    }

    page(&body)
}

fn control_table<'a, I>(columns: &[String], records: I) -> String
where
    I: IntoIterator<Item = &'a ControlRecord>,
{
    let mut html = String::from("<table><thead><tr>");
    for column in columns {
        html.push_str(&format!("<th>{}</th>", escape_html(column)));
    }
    html.push_str("</tr></thead><tbody>");

    for record in records {
        html.push_str("<tr>");
        for column in columns {
            let value = record.field(column).unwrap_or("");
            html.push_str(&format!("<td>{}</td>", escape_html(value)));
        }
        html.push_str("</tr>");
    }

    html.push_str("</tbody></table>");
    html
}

fn pivot_table(pivot: &CountPivot) -> String {
    let mut html = format!(
        "<table><thead><tr><th>Framework \\ {}</th>",
        escape_html(pivot.dimension)
    );
    for category in &pivot.categories {
        html.push_str(&format!("<th>{}</th>", escape_html(category)));
    }
    html.push_str("</tr></thead><tbody>");

    for (framework, counts) in pivot.rows() {
        html.push_str(&format!("<tr><td>{}</td>", escape_html(framework)));
        for count in counts {
            html.push_str(&format!("<td class=\"num\">{count}</td>"));
        }
        html.push_str("</tr>");
    }

    html.push_str("</tbody></table>");
    html
}

fn notice(kind: &str, message: &str) -> String {
    format!(
        "<p class=\"notice {kind}\">{}</p>",
        escape_html(message)
    )
}

fn page(body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<title>Compliance Mapping Dashboard</title>
<style>
body {{ font-family: -apple-system, "Segoe UI", Helvetica, Arial, sans-serif; margin: 2rem; color: #1f2328; }}
.caption {{ color: #59636e; }}
table {{ border-collapse: collapse; margin-bottom: 1.5rem; width: 100%; }}
th, td {{ border: 1px solid #d1d9e0; padding: 0.35rem 0.6rem; text-align: left; }}
th {{ background: #f6f8fa; }}
td.num {{ text-align: right; }}
.notice {{ padding: 0.75rem 1rem; border-radius: 6px; }}
.notice.info {{ background: #ddf4ff; }}
.notice.success {{ background: #dafbe1; }}
.notice.error {{ background: #ffebe9; }}
</style>
</head>
<body>
<h1>{title}</h1>
<p class="caption">{caption}</p>
<form action="/upload" method="post" enctype="multipart/form-data">
<input type="file" name="file" accept=".csv,text/csv" required>
<button type="submit">Upload</button>
</form>
{body}
</body>
</html>
"#,
        title = escape_html(TITLE),
        caption = escape_html(CAPTION),
        body = body
    )
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
