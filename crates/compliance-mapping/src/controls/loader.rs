use super::normalizer::{normalize_framework, normalize_status, EvidenceProvided};
use super::schema::{
    resolve_columns, ColumnIndex, ValidationError, CONTROL_ID, CONTROL_NAME, DUE_DATE,
    EVIDENCE_FILE, EVIDENCE_PROVIDED, FRAMEWORK, MAPPED_TO, NOTES, OWNER, STATUS,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum ControlImportError {
    #[error("failed to read control mapping: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid control mapping CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("row on line {line} has {found} fields but the header declares {expected}")]
    RowWidth {
        line: u64,
        expected: usize,
        found: usize,
    },
}

/// One normalized control row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControlRecord {
    #[serde(rename = "Control_ID")]
    pub control_id: String,
    #[serde(rename = "Framework")]
    pub framework: String,
    #[serde(rename = "Control_Name")]
    pub control_name: String,
    #[serde(rename = "Mapped_To")]
    pub mapped_to: String,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "Evidence_File")]
    pub evidence_file: Option<String>,
    #[serde(rename = "Owner")]
    pub owner: String,
    #[serde(rename = "Due_Date")]
    pub due_date: String,
    #[serde(rename = "Notes")]
    pub notes: String,
    #[serde(rename = "Evidence_Provided")]
    pub evidence_provided: EvidenceProvided,
    /// Columns outside the required set, passed through untouched.
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl ControlRecord {
    /// Looks up a cell by column name. Missing evidence reads as an empty cell.
    pub fn field(&self, column: &str) -> Option<&str> {
        let value = match column {
            CONTROL_ID => self.control_id.as_str(),
            FRAMEWORK => self.framework.as_str(),
            CONTROL_NAME => self.control_name.as_str(),
            MAPPED_TO => self.mapped_to.as_str(),
            STATUS => self.status.as_str(),
            EVIDENCE_FILE => self.evidence_file.as_deref().unwrap_or(""),
            OWNER => self.owner.as_str(),
            DUE_DATE => self.due_date.as_str(),
            NOTES => self.notes.as_str(),
            EVIDENCE_PROVIDED => self.evidence_provided.label(),
            other => return self.extra.get(other).map(String::as_str),
        };
        Some(value)
    }

    fn from_row(index: &ColumnIndex, headers: &[String], row: &csv::StringRecord) -> Self {
        let cell = |position: usize| row.get(position).unwrap_or("");

        let evidence_file = Some(cell(index.evidence_file))
            .filter(|value| !value.is_empty())
            .map(str::to_string);
        let evidence_provided = EvidenceProvided::from_evidence_file(evidence_file.as_deref());

        let extra = headers
            .iter()
            .enumerate()
            .filter(|(position, header)| {
                !index.contains(*position) && header.as_str() != EVIDENCE_PROVIDED
            })
            .map(|(position, header)| (header.clone(), cell(position).to_string()))
            .collect();

        Self {
            control_id: cell(index.control_id).to_string(),
            framework: normalize_framework(cell(index.framework)),
            control_name: cell(index.control_name).to_string(),
            mapped_to: cell(index.mapped_to).to_string(),
            status: normalize_status(cell(index.status)),
            evidence_file,
            owner: cell(index.owner).to_string(),
            due_date: cell(index.due_date).to_string(),
            notes: cell(index.notes).to_string(),
            evidence_provided,
            extra,
        }
    }
}

/// The validated, normalized control table shared by every report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlDataset {
    columns: Vec<String>,
    records: Vec<ControlRecord>,
}

impl ControlDataset {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ControlImportError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let dataset = Self::from_reader(file)?;
        debug!(path = %path.display(), rows = dataset.len(), "loaded control mapping");
        Ok(dataset)
    }

    /// Reads a CSV with a header row. The header is validated before any row is parsed.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ControlImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader
            .headers()?
            .iter()
            .map(str::to_string)
            .collect();
        let index = resolve_columns(&headers)?;

        let mut records = Vec::new();
        for row in csv_reader.records() {
            let row = row?;
            if row.len() > headers.len() {
                return Err(ControlImportError::RowWidth {
                    line: row.position().map(|position| position.line()).unwrap_or(0),
                    expected: headers.len(),
                    found: row.len(),
                });
            }
            records.push(ControlRecord::from_row(&index, &headers, &row));
        }

        let mut columns = headers;
        if !columns.iter().any(|column| column == EVIDENCE_PROVIDED) {
            columns.push(EVIDENCE_PROVIDED.to_string());
        }

        Ok(Self { columns, records })
    }

    /// Column names in output order: input order, then the derived evidence flag.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[ControlRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
