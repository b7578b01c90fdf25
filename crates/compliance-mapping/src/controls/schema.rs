pub const CONTROL_ID: &str = "Control_ID";
pub const FRAMEWORK: &str = "Framework";
pub const CONTROL_NAME: &str = "Control_Name";
pub const MAPPED_TO: &str = "Mapped_To";
pub const STATUS: &str = "Status";
pub const EVIDENCE_FILE: &str = "Evidence_File";
pub const OWNER: &str = "Owner";
pub const DUE_DATE: &str = "Due_Date";
pub const NOTES: &str = "Notes";

/// Derived column appended to the control table during normalization.
pub const EVIDENCE_PROVIDED: &str = "Evidence_Provided";

pub const REQUIRED_COLUMNS: [&str; 9] = [
    CONTROL_ID,
    FRAMEWORK,
    CONTROL_NAME,
    MAPPED_TO,
    STATUS,
    EVIDENCE_FILE,
    OWNER,
    DUE_DATE,
    NOTES,
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Missing required columns: [{}]", .0.join(", "))]
    MissingColumns(Vec<String>),
}

impl ValidationError {
    pub fn missing_columns(&self) -> &[String] {
        match self {
            ValidationError::MissingColumns(columns) => columns,
        }
    }
}

/// Positions of the required columns within a header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ColumnIndex {
    pub(crate) control_id: usize,
    pub(crate) framework: usize,
    pub(crate) control_name: usize,
    pub(crate) mapped_to: usize,
    pub(crate) status: usize,
    pub(crate) evidence_file: usize,
    pub(crate) owner: usize,
    pub(crate) due_date: usize,
    pub(crate) notes: usize,
}

impl ColumnIndex {
    pub(crate) fn contains(&self, position: usize) -> bool {
        [
            self.control_id,
            self.framework,
            self.control_name,
            self.mapped_to,
            self.status,
            self.evidence_file,
            self.owner,
            self.due_date,
            self.notes,
        ]
        .contains(&position)
    }
}

/// Confirms every required column is present, naming the ones that are not.
pub fn validate_columns<S: AsRef<str>>(headers: &[S]) -> Result<(), ValidationError> {
    resolve_columns(headers).map(|_| ())
}

pub(crate) fn resolve_columns<S: AsRef<str>>(headers: &[S]) -> Result<ColumnIndex, ValidationError> {
    let positions =
        REQUIRED_COLUMNS.map(|name| headers.iter().position(|header| header.as_ref() == name));

    let [
        Some(control_id),
        Some(framework),
        Some(control_name),
        Some(mapped_to),
        Some(status),
        Some(evidence_file),
        Some(owner),
        Some(due_date),
        Some(notes),
    ] = positions
    else {
        let missing = REQUIRED_COLUMNS
            .iter()
            .zip(positions.iter())
            .filter(|(_, position)| position.is_none())
            .map(|(name, _)| name.to_string())
            .collect();
        return Err(ValidationError::MissingColumns(missing));
    };

    Ok(ColumnIndex {
        control_id,
        framework,
        control_name,
        mapped_to,
        status,
        evidence_file,
        owner,
        due_date,
        notes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_header() -> Vec<&'static str> {
        REQUIRED_COLUMNS.to_vec()
    }

    #[test]
    fn accepts_required_columns_in_any_order_with_extras() {
        let mut headers = full_header();
        headers.reverse();
        headers.push("Risk_Rating");
        assert!(validate_columns(&headers).is_ok());
    }

    #[test]
    fn dropping_any_required_column_names_it() {
        for dropped in REQUIRED_COLUMNS {
            let headers: Vec<&str> = full_header()
                .into_iter()
                .filter(|header| *header != dropped)
                .collect();
            let err = validate_columns(&headers).expect_err("validation fails");
            assert_eq!(err.missing_columns(), [dropped.to_string()]);
            assert!(err.to_string().contains(dropped));
        }
    }

    #[test]
    fn reports_missing_columns_in_required_order() {
        let headers = ["Notes", "Control_ID", "Owner"];
        let err = validate_columns(&headers).expect_err("validation fails");
        assert_eq!(
            err.to_string(),
            "Missing required columns: [Framework, Control_Name, Mapped_To, Status, Evidence_File, Due_Date]"
        );
    }

    #[test]
    fn column_names_are_case_sensitive() {
        let mut headers = full_header();
        headers[0] = "control_id";
        let err = validate_columns(&headers).expect_err("validation fails");
        assert_eq!(err.missing_columns(), ["Control_ID".to_string()]);
    }

    #[test]
    fn resolves_positions_of_shuffled_headers() {
        let headers = [
            "Notes",
            "Extra",
            "Control_ID",
            "Framework",
            "Control_Name",
            "Mapped_To",
            "Status",
            "Evidence_File",
            "Owner",
            "Due_Date",
        ];
        let index = resolve_columns(&headers).expect("columns resolve");
        assert_eq!(index.notes, 0);
        assert_eq!(index.control_id, 2);
        assert!(!index.contains(1));
    }
}
