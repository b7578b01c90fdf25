use serde::Serialize;

/// Cell values a dataframe CSV reader treats as missing by default. Matched
/// case-sensitively after trimming.
const MISSING_MARKERS: [&str; 19] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null", "",
];

/// Whether a control row points at usable evidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum EvidenceProvided {
    Yes,
    No,
}

impl EvidenceProvided {
    /// Blank cells, `N/A` in any case, and the usual missing-value markers
    /// (`NA`, `null`, `None`, `#N/A`, ...) count as no evidence.
    pub fn from_evidence_file(value: Option<&str>) -> Self {
        let Some(trimmed) = value.map(str::trim) else {
            return Self::No;
        };
        if MISSING_MARKERS.contains(&trimmed) || trimmed.eq_ignore_ascii_case("N/A") {
            Self::No
        } else {
            Self::Yes
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EvidenceProvided::Yes => "Yes",
            EvidenceProvided::No => "No",
        }
    }
}

pub fn normalize_framework(raw: &str) -> String {
    raw.trim().to_uppercase()
}

pub fn normalize_status(raw: &str) -> String {
    title_case(raw.trim())
}

/// Upper-cases the first letter of every alphabetic run and lower-cases the rest.
fn title_case(value: &str) -> String {
    let mut titled = String::with_capacity(value.len());
    let mut previous_alphabetic = false;

    for c in value.chars() {
        if c.is_alphabetic() {
            if previous_alphabetic {
                titled.extend(c.to_lowercase());
            } else {
                titled.extend(c.to_uppercase());
            }
        } else {
            titled.push(c);
        }
        previous_alphabetic = c.is_alphabetic();
    }

    titled
}
