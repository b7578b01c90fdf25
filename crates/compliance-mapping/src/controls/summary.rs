use super::loader::{ControlDataset, ControlRecord};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

pub const IMPLEMENTED: &str = "Implemented";

/// Framework rows by category columns, zero-filled. Both axes sort ascending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountPivot {
    pub dimension: &'static str,
    pub frameworks: Vec<String>,
    pub categories: Vec<String>,
    pub counts: Vec<Vec<usize>>,
}

impl CountPivot {
    fn tally<'a, I>(dimension: &'static str, pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut cells: BTreeMap<&str, BTreeMap<&str, usize>> = BTreeMap::new();
        let mut categories = BTreeSet::new();

        for (framework, category) in pairs {
            *cells
                .entry(framework)
                .or_default()
                .entry(category)
                .or_insert(0) += 1;
            categories.insert(category);
        }

        let counts = cells
            .values()
            .map(|row| {
                categories
                    .iter()
                    .map(|category| row.get(category).copied().unwrap_or(0))
                    .collect()
            })
            .collect();

        Self {
            dimension,
            frameworks: cells.keys().map(|framework| framework.to_string()).collect(),
            categories: categories.into_iter().map(str::to_string).collect(),
            counts,
        }
    }

    pub fn row(&self, framework: &str) -> Option<&[usize]> {
        self.frameworks
            .iter()
            .position(|candidate| candidate == framework)
            .and_then(|position| self.counts.get(position))
            .map(Vec::as_slice)
    }

    /// Zero for any framework or category that never appeared.
    pub fn count(&self, framework: &str, category: &str) -> usize {
        let Some(column) = self
            .categories
            .iter()
            .position(|candidate| candidate == category)
        else {
            return 0;
        };

        self.row(framework)
            .and_then(|row| row.get(column).copied())
            .unwrap_or(0)
    }

    pub fn row_total(&self, framework: &str) -> usize {
        self.row(framework)
            .map(|row| row.iter().sum())
            .unwrap_or(0)
    }

    pub fn rows(&self) -> impl Iterator<Item = (&str, &[usize])> {
        self.frameworks
            .iter()
            .map(String::as_str)
            .zip(self.counts.iter().map(Vec::as_slice))
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().flatten().copied().max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.frameworks.is_empty()
    }
}

/// Share of a framework's controls marked Implemented.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameworkCompliance {
    pub framework: String,
    pub implemented: usize,
    pub total: usize,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplianceSummary {
    pub status: CountPivot,
    pub evidence: CountPivot,
    pub compliance: Vec<FrameworkCompliance>,
}

impl ComplianceSummary {
    pub fn from_dataset(dataset: &ControlDataset) -> Self {
        Self {
            status: status_summary(dataset),
            evidence: evidence_summary(dataset),
            compliance: compliance_percentages(dataset),
        }
    }

    pub fn compliance_for(&self, framework: &str) -> Option<&FrameworkCompliance> {
        self.compliance
            .iter()
            .find(|entry| entry.framework == framework)
    }
}

pub fn status_summary(dataset: &ControlDataset) -> CountPivot {
    CountPivot::tally(
        "Status",
        dataset
            .records()
            .iter()
            .map(|record| (record.framework.as_str(), record.status.as_str())),
    )
}

pub fn evidence_summary(dataset: &ControlDataset) -> CountPivot {
    CountPivot::tally(
        "Evidence_Provided",
        dataset
            .records()
            .iter()
            .map(|record| (record.framework.as_str(), record.evidence_provided.label())),
    )
}

pub fn compliance_percentages(dataset: &ControlDataset) -> Vec<FrameworkCompliance> {
    let mut tallies: BTreeMap<&str, (usize, usize)> = BTreeMap::new();

    for record in dataset.records() {
        let (implemented, total) = tallies.entry(record.framework.as_str()).or_default();
        *total += 1;
        if is_implemented(record) {
            *implemented += 1;
        }
    }

    tallies
        .into_iter()
        .map(|(framework, (implemented, total))| FrameworkCompliance {
            framework: framework.to_string(),
            implemented,
            total,
            percent: compliance_percent(implemented, total),
        })
        .collect()
}

pub(crate) fn is_implemented(record: &ControlRecord) -> bool {
    record.status == IMPLEMENTED
}

fn compliance_percent(implemented: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let percent = implemented as f64 / total as f64 * 100.0;
    // Exact halves go to the even digit, matching pandas `round(1)`.
    (percent * 10.0).round_ties_even() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "Control_ID,Framework,Control_Name,Mapped_To,Status,Evidence_File,Owner,Due_Date,Notes";

    fn dataset(body: &str) -> ControlDataset {
        let csv = format!("{HEADER}\n{body}");
        ControlDataset::from_reader(csv.as_bytes()).expect("dataset loads")
    }

    #[test]
    fn pivots_are_zero_filled_and_sorted() {
        let data = dataset(
            "C1,ISO,n,m,Implemented,ev,o,d,x\n\
             C2,NIST,n,m,In Progress,,o,d,x\n\
             C3,NIST,n,m,implemented,ev,o,d,x\n",
        );
        let pivot = status_summary(&data);

        assert_eq!(pivot.frameworks, ["ISO", "NIST"]);
        assert_eq!(pivot.categories, ["Implemented", "In Progress"]);
        assert_eq!(pivot.counts, vec![vec![1, 0], vec![1, 1]]);
        assert_eq!(pivot.count("ISO", "In Progress"), 0);
        assert_eq!(pivot.count("SOC2", "Implemented"), 0);
        assert_eq!(pivot.count("NIST", "Retired"), 0);
        assert_eq!(pivot.max_count(), 1);
    }

    #[test]
    fn status_rows_sum_to_framework_totals() {
        let data = dataset(
            "C1,ISO,n,m,Implemented,ev,o,d,x\n\
             C2,ISO,n,m,Not Started,,o,d,x\n\
             C3,NIST,n,m,In Progress,ev,o,d,x\n\
             C4,NIST,n,m,Not Started,N/A,o,d,x\n\
             C5,NIST,n,m,Implemented,ev,o,d,x\n",
        );
        let summary = ComplianceSummary::from_dataset(&data);

        for entry in &summary.compliance {
            assert_eq!(summary.status.row_total(&entry.framework), entry.total);
            assert_eq!(summary.evidence.row_total(&entry.framework), entry.total);
        }
        assert_eq!(summary.evidence.count("NIST", "No"), 1);
        assert_eq!(summary.evidence.count("ISO", "Yes"), 1);
    }

    #[test]
    fn compliance_percent_is_rounded_to_one_decimal() {
        let data = dataset(
            "C1,NIST,n,m,Implemented,ev,o,d,x\n\
             C2,NIST,n,m,Implemented,ev,o,d,x\n\
             C3,NIST,n,m,In Progress,ev,o,d,x\n\
             C4,ISO,n,m,Not Started,ev,o,d,x\n\
             C5,SOC2,n,m,Implemented,ev,o,d,x\n",
        );
        let summary = ComplianceSummary::from_dataset(&data);

        let nist = summary.compliance_for("NIST").expect("nist present");
        assert_eq!(nist.implemented, 2);
        assert_eq!(nist.total, 3);
        assert_eq!(nist.percent, 66.7);
        assert_eq!(summary.compliance_for("ISO").map(|c| c.percent), Some(0.0));
        assert_eq!(summary.compliance_for("SOC2").map(|c| c.percent), Some(100.0));
    }

    #[test]
    fn exact_halves_round_to_even() {
        assert_eq!(compliance_percent(1, 16), 6.2);
        assert_eq!(compliance_percent(3, 16), 18.8);
        assert_eq!(compliance_percent(5, 16), 31.2);
        assert_eq!(compliance_percent(1, 8), 12.5);
    }

    #[test]
    fn empty_framework_has_zero_percent() {
        assert_eq!(compliance_percent(0, 0), 0.0);
    }

    #[test]
    fn aggregates_ignore_row_order() {
        let forward = dataset(
            "C1,ISO,n,m,Implemented,ev,o,d,x\n\
             C2,NIST,n,m,Not Started,,o,d,x\n",
        );
        let reversed = dataset(
            "C2,NIST,n,m,Not Started,,o,d,x\n\
             C1,ISO,n,m,Implemented,ev,o,d,x\n",
        );
        assert_eq!(
            ComplianceSummary::from_dataset(&forward),
            ComplianceSummary::from_dataset(&reversed)
        );
    }

    #[test]
    fn empty_dataset_produces_empty_aggregates() {
        let summary = ComplianceSummary::from_dataset(&dataset(""));
        assert!(summary.status.is_empty());
        assert!(summary.evidence.is_empty());
        assert!(summary.compliance.is_empty());
        assert_eq!(summary.status.max_count(), 0);
    }
}
