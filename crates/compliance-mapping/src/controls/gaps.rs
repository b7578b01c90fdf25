use super::loader::{ControlDataset, ControlRecord};
use super::normalizer::EvidenceProvided;
use super::summary::is_implemented;

impl ControlRecord {
    /// Not fully implemented, or implemented without evidence.
    pub fn is_gap(&self) -> bool {
        !is_implemented(self) || self.evidence_provided == EvidenceProvided::No
    }
}

/// Gap controls ordered by framework, then status, then control id.
pub fn gap_list(dataset: &ControlDataset) -> Vec<&ControlRecord> {
    let mut gaps: Vec<&ControlRecord> = dataset
        .records()
        .iter()
        .filter(|record| record.is_gap())
        .collect();

    gaps.sort_by(|left, right| {
        (&left.framework, &left.status, &left.control_id).cmp(&(
            &right.framework,
            &right.status,
            &right.control_id,
        ))
    });

    gaps
}
