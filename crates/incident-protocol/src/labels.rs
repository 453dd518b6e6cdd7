//! Closed label sets used by the zero-shot classifier.

pub const ROOT_CAUSE_LABELS: [&str; 5] = [
    "Human error",
    "Equipment failure",
    "Inadequate training",
    "Procedural failure",
    "Poor maintenance",
];

pub const CONTRIBUTING_FACTOR_LABELS: [&str; 5] = [
    "Poor lighting",
    "Slippery surface",
    "Fatigue",
    "Time pressure",
    "Lack of supervision",
];

/// Number of contributing factors reported per classification.
pub const MAX_CONTRIBUTING_FACTORS: usize = 2;

pub fn is_root_cause(label: &str) -> bool {
    ROOT_CAUSE_LABELS.contains(&label)
}

pub fn is_contributing_factor(label: &str) -> bool {
    CONTRIBUTING_FACTOR_LABELS.contains(&label)
}
