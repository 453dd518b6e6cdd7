use std::cmp::Ordering;

use incident_protocol::labels::{
    is_contributing_factor, is_root_cause, CONTRIBUTING_FACTOR_LABELS, MAX_CONTRIBUTING_FACTORS,
    ROOT_CAUSE_LABELS,
};
use incident_protocol::ClassificationResponse;

use crate::classifier::{ClassifierError, LabelScore, ZeroShotClassifier};

/// Orders candidate labels by descending score.
///
/// Labels outside `candidates` and non-finite scores are dropped, a label
/// reported twice keeps its best score, and equal scores keep candidate order.
pub(crate) fn rank_labels(scores: &[LabelScore], candidates: &[&str]) -> Vec<String> {
    let mut ranked: Vec<(&str, f64)> = candidates
        .iter()
        .filter_map(|candidate| {
            scores
                .iter()
                .filter(|entry| entry.label == *candidate && entry.score.is_finite())
                .map(|entry| entry.score)
                .fold(None, |best: Option<f64>, score| {
                    Some(best.map_or(score, |best| best.max(score)))
                })
                .map(|score| (*candidate, score))
        })
        .collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    ranked
        .into_iter()
        .map(|(label, _)| label.to_string())
        .collect()
}

/// Runs both classifications and keeps the top root cause and the top
/// contributing factors.
pub(crate) async fn classify_report(
    classifier: &dyn ZeroShotClassifier,
    report: &str,
) -> Result<ClassificationResponse, ClassifierError> {
    let (root_scores, factor_scores) = tokio::try_join!(
        classifier.classify(report, &ROOT_CAUSE_LABELS),
        classifier.classify(report, &CONTRIBUTING_FACTOR_LABELS),
    )?;

    let root_cause = rank_labels(&root_scores, &ROOT_CAUSE_LABELS)
        .into_iter()
        .next()
        .ok_or_else(|| {
            ClassifierError::InvalidOutput("no root-cause label in classifier output".to_string())
        })?;
    let contributing_factors = rank_labels(&factor_scores, &CONTRIBUTING_FACTOR_LABELS)
        .into_iter()
        .take(MAX_CONTRIBUTING_FACTORS)
        .collect::<Vec<_>>()
        .join(", ");

    let response = ClassificationResponse {
        root_cause,
        contributing_factors,
    };
    debug_assert!(is_root_cause(&response.root_cause));
    debug_assert!(response
        .contributing_factor_list()
        .iter()
        .all(|factor| is_contributing_factor(factor)));
    Ok(response)
}
