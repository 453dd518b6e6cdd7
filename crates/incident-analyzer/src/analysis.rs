use incident_protocol::IncidentSubmission;
use serde::Deserialize;

/// Fields the model must return, all required strings.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ModelAnalysis {
    pub(crate) root_cause: String,
    pub(crate) underlying_causes: String,
    pub(crate) corrective_actions: String,
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum ReplyError {
    #[error("reply does not contain a JSON object")]
    NoJsonObject,

    #[error("reply does not match the analysis schema: {0}")]
    Schema(#[from] serde_json::Error),
}

pub(crate) fn build_prompt(submission: &IncidentSubmission) -> String {
    format!(
        r#"Analyze this safety incident and respond strictly in this JSON format:
{{
  "rootCause": "...",
  "underlyingCauses": "...",
  "correctiveActions": "..."
}}

Description: {}
Immediate Causes: {}
Contributing Factors: {}"#,
        submission.description, submission.immediate_causes, submission.contributing_factors
    )
}

pub(crate) fn parse_analysis_reply(content: &str) -> Result<ModelAnalysis, ReplyError> {
    // Models sometimes wrap the object in a code fence or a sentence; read
    // exactly one value from the first brace and ignore what follows it.
    let start = content.find('{').ok_or(ReplyError::NoJsonObject)?;
    let mut values =
        serde_json::Deserializer::from_str(&content[start..]).into_iter::<ModelAnalysis>();
    match values.next() {
        Some(parsed) => Ok(parsed?),
        None => Err(ReplyError::NoJsonObject),
    }
}
