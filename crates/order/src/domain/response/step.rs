use crate::{
    domain::response::notification::NotificationResult, model::notification::NotificationOutcome,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Result of a best-effort step. Never turns into an error for the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum StepOutcome {
    Ok,
    Skipped { reason: String },
    Failed { reason: String },
}

impl StepOutcome {
    pub fn skipped(reason: impl Into<String>) -> Self {
        StepOutcome::Skipped {
            reason: reason.into(),
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        StepOutcome::Failed {
            reason: reason.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, StepOutcome::Ok)
    }
}

impl From<&NotificationResult> for StepOutcome {
    fn from(result: &NotificationResult) -> Self {
        let reason = || result.reason.clone().unwrap_or_default();
        match result.outcome {
            NotificationOutcome::Sent => StepOutcome::Ok,
            NotificationOutcome::Skipped => StepOutcome::skipped(reason()),
            NotificationOutcome::Failed => StepOutcome::failed(reason()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn outcomes_serialize_with_status_tag() {
        assert_eq!(serde_json::to_value(StepOutcome::Ok).ok(), Some(json!({ "status": "ok" })));
        assert_eq!(
            serde_json::to_value(StepOutcome::failed("smtp down")).ok(),
            Some(json!({ "status": "failed", "reason": "smtp down" }))
        );
    }
}
