//! Condition management helpers following Kubernetes API conventions

use crate::crd::Condition;

pub const CONDITION_TYPE_READY: &str = "Ready";

pub const CONDITION_STATUS_TRUE: &str = "True";
pub const CONDITION_STATUS_FALSE: &str = "False";
pub const CONDITION_STATUS_UNKNOWN: &str = "Unknown";

/// Reasons written on the Ready condition
pub const REASON_INTEGRATION_CREATED: &str = "IntegrationCreated";
pub const REASON_INTEGRATION_CREATION_FAILED: &str = "IntegrationCreationFailed";

/// Insert `condition`, replacing any existing entry of the same type in place.
///
/// The previous `last_transition_time` is kept when the status did not
/// change. Entries of other types keep their position.
pub fn upsert_condition(conditions: &mut Vec<Condition>, mut condition: Condition) {
    if let Some(existing) = conditions.iter_mut().find(|c| c.type_ == condition.type_) {
        if existing.status == condition.status {
            condition.last_transition_time = std::mem::take(&mut existing.last_transition_time);
        }
        *existing = condition;
    } else {
        conditions.push(condition);
    }
}

/// Find a condition by type
pub fn find_condition<'a>(conditions: &'a [Condition], type_: &str) -> Option<&'a Condition> {
    conditions.iter().find(|c| c.type_ == type_)
}

/// Status of a condition, "Unknown" when it has never been set
pub fn condition_status<'a>(conditions: &'a [Condition], type_: &str) -> &'a str {
    find_condition(conditions, type_)
        .map(|c| c.status.as_str())
        .unwrap_or(CONDITION_STATUS_UNKNOWN)
}
