//! Authorization status state machine.
//!
//! ```text
//! pre-registered ──► submitted ──► approved
//!                        │
//!                        └───────► rejected
//! ```
//!
//! `approved` and `rejected` are terminal. A record created directly through
//! self-registration starts at `submitted`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const STATUS_PRE_REGISTERED: &str = "pre-registered";
pub const STATUS_SUBMITTED: &str = "submitted";
pub const STATUS_APPROVED: &str = "approved";
pub const STATUS_REJECTED: &str = "rejected";

/// Lifecycle state of a student's authorization for one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthorizationStatus {
    PreRegistered,
    Submitted,
    Approved,
    Rejected,
}

impl AuthorizationStatus {
    pub const ALL: [AuthorizationStatus; 4] = [
        AuthorizationStatus::PreRegistered,
        AuthorizationStatus::Submitted,
        AuthorizationStatus::Approved,
        AuthorizationStatus::Rejected,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AuthorizationStatus::PreRegistered => STATUS_PRE_REGISTERED,
            AuthorizationStatus::Submitted => STATUS_SUBMITTED,
            AuthorizationStatus::Approved => STATUS_APPROVED,
            AuthorizationStatus::Rejected => STATUS_REJECTED,
        }
    }

    /// Position in the lattice. Transitions only ever increase it.
    fn rank(self) -> u8 {
        match self {
            AuthorizationStatus::PreRegistered => 0,
            AuthorizationStatus::Submitted => 1,
            AuthorizationStatus::Approved | AuthorizationStatus::Rejected => 2,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            AuthorizationStatus::Approved | AuthorizationStatus::Rejected
        )
    }

    /// Whether `self -> next` is an edge of the state machine.
    pub fn can_transition_to(self, next: AuthorizationStatus) -> bool {
        use AuthorizationStatus::*;
        matches!(
            (self, next),
            (PreRegistered, Submitted) | (Submitted, Approved) | (Submitted, Rejected)
        )
    }
}

impl fmt::Display for AuthorizationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthorizationStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AuthorizationStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("Unknown authorization status '{s}'")))
    }
}

impl TryFrom<String> for AuthorizationStatus {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Reject any move that is not an edge of the state machine.
pub fn ensure_transition(
    from: AuthorizationStatus,
    to: AuthorizationStatus,
) -> Result<(), CoreError> {
    if from.can_transition_to(to) {
        return Ok(());
    }
    let reason = if from.is_terminal() {
        format!("authorization is already {from}")
    } else if to.rank() <= from.rank() {
        format!("status cannot move back from {from} to {to}")
    } else {
        format!("authorization must be {} before it can be {to}", required_predecessor(to))
    };
    Err(CoreError::Validation(format!("Invalid status transition: {reason}")))
}

fn required_predecessor(to: AuthorizationStatus) -> AuthorizationStatus {
    match to {
        AuthorizationStatus::Submitted => AuthorizationStatus::PreRegistered,
        _ => AuthorizationStatus::Submitted,
    }
}

/// The two outcomes a reviewer may choose.
///
/// Approval and rejection go through one operation so the permission check
/// and the transition check live in a single place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewDecision {
    Approve,
    Reject,
}

impl ReviewDecision {
    /// Accepts exactly `"approved"` or `"rejected"`.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            STATUS_APPROVED => Ok(ReviewDecision::Approve),
            STATUS_REJECTED => Ok(ReviewDecision::Reject),
            other => Err(CoreError::Validation(format!(
                "Invalid status '{other}'. Use '{STATUS_APPROVED}' or '{STATUS_REJECTED}'"
            ))),
        }
    }

    pub fn target_status(self) -> AuthorizationStatus {
        match self {
            ReviewDecision::Approve => AuthorizationStatus::Approved,
            ReviewDecision::Reject => AuthorizationStatus::Rejected,
        }
    }

    /// Validate the decision against the record's current status.
    pub fn apply_to(self, current: AuthorizationStatus) -> Result<AuthorizationStatus, CoreError> {
        let next = self.target_status();
        ensure_transition(current, next)?;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use AuthorizationStatus::*;

    #[test]
    fn string_forms_round_trip() {
        for status in AuthorizationStatus::ALL {
            assert_eq!(status.as_str().parse::<AuthorizationStatus>().unwrap(), status);
        }
        assert_eq!(serde_json::to_string(&PreRegistered).unwrap(), "\"pre-registered\"");
    }

    #[test]
    fn only_the_four_edges_are_allowed() {
        let allowed = [
            (PreRegistered, Submitted),
            (Submitted, Approved),
            (Submitted, Rejected),
        ];
        for from in AuthorizationStatus::ALL {
            for to in AuthorizationStatus::ALL {
                assert_eq!(
                    from.can_transition_to(to),
                    allowed.contains(&(from, to)),
                    "{from} -> {to}"
                );
            }
        }
    }

    #[test]
    fn transitions_never_decrease_rank() {
        for from in AuthorizationStatus::ALL {
            for to in AuthorizationStatus::ALL {
                if from.can_transition_to(to) {
                    assert!(to.rank() > from.rank());
                }
            }
        }
    }

    #[test]
    fn terminal_states_have_no_exit() {
        for terminal in [Approved, Rejected] {
            assert!(terminal.is_terminal());
            for to in AuthorizationStatus::ALL {
                assert_matches!(ensure_transition(terminal, to), Err(CoreError::Validation(_)));
            }
        }
    }

    #[test]
    fn review_decision_accepts_exactly_two_values() {
        assert_eq!(ReviewDecision::parse("approved").unwrap(), ReviewDecision::Approve);
        assert_eq!(ReviewDecision::parse("rejected").unwrap(), ReviewDecision::Reject);
        for bad in ["", "Approved", "submitted", "pre-registered", "aprovado"] {
            assert_matches!(ReviewDecision::parse(bad), Err(CoreError::Validation(_)));
        }
    }

    #[test]
    fn review_requires_submitted() {
        assert_eq!(ReviewDecision::Approve.apply_to(Submitted).unwrap(), Approved);
        assert_eq!(ReviewDecision::Reject.apply_to(Submitted).unwrap(), Rejected);

        let err = ReviewDecision::Approve.apply_to(PreRegistered).unwrap_err();
        assert!(err.to_string().contains("must be submitted"));

        let err = ReviewDecision::Reject.apply_to(Approved).unwrap_err();
        assert!(err.to_string().contains("already approved"));
    }

    #[test]
    fn resubmission_is_rejected() {
        let err = ensure_transition(Submitted, Submitted).unwrap_err();
        assert!(err.to_string().contains("cannot move back"));
    }
}
