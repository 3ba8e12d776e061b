//! Exit codes for nlshctl
//!
//! One code per translation outcome so scripts can branch on the result
//! without parsing output.

use nlsh_shared::Outcome;

/// A command was produced
pub const EXIT_SUCCESS: i32 = 0;

/// Fatal error (unfitted or corrupt model, bad config, I/O)
pub const EXIT_GENERAL_ERROR: i32 = 1;

/// The request needs clarification
pub const EXIT_CLARIFICATION: i32 = 2;

/// No command exists for the target platform
pub const EXIT_UNSUPPORTED: i32 = 3;

/// The generated command was blocked by the safety gate
pub const EXIT_BLOCKED: i32 = 4;

/// A command was produced but must be confirmed before running
pub const EXIT_NEEDS_CONFIRMATION: i32 = 5;

pub fn exit_code(outcome: &Outcome) -> i32 {
    match outcome {
        Outcome::Command { .. } => EXIT_SUCCESS,
        Outcome::NeedsConfirmation { .. } => EXIT_NEEDS_CONFIRMATION,
        Outcome::Clarification { .. } => EXIT_CLARIFICATION,
        Outcome::Unsupported { .. } => EXIT_UNSUPPORTED,
        Outcome::Blocked { .. } => EXIT_BLOCKED,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nlsh_shared::{Intent, TargetOs};

    #[test]
    fn test_codes_are_distinct_per_outcome() {
        let outcomes = [
            Outcome::Command {
                command: "ls".into(),
            },
            Outcome::Unsupported {
                intent: Intent::Permissions,
                os: TargetOs::Windows,
            },
            Outcome::Blocked {
                reason: "fork bomb".into(),
            },
        ];
        let codes: Vec<i32> = outcomes.iter().map(exit_code).collect();
        assert_eq!(codes, vec![EXIT_SUCCESS, EXIT_UNSUPPORTED, EXIT_BLOCKED]);
    }
}
