// Withdrawal status value object

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WithdrawalStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl WithdrawalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WithdrawalStatus::Pending => "pending",
            WithdrawalStatus::Processing => "processing",
            WithdrawalStatus::Completed => "completed",
            WithdrawalStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, WithdrawalStatus::Completed | WithdrawalStatus::Failed)
    }
}

impl From<&str> for WithdrawalStatus {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "processing" => WithdrawalStatus::Processing,
            "completed" => WithdrawalStatus::Completed,
            "failed" => WithdrawalStatus::Failed,
            _ => WithdrawalStatus::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states() {
        assert!(!WithdrawalStatus::Pending.is_terminal());
        assert!(!WithdrawalStatus::Processing.is_terminal());
        assert!(WithdrawalStatus::Completed.is_terminal());
        assert!(WithdrawalStatus::Failed.is_terminal());
    }

    #[test]
    fn round_trips_through_str() {
        for status in [
            WithdrawalStatus::Pending,
            WithdrawalStatus::Processing,
            WithdrawalStatus::Completed,
            WithdrawalStatus::Failed,
        ] {
            assert_eq!(WithdrawalStatus::from(status.as_str()), status);
        }
    }
}
