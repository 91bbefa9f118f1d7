use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum KycStatus {
    Pending,
    Initiated,
    Verified,
    Failed,
}

impl Display for KycStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = match self {
            KycStatus::Pending => "pending",
            KycStatus::Initiated => "initiated",
            KycStatus::Verified => "verified",
            KycStatus::Failed => "failed",
        };
        write!(f, "{}", status)
    }
}

impl KycStatus {
    /// Maps the status vocabulary the KYC vendor uses in webhook payloads onto
    /// the closed set this system stores.
    pub fn from_webhook(value: &str) -> Option<Self> {
        match value {
            "verified" | "approved" => Some(KycStatus::Verified),
            "failed" | "rejected" => Some(KycStatus::Failed),
            "pending" | "requested" => Some(KycStatus::Initiated),
            _ => None,
        }
    }

    /// Terminal statuses carry a completion timestamp; in-flight ones do not.
    pub fn is_terminal(&self) -> bool {
        matches!(self, KycStatus::Verified | KycStatus::Failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn webhook_vocabulary_maps_onto_closed_set() {
        assert_eq!(KycStatus::from_webhook("approved"), Some(KycStatus::Verified));
        assert_eq!(KycStatus::from_webhook("rejected"), Some(KycStatus::Failed));
        assert_eq!(KycStatus::from_webhook("requested"), Some(KycStatus::Initiated));
        assert_eq!(KycStatus::from_webhook("something_else"), None);
    }

    #[test]
    fn only_verified_and_failed_are_terminal() {
        assert!(KycStatus::Verified.is_terminal());
        assert!(KycStatus::Failed.is_terminal());
        assert!(!KycStatus::Pending.is_terminal());
        assert!(!KycStatus::Initiated.is_terminal());
    }
}
