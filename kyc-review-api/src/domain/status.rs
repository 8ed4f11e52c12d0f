use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Review status of a KYC record.
///
/// The status only ever moves forward, one step per review submission,
/// and only through [`KycStatus::transition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "kyc_status", rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum KycStatus {
    Submitted,
    ResponsibleReviewed,
    ComplianceReviewed,
    Completed,
}

/// Outcome of applying the transition function to a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusTransition {
    pub from: KycStatus,
    pub to: KycStatus,
    /// Label of the signature captured at this step; `None` once completed.
    pub signer_label: Option<&'static str>,
}

impl StatusTransition {
    /// True when the transition moves the record forward.
    pub fn advances(&self) -> bool {
        self.from != self.to
    }
}

impl KycStatus {
    pub const ALL: [KycStatus; 4] = [
        KycStatus::Submitted,
        KycStatus::ResponsibleReviewed,
        KycStatus::ComplianceReviewed,
        KycStatus::Completed,
    ];

    /// Pure lookup of the next status and the signature required to reach it.
    ///
    /// `Completed` is absorbing: it maps onto itself with no signer.
    pub fn transition(self) -> StatusTransition {
        let (to, signer_label) = match self {
            KycStatus::Submitted => (KycStatus::ResponsibleReviewed, Some("responsible signature")),
            KycStatus::ResponsibleReviewed => (KycStatus::ComplianceReviewed, Some("compliance signature")),
            KycStatus::ComplianceReviewed => (KycStatus::Completed, Some("oversight-committee signature")),
            KycStatus::Completed => (KycStatus::Completed, None),
        };
        StatusTransition {
            from: self,
            to,
            signer_label,
        }
    }

    pub fn is_terminal(self) -> bool {
        self == KycStatus::Completed
    }

    pub fn as_str(self) -> &'static str {
        match self {
            KycStatus::Submitted => "submitted",
            KycStatus::ResponsibleReviewed => "responsible_reviewed",
            KycStatus::ComplianceReviewed => "compliance_reviewed",
            KycStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for KycStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KycStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "submitted" => Ok(KycStatus::Submitted),
            "responsible_reviewed" => Ok(KycStatus::ResponsibleReviewed),
            "compliance_reviewed" => Ok(KycStatus::ComplianceReviewed),
            "completed" => Ok(KycStatus::Completed),
            other => Err(format!("Unknown KYC status: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_follows_fixed_order() {
        assert_eq!(KycStatus::Submitted.transition().to, KycStatus::ResponsibleReviewed);
        assert_eq!(KycStatus::ResponsibleReviewed.transition().to, KycStatus::ComplianceReviewed);
        assert_eq!(KycStatus::ComplianceReviewed.transition().to, KycStatus::Completed);
    }

    #[test]
    fn test_signer_labels() {
        assert_eq!(KycStatus::Submitted.transition().signer_label, Some("responsible signature"));
        assert_eq!(KycStatus::ResponsibleReviewed.transition().signer_label, Some("compliance signature"));
        assert_eq!(
            KycStatus::ComplianceReviewed.transition().signer_label,
            Some("oversight-committee signature")
        );
    }

    #[test]
    fn test_completed_is_absorbing() {
        let transition = KycStatus::Completed.transition();
        assert_eq!(transition.to, KycStatus::Completed);
        assert_eq!(transition.signer_label, None);
        assert!(!transition.advances());
        assert_eq!(transition.to.transition(), transition);
    }

    #[test]
    fn test_transition_never_regresses() {
        for status in KycStatus::ALL {
            assert!(status.transition().to >= status);
        }
    }

    #[test]
    fn test_string_round_trip() {
        for status in KycStatus::ALL {
            assert_eq!(status.as_str().parse::<KycStatus>(), Ok(status));
        }
        assert!("approved".parse::<KycStatus>().is_err());
    }
}
