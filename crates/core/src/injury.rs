//! Injury status categories.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Injury report category for a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InjuryStatus {
    Out,
    Doubtful,
    Questionable,
    /// Injured reserve ("IR").
    ReserveList,
    /// Physically unable to perform ("PUP").
    PhysicallyUnableToPerform,
    Suspended,
    /// Illness / medical protocol list ("COV").
    MedicalList,
    /// Not active ("NA"). Sleeper's catch-all for inactive designations;
    /// unlike `Out` it does not imply a zero-point starter.
    NotActive,
    /// Not on the injury report.
    Healthy,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unrecognized injury status: {0:?}")]
pub struct UnknownInjuryStatus(pub String);

impl InjuryStatus {
    /// Parse the `injury_status` field of a Sleeper player record.
    /// A missing or blank status means the player is healthy.
    pub fn from_sleeper(raw: Option<&str>) -> Result<Self, UnknownInjuryStatus> {
        match raw.map(str::trim) {
            None | Some("") => Ok(InjuryStatus::Healthy),
            Some(s) => s.parse(),
        }
    }

    /// Short label as it appears on the Sleeper injury report.
    pub fn label(self) -> &'static str {
        match self {
            InjuryStatus::Out => "Out",
            InjuryStatus::Doubtful => "Doubtful",
            InjuryStatus::Questionable => "Questionable",
            InjuryStatus::ReserveList => "IR",
            InjuryStatus::PhysicallyUnableToPerform => "PUP",
            InjuryStatus::Suspended => "Suspended",
            InjuryStatus::MedicalList => "COV",
            InjuryStatus::NotActive => "NA",
            InjuryStatus::Healthy => "Healthy",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            InjuryStatus::Out => "🚑",
            InjuryStatus::Doubtful => "⚠️",
            InjuryStatus::Questionable => "❓",
            InjuryStatus::ReserveList => "🏥",
            InjuryStatus::PhysicallyUnableToPerform => "📋",
            InjuryStatus::Suspended => "🚫",
            InjuryStatus::MedicalList => "😷",
            InjuryStatus::NotActive => "⏸️",
            InjuryStatus::Healthy => "✅",
        }
    }

    /// Whether a starter with this status is guaranteed to score nothing.
    #[inline]
    pub fn scores_zero(self) -> bool {
        matches!(
            self,
            InjuryStatus::Out
                | InjuryStatus::ReserveList
                | InjuryStatus::Suspended
                | InjuryStatus::PhysicallyUnableToPerform
                | InjuryStatus::MedicalList
        )
    }

    #[inline]
    pub fn is_healthy(self) -> bool {
        self == InjuryStatus::Healthy
    }
}

impl FromStr for InjuryStatus {
    type Err = UnknownInjuryStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "out" => Ok(InjuryStatus::Out),
            "na" => Ok(InjuryStatus::NotActive),
            "doubtful" => Ok(InjuryStatus::Doubtful),
            "questionable" => Ok(InjuryStatus::Questionable),
            "ir" => Ok(InjuryStatus::ReserveList),
            "pup" => Ok(InjuryStatus::PhysicallyUnableToPerform),
            "sus" | "suspended" => Ok(InjuryStatus::Suspended),
            "cov" | "covid" => Ok(InjuryStatus::MedicalList),
            "healthy" => Ok(InjuryStatus::Healthy),
            _ => Err(UnknownInjuryStatus(s.to_string())),
        }
    }
}

impl fmt::Display for InjuryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
