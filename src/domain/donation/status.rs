//! Donation lifecycle statuses.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{StateMachine, ValidationError};

/// Charge lifecycle of a single creation attempt.
///
/// ```text
/// Pending ──► Charging ──► Paid    (persisted)
///                     └──► Failed  (never persisted)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChargeStatus {
    Pending,
    Charging,
    Paid,
    Failed,
}

impl ChargeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChargeStatus::Pending => "pending",
            ChargeStatus::Charging => "charging",
            ChargeStatus::Paid => "paid",
            ChargeStatus::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s {
            "pending" => Ok(ChargeStatus::Pending),
            "charging" => Ok(ChargeStatus::Charging),
            "paid" => Ok(ChargeStatus::Paid),
            "failed" => Ok(ChargeStatus::Failed),
            other => Err(ValidationError::invalid_format(
                "status",
                format!("unknown charge status '{}'", other),
            )),
        }
    }
}

impl StateMachine for ChargeStatus {
    fn valid_transitions(&self) -> Vec<Self> {
        match self {
            ChargeStatus::Pending => vec![ChargeStatus::Charging],
            ChargeStatus::Charging => vec![ChargeStatus::Paid, ChargeStatus::Failed],
            ChargeStatus::Paid | ChargeStatus::Failed => vec![],
        }
    }
}

/// Subscription status of a periodic donation.
///
/// Only the state assigned at creation is modelled; pausing, cancelling and
/// re-billing belong to the billing scheduler, which lives outside this service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodicStatus {
    #[default]
    Active,
}

impl PeriodicStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodicStatus::Active => "active",
        }
    }

    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s {
            "active" => Ok(PeriodicStatus::Active),
            other => Err(ValidationError::invalid_format(
                "periodic_status",
                format!("unknown periodic status '{}'", other),
            )),
        }
    }
}
