//! Donation value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Donation amount in the currency's minor unit. Always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Amount(i64);

impl Amount {
    pub const MIN: i64 = 1;

    pub fn new(value: i64) -> Result<Self, ValidationError> {
        if value < Self::MIN {
            return Err(ValidationError::out_of_range("amount", Self::MIN, i64::MAX, value));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

/// ISO 4217 currency code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Currency(String);

impl Currency {
    pub const DEFAULT: &'static str = "TWD";

    pub fn new(code: impl Into<String>) -> Result<Self, ValidationError> {
        let code = code.into();
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(ValidationError::invalid_format(
                "currency",
                "expected a three-letter ISO 4217 code",
            ));
        }
        Ok(Self(code))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Currency {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

/// How a one-time donation was paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayMethod {
    CreditCard,
    Line,
    Apple,
    Google,
    Samsung,
}

impl PayMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PayMethod::CreditCard => "credit_card",
            PayMethod::Line => "line",
            PayMethod::Apple => "apple",
            PayMethod::Google => "google",
            PayMethod::Samsung => "samsung",
        }
    }
}

impl fmt::Display for PayMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PayMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "credit_card" => Ok(PayMethod::CreditCard),
            "line" => Ok(PayMethod::Line),
            "apple" => Ok(PayMethod::Apple),
            "google" => Ok(PayMethod::Google),
            "samsung" => Ok(PayMethod::Samsung),
            other => Err(ValidationError::invalid_format(
                "pay_method",
                format!("unsupported pay method '{}'", other),
            )),
        }
    }
}

/// Billing frequency of a periodic donation. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Monthly,
    Yearly,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Monthly => "monthly",
            Frequency::Yearly => "yearly",
        }
    }
}

impl FromStr for Frequency {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "monthly" => Ok(Frequency::Monthly),
            "yearly" => Ok(Frequency::Yearly),
            other => Err(ValidationError::invalid_format(
                "frequency",
                format!("expected 'monthly' or 'yearly', got '{}'", other),
            )),
        }
    }
}

/// How often the donor wants a receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SendReceipt {
    No,
    #[default]
    Monthly,
    Yearly,
}

impl SendReceipt {
    pub fn as_str(&self) -> &'static str {
        match self {
            SendReceipt::No => "no",
            SendReceipt::Monthly => "monthly",
            SendReceipt::Yearly => "yearly",
        }
    }
}

impl FromStr for SendReceipt {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "no" => Ok(SendReceipt::No),
            "monthly" => Ok(SendReceipt::Monthly),
            "yearly" => Ok(SendReceipt::Yearly),
            other => Err(ValidationError::invalid_format(
                "send_receipt",
                format!("expected 'no', 'monthly' or 'yearly', got '{}'", other),
            )),
        }
    }
}
