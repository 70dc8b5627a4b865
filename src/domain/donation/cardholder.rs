//! Cardholder details and the masked card summary returned by the gateway.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use validator::ValidateEmail;

use crate::domain::foundation::ValidationError;

/// E.164: a plus sign, a non-zero country digit, at most fifteen digits in total.
static E164: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\+[1-9]\d{1,14}$").expect("E.164 pattern is a valid regex")
});

/// Checks an email address; `field` is used in the error.
pub fn check_email(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::empty_field(field));
    }
    if !value.validate_email() {
        return Err(ValidationError::invalid_format(field, "not a valid email address"));
    }
    Ok(())
}

/// Checks a phone number against E.164; `field` is used in the error.
pub fn check_phone(field: &str, value: &str) -> Result<(), ValidationError> {
    if !E164.is_match(value) {
        return Err(ValidationError::invalid_format(
            field,
            "phone number must be in E.164 format, e.g. +886912345678",
        ));
    }
    Ok(())
}

/// Person paying for the donation.
///
/// Optional fields are `None` when never supplied; a patch with an explicit
/// `null` also resets them to `None`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Cardholder {
    pub email: String,
    pub name: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub national_id: Option<String>,
    pub zip_code: Option<String>,
}

impl Cardholder {
    /// Creates a cardholder with only the required email.
    pub fn new(email: impl Into<String>) -> Result<Self, ValidationError> {
        let email = email.into();
        check_email("cardholder.email", &email)?;
        Ok(Self {
            email,
            ..Default::default()
        })
    }
}

/// Masked card summary. Written once from the gateway's charge response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardInfo {
    pub bin_code: String,
    pub last_four: String,
    /// Gateway funding code: 0 credit, 1 debit, 2 prepaid, -1 unknown.
    pub funding: i64,
    pub issuer: Option<String>,
    #[serde(rename = "type")]
    pub card_type: Option<i64>,
    pub country: Option<String>,
}
