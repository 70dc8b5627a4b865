//! Donation payload validation.
//!
//! [`DonationValidator::validate`] turns a structurally parsed [`DonationDraft`]
//! into a [`ValidDonation`]. It is pure: no storage or network access. Rules run
//! in a fixed order and the first failure is returned, naming its field:
//!
//! | order | field | rule |
//! |-------|-------|------|
//! | 1 | `amount` | present, integer >= 1 |
//! | 2 | `cardholder` | present |
//! | 3 | `cardholder.email` | present, valid email |
//! | 4 | `cardholder.phone_number` | E.164 when present |
//! | 5 | `pay_method` / `frequency` | pay method for one-time, frequency for periodic |
//! | 6 | `prime` | present, non-empty |
//! | 7 | `user_id` | present |
//!
//! Secondary format rules (currency, receipt preference, LINE Pay redirect
//! URLs) run after the table.

use crate::domain::foundation::{UserId, ValidationError};

use super::cardholder::{check_email, check_phone};
use super::{
    Amount, Cardholder, Currency, DonationKind, Frequency, PayMethod, SendReceipt,
};

/// Default text sent to the gateway when the donor gives no details.
pub const DEFAULT_DETAILS: &str = "Donation";

/// Frequency value one-time payloads may carry.
const ONE_TIME: &str = "one_time";

/// Cardholder fields as received.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardholderDraft {
    pub email: Option<String>,
    pub name: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub national_id: Option<String>,
    pub zip_code: Option<String>,
}

/// LINE Pay redirect targets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultUrl {
    pub frontend_redirect_url: Option<String>,
    pub backend_redirect_url: Option<String>,
}

/// A creation payload whose JSON shape is correct but whose content is unchecked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DonationDraft {
    pub amount: Option<i64>,
    pub cardholder: Option<CardholderDraft>,
    pub currency: Option<String>,
    pub details: Option<String>,
    pub pay_method: Option<String>,
    pub frequency: Option<String>,
    pub prime: Option<String>,
    pub user_id: Option<UserId>,
    pub to_feedback: Option<bool>,
    pub send_receipt: Option<String>,
    pub notes: Option<String>,
    pub result_url: Option<ResultUrl>,
}

/// A creation payload that passed every rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidDonation {
    pub kind: DonationKind,
    pub amount: Amount,
    pub currency: Currency,
    pub details: String,
    pub pay_method: PayMethod,
    pub frequency: Option<Frequency>,
    pub cardholder: Cardholder,
    pub prime: String,
    /// The `user_id` the client claimed; compared with the identity, never stored.
    pub claimed_user_id: UserId,
    pub to_feedback: bool,
    pub send_receipt: SendReceipt,
    pub notes: Option<String>,
    /// Redirect targets forwarded to the gateway for LINE Pay; never stored.
    pub result_url: Option<ResultUrl>,
}

/// Stateless validator for donation creation payloads.
#[derive(Debug, Clone, Copy, Default)]
pub struct DonationValidator;

impl DonationValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(
        &self,
        draft: &DonationDraft,
        kind: DonationKind,
    ) -> Result<ValidDonation, ValidationError> {
        let amount = match draft.amount {
            Some(value) => Amount::new(value)?,
            None => return Err(ValidationError::empty_field("amount")),
        };

        let holder = draft
            .cardholder
            .as_ref()
            .ok_or_else(|| ValidationError::empty_field("cardholder"))?;

        let email = non_blank(&holder.email)
            .ok_or_else(|| ValidationError::empty_field("cardholder.email"))?;
        check_email("cardholder.email", email)?;

        if let Some(phone) = &holder.phone_number {
            check_phone("cardholder.phone_number", phone)?;
        }

        let (pay_method, frequency) = match kind {
            DonationKind::Prime => {
                let method = non_blank(&draft.pay_method)
                    .ok_or_else(|| ValidationError::empty_field("pay_method"))?
                    .parse::<PayMethod>()?;
                if let Some(freq) = non_blank(&draft.frequency) {
                    if freq != ONE_TIME {
                        return Err(ValidationError::invalid_format(
                            "frequency",
                            "one-time donations have no billing frequency",
                        ));
                    }
                }
                (method, None)
            }
            DonationKind::Periodic => {
                let freq = non_blank(&draft.frequency)
                    .ok_or_else(|| ValidationError::empty_field("frequency"))?
                    .parse::<Frequency>()?;
                let method = match non_blank(&draft.pay_method) {
                    None => PayMethod::CreditCard,
                    Some(m) => m.parse::<PayMethod>()?,
                };
                if method != PayMethod::CreditCard {
                    return Err(ValidationError::invalid_format(
                        "pay_method",
                        "periodic donations only support credit_card",
                    ));
                }
                (method, Some(freq))
            }
        };

        let prime = non_blank(&draft.prime)
            .ok_or_else(|| ValidationError::empty_field("prime"))?
            .to_string();

        let claimed_user_id = draft
            .user_id
            .clone()
            .ok_or_else(|| ValidationError::empty_field("user_id"))?;

        let currency = match non_blank(&draft.currency) {
            Some(code) => Currency::new(code)?,
            None => Currency::default(),
        };

        let send_receipt = match non_blank(&draft.send_receipt) {
            Some(pref) => pref.parse::<SendReceipt>()?,
            None => SendReceipt::default(),
        };

        if pay_method == PayMethod::Line {
            let has_frontend = draft
                .result_url
                .as_ref()
                .and_then(|u| non_blank(&u.frontend_redirect_url))
                .is_some();
            if !has_frontend {
                return Err(ValidationError::empty_field(
                    "result_url.frontend_redirect_url",
                ));
            }
        }

        Ok(ValidDonation {
            kind,
            amount,
            currency,
            details: non_blank(&draft.details)
                .unwrap_or(DEFAULT_DETAILS)
                .to_string(),
            pay_method,
            frequency,
            cardholder: Cardholder {
                email: email.to_string(),
                name: holder.name.clone(),
                phone_number: holder.phone_number.clone(),
                address: holder.address.clone(),
                national_id: holder.national_id.clone(),
                zip_code: holder.zip_code.clone(),
            },
            prime,
            claimed_user_id,
            to_feedback: draft.to_feedback.unwrap_or(false),
            send_receipt,
            notes: draft.notes.clone(),
            result_url: draft.result_url.clone(),
        })
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}
