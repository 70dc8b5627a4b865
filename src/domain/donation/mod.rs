//! Donation domain: one-time and periodic donations.
//!
//! - `validation` - Pure creation payload rules
//! - `aggregate` - The stored donation record
//! - `patch` - Editable fields and partial update semantics
//! - `order_number` - Gateway order number generation

pub mod aggregate;
mod cardholder;
mod errors;
mod order_number;
mod patch;
mod status;
mod validation;
mod value_objects;

pub use aggregate::{Donation, DonationKind};
pub use cardholder::{check_email, check_phone, CardInfo, Cardholder};
pub use errors::DonationError;
pub use order_number::{OrderNumber, MAX_ORDER_NUMBER_LEN};
pub use patch::{CardholderPatch, DonationPatch};
pub use status::{ChargeStatus, PeriodicStatus};
pub use validation::{
    CardholderDraft, DonationDraft, DonationValidator, ResultUrl, ValidDonation, DEFAULT_DETAILS,
};
pub use value_objects::{Amount, Currency, Frequency, PayMethod, SendReceipt};
