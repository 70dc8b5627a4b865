//! Partial updates to a stored donation.
//!
//! Only cardholder details, the receipt preference, the feedback flag and notes
//! are editable. For optional fields the outer `Option` says whether the key was
//! present and the inner one whether it carries a value, so an explicit `null`
//! clears a field while an absent key leaves it alone.

use crate::domain::foundation::{Timestamp, ValidationError};

use super::cardholder::{check_email, check_phone};
use super::{Donation, SendReceipt};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardholderPatch {
    /// Email is required on every donation, so it can be replaced but not cleared.
    pub email: Option<String>,
    pub name: Option<Option<String>>,
    pub phone_number: Option<Option<String>>,
    pub address: Option<Option<String>>,
    pub national_id: Option<Option<String>>,
    pub zip_code: Option<Option<String>>,
}

impl CardholderPatch {
    fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.name.is_none()
            && self.phone_number.is_none()
            && self.address.is_none()
            && self.national_id.is_none()
            && self.zip_code.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DonationPatch {
    pub cardholder: CardholderPatch,
    pub send_receipt: Option<SendReceipt>,
    pub to_feedback: Option<bool>,
    pub notes: Option<Option<String>>,
}

impl DonationPatch {
    /// True when the patch would change nothing.
    pub fn is_empty(&self) -> bool {
        self.cardholder.is_empty()
            && self.send_receipt.is_none()
            && self.to_feedback.is_none()
            && self.notes.is_none()
    }

    /// Checks the values that carry format rules.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(email) = &self.cardholder.email {
            check_email("cardholder.email", email)?;
        }
        if let Some(Some(phone)) = &self.cardholder.phone_number {
            check_phone("cardholder.phone_number", phone)?;
        }
        Ok(())
    }

    /// Applies the present keys to `donation`. Returns whether any value changed;
    /// `updated_at` is only bumped in that case, so reapplying a patch is a no-op.
    ///
    /// Identity, amount, card and order fields are not reachable from a patch.
    pub fn apply(&self, donation: &mut Donation) -> bool {
        if self.is_empty() {
            return false;
        }
        let before = donation.clone();

        let holder = &mut donation.cardholder;
        if let Some(email) = &self.cardholder.email {
            holder.email = email.clone();
        }
        if let Some(name) = &self.cardholder.name {
            holder.name = name.clone();
        }
        if let Some(phone) = &self.cardholder.phone_number {
            holder.phone_number = phone.clone();
        }
        if let Some(address) = &self.cardholder.address {
            holder.address = address.clone();
        }
        if let Some(national_id) = &self.cardholder.national_id {
            holder.national_id = national_id.clone();
        }
        if let Some(zip) = &self.cardholder.zip_code {
            holder.zip_code = zip.clone();
        }

        if let Some(pref) = self.send_receipt {
            donation.send_receipt = pref;
        }
        if let Some(flag) = self.to_feedback {
            donation.to_feedback = flag;
        }
        if let Some(notes) = &self.notes {
            donation.notes = notes.clone();
        }

        if *donation == before {
            return false;
        }
        donation.updated_at = Timestamp::now();
        true
    }
}
