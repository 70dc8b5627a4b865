//! Donation aggregate.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{DonationId, OwnedByUser, Timestamp, UserId};

use super::{
    Amount, CardInfo, Cardholder, ChargeStatus, Currency, Frequency, OrderNumber, PayMethod,
    PeriodicStatus, SendReceipt, ValidDonation,
};

/// The two kinds of donation, stored and routed separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DonationKind {
    /// One-time charge.
    Prime,
    /// Recurring subscription.
    Periodic,
}

impl DonationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DonationKind::Prime => "prime",
            DonationKind::Periodic => "periodic",
        }
    }
}

impl fmt::Display for DonationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A donation that was successfully charged.
///
/// Invariants:
/// - `frequency` and `periodic_status` are `Some` exactly when `kind` is `Periodic`.
/// - `order_number`, `card_info`, `owner_id` and `frequency` never change after creation.
/// - `owner_id` comes from the verified identity, never from the request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Donation {
    pub id: DonationId,
    pub kind: DonationKind,
    pub order_number: OrderNumber,
    pub amount: Amount,
    pub currency: Currency,
    pub details: String,
    pub pay_method: PayMethod,
    pub frequency: Option<Frequency>,
    pub periodic_status: Option<PeriodicStatus>,
    pub cardholder: Cardholder,
    pub card_info: CardInfo,
    pub notes: Option<String>,
    pub send_receipt: SendReceipt,
    pub to_feedback: bool,
    pub status: ChargeStatus,
    /// Gateway transaction id of the creating charge.
    pub transaction_id: String,
    pub owner_id: UserId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Donation {
    /// Builds the record for a charge the gateway accepted.
    pub fn record_paid(
        valid: ValidDonation,
        order_number: OrderNumber,
        owner_id: UserId,
        card_info: CardInfo,
        transaction_id: String,
    ) -> Self {
        let now = Timestamp::now();
        let periodic_status = valid.frequency.map(|_| PeriodicStatus::Active);

        Self {
            id: DonationId::new(),
            kind: valid.kind,
            order_number,
            amount: valid.amount,
            currency: valid.currency,
            details: valid.details,
            pay_method: valid.pay_method,
            frequency: valid.frequency,
            periodic_status,
            cardholder: valid.cardholder,
            card_info,
            notes: valid.notes,
            send_receipt: valid.send_receipt,
            to_feedback: valid.to_feedback,
            status: ChargeStatus::Paid,
            transaction_id,
            owner_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_periodic(&self) -> bool {
        self.kind == DonationKind::Periodic
    }
}

impl OwnedByUser for Donation {
    fn owner_id(&self) -> &UserId {
        &self.owner_id
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// A paid donation owned by `owner`, for tests across the crate.
    pub fn paid_donation(kind: DonationKind, owner: &str) -> Donation {
        let frequency = match kind {
            DonationKind::Prime => None,
            DonationKind::Periodic => Some(Frequency::Monthly),
        };
        let valid = ValidDonation {
            kind,
            amount: Amount::new(500).unwrap(),
            currency: Currency::default(),
            details: "Donation".to_string(),
            pay_method: PayMethod::CreditCard,
            frequency,
            cardholder: Cardholder::new("donor@example.com").unwrap(),
            prime: "test_prime".to_string(),
            claimed_user_id: UserId::new(owner).unwrap(),
            to_feedback: false,
            send_receipt: SendReceipt::Monthly,
            notes: None,
            result_url: None,
        };
        Donation::record_paid(
            valid,
            OrderNumber::generate("test", Timestamp::now()),
            UserId::new(owner).unwrap(),
            CardInfo {
                bin_code: "424242".to_string(),
                last_four: "4242".to_string(),
                funding: 0,
                issuer: None,
                card_type: Some(1),
                country: Some("UNITED KINGDOM".to_string()),
            },
            "D20240101000000".to_string(),
        )
    }
}
