//! HTTP DTOs for donation endpoints.
//!
//! Request types only check JSON shape. Business rules belong to
//! [`DonationValidator`](crate::domain::donation::DonationValidator).

use serde::{Deserialize, Serialize};
use serde_with::rust::double_option;

use crate::domain::donation::{
    CardInfo, CardholderDraft, CardholderPatch, Donation, DonationDraft, DonationPatch,
    ResultUrl, SendReceipt,
};
use crate::domain::foundation::UserId;

use crate::adapters::http::response::ApiError;

// ════════════════════════════════════════════════════════════════════════════════
// Shared Request Types
// ════════════════════════════════════════════════════════════════════════════════

/// A `user_id` sent either as a JSON number or as a string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum FlexibleUserId {
    Number(i64),
    Text(String),
}

impl FlexibleUserId {
    /// Blank values count as absent.
    pub fn into_user_id(self) -> Option<UserId> {
        match self {
            FlexibleUserId::Number(n) => UserId::new(n.to_string()).ok(),
            FlexibleUserId::Text(s) => UserId::new(s.trim()).ok(),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CardholderRequest {
    pub email: Option<String>,
    pub name: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub national_id: Option<String>,
    pub zip_code: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResultUrlRequest {
    pub frontend_redirect_url: Option<String>,
    pub backend_redirect_url: Option<String>,
}

/// Body of `POST /v1/donations/{prime,periodic}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateDonationRequest {
    pub amount: Option<i64>,
    #[serde(alias = "donor")]
    pub cardholder: Option<CardholderRequest>,
    pub currency: Option<String>,
    pub details: Option<String>,
    pub frequency: Option<String>,
    /// Accepted for compatibility; the configured merchant is always used.
    #[allow(dead_code)]
    pub merchant_id: Option<serde_json::Value>,
    pub pay_method: Option<String>,
    pub prime: Option<String>,
    pub result_url: Option<ResultUrlRequest>,
    pub user_id: Option<FlexibleUserId>,
    pub to_feedback: Option<bool>,
    pub send_receipt: Option<String>,
    pub notes: Option<String>,
}

impl CreateDonationRequest {
    pub fn into_draft(self) -> DonationDraft {
        DonationDraft {
            amount: self.amount,
            cardholder: self.cardholder.map(|c| CardholderDraft {
                email: c.email,
                name: c.name,
                phone_number: c.phone_number,
                address: c.address,
                national_id: c.national_id,
                zip_code: c.zip_code,
            }),
            currency: self.currency,
            details: self.details,
            pay_method: self.pay_method,
            frequency: self.frequency,
            prime: self.prime,
            user_id: self.user_id.and_then(FlexibleUserId::into_user_id),
            to_feedback: self.to_feedback,
            send_receipt: self.send_receipt,
            notes: self.notes,
            result_url: self.result_url.map(|r| ResultUrl {
                frontend_redirect_url: r.frontend_redirect_url,
                backend_redirect_url: r.backend_redirect_url,
            }),
        }
    }
}

/// Editable cardholder keys. `null` clears; an absent key is left alone.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CardholderPatchRequest {
    #[serde(default, with = "double_option")]
    pub email: Option<Option<String>>,
    #[serde(default, with = "double_option")]
    pub name: Option<Option<String>>,
    #[serde(default, with = "double_option")]
    pub phone_number: Option<Option<String>>,
    #[serde(default, with = "double_option")]
    pub address: Option<Option<String>>,
    #[serde(default, with = "double_option")]
    pub national_id: Option<Option<String>>,
    #[serde(default, with = "double_option")]
    pub zip_code: Option<Option<String>>,
}

/// Body of `PATCH /v1/donations/{prime,periodic}/:id`. Any other key is rejected.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatchDonationRequest {
    #[serde(default, alias = "donor")]
    pub cardholder: Option<CardholderPatchRequest>,
    pub send_receipt: Option<SendReceipt>,
    pub to_feedback: Option<bool>,
    #[serde(default, with = "double_option")]
    pub notes: Option<Option<String>>,
    pub user_id: Option<FlexibleUserId>,
}

impl PatchDonationRequest {
    /// Splits the body into the patch set and the optional owner claim.
    pub fn into_patch(self) -> Result<(DonationPatch, Option<UserId>), ApiError> {
        let holder = self.cardholder.unwrap_or_default();
        let email = match holder.email {
            Some(None) => {
                return Err(ApiError::bad_request(
                    "cardholder.email",
                    "email cannot be cleared",
                ))
            }
            Some(Some(email)) => Some(email),
            None => None,
        };

        let patch = DonationPatch {
            cardholder: CardholderPatch {
                email,
                name: holder.name,
                phone_number: holder.phone_number,
                address: holder.address,
                national_id: holder.national_id,
                zip_code: holder.zip_code,
            },
            send_receipt: self.send_receipt,
            to_feedback: self.to_feedback,
            notes: self.notes,
        };
        let claim = self.user_id.and_then(FlexibleUserId::into_user_id);
        Ok((patch, claim))
    }
}

/// `?user_id=` on single-donation reads.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClaimParams {
    pub user_id: Option<String>,
}

/// Query of the listing endpoint. Values are parsed leniently by the handler.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    pub offset: Option<String>,
    pub limit: Option<String>,
    pub pay_methods: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct CardholderResponse {
    pub email: String,
    pub name: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub national_id: Option<String>,
    pub zip_code: Option<String>,
}

/// A stored donation as returned to its owner.
#[derive(Debug, Clone, Serialize)]
pub struct DonationResponse {
    pub id: String,
    pub order_number: String,
    pub amount: i64,
    pub currency: String,
    pub details: String,
    pub pay_method: String,
    /// `one_time` for one-time donations.
    pub frequency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub periodic_status: Option<String>,
    pub cardholder: CardholderResponse,
    pub card_info: CardInfo,
    pub notes: Option<String>,
    pub send_receipt: String,
    pub to_feedback: bool,
    pub status: String,
    pub user_id: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Donation> for DonationResponse {
    fn from(d: Donation) -> Self {
        Self {
            id: d.id.to_string(),
            order_number: d.order_number.to_string(),
            amount: d.amount.value(),
            currency: d.currency.as_str().to_string(),
            details: d.details,
            pay_method: d.pay_method.as_str().to_string(),
            frequency: d
                .frequency
                .map(|f| f.as_str())
                .unwrap_or("one_time")
                .to_string(),
            periodic_status: d.periodic_status.map(|s| s.as_str().to_string()),
            cardholder: CardholderResponse {
                email: d.cardholder.email,
                name: d.cardholder.name,
                phone_number: d.cardholder.phone_number,
                address: d.cardholder.address,
                national_id: d.cardholder.national_id,
                zip_code: d.cardholder.zip_code,
            },
            card_info: d.card_info,
            notes: d.notes,
            send_receipt: d.send_receipt.as_str().to_string(),
            to_feedback: d.to_feedback,
            status: d.status.as_str().to_string(),
            user_id: d.owner_id.to_string(),
            created_at: d.created_at.as_datetime().to_rfc3339(),
            updated_at: d.updated_at.as_datetime().to_rfc3339(),
        }
    }
}

/// Listing entry; both kinds share one list.
#[derive(Debug, Clone, Serialize)]
pub struct DonationRecordResponse {
    #[serde(flatten)]
    pub donation: DonationResponse,
    pub is_periodic: bool,
}

impl From<Donation> for DonationRecordResponse {
    fn from(d: Donation) -> Self {
        let is_periodic = d.is_periodic();
        Self {
            donation: d.into(),
            is_periodic,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ListMeta {
    pub total: u64,
    pub offset: u32,
    pub limit: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct DonationListResponse {
    pub records: Vec<DonationRecordResponse>,
    pub meta: ListMeta,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::donation::aggregate::test_support::paid_donation;
    use crate::domain::donation::DonationKind;
    use serde_json::json;

    #[test]
    fn user_id_accepts_number_and_string() {
        let a: CreateDonationRequest = serde_json::from_value(json!({"user_id": 42})).unwrap();
        let b: CreateDonationRequest = serde_json::from_value(json!({"user_id": "42"})).unwrap();
        assert_eq!(a.into_draft().user_id, b.into_draft().user_id);
    }

    #[test]
    fn donor_is_alias_of_cardholder() {
        let req: CreateDonationRequest = serde_json::from_value(json!({
            "donor": {"email": "developer@example.org"}
        }))
        .unwrap();
        let draft = req.into_draft();
        assert_eq!(
            draft.cardholder.unwrap().email.as_deref(),
            Some("developer@example.org")
        );
    }

    #[test]
    fn mistyped_amount_is_a_shape_error() {
        let result: Result<CreateDonationRequest, _> =
            serde_json::from_value(json!({"amount": "500"}));
        assert!(result.is_err());
    }

    #[test]
    fn patch_distinguishes_null_from_absent() {
        let req: PatchDonationRequest = serde_json::from_value(json!({
            "donor": {"name": null, "address": "Taipei"},
        }))
        .unwrap();
        let (patch, claim) = req.into_patch().unwrap();
        assert_eq!(patch.cardholder.name, Some(None));
        assert_eq!(patch.cardholder.address, Some(Some("Taipei".to_string())));
        assert_eq!(patch.cardholder.zip_code, None);
        assert!(claim.is_none());
    }

    #[test]
    fn patch_rejects_unknown_keys() {
        let top: Result<PatchDonationRequest, _> =
            serde_json::from_value(json!({"amount": 1000}));
        assert!(top.is_err());
        let nested: Result<PatchDonationRequest, _> =
            serde_json::from_value(json!({"cardholder": {"card_number": "4242"}}));
        assert!(nested.is_err());
    }

    #[test]
    fn patch_rejects_clearing_email() {
        let req: PatchDonationRequest =
            serde_json::from_value(json!({"cardholder": {"email": null}})).unwrap();
        let err = req.into_patch().unwrap_err();
        assert_eq!(err.field, "cardholder.email");
    }

    #[test]
    fn patch_rejects_unknown_receipt_value() {
        let result: Result<PatchDonationRequest, _> =
            serde_json::from_value(json!({"send_receipt": "weekly"}));
        assert!(result.is_err());
    }

    #[test]
    fn response_uses_one_time_for_prime() {
        let body = serde_json::to_value(DonationResponse::from(paid_donation(
            DonationKind::Prime,
            "1",
        )))
        .unwrap();
        assert_eq!(body["frequency"], "one_time");
        assert_eq!(body["card_info"]["last_four"], "4242");
        assert_eq!(body["card_info"]["type"], 1);
        assert!(body.get("periodic_status").is_none());
        assert_eq!(body["user_id"], "1");
    }

    #[test]
    fn list_record_flags_periodic() {
        let body = serde_json::to_value(DonationRecordResponse::from(paid_donation(
            DonationKind::Periodic,
            "1",
        )))
        .unwrap();
        assert_eq!(body["is_periodic"], true);
        assert_eq!(body["periodic_status"], "active");
    }
}
