//! TapPay pay-by-prime wire types.
//!
//! Only the fields this service reads or writes are modelled. Unknown
//! response fields are ignored.

use serde::{Deserialize, Serialize};

use crate::domain::donation::CardInfo;
use crate::ports::{ChargeReceipt, ChargeRequest};

#[derive(Debug, Serialize)]
pub struct PayByPrimeRequest<'a> {
    pub prime: &'a str,
    pub partner_key: &'a str,
    pub merchant_id: &'a str,
    pub amount: i64,
    pub currency: &'a str,
    pub details: &'a str,
    pub order_number: &'a str,
    pub cardholder: WireCardholder<'a>,
    pub remember: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_url: Option<WireResultUrl<'a>>,
}

#[derive(Debug, Serialize)]
pub struct WireCardholder<'a> {
    pub email: &'a str,
    pub phone_number: &'a str,
    pub name: &'a str,
    pub zip_code: &'a str,
    pub address: &'a str,
    pub national_id: &'a str,
}

#[derive(Debug, Serialize)]
pub struct WireResultUrl<'a> {
    pub frontend_redirect_url: &'a str,
    pub backend_notify_url: &'a str,
}

impl<'a> PayByPrimeRequest<'a> {
    pub fn from_charge(request: &'a ChargeRequest, partner_key: &'a str) -> Self {
        let holder = &request.cardholder;
        Self {
            prime: &request.prime,
            partner_key,
            merchant_id: &request.merchant_id,
            amount: request.amount.value(),
            currency: request.currency.as_str(),
            details: &request.details,
            order_number: request.order_number.as_str(),
            cardholder: WireCardholder {
                email: &holder.email,
                phone_number: holder.phone_number.as_deref().unwrap_or_default(),
                name: holder.name.as_deref().unwrap_or_default(),
                zip_code: holder.zip_code.as_deref().unwrap_or_default(),
                address: holder.address.as_deref().unwrap_or_default(),
                national_id: holder.national_id.as_deref().unwrap_or_default(),
            },
            remember: request.remember,
            result_url: request.result_url.as_ref().map(|u| WireResultUrl {
                frontend_redirect_url: u.frontend_redirect_url.as_deref().unwrap_or_default(),
                backend_notify_url: u.backend_redirect_url.as_deref().unwrap_or_default(),
            }),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PayByPrimeResponse {
    pub status: i64,
    #[serde(default)]
    pub msg: String,
    #[serde(default)]
    pub rec_trade_id: String,
    #[serde(default)]
    pub bank_transaction_id: Option<String>,
    #[serde(default)]
    pub card_info: Option<WireCardInfo>,
    #[serde(default)]
    pub acquirer: Option<String>,
    #[serde(default)]
    pub payment_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireCardInfo {
    #[serde(default)]
    pub bin_code: String,
    #[serde(default)]
    pub last_four: String,
    #[serde(default)]
    pub issuer: Option<String>,
    #[serde(default = "unknown_funding")]
    pub funding: i64,
    #[serde(rename = "type", default)]
    pub card_type: Option<i64>,
    #[serde(default)]
    pub country: Option<String>,
}

fn unknown_funding() -> i64 {
    -1
}

impl PayByPrimeResponse {
    pub fn is_success(&self) -> bool {
        self.status == 0
    }

    pub fn into_receipt(self) -> ChargeReceipt {
        let card = self.card_info.unwrap_or_default();
        ChargeReceipt {
            transaction_id: self.rec_trade_id,
            bank_transaction_id: self.bank_transaction_id,
            card_info: CardInfo {
                bin_code: card.bin_code,
                last_four: card.last_four,
                funding: card.funding,
                issuer: card.issuer.filter(|s| !s.is_empty()),
                card_type: card.card_type,
                country: card.country.filter(|s| !s.is_empty()),
            },
            acquirer: self.acquirer,
            payment_url: self.payment_url.filter(|s| !s.is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_response_maps_card_info() {
        let body = r#"{
            "status": 0,
            "msg": "Success",
            "rec_trade_id": "D20240101XYZ",
            "bank_transaction_id": "TP20240101XYZ",
            "card_info": {
                "bin_code": "424242",
                "last_four": "4242",
                "issuer": "",
                "funding": 0,
                "type": 1,
                "level": "",
                "country": "UNITED KINGDOM"
            },
            "acquirer": "TW_CTBC"
        }"#;
        let response: PayByPrimeResponse = serde_json::from_str(body).unwrap();
        assert!(response.is_success());

        let receipt = response.into_receipt();
        assert_eq!(receipt.transaction_id, "D20240101XYZ");
        assert_eq!(receipt.card_info.bin_code, "424242");
        assert_eq!(receipt.card_info.card_type, Some(1));
        assert!(receipt.card_info.issuer.is_none());
    }

    #[test]
    fn failed_response_parses_without_card_info() {
        let body = r#"{"status": 10003, "msg": "Card Error"}"#;
        let response: PayByPrimeResponse = serde_json::from_str(body).unwrap();
        assert!(!response.is_success());
        assert_eq!(response.msg, "Card Error");
    }
}
