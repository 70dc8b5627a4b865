//! CreateDonationHandler - Command handler for charging and recording a donation.

use std::sync::Arc;

use tracing::Instrument;

use crate::domain::donation::{
    ChargeStatus, Donation, DonationDraft, DonationError, DonationKind, DonationValidator,
    OrderNumber,
};
use crate::domain::foundation::{check_claim, Identity, StateMachine, Timestamp};
use crate::ports::{ChargeRequest, DonationRepository, Mailer, PaymentError, PaymentGateway};

use super::{within, DonationSettings};

/// Command to create a donation of `kind`.
#[derive(Debug, Clone)]
pub struct CreateDonationCommand {
    pub identity: Identity,
    pub kind: DonationKind,
    pub draft: DonationDraft,
}

/// Result of a successful creation.
#[derive(Debug, Clone)]
pub struct CreateDonationResult {
    pub donation: Donation,
}

/// Handler for donation creation.
///
/// The charge happens before anything is stored. A failed charge leaves no
/// record behind; a stored record always belongs to a successful charge.
pub struct CreateDonationHandler {
    repository: Arc<dyn DonationRepository>,
    gateway: Arc<dyn PaymentGateway>,
    mailer: Arc<dyn Mailer>,
    validator: DonationValidator,
    settings: DonationSettings,
}

impl CreateDonationHandler {
    pub fn new(
        repository: Arc<dyn DonationRepository>,
        gateway: Arc<dyn PaymentGateway>,
        mailer: Arc<dyn Mailer>,
        settings: DonationSettings,
    ) -> Self {
        Self {
            repository,
            gateway,
            mailer,
            validator: DonationValidator::new(),
            settings,
        }
    }

    pub async fn handle(
        &self,
        cmd: CreateDonationCommand,
    ) -> Result<CreateDonationResult, DonationError> {
        // 1. A user_id claim must match the caller
        check_claim(&cmd.identity, cmd.draft.user_id.as_ref())?;

        // 2. Business rules
        let mut draft = cmd.draft;
        if draft.currency.as_deref().map_or(true, |c| c.trim().is_empty()) {
            draft.currency = Some(self.settings.default_currency.clone());
        }
        let valid = self.validator.validate(&draft, cmd.kind)?;

        // 3. Order number for this attempt
        let order_number =
            OrderNumber::generate(&self.settings.order_number_prefix, Timestamp::now());
        let status = ChargeStatus::Pending.transition_to(ChargeStatus::Charging)?;

        // 4. Charge, single attempt
        let request = ChargeRequest {
            prime: valid.prime.clone(),
            amount: valid.amount,
            currency: valid.currency.clone(),
            merchant_id: self.settings.merchant_id.clone(),
            details: valid.details.clone(),
            order_number: order_number.clone(),
            cardholder: valid.cardholder.clone(),
            remember: cmd.kind == DonationKind::Periodic,
            result_url: valid.result_url.clone(),
        };
        let span = tracing::info_span!(
            "charge",
            order_number = %order_number,
            kind = %cmd.kind,
            user_id = %cmd.identity.id,
        );
        let charge = self.gateway.charge(request).instrument(span);
        let charged = match tokio::time::timeout(self.settings.gateway_timeout, charge).await {
            Ok(result) => result,
            Err(_) => Err(PaymentError::timeout(format!(
                "no answer within {:?}",
                self.settings.gateway_timeout
            ))),
        };

        let receipt = match charged {
            Ok(receipt) => {
                status.transition_to(ChargeStatus::Paid)?;
                receipt
            }
            Err(err) => {
                status.transition_to(ChargeStatus::Failed)?;
                tracing::error!(
                    order_number = %order_number,
                    error_code = %err.code,
                    provider_code = err.provider_code.as_deref().unwrap_or(""),
                    "Donation charge failed"
                );
                return Err(DonationError::gateway(err.to_string(), order_number.as_str()));
            }
        };

        // 5. Persist with the caller as owner
        let donation = Donation::record_paid(
            valid,
            order_number,
            cmd.identity.id.clone(),
            receipt.card_info,
            receipt.transaction_id,
        );
        if let Err(err) = within(
            self.settings.storage_timeout,
            "insert donation",
            self.repository.insert(&donation),
        )
        .await
        {
            tracing::error!(
                order_number = %donation.order_number,
                transaction_id = %donation.transaction_id,
                error = %err,
                "Charged donation could not be stored"
            );
            return Err(err);
        }

        tracing::info!(
            donation_id = %donation.id,
            order_number = %donation.order_number,
            amount = donation.amount.value(),
            "Donation created"
        );

        // 6. Receipt mail is best effort
        if let Err(err) = self.mailer.send_donation_receipt(&donation).await {
            tracing::warn!(
                order_number = %donation.order_number,
                error = %err,
                "Donation receipt could not be sent"
            );
        }

        Ok(CreateDonationResult { donation })
    }
}
