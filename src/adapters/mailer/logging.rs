//! Mailer that records outgoing mail as tracing events.
//!
//! Delivery is handled by a separate mail service; this adapter is the
//! hand-off point and keeps a copy of what was sent for tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::donation::Donation;
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::Mailer;

/// A mail the adapter was asked to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SentMail {
    Activation { email: String, link: String },
    Receipt { email: String, order_number: String },
}

#[derive(Clone, Default)]
pub struct LoggingMailer {
    sent: Arc<Mutex<Vec<SentMail>>>,
    fail: Arc<AtomicBool>,
}

impl LoggingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent send fail.
    pub fn fail_sends(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }

    fn check_failure(&self) -> Result<(), DomainError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(DomainError::new(
                ErrorCode::ExternalServiceError,
                "mail service unavailable",
            ));
        }
        Ok(())
    }

    fn record(&self, mail: SentMail) {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(mail);
        }
    }
}

#[async_trait]
impl Mailer for LoggingMailer {
    async fn send_activation(&self, email: &str, link: &str) -> Result<(), DomainError> {
        self.check_failure()?;
        // The link carries a one-time token and is not logged.
        tracing::info!(email = %email, "Activation mail queued");
        self.record(SentMail::Activation {
            email: email.to_string(),
            link: link.to_string(),
        });
        Ok(())
    }

    async fn send_donation_receipt(&self, donation: &Donation) -> Result<(), DomainError> {
        self.check_failure()?;
        tracing::info!(
            email = %donation.cardholder.email,
            order_number = %donation.order_number,
            amount = donation.amount.value(),
            currency = %donation.currency.as_str(),
            kind = %donation.kind,
            "Donation receipt queued"
        );
        self.record(SentMail::Receipt {
            email: donation.cardholder.email.clone(),
            order_number: donation.order_number.to_string(),
        });
        Ok(())
    }
}
