//! Mailer adapters.

mod logging;

pub use logging::{LoggingMailer, SentMail};
