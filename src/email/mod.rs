//! Waitlist email sending.
//!
//! A thin provider seam so the transactional email service stays an external
//! collaborator: the waitlist handler takes whatever provider configuration
//! yields, and a disabled configuration simply means no mail goes out.

mod resend;
mod templates;

pub use templates::WaitlistEmailContent;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::config::{EmailConfig, EmailProviderConfig};

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("Failed to send email: {0}")]
    SendFailed(String),
}

#[async_trait]
pub trait EmailProvider: Send + Sync {
    /// Send the waitlist welcome email.
    async fn send_waitlist_welcome(
        &self,
        to: &str,
        from_address: &str,
        from_name: Option<&str>,
    ) -> Result<(), EmailError>;
}

/// Create an email provider from configuration; `None` when disabled.
pub fn create_provider(config: &EmailConfig) -> Option<Arc<dyn EmailProvider>> {
    match &config.provider {
        EmailProviderConfig::Resend { api_key } => {
            Some(Arc::new(resend::ResendProvider::new(api_key.clone())))
        }
        EmailProviderConfig::Disabled => None,
    }
}
