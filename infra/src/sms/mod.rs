//! SMS delivery channels
//!
//! Each provider implements the core `DeliveryChannel` trait. The gateway in
//! the core tries them in the order `build_channels` returns: Twilio, then
//! MSG91, then Fast2SMS, skipping any without credentials.

use std::sync::Arc;
use std::time::Duration;

use pv_core::services::delivery::DeliveryChannel;
use pv_shared::config::SmsConfig;

pub mod fast2sms;
pub mod mock_sms;
pub mod msg91;

// Twilio SMS channel (feature-gated)
#[cfg(feature = "twilio-sms")]
pub mod twilio;

pub use fast2sms::Fast2SmsChannel;
pub use mock_sms::MockSmsChannel;
pub use msg91::Msg91Channel;

#[cfg(feature = "twilio-sms")]
pub use twilio::TwilioChannel;

#[cfg(test)]
mod tests;

/// Per-request timeout for HTTP providers
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Build the provider cascade from configuration.
///
/// Returns the mock channel alone when `use_mock` is set (or the
/// `mock-services` feature is enabled). Returns an empty list when no
/// provider has credentials; every delivery then fails and the caller
/// reports it as a warning.
pub fn build_channels(config: &SmsConfig) -> Vec<Arc<dyn DeliveryChannel>> {
    if config.use_mock || cfg!(feature = "mock-services") {
        tracing::info!("Using mock SMS channel");
        return vec![Arc::new(MockSmsChannel::new())];
    }

    let mut channels: Vec<Arc<dyn DeliveryChannel>> = Vec::new();

    if let Some(twilio) = &config.twilio {
        #[cfg(feature = "twilio-sms")]
        match TwilioChannel::new(twilio) {
            Ok(channel) => channels.push(Arc::new(channel)),
            Err(e) => tracing::error!(error = %e, "Failed to initialize Twilio channel"),
        }
        #[cfg(not(feature = "twilio-sms"))]
        {
            let _ = twilio;
            tracing::warn!("Twilio credentials present but the twilio-sms feature is disabled");
        }
    }

    if let Some(msg91) = &config.msg91 {
        match Msg91Channel::new(msg91) {
            Ok(channel) => channels.push(Arc::new(channel)),
            Err(e) => tracing::error!(error = %e, "Failed to initialize MSG91 channel"),
        }
    }

    if let Some(fast2sms) = &config.fast2sms {
        match Fast2SmsChannel::new(fast2sms) {
            Ok(channel) => channels.push(Arc::new(channel)),
            Err(e) => tracing::error!(error = %e, "Failed to initialize Fast2SMS channel"),
        }
    }

    if channels.is_empty() {
        tracing::warn!("SMS delivery disabled - no provider credentials found");
    } else {
        tracing::info!(
            providers = ?channels.iter().map(|c| c.provider_name()).collect::<Vec<_>>(),
            "SMS delivery enabled"
        );
    }

    channels
}

/// Shared HTTP client for the REST providers
pub(crate) fn http_client() -> Result<reqwest::Client, crate::InfrastructureError> {
    Ok(reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?)
}
