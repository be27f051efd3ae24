//! SMS delivery provider configuration
//!
//! Providers are tried in a fixed order (Twilio, MSG91, Fast2SMS); a provider
//! only takes part in the cascade when its credentials are present.

use serde::{Deserialize, Serialize};

/// Twilio credentials
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
    /// Sender number in E.164 format
    pub from_number: String,
}

/// MSG91 credentials
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Msg91Config {
    pub auth_key: String,
    #[serde(default = "default_msg91_sender")]
    pub sender_id: String,
}

/// Fast2SMS credentials
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Fast2SmsConfig {
    pub api_key: String,
}

/// SMS service configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SmsConfig {
    /// Use the console mock provider instead of real providers
    pub use_mock: bool,
    pub twilio: Option<TwilioConfig>,
    pub msg91: Option<Msg91Config>,
    pub fast2sms: Option<Fast2SmsConfig>,
}

impl SmsConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());

        let twilio = match (
            var("TWILIO_ACCOUNT_SID"),
            var("TWILIO_AUTH_TOKEN"),
            var("TWILIO_FROM"),
        ) {
            (Some(account_sid), Some(auth_token), Some(from_number)) => Some(TwilioConfig {
                account_sid,
                auth_token,
                from_number,
            }),
            _ => None,
        };

        let msg91 = var("MSG91_AUTH_KEY").map(|auth_key| Msg91Config {
            auth_key,
            sender_id: var("MSG91_SENDER_ID").unwrap_or_else(default_msg91_sender),
        });

        let fast2sms = var("FAST2SMS_API_KEY").map(|api_key| Fast2SmsConfig { api_key });

        Self {
            use_mock: var("SMS_PROVIDER").map(|p| p == "mock").unwrap_or(false),
            twilio,
            msg91,
            fast2sms,
        }
    }

    /// Whether any real provider has credentials
    pub fn has_real_provider(&self) -> bool {
        self.twilio.is_some() || self.msg91.is_some() || self.fast2sms.is_some()
    }
}

fn default_msg91_sender() -> String {
    String::from("PRABHV")
}
