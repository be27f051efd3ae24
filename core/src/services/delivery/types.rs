//! Delivery outcome types

use serde::{Deserialize, Serialize};

use crate::errors::OtpError;

/// Successful hand-off to a provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryReceipt {
    pub provider: String,
    pub message_id: String,
}

/// A provider that was tried and failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderFailure {
    pub provider: String,
    pub reason: String,
}

/// Everything that happened during one delivery
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryReport {
    pub receipt: Option<DeliveryReceipt>,
    /// Providers tried before the successful one, or all of them on failure
    pub failures: Vec<ProviderFailure>,
}

impl DeliveryReport {
    pub fn is_delivered(&self) -> bool {
        self.receipt.is_some()
    }

    pub fn provider(&self) -> Option<&str> {
        self.receipt.as_ref().map(|r| r.provider.as_str())
    }

    /// The receipt, or a `DeliveryFailure` naming every provider tried
    pub fn into_result(self) -> Result<DeliveryReceipt, OtpError> {
        match self.receipt {
            Some(receipt) => Ok(receipt),
            None => Err(OtpError::DeliveryFailure {
                providers: self.failures.into_iter().map(|f| f.provider).collect(),
            }),
        }
    }
}
