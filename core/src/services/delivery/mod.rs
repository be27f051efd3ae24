//! Code delivery with ordered provider fallback

mod gateway;
mod traits;
mod types;


pub use gateway::DeliveryGateway;
pub use traits::DeliveryChannel;
pub use types::{DeliveryReceipt, DeliveryReport, ProviderFailure};
