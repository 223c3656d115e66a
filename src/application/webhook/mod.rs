//! Push-based ingestion of Up webhook deliveries.

pub mod authenticator;
pub mod pipeline;

pub use authenticator::{SIGNATURE_HEADER, WebhookAuthenticator};
pub use pipeline::{EventLabels, Resolution, WEBHOOK_DEADLINE, WebhookPipeline};
