//! Inbound webhook event envelope.
//!
//! Only the fields the exporter labels or acts on are modelled; everything else in
//! the callback payload is ignored.

use crate::domain::types::EventType;
use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEventCallback {
    pub data: WebhookEventResource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEventResource {
    pub attributes: WebhookEventAttributes,
    pub relationships: WebhookEventRelationships,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEventAttributes {
    pub event_type: EventType,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEventRelationships {
    pub webhook: Relationship,
    #[serde(default)]
    pub transaction: Option<Relationship>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Relationship {
    pub data: ResourceRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResourceRef {
    pub id: String,
}

impl WebhookEventCallback {
    pub fn webhook_id(&self) -> &str {
        &self.data.relationships.webhook.data.id
    }

    pub fn event_type(&self) -> EventType {
        self.data.attributes.event_type
    }

    /// Present for transaction events; its presence is what triggers a follow-up fetch.
    pub fn transaction_id(&self) -> Option<&str> {
        self.data
            .relationships
            .transaction
            .as_ref()
            .map(|t| t.data.id.as_str())
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.data.attributes.created_at
    }
}
