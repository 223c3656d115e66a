//! Core entities reconstructed from the Up API on every scrape or webhook delivery.
//!
//! Nothing here is cached between requests. Enum values coming from upstream are a
//! closed set: anything the exporter does not know deserializes to `Unknown` and
//! renders as the `UNKNOWN` label instead of failing the request.

use serde::Deserialize;
use std::fmt;

/// Label rendered for upstream enum values this exporter does not recognise.
pub const UNKNOWN_LABEL: &str = "UNKNOWN";

/// An amount of money in the smallest denomination of its currency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Money {
    /// e.g. `1056` for AUD 10.56
    pub value_in_base_units: i64,
    /// ISO 4217 currency code
    pub currency_code: String,
}

impl Money {
    pub fn new(value_in_base_units: i64, currency_code: impl Into<String>) -> Self {
        Self {
            value_in_base_units,
            currency_code: currency_code.into(),
        }
    }

    /// Base units as a metric sample value.
    pub fn as_f64(&self) -> f64 {
        self.value_in_base_units as f64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
    Saver,
    Transactional,
    HomeLoan,
    #[serde(other)]
    Unknown,
}

impl AccountType {
    pub fn as_label(&self) -> &'static str {
        match self {
            AccountType::Saver => "SAVER",
            AccountType::Transactional => "TRANSACTIONAL",
            AccountType::HomeLoan => "HOME_LOAN",
            AccountType::Unknown => UNKNOWN_LABEL,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OwnershipType {
    Individual,
    Joint,
    #[serde(other)]
    Unknown,
}

impl OwnershipType {
    pub fn as_label(&self) -> &'static str {
        match self {
            OwnershipType::Individual => "INDIVIDUAL",
            OwnershipType::Joint => "JOINT",
            OwnershipType::Unknown => UNKNOWN_LABEL,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    Held,
    Settled,
    #[serde(other)]
    Unknown,
}

impl TransactionStatus {
    pub fn as_label(&self) -> &'static str {
        match self {
            TransactionStatus::Held => "HELD",
            TransactionStatus::Settled => "SETTLED",
            TransactionStatus::Unknown => UNKNOWN_LABEL,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    TransactionCreated,
    TransactionSettled,
    TransactionDeleted,
    Ping,
    #[serde(other)]
    Unknown,
}

impl EventType {
    pub fn as_label(&self) -> &'static str {
        match self {
            EventType::TransactionCreated => "TRANSACTION_CREATED",
            EventType::TransactionSettled => "TRANSACTION_SETTLED",
            EventType::TransactionDeleted => "TRANSACTION_DELETED",
            EventType::Ping => "PING",
            EventType::Unknown => UNKNOWN_LABEL,
        }
    }
}

macro_rules! display_as_label {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_label())
            }
        })*
    };
}

display_as_label!(AccountType, OwnershipType, TransactionStatus, EventType);

/// Snapshot of one account at fetch time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: String,
    pub display_name: String,
    pub account_type: AccountType,
    pub ownership_type: OwnershipType,
    pub balance: Money,
}

/// A configured webhook. Only counted, so the id is all we keep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Webhook {
    pub id: String,
}

/// A transaction resolved on demand from a webhook event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub id: String,
    pub account_id: String,
    pub status: TransactionStatus,
    pub amount: Money,
}

/// One page of a paginated collection.
///
/// `next` is the opaque cursor returned by the API; `None` ends the traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next: Option<String>,
}

impl<T> Page<T> {
    pub fn last(items: Vec<T>) -> Self {
        Self { items, next: None }
    }

    pub fn with_next(items: Vec<T>, next: impl Into<String>) -> Self {
        Self {
            items,
            next: Some(next.into()),
        }
    }
}
