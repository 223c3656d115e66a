//! JSON:API response bodies returned by the Up API, trimmed to the fields we read.

use crate::domain::types::{
    Account, AccountType, Money, OwnershipType, Page, Transaction, TransactionStatus, Webhook,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ListResponse<T> {
    pub data: Vec<T>,
    pub links: PaginationLinks,
}

#[derive(Debug, Deserialize)]
pub struct PaginationLinks {
    #[serde(default)]
    pub next: Option<String>,
}

impl<T> ListResponse<T> {
    pub fn into_page<U>(self) -> Page<U>
    where
        U: From<T>,
    {
        Page {
            items: self.data.into_iter().map(U::from).collect(),
            next: self.links.next,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoneyObject {
    pub currency_code: String,
    pub value_in_base_units: i64,
}

impl From<MoneyObject> for Money {
    fn from(m: MoneyObject) -> Self {
        Money::new(m.value_in_base_units, m.currency_code)
    }
}

#[derive(Debug, Deserialize)]
pub struct AccountResource {
    pub id: String,
    pub attributes: AccountAttributes,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountAttributes {
    pub display_name: String,
    pub account_type: AccountType,
    pub ownership_type: OwnershipType,
    pub balance: MoneyObject,
}

impl From<AccountResource> for Account {
    fn from(r: AccountResource) -> Self {
        Account {
            id: r.id,
            display_name: r.attributes.display_name,
            account_type: r.attributes.account_type,
            ownership_type: r.attributes.ownership_type,
            balance: r.attributes.balance.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct WebhookResource {
    pub id: String,
}

impl From<WebhookResource> for Webhook {
    fn from(r: WebhookResource) -> Self {
        Webhook { id: r.id }
    }
}

#[derive(Debug, Deserialize)]
pub struct GetTransactionResponse {
    pub data: TransactionResource,
}

#[derive(Debug, Deserialize)]
pub struct TransactionResource {
    pub id: String,
    pub attributes: TransactionAttributes,
    pub relationships: TransactionRelationships,
}

#[derive(Debug, Deserialize)]
pub struct TransactionAttributes {
    pub status: TransactionStatus,
    pub amount: MoneyObject,
}

#[derive(Debug, Deserialize)]
pub struct TransactionRelationships {
    pub account: AccountRelationship,
}

#[derive(Debug, Deserialize)]
pub struct AccountRelationship {
    pub data: AccountRef,
}

#[derive(Debug, Deserialize)]
pub struct AccountRef {
    pub id: String,
}

impl From<TransactionResource> for Transaction {
    fn from(r: TransactionResource) -> Self {
        Transaction {
            id: r.id,
            account_id: r.relationships.account.data.id,
            status: r.attributes.status,
            amount: r.attributes.amount.into(),
        }
    }
}
