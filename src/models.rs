use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Budget as returned by `GET budgets`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Budget {
    pub id: String,
    pub name: String,
    pub last_modified_on: Option<String>,
    pub first_month: Option<String>,
    pub last_month: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Account {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub account_type: Option<String>,
    pub on_budget: Option<bool>,
    pub closed: Option<bool>,
    pub note: Option<String>,
    pub balance: Option<i64>,
    pub cleared_balance: Option<i64>,
    pub uncleared_balance: Option<i64>,
    pub transfer_payee_id: Option<String>,
    pub direct_import_linked: Option<bool>,
    pub direct_import_in_error: Option<bool>,
    pub deleted: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A transaction. Amounts are in milliunits.
///
/// Fields the API adds beyond the ones named here (`id`, `account_name`,
/// `deleted`, ...) are kept in `extra` so a transaction serializes back to
/// the same object it was read from.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Transaction {
    pub account_id: String,
    pub date: String,
    pub amount: i64,
    pub payee_id: Option<String>,
    pub payee_name: Option<String>,
    pub category_id: Option<String>,
    pub memo: Option<String>,
    pub cleared: Option<String>,
    pub approved: Option<bool>,
    pub flag_color: Option<String>,
    pub import_id: Option<String>,
    pub subtransactions: Vec<Subtransaction>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Subtransaction {
    pub amount: i64,
    pub payee_id: Option<String>,
    pub payee_name: Option<String>,
    pub category_id: Option<String>,
    pub memo: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of `POST budgets/{id}/transactions`: only the three fields the node
/// collects are ever sent.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub account_id: String,
    pub date: String,
    pub amount: i64,
}

#[derive(Serialize, Debug)]
pub struct SaveTransactionPayload<'a> {
    pub transaction: &'a NewTransaction,
}

/// One entry of a dynamic option list rendered by the host.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NodePropertyOption {
    pub name: String,
    pub value: String,
}

impl From<Budget> for NodePropertyOption {
    fn from(budget: Budget) -> Self {
        NodePropertyOption {
            name: budget.name,
            value: budget.id,
        }
    }
}

impl From<Account> for NodePropertyOption {
    fn from(account: Account) -> Self {
        NodePropertyOption {
            name: account.name,
            value: account.id,
        }
    }
}

/// A single output row handed back to the host.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct NodeExecutionData {
    pub json: Value,
}
