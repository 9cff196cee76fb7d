use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::BTreeMap;
use tracing::info;

use crate::client::YnabClient;
use crate::constants::*;
use crate::credentials::CredentialStore;
use crate::errors::{NodeError, NodeResult};
use crate::models::{NewTransaction, NodeExecutionData, NodePropertyOption};

// ============= Description =============

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum PropertyType {
    Options,
    Number,
    DateTime,
}

#[derive(Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TypeOptions {
    pub load_options_method: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub load_options_depends_on: Vec<String>,
}

/// Show/hide rules keyed by other parameter names. Rendered by the host;
/// the node itself never evaluates them.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct DisplayOptions {
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub show: BTreeMap<String, Vec<Value>>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub hide: BTreeMap<String, Vec<Value>>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NodeProperty {
    pub display_name: String,
    pub name: String,
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    pub default: Value,
    pub required: bool,
    pub description: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<NodePropertyOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_options: Option<TypeOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_options: Option<DisplayOptions>,
}

impl NodeProperty {
    fn new(
        display_name: &str,
        name: &str,
        property_type: PropertyType,
        default: Value,
        description: &str,
    ) -> Self {
        NodeProperty {
            display_name: display_name.to_string(),
            name: name.to_string(),
            property_type,
            default,
            required: true,
            description: description.to_string(),
            options: Vec::new(),
            type_options: None,
            display_options: None,
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct NodeDefaults {
    pub name: String,
    pub color: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct NodeCredential {
    pub name: String,
    pub required: bool,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NodeDescription {
    pub display_name: String,
    pub name: String,
    pub icon: String,
    pub group: Vec<String>,
    pub version: u32,
    pub description: String,
    pub defaults: NodeDefaults,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
    pub credentials: Vec<NodeCredential>,
    pub properties: Vec<NodeProperty>,
}

fn option(name: &str, value: &str) -> NodePropertyOption {
    NodePropertyOption {
        name: name.to_string(),
        value: value.to_string(),
    }
}

fn shown_for_create_transaction() -> DisplayOptions {
    DisplayOptions {
        show: BTreeMap::from([
            ("resource".to_string(), vec![json!(RESOURCE_TRANSACTIONS)]),
            ("operation".to_string(), vec![json!(OPERATION_CREATE)]),
        ]),
        hide: BTreeMap::new(),
    }
}

fn create_transaction_properties() -> Vec<NodeProperty> {
    let mut amount = NodeProperty::new(
        "Amount",
        "amount",
        PropertyType::Number,
        json!(0),
        "The Transaction Amount (in Milliunits Format)",
    );
    amount.display_options = Some(shown_for_create_transaction());

    let mut date = NodeProperty::new(
        "Date",
        "date",
        PropertyType::DateTime,
        Value::Null,
        "The Transaction Date",
    );
    date.display_options = Some(shown_for_create_transaction());

    vec![amount, date]
}

pub fn node_description() -> NodeDescription {
    let mut budget = NodeProperty::new(
        "Budget Name/ID",
        "budgetId",
        PropertyType::Options,
        json!(""),
        "The YNAB Budget to be used.",
    );
    budget.type_options = Some(TypeOptions {
        load_options_method: LIST_BUDGETS_METHOD.to_string(),
        load_options_depends_on: Vec::new(),
    });

    let mut account = NodeProperty::new(
        "Account Name/ID",
        "accountId",
        PropertyType::Options,
        json!(""),
        "The YNAB Account to be used.",
    );
    account.type_options = Some(TypeOptions {
        load_options_method: LIST_ACCOUNTS_METHOD.to_string(),
        load_options_depends_on: vec!["budgetId".to_string()],
    });
    // hidden until a budget is picked
    account.display_options = Some(DisplayOptions {
        show: BTreeMap::new(),
        hide: BTreeMap::from([("budgetId".to_string(), vec![Value::Null])]),
    });

    let mut resource = NodeProperty::new(
        "Resource",
        "resource",
        PropertyType::Options,
        json!(""),
        "The resource to be consumed",
    );
    resource.options = vec![option("Transaction", RESOURCE_TRANSACTIONS)];

    let mut operation = NodeProperty::new(
        "Operation",
        "operation",
        PropertyType::Options,
        json!(""),
        "The operation to be performed",
    );
    operation.options = vec![
        option("List", OPERATION_LIST),
        option("Create", OPERATION_CREATE),
    ];

    let mut properties = vec![budget, account, resource, operation];
    properties.extend(create_transaction_properties());

    NodeDescription {
        display_name: NODE_DISPLAY_NAME.to_string(),
        name: NODE_NAME.to_string(),
        icon: "file:ynab.svg".to_string(),
        group: vec!["transform".to_string()],
        version: 1,
        description: "Consume YNAB API".to_string(),
        defaults: NodeDefaults {
            name: NODE_DISPLAY_NAME.to_string(),
            color: "#71C0E5".to_string(),
        },
        inputs: vec!["main".to_string()],
        outputs: vec!["main".to_string()],
        credentials: vec![NodeCredential {
            name: YNAB_CREDENTIALS_NAME.to_string(),
            required: true,
        }],
        properties,
    }
}

// ============= Parameters =============

/// Parameter values of the first input item, as set in the node form.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct NodeParameters {
    pub budget_id: Option<String>,
    pub account_id: Option<String>,
    pub resource: Option<String>,
    pub operation: Option<String>,
    pub amount: Option<i64>,
    pub date: Option<String>,
}

fn required_str<'a>(value: &'a Option<String>, field: &str) -> NodeResult<&'a str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| NodeError::missing_parameter(field))
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeOperation {
    ListTransactions {
        budget_id: String,
    },
    CreateTransaction {
        budget_id: String,
        transaction: NewTransaction,
    },
}

impl NodeOperation {
    pub fn from_parameters(params: &NodeParameters) -> NodeResult<Self> {
        let resource = params.resource.as_deref().unwrap_or_default();
        let operation = params.operation.as_deref().unwrap_or_default();

        match (resource, operation) {
            (RESOURCE_TRANSACTIONS, OPERATION_LIST) => Ok(NodeOperation::ListTransactions {
                budget_id: required_str(&params.budget_id, "budgetId")?.to_string(),
            }),
            (RESOURCE_TRANSACTIONS, OPERATION_CREATE) => {
                let budget_id = required_str(&params.budget_id, "budgetId")?.to_string();
                let account_id = required_str(&params.account_id, "accountId")?.to_string();
                let date = required_str(&params.date, "date")?.to_string();
                let amount = params
                    .amount
                    .ok_or_else(|| NodeError::missing_parameter("amount"))?;
                Ok(NodeOperation::CreateTransaction {
                    budget_id,
                    transaction: NewTransaction {
                        account_id,
                        date,
                        amount,
                    },
                })
            }
            _ => Err(NodeError::UnsupportedOperation {
                resource: resource.to_string(),
                operation: operation.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOptionsMethod {
    ListBudgets,
    ListAccounts,
}

impl std::str::FromStr for LoadOptionsMethod {
    type Err = NodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            LIST_BUDGETS_METHOD => Ok(LoadOptionsMethod::ListBudgets),
            LIST_ACCOUNTS_METHOD => Ok(LoadOptionsMethod::ListAccounts),
            other => Err(NodeError::UnknownLoadOptionsMethod(other.to_string())),
        }
    }
}

// ============= Node =============

/// Output of one execution: one list of items per node output. This node
/// has a single output.
pub type NodeOutput = Vec<Vec<NodeExecutionData>>;

#[derive(Debug, Clone, Default)]
pub struct YnabNode {
    client: YnabClient,
}

impl YnabNode {
    pub fn new(client: YnabClient) -> Self {
        Self { client }
    }

    pub fn description(&self) -> NodeDescription {
        node_description()
    }

    pub async fn load_options(
        &self,
        method: LoadOptionsMethod,
        params: &NodeParameters,
        credentials: &dyn CredentialStore,
    ) -> NodeResult<Vec<NodePropertyOption>> {
        match method {
            LoadOptionsMethod::ListBudgets => self.client.list_budgets(credentials).await,
            LoadOptionsMethod::ListAccounts => {
                let budget_id = params.budget_id.as_deref().unwrap_or_default();
                self.client.list_accounts(credentials, budget_id).await
            }
        }
    }

    pub async fn execute(
        &self,
        params: &NodeParameters,
        credentials: &dyn CredentialStore,
    ) -> NodeResult<NodeOutput> {
        let operation = NodeOperation::from_parameters(params)?;

        let items = match operation {
            NodeOperation::ListTransactions { budget_id } => {
                let transactions = self
                    .client
                    .list_transactions(credentials, &budget_id)
                    .await?;
                info!(
                    "Listed {} transactions for budget {}",
                    transactions.len(),
                    budget_id
                );
                transactions
                    .into_iter()
                    .map(|json| NodeExecutionData { json })
                    .collect()
            }
            NodeOperation::CreateTransaction {
                budget_id,
                transaction,
            } => {
                let created = self
                    .client
                    .create_transaction(credentials, &budget_id, &transaction)
                    .await?;
                info!("Created transaction in budget {}", budget_id);
                vec![NodeExecutionData { json: created }]
            }
        };

        Ok(vec![items])
    }
}
