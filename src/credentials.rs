use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::env;

use crate::constants::*;
use crate::errors::{NodeError, NodeResult};

/// The `ynabApi` credential: a YNAB personal access token.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct YnabApiCredentials {
    pub personal_access_token: String,
}

impl std::fmt::Debug for YnabApiCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YnabApiCredentials")
            .field("personal_access_token", &"<redacted>")
            .finish()
    }
}

/// Host-managed store of named credentials. Looked up on every request.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn get_credentials(&self, name: &str) -> NodeResult<Option<YnabApiCredentials>>;
}

/// Resolves the bearer token for a request, failing before any network call
/// when the store has nothing under `ynabApi`.
pub async fn resolve_token(store: &dyn CredentialStore) -> NodeResult<String> {
    store
        .get_credentials(YNAB_CREDENTIALS_NAME)
        .await?
        .map(|c| c.personal_access_token)
        .ok_or(NodeError::MissingCredentials)
}

/// Credentials handed over by the host along with a single invocation.
#[derive(Debug, Clone)]
pub struct StaticCredentialStore {
    credentials: Option<YnabApiCredentials>,
}

impl StaticCredentialStore {
    pub fn new(credentials: YnabApiCredentials) -> Self {
        Self {
            credentials: Some(credentials),
        }
    }

    pub fn empty() -> Self {
        Self { credentials: None }
    }
}

#[async_trait]
impl CredentialStore for StaticCredentialStore {
    async fn get_credentials(&self, name: &str) -> NodeResult<Option<YnabApiCredentials>> {
        if name != YNAB_CREDENTIALS_NAME {
            return Ok(None);
        }
        Ok(self.credentials.clone())
    }
}

/// Reads the token from an environment variable each time it is asked.
#[derive(Debug, Clone)]
pub struct EnvCredentialStore {
    var: String,
}

impl EnvCredentialStore {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvCredentialStore {
    fn default() -> Self {
        Self::new(YNAB_TOKEN_ENV)
    }
}

#[async_trait]
impl CredentialStore for EnvCredentialStore {
    async fn get_credentials(&self, name: &str) -> NodeResult<Option<YnabApiCredentials>> {
        if name != YNAB_CREDENTIALS_NAME {
            return Ok(None);
        }
        Ok(env::var(&self.var)
            .ok()
            .filter(|token| !token.trim().is_empty())
            .map(|token| YnabApiCredentials {
                personal_access_token: token,
            }))
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CredentialProperty {
    pub display_name: String,
    pub name: String,
    #[serde(rename = "type")]
    pub property_type: String,
    pub default: String,
}

/// Declarative description of the credential type, rendered by the host.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CredentialTypeDescription {
    pub name: String,
    pub display_name: String,
    pub documentation_url: String,
    pub properties: Vec<CredentialProperty>,
}

pub fn ynab_api_credential_type() -> CredentialTypeDescription {
    CredentialTypeDescription {
        name: YNAB_CREDENTIALS_NAME.to_string(),
        display_name: "YNAB API".to_string(),
        documentation_url: "ynab".to_string(),
        properties: vec![CredentialProperty {
            display_name: "Personal Access Token".to_string(),
            name: "personalAccessToken".to_string(),
            property_type: "string".to_string(),
            default: String::new(),
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn static_store_resolves_token() {
        let store = StaticCredentialStore::new(YnabApiCredentials {
            personal_access_token: "secret".to_string(),
        });
        assert_eq!(resolve_token(&store).await.unwrap(), "secret");
    }

    #[tokio::test]
    async fn empty_store_is_missing_credentials() {
        let err = resolve_token(&StaticCredentialStore::empty())
            .await
            .unwrap_err();
        assert!(matches!(err, NodeError::MissingCredentials));
    }

    #[tokio::test]
    async fn env_store_without_variable_is_missing_credentials() {
        let store = EnvCredentialStore::new("YNAB_NODE_TEST_TOKEN_THAT_IS_NEVER_SET");
        let err = resolve_token(&store).await.unwrap_err();
        assert!(matches!(err, NodeError::MissingCredentials));
    }

    #[tokio::test]
    async fn other_credential_names_are_not_served() {
        let store = StaticCredentialStore::new(YnabApiCredentials {
            personal_access_token: "secret".to_string(),
        });
        assert!(store.get_credentials("slackApi").await.unwrap().is_none());
    }

    #[test]
    fn debug_output_hides_token() {
        let credentials = YnabApiCredentials {
            personal_access_token: "secret".to_string(),
        };
        assert!(!format!("{:?}", credentials).contains("secret"));
    }

    #[test]
    fn credential_type_serializes_for_host() {
        let value = serde_json::to_value(ynab_api_credential_type()).unwrap();
        assert_eq!(value["name"], "ynabApi");
        assert_eq!(value["displayName"], "YNAB API");
        assert_eq!(value["properties"][0]["name"], "personalAccessToken");
        assert_eq!(value["properties"][0]["type"], "string");
    }
}
