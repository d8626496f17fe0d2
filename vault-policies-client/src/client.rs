//! Blocking HTTP client for Vault's `sys/policy` API.

use serde::Deserialize;
use serde_json::json;
use url::Url;

use vault_policies_core::{PolicyName, PolicyStore};

use crate::config::VaultConfig;
use crate::error::VaultError;
use crate::tls;

const TOKEN_HEADER: &str = "X-Vault-Token";
const NAMESPACE_HEADER: &str = "X-Vault-Namespace";

/// One credential-scoped connection to a Vault server.
pub struct VaultClient {
    agent: ureq::Agent,
    base: Url,
    token: String,
    namespace: Option<String>,
}

impl VaultClient {
    pub fn new(config: &VaultConfig) -> Result<Self, VaultError> {
        let base = Url::parse(&config.address).map_err(|source| VaultError::Address {
            address: config.address.clone(),
            source,
        })?;
        if base.cannot_be_a_base() {
            return Err(VaultError::Config(format!(
                "Vault address '{}' is not an http(s) URL",
                config.address
            )));
        }

        let mut builder = ureq::AgentBuilder::new().timeout(config.timeout);
        if !config.tls.is_empty() {
            builder = builder.tls_config(tls::client_config(&config.tls)?);
        }

        tracing::debug!(address = %base, namespace = ?config.namespace, "connecting to Vault");
        Ok(Self {
            agent: builder.build(),
            base,
            token: config.token.clone(),
            namespace: config.namespace.clone(),
        })
    }

    /// `<base>/v1/sys/policy[/<name>]`, with `name` percent-encoded as one
    /// path segment.
    pub fn policy_url(&self, name: Option<&PolicyName>) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(["v1", "sys", "policy"]);
            if let Some(name) = name {
                segments.push(name.as_str());
            }
        }
        url
    }

    /// Send a request. `Ok(None)` means Vault answered 404.
    fn send(
        &self,
        method: &'static str,
        url: &Url,
        body: Option<serde_json::Value>,
    ) -> Result<Option<String>, VaultError> {
        tracing::debug!("{method} {url}");
        let mut request = self
            .agent
            .request_url(method, url)
            .set(TOKEN_HEADER, &self.token);
        if let Some(namespace) = &self.namespace {
            request = request.set(NAMESPACE_HEADER, namespace);
        }

        let result = match body {
            Some(body) => request.send_json(body),
            None => request.call(),
        };

        match result {
            Ok(response) => response
                .into_string()
                .map(Some)
                .map_err(|e| VaultError::Response {
                    url: url.to_string(),
                    reason: e.to_string(),
                }),
            Err(ureq::Error::Status(404, _)) => Ok(None),
            Err(ureq::Error::Status(status, response)) => {
                let body = response.into_string().unwrap_or_default();
                Err(VaultError::Api {
                    method,
                    url: url.to_string(),
                    status,
                    errors: parse_errors(&body),
                })
            }
            Err(ureq::Error::Transport(source)) => Err(VaultError::Transport {
                method,
                url: url.to_string(),
                source: Box::new(source),
            }),
        }
    }
}

impl PolicyStore for VaultClient {
    type Error = VaultError;

    fn list_policies(&self) -> Result<Vec<PolicyName>, VaultError> {
        let url = self.policy_url(None);
        match self.send("GET", &url, None)? {
            Some(body) => parse_policy_list(&body).map_err(|reason| VaultError::Response {
                url: url.to_string(),
                reason,
            }),
            None => {
                tracing::warn!("{url} answered 404, treating the policy list as empty");
                Ok(Vec::new())
            }
        }
    }

    fn read_policy(&self, name: &PolicyName) -> Result<Option<String>, VaultError> {
        let url = self.policy_url(Some(name));
        match self.send("GET", &url, None)? {
            Some(body) => parse_policy_rules(&body)
                .map(Some)
                .map_err(|reason| VaultError::Response {
                    url: url.to_string(),
                    reason,
                }),
            None => Ok(None),
        }
    }

    fn write_policy(&mut self, name: &PolicyName, document: &str) -> Result<(), VaultError> {
        let url = self.policy_url(Some(name));
        self.send("PUT", &url, Some(json!({ "policy": document })))?;
        Ok(())
    }

    fn delete_policy(&mut self, name: &PolicyName) -> Result<(), VaultError> {
        let url = self.policy_url(Some(name));
        self.send("DELETE", &url, None)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Response bodies
// ---------------------------------------------------------------------------

// Vault mirrors most fields at the top level and under `data`; older servers
// only fill the top level.

#[derive(Debug, Deserialize)]
struct PolicyListBody {
    policies: Option<Vec<String>>,
    data: Option<PolicyListData>,
}

#[derive(Debug, Deserialize)]
struct PolicyListData {
    policies: Option<Vec<String>>,
    keys: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct PolicyBody {
    rules: Option<String>,
    data: Option<PolicyData>,
}

#[derive(Debug, Deserialize)]
struct PolicyData {
    rules: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    errors: Vec<String>,
}

fn parse_policy_list(body: &str) -> Result<Vec<PolicyName>, String> {
    let parsed: PolicyListBody = serde_json::from_str(body).map_err(|e| e.to_string())?;
    let data = parsed.data.map(|d| d.policies.or(d.keys)).unwrap_or_default();
    let names = parsed
        .policies
        .or(data)
        .ok_or_else(|| "missing 'policies' in policy list".to_string())?;
    Ok(names.into_iter().map(PolicyName::from).collect())
}

fn parse_policy_rules(body: &str) -> Result<String, String> {
    let parsed: PolicyBody = serde_json::from_str(body).map_err(|e| e.to_string())?;
    parsed
        .data
        .and_then(|d| d.rules)
        .or(parsed.rules)
        .ok_or_else(|| "missing 'rules' in policy".to_string())
}

fn parse_errors(body: &str) -> Vec<String> {
    serde_json::from_str::<ErrorBody>(body)
        .unwrap_or_default()
        .errors
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
