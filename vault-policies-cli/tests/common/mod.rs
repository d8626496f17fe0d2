//! Stand-in for Vault's `sys/policy` endpoints on a `wiremock` server.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::Path;
use std::process::Command;
use std::sync::{Arc, Mutex};

use serde_json::json;
use wiremock::matchers::{header, path_regex};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

pub const TOKEN: &str = "test-token";

const POLICY_PREFIX: &str = "/v1/sys/policy";

#[derive(Default)]
struct State {
    policies: BTreeMap<String, String>,
    mutations: Vec<String>,
}

/// Answers every authenticated `sys/policy` call from shared state.
struct PolicyEndpoints {
    state: Arc<Mutex<State>>,
}

impl Respond for PolicyEndpoints {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let mut state = self.state.lock().expect("state lock");
        route(request, &mut state)
    }
}

pub struct FakeVault {
    server: MockServer,
    state: Arc<Mutex<State>>,
}

impl FakeVault {
    /// A server holding exactly `policies`.
    pub async fn start(policies: &[(&str, &str)]) -> Self {
        let state = Arc::new(Mutex::new(State {
            policies: policies
                .iter()
                .map(|(n, d)| (n.to_string(), d.to_string()))
                .collect(),
            mutations: Vec::new(),
        }));

        let server = MockServer::start().await;
        Mock::given(path_regex(r"^/v1/sys/policy(/.+)?$"))
            .and(header("X-Vault-Token", TOKEN))
            .respond_with(PolicyEndpoints {
                state: Arc::clone(&state),
            })
            .mount(&server)
            .await;
        // Anything the first mock did not take carries a wrong or missing token.
        Mock::given(path_regex(r"^/v1/"))
            .respond_with(error(403, "permission denied"))
            .mount(&server)
            .await;

        Self { server, state }
    }

    /// A fresh server with Vault's built-ins plus `policies`.
    pub async fn with_builtins(policies: &[(&str, &str)]) -> Self {
        let mut all = vec![("default", "path \"sys/capabilities-self\" {}\n"), ("root", "")];
        all.extend_from_slice(policies);
        Self::start(&all).await
    }

    pub fn address(&self) -> String {
        self.server.uri()
    }

    pub fn policies(&self) -> BTreeMap<String, String> {
        self.state.lock().expect("state lock").policies.clone()
    }

    pub fn mutations(&self) -> Vec<String> {
        self.state.lock().expect("state lock").mutations.clone()
    }

    /// `vault-policies` pointed at this server with an isolated `HOME`.
    pub fn command(&self, home: &Path) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("vault-policies"));
        cmd.env("HOME", home)
            .env("USERPROFILE", home)
            .env("VAULT_ADDR", self.address())
            .env("VAULT_TOKEN", TOKEN)
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG")
            .env_remove("VAULT_NAMESPACE")
            .env_remove("VAULT_CACERT")
            .env_remove("VAULT_CLIENT_CERT")
            .env_remove("VAULT_CLIENT_KEY");
        cmd
    }
}

fn error(status: u16, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({ "errors": [message] }))
}

fn route(request: &Request, state: &mut State) -> ResponseTemplate {
    let rest = request.url.path().trim_start_matches(POLICY_PREFIX);
    let Some(name) = rest.strip_prefix('/').map(str::to_string) else {
        let names: Vec<_> = state.policies.keys().cloned().collect();
        return ResponseTemplate::new(200).set_body_json(json!({
            "policies": names,
            "keys": names,
            "data": { "policies": names, "keys": names },
        }));
    };

    match request.method.as_str() {
        "GET" => match state.policies.get(&name) {
            Some(rules) => ResponseTemplate::new(200).set_body_json(json!({
                "name": name,
                "rules": rules,
                "data": { "name": name, "rules": rules },
            })),
            None => ResponseTemplate::new(404).set_body_json(json!({ "errors": [] })),
        },
        "PUT" | "POST" => {
            if name == "root" {
                return error(400, "cannot update root policy");
            }
            let body: serde_json::Value =
                serde_json::from_slice(&request.body).unwrap_or_default();
            let Some(policy) = body
                .get("policy")
                .or_else(|| body.get("rules"))
                .and_then(|v| v.as_str())
            else {
                return error(400, "'policy' parameter not supplied or empty");
            };
            state.policies.insert(name.clone(), policy.to_string());
            state.mutations.push(format!("write {name}"));
            ResponseTemplate::new(204)
        }
        "DELETE" => {
            if name == "root" || name == "default" {
                return error(400, &format!("cannot delete {name} policy"));
            }
            state.policies.remove(&name);
            state.mutations.push(format!("delete {name}"));
            ResponseTemplate::new(204)
        }
        _ => error(405, "unsupported method"),
    }
}
