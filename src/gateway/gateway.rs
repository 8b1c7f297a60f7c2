use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use super::errors::{classify_error_body, classify_transport_error};
use crate::config::ApiConfig;
use crate::models::{AuthResult, Session};

/// Token issuance endpoint.
pub const LOGIN_PATH: &str = "auth/token/";
/// Account creation endpoint.
pub const SIGNUP_PATH: &str = "auth/create/";
/// Embedded status code meaning "account created and session established".
/// Every other code is treated as not authenticated.
pub const SIGNUP_SUCCESS_CODE: i64 = 6000;

/// The remote authentication API as the forms see it.
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, identifier: &str, secret: &str) -> AuthResult;
    async fn signup(&self, name: &str, email: &str, secret: &str) -> AuthResult;
}

/// [`AuthApi`] over HTTP with `reqwest`.
pub struct HttpAuthGateway {
    client: reqwest::Client,
    config: ApiConfig,
}

impl HttpAuthGateway {
    pub fn new(config: &ApiConfig) -> Result<Self, reqwest::Error> {
        info!("Creating auth gateway for {}", config.base_url);
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// POST a JSON body and return the parsed 2xx body, or the classified failure.
    async fn post_json(&self, path: &str, body: &Value) -> Result<Value, AuthResult> {
        let url = self.config.endpoint(path);
        debug!("Sending auth request to: {}", url);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                warn!("Request to {} failed: {}", url, e);
                classify_transport_error(&e)
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| classify_transport_error(&e))?;

        if !status.is_success() {
            debug!("Auth request to {} answered {}", url, status);
            return Err(classify_error_body(&text));
        }

        serde_json::from_str(&text)
            .map_err(|e| AuthResult::UnknownFailure(format!("Error: invalid response body: {}", e)))
    }
}

fn session_from(payload: Value) -> AuthResult {
    match Session::from_value(payload) {
        Ok(session) => AuthResult::Success(session),
        Err(e) => AuthResult::UnknownFailure(format!("Error: {}", e)),
    }
}

/// The embedded status code of a signup response, accepting `6000` and `6000.0` alike.
fn embedded_status_code(body: &Value) -> Option<i64> {
    let code = body.get("status_code")?;
    code.as_i64().or_else(|| {
        code.as_f64()
            .filter(|f| f.fract() == 0.0)
            .map(|f| f as i64)
    })
}

/// Interpret a 2xx signup body `{status_code, data}`.
fn signup_outcome(body: Value) -> AuthResult {
    match embedded_status_code(&body) {
        Some(SIGNUP_SUCCESS_CODE) => {
            let data = match body {
                Value::Object(mut fields) => fields.remove("data").unwrap_or(Value::Null),
                _ => Value::Null,
            };
            session_from(data)
        }
        status_code => AuthResult::NotAuthenticated { status_code },
    }
}

#[async_trait]
impl AuthApi for HttpAuthGateway {
    async fn login(&self, identifier: &str, secret: &str) -> AuthResult {
        let body = json!({ "username": identifier, "password": secret });
        let result = match self.post_json(LOGIN_PATH, &body).await {
            Ok(payload) => session_from(payload),
            Err(failure) => failure,
        };
        info!(identifier, outcome = result.kind(), "Login attempt finished");
        result
    }

    async fn signup(&self, name: &str, email: &str, secret: &str) -> AuthResult {
        let body = json!({ "name": name, "email": email, "password": secret });
        let result = match self.post_json(SIGNUP_PATH, &body).await {
            Ok(payload) => signup_outcome(payload),
            Err(failure) => failure,
        };
        info!(email, outcome = result.kind(), "Signup attempt finished");
        result
    }
}
