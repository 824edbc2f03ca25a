//! Async HTTP client wrapping the mutuals JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use mutuals_core::account::Account;
use reqwest::{Client, Response};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::{Value, json};

/// `{"friends": [...], "count": n}` as returned by the friend queries.
#[derive(Debug, Deserialize)]
pub struct FriendList {
  pub friends: Vec<String>,
  pub count:   usize,
}

/// `{"recipients": [...], "count": n}`
#[derive(Debug, Deserialize)]
pub struct RecipientList {
  pub recipients: Vec<String>,
  pub count:      usize,
}

/// Async HTTP client for the mutuals JSON REST API.
///
/// Cheap to clone: the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client:   Client,
  base_url: String,
}

impl ApiClient {
  pub fn new(base_url: impl Into<String>) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, base_url: base_url.into() })
  }

  fn url(&self, path: &str) -> String {
    format!("{}/api{}", self.base_url.trim_end_matches('/'), path)
  }

  async fn post<T: DeserializeOwned>(&self, path: &str, body: Value) -> Result<T> {
    tracing::debug!(%path, %body, "sending request");
    let resp = self
      .client
      .post(self.url(path))
      .json(&body)
      .send()
      .await
      .with_context(|| format!("POST {path} failed"))?;
    decode(path, resp).await
  }

  // ── Accounts ──────────────────────────────────────────────────────────────

  /// `POST /api/accounts`
  pub async fn create_account(&self, email: &str) -> Result<Account> {
    self.post("/accounts", json!({ "email": email })).await
  }

  // ── Relationships ─────────────────────────────────────────────────────────

  /// `POST /api/account-management/befriend`
  pub async fn befriend(&self, a: &str, b: &str) -> Result<()> {
    let _: Value = self
      .post("/account-management/befriend", json!({ "friends": [a, b] }))
      .await?;
    Ok(())
  }

  /// `POST /api/account-management/get-friends`
  pub async fn friends(&self, email: &str) -> Result<FriendList> {
    self
      .post("/account-management/get-friends", json!({ "email": email }))
      .await
  }

  /// `POST /api/account-management/get-common-friends`
  pub async fn common_friends(&self, a: &str, b: &str) -> Result<FriendList> {
    self
      .post(
        "/account-management/get-common-friends",
        json!({ "friends": [a, b] }),
      )
      .await
  }

  /// `POST /api/account-management/subscribe-updates`
  pub async fn subscribe(&self, requestor: &str, target: &str) -> Result<()> {
    let _: Value = self
      .post(
        "/account-management/subscribe-updates",
        json!({ "requestor": requestor, "target": target }),
      )
      .await?;
    Ok(())
  }

  /// `POST /api/account-management/block-account`
  pub async fn block(&self, requestor: &str, target: &str) -> Result<()> {
    let _: Value = self
      .post(
        "/account-management/block-account",
        json!({ "requestor": requestor, "target": target }),
      )
      .await?;
    Ok(())
  }

  /// `POST /api/account-management/get-update-recipients`
  pub async fn recipients(&self, sender: &str, text: &str) -> Result<RecipientList> {
    self
      .post(
        "/account-management/get-update-recipients",
        json!({ "sender": sender, "text": text }),
      )
      .await
  }
}

/// Deserialise a success body, or surface the server's `{"error"}` message.
async fn decode<T: DeserializeOwned>(path: &str, resp: Response) -> Result<T> {
  let status = resp.status();
  if !status.is_success() {
    let message = resp
      .json::<Value>()
      .await
      .ok()
      .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_owned))
      .unwrap_or_else(|| status.to_string());
    return Err(anyhow!("{path} → {status}: {message}"));
  }
  resp
    .json()
    .await
    .with_context(|| format!("deserialising response from {path}"))
}
