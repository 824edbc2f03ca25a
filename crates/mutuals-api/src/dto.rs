//! Request and response bodies.
//!
//! Request fields are optional at the serde level so that a missing field is
//! reported through [`ApiError::BadRequest`] like any other malformed input.

use mutuals_core::email::is_well_formed;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

// ─── Requests ─────────────────────────────────────────────────────────────────

/// `{"email": "..."}`
#[derive(Debug, Default, Deserialize)]
pub struct EmailBody {
  pub email: Option<String>,
}

impl EmailBody {
  pub fn validate(self) -> Result<String, ApiError> {
    required("email", self.email)
  }
}

/// `{"friends": [a, b]}`
#[derive(Debug, Default, Deserialize)]
pub struct FriendPairBody {
  pub friends: Option<Vec<String>>,
}

impl FriendPairBody {
  /// Exactly two non-empty, well-formed, distinct emails.
  pub fn validate(self) -> Result<(String, String), ApiError> {
    let friends = self.friends.unwrap_or_default();
    let [a, b]: [String; 2] = friends.try_into().map_err(|_| {
      ApiError::BadRequest("exactly two emails must be specified".into())
    })?;

    if a.is_empty() || b.is_empty() {
      return Err(ApiError::BadRequest(
        "one of the emails is an empty email".into(),
      ));
    }

    let malformed: Vec<&str> = [a.as_str(), b.as_str()]
      .into_iter()
      .filter(|e| !is_well_formed(e))
      .collect();
    if !malformed.is_empty() {
      return Err(ApiError::BadRequest(format!(
        "the following emails are not well formed: {}",
        malformed.join(", ")
      )));
    }

    if a == b {
      return Err(ApiError::BadRequest("the two emails must differ".into()));
    }
    Ok((a, b))
  }
}

/// `{"requestor": r, "target": t}`
#[derive(Debug, Default, Deserialize)]
pub struct RequestorTargetBody {
  pub requestor: Option<String>,
  pub target:    Option<String>,
}

impl RequestorTargetBody {
  pub fn validate(self) -> Result<(String, String), ApiError> {
    let requestor = required("requestor", self.requestor)?;
    let target = required("target", self.target)?;
    Ok((requestor, target))
  }
}

/// `{"sender": s, "text": "..."}`; `text` may be omitted.
#[derive(Debug, Default, Deserialize)]
pub struct SenderBody {
  pub sender: Option<String>,
  #[serde(default)]
  pub text:   String,
}

impl SenderBody {
  pub fn validate(self) -> Result<(String, String), ApiError> {
    let sender = required("sender", self.sender)?;
    Ok((sender, self.text))
  }
}

fn required(field: &str, value: Option<String>) -> Result<String, ApiError> {
  let value = value.unwrap_or_default();
  if value.is_empty() {
    return Err(ApiError::BadRequest(format!("{field} is empty")));
  }
  if !is_well_formed(&value) {
    return Err(ApiError::BadRequest(format!(
      "{field} is not a valid email: {value}"
    )));
  }
  Ok(value)
}

// ─── Responses ────────────────────────────────────────────────────────────────

/// `{"success": true}`
#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessResponse {
  pub success: bool,
}

impl SuccessResponse {
  pub fn ok() -> Self { Self { success: true } }
}

/// `{"success": true, "friends": [...], "count": n}`
#[derive(Debug, Serialize, Deserialize)]
pub struct FriendsResponse {
  pub success: bool,
  pub friends: Vec<String>,
  pub count:   usize,
}

impl From<Vec<String>> for FriendsResponse {
  fn from(friends: Vec<String>) -> Self {
    Self { success: true, count: friends.len(), friends }
  }
}

/// `{"success": true, "recipients": [...], "count": n}`
#[derive(Debug, Serialize, Deserialize)]
pub struct RecipientsResponse {
  pub success:    bool,
  pub recipients: Vec<String>,
  pub count:      usize,
}

impl From<Vec<String>> for RecipientsResponse {
  fn from(recipients: Vec<String>) -> Self {
    Self { success: true, count: recipients.len(), recipients }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn pair(emails: &[&str]) -> FriendPairBody {
    FriendPairBody {
      friends: Some(emails.iter().map(|e| e.to_string()).collect()),
    }
  }

  #[test]
  fn friend_pair_accepts_two_distinct_emails() {
    let (a, b) = pair(&["a@x.com", "b@x.com"]).validate().unwrap();
    assert_eq!((a.as_str(), b.as_str()), ("a@x.com", "b@x.com"));
  }

  #[test]
  fn friend_pair_rejects_wrong_count() {
    assert!(pair(&["a@x.com"]).validate().is_err());
    assert!(pair(&["a@x.com", "b@x.com", "c@x.com"]).validate().is_err());
    assert!(FriendPairBody::default().validate().is_err());
  }

  #[test]
  fn friend_pair_rejects_empty_and_malformed() {
    let err = pair(&["", "b@x.com"]).validate().unwrap_err();
    assert!(err.to_string().contains("empty"));

    let err = pair(&["nope", "also nope"]).validate().unwrap_err();
    assert!(err.to_string().contains("nope, also nope"));
  }

  #[test]
  fn friend_pair_rejects_identical_emails() {
    assert!(pair(&["a@x.com", "a@x.com"]).validate().is_err());
  }

  #[test]
  fn requestor_target_checks_both_fields() {
    let body = RequestorTargetBody {
      requestor: Some("a@x.com".into()),
      target:    None,
    };
    let err = body.validate().unwrap_err();
    assert!(err.to_string().contains("target is empty"));

    let body = RequestorTargetBody {
      requestor: Some("a@x".into()),
      target:    Some("b@x.com".into()),
    };
    let err = body.validate().unwrap_err();
    assert!(err.to_string().contains("requestor is not a valid email"));
  }

  #[test]
  fn sender_text_defaults_to_empty() {
    let body: SenderBody =
      serde_json::from_str(r#"{"sender":"a@x.com"}"#).unwrap();
    let (sender, text) = body.validate().unwrap();
    assert_eq!(sender, "a@x.com");
    assert_eq!(text, "");
  }

  #[test]
  fn counts_follow_lists() {
    let r = FriendsResponse::from(vec!["a@x.com".to_string()]);
    assert!(r.success);
    assert_eq!(r.count, 1);
  }
}
