//! Email patterns: boundary validation and mention extraction.
//!
//! [`is_well_formed`] belongs to request validation and is called by the API
//! layer only; the graph assumes its inputs already passed it.
//! [`mentions`] is part of broadcast resolution.

use std::sync::LazyLock;

use regex::Regex;

static WELL_FORMED: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,4}$")
    .expect("well-formed email pattern compiles")
});

static MENTION: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"[a-zA-Z0-9_.+\-]+@[a-zA-Z0-9\-]+\.[a-zA-Z0-9.\-]+")
    .expect("mention pattern compiles")
});

/// Whether `email` is a syntactically acceptable address for a request body.
pub fn is_well_formed(email: &str) -> bool { WELL_FORMED.is_match(email) }

/// Every email-like substring of `text`, in the order encountered.
///
/// Duplicates are kept.
pub fn mentions(text: &str) -> Vec<String> {
  MENTION
    .find_iter(text)
    .map(|m| m.as_str().to_owned())
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn well_formed_addresses() {
    assert!(is_well_formed("andy@example.com"));
    assert!(is_well_formed("first.last+tag@mail.example.org"));
    assert!(is_well_formed("a_b%c@x.io"));
  }

  #[test]
  fn malformed_addresses() {
    assert!(!is_well_formed(""));
    assert!(!is_well_formed("andy"));
    assert!(!is_well_formed("andy@example"));
    assert!(!is_well_formed("@example.com"));
    assert!(!is_well_formed("andy@example.c"));
    assert!(!is_well_formed("andy@example.company"));
    assert!(!is_well_formed(" andy@example.com"));
  }

  #[test]
  fn mentions_in_text_order() {
    let found = mentions("Hello World! kate@example.com and lisa@example.com");
    assert_eq!(found, vec!["kate@example.com", "lisa@example.com"]);
  }

  #[test]
  fn mentions_keep_duplicates() {
    let found = mentions("d@x.com, d@x.com");
    assert_eq!(found, vec!["d@x.com", "d@x.com"]);
  }

  #[test]
  fn no_mentions() {
    assert!(mentions("").is_empty());
    assert!(mentions("nothing to see @ here").is_empty());
  }

  #[test]
  fn mention_requires_dotted_domain() {
    assert!(mentions("ping d@localhost").is_empty());
    assert_eq!(mentions("ping d@x.com"), vec!["d@x.com"]);
  }
}
