//! [`MemoryStore`]: a process-local [`RelationshipStore`] over a [`Graph`].

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use uuid::Uuid;

use crate::{
  Error, Result,
  account::Account,
  graph::{Graph, GraphPolicy},
  store::RelationshipStore,
};

/// A relationship store held entirely in memory.
///
/// Mutations hold the write lock for their whole check-then-apply sequence.
/// Cloning is cheap; clones share the same graph.
#[derive(Clone, Default)]
pub struct MemoryStore {
  graph: Arc<RwLock<Graph>>,
}

impl MemoryStore {
  pub fn new(policy: GraphPolicy) -> Self {
    Self { graph: Arc::new(RwLock::new(Graph::new(policy))) }
  }

  // Graph mutations validate before writing, so a panic while the lock was
  // held cannot have left a half-applied edge behind.
  fn read(&self) -> RwLockReadGuard<'_, Graph> {
    self.graph.read().unwrap_or_else(PoisonError::into_inner)
  }

  fn write(&self) -> RwLockWriteGuard<'_, Graph> {
    self.graph.write().unwrap_or_else(PoisonError::into_inner)
  }
}

impl RelationshipStore for MemoryStore {
  type Error = Error;

  async fn create_account<'a>(&'a self, email: &'a str) -> Result<Account> {
    self.write().create_account(email)
  }

  async fn get_account(&self, id: Uuid) -> Result<Option<Account>> {
    Ok(self.read().directory().get(id).cloned())
  }

  async fn befriend<'a>(&'a self, a: &'a str, b: &'a str) -> Result<()> {
    self.write().befriend(a, b)
  }

  async fn subscribe<'a>(
    &'a self,
    requestor: &'a str,
    target: &'a str,
  ) -> Result<()> {
    self.write().subscribe(requestor, target)
  }

  async fn block<'a>(&'a self, requestor: &'a str, target: &'a str) -> Result<()> {
    self.write().block(requestor, target)
  }

  async fn friends<'a>(&'a self, email: &'a str) -> Result<Vec<String>> {
    self.read().friends(email)
  }

  async fn common_friends<'a>(
    &'a self,
    a: &'a str,
    b: &'a str,
  ) -> Result<Vec<String>> {
    self.read().common_friends(a, b)
  }

  async fn eligible_recipients<'a>(
    &'a self,
    sender: &'a str,
  ) -> Result<Vec<String>> {
    self.read().eligible_recipients(sender)
  }
}
