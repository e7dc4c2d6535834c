use crate::domain::model::Participant;
use crate::utils::error::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Persistence for roster records.
///
/// Implementations only store what they are given; id uniqueness and name
/// validation happen in [`crate::core::roster::Roster`] before a call reaches
/// the store.
#[async_trait]
pub trait RosterStore: Send + Sync {
    async fn list_all(&self) -> Result<Vec<Participant>>;
    async fn insert(&self, participant: &Participant) -> Result<()>;
    async fn update(&self, participant: &Participant) -> Result<()>;
    async fn delete(&self, id: Uuid) -> Result<()>;
    async fn delete_all(&self) -> Result<()>;
}
