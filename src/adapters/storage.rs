use crate::domain::model::Participant;
use crate::domain::ports::RosterStore;
use crate::utils::error::{Result, TeamError};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use uuid::Uuid;

fn insert_into(participants: &mut Vec<Participant>, participant: &Participant) -> Result<()> {
    if participants.iter().any(|p| p.id == participant.id) {
        return Err(TeamError::DuplicateParticipant { id: participant.id });
    }
    participants.push(participant.clone());
    Ok(())
}

fn update_in(participants: &mut [Participant], participant: &Participant) -> Result<()> {
    let slot = participants
        .iter_mut()
        .find(|p| p.id == participant.id)
        .ok_or(TeamError::ParticipantNotFound { id: participant.id })?;
    *slot = participant.clone();
    Ok(())
}

fn delete_from(participants: &mut Vec<Participant>, id: Uuid) -> Result<()> {
    let before = participants.len();
    participants.retain(|p| p.id != id);
    if participants.len() == before {
        return Err(TeamError::ParticipantNotFound { id });
    }
    Ok(())
}

/// Roster kept in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    participants: Mutex<Vec<Participant>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_participants(participants: Vec<Participant>) -> Self {
        Self {
            participants: Mutex::new(participants),
        }
    }
}

#[async_trait]
impl RosterStore for MemoryStore {
    async fn list_all(&self) -> Result<Vec<Participant>> {
        Ok(self.participants.lock().await.clone())
    }

    async fn insert(&self, participant: &Participant) -> Result<()> {
        insert_into(&mut *self.participants.lock().await, participant)
    }

    async fn update(&self, participant: &Participant) -> Result<()> {
        update_in(&mut self.participants.lock().await, participant)
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        delete_from(&mut *self.participants.lock().await, id)
    }

    async fn delete_all(&self) -> Result<()> {
        self.participants.lock().await.clear();
        Ok(())
    }
}

/// Roster persisted as a single JSON array on disk.
///
/// Each write rewrites the whole file. A missing file reads as an empty
/// roster.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    // 序列化同一個行程內的讀寫，避免互相覆蓋
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> Result<Vec<Participant>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(Vec::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(
                    "Roster file {} not found, starting empty",
                    self.path.display()
                );
                Ok(Vec::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, participants: &[Participant]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let json = serde_json::to_vec_pretty(participants)?;
        tokio::fs::write(&self.path, json).await?;
        tracing::debug!(
            "Wrote {} participants to {}",
            participants.len(),
            self.path.display()
        );
        Ok(())
    }

    async fn modify<F>(&self, apply: F) -> Result<()>
    where
        F: FnOnce(&mut Vec<Participant>) -> Result<()> + Send,
    {
        let _guard = self.lock.lock().await;
        let mut participants = self.read().await?;
        apply(&mut participants)?;
        self.write(&participants).await
    }
}

#[async_trait]
impl RosterStore for JsonFileStore {
    async fn list_all(&self) -> Result<Vec<Participant>> {
        let _guard = self.lock.lock().await;
        self.read().await
    }

    async fn insert(&self, participant: &Participant) -> Result<()> {
        self.modify(|all| insert_into(all, participant)).await
    }

    async fn update(&self, participant: &Participant) -> Result<()> {
        self.modify(|all| update_in(all, participant)).await
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.modify(|all| delete_from(all, id)).await
    }

    async fn delete_all(&self) -> Result<()> {
        let _guard = self.lock.lock().await;
        self.write(&[]).await
    }
}
