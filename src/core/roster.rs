use crate::domain::model::{Participant, Tier};
use crate::domain::ports::RosterStore;
use crate::utils::error::{Result, TeamError};
use crate::utils::validation::normalize_name;
use std::collections::HashSet;
use uuid::Uuid;

/// In-memory roster backed by a [`RosterStore`].
///
/// Every mutation is written to the store first and only then applied to the
/// in-memory list, so a failed write leaves the roster exactly as it was.
pub struct Roster<S: RosterStore> {
    store: S,
    participants: Vec<Participant>,
}

fn ensure_unique_ids(participants: &[Participant]) -> Result<()> {
    let mut seen = HashSet::with_capacity(participants.len());
    for participant in participants {
        if !seen.insert(participant.id) {
            return Err(TeamError::DuplicateParticipant { id: participant.id });
        }
    }
    Ok(())
}

impl<S: RosterStore> Roster<S> {
    /// Loads the current roster from `store`.
    pub async fn load(store: S) -> Result<Self> {
        let participants = store.list_all().await?;
        ensure_unique_ids(&participants)?;
        tracing::debug!("Loaded {} participants from store", participants.len());

        Ok(Self {
            store,
            participants,
        })
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// Participants of `tier`, or everyone when no tier is given.
    pub fn by_tier(&self, tier: Option<Tier>) -> Vec<&Participant> {
        self.participants
            .iter()
            .filter(|p| tier.is_none_or(|t| p.tier == t))
            .collect()
    }

    pub fn find(&self, id: Uuid) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn position(&self, id: Uuid) -> Result<usize> {
        self.participants
            .iter()
            .position(|p| p.id == id)
            .ok_or(TeamError::ParticipantNotFound { id })
    }

    pub async fn add(&mut self, name: &str, tier: Tier) -> Result<Participant> {
        let participant = Participant::new(name, tier)?;

        self.store.insert(&participant).await.inspect_err(|e| {
            tracing::warn!("Failed to add '{}': {}", participant.name, e);
        })?;

        tracing::info!("Added {} (tier {})", participant.name, participant.tier);
        self.participants.push(participant.clone());
        Ok(participant)
    }

    pub async fn remove(&mut self, id: Uuid) -> Result<Participant> {
        let index = self.position(id)?;

        self.store.delete(id).await.inspect_err(|e| {
            tracing::warn!("Failed to remove {}: {}", id, e);
        })?;

        let removed = self.participants.remove(index);
        tracing::info!("Removed {}", removed.name);
        Ok(removed)
    }

    pub async fn update_tier(&mut self, id: Uuid, tier: Tier) -> Result<&Participant> {
        let index = self.position(id)?;
        let updated = Participant {
            tier,
            ..self.participants[index].clone()
        };
        self.replace(index, updated).await
    }

    pub async fn update_name(&mut self, id: Uuid, name: &str) -> Result<&Participant> {
        let index = self.position(id)?;
        let updated = Participant {
            name: normalize_name(name)?,
            ..self.participants[index].clone()
        };
        self.replace(index, updated).await
    }

    async fn replace(&mut self, index: usize, updated: Participant) -> Result<&Participant> {
        self.store.update(&updated).await.inspect_err(|e| {
            tracing::warn!("Failed to update {}: {}", updated.id, e);
        })?;

        tracing::info!("Updated {} (tier {})", updated.name, updated.tier);
        self.participants[index] = updated;
        Ok(&self.participants[index])
    }

    pub async fn clear(&mut self) -> Result<()> {
        self.store.delete_all().await.inspect_err(|e| {
            tracing::warn!("Failed to clear roster: {}", e);
        })?;

        tracing::info!("Cleared {} participants", self.participants.len());
        self.participants.clear();
        Ok(())
    }

    /// Replaces the whole roster.
    ///
    /// Names are trimmed and validated and ids must be unique before anything
    /// is written. If the store fails part way, the previous roster is written
    /// back so the store and the in-memory roster agree again. When that
    /// restore fails too, the returned error says so.
    pub async fn import(&mut self, participants: Vec<Participant>) -> Result<usize> {
        let participants = participants
            .into_iter()
            .map(|p| -> Result<Participant> {
                Ok(Participant {
                    name: normalize_name(&p.name)?,
                    ..p
                })
            })
            .collect::<Result<Vec<_>>>()?;
        ensure_unique_ids(&participants)?;

        if let Err(e) = self.write_all(&participants).await {
            tracing::warn!(
                "Import failed, restoring {} previous participants: {}",
                self.participants.len(),
                e
            );
            if let Err(restore) = self.write_all(&self.participants).await {
                tracing::error!("Restoring the previous roster failed: {}", restore);
                return Err(TeamError::store(format!(
                    "import failed ({}) and the previous roster could not be restored ({})",
                    e, restore
                )));
            }
            return Err(e);
        }

        let count = participants.len();
        tracing::info!("Imported {} participants", count);
        self.participants = participants;
        Ok(count)
    }

    async fn write_all(&self, participants: &[Participant]) -> Result<()> {
        self.store.delete_all().await?;
        for participant in participants {
            self.store.insert(participant).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::MemoryStore;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Wraps a memory store. Every write fails while `broken` is set, and the
    /// insert numbered `fail_at_insert` (1-based, 0 = never) fails once.
    #[derive(Clone, Default)]
    struct FlakyStore {
        inner: Arc<MemoryStore>,
        broken: Arc<AtomicBool>,
        fail_at_insert: Arc<AtomicUsize>,
        inserts: Arc<AtomicUsize>,
    }

    impl FlakyStore {
        fn check(&self) -> Result<()> {
            if self.broken.load(Ordering::SeqCst) {
                return Err(TeamError::store("connection reset"));
            }
            Ok(())
        }

        fn check_insert(&self) -> Result<()> {
            self.check()?;
            let number = self.inserts.fetch_add(1, Ordering::SeqCst) + 1;
            if number == self.fail_at_insert.load(Ordering::SeqCst) {
                return Err(TeamError::store("write timed out"));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl RosterStore for FlakyStore {
        async fn list_all(&self) -> Result<Vec<Participant>> {
            self.inner.list_all().await
        }

        async fn insert(&self, participant: &Participant) -> Result<()> {
            self.check_insert()?;
            self.inner.insert(participant).await
        }

        async fn update(&self, participant: &Participant) -> Result<()> {
            self.check()?;
            self.inner.update(participant).await
        }

        async fn delete(&self, id: Uuid) -> Result<()> {
            self.check()?;
            self.inner.delete(id).await
        }

        async fn delete_all(&self) -> Result<()> {
            self.check()?;
            self.inner.delete_all().await
        }
    }

    #[tokio::test]
    async fn test_add_update_remove() {
        let mut roster = Roster::load(MemoryStore::new()).await.unwrap();

        let mina = roster.add(" Mina ", Tier::A).await.unwrap();
        let jun = roster.add("Jun", Tier::D).await.unwrap();
        assert_eq!(roster.len(), 2);
        assert_eq!(mina.name, "Mina");

        roster.update_tier(jun.id, Tier::S).await.unwrap();
        roster.update_name(mina.id, "Mina K").await.unwrap();
        assert_eq!(roster.find(jun.id).unwrap().tier, Tier::S);
        assert_eq!(roster.find(mina.id).unwrap().name, "Mina K");

        let stored = roster.store().list_all().await.unwrap();
        assert_eq!(stored, roster.participants());

        roster.remove(mina.id).await.unwrap();
        assert_eq!(roster.len(), 1);
        assert!(roster.find(mina.id).is_none());
    }

    #[tokio::test]
    async fn test_invalid_name_is_rejected_before_store() {
        let mut roster = Roster::load(MemoryStore::new()).await.unwrap();
        assert!(roster.add("   ", Tier::B).await.is_err());
        assert!(roster.add(&"x".repeat(21), Tier::B).await.is_err());
        assert!(roster.is_empty());
        assert!(roster.store().list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let mut roster = Roster::load(MemoryStore::new()).await.unwrap();
        let err = roster.remove(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, TeamError::ParticipantNotFound { .. }));
    }

    #[tokio::test]
    async fn test_store_failure_leaves_roster_unchanged() {
        let store = FlakyStore::default();
        let broken = store.broken.clone();
        let mut roster = Roster::load(store).await.unwrap();
        let hana = roster.add("Hana", Tier::B).await.unwrap();
        let before = roster.participants().to_vec();

        broken.store(true, Ordering::SeqCst);

        assert!(roster.add("Seo", Tier::S).await.is_err());
        assert!(roster.update_tier(hana.id, Tier::S).await.is_err());
        assert!(roster.update_name(hana.id, "Hana L").await.is_err());
        assert!(roster.remove(hana.id).await.is_err());
        assert!(roster.clear().await.is_err());
        assert!(roster
            .import(vec![Participant::new("Other", Tier::C).unwrap()])
            .await
            .is_err());

        assert_eq!(roster.participants(), before.as_slice());
    }

    #[tokio::test]
    async fn test_failed_import_restores_previous_roster() {
        let store = FlakyStore::default();
        let inserts = store.inserts.clone();
        let fail_at_insert = store.fail_at_insert.clone();
        let mut roster = Roster::load(store).await.unwrap();
        roster.add("Keep1", Tier::A).await.unwrap();
        roster.add("Keep2", Tier::D).await.unwrap();
        let before = roster.participants().to_vec();

        // 匯入時第二筆寫入失敗
        fail_at_insert.store(inserts.load(Ordering::SeqCst) + 2, Ordering::SeqCst);
        let incoming: Vec<Participant> = ["N1", "N2", "N3"]
            .iter()
            .map(|name| Participant::new(name, Tier::B).unwrap())
            .collect();

        let err = roster.import(incoming).await.unwrap_err();
        assert!(matches!(err, TeamError::StoreError { .. }));
        assert_eq!(roster.participants(), before.as_slice());
        assert_eq!(roster.store().list_all().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_by_tier_filters_in_roster_order() {
        let mut roster = Roster::load(MemoryStore::new()).await.unwrap();
        roster.add("Ana", Tier::B).await.unwrap();
        roster.add("Ben", Tier::S).await.unwrap();
        roster.add("Cai", Tier::B).await.unwrap();

        let names = |list: Vec<&Participant>| -> Vec<String> {
            list.into_iter().map(|p| p.name.clone()).collect()
        };
        assert_eq!(names(roster.by_tier(Some(Tier::B))), ["Ana", "Cai"]);
        assert!(roster.by_tier(Some(Tier::D)).is_empty());
        assert_eq!(roster.by_tier(None).len(), 3);
    }

    #[tokio::test]
    async fn test_failed_restore_is_reported() {
        let store = FlakyStore::default();
        let broken = store.broken.clone();
        let mut roster = Roster::load(store).await.unwrap();
        roster.add("Keep", Tier::A).await.unwrap();

        broken.store(true, Ordering::SeqCst);
        let err = roster
            .import(vec![Participant::new("New", Tier::C).unwrap()])
            .await
            .unwrap_err();

        assert!(err.to_string().contains("could not be restored"));
        assert_eq!(roster.len(), 1);
    }

    #[tokio::test]
    async fn test_load_rejects_duplicate_ids() {
        let twin = Participant::new("Twin", Tier::S).unwrap();
        let store = MemoryStore::with_participants(vec![twin.clone(), twin]);

        let err = Roster::load(store).await.err().unwrap();
        assert!(matches!(err, TeamError::DuplicateParticipant { .. }));
    }

    #[tokio::test]
    async fn test_import_replaces_roster() {
        let mut roster = Roster::load(MemoryStore::new()).await.unwrap();
        roster.add("Old", Tier::C).await.unwrap();

        let incoming = vec![
            Participant::new("A", Tier::S).unwrap(),
            Participant::new("B", Tier::D).unwrap(),
        ];
        assert_eq!(roster.import(incoming.clone()).await.unwrap(), 2);
        assert_eq!(roster.participants(), incoming.as_slice());
        assert_eq!(roster.store().list_all().await.unwrap(), incoming);
    }

    #[tokio::test]
    async fn test_import_rejects_duplicate_ids() {
        let mut roster = Roster::load(MemoryStore::new()).await.unwrap();
        let twin = Participant::new("Twin", Tier::A).unwrap();

        let err = roster.import(vec![twin.clone(), twin]).await.unwrap_err();
        assert!(matches!(err, TeamError::DuplicateParticipant { .. }));
        assert!(roster.is_empty());
    }

    #[tokio::test]
    async fn test_clear() {
        let mut roster = Roster::load(MemoryStore::new()).await.unwrap();
        roster.add("One", Tier::A).await.unwrap();
        roster.add("Two", Tier::B).await.unwrap();

        roster.clear().await.unwrap();
        assert!(roster.is_empty());
        assert!(roster.store().list_all().await.unwrap().is_empty());
    }
}
