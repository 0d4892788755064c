use super::domain::{CaseId, CaseRecord};

/// Storage abstraction handed to the case service at startup.
pub trait CaseRepository: Send + Sync {
    fn insert(&self, record: CaseRecord) -> Result<CaseRecord, RepositoryError>;
    /// Applies `change` to the stored case while holding the store's write lock and returns
    /// the updated record. Concurrent edits to the same case are serialized.
    fn modify(
        &self,
        id: &CaseId,
        change: &mut dyn FnMut(&mut CaseRecord),
    ) -> Result<CaseRecord, RepositoryError>;
    fn fetch(&self, id: &CaseId) -> Result<Option<CaseRecord>, RepositoryError>;
    fn list(&self) -> Result<Vec<CaseRecord>, RepositoryError>;
    fn delete(&self, id: &CaseId) -> Result<(), RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("case already exists")]
    Conflict,
    #[error("case not found")]
    NotFound,
    #[error("case store unavailable: {0}")]
    Unavailable(String),
}
