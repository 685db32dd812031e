use crate::domain::question::QuestionRecord;

use super::{file_store::FileStore, mongo_store::MongoStore};

/// The persistence target for crawled questions. Both variants carry
/// the same exists/insert/get capability; which one a record goes to
/// is decided once, when the store is built.
pub enum QuestionStore {
    File(FileStore),
    DocumentStore(MongoStore),
}

impl QuestionStore {
    pub async fn exists(&self, qid: &str) -> anyhow::Result<bool> {
        match self {
            QuestionStore::File(store) => store.exists(qid).await,
            QuestionStore::DocumentStore(store) => store.exists(qid).await,
        }
    }

    pub async fn insert(&self, record: &QuestionRecord) -> anyhow::Result<()> {
        match self {
            QuestionStore::File(store) => store.insert(record).await,
            QuestionStore::DocumentStore(store) => store.insert(record).await,
        }
    }

    pub async fn get(&self, qid: &str) -> anyhow::Result<Option<QuestionRecord>> {
        match self {
            QuestionStore::File(store) => store.get(qid).await,
            QuestionStore::DocumentStore(store) => store.get(qid).await,
        }
    }
}
