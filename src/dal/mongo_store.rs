use mongodb::{
    bson::doc,
    error::{ErrorKind, WriteFailure},
    Client, Collection,
};

use crate::domain::question::QuestionRecord;

const DUPLICATE_KEY_CODE: i32 = 11000;

/// One document per question in the `questions` collection, keyed by
/// question id through the `_id` field.
pub struct MongoStore {
    questions: Collection<QuestionRecord>,
}

impl MongoStore {
    pub async fn connect(uri: &str, database: &str) -> anyhow::Result<Self> {
        let client = Client::with_uri_str(uri).await?;
        Ok(MongoStore {
            questions: client.database(database).collection("questions"),
        })
    }

    pub async fn exists(&self, qid: &str) -> anyhow::Result<bool> {
        let count = self.questions.count_documents(doc! { "_id": qid }).await?;
        Ok(count != 0)
    }

    // Replace on conflict is delete-then-insert, not an atomic
    // upsert. A concurrent writer to the same id can interleave
    // between the two steps; single writer per id is assumed.
    pub async fn insert(&self, record: &QuestionRecord) -> anyhow::Result<()> {
        match self.questions.insert_one(record).await {
            Ok(_) => Ok(()),
            Err(e) if is_duplicate_key(&e) => {
                self.questions
                    .delete_one(doc! { "_id": record.id.as_str() })
                    .await?;
                self.questions.insert_one(record).await?;
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn get(&self, qid: &str) -> anyhow::Result<Option<QuestionRecord>> {
        Ok(self.questions.find_one(doc! { "_id": qid }).await?)
    }
}

fn is_duplicate_key(e: &mongodb::error::Error) -> bool {
    match *e.kind {
        ErrorKind::Write(WriteFailure::WriteError(ref write_error)) => {
            write_error.code == DUPLICATE_KEY_CODE
        }
        _ => false,
    }
}
