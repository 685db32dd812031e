use std::path::PathBuf;

use anyhow::Context;
use tokio::fs;

use crate::domain::question::QuestionRecord;

/// One pretty-printed JSON file per question, named by question id.
pub struct FileStore {
    questions_dir: PathBuf,
}

impl FileStore {
    pub fn new(questions_dir: impl Into<PathBuf>) -> Self {
        FileStore {
            questions_dir: questions_dir.into(),
        }
    }

    fn question_path(&self, qid: &str) -> PathBuf {
        self.questions_dir.join(format!("{}.json", qid))
    }

    pub async fn exists(&self, qid: &str) -> anyhow::Result<bool> {
        Ok(fs::try_exists(self.question_path(qid)).await?)
    }

    // Whole-file overwrite, never a merge.
    pub async fn insert(&self, record: &QuestionRecord) -> anyhow::Result<()> {
        fs::create_dir_all(&self.questions_dir).await?;
        let json = serde_json::to_string_pretty(record)?;
        fs::write(self.question_path(&record.id), json)
            .await
            .with_context(|| format!("Failed to write question {}", record.id))
    }

    pub async fn get(&self, qid: &str) -> anyhow::Result<Option<QuestionRecord>> {
        match fs::read_to_string(self.question_path(qid)).await {
            Ok(json) => Ok(Some(serde_json::from_str(&json)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
