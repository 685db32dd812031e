use serde::{Deserialize, Serialize};

/// Title marker for a page that came back without a question on it.
pub const NOT_FOUND_TITLE: &str = "404";

/// One crawled question with its answers. Field renames match the
/// stored document schema; `_id` doubles as the document-store key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub url: String,
    #[serde(rename = "anum")]
    pub answer_count: i64,
    pub title: String,
    #[serde(rename = "question")]
    pub body: String,
    pub labels: Vec<String>,
    pub answers: Vec<AnswerRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerRecord {
    #[serde(rename = "aid")]
    pub id: String,
    pub url: String,
    #[serde(rename = "agrees")]
    pub vote_count: i64,
    pub text: String,
}

impl QuestionRecord {
    pub fn not_found(id: String, url: String) -> Self {
        QuestionRecord {
            id,
            url,
            answer_count: 0,
            title: NOT_FOUND_TITLE.to_string(),
            body: String::new(),
            labels: Vec::new(),
            answers: Vec::new(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.title == NOT_FOUND_TITLE
    }
}
