pub mod file_store;
pub mod mongo_store;
pub mod question_store;

pub use file_store::FileStore;
pub use mongo_store::MongoStore;
pub use question_store::QuestionStore;
