use std::time::Duration;

use env_logger::Env;
use quarry::{
    configuration::get_configuration,
    dal::{FileStore, MongoStore, QuestionStore},
    services::crawl_question,
};

const THINK_TIME: Duration = Duration::from_millis(10);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let configuration = get_configuration().expect("Failed to read configuration.");

    let store = match configuration.storage.mongo_uri {
        Some(ref uri) => QuestionStore::DocumentStore(
            MongoStore::connect(uri, &configuration.storage.mongo_database).await?,
        ),
        None => QuestionStore::File(FileStore::new(configuration.storage.questions_dir.clone())),
    };

    let qids: Vec<String> = std::env::args().skip(1).collect();
    if qids.is_empty() {
        log::error!("No question ids given, nothing to crawl");
        return Ok(());
    }

    for qid in &qids {
        let record = crawl_question(qid, &configuration.crawler, &store).await?;
        log::info!(
            "Question {}: \"{}\" with {} answers",
            record.id,
            record.title,
            record.answer_count
        );
        tokio::time::sleep(THINK_TIME).await;
    }

    Ok(())
}
