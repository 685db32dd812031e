use std::time::Duration;

use rand::seq::SliceRandom;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::{
    configuration::CrawlerSettings,
    domain::question::{AnswerRecord, QuestionRecord},
};

/// Fetch one question page and extract the full record from it.
pub async fn scrape_question(qid: &str, settings: &CrawlerSettings) -> QuestionRecord {
    let url = settings.question_url(qid);
    let source = fetch_question_page(&url, settings).await;
    parse_question(qid, &url, &source, &settings.base_url)
}

/// Retries until some attempt returns a body. Every attempt gets a
/// fresh client with a proxy drawn at random from the pool, so a dead
/// proxy only costs one attempt. No attempt cap and no backoff.
pub async fn fetch_question_page(url: &str, settings: &CrawlerSettings) -> String {
    loop {
        let client = build_client(settings);

        match client.get(url).send().await {
            Ok(res) => match res.text().await {
                Ok(source) => return source,
                Err(e) => {
                    log::warn!("Failed to read page body from {}, retrying. Error: {:?}", url, e)
                }
            },
            Err(e) => {
                log::warn!(
                    "No response from {}, retrying with a fresh proxy. Error: {:?}",
                    url,
                    e
                )
            }
        }
    }
}

fn build_client(settings: &CrawlerSettings) -> reqwest::Client {
    let mut builder = reqwest::Client::builder()
        .user_agent(settings.client_identifier.clone())
        .timeout(Duration::from_millis(settings.timeout_ms));

    if let Some(proxy) = settings.proxy_pool.choose(&mut rand::thread_rng()) {
        builder = builder
            .proxy(reqwest::Proxy::http(proxy.as_str()).unwrap())
            .proxy(reqwest::Proxy::https(proxy.as_str()).unwrap());
    }

    builder.build().unwrap()
}

/// Extract every field from the page source. A page without the title
/// element is treated as not found and yields the sentinel record.
pub fn parse_question(qid: &str, url: &str, source: &str, base_url: &str) -> QuestionRecord {
    let document = Html::parse_document(source);

    let title = match extract_title(&document) {
        Some(title) => title,
        None => return QuestionRecord::not_found(qid.to_string(), url.to_string()),
    };

    let answers = extract_answers(&document, base_url);
    let answer_count = extract_answer_count(&document).unwrap_or(answers.len() as i64);

    QuestionRecord {
        id: qid.to_string(),
        url: url.to_string(),
        answer_count,
        title,
        body: extract_body(&document),
        labels: extract_labels(&document),
        answers,
    }
}

/// `"37"` stays `37`, a trailing `K` multiplies the prefix by 1000
/// and truncates, anything else is unusable.
pub fn normalize_vote_count(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    match raw.strip_suffix('K') {
        Some(prefix) => prefix.parse::<f64>().ok().map(|n| (n * 1000.0) as i64),
        None => raw.parse::<f64>().ok().map(|n| n as i64),
    }
}

fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("h2.zm-item-title.zm-editable-content").unwrap();

    document
        .select(&title_selector)
        .next()?
        .text()
        .map(str::trim)
        .find(|t| !t.is_empty())
        .map(|t| t.to_string())
}

fn extract_body(document: &Html) -> String {
    let detail_selector = Selector::parse("div#zh-question-detail div.zm-editable-content").unwrap();
    let fallback_selector = Selector::parse("div#zh-question-detail textarea.content").unwrap();

    document
        .select(&detail_selector)
        .next()
        .or_else(|| document.select(&fallback_selector).next())
        .map(element_text)
        .unwrap_or_default()
}

fn extract_labels(document: &Html) -> Vec<String> {
    let container_selector = Selector::parse("div.zm-tag-editor-labels.zg-clear").unwrap();
    let label_selector = Selector::parse("a").unwrap();

    match document.select(&container_selector).next() {
        Some(container) => container.select(&label_selector).map(element_text).collect(),
        None => Vec::new(),
    }
}

/// Answers come out in page order. A block missing its canonical
/// link, vote counter or body container is an incompletely rendered
/// block and is dropped whole.
fn extract_answers(document: &Html, base_url: &str) -> Vec<AnswerRecord> {
    let answer_selector = Selector::parse("div.zm-item-answer.zm-item-expanded").unwrap();
    let link_selector = Selector::parse(r#"link[itemprop="url"]"#).unwrap();
    let count_selector = Selector::parse("div.zm-votebar span.count").unwrap();
    let text_selector = Selector::parse("div.zm-editable-content.clearfix").unwrap();

    document
        .select(&answer_selector)
        .filter_map(|block| {
            let href = block.select(&link_selector).next()?.value().attr("href")?;
            let id = href.split('/').nth(4)?.to_string();
            let url = Url::parse(base_url).ok()?.join(href).ok()?.to_string();

            let raw_votes = element_text(block.select(&count_selector).next()?);
            let vote_count = normalize_vote_count(&raw_votes)?;

            let text = element_text(block.select(&text_selector).next()?);

            Some(AnswerRecord {
                id,
                url,
                vote_count,
                text,
            })
        })
        .collect()
}

fn extract_answer_count(document: &Html) -> Option<i64> {
    let counter_selector = Selector::parse("h3#zh-question-answer-num").unwrap();

    document
        .select(&counter_selector)
        .next()?
        .value()
        .attr("data-num")?
        .trim()
        .parse()
        .ok()
}

fn element_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}
