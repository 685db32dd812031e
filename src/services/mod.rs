pub mod crawler;
pub mod question_scraper;

pub use crawler::*;
pub use question_scraper::*;
