//! Sentiment labels, the stored result record, and text preparation.

mod error;
mod text;
mod types;

pub use error::SentimentError;
pub use text::{prepare_text, PreparedText, COMPREHEND_MAX_TEXT_BYTES};
pub use types::{alert_message, Sentiment, SentimentRecord};
