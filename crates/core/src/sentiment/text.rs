//! Preparing transcript text for sentiment detection.

/// Largest UTF-8 payload Comprehend accepts for one document.
pub const COMPREHEND_MAX_TEXT_BYTES: usize = 5000;

/// Outcome of preparing a transcript for Comprehend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreparedText<'a> {
    /// Nothing was said; there is no text to analyse.
    Empty,
    /// Text ready to send, `truncated` when the transcript exceeded the limit.
    Text { text: &'a str, truncated: bool },
}

/// Trims the transcript and cuts it to the Comprehend size limit without
/// splitting a UTF-8 character.
pub fn prepare_text(transcript: &str) -> PreparedText<'_> {
    let trimmed = transcript.trim();
    if trimmed.is_empty() {
        return PreparedText::Empty;
    }

    if trimmed.len() <= COMPREHEND_MAX_TEXT_BYTES {
        return PreparedText::Text {
            text: trimmed,
            truncated: false,
        };
    }

    let mut end = COMPREHEND_MAX_TEXT_BYTES;
    while !trimmed.is_char_boundary(end) {
        end -= 1;
    }

    PreparedText::Text {
        text: &trimmed[..end],
        truncated: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_transcript_is_empty() {
        assert_eq!(prepare_text(""), PreparedText::Empty);
        assert_eq!(prepare_text("  \n\t "), PreparedText::Empty);
    }

    #[test]
    fn test_short_transcript_is_trimmed() {
        assert_eq!(
            prepare_text("  hello there  "),
            PreparedText::Text {
                text: "hello there",
                truncated: false
            }
        );
    }

    #[test]
    fn test_long_transcript_is_truncated() {
        let long = "a".repeat(COMPREHEND_MAX_TEXT_BYTES + 10);
        match prepare_text(&long) {
            PreparedText::Text { text, truncated } => {
                assert!(truncated);
                assert_eq!(text.len(), COMPREHEND_MAX_TEXT_BYTES);
            }
            PreparedText::Empty => panic!("expected text"),
        }
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        // "é" is two bytes, so the limit falls in the middle of a character.
        let long = format!("a{}", "é".repeat(COMPREHEND_MAX_TEXT_BYTES));
        match prepare_text(&long) {
            PreparedText::Text { text, truncated } => {
                assert!(truncated);
                assert_eq!(text.len(), COMPREHEND_MAX_TEXT_BYTES - 1);
                assert!(text.ends_with('é'));
            }
            PreparedText::Empty => panic!("expected text"),
        }
    }
}
