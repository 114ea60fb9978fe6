use serde::Deserialize;

/// The JSON document Transcribe writes when a job completes.
///
/// Only the fields the pipeline reads are modelled; everything else
/// (items, speaker labels) is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TranscriptDocument {
    #[serde(rename = "jobName", default)]
    pub job_name: Option<String>,
    #[serde(default)]
    pub results: TranscriptResults,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TranscriptResults {
    #[serde(default)]
    pub transcripts: Vec<TranscriptSegment>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TranscriptSegment {
    #[serde(default)]
    pub transcript: String,
}

impl TranscriptDocument {
    /// The full transcript text, or `None` when the document has none.
    pub fn transcript_text(&self) -> Option<&str> {
        self.results
            .transcripts
            .first()
            .map(|segment| segment.transcript.as_str())
    }
}
