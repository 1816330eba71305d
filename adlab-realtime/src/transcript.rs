//! Rolling conversation transcript.

/// How many lines the transcript keeps.
pub const DEFAULT_TRANSCRIPT_LINES: usize = 5;

/// Who said a transcript line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Assistant,
}

/// One finalized or in-progress line of the conversation.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptLine {
    pub speaker: Speaker,
    pub text: String,
}

/// A transcript capped to the most recent lines.
///
/// Every transcription fragment becomes its own tagged line, regardless of
/// speaker. When the cap is exceeded the oldest line is dropped.
#[derive(Debug, Clone)]
pub struct TranscriptLog {
    lines: Vec<TranscriptLine>,
    cap: usize,
}

impl Default for TranscriptLog {
    fn default() -> Self {
        Self::new(DEFAULT_TRANSCRIPT_LINES)
    }
}

impl TranscriptLog {
    pub fn new(cap: usize) -> Self {
        Self { lines: Vec::new(), cap }
    }

    /// Append a transcription fragment as a new line for the speaker.
    pub fn push_fragment(&mut self, speaker: Speaker, fragment: &str) {
        self.lines.push(TranscriptLine { speaker, text: fragment.to_string() });
        if self.lines.len() > self.cap {
            self.lines.remove(0);
        }
    }

    pub fn lines(&self) -> &[TranscriptLine] {
        &self.lines
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
