// Corpus input: the submissions handed to the engine, plus the on-disk
// loader and text decoding used by the binary.

pub mod decode;
pub mod loader;

use std::path::PathBuf;

/// One student's report text, already read and decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub student_id: String,
    pub raw_text: String,
    /// Directory the report came from (for external enrichment only)
    pub anchor: Option<PathBuf>,
}

impl Submission {
    pub fn new(student_id: impl Into<String>, raw_text: impl Into<String>) -> Self {
        Self {
            student_id: student_id.into(),
            raw_text: raw_text.into(),
            anchor: None,
        }
    }

    pub fn with_anchor(mut self, anchor: PathBuf) -> Self {
        self.anchor = Some(anchor);
        self
    }
}

/// The set of submissions compared in one run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Corpus {
    submissions: Vec<Submission>,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from (student id, report text) pairs.
    pub fn from_texts<I, K, V>(texts: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            submissions: texts
                .into_iter()
                .map(|(id, text)| Submission::new(id, text))
                .collect(),
        }
    }

    pub fn push(&mut self, submission: Submission) {
        self.submissions.push(submission);
    }

    pub fn submissions(&self) -> &[Submission] {
        &self.submissions
    }

    pub fn len(&self) -> usize {
        self.submissions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.submissions.is_empty()
    }
}

impl FromIterator<Submission> for Corpus {
    fn from_iter<I: IntoIterator<Item = Submission>>(iter: I) -> Self {
        Self {
            submissions: iter.into_iter().collect(),
        }
    }
}
