// Corpus loader: finds each student's report on disk and reads it.
//
// Expected layout, one directory per student:
//
//   <base>/<student>/<type>/<any subdir>/<type>/*.md
//
// Discovery is a quick synchronous directory walk; reading is async and
// bounded so a large class does not open every file at once.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use super::decode::{decode_text, SourceEncoding};
use super::{Corpus, Submission};

/// One discovered report, not yet read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionFile {
    pub student_id: String,
    pub markdown: PathBuf,
    /// Directory holding the report and its images
    pub anchor: PathBuf,
}

/// Find every student's report for one homework type.
///
/// Students without that homework are skipped. When a student has several
/// candidate directories or markdown files, the first in sorted order wins.
pub fn discover_submissions(base: &Path, homework_type: &str) -> Result<Vec<SubmissionFile>> {
    if !base.is_dir() {
        bail!("Homework directory not found: {}", base.display());
    }

    let mut files = Vec::new();
    for student_dir in sorted_dirs(base)? {
        let Some(student_id) = student_dir.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        let homework_dir = student_dir.join(homework_type);
        if !homework_dir.is_dir() {
            continue;
        }

        match find_report(&homework_dir, homework_type)? {
            Some((markdown, anchor)) => files.push(SubmissionFile {
                student_id: student_id.to_string(),
                markdown,
                anchor,
            }),
            None => debug!(student = student_id, "No markdown report found"),
        }
    }

    info!(count = files.len(), homework_type, "Submissions discovered");
    Ok(files)
}

/// Read and decode every report, at most `concurrency` at a time.
///
/// Unreadable files are logged and left out of the corpus. The corpus is
/// returned in student id order.
pub async fn load_corpus(files: &[SubmissionFile], concurrency: usize) -> Corpus {
    let results: Vec<Option<Submission>> = stream::iter(files)
        .map(|file| async move {
            match tokio::fs::read(&file.markdown).await {
                Ok(bytes) => {
                    let (text, encoding) = decode_text(&bytes);
                    if encoding != SourceEncoding::Utf8 {
                        debug!(
                            student = %file.student_id,
                            ?encoding,
                            "Report decoded from a legacy encoding"
                        );
                    }
                    Some(Submission::new(&file.student_id, text).with_anchor(file.anchor.clone()))
                }
                Err(e) => {
                    warn!(
                        student = %file.student_id,
                        path = %file.markdown.display(),
                        error = %e,
                        "Failed to read report, skipping"
                    );
                    None
                }
            }
        })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    let mut submissions: Vec<Submission> = results.into_iter().flatten().collect();
    submissions.sort_by(|a, b| a.student_id.cmp(&b.student_id));
    submissions.into_iter().collect()
}

fn find_report(homework_dir: &Path, homework_type: &str) -> Result<Option<(PathBuf, PathBuf)>> {
    for subdir in sorted_dirs(homework_dir)? {
        let report_dir = subdir.join(homework_type);
        if !report_dir.is_dir() {
            continue;
        }

        let mut markdown: Vec<PathBuf> = fs::read_dir(&report_dir)
            .with_context(|| format!("Failed to list {}", report_dir.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "md"))
            .collect();
        markdown.sort();

        if let Some(first) = markdown.into_iter().next() {
            return Ok(Some((first, report_dir)));
        }
    }
    Ok(None)
}

fn sorted_dirs(path: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs: Vec<PathBuf> = fs::read_dir(path)
        .with_context(|| format!("Failed to list {}", path.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_dir())
        .collect();
    dirs.sort();
    Ok(dirs)
}
