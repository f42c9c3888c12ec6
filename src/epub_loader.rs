//! EPUB loading.
//!
//! Opens an EPUB, walks its spine, and strips each chapter down to plain
//! text. The rest of the crate only ever sees "an ordered list of text
//! parts", which keeps the pipelines independent of container details.
//! Plain `.txt` files are accepted as a convenience source.

use anyhow::{Context, Result};
use epub::doc::EpubDoc;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Load the book at `path` and return its chapters as plain text, in spine
/// order. A `.txt` file becomes a single chapter.
pub fn load_chapters(path: &Path) -> Result<Vec<String>> {
    if is_text_file(path) {
        info!(path = %path.display(), "Loading plain text content");
        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        return Ok(vec![data]);
    }

    info!(path = %path.display(), "Loading EPUB content");
    let mut doc =
        EpubDoc::new(path).with_context(|| format!("Failed to open EPUB at {}", path.display()))?;

    let mut chapters = Vec::new();
    loop {
        if let Some((chapter, _mime)) = doc.get_current_str() {
            // Use a very large width so no hard line breaks get baked in;
            // fall back to the raw markup if the conversion fails.
            let plain = match html2text::from_read(chapter.as_bytes(), 10_000) {
                Ok(clean) => clean,
                Err(err) => {
                    warn!(chapter = chapters.len() + 1, "html2text failed: {err}");
                    chapter
                }
            };
            debug!(
                chapter = chapters.len() + 1,
                chars = plain.len(),
                "Parsed chapter"
            );
            chapters.push(plain);
        }
        if !doc.go_next() {
            break;
        }
    }

    let total_chars: usize = chapters.iter().map(String::len).sum();
    if chapters.iter().all(|chapter| chapter.trim().is_empty()) {
        warn!(path = %path.display(), "No textual content found in this book");
    }
    info!(
        chapters = chapters.len(),
        total_chars,
        "Finished loading book content"
    );
    Ok(chapters)
}

fn is_text_file(path: &Path) -> bool {
    matches!(
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase()),
        Some(ext) if ext == "txt"
    )
}
