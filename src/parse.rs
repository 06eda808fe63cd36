use std::path::Path;

use anyhow::Result;

use crate::errors::TinybenchError;
use crate::types::{Markers, Segments};

/// Split a document into its shared preamble and the benchmark fragments
/// delimited by `markers`.
///
/// The fragment buffer is only cleared by a start marker: a second start
/// restarts the current fragment, and a stop with no region open commits the
/// buffer as it stands (empty before the first region, otherwise the previous
/// fragment again). A region still open at end of input is dropped. Fails with
/// `NoFragmentsFound` when no complete region exists.
pub fn extract(document: &str, markers: &Markers) -> Result<Segments> {
    let mut preamble = String::new();
    let mut current = String::new();
    let mut fragments = Vec::new();
    let mut in_fragment = false;

    for line in document.lines() {
        let trimmed = line.trim();
        if trimmed == markers.start {
            in_fragment = true;
            current.clear();
        } else if trimmed == markers.stop {
            in_fragment = false;
            fragments.push(current.clone());
        } else if in_fragment {
            current.push_str(line);
            current.push('\n');
        } else {
            preamble.push_str(line);
            preamble.push('\n');
        }
    }

    if in_fragment {
        tracing::debug!(
            dropped_lines = current.lines().count(),
            "unterminated benchmark region ignored"
        );
    }

    if fragments.is_empty() {
        return Err(TinybenchError::NoFragmentsFound {
            start: markers.start.clone(),
            stop: markers.stop.clone(),
        }
        .into());
    }

    Ok(Segments {
        preamble,
        fragments,
    })
}

/// Read a benchmark document. Bytes that are not valid UTF-8 are replaced
/// rather than rejected, since the interpreter receives the program as a
/// command-line argument and decodes it the same way.
pub fn read_document(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|source| TinybenchError::DocumentUnreadable {
        path: path.to_path_buf(),
        source,
    })?;

    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(err) => {
            tracing::warn!(
                path = %path.display(),
                valid_up_to = err.utf8_error().valid_up_to(),
                "document is not valid UTF-8, replacing invalid bytes"
            );
            Ok(String::from_utf8_lossy(err.as_bytes()).into_owned())
        }
    }
}
