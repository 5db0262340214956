//! Dotted-path lookup into raw telemetry documents.

use serde_derive::Serialize;
use serde_json::Value;

/// One dotted path, or an ordered list of candidates where the first one that
/// resolves wins. Candidates cover fields renamed between firmware versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PathSpec {
    Single(&'static str),
    Candidates(&'static [&'static str]),
}

impl PathSpec {
    pub fn paths(&self) -> &[&'static str] {
        match self {
            PathSpec::Single(path) => std::slice::from_ref(path),
            PathSpec::Candidates(paths) => paths,
        }
    }
}

/// Walks a single dotted path. Any missing segment, null, or non-object
/// intermediate means the path does not resolve.
pub fn resolve_path<'a>(document: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = document;
    for segment in path.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    if current.is_null() {
        None
    } else {
        Some(current)
    }
}

/// Resolves a path spec against a document, returning the first candidate
/// that resolves. Never evaluates candidates after the first hit.
pub fn resolve<'a>(document: &'a Value, spec: &PathSpec) -> Option<&'a Value> {
    spec.paths()
        .iter()
        .find_map(|path| resolve_path(document, path))
}
