//! Path joining and `{name}` placeholder templates for API URLs.

use crate::error::FieldError;
use std::collections::BTreeMap;

/// Joins path segments with `/` and collapses every run of slashes into one.
///
/// `join_subpaths(&["/api/", "/2/", "/projects/"])` gives `/api/2/projects/`.
pub fn join_subpaths<S: AsRef<str>>(segments: &[S]) -> String {
    let joined = segments
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("/");

    let mut path = String::with_capacity(joined.len());
    for c in joined.chars() {
        if c == '/' && path.ends_with('/') {
            continue;
        }
        path.push(c);
    }
    path
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece<'a> {
    Literal(&'a str),
    Placeholder(&'a str),
}

/// A path template such as `project/{project_slug}/resource/{slug}/`.
///
/// An opening brace without a closing one is kept as literal text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathTemplate(&'static str);

impl PathTemplate {
    pub const fn new(template: &'static str) -> Self {
        Self(template)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }

    fn pieces(&self) -> Vec<Piece<'static>> {
        let mut pieces = Vec::new();
        let mut rest = self.0;
        while let Some(open) = rest.find('{') {
            let Some(len) = rest[open + 1..].find('}') else { break };
            if open > 0 {
                pieces.push(Piece::Literal(&rest[..open]));
            }
            pieces.push(Piece::Placeholder(&rest[open + 1..open + 1 + len]));
            rest = &rest[open + len + 2..];
        }
        if !rest.is_empty() {
            pieces.push(Piece::Literal(rest));
        }
        pieces
    }

    /// Names of the placeholders, in order of appearance.
    pub fn placeholders(&self) -> Vec<&'static str> {
        self.pieces()
            .into_iter()
            .filter_map(|piece| match piece {
                Piece::Placeholder(name) => Some(name),
                Piece::Literal(_) => None,
            })
            .collect()
    }

    /// Substitutes every placeholder; a missing value is an error, never an empty segment.
    pub fn render<V: AsRef<str>>(&self, params: &BTreeMap<&str, V>) -> Result<String, FieldError> {
        let mut out = String::with_capacity(self.0.len());
        for piece in self.pieces() {
            match piece {
                Piece::Literal(text) => out.push_str(text),
                Piece::Placeholder(name) => {
                    let value = params.get(name).ok_or_else(|| FieldError::MissingPlaceholder {
                        template: self.0.to_string(),
                        name: name.to_string(),
                    })?;
                    out.push_str(value.as_ref());
                }
            }
        }
        Ok(out)
    }
}
