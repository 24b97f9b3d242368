//! Route path pattern matching.
//!
//! # Responsibilities
//! - Compile path patterns (`/`, `/logs`, `/users/:id`)
//! - Match a concrete path against a compiled pattern
//! - Extract named parameters from `:name` segments
//!
//! # Design Decisions
//! - Path matching is case-sensitive
//! - A single trailing slash is ignored (`/logs/` == `/logs`)
//! - A parameter matches exactly one non-empty segment
//! - No regex to guarantee O(n) matching

use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Static(String),
    Param(String),
}

/// A compiled route path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    /// Compile a pattern. Returns the reason on failure.
    pub fn parse(pattern: &str) -> Result<Self, String> {
        if !pattern.starts_with('/') {
            return Err("pattern must start with `/`".to_string());
        }
        if pattern.contains(['?', '#']) {
            return Err("pattern must not contain a query or fragment".to_string());
        }

        let mut segments = Vec::new();
        for part in split_segments(pattern) {
            if part.is_empty() {
                return Err("pattern contains an empty segment".to_string());
            }
            match part.strip_prefix(':') {
                Some(name) => {
                    if name.is_empty() {
                        return Err("parameter name is empty".to_string());
                    }
                    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                        return Err(format!("parameter name `{}` has invalid characters", name));
                    }
                    let taken = segments
                        .iter()
                        .any(|s| matches!(s, Segment::Param(existing) if existing == name));
                    if taken {
                        return Err(format!("parameter `{}` appears more than once", name));
                    }
                    segments.push(Segment::Param(name.to_string()));
                }
                None => segments.push(Segment::Static(part.to_string())),
            }
        }

        Ok(Self {
            raw: pattern.to_string(),
            segments,
        })
    }

    /// The pattern as declared.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Canonical form with parameter names erased.
    ///
    /// Two patterns with the same shape match exactly the same paths.
    pub fn shape(&self) -> String {
        if self.segments.is_empty() {
            return "/".to_string();
        }
        self.segments
            .iter()
            .map(|s| match s {
                Segment::Static(text) => format!("/{}", text),
                Segment::Param(_) => "/:".to_string(),
            })
            .collect()
    }

    /// Names of the parameters in declaration order.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Param(name) => Some(name.as_str()),
            Segment::Static(_) => None,
        })
    }

    /// Match a path (without query or fragment). Returns the extracted
    /// parameters on success.
    pub fn matches(&self, path: &str) -> Option<BTreeMap<String, String>> {
        if !path.starts_with('/') {
            return None;
        }

        let parts: Vec<&str> = split_segments(path).collect();
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = BTreeMap::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Static(text) => {
                    if text != part {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    if part.is_empty() {
                        return None;
                    }
                    params.insert(name.clone(), part.to_string());
                }
            }
        }
        Some(params)
    }

    /// Build a concrete path by substituting parameters.
    /// Returns `None` if a parameter is missing or empty.
    pub fn render(&self, params: &[(&str, &str)]) -> Option<String> {
        if self.segments.is_empty() {
            return Some("/".to_string());
        }

        let mut path = String::new();
        for segment in &self.segments {
            path.push('/');
            match segment {
                Segment::Static(text) => path.push_str(text),
                Segment::Param(name) => {
                    let value = params
                        .iter()
                        .find(|(key, _)| *key == name.as_str())
                        .map(|(_, value)| *value)
                        .filter(|value| !value.is_empty() && !value.contains('/'))?;
                    path.push_str(value);
                }
            }
        }
        Some(path)
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Split an absolute path into segments, ignoring one trailing slash.
///
/// Only `/` itself has no segments; `//` is a single empty segment.
fn split_segments(path: &str) -> impl Iterator<Item = &str> {
    let rest = path.strip_prefix('/').unwrap_or(path);
    let root = rest.is_empty();
    let rest = rest.strip_suffix('/').unwrap_or(rest);
    rest.split('/').filter(move |_| !root)
}
