//! Segment classification and pattern splitting

use crate::{Error, Result};

/// Name given to a bare `*` catch-all
pub const DEFAULT_CATCH_ALL: &str = "catch";

/// One `/`-delimited token of a route pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Literal text, matched by equality (may be empty for a trailing slash)
    Static(&'a str),
    /// `:name`, matches exactly one non-empty segment
    Param(&'a str),
    /// `*name` or `*`, matches the non-empty remainder of the path
    CatchAll(&'a str),
}

impl<'a> Segment<'a> {
    /// Classify a single pattern segment by its first character
    ///
    /// # Example
    /// ```
    /// use alien_router::Segment;
    ///
    /// assert_eq!(Segment::classify("users").unwrap(), Segment::Static("users"));
    /// assert_eq!(Segment::classify(":id").unwrap(), Segment::Param("id"));
    /// assert_eq!(Segment::classify("*").unwrap(), Segment::CatchAll("catch"));
    /// assert!(Segment::classify(":").is_err());
    /// ```
    pub fn classify(segment: &'a str) -> Result<Self> {
        classify_in(segment, segment)
    }

    /// Capture name for param and catch-all segments
    pub fn name(&self) -> Option<&'a str> {
        match *self {
            Segment::Static(_) => None,
            Segment::Param(name) | Segment::CatchAll(name) => Some(name),
        }
    }
}

fn classify_in<'a>(segment: &'a str, pattern: &str) -> Result<Segment<'a>> {
    let malformed = || Error::MalformedParam {
        pattern: pattern.to_string(),
        segment: segment.to_string(),
    };

    if let Some(name) = segment.strip_prefix(':') {
        if name.is_empty() || name.contains([':', '*']) {
            return Err(malformed());
        }
        Ok(Segment::Param(name))
    } else if let Some(name) = segment.strip_prefix('*') {
        if name.contains([':', '*']) {
            return Err(malformed());
        }
        Ok(Segment::CatchAll(if name.is_empty() {
            DEFAULT_CATCH_ALL
        } else {
            name
        }))
    } else {
        Ok(Segment::Static(segment))
    }
}

/// Split and validate a full pattern
///
/// The leading `/` is dropped. An empty segment is only allowed in last
/// position, which keeps `/users/` and `/users` distinct.
pub fn parse_pattern(pattern: &str) -> Result<Vec<Segment<'_>>> {
    let rest = pattern
        .strip_prefix('/')
        .ok_or_else(|| Error::MissingLeadingSlash(pattern.to_string()))?;

    let raw: Vec<&str> = rest.split('/').collect();
    let last = raw.len() - 1;
    let mut segments = Vec::with_capacity(raw.len());

    for (i, text) in raw.into_iter().enumerate() {
        if text.is_empty() && i != last {
            return Err(Error::EmptyPathSegment(pattern.to_string()));
        }
        let segment = classify_in(text, pattern)?;
        if matches!(segment, Segment::CatchAll(_)) && i != last {
            return Err(Error::CatchAllNotTerminal(pattern.to_string()));
        }
        segments.push(segment);
    }

    Ok(segments)
}

/// Split a request path into segments, `None` if it is not `/`-rooted
pub(crate) fn split_path(path: &str) -> Option<Vec<&str>> {
    path.strip_prefix('/').map(|rest| rest.split('/').collect())
}
