//! Tree-free parameter extraction
//!
//! Aligns a concrete path against one pattern, segment by segment, using the
//! same rules as [`Tree::find`](crate::Tree::find). For any pair the tree
//! accepts, the result equals the tree's captures.

use crate::segment::{parse_pattern, split_path, Segment};
use crate::{Error, Params, Result};

/// Extract the captures `pattern` produces for `path`
///
/// # Example
/// ```
/// use alien_router::extract_params;
///
/// let params = extract_params("/let/the/bullet/fly", "/let/the/:which/:what").unwrap();
/// assert_eq!(params.to_string(), "which:bullet,what:fly");
/// ```
pub fn extract_params(path: &str, pattern: &str) -> Result<Params> {
    let segments = parse_pattern(pattern)?;
    let mismatch = || Error::Mismatch {
        path: path.to_string(),
        pattern: pattern.to_string(),
    };
    let parts = split_path(path).ok_or_else(mismatch)?;

    let mut params = Params::new();
    for (i, segment) in segments.iter().enumerate() {
        match *segment {
            Segment::Static(text) => {
                if parts.get(i) != Some(&text) {
                    return Err(mismatch());
                }
            }
            Segment::Param(name) => match parts.get(i) {
                Some(value) if !value.is_empty() => params.push(name, *value),
                _ => return Err(mismatch()),
            },
            Segment::CatchAll(name) => {
                let remainder = parts.get(i..).map(|rest| rest.join("/")).unwrap_or_default();
                if remainder.is_empty() {
                    return Err(mismatch());
                }
                params.push(name, remainder);
                return Ok(params);
            }
        }
    }

    if parts.len() != segments.len() {
        return Err(mismatch());
    }
    Ok(params)
}
