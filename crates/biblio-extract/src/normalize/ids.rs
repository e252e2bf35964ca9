//! Short identifiers from URL-like ids

use crate::error::{ExtractError, Result};

/// Final path segment of an identifier URL.
///
/// `https://openalex.org/W2741809807` -> `W2741809807`. The identifier must
/// contain a `/` and end in a non-empty, ASCII-alphanumeric segment;
/// anything else is a data-shape error.
pub fn short_id<'a>(kind: &str, url: &'a str) -> Result<&'a str> {
    let malformed = || ExtractError::data_shape(format!("malformed {} id '{}'", kind, url));

    let (prefix, segment) = url.rsplit_once('/').ok_or_else(malformed)?;

    if prefix.is_empty()
        || segment.is_empty()
        || !segment.bytes().all(|b| b.is_ascii_alphanumeric())
    {
        return Err(malformed());
    }

    Ok(segment)
}
