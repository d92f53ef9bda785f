use chrono::{DateTime, Utc};
use url::Url;

use crate::errors::ValidationError;

const URL_SCHEMES: [&str; 4] = ["http", "https", "ftp", "ftps"];

/// A record stored in a named collection.
///
/// Repositories call [`Document::prepare`] on a working copy right before
/// every write, then [`Document::validate`]. Nothing is written when either
/// the validation or the store rejects the prepared copy.
pub trait Document: Clone {
    const COLLECTION: &'static str;

    fn id(&self) -> Option<i64>;

    /// Pre-save hook: refresh derived fields for a write happening at `now`
    fn prepare(&mut self, now: DateTime<Utc>);

    fn validate(&self) -> Result<(), ValidationError>;
}

pub(crate) fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(())
}

/// Lengths are counted in characters, not bytes.
pub(crate) fn check_max_chars(
    field: &'static str,
    value: Option<&str>,
    max: usize,
) -> Result<(), ValidationError> {
    if let Some(value) = value {
        let actual = value.chars().count();
        if actual > max {
            return Err(ValidationError::TooLong { field, max, actual });
        }
    }
    Ok(())
}

pub(crate) fn check_url(field: &'static str, value: &str) -> Result<(), ValidationError> {
    let invalid = || ValidationError::InvalidUrl {
        field,
        value: value.to_string(),
    };

    // Checked as stored, whitespace included
    if value.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    let parsed = Url::parse(value).map_err(|_| invalid())?;
    if !URL_SCHEMES.contains(&parsed.scheme()) {
        return Err(invalid());
    }
    match parsed.host_str() {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err(invalid()),
    }
}
