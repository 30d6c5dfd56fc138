//! Minimal CSV field quoting for the report files.

use std::borrow::Cow;

/// Quotes `value` when it contains a separator, a quote or a line break.
#[must_use]
pub fn escape_field(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}
