//! Timestamp formatting in the viewer's timezone.

use chrono::{DateTime, Utc};

use crate::policy::Viewer;

/// Formats a timestamp like `Mon, Jan 5, 3:04 PM` in the viewer's timezone.
#[must_use]
pub fn format_datetime(at: DateTime<Utc>, viewer: &Viewer) -> String {
    at.with_timezone(&viewer.timezone)
        .format("%a, %b %-d, %-I:%M %p")
        .to_string()
}
