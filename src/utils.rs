use jiff::Timestamp;

/// Format a server timestamp for display (e.g. "03/01/2024 at 14:05").
pub fn format_timestamp(ts: Timestamp) -> String {
    ts.strftime("%d/%m/%Y at %H:%M").to_string()
}

/// Whether a user-supplied field is empty after trimming.
pub fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}
