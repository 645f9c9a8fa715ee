//! Title normalization.
//!
//! Lowercases, turns every run of non-alphanumeric characters into one
//! space, and trims. The result never contains two consecutive spaces,
//! which the flat table format relies on.

/// Normalize raw title text.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;
    for ch in text.chars() {
        if ch.is_alphanumeric() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.extend(ch.to_lowercase());
        } else {
            pending_space = true;
        }
    }
    out
}
