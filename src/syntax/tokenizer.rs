//! Splitting of combined short options.
//!
//! A token made of a single dash, one letter, then one or more alphanumerics (`-n5`,
//! `-abc`) is split into the two-character option and the remainder. All other tokens
//! are left alone. [`TokenStream`](super::TokenStream) applies this to every command line token.

use once_cell::sync::Lazy;
use regex::Regex;

static COMBINED_SHORT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-[A-Za-z][A-Za-z0-9]+$").unwrap());

/// Splits `token` if it is a glued short option, returning the option and its remainder.
pub fn split_combined(token: &str) -> Option<(&str, &str)> {
    if COMBINED_SHORT.is_match(token) {
        // The pattern guarantees two ASCII bytes before the remainder.
        Some(token.split_at(2))
    } else {
        None
    }
}
