//! Token-level view of the command line.
//!
//! The [`tokenizer`] splits glued short options (`-n5`) and the [`stream`] hands tokens to
//! the matchers, remembering where every token came from so errors can point at it.

pub mod stream;
pub mod tokenizer;

pub use stream::{is_option_like, Token, TokenOrigin, TokenStream};
pub use tokenizer::split_combined;
