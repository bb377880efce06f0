//! The token stream consumed by the matchers.

use std::collections::VecDeque;

use once_cell::sync::Lazy;
use regex::Regex;

use super::tokenizer::split_combined;
use crate::diagnostics::{to_error_source, SourceArc, Span};

static NEGATIVE_INTEGER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-\d+$").unwrap());

/// Whether `token` looks like an option: a leading dash, except a bare negative integer.
pub fn is_option_like(token: &str) -> bool {
    token.starts_with('-') && !NEGATIVE_INTEGER.is_match(token)
}

/// Where a token came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenOrigin {
    /// Index into the caller's argument list.
    Argument { position: usize },
    /// A default value spliced in for an under-supplied optional slot.
    Default { slot: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub span: Span,
    pub origin: TokenOrigin,
}

impl Token {
    pub fn is_synthetic(&self) -> bool {
        matches!(self.origin, TokenOrigin::Default { .. })
    }
}

/// Remaining tokens of one parse, front first.
#[derive(Debug, Clone)]
pub struct TokenStream {
    tokens: VecDeque<Token>,
    source: SourceArc,
    end: Span,
}

impl TokenStream {
    /// Builds the stream from raw arguments, splitting glued short options.
    pub fn new<S: AsRef<str>>(raw: &[S]) -> Self {
        let line = raw.iter().map(AsRef::as_ref).collect::<Vec<&str>>().join(" ");
        let mut tokens = VecDeque::with_capacity(raw.len());
        let mut offset = 0;
        for (position, token) in raw.iter().enumerate() {
            let token = token.as_ref();
            let origin = TokenOrigin::Argument { position };
            match split_combined(token) {
                Some((flag, rest)) => {
                    let cut = offset + flag.len();
                    tokens.push_back(Token {
                        text: flag.to_string(),
                        span: Span::new(offset, cut),
                        origin: origin.clone(),
                    });
                    tokens.push_back(Token {
                        text: rest.to_string(),
                        span: Span::new(cut, offset + token.len()),
                        origin,
                    });
                }
                None => tokens.push_back(Token {
                    text: token.to_string(),
                    span: Span::new(offset, offset + token.len()),
                    origin,
                }),
            }
            offset += token.len() + 1;
        }
        Self {
            tokens,
            source: to_error_source(&line),
            end: Span::new(line.len(), line.len()),
        }
    }

    pub fn peek(&self) -> Option<&Token> {
        self.tokens.front()
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn next(&mut self) -> Option<Token> {
        self.tokens.pop_front()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Splices a default value in front of the stream.
    pub fn inject_default(&mut self, slot: &str, text: &str) {
        let span = self.current_span();
        self.tokens.push_front(Token {
            text: text.to_string(),
            span,
            origin: TokenOrigin::Default {
                slot: slot.to_string(),
            },
        });
    }

    /// Length of the leading run of tokens that are not option-like.
    pub fn leading_run(&self) -> usize {
        self.tokens
            .iter()
            .take_while(|t| !is_option_like(&t.text))
            .count()
    }

    /// The command line the tokens were taken from.
    pub fn source(&self) -> &SourceArc {
        &self.source
    }

    /// Span of the next token, or the end of the line once exhausted.
    pub fn current_span(&self) -> Span {
        self.peek().map(|t| t.span).unwrap_or(self.end)
    }

    /// Span of the token at `index`, or the end of the line.
    pub fn span_at(&self, index: usize) -> Span {
        self.get(index).map(|t| t.span).unwrap_or(self.end)
    }

    pub fn end_span(&self) -> Span {
        self.end
    }
}
