//! Lazy tokenizer over a single version segment
//!
//! Splits `rc12+git` into `rc`, `12`, `+`, `git`. Every token is non-empty,
//! so a walk over two tokenizers always terminates.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Digits,
    Letters,
    Other,
}

impl TokenKind {
    fn of(c: char) -> Self {
        if c.is_ascii_digit() {
            TokenKind::Digits
        } else if c.is_ascii_alphabetic() {
            TokenKind::Letters
        } else {
            TokenKind::Other
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
}

#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    rest: &'a str,
}

impl<'a> Tokens<'a> {
    pub fn new(segment: &'a str) -> Self {
        Self { rest: segment }
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let kind = TokenKind::of(self.rest.chars().next()?);
        let end = self
            .rest
            .char_indices()
            .find(|&(_, c)| TokenKind::of(c) != kind)
            .map_or(self.rest.len(), |(i, _)| i);

        let (text, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(Token { kind, text })
    }
}
