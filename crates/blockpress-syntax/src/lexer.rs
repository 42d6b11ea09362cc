//! # Lexer - Tokenizing HTML Fragments
//!
//! Breaks an HTML fragment into a flat sequence of tags and text runs using
//! the [Logos] lexer generator.
//!
//! [Logos]: https://docs.rs/logos
//!
//! ## The Lossless Guarantee
//!
//! Every byte of the input appears in exactly one token. Nothing is skipped,
//! so the tree builder can always fall back to treating a token as text:
//!
//! ```
//! use blockpress_syntax::lexer::lex;
//!
//! let input = "<p class=\"x\">Hello <b>world</b></p>";
//! let tokens = lex(input);
//!
//! let reconstructed: String = tokens.iter().map(|t| t.text).collect();
//! assert_eq!(input, reconstructed);
//! ```
//!
//! ## Token Design
//!
//! Tokens are context-free. The lexer does not know whether `<li>` implicitly
//! closes a previous `<li>`, or whether a tag is void - that belongs to the
//! tree builder. A `<` that does not begin a well-formed tag is lexed as
//! [`TokenKind::Lt`] and later treated as text, which is how hand-written
//! fragments like `a < b` survive.

use logos::{Lexer, Logos};

/// Token kinds produced by the Logos lexer.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"")]
pub enum TokenKind {
    /// `<!-- ... -->`, unterminated comments run to the end of input
    #[token("<!--", lex_comment)]
    Comment,

    /// `<!DOCTYPE ...>` and other declarations
    #[regex(r"<![^\->][^>]*>")]
    Declaration,

    /// `<name attr="value" ...>` including self-closing `/>`
    #[regex(r#"<[a-zA-Z][a-zA-Z0-9:\-]*([^>"']|"[^"]*"|'[^']*')*>"#)]
    StartTag,

    /// `</name>`
    #[regex(r"</[a-zA-Z][a-zA-Z0-9:\-]*[^>]*>")]
    EndTag,

    /// A `<` that does not open a tag
    #[token("<")]
    Lt,

    /// Character data between tags
    #[regex(r"[^<]+")]
    Text,
}

fn lex_comment(lex: &mut Lexer<TokenKind>) -> bool {
    let rest = lex.remainder();
    match rest.find("-->") {
        Some(end) => lex.bump(end + 3),
        None => lex.bump(rest.len()),
    }
    true
}

/// A lexed token with its kind and text slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
}

/// Lex the input into a sequence of tokens.
///
/// Guarantees that all bytes from the input appear in the output tokens.
pub fn lex(input: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(input);

    while let Some(result) = lexer.next() {
        let text = lexer.slice();
        // Unrecognised input is character data
        let kind = result.unwrap_or(TokenKind::Text);
        tokens.push(Token { kind, text });
    }

    tokens
}
