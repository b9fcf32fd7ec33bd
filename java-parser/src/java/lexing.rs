//! Tokenization of Java source
//!
//!     Raw tokenization is handled entirely by logos (see [tokens]). This module turns the raw
//!     lexemes into parser tokens and records lexical problems: characters that start no token,
//!     and strings, character literals, text blocks or comments that run off the end of their
//!     line or of the file.
//!
//!     Comments never reach the parser. Unterminated literals still do, as literals, so the
//!     parser's view of the structure around them stays intact.

pub mod tokens;

use crate::java::ast::{Problem, Span};
use logos::Logos;
pub use tokens::{Closure, Keyword, Token, TokenKind};
use tokens::{is_literal_word, Lexeme};

/// Output of tokenization: parser tokens plus lexical problems, both in source order
#[derive(Debug, Default)]
pub struct Lexed {
    pub tokens: Vec<Token>,
    pub problems: Vec<Problem>,
}

/// Tokenize source code with location information
pub fn tokenize(source: &str) -> Lexed {
    let mut lexer = Lexeme::lexer(source);
    let mut lexed = Lexed::default();
    let mut invalid: Option<Span> = None;

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let lexeme = match result {
            Ok(lexeme) => lexeme,
            Err(()) => {
                // Runs of unrecognized characters are reported once
                invalid = Some(match invalid.take() {
                    Some(previous) if previous.end == span.start => previous.start..span.end,
                    Some(previous) => {
                        lexed.problems.push(invalid_characters(source, previous));
                        span
                    }
                    None => span,
                });
                continue;
            }
        };
        if let Some(previous) = invalid.take() {
            lexed.problems.push(invalid_characters(source, previous));
        }

        let kind = match lexeme {
            Lexeme::BlockComment(Closure::Closed) => continue,
            Lexeme::BlockComment(Closure::Unclosed) => {
                lexed
                    .problems
                    .push(Problem::error("Unexpected end of comment", span));
                continue;
            }
            Lexeme::TextBlock(closure) => {
                if closure == Closure::Unclosed {
                    lexed.problems.push(Problem::error(
                        "Text block is not properly closed with the delimiter",
                        span.clone(),
                    ));
                }
                TokenKind::Literal
            }
            Lexeme::String | Lexeme::Char | Lexeme::Number => TokenKind::Literal,
            Lexeme::UnterminatedString => {
                lexed.problems.push(Problem::error(
                    "String literal is not properly closed by a double-quote",
                    span.clone(),
                ));
                TokenKind::Literal
            }
            Lexeme::UnterminatedChar => {
                lexed
                    .problems
                    .push(Problem::error("Invalid character constant", span.clone()));
                TokenKind::Literal
            }
            Lexeme::Word => {
                let word = lexer.slice();
                if is_literal_word(word) {
                    TokenKind::Literal
                } else {
                    Keyword::from_word(word)
                        .map(TokenKind::Keyword)
                        .unwrap_or(TokenKind::Ident)
                }
            }
            Lexeme::LBrace => TokenKind::LBrace,
            Lexeme::RBrace => TokenKind::RBrace,
            Lexeme::LParen => TokenKind::LParen,
            Lexeme::RParen => TokenKind::RParen,
            Lexeme::LBracket => TokenKind::LBracket,
            Lexeme::RBracket => TokenKind::RBracket,
            Lexeme::Semi => TokenKind::Semi,
            Lexeme::Comma => TokenKind::Comma,
            Lexeme::Dot => TokenKind::Dot,
            Lexeme::Ellipsis => TokenKind::Ellipsis,
            Lexeme::At => TokenKind::At,
            Lexeme::Assign => TokenKind::Assign,
            Lexeme::Lt => TokenKind::Lt,
            Lexeme::Gt => TokenKind::Gt,
            Lexeme::Question => TokenKind::Question,
            Lexeme::Colon => TokenKind::Colon,
            Lexeme::ColonColon => TokenKind::ColonColon,
            Lexeme::Arrow => TokenKind::Arrow,
            Lexeme::Operator => TokenKind::Operator,
        };
        lexed.tokens.push(Token { kind, span });
    }

    if let Some(previous) = invalid {
        lexed.problems.push(invalid_characters(source, previous));
    }
    lexed
}

fn invalid_characters(source: &str, span: Span) -> Problem {
    let message = format!(
        "Syntax error on token \"{}\", delete this token",
        source.get(span.clone()).unwrap_or_default()
    );
    Problem::error(message, span)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source)
            .tokens
            .into_iter()
            .map(|token| token.kind)
            .collect()
    }

    #[test]
    fn empty_input_has_no_tokens() {
        let lexed = tokenize("");
        assert!(lexed.tokens.is_empty());
        assert!(lexed.problems.is_empty());
    }

    #[test]
    fn splits_keywords_from_identifiers() {
        assert_eq!(
            kinds("class Foo extends record"),
            vec![
                TokenKind::Keyword(Keyword::Class),
                TokenKind::Ident,
                TokenKind::Keyword(Keyword::Extends),
                TokenKind::Ident,
            ]
        );
    }

    #[test]
    fn keeps_token_spans() {
        let lexed = tokenize("int  count;");
        let spans: Vec<_> = lexed.tokens.iter().map(|token| token.span.clone()).collect();
        assert_eq!(spans, vec![0..3, 5..10, 10..11]);
    }

    #[test]
    fn comments_are_dropped() {
        assert_eq!(
            kinds("a // line\n/* block */ b /** doc */"),
            vec![TokenKind::Ident, TokenKind::Ident]
        );
    }

    #[test]
    fn nested_type_arguments_close_with_separate_tokens() {
        assert_eq!(
            kinds("Map<K, List<V>>"),
            vec![
                TokenKind::Ident,
                TokenKind::Lt,
                TokenKind::Ident,
                TokenKind::Comma,
                TokenKind::Ident,
                TokenKind::Lt,
                TokenKind::Ident,
                TokenKind::Gt,
                TokenKind::Gt,
            ]
        );
    }

    #[rstest]
    #[case("\"text\"")]
    #[case("'c'")]
    #[case("'\\n'")]
    #[case("42")]
    #[case("3.14f")]
    #[case("0xFFL")]
    #[case("1_000")]
    #[case("true")]
    #[case("null")]
    #[case("\"\"\"\n  block\n  \"\"\"")]
    fn literals_collapse_to_one_kind(#[case] source: &str) {
        let lexed = tokenize(source);
        assert_eq!(
            lexed.tokens.iter().map(|t| t.kind).collect::<Vec<_>>(),
            vec![TokenKind::Literal],
            "{source}"
        );
        assert!(lexed.problems.is_empty(), "{source}");
    }

    #[rstest]
    #[case("\"open", "String literal is not properly closed by a double-quote")]
    #[case("'x", "Invalid character constant")]
    #[case("/* never closed", "Unexpected end of comment")]
    #[case("\"\"\" text", "Text block is not properly closed with the delimiter")]
    #[case("a # b", "Syntax error on token \"#\", delete this token")]
    fn reports_lexical_problems(#[case] source: &str, #[case] message: &str) {
        let lexed = tokenize(source);
        assert_eq!(lexed.problems.len(), 1, "{source}");
        assert_eq!(lexed.problems[0].message, message);
        assert!(lexed.problems[0].is_error());
    }

    #[test]
    fn adjacent_invalid_characters_are_reported_once() {
        let lexed = tokenize("int ## x;");
        assert_eq!(lexed.problems.len(), 1);
        assert_eq!(lexed.problems[0].span, 4..6);
    }

    #[test]
    fn unicode_identifiers_are_identifiers() {
        assert_eq!(kinds("größe"), vec![TokenKind::Ident]);
    }
}
