//! Token definitions
//!
//! [`Lexeme`] is what logos recognizes. [`TokenKind`] is what the parser sees: comments are
//! gone, literals are collapsed into one kind, and words are split into identifiers and
//! keywords. Contextual keywords (`record`, `var`, `yield`, `sealed`, `permits`) stay
//! identifiers; the parser decides from context.

use logos::{Lexer, Logos};

/// Whether a delimited lexeme found its closing delimiter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Closure {
    Closed,
    Unclosed,
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"([ \t\r\n\f]+|//[^\n]*)")]
pub(crate) enum Lexeme {
    #[token("/*", block_comment)]
    BlockComment(Closure),

    #[token("\"\"\"", text_block)]
    TextBlock(Closure),

    #[regex(r#""([^"\\\n]|\\.)*""#)]
    String,

    #[regex(r#""([^"\\\n]|\\.)*"#)]
    UnterminatedString,

    #[regex(r"'([^'\\\n]|\\.)*'")]
    Char,

    #[regex(r"'([^'\\\n]|\\.)*")]
    UnterminatedChar,

    #[regex(r"[0-9][0-9_]*(\.[0-9_]*)?([eE][+-]?[0-9]+)?[lLfFdD]?")]
    #[regex(r"\.[0-9][0-9_]*([eE][+-]?[0-9]+)?[fFdD]?")]
    #[regex(r"0[xX][0-9a-fA-F_]+[lL]?")]
    #[regex(r"0[bB][01_]+[lL]?")]
    Number,

    #[regex(r"[a-zA-Z_$\x{80}-\x{10FFFF}][a-zA-Z0-9_$\x{80}-\x{10FFFF}]*")]
    Word,

    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(";")]
    Semi,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("...")]
    Ellipsis,
    #[token("@")]
    At,
    #[token("=")]
    Assign,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("?")]
    Question,
    #[token(":")]
    Colon,
    #[token("::")]
    ColonColon,
    #[token("->")]
    Arrow,

    // Shift operators are left as runs of `<`/`>` so nested type arguments close cleanly
    #[regex(r"==|!=|<=|>=|&&|\|\||\+\+|--|<<=|[+\-*/%&|^!~]=?")]
    Operator,
}

fn block_comment(lex: &mut Lexer<Lexeme>) -> Closure {
    consume_until(lex, "*/")
}

fn text_block(lex: &mut Lexer<Lexeme>) -> Closure {
    consume_until(lex, "\"\"\"")
}

fn consume_until(lex: &mut Lexer<Lexeme>, terminator: &str) -> Closure {
    match lex.remainder().find(terminator) {
        Some(idx) => {
            lex.bump(idx + terminator.len());
            Closure::Closed
        }
        None => {
            lex.bump(lex.remainder().len());
            Closure::Unclosed
        }
    }
}

/// Token kinds consumed by the parser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Ident,
    Keyword(Keyword),
    Literal,
    LBrace,
    RBrace,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Semi,
    Comma,
    Dot,
    Ellipsis,
    At,
    Assign,
    Lt,
    Gt,
    Question,
    Colon,
    ColonColon,
    Arrow,
    Operator,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: std::ops::Range<usize>,
}

/// Reserved words of the language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Abstract,
    Assert,
    Boolean,
    Break,
    Byte,
    Case,
    Catch,
    Char,
    Class,
    Const,
    Continue,
    Default,
    Do,
    Double,
    Else,
    Enum,
    Extends,
    Final,
    Finally,
    Float,
    For,
    Goto,
    If,
    Implements,
    Import,
    Instanceof,
    Int,
    Interface,
    Long,
    Native,
    New,
    Package,
    Private,
    Protected,
    Public,
    Return,
    Short,
    Static,
    Strictfp,
    Super,
    Switch,
    Synchronized,
    This,
    Throw,
    Throws,
    Transient,
    Try,
    Void,
    Volatile,
    While,
}

impl Keyword {
    pub fn from_word(word: &str) -> Option<Self> {
        let keyword = match word {
            "abstract" => Keyword::Abstract,
            "assert" => Keyword::Assert,
            "boolean" => Keyword::Boolean,
            "break" => Keyword::Break,
            "byte" => Keyword::Byte,
            "case" => Keyword::Case,
            "catch" => Keyword::Catch,
            "char" => Keyword::Char,
            "class" => Keyword::Class,
            "const" => Keyword::Const,
            "continue" => Keyword::Continue,
            "default" => Keyword::Default,
            "do" => Keyword::Do,
            "double" => Keyword::Double,
            "else" => Keyword::Else,
            "enum" => Keyword::Enum,
            "extends" => Keyword::Extends,
            "final" => Keyword::Final,
            "finally" => Keyword::Finally,
            "float" => Keyword::Float,
            "for" => Keyword::For,
            "goto" => Keyword::Goto,
            "if" => Keyword::If,
            "implements" => Keyword::Implements,
            "import" => Keyword::Import,
            "instanceof" => Keyword::Instanceof,
            "int" => Keyword::Int,
            "interface" => Keyword::Interface,
            "long" => Keyword::Long,
            "native" => Keyword::Native,
            "new" => Keyword::New,
            "package" => Keyword::Package,
            "private" => Keyword::Private,
            "protected" => Keyword::Protected,
            "public" => Keyword::Public,
            "return" => Keyword::Return,
            "short" => Keyword::Short,
            "static" => Keyword::Static,
            "strictfp" => Keyword::Strictfp,
            "super" => Keyword::Super,
            "switch" => Keyword::Switch,
            "synchronized" => Keyword::Synchronized,
            "this" => Keyword::This,
            "throw" => Keyword::Throw,
            "throws" => Keyword::Throws,
            "transient" => Keyword::Transient,
            "try" => Keyword::Try,
            "void" => Keyword::Void,
            "volatile" => Keyword::Volatile,
            "while" => Keyword::While,
            _ => return None,
        };
        Some(keyword)
    }

    pub fn is_primitive(self) -> bool {
        matches!(
            self,
            Keyword::Boolean
                | Keyword::Byte
                | Keyword::Char
                | Keyword::Short
                | Keyword::Int
                | Keyword::Long
                | Keyword::Float
                | Keyword::Double
        )
    }

    /// Keywords that may precede a declaration as modifiers. `default` only counts inside
    /// interface bodies; callers check that it is not a switch label first.
    pub fn is_modifier(self) -> bool {
        matches!(
            self,
            Keyword::Public
                | Keyword::Protected
                | Keyword::Private
                | Keyword::Static
                | Keyword::Final
                | Keyword::Abstract
                | Keyword::Native
                | Keyword::Synchronized
                | Keyword::Transient
                | Keyword::Volatile
                | Keyword::Strictfp
                | Keyword::Default
        )
    }
}

/// Words that read as literals rather than identifiers
pub(crate) fn is_literal_word(word: &str) -> bool {
    matches!(word, "true" | "false" | "null")
}
