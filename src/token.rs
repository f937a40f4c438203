use bimap::BiMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Illegal,
    Eof,
    // Identifiers and literals
    Ident,
    Int,
    String,
    // Operators
    Assign,
    Plus,
    Minus,
    Bang,
    Asterisk,
    Slash,
    Percent,
    LessThan,
    GreaterThan,
    Equal,
    NotEqual,
    // Delimiters
    Comma,
    Semicolon,
    Colon,
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    // Keywords
    Let,
    Function,
    Macro,
    If,
    Else,
    Return,
    True,
    False,
}

lazy_static! {
    static ref KEYWORDS: BiMap<&'static str, TokenKind> = {
        let mut m = BiMap::new();
        m.insert("let", TokenKind::Let);
        m.insert("function", TokenKind::Function);
        m.insert("macro", TokenKind::Macro);
        m.insert("if", TokenKind::If);
        m.insert("else", TokenKind::Else);
        m.insert("return", TokenKind::Return);
        m.insert("true", TokenKind::True);
        m.insert("false", TokenKind::False);
        m
    };
}

/// Keyword kind for `word`, or `Ident` if it isn't reserved.
pub fn lookup_ident(word: &str) -> TokenKind {
    KEYWORDS
        .get_by_left(&word)
        .copied()
        .unwrap_or(TokenKind::Ident)
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use TokenKind::*;
        if let Some(word) = KEYWORDS.get_by_right(self) {
            return write!(f, "{}", word);
        }
        let text = match self {
            Illegal => "ILLEGAL",
            Eof => "EOF",
            Ident => "IDENT",
            Int => "INT",
            String => "STRING",
            Assign => "=",
            Plus => "+",
            Minus => "-",
            Bang => "!",
            Asterisk => "*",
            Slash => "/",
            Percent => "%",
            LessThan => "<",
            GreaterThan => ">",
            Equal => "==",
            NotEqual => "!=",
            Comma => ",",
            Semicolon => ";",
            Colon => ":",
            LeftParen => "(",
            RightParen => ")",
            LeftBrace => "{",
            RightBrace => "}",
            LeftBracket => "[",
            RightBracket => "]",
            Let | Function | Macro | If | Else | Return | True | False => {
                unreachable!("keywords are rendered from the keyword table")
            }
        };
        write!(f, "{}", text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: String,
}

impl Token {
    pub fn new(kind: TokenKind, literal: impl Into<String>) -> Self {
        Self {
            kind,
            literal: literal.into(),
        }
    }

    pub fn eof() -> Self {
        Self::new(TokenKind::Eof, "")
    }
}
