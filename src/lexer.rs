use crate::token::{lookup_ident, Token, TokenKind};

/// Turns source text into tokens one at a time. Once the input is exhausted
/// every call to `next_token` returns an EOF token.
pub struct Lexer<'a> {
    input: &'a str,
    position: usize,
    read_position: usize,
    ch: Option<char>,
}

fn is_letter(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        let mut lexer = Self {
            input,
            position: 0,
            read_position: 0,
            ch: None,
        };
        lexer.read_char();
        lexer
    }

    fn read_char(&mut self) {
        self.position = self.read_position;
        self.ch = self.input[self.read_position..].chars().next();
        if let Some(c) = self.ch {
            self.read_position += c.len_utf8();
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.read_position..].chars().next()
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.ch {
            if !c.is_whitespace() {
                break;
            }
            self.read_char();
        }
    }

    fn read_while(&mut self, accept: impl Fn(char) -> bool) -> &'a str {
        let start = self.position;
        while let Some(c) = self.ch {
            if !accept(c) {
                break;
            }
            self.read_char();
        }
        &self.input[start..self.position]
    }

    /// Returns `None` if the closing quote is missing.
    fn read_string(&mut self) -> Option<&'a str> {
        // Skip the opening quote.
        self.read_char();
        let start = self.position;
        loop {
            match self.ch {
                Some('"') => break,
                Some(_) => self.read_char(),
                None => return None,
            }
        }
        let contents = &self.input[start..self.position];
        self.read_char();
        Some(contents)
    }

    fn either(&mut self, second: char, double: TokenKind, single: TokenKind) -> Token {
        let first = self.ch.unwrap_or_default();
        if self.peek_char() == Some(second) {
            self.read_char();
            self.read_char();
            Token::new(double, format!("{}{}", first, second))
        } else {
            self.read_char();
            Token::new(single, first.to_string())
        }
    }

    pub fn next_token(&mut self) -> Token {
        use TokenKind::*;
        self.skip_whitespace();
        let c = match self.ch {
            None => return Token::eof(),
            Some(c) => c,
        };

        let kind = match c {
            '=' => return self.either('=', Equal, Assign),
            '!' => return self.either('=', NotEqual, Bang),
            '"' => {
                let start = self.position;
                return match self.read_string() {
                    Some(contents) => Token::new(String, contents),
                    None => Token::new(Illegal, &self.input[start..]),
                };
            }
            c if is_letter(c) => {
                let word = self.read_while(|c| is_letter(c) || c.is_ascii_digit());
                return Token::new(lookup_ident(word), word);
            }
            c if c.is_ascii_digit() => {
                let digits = self.read_while(|c| c.is_ascii_digit());
                return Token::new(Int, digits);
            }
            '+' => Plus,
            '-' => Minus,
            '*' => Asterisk,
            '/' => Slash,
            '%' => Percent,
            '<' => LessThan,
            '>' => GreaterThan,
            ',' => Comma,
            ';' => Semicolon,
            ':' => Colon,
            '(' => LeftParen,
            ')' => RightParen,
            '{' => LeftBrace,
            '}' => RightBrace,
            '[' => LeftBracket,
            ']' => RightBracket,
            _ => Illegal,
        };
        self.read_char();
        Token::new(kind, c.to_string())
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    /// Yields tokens up to but not including EOF.
    fn next(&mut self) -> Option<Token> {
        let token = self.next_token();
        match token.kind {
            TokenKind::Eof => None,
            _ => Some(token),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use TokenKind::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        Lexer::new(input).map(|t| t.kind).collect()
    }

    #[test]
    fn lexes_a_small_program() {
        let input = r#"let five = 5;
let add = function(x, y) {
  x + y;
};
let result = add(five, 10);
!-/*5%2;
5 < 10 > 5;
if (5 < 10) { return true; } else { return false; }
10 == 10; 10 != 9;
"foobar" "foo bar"
[1, 2];
{"foo": "bar"}
macro(x, y) { x + y; };
"#;
        let expected = vec![
            (Let, "let"),
            (Ident, "five"),
            (Assign, "="),
            (Int, "5"),
            (Semicolon, ";"),
            (Let, "let"),
            (Ident, "add"),
            (Assign, "="),
            (Function, "function"),
            (LeftParen, "("),
            (Ident, "x"),
            (Comma, ","),
            (Ident, "y"),
            (RightParen, ")"),
            (LeftBrace, "{"),
            (Ident, "x"),
            (Plus, "+"),
            (Ident, "y"),
            (Semicolon, ";"),
            (RightBrace, "}"),
            (Semicolon, ";"),
            (Let, "let"),
            (Ident, "result"),
            (Assign, "="),
            (Ident, "add"),
            (LeftParen, "("),
            (Ident, "five"),
            (Comma, ","),
            (Int, "10"),
            (RightParen, ")"),
            (Semicolon, ";"),
            (Bang, "!"),
            (Minus, "-"),
            (Slash, "/"),
            (Asterisk, "*"),
            (Int, "5"),
            (Percent, "%"),
            (Int, "2"),
            (Semicolon, ";"),
            (Int, "5"),
            (LessThan, "<"),
            (Int, "10"),
            (GreaterThan, ">"),
            (Int, "5"),
            (Semicolon, ";"),
            (If, "if"),
            (LeftParen, "("),
            (Int, "5"),
            (LessThan, "<"),
            (Int, "10"),
            (RightParen, ")"),
            (LeftBrace, "{"),
            (Return, "return"),
            (True, "true"),
            (Semicolon, ";"),
            (RightBrace, "}"),
            (Else, "else"),
            (LeftBrace, "{"),
            (Return, "return"),
            (False, "false"),
            (Semicolon, ";"),
            (RightBrace, "}"),
            (Int, "10"),
            (Equal, "=="),
            (Int, "10"),
            (Semicolon, ";"),
            (Int, "10"),
            (NotEqual, "!="),
            (Int, "9"),
            (Semicolon, ";"),
            (String, "foobar"),
            (String, "foo bar"),
            (LeftBracket, "["),
            (Int, "1"),
            (Comma, ","),
            (Int, "2"),
            (RightBracket, "]"),
            (Semicolon, ";"),
            (LeftBrace, "{"),
            (String, "foo"),
            (Colon, ":"),
            (String, "bar"),
            (RightBrace, "}"),
            (Macro, "macro"),
            (LeftParen, "("),
            (Ident, "x"),
            (Comma, ","),
            (Ident, "y"),
            (RightParen, ")"),
            (LeftBrace, "{"),
            (Ident, "x"),
            (Plus, "+"),
            (Ident, "y"),
            (Semicolon, ";"),
            (RightBrace, "}"),
            (Semicolon, ";"),
        ];

        let mut lexer = Lexer::new(input);
        for (i, (kind, literal)) in expected.into_iter().enumerate() {
            let token = lexer.next_token();
            assert_eq!(token.kind, kind, "token {} has the wrong kind", i);
            assert_eq!(token.literal, literal, "token {} has the wrong literal", i);
        }
        assert_eq!(lexer.next_token().kind, Eof);
    }

    #[test]
    fn eof_repeats_forever() {
        let mut lexer = Lexer::new("x");
        assert_eq!(lexer.next_token().kind, Ident);
        for _ in 0..3 {
            assert_eq!(lexer.next_token(), Token::eof());
        }
    }

    #[test]
    fn unterminated_string_is_illegal() {
        let mut lexer = Lexer::new(r#"let s = "abc"#);
        assert_eq!(kinds(r#"let s = "abc"#), vec![Let, Ident, Assign, Illegal]);
        for _ in 0..3 {
            lexer.next_token();
        }
        assert_eq!(lexer.next_token().literal, "\"abc");
    }

    #[test]
    fn unknown_characters_are_illegal() {
        let tokens: Vec<Token> = Lexer::new("a @ b").collect();
        assert_eq!(tokens[1], Token::new(Illegal, "@"));
        assert_eq!(tokens[2], Token::new(Ident, "b"));
    }

    #[test]
    fn strings_are_copied_raw() {
        let tokens: Vec<Token> = Lexer::new(r#""a\nb" "héllo""#).collect();
        assert_eq!(tokens[0].literal, r"a\nb");
        assert_eq!(tokens[1].literal, "héllo");
    }

    #[test]
    fn identifiers_may_contain_digits_and_underscores() {
        let tokens: Vec<Token> = Lexer::new("snake_case2 3x").collect();
        assert_eq!(tokens[0], Token::new(Ident, "snake_case2"));
        assert_eq!(tokens[1], Token::new(Int, "3"));
        assert_eq!(tokens[2], Token::new(Ident, "x"));
    }
}
