use crate::ast::{
    BlockStatement, CallExpression, Expression, FunctionLiteral, Identifier, IfExpression,
    IndexExpression, InfixExpression, InfixOperator, LetStatement, MacroLiteral,
    PrefixExpression, PrefixOperator, Program, Statement,
};
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Lowest,
    Equals,
    LessGreater,
    Sum,
    Product,
    Prefix,
    Call,
    Index,
}

fn precedence_of(kind: TokenKind) -> Precedence {
    use TokenKind::*;
    match kind {
        Equal | NotEqual => Precedence::Equals,
        LessThan | GreaterThan => Precedence::LessGreater,
        Plus | Minus => Precedence::Sum,
        Asterisk | Slash | Percent => Precedence::Product,
        LeftParen => Precedence::Call,
        LeftBracket => Precedence::Index,
        _ => Precedence::Lowest,
    }
}

fn infix_operator(kind: TokenKind) -> Option<InfixOperator> {
    use TokenKind::*;
    let op = match kind {
        Plus => InfixOperator::Plus,
        Minus => InfixOperator::Minus,
        Asterisk => InfixOperator::Asterisk,
        Slash => InfixOperator::Slash,
        Percent => InfixOperator::Percent,
        LessThan => InfixOperator::LessThan,
        GreaterThan => InfixOperator::GreaterThan,
        Equal => InfixOperator::Equal,
        NotEqual => InfixOperator::NotEqual,
        _ => return None,
    };
    Some(op)
}

type PrefixParseFn<'a> = fn(&mut Parser<'a>) -> Option<Expression>;
type InfixParseFn<'a> = fn(&mut Parser<'a>, Expression) -> Option<Expression>;

fn prefix_rule<'a>(kind: TokenKind) -> Option<PrefixParseFn<'a>> {
    use TokenKind::*;
    let rule: PrefixParseFn<'a> = match kind {
        Ident => Parser::parse_identifier,
        Int => Parser::parse_integer_literal,
        String => Parser::parse_string_literal,
        True | False => Parser::parse_boolean,
        Bang | Minus => Parser::parse_prefix_expression,
        LeftParen => Parser::parse_grouped_expression,
        LeftBracket => Parser::parse_array_literal,
        LeftBrace => Parser::parse_map_literal,
        If => Parser::parse_if_expression,
        Function => Parser::parse_function_literal,
        Macro => Parser::parse_macro_literal,
        _ => return None,
    };
    Some(rule)
}

fn infix_rule<'a>(kind: TokenKind) -> Option<InfixParseFn<'a>> {
    use TokenKind::*;
    let rule: InfixParseFn<'a> = match kind {
        LeftParen => Parser::parse_call_expression,
        LeftBracket => Parser::parse_index_expression,
        k if infix_operator(k).is_some() => Parser::parse_infix_expression,
        _ => return None,
    };
    Some(rule)
}

/// Pratt parser. Errors are collected rather than returned so that one pass
/// can report several of them; check `into_errors()` before using the program.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    peek: Token,
    errors: Vec<String>,
}

impl<'a> Parser<'a> {
    pub fn new(mut lexer: Lexer<'a>) -> Self {
        let current = lexer.next_token();
        let peek = lexer.next_token();
        Self {
            lexer,
            current,
            peek,
            errors: Vec::new(),
        }
    }

    pub fn into_errors(self) -> Vec<String> {
        self.errors
    }

    fn next_token(&mut self) {
        let next = self.lexer.next_token();
        self.current = std::mem::replace(&mut self.peek, next);
    }

    fn current_is(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    fn peek_is(&self, kind: TokenKind) -> bool {
        self.peek.kind == kind
    }

    fn error(&mut self, message: String) {
        log::debug!("parse error: {}", message);
        self.errors.push(message);
    }

    fn expect_peek(&mut self, kind: TokenKind) -> bool {
        if self.peek_is(kind) {
            self.next_token();
            true
        } else {
            self.error(format!(
                "expected next token to be {}, got {} instead",
                kind, self.peek.kind
            ));
            false
        }
    }

    fn peek_precedence(&self) -> Precedence {
        precedence_of(self.peek.kind)
    }

    fn current_precedence(&self) -> Precedence {
        precedence_of(self.current.kind)
    }

    pub fn parse_program(&mut self) -> Program {
        let mut program = Program::default();
        while !self.current_is(TokenKind::Eof) {
            if let Some(statement) = self.parse_statement() {
                program.push(statement);
            }
            self.next_token();
        }
        program
    }

    fn parse_statement(&mut self) -> Option<Statement> {
        match self.current.kind {
            TokenKind::Let => self.parse_let_statement(),
            TokenKind::Return => self.parse_return_statement(),
            _ => self.parse_expression_statement(),
        }
    }

    fn skip_semicolon(&mut self) {
        if self.peek_is(TokenKind::Semicolon) {
            self.next_token();
        }
    }

    fn parse_let_statement(&mut self) -> Option<Statement> {
        if !self.expect_peek(TokenKind::Ident) {
            return None;
        }
        let name = Identifier(self.current.literal.clone());
        if !self.expect_peek(TokenKind::Assign) {
            return None;
        }
        self.next_token();

        let mut value = self.parse_expression(Precedence::Lowest)?;
        if let Expression::Function(function) = &mut value {
            function.name = Some(name.0.clone());
        }
        self.skip_semicolon();
        Some(Statement::Let(LetStatement { name, value }))
    }

    fn parse_return_statement(&mut self) -> Option<Statement> {
        self.next_token();
        let value = self.parse_expression(Precedence::Lowest)?;
        self.skip_semicolon();
        Some(Statement::Return(value))
    }

    fn parse_expression_statement(&mut self) -> Option<Statement> {
        let expression = self.parse_expression(Precedence::Lowest)?;
        self.skip_semicolon();
        Some(Statement::Expression(expression))
    }

    fn parse_expression(&mut self, precedence: Precedence) -> Option<Expression> {
        let prefix = match prefix_rule(self.current.kind) {
            Some(rule) => rule,
            None => {
                let message = match self.current.kind {
                    TokenKind::Illegal => format!("illegal token {}", self.current.literal),
                    kind => format!("no prefix parse function for {} found", kind),
                };
                self.error(message);
                return None;
            }
        };
        let mut left = prefix(self)?;

        while !self.peek_is(TokenKind::Semicolon) && precedence < self.peek_precedence() {
            let infix = match infix_rule(self.peek.kind) {
                Some(rule) => rule,
                None => return Some(left),
            };
            self.next_token();
            left = infix(self, left)?;
        }
        Some(left)
    }

    fn parse_identifier(&mut self) -> Option<Expression> {
        Some(Expression::Identifier(Identifier(self.current.literal.clone())))
    }

    fn parse_integer_literal(&mut self) -> Option<Expression> {
        match self.current.literal.parse::<i64>() {
            Ok(value) => Some(Expression::Integer(value)),
            Err(_) => {
                let message = format!("could not parse {} as integer", self.current.literal);
                self.error(message);
                None
            }
        }
    }

    fn parse_string_literal(&mut self) -> Option<Expression> {
        Some(Expression::String(self.current.literal.clone()))
    }

    fn parse_boolean(&mut self) -> Option<Expression> {
        Some(Expression::Boolean(self.current_is(TokenKind::True)))
    }

    fn parse_prefix_expression(&mut self) -> Option<Expression> {
        let operator = match self.current.kind {
            TokenKind::Bang => PrefixOperator::Bang,
            _ => PrefixOperator::Minus,
        };
        self.next_token();
        let right = self.parse_expression(Precedence::Prefix)?;
        Some(Expression::Prefix(PrefixExpression {
            operator,
            right: Box::new(right),
        }))
    }

    fn parse_infix_expression(&mut self, left: Expression) -> Option<Expression> {
        let operator = infix_operator(self.current.kind)?;
        let precedence = self.current_precedence();
        self.next_token();
        let right = self.parse_expression(precedence)?;
        Some(Expression::Infix(InfixExpression {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }))
    }

    fn parse_grouped_expression(&mut self) -> Option<Expression> {
        self.next_token();
        let expression = self.parse_expression(Precedence::Lowest)?;
        match self.expect_peek(TokenKind::RightParen) {
            true => Some(expression),
            false => None,
        }
    }

    fn parse_if_expression(&mut self) -> Option<Expression> {
        if !self.expect_peek(TokenKind::LeftParen) {
            return None;
        }
        self.next_token();
        let condition = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenKind::RightParen) || !self.expect_peek(TokenKind::LeftBrace) {
            return None;
        }
        let consequence = self.parse_block_statement()?;

        let alternative = if self.peek_is(TokenKind::Else) {
            self.next_token();
            if !self.expect_peek(TokenKind::LeftBrace) {
                return None;
            }
            Some(self.parse_block_statement()?)
        } else {
            None
        };

        Some(Expression::If(IfExpression {
            condition: Box::new(condition),
            consequence,
            alternative,
        }))
    }

    /// Expects the current token to be `{` and leaves it on the matching `}`.
    fn parse_block_statement(&mut self) -> Option<BlockStatement> {
        let mut block = BlockStatement::default();
        self.next_token();
        while !self.current_is(TokenKind::RightBrace) {
            if self.current_is(TokenKind::Eof) {
                self.error(format!(
                    "expected {} to close block, got {} instead",
                    TokenKind::RightBrace,
                    TokenKind::Eof
                ));
                return None;
            }
            if let Some(statement) = self.parse_statement() {
                block.push(statement);
            }
            self.next_token();
        }
        Some(block)
    }

    fn parse_function_parameters(&mut self) -> Option<Vec<Identifier>> {
        let mut parameters = Vec::new();
        if self.peek_is(TokenKind::RightParen) {
            self.next_token();
            return Some(parameters);
        }

        if !self.expect_peek(TokenKind::Ident) {
            return None;
        }
        parameters.push(Identifier(self.current.literal.clone()));
        while self.peek_is(TokenKind::Comma) {
            self.next_token();
            if !self.expect_peek(TokenKind::Ident) {
                return None;
            }
            parameters.push(Identifier(self.current.literal.clone()));
        }

        match self.expect_peek(TokenKind::RightParen) {
            true => Some(parameters),
            false => None,
        }
    }

    /// Shared by `function` and `macro` literals.
    fn parse_parameters_and_body(&mut self) -> Option<(Vec<Identifier>, BlockStatement)> {
        if !self.expect_peek(TokenKind::LeftParen) {
            return None;
        }
        let parameters = self.parse_function_parameters()?;
        if !self.expect_peek(TokenKind::LeftBrace) {
            return None;
        }
        let body = self.parse_block_statement()?;
        Some((parameters, body))
    }

    fn parse_function_literal(&mut self) -> Option<Expression> {
        let (parameters, body) = self.parse_parameters_and_body()?;
        Some(Expression::Function(FunctionLiteral {
            parameters,
            body,
            name: None,
        }))
    }

    fn parse_macro_literal(&mut self) -> Option<Expression> {
        let (parameters, body) = self.parse_parameters_and_body()?;
        Some(Expression::Macro(MacroLiteral { parameters, body }))
    }

    fn parse_expression_list(&mut self, end: TokenKind) -> Option<Vec<Expression>> {
        let mut list = Vec::new();
        if self.peek_is(end) {
            self.next_token();
            return Some(list);
        }

        self.next_token();
        list.push(self.parse_expression(Precedence::Lowest)?);
        while self.peek_is(TokenKind::Comma) {
            self.next_token();
            self.next_token();
            list.push(self.parse_expression(Precedence::Lowest)?);
        }

        match self.expect_peek(end) {
            true => Some(list),
            false => None,
        }
    }

    fn parse_array_literal(&mut self) -> Option<Expression> {
        let elements = self.parse_expression_list(TokenKind::RightBracket)?;
        Some(Expression::Array(elements))
    }

    fn parse_map_literal(&mut self) -> Option<Expression> {
        let mut pairs = Vec::new();
        while !self.peek_is(TokenKind::RightBrace) {
            self.next_token();
            let key = self.parse_expression(Precedence::Lowest)?;
            if !self.expect_peek(TokenKind::Colon) {
                return None;
            }
            self.next_token();
            let value = self.parse_expression(Precedence::Lowest)?;
            pairs.push((key, value));

            if !self.peek_is(TokenKind::RightBrace) && !self.expect_peek(TokenKind::Comma) {
                return None;
            }
        }
        self.next_token();
        Some(Expression::Map(pairs))
    }

    fn parse_call_expression(&mut self, function: Expression) -> Option<Expression> {
        let arguments = self.parse_expression_list(TokenKind::RightParen)?;
        Some(Expression::Call(CallExpression {
            function: Box::new(function),
            arguments,
        }))
    }

    fn parse_index_expression(&mut self, left: Expression) -> Option<Expression> {
        self.next_token();
        let index = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenKind::RightBracket) {
            return None;
        }
        Some(Expression::Index(IndexExpression {
            left: Box::new(left),
            index: Box::new(index),
        }))
    }
}

/// Parses `input` in one go, returning the program together with any errors.
pub fn parse(input: &str) -> (Program, Vec<String>) {
    let mut parser = Parser::new(Lexer::new(input));
    let program = parser.parse_program();
    (program, parser.into_errors())
}
