use derive_more::{Deref, DerefMut};
use itertools::Itertools;
use std::fmt;

#[derive(Deref, DerefMut, Debug, Clone, PartialEq, Default)]
pub struct Program(pub Vec<Statement>);

#[derive(Deref, DerefMut, Debug, Clone, PartialEq, Default)]
pub struct BlockStatement(pub Vec<Statement>);

#[derive(Deref, Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier(pub String);

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Let(LetStatement),
    Return(Expression),
    Expression(Expression),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LetStatement {
    pub name: Identifier,
    pub value: Expression,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixOperator {
    Bang,
    Minus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfixOperator {
    Plus,
    Minus,
    Asterisk,
    Slash,
    Percent,
    LessThan,
    GreaterThan,
    Equal,
    NotEqual,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Identifier(Identifier),
    Integer(i64),
    Boolean(bool),
    String(String),
    Array(Vec<Expression>),
    /// Pairs in source order.
    Map(Vec<(Expression, Expression)>),
    Prefix(PrefixExpression),
    Infix(InfixExpression),
    If(IfExpression),
    Function(FunctionLiteral),
    Macro(MacroLiteral),
    Call(CallExpression),
    Index(IndexExpression),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrefixExpression {
    pub operator: PrefixOperator,
    pub right: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InfixExpression {
    pub operator: InfixOperator,
    pub left: Box<Expression>,
    pub right: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfExpression {
    pub condition: Box<Expression>,
    pub consequence: BlockStatement,
    pub alternative: Option<BlockStatement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionLiteral {
    pub parameters: Vec<Identifier>,
    pub body: BlockStatement,
    /// Set when the literal is bound directly by a `let`.
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MacroLiteral {
    pub parameters: Vec<Identifier>,
    pub body: BlockStatement,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallExpression {
    pub function: Box<Expression>,
    pub arguments: Vec<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexExpression {
    pub left: Box<Expression>,
    pub index: Box<Expression>,
}

impl Expression {
    pub fn identifier(name: &str) -> Self {
        Self::Identifier(Identifier(name.into()))
    }

    /// The callee's name, if this is a call to a plain identifier.
    pub fn call_target(&self) -> Option<&str> {
        match self {
            Expression::Call(call) => match call.function.as_ref() {
                Expression::Identifier(name) => Some(name.as_ref()),
                _ => None,
            },
            _ => None,
        }
    }
}

// Display impls reconstruct source text that parses back to the same tree.

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.iter().join("\n"))
    }
}

impl fmt::Display for BlockStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.is_empty() {
            true => write!(f, "{{ }}"),
            false => write!(f, "{{ {} }}", self.iter().join(" ")),
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Let(s) => write!(f, "let {} = {};", s.name, s.value),
            Statement::Return(value) => write!(f, "return {};", value),
            Statement::Expression(e) => write!(f, "{};", e),
        }
    }
}

impl fmt::Display for PrefixOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrefixOperator::Bang => write!(f, "!"),
            PrefixOperator::Minus => write!(f, "-"),
        }
    }
}

impl fmt::Display for InfixOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use InfixOperator::*;
        let symbol = match self {
            Plus => "+",
            Minus => "-",
            Asterisk => "*",
            Slash => "/",
            Percent => "%",
            LessThan => "<",
            GreaterThan => ">",
            Equal => "==",
            NotEqual => "!=",
        };
        write!(f, "{}", symbol)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Identifier(name) => write!(f, "{}", name),
            // The literal 9223372036854775808 does not fit, so the minimum is
            // written as arithmetic that reparses to the same value.
            Expression::Integer(value) if *value == i64::MIN => {
                write!(f, "(-{} - 1)", i64::MAX)
            }
            Expression::Integer(value) => write!(f, "{}", value),
            Expression::Boolean(value) => write!(f, "{}", value),
            Expression::String(value) => write!(f, "\"{}\"", value),
            Expression::Array(elements) => write!(f, "[{}]", elements.iter().join(", ")),
            Expression::Map(pairs) => write!(
                f,
                "{{{}}}",
                pairs
                    .iter()
                    .map(|(key, value)| format!("{}: {}", key, value))
                    .join(", ")
            ),
            Expression::Prefix(e) => write!(f, "({}{})", e.operator, e.right),
            Expression::Infix(e) => write!(f, "({} {} {})", e.left, e.operator, e.right),
            Expression::If(e) => {
                write!(f, "if ({}) {}", e.condition, e.consequence)?;
                if let Some(alternative) = &e.alternative {
                    write!(f, " else {}", alternative)?;
                }
                Ok(())
            }
            Expression::Function(e) => {
                write!(f, "function({}) {}", e.parameters.iter().join(", "), e.body)
            }
            Expression::Macro(e) => {
                write!(f, "macro({}) {}", e.parameters.iter().join(", "), e.body)
            }
            Expression::Call(e) => write!(f, "{}({})", e.function, e.arguments.iter().join(", ")),
            Expression::Index(e) => write!(f, "({}[{}])", e.left, e.index),
        }
    }
}

/// A rewrite applied to every node reachable from a root. Children are
/// rewritten before their parent sees them.
pub trait Modifier {
    type Error;

    fn modify_expression(&mut self, expression: Expression) -> Result<Expression, Self::Error>;
}

impl<F, E> Modifier for F
where
    F: FnMut(Expression) -> Result<Expression, E>,
{
    type Error = E;

    fn modify_expression(&mut self, expression: Expression) -> Result<Expression, E> {
        self(expression)
    }
}

pub fn modify_program<M: Modifier + ?Sized>(
    program: Program,
    modifier: &mut M,
) -> Result<Program, M::Error> {
    let statements: Result<Vec<_>, _> = program
        .0
        .into_iter()
        .map(|s| modify_statement(s, modifier))
        .collect();
    Ok(Program(statements?))
}

pub fn modify_block<M: Modifier + ?Sized>(
    block: BlockStatement,
    modifier: &mut M,
) -> Result<BlockStatement, M::Error> {
    let statements: Result<Vec<_>, _> = block
        .0
        .into_iter()
        .map(|s| modify_statement(s, modifier))
        .collect();
    Ok(BlockStatement(statements?))
}

pub fn modify_statement<M: Modifier + ?Sized>(
    statement: Statement,
    modifier: &mut M,
) -> Result<Statement, M::Error> {
    Ok(match statement {
        Statement::Let(LetStatement { name, value }) => Statement::Let(LetStatement {
            name,
            value: modify_expression(value, modifier)?,
        }),
        Statement::Return(value) => Statement::Return(modify_expression(value, modifier)?),
        Statement::Expression(e) => Statement::Expression(modify_expression(e, modifier)?),
    })
}

fn modify_boxed<M: Modifier + ?Sized>(
    expression: Box<Expression>,
    modifier: &mut M,
) -> Result<Box<Expression>, M::Error> {
    modify_expression(*expression, modifier).map(Box::new)
}

pub fn modify_expression<M: Modifier + ?Sized>(
    expression: Expression,
    modifier: &mut M,
) -> Result<Expression, M::Error> {
    use Expression as E;
    let expression = match expression {
        E::Identifier(_) | E::Integer(_) | E::Boolean(_) | E::String(_) => expression,
        E::Array(elements) => E::Array(
            elements
                .into_iter()
                .map(|e| modify_expression(e, modifier))
                .collect::<Result<_, _>>()?,
        ),
        E::Map(pairs) => E::Map(pairs
            .into_iter()
            .map(|(key, value)| -> Result<_, M::Error> {
                Ok((
                    modify_expression(key, modifier)?,
                    modify_expression(value, modifier)?,
                ))
            })
            .collect::<Result<_, _>>()?),
        E::Prefix(e) => E::Prefix(PrefixExpression {
            operator: e.operator,
            right: modify_boxed(e.right, modifier)?,
        }),
        E::Infix(e) => E::Infix(InfixExpression {
            operator: e.operator,
            left: modify_boxed(e.left, modifier)?,
            right: modify_boxed(e.right, modifier)?,
        }),
        E::If(e) => E::If(IfExpression {
            condition: modify_boxed(e.condition, modifier)?,
            consequence: modify_block(e.consequence, modifier)?,
            alternative: e
                .alternative
                .map(|block| modify_block(block, modifier))
                .transpose()?,
        }),
        E::Function(e) => E::Function(FunctionLiteral {
            parameters: e.parameters,
            body: modify_block(e.body, modifier)?,
            name: e.name,
        }),
        E::Macro(e) => E::Macro(MacroLiteral {
            parameters: e.parameters,
            body: modify_block(e.body, modifier)?,
        }),
        E::Call(e) => E::Call(CallExpression {
            function: modify_boxed(e.function, modifier)?,
            arguments: e
                .arguments
                .into_iter()
                .map(|a| modify_expression(a, modifier))
                .collect::<Result<_, _>>()?,
        }),
        E::Index(e) => E::Index(IndexExpression {
            left: modify_boxed(e.left, modifier)?,
            index: modify_boxed(e.index, modifier)?,
        }),
    };
    modifier.modify_expression(expression)
}
