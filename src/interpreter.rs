use crate::ast::{Program, Statement};
use crate::environment::Environment;
use crate::{evaluator, macro_expansion, parser, Object};
use itertools::Itertools;
use std::fmt;
use std::rc::Rc;

pub type Result<T = Object> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    Parse(Vec<String>),
    Expand(evaluator::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Parse(messages) => write!(
                f,
                "parser errors:\n{}",
                messages.iter().map(|m| format!("\t{}", m)).join("\n")
            ),
            Error::Expand(e) => write!(f, "ERROR: {}", e),
        }
    }
}

/// Parses a whole program. Any parse error discards the tree.
pub fn parse(input: &str) -> Result<Program> {
    let (program, errors) = parser::parse(input);
    match errors.is_empty() {
        true => Ok(program),
        false => Err(Error::Parse(errors)),
    }
}

pub fn eval(program: &Program, env: &Rc<Environment>) -> Object {
    evaluator::eval_program(program, env)
}

pub fn define_macros(program: &mut Program, macro_env: &Rc<Environment>) {
    macro_expansion::define_macros(program, macro_env)
}

pub fn expand_macros(program: Program, macro_env: &Rc<Environment>) -> Result<Program> {
    macro_expansion::expand_macros(program, macro_env).map_err(Error::Expand)
}

/// Runs one REPL submission through every stage. Yields `None` when there is
/// nothing worth echoing: the submission ended in a successful `let` or
/// contained only macro definitions.
pub fn rep(
    input: &str,
    env: &Rc<Environment>,
    macro_env: &Rc<Environment>,
) -> Result<Option<Object>> {
    let mut program = parse(input)?;
    define_macros(&mut program, macro_env);
    let expanded = expand_macros(program, macro_env)?;
    let value = eval(&expanded, env);
    let silent = matches!(expanded.last(), None | Some(Statement::Let(_)));
    match value {
        Object::Error(_) => Ok(Some(value)),
        _ if silent => Ok(None),
        _ => Ok(Some(value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> (Rc<Environment>, Rc<Environment>) {
        (Environment::new(), Environment::new())
    }

    fn echo(input: &str, env: &Rc<Environment>, macro_env: &Rc<Environment>) -> Option<String> {
        rep(input, env, macro_env).unwrap().map(|value| value.to_string())
    }

    #[test]
    fn parse_reports_every_error() {
        match parse("let = 1; let x 2;") {
            Err(Error::Parse(messages)) => assert!(messages.len() >= 2),
            other => panic!("expected parse errors, got {:?}", other),
        }
        let err = parse("(1").unwrap_err();
        assert_eq!(
            err.to_string(),
            "parser errors:\n\texpected next token to be ), got EOF instead"
        );
    }

    #[test]
    fn bindings_persist_across_submissions() {
        let (env, macro_env) = session();
        assert_eq!(echo("let x = 5;", &env, &macro_env), None);
        assert_eq!(echo("x * 2", &env, &macro_env), Some("10".into()));
        assert_eq!(
            echo("let x = 1 + true;", &env, &macro_env),
            Some("ERROR: type mismatch: INTEGER + BOOLEAN".into())
        );
    }

    #[test]
    fn macros_persist_across_submissions() {
        let (env, macro_env) = session();
        assert_eq!(
            echo(
                "let twice = macro(x) { quote(unquote(x) + unquote(x)) };",
                &env,
                &macro_env
            ),
            None
        );
        assert_eq!(echo("twice(21)", &env, &macro_env), Some("42".into()));
        assert!(env.get("twice").is_none());
    }

    #[test]
    fn expansion_errors_skip_evaluation() {
        let (env, macro_env) = session();
        echo("let bad = macro() { 1 };", &env, &macro_env);
        let err = rep("let y = 1; bad()", &env, &macro_env).unwrap_err();
        assert_eq!(
            err.to_string(),
            "ERROR: macro must return a quoted AST node, got INTEGER"
        );
        assert!(env.get("y").is_none());
    }

    #[test]
    fn file_mode_evaluates_without_macros() {
        let program = parse("let m = macro() { quote(1) }; 2").unwrap();
        let result = eval(&program, &Environment::new());
        assert_eq!(
            result,
            Object::Error("macro literals are only allowed in top-level let statements".into())
        );
    }
}
