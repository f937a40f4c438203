use crate::ast::{
    BlockStatement, Expression, FunctionLiteral, IfExpression, InfixOperator, PrefixOperator,
    Program, Statement,
};
use crate::builtins::BUILTINS;
use crate::environment::{Environment, UnknownIdentifier};
use crate::macro_expansion;
use crate::types::{
    truthy, BadArgCount, Builtin, Function, HashPair, Int, Object, ObjectType,
};
use itertools::Itertools;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

pub type Result<T = Object, E = Unwind> = std::result::Result<T, E>;

#[derive(Debug)]
pub enum Error {
    UnknownIdentifier(UnknownIdentifier),
    TypeMismatch(ObjectType, InfixOperator, ObjectType),
    UnknownPrefixOperator(PrefixOperator, ObjectType),
    UnknownInfixOperator(ObjectType, InfixOperator, ObjectType),
    DivisionByZero,
    NotAFunction(ObjectType),
    UnusableAsHashKey(ObjectType),
    IndexNotSupported(ObjectType),
    BadArgCount(BadArgCount),
    UnsupportedArgument {
        name: &'static str,
        got: ObjectType,
    },
    MismatchedArgument {
        name: &'static str,
        expected: ObjectType,
        got: ObjectType,
    },
    EmptyArray(&'static str),
    UnsortableElements {
        name: &'static str,
        got: ObjectType,
    },
    MixedElements {
        name: &'static str,
        first: ObjectType,
        other: ObjectType,
    },
    InvalidInteger(String),
    MacroOutsideDefinition,
    MacroResultNotQuote(ObjectType),
    IOError(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnknownIdentifier(UnknownIdentifier(name)) => {
                write!(f, "identifier not found: {}", name)
            }
            Error::TypeMismatch(left, op, right) => {
                write!(f, "type mismatch: {} {} {}", left, op, right)
            }
            Error::UnknownPrefixOperator(op, right) => write!(f, "unknown operator: {}{}", op, right),
            Error::UnknownInfixOperator(left, op, right) => {
                write!(f, "unknown operator: {} {} {}", left, op, right)
            }
            Error::DivisionByZero => write!(f, "division by zero"),
            Error::NotAFunction(t) => write!(f, "not a function: {}", t),
            Error::UnusableAsHashKey(t) => write!(f, "unusable as hash key: {}", t),
            Error::IndexNotSupported(t) => write!(f, "index operator not supported: {}", t),
            Error::BadArgCount(e) => write!(f, "{}", e),
            Error::UnsupportedArgument { name, got } => {
                write!(f, "argument to `{}` not supported, got {}", name, got)
            }
            Error::MismatchedArgument {
                name,
                expected,
                got,
            } => write!(
                f,
                "arguments to `{}` must all be {}, got {}",
                name, expected, got
            ),
            Error::EmptyArray(name) => write!(f, "index out of range: `{}` of empty ARRAY", name),
            Error::UnsortableElements { name, got } => {
                write!(f, "cannot `{}` elements of type {}", name, got)
            }
            Error::MixedElements { name, first, other } => write!(
                f,
                "cannot `{}` an array mixing {} and {}",
                name, first, other
            ),
            Error::InvalidInteger(text) => write!(f, "could not parse {:?} as integer", text),
            Error::MacroOutsideDefinition => write!(
                f,
                "macro literals are only allowed in top-level let statements"
            ),
            Error::MacroResultNotQuote(t) => {
                write!(f, "macro must return a quoted AST node, got {}", t)
            }
            Error::IOError(e) => write!(f, "io error: {}", e),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::IOError(e)
    }
}

/// Why evaluation stopped early. `Return` is unwrapped at the nearest call
/// boundary, `Error` only by the top-level caller.
#[derive(Debug)]
pub enum Unwind {
    Return(Object),
    Error(Error),
}

impl From<Error> for Unwind {
    fn from(e: Error) -> Self {
        Unwind::Error(e)
    }
}

/// Collapses an evaluation outcome into a value, treating a pending `return`
/// as the result.
pub(crate) fn settle(result: Result) -> Result<Object, Error> {
    match result {
        Ok(value) | Err(Unwind::Return(value)) => Ok(value),
        Err(Unwind::Error(e)) => Err(e),
    }
}

/// Evaluates a whole program. Errors come back as `Object::Error`.
pub fn eval_program(program: &Program, env: &Rc<Environment>) -> Object {
    match settle(eval_statements(program, env)) {
        Ok(value) => value,
        Err(e) => {
            log::debug!("evaluation failed: {}", e);
            Object::Error(e.to_string())
        }
    }
}

fn eval_statements(statements: &[Statement], env: &Rc<Environment>) -> Result {
    let mut result = Object::Null;
    for statement in statements {
        result = eval_statement(statement, env)?;
    }
    Ok(result)
}

/// Evaluates `block` directly in `env`, without opening a new scope.
pub(crate) fn eval_block(block: &BlockStatement, env: &Rc<Environment>) -> Result {
    eval_statements(block, env)
}

fn eval_scoped_block(block: &BlockStatement, env: &Rc<Environment>) -> Result {
    eval_block(block, &Environment::spawn_from(env))
}

fn eval_statement(statement: &Statement, env: &Rc<Environment>) -> Result {
    match statement {
        Statement::Let(s) => {
            let value = eval_expression(&s.value, env)?;
            log::debug!("let {} = {}", s.name, value);
            env.set(s.name.0.clone(), value);
            Ok(Object::Null)
        }
        Statement::Return(e) => Err(Unwind::Return(eval_expression(e, env)?)),
        Statement::Expression(e) => eval_expression(e, env),
    }
}

pub(crate) fn eval_expression(expression: &Expression, env: &Rc<Environment>) -> Result {
    log::trace!("eval {}", expression);
    match expression {
        Expression::Identifier(name) => eval_identifier(name.as_ref(), env),
        Expression::Integer(value) => Ok(Object::Integer(*value)),
        Expression::Boolean(value) => Ok(Object::Boolean(*value)),
        Expression::String(value) => Ok(Object::String(value.clone())),
        Expression::Array(elements) => {
            eval_expressions(elements, env).map(Object::wrap_array)
        }
        Expression::Map(pairs) => eval_map_literal(pairs, env),
        Expression::Prefix(e) => {
            let right = eval_expression(&e.right, env)?;
            Ok(eval_prefix(e.operator, right)?)
        }
        Expression::Infix(e) => {
            let left = eval_expression(&e.left, env)?;
            let right = eval_expression(&e.right, env)?;
            Ok(eval_infix(e.operator, left, right)?)
        }
        Expression::If(e) => eval_if(e, env),
        Expression::Function(f) => Ok(make_function(f, env)),
        Expression::Macro(_) => Err(Error::MacroOutsideDefinition.into()),
        Expression::Call(call) => {
            if expression.call_target() == Some("quote") {
                return macro_expansion::quote(&call.arguments, env);
            }
            let function = eval_expression(&call.function, env)?;
            let arguments = eval_expressions(&call.arguments, env)?;
            apply_function(&function, arguments)
        }
        Expression::Index(e) => {
            let left = eval_expression(&e.left, env)?;
            let index = eval_expression(&e.index, env)?;
            Ok(eval_index(left, index)?)
        }
    }
}

fn eval_expressions(expressions: &[Expression], env: &Rc<Environment>) -> Result<Vec<Object>> {
    expressions.iter().map(|e| eval_expression(e, env)).collect()
}

fn eval_identifier(name: &str, env: &Rc<Environment>) -> Result {
    match env.fetch(name) {
        Ok(value) => Ok(value),
        Err(unknown) => match BUILTINS.get(name) {
            Some(&builtin) => Ok(Object::Builtin(builtin)),
            None => Err(Error::UnknownIdentifier(unknown).into()),
        },
    }
}

fn eval_map_literal(pairs: &[(Expression, Expression)], env: &Rc<Environment>) -> Result {
    let mut evaluated = HashMap::new();
    for (key_node, value_node) in pairs {
        let key = eval_expression(key_node, env)?;
        let hash = key.as_hashkey()?;
        let value = eval_expression(value_node, env)?;
        evaluated.insert(hash, HashPair { key, value });
    }
    Ok(Object::wrap_map(evaluated))
}

fn eval_prefix(operator: PrefixOperator, right: Object) -> Result<Object, Error> {
    match (operator, right) {
        (PrefixOperator::Bang, right) => Ok(Object::Boolean(!truthy(&right))),
        (PrefixOperator::Minus, Object::Integer(value)) => Ok(Object::Integer(value.wrapping_neg())),
        (PrefixOperator::Minus, right) => Err(Error::UnknownPrefixOperator(
            operator,
            right.object_type(),
        )),
    }
}

/// `==` for values that aren't both integers or both strings: booleans and
/// null by value, containers and functions by identity.
fn identical(left: &Object, right: &Object) -> bool {
    use Object::*;
    match (left, right) {
        (Null, Null) => true,
        (Boolean(x), Boolean(y)) => x == y,
        (Array(x), Array(y)) => Rc::ptr_eq(x, y),
        (Map(x), Map(y)) => Rc::ptr_eq(x, y),
        (Function(x), Function(y)) => Rc::ptr_eq(x, y),
        (Macro(x), Macro(y)) => Rc::ptr_eq(x, y),
        (Quote(x), Quote(y)) => Rc::ptr_eq(x, y),
        (Builtin(x), Builtin(y)) => x.name == y.name,
        _ => false,
    }
}

fn eval_infix(operator: InfixOperator, left: Object, right: Object) -> Result<Object, Error> {
    match (&left, &right) {
        (Object::Integer(x), Object::Integer(y)) => eval_integer_infix(operator, *x, *y),
        (Object::String(x), Object::String(y)) => eval_string_infix(operator, x, y),
        _ => match operator {
            InfixOperator::Equal => Ok(Object::Boolean(identical(&left, &right))),
            InfixOperator::NotEqual => Ok(Object::Boolean(!identical(&left, &right))),
            _ if left.object_type() != right.object_type() => Err(Error::TypeMismatch(
                left.object_type(),
                operator,
                right.object_type(),
            )),
            _ => Err(Error::UnknownInfixOperator(
                left.object_type(),
                operator,
                right.object_type(),
            )),
        },
    }
}

fn eval_integer_infix(operator: InfixOperator, x: Int, y: Int) -> Result<Object, Error> {
    use InfixOperator::*;
    let value = match operator {
        Plus => Object::Integer(x.wrapping_add(y)),
        Minus => Object::Integer(x.wrapping_sub(y)),
        Asterisk => Object::Integer(x.wrapping_mul(y)),
        Slash | Percent if y == 0 => return Err(Error::DivisionByZero),
        Slash => Object::Integer(x.wrapping_div(y)),
        Percent => Object::Integer(x.wrapping_rem(y)),
        LessThan => Object::Boolean(x < y),
        GreaterThan => Object::Boolean(x > y),
        Equal => Object::Boolean(x == y),
        NotEqual => Object::Boolean(x != y),
    };
    Ok(value)
}

fn eval_string_infix(operator: InfixOperator, x: &str, y: &str) -> Result<Object, Error> {
    match operator {
        InfixOperator::Plus => Ok(Object::String(format!("{}{}", x, y))),
        InfixOperator::Equal => Ok(Object::Boolean(x == y)),
        InfixOperator::NotEqual => Ok(Object::Boolean(x != y)),
        _ => Err(Error::UnknownInfixOperator(
            ObjectType::String,
            operator,
            ObjectType::String,
        )),
    }
}

fn eval_if(e: &IfExpression, env: &Rc<Environment>) -> Result {
    let condition = eval_expression(&e.condition, env)?;
    if truthy(&condition) {
        eval_scoped_block(&e.consequence, env)
    } else if let Some(alternative) = &e.alternative {
        eval_scoped_block(alternative, env)
    } else {
        Ok(Object::Null)
    }
}

fn eval_index(left: Object, index: Object) -> Result<Object, Error> {
    match (&left, &index) {
        (Object::Array(elements), Object::Integer(i)) => {
            let elements = elements.borrow();
            let element = usize::try_from(*i).ok().and_then(|i| elements.get(i));
            Ok(element.cloned().unwrap_or(Object::Null))
        }
        (Object::Map(pairs), _) => {
            let key = index.as_hashkey()?;
            let pairs = pairs.borrow();
            Ok(pairs
                .get(&key)
                .map(|pair| pair.value.clone())
                .unwrap_or(Object::Null))
        }
        _ => Err(Error::IndexNotSupported(left.object_type())),
    }
}

fn make_function(literal: &FunctionLiteral, env: &Rc<Environment>) -> Object {
    Object::Function(Rc::new(Function {
        parameters: literal.parameters.clone(),
        body: literal.body.clone(),
        env: env.clone(),
        name: literal.name.clone(),
    }))
}

pub(crate) fn pretty_print_args(args: &[Object]) -> String {
    match args.len() {
        0 => "no args".into(),
        1 => args[0].to_string(),
        _ => format!("\n\t{}", args.iter().join("\n\t")),
    }
}

pub fn apply_function(callable: &Object, args: Vec<Object>) -> Result {
    match callable {
        Object::Function(f) => {
            let env = make_function_env(f, args)?;
            match eval_block(&f.body, &env) {
                Err(Unwind::Return(value)) => Ok(value),
                other => other,
            }
        }
        Object::Builtin(b) => Ok(call_builtin(b, &args)?),
        _ => Err(Error::NotAFunction(callable.object_type()).into()),
    }
}

pub fn call_builtin(func: &Builtin, args: &[Object]) -> Result<Object, Error> {
    func.arity
        .validate_for(args.len(), func.name)
        .map_err(Error::BadArgCount)?;
    log::trace!("Call {} with {}", func.name, pretty_print_args(args));
    let result = (func.fn_ptr)(args);
    match &result {
        Ok(val) => log::trace!("Call to {} resulted in {}", func.name, val),
        Err(e) => log::trace!("Call to {} failed: {}", func.name, e),
    }
    result
}

/// The call's scope hangs off the environment the function was defined in,
/// not the caller's.
fn make_function_env(func: &Function, args: Vec<Object>) -> Result<Rc<Environment>, Error> {
    log::trace!(
        "Call {} with {}",
        func.display_name(),
        pretty_print_args(&args)
    );
    func.arity()
        .validate_for(args.len(), func.display_name())
        .map_err(Error::BadArgCount)?;
    let env = Environment::spawn_from(&func.env);
    for (key, value) in func.parameters.iter().zip(args) {
        env.set(key.0.clone(), value);
    }
    log::trace!("{} runs in {}", func.display_name(), env);
    Ok(env)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn run(input: &str) -> Object {
        let (program, errors) = parse(input);
        assert!(errors.is_empty(), "parser errors for {:?}: {:?}", input, errors);
        eval_program(&program, &Environment::new())
    }

    fn assert_evaluates_to(input: &str, expected: &str) {
        assert_eq!(run(input).to_string(), expected, "input {:?}", input);
    }

    #[test]
    fn integer_arithmetic() {
        let cases = [
            ("5", 5),
            ("-10", -10),
            ("5 + 5 + 5 + 5 - 10", 10),
            ("2 * 2 * 2 * 2 * 2", 32),
            ("-50 + 100 + -50", 0),
            ("20 + 2 * -10", 0),
            ("50 / 2 * 2 + 10", 60),
            ("3 * (3 * 3) + 10", 37),
            ("(5 + 10 * 2 + 15 / 3) * 2 + -10", 50),
            ("7 / 2", 3),
            ("-7 / 2", -3),
            ("7 % 3", 1),
            ("9223372036854775807 + 1", i64::MIN),
        ];
        for (input, expected) in cases.iter() {
            assert_eq!(run(input), Object::Integer(*expected), "input {:?}", input);
        }
    }

    #[test]
    fn division_by_zero_is_an_error() {
        assert_evaluates_to("1 / 0", "ERROR: division by zero");
        assert_evaluates_to("1 % 0", "ERROR: division by zero");
    }

    #[test]
    fn boolean_expressions() {
        let cases = [
            ("true", true),
            ("1 < 2", true),
            ("1 > 2", false),
            ("1 == 1", true),
            ("1 != 1", false),
            ("true == true", true),
            ("true != false", true),
            ("(1 < 2) == true", true),
            ("(1 > 2) == true", false),
            ("1 == true", false),
            (r#""a" == "a""#, true),
            (r#""a" != "b""#, true),
            ("!true", false),
            ("!5", false),
            ("!!5", true),
            ("!0", false),
            ("![]", false),
            ("let a = [1]; let b = a; a == b", true),
            ("[1] == [1]", false),
        ];
        for (input, expected) in cases.iter() {
            assert_eq!(run(input), Object::Boolean(*expected), "input {:?}", input);
        }
    }

    #[test]
    fn if_else_expressions() {
        assert_evaluates_to("if (true) { 10 }", "10");
        assert_evaluates_to("if (false) { 10 }", "null");
        assert_evaluates_to("if (1) { 10 }", "10");
        assert_evaluates_to("if (0) { 10 } else { 20 }", "10");
        assert_evaluates_to("if (1 > 2) { 10 } else { 20 }", "20");
        assert_evaluates_to("if (true) { }", "null");
    }

    #[test]
    fn return_statements() {
        assert_evaluates_to("return 10; 9;", "10");
        assert_evaluates_to("9; return 2 * 5; 9;", "10");
        assert_evaluates_to(
            "if (10 > 1) { if (10 > 1) { return 10; } return 1; }",
            "10",
        );
        assert_evaluates_to(
            "let f = function(x) { return x; x + 10; }; f(10);",
            "10",
        );
        assert_evaluates_to(
            "let f = function(x) { let g = function() { return 1; }; g(); return x; }; f(5);",
            "5",
        );
    }

    #[test]
    fn error_handling() {
        let cases = [
            ("5 + true;", "type mismatch: INTEGER + BOOLEAN"),
            ("5 + true; 5;", "type mismatch: INTEGER + BOOLEAN"),
            ("-true", "unknown operator: -BOOLEAN"),
            ("true + false;", "unknown operator: BOOLEAN + BOOLEAN"),
            ("5; true + false; 5", "unknown operator: BOOLEAN + BOOLEAN"),
            ("if (10 > 1) { true + false; }", "unknown operator: BOOLEAN + BOOLEAN"),
            (
                "if (10 > 1) { if (10 > 1) { return true + false; } return 1; }",
                "unknown operator: BOOLEAN + BOOLEAN",
            ),
            ("foobar", "identifier not found: foobar"),
            (r#""Hello" - "World""#, "unknown operator: STRING - STRING"),
            (r#"{"name": "Lemon"}[function(x) { x }];"#, "unusable as hash key: FUNCTION"),
            ("{[1]: 2}", "unusable as hash key: ARRAY"),
            ("5(1)", "not a function: INTEGER"),
            ("1[0]", "index operator not supported: INTEGER"),
            ("[1, 2] < [3]", "unknown operator: ARRAY < ARRAY"),
            ("let f = function(x) { x }; f(1, 2)", "wrong number of arguments to `f`. got=2, want=1"),
            ("function() { 1 }(1)", "wrong number of arguments to `function`. got=1, want=0"),
            ("[1, x, 3]", "identifier not found: x"),
            ("macro(x) { x }", "macro literals are only allowed in top-level let statements"),
        ];
        for (input, expected) in cases.iter() {
            assert_eq!(
                run(input),
                Object::Error(expected.to_string()),
                "input {:?}",
                input
            );
        }
    }

    #[test]
    fn let_statements() {
        assert_evaluates_to("let a = 5; a;", "5");
        assert_evaluates_to("let a = 5 * 5; a;", "25");
        assert_evaluates_to("let a = 5; let b = a; b;", "5");
        assert_evaluates_to("let a = 5; let b = a; let c = a + b + 5; c;", "15");
        assert_evaluates_to("let a = 5;", "null");
    }

    #[test]
    fn functions_and_calls() {
        assert_evaluates_to("function(x) { x + 2; };", "function(x) { (x + 2); }");
        assert_evaluates_to("let identity = function(x) { x; }; identity(5);", "5");
        assert_evaluates_to("let double = function(x) { x * 2; }; double(5);", "10");
        assert_evaluates_to("let add = function(x, y) { x + y; }; add(5, add(5, 5));", "15");
        assert_evaluates_to("function(x) { x; }(5)", "5");
        assert_evaluates_to("function() { }()", "null");
    }

    #[test]
    fn closures_capture_their_defining_scope() {
        assert_evaluates_to(
            "let newAdder = function(x) { function(y) { x + y } }; let addTwo = newAdder(2); addTwo(3)",
            "5",
        );
        // The callee must not see the caller's locals.
        assert_evaluates_to(
            "let f = function() { secret }; let g = function() { let secret = 1; f() }; g()",
            "ERROR: identifier not found: secret",
        );
    }

    #[test]
    fn recursion() {
        assert_evaluates_to(
            "let fib = function(n) { if (n < 2) { n } else { fib(n - 1) + fib(n - 2) } }; fib(15)",
            "610",
        );
    }

    #[test]
    fn let_shadows_without_leaking() {
        assert_evaluates_to("let x = 1; let f = function() { let x = 2; x }; f(); x", "1");
        assert_evaluates_to("let x = 1; if (true) { let x = 2; }; x", "1");
        assert_evaluates_to("let x = 1; if (true) { let x = 2; x }", "2");
        assert_evaluates_to("let x = 1; let f = function(x) { x }; f(5); x", "1");
    }

    #[test]
    fn strings() {
        assert_evaluates_to(r#""Hello World!""#, "Hello World!");
        assert_evaluates_to(r#""Hello" + " " + "World!""#, "Hello World!");
    }

    #[test]
    fn arrays_and_indexing() {
        assert_evaluates_to("[1, 2 * 2, 3 + 3]", "[1, 4, 6]");
        let cases = [
            ("[1, 2, 3][0]", "1"),
            ("[1, 2, 3][2]", "3"),
            ("let i = 0; [1][i];", "1"),
            ("[1, 2, 3][1 + 1];", "3"),
            ("let myArray = [1, 2, 3]; myArray[0] + myArray[1] + myArray[2];", "6"),
            ("[1, 2, 3][3]", "null"),
            ("[1, 2, 3][-1]", "null"),
        ];
        for (input, expected) in cases.iter() {
            assert_evaluates_to(input, expected);
        }
    }

    #[test]
    fn maps_and_indexing() {
        let input = r#"let two = "two";
            {
                "one": 10 - 9,
                two: 1 + 1,
                "thr" + "ee": 6 / 2,
                4: 4,
                true: 5,
                false: 6
            }"#;
        assert_evaluates_to(input, "{4: 4, false: 6, true: 5, one: 1, three: 3, two: 2}");

        let cases = [
            (r#"{"foo": 5}["foo"]"#, "5"),
            (r#"{"foo": 5}["bar"]"#, "null"),
            (r#"let key = "foo"; {"foo": 5}[key]"#, "5"),
            (r#"{}["foo"]"#, "null"),
            ("{5: 5}[5]", "5"),
            ("{true: 5}[true]", "5"),
            (r#"{1: "int", "1": "string"}["1"]"#, "string"),
            (r#"{"a": 1}["a"]"#, "1"),
        ];
        for (input, expected) in cases.iter() {
            assert_evaluates_to(input, expected);
        }
    }

    #[test]
    fn arrays_are_shared_between_bindings() {
        assert_evaluates_to(
            "let a = [1]; let add = function(arr) { push(arr, 2) }; add(a); a",
            "[1, 2]",
        );
    }

    #[test]
    fn self_containing_values_print() {
        assert_evaluates_to("let a = [1]; push(a, a); len(a)", "2");
        assert_evaluates_to("let a = [1]; push(a, a); a", "[1, [...]]");
        assert_evaluates_to("let a = [1]; push(a, a); str(a)", "[1, [...]]");
        assert_evaluates_to(
            r#"let m = {}; merge(m, {"self": m}); m"#,
            "{self: {...}}",
        );
    }

    #[test]
    fn builtins_can_be_shadowed() {
        assert_evaluates_to("let len = function(x) { 42 }; len([1])", "42");
        assert_evaluates_to("len", "builtin function");
    }

    #[test]
    fn errors_stop_evaluation() {
        assert_evaluates_to(
            "let a = [1]; push(a, 1 + true); push(a, 3); a",
            "ERROR: type mismatch: INTEGER + BOOLEAN",
        );
    }

    #[test]
    fn rendered_programs_evaluate_the_same() {
        let inputs = [
            "let x = 10; let y = x * 2 - 3; if (y > x) { y } else { x }",
            "let f = function(a) { if (a > 0) { return a * 2; } -a }; [f(3), f(-4)]",
            r#"let m = {"k": [1, 2, 3]}; m["k"][2] % 2"#,
            "!(1 < 2) == false",
        ];
        for input in inputs.iter() {
            let (program, _) = parse(input);
            let (reparsed, errors) = parse(&program.to_string());
            assert!(errors.is_empty());
            assert_eq!(
                eval_program(&program, &Environment::new()),
                eval_program(&reparsed, &Environment::new())
            );
        }
    }
}
