use crate::ast::{
    modify_expression, modify_program, BlockStatement, Expression, IfExpression, LetStatement,
    Program, Statement,
};
use crate::environment::Environment;
use crate::evaluator::{self, settle, Error};
use crate::types::{Arity, Macro, Object};
use std::rc::Rc;

/// Builds a `Quote` around `arguments[0]`, first replacing every
/// `unquote(x)` call inside it with the AST form of `x`'s value.
pub(crate) fn quote(arguments: &[Expression], env: &Rc<Environment>) -> evaluator::Result {
    Arity::exactly(1)
        .validate_for(arguments.len(), "quote")
        .map_err(Error::BadArgCount)?;
    let node = eval_unquote_calls(arguments[0].clone(), env)?;
    Ok(Object::Quote(Rc::new(node)))
}

fn eval_unquote_calls(quoted: Expression, env: &Rc<Environment>) -> Result<Expression, Error> {
    modify_expression(quoted, &mut |node: Expression| -> Result<Expression, Error> {
        if node.call_target() != Some("unquote") {
            return Ok(node);
        }
        if let Expression::Call(call) = &node {
            if let [argument] = call.arguments.as_slice() {
                let value = settle(evaluator::eval_expression(argument, env))?;
                log::trace!("unquote({}) -> {}", argument, value);
                return Ok(object_to_expression(value));
            }
        }
        Ok(node)
    })
}

/// Turns a runtime value back into syntax that evaluates to an equal value.
fn object_to_expression(obj: Object) -> Expression {
    match obj {
        Object::Integer(value) => Expression::Integer(value),
        Object::Boolean(value) => Expression::Boolean(value),
        Object::String(value) => Expression::String(value),
        // `if (false) { }` is the only literal syntax that evaluates to null.
        Object::Null => Expression::If(IfExpression {
            condition: Box::new(Expression::Boolean(false)),
            consequence: BlockStatement::default(),
            alternative: None,
        }),
        Object::Array(elements) => Expression::Array(
            elements
                .borrow()
                .iter()
                .cloned()
                .map(object_to_expression)
                .collect(),
        ),
        Object::Map(pairs) => Expression::Map(
            pairs
                .borrow()
                .ordered()
                .into_iter()
                .map(|(_, pair)| {
                    (
                        object_to_expression(pair.key.clone()),
                        object_to_expression(pair.value.clone()),
                    )
                })
                .collect(),
        ),
        Object::Function(f) => Expression::identifier(f.display_name()),
        Object::Builtin(b) => Expression::identifier(b.name),
        Object::Quote(node) => (*node).clone(),
        Object::Macro(_) => Expression::identifier("macro"),
        Object::Error(message) => Expression::String(message),
    }
}

/// Removes every top-level `let name = macro(...) {...};` from `program`,
/// binding the macros in `env`. Nested definitions are left alone.
pub fn define_macros(program: &mut Program, env: &Rc<Environment>) {
    program.retain(|statement| match statement {
        Statement::Let(LetStatement {
            name,
            value: Expression::Macro(literal),
        }) => {
            log::debug!("defining macro {}", name);
            env.set(
                name.0.clone(),
                Object::Macro(Rc::new(Macro {
                    parameters: literal.parameters.clone(),
                    body: literal.body.clone(),
                    env: env.clone(),
                })),
            );
            false
        }
        _ => true,
    });
}

/// The callee name, arguments and definition of a call to a bound macro.
fn macro_call<'e>(
    node: &'e Expression,
    env: &Rc<Environment>,
) -> Option<(&'e str, &'e [Expression], Rc<Macro>)> {
    let call = match node {
        Expression::Call(call) => call,
        _ => return None,
    };
    let name = node.call_target()?;
    match env.get(name) {
        Some(Object::Macro(m)) => Some((name, &call.arguments, m)),
        _ => None,
    }
}

/// Replaces each call to a macro bound in `env` with the syntax the macro
/// returns. Arguments reach the macro unevaluated, as quotes.
pub fn expand_macros(program: Program, env: &Rc<Environment>) -> Result<Program, Error> {
    modify_program(program, &mut |node: Expression| -> Result<Expression, Error> {
        let (name, arguments, m) = match macro_call(&node, env) {
            Some(found) => found,
            None => return Ok(node),
        };
        Arity::exactly(m.parameters.len())
            .validate_for(arguments.len(), name)
            .map_err(Error::BadArgCount)?;

        let extended = Environment::spawn_from(&m.env);
        for (parameter, argument) in m.parameters.iter().zip(arguments) {
            extended.set(parameter.0.clone(), Object::Quote(Rc::new(argument.clone())));
        }
        log::trace!("expanding {}", node);
        match settle(evaluator::eval_block(&m.body, &extended))? {
            Object::Quote(expanded) => Ok((*expanded).clone()),
            other => Err(Error::MacroResultNotQuote(other.object_type())),
        }
    })
}
