use crate::evaluator::Error;
use crate::printer::inspect;
use crate::types::{truthy, Arity, Builtin, HashPair, Int, Object, ObjectType};
use itertools::Itertools;
use linefeed::{DefaultTerminal, Interface, ReadResult};
use regex::Regex;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::io::{self, BufRead, Write};

type Result = std::result::Result<Object, Error>;

fn unsupported(name: &'static str, got: &Object) -> Error {
    Error::UnsupportedArgument {
        name,
        got: got.object_type(),
    }
}

const LEN: Builtin = Builtin {
    name: "len",
    fn_ptr: len_,
    arity: Arity::exactly(1),
};

fn len_(args: &[Object]) -> Result {
    let length = match &args[0] {
        Object::String(s) => s.chars().count(),
        Object::Array(elements) => elements.borrow().len(),
        other => return Err(unsupported("len", other)),
    };
    Ok(Object::Integer(length as Int))
}

const FIRST: Builtin = Builtin {
    name: "first",
    fn_ptr: |args| first_or_last_("first", args),
    arity: Arity::exactly(1),
};

const LAST: Builtin = Builtin {
    name: "last",
    fn_ptr: |args| first_or_last_("last", args),
    arity: Arity::exactly(1),
};

fn first_or_last_(name: &'static str, args: &[Object]) -> Result {
    let from_front = name == "first";
    match &args[0] {
        Object::Array(elements) => {
            let elements = elements.borrow();
            let element = if from_front {
                elements.first()
            } else {
                elements.last()
            };
            element.cloned().ok_or(Error::EmptyArray(name))
        }
        Object::String(s) => {
            let c = if from_front {
                s.chars().next()
            } else {
                s.chars().last()
            };
            Ok(c.map(|c| Object::String(c.to_string()))
                .unwrap_or(Object::Null))
        }
        other => Err(unsupported(name, other)),
    }
}

const REST: Builtin = Builtin {
    name: "rest",
    fn_ptr: rest_,
    arity: Arity::exactly(1),
};

fn rest_(args: &[Object]) -> Result {
    match &args[0] {
        Object::Array(elements) => {
            let elements = elements.borrow();
            match elements.split_first() {
                Some((_, rest)) => Ok(Object::wrap_array(rest.to_vec())),
                None => Ok(Object::Null),
            }
        }
        Object::String(s) if s.is_empty() => Ok(Object::Null),
        Object::String(s) => Ok(Object::String(s.chars().skip(1).collect())),
        other => Err(unsupported("rest", other)),
    }
}

const PUSH: Builtin = Builtin {
    name: "push",
    fn_ptr: push_,
    arity: Arity::exactly(2),
};

fn push_(args: &[Object]) -> Result {
    match &args[0] {
        Object::Array(elements) => {
            elements.borrow_mut().push(args[1].clone());
            Ok(args[0].clone())
        }
        other => Err(unsupported("push", other)),
    }
}

const POP: Builtin = Builtin {
    name: "pop",
    fn_ptr: pop_,
    arity: Arity::exactly(1),
};

fn pop_(args: &[Object]) -> Result {
    match &args[0] {
        Object::Array(elements) => Ok(elements.borrow_mut().pop().unwrap_or(Object::Null)),
        other => Err(unsupported("pop", other)),
    }
}

/// A fresh container holding the same elements. Anything immutable is
/// returned as is.
fn shallow_copy(obj: &Object) -> Object {
    match obj {
        Object::Array(elements) => Object::wrap_array(elements.borrow().0.clone()),
        Object::Map(pairs) => Object::wrap_map(pairs.borrow().0.clone()),
        other => other.clone(),
    }
}

const CLONE: Builtin = Builtin {
    name: "clone",
    fn_ptr: clone_,
    arity: Arity::exactly(1),
};

fn clone_(args: &[Object]) -> Result {
    match &args[0] {
        Object::Array(_) | Object::Map(_) | Object::String(_) => Ok(shallow_copy(&args[0])),
        other => Err(unsupported("clone", other)),
    }
}

const KEYS: Builtin = Builtin {
    name: "keys",
    fn_ptr: keys_,
    arity: Arity::exactly(1),
};

fn keys_(args: &[Object]) -> Result {
    match &args[0] {
        Object::Map(pairs) => {
            let keys = pairs
                .borrow()
                .ordered()
                .into_iter()
                .map(|(_, pair)| pair.key.clone())
                .collect();
            Ok(Object::wrap_array(keys))
        }
        other => Err(unsupported("keys", other)),
    }
}

const VALUES: Builtin = Builtin {
    name: "values",
    fn_ptr: values_,
    arity: Arity::exactly(1),
};

fn values_(args: &[Object]) -> Result {
    match &args[0] {
        Object::Map(pairs) => {
            let values = pairs
                .borrow()
                .ordered()
                .into_iter()
                .map(|(_, pair)| pair.value.clone())
                .collect();
            Ok(Object::wrap_array(values))
        }
        other => Err(unsupported("values", other)),
    }
}

fn mismatched(name: &'static str, expected: ObjectType, got: &Object) -> Error {
    Error::MismatchedArgument {
        name,
        expected,
        got: got.object_type(),
    }
}

/// Folds every later argument into the first. Arrays and maps are updated in
/// place; strings are immutable, so their concatenation is returned instead.
fn merge_in_place(name: &'static str, args: &[Object]) -> Result {
    let (target, others) = match args.split_first() {
        Some(split) => split,
        None => return Ok(Object::Null),
    };
    match target {
        Object::Array(elements) => {
            let mut extra = Vec::new();
            for other in others {
                match other {
                    Object::Array(more) => extra.extend(more.borrow().iter().cloned()),
                    _ => return Err(mismatched(name, ObjectType::Array, other)),
                }
            }
            elements.borrow_mut().extend(extra);
            Ok(target.clone())
        }
        Object::Map(pairs) => {
            let mut extra: Vec<(_, HashPair)> = Vec::new();
            for other in others {
                match other {
                    Object::Map(more) => extra.extend(
                        more.borrow()
                            .ordered()
                            .into_iter()
                            .map(|(key, pair)| (key.clone(), pair.clone())),
                    ),
                    _ => return Err(mismatched(name, ObjectType::Map, other)),
                }
            }
            pairs.borrow_mut().extend(extra);
            Ok(target.clone())
        }
        Object::String(s) => {
            let mut merged = s.clone();
            for other in others {
                match other {
                    Object::String(more) => merged.push_str(more),
                    _ => return Err(mismatched(name, ObjectType::String, other)),
                }
            }
            Ok(Object::String(merged))
        }
        other => Err(unsupported(name, other)),
    }
}

fn sort_in_place(name: &'static str, args: &[Object]) -> Result {
    let elements = match &args[0] {
        Object::Array(elements) => elements,
        other => return Err(unsupported(name, other)),
    };
    {
        let mut elements = elements.borrow_mut();
        if let Some(first) = elements.first() {
            let first = first.object_type();
            if first != ObjectType::Integer && first != ObjectType::String {
                return Err(Error::UnsortableElements { name, got: first });
            }
            if let Some(other) = elements.iter().find(|e| e.object_type() != first) {
                return Err(Error::MixedElements {
                    name,
                    first,
                    other: other.object_type(),
                });
            }
        }
        elements.sort_by(|a, b| match (a, b) {
            (Object::Integer(x), Object::Integer(y)) => x.cmp(y),
            (Object::String(x), Object::String(y)) => x.cmp(y),
            _ => Ordering::Equal,
        });
    }
    Ok(args[0].clone())
}

// Each pair is an in-place builtin plus a twin that works on a copy of its
// first argument.
macro_rules! mutating_builtin {
    ($in_place:ident, $in_place_arity:expr, $copying:ident, $copying_arity:expr) => {
        paste::paste! {
            const [<$in_place:upper>]: Builtin = Builtin {
                name: stringify!($in_place),
                fn_ptr: |args: &[Object]| [<$in_place _in_place>](stringify!($in_place), args),
                arity: $in_place_arity,
            };

            const [<$copying:upper>]: Builtin = Builtin {
                name: stringify!($copying),
                fn_ptr: |args: &[Object]| {
                    let mut args = args.to_vec();
                    args[0] = shallow_copy(&args[0]);
                    [<$in_place _in_place>](stringify!($copying), &args)
                },
                arity: $copying_arity,
            };
        }
    };
}

mutating_builtin!(merge, Arity::at_least(2), merged, Arity::at_least(1));
mutating_builtin!(sort, Arity::exactly(1), sorted, Arity::exactly(1));

fn print_internal(args: &[Object], newline: bool) -> Result {
    let text = args.iter().map(inspect).join(" ");
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if newline {
        writeln!(handle, "{}", text)?;
    } else {
        write!(handle, "{}", text)?;
    }
    handle.flush()?;
    Ok(Object::Null)
}

const PRINT: Builtin = Builtin {
    name: "print",
    fn_ptr: |args| print_internal(args, false),
    arity: Arity::at_least(0),
};

const PRINTLN: Builtin = Builtin {
    name: "println",
    fn_ptr: |args| print_internal(args, true),
    arity: Arity::at_least(0),
};

const INPUT: Builtin = Builtin {
    name: "input",
    fn_ptr: input_,
    arity: Arity::exactly(0),
};

fn input_(_args: &[Object]) -> Result {
    lazy_static! {
        static ref INTERFACE: Option<Interface<DefaultTerminal>> =
            Interface::new("lemon_input").ok();
    }
    if atty::is(atty::Stream::Stdin) {
        if let Some(interface) = INTERFACE.as_ref() {
            interface.set_prompt("")?;
            return match interface.read_line()? {
                ReadResult::Input(line) => Ok(Object::String(line)),
                ReadResult::Eof | ReadResult::Signal(_) => Ok(Object::String(String::new())),
            };
        }
    }
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let trimmed = line.trim_end_matches(&['\n', '\r'][..]).len();
    line.truncate(trimmed);
    Ok(Object::String(line))
}

lazy_static! {
    static ref INTEGER_LITERAL: Regex = Regex::new(r"^([+-]?)(0[xXoObB])?([0-9A-Za-z_]+)$").unwrap();
}

/// Parses integer text with an optional sign and `0x`, `0o` or `0b` prefix.
/// A bare leading zero means octal; underscores may separate digits, and one
/// may follow an explicit prefix.
fn parse_integer(text: &str) -> Option<Int> {
    let captures = INTEGER_LITERAL.captures(text)?;
    let sign = captures.get(1).map_or("", |m| m.as_str());
    let prefix = captures.get(2);
    let digits = captures.get(3)?.as_str();
    let digits = match prefix {
        Some(_) => digits.strip_prefix('_').unwrap_or(digits),
        None => digits,
    };
    let radix = match prefix.map(|m| m.as_str().to_ascii_lowercase()) {
        Some(prefix) if prefix == "0x" => 16,
        Some(prefix) if prefix == "0o" => 8,
        Some(_) => 2,
        None if digits.len() > 1 && digits.starts_with('0') => 8,
        None => 10,
    };
    if digits.is_empty()
        || digits.starts_with('_')
        || digits.ends_with('_')
        || digits.contains("__")
    {
        return None;
    }
    let digits: String = digits.chars().filter(|&c| c != '_').collect();
    Int::from_str_radix(&format!("{}{}", sign, digits), radix).ok()
}

const INT: Builtin = Builtin {
    name: "int",
    fn_ptr: int_,
    arity: Arity::exactly(1),
};

fn int_(args: &[Object]) -> Result {
    match &args[0] {
        Object::Integer(_) => Ok(args[0].clone()),
        Object::Boolean(b) => Ok(Object::Integer(*b as Int)),
        Object::String(s) => parse_integer(s)
            .map(Object::Integer)
            .ok_or_else(|| Error::InvalidInteger(s.clone())),
        other => Err(unsupported("int", other)),
    }
}

const STR: Builtin = Builtin {
    name: "str",
    fn_ptr: |args| Ok(Object::String(inspect(&args[0]))),
    arity: Arity::exactly(1),
};

const BOOL: Builtin = Builtin {
    name: "bool",
    fn_ptr: bool_,
    arity: Arity::exactly(1),
};

/// Unlike `if`, treats zero and empty containers as false.
fn bool_(args: &[Object]) -> Result {
    let value = match &args[0] {
        Object::Integer(i) => *i != 0,
        Object::String(s) => !s.is_empty(),
        Object::Array(elements) => !elements.borrow().is_empty(),
        Object::Map(pairs) => !pairs.borrow().is_empty(),
        other => truthy(other),
    };
    Ok(Object::Boolean(value))
}

static FUNCTIONS: &[Builtin] = &[
    // Sequences
    LEN, FIRST, LAST, REST, PUSH, POP, CLONE,
    // Maps
    KEYS, VALUES,
    // Combining and ordering
    MERGE, MERGED, SORT, SORTED,
    // Input and output
    PRINT, PRINTLN, INPUT,
    // Conversions
    INT, STR, BOOL,
];

type Namespace = HashMap<&'static str, &'static Builtin>;
lazy_static! {
    pub static ref BUILTINS: Namespace = {
        let mut map = Namespace::new();
        for func in FUNCTIONS.iter() {
            map.insert(func.name, func);
        }
        map
    };
}
