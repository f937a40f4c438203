use crate::ast::{BlockStatement, Expression, Identifier};
use crate::environment::Environment;
use crate::evaluator;
use derive_more::{Deref, DerefMut};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::fmt::Formatter;
use std::ops::{RangeFrom, RangeInclusive};
use std::rc::Rc;

pub type Int = i64;

#[derive(Deref, DerefMut, Debug, Clone, Default, PartialEq)]
pub struct Elements(pub Vec<Object>);

#[derive(Debug, Clone, PartialEq)]
pub struct HashPair {
    pub key: Object,
    pub value: Object,
}

#[derive(Deref, DerefMut, Debug, Clone, Default, PartialEq)]
pub struct Pairs(pub HashMap<HashKey, HashPair>);

impl Pairs {
    /// Entries ordered by key, so that printing is deterministic.
    pub fn ordered(&self) -> Vec<(&HashKey, &HashPair)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

#[derive(Debug, Clone)]
pub enum Arity {
    Between(RangeInclusive<usize>),
    AtLeast(RangeFrom<usize>),
}

#[derive(Debug)]
pub struct BadArgCount {
    name: String,
    expected: Arity,
    got: usize,
}

impl fmt::Display for BadArgCount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "wrong number of arguments to `{}`. got={}, want={}",
            self.name, self.got, self.expected
        )
    }
}

impl Arity {
    pub(crate) const fn exactly(n: usize) -> Self {
        Self::Between(n..=n)
    }

    pub(crate) const fn at_least(n: usize) -> Self {
        Self::AtLeast(n..)
    }

    pub(crate) fn contains(&self, n: usize) -> bool {
        match self {
            Self::Between(range) => range.contains(&n),
            Self::AtLeast(range) => range.contains(&n),
        }
    }

    pub(crate) fn validate_for(&self, n: usize, name: &str) -> Result<(), BadArgCount> {
        match self.contains(n) {
            true => Ok(()),
            false => Err(BadArgCount {
                name: name.into(),
                expected: self.clone(),
                got: n,
            }),
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Between(r) => {
                if r.start() == r.end() {
                    write!(f, "{}", r.start())
                } else {
                    write!(f, "{}..{}", r.start(), r.end())
                }
            }
            Arity::AtLeast(r) => write!(f, "{}+", r.start),
        }
    }
}

pub struct Builtin {
    pub name: &'static str,
    pub arity: Arity,
    pub fn_ptr: fn(&[Object]) -> evaluator::Result<Object, evaluator::Error>,
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "builtin function #<{}>", self.name)
    }
}

pub struct Function {
    pub parameters: Vec<Identifier>,
    pub body: BlockStatement,
    pub env: Rc<Environment>,
    pub name: Option<String>,
}

impl Function {
    pub fn arity(&self) -> Arity {
        Arity::exactly(self.parameters.len())
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("function")
    }
}

impl fmt::Debug for Function {
    // Not derived because we want to skip the env: the env may well contain this Function!
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Function{{name: {:?}, parameters: {:?}, body: {:?}}}",
            self.name, self.parameters, self.body
        )
    }
}

pub struct Macro {
    pub parameters: Vec<Identifier>,
    pub body: BlockStatement,
    pub env: Rc<Environment>,
}

impl fmt::Debug for Macro {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Macro{{parameters: {:?}, body: {:?}}}",
            self.parameters, self.body
        )
    }
}

#[derive(Debug, Clone)]
pub enum Object {
    Null,
    Integer(Int),
    Boolean(bool),
    String(String),
    Array(Rc<RefCell<Elements>>),
    Map(Rc<RefCell<Pairs>>),
    Function(Rc<Function>),
    Builtin(&'static Builtin),
    Quote(Rc<Expression>),
    Macro(Rc<Macro>),
    Error(String),
}

/// Truthiness as seen by `if` and `!`: only `false` and `null` are falsy.
pub(crate) fn truthy(obj: &Object) -> bool {
    use Object::*;
    match obj {
        Boolean(b) => *b,
        Null => false,
        Integer(_) | String(_) | Array(_) | Map(_) | Function(_) | Builtin(_) | Quote(_)
        | Macro(_) | Error(_) => true,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectType {
    Null,
    Integer,
    Boolean,
    String,
    Array,
    Map,
    Function,
    Builtin,
    Quote,
    Macro,
    Error,
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        use ObjectType::*;
        let name = match self {
            Null => "NULL",
            Integer => "INTEGER",
            Boolean => "BOOLEAN",
            String => "STRING",
            Array => "ARRAY",
            Map => "MAP",
            Function => "FUNCTION",
            Builtin => "BUILTIN",
            Quote => "QUOTE",
            Macro => "MACRO",
            Error => "ERROR",
        };
        write!(f, "{}", name)
    }
}

/// Only integers, booleans and strings may key a map. The variant acts as the
/// type tag, so `1` and `"1"` never collide.
#[derive(Debug, PartialEq, Eq, Hash, Clone, PartialOrd, Ord)]
pub enum HashKey {
    Integer(Int),
    Boolean(bool),
    String(String),
}

impl Object {
    pub fn object_type(&self) -> ObjectType {
        match self {
            Object::Null => ObjectType::Null,
            Object::Integer(_) => ObjectType::Integer,
            Object::Boolean(_) => ObjectType::Boolean,
            Object::String(_) => ObjectType::String,
            Object::Array(_) => ObjectType::Array,
            Object::Map(_) => ObjectType::Map,
            Object::Function(_) => ObjectType::Function,
            Object::Builtin(_) => ObjectType::Builtin,
            Object::Quote(_) => ObjectType::Quote,
            Object::Macro(_) => ObjectType::Macro,
            Object::Error(_) => ObjectType::Error,
        }
    }

    pub(crate) fn as_hashkey(&self) -> Result<HashKey, evaluator::Error> {
        match self {
            Object::Integer(i) => Ok(HashKey::Integer(*i)),
            Object::Boolean(b) => Ok(HashKey::Boolean(*b)),
            Object::String(s) => Ok(HashKey::String(s.clone())),
            other => Err(evaluator::Error::UnusableAsHashKey(other.object_type())),
        }
    }

    pub(crate) fn wrap_array(elements: Vec<Object>) -> Self {
        Self::Array(Rc::new(RefCell::new(Elements(elements))))
    }

    pub(crate) fn wrap_map(pairs: HashMap<HashKey, HashPair>) -> Self {
        Self::Map(Rc::new(RefCell::new(Pairs(pairs))))
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        equal(self, other, &mut Vec::new())
    }
}

/// Structural equality. Container pairs already under comparison in
/// `assumed` count as equal, so self-containing values terminate.
fn equal(x: &Object, y: &Object, assumed: &mut Vec<(*const (), *const ())>) -> bool {
    use Object::*;
    match (x, y) {
        (Null, Null) => true,
        (Integer(x), Integer(y)) => x == y,
        (Boolean(x), Boolean(y)) => x == y,
        (String(x), String(y)) => x == y,
        (Array(x), Array(y)) => {
            let key = (Rc::as_ptr(x) as *const (), Rc::as_ptr(y) as *const ());
            if Rc::ptr_eq(x, y) || assumed.contains(&key) {
                return true;
            }
            assumed.push(key);
            let (x, y) = (x.borrow(), y.borrow());
            let result =
                x.len() == y.len() && x.iter().zip(y.iter()).all(|(a, b)| equal(a, b, assumed));
            assumed.pop();
            result
        }
        (Map(x), Map(y)) => {
            let key = (Rc::as_ptr(x) as *const (), Rc::as_ptr(y) as *const ());
            if Rc::ptr_eq(x, y) || assumed.contains(&key) {
                return true;
            }
            assumed.push(key);
            let (x, y) = (x.borrow(), y.borrow());
            let result = x.len() == y.len()
                && x.iter().all(|(hash, pair)| match y.get(hash) {
                    Some(other) => equal(&pair.value, &other.value, assumed),
                    None => false,
                });
            assumed.pop();
            result
        }
        (Function(x), Function(y)) => Rc::ptr_eq(x, y),
        (Builtin(x), Builtin(y)) => x.name == y.name,
        (Quote(x), Quote(y)) => x == y,
        (Macro(x), Macro(y)) => Rc::ptr_eq(x, y),
        (Error(x), Error(y)) => x == y,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_keys_carry_their_type() {
        let one = Object::Integer(1).as_hashkey().unwrap();
        let one_string = Object::String("1".into()).as_hashkey().unwrap();
        assert_ne!(one, one_string);
        assert_eq!(
            Object::String("name".into()).as_hashkey().unwrap(),
            Object::String("name".into()).as_hashkey().unwrap()
        );
        assert_eq!(
            Object::Boolean(true).as_hashkey().unwrap(),
            HashKey::Boolean(true)
        );
    }

    #[test]
    fn containers_are_not_hashable() {
        let err = Object::wrap_array(vec![]).as_hashkey().unwrap_err();
        assert_eq!(err.to_string(), "unusable as hash key: ARRAY");
    }

    #[test]
    fn truthiness() {
        assert!(truthy(&Object::Integer(0)));
        assert!(truthy(&Object::String(String::new())));
        assert!(truthy(&Object::wrap_array(vec![])));
        assert!(!truthy(&Object::Boolean(false)));
        assert!(!truthy(&Object::Null));
    }

    #[test]
    fn arity_messages() {
        let err = Arity::exactly(1).validate_for(2, "len").unwrap_err();
        assert_eq!(err.to_string(), "wrong number of arguments to `len`. got=2, want=1");
        let err = Arity::at_least(2).validate_for(1, "merge").unwrap_err();
        assert_eq!(err.to_string(), "wrong number of arguments to `merge`. got=1, want=2+");
        assert!(Arity::at_least(0).contains(0));
    }

    #[test]
    fn arrays_share_storage() {
        let a = Object::wrap_array(vec![Object::Integer(1)]);
        let b = a.clone();
        if let Object::Array(elements) = &b {
            elements.borrow_mut().push(Object::Integer(2));
        }
        assert_eq!(a, Object::wrap_array(vec![Object::Integer(1), Object::Integer(2)]));
    }

    #[test]
    fn self_containing_arrays_compare() {
        let make = || {
            let array = Object::wrap_array(vec![Object::Integer(1)]);
            if let Object::Array(elements) = &array {
                elements.borrow_mut().push(array.clone());
            }
            array
        };
        assert_eq!(make(), make());
        assert_ne!(make(), Object::wrap_array(vec![Object::Integer(1)]));
    }
}
