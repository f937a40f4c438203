use crate::types::Object;
use itertools::Itertools;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

#[derive(Debug)]
pub struct UnknownIdentifier(pub String);

/// One scope. Lookups walk outward through `outer`; `set` always writes to
/// this scope, so inner bindings shadow rather than overwrite outer ones.
#[derive(Default)]
pub struct Environment {
    store: RefCell<HashMap<String, Object>>,
    outer: Option<Rc<Environment>>,
}

impl Environment {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn spawn_from(outer: &Rc<Environment>) -> Rc<Self> {
        Rc::new(Self {
            store: RefCell::new(HashMap::new()),
            outer: Some(outer.clone()),
        })
    }

    pub fn set<T>(&self, key: T, value: Object) -> Option<Object>
    where
        T: Into<String>,
    {
        self.store.borrow_mut().insert(key.into(), value)
    }

    pub fn get(&self, key: &str) -> Option<Object> {
        match self.store.borrow().get(key) {
            Some(value) => Some(value.clone()),
            None => self.outer.as_ref().and_then(|outer| outer.get(key)),
        }
    }

    pub fn fetch(&self, key: &str) -> Result<Object, UnknownIdentifier> {
        self.get(key).ok_or_else(|| UnknownIdentifier(key.into()))
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let store = self.store.borrow();
        write!(f, "{{{}}}", store.keys().sorted().join(", "))?;
        if let Some(outer) = &self.outer {
            write!(f, " -> {}", outer)?;
        }
        Ok(())
    }
}
