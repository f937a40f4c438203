use crate::types::Object;
use itertools::Itertools;
use std::fmt;
use std::rc::Rc;

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", render(self, &mut Vec::new()))
    }
}

/// `open` holds the containers currently being rendered, so an array or map
/// that contains itself prints as `[...]` or `{...}` at the repeat.
fn render(object: &Object, open: &mut Vec<*const ()>) -> String {
    match object {
        Object::Null => "null".into(),
        Object::Integer(value) => value.to_string(),
        Object::Boolean(value) => value.to_string(),
        Object::String(value) => value.clone(),
        Object::Array(elements) => {
            let ptr = Rc::as_ptr(elements) as *const ();
            if open.contains(&ptr) {
                return "[...]".into();
            }
            open.push(ptr);
            let text = elements
                .borrow()
                .iter()
                .map(|element| render(element, open))
                .join(", ");
            open.pop();
            format!("[{}]", text)
        }
        Object::Map(pairs) => {
            let ptr = Rc::as_ptr(pairs) as *const ();
            if open.contains(&ptr) {
                return "{...}".into();
            }
            open.push(ptr);
            let text = pairs
                .borrow()
                .ordered()
                .into_iter()
                .map(|(_, pair)| format!("{}: {}", pair.key, render(&pair.value, open)))
                .join(", ");
            open.pop();
            format!("{{{}}}", text)
        }
        Object::Function(func) => format!(
            "function({}) {}",
            func.parameters.iter().join(", "),
            func.body
        ),
        Object::Builtin(_) => "builtin function".into(),
        Object::Quote(node) => format!("QUOTE({})", node),
        Object::Macro(m) => format!("macro({}) {}", m.parameters.iter().join(", "), m.body),
        Object::Error(message) => format!("ERROR: {}", message),
    }
}

/// The text shown for a value by the REPL, `print` and `str`.
pub fn inspect(object: &Object) -> String {
    object.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{HashKey, HashPair};
    use std::collections::HashMap;

    #[test]
    fn scalars() {
        assert_eq!(inspect(&Object::Null), "null");
        assert_eq!(inspect(&Object::Integer(-3)), "-3");
        assert_eq!(inspect(&Object::Boolean(true)), "true");
        assert_eq!(inspect(&Object::String("hi there".into())), "hi there");
        assert_eq!(inspect(&Object::Error("boom".into())), "ERROR: boom");
    }

    #[test]
    fn containers() {
        let array = Object::wrap_array(vec![
            Object::Integer(1),
            Object::String("two".into()),
            Object::wrap_array(vec![]),
        ]);
        assert_eq!(inspect(&array), "[1, two, []]");

        let mut pairs = HashMap::new();
        for (key, value) in vec![
            (Object::String("b".into()), Object::Integer(2)),
            (Object::Integer(10), Object::Boolean(false)),
            (Object::String("a".into()), Object::Integer(1)),
        ] {
            pairs.insert(key.as_hashkey().unwrap(), HashPair { key, value });
        }
        assert_eq!(inspect(&Object::wrap_map(pairs)), "{10: false, a: 1, b: 2}");
        assert_eq!(inspect(&Object::wrap_map(HashMap::<HashKey, HashPair>::new())), "{}");
    }

    #[test]
    fn self_containing_containers() {
        let array = Object::wrap_array(vec![Object::Integer(1)]);
        if let Object::Array(elements) = &array {
            elements.borrow_mut().push(array.clone());
        }
        assert_eq!(inspect(&array), "[1, [...]]");

        let map = Object::wrap_map(HashMap::new());
        if let Object::Map(pairs) = &map {
            let key = Object::String("me".into());
            pairs.borrow_mut().insert(
                key.as_hashkey().unwrap(),
                HashPair {
                    key,
                    value: map.clone(),
                },
            );
        }
        assert_eq!(inspect(&map), "{me: {...}}");

        // The same array twice, side by side, is not a cycle.
        let inner = Object::wrap_array(vec![Object::Integer(2)]);
        let outer = Object::wrap_array(vec![inner.clone(), inner]);
        assert_eq!(inspect(&outer), "[[2], [2]]");
    }
}
