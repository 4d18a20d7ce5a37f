//! Call-site arguments: positional values plus named values.
//!
//! A `CallArgs` is immutable for the duration of one resolution. Named
//! values keep their insertion order (diagnostics render them in the order
//! the caller wrote them) and have unique keys by construction.

use indexmap::IndexMap;

use crate::value::Value;

/// The positional and named values supplied at one call site.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct CallArgs {
    positional: Vec<Value>,
    named: IndexMap<String, Value>,
}

impl CallArgs {
    /// An empty call shape: `f()`.
    pub fn new() -> Self {
        Self::default()
    }

    /// A purely positional call shape: `f(a, b, c)`.
    pub fn positional(values: Vec<Value>) -> Self {
        Self {
            positional: values,
            named: IndexMap::new(),
        }
    }

    /// Adds a named value, replacing any previous value under the same name
    /// (keys stay unique).
    pub fn named(mut self, name: impl Into<String>, value: Value) -> Self {
        self.named.insert(name.into(), value);
        self
    }

    /// Total argument count: positional plus named.
    pub fn given(&self) -> usize {
        self.positional.len() + self.named.len()
    }

    pub fn positional_values(&self) -> &[Value] {
        &self.positional
    }

    pub fn named_values(&self) -> &IndexMap<String, Value> {
        &self.named
    }

    pub(crate) fn named_value(&self, name: &str) -> Option<&Value> {
        self.named.get(name)
    }

    pub(crate) fn keyword_names(&self) -> impl Iterator<Item = &str> {
        self.named.keys().map(String::as_str)
    }
}
