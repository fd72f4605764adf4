use std::collections::HashMap;

/// The variable bindings of a running program.
///
/// There is a single flat mapping; `var` blocks and procedure calls save
/// and restore the bindings they touch instead of pushing frames.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    bindings: HashMap<String, i64>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the value bound to `name`
    pub fn get(&self, name: &str) -> Option<i64> {
        self.bindings.get(name).copied()
    }

    /// Bind `name` to `value`, returning the previous binding
    pub fn set(&mut self, name: impl ToString, value: i64) -> Option<i64> {
        self.bindings.insert(name.to_string(), value)
    }

    /// Put back a binding saved by [`Environment::set`]: rebind the old
    /// value, or drop the name if it was unbound before.
    pub fn restore(&mut self, name: &str, previous: Option<i64>) {
        match previous {
            Some(value) => {
                self.bindings.insert(name.to_string(), value);
            }
            None => {
                self.bindings.remove(name);
            }
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// All bindings ordered by name
    pub fn sorted(&self) -> Vec<(&str, i64)> {
        let mut entries = self
            .bindings
            .iter()
            .map(|(name, value)| (name.as_str(), *value))
            .collect::<Vec<_>>();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }
}
