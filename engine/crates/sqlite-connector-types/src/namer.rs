//! Turns SQL identifiers into GraphQL names.

use std::collections::HashSet;

/// Issues valid, unique GraphQL names for arbitrary SQL identifiers within one
/// naming scope: one instance for the tables of a database, and a fresh one for
/// the columns of every table.
///
/// Whitespace runs collapse into a single underscore, any other character outside
/// `[A-Za-z0-9_]` becomes an underscore, and a leading digit gets an underscore in
/// front of it. Names both starting and ending with an underscore, and names
/// starting with the reserved `__`, get the scope prefix. Collisions are
/// resolved with `_2`, `_3` and so on.
#[derive(Debug, Clone, Default)]
pub struct Namer {
    issued: HashSet<String>,
    underscore_prefix: &'static str,
}

impl Namer {
    pub fn new(underscore_prefix: &'static str) -> Self {
        Self {
            issued: HashSet::new(),
            underscore_prefix,
        }
    }

    /// Marks a name as taken without issuing it.
    pub fn reserve(&mut self, name: impl Into<String>) {
        self.issued.insert(name.into());
    }

    pub fn is_issued(&self, name: &str) -> bool {
        self.issued.contains(name)
    }

    pub fn name(&mut self, raw: &str) -> String {
        let mut value = raw
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_")
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
            .collect::<String>();

        if value.is_empty() {
            value.push('_');
        }

        if value.starts_with(|c: char| c.is_ascii_digit()) {
            value.insert(0, '_');
        }

        if value.starts_with("__") || (value.starts_with('_') && value.ends_with('_')) {
            value.insert_str(0, self.underscore_prefix);
        }

        let base = value.clone();
        let mut suffix = 2;

        while self.issued.contains(&value) {
            value = format!("{base}_{suffix}");
            suffix += 1;
        }

        self.issued.insert(value.clone());

        value
    }
}
