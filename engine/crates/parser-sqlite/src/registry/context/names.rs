use std::collections::HashSet;

/// Issues unique field and argument names within one object or argument list,
/// converting them to camelCase when configured.
#[derive(Debug, Clone, Default)]
pub(crate) struct FieldNamer {
    issued: HashSet<String>,
    camelcase: bool,
}

impl FieldNamer {
    pub(crate) fn new(camelcase: bool) -> Self {
        Self {
            issued: HashSet::new(),
            camelcase,
        }
    }

    /// Marks a name as taken.
    pub(crate) fn reserve(&mut self, name: &str) {
        self.issued.insert(name.to_string());
    }

    /// A conversion that is invalid or already taken keeps the original name, and
    /// a taken original gets a numeric suffix.
    pub(crate) fn name(&mut self, snake: &str) -> String {
        let converted = self
            .camelcase
            .then(|| camel_case(snake))
            .filter(|name| is_valid_name(name) && !self.issued.contains(name));

        let base = converted.unwrap_or_else(|| snake.to_string());
        let mut name = base.clone();
        let mut suffix = 2;

        while self.issued.contains(&name) {
            name = format!("{base}_{suffix}");
            suffix += 1;
        }

        self.issued.insert(name.clone());

        name
    }
}

/// `first_second` becomes `firstSecond`. Every component after the first is
/// capitalized and lowercased, an empty component keeps its underscore.
pub(crate) fn camel_case(snake: &str) -> String {
    let mut components = snake.split('_');
    let mut result = components.next().unwrap_or_default().to_string();

    for component in components {
        let mut chars = component.chars();

        match chars.next() {
            Some(first) => {
                result.extend(first.to_uppercase());
                result.push_str(&chars.as_str().to_lowercase());
            }
            None => result.push('_'),
        }
    }

    result
}

fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();

    let valid_start = chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_');

    valid_start && !name.starts_with("__") && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
