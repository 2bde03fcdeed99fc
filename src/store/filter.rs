use serde_json::Value as JsonValue;

/// How a single field is compared against the requested text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Match {
    /// Case-insensitive substring. The text is taken literally, never as a pattern.
    Contains(String),
    /// Byte-for-byte equality.
    Exact(String),
}

impl Match {
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Match::Contains(needle) => value.to_lowercase().contains(&needle.to_lowercase()),
            Match::Exact(expected) => value == expected,
        }
    }

    /// RE2 pattern equivalent to a `Contains` match, for stores that filter by regex.
    pub fn case_insensitive_pattern(needle: &str) -> String {
        format!("(?i){}", regex::escape(needle))
    }
}

/// One field-level condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub field: &'static str,
    pub matcher: Match,
}

/// Conjunction of conditions. An empty filter selects every document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    conditions: Vec<Condition>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(mut self, field: &'static str, text: impl Into<String>) -> Self {
        self.conditions.push(Condition {
            field,
            matcher: Match::Contains(text.into()),
        });
        self
    }

    pub fn exact(mut self, field: &'static str, text: impl Into<String>) -> Self {
        self.conditions.push(Condition {
            field,
            matcher: Match::Exact(text.into()),
        });
        self
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Evaluate against a document body. Missing or non-string fields never match.
    pub fn matches(&self, document: &JsonValue) -> bool {
        self.conditions.iter().all(|condition| {
            document
                .get(condition.field)
                .and_then(JsonValue::as_str)
                .is_some_and(|value| condition.matcher.matches(value))
        })
    }
}
