use crate::Annotation;
use indexmap::IndexMap;
use serde::Deserialize;
use serde::Serialize;
use std::fmt;

/// A value produced by parsing an annotation argument.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum AnnotationValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Array(AnnotationArray),
    Annotation(Box<Annotation>),
}

impl AnnotationValue {
    /// Name of the value's runtime type as used in type-mismatch
    /// diagnostics and `@var` declarations.
    pub fn type_name(&self) -> &'static str {
        match self {
            AnnotationValue::Null => "null",
            AnnotationValue::Bool(_) => "boolean",
            AnnotationValue::Int(_) => "integer",
            AnnotationValue::Float(_) => "double",
            AnnotationValue::String(_) => "string",
            AnnotationValue::Array(_) => "array",
            AnnotationValue::Annotation(_) => "object",
        }
    }

    /// Describes the value for "but got ..." diagnostics.
    pub fn describe(&self) -> String {
        match self {
            AnnotationValue::Annotation(annot) => {
                format!("an instance of {}", annot.type_name())
            },
            AnnotationValue::Null => "null".to_string(),
            other => format!("{} {}", other.type_name(), other),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, AnnotationValue::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AnnotationValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            AnnotationValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            AnnotationValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AnnotationValue::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&AnnotationArray> {
        match self {
            AnnotationValue::Array(arr) => Some(arr),
            _ => None,
        }
    }

    pub fn as_annotation(&self) -> Option<&Annotation> {
        match self {
            AnnotationValue::Annotation(annot) => Some(annot),
            _ => None,
        }
    }
}

impl fmt::Display for AnnotationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnnotationValue::Null => write!(f, "null"),
            AnnotationValue::Bool(b) => write!(f, "{b}"),
            AnnotationValue::Int(i) => write!(f, "{i}"),
            AnnotationValue::Float(x) => write!(f, "{x:?}"),
            AnnotationValue::String(s) => {
                write!(f, "\"{}\"", s.replace('"', "\"\""))
            },
            AnnotationValue::Array(arr) => write!(f, "{arr}"),
            AnnotationValue::Annotation(annot) => write!(f, "{annot}"),
        }
    }
}

impl From<bool> for AnnotationValue {
    fn from(value: bool) -> Self {
        AnnotationValue::Bool(value)
    }
}

impl From<i64> for AnnotationValue {
    fn from(value: i64) -> Self {
        AnnotationValue::Int(value)
    }
}

impl From<f64> for AnnotationValue {
    fn from(value: f64) -> Self {
        AnnotationValue::Float(value)
    }
}

impl From<&str> for AnnotationValue {
    fn from(value: &str) -> Self {
        AnnotationValue::String(value.to_string())
    }
}

impl From<String> for AnnotationValue {
    fn from(value: String) -> Self {
        AnnotationValue::String(value)
    }
}

impl From<AnnotationArray> for AnnotationValue {
    fn from(value: AnnotationArray) -> Self {
        AnnotationValue::Array(value)
    }
}

impl From<Annotation> for AnnotationValue {
    fn from(value: Annotation) -> Self {
        AnnotationValue::Annotation(Box::new(value))
    }
}

/// Key of an [`AnnotationArray`] entry.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum ArrayKey {
    Int(i64),
    String(String),
}

impl ArrayKey {
    /// Builds a key from string text. Text that is the canonical decimal
    /// form of an integer (`"7"`, `"-3"`, but not `"07"` or `"+3"`) becomes
    /// an integer key.
    pub fn from_text(text: &str) -> Self {
        match text.parse::<i64>() {
            Ok(i) if i.to_string() == text => ArrayKey::Int(i),
            _ => ArrayKey::String(text.to_string()),
        }
    }
}

impl fmt::Display for ArrayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArrayKey::Int(i) => write!(f, "{i}"),
            ArrayKey::String(s) => write!(f, "\"{}\"", s.replace('"', "\"\"")),
        }
    }
}

/// An ordered array value, as written with `{...}` braces.
///
/// Entries keep insertion order. Entries without an explicit key get the
/// next integer key: one past the largest integer key used so far (or `0`).
/// Assigning to an existing key replaces the value in place.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct AnnotationArray {
    entries: IndexMap<ArrayKey, AnnotationValue>,
    next_index: i64,
}

impl AnnotationArray {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a value under the next integer key.
    ///
    /// Once key `i64::MAX` is taken there is no next key and the value is
    /// discarded; use [`try_push`](Self::try_push) where that matters.
    pub fn push(&mut self, value: impl Into<AnnotationValue>) {
        let _ = self.try_push(value);
    }

    /// Appends a value under the next integer key and returns that key.
    ///
    /// Hands the value back if key `i64::MAX` is already taken, leaving the
    /// array unchanged.
    pub fn try_push(
        &mut self,
        value: impl Into<AnnotationValue>,
    ) -> Result<ArrayKey, AnnotationValue> {
        let value = value.into();
        let key = ArrayKey::Int(self.next_index);
        // `next_index` only collides with a used key after saturating.
        if self.entries.contains_key(&key) {
            return Err(value);
        }
        self.insert(key.clone(), value);
        Ok(key)
    }

    /// Sets the value stored under `key`.
    pub fn insert(&mut self, key: ArrayKey, value: impl Into<AnnotationValue>) {
        if let ArrayKey::Int(i) = key
            && i >= self.next_index
        {
            self.next_index = i.saturating_add(1);
        }
        self.entries.insert(key, value.into());
    }

    pub fn get(&self, key: &ArrayKey) -> Option<&AnnotationValue> {
        self.entries.get(key)
    }

    /// Returns the value at position `index` in insertion order.
    pub fn get_index(&self, index: usize) -> Option<&AnnotationValue> {
        self.entries.get_index(index).map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if the keys are exactly `0..len` in order.
    pub fn is_list(&self) -> bool {
        self.entries
            .keys()
            .enumerate()
            .all(|(idx, key)| *key == ArrayKey::Int(idx as i64))
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, ArrayKey, AnnotationValue> {
        self.entries.iter()
    }

    pub fn values(&self) -> indexmap::map::Values<'_, ArrayKey, AnnotationValue> {
        self.entries.values()
    }
}

impl<V: Into<AnnotationValue>> FromIterator<V> for AnnotationArray {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        let mut arr = AnnotationArray::new();
        for value in iter {
            arr.push(value);
        }
        arr
    }
}

impl<'a> IntoIterator for &'a AnnotationArray {
    type Item = (&'a ArrayKey, &'a AnnotationValue);
    type IntoIter = indexmap::map::Iter<'a, ArrayKey, AnnotationValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl fmt::Display for AnnotationArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let list = self.is_list();
        write!(f, "{{")?;
        for (idx, (key, value)) in self.entries.iter().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            if list {
                write!(f, "{value}")?;
            } else {
                write!(f, "{key}={value}")?;
            }
        }
        write!(f, "}}")
    }
}
