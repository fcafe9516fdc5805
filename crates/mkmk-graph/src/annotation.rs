use indexmap::IndexMap;
use smol_str::SmolStr;
use std::fmt;

/// The value of a single edge annotation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AnnotationValue {
    Bool(bool),
    Str(SmolStr),
}

impl From<bool> for AnnotationValue {
    fn from(value: bool) -> Self {
        AnnotationValue::Bool(value)
    }
}

impl From<&str> for AnnotationValue {
    fn from(value: &str) -> Self {
        AnnotationValue::Str(SmolStr::new(value))
    }
}

impl From<String> for AnnotationValue {
    fn from(value: String) -> Self {
        AnnotationValue::Str(SmolStr::from(value))
    }
}

impl fmt::Display for AnnotationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnnotationValue::Bool(b) => write!(f, "{}", b),
            AnnotationValue::Str(s) => f.write_str(s),
        }
    }
}

/// Key/value annotations on an edge, also used as edge queries.
///
/// Keys keep their insertion order so rendered labels are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotations {
    entries: IndexMap<SmolStr, AnnotationValue>,
}

impl Annotations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, key: impl AsRef<str>, value: impl Into<AnnotationValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl AsRef<str>, value: impl Into<AnnotationValue>) {
        self.entries.insert(SmolStr::new(key.as_ref()), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&AnnotationValue> {
        self.entries.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AnnotationValue)> + '_ {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Annotations
where
    K: AsRef<str>,
    V: Into<AnnotationValue>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut result = Annotations::new();
        for (key, value) in iter {
            result.insert(key, value);
        }
        result
    }
}
