//! Parameter codes and their human-readable labels.

use crate::acquisition::error::AcquisitionError;
use log::warn;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// An ordered, duplicate-free, non-empty list of parameter codes (e.g. `T2M`).
///
/// Codes are upper-cased; repeated codes keep their first position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSet(Vec<String>);

impl ParameterSet {
    /// # Errors
    ///
    /// Returns [`AcquisitionError::NoParameters`] for an empty input and
    /// [`AcquisitionError::InvalidParameter`] for a code that is not a
    /// letters/digits/underscore token.
    pub fn new<I, S>(codes: I) -> Result<Self, AcquisitionError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for code in codes {
            let code = code.into().trim().to_ascii_uppercase();
            let well_formed = !code.is_empty()
                && code
                    .chars()
                    .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_');
            if !well_formed {
                return Err(AcquisitionError::InvalidParameter(code));
            }
            if unique.contains(&code) {
                warn!("Dropping duplicate parameter code {}", code);
                continue;
            }
            unique.push(code);
        }
        if unique.is_empty() {
            return Err(AcquisitionError::NoParameters);
        }
        Ok(Self(unique))
    }

    pub fn codes(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.0.iter().any(|c| c == code)
    }

    /// Comma-joined codes, as the service expects them in the query string.
    pub fn joined(&self) -> String {
        self.0.join(",")
    }
}

impl fmt::Display for ParameterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.joined())
    }
}

/// Maps parameter codes to display labels, in insertion order.
///
/// Codes without an entry pass through unchanged, so a partial map is fine.
/// The serialized form is a plain JSON object, and its key order is kept:
/// the default parameter list of [`AidWeatherConfig`](crate::AidWeatherConfig)
/// is taken from it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamingMap {
    entries: Vec<(String, String)>,
}

impl NamingMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the label for `code`.
    pub fn insert(&mut self, code: impl Into<String>, label: impl Into<String>) {
        let code = code.into();
        let label = label.into();
        match self.entries.iter_mut().find(|(c, _)| *c == code) {
            Some(entry) => entry.1 = label,
            None => self.entries.push((code, label)),
        }
    }

    pub fn get(&self, code: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(c, _)| c == code)
            .map(|(_, label)| label.as_str())
    }

    /// The label for `code`, or `code` itself when it has none.
    pub fn label<'a>(&'a self, code: &'a str) -> &'a str {
        self.get(code).unwrap_or(code)
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(c, _)| c.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(c, l)| (c.as_str(), l.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for NamingMap {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = NamingMap::new();
        for (code, label) in iter {
            map.insert(code, label);
        }
        map
    }
}

impl Serialize for NamingMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (code, label) in &self.entries {
            map.serialize_entry(code, label)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for NamingMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct NamingMapVisitor;

        impl<'de> Visitor<'de> for NamingMapVisitor {
            type Value = NamingMap;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of parameter codes to labels")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<NamingMap, A::Error> {
                let mut map = NamingMap::new();
                while let Some((code, label)) = access.next_entry::<String, String>()? {
                    map.insert(code, label);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(NamingMapVisitor)
    }
}
