//! Immutable configuration handed to every component at initialization.

use std::collections::BTreeMap;

/// A BCP-47-ish locale tag, kept opaque — the core never inspects it beyond
/// passing it along to message-formatting collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locale(String);

impl Locale {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Locale {
    fn default() -> Self {
        Locale::new("en")
    }
}

/// A locale plus a string-to-string mapping. Recognized keys are per
/// component; the core reserves none and performs no schema validation. A
/// missing key must behave identically to an empty mapping, so callers
/// should prefer [`Configuration::get`] with an explicit default over
/// asserting presence.
#[derive(Debug, Clone, Default)]
pub struct Configuration {
    locale: Locale,
    values: BTreeMap<String, String>,
}

impl Configuration {
    pub fn new(locale: Locale, values: BTreeMap<String, String>) -> Self {
        Self { locale, values }
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }
}
