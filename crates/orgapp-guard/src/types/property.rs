//! Free-form application properties.
//!
//! Applications carry a list of string key/value properties. Keys are matched
//! case-insensitively and boolean values are parsed leniently: only a value
//! equal to `"true"` (ignoring case and surrounding whitespace) is true.

use serde::{Deserialize, Serialize};

/// Property key marking an application as a fragment of a main application.
pub const IS_FRAGMENT_APP: &str = "isFragmentApp";

/// A single named application property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationProperty {
    /// Property name.
    pub name: String,

    /// Raw property value.
    pub value: String,

    /// Optional label shown by management consoles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl ApplicationProperty {
    /// Creates a property without a display name.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            display_name: None,
        }
    }

    /// Returns `true` if this property has the given name, ignoring case.
    #[must_use]
    pub fn has_name(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// Parses the value as a boolean; anything other than `true` is `false`.
    #[must_use]
    pub fn as_bool(&self) -> bool {
        parse_bool(&self.value)
    }
}

/// Ordered bag of application properties.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyBag(Vec<ApplicationProperty>);

impl PropertyBag {
    /// Creates an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a property, matching the name case-insensitively.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.0.iter_mut().find(|p| p.has_name(&name)) {
            Some(existing) => existing.value = value,
            None => self.0.push(ApplicationProperty::new(name, value)),
        }
    }

    /// Builder form of [`PropertyBag::set`].
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    /// Returns the first property with the given name, ignoring case.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ApplicationProperty> {
        self.0.iter().find(|p| p.has_name(name))
    }

    /// Returns `true` if any property with the given name parses as `true`.
    ///
    /// Absent keys and unparseable values read as `false`.
    #[must_use]
    pub fn flag(&self, name: &str) -> bool {
        self.0.iter().any(|p| p.has_name(name) && p.as_bool())
    }

    /// Returns `true` if the bag marks its application as a fragment.
    #[must_use]
    pub fn is_fragment(&self) -> bool {
        self.flag(IS_FRAGMENT_APP)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ApplicationProperty> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<ApplicationProperty> for PropertyBag {
    fn from_iter<I: IntoIterator<Item = ApplicationProperty>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Lenient boolean parse: `"true"` in any case is true, everything else false.
#[must_use]
pub fn parse_bool(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}
