//! Friendly value types for OPF metadata fields.
//!
//! OPF elements carry their interesting data in a mix of text content and
//! namespaced attributes. These types are the flat, human-usable view of
//! that: attribute namespaces are already split apart, role codes are already
//! translated, and the awkward parts of the wire format don't leak through.

use std::collections::BTreeMap;

use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{self, MapAccess, Visitor},
    ser::SerializeMap,
};

/// Free-form `meta` tags, keyed by namespace, then by camel-cased attribute.
///
/// The leaves are JSON values: Calibre and friends stuff JSON into `content`
/// attributes, and keeping the decoded value here means it round-trips
/// without the library caring what's inside.
pub type MetaTags = BTreeMap<String, BTreeMap<String, serde_json::Value>>;

/// One metadata field's value, plus whatever attributes it carried.
///
/// `opf:`-namespaced attributes are first-class here: the three standard ones
/// (`role`, `file-as`, `scheme`) get typed fields, and any others land in
/// [`FieldValue::opf`]. Attributes from other namespaces nest under their
/// prefix in [`FieldValue::namespaced`], and bare attributes (like `id`) go
/// to [`FieldValue::defaults`].
///
/// All attribute names are camel-cased on the way in (`file-as` becomes
/// `fileAs` in serialized form) and kebab-cased on the way back out.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldValue {
    /// The element's text content.
    pub value: String,

    /// The contributor's role, as a human-readable name like `Author`.
    ///
    /// On the wire this is an `opf:role` relator code.
    pub role: Option<String>,

    /// The sort-friendly form of the value, from `opf:file-as`.
    pub file_as: Option<String>,

    /// The scheme qualifying the value, from `opf:scheme`.
    pub scheme: Option<String>,

    /// Other `opf:`-namespaced attributes, camel-cased.
    pub opf: BTreeMap<String, String>,

    /// Attributes from any other namespace, keyed by prefix, then by
    /// camel-cased attribute name.
    pub namespaced: BTreeMap<String, BTreeMap<String, String>>,

    /// Bare (un-namespaced) attributes, camel-cased.
    pub defaults: BTreeMap<String, String>,
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue {
            value: value.to_string(),
            ..FieldValue::default()
        }
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue {
            value,
            ..FieldValue::default()
        }
    }
}

// serialized form hoists everything to the top level, like the friendly
// objects users pass around: `{"value": "..", "role": "..", "calibre": {..},
// "defaults": {..}}`. a plain derive would bury `opf` under its own key.
impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("value", &self.value)?;
        if let Some(role) = &self.role {
            map.serialize_entry("role", role)?;
        }
        if let Some(file_as) = &self.file_as {
            map.serialize_entry("fileAs", file_as)?;
        }
        if let Some(scheme) = &self.scheme {
            map.serialize_entry("scheme", scheme)?;
        }
        for (key, value) in &self.opf {
            map.serialize_entry(key, value)?;
        }
        for (namespace, attrs) in &self.namespaced {
            map.serialize_entry(namespace, attrs)?;
        }
        if !self.defaults.is_empty() {
            map.serialize_entry("defaults", &self.defaults)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FieldValueVisitor;

        impl<'de> Visitor<'de> for FieldValueVisitor {
            type Value = FieldValue;

            fn expecting(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
                f.write_str("a string, or a map with a string `value`")
            }

            // bare strings are fine: they're a value with no attributes
            fn visit_str<E: de::Error>(self, v: &str) -> Result<FieldValue, E> {
                Ok(FieldValue::from(v))
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<FieldValue, A::Error> {
                let mut field = FieldValue::default();
                let mut value: Option<String> = None;

                while let Some(key) = access.next_key::<String>()? {
                    match key.as_str() {
                        "value" => value = Some(access.next_value()?),
                        "role" => field.role = Some(access.next_value()?),
                        "fileAs" => field.file_as = Some(access.next_value()?),
                        "scheme" => field.scheme = Some(access.next_value()?),
                        "defaults" => field.defaults = access.next_value()?,

                        // anything else is either another hoisted `opf`
                        // attribute (a string) or a nested namespace object
                        _ => match access.next_value::<serde_json::Value>()? {
                            serde_json::Value::String(s) => {
                                field.opf.insert(key, s);
                            }
                            serde_json::Value::Object(entries) => {
                                let mut attrs: BTreeMap<String, String> = BTreeMap::new();
                                for (attr, val) in entries {
                                    match val {
                                        serde_json::Value::String(s) => {
                                            attrs.insert(attr, s);
                                        }
                                        _ => {
                                            return Err(de::Error::custom(format!(
                                                "namespace `{key}` attribute `{attr}` \
                                                must be a string"
                                            )));
                                        }
                                    }
                                }
                                field.namespaced.insert(key, attrs);
                            }
                            _ => {
                                return Err(de::Error::custom(format!(
                                    "attribute `{key}` must be a string or a \
                                    map of strings"
                                )));
                            }
                        },
                    }
                }

                field.value = value.ok_or_else(|| de::Error::missing_field("value"))?;
                Ok(field)
            }
        }

        deserializer.deserialize_any(FieldValueVisitor)
    }
}

/// One `dc:identifier` entry.
///
/// A book usually carries several of these (an ISBN, a Calibre ID, a UUID),
/// each qualified by a `scheme`. Exactly one of them is the book's canonical
/// ID: that one holds the document's unique-identifier pointer in
/// [`Identifier::id`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Identifier {
    /// What kind of identifier this is (`ISBN`, `uuid`, `calibre`, ...).
    ///
    /// Empty when the element carried no `opf:scheme` attribute.
    pub scheme: String,

    /// The identifier itself.
    pub value: String,

    /// The unique-identifier marker.
    ///
    /// Present on at most one entry per document. When set, its value is the
    /// document's unique-identifier pointer, conventionally `{scheme}_id`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl Identifier {
    /// Makes a plain identifier with no unique marker.
    pub fn new(scheme: impl Into<String>, value: impl Into<String>) -> Self {
        Identifier {
            scheme: scheme.into(),
            value: value.into(),
            id: None,
        }
    }

    /// Makes an identifier marked as the document's unique one.
    ///
    /// The marker value follows the `{scheme}_id` convention.
    ///
    /// ```
    /// use opf_metadata_types::fields::Identifier;
    ///
    /// let id = Identifier::unique("ISBN", "9780553293357");
    /// assert_eq!(id.id.as_deref(), Some("ISBN_id"));
    /// ```
    pub fn unique(scheme: impl Into<String>, value: impl Into<String>) -> Self {
        let scheme = scheme.into();
        let id = format!("{scheme}_id");
        Identifier {
            scheme,
            value: value.into(),
            id: Some(id),
        }
    }

    /// Whether this entry carries the unique-identifier marker.
    ///
    /// An empty marker doesn't count.
    pub fn is_unique(&self) -> bool {
        self.id.as_deref().is_some_and(|id| !id.is_empty())
    }
}

impl<'de> Deserialize<'de> for Identifier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct IdentifierVisitor;

        impl<'de> Visitor<'de> for IdentifierVisitor {
            type Value = Identifier;

            fn expecting(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
                f.write_str("a map with `scheme` and `value` strings")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Identifier, A::Error> {
                let mut scheme: Option<String> = None;
                let mut value: Option<String> = None;
                let mut id: Option<String> = None;
                let mut marked = false;

                while let Some(key) = access.next_key::<String>()? {
                    match key.as_str() {
                        "scheme" => scheme = Some(access.next_value()?),
                        "value" => value = Some(access.next_value()?),

                        // the marker only needs to be "truthy": patch objects
                        // often carry `"id": true` and let the library pick
                        // the actual pointer value
                        "id" => match access.next_value::<serde_json::Value>()? {
                            serde_json::Value::Null | serde_json::Value::Bool(false) => {}
                            serde_json::Value::Bool(true) => marked = true,
                            serde_json::Value::String(s) => {
                                if !s.is_empty() {
                                    id = Some(s);
                                }
                            }
                            _ => {
                                return Err(de::Error::custom(
                                    "identifier `id` must be a string or boolean",
                                ));
                            }
                        },

                        other => {
                            return Err(de::Error::unknown_field(
                                other,
                                &["scheme", "value", "id"],
                            ));
                        }
                    }
                }

                let scheme = scheme.ok_or_else(|| de::Error::missing_field("scheme"))?;
                let value = value.ok_or_else(|| de::Error::missing_field("value"))?;
                if marked && id.is_none() {
                    id = Some(format!("{scheme}_id"));
                }
                Ok(Identifier { scheme, value, id })
            }
        }

        deserializer.deserialize_map(IdentifierVisitor)
    }
}
