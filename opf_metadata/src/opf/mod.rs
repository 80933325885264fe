//! OPF package metadata handling.
//!
//! Reads and writes the `.opf` (XML) package format used by e-book
//! tools like Calibre, exposing the Dublin Core metadata through
//! friendly accessors on the [`Opf`] model.

pub mod date;

pub(crate) mod case;
pub(crate) mod error;
pub(crate) mod meta_tags;
pub(crate) mod transform;

pub use error::OpfError;

use std::{collections::BTreeMap, mem, path::Path};

use chrono::{DateTime, Utc};
use opf_metadata_types::fields::{FieldValue, Identifier, MetaTags};
use parking_lot::RwLock;
use serde_json::Value;

use crate::{
    opf::{
        date::{DateEvent, format_date, parse_date},
        meta_tags::{meta_to_tags, tags_to_meta},
        transform::{field_from_element, field_to_element},
    },
    xml::{self, Attribute, Element},
};

/// An OPF package document, with friendly accessors over its metadata.
///
/// The model keeps the whole parsed document around, so the parts it
/// doesn't understand (like the manifest and spine) survive a
/// read/edit/write pass untouched.
#[derive(Debug)]
pub struct Opf {
    /// The `package` element, with stand-ins where `metadata` and
    /// `guide` sat.
    document: Element,

    /// The `metadata` element all the `dc:` fields live in.
    metadata: Element,

    /// The `guide` element, which holds the cover reference.
    guide: Option<Element>,

    /// Friendly view of the `meta` tags, built on first access.
    meta_tags: RwLock<Option<MetaTags>>,
}

impl Opf {
    /// Creates an empty OPF document, with the standard namespaces
    /// declared and no metadata fields.
    pub fn new() -> Self {
        let mut document = Element::new("package");
        document.set_attr("xmlns", "http://www.idpf.org/2007/opf");
        document.set_attr("version", "2.0");

        let mut metadata = Element::new("metadata");
        metadata.set_attr("xmlns:dc", "http://purl.org/dc/elements/1.1/");
        metadata.set_attr("xmlns:opf", "http://www.idpf.org/2007/opf");

        Opf {
            document,
            metadata,
            guide: None,
            meta_tags: RwLock::new(None),
        }
    }

    /// Wraps an already-parsed document.
    ///
    /// Fails when the document isn't a `package` carrying at least one
    /// `metadata` element.
    pub fn from_document(mut document: Element) -> Result<Self, OpfError> {
        if document.name != "package" {
            return Err(OpfError::MissingMetadataElement);
        }

        // swap stand-ins into the tree so both elements keep their spot
        // among the package's other children
        let metadata = match document.children_mut("metadata") {
            Some(children) if !children.is_empty() => {
                mem::replace(&mut children[0], Element::new("metadata"))
            }
            _ => return Err(OpfError::MissingMetadataElement),
        };

        let guide = document.children_mut("guide").and_then(|children| {
            children
                .first_mut()
                .map(|first| mem::replace(first, Element::new("guide")))
        });

        Ok(Opf {
            document,
            metadata,
            guide,
            meta_tags: RwLock::new(None),
        })
    }

    /// Renders the whole package back to an XML string.
    ///
    /// Anything in the document beyond the metadata and guide is written
    /// back as it was parsed.
    pub fn to_xml(&self) -> Result<String, OpfError> {
        let mut metadata = self.metadata.clone();
        if let Some(tags) = self.meta_tags.read().as_ref() {
            metadata.set_children("meta", tags_to_meta(tags));
        }

        // swap the real elements back over their stand-ins
        let mut document = self.document.clone();
        match document.children_mut("metadata") {
            Some(children) => children[0] = metadata,
            None => document.set_children("metadata", vec![metadata]),
        }
        if let Some(guide) = &self.guide {
            match document.children_mut("guide") {
                Some(children) => children[0] = guide.clone(),
                None => document.set_children("guide", vec![guide.clone()]),
            }
        }

        Ok(xml::render(&document)?)
    }

    /// The `unique-identifier` attribute on the `package` element. It
    /// points at the element `id` of the unique `dc:identifier`.
    pub fn unique_identifier_key(&self) -> Option<&str> {
        self.document.attr("unique-identifier")
    }

    /// Points the package at a different element `id`.
    pub fn set_unique_identifier_key(&mut self, key: impl Into<String>) {
        self.document.set_attr("unique-identifier", key);
    }

    /// Every `dc:identifier` entry.
    ///
    /// The entry whose element `id` matches the package's
    /// `unique-identifier` attribute comes back with its marker set.
    pub fn identifiers(&self) -> Vec<Identifier> {
        let unique_key = self.document.attr("unique-identifier");

        self.metadata
            .children("dc:identifier")
            .unwrap_or_default()
            .iter()
            .map(|element| {
                let mut identifier = Identifier::new(
                    element.attr("opf:scheme").unwrap_or_default(),
                    element.text(),
                );
                if unique_key.is_some() && element.attr("id") == unique_key {
                    identifier.id = unique_key.map(String::from);
                }
                identifier
            })
            .collect()
    }

    /// Replaces every `dc:identifier` entry.
    ///
    /// Exactly one identifier must be marked as unique. Its scheme names
    /// the package's `unique-identifier` pointer, and its element gets a
    /// matching `id` attribute.
    pub fn set_identifiers(&mut self, identifiers: &[Identifier]) -> Result<(), OpfError> {
        let marked: Vec<usize> = identifiers
            .iter()
            .enumerate()
            .filter(|(_, identifier)| identifier.is_unique())
            .map(|(index, _)| index)
            .collect();

        let unique_index = match marked.as_slice() {
            [] => return Err(OpfError::MissingUniqueIdentifier),
            [index] => *index,
            many => {
                return Err(OpfError::MultipleUniqueIdentifiers { count: many.len() });
            }
        };

        // the pointer is derived from the unique entry's scheme, no
        // matter what its marker held
        let unique_key = format!("{}_id", identifiers[unique_index].scheme);

        let elements = identifiers
            .iter()
            .enumerate()
            .map(|(index, identifier)| {
                let mut element =
                    Element::with_text("dc:identifier", identifier.value.clone());
                element.set_attr("opf:scheme", identifier.scheme.clone());
                if index == unique_index {
                    element.set_attr("id", unique_key.clone());
                }
                element
            })
            .collect();

        self.metadata.set_children("dc:identifier", elements);
        self.set_unique_identifier_key(unique_key);

        Ok(())
    }

    /// The first `dc:date` in the document, parsed.
    ///
    /// `None` when the field is absent, or when its value doesn't parse
    /// as a date.
    pub fn date(&self) -> Option<DateTime<Utc>> {
        self.metadata
            .first_child("dc:date")
            .and_then(|element| parse_date(element.text()))
    }

    /// Replaces every `dc:date` with the given date.
    ///
    /// Event dates are dropped as well. Use [`Opf::set_date_event`] to
    /// keep them.
    pub fn set_date(&mut self, date: DateTime<Utc>) {
        let element = Element::with_text("dc:date", format_date(&date));
        self.metadata.set_children("dc:date", vec![element]);
    }

    /// Every dated lifecycle event, like the publication date.
    ///
    /// These are the `dc:date` entries carrying an `opf:event`
    /// attribute. Entries whose value doesn't parse as a date are
    /// skipped.
    pub fn date_events(&self) -> BTreeMap<DateEvent, DateTime<Utc>> {
        self.metadata
            .children("dc:date")
            .unwrap_or_default()
            .iter()
            .filter_map(|element| {
                let event = DateEvent::from_code(element.attr("opf:event")?)?;
                Some((event, parse_date(element.text())?))
            })
            .collect()
    }

    /// Sets one dated lifecycle event, leaving every other `dc:date`
    /// entry alone.
    pub fn set_date_event(&mut self, event: DateEvent, date: DateTime<Utc>) {
        if let Some(element) = self.metadata.children_mut("dc:date").and_then(|children| {
            children
                .iter_mut()
                .find(|element| element.attr("opf:event") == Some(event.code()))
        }) {
            element.text = Some(format_date(&date));
            return;
        }

        let mut element = Element::with_text("dc:date", format_date(&date));
        element.set_attr("opf:event", event.code());
        self.metadata.push_child(element);
    }

    /// The cover image's location, from the guide's `cover` reference.
    pub fn cover(&self) -> Option<&str> {
        self.guide
            .as_ref()?
            .children("reference")?
            .iter()
            .find(|reference| is_cover_reference(reference))?
            .attr("href")
    }

    /// Points the guide's `cover` reference at a new location, creating
    /// the guide along the way when the document has none.
    pub fn set_cover(&mut self, href: impl Into<String>) {
        let guide = self.guide.get_or_insert_with(|| Element::new("guide"));

        if let Some(reference) = guide.children_mut("reference").and_then(|children| {
            children
                .iter_mut()
                .find(|reference| is_cover_reference(reference))
        }) {
            reference.set_attr("href", href);
            return;
        }

        let mut reference = Element::new("reference");
        reference.set_attr("type", "cover");
        reference.set_attr("title", "Cover");
        reference.set_attr("href", href);
        guide.push_child(reference);
    }

    /// Friendly view of the document's `meta` tags, grouped by
    /// namespace.
    ///
    /// The view is built from the document on first access, then cached.
    /// Once built, the cached view is what [`Opf::to_xml`] writes back.
    pub fn meta(&self) -> MetaTags {
        if let Some(tags) = self.meta_tags.read().as_ref() {
            return tags.clone();
        }

        let tags = meta_to_tags(self.metadata.children("meta").unwrap_or_default());
        *self.meta_tags.write() = Some(tags.clone());
        tags
    }

    /// Replaces the friendly `meta` view outright.
    pub fn set_meta(&mut self, tags: MetaTags) {
        *self.meta_tags.write() = Some(tags);
    }

    /// Applies a JSON patch, field by field.
    ///
    /// Each key maps onto one of the setters on this type, with the
    /// value coerced to what that setter takes. Keys with no matching
    /// setter are skipped with a warning and collected into the returned
    /// list.
    pub fn merge(&mut self, patch: &Value) -> Result<Vec<String>, OpfError> {
        let Value::Object(fields) = patch else {
            return Err(OpfError::InvalidFieldList {
                field: "patch".to_string(),
                expected: "a JSON object of fields to set",
            });
        };

        let mut skipped = Vec::new();

        for (key, value) in fields {
            match key.as_str() {
                "title" => self.set_title(coerce_string(key, value)?),
                "description" => self.set_description(coerce_string(key, value)?),
                "type" => self.set_type(coerce_string(key, value)?),
                "format" => self.set_format(coerce_string(key, value)?),
                "coverage" => self.set_coverage(coerce_string(key, value)?),
                "rights" => self.set_rights(coerce_string(key, value)?),
                "source" => self.set_source(coerce_string(key, value)?),

                "titles" => self.set_titles(coerce_strings(key, value)?),
                "subjects" => self.set_subjects(coerce_strings(key, value)?),
                "publishers" => self.set_publishers(coerce_strings(key, value)?),
                "languages" => self.set_languages(coerce_strings(key, value)?),

                "authors" => self.set_authors(coerce_fields(key, value)?),
                "contributors" => self.set_contributors(coerce_fields(key, value)?),

                "identifiers" => {
                    let identifiers: Vec<Identifier> = serde_json::from_value(value.clone())
                        .map_err(|_| OpfError::InvalidFieldList {
                            field: key.clone(),
                            expected: "an array of objects with `scheme` and `value` keys",
                        })?;
                    self.set_identifiers(&identifiers)?;
                }

                "uniqueIdentifierKey" => {
                    self.set_unique_identifier_key(coerce_string(key, value)?);
                }

                "date" => {
                    let raw = coerce_string(key, value)?;
                    let date = parse_date(&raw).ok_or_else(|| OpfError::InvalidFieldType {
                        field: key.clone(),
                    })?;
                    self.set_date(date);
                }

                "cover" => self.set_cover(coerce_string(key, value)?),

                "meta" => {
                    let tags: MetaTags = serde_json::from_value(value.clone()).map_err(|_| {
                        OpfError::InvalidFieldType { field: key.clone() }
                    })?;
                    self.set_meta(tags);
                }

                _ => {
                    log::warn!("Can't set `{key}`. No setter is associated with that key.");
                    skipped.push(key.clone());
                }
            }
        }

        Ok(skipped)
    }
}

impl Default for Opf {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Opf {
    fn clone(&self) -> Self {
        Opf {
            document: self.document.clone(),
            metadata: self.metadata.clone(),
            guide: self.guide.clone(),
            meta_tags: RwLock::new(self.meta_tags.read().clone()),
        }
    }
}

/// Generates the getter and setter for a Dublin Core field holding one
/// string.
macro_rules! simple_dublin_core_accessors {
    ($(($getter:ident, $setter:ident, $element_name:literal, $friendly:literal)),+ $(,)?) => {
        impl Opf {
            $(
                #[doc = concat!("The `", $element_name, "` field: ", $friendly, ".")]
                ///
                /// The first element speaks for the field when the
                /// document has several.
                pub fn $getter(&self) -> Option<&str> {
                    self.metadata.first_child($element_name).map(Element::text)
                }

                #[doc = concat!("Sets the `", $element_name, "` field: ", $friendly, ".")]
                ///
                /// Only the first element is replaced when the document
                /// has several.
                pub fn $setter(&mut self, value: impl Into<String>) {
                    let element = Element::with_text($element_name, value.into());
                    match self.metadata.children_mut($element_name) {
                        Some(children) if !children.is_empty() => children[0] = element,
                        _ => self.metadata.set_children($element_name, vec![element]),
                    }
                }
            )+
        }
    };
}

simple_dublin_core_accessors![
    (title, set_title, "dc:title", "the work's main title"),
    (description, set_description, "dc:description", "a synopsis of the work"),
    (r#type, set_type, "dc:type", "the nature or genre of the work"),
    (format, set_format, "dc:format", "the work's media type or dimensions"),
    (coverage, set_coverage, "dc:coverage", "the extent or scope of the work"),
    (rights, set_rights, "dc:rights", "the rights held in and over the work"),
    (source, set_source, "dc:source", "the resource the work derives from"),
];

/// Generates the getter and setter for a repeatable Dublin Core field
/// holding plain strings.
macro_rules! list_dublin_core_accessors {
    ($(($getter:ident, $setter:ident, $element_name:literal, $friendly:literal)),+ $(,)?) => {
        impl Opf {
            $(
                #[doc = concat!("Every `", $element_name, "` entry: ", $friendly, ".")]
                pub fn $getter(&self) -> Vec<String> {
                    self.metadata
                        .children($element_name)
                        .unwrap_or_default()
                        .iter()
                        .map(|element| element.text().to_string())
                        .collect()
                }

                #[doc = concat!("Replaces every `", $element_name, "` entry: ", $friendly, ".")]
                ///
                /// An empty list removes the field entirely.
                pub fn $setter<I>(&mut self, values: I)
                where
                    I: IntoIterator,
                    I::Item: Into<String>,
                {
                    let elements = values
                        .into_iter()
                        .map(|value| Element::with_text($element_name, value.into()))
                        .collect();
                    self.metadata.set_children($element_name, elements);
                }
            )+
        }
    };
}

list_dublin_core_accessors![
    (titles, set_titles, "dc:title", "every title, in document order"),
    (subjects, set_subjects, "dc:subject", "keywords describing the work"),
    (publishers, set_publishers, "dc:publisher", "who made the work available"),
    (languages, set_languages, "dc:language", "language tags for the work"),
];

/// Generates the getter and setter for a repeatable Dublin Core field
/// holding people, with a default `opf:role`.
macro_rules! contributor_accessors {
    ($(($getter:ident, $setter:ident, $element_name:literal, $default_role:literal, $friendly:literal)),+ $(,)?) => {
        impl Opf {
            $(
                #[doc = concat!("Every `", $element_name, "` entry: ", $friendly, ".")]
                ///
                /// Fails when an entry carries an `opf:role` code outside
                /// the role table.
                pub fn $getter(&self) -> Result<Vec<FieldValue>, OpfError> {
                    self.metadata
                        .children($element_name)
                        .unwrap_or_default()
                        .iter()
                        .map(field_from_element)
                        .collect()
                }

                #[doc = concat!("Replaces every `", $element_name, "` entry: ", $friendly, ".")]
                ///
                #[doc = concat!("Entries without a role of their own get `", $default_role, "`.")]
                pub fn $setter<I>(&mut self, values: I)
                where
                    I: IntoIterator,
                    I::Item: Into<FieldValue>,
                {
                    let defaults = [Attribute::new("opf:role", $default_role)];
                    let elements = values
                        .into_iter()
                        .map(|value| field_to_element($element_name, &value.into(), &defaults))
                        .collect();
                    self.metadata.set_children($element_name, elements);
                }
            )+
        }
    };
}

contributor_accessors![
    (authors, set_authors, "dc:creator", "aut", "the people responsible for the work"),
    (contributors, set_contributors, "dc:contributor", "clb", "the people who helped it along"),
];

/// Whether a guide reference points at the cover.
fn is_cover_reference(reference: &Element) -> bool {
    reference
        .attr("type")
        .is_some_and(|kind| kind.eq_ignore_ascii_case("cover"))
}

/// Pulls a string out of a patch value.
fn coerce_string(field: &str, value: &Value) -> Result<String, OpfError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        _ => Err(OpfError::InvalidFieldType {
            field: field.to_string(),
        }),
    }
}

/// Pulls a list of strings out of a patch value.
fn coerce_strings(field: &str, value: &Value) -> Result<Vec<String>, OpfError> {
    serde_json::from_value(value.clone()).map_err(|_| OpfError::InvalidFieldList {
        field: field.to_string(),
        expected: "an array of strings",
    })
}

/// Pulls a list of friendly field values out of a patch value.
fn coerce_fields(field: &str, value: &Value) -> Result<Vec<FieldValue>, OpfError> {
    serde_json::from_value(value.clone()).map_err(|_| OpfError::InvalidFieldList {
        field: field.to_string(),
        expected: "an array of strings and/or objects with a `value` key",
    })
}

/// Reads and parses the OPF file at `path`.
pub fn read_opf(path: impl AsRef<Path>) -> Result<Opf, OpfError> {
    let raw = std::fs::read_to_string(path)?;
    let document = xml::parse(&raw)?;
    Opf::from_document(document)
}

/// Renders `opf` and writes it to the file at `path`.
pub fn write_opf(path: impl AsRef<Path>, opf: &Opf) -> Result<(), OpfError> {
    std::fs::write(path, opf.to_xml()?)?;
    Ok(())
}
