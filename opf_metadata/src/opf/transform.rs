//! Converts between raw `dc:` elements and friendly [`FieldValue`]s.
//!
//! The wire side is an element with namespaced attributes, like:
//!
//! ```xml
//! <dc:creator opf:role="aut" opf:file-as="Lem, Stanislaw">Stanislaw Lem</dc:creator>
//! ```
//!
//! The friendly side hoists `opf:` attributes to top-level keys, keeps
//! other namespaces grouped under their prefix, and tucks bare attributes
//! under `defaults`.

use opf_metadata_types::{fields::FieldValue, roles::Role};

use crate::{
    opf::{
        case::{camel_case, kebab_case},
        error::OpfError,
    },
    xml::{Attribute, Element},
};

/// Builds the friendly representation of one metadata element.
///
/// Fails when the element carries an `opf:role` code outside the role
/// table.
pub(crate) fn field_from_element(element: &Element) -> Result<FieldValue, OpfError> {
    let mut field = FieldValue::from(element.text());

    for attr in &element.attributes {
        match attr.namespace.as_deref() {
            // bare attributes pass through under `defaults`
            None => {
                field
                    .defaults
                    .insert(camel_case(&attr.name), attr.value.clone());
            }

            // `opf:` attributes are hoisted to the top level. `role` is
            // translated from its code to the role's name
            Some("opf") => match camel_case(&attr.name).as_str() {
                "role" => {
                    let role = Role::from_code(&attr.value).ok_or_else(|| {
                        OpfError::UnknownRoleCode {
                            code: attr.value.clone(),
                        }
                    })?;
                    field.role = Some(role.name().to_string());
                }
                "fileAs" => field.file_as = Some(attr.value.clone()),
                "scheme" => field.scheme = Some(attr.value.clone()),
                other => {
                    field.opf.insert(other.to_string(), attr.value.clone());
                }
            },

            // anything else nests under its namespace prefix
            Some(namespace) => {
                field
                    .namespaced
                    .entry(namespace.to_string())
                    .or_default()
                    .insert(camel_case(&attr.name), attr.value.clone());
            }
        }
    }

    Ok(field)
}

/// Builds one metadata element from its friendly representation.
///
/// `defaults` seeds the element's attributes, and attributes derived from
/// the field override them in place. A role name outside the role table
/// writes as `aut`.
pub(crate) fn field_to_element(
    name: &str,
    field: &FieldValue,
    defaults: &[Attribute],
) -> Element {
    let mut element = Element::with_text(name, field.value.clone());
    element.attributes = defaults.to_vec();

    if let Some(role_name) = &field.role {
        let code = Role::from_name(role_name).unwrap_or(Role::Author).code();
        element.set_attr("opf:role", code);
    }
    if let Some(file_as) = &field.file_as {
        element.set_attr("opf:file-as", file_as.clone());
    }
    if let Some(scheme) = &field.scheme {
        element.set_attr("opf:scheme", scheme.clone());
    }

    for (key, value) in &field.opf {
        element.set_attr(&format!("opf:{}", kebab_case(key)), value.clone());
    }
    for (namespace, attrs) in &field.namespaced {
        for (key, value) in attrs {
            element.set_attr(&format!("{namespace}:{}", kebab_case(key)), value.clone());
        }
    }
    for (key, value) in &field.defaults {
        element.set_attr(&kebab_case(key), value.clone());
    }

    element
}
