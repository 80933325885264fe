//! Converts between raw `meta` tags and the friendly nested mapping.
//!
//! Each `meta` element is a `{name, content}` attribute pair. Names may
//! be namespace-prefixed, like `calibre:timestamp`. The friendly mapping
//! groups them by namespace, with bare names under `defaults`:
//!
//! ```json
//! { "calibre": { "timestamp": "2019-05-30T12:00:00+00:00" } }
//! ```
//!
//! Content decodes as JSON where it parses as JSON, and passes through
//! as a plain string where it doesn't.

use opf_metadata_types::fields::MetaTags;
use serde_json::Value;

use crate::{
    opf::case::{camel_case, snake_case},
    xml::{Element, split_namespace},
};

/// Folds `meta` elements into the friendly nested mapping.
///
/// Elements missing a `name` or `content` attribute are skipped with a
/// warning.
pub(crate) fn meta_to_tags(elements: &[Element]) -> MetaTags {
    let mut tags = MetaTags::new();

    for element in elements {
        let (Some(name), Some(content)) = (element.attr("name"), element.attr("content"))
        else {
            log::warn!("Skipping a `meta` tag without both `name` and `content`.");
            continue;
        };

        let (namespace, attr) = match split_namespace(name) {
            Some((namespace, attr)) => (namespace.to_string(), camel_case(attr)),
            None => ("defaults".to_string(), camel_case(name)),
        };

        let value = serde_json::from_str(content)
            .unwrap_or_else(|_| Value::String(content.to_string()));

        tags.entry(namespace).or_default().insert(attr, value);
    }

    tags
}

/// Unfolds the friendly nested mapping back into `meta` elements.
pub(crate) fn tags_to_meta(tags: &MetaTags) -> Vec<Element> {
    let mut elements = Vec::new();

    for (namespace, attrs) in tags {
        let prefix = if namespace == "defaults" {
            String::new()
        } else {
            format!("{namespace}:")
        };

        for (attr, value) in attrs {
            let content = match value {
                // plain strings pass through without JSON quoting
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };

            let mut element = Element::new("meta");
            element.set_attr("name", format!("{prefix}{}", snake_case(attr)));
            element.set_attr("content", content);
            elements.push(element);
        }
    }

    elements
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::{meta_to_tags, tags_to_meta};
    use crate::{util::logger, xml::Element};

    fn meta(name: &str, content: &str) -> Element {
        let mut element = Element::new("meta");
        element.set_attr("name", name);
        element.set_attr("content", content);
        element
    }

    #[test]
    fn groups_tags_by_namespace() {
        logger();

        let tags = meta_to_tags(&[
            meta("calibre:timestamp", "2019-05-30T12:00:00+00:00"),
            meta("calibre:author_link_map", r#"{"Dan Abnett": ""}"#),
            meta("cover", "cover-image"),
        ]);

        assert_eq!(
            tags["calibre"]["timestamp"],
            Value::String("2019-05-30T12:00:00+00:00".to_string()),
        );
        assert_eq!(tags["calibre"]["authorLinkMap"], json!({ "Dan Abnett": "" }));
        assert_eq!(
            tags["defaults"]["cover"],
            Value::String("cover-image".to_string()),
        );
    }

    #[test]
    fn skips_malformed_tags() {
        logger();

        let mut nameless = Element::new("meta");
        nameless.set_attr("content", "orphaned");

        let tags = meta_to_tags(&[nameless, meta("calibre:rating", "8")]);

        assert_eq!(tags.len(), 1);
        assert_eq!(tags["calibre"]["rating"], json!(8));
    }

    #[test]
    fn unfolds_back_to_meta_elements() {
        logger();

        let tags = meta_to_tags(&[
            meta("calibre:author_link_map", r#"{"Dan Abnett":""}"#),
            meta("calibre:series_index", "1.0"),
            meta("cover", "cover-image"),
        ]);
        let elements = tags_to_meta(&tags);

        // `calibre` sorts before `defaults`
        assert_eq!(elements[0].attr("name"), Some("calibre:author_link_map"));
        assert_eq!(elements[0].attr("content"), Some(r#"{"Dan Abnett":""}"#));
        assert_eq!(elements[1].attr("name"), Some("calibre:series_index"));
        assert_eq!(elements[1].attr("content"), Some("1.0"));
        assert_eq!(elements[2].attr("name"), Some("cover"));
        assert_eq!(elements[2].attr("content"), Some("cover-image"));
    }
}
