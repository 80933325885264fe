use std::sync::Arc;

use quick_xml::{escape::EscapeError, events::attributes::AttrError};

/// This is an error that happened while reading or writing the raw XML.
#[derive(Clone, Debug)]
pub enum XmlError {
    /// `quick-xml` rejected the document.
    Parse(
        // note: `Arc` allows us to impl `Clone`
        Arc<quick_xml::Error>,
    ),

    /// An element carried a malformed attribute.
    Attribute(AttrError),

    /// Escaped content in the document didn't unescape cleanly.
    Escape(EscapeError),

    /// An element or attribute name wasn't valid UTF-8.
    NotUtf8(core::str::Utf8Error),

    /// The document held an entity reference we can't resolve.
    UnresolvedEntity(String),

    /// The document ended without a root element.
    NoRootElement,

    /// There was content outside the root element, where nothing may live.
    TrailingContent,

    /// Serializing the document failed while writing bytes out.
    Write(Arc<std::io::Error>),
}

impl core::fmt::Display for XmlError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            XmlError::Parse(e) => {
                write!(f, "Encountered error while parsing XML. err: {e}")
            }

            XmlError::Attribute(e) => {
                write!(f, "An element had a malformed attribute. err: {e}")
            }

            XmlError::Escape(e) => {
                write!(f, "Escaped content didn't unescape cleanly. err: {e}")
            }

            XmlError::NotUtf8(e) => {
                write!(f, "The XML contained invalid UTF-8. err: {e}")
            }

            XmlError::UnresolvedEntity(name) => {
                write!(f, "The entity reference `&{name};` isn't one we can resolve.")
            }

            XmlError::NoRootElement => {
                f.write_str("The document has no root element, which is required.")
            }

            XmlError::TrailingContent => {
                f.write_str("The document has content outside its root element.")
            }

            XmlError::Write(e) => {
                write!(f, "Encountered error while writing XML. err: {e}")
            }
        }
    }
}

impl core::error::Error for XmlError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            XmlError::Parse(e) => Some(e.as_ref()),
            XmlError::Attribute(e) => Some(e),
            XmlError::Escape(e) => Some(e),
            XmlError::NotUtf8(e) => Some(e),
            XmlError::Write(e) => Some(e.as_ref()),
            XmlError::UnresolvedEntity(_)
            | XmlError::NoRootElement
            | XmlError::TrailingContent => None,
        }
    }
}

impl From<quick_xml::Error> for XmlError {
    fn from(value: quick_xml::Error) -> Self {
        XmlError::Parse(value.into())
    }
}

impl From<AttrError> for XmlError {
    fn from(value: AttrError) -> Self {
        XmlError::Attribute(value)
    }
}

impl From<EscapeError> for XmlError {
    fn from(value: EscapeError) -> Self {
        XmlError::Escape(value)
    }
}

impl From<std::io::Error> for XmlError {
    fn from(value: std::io::Error) -> Self {
        XmlError::Write(value.into())
    }
}
