use std::sync::Arc;

use crate::xml::XmlError;

/// This is an error that happened while reading, editing, or writing OPF
/// package metadata.
#[derive(Clone, Debug)]
pub enum OpfError {
    /// A field that only takes a string was given something else.
    InvalidFieldType {
        /// The friendly name of the field, like `title`.
        field: String,
    },

    /// A list field was given a list of the wrong shape, or not a list at
    /// all.
    InvalidFieldList {
        /// The friendly name of the field, like `authors`.
        field: String,

        /// What the field accepts.
        expected: &'static str,
    },

    /// No identifier in the given set carried a truthy `id` marker.
    MissingUniqueIdentifier,

    /// More than one identifier in the given set carried a truthy `id`
    /// marker.
    MultipleUniqueIdentifiers {
        /// How many identifiers were marked.
        count: usize,
    },

    /// A contributor's `opf:role` code wasn't in the role table.
    UnknownRoleCode {
        /// The code as it appeared in the document.
        code: String,
    },

    /// The document's `package` element has no `metadata` element.
    MissingMetadataElement,

    /// The underlying XML document couldn't be parsed or rendered.
    Xml(XmlError),

    /// An OPF file couldn't be read from, or written to, disk.
    Io(
        // note: `Arc` allows us to impl `Clone`
        Arc<std::io::Error>,
    ),
}

impl core::fmt::Display for OpfError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            OpfError::InvalidFieldType { field } => {
                write!(f, "Field `{field}` must be set with a string!")
            }

            OpfError::InvalidFieldList { field, expected } => {
                write!(f, "Field `{field}` must be set with {expected}!")
            }

            OpfError::MissingUniqueIdentifier => f.write_str(
                "At least one identifier must carry a truthy `id` marker.",
            ),

            OpfError::MultipleUniqueIdentifiers { count } => write!(
                f,
                "Only one identifier may carry the `id` marker, but {count} of them did.",
            ),

            OpfError::UnknownRoleCode { code } => {
                write!(f, "Encountered a role code outside the role table. code: `{code}`")
            }

            OpfError::MissingMetadataElement => f.write_str(
                "The `package` element has no `metadata` element, which is required.",
            ),

            OpfError::Xml(e) => {
                write!(f, "Encountered error in the underlying XML. err: {e}")
            }

            OpfError::Io(e) => {
                write!(f, "Encountered I/O error. err: {e}")
            }
        }
    }
}

impl core::error::Error for OpfError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OpfError::Xml(e) => Some(e),
            OpfError::Io(e) => Some(e.as_ref()),

            OpfError::InvalidFieldType { .. }
            | OpfError::InvalidFieldList { .. }
            | OpfError::MissingUniqueIdentifier
            | OpfError::MultipleUniqueIdentifiers { .. }
            | OpfError::UnknownRoleCode { .. }
            | OpfError::MissingMetadataElement => None,
        }
    }
}

impl From<XmlError> for OpfError {
    fn from(value: XmlError) -> Self {
        OpfError::Xml(value)
    }
}

impl From<std::io::Error> for OpfError {
    fn from(value: std::io::Error) -> Self {
        OpfError::Io(Arc::new(value))
    }
}
