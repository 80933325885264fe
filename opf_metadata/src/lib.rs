//! # `opf_metadata`
//!
//! A library to read, edit, and write OPF 2.0 package metadata, the XML
//! format that e-book tools like Calibre keep beside each book.
//!
//! The entry points are [`Opf::new`] for a fresh document,
//! [`xml::parse`] plus [`Opf::from_document`] for XML you already hold
//! as a string, and [`read_opf`]/[`write_opf`] for files on disk.
//!
//! ```
//! use opf_metadata::{Identifier, Opf};
//!
//! let mut opf = Opf::new();
//! opf.set_title("Hyperion");
//! opf.set_authors(["Dan Simmons"]);
//! opf.set_identifiers(&[Identifier::unique("ISBN", "9780553283686")])?;
//!
//! assert_eq!(opf.unique_identifier_key(), Some("ISBN_id"));
//! assert!(
//!     opf.to_xml()?
//!         .contains(r#"<dc:creator opf:role="aut">Dan Simmons</dc:creator>"#)
//! );
//! # Ok::<(), opf_metadata::OpfError>(())
//! ```
//!
//! Anything the model doesn't understand, like the package's manifest
//! and spine, survives a read/edit/write pass untouched.
//!
//! ## License
//!
//! This project is dual-licensed under either the Apache License 2.0 or
//! the MIT License at your option.

#![forbid(unsafe_code)]

pub mod opf;
pub mod xml;

pub use opf_metadata_types::{
    fields::{FieldValue, Identifier, MetaTags},
    roles::Role,
};

pub use crate::opf::{Opf, OpfError, date::DateEvent, read_opf, write_opf};

/// Internal utility methods.
pub(crate) mod util {
    /// Helper function to initialize the logger for testing.
    #[cfg(test)]
    pub fn logger() {
        _ = env_logger::builder()
            .is_test(true)
            .filter_level(log::LevelFilter::max())
            .format_file(true)
            .format_line_number(true)
            .try_init();
    }
}
