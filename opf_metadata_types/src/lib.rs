//! # `opf_metadata_types`
//!
//! Shared types for the [`opf_metadata`] crate: the MARC relator role table
//! used by OPF contributor attributes, and the "friendly" value types that
//! metadata fields are exposed as.
//!
//! These live in their own crate so the vocabulary tables can be reused
//! without pulling in the XML machinery.
//!
//! [`opf_metadata`]: https://docs.rs/opf_metadata

#![forbid(unsafe_code)]

pub mod fields;
pub mod roles;
