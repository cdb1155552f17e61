//! Documents, domain identity, and error types for TextGlass.
//!
//! This crate provides:
//! - [`Document`] - The generic decoded-document value every layer consumes
//! - [`DomainId`] and [`DocumentHeader`] - Domain identity carried by documents
//! - [`Error`] - Rich error types with context
//! - Persistent collections ([`DocVec`], [`DocMap`])
//!
//! With the `json` feature, documents convert to and from `serde_json` values.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod collections;
pub mod document;
pub mod domain;
pub mod error;
#[cfg(feature = "json")]
pub mod json;

pub use collections::{DocMap, DocVec};
pub use document::{DocArray, DocObject, Document};
pub use domain::{DocumentHeader, DocumentKind, DomainId};
pub use error::{Error, ErrorContext, ErrorKind, Result};
