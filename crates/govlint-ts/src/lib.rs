//! # govlint-ts
//!
//! Tree-sitter front-ends for govlint.
//!
//! Each adapter implements [`SyntaxAdapter`]: it parses one host language
//! and lowers the tree into the language-neutral `FileModel` from
//! `govlint-core`. Rule logic never touches host trees, so the two
//! front-ends share one semantic contract.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod adapter;
mod javascript;
mod python;

pub use adapter::{ParseError, SyntaxAdapter};
pub use javascript::JsAdapter;
pub use python::PythonAdapter;
