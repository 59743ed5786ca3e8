//! `kdl-canon` is a document-oriented parser and canonicalizing printer
//! for the [KDL Document Language](https://kdl.dev) 1.0.0. It parses
//! KDL text into a plain semantic tree — nodes with arguments,
//! properties, and children — and prints that tree back out under a
//! configurable policy, rather than preserving the original formatting
//! byte-for-byte. If you want format-preserving edits instead, check
//! out [`kdl`](https://crates.io/crates/kdl).
//!
//! ## Example
//!
//! ```rust
//! use kdl_canon::KdlDocument;
//!
//! let doc: KdlDocument = r#"
//! hello 1 2 3
//!
//! // Comment
//! world prop="value" {
//!     child 1
//!     child 2
//! }
//! "#.parse().expect("failed to parse KDL");
//!
//! assert_eq!(doc["hello"].args().len(), 3);
//! assert_eq!(doc["world"]["prop"].to_string(), "\"value\"");
//!
//! // Printing is canonical: tab indentation, `\n` terminators, numbers
//! // and strings kept in the shape they were written in.
//! assert_eq!(
//!     doc.print(),
//!     "hello 1 2 3\nworld prop=\"value\" {\n\tchild 1\n\tchild 2\n}\n"
//! );
//! ```
//!
//! ## Native values
//!
//! By default, untagged values come back as host-native values
//! ([`KdlNative`]), and the reserved KDL tags (`(u8)`, `(date)`,
//! `(url)`, `(uuid)`, `(regex)`, `(base64)`, …) convert to real Rust
//! types:
//!
//! ```rust
//! use kdl_canon::{KdlDocument, KdlNative};
//!
//! let doc: KdlDocument = r#"when (date)"2021-02-03""#.parse().unwrap();
//! assert!(matches!(
//!     doc["when"].args()[0].as_native(),
//!     Some(KdlNative::Date(_))
//! ));
//! ```
//!
//! Both conversions can be turned off (see [`ParseConfig`]), in which
//! case every value comes back as its literal [`KdlValue`] shape, ready
//! to be reprinted exactly. User conversion hooks can be registered per
//! tag or per node key; see [`ParseConfig::add_value_converter`] and
//! [`ParseConfig::add_node_converter`].
//!
//! ## Error Reporting
//!
//! [`KdlParseError`] implements [`miette::Diagnostic`] and carries the
//! 1-indexed line and column of the failure, so it can be used to
//! display detailed, pretty-printed diagnostic messages:
//!
//! ```no_run
//! fn main() -> miette::Result<()> {
//!     "foo 1.".parse::<kdl_canon::KdlDocument>()?;
//!     Ok(())
//! }
//! ```

#![deny(missing_debug_implementations, nonstandard_style)]
#![warn(missing_docs, rust_2018_idioms, unreachable_pub)]
#![doc(html_favicon_url = "https://kdl.dev/favicon.ico")]
#![doc(html_logo_url = "https://kdl.dev/logo.svg")]

pub use config::*;
pub use document::*;
pub use error::*;
pub use key::*;
pub use native::*;
pub use node::*;
pub use parser::{parse, Parser};
pub use value::*;

mod config;
mod convert;
mod document;
mod error;
mod key;
mod lex;
mod native;
mod node;
mod parser;
mod value;
