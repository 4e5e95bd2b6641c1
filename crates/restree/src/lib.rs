//! restree — expose an in-memory object graph as a navigable REST-style
//! resource tree.
//!
//! Any node reachable by a slash-delimited path can be read, replaced,
//! appended to, deleted, or partially merged via verb-style operations.
//! The graph model (records, containers, scalar coercion) lives in the
//! `restree-graph` crate; this crate adds the resource resolver, the
//! token-driven merge-patch engine, the structured value codec, and the
//! request dispatcher. Network transport stays outside: a [`Service`]
//! consumes `(method, path, body)` and produces `(status, body)`.
//!
//! # Example
//!
//! ```
//! use restree::{Service, Status};
//! use restree::graph::{ScalarType, Shape, Type};
//!
//! let shape = Shape::builder("Counter")
//!     .field("count", Type::Scalar(ScalarType::I32))
//!     .build();
//! let service = Service::new(shape.instantiate());
//!
//! assert_eq!(service.handle("PUT", "count", "5").status, Status::Ok);
//! assert_eq!(service.handle("GET", "count", "").body, "5");
//! ```

pub mod codec;
pub mod dispatch;
pub mod error;
pub mod merge;
pub mod path;
pub mod resolve;
pub mod token;

/// The object-graph model this crate serves.
pub use restree_graph as graph;

pub use dispatch::{Response, Service, Status, Verb};
pub use error::Error;
pub use token::{StreamError, Token, TokenSource, ValueTokens};
