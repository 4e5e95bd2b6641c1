//! restree-graph — the typed object-graph model served by restree.
//!
//! Nodes are records (named members with declared types and per-member
//! defaults), fixed sequences, growable lists, scalar-keyed maps, scalar
//! leaves, and typed Null placeholders. The crate also carries the leaf
//! components the resource layer is built from: record introspection, the
//! uniform container adapter, and scalar value coercion.
//!
//! # Example
//!
//! ```
//! use restree_graph::{Node, ScalarType, Shape, Type};
//!
//! let shape = Shape::builder("Point")
//!     .field("x", Type::Scalar(ScalarType::I32))
//!     .field("y", Type::Scalar(ScalarType::I32))
//!     .build();
//!
//! let mut node = shape.instantiate();
//! if let Node::Record(record) = &mut node {
//!     record.set("x", 5.into()).unwrap();
//!     assert_eq!(record.get("x").unwrap(), &Node::from(5));
//! }
//! ```

pub mod coerce;
pub mod container;
pub mod error;
pub mod node;
pub mod types;

pub use container::{ContainerMut, ContainerRef};
pub use error::GraphError;
pub use node::{ListNode, MapNode, Node, Record, Scalar, SequenceNode};
pub use types::{Field, ScalarType, Shape, ShapeBuilder, ShapeRef, Type};
