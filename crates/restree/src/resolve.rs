//! Resource resolution: walk a slash path from the root node.
//!
//! Walking alternates between record introspection and the container
//! adapter, one segment at a time. A Null intermediate fails as NotFound;
//! resolution never vivifies. The read side ([`node`]) yields the
//! addressed node itself; the write side ([`slot`]) stops one segment
//! short and yields the mutable parent plus the child key, since every
//! mutation acts on the parent's slot.

use restree_graph::{ContainerMut, ContainerRef, GraphError, Node};

use crate::error::Error;
use crate::path;

/// Resolve a path to the addressed node (read side). Out-of-range indexes
/// and missing members/keys surface as NotFound here; key coercion
/// failures keep their own diagnostics.
pub fn node<'a>(root: &'a Node, segments: &[&str]) -> Result<&'a Node, Error> {
    let mut current = root;
    for (i, segment) in segments.iter().enumerate() {
        if current.is_null() {
            return Err(Error::NotFound(path::joined(&segments[..=i])));
        }
        current = step(current, segment).map_err(|e| locate(e, &segments[..=i]))?;
    }
    Ok(current)
}

/// A writable slot: the resolved parent plus the child key.
pub struct Slot<'a> {
    pub parent: &'a mut Node,
    pub key: &'a str,
}

/// Resolve every segment but the last (write side). The parent is never
/// Scalar or Null; a path reaching below either is NotFound.
pub fn slot<'a>(root: &'a mut Node, prefix: &[&str], key: &'a str) -> Result<Slot<'a>, Error> {
    let mut current = root;
    for (i, segment) in prefix.iter().enumerate() {
        if current.is_null() {
            return Err(Error::NotFound(path::joined(&prefix[..=i])));
        }
        current = step_mut(current, segment).map_err(|e| locate(e, &prefix[..=i]))?;
    }
    match current {
        Node::Null(_) | Node::Scalar(_) => Err(Error::NotFound(full_path(prefix, key))),
        parent => Ok(Slot { parent, key }),
    }
}

fn step<'a>(parent: &'a Node, segment: &str) -> Result<&'a Node, Error> {
    if let Some(container) = ContainerRef::of(parent) {
        return Ok(container.get(segment)?);
    }
    match parent {
        Node::Record(record) => {
            if !path::is_member_name(segment) {
                return Err(Error::MalformedSegment(segment.to_string()));
            }
            Ok(record.get(segment)?)
        }
        // nothing lives below a scalar
        _ => Err(Error::NotFound(String::new())),
    }
}

fn step_mut<'a>(parent: &'a mut Node, segment: &str) -> Result<&'a mut Node, Error> {
    match parent {
        Node::Record(record) => {
            if !path::is_member_name(segment) {
                return Err(Error::MalformedSegment(segment.to_string()));
            }
            Ok(record.get_mut(segment)?)
        }
        other => match ContainerMut::of(other) {
            Some(container) => Ok(container.get_mut(segment)?),
            None => Err(Error::NotFound(String::new())),
        },
    }
}

/// Fold NotFound-class failures into a located NotFound; everything else
/// keeps its diagnostic.
fn locate(err: Error, prefix: &[&str]) -> Error {
    match err {
        Error::NotFound(_) => Error::NotFound(path::joined(prefix)),
        Error::Graph(g)
            if g.is_not_found() || matches!(g, GraphError::IndexOutOfRange { .. }) =>
        {
            Error::NotFound(path::joined(prefix))
        }
        other => other,
    }
}

fn full_path(prefix: &[&str], key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}/{}", path::joined(prefix), key)
    }
}
