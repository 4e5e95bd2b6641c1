//! Request dispatcher: maps verbs onto resolved resources.
//!
//! One [`Service`] owns one graph root for the process lifetime. Each
//! request locks the graph for its whole resolve + mutate + serialize
//! span; request cost is mutation-bound, so a single coarse lock is the
//! whole concurrency story.

use std::fmt;
use std::sync::Mutex;

use serde_json::Value;

use restree_graph::{coerce, ContainerMut, ContainerRef, GraphError, Node, Type};

use crate::codec;
use crate::error::Error;
use crate::merge;
use crate::path;
use crate::resolve;
use crate::token::ValueTokens;

// ── Verbs ─────────────────────────────────────────────────────────────────

/// Request verbs, mapped from the usual HTTP method names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Read,
    Replace,
    Append,
    Delete,
    Merge,
}

impl Verb {
    /// Parse an HTTP method name (or a bare verb name) case-insensitively.
    pub fn parse(method: &str) -> Result<Self, Error> {
        match method.to_ascii_uppercase().as_str() {
            "GET" | "READ" => Ok(Verb::Read),
            "PUT" | "REPLACE" => Ok(Verb::Replace),
            "POST" | "APPEND" => Ok(Verb::Append),
            "DELETE" => Ok(Verb::Delete),
            "PATCH" | "MERGE" => Ok(Verb::Merge),
            _ => Err(Error::UnknownVerb(method.to_string())),
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Verb::Read => "read",
            Verb::Replace => "replace",
            Verb::Append => "append",
            Verb::Delete => "delete",
            Verb::Merge => "merge",
        };
        f.write_str(name)
    }
}

// ── Responses ─────────────────────────────────────────────────────────────

/// Transport-agnostic response status classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    NotFound,
    Conflict,
    Error,
}

impl Status {
    /// Conventional HTTP status code, for transport glue.
    pub fn http_code(self) -> u16 {
        match self {
            Status::Ok => 200,
            Status::NotFound => 404,
            Status::Conflict => 409,
            Status::Error => 500,
        }
    }

    fn of(err: &Error) -> Self {
        match err {
            Error::NotFound(_) | Error::AbsentMergeTarget(_) => Status::NotFound,
            Error::Conflict(_) => Status::Conflict,
            Error::Graph(g) if g.is_not_found() => Status::NotFound,
            _ => Status::Error,
        }
    }
}

/// The outcome of one dispatched request: a status class plus a JSON body
/// for reads, an empty body for mutations, or a diagnostic for failures.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: Status,
    pub body: String,
}

// ── Service ───────────────────────────────────────────────────────────────

/// Serves one object graph as a resource tree.
pub struct Service {
    root: Mutex<Node>,
}

impl Service {
    pub fn new(root: Node) -> Self {
        Service {
            root: Mutex::new(root),
        }
    }

    /// Handle one request, mapping failures onto response statuses.
    pub fn handle(&self, method: &str, path: &str, body: &str) -> Response {
        let outcome = Verb::parse(method).and_then(|verb| self.request(verb, path, body));
        match outcome {
            Ok(body) => Response {
                status: Status::Ok,
                body,
            },
            Err(e) => Response {
                status: Status::of(&e),
                body: e.to_string(),
            },
        }
    }

    /// Run one verb against the graph, returning the response body.
    pub fn request(&self, verb: Verb, path: &str, body: &str) -> Result<String, Error> {
        let mut root = self.root.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let segments = path::segments(path);
        match verb {
            Verb::Read => {
                let node = resolve::node(&root, &segments)?;
                Ok(codec::encode_string(node))
            }
            Verb::Replace => {
                let (key, prefix) = split_slot(&segments, "replace")?;
                let slot = resolve::slot(&mut root, prefix, key)?;
                let declared = child_type(slot.parent, slot.key)?;
                let value = body_value(&declared, body)?;
                set_child(slot.parent, slot.key, value)?;
                Ok(String::new())
            }
            Verb::Append => {
                append(&mut root, &segments, body)?;
                Ok(String::new())
            }
            Verb::Delete => {
                let (key, prefix) = split_slot(&segments, "delete")?;
                let slot = resolve::slot(&mut root, prefix, key)?;
                delete_child(slot.parent, slot.key)?;
                Ok(String::new())
            }
            Verb::Merge => {
                merge_into(&mut root, &segments, body)?;
                Ok(String::new())
            }
        }
    }

    /// Clone of the current graph, for debug glue and assertions.
    pub fn snapshot(&self) -> Node {
        self.root
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

// ── Operations ────────────────────────────────────────────────────────────

/// Append-or-create: containers grow, Null children are created from the
/// body, anything else already populated is a conflict.
fn append(root: &mut Node, segments: &[&str], body: &str) -> Result<(), Error> {
    let (key, prefix) = match segments.split_last() {
        Some((key, prefix)) => (*key, prefix),
        // the whole graph: only a container root can take an append
        None => return append_root(root, body),
    };
    let slot = resolve::slot(root, prefix, key)?;

    enum Action {
        Grow(Type),
        Create,
    }
    let action = match child_peek(slot.parent, slot.key)? {
        Some(child) if child.is_container() => {
            let container = ContainerRef::of(child).ok_or_else(|| conflict(segments))?;
            Action::Grow(container.element_type().clone())
        }
        Some(child) if child.is_null() => Action::Create,
        None => Action::Create,
        Some(_) => return Err(conflict(segments)),
    };

    match action {
        Action::Grow(elem) => {
            let value = body_value(&elem, body)?;
            let child = child_mut(slot.parent, slot.key)?;
            match ContainerMut::of(child) {
                Some(mut container) => Ok(container.append(value)?),
                None => Err(conflict(segments)),
            }
        }
        Action::Create => {
            let declared = child_type(slot.parent, slot.key)?;
            let value = body_value(&declared, body)?;
            set_child(slot.parent, slot.key, value)
        }
    }
}

fn append_root(root: &mut Node, body: &str) -> Result<(), Error> {
    match ContainerMut::of(root) {
        Some(mut container) => {
            let elem = container.element_type().clone();
            let value = body_value(&elem, body)?;
            Ok(container.append(value)?)
        }
        None => Err(Error::Conflict(String::new())),
    }
}

/// Merge requires an existing, non-Null child; the engine then mutates it
/// in place.
fn merge_into(root: &mut Node, segments: &[&str], body: &str) -> Result<(), Error> {
    let payload: Value = serde_json::from_str(body).map_err(|e| Error::Body(e.to_string()))?;
    let target = match segments.split_last() {
        None => root,
        Some((key, prefix)) => {
            let slot = resolve::slot(root, prefix, *key)?;
            child_mut(slot.parent, slot.key)?
        }
    };
    if target.is_null() {
        return Err(Error::AbsentMergeTarget(path::joined(segments)));
    }
    merge::apply(target, &mut ValueTokens::new(&payload))
}

// ── Child-slot helpers ────────────────────────────────────────────────────

/// Obtain the new value for replace/append: scalar slots parse the raw
/// body text (string slots take it verbatim), everything else decodes a
/// structured JSON payload against the declared type.
fn body_value(ty: &Type, body: &str) -> Result<Node, Error> {
    match ty {
        Type::Scalar(_) => Ok(Node::Scalar(coerce::parse_as(ty, body)?)),
        _ => {
            let value: Value =
                serde_json::from_str(body).map_err(|e| Error::Body(e.to_string()))?;
            codec::decode(ty, &value)
        }
    }
}

/// Declared type of the addressed slot: record member type or container
/// element type.
fn child_type(parent: &Node, key: &str) -> Result<Type, Error> {
    match parent {
        Node::Record(record) => {
            member_name(key)?;
            Ok(record.declared_type(key)?.clone())
        }
        other => match ContainerRef::of(other) {
            Some(container) => Ok(container.element_type().clone()),
            None => Err(Error::NotFound(key.to_string())),
        },
    }
}

/// Current child value; `None` when a map key is not yet present.
fn child_peek<'a>(parent: &'a Node, key: &str) -> Result<Option<&'a Node>, Error> {
    match parent {
        Node::Record(record) => {
            member_name(key)?;
            Ok(Some(record.get(key)?))
        }
        other => match ContainerRef::of(other) {
            Some(container) => match container.get(key) {
                Ok(child) => Ok(Some(child)),
                Err(GraphError::NoSuchKey(_)) => Ok(None),
                Err(e) => Err(e.into()),
            },
            None => Err(Error::NotFound(key.to_string())),
        },
    }
}

fn child_mut<'a>(parent: &'a mut Node, key: &str) -> Result<&'a mut Node, Error> {
    match parent {
        Node::Record(record) => {
            member_name(key)?;
            Ok(record.get_mut(key)?)
        }
        other => match ContainerMut::of(other) {
            Some(container) => Ok(container.get_mut(key)?),
            None => Err(Error::NotFound(key.to_string())),
        },
    }
}

/// Unconditionally set the parent's slot for `key`.
fn set_child(parent: &mut Node, key: &str, value: Node) -> Result<(), Error> {
    match parent {
        Node::Record(record) => {
            member_name(key)?;
            Ok(record.set(key, value)?)
        }
        other => match ContainerMut::of(other) {
            Some(mut container) => Ok(container.set(key, value)?),
            None => Err(Error::NotFound(key.to_string())),
        },
    }
}

/// Delete: containers drop the keyed entry, record members reset to a
/// typed Null.
fn delete_child(parent: &mut Node, key: &str) -> Result<(), Error> {
    match parent {
        Node::Record(record) => {
            member_name(key)?;
            Ok(record.clear(key)?)
        }
        other => match ContainerMut::of(other) {
            Some(mut container) => Ok(container.delete(key)?),
            None => Err(Error::NotFound(key.to_string())),
        },
    }
}

fn member_name(key: &str) -> Result<(), Error> {
    if path::is_member_name(key) {
        Ok(())
    } else {
        Err(Error::MalformedSegment(key.to_string()))
    }
}

fn split_slot<'s>(
    segments: &'s [&'s str],
    verb: &'static str,
) -> Result<(&'s str, &'s [&'s str]), Error> {
    match segments.split_last() {
        Some((key, prefix)) => Ok((*key, prefix)),
        None => Err(Error::RootSlot(verb)),
    }
}

fn conflict(segments: &[&str]) -> Error {
    Error::Conflict(path::joined(segments))
}
