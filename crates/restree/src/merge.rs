//! Merge-patch engine: applies a token stream onto a live node.
//!
//! The engine is iterative with an explicit frame stack because the token
//! source is pull-style and shared across nested contexts: an enclosing
//! container must resume exactly where it paused once a nested value
//! completes. Each frame holds the detached enclosing container, the slot
//! where the in-progress child re-attaches, and the enclosing read mode.
//!
//! Records merge deeply: members not named in the stream keep their
//! values, and Null members are vivified (default-instantiated, then
//! assigned) before a nested write descends into them. Arrays are
//! append-only under merge; a StartArray under a property augments the
//! existing elements, it never replaces them.

use std::mem;

use serde_json::Value;

use restree_graph::{coerce, GraphError, Node, Scalar, Type};

use crate::error::Error;
use crate::token::{StreamError, Token, TokenSource};

// ── Frames ────────────────────────────────────────────────────────────────

/// Where a completed child re-attaches in its enclosing container.
enum Slot {
    Member(String),
    Entry(Scalar),
    Index(usize),
    Push,
}

/// Whether a frame consumes property/value pairs or bare elements.
#[derive(Clone, Copy, PartialEq)]
enum Mode {
    Object,
    Array,
}

/// One suspended enclosing container.
struct Frame {
    node: Node,
    slot: Slot,
    mode: Mode,
}

// ── Entry point ───────────────────────────────────────────────────────────

/// Apply a merge patch pulled from `tokens` onto `target`.
///
/// The stream must open with StartObject or StartArray and describe
/// exactly one value; anything after the matching close is a stream
/// error. The whole stream is staged against a copy of the target and
/// swapped in only when it applies cleanly, so a failing merge leaves the
/// target untouched.
///
/// The target itself must not be Null: patching an absent resource is a
/// distinct failure, not a vivification trigger.
pub fn apply<S: TokenSource>(target: &mut Node, tokens: &mut S) -> Result<(), Error> {
    if target.is_null() {
        return Err(Error::AbsentMergeTarget(String::new()));
    }
    let staged = run(target.clone(), tokens)?;
    *target = staged;
    Ok(())
}

fn run<S: TokenSource>(mut current: Node, tokens: &mut S) -> Result<Node, Error> {
    let mut stack: Vec<Frame> = Vec::new();
    let mut mode = match next(tokens)? {
        Token::StartObject => {
            object_target(&current)?;
            Mode::Object
        }
        Token::StartArray => {
            array_target(&current)?;
            Mode::Array
        }
        _ => return Err(StreamError::InvalidStart.into()),
    };

    loop {
        let token = next(tokens)?;
        match (mode, token) {
            (Mode::Object, Token::EndObject) | (Mode::Array, Token::EndArray) => {
                match stack.pop() {
                    Some(frame) => {
                        let child = mem::replace(&mut current, frame.node);
                        attach(&mut current, frame.slot, child)?;
                        mode = frame.mode;
                    }
                    None => break,
                }
            }
            (Mode::Object, Token::Property(name)) => match next(tokens)? {
                value @ (Token::Bool(_) | Token::Number(_) | Token::Str(_) | Token::Null) => {
                    assign(&mut current, &name, value)?;
                }
                Token::StartObject => {
                    descend_member(&mut current, &mut stack, mode, name, Mode::Object)?;
                    mode = Mode::Object;
                }
                Token::StartArray => {
                    descend_member(&mut current, &mut stack, mode, name, Mode::Array)?;
                    mode = Mode::Array;
                }
                other => return Err(StreamError::Unexpected(other.kind()).into()),
            },
            (Mode::Array, value @ (Token::Bool(_) | Token::Number(_) | Token::Str(_) | Token::Null)) => {
                push_element(&mut current, value)?;
            }
            (Mode::Array, Token::StartObject) => {
                descend_element(&mut current, &mut stack, mode, Mode::Object)?;
                mode = Mode::Object;
            }
            (Mode::Array, Token::StartArray) => {
                descend_element(&mut current, &mut stack, mode, Mode::Array)?;
                mode = Mode::Array;
            }
            (_, other) => return Err(StreamError::Unexpected(other.kind()).into()),
        }
    }

    if tokens.next_token().is_some() {
        return Err(StreamError::Trailing.into());
    }
    Ok(current)
}

fn next<S: TokenSource>(tokens: &mut S) -> Result<Token, Error> {
    tokens
        .next_token()
        .ok_or_else(|| StreamError::UnexpectedEnd.into())
}

// ── Target checks ─────────────────────────────────────────────────────────

/// An object frame can run over a record, a map, or a keyed list.
fn object_target(node: &Node) -> Result<(), Error> {
    match node {
        Node::Record(_) | Node::Map(_) | Node::List(_) => Ok(()),
        Node::Sequence(_) => {
            Err(GraphError::Unsupported("merge into a sequence".to_string()).into())
        }
        other => Err(GraphError::TypeMismatch {
            expected: "record, map, or list".to_string(),
            found: other.kind().to_string(),
        }
        .into()),
    }
}

/// An array frame can only run over a list; a sequence has no dynamic
/// append.
fn array_target(node: &Node) -> Result<(), Error> {
    match node {
        Node::List(_) => Ok(()),
        Node::Sequence(_) => {
            Err(GraphError::Unsupported("append on a sequence".to_string()).into())
        }
        other => Err(GraphError::TypeMismatch {
            expected: "list".to_string(),
            found: other.kind().to_string(),
        }
        .into()),
    }
}

// ── Object-frame steps ────────────────────────────────────────────────────

/// Assign a scalar or Null property value through the introspector, or
/// through the adapter keyed by property name when the target is itself a
/// map or list.
fn assign(current: &mut Node, name: &str, token: Token) -> Result<(), Error> {
    match current {
        Node::Record(record) => {
            let declared = record.declared_type(name)?.clone();
            let value = token_node(&declared, token)?;
            record.set(name, value)?;
            Ok(())
        }
        Node::Map(map) => {
            let value_ty = map.value_type().clone();
            let key = coerce::parse(map.key_type(), name)?;
            let value = token_node(&value_ty, token)?;
            map.insert(key, value)?;
            Ok(())
        }
        Node::List(list) => {
            let elem = list.element_type().clone();
            let index: usize = name
                .parse()
                .map_err(|_| GraphError::InvalidIndex(name.to_string()))?;
            let value = token_node(&elem, token)?;
            list.set(index, value)?;
            Ok(())
        }
        other => Err(GraphError::TypeMismatch {
            expected: "record, map, or list".to_string(),
            found: other.kind().to_string(),
        }
        .into()),
    }
}

/// Fetch the named child (vivifying a Null through the default factory),
/// validate it against the child frame's mode, then suspend the current
/// frame and descend.
fn descend_member(
    current: &mut Node,
    stack: &mut Vec<Frame>,
    parent_mode: Mode,
    name: String,
    child_mode: Mode,
) -> Result<(), Error> {
    let (child, slot) = match current {
        Node::Record(record) => {
            let declared = record.declared_type(&name)?.clone();
            let existing = record.take(&name)?;
            let child = if existing.is_null() {
                declared.instantiate()
            } else {
                existing
            };
            (child, Slot::Member(name))
        }
        Node::Map(map) => {
            let value_ty = map.value_type().clone();
            let key = coerce::parse(map.key_type(), &name)?;
            let child = match map.remove(&key) {
                Some(existing) if !existing.is_null() => existing,
                _ => value_ty.instantiate(),
            };
            (child, Slot::Entry(key))
        }
        Node::List(list) => {
            let elem = list.element_type().clone();
            let index: usize = name
                .parse()
                .map_err(|_| GraphError::InvalidIndex(name.clone()))?;
            let existing = list.take(index)?;
            let child = if existing.is_null() {
                elem.instantiate()
            } else {
                existing
            };
            (child, Slot::Index(index))
        }
        other => {
            return Err(GraphError::TypeMismatch {
                expected: "record, map, or list".to_string(),
                found: other.kind().to_string(),
            }
            .into())
        }
    };
    match child_mode {
        Mode::Object => object_target(&child)?,
        Mode::Array => array_target(&child)?,
    }
    let parent = mem::replace(current, child);
    stack.push(Frame {
        node: parent,
        slot,
        mode: parent_mode,
    });
    Ok(())
}

// ── Array-frame steps ─────────────────────────────────────────────────────

/// Append a coerced scalar or typed Null element.
fn push_element(current: &mut Node, token: Token) -> Result<(), Error> {
    match current {
        Node::List(list) => {
            let elem = list.element_type().clone();
            let value = token_node(&elem, token)?;
            list.push(value)?;
            Ok(())
        }
        other => Err(GraphError::TypeMismatch {
            expected: "list".to_string(),
            found: other.kind().to_string(),
        }
        .into()),
    }
}

/// Append a default-constructed element (or nested list), then suspend
/// the current frame and descend into it.
fn descend_element(
    current: &mut Node,
    stack: &mut Vec<Frame>,
    parent_mode: Mode,
    child_mode: Mode,
) -> Result<(), Error> {
    let elem = match current {
        Node::List(list) => list.element_type().clone(),
        other => {
            return Err(GraphError::TypeMismatch {
                expected: "list".to_string(),
                found: other.kind().to_string(),
            }
            .into())
        }
    };
    let child = elem.instantiate();
    match child_mode {
        Mode::Object => object_target(&child)?,
        Mode::Array => array_target(&child)?,
    }
    let parent = mem::replace(current, child);
    stack.push(Frame {
        node: parent,
        slot: Slot::Push,
        mode: parent_mode,
    });
    Ok(())
}

// ── Re-attachment ─────────────────────────────────────────────────────────

fn attach(parent: &mut Node, slot: Slot, child: Node) -> Result<(), Error> {
    match (parent, slot) {
        (Node::Record(record), Slot::Member(name)) => Ok(record.set(&name, child)?),
        (Node::Map(map), Slot::Entry(key)) => Ok(map.insert(key, child)?),
        (Node::List(list), Slot::Index(index)) => Ok(list.set(index, child)?),
        (Node::List(list), Slot::Push) => Ok(list.push(child)?),
        _ => Err(GraphError::Unsupported("unbalanced merge frame".to_string()).into()),
    }
}

/// Turn a scalar or Null value token into a node for the declared type.
fn token_node(declared: &Type, token: Token) -> Result<Node, Error> {
    match token {
        Token::Null => Ok(Node::Null(declared.clone())),
        token => match declared {
            Type::Scalar(ty) => Ok(Node::Scalar(coerce::from_json(*ty, &token_value(token))?)),
            other => Err(GraphError::TypeMismatch {
                expected: other.name(),
                found: token.kind().to_string(),
            }
            .into()),
        },
    }
}

fn token_value(token: Token) -> Value {
    match token {
        Token::Bool(b) => Value::Bool(b),
        Token::Number(n) => Value::Number(n),
        Token::Str(s) => Value::String(s),
        _ => Value::Null,
    }
}
