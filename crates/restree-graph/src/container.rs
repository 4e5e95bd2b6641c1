//! Uniform adapter over the three container kinds.
//!
//! Sequence and list keys must parse as non-negative indexes; map keys are
//! coerced with the map's declared key type, so an integer-keyed map
//! addressed with `"1"` looks up the key `1`, not the string `"1"`. Each
//! variant keeps its own key policy; none of it leaks into the others.

use crate::coerce;
use crate::error::GraphError;
use crate::node::{ListNode, MapNode, Node, SequenceNode};
use crate::types::Type;

/// Shared view of a container node.
pub enum ContainerRef<'a> {
    Sequence(&'a SequenceNode),
    List(&'a ListNode),
    Map(&'a MapNode),
}

impl<'a> ContainerRef<'a> {
    pub fn of(node: &'a Node) -> Option<Self> {
        match node {
            Node::Sequence(s) => Some(ContainerRef::Sequence(s)),
            Node::List(l) => Some(ContainerRef::List(l)),
            Node::Map(m) => Some(ContainerRef::Map(m)),
            _ => None,
        }
    }

    /// Declared element type (the value type for maps).
    pub fn element_type(&self) -> &Type {
        match self {
            ContainerRef::Sequence(s) => s.element_type(),
            ContainerRef::List(l) => l.element_type(),
            ContainerRef::Map(m) => m.value_type(),
        }
    }

    pub fn is_scalar_element(&self) -> bool {
        self.element_type().is_scalar()
    }

    pub fn get(&self, key: &str) -> Result<&'a Node, GraphError> {
        match self {
            ContainerRef::Sequence(s) => {
                let i = parse_index(key)?;
                s.get(i).ok_or(GraphError::IndexOutOfRange { index: i, len: s.len() })
            }
            ContainerRef::List(l) => {
                let i = parse_index(key)?;
                l.get(i).ok_or(GraphError::IndexOutOfRange { index: i, len: l.len() })
            }
            ContainerRef::Map(m) => {
                let k = coerce::parse(m.key_type(), key)?;
                m.get(&k).ok_or_else(|| GraphError::NoSuchKey(key.to_string()))
            }
        }
    }
}

/// Mutable view of a container node.
pub enum ContainerMut<'a> {
    Sequence(&'a mut SequenceNode),
    List(&'a mut ListNode),
    Map(&'a mut MapNode),
}

impl<'a> ContainerMut<'a> {
    pub fn of(node: &'a mut Node) -> Option<Self> {
        match node {
            Node::Sequence(s) => Some(ContainerMut::Sequence(s)),
            Node::List(l) => Some(ContainerMut::List(l)),
            Node::Map(m) => Some(ContainerMut::Map(m)),
            _ => None,
        }
    }

    pub fn element_type(&self) -> &Type {
        match self {
            ContainerMut::Sequence(s) => s.element_type(),
            ContainerMut::List(l) => l.element_type(),
            ContainerMut::Map(m) => m.value_type(),
        }
    }

    pub fn get_mut(self, key: &str) -> Result<&'a mut Node, GraphError> {
        match self {
            ContainerMut::Sequence(s) => {
                let i = parse_index(key)?;
                let len = s.len();
                s.get_mut(i).ok_or(GraphError::IndexOutOfRange { index: i, len })
            }
            ContainerMut::List(l) => {
                let i = parse_index(key)?;
                let len = l.len();
                l.get_mut(i).ok_or(GraphError::IndexOutOfRange { index: i, len })
            }
            ContainerMut::Map(m) => {
                let k = coerce::parse(m.key_type(), key)?;
                m.get_mut(&k)
                    .ok_or_else(|| GraphError::NoSuchKey(key.to_string()))
            }
        }
    }

    /// Replace the slot at `key`. Sequences and lists replace existing
    /// slots only; maps upsert.
    pub fn set(&mut self, key: &str, value: Node) -> Result<(), GraphError> {
        match self {
            ContainerMut::Sequence(s) => s.set(parse_index(key)?, value),
            ContainerMut::List(l) => l.set(parse_index(key)?, value),
            ContainerMut::Map(m) => {
                let k = coerce::parse(m.key_type(), key)?;
                m.insert(k, value)
            }
        }
    }

    /// Append an element. Only lists grow.
    pub fn append(&mut self, value: Node) -> Result<(), GraphError> {
        match self {
            ContainerMut::List(l) => l.push(value),
            ContainerMut::Sequence(_) => {
                Err(GraphError::Unsupported("append on a sequence".to_string()))
            }
            ContainerMut::Map(_) => Err(GraphError::Unsupported("append on a map".to_string())),
        }
    }

    /// Delete by key: lists remove-and-shift, maps drop the entry (absent
    /// keys are a no-op), sequences cannot shrink.
    pub fn delete(&mut self, key: &str) -> Result<(), GraphError> {
        match self {
            ContainerMut::List(l) => l.remove(parse_index(key)?).map(|_| ()),
            ContainerMut::Map(m) => {
                let k = coerce::parse(m.key_type(), key)?;
                m.remove(&k);
                Ok(())
            }
            ContainerMut::Sequence(_) => {
                Err(GraphError::Unsupported("delete on a sequence".to_string()))
            }
        }
    }
}

fn parse_index(key: &str) -> Result<usize, GraphError> {
    key.parse()
        .map_err(|_| GraphError::InvalidIndex(key.to_string()))
}
