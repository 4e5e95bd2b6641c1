//! Type descriptors and record shapes.
//!
//! Every node slot carries a declared [`Type`]; record shapes additionally
//! carry a default value per member, so instantiating a shape reproduces
//! the value a freshly constructed instance would have.

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Number;

use crate::node::{ListNode, MapNode, Node, Record, Scalar, SequenceNode};

// ── Scalar types ──────────────────────────────────────────────────────────

/// The scalar leaf types understood by the coercion layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarType {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Char,
    Decimal,
    String,
}

impl ScalarType {
    /// Type name used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            ScalarType::Bool => "bool",
            ScalarType::I8 => "i8",
            ScalarType::I16 => "i16",
            ScalarType::I32 => "i32",
            ScalarType::I64 => "i64",
            ScalarType::U8 => "u8",
            ScalarType::U16 => "u16",
            ScalarType::U32 => "u32",
            ScalarType::U64 => "u64",
            ScalarType::F32 => "f32",
            ScalarType::F64 => "f64",
            ScalarType::Char => "char",
            ScalarType::Decimal => "decimal",
            ScalarType::String => "string",
        }
    }

    /// The default value of this scalar type.
    pub fn default_scalar(self) -> Scalar {
        match self {
            ScalarType::Bool => Scalar::Bool(false),
            ScalarType::I8 => Scalar::I8(0),
            ScalarType::I16 => Scalar::I16(0),
            ScalarType::I32 => Scalar::I32(0),
            ScalarType::I64 => Scalar::I64(0),
            ScalarType::U8 => Scalar::U8(0),
            ScalarType::U16 => Scalar::U16(0),
            ScalarType::U32 => Scalar::U32(0),
            ScalarType::U64 => Scalar::U64(0),
            ScalarType::F32 => Scalar::F32(0.0),
            ScalarType::F64 => Scalar::F64(0.0),
            ScalarType::Char => Scalar::Char('\0'),
            ScalarType::Decimal => Scalar::Decimal(Number::from(0)),
            ScalarType::String => Scalar::String(String::new()),
        }
    }
}

// ── Declared types ────────────────────────────────────────────────────────

/// Declared type of a node slot.
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Scalar(ScalarType),
    Record(ShapeRef),
    /// Fixed-length indexed container; length is per-instance.
    Sequence(Box<Type>),
    /// Growable ordered container.
    List(Box<Type>),
    /// Associative container keyed by a scalar type.
    Map { key: ScalarType, value: Box<Type> },
}

impl Type {
    pub fn sequence(elem: Type) -> Type {
        Type::Sequence(Box::new(elem))
    }

    pub fn list(elem: Type) -> Type {
        Type::List(Box::new(elem))
    }

    pub fn map(key: ScalarType, value: Type) -> Type {
        Type::Map {
            key,
            value: Box::new(value),
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, Type::Scalar(_))
    }

    pub fn is_container(&self) -> bool {
        matches!(self, Type::Sequence(_) | Type::List(_) | Type::Map { .. })
    }

    /// Type name used in diagnostics, e.g. `list<i32>` or `map<i32, i32>`.
    pub fn name(&self) -> String {
        match self {
            Type::Scalar(s) => s.name().to_string(),
            Type::Record(shape) => shape.name().to_string(),
            Type::Sequence(elem) => format!("sequence<{}>", elem.name()),
            Type::List(elem) => format!("list<{}>", elem.name()),
            Type::Map { key, value } => format!("map<{}, {}>", key.name(), value.name()),
        }
    }

    /// Construct the default instance of this type: a pure factory with
    /// no side effects beyond allocation.
    ///
    /// Scalars get their zero values, containers start empty, and record
    /// instances clone the shape's member defaults.
    pub fn instantiate(&self) -> Node {
        match self {
            Type::Scalar(s) => Node::Scalar(s.default_scalar()),
            Type::Record(shape) => shape.instantiate(),
            Type::Sequence(elem) => Node::Sequence(SequenceNode::new((**elem).clone(), 0)),
            Type::List(elem) => Node::List(ListNode::new((**elem).clone())),
            Type::Map { key, value } => Node::Map(MapNode::new(*key, (**value).clone())),
        }
    }

    /// Whether a value is assignable to a slot of this declared type.
    /// A typed Null is assignable only to its own declared type.
    pub fn admits(&self, node: &Node) -> bool {
        match (self, node) {
            (ty, Node::Null(declared)) => ty == declared,
            (Type::Scalar(ty), Node::Scalar(value)) => *ty == value.ty(),
            (Type::Record(shape), Node::Record(record)) => shape == record.shape(),
            (Type::Sequence(elem), Node::Sequence(seq)) => **elem == *seq.element_type(),
            (Type::List(elem), Node::List(list)) => **elem == *list.element_type(),
            (Type::Map { key, value }, Node::Map(map)) => {
                *key == map.key_type() && **value == *map.value_type()
            }
            _ => false,
        }
    }
}

// ── Record shapes ─────────────────────────────────────────────────────────

/// One member declaration inside a record shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub ty: Type,
    pub default: Node,
}

/// A named record shape: an ordered set of member declarations. Shapes are
/// shared between the declared type and every instance of it.
#[derive(Debug, PartialEq)]
pub struct Shape {
    name: String,
    fields: IndexMap<String, Field>,
}

pub type ShapeRef = Arc<Shape>;

impl Shape {
    pub fn builder(name: impl Into<String>) -> ShapeBuilder {
        ShapeBuilder {
            name: name.into(),
            fields: IndexMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.get_index_of(name)
    }

    /// Member declarations in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.fields.iter().map(|(name, field)| (name.as_str(), field))
    }

    /// Instantiate a record of this shape from the member defaults.
    pub fn instantiate(self: &Arc<Self>) -> Node {
        Node::Record(Record::new(self.clone()))
    }
}

/// Builds a [`Shape`]. Misuse (duplicate members, defaults that don't
/// match their declared type) is a bug in the caller and panics.
pub struct ShapeBuilder {
    name: String,
    fields: IndexMap<String, Field>,
}

impl ShapeBuilder {
    /// Declare a member whose default is the type's default instance.
    pub fn field(self, name: impl Into<String>, ty: Type) -> Self {
        let default = ty.instantiate();
        self.field_default(name, ty, default)
    }

    /// Declare a member that starts out as a typed Null.
    pub fn nullable(self, name: impl Into<String>, ty: Type) -> Self {
        let default = Node::Null(ty.clone());
        self.field_default(name, ty, default)
    }

    /// Declare a member with an explicit default value.
    ///
    /// # Panics
    ///
    /// Panics if the member is already declared or the default is not
    /// assignable to the declared type.
    pub fn field_default(mut self, name: impl Into<String>, ty: Type, default: Node) -> Self {
        let name = name.into();
        if !ty.admits(&default) {
            panic!(
                "default for {}.{} is not a {}",
                self.name,
                name,
                ty.name()
            );
        }
        if self.fields.insert(name.clone(), Field { ty, default }).is_some() {
            panic!("duplicate member {} in shape {}", name, self.name);
        }
        self
    }

    pub fn build(self) -> ShapeRef {
        Arc::new(Shape {
            name: self.name,
            fields: self.fields,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nested() -> ShapeRef {
        Shape::builder("Nested")
            .field_default("a", Type::Scalar(ScalarType::I32), 1.into())
            .field("b", Type::Scalar(ScalarType::I32))
            .build()
    }

    #[test]
    fn instantiate_uses_field_defaults() {
        let shape = nested();
        let node = shape.instantiate();
        match &node {
            Node::Record(r) => {
                assert_eq!(r.get("a").unwrap(), &Node::from(1));
                assert_eq!(r.get("b").unwrap(), &Node::from(0));
            }
            other => panic!("expected record, got {}", other.kind()),
        }
        // a second instance is an equal, independent value
        assert_eq!(node, shape.instantiate());
    }

    #[test]
    fn nullable_members_start_null() {
        let shape = Shape::builder("Holder")
            .nullable("inner", Type::Record(nested()))
            .build();
        match shape.instantiate() {
            Node::Record(r) => assert!(r.get("inner").unwrap().is_null()),
            other => panic!("expected record, got {}", other.kind()),
        }
    }

    #[test]
    fn admits_checks_declared_types() {
        let list = Type::list(Type::Scalar(ScalarType::I32));
        assert!(list.admits(&list.instantiate()));
        assert!(list.admits(&Node::Null(list.clone())));
        assert!(!list.admits(&Node::Null(Type::Scalar(ScalarType::I32))));
        assert!(!list.admits(&Node::from(1)));

        let scalar = Type::Scalar(ScalarType::I32);
        assert!(scalar.admits(&Node::from(5)));
        assert!(!scalar.admits(&Node::from(5i64)));
    }

    #[test]
    fn type_names() {
        assert_eq!(Type::Scalar(ScalarType::U16).name(), "u16");
        assert_eq!(Type::list(Type::Scalar(ScalarType::I32)).name(), "list<i32>");
        assert_eq!(
            Type::map(ScalarType::I32, Type::Scalar(ScalarType::String)).name(),
            "map<i32, string>"
        );
        assert_eq!(Type::Record(nested()).name(), "Nested");
    }

    #[test]
    fn container_defaults_start_empty() {
        match Type::list(Type::Scalar(ScalarType::I32)).instantiate() {
            Node::List(l) => assert!(l.is_empty()),
            other => panic!("expected list, got {}", other.kind()),
        }
        match Type::map(ScalarType::String, Type::Scalar(ScalarType::I32)).instantiate() {
            Node::Map(m) => assert!(m.is_empty()),
            other => panic!("expected map, got {}", other.kind()),
        }
    }

    #[test]
    #[should_panic(expected = "duplicate member")]
    fn duplicate_member_panics() {
        let _ = Shape::builder("Dup")
            .field("a", Type::Scalar(ScalarType::I32))
            .field("a", Type::Scalar(ScalarType::I32));
    }

    #[test]
    #[should_panic(expected = "is not a")]
    fn mismatched_default_panics() {
        let _ = Shape::builder("Bad").field_default(
            "a",
            Type::Scalar(ScalarType::I32),
            Node::from("nope"),
        );
    }
}
