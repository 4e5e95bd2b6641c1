//! Structured value codec: node ⇄ JSON rendering and decoding.
//!
//! Encoding enumerates record members in declaration order, recursively,
//! producing the JSON-shaped rendering read responses return. Decoding is
//! the structured deserializer for replace/append bodies: it materializes
//! a node of a declared type from a parsed `serde_json::Value`.

use serde_json::{Map, Number, Value};

use restree_graph::{coerce, ListNode, MapNode, Node, Scalar, ScalarType, SequenceNode, Shape, Type};

use crate::error::Error;

// ── Encoding ──────────────────────────────────────────────────────────────

/// Render a node as a JSON value. Record members appear in declaration
/// order, map keys are rendered as strings, chars as one-character
/// strings, and typed Nulls as `null`.
pub fn encode(node: &Node) -> Value {
    match node {
        Node::Null(_) => Value::Null,
        Node::Scalar(s) => scalar_value(s),
        Node::Record(record) => {
            let mut out = Map::new();
            for (name, value) in record.members() {
                out.insert(name.to_string(), encode(value));
            }
            Value::Object(out)
        }
        Node::Sequence(seq) => Value::Array(seq.iter().map(encode).collect()),
        Node::List(list) => Value::Array(list.iter().map(encode).collect()),
        Node::Map(map) => {
            let mut out = Map::new();
            for (key, value) in map.entries() {
                out.insert(key.to_string(), encode(value));
            }
            Value::Object(out)
        }
    }
}

/// Compact JSON rendering used for read responses.
pub fn encode_string(node: &Node) -> String {
    encode(node).to_string()
}

fn scalar_value(s: &Scalar) -> Value {
    match s {
        Scalar::Bool(v) => Value::Bool(*v),
        Scalar::I8(v) => Value::Number((*v).into()),
        Scalar::I16(v) => Value::Number((*v).into()),
        Scalar::I32(v) => Value::Number((*v).into()),
        Scalar::I64(v) => Value::Number((*v).into()),
        Scalar::U8(v) => Value::Number((*v).into()),
        Scalar::U16(v) => Value::Number((*v).into()),
        Scalar::U32(v) => Value::Number((*v).into()),
        Scalar::U64(v) => Value::Number((*v).into()),
        // non-finite floats have no JSON rendering; fall back to null
        Scalar::F32(v) => Number::from_f64(f64::from(*v))
            .map(Value::Number)
            .unwrap_or(Value::Null),
        Scalar::F64(v) => Number::from_f64(*v).map(Value::Number).unwrap_or(Value::Null),
        Scalar::Char(v) => Value::String(v.to_string()),
        Scalar::Decimal(n) => Value::Number(n.clone()),
        Scalar::String(v) => Value::String(v.clone()),
    }
}

// ── Decoding ──────────────────────────────────────────────────────────────

/// Decode a JSON value into a node of the declared type.
///
/// Records start from their default instance and overlay the provided
/// members; absent members keep their defaults, unknown member names are
/// body errors. `null` decodes to a typed Null of the declared type.
pub fn decode(ty: &Type, value: &Value) -> Result<Node, Error> {
    if value.is_null() {
        return Ok(Node::Null(ty.clone()));
    }
    match ty {
        Type::Scalar(s) => Ok(Node::Scalar(coerce::from_json(*s, value)?)),
        Type::Record(shape) => {
            let members = value.as_object().ok_or_else(|| shape_err(ty, value))?;
            let mut node = shape.instantiate();
            if let Node::Record(record) = &mut node {
                for (name, member) in members {
                    let declared = record.declared_type(name).map_err(|_| {
                        Error::Body(format!("unknown member {:?} for {}", name, shape.name()))
                    })?;
                    let decoded = decode(&declared.clone(), member)?;
                    record.set(name, decoded)?;
                }
            }
            Ok(node)
        }
        Type::Sequence(elem) => {
            let items = value.as_array().ok_or_else(|| shape_err(ty, value))?;
            let decoded = items
                .iter()
                .map(|item| decode(elem, item))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Node::Sequence(SequenceNode::from_items(
                (**elem).clone(),
                decoded,
            )?))
        }
        Type::List(elem) => {
            let items = value.as_array().ok_or_else(|| shape_err(ty, value))?;
            let decoded = items
                .iter()
                .map(|item| decode(elem, item))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Node::List(ListNode::from_items((**elem).clone(), decoded)?))
        }
        Type::Map { key, value: value_ty } => {
            let members = value.as_object().ok_or_else(|| shape_err(ty, value))?;
            let mut map = MapNode::new(*key, (**value_ty).clone());
            for (k, member) in members {
                map.insert(coerce::parse(*key, k)?, decode(value_ty, member)?)?;
            }
            Ok(Node::Map(map))
        }
    }
}

fn shape_err(ty: &Type, value: &Value) -> Error {
    Error::Body(format!(
        "expected a {} shaped value, got {}",
        ty.name(),
        json_kind(value)
    ))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ── Shape inference ───────────────────────────────────────────────────────

/// Infer a declared type and node from a plain JSON document.
///
/// CLI convenience: objects become records whose member defaults are the
/// given values, arrays become lists keyed off their first element,
/// integral numbers become I64 (or U64 when out of signed range), other
/// numbers F64, and `null` a string-typed Null.
pub fn infer(value: &Value) -> Result<(Type, Node), Error> {
    let ty = infer_type(value)?;
    let node = decode(&ty, value)?;
    Ok((ty, node))
}

fn infer_type(value: &Value) -> Result<Type, Error> {
    Ok(match value {
        Value::Null => Type::Scalar(ScalarType::String),
        Value::Bool(_) => Type::Scalar(ScalarType::Bool),
        Value::Number(n) => {
            if n.as_i64().is_some() {
                Type::Scalar(ScalarType::I64)
            } else if n.as_u64().is_some() {
                Type::Scalar(ScalarType::U64)
            } else {
                Type::Scalar(ScalarType::F64)
            }
        }
        Value::String(_) => Type::Scalar(ScalarType::String),
        Value::Array(items) => {
            let elem = match items.first() {
                Some(first) => infer_type(first)?,
                None => Type::Scalar(ScalarType::String),
            };
            Type::list(elem)
        }
        Value::Object(members) => {
            let mut builder = Shape::builder("inferred");
            for (name, member) in members {
                let ty = infer_type(member)?;
                let default = decode(&ty, member)?;
                builder = builder.field_default(name, ty, default);
            }
            Type::Record(builder.build())
        }
    })
}
