//! Shared fixture: a small service document with one of everything.

use restree::graph::{ListNode, MapNode, Node, Scalar, ScalarType, SequenceNode, Shape, ShapeRef, Type};
use restree::Service;

pub fn nested_shape() -> ShapeRef {
    Shape::builder("Nested")
        .field_default("a", Type::Scalar(ScalarType::I32), 1.into())
        .field("b", Type::Scalar(ScalarType::I32))
        .build()
}

pub fn root_shape() -> ShapeRef {
    let nested = nested_shape();
    let int = Type::Scalar(ScalarType::I32);

    let mut dictionary = MapNode::new(ScalarType::I32, int.clone());
    dictionary.insert(Scalar::I32(0), 1.into()).unwrap();
    dictionary.insert(Scalar::I32(1), 2.into()).unwrap();

    Shape::builder("Demo")
        .field("integer", int.clone())
        .field("boolean", Type::Scalar(ScalarType::Bool))
        .field_default("nested", Type::Record(nested.clone()), nested.instantiate())
        .nullable("null_nested", Type::Record(nested.clone()))
        .field_default("text", Type::Scalar(ScalarType::String), "text".into())
        .nullable("null_text", Type::Scalar(ScalarType::String))
        .field_default(
            "array",
            Type::sequence(int.clone()),
            Node::Sequence(
                SequenceNode::from_items(int.clone(), vec![1.into(), 2.into()]).unwrap(),
            ),
        )
        .field_default(
            "list",
            Type::list(int.clone()),
            Node::List(ListNode::from_items(int.clone(), vec![1.into(), 2.into()]).unwrap()),
        )
        .field_default(
            "dictionary",
            Type::map(ScalarType::I32, int.clone()),
            Node::Map(dictionary),
        )
        .field_default(
            "list_of_objects",
            Type::list(Type::Record(nested.clone())),
            Node::List(
                ListNode::from_items(Type::Record(nested.clone()), vec![nested.instantiate()])
                    .unwrap(),
            ),
        )
        .build()
}

pub fn demo_root() -> Node {
    root_shape().instantiate()
}

pub fn service() -> Service {
    Service::new(demo_root())
}
