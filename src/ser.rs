//! Encoding support for any `serde::Serialize` value.
//!
//! A `Serialize` value is first captured as an owned [`Node`] tree, which
//! implements [`Encode`]; the regular encoder then walks that tree. Serde's
//! own attributes take the place of tag directives:
//!
//! * `#[serde(rename = "..")]` renames the key
//! * `#[serde(skip)]` omits the field
//! * `#[serde(skip_serializing_if = "..")]` plays the role of `omitempty`
//! * `#[serde(flatten)]` merges a nested struct into its parent's keys
//!
//! ```
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Address {
//!     city: String,
//!     postcode: String,
//! }
//!
//! #[derive(Serialize)]
//! struct QueryParams {
//!     id: u8,
//!     name: String,
//!     address: Address,
//!     user_ids: Vec<u8>,
//! }
//!
//! let params = QueryParams {
//!     id: 42,
//!     name: "Acme".to_string(),
//!     address: Address {
//!         city: "Carrot City".to_string(),
//!         postcode: "12345".to_string(),
//!     },
//!     user_ids: vec![1, 2],
//! };
//!
//! assert_eq!(
//!     query_values::serialize_string(&params).unwrap(),
//!     "address[city]=Carrot+City&address[postcode]=12345&id=42&name=Acme&\
//!      user_ids[0]=1&user_ids[1]=2"
//! );
//! ```

use serde::ser;

use crate::error::{Error, Result};
use crate::value::{Encode, Field, Kind, Scalar};

/// Captures `input` as a [`Node`] tree.
pub(crate) fn to_node<T: ser::Serialize + ?Sized>(input: &T) -> Result<Node> {
    input.serialize(NodeSerializer)
}

/// An owned snapshot of a serialized value.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Node {
    Null,
    Some(Box<Node>),
    Record(Vec<(&'static str, Node)>),
    Seq(Vec<Node>),
    Map(Vec<(Node, Node)>),
    Bool(bool),
    Int(i64),
    Uint(u64),
    F32(f32),
    F64(f64),
    Char(char),
    Str(String),
    Unit,
}

impl Encode for Node {
    fn kind(&self) -> Kind<'_> {
        match self {
            Node::Null => Kind::Null,
            Node::Some(inner) => Kind::Ref(&**inner),
            Node::Record(fields) => Kind::Record(
                fields
                    .iter()
                    .map(|(name, value)| Field::new(name, value))
                    .collect(),
            ),
            Node::Seq(items) => Kind::Seq(items.iter().map(|item| item as &dyn Encode).collect()),
            Node::Map(entries) => Kind::Map(
                entries
                    .iter()
                    .map(|(k, v)| (k as &dyn Encode, v as &dyn Encode))
                    .collect(),
            ),
            Node::Bool(v) => Kind::Scalar(Scalar::Bool(*v)),
            Node::Int(v) => Kind::Scalar(Scalar::Int(*v)),
            Node::Uint(v) => Kind::Scalar(Scalar::Uint(*v)),
            Node::F32(v) => Kind::Scalar(Scalar::F32(*v)),
            Node::F64(v) => Kind::Scalar(Scalar::F64(*v)),
            Node::Char(v) => Kind::Scalar(Scalar::Char(*v)),
            Node::Str(v) => Kind::Scalar(Scalar::Str(v)),
            Node::Unit => Kind::Scalar(Scalar::Unit),
        }
    }
}

/// A serializer producing [`Node`] trees.
///
/// Enum variants follow the querystring conventions of nested keys: a unit
/// variant is written as its name, any other variant nests its content under
/// the variant name, e.g. `e[c][x]=2`.
struct NodeSerializer;

macro_rules! serialize_int {
    (
        $($ty:ty => $meth:ident as $variant:ident($cast:ty),)*) => {
        $(
            fn $meth(self, v: $ty) -> Result<Node> {
                Ok(Node::$variant(v as $cast))
            }
        )*
    };
}

impl ser::Serializer for NodeSerializer {
    type Ok = Node;
    type Error = Error;
    type SerializeSeq = SeqNode;
    type SerializeTuple = SeqNode;
    type SerializeTupleStruct = SeqNode;
    type SerializeTupleVariant = SeqNode;
    type SerializeMap = MapNode;
    type SerializeStruct = RecordNode;
    type SerializeStructVariant = RecordNode;

    serialize_int! {
        u8  => serialize_u8 as Uint(u64),
        u16 => serialize_u16 as Uint(u64),
        u32 => serialize_u32 as Uint(u64),
        u64 => serialize_u64 as Uint(u64),
        i8  => serialize_i8 as Int(i64),
        i16 => serialize_i16 as Int(i64),
        i32 => serialize_i32 as Int(i64),
        i64 => serialize_i64 as Int(i64),
    }

    fn serialize_f32(self, v: f32) -> Result<Node> {
        Ok(Node::F32(v))
    }

    fn serialize_f64(self, v: f64) -> Result<Node> {
        Ok(Node::F64(v))
    }

    fn serialize_bool(self, v: bool) -> Result<Node> {
        Ok(Node::Bool(v))
    }

    fn serialize_char(self, v: char) -> Result<Node> {
        Ok(Node::Char(v))
    }

    fn serialize_str(self, v: &str) -> Result<Node> {
        Ok(Node::Str(v.to_owned()))
    }

    fn serialize_bytes(self, value: &[u8]) -> Result<Node> {
        Ok(Node::Str(String::from_utf8_lossy(value).into_owned()))
    }

    fn serialize_none(self) -> Result<Node> {
        Ok(Node::Null)
    }

    fn serialize_some<T: ?Sized + ser::Serialize>(self, value: &T) -> Result<Node> {
        Ok(Node::Some(Box::new(value.serialize(self)?)))
    }

    fn serialize_unit(self) -> Result<Node> {
        Ok(Node::Unit)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Node> {
        Ok(Node::Unit)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Node> {
        Ok(Node::Str(variant.to_owned()))
    }

    fn serialize_newtype_struct<T: ?Sized + ser::Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Node> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + ser::Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Node> {
        Ok(Node::Record(vec![(variant, value.serialize(self)?)]))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SeqNode> {
        Ok(SeqNode::new(None, len.unwrap_or_default()))
    }

    fn serialize_tuple(self, len: usize) -> Result<SeqNode> {
        Ok(SeqNode::new(None, len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SeqNode> {
        Ok(SeqNode::new(None, len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SeqNode> {
        Ok(SeqNode::new(Some(variant), len))
    }

    fn serialize_map(self, len: Option<usize>) -> Result<MapNode> {
        Ok(MapNode {
            entries: Vec::with_capacity(len.unwrap_or_default()),
            next_key: None,
        })
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<RecordNode> {
        Ok(RecordNode::new(None, len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<RecordNode> {
        Ok(RecordNode::new(Some(variant), len))
    }
}

/// Wraps `node` in a single-field record named after the enum variant.
fn within_variant(variant: Option<&'static str>, node: Node) -> Node {
    match variant {
        Some(variant) => Node::Record(vec![(variant, node)]),
        None => node,
    }
}

pub(crate) struct SeqNode {
    variant: Option<&'static str>,
    items: Vec<Node>,
}

impl SeqNode {
    fn new(variant: Option<&'static str>, len: usize) -> Self {
        Self {
            variant,
            items: Vec::with_capacity(len),
        }
    }

    fn push<T: ?Sized + ser::Serialize>(&mut self, value: &T) -> Result<()> {
        self.items.push(value.serialize(NodeSerializer)?);
        Ok(())
    }

    fn finish(self) -> Result<Node> {
        Ok(within_variant(self.variant, Node::Seq(self.items)))
    }
}

impl ser::SerializeSeq for SeqNode {
    type Ok = Node;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ser::Serialize + ?Sized,
    {
        self.push(value)
    }

    fn end(self) -> Result<Node> {
        self.finish()
    }
}

impl ser::SerializeTuple for SeqNode {
    type Ok = Node;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ser::Serialize + ?Sized,
    {
        self.push(value)
    }

    fn end(self) -> Result<Node> {
        self.finish()
    }
}

impl ser::SerializeTupleStruct for SeqNode {
    type Ok = Node;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ser::Serialize + ?Sized,
    {
        self.push(value)
    }

    fn end(self) -> Result<Node> {
        self.finish()
    }
}

impl ser::SerializeTupleVariant for SeqNode {
    type Ok = Node;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ser::Serialize + ?Sized,
    {
        self.push(value)
    }

    fn end(self) -> Result<Node> {
        self.finish()
    }
}

pub(crate) struct RecordNode {
    variant: Option<&'static str>,
    fields: Vec<(&'static str, Node)>,
}

impl RecordNode {
    fn new(variant: Option<&'static str>, len: usize) -> Self {
        Self {
            variant,
            fields: Vec::with_capacity(len),
        }
    }
}

impl ser::SerializeStruct for RecordNode {
    type Ok = Node;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ser::Serialize + ?Sized,
    {
        self.fields.push((key, value.serialize(NodeSerializer)?));
        Ok(())
    }

    fn end(self) -> Result<Node> {
        Ok(within_variant(self.variant, Node::Record(self.fields)))
    }
}

impl ser::SerializeStructVariant for RecordNode {
    type Ok = Node;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ser::Serialize + ?Sized,
    {
        self.fields.push((key, value.serialize(NodeSerializer)?));
        Ok(())
    }

    fn end(self) -> Result<Node> {
        Ok(within_variant(self.variant, Node::Record(self.fields)))
    }
}

pub(crate) struct MapNode {
    entries: Vec<(Node, Node)>,
    next_key: Option<Node>,
}

impl ser::SerializeMap for MapNode {
    type Ok = Node;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ser::Serialize + ?Sized,
    {
        self.next_key = Some(key.serialize(NodeSerializer)?);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ser::Serialize + ?Sized,
    {
        let Some(key) = self.next_key.take() else {
            return Err(Error::Custom(
                "internal error: map value serialized before its key".to_string(),
            ));
        };
        self.entries.push((key, value.serialize(NodeSerializer)?));
        Ok(())
    }

    fn end(self) -> Result<Node> {
        Ok(Node::Map(self.entries))
    }
}
