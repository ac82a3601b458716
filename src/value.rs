//! The value model driving the encoder.
//!
//! Every encodable type implements [`Encode`], which exposes a structural
//! view of the value as a [`Kind`]. The encoder walks these views; it never
//! needs to know the concrete Rust type behind them.
//!
//! Records describe their fields explicitly, together with the tag directive
//! that controls naming and omission:
//!
//! ```
//! use query_values::{Encode, Field, Kind};
//!
//! struct Search {
//!     query: String,
//!     page: u32,
//!     tags: Vec<String>,
//! }
//!
//! impl Encode for Search {
//!     fn kind(&self) -> Kind<'_> {
//!         Kind::Record(vec![
//!             Field::new("Query", &self.query).tag("q"),
//!             Field::new("Page", &self.page).tag("page,omitempty"),
//!             Field::new("Tags", &self.tags).tag("tags"),
//!         ])
//!     }
//! }
//!
//! let search = Search {
//!     query: "rust".to_owned(),
//!     page: 0,
//!     tags: vec!["a".to_owned(), "b".to_owned()],
//! };
//! let values = query_values::to_values(&search).unwrap();
//! assert_eq!(values.encode(), "q=rust&tags[0]=a&tags[1]=b");
//! ```

mod impls;

use std::borrow::Cow;
use std::fmt;

use chrono::{DateTime, FixedOffset};

use crate::error::Result;
use crate::values::Values;

/// A type that can be encoded into query [`Values`].
pub trait Encode {
    /// Returns the structural view of this value.
    fn kind(&self) -> Kind<'_>;

    /// Value-form custom encoder.
    ///
    /// When this returns `Some`, the encoder hands the whole subtree to it
    /// instead of applying the built-in rules.
    fn encoder(&self) -> Option<&dyn EncodeValues> {
        None
    }

    /// Reference-form custom encoder.
    ///
    /// Only consulted when the value sits behind two references, e.g.
    /// `Some(Box::new(value))`: encoding always looks through the first
    /// one. It takes priority over [`Encode::encoder`] in that case.
    fn ref_encoder(&self) -> Option<&dyn EncodeValues> {
        None
    }

    /// Lets a type report its own zeroness for `omitempty`.
    ///
    /// Only consulted for kinds without a structural notion of "empty"
    /// (records, date-times, chars, unit).
    fn is_zero(&self) -> Option<bool> {
        None
    }
}

/// A custom encoder: writes any number of entries for one value.
///
/// ```
/// use query_values::{Encode, EncodeValues, Field, Kind, Result, Values};
///
/// struct Range(u32, u32);
///
/// impl EncodeValues for Range {
///     fn encode_values(&self, scope: &str, values: &mut Values) -> Result<()> {
///         values.set(format!("{scope}_from"), self.0.to_string());
///         values.set(format!("{scope}_to"), self.1.to_string());
///         Ok(())
///     }
/// }
///
/// impl Encode for Range {
///     fn kind(&self) -> Kind<'_> {
///         Kind::Record(Vec::new())
///     }
///
///     fn encoder(&self) -> Option<&dyn EncodeValues> {
///         Some(self)
///     }
/// }
///
/// struct Filter {
///     price: Range,
/// }
///
/// impl Encode for Filter {
///     fn kind(&self) -> Kind<'_> {
///         Kind::Record(vec![Field::new("price", &self.price)])
///     }
/// }
///
/// let values = query_values::to_values(&Filter { price: Range(10, 20) }).unwrap();
/// assert_eq!(values.encode(), "price_from=10&price_to=20");
/// ```
pub trait EncodeValues {
    fn encode_values(&self, scope: &str, values: &mut Values) -> Result<()>;
}

/// Structural view of a value.
pub enum Kind<'a> {
    /// An absent value or a null reference. Never written.
    Null,
    /// A non-null reference to another value.
    Ref(&'a dyn Encode),
    /// A date-time, formatted with the active time layout.
    Time(DateTime<FixedOffset>),
    /// Named fields in declaration order.
    Record(Vec<Field<'a>>),
    /// Ordered elements.
    Seq(Vec<&'a dyn Encode>),
    /// Key/value entries. Keys must be strings.
    Map(Vec<(&'a dyn Encode, &'a dyn Encode)>),
    /// A leaf value.
    Scalar(Scalar<'a>),
}

impl Kind<'_> {
    pub fn value_kind(&self) -> ValueKind {
        match self {
            Kind::Null => ValueKind::Null,
            Kind::Ref(_) => ValueKind::Reference,
            Kind::Time(_) => ValueKind::Time,
            Kind::Record(_) => ValueKind::Record,
            Kind::Seq(_) => ValueKind::Sequence,
            Kind::Map(_) => ValueKind::Map,
            Kind::Scalar(scalar) => scalar.value_kind(),
        }
    }
}

impl fmt::Debug for Kind<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Time(time) => f.debug_tuple("Time").field(time).finish(),
            Kind::Record(fields) => f.debug_tuple("Record").field(&fields.len()).finish(),
            Kind::Seq(items) => f.debug_tuple("Seq").field(&items.len()).finish(),
            Kind::Map(entries) => f.debug_tuple("Map").field(&entries.len()).finish(),
            Kind::Scalar(scalar) => f.debug_tuple("Scalar").field(scalar).finish(),
            Kind::Null | Kind::Ref(_) => write!(f, "{}", self.value_kind()),
        }
    }
}

/// Leaf values, written with their natural textual representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Scalar<'a> {
    Bool(bool),
    Int(i64),
    Uint(u64),
    F32(f32),
    F64(f64),
    Char(char),
    Str(&'a str),
    Unit,
}

impl<'a> Scalar<'a> {
    pub fn value_kind(&self) -> ValueKind {
        match self {
            Scalar::Bool(_) => ValueKind::Bool,
            Scalar::Int(_) => ValueKind::Int,
            Scalar::Uint(_) => ValueKind::Uint,
            Scalar::F32(_) | Scalar::F64(_) => ValueKind::Float,
            Scalar::Char(_) => ValueKind::Char,
            Scalar::Str(_) => ValueKind::String,
            Scalar::Unit => ValueKind::Unit,
        }
    }

    /// Renders the scalar the way it is written into [`Values`].
    ///
    /// Floats use the shortest digits that round-trip, written as a plain
    /// decimal: no exponent and no trailing `.0` for integral values, so
    /// `1e20` becomes `100000000000000000000`.
    pub fn to_text(&self) -> Cow<'a, str> {
        match *self {
            Scalar::Bool(true) => Cow::Borrowed("true"),
            Scalar::Bool(false) => Cow::Borrowed("false"),
            Scalar::Int(v) => Cow::Owned(itoa::Buffer::new().format(v).to_owned()),
            Scalar::Uint(v) => Cow::Owned(itoa::Buffer::new().format(v).to_owned()),
            Scalar::F32(v) => Cow::Owned(plain_decimal(ryu::Buffer::new().format(v))),
            Scalar::F64(v) => Cow::Owned(plain_decimal(ryu::Buffer::new().format(v))),
            Scalar::Char(c) => Cow::Owned(c.to_string()),
            Scalar::Str(s) => Cow::Borrowed(s),
            Scalar::Unit => Cow::Borrowed(""),
        }
    }
}

/// Rewrites ryu's output without an exponent.
fn plain_decimal(formatted: &str) -> String {
    let Some((mantissa, exponent)) = formatted.split_once('e') else {
        return formatted
            .strip_suffix(".0")
            .unwrap_or(formatted)
            .to_owned();
    };
    let Ok(exponent) = exponent.parse::<isize>() else {
        return formatted.to_owned();
    };
    let (sign, mantissa) = match mantissa.strip_prefix('-') {
        Some(mantissa) => ("-", mantissa),
        None => ("", mantissa),
    };
    let (int, frac) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let digits = format!("{int}{frac}");
    // index of the decimal point within `digits`
    let point = int.len() as isize + exponent;

    let mut out = String::from(sign);
    if point <= 0 {
        out.push_str("0.");
        out.extend(std::iter::repeat_n('0', point.unsigned_abs()));
        out.push_str(&digits);
    } else if point as usize >= digits.len() {
        out.push_str(&digits);
        out.extend(std::iter::repeat_n('0', point as usize - digits.len()));
    } else {
        let (whole, fraction) = digits.split_at(point as usize);
        out.push_str(whole);
        out.push('.');
        out.push_str(fraction);
    }
    out
}

/// Names a [`Kind`] for error reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Reference,
    Time,
    Record,
    Sequence,
    Map,
    Bool,
    Int,
    Uint,
    Float,
    Char,
    String,
    Unit,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Null => "null",
            ValueKind::Reference => "reference",
            ValueKind::Time => "time",
            ValueKind::Record => "record",
            ValueKind::Sequence => "sequence",
            ValueKind::Map => "map",
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Uint => "uint",
            ValueKind::Float => "float",
            ValueKind::Char => "char",
            ValueKind::String => "string",
            ValueKind::Unit => "unit",
        };
        f.write_str(name)
    }
}

/// One field of a record.
///
/// `ident` is the field's own name, used as the key unless the tag
/// directive overrides it. The tag follows the `name[,option...]` grammar
/// described in [`parse_tag`](crate::parse_tag).
pub struct Field<'a> {
    ident: &'a str,
    tag: &'a str,
    value: &'a dyn Encode,
    embedded: bool,
    hidden: bool,
}

impl<'a> Field<'a> {
    pub fn new(ident: &'a str, value: &'a dyn Encode) -> Self {
        Self {
            ident,
            tag: "",
            value,
            embedded: false,
            hidden: false,
        }
    }

    /// An embedded field. If its value is a record (possibly behind one
    /// reference), its fields are flattened into the parent's namespace.
    pub fn embedded(ident: &'a str, value: &'a dyn Encode) -> Self {
        Self {
            embedded: true,
            ..Self::new(ident, value)
        }
    }

    /// Sets the tag directive, e.g. `"name,omitempty"` or `"-"`.
    pub fn tag(mut self, tag: &'a str) -> Self {
        self.tag = tag;
        self
    }

    /// Marks the field as not externally visible.
    ///
    /// Hidden fields are skipped, unless they are embedded: an embedded
    /// hidden record still contributes its own visible fields.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn ident(&self) -> &'a str {
        self.ident
    }

    pub fn tag_str(&self) -> &'a str {
        self.tag
    }

    pub fn value(&self) -> &'a dyn Encode {
        self.value
    }

    pub fn is_embedded(&self) -> bool {
        self.embedded
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }
}

impl fmt::Debug for Field<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("ident", &self.ident)
            .field("tag", &self.tag)
            .field("embedded", &self.embedded)
            .field("hidden", &self.hidden)
            .finish()
    }
}
