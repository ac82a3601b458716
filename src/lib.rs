//! Encode structured values into querystring key/value multi-maps
//!
//! This crate flattens records, maps, sequences and any nesting of them into
//! a [`Values`] multi-map whose keys name each leaf by its path, using the
//! bracket syntax understood by [qs](https://github.com/ljharb/qs) and
//! [`Rack::Utils::parse_nested_query`](http://www.rubydoc.info/github/rack/rack/Rack/Utils#parse_nested_query-class_method):
//! `user[name]`, `tags[0]`, `filter[range][from]`.
//!
//! ## Supported Types
//!
//! At the **top level**, only records, sequences and maps can be encoded,
//! optionally behind one reference. Querystrings rely on having a key for
//! each value, which a bare scalar cannot provide. A top-level `None` encodes
//! to empty values. Date-times count as records: at the top level they are
//! written under the empty key.
//!
//! Below the top level:
//!
//! * scalars are written with their natural textual representation
//! * `None` (a null reference) is omitted
//! * sequences get one `[i]` segment per element
//! * map keys must be strings
//! * date-times are formatted with the configured layout
//!   (see [`set_time_format`])
//! * nesting is limited to [`MAX_LEVEL`] levels
//!
//! ## Usage
//!
//! Types describe themselves through the [`Encode`] trait. Record fields
//! carry a tag directive (`name[,option...]`) that renames the key, skips
//! the field (`-`), or omits zero values (`omitempty`):
//!
//! ```
//! use query_values::{Encode, Field, Kind};
//!
//! struct Address {
//!     city: String,
//!     postcode: String,
//! }
//!
//! impl Encode for Address {
//!     fn kind(&self) -> Kind<'_> {
//!         Kind::Record(vec![
//!             Field::new("City", &self.city).tag("city"),
//!             Field::new("Postcode", &self.postcode).tag("postcode"),
//!         ])
//!     }
//! }
//!
//! struct QueryParams {
//!     id: u8,
//!     name: String,
//!     address: Address,
//!     nickname: Option<String>,
//!     user_ids: Vec<u8>,
//!     secret: String,
//! }
//!
//! impl Encode for QueryParams {
//!     fn kind(&self) -> Kind<'_> {
//!         Kind::Record(vec![
//!             Field::new("ID", &self.id).tag("id"),
//!             Field::new("Name", &self.name).tag("name"),
//!             Field::new("Address", &self.address).tag("address"),
//!             Field::new("Nickname", &self.nickname).tag("nickname,omitempty"),
//!             Field::new("UserIDs", &self.user_ids).tag("user_ids"),
//!             Field::new("Secret", &self.secret).tag("-"),
//!         ])
//!     }
//! }
//!
//! let params = QueryParams {
//!     id: 42,
//!     name: "Acme".to_string(),
//!     address: Address {
//!         city: "Carrot City".to_string(),
//!         postcode: "12345".to_string(),
//!     },
//!     nickname: None,
//!     user_ids: vec![1, 2],
//!     secret: "hunter2".to_string(),
//! };
//!
//! let values = query_values::to_values(&params).unwrap();
//! assert_eq!(values.get("address[city]"), Some("Carrot City"));
//! assert_eq!(values.get_all("user_ids[1]"), ["2"]);
//! assert!(!values.contains_key("Secret"));
//!
//! assert_eq!(
//!     values.encode(),
//!     "address[city]=Carrot+City&address[postcode]=12345&id=42&name=Acme&\
//!      user_ids[0]=1&user_ids[1]=2"
//! );
//! ```
//!
//! Any `serde::Serialize` type can be encoded as well, see
//! [`serialize_values`].

mod config;
mod encoder;
mod error;
pub mod helpers;
mod ser;
mod tag;
mod value;
mod values;
mod zero;

#[doc(inline)]
pub use config::{Config, DEFAULT_TIME_FORMAT, set_time_format, time_format};
#[doc(inline)]
pub use encoder::MAX_LEVEL;
#[doc(inline)]
pub use error::{Error, Result};
#[doc(inline)]
pub use tag::{TagOptions, parse_tag};
#[doc(inline)]
pub use value::{Encode, EncodeValues, Field, Kind, Scalar, ValueKind};
#[doc(inline)]
pub use values::Values;
#[doc(inline)]
pub use zero::is_empty_value;

/// Encodes a value into [`Values`].
///
/// Date-times are formatted with the process-wide layout, see
/// [`set_time_format`]; use [`Config`] to override it per call.
///
/// ```
/// use std::collections::BTreeMap;
///
/// let mut filter = BTreeMap::new();
/// filter.insert("status", vec!["open", "closed"]);
///
/// let values = query_values::to_values(&filter).unwrap();
/// assert_eq!(values.encode(), "status[0]=open&status[1]=closed");
///
/// let err = query_values::to_values(&"bare string").unwrap_err();
/// assert_eq!(err, query_values::Error::UnsupportedRootKind(query_values::ValueKind::String));
/// ```
pub fn to_values<T: Encode + ?Sized>(input: &T) -> Result<Values> {
    Config::default().encode_values(input)
}

/// Encodes a value into a querystring.
pub fn to_string<T: Encode + ?Sized>(input: &T) -> Result<String> {
    Config::default().encode_string(input)
}

/// Encodes any `serde::Serialize` value into [`Values`].
///
/// ```
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Query {
///     name: String,
///     age: u8,
///     #[serde(skip_serializing_if = "Option::is_none")]
///     occupation: Option<String>,
/// }
///
/// let q = Query {
///     name: "Alice".to_owned(),
///     age: 24,
///     occupation: None,
/// };
///
/// let values = query_values::serialize_values(&q).unwrap();
/// assert_eq!(values.get("name"), Some("Alice"));
/// assert_eq!(values.get("age"), Some("24"));
/// assert!(!values.contains_key("occupation"));
/// ```
pub fn serialize_values<T: serde::Serialize + ?Sized>(input: &T) -> Result<Values> {
    Config::default().serialize_values(input)
}

/// Encodes any `serde::Serialize` value into a querystring.
pub fn serialize_string<T: serde::Serialize + ?Sized>(input: &T) -> Result<String> {
    Config::default().serialize_string(input)
}
