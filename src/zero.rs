//! The zero-value predicate behind `omitempty`.

use crate::value::{Encode, Kind, Scalar};

/// Checks if a value should be considered empty for the purposes of
/// omitting fields with the `omitempty` option.
///
/// The check is structural and never looks through references: a non-null
/// reference to an empty value is not itself empty.
pub fn is_empty_value(value: &dyn Encode) -> bool {
    match value.kind() {
        Kind::Seq(items) => items.is_empty(),
        Kind::Map(entries) => entries.is_empty(),
        Kind::Scalar(Scalar::Str(s)) => s.is_empty(),
        Kind::Scalar(Scalar::Bool(b)) => !b,
        Kind::Scalar(Scalar::Int(v)) => v == 0,
        Kind::Scalar(Scalar::Uint(v)) => v == 0,
        Kind::Scalar(Scalar::F32(v)) => v == 0.0,
        Kind::Scalar(Scalar::F64(v)) => v == 0.0,
        Kind::Null => true,
        Kind::Ref(_) => false,
        Kind::Record(_) | Kind::Time(_) | Kind::Scalar(Scalar::Char(_) | Scalar::Unit) => {
            value.is_zero().unwrap_or(false)
        }
    }
}
