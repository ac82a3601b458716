//! The traversal that turns an [`Encode`] value into [`Values`].
//!
//! ## Overview
//!
//! Encoding starts at the root with an empty scope at level 1. The
//! dispatcher (`Encoder::encode_value`) inspects a value's [`Kind`] and
//! either writes a leaf, hands the value to a custom encoder, or recurses
//! through one of the record, sequence and map rules. Each of these rules
//! derives a deeper scope:
//!
//! - record field `name` at the root becomes `name`, below it `parent[name]`
//! - sequence element `i` becomes `parent[i]`
//! - map entry `key` is named like a record field
//!
//! Every nesting step increments the level. Exceeding [`MAX_LEVEL`] aborts
//! the encode, which also bounds cyclic structures built from shared
//! pointers.
//!
//! References are unwrapped in place: a null reference writes nothing and a
//! non-null reference is encoded at the same scope as its target. Custom
//! encoders are looked up after one reference has been removed, so a type's
//! reference-form encoder only applies behind a second level of
//! indirection, e.g. `Some(Box::new(value))`.

use std::fmt::{self, Write};

use chrono::{DateTime, FixedOffset};
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::tag::parse_tag;
use crate::value::{Encode, Field, Kind, Scalar};
use crate::values::Values;
use crate::zero::is_empty_value;

/// Maximum nesting level. The root value is at level 1.
pub const MAX_LEVEL: usize = 7;

/// The key prefix accumulated so far, together with the nesting level.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Scope {
    scope: String,
    level: usize,
}

impl Scope {
    fn root() -> Self {
        Self {
            scope: String::new(),
            level: 1,
        }
    }

    /// Scope of a record field or map entry named `name`.
    fn nested(&self, name: &str) -> Self {
        let scope = if self.scope.is_empty() {
            name.to_owned()
        } else {
            format!("{}[{}]", self.scope, name)
        };
        Self {
            scope,
            level: self.level + 1,
        }
    }

    /// Scope of the sequence element at `index`.
    fn indexed(&self, index: usize) -> Self {
        let mut buffer = itoa::Buffer::new();
        Self {
            scope: format!("{}[{}]", self.scope, buffer.format(index)),
            level: self.level + 1,
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.scope)
    }
}

/// Encodes `input` into a fresh [`Values`].
///
/// The root may be behind at most one reference, and must then be a
/// record, sequence, map or date-time. A null root produces empty values.
pub(crate) fn encode_root<T: Encode + ?Sized>(input: &T, time_format: &str) -> Result<Values> {
    let mut encoder = Encoder::new(time_format);
    match input.kind() {
        Kind::Null => {}
        Kind::Ref(inner) => encoder.encode_root_value(inner)?,
        _ => encoder.encode_root_value(&input)?,
    }
    Ok(encoder.values)
}

struct Encoder<'c> {
    time_format: &'c str,
    values: Values,
}

impl<'c> Encoder<'c> {
    fn new(time_format: &'c str) -> Self {
        Self {
            time_format,
            values: Values::new(),
        }
    }

    fn encode_root_value(&mut self, value: &dyn Encode) -> Result<()> {
        match value.kind() {
            Kind::Record(_) | Kind::Seq(_) | Kind::Map(_) | Kind::Time(_) => {}
            other => {
                let kind = other.value_kind();
                debug!(%kind, "unsupported root value");
                return Err(Error::UnsupportedRootKind(kind));
            }
        }
        self.encode_value(&Scope::root(), value)
    }

    /// Encodes one value at `scope`.
    ///
    /// One reference is removed up front. If the value found there is itself
    /// a reference, its target's reference-form encoder becomes eligible.
    fn encode_value<'v>(&mut self, scope: &Scope, value: &'v dyn Encode) -> Result<()> {
        if scope.level > MAX_LEVEL {
            debug!(%scope, level = scope.level, "maximum nesting level exceeded");
            return Err(Error::MaxDepthExceeded(MAX_LEVEL));
        }

        let (value, kind) = match value.kind() {
            Kind::Ref(inner) => (inner, inner.kind()),
            kind => (value, kind),
        };

        let custom = match kind {
            Kind::Null => return Ok(()),
            Kind::Time(ref time) => return self.encode_time(scope, time),
            Kind::Ref(target) => target.ref_encoder().or_else(|| target.encoder()),
            _ => value.encoder(),
        };
        if let Some(custom) = custom {
            trace!(%scope, "custom encoder claimed value");
            return custom.encode_values(&scope.scope, &mut self.values);
        }

        match kind {
            // `value` is still a reference, the next call removes it
            Kind::Ref(_) => self.encode_value(scope, value),
            Kind::Record(fields) => self.encode_record(scope, fields),
            Kind::Seq(items) => self.encode_seq(scope, items),
            Kind::Map(entries) => self.encode_map(scope, entries),
            Kind::Scalar(scalar) => {
                self.values.add(scope.scope.as_str(), scalar.to_text());
                Ok(())
            }
            Kind::Null | Kind::Time(_) => Ok(()),
        }
    }

    fn encode_time(&mut self, scope: &Scope, time: &DateTime<FixedOffset>) -> Result<()> {
        let mut formatted = String::new();
        write!(formatted, "{}", time.format(self.time_format))
            .map_err(|_| Error::TimeFormat(self.time_format.to_owned()))?;
        self.values.add(scope.scope.as_str(), formatted);
        Ok(())
    }

    fn encode_record(&mut self, scope: &Scope, fields: Vec<Field<'_>>) -> Result<()> {
        for field in fields {
            if field.is_hidden() && !field.is_embedded() {
                continue;
            }
            let (name, opts) = parse_tag(field.tag_str());
            if name == "-" {
                continue;
            }

            if field.is_embedded() && self.try_flatten(scope, &field)? {
                continue;
            }

            if opts.contains("omitempty") && is_empty_value(field.value()) {
                continue;
            }
            let name = if name.is_empty() { field.ident() } else { name };
            self.encode_value(&scope.nested(name), field.value())?;
        }
        Ok(())
    }

    /// Encodes an embedded record or date-time at the parent's scope.
    ///
    /// Returns `false` when the field, after one dereference, is neither;
    /// it is then encoded like any other field.
    fn try_flatten(&mut self, scope: &Scope, field: &Field<'_>) -> Result<bool> {
        let target = match field.value().kind() {
            Kind::Ref(inner) => inner,
            _ => field.value(),
        };
        if !matches!(target.kind(), Kind::Record(_) | Kind::Time(_)) {
            return Ok(false);
        }
        trace!(%scope, field = field.ident(), "flattening embedded value");
        self.encode_value(scope, target)?;
        Ok(true)
    }

    fn encode_seq(&mut self, scope: &Scope, items: Vec<&dyn Encode>) -> Result<()> {
        for (index, item) in items.into_iter().enumerate() {
            self.encode_value(&scope.indexed(index), item)?;
        }
        Ok(())
    }

    fn encode_map(&mut self, scope: &Scope, entries: Vec<(&dyn Encode, &dyn Encode)>) -> Result<()> {
        for (key, value) in entries {
            let key = match key.kind() {
                Kind::Scalar(Scalar::Str(key)) => key,
                other => {
                    debug!(%scope, kind = %other.value_kind(), "map key is not a string");
                    return Err(Error::InvalidMapKeyKind(other.value_kind()));
                }
            };
            self.encode_value(&scope.nested(key), value)?;
        }
        Ok(())
    }
}
