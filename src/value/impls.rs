use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::hash::BuildHasher;
use std::rc::Rc;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

use super::{Encode, EncodeValues, Kind, Scalar};

macro_rules! encode_int {
    ($($ty:ty => $variant:ident as $cast:ty,)*) => {
        $(
            impl Encode for $ty {
                fn kind(&self) -> Kind<'_> {
                    Kind::Scalar(Scalar::$variant(*self as $cast))
                }
            }
        )*
    };
}

encode_int! {
    i8 => Int as i64,
    i16 => Int as i64,
    i32 => Int as i64,
    i64 => Int as i64,
    isize => Int as i64,
    u8 => Uint as u64,
    u16 => Uint as u64,
    u32 => Uint as u64,
    u64 => Uint as u64,
    usize => Uint as u64,
}

impl Encode for f32 {
    fn kind(&self) -> Kind<'_> {
        Kind::Scalar(Scalar::F32(*self))
    }
}

impl Encode for f64 {
    fn kind(&self) -> Kind<'_> {
        Kind::Scalar(Scalar::F64(*self))
    }
}

impl Encode for bool {
    fn kind(&self) -> Kind<'_> {
        Kind::Scalar(Scalar::Bool(*self))
    }
}

impl Encode for char {
    fn kind(&self) -> Kind<'_> {
        Kind::Scalar(Scalar::Char(*self))
    }
}

impl Encode for () {
    fn kind(&self) -> Kind<'_> {
        Kind::Scalar(Scalar::Unit)
    }
}

impl Encode for str {
    fn kind(&self) -> Kind<'_> {
        Kind::Scalar(Scalar::Str(self))
    }
}

impl Encode for String {
    fn kind(&self) -> Kind<'_> {
        Kind::Scalar(Scalar::Str(self))
    }
}

impl Encode for Cow<'_, str> {
    fn kind(&self) -> Kind<'_> {
        Kind::Scalar(Scalar::Str(self))
    }
}

// Borrows are transparent: a `&T` field encodes exactly like a `T` field.
impl<T: Encode + ?Sized> Encode for &T {
    fn kind(&self) -> Kind<'_> {
        (**self).kind()
    }

    fn encoder(&self) -> Option<&dyn EncodeValues> {
        (**self).encoder()
    }

    fn ref_encoder(&self) -> Option<&dyn EncodeValues> {
        (**self).ref_encoder()
    }

    fn is_zero(&self) -> Option<bool> {
        (**self).is_zero()
    }
}

impl<T: Encode + ?Sized> Encode for &mut T {
    fn kind(&self) -> Kind<'_> {
        (**self).kind()
    }

    fn encoder(&self) -> Option<&dyn EncodeValues> {
        (**self).encoder()
    }

    fn ref_encoder(&self) -> Option<&dyn EncodeValues> {
        (**self).ref_encoder()
    }

    fn is_zero(&self) -> Option<bool> {
        (**self).is_zero()
    }
}

impl<T: Encode> Encode for Option<T> {
    fn kind(&self) -> Kind<'_> {
        match self {
            Some(value) => Kind::Ref(value),
            None => Kind::Null,
        }
    }
}

macro_rules! encode_pointer {
    ($($ptr:ident),*) => {
        $(
            impl<T: Encode> Encode for $ptr<T> {
                fn kind(&self) -> Kind<'_> {
                    Kind::Ref(&**self)
                }
            }
        )*
    };
}

encode_pointer!(Box, Rc, Arc);

impl Encode for Box<dyn Encode + '_> {
    fn kind(&self) -> Kind<'_> {
        Kind::Ref(&**self)
    }
}

impl<T: Encode> Encode for [T] {
    fn kind(&self) -> Kind<'_> {
        Kind::Seq(self.iter().map(|item| item as &dyn Encode).collect())
    }
}

impl<T: Encode, const N: usize> Encode for [T; N] {
    fn kind(&self) -> Kind<'_> {
        self.as_slice().kind()
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn kind(&self) -> Kind<'_> {
        self.as_slice().kind()
    }
}

impl<T: Encode> Encode for VecDeque<T> {
    fn kind(&self) -> Kind<'_> {
        Kind::Seq(self.iter().map(|item| item as &dyn Encode).collect())
    }
}

impl<K: Encode, V: Encode, S: BuildHasher> Encode for HashMap<K, V, S> {
    fn kind(&self) -> Kind<'_> {
        Kind::Map(
            self.iter()
                .map(|(k, v)| (k as &dyn Encode, v as &dyn Encode))
                .collect(),
        )
    }
}

impl<K: Encode, V: Encode> Encode for BTreeMap<K, V> {
    fn kind(&self) -> Kind<'_> {
        Kind::Map(
            self.iter()
                .map(|(k, v)| (k as &dyn Encode, v as &dyn Encode))
                .collect(),
        )
    }
}

#[cfg(feature = "indexmap")]
impl<K: Encode, V: Encode, S: BuildHasher> Encode for indexmap::IndexMap<K, V, S> {
    fn kind(&self) -> Kind<'_> {
        Kind::Map(
            self.iter()
                .map(|(k, v)| (k as &dyn Encode, v as &dyn Encode))
                .collect(),
        )
    }
}

// Date-times count as zero at the Unix epoch, which is what their
// `Default` impls produce.
impl<Tz: TimeZone> Encode for DateTime<Tz> {
    fn kind(&self) -> Kind<'_> {
        Kind::Time(self.fixed_offset())
    }

    fn is_zero(&self) -> Option<bool> {
        Some(self.timestamp() == 0 && self.timestamp_subsec_nanos() == 0)
    }
}

impl Encode for NaiveDateTime {
    fn kind(&self) -> Kind<'_> {
        Kind::Time(self.and_utc().fixed_offset())
    }

    fn is_zero(&self) -> Option<bool> {
        self.and_utc().is_zero()
    }
}

impl Encode for NaiveDate {
    fn kind(&self) -> Kind<'_> {
        Kind::Time(self.and_time(NaiveTime::MIN).and_utc().fixed_offset())
    }

    fn is_zero(&self) -> Option<bool> {
        self.and_time(NaiveTime::MIN).is_zero()
    }
}
