use std::borrow::Cow;
use std::sync::{PoisonError, RwLock};

use crate::error::Result;
use crate::value::Encode;
use crate::values::Values;

/// Layout used for date-times unless overridden, in chrono `strftime`
/// syntax. Renders as e.g. `2000-01-01 12:34:56`.
pub const DEFAULT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

static TIME_FORMAT: RwLock<Cow<'static, str>> = RwLock::new(Cow::Borrowed(DEFAULT_TIME_FORMAT));

/// Sets the process-wide date-time layout.
///
/// This is meant to be configured once during initialization. It affects
/// every later encode that does not set [`Config::time_format`], and never
/// changes values that were already produced.
pub fn set_time_format(layout: impl Into<String>) {
    let mut current = TIME_FORMAT.write().unwrap_or_else(PoisonError::into_inner);
    *current = Cow::Owned(layout.into());
}

/// Returns the process-wide date-time layout.
pub fn time_format() -> String {
    TIME_FORMAT
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .to_string()
}

/// Configuration for encoding behavior.
///
/// ## Time format
///
/// Date-times are formatted with the process-wide layout set through
/// [`set_time_format`], unless a layout is given here.
///
/// ```
/// use chrono::NaiveDate;
/// use query_values::{Config, Encode, Field, Kind};
///
/// struct Event {
///     at: chrono::NaiveDateTime,
/// }
///
/// impl Encode for Event {
///     fn kind(&self) -> Kind<'_> {
///         Kind::Record(vec![Field::new("at", &self.at)])
///     }
/// }
///
/// let event = Event {
///     at: NaiveDate::from_ymd_opt(2000, 1, 1)
///         .unwrap()
///         .and_hms_opt(12, 34, 56)
///         .unwrap(),
/// };
///
/// let config = Config::new().time_format("%Y%m%d");
/// assert_eq!(config.encode_string(&event).unwrap(), "at=20000101");
/// ```
///
/// ## Wire encoding
///
/// By default the wire string uses query-string encoding, which keeps
/// brackets in keys readable. Set `use_form_encoding` to percent-encode
/// everything outside the `application/x-www-form-urlencoded` safe set.
#[derive(Clone, Debug)]
pub struct Config {
    time_format: Option<Cow<'static, str>>,
    use_form_encoding: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub const fn new() -> Self {
        Self {
            time_format: None,
            use_form_encoding: cfg!(feature = "default_to_form_encoding"),
        }
    }

    /// Formats date-times with `layout` instead of the process-wide layout.
    pub fn time_format(mut self, layout: impl Into<Cow<'static, str>>) -> Self {
        self.time_format = Some(layout.into());
        self
    }

    /// Use `application/x-www-form-urlencoded` percent-encoding for the
    /// wire string. Has no effect on the produced [`Values`].
    ///
    /// The `default_to_form_encoding` Cargo feature makes `true` the default.
    pub fn use_form_encoding(mut self, use_form_encoding: bool) -> Self {
        self.use_form_encoding = use_form_encoding;
        self
    }

    /// Encodes `input` into [`Values`] using this `Config`.
    pub fn encode_values<T: Encode + ?Sized>(&self, input: &T) -> Result<Values> {
        match &self.time_format {
            Some(layout) => crate::encoder::encode_root(input, layout),
            None => crate::encoder::encode_root(input, &time_format()),
        }
    }

    /// Encodes any `Serialize` value into [`Values`] using this `Config`.
    pub fn serialize_values<T: serde::Serialize + ?Sized>(&self, input: &T) -> Result<Values> {
        let node = crate::ser::to_node(input)?;
        self.encode_values(&node)
    }

    /// Encodes `input` into a querystring using this `Config`.
    pub fn encode_string<T: Encode + ?Sized>(&self, input: &T) -> Result<String> {
        self.encode_values(input)
            .map(|values| values.encode_with(self.use_form_encoding))
    }

    /// Encodes any `Serialize` value into a querystring using this `Config`.
    pub fn serialize_string<T: serde::Serialize + ?Sized>(&self, input: &T) -> Result<String> {
        self.serialize_values(input)
            .map(|values| values.encode_with(self.use_form_encoding))
    }
}
