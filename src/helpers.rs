//! `serialize_with` functions that collapse a sequence into one value.
//!
//! Through the serde bridge a `Vec` normally becomes one key per element
//! (`ids[0]=1&ids[1]=2`). Fields using one of these functions are written
//! as a single delimited string instead (`ids=1,2`). Elements are joined
//! with their `Display` text; escaping happens later, when [`Values`] are
//! turned into a wire string.
//!
//! [`Values`]: crate::Values

use std::fmt::Display;

use serde::Serializer;

/// Joins `items` with `delimiter` and serializes the result as a string.
fn join<S, T>(items: &[T], delimiter: char, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: Display,
{
    let mut joined = String::new();
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            joined.push(delimiter);
        }
        joined.push_str(&item.to_string());
    }
    serializer.serialize_str(&joined)
}

/// Any single-character delimiter, chosen through a const parameter.
///
/// ```
/// use serde::Serialize;
/// use query_values::helpers::generic_delimiter::serialize;
///
/// #[derive(Serialize)]
/// struct Version {
///     #[serde(serialize_with = "serialize::<_, _, '.'>")]
///     v: Vec<u8>,
/// }
///
/// let version = Version { v: vec![1, 2, 3] };
/// assert_eq!(query_values::serialize_string(&version).unwrap(), "v=1.2.3");
/// ```
pub mod generic_delimiter {
    use std::fmt::Display;

    use serde::Serializer;

    pub fn serialize<S, T, const DELIM: char>(items: &[T], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: Display,
    {
        super::join(items, DELIM, serializer)
    }
}

/// Comma-joined values, OpenAPI `style=form, explode=false`.
///
/// ```
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Filter {
///     #[serde(serialize_with = "query_values::helpers::comma_separated::serialize")]
///     status: Vec<&'static str>,
/// }
///
/// let filter = Filter { status: vec!["open", "closed"] };
/// assert_eq!(
///     query_values::serialize_string(&filter).unwrap(),
///     "status=open,closed"
/// );
/// ```
pub mod comma_separated {
    use std::fmt::Display;

    use serde::Serializer;

    pub fn serialize<S, T>(items: &[T], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: Display,
    {
        super::join(items, ',', serializer)
    }
}

/// `|`-joined values, OpenAPI `style=pipeDelimited`.
pub mod pipe_delimited {
    use std::fmt::Display;

    use serde::Serializer;

    pub fn serialize<S, T>(items: &[T], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: Display,
    {
        super::join(items, '|', serializer)
    }
}

/// Space-joined values, OpenAPI `style=spaceDelimited`. The spaces show up
/// as `+` in a query-encoded wire string.
pub mod space_delimited {
    use std::fmt::Display;

    use serde::Serializer;

    pub fn serialize<S, T>(items: &[T], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: Display,
    {
        super::join(items, ' ', serializer)
    }
}

#[cfg(test)]
mod test {
    use serde::Serialize;

    use crate::Config;

    #[derive(Serialize)]
    struct Query {
        #[serde(serialize_with = "super::comma_separated::serialize")]
        comma: Vec<u8>,
        #[serde(serialize_with = "super::pipe_delimited::serialize")]
        pipe: Vec<u8>,
        #[serde(serialize_with = "super::space_delimited::serialize")]
        space: Vec<u8>,
    }

    fn query() -> Query {
        Query {
            comma: vec![],
            pipe: vec![1, 2],
            space: vec![3, 4],
        }
    }

    #[test]
    fn delimiters() {
        let values = crate::serialize_values(&query()).unwrap();
        assert_eq!(values.get("comma"), Some(""));
        assert_eq!(values.get("pipe"), Some("1|2"));
        assert_eq!(values.get("space"), Some("3 4"));

        assert_eq!(
            crate::serialize_string(&query()).unwrap(),
            "comma=&pipe=1|2&space=3+4"
        );
    }

    #[test]
    fn delimiters_are_escaped_by_form_encoding() {
        let s = Config::new()
            .use_form_encoding(true)
            .serialize_string(&query())
            .unwrap();
        assert_eq!(s, "comma=&pipe=1%7C2&space=3%204");
    }
}
