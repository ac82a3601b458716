//! Parsing of per-field tag directives.

/// The options following the name in a field's tag, without the leading
/// comma.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TagOptions<'a>(&'a str);

/// Splits a field's tag into its name and comma-separated options.
///
/// ```
/// let (name, opts) = query_values::parse_tag("id,omitempty");
/// assert_eq!(name, "id");
/// assert!(opts.contains("omitempty"));
///
/// let (name, opts) = query_values::parse_tag(",omitempty");
/// assert_eq!(name, "");
/// assert!(opts.contains("omitempty"));
/// ```
pub fn parse_tag(tag: &str) -> (&str, TagOptions<'_>) {
    match tag.split_once(',') {
        Some((name, options)) => (name, TagOptions(options)),
        None => (tag, TagOptions("")),
    }
}

impl<'a> TagOptions<'a> {
    /// Checks whether the options contain `option`. Unknown options are
    /// carried along but never acted upon.
    pub fn contains(&self, option: &str) -> bool {
        self.iter().any(|o| o == option)
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a str> + 'a {
        let options = self.0;
        options.split(',').filter(|o| !o.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}
