//! Tag filter formatting.
//!
//! Users supply tags as two comma-separated strings, one listing tags to
//! include and one listing tags to exclude. The runner template expects a
//! single comma-joined sequence of quoted tags where exclusions carry the
//! `~` negation prefix, for example `"@smoke","~@wip"`.

use serde::Deserialize;

use crate::options::quote;

const NEGATION_PREFIX: &str = "~";

/// Raw include and exclude tag lists.
///
/// Either side may be absent. A side containing only whitespace is treated
/// as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TagFilter {
    /// Comma-separated tags a scenario must carry to run.
    pub include: Option<String>,
    /// Comma-separated tags that exclude a scenario from the run.
    pub exclude: Option<String>,
}

impl TagFilter {
    /// Build a filter from optional include and exclude lists.
    #[must_use]
    pub fn new(include: Option<&str>, exclude: Option<&str>) -> Self {
        Self {
            include: include.map(str::to_owned),
            exclude: exclude.map(str::to_owned),
        }
    }

    /// Render the combined tag expression consumed by the runner template.
    ///
    /// Includes come first, followed by negated excludes. Elements are
    /// trimmed and quoted individually; the joined result is not quoted
    /// again.
    ///
    /// # Examples
    ///
    /// ```
    /// use feature_runners::TagFilter;
    ///
    /// let filter = TagFilter::new(Some("a"), Some("b, c"));
    /// assert_eq!(filter.expression(), r#""a","~b","~c""#);
    /// ```
    #[must_use]
    pub fn expression(&self) -> String {
        match (present(self.include.as_deref()), present(self.exclude.as_deref())) {
            (None, None) => String::new(),
            (Some(include), None) => format_tags(include, ""),
            (None, Some(exclude)) => format_tags(exclude, NEGATION_PREFIX),
            (Some(include), Some(exclude)) => format!(
                "{},{}",
                format_tags(include, ""),
                format_tags(exclude, NEGATION_PREFIX)
            ),
        }
    }
}

fn present(side: Option<&str>) -> Option<&str> {
    side.filter(|raw| !raw.trim().is_empty())
}

/// Split `raw` on commas and quote every trimmed, prefixed element.
///
/// Empty segments survive as quoted empty tags, so `"a,"` yields
/// `"a",""`.
fn format_tags(raw: &str, prefix: &str) -> String {
    raw.split(',')
        .map(|tag| quote(&format!("{prefix}{}", tag.trim())))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::both_absent(None, None, "")]
    #[case::both_empty(Some(""), Some(""), "")]
    #[case::both_blank(Some("   "), Some("\t"), "")]
    #[case::single_include(Some("a"), None, r#""a""#)]
    #[case::include_list_trimmed(Some("a, b"), None, r#""a","b""#)]
    #[case::single_exclude(None, Some("x"), r#""~x""#)]
    #[case::exclude_list(None, Some("x , y"), r#""~x","~y""#)]
    #[case::combined(Some("a"), Some("b,c"), r#""a","~b","~c""#)]
    #[case::blank_include_ignored(Some("  "), Some("x"), r#""~x""#)]
    #[case::blank_exclude_ignored(Some("a"), Some(" "), r#""a""#)]
    fn formats_tag_expression(
        #[case] include: Option<&str>,
        #[case] exclude: Option<&str>,
        #[case] expected: &str,
    ) {
        assert_eq!(TagFilter::new(include, exclude).expression(), expected);
    }

    #[test]
    fn trims_padding_around_every_tag() {
        let filter = TagFilter::new(Some("in1  ,  in2   ,   in3"), Some("ex1,  ex2  ,  ex3"));
        assert_eq!(
            filter.expression(),
            r#""in1","in2","in3","~ex1","~ex2","~ex3""#
        );
    }

    #[test]
    fn trailing_comma_keeps_empty_tag() {
        assert_eq!(TagFilter::new(Some("a,"), None).expression(), r#""a","""#);
        assert_eq!(TagFilter::new(None, Some("a,")).expression(), r#""~a","~""#);
    }

    #[test]
    fn expression_is_stable_across_calls() {
        let filter = TagFilter::new(Some("@smoke"), Some("@wip"));
        assert_eq!(filter.expression(), filter.expression());
    }
}
