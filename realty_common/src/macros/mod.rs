//! # Common macros.

/// A macro that creates a static `regex::Regex` instance from a string literal.
///
/// # Examples
///
/// ```
/// use realty_common::regex;
///
/// let re = regex!("^[0-9a-f]{24}$");
/// assert!(re.is_match("681c7584b512c1249196b08f"));
/// ```
#[macro_export(local_inner_macros)]
macro_rules! regex {
    ($re:literal $(,)?) => {{
        static REGEX: ::std::sync::OnceLock<::regex::Regex> = ::std::sync::OnceLock::new();
        REGEX.get_or_init(|| ::regex::Regex::new($re).unwrap())
    }};
}
