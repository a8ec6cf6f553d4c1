//! Macros for multilingual listing fields.

/// Creates a localized string map keyed by language code.
///
/// Multilingual listing fields are stored as `{ "tr": ..., "en": ... }`.
/// Values are anything with `to_string`.
///
/// ```
/// use realty_macros::localized;
///
/// let title = localized! {
///     tr => "Deniz manzaralı daire",
///     en => "Apartment with sea view",
/// };
/// assert_eq!(title.len(), 2);
/// assert_eq!(title["tr"], "Deniz manzaralı daire");
/// ```
#[macro_export]
macro_rules! localized {
    () => {
        ::std::collections::BTreeMap::<::std::string::String, ::std::string::String>::new()
    };
    ($($language:ident => $value:expr),+ $(,)?) => {{
        let mut _map = $crate::localized!();
        $(
            _map.insert(::std::stringify!($language).to_string(), $value.to_string());
        )+
        _map
    }};
}
