pub mod geo;
pub mod id;
pub mod locale;
pub mod macros;
