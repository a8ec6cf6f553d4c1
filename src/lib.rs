pub mod common {
    pub use realty_common::*;
}

pub mod macros {
    pub use realty_macros::*;
}

#[cfg(feature = "query")]
pub mod query {
    pub use realty_query::*;
}
