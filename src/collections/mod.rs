//! Collection Types.

pub mod hash_table;

/// Collection Types Prelude
pub mod prelude {
    #[doc(no_inline)]
    pub use crate::table;

    #[doc(no_inline)]
    pub use super::hash_table::{HashTable, InvalidConfiguration};
}
