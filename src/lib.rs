//! Separate-chaining hash table with load-factor-driven growth.

#![deny(missing_docs)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]

pub mod collections;

/// Separate-Chaining Hash Table Prelude
pub mod prelude {
    #[doc(no_inline)]
    pub use crate::table;

    #[doc(no_inline)]
    pub use super::collections::hash_table::{HashTable, InvalidConfiguration};
}
