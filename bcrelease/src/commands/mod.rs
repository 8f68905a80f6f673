//! Command implementations for `bcrelease`.

pub mod release;
