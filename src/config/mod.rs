//! JSON configuration of the command-line tools.
//!
//! Tool configs are plain serde structs that convert into the library's
//! parameter types; the library never reads them directly.

pub mod clumping;
