//! Static curriculum data.
//!
//! Contains the assignment catalog: fixture layouts and check batteries for
//! every module.

pub mod curriculum;
