//! Compilers for the tables of a TrueType font.
//!
//! Each module provides a `compile` function returning the bytes of one table.
//! [`crate::sfnt::compile_ttf`] calls them and assembles the results.

pub mod cmap;
pub mod glyf;
pub mod head;
pub mod hhea;
pub mod hmtx;
pub mod maxp;
pub mod name;
pub mod os2;
pub mod post;
