//! # iconforge
//!
//! *iconforge* turns a set of SVG icons into an icon font.
//!
//! Each icon is mapped to a single character.
//! The outlines are imported from the SVG files, compiled into a TrueType font, and converted to WOFF and WOFF2 by external tools where they are installed.
//! A style sheet with one class per icon and an HTML demo page are written next to the fonts.
//!
//! The stages of a run, in order:
//!
//! - [`probe`] locates the WOFF and WOFF2 converters.
//! - [`font::build`] imports every mapped [SVG file](crate::svg) into an [outline](crate::outline).
//! - [`sfnt::compile_ttf`] compiles the TrueType font, including the [`cmap` table](crate::sfnt::tables::cmap) with [format 4](crate::sfnt::tables::cmap::format4) and [format 12](crate::sfnt::tables::cmap::format12) subtables.
//! - [`convert`] produces the web fonts.
//! - [`emit`] writes the style sheet and the demo page.
//!
//! [`pipeline::run`] performs all stages for a [`pipeline::Config`].

#![deny(missing_docs, missing_debug_implementations)]

pub mod artifact;
pub mod cli;
pub mod convert;
pub mod ctx;
pub mod data;
pub mod emit;
pub mod font;
pub mod outline;
pub mod pipeline;
pub mod probe;
pub mod sfnt;
pub mod svg;
