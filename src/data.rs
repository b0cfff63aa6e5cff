//! The source data of an icon font.

use lazy_static::lazy_static;
use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Maps Unicode scalers to glyph ids.
///
/// A `BTreeMap` is used since a character map is frequently accessed in ascending order of character codes.
pub type CharacterMap = BTreeMap<char, u32>;

lazy_static! {
    /// The icon set the generator ships with.
    static ref DEFAULT_MAPPING: IconMapping = IconMapping::from_pairs(&[
        ('M', "max.svg"),
        ('V', "vk.svg"),
        ('T', "telegram.svg"),
        ('O', "ok.svg"),
        ('R', "rutube.svg"),
        ('Y', "youtube.svg"),
        ('I', "instagram.svg"),
        ('F', "facebook.svg"),
        ('f', "find.svg"),
        ('u', "link.svg"),
        ('l', "map.svg"),
        ('m', "mail.svg"),
        ('+', "close.svg"),
        ('*', "phone-fax.svg"),
        ('t', "phone.svg"),
        ('P', "people.svg"),
        ('v', "play.svg"),
        ('r', "rub.svg"),
        // arrows
        ('>', "arrow-up.svg"),
        ('<', "arrow-dn.svg"),
        ('}', "arrow-right.svg"),
        // files
        ('w', "file-word.svg"),
        ('p', "file-pdf.svg"),
        ('d', "file.svg"),
        ('x', "file-xl.svg"),
        ('z', "file-zip.svg"),
    ]);
}

/// A single character assigned to an SVG file.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct MappingEntry {
    /// The character the icon is typed with.
    pub character: char,
    /// The SVG file name, relative to the icon directory.
    pub file: String,
}

/// An ordered assignment of characters to SVG files.
///
/// The order of the entries is the order in which glyphs are built.
/// Characters are expected to be unique; see [`IconMapping::duplicates`].
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct IconMapping {
    entries: Vec<MappingEntry>,
}

impl IconMapping {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        IconMapping::default()
    }

    /// Returns the icon set the generator ships with.
    pub fn builtin() -> Self {
        DEFAULT_MAPPING.clone()
    }

    /// Creates a mapping from `(character, file)` pairs, keeping their order.
    pub fn from_pairs(pairs: &[(char, &str)]) -> Self {
        let mut mapping = IconMapping::new();
        for &(character, file) in pairs {
            mapping.push(character, file);
        }
        mapping
    }

    /// Appends an entry.
    pub fn push(&mut self, character: char, file: impl Into<String>) {
        self.entries.push(MappingEntry {
            character,
            file: file.into(),
        });
    }

    /// The entries in mapping order.
    pub fn entries(&self) -> &[MappingEntry] {
        &self.entries
    }

    /// The number of entries, duplicates included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the mapping has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns every entry whose character was already assigned by an earlier entry.
    pub fn duplicates(&self) -> Vec<Duplicate> {
        let mut first: HashMap<char, &str> = HashMap::new();
        let mut duplicates = Vec::new();

        for entry in &self.entries {
            match first.entry(entry.character) {
                Entry::Vacant(slot) => {
                    slot.insert(&entry.file);
                }
                Entry::Occupied(slot) => duplicates.push(Duplicate {
                    character: entry.character,
                    kept: slot.get().to_string(),
                    dropped: entry.file.clone(),
                }),
            }
        }

        duplicates
    }

    /// Parses a mapping file.
    ///
    /// Each non-empty line has the form `<character> = <file>`.
    /// Lines starting with `#` are comments.
    /// The character may be written literally or as `U+XXXX`.
    ///
    /// # Example
    ///
    /// ```
    /// # use iconforge::data::IconMapping;
    /// let mapping = IconMapping::parse("# social\nM = max.svg\nU+2192 = arrow.svg\n").unwrap();
    /// assert_eq!(mapping.len(), 2);
    /// assert_eq!(mapping.entries()[1].character, '→');
    /// ```
    pub fn parse(text: &str) -> Result<IconMapping, MappingError> {
        let mut mapping = IconMapping::new();

        for (index, line) in text.lines().enumerate() {
            let line_number = index + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            // `=` itself may be mapped, so split at the last separator
            let (key, file) = trimmed
                .rsplit_once('=')
                .ok_or(MappingError::InvalidSyntax { line: line_number })?;
            let key = key.trim();
            let file = file.trim();

            if file.is_empty() {
                return Err(MappingError::MissingFile { line: line_number });
            }

            let character = parse_character(key).ok_or_else(|| MappingError::InvalidCharacter {
                line: line_number,
                key: key.to_string(),
            })?;

            mapping.push(character, file);
        }

        Ok(mapping)
    }
}

/// Parses a mapping key: a single character or a `U+XXXX` code point.
fn parse_character(key: &str) -> Option<char> {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => {
            let hex = key.strip_prefix("U+").or_else(|| key.strip_prefix("u+"))?;
            u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
        }
    }
}

/// A mapping entry that repeats an already assigned character.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct Duplicate {
    /// The repeated character.
    pub character: char,
    /// The file of the first entry, which wins.
    pub kept: String,
    /// The file of the repeating entry, which is dropped.
    pub dropped: String,
}

impl fmt::Display for Duplicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "character {:?} is assigned to {} and again to {}",
            self.character, self.kept, self.dropped
        )
    }
}

/// An error that may occur when parsing a mapping file.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub enum MappingError {
    /// A line has no `=` separator.
    InvalidSyntax {
        /// The 1-based line number.
        line: usize,
    },
    /// A line names no file.
    MissingFile {
        /// The 1-based line number.
        line: usize,
    },
    /// A key is neither a single character nor a valid `U+XXXX` code point.
    InvalidCharacter {
        /// The 1-based line number.
        line: usize,
        /// The offending key.
        key: String,
    },
}

impl fmt::Display for MappingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSyntax { line } => write!(f, "line {}: expected `<character> = <file>`", line),
            Self::MissingFile { line } => write!(f, "line {}: no file given", line),
            Self::InvalidCharacter { line, key } => {
                write!(f, "line {}: {:?} is not a single character", line, key)
            }
        }
    }
}

impl std::error::Error for MappingError {}
