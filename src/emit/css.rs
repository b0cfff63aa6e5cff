//! The style sheet: an `@font-face` rule, the `.icon` base rule, and one rule per glyph.

use super::{class_name, ClassStyle};
use crate::artifact::ArtifactKind;
use crate::font::Glyph;

/// The order in which fonts are listed in `src`; browsers pick the first format they support.
const SOURCE_ORDER: [ArtifactKind; 3] = [ArtifactKind::Woff2, ArtifactKind::Woff, ArtifactKind::Ttf];

/// Returns the style sheet for a font.
///
/// `formats` names the font files that exist; only those are listed in the `@font-face` rule.
///
/// ```
/// # use iconforge::artifact::ArtifactKind;
/// # use iconforge::emit::{css, ClassStyle};
/// let sheet = css("ProTo", "ProTo", &[ArtifactKind::Ttf], &[], ClassStyle::Prefixed);
/// assert!(sheet.contains("src: url('ProTo.ttf') format('truetype');"));
/// ```
pub fn css(
    family: &str,
    base: &str,
    formats: &[ArtifactKind],
    glyphs: &[Glyph],
    style: ClassStyle,
) -> String {
    let family = escape_string(family, '\'');
    let sources: Vec<String> = SOURCE_ORDER
        .iter()
        .filter(|x| formats.contains(x))
        .map(|kind| {
            format!(
                "url('{}.{}') format('{}')",
                escape_string(base, '\''),
                kind.extension(),
                format_name(*kind)
            )
        })
        .collect();

    let src = if sources.is_empty() {
        String::new()
    } else {
        format!("    src: {};\n", sources.join(",\n         "))
    };

    let mut out = format!(
        "/* {family} Icon Font */
@font-face {{
    font-family: '{family}';
{src}    font-weight: normal;
    font-style: normal;
    font-display: block;
}}

.icon {{
    font-family: '{family}' !important;
    speak: never;
    font-style: normal;
    font-weight: normal;
    font-variant: normal;
    text-transform: none;
    line-height: 1;
    -webkit-font-smoothing: antialiased;
    -moz-osx-font-smoothing: grayscale;
    display: inline-block;
}}

/* Icon classes */
",
        family = family,
        src = src
    );

    for glyph in glyphs {
        out.push_str(&format!(
            ".{}:before {{ content: \"{}\"; }}\n",
            class_name(&glyph.file, style),
            escape_string(&glyph.character.to_string(), '"')
        ));
    }

    out
}

/// The name of a font format in `@font-face` `src` descriptors.
fn format_name(kind: ArtifactKind) -> &'static str {
    match kind {
        ArtifactKind::Woff2 => "woff2",
        ArtifactKind::Woff => "woff",
        _ => "truetype",
    }
}

/// Escapes text for a CSS string delimited by `quote`.
///
/// Control characters become hexadecimal escapes followed by a space.
fn escape_string(text: &str, quote: char) -> String {
    let mut out = String::with_capacity(text.len());

    for c in text.chars() {
        if c == quote || c == '\\' {
            out.push('\\');
            out.push(c);
        } else if c.is_control() {
            out.push_str(&format!("\\{:x} ", c as u32));
        } else {
            out.push(c);
        }
    }

    out
}
