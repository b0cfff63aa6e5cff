//! The demo page: one card per glyph and a text field previewing typed characters in the icon font.

use super::{class_name, ClassStyle};
use crate::artifact::ArtifactKind;
use crate::font::Glyph;

/// The number of glyph characters prefilled into the preview field.
const PREVIEW_LENGTH: usize = 5;

/// Returns the demo page for a font.
///
/// ```
/// # use iconforge::emit::{html, ClassStyle};
/// let page = html("ProTo", "ProTo", &[], ClassStyle::Prefixed);
/// assert!(page.contains(r#"<link rel="stylesheet" href="ProTo.css">"#));
/// ```
pub fn html(family: &str, base: &str, glyphs: &[Glyph], style: ClassStyle) -> String {
    let title = escape(family);
    let stylesheet = escape(&format!("{}.{}", base, ArtifactKind::Css.extension()));
    // raw text inside <style> is not entity-decoded
    let font_family = family
        .replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace('<', "\\3c ");
    let preview = escape(&glyphs.iter().take(PREVIEW_LENGTH).map(|x| x.character).collect::<String>());

    let cards: String = glyphs.iter().map(|x| card(x, style)).collect();

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>{title} Icon Font Demo</title>
    <link rel="stylesheet" href="{stylesheet}">
    <style>
        body {{ font-family: sans-serif; margin: 40px; background: #f5f5f5; }}
        .container {{ max-width: 1200px; margin: 0 auto; background: white; padding: 30px; border-radius: 10px; }}
        h1 {{ color: #333; }}
        .grid {{ display: grid; grid-template-columns: repeat(auto-fill, minmax(150px, 1fr)); gap: 20px; margin-top: 30px; }}
        .card {{ text-align: center; padding: 20px; border: 1px solid #ddd; border-radius: 8px; }}
        .card:hover {{ box-shadow: 0 5px 15px rgba(0,0,0,0.1); }}
        .card .icon {{ font-size: 48px; color: #007bff; }}
        .card .label {{ margin-top: 10px; font-size: 14px; color: #666; }}
        .card .char, .card .entity {{ font-family: monospace; background: #f0f0f0; padding: 4px; border-radius: 4px; font-size: 12px; }}
        .test-area {{ margin-top: 40px; padding: 20px; background: #e3f2fd; border-radius: 8px; }}
        .test-input {{ width: 100%; padding: 10px; font-size: 24px; font-family: '{font_family}'; margin-top: 10px; }}
        .test-output {{ margin-top: 20px; font-size: 48px; font-family: '{font_family}'; }}
    </style>
</head>
<body>
    <div class="container">
        <h1>{title} Icon Font</h1>
        <p>Icons: {count}</p>

        <div class="grid">
{cards}        </div>

        <div class="test-area">
            <h3>Preview</h3>
            <input type="text" class="test-input" id="testInput" value="{preview}" placeholder="Type mapped characters">
            <div class="test-output" id="testOutput">{preview}</div>
        </div>

        <script>
            document.getElementById('testInput').addEventListener('input', function(e) {{
                document.getElementById('testOutput').textContent = e.target.value;
            }});
        </script>
    </div>
</body>
</html>
"#,
        title = title,
        stylesheet = stylesheet,
        font_family = font_family,
        count = glyphs.len(),
        cards = cards,
        preview = preview,
    )
}

fn card(glyph: &Glyph, style: ClassStyle) -> String {
    let class = escape(&class_name(&glyph.file, style));
    let character = escape(&glyph.character.to_string());
    let entity = escape(&format!("&#x{:X};", glyph.code_point()));

    format!(
        r#"            <div class="card">
                <div class="icon {class}"></div>
                <div class="label">{class}</div>
                <div class="char">'{character}' (U+{code:04X})</div>
                <div class="entity">{entity}</div>
            </div>
"#,
        class = class,
        character = character,
        code = glyph.code_point(),
        entity = entity,
    )
}

/// Escapes text for HTML content and attribute values.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());

    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }

    out
}
