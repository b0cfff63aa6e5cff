//! Command line parsing and [`Config`] construction.

use crate::ctx::{Context, FallbackPolicy};
use crate::data::IconMapping;
use crate::emit::ClassStyle;
use crate::pipeline::Config;
use crate::sfnt::tables::cmap::EncodingRecord;
use anyhow::{bail, Context as _, Result};
use clap::builder::{EnumValueParser, PossibleValue};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;

impl clap::ValueEnum for ClassStyle {
    fn value_variants<'a>() -> &'a [Self] {
        static STYLES: &[ClassStyle] = &[ClassStyle::Prefixed, ClassStyle::Bare];

        STYLES
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        Some(PossibleValue::new(self.as_str()))
    }
}

/// Parses the process arguments to construct a [`Config`].
///
/// # Errors
///
/// Fails if the mapping file can not be read or parsed.
pub fn get_config() -> Result<Config> {
    parse_arguments(&command_parser().get_matches())
}

/// Parses the arguments required to produce a valid [`Config`].
///
/// # Errors
///
/// Fails if the mapping file can not be read or parsed.
pub fn parse_arguments(matches: &ArgMatches) -> Result<Config> {
    let svg_dir: PathBuf = matches
        .get_one("svg-dir")
        .cloned()
        .unwrap_or_else(|| unreachable!("`svg-dir` should have a default value"));

    let base_name: String = matches
        .get_one("base-name")
        .cloned()
        .unwrap_or_else(|| unreachable!("`base-name` should have a default value"));

    let out_dir: PathBuf = matches
        .get_one("out-dir")
        .cloned()
        .unwrap_or_else(|| unreachable!("`out-dir` should have a default value"));

    let family = matches
        .get_one::<String>("family")
        .cloned()
        .unwrap_or_else(|| base_name.clone());

    let mapping = match matches.get_one::<PathBuf>("mapping") {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            IconMapping::parse(&text)
                .with_context(|| format!("Failed to parse {}", path.display()))?
        }
        None => IconMapping::builtin(),
    };

    let class_style = matches
        .get_one::<ClassStyle>("class-style")
        .copied()
        .unwrap_or_else(|| unreachable!("`class-style` should have a default value"));

    let cmap_encoding_records = matches
        .get_many::<EncodingRecord>("cmap-record")
        .map(|records| {
            let mut records: Vec<EncodingRecord> = records.copied().collect();
            records.sort();
            records.dedup();
            if let Some(pair) = records.windows(2).find(|x| x[0].encoding == x[1].encoding) {
                bail!(
                    "`--cmap-record` {} and {} map the same encoding to different formats",
                    pair[0],
                    pair[1]
                );
            }
            Ok(records)
        })
        .transpose()?;

    let fallback = if matches.get_flag("placeholder") {
        FallbackPolicy::Placeholder
    } else {
        FallbackPolicy::Omit
    };

    Ok(Config {
        svg_dir,
        out_dir,
        base_name,
        family,
        mapping,
        ctx: Context {
            fallback,
            cmap_encoding_records,
            ..Context::default()
        },
        class_style,
        keep_ttf: matches.get_flag("keep-ttf"),
        inspect: matches.get_flag("inspect"),
        require_converter: matches.get_flag("require-converter"),
        strict: matches.get_flag("strict"),
    })
}

/// Returns the command parser.
pub fn command_parser() -> Command {
    let svg_dir = Arg::new("svg-dir")
        .help("Directory containing the SVG icons")
        .value_parser(value_parser!(PathBuf))
        .default_value("icons");

    let base_name = Arg::new("base-name")
        .help("File name of the generated files, without extension")
        .default_value("ProTo");

    let out_dir = Arg::new("out-dir")
        .long("out-dir")
        .help("Directory the generated files are written to")
        .env("ICONFORGE_OUT_DIR")
        .value_parser(value_parser!(PathBuf))
        .default_value(".");

    let family = Arg::new("family")
        .long("family")
        .help("Font family name [default: the base name]");

    let mapping = Arg::new("mapping")
        .long("mapping")
        .help("File with `X = icon.svg` lines replacing the built-in mapping")
        .value_parser(value_parser!(PathBuf));

    let placeholder = Arg::new("placeholder")
        .long("placeholder")
        .help("Create a placeholder glyph for icons that are missing or can not be imported")
        .action(ArgAction::SetTrue);

    let class_style = Arg::new("class-style")
        .long("class-style")
        .help("How CSS class names are derived from file names")
        .value_parser(EnumValueParser::<ClassStyle>::new())
        .default_value("prefixed");

    let keep_ttf = Arg::new("keep-ttf")
        .long("keep-ttf")
        .help("Keep the TTF file after converting it to web fonts")
        .action(ArgAction::SetTrue);

    let inspect = Arg::new("inspect")
        .long("inspect")
        .help("Print font information using ttx or fc-query")
        .action(ArgAction::SetTrue);

    let require_converter = Arg::new("require-converter")
        .long("require-converter")
        .help("Fail if neither a WOFF nor a WOFF2 converter is installed")
        .action(ArgAction::SetTrue);

    let strict = Arg::new("strict")
        .long("strict")
        .help("Fail if a character is mapped more than once")
        .action(ArgAction::SetTrue);

    let cmap_record = Arg::new("cmap-record")
        .long("cmap-record")
        .help("cmap encoding record as <platform>/<encoding>=<format>, e.g. 3/1=4")
        .value_parser(EncodingRecord::from_code)
        .action(ArgAction::Append);

    Command::new("iconforge")
        .about("Generates an icon font with CSS and a demo page from SVG icons")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(svg_dir)
        .arg(base_name)
        .arg(out_dir)
        .arg(family)
        .arg(mapping)
        .arg(placeholder)
        .arg(class_style)
        .arg(keep_ttf)
        .arg(inspect)
        .arg(require_converter)
        .arg(strict)
        .arg(cmap_record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn parse(args: &[&str]) -> Result<Config> {
        let matches = command_parser().try_get_matches_from(args)?;
        parse_arguments(&matches)
    }

    #[test]
    fn test_command_parser_is_valid() {
        command_parser().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let config = parse(&["iconforge"]).unwrap();
        assert_eq!(config.svg_dir, Path::new("icons"));
        assert_eq!(config.base_name, "ProTo");
        assert_eq!(config.family, "ProTo");
        assert_eq!(config.mapping, IconMapping::builtin());
        assert_eq!(config.ctx.fallback, FallbackPolicy::Omit);
        assert_eq!(config.ctx.cmap_encoding_records, None);
        assert_eq!(config.class_style, ClassStyle::Prefixed);
        assert!(!config.keep_ttf && !config.strict && !config.inspect);
    }

    #[test]
    fn test_positionals_and_flags() {
        let config = parse(&[
            "iconforge",
            "svg",
            "MyFont",
            "--family",
            "My Font",
            "--class-style",
            "bare",
            "--placeholder",
            "--keep-ttf",
            "--strict",
            "--cmap-record",
            "3/1=4",
            "--cmap-record",
            "0/3=4",
        ])
        .unwrap();
        assert_eq!(config.svg_dir, Path::new("svg"));
        assert_eq!(config.base_name, "MyFont");
        assert_eq!(config.family, "My Font");
        assert_eq!(config.class_style, ClassStyle::Bare);
        assert_eq!(config.ctx.fallback, FallbackPolicy::Placeholder);
        assert!(config.keep_ttf && config.strict);

        let codes: Vec<String> = config
            .ctx
            .cmap_encoding_records
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(codes, vec!["0/3=4", "3/1=4"]);
    }

    #[test]
    fn test_invalid_cmap_record() {
        assert!(parse(&["iconforge", "--cmap-record", "3/1=6"]).is_err());
    }

    #[test]
    fn test_repeated_cmap_encoding() {
        assert!(parse(&["iconforge", "--cmap-record", "3/1=4", "--cmap-record", "3/1=12"]).is_err());

        let config = parse(&["iconforge", "--cmap-record", "3/1=4", "--cmap-record", "3/1=4"]).unwrap();
        assert_eq!(config.ctx.cmap_encoding_records.unwrap().len(), 1);
    }

    #[test]
    fn test_mapping_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mapping.txt");
        std::fs::write(&path, "# icons\nM = max.svg\n").unwrap();

        let config = parse(&["iconforge", "--mapping", path.to_str().unwrap()]).unwrap();
        assert_eq!(config.mapping, IconMapping::from_pairs(&[('M', "max.svg")]));

        let missing = dir.path().join("missing.txt");
        assert!(parse(&["iconforge", "--mapping", missing.to_str().unwrap()]).is_err());
    }
}
