//! Conversion of the TrueType font into web font formats by external tools.
//!
//! The converters are reached through the [`WoffEncoder`] and [`Woff2Encoder`] traits.
//! [`Sfnt2Woff`] and [`Woff2Compress`] run the executables found by [`crate::probe`].
//! Both tools write their output next to the input file under a name of their choosing, so the output is looked up and moved to the requested destination.

use crate::artifact::ArtifactKind;
use crate::probe::Converter;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::{error, fmt, fs, io};

/// Encodes a TrueType font as WOFF.
pub trait WoffEncoder {
    /// The name of the encoder, used in messages.
    fn name(&self) -> &str;

    /// Writes the WOFF encoding of the font at `ttf` to `dest`.
    fn encode(&self, ttf: &Path, dest: &Path) -> Result<(), ConvertError>;
}

/// Encodes a TrueType font as WOFF2.
pub trait Woff2Encoder {
    /// The name of the encoder, used in messages.
    fn name(&self) -> &str;

    /// Writes the WOFF2 encoding of the font at `ttf` to `dest`.
    fn encode(&self, ttf: &Path, dest: &Path) -> Result<(), ConvertError>;
}

/// `sfnt2woff` or `sfnt2woff-zopfli`, writing `<stem>.woff` next to the input.
#[derive(Debug, Clone)]
pub struct Sfnt2Woff {
    converter: Converter,
}

impl Sfnt2Woff {
    /// Wraps a located `sfnt2woff` executable.
    pub fn new(converter: Converter) -> Self {
        Sfnt2Woff { converter }
    }
}

impl WoffEncoder for Sfnt2Woff {
    fn name(&self) -> &str {
        self.converter.name
    }

    fn encode(&self, ttf: &Path, dest: &Path) -> Result<(), ConvertError> {
        let candidates = [ttf.with_extension("woff")];
        remove_stale(&candidates)?;

        let mut cmd = Command::new(&self.converter.path);
        cmd.arg(ttf);
        run_tool(cmd)?;

        move_output(&candidates, dest)
    }
}

/// `woff2_compress`, writing `<stem>.woff2` or `<file>.woff2` next to the input.
#[derive(Debug, Clone)]
pub struct Woff2Compress {
    converter: Converter,
}

impl Woff2Compress {
    /// Wraps a located `woff2_compress` executable.
    pub fn new(converter: Converter) -> Self {
        Woff2Compress { converter }
    }
}

impl Woff2Encoder for Woff2Compress {
    fn name(&self) -> &str {
        self.converter.name
    }

    fn encode(&self, ttf: &Path, dest: &Path) -> Result<(), ConvertError> {
        let mut appended = ttf.as_os_str().to_owned();
        appended.push(".woff2");
        let candidates = [ttf.with_extension("woff2"), PathBuf::from(appended)];
        remove_stale(&candidates)?;

        let mut cmd = Command::new(&self.converter.path);
        cmd.arg(ttf);
        run_tool(cmd)?;

        move_output(&candidates, dest)
    }
}

/// Runs a converter to completion, capturing its output.
///
/// # Errors
///
/// - [`ConvertError::Launch`] if the process can not be started.
/// - [`ConvertError::Failed`] if the process exits with a non-zero status.
pub fn run_tool(mut cmd: Command) -> Result<(), ConvertError> {
    log::debug!("Running command: {:?}", cmd);

    let output = cmd.output()?;
    if !output.status.success() {
        return Err(ConvertError::Failed {
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(())
}

/// Removes files left at `paths` by an earlier run, so that only fresh output is found afterwards.
fn remove_stale(paths: &[PathBuf]) -> Result<(), ConvertError> {
    for path in paths.iter().filter(|x| x.is_file()) {
        log::debug!("removing stale {}", path.display());
        fs::remove_file(path).map_err(|error| ConvertError::RemoveStale {
            path: path.clone(),
            error,
        })?;
    }

    Ok(())
}

/// Moves the first existing candidate to `dest`.
fn move_output(candidates: &[PathBuf], dest: &Path) -> Result<(), ConvertError> {
    let Some(generated) = candidates.iter().find(|x| x.is_file()) else {
        return Err(ConvertError::MissingOutput {
            expected: candidates.to_vec(),
        });
    };

    if generated != dest {
        log::trace!("rename {} → {}", generated.display(), dest.display());
        fs::rename(generated, dest).map_err(|error| ConvertError::Rename {
            from: generated.clone(),
            error,
        })?;
    }

    Ok(())
}

/// An error that may occur when running a converter.
#[derive(Debug)]
pub enum ConvertError {
    /// The converter could not be started.
    Launch(io::Error),
    /// The converter exited with a non-zero status.
    Failed {
        /// The exit code; `None` if the process was terminated by a signal.
        code: Option<i32>,
        /// The captured standard error output.
        stderr: String,
    },
    /// The converter succeeded but its output file was not found.
    MissingOutput {
        /// The locations that were checked.
        expected: Vec<PathBuf>,
    },
    /// A file left by an earlier run could not be removed.
    RemoveStale {
        /// The location of the file.
        path: PathBuf,
        /// The reason the removal failed.
        error: io::Error,
    },
    /// The output file could not be moved to its destination.
    Rename {
        /// The location of the generated file.
        from: PathBuf,
        /// The reason the move failed.
        error: io::Error,
    },
}

impl From<io::Error> for ConvertError {
    fn from(value: io::Error) -> Self {
        Self::Launch(value)
    }
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Launch(error) => write!(f, "error launching converter: {}", error),
            Self::Failed {
                code: Some(code),
                stderr,
            } => write!(f, "converter failed with exit status {}: {}", code, stderr),
            Self::Failed { code: None, stderr } => {
                write!(f, "converter terminated by signal: {}", stderr)
            }
            Self::MissingOutput { expected } => write!(
                f,
                "converter output not found (looked for {})",
                expected
                    .iter()
                    .map(|x| x.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            Self::RemoveStale { path, error } => {
                write!(f, "error removing stale {}: {}", path.display(), error)
            }
            Self::Rename { from, error } => {
                write!(f, "error moving {}: {}", from.display(), error)
            }
        }
    }
}

impl error::Error for ConvertError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Launch(error)
            | Self::RemoveStale { error, .. }
            | Self::Rename { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// The result of converting the font into one format.
#[derive(Debug)]
pub enum FormatOutcome {
    /// The file was written.
    Created {
        /// The location of the file.
        path: PathBuf,
        /// The size of the file in bytes.
        size: u64,
    },
    /// The converter failed.
    Failed(ConvertError),
    /// No converter is available for the format.
    Unavailable,
}

impl FormatOutcome {
    /// Whether the file was written.
    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created { .. })
    }
}

/// The outcome of every web font format.
#[derive(Debug)]
pub struct ConversionReport {
    /// The WOFF outcome.
    pub woff: FormatOutcome,
    /// The WOFF2 outcome.
    pub woff2: FormatOutcome,
}

impl ConversionReport {
    /// Whether at least one web font was written.
    pub fn any_created(&self) -> bool {
        self.woff.is_created() || self.woff2.is_created()
    }

    /// The fonts produced by this run, in `ArtifactKind` order.
    ///
    /// `ttf_kept` tells whether the TrueType font survived [`cleanup_ttf`].
    pub fn formats(&self, ttf_kept: bool) -> Vec<ArtifactKind> {
        [
            (ArtifactKind::Ttf, ttf_kept),
            (ArtifactKind::Woff, self.woff.is_created()),
            (ArtifactKind::Woff2, self.woff2.is_created()),
        ]
        .into_iter()
        .filter(|&(_, present)| present)
        .map(|(kind, _)| kind)
        .collect()
    }
}

/// Encodes the font at `ttf` in every format that has an encoder.
///
/// The files are written to `<out_dir>/<base>.woff` and `<out_dir>/<base>.woff2`.
/// A failure of one format does not affect the other.
pub fn convert(
    ttf: &Path,
    out_dir: &Path,
    base: &str,
    woff: Option<&dyn WoffEncoder>,
    woff2: Option<&dyn Woff2Encoder>,
) -> ConversionReport {
    let woff = match woff {
        Some(encoder) => {
            let dest = ArtifactKind::Woff.path(out_dir, base);
            outcome("WOFF", encoder.name(), dest, |dest| encoder.encode(ttf, dest))
        }
        None => unavailable(ArtifactKind::Woff, out_dir, base),
    };
    let woff2 = match woff2 {
        Some(encoder) => {
            let dest = ArtifactKind::Woff2.path(out_dir, base);
            outcome("WOFF2", encoder.name(), dest, |dest| encoder.encode(ttf, dest))
        }
        None => unavailable(ArtifactKind::Woff2, out_dir, base),
    };

    ConversionReport { woff, woff2 }
}

fn outcome<F>(format: &str, name: &str, dest: PathBuf, encode: F) -> FormatOutcome
where
    F: FnOnce(&Path) -> Result<(), ConvertError>,
{
    log::info!("Convert to {} with {}", format, name);

    let result = remove_stale(std::slice::from_ref(&dest))
        .and_then(|()| encode(&dest))
        .and_then(|()| {
            fs::metadata(&dest)
                .map(|x| x.len())
                .map_err(|_| ConvertError::MissingOutput {
                    expected: vec![dest.clone()],
                })
        });

    match result {
        Ok(size) => {
            log::info!(
                "  ✓ created {}: {} ({:.1} KB)",
                format,
                dest.display(),
                size as f64 / 1024.0
            );
            FormatOutcome::Created { path: dest, size }
        }
        Err(error) => {
            log::warn!("  ⚠ {} conversion failed: {}", format, error);
            FormatOutcome::Failed(error)
        }
    }
}

fn unavailable(kind: ArtifactKind, out_dir: &Path, base: &str) -> FormatOutcome {
    let path = kind.path(out_dir, base);
    if path.is_file() {
        log::warn!("{} is left from an earlier run and is not referenced", path.display());
    }
    FormatOutcome::Unavailable
}

/// Removes the intermediate TrueType font unless it is the only usable font or `keep` is set.
///
/// Returns whether the file is still present.
pub fn cleanup_ttf(ttf: &Path, report: &ConversionReport, keep: bool) -> bool {
    if keep {
        log::debug!("keeping {}", ttf.display());
        return true;
    }

    if !report.any_created() {
        log::info!("no web font was created, keeping {}", ttf.display());
        return true;
    }

    match fs::remove_file(ttf) {
        Ok(()) => {
            log::debug!("removed {}", ttf.display());
            false
        }
        Err(error) => {
            log::warn!("could not remove {}: {}", ttf.display(), error);
            ttf.exists()
        }
    }
}

/// Returns diagnostic lines describing a font file.
///
/// Uses `ttx -l` and falls back to `fc-query`.
/// Returns `None` if neither tool is available or succeeds.
pub fn inspect_font(ttf: &Path) -> Option<Vec<String>> {
    let ttx = Command::new("ttx").arg("-l").arg(ttf).output();
    if let Ok(output) = ttx {
        if output.status.success() {
            return Some(
                String::from_utf8_lossy(&output.stdout)
                    .lines()
                    .filter(|x| !x.trim().is_empty())
                    .map(str::to_string)
                    .collect(),
            );
        }
    }

    let output = Command::new("fc-query").arg(ttf).output().ok()?;
    if !output.status.success() {
        return None;
    }

    Some(
        String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .filter(|x| {
                ["family:", "style:", "fullname:", "charset:"]
                    .iter()
                    .any(|key| x.starts_with(key))
            })
            .map(str::to_string)
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CopyEncoder;

    impl WoffEncoder for CopyEncoder {
        fn name(&self) -> &str {
            "copy"
        }

        fn encode(&self, ttf: &Path, dest: &Path) -> Result<(), ConvertError> {
            fs::copy(ttf, dest)?;
            Ok(())
        }
    }

    struct FailingEncoder;

    impl Woff2Encoder for FailingEncoder {
        fn name(&self) -> &str {
            "failing"
        }

        fn encode(&self, _: &Path, _: &Path) -> Result<(), ConvertError> {
            Err(ConvertError::Failed {
                code: Some(1),
                stderr: "broken".to_string(),
            })
        }
    }

    /// Reports success without writing anything.
    struct SilentEncoder;

    impl WoffEncoder for SilentEncoder {
        fn name(&self) -> &str {
            "silent"
        }

        fn encode(&self, _: &Path, _: &Path) -> Result<(), ConvertError> {
            Ok(())
        }
    }

    fn ttf_in(dir: &Path) -> PathBuf {
        let ttf = dir.join("Test.ttf");
        fs::write(&ttf, b"\x00\x01\x00\x00font").unwrap();
        ttf
    }

    #[test]
    fn test_convert_formats_independently() {
        let dir = tempfile::tempdir().unwrap();
        let ttf = ttf_in(dir.path());
        let report = convert(&ttf, dir.path(), "Test", Some(&CopyEncoder), Some(&FailingEncoder));

        match &report.woff {
            FormatOutcome::Created { path, size } => {
                assert_eq!(path, &dir.path().join("Test.woff"));
                assert_eq!(*size, 8);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert!(matches!(
            report.woff2,
            FormatOutcome::Failed(ConvertError::Failed { code: Some(1), .. })
        ));
        assert!(report.any_created());
    }

    #[test]
    fn test_convert_without_encoders() {
        let dir = tempfile::tempdir().unwrap();
        let ttf = ttf_in(dir.path());
        let report = convert(&ttf, dir.path(), "Test", None, None);
        assert!(matches!(report.woff, FormatOutcome::Unavailable));
        assert!(matches!(report.woff2, FormatOutcome::Unavailable));
        assert!(!report.any_created());
    }

    #[test]
    fn test_cleanup_keeps_only_font() {
        let dir = tempfile::tempdir().unwrap();
        let ttf = ttf_in(dir.path());
        let report = ConversionReport {
            woff: FormatOutcome::Unavailable,
            woff2: FormatOutcome::Unavailable,
        };
        assert!(cleanup_ttf(&ttf, &report, false));
        assert!(ttf.exists());
    }

    #[test]
    fn test_cleanup_removes_after_conversion() {
        let dir = tempfile::tempdir().unwrap();
        let ttf = ttf_in(dir.path());
        let report = ConversionReport {
            woff: FormatOutcome::Created {
                path: dir.path().join("Test.woff"),
                size: 1,
            },
            woff2: FormatOutcome::Unavailable,
        };
        assert!(cleanup_ttf(&ttf, &report, true));
        assert!(ttf.exists());
        assert!(!cleanup_ttf(&ttf, &report, false));
        assert!(!ttf.exists());
    }

    #[test]
    fn test_convert_ignores_earlier_output() {
        let dir = tempfile::tempdir().unwrap();
        let ttf = ttf_in(dir.path());
        let stale = dir.path().join("Test.woff");
        fs::write(&stale, b"STALE-OLD-FONT").unwrap();

        let report = convert(&ttf, dir.path(), "Test", Some(&SilentEncoder), None);
        assert!(matches!(
            report.woff,
            FormatOutcome::Failed(ConvertError::MissingOutput { .. })
        ));
        assert!(!stale.exists());
        assert!(cleanup_ttf(&ttf, &report, false));
        assert!(ttf.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_sfnt2woff_without_output() {
        let dir = tempfile::tempdir().unwrap();
        let ttf = ttf_in(dir.path());
        let dest = dir.path().join("Test.woff");
        fs::write(&dest, b"STALE-OLD-FONT").unwrap();

        let encoder = Sfnt2Woff::new(Converter {
            name: "sfnt2woff",
            path: PathBuf::from("true"),
        });
        let result = encoder.encode(&ttf, &dest);
        assert!(matches!(result, Err(ConvertError::MissingOutput { .. })));
        assert!(!dest.exists());
    }

    #[test]
    fn test_formats_follow_outcomes() {
        let report = ConversionReport {
            woff: FormatOutcome::Failed(ConvertError::MissingOutput { expected: vec![] }),
            woff2: FormatOutcome::Created {
                path: PathBuf::from("Test.woff2"),
                size: 1,
            },
        };
        assert_eq!(report.formats(false), vec![ArtifactKind::Woff2]);
        assert_eq!(report.formats(true), vec![ArtifactKind::Ttf, ArtifactKind::Woff2]);

        let report = ConversionReport {
            woff: FormatOutcome::Unavailable,
            woff2: FormatOutcome::Unavailable,
        };
        assert_eq!(report.formats(true), vec![ArtifactKind::Ttf]);
    }

    #[test]
    fn test_move_output_renames_appended_name() {
        let dir = tempfile::tempdir().unwrap();
        let generated = dir.path().join("Test.ttf.woff2");
        fs::write(&generated, b"wOF2").unwrap();
        let dest = dir.path().join("Test.woff2");

        move_output(&[dir.path().join("Test.woff2"), generated.clone()], &dest).unwrap();
        assert!(dest.is_file());
        assert!(!generated.exists());
    }

    #[test]
    fn test_move_output_missing() {
        let dir = tempfile::tempdir().unwrap();
        let result = move_output(&[dir.path().join("a.woff")], &dir.path().join("b.woff"));
        assert!(matches!(result, Err(ConvertError::MissingOutput { .. })));
    }

    #[test]
    fn test_run_tool_missing_executable() {
        let result = run_tool(Command::new("/nonexistent/iconforge-converter"));
        assert!(matches!(result, Err(ConvertError::Launch(_))));
    }
}
