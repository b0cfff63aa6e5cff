//! The files written by a run and their sizes.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// The kind of a generated file.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
pub enum ArtifactKind {
    /// The TrueType font.
    Ttf,
    /// The WOFF font.
    Woff,
    /// The WOFF2 font.
    Woff2,
    /// The style sheet.
    Css,
    /// The demo page.
    Html,
}

impl ArtifactKind {
    /// All kinds in report order.
    pub const ALL: [ArtifactKind; 5] = [
        ArtifactKind::Ttf,
        ArtifactKind::Woff,
        ArtifactKind::Woff2,
        ArtifactKind::Css,
        ArtifactKind::Html,
    ];

    /// The file extension, without a leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Ttf => "ttf",
            Self::Woff => "woff",
            Self::Woff2 => "woff2",
            Self::Css => "css",
            Self::Html => "html",
        }
    }

    /// Returns `<out_dir>/<base>.<extension>`.
    ///
    /// The extension is appended, so a base name containing a dot keeps it.
    ///
    /// ```
    /// # use iconforge::artifact::ArtifactKind;
    /// # use std::path::Path;
    /// let path = ArtifactKind::Woff2.path(Path::new("dist"), "ProTo");
    /// assert_eq!(path, Path::new("dist/ProTo.woff2"));
    /// ```
    pub fn path(&self, out_dir: &Path, base: &str) -> PathBuf {
        out_dir.join(format!("{}.{}", base, self.extension()))
    }

    /// Whether the file is a font.
    pub fn is_font(&self) -> bool {
        matches!(self, Self::Ttf | Self::Woff | Self::Woff2)
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.extension().to_uppercase())
    }
}

/// A generated file.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Artifact {
    /// The expected location of the file.
    pub path: PathBuf,
    /// Whether the file exists.
    pub exists: bool,
    /// The size in bytes; `0` if the file does not exist.
    pub size: u64,
}

/// The outputs of a run, keyed by kind.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct GeneratedFileSet {
    artifacts: BTreeMap<ArtifactKind, Artifact>,
}

impl GeneratedFileSet {
    /// Looks up every kind of output of `base` in `out_dir`.
    pub fn scan(out_dir: &Path, base: &str) -> Self {
        let artifacts = ArtifactKind::ALL
            .iter()
            .map(|&kind| {
                let path = kind.path(out_dir, base);
                let metadata = fs::metadata(&path).ok().filter(|x| x.is_file());
                let artifact = Artifact {
                    exists: metadata.is_some(),
                    size: metadata.map_or(0, |x| x.len()),
                    path,
                };
                (kind, artifact)
            })
            .collect();

        GeneratedFileSet { artifacts }
    }

    /// Returns the artifact of a kind.
    pub fn get(&self, kind: ArtifactKind) -> Option<&Artifact> {
        self.artifacts.get(&kind)
    }

    /// Whether the file of a kind exists.
    pub fn exists(&self, kind: ArtifactKind) -> bool {
        self.get(kind).map_or(false, |x| x.exists)
    }

    /// Drops the fonts not in `produced`, so files left by an earlier run are not reported.
    pub fn retain_fonts(&mut self, produced: &[ArtifactKind]) {
        self.artifacts
            .retain(|kind, _| !kind.is_font() || produced.contains(kind));
    }

    /// The kinds that exist, in `ArtifactKind` order.
    pub fn existing(&self) -> impl Iterator<Item = ArtifactKind> + '_ {
        self.artifacts
            .iter()
            .filter(|(_, x)| x.exists)
            .map(|(&kind, _)| kind)
    }

    /// Returns one line per existing file with its size in KB.
    pub fn summary(&self) -> Vec<String> {
        self.artifacts
            .values()
            .filter(|x| x.exists)
            .map(|x| format!("{} ({:.1} KB)", x.path.display(), x.size as f64 / 1024.0))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_appends_extension() {
        assert_eq!(
            ArtifactKind::Css.path(Path::new("."), "my.font"),
            Path::new("./my.font.css")
        );
    }

    #[test]
    fn test_scan() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("ProTo.ttf"), vec![0u8; 2048]).unwrap();
        fs::write(dir.path().join("ProTo.css"), "x").unwrap();
        fs::write(dir.path().join("Other.woff"), "x").unwrap();

        let set = GeneratedFileSet::scan(dir.path(), "ProTo");
        assert!(set.exists(ArtifactKind::Ttf));
        assert!(!set.exists(ArtifactKind::Woff));
        assert_eq!(set.get(ArtifactKind::Ttf).unwrap().size, 2048);
        assert_eq!(
            set.existing().collect::<Vec<_>>(),
            vec![ArtifactKind::Ttf, ArtifactKind::Css]
        );

        let summary = set.summary();
        assert_eq!(summary.len(), 2);
        assert!(summary[0].ends_with("ProTo.ttf (2.0 KB)"));
    }

    #[test]
    fn test_retain_fonts() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("ProTo.ttf"), "x").unwrap();
        fs::write(dir.path().join("ProTo.woff2"), "x").unwrap();
        fs::write(dir.path().join("ProTo.css"), "x").unwrap();

        let mut set = GeneratedFileSet::scan(dir.path(), "ProTo");
        set.retain_fonts(&[ArtifactKind::Ttf]);
        assert_eq!(
            set.existing().collect::<Vec<_>>(),
            vec![ArtifactKind::Ttf, ArtifactKind::Css]
        );
        assert!(set.get(ArtifactKind::Woff2).is_none());
    }

    #[test]
    fn test_display() {
        assert_eq!(ArtifactKind::Woff2.to_string(), "WOFF2");
    }
}
