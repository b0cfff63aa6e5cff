//! Discovery of the external WOFF and WOFF2 converters.
//!
//! Each web font format has a list of candidate executables in order of preference.
//! [`probe`] returns the first candidate of each list that a [`Locator`] can find.

use std::fmt;
use std::path::PathBuf;

/// WOFF converters in order of preference.
pub const WOFF_CANDIDATES: &[&str] = &["sfnt2woff-zopfli", "sfnt2woff"];

/// WOFF2 converters in order of preference.
pub const WOFF2_CANDIDATES: &[&str] = &["woff2_compress"];

/// Resolves the name of an executable to its location.
pub trait Locator {
    /// Returns the location of the executable `name`, or `None` if it can not be found.
    fn locate(&self, name: &str) -> Option<PathBuf>;
}

/// Locates executables on `PATH`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PathLocator;

impl Locator for PathLocator {
    fn locate(&self, name: &str) -> Option<PathBuf> {
        which::which(name).ok()
    }
}

/// A located converter executable.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Converter {
    /// The candidate name the converter was found under.
    pub name: &'static str,
    /// The location of the executable.
    pub path: PathBuf,
}

impl fmt::Display for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.path.display())
    }
}

/// The converters available on this system.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct Converters {
    /// The WOFF converter, if any.
    pub woff: Option<Converter>,
    /// The WOFF2 converter, if any.
    pub woff2: Option<Converter>,
}

impl Converters {
    /// Whether at least one web font format can be produced.
    pub fn any(&self) -> bool {
        self.woff.is_some() || self.woff2.is_some()
    }
}

/// Returns the first candidate that `locator` finds.
fn first_located(locator: &dyn Locator, candidates: &[&'static str]) -> Option<Converter> {
    candidates.iter().find_map(|&name| {
        let path = locator.locate(name);
        log::trace!("probe {}: {:?}", name, path);
        path.map(|path| Converter { name, path })
    })
}

/// Searches for the WOFF and WOFF2 converters.
///
/// A missing converter is logged as a warning; it is up to the caller to decide whether that is fatal.
///
/// ```
/// # use iconforge::probe::{probe, Locator};
/// # use std::path::PathBuf;
/// struct Nothing;
///
/// impl Locator for Nothing {
///     fn locate(&self, _: &str) -> Option<PathBuf> {
///         None
///     }
/// }
///
/// assert!(!probe(&Nothing).any());
/// ```
pub fn probe(locator: &dyn Locator) -> Converters {
    log::info!("Check converters");

    let converters = Converters {
        woff: first_located(locator, WOFF_CANDIDATES),
        woff2: first_located(locator, WOFF2_CANDIDATES),
    };

    match &converters.woff {
        Some(converter) => log::info!("  ✓ WOFF: {}", converter),
        None => log::warn!("  ⚠ no WOFF converter found ({})", WOFF_CANDIDATES.join(", ")),
    }
    match &converters.woff2 {
        Some(converter) => log::info!("  ✓ WOFF2: {}", converter),
        None => log::warn!("  ⚠ no WOFF2 converter found ({})", WOFF2_CANDIDATES.join(", ")),
    }

    if !converters.any() {
        log::warn!("no web font converter found, only TTF will be available");
        log::warn!("  install with: sudo apt install woff2 sfnt2woff-zopfli");
    }

    converters
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    struct FakeLocator(HashSet<&'static str>);

    impl FakeLocator {
        fn with(names: &[&'static str]) -> Self {
            FakeLocator(names.iter().copied().collect())
        }
    }

    impl Locator for FakeLocator {
        fn locate(&self, name: &str) -> Option<PathBuf> {
            self.0
                .contains(name)
                .then(|| PathBuf::from("/usr/bin").join(name))
        }
    }

    #[test]
    fn test_probe_prefers_zopfli() {
        let converters = probe(&FakeLocator::with(&["sfnt2woff", "sfnt2woff-zopfli"]));
        let woff = converters.woff.as_ref().unwrap();
        assert_eq!(woff.name, "sfnt2woff-zopfli");
        assert_eq!(woff.path, PathBuf::from("/usr/bin/sfnt2woff-zopfli"));
        assert_eq!(converters.woff2, None);
        assert!(converters.any());
    }

    #[test]
    fn test_probe_falls_back() {
        let converters = probe(&FakeLocator::with(&["sfnt2woff", "woff2_compress"]));
        assert_eq!(converters.woff.map(|x| x.name), Some("sfnt2woff"));
        assert_eq!(converters.woff2.map(|x| x.name), Some("woff2_compress"));
    }

    #[test]
    fn test_probe_nothing() {
        let converters = probe(&FakeLocator::with(&[]));
        assert_eq!(converters, Converters::default());
        assert!(!converters.any());
    }

    #[test]
    fn test_unlisted_tools_are_ignored() {
        let converters = probe(&FakeLocator::with(&["woff2sfnt", "woff-utils"]));
        assert!(!converters.any());
    }
}
