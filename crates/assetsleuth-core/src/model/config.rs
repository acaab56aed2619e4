/// Scan configuration: exclusion globs and active search strategies.
///
/// Built once at the boundary (CLI) and passed by reference into the core.
/// Nothing in the core mutates it.
use crate::error::ConfigError;
use crate::strategy::SearchStrategy;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::collections::BTreeSet;
use std::path::Path;

/// Globs always excluded from the usage scan: asset directories are never
/// treated as source.
pub const ASSET_DIR_GLOBS: [&str; 2] = ["*.imageset", "*.xcassets"];

/// A compiled set of exclusion globs.
///
/// Globs are matched against absolute paths with shell `fnmatch` semantics:
/// `*` also matches `/`, so `*/Generated/*` excludes every path that has a
/// `Generated` component. Unlike `fnmatch`, `{a,b}` alternation is accepted
/// and `**` is a valid wildcard (equivalent to `*` here, since `*` already
/// crosses `/`).
#[derive(Clone, Debug)]
pub struct ExcludeSet {
    patterns: Vec<String>,
    set: GlobSet,
}

impl ExcludeSet {
    pub fn new<I, S>(patterns: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut patterns: Vec<String> = patterns.into_iter().map(Into::into).collect();
        patterns.sort();
        patterns.dedup();

        let mut builder = GlobSetBuilder::new();
        for pattern in &patterns {
            let glob = Glob::new(pattern).map_err(|source| ConfigError::InvalidGlob {
                pattern: pattern.clone(),
                source,
            })?;
            builder.add(glob);
        }
        let set = builder.build().map_err(|source| ConfigError::InvalidGlob {
            pattern: patterns.join(", "),
            source,
        })?;

        Ok(Self { patterns, set })
    }

    pub fn empty() -> Self {
        Self {
            patterns: Vec::new(),
            set: GlobSet::empty(),
        }
    }

    /// `true` if any glob matches `path`.
    pub fn is_match(&self, path: &Path) -> bool {
        !self.patterns.is_empty() && self.set.is_match(path)
    }

    /// A copy of this set with `extra` globs added.
    pub fn with<I, S>(&self, extra: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            self.patterns
                .iter()
                .cloned()
                .chain(extra.into_iter().map(Into::into)),
        )
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}

impl Default for ExcludeSet {
    fn default() -> Self {
        Self::empty()
    }
}

/// Immutable configuration for one catalog build + usage scan.
#[derive(Clone, Debug)]
pub struct SearchUnusedResourcesConfig {
    pub excluded_paths: ExcludeSet,
    pub strategies: BTreeSet<SearchStrategy>,
    /// Worker threads for intra-file matching. `None` means one per CPU.
    pub threads: Option<usize>,
}

impl SearchUnusedResourcesConfig {
    pub fn new(excluded_paths: ExcludeSet, strategies: BTreeSet<SearchStrategy>) -> Self {
        Self {
            excluded_paths,
            strategies,
            threads: None,
        }
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads.max(1));
        self
    }

    /// Thread count actually used by the matching pool.
    pub fn effective_threads(&self) -> usize {
        self.threads.unwrap_or_else(num_cpus::get).max(1)
    }
}

impl Default for SearchUnusedResourcesConfig {
    fn default() -> Self {
        Self::new(ExcludeSet::empty(), SearchStrategy::ALL.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn star_crosses_path_separators() {
        let set = ExcludeSet::new(["*/Generated/*"]).unwrap();
        assert!(set.is_match(Path::new("/proj/App/Generated/R.generated.swift")));
        assert!(!set.is_match(Path::new("/proj/App/Views/Home.swift")));
    }

    #[test]
    fn alternation_and_double_star_are_supported() {
        let set = ExcludeSet::new(["*/{Generated,Vendor}/*", "**/Pods/**"]).unwrap();
        assert!(set.is_match(Path::new("/p/App/Vendor/Lib.swift")));
        assert!(set.is_match(Path::new("/p/App/Generated/R.swift")));
        assert!(set.is_match(Path::new("/p/Pods/Kit/Kit.m")));
        assert!(!set.is_match(Path::new("/p/App/Home.swift")));
    }

    #[test]
    fn suffix_glob_matches_absolute_path() {
        let set = ExcludeSet::new(["*.generated.swift"]).unwrap();
        assert!(set.is_match(Path::new("/proj/R.generated.swift")));
    }

    #[test]
    fn empty_set_matches_nothing() {
        assert!(!ExcludeSet::empty().is_match(Path::new("/anything")));
    }

    #[test]
    fn invalid_glob_is_rejected() {
        assert!(matches!(
            ExcludeSet::new(["a[b"]),
            Err(ConfigError::InvalidGlob { .. })
        ));
    }

    #[test]
    fn with_adds_and_deduplicates() {
        let base = ExcludeSet::new(["*.imageset"]).unwrap();
        let extended = base.with(ASSET_DIR_GLOBS).unwrap();
        assert_eq!(extended.patterns(), &["*.imageset", "*.xcassets"]);
        assert!(extended.is_match(Path::new("/p/Assets.xcassets")));
    }

    #[test]
    fn default_config_enables_every_strategy() {
        let config = SearchUnusedResourcesConfig::default();
        assert_eq!(config.strategies.len(), SearchStrategy::ALL.len());
        assert!(config.effective_threads() >= 1);
    }
}
