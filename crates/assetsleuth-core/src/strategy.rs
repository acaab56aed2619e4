/// Search strategies and the pattern generator.
///
/// A strategy is one convention for how source text can mention a resource.
/// Each (resource, strategy) pair yields one byte pattern, generated once per
/// scan and reused against every source file.
use crate::error::StrategyParseError;
use memchr::memmem::Finder;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Naming conventions checked against source text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchStrategy {
    /// `"<name>"` in Objective-C implementation files.
    ObjcLiteral,
    /// `"<name>"` in Swift files.
    NativeLiteral,
    /// `R.image.<identifier>` (R.swift generated accessor).
    QualifiedAccessor,
    /// `.<identifier>` where the `R.image` qualifier is inferred.
    BareAccessor,
}

impl SearchStrategy {
    pub const ALL: [Self; 4] = [
        Self::ObjcLiteral,
        Self::NativeLiteral,
        Self::QualifiedAccessor,
        Self::BareAccessor,
    ];

    /// Stable identifier accepted on the command line.
    pub fn id(self) -> &'static str {
        match self {
            Self::ObjcLiteral => "objc",
            Self::NativeLiteral => "swift",
            Self::QualifiedAccessor => "r-swift",
            Self::BareAccessor => "r-swift-bare",
        }
    }

    /// Text this strategy expects to find for `resource_name`.
    ///
    /// Both literal strategies produce the same quoted string. Accessor
    /// strategies fall back to the quoted literal when the name has no
    /// usable identifier (empty or digits only), so such resources are
    /// still searched for rather than silently dropped.
    pub fn pattern(self, resource_name: &str) -> String {
        match self {
            Self::ObjcLiteral | Self::NativeLiteral => literal_pattern(resource_name),
            Self::QualifiedAccessor => match accessor_identifier(resource_name) {
                Some(ident) => format!("R.image.{ident}"),
                None => literal_pattern(resource_name),
            },
            Self::BareAccessor => match accessor_identifier(resource_name) {
                Some(ident) => format!(".{ident}"),
                None => literal_pattern(resource_name),
            },
        }
    }
}

impl fmt::Display for SearchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for SearchStrategy {
    type Err = StrategyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "objc" => Ok(Self::ObjcLiteral),
            "swift" => Ok(Self::NativeLiteral),
            "r-swift" | "rSwift" => Ok(Self::QualifiedAccessor),
            "r-swift-bare" | "rSwiftSimple" | "rSwiftDoubleCheck" => Ok(Self::BareAccessor),
            other => Err(StrategyParseError(other.to_string())),
        }
    }
}

fn literal_pattern(resource_name: &str) -> String {
    format!("\"{resource_name}\"")
}

/// camelCase identifier for a resource name, as R.swift generates it.
///
/// The name is split on every non-alphanumeric character (`-`, `.`, `_`,
/// spaces...). The first segment gets a lower-case first letter, every later
/// segment an upper-case first letter; the rest of each segment is kept.
/// Returns `None` when nothing usable remains, or when the result is purely
/// numeric and so cannot be a Swift identifier.
pub fn accessor_identifier(resource_name: &str) -> Option<String> {
    let mut ident = String::with_capacity(resource_name.len());
    let segments = resource_name
        .split(|c: char| !c.is_alphanumeric())
        .filter(|s| !s.is_empty());

    for (i, segment) in segments.enumerate() {
        let mut chars = segment.chars();
        if let Some(first) = chars.next() {
            if i == 0 {
                ident.extend(first.to_lowercase());
            } else {
                ident.extend(first.to_uppercase());
            }
            ident.push_str(chars.as_str());
        }
    }

    if ident.is_empty() || ident.chars().all(|c| c.is_ascii_digit()) {
        None
    } else {
        Some(ident)
    }
}

/// A precompiled byte pattern.
///
/// The searcher is built once at scan start and shared read-only across all
/// matching tasks.
#[derive(Debug)]
pub struct Pattern {
    finder: Finder<'static>,
}

impl Pattern {
    pub fn new(text: &str) -> Self {
        Self {
            finder: Finder::new(text.as_bytes()).into_owned(),
        }
    }

    pub fn for_resource(strategy: SearchStrategy, resource_name: &str) -> Self {
        Self::new(&strategy.pattern(resource_name))
    }

    /// The UTF-8 bytes searched for.
    pub fn bytes(&self) -> &[u8] {
        self.finder.needle()
    }

    /// Literal substring search over `haystack`.
    #[inline]
    pub fn is_found_in(&self, haystack: &[u8]) -> bool {
        self.finder.find(haystack).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_strategies_quote_the_name() {
        assert_eq!(SearchStrategy::ObjcLiteral.pattern("icon-home"), "\"icon-home\"");
        assert_eq!(SearchStrategy::NativeLiteral.pattern("icon-home"), "\"icon-home\"");
    }

    #[test]
    fn qualified_accessor_uses_camel_case_identifier() {
        assert_eq!(
            SearchStrategy::QualifiedAccessor.pattern("icon-home"),
            "R.image.iconHome"
        );
    }

    #[test]
    fn bare_accessor_uses_leading_dot() {
        assert_eq!(SearchStrategy::BareAccessor.pattern("icon-home"), ".iconHome");
    }

    #[test]
    fn identifier_splits_on_every_separator() {
        assert_eq!(accessor_identifier("ic_tab.bar-Home").as_deref(), Some("icTabBarHome"));
        assert_eq!(accessor_identifier("Settings").as_deref(), Some("settings"));
        assert_eq!(accessor_identifier("avatar 2").as_deref(), Some("avatar2"));
    }

    #[test]
    fn identifier_keeps_inner_case() {
        assert_eq!(accessor_identifier("iconURLBig").as_deref(), Some("iconURLBig"));
    }

    #[test]
    fn unusable_identifier_falls_back_to_literal() {
        assert_eq!(accessor_identifier("---"), None);
        assert_eq!(accessor_identifier("2024"), None);
        assert_eq!(SearchStrategy::QualifiedAccessor.pattern("2024"), "\"2024\"");
        assert_eq!(SearchStrategy::BareAccessor.pattern("-"), "\"-\"");
    }

    #[test]
    fn strategy_ids_round_trip_and_aliases_parse() {
        for strategy in SearchStrategy::ALL {
            assert_eq!(strategy.id().parse::<SearchStrategy>(), Ok(strategy));
        }
        assert_eq!("rSwift".parse::<SearchStrategy>(), Ok(SearchStrategy::QualifiedAccessor));
        assert_eq!("rSwiftSimple".parse::<SearchStrategy>(), Ok(SearchStrategy::BareAccessor));
        assert_eq!("rSwiftDoubleCheck".parse::<SearchStrategy>(), Ok(SearchStrategy::BareAccessor));
    }

    #[test]
    fn unknown_strategy_is_rejected() {
        assert_eq!(
            "kotlin".parse::<SearchStrategy>(),
            Err(StrategyParseError("kotlin".into()))
        );
    }

    #[test]
    fn pattern_searches_bytes_literally() {
        let pattern = Pattern::for_resource(SearchStrategy::QualifiedAccessor, "icon-home");
        assert_eq!(pattern.bytes(), b"R.image.iconHome");
        assert!(pattern.is_found_in(b"let i = R.image.iconHome()"));
        assert!(!pattern.is_found_in(b"let i = R.image.iconhome()"));
    }
}
