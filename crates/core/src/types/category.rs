//! Storefront product categories and category filters.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a category slug is not recognised.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown category: {0}")]
pub struct CategoryParseError(pub String);

/// One of the fixed storefront categories.
///
/// Categories are assigned to products when the catalog is loaded; the slug is
/// what appears in URLs and in serialized data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Ropa,
    Accesorios,
    Ofertas,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Self; 3] = [Self::Ropa, Self::Accesorios, Self::Ofertas];

    /// URL slug (e.g., `ofertas`).
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Ropa => "ropa",
            Self::Accesorios => "accesorios",
            Self::Ofertas => "ofertas",
        }
    }

    /// Name used on filter buttons.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Ropa => "Ropa",
            Self::Accesorios => "Accesorios",
            Self::Ofertas => "Ofertas",
        }
    }

    /// Upper-case label shown on product cards.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ropa => "ROPA",
            Self::Accesorios => "ACCESORIOS",
            Self::Ofertas => "OFERTAS",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Category {
    type Err = CategoryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.slug() == s)
            .ok_or_else(|| CategoryParseError(s.to_owned()))
    }
}

/// A category filter: everything, or exactly one category.
///
/// Parses from `all` or a category slug, so it can be used directly as a
/// query-string parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    /// Slug used for the "everything" filter.
    pub const ALL_SLUG: &'static str = "all";

    /// Whether a product in `category` passes this filter.
    #[must_use]
    pub fn matches(self, category: Category) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == category,
        }
    }

    /// URL slug (`all` or the category slug).
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::All => Self::ALL_SLUG,
            Self::Only(category) => category.slug(),
        }
    }

    /// Name used on filter buttons.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Only(category) => category.name(),
        }
    }

    /// The "everything" filter followed by one filter per category.
    pub fn options() -> impl Iterator<Item = Self> {
        core::iter::once(Self::All).chain(Category::ALL.into_iter().map(Self::Only))
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for CategoryFilter {
    type Err = CategoryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s == Self::ALL_SLUG {
            return Ok(Self::All);
        }
        s.parse().map(Self::Only)
    }
}

impl TryFrom<String> for CategoryFilter {
    type Error = CategoryParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CategoryFilter> for String {
    fn from(filter: CategoryFilter) -> Self {
        filter.slug().to_owned()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_category_slug_roundtrip() {
        for category in Category::ALL {
            assert_eq!(category.slug().parse::<Category>().unwrap(), category);
        }
    }

    #[test]
    fn test_category_rejects_unknown() {
        assert_eq!(
            "zapatos".parse::<Category>(),
            Err(CategoryParseError("zapatos".to_string()))
        );
    }

    #[test]
    fn test_category_serde_uses_slug() {
        assert_eq!(serde_json::to_string(&Category::Ofertas).unwrap(), "\"ofertas\"");
    }

    #[test]
    fn test_filter_parse() {
        assert_eq!("all".parse::<CategoryFilter>().unwrap(), CategoryFilter::All);
        assert_eq!("".parse::<CategoryFilter>().unwrap(), CategoryFilter::All);
        assert_eq!(
            "ropa".parse::<CategoryFilter>().unwrap(),
            CategoryFilter::Only(Category::Ropa)
        );
        assert!("ALL".parse::<CategoryFilter>().is_err());
    }

    #[test]
    fn test_filter_matches() {
        assert!(CategoryFilter::All.matches(Category::Accesorios));
        assert!(CategoryFilter::Only(Category::Ofertas).matches(Category::Ofertas));
        assert!(!CategoryFilter::Only(Category::Ofertas).matches(Category::Ropa));
    }

    #[test]
    fn test_filter_options_order() {
        let slugs: Vec<_> = CategoryFilter::options().map(CategoryFilter::slug).collect();
        assert_eq!(slugs, ["all", "ropa", "accesorios", "ofertas"]);
    }

    #[test]
    fn test_filter_deserializes_from_string() {
        let filter: CategoryFilter = serde_json::from_str("\"accesorios\"").unwrap();
        assert_eq!(filter, CategoryFilter::Only(Category::Accesorios));
        assert!(serde_json::from_str::<CategoryFilter>("\"nope\"").is_err());
    }
}
