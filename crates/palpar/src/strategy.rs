//! Locator strategies and the locator pair.
//!
//! A [`Locator`] is a `(strategy, expression)` pair identifying zero or more
//! elements in a rendered document. Strategies form a closed set; symbolic
//! names outside it are rejected with a typed error at the string boundary
//! rather than silently defaulted.

use serde::{Deserialize, Serialize};

use crate::result::{PalparError, PalparResult};

/// Locator strategy for element lookup.
///
/// Maps the symbolic names accepted from page-object tables onto the driver's
/// native locator-strategy tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strategy {
    /// `id` attribute
    Id,
    /// `name` attribute
    Name,
    /// XPath expression
    XPath,
    /// CSS selector
    Css,
    /// Class name
    Class,
    /// Full link text
    LinkText,
    /// Partial link text
    PartialLinkText,
    /// Tag name
    Tag,
}

impl Strategy {
    /// All supported strategies, in their symbolic-name order.
    pub const ALL: [Self; 8] = [
        Self::Id,
        Self::Name,
        Self::XPath,
        Self::Css,
        Self::Class,
        Self::LinkText,
        Self::PartialLinkText,
        Self::Tag,
    ];

    /// Parse a symbolic strategy name, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`PalparError::UnsupportedStrategy`] (and logs the rejected
    /// value) for any name outside the closed set.
    pub fn parse(name: &str) -> PalparResult<Self> {
        match name.to_ascii_lowercase().as_str() {
            "id" => Ok(Self::Id),
            "name" => Ok(Self::Name),
            "xpath" => Ok(Self::XPath),
            "css" => Ok(Self::Css),
            "class" => Ok(Self::Class),
            "link" => Ok(Self::LinkText),
            "partlink" => Ok(Self::PartialLinkText),
            "tag" => Ok(Self::Tag),
            _ => {
                tracing::error!(strategy = name, "locator strategy not supported");
                Err(PalparError::UnsupportedStrategy {
                    name: name.to_string(),
                })
            }
        }
    }

    /// The symbolic name accepted by [`Strategy::parse`].
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::XPath => "xpath",
            Self::Css => "css",
            Self::Class => "class",
            Self::LinkText => "link",
            Self::PartialLinkText => "partlink",
            Self::Tag => "tag",
        }
    }

    /// The driver's native locator-strategy token (W3C WebDriver `using`).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::XPath => "xpath",
            Self::Css => "css selector",
            Self::Class => "class name",
            Self::LinkText => "link text",
            Self::PartialLinkText => "partial link text",
            Self::Tag => "tag name",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A `(strategy, expression)` pair identifying elements in a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locator {
    /// Lookup strategy
    pub strategy: Strategy,
    /// Lookup expression (selector, xpath, attribute value...)
    pub expression: String,
}

impl Locator {
    /// Create a locator from typed parts.
    #[must_use]
    pub fn new(strategy: Strategy, expression: impl Into<String>) -> Self {
        Self {
            strategy,
            expression: expression.into(),
        }
    }

    /// Parse a locator from a symbolic strategy name and expression.
    ///
    /// # Errors
    ///
    /// Returns [`PalparError::UnsupportedStrategy`] for unknown names.
    pub fn parse(strategy: &str, expression: impl Into<String>) -> PalparResult<Self> {
        Ok(Self {
            strategy: Strategy::parse(strategy)?,
            expression: expression.into(),
        })
    }

    /// Shorthand for an `id` locator.
    #[must_use]
    pub fn id(expression: impl Into<String>) -> Self {
        Self::new(Strategy::Id, expression)
    }

    /// Shorthand for an `xpath` locator.
    #[must_use]
    pub fn xpath(expression: impl Into<String>) -> Self {
        Self::new(Strategy::XPath, expression)
    }

    /// Shorthand for a `css` locator.
    #[must_use]
    pub fn css(expression: impl Into<String>) -> Self {
        Self::new(Strategy::Css, expression)
    }
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.strategy.name(), self.expression)
    }
}
