//! Action vocabulary and dispatch outcomes.
//!
//! The unified dispatcher accepts a closed set of verbs. In Rust code the
//! [`Verb`] enum makes an invalid operation unrepresentable; the string
//! boundary ([`Verb::parse`], [`ActionRequest`]) exists for data-driven
//! page-object tables and rejects anything outside the vocabulary with a
//! typed, logged error that names the valid set.

use serde::{Deserialize, Serialize};

use crate::driver::ElementHandle;
use crate::result::{PalparError, PalparResult};
use crate::strategy::Locator;

/// Default pre-action wait (500ms)
pub const DEFAULT_ACTION_WAIT_MS: u64 = 500;

/// Settle pause after a mutating action (500ms).
///
/// Some widgets reset internal state asynchronously after a clear; input
/// issued immediately afterwards can race the reset.
pub const SETTLE_MS: u64 = 500;

/// The closed verb vocabulary of the unified dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verb {
    /// Resolve the element without acting on it
    Locate,
    /// Read the element's rendered text
    Text,
    /// Primary click
    Click,
    /// Send keystrokes
    Input,
    /// Clear the current value
    Clear,
    /// Clear, settle, then send keystrokes
    ClearThenInput,
}

impl Verb {
    /// Operation names accepted by [`Verb::parse`].
    pub const VOCABULARY: [&'static str; 6] = [
        "none",
        "text",
        "click",
        "input",
        "clear",
        "clear_continue_input",
    ];

    /// Parse an operation name from the closed vocabulary.
    ///
    /// # Errors
    ///
    /// Returns [`PalparError::UnsupportedOperation`] (and logs the valid set)
    /// for any name outside the vocabulary.
    pub fn parse(operation: &str) -> PalparResult<Self> {
        match operation {
            "none" => Ok(Self::Locate),
            "text" => Ok(Self::Text),
            "click" => Ok(Self::Click),
            "input" => Ok(Self::Input),
            "clear" => Ok(Self::Clear),
            "clear_continue_input" => Ok(Self::ClearThenInput),
            _ => {
                tracing::error!(
                    operation,
                    valid = ?Self::VOCABULARY,
                    "operation not supported"
                );
                Err(PalparError::UnsupportedOperation {
                    operation: operation.to_string(),
                })
            }
        }
    }

    /// The operation name within the vocabulary.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Locate => "none",
            Self::Text => "text",
            Self::Click => "click",
            Self::Input => "input",
            Self::Clear => "clear",
            Self::ClearThenInput => "clear_continue_input",
        }
    }

    /// Whether the verb needs accompanying text.
    #[must_use]
    pub const fn requires_text(&self) -> bool {
        matches!(self, Self::Input | Self::ClearThenInput)
    }
}

impl std::fmt::Display for Verb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which member of the match set an action applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Selection {
    /// The unique/first match
    #[default]
    First,
    /// The match at position `i` of a multi-element match
    Nth(usize),
}

/// A request-scoped action description, as carried in page-object tables.
///
/// This is the data-driven face of the dispatcher: strategy and operation
/// arrive as strings and are validated into [`Locator`], [`Verb`] and
/// [`Selection`] before anything touches the driver. `multiple` requesting
/// indexed access without an `index` is a caller contract violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRequest {
    /// Symbolic strategy name (id, name, xpath, css, class, link, partlink, tag)
    pub strategy: String,
    /// Locator expression
    pub expression: String,
    /// Operation name; absent means resolve-only
    #[serde(default)]
    pub operation: Option<String>,
    /// Text for input-taking operations
    #[serde(default)]
    pub text: Option<String>,
    /// Whether the locator is expected to match multiple elements
    #[serde(default)]
    pub multiple: bool,
    /// Index into the match set when `multiple` is set
    #[serde(default)]
    pub index: Option<usize>,
    /// Pre-action wait in milliseconds
    #[serde(default = "default_wait_ms")]
    pub wait_ms: u64,
}

fn default_wait_ms() -> u64 {
    DEFAULT_ACTION_WAIT_MS
}

impl ActionRequest {
    /// Create a resolve-only request with default wait.
    #[must_use]
    pub fn new(strategy: impl Into<String>, expression: impl Into<String>) -> Self {
        Self {
            strategy: strategy.into(),
            expression: expression.into(),
            operation: None,
            text: None,
            multiple: false,
            index: None,
            wait_ms: DEFAULT_ACTION_WAIT_MS,
        }
    }

    /// Set the operation name.
    #[must_use]
    pub fn operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    /// Set the input text.
    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Request indexed access into a multi-element match.
    #[must_use]
    pub const fn nth(mut self, index: usize) -> Self {
        self.multiple = true;
        self.index = Some(index);
        self
    }

    /// Set the pre-action wait in milliseconds.
    #[must_use]
    pub const fn wait_ms(mut self, wait_ms: u64) -> Self {
        self.wait_ms = wait_ms;
        self
    }

    /// Validate the strategy/expression pair.
    pub fn locator(&self) -> PalparResult<Locator> {
        Locator::parse(&self.strategy, self.expression.clone())
    }

    /// Validate the operation name against the vocabulary.
    pub fn verb(&self) -> PalparResult<Verb> {
        match self.operation.as_deref() {
            None => Ok(Verb::Locate),
            Some(name) => Verb::parse(name),
        }
    }

    /// Validate the multiplicity flag and index into a [`Selection`].
    ///
    /// # Errors
    ///
    /// Returns [`PalparError::MissingIndex`] when `multiple` is requested
    /// without an index.
    pub fn selection(&self) -> PalparResult<Selection> {
        match (self.multiple, self.index) {
            (false, _) => Ok(Selection::First),
            (true, Some(index)) => Ok(Selection::Nth(index)),
            (true, None) => {
                tracing::error!(
                    expression = %self.expression,
                    "multi-match request requires an index"
                );
                Err(PalparError::MissingIndex {
                    expression: self.expression.clone(),
                })
            }
        }
    }
}

/// Explicit outcome of a dispatched action.
///
/// Absence and driver refusal are legitimate, assertable outcomes in UI
/// testing; they are carried here rather than as errors so callers branch on
/// the value instead of unwinding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The action completed
    Done,
    /// Text read from the element
    Text(String),
    /// The element, for resolve-only requests
    Found(ElementHandle),
    /// No element matched before the wait deadline
    Absent,
    /// The driver refused the interaction after resolution
    NotInteractable(String),
}

impl Outcome {
    /// Whether the action completed.
    #[must_use]
    pub const fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Whether the element never appeared.
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// The text payload, if this outcome carries one.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// The resolved element, if this outcome carries one.
    #[must_use]
    pub const fn found(&self) -> Option<&ElementHandle> {
        match self {
            Self::Found(element) => Some(element),
            _ => None,
        }
    }
}
