//! Abstract browser-driver seam.
//!
//! Palpar never talks to a browser directly. Everything it needs from the
//! underlying automation session is expressed through the [`Driver`] trait:
//! element lookup by native strategy token, element interaction, page
//! introspection, navigation, script execution, screenshot capture, window
//! switching, and alert handling. Swapping the driver implementation swaps
//! the browser backend; [`MockDriver`] backs the test suite.
//!
//! The trait is synchronous. One logical UI interaction thread owns the
//! session, waiting is blocking sleep-and-poll, and no method is expected to
//! be invoked concurrently from multiple call sites.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::strategy::{Locator, Strategy};

/// Failures reported by the underlying driver session.
///
/// These never cross the dispatch boundary of [`crate::session::Session`];
/// they are caught there, logged, and degraded to a typed outcome.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DriverError {
    /// Element no longer attached to the document
    #[error("stale element: {id}")]
    StaleElement {
        /// Element id that went stale
        id: String,
    },

    /// Element attached but not interactable (obscured, disabled, hidden)
    #[error("element not interactable: {message}")]
    NotInteractable {
        /// Driver-reported reason
        message: String,
    },

    /// No alert dialog currently open
    #[error("no alert present")]
    NoAlert,

    /// Window handle not among the open windows
    #[error("no such window: {handle}")]
    NoWindow {
        /// The handle that failed to resolve
        handle: String,
    },

    /// Locator expression rejected by the driver
    #[error("invalid selector: {message}")]
    InvalidSelector {
        /// Driver-reported reason
        message: String,
    },

    /// Script execution failed
    #[error("script error: {message}")]
    Script {
        /// Driver-reported reason
        message: String,
    },

    /// Any other session-level failure
    #[error("driver session error: {message}")]
    Session {
        /// Driver-reported reason
        message: String,
    },
}

/// Handle to a live element in the document.
///
/// Handles are request-scoped: the document is assumed to mutate between
/// calls, so they are re-resolved on every operation rather than cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementHandle {
    /// Driver-assigned element identifier
    pub id: String,
    /// Element tag name
    pub tag_name: String,
}

impl ElementHandle {
    /// Create a new element handle.
    #[must_use]
    pub fn new(id: impl Into<String>, tag_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tag_name: tag_name.into(),
        }
    }
}

/// The browser automation session consumed by Palpar.
///
/// Implementations wrap a real WebDriver/CDP session; [`MockDriver`] wraps an
/// in-memory document for unit tests.
pub trait Driver {
    /// All elements matching `(strategy, expression)`, in document order.
    fn find_all(
        &mut self,
        strategy: Strategy,
        expression: &str,
    ) -> Result<Vec<ElementHandle>, DriverError>;

    /// Primary click.
    fn click(&mut self, element: &ElementHandle) -> Result<(), DriverError>;

    /// Compound pointer gesture: move to the element, then context-click.
    fn context_click(&mut self, element: &ElementHandle) -> Result<(), DriverError>;

    /// Compound double-click gesture.
    fn double_click(&mut self, element: &ElementHandle) -> Result<(), DriverError>;

    /// Move the virtual pointer onto the element without clicking.
    fn move_to(&mut self, element: &ElementHandle) -> Result<(), DriverError>;

    /// Send keystrokes to the element.
    fn send_keys(&mut self, element: &ElementHandle, text: &str) -> Result<(), DriverError>;

    /// Clear the element's current value.
    fn clear(&mut self, element: &ElementHandle) -> Result<(), DriverError>;

    /// Rendered text content of the element.
    fn text(&mut self, element: &ElementHandle) -> Result<String, DriverError>;

    /// Whether the element is currently displayed.
    fn is_displayed(&mut self, element: &ElementHandle) -> Result<bool, DriverError>;

    /// Visible-text options of a `<select>` element.
    fn select_options(&mut self, element: &ElementHandle) -> Result<Vec<String>, DriverError>;

    /// Choose a `<select>` option by its visible text.
    fn select_by_visible_text(
        &mut self,
        element: &ElementHandle,
        text: &str,
    ) -> Result<(), DriverError>;

    /// Current page title.
    fn title(&mut self) -> Result<String, DriverError>;

    /// Current page URL.
    fn current_url(&mut self) -> Result<String, DriverError>;

    /// Current page HTML source.
    fn page_source(&mut self) -> Result<String, DriverError>;

    /// Reload the current page.
    fn refresh(&mut self) -> Result<(), DriverError>;

    /// Go back in history.
    fn back(&mut self) -> Result<(), DriverError>;

    /// Go forward in history.
    fn forward(&mut self) -> Result<(), DriverError>;

    /// Execute JavaScript in the page context.
    fn execute_script(&mut self, script: &str) -> Result<serde_json::Value, DriverError>;

    /// Capture the current viewport as PNG bytes.
    fn screenshot_png(&mut self) -> Result<Vec<u8>, DriverError>;

    /// Handles of all open windows.
    fn window_handles(&mut self) -> Result<Vec<String>, DriverError>;

    /// Handle of the focused window.
    fn current_window(&mut self) -> Result<String, DriverError>;

    /// Focus the window with the given handle.
    fn switch_to_window(&mut self, handle: &str) -> Result<(), DriverError>;

    /// Accept the open alert dialog.
    fn alert_accept(&mut self) -> Result<(), DriverError>;

    /// Dismiss the open alert dialog.
    fn alert_dismiss(&mut self) -> Result<(), DriverError>;

    /// Text of the open alert dialog.
    fn alert_text(&mut self) -> Result<String, DriverError>;
}

/// An element in the [`MockDriver`]'s in-memory document.
#[derive(Debug, Clone)]
pub struct MockElement {
    /// Handle returned for this element
    pub handle: ElementHandle,
    /// Locator this element answers to
    pub matches: Locator,
    /// Rendered text content
    pub text: String,
    /// Current input value (mutated by `send_keys`/`clear`)
    pub value: String,
    /// Whether the element is displayed
    pub displayed: bool,
    /// Whether interactions succeed
    pub interactable: bool,
    /// Visible-text options, when the element is a `<select>`
    pub options: Vec<String>,
    /// Currently selected option
    pub selected: Option<String>,
    /// Number of `find_all` polls before the element appears
    pub appears_after: usize,
}

impl MockElement {
    /// Create a visible, interactable element answering to `matches`.
    #[must_use]
    pub fn new(id: impl Into<String>, tag_name: impl Into<String>, matches: Locator) -> Self {
        Self {
            handle: ElementHandle::new(id, tag_name),
            matches,
            text: String::new(),
            value: String::new(),
            displayed: true,
            interactable: true,
            options: Vec::new(),
            selected: None,
            appears_after: 0,
        }
    }

    /// Set the rendered text.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set the initial input value.
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// Set `<select>` options.
    #[must_use]
    pub fn with_options(mut self, options: Vec<String>) -> Self {
        self.options = options;
        self
    }

    /// Mark the element as refusing interactions.
    #[must_use]
    pub fn not_interactable(mut self) -> Self {
        self.interactable = false;
        self
    }

    /// Mark the element as hidden.
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.displayed = false;
        self
    }

    /// Make the element appear only after `polls` lookup attempts.
    #[must_use]
    pub fn appears_after(mut self, polls: usize) -> Self {
        self.appears_after = polls;
        self
    }
}

/// Mock driver over an in-memory document, for unit testing.
///
/// Records every interaction in a call history so tests can assert on exactly
/// which driver operations were dispatched.
#[derive(Debug, Default)]
pub struct MockDriver {
    /// Simulated document
    pub elements: Vec<MockElement>,
    title: String,
    url: String,
    source: String,
    windows: Vec<String>,
    focused_window: usize,
    alert: Option<String>,
    script_result: serde_json::Value,
    screenshot: Vec<u8>,
    calls: Vec<String>,
    polls: usize,
}

impl MockDriver {
    /// Create an empty mock document.
    #[must_use]
    pub fn new() -> Self {
        Self {
            windows: vec!["w0".to_string()],
            ..Self::default()
        }
    }

    /// Add an element to the document.
    pub fn add_element(&mut self, element: MockElement) {
        self.elements.push(element);
    }

    /// Set page title, URL and source.
    pub fn set_page(
        &mut self,
        title: impl Into<String>,
        url: impl Into<String>,
        source: impl Into<String>,
    ) {
        self.title = title.into();
        self.url = url.into();
        self.source = source.into();
    }

    /// Open an additional window.
    pub fn open_window(&mut self, handle: impl Into<String>) {
        self.windows.push(handle.into());
    }

    /// Show an alert dialog with the given text.
    pub fn set_alert(&mut self, text: impl Into<String>) {
        self.alert = Some(text.into());
    }

    /// Set the value returned by `execute_script`.
    pub fn set_script_result(&mut self, value: serde_json::Value) {
        self.script_result = value;
    }

    /// Set the PNG bytes returned by `screenshot_png`.
    pub fn set_screenshot(&mut self, png: Vec<u8>) {
        self.screenshot = png;
    }

    /// Current value of an element, by id.
    #[must_use]
    pub fn element_value(&self, id: &str) -> Option<&str> {
        self.elements
            .iter()
            .find(|e| e.handle.id == id)
            .map(|e| e.value.as_str())
    }

    /// Selected option of a `<select>` element, by id.
    #[must_use]
    pub fn selected_option(&self, id: &str) -> Option<&str> {
        self.elements
            .iter()
            .find(|e| e.handle.id == id)
            .and_then(|e| e.selected.as_deref())
    }

    /// Full call history.
    #[must_use]
    pub fn history(&self) -> &[String] {
        &self.calls
    }

    /// Whether any recorded call starts with `prefix`.
    #[must_use]
    pub fn was_called(&self, prefix: &str) -> bool {
        self.calls.iter().any(|c| c.starts_with(prefix))
    }

    /// Number of recorded calls starting with `prefix`.
    #[must_use]
    pub fn call_count(&self, prefix: &str) -> usize {
        self.calls.iter().filter(|c| c.starts_with(prefix)).count()
    }

    fn element_mut(&mut self, id: &str) -> Result<&mut MockElement, DriverError> {
        self.elements
            .iter_mut()
            .find(|e| e.handle.id == id)
            .ok_or_else(|| DriverError::StaleElement { id: id.to_string() })
    }

    fn interactable_mut(&mut self, id: &str) -> Result<&mut MockElement, DriverError> {
        let element = self.element_mut(id)?;
        if element.interactable {
            Ok(element)
        } else {
            Err(DriverError::NotInteractable {
                message: format!("element {id} refuses interaction"),
            })
        }
    }
}

impl Driver for MockDriver {
    fn find_all(
        &mut self,
        strategy: Strategy,
        expression: &str,
    ) -> Result<Vec<ElementHandle>, DriverError> {
        self.polls += 1;
        self.calls
            .push(format!("find:{}:{expression}", strategy.name()));
        let polls = self.polls;
        Ok(self
            .elements
            .iter()
            .filter(|e| {
                e.matches.strategy == strategy
                    && e.matches.expression == expression
                    && polls > e.appears_after
            })
            .map(|e| e.handle.clone())
            .collect())
    }

    fn click(&mut self, element: &ElementHandle) -> Result<(), DriverError> {
        self.calls.push(format!("click:{}", element.id));
        let _ = self.interactable_mut(&element.id)?;
        Ok(())
    }

    fn context_click(&mut self, element: &ElementHandle) -> Result<(), DriverError> {
        self.calls.push(format!("context_click:{}", element.id));
        let _ = self.interactable_mut(&element.id)?;
        Ok(())
    }

    fn double_click(&mut self, element: &ElementHandle) -> Result<(), DriverError> {
        self.calls.push(format!("double_click:{}", element.id));
        let _ = self.interactable_mut(&element.id)?;
        Ok(())
    }

    fn move_to(&mut self, element: &ElementHandle) -> Result<(), DriverError> {
        self.calls.push(format!("move_to:{}", element.id));
        let _ = self.element_mut(&element.id)?;
        Ok(())
    }

    fn send_keys(&mut self, element: &ElementHandle, text: &str) -> Result<(), DriverError> {
        self.calls.push(format!("send_keys:{}:{text}", element.id));
        let target = self.interactable_mut(&element.id)?;
        target.value.push_str(text);
        Ok(())
    }

    fn clear(&mut self, element: &ElementHandle) -> Result<(), DriverError> {
        self.calls.push(format!("clear:{}", element.id));
        let target = self.interactable_mut(&element.id)?;
        target.value.clear();
        Ok(())
    }

    fn text(&mut self, element: &ElementHandle) -> Result<String, DriverError> {
        self.calls.push(format!("text:{}", element.id));
        let target = self.element_mut(&element.id)?;
        Ok(target.text.clone())
    }

    fn is_displayed(&mut self, element: &ElementHandle) -> Result<bool, DriverError> {
        let target = self.element_mut(&element.id)?;
        Ok(target.displayed)
    }

    fn select_options(&mut self, element: &ElementHandle) -> Result<Vec<String>, DriverError> {
        let target = self.element_mut(&element.id)?;
        Ok(target.options.clone())
    }

    fn select_by_visible_text(
        &mut self,
        element: &ElementHandle,
        text: &str,
    ) -> Result<(), DriverError> {
        self.calls.push(format!("select:{}:{text}", element.id));
        let target = self.interactable_mut(&element.id)?;
        if target.options.iter().any(|o| o == text) {
            target.selected = Some(text.to_string());
            Ok(())
        } else {
            Err(DriverError::NotInteractable {
                message: format!("no option with visible text '{text}'"),
            })
        }
    }

    fn title(&mut self) -> Result<String, DriverError> {
        Ok(self.title.clone())
    }

    fn current_url(&mut self) -> Result<String, DriverError> {
        Ok(self.url.clone())
    }

    fn page_source(&mut self) -> Result<String, DriverError> {
        Ok(self.source.clone())
    }

    fn refresh(&mut self) -> Result<(), DriverError> {
        self.calls.push("refresh".to_string());
        Ok(())
    }

    fn back(&mut self) -> Result<(), DriverError> {
        self.calls.push("back".to_string());
        Ok(())
    }

    fn forward(&mut self) -> Result<(), DriverError> {
        self.calls.push("forward".to_string());
        Ok(())
    }

    fn execute_script(&mut self, script: &str) -> Result<serde_json::Value, DriverError> {
        self.calls.push(format!("script:{script}"));
        Ok(self.script_result.clone())
    }

    fn screenshot_png(&mut self) -> Result<Vec<u8>, DriverError> {
        self.calls.push("screenshot".to_string());
        Ok(self.screenshot.clone())
    }

    fn window_handles(&mut self) -> Result<Vec<String>, DriverError> {
        Ok(self.windows.clone())
    }

    fn current_window(&mut self) -> Result<String, DriverError> {
        self.windows
            .get(self.focused_window)
            .cloned()
            .ok_or_else(|| DriverError::NoWindow {
                handle: format!("#{}", self.focused_window),
            })
    }

    fn switch_to_window(&mut self, handle: &str) -> Result<(), DriverError> {
        self.calls.push(format!("switch_window:{handle}"));
        match self.windows.iter().position(|w| w == handle) {
            Some(index) => {
                self.focused_window = index;
                Ok(())
            }
            None => Err(DriverError::NoWindow {
                handle: handle.to_string(),
            }),
        }
    }

    fn alert_accept(&mut self) -> Result<(), DriverError> {
        self.calls.push("alert_accept".to_string());
        self.alert.take().map(|_| ()).ok_or(DriverError::NoAlert)
    }

    fn alert_dismiss(&mut self) -> Result<(), DriverError> {
        self.calls.push("alert_dismiss".to_string());
        self.alert.take().map(|_| ()).ok_or(DriverError::NoAlert)
    }

    fn alert_text(&mut self) -> Result<String, DriverError> {
        self.alert.clone().ok_or(DriverError::NoAlert)
    }
}
