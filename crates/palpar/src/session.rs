//! Session: element resolution and action dispatch over a driver.
//!
//! [`Session`] is the entry point page objects hold. It owns the driver
//! handle and layers three things on top of it:
//!
//! - an existence wait that polls until a locator matches or the configured
//!   deadline passes ([`Session::wait_for`]),
//! - a resolver mapping a locator plus a [`Selection`] onto one live element
//!   or a typed contract violation ([`Session::resolve`]),
//! - action dispatch that catches driver failures at the boundary and
//!   degrades them to a typed [`Outcome`] instead of unwinding the test.
//!
//! Everything is request-scoped. Elements are re-resolved on every call
//! because the document is assumed to mutate between calls.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::action::{ActionRequest, Outcome, Selection, Verb, SETTLE_MS};
use crate::capture::{Attachment, AttachmentSink, CaptureStore};
use crate::config::PalparConfig;
use crate::driver::{Driver, DriverError, ElementHandle};
use crate::native::DialogAutomation;
use crate::result::{PalparError, PalparResult};
use crate::strategy::Locator;
use crate::wait::await_condition_report;

/// Scroll direction for [`Session::scroll`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards the top of the page
    Up,
    /// Towards the bottom of the page
    Down,
}

/// One browser automation session, generic over its [`Driver`].
#[derive(Debug)]
pub struct Session<D: Driver> {
    driver: D,
    config: PalparConfig,
}

impl<D: Driver> Session<D> {
    /// Create a session with default configuration.
    pub fn new(driver: D) -> Self {
        Self::with_config(driver, PalparConfig::default())
    }

    /// Create a session with explicit configuration.
    pub fn with_config(driver: D, config: PalparConfig) -> Self {
        Self { driver, config }
    }

    /// The session configuration.
    #[must_use]
    pub const fn config(&self) -> &PalparConfig {
        &self.config
    }

    /// The underlying driver.
    #[must_use]
    pub const fn driver(&self) -> &D {
        &self.driver
    }

    /// Mutable access to the underlying driver.
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    /// Consume the session, returning the driver.
    pub fn into_driver(self) -> D {
        self.driver
    }

    // ------------------------------------------------------------------
    // Existence wait and resolution
    // ------------------------------------------------------------------

    /// Poll until at least one element matches `locator`, up to the
    /// configured timeout. Returns the first match, or `None` after the
    /// deadline. Absence is an expected outcome and is logged, not raised.
    pub fn wait_for(&mut self, locator: &Locator) -> Option<ElementHandle> {
        let options = self.config.wait_options();
        let driver = &mut self.driver;
        let report = await_condition_report(
            || {
                driver
                    .find_all(locator.strategy, &locator.expression)
                    .ok()
                    .and_then(|matches| matches.into_iter().next())
            },
            options.poll_interval(),
            options.timeout(),
        );
        match report.value {
            Some(element) => {
                tracing::debug!(
                    %locator,
                    elapsed = ?report.elapsed,
                    attempts = report.attempts,
                    "element present"
                );
                Some(element)
            }
            None => {
                tracing::error!(
                    %locator,
                    timeout_ms = options.timeout_ms,
                    attempts = report.attempts,
                    "element did not appear before deadline"
                );
                None
            }
        }
    }

    /// Whether at least one element matches `locator` within the wait
    /// deadline.
    pub fn exists(&mut self, locator: &Locator) -> bool {
        self.wait_for(locator).is_some()
    }

    /// Whether the first match for `locator` is currently displayed.
    /// Absent or failing elements count as not displayed (logged).
    pub fn is_displayed(&mut self, locator: &Locator) -> bool {
        let Some(element) = self.wait_for(locator) else {
            return false;
        };
        match self.driver.is_displayed(&element) {
            Ok(displayed) => displayed,
            Err(e) => {
                tracing::error!(%locator, error = %e, "visibility check failed");
                false
            }
        }
    }

    /// Resolve `locator` to one element.
    ///
    /// Waits for presence first. No match is `Ok(None)` (logged by the
    /// wait). [`Selection::Nth`] re-reads the full match set and returns a
    /// typed [`PalparError::IndexOutOfRange`] for an index past its end.
    pub fn resolve(
        &mut self,
        locator: &Locator,
        selection: Selection,
    ) -> PalparResult<Option<ElementHandle>> {
        let Some(first) = self.wait_for(locator) else {
            return Ok(None);
        };
        match selection {
            Selection::First => Ok(Some(first)),
            Selection::Nth(index) => {
                let matches = self
                    .driver
                    .find_all(locator.strategy, &locator.expression)?;
                let len = matches.len();
                matches.into_iter().nth(index).map(Some).ok_or_else(|| {
                    tracing::error!(%locator, index, len, "match index out of range");
                    PalparError::IndexOutOfRange {
                        index,
                        len,
                        expression: locator.expression.clone(),
                    }
                })
            }
        }
    }

    /// Resolve `locator` to its full match set, or `None` if nothing
    /// appears within the wait deadline.
    pub fn resolve_all(&mut self, locator: &Locator) -> PalparResult<Option<Vec<ElementHandle>>> {
        if self.wait_for(locator).is_none() {
            return Ok(None);
        }
        let matches = self
            .driver
            .find_all(locator.strategy, &locator.expression)?;
        Ok(Some(matches))
    }

    // ------------------------------------------------------------------
    // Action dispatch
    // ------------------------------------------------------------------

    fn act<R>(
        &mut self,
        locator: &Locator,
        selection: Selection,
        action: &'static str,
        op: impl FnOnce(&mut D, &ElementHandle) -> Result<R, DriverError>,
        done: impl FnOnce(R) -> Outcome,
    ) -> PalparResult<Outcome> {
        let Some(element) = self.resolve(locator, selection)? else {
            return Ok(Outcome::Absent);
        };
        match op(&mut self.driver, &element) {
            Ok(value) => {
                tracing::info!(%locator, action, "action dispatched");
                Ok(done(value))
            }
            Err(e) => {
                tracing::error!(%locator, action, error = %e, "action refused by driver");
                Ok(Outcome::NotInteractable(e.to_string()))
            }
        }
    }

    /// Read the element's rendered text.
    pub fn text(&mut self, locator: &Locator, selection: Selection) -> PalparResult<Outcome> {
        self.act(locator, selection, "text", |d, el| d.text(el), Outcome::Text)
    }

    /// Primary click.
    pub fn click(&mut self, locator: &Locator, selection: Selection) -> PalparResult<Outcome> {
        self.act(locator, selection, "click", |d, el| d.click(el), |()| Outcome::Done)
    }

    /// Context-menu click via the driver's compound pointer gesture.
    pub fn right_click(&mut self, locator: &Locator, selection: Selection) -> PalparResult<Outcome> {
        self.act(
            locator,
            selection,
            "right_click",
            |d, el| d.context_click(el),
            |()| Outcome::Done,
        )
    }

    /// Compound double-click gesture.
    pub fn double_click(
        &mut self,
        locator: &Locator,
        selection: Selection,
    ) -> PalparResult<Outcome> {
        self.act(
            locator,
            selection,
            "double_click",
            |d, el| d.double_click(el),
            |()| Outcome::Done,
        )
    }

    /// Send keystrokes equal to `text` to the element.
    pub fn input(
        &mut self,
        locator: &Locator,
        selection: Selection,
        text: &str,
    ) -> PalparResult<Outcome> {
        self.act(
            locator,
            selection,
            "input",
            |d, el| d.send_keys(el, text),
            |()| Outcome::Done,
        )
    }

    /// Clear the element's current value.
    pub fn clear(&mut self, locator: &Locator, selection: Selection) -> PalparResult<Outcome> {
        self.act(locator, selection, "clear", |d, el| d.clear(el), |()| Outcome::Done)
    }

    /// Clear, settle, then input `text`.
    ///
    /// The settle pause covers widgets that reset internal state
    /// asynchronously after a clear; the element is re-resolved for the
    /// input because the document may have changed in the meantime.
    pub fn clear_then_input(
        &mut self,
        locator: &Locator,
        selection: Selection,
        text: &str,
    ) -> PalparResult<Outcome> {
        let cleared = self.clear(locator, selection)?;
        if !cleared.is_done() {
            return Ok(cleared);
        }
        std::thread::sleep(Duration::from_millis(SETTLE_MS));
        self.input(locator, selection, text)
    }

    /// Move the virtual pointer onto the element without clicking.
    pub fn hover(&mut self, locator: &Locator) -> PalparResult<Outcome> {
        self.act(
            locator,
            Selection::First,
            "hover",
            |d, el| d.move_to(el),
            |()| Outcome::Done,
        )
    }

    /// Hover, settle, then double-click — for widgets that only render
    /// their hover-revealed controls once the pointer settles.
    pub fn hover_double_click(&mut self, locator: &Locator) -> PalparResult<Outcome> {
        let hovered = self.hover(locator)?;
        if !hovered.is_done() {
            return Ok(hovered);
        }
        std::thread::sleep(Duration::from_millis(SETTLE_MS));
        self.double_click(locator, Selection::First)
    }

    /// Visible-text options of a `<select>` element, or `None` when the
    /// element is absent or refuses introspection (logged).
    pub fn select_options(&mut self, locator: &Locator) -> PalparResult<Option<Vec<String>>> {
        let Some(element) = self.resolve(locator, Selection::First)? else {
            return Ok(None);
        };
        match self.driver.select_options(&element) {
            Ok(options) => Ok(Some(options)),
            Err(e) => {
                tracing::error!(%locator, error = %e, "option introspection failed");
                Ok(None)
            }
        }
    }

    /// Choose a `<select>` option by its visible text.
    pub fn select_by_visible_text(
        &mut self,
        locator: &Locator,
        value: &str,
    ) -> PalparResult<Outcome> {
        self.act(
            locator,
            Selection::First,
            "select",
            |d, el| d.select_by_visible_text(el, value),
            |()| Outcome::Done,
        )
    }

    // ------------------------------------------------------------------
    // Unified verb dispatch
    // ------------------------------------------------------------------

    /// Single entry point for data-driven callers.
    ///
    /// Validates the request (strategy, verb, selection), sleeps the
    /// pre-action wait, then routes to the corresponding method. Verbs
    /// outside the closed vocabulary and text-taking verbs without text are
    /// typed, logged errors.
    pub fn perform(&mut self, request: &ActionRequest) -> PalparResult<Outcome> {
        let locator = request.locator()?;
        let verb = request.verb()?;
        let selection = request.selection()?;
        std::thread::sleep(Duration::from_millis(request.wait_ms));
        match verb {
            Verb::Locate => Ok(self
                .resolve(&locator, selection)?
                .map_or(Outcome::Absent, Outcome::Found)),
            Verb::Text => self.text(&locator, selection),
            Verb::Click => self.click(&locator, selection),
            Verb::Clear => self.clear(&locator, selection),
            Verb::Input => {
                let text = Self::required_text(request, verb)?;
                self.input(&locator, selection, text)
            }
            Verb::ClearThenInput => {
                let text = Self::required_text(request, verb)?;
                self.clear_then_input(&locator, selection, text)
            }
        }
    }

    fn required_text(request: &ActionRequest, verb: Verb) -> PalparResult<&str> {
        request.text.as_deref().ok_or_else(|| {
            tracing::error!(operation = verb.as_str(), "operation requires text");
            PalparError::MissingText {
                operation: verb.as_str().to_string(),
            }
        })
    }

    // ------------------------------------------------------------------
    // Page and window passthroughs
    // ------------------------------------------------------------------

    /// Current page title.
    pub fn title(&mut self) -> PalparResult<String> {
        let title = self.driver.title()?;
        tracing::info!(title, "read page title");
        Ok(title)
    }

    /// Current page URL.
    pub fn url(&mut self) -> PalparResult<String> {
        let url = self.driver.current_url()?;
        tracing::info!(url, "read page url");
        Ok(url)
    }

    /// Current page HTML source.
    pub fn page_source(&mut self) -> PalparResult<String> {
        Ok(self.driver.page_source()?)
    }

    /// Reload the current page.
    pub fn refresh(&mut self) -> PalparResult<()> {
        tracing::info!("refresh page");
        Ok(self.driver.refresh()?)
    }

    /// Go back in history.
    pub fn back(&mut self) -> PalparResult<()> {
        self.driver.back()?;
        tracing::info!("went back one page");
        Ok(())
    }

    /// Go forward in history.
    pub fn forward(&mut self) -> PalparResult<()> {
        self.driver.forward()?;
        tracing::info!("went forward one page");
        Ok(())
    }

    /// Scroll the page a viewport-sized step up or down.
    pub fn scroll(&mut self, direction: Direction) -> PalparResult<()> {
        let script = match direction {
            Direction::Up => "window.scrollBy(0, -10000);",
            Direction::Down => "window.scrollBy(0, 10000);",
        };
        tracing::info!(?direction, "scroll page");
        self.driver.execute_script(script)?;
        Ok(())
    }

    /// Execute JavaScript in the page context.
    pub fn execute_script(&mut self, script: &str) -> PalparResult<serde_json::Value> {
        Ok(self.driver.execute_script(script)?)
    }

    /// Handles of all open windows.
    pub fn window_handles(&mut self) -> PalparResult<Vec<String>> {
        let handles = self.driver.window_handles()?;
        tracing::info!(count = handles.len(), "enumerated windows");
        Ok(handles)
    }

    /// Handle of the focused window.
    pub fn current_window(&mut self) -> PalparResult<String> {
        Ok(self.driver.current_window()?)
    }

    /// Focus the window at `index` of the handle enumeration.
    ///
    /// # Errors
    ///
    /// Returns [`PalparError::WindowOutOfRange`] for an index past the open
    /// windows.
    pub fn switch_window(&mut self, index: usize) -> PalparResult<()> {
        let handles = self.driver.window_handles()?;
        let Some(handle) = handles.get(index) else {
            tracing::error!(index, count = handles.len(), "window index out of range");
            return Err(PalparError::WindowOutOfRange {
                index,
                count: handles.len(),
            });
        };
        self.driver.switch_to_window(handle)?;
        tracing::info!(handle, "switched window");
        Ok(())
    }

    /// Accept the open alert. Returns whether an alert was present;
    /// absence is logged, never raised.
    pub fn alert_accept(&mut self) -> bool {
        match self.driver.alert_accept() {
            Ok(()) => {
                tracing::info!("alert accepted");
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "alert accept failed");
                false
            }
        }
    }

    /// Dismiss the open alert. Returns whether an alert was present.
    pub fn alert_dismiss(&mut self) -> bool {
        match self.driver.alert_dismiss() {
            Ok(()) => {
                tracing::info!("alert dismissed");
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "alert dismiss failed");
                false
            }
        }
    }

    /// Text of the open alert, or `None` when no alert is present (logged).
    pub fn alert_text(&mut self) -> Option<String> {
        match self.driver.alert_text() {
            Ok(text) => {
                tracing::info!(text, "read alert text");
                Some(text)
            }
            Err(e) => {
                tracing::error!(error = %e, "alert text read failed");
                None
            }
        }
    }

    // ------------------------------------------------------------------
    // Capture
    // ------------------------------------------------------------------

    /// Capture the viewport, store it under the configured screenshot
    /// directory, and register it with the report sink.
    pub fn screenshot(
        &mut self,
        doc: &str,
        sink: &mut dyn AttachmentSink,
    ) -> PalparResult<PathBuf> {
        let png = self
            .driver
            .screenshot_png()
            .map_err(|e| PalparError::CaptureError {
                message: e.to_string(),
            })?;
        let store = CaptureStore::new(&self.config.screenshot_dir);
        let path = store.save(doc, &png)?;
        let name = path
            .file_name()
            .map_or_else(|| doc.to_string(), |n| n.to_string_lossy().into_owned());
        sink.attach(Attachment::png(name, &path, &png))?;
        Ok(path)
    }

    // ------------------------------------------------------------------
    // Native dialog workflows (best effort, unverifiable)
    // ------------------------------------------------------------------

    /// "Save image as" through the native OS dialog.
    ///
    /// Right-clicks the element, types the save-as accelerator, pastes the
    /// destination path from the clipboard and confirms. The dialog is
    /// outside the browser, so completion cannot be confirmed; the returned
    /// path is where the file should land. `None` means the element never
    /// appeared and no gesture was issued.
    pub fn save_image_as(
        &mut self,
        locator: &Locator,
        filename: &str,
        dialog: &mut dyn DialogAutomation,
    ) -> PalparResult<Option<PathBuf>> {
        let opened = self.right_click(locator, Selection::First)?;
        if !opened.is_done() {
            tracing::error!(%locator, ?opened, "save-as menu did not open");
            return Ok(None);
        }
        dialog.type_key('v')?;
        let destination = self.config.screenshot_dir.join(format!("{filename}.jpg"));
        dialog.set_clipboard(&destination.to_string_lossy())?;
        std::thread::sleep(Duration::from_millis(SETTLE_MS));
        dialog.paste()?;
        dialog.press_enter()?;
        tracing::info!(path = %destination.display(), "save-as gesture issued (unverified)");
        Ok(Some(destination))
    }

    /// File upload through the native OS chooser dialog.
    ///
    /// Opens the chooser from the element, pastes `path` from the clipboard
    /// and confirms twice. Best effort: the chooser is invisible to the
    /// driver and success cannot be confirmed.
    pub fn upload_file(
        &mut self,
        locator: &Locator,
        path: &Path,
        dialog: &mut dyn DialogAutomation,
    ) -> PalparResult<Outcome> {
        let opened = self.right_click(locator, Selection::First)?;
        if !opened.is_done() {
            return Ok(opened);
        }
        std::thread::sleep(Duration::from_millis(SETTLE_MS));
        dialog.set_clipboard(&path.to_string_lossy())?;
        std::thread::sleep(Duration::from_millis(SETTLE_MS));
        dialog.paste()?;
        dialog.press_enter()?;
        dialog.press_enter()?;
        tracing::info!(path = %path.display(), "upload gesture issued (unverified)");
        Ok(Outcome::Done)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::capture::MemorySink;
    use crate::driver::{MockDriver, MockElement};
    use crate::native::MockDialog;

    fn fast_config() -> PalparConfig {
        PalparConfig::builder()
            .poll_interval_ms(1)
            .wait_timeout_ms(30)
            .build()
    }

    fn session_with(elements: Vec<MockElement>) -> Session<MockDriver> {
        let mut driver = MockDriver::new();
        for element in elements {
            driver.add_element(element);
        }
        Session::with_config(driver, fast_config())
    }

    fn submit_button() -> MockElement {
        MockElement::new(
            "submit-1",
            "button",
            Locator::xpath("//button[@id='submit']"),
        )
    }

    fn username_field() -> MockElement {
        MockElement::new("user-1", "input", Locator::id("username")).with_value("bob")
    }

    mod wait_tests {
        use super::*;

        #[test]
        fn test_wait_finds_late_element() {
            let mut session = session_with(vec![submit_button().appears_after(3)]);
            let element = session.wait_for(&Locator::xpath("//button[@id='submit']"));
            assert_eq!(element.unwrap().id, "submit-1");
        }

        #[test]
        fn test_wait_timeout_is_none_not_error() {
            let mut session = session_with(vec![]);
            assert!(session.wait_for(&Locator::id("ghost")).is_none());
        }

        #[test]
        fn test_wait_is_idempotent_on_stable_document() {
            let mut session = session_with(vec![submit_button()]);
            let locator = Locator::xpath("//button[@id='submit']");
            let first = session.wait_for(&locator);
            let second = session.wait_for(&locator);
            assert_eq!(first, second);
        }

        #[test]
        fn test_exists_and_is_displayed() {
            let mut session = session_with(vec![
                submit_button(),
                MockElement::new("h", "div", Locator::css("div.hidden")).hidden(),
            ]);
            assert!(session.exists(&Locator::xpath("//button[@id='submit']")));
            assert!(!session.exists(&Locator::id("ghost")));
            assert!(session.is_displayed(&Locator::xpath("//button[@id='submit']")));
            assert!(!session.is_displayed(&Locator::css("div.hidden")));
        }
    }

    mod resolve_tests {
        use super::*;

        fn items() -> Vec<MockElement> {
            vec![
                MockElement::new("li-0", "li", Locator::css("li.item")).with_text("zero"),
                MockElement::new("li-1", "li", Locator::css("li.item")).with_text("one"),
            ]
        }

        #[test]
        fn test_resolve_absent_is_ok_none() {
            let mut session = session_with(vec![]);
            let resolved = session
                .resolve(&Locator::id("ghost"), Selection::First)
                .unwrap();
            assert!(resolved.is_none());
        }

        #[test]
        fn test_resolve_first_of_many() {
            let mut session = session_with(items());
            let resolved = session
                .resolve(&Locator::css("li.item"), Selection::First)
                .unwrap()
                .unwrap();
            assert_eq!(resolved.id, "li-0");
        }

        #[test]
        fn test_resolve_nth() {
            let mut session = session_with(items());
            let resolved = session
                .resolve(&Locator::css("li.item"), Selection::Nth(1))
                .unwrap()
                .unwrap();
            assert_eq!(resolved.id, "li-1");
        }

        #[test]
        fn test_resolve_nth_out_of_range_is_typed_error() {
            let mut session = session_with(items());
            let err = session
                .resolve(&Locator::css("li.item"), Selection::Nth(5))
                .unwrap_err();
            assert!(matches!(
                err,
                PalparError::IndexOutOfRange { index: 5, len: 2, .. }
            ));
        }

        #[test]
        fn test_resolve_all_returns_match_set() {
            let mut session = session_with(items());
            let matches = session
                .resolve_all(&Locator::css("li.item"))
                .unwrap()
                .unwrap();
            assert_eq!(matches.len(), 2);
        }

        #[test]
        fn test_resolve_all_absent_is_none() {
            let mut session = session_with(vec![]);
            assert!(session.resolve_all(&Locator::id("ghost")).unwrap().is_none());
        }
    }

    mod action_tests {
        use super::*;

        #[test]
        fn test_click_fires_exactly_once() {
            let mut session = session_with(vec![submit_button()]);
            let outcome = session
                .click(&Locator::xpath("//button[@id='submit']"), Selection::First)
                .unwrap();
            assert!(outcome.is_done());
            assert_eq!(session.driver().call_count("click:submit-1"), 1);
        }

        #[test]
        fn test_text_reads_without_mutation() {
            let mut session = session_with(vec![
                MockElement::new("s", "span", Locator::css("span.score")).with_text("10"),
            ]);
            let outcome = session
                .text(&Locator::css("span.score"), Selection::First)
                .unwrap();
            assert_eq!(outcome.text(), Some("10"));
            assert!(!session.driver().was_called("click:"));
            assert!(!session.driver().was_called("send_keys:"));
            assert!(!session.driver().was_called("clear:"));
        }

        #[test]
        fn test_action_on_absent_element_is_absent_outcome() {
            let mut session = session_with(vec![]);
            let outcome = session.click(&Locator::id("ghost"), Selection::First).unwrap();
            assert!(outcome.is_absent());
        }

        #[test]
        fn test_driver_refusal_degrades_to_not_interactable() {
            let mut session = session_with(vec![submit_button().not_interactable()]);
            let outcome = session
                .click(&Locator::xpath("//button[@id='submit']"), Selection::First)
                .unwrap();
            assert!(matches!(outcome, Outcome::NotInteractable(_)));
        }

        #[test]
        fn test_clear_then_input_replaces_value() {
            let mut session = session_with(vec![username_field()]);
            let outcome = session
                .clear_then_input(&Locator::id("username"), Selection::First, "abc")
                .unwrap();
            assert!(outcome.is_done());
            assert_eq!(session.driver().element_value("user-1"), Some("abc"));
        }

        #[test]
        fn test_right_and_double_click_gestures() {
            let mut session = session_with(vec![submit_button()]);
            let locator = Locator::xpath("//button[@id='submit']");
            session.right_click(&locator, Selection::First).unwrap();
            session.double_click(&locator, Selection::First).unwrap();
            assert!(session.driver().was_called("context_click:submit-1"));
            assert!(session.driver().was_called("double_click:submit-1"));
        }

        #[test]
        fn test_hover_double_click_settles_between_gestures() {
            let mut session = session_with(vec![submit_button()]);
            let locator = Locator::xpath("//button[@id='submit']");
            let outcome = session.hover_double_click(&locator).unwrap();
            assert!(outcome.is_done());
            assert!(session.driver().was_called("move_to:submit-1"));
            assert!(session.driver().was_called("double_click:submit-1"));
        }

        #[test]
        fn test_select_by_visible_text() {
            let mut session = session_with(vec![MockElement::new(
                "sel",
                "select",
                Locator::id("country"),
            )
            .with_options(vec!["ES".to_string(), "FR".to_string()])]);
            let outcome = session
                .select_by_visible_text(&Locator::id("country"), "ES")
                .unwrap();
            assert!(outcome.is_done());
            assert_eq!(session.driver().selected_option("sel"), Some("ES"));

            let options = session.select_options(&Locator::id("country")).unwrap();
            assert_eq!(options.unwrap().len(), 2);
        }
    }

    mod perform_tests {
        use super::*;

        #[test]
        fn test_perform_click_scenario() {
            // (xpath, "//button[@id='submit']"), operation "click", wait 0.5
            let mut session = session_with(vec![submit_button()]);
            let request = ActionRequest::new("xpath", "//button[@id='submit']")
                .operation("click")
                .wait_ms(500);
            let outcome = session.perform(&request).unwrap();
            assert!(outcome.is_done());
            assert_eq!(session.driver().call_count("click:submit-1"), 1);
        }

        #[test]
        fn test_perform_clear_continue_input_scenario() {
            // (id, "username"), clear_continue_input "alice" => value "alice"
            let mut session = session_with(vec![username_field()]);
            let request = ActionRequest::new("id", "username")
                .operation("clear_continue_input")
                .text("alice")
                .wait_ms(0);
            let outcome = session.perform(&request).unwrap();
            assert!(outcome.is_done());
            assert_eq!(session.driver().element_value("user-1"), Some("alice"));
        }

        #[test]
        fn test_perform_text_returns_content() {
            let mut session = session_with(vec![
                MockElement::new("s", "span", Locator::css("span.score")).with_text("42"),
            ]);
            let request = ActionRequest::new("css", "span.score")
                .operation("text")
                .wait_ms(0);
            let outcome = session.perform(&request).unwrap();
            assert_eq!(outcome.text(), Some("42"));
        }

        #[test]
        fn test_perform_resolve_only() {
            let mut session = session_with(vec![submit_button()]);
            let request = ActionRequest::new("xpath", "//button[@id='submit']").wait_ms(0);
            let outcome = session.perform(&request).unwrap();
            assert_eq!(outcome.found().unwrap().id, "submit-1");
        }

        #[test]
        fn test_perform_unknown_operation_is_typed_error() {
            let mut session = session_with(vec![submit_button()]);
            let request = ActionRequest::new("xpath", "//button[@id='submit']")
                .operation("hover")
                .wait_ms(0);
            assert!(matches!(
                session.perform(&request),
                Err(PalparError::UnsupportedOperation { .. })
            ));
            assert!(!session.driver().was_called("click:"));
        }

        #[test]
        fn test_perform_input_without_text_is_typed_error() {
            let mut session = session_with(vec![username_field()]);
            let request = ActionRequest::new("id", "username")
                .operation("input")
                .wait_ms(0);
            assert!(matches!(
                session.perform(&request),
                Err(PalparError::MissingText { .. })
            ));
        }

        #[test]
        fn test_perform_multiple_without_index_is_typed_error() {
            let mut session = session_with(vec![submit_button()]);
            let mut request = ActionRequest::new("xpath", "//button[@id='submit']")
                .operation("click")
                .wait_ms(0);
            request.multiple = true;
            assert!(matches!(
                session.perform(&request),
                Err(PalparError::MissingIndex { .. })
            ));
        }

        #[test]
        fn test_perform_bad_strategy_is_typed_error() {
            let mut session = session_with(vec![]);
            let request = ActionRequest::new("data-testid", "x").wait_ms(0);
            assert!(matches!(
                session.perform(&request),
                Err(PalparError::UnsupportedStrategy { .. })
            ));
        }
    }

    mod passthrough_tests {
        use super::*;

        #[test]
        fn test_page_introspection() {
            let mut session = session_with(vec![]);
            session
                .driver_mut()
                .set_page("Dash", "https://x.test/dash", "<html></html>");
            assert_eq!(session.title().unwrap(), "Dash");
            assert_eq!(session.url().unwrap(), "https://x.test/dash");
            assert_eq!(session.page_source().unwrap(), "<html></html>");
        }

        #[test]
        fn test_navigation_passthroughs() {
            let mut session = session_with(vec![]);
            session.refresh().unwrap();
            session.back().unwrap();
            session.forward().unwrap();
            assert!(session.driver().was_called("refresh"));
            assert!(session.driver().was_called("back"));
            assert!(session.driver().was_called("forward"));
        }

        #[test]
        fn test_scroll_injects_script() {
            let mut session = session_with(vec![]);
            session.scroll(Direction::Down).unwrap();
            session.scroll(Direction::Up).unwrap();
            assert!(session.driver().was_called("script:window.scrollBy(0, 10000);"));
            assert!(session.driver().was_called("script:window.scrollBy(0, -10000);"));
        }

        #[test]
        fn test_switch_window() {
            let mut session = session_with(vec![]);
            session.driver_mut().open_window("w1");
            session.switch_window(1).unwrap();
            assert_eq!(session.current_window().unwrap(), "w1");
        }

        #[test]
        fn test_switch_window_out_of_range() {
            let mut session = session_with(vec![]);
            assert!(matches!(
                session.switch_window(7),
                Err(PalparError::WindowOutOfRange { index: 7, count: 1 })
            ));
        }

        #[test]
        fn test_alert_degrades_when_absent() {
            let mut session = session_with(vec![]);
            assert!(!session.alert_accept());
            assert!(!session.alert_dismiss());
            assert!(session.alert_text().is_none());
        }

        #[test]
        fn test_alert_accept_when_present() {
            let mut session = session_with(vec![]);
            session.driver_mut().set_alert("sure?");
            assert_eq!(session.alert_text().unwrap(), "sure?");
            assert!(session.alert_accept());
        }
    }

    mod capture_tests {
        use super::*;

        #[test]
        fn test_screenshot_stores_and_attaches() {
            let dir = tempfile::tempdir().unwrap();
            let config = PalparConfig::builder()
                .poll_interval_ms(1)
                .wait_timeout_ms(30)
                .screenshot_dir(dir.path())
                .build();
            let mut driver = MockDriver::new();
            driver.set_screenshot(vec![0x89, 0x50, 0x4E, 0x47]);
            let mut session = Session::with_config(driver, config);

            let mut sink = MemorySink::new();
            let path = session.screenshot("login", &mut sink).unwrap();
            assert!(path.exists());
            assert_eq!(sink.attachments().len(), 1);
            assert_eq!(
                sink.attachments()[0].payload().unwrap(),
                vec![0x89, 0x50, 0x4E, 0x47]
            );
        }
    }

    mod native_tests {
        use super::*;

        fn image() -> MockElement {
            MockElement::new("img-1", "img", Locator::css("img.photo"))
        }

        #[test]
        fn test_save_image_as_gesture_script() {
            let mut session = session_with(vec![image()]);
            let mut dialog = MockDialog::new();
            let path = session
                .save_image_as(&Locator::css("img.photo"), "banner", &mut dialog)
                .unwrap()
                .unwrap();
            assert!(path.to_string_lossy().ends_with("banner.jpg"));
            assert!(session.driver().was_called("context_click:img-1"));
            assert!(dialog.was_issued("key:v"));
            assert!(dialog.was_issued("clipboard:"));
            assert_eq!(dialog.script().last().unwrap(), "enter");
        }

        #[test]
        fn test_save_image_as_absent_issues_no_gestures() {
            let mut session = session_with(vec![]);
            let mut dialog = MockDialog::new();
            let path = session
                .save_image_as(&Locator::css("img.photo"), "banner", &mut dialog)
                .unwrap();
            assert!(path.is_none());
            assert!(dialog.script().is_empty());
        }

        #[test]
        fn test_upload_file_gesture_script() {
            let mut session = session_with(vec![MockElement::new(
                "up-1",
                "input",
                Locator::id("attachment"),
            )]);
            let mut dialog = MockDialog::new();
            let outcome = session
                .upload_file(
                    &Locator::id("attachment"),
                    Path::new("/tmp/report.pdf"),
                    &mut dialog,
                )
                .unwrap();
            assert!(outcome.is_done());
            assert!(dialog.was_issued("clipboard:/tmp/report.pdf"));
            assert_eq!(
                dialog.script().iter().filter(|g| *g == "enter").count(),
                2
            );
        }

        #[test]
        fn test_upload_file_absent_is_absent_outcome() {
            let mut session = session_with(vec![]);
            let mut dialog = MockDialog::new();
            let outcome = session
                .upload_file(&Locator::id("ghost"), Path::new("/tmp/x"), &mut dialog)
                .unwrap();
            assert!(outcome.is_absent());
            assert!(dialog.script().is_empty());
        }
    }
}
