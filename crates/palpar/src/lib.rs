//! Palpar: thin, typed layer over a browser automation driver
//!
//! Palpar (Spanish: "to probe by touch") wraps a low-level automation
//! session with the three things every UI test needs: locator resolution
//! with bounded polling waits, action dispatch that degrades driver
//! failures to typed outcomes instead of unwinding the test, and a unified
//! verb vocabulary for data-driven step tables.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     PALPAR Architecture                      │
//! ├──────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌─────────────┐    ┌────────────┐        │
//! │   │ Test Step  │    │ Session     │    │ Driver     │        │
//! │   │ (typed or  │───►│ wait/resolve│───►│ (WebDriver │        │
//! │   │  tabular)  │    │ /dispatch   │    │  or mock)  │        │
//! │   └────────────┘    └─────────────┘    └────────────┘        │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use palpar::{Locator, MockDriver, MockElement, Selection, Session};
//!
//! let mut driver = MockDriver::new();
//! driver.add_element(MockElement::new(
//!     "btn-1",
//!     "button",
//!     Locator::xpath("//button[@id='submit']"),
//! ));
//!
//! let mut session = Session::new(driver);
//! let outcome = session
//!     .click(&Locator::xpath("//button[@id='submit']"), Selection::First)
//!     .unwrap();
//! assert!(outcome.is_done());
//! ```

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

pub mod action;
pub mod capture;
pub mod config;
pub mod driver;
pub mod logging;
pub mod native;
pub mod result;
pub mod session;
pub mod strategy;
pub mod wait;

pub use action::{ActionRequest, Outcome, Selection, Verb, DEFAULT_ACTION_WAIT_MS, SETTLE_MS};
pub use capture::{
    capture_file_name, Attachment, AttachmentSink, CaptureStore, MemorySink, MAX_CAPTURE_NAME_LEN,
};
pub use config::{PalparConfig, PalparConfigBuilder, DEFAULT_SCREENSHOT_DIR};
pub use driver::{Driver, DriverError, ElementHandle, MockDriver, MockElement};
pub use native::{DialogAutomation, MockDialog};
pub use result::{PalparError, PalparResult};
pub use session::{Direction, Session};
pub use strategy::{Locator, Strategy};
pub use wait::{
    await_condition, await_condition_report, WaitOptions, WaitReport, DEFAULT_POLL_INTERVAL_MS,
    DEFAULT_WAIT_TIMEOUT_MS,
};
