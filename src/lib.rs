use std::collections::HashMap;
use std::error::Error as StdError;
use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    HtmlParse(String),
    UnsupportedSelector(String),
    SelectorNotFound(String),
    MissingRegion(&'static str),
    TypeMismatch {
        selector: String,
        expected: String,
        actual: String,
    },
    InvalidConfig(String),
    Dom(String),
    AssertionFailed {
        selector: String,
        expected: String,
        actual: String,
        dom_snippet: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HtmlParse(msg) => write!(f, "html parse error: {msg}"),
            Self::UnsupportedSelector(selector) => write!(f, "unsupported selector: {selector}"),
            Self::SelectorNotFound(selector) => write!(f, "selector not found: {selector}"),
            Self::MissingRegion(region) => write!(f, "page is missing the {region}"),
            Self::TypeMismatch {
                selector,
                expected,
                actual,
            } => write!(
                f,
                "type mismatch for {selector}: expected {expected}, actual {actual}"
            ),
            Self::InvalidConfig(msg) => write!(f, "invalid configuration: {msg}"),
            Self::Dom(msg) => write!(f, "dom error: {msg}"),
            Self::AssertionFailed {
                selector,
                expected,
                actual,
                dom_snippet,
            } => write!(
                f,
                "assertion failed for {selector}: expected {expected}, actual {actual}, snippet {dom_snippet}"
            ),
        }
    }
}

impl StdError for Error {}

mod autosize;
mod checkbox_group;
mod config;
mod dom;
mod dropdown;
mod event;
mod html;
mod page;
mod rate_limit;
mod results;
mod runtime_state;
mod scope;
mod selection;
mod selector;
mod shortcut;
mod submit;
mod text;

pub use autosize::AutosizeOutcome;
pub use checkbox_group::TriState;
pub use config::{
    ControllerConfig, DEFAULT_LOCATION, DEFAULT_MAX_QUERY_HEIGHT, DEFAULT_RATE_LIMIT_PHRASE,
    DEFAULT_RESULTS_FRAGMENT, LayoutMetrics, PageContract,
};
pub use dom::NodeId;
pub use event::KeyPress;
pub use page::SearchPage;
pub use runtime_state::{FormSubmission, OpenedWindow, ScrollRequest};
pub use scope::SearchScope;
pub use selection::{SelectionField, SelectionKind};
pub use text::{
    EMPTY_QUERY_HELP_HTML, LOADING_HTML, RATE_LIMIT_BODY, RATE_LIMIT_DISMISS, RATE_LIMIT_TITLE,
};
