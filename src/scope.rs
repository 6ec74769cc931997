use super::config::PageContract;
use super::dom::{Dom, NodeId};
use super::dropdown;
use super::*;

/// Whether a search covers every book or only the user's selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchScope {
    All,
    Specific,
}

impl SearchScope {
    /// Only `"specific"` narrows the search; every other value means all books.
    pub fn from_value(value: &str) -> Self {
        if value == "specific" {
            Self::Specific
        } else {
            Self::All
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Specific => "specific",
        }
    }
}

pub(crate) fn current_scope(dom: &Dom, contract: &PageContract) -> Result<SearchScope> {
    let checked = dom.query_selector(&contract.checked_scope_radio())?;
    Ok(checked
        .map(|radio| SearchScope::from_value(&dom.attr(radio, "value").unwrap_or_default()))
        .unwrap_or(SearchScope::All))
}

/// Shows the selection panel for `Specific`, hides it and closes every open
/// dropdown otherwise. A page without the panel is left untouched.
pub(crate) fn apply_scope(dom: &mut Dom, contract: &PageContract, scope: SearchScope) -> Result<()> {
    let Some(panel) = dom.query_selector(&contract.book_selections)? else {
        return Ok(());
    };
    match scope {
        SearchScope::Specific => dom.style_set(panel, "display", "flex"),
        SearchScope::All => {
            dom.style_set(panel, "display", "none")?;
            dropdown::close_all(dom, contract, None)
        }
    }
}

pub(crate) fn on_scope_changed(dom: &mut Dom, contract: &PageContract, radio: NodeId) -> Result<()> {
    let value = dom.attr(radio, "value").unwrap_or_default();
    apply_scope(dom, contract, SearchScope::from_value(&value))
}

/// Mirrors the server-rendered radio state into panel visibility at load.
pub(crate) fn initialize(dom: &mut Dom, contract: &PageContract) -> Result<SearchScope> {
    let specific_checked = match dom.query_selector(&contract.specific_scope_radio())? {
        Some(radio) => dom.checked(radio)?,
        None => false,
    };
    let Some(panel) = dom.query_selector(&contract.book_selections)? else {
        return Ok(SearchScope::All);
    };
    let scope = if specific_checked {
        dom.style_set(panel, "display", "flex")?;
        SearchScope::Specific
    } else {
        dom.style_set(panel, "display", "none")?;
        SearchScope::All
    };
    log::debug!(
        "initialized page with {} search scope; book selections {}",
        scope.as_str(),
        if scope == SearchScope::Specific { "shown" } else { "hidden" }
    );
    Ok(scope)
}
