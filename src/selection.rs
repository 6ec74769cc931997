use std::borrow::Cow;

use fancy_regex::Regex;

use super::config::PageContract;
use super::dom::{Dom, NodeId};
use super::scope::{SearchScope, current_scope};
use super::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionKind {
    Book,
    Series,
    Other,
}

/// A hidden field injected into the search form for one selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionField {
    pub kind: SelectionKind,
    pub name: String,
    pub value: String,
}

/// Classifies field names by the contract's selection prefixes.
#[derive(Debug, Clone)]
pub(crate) struct SelectionNames {
    pattern: Regex,
}

impl SelectionNames {
    pub(crate) fn new(contract: &PageContract) -> Result<Self> {
        let alternatives = contract
            .selection_prefixes
            .iter()
            .map(|prefix| fancy_regex::escape(prefix))
            .collect::<Vec<Cow<'_, str>>>()
            .join("|");
        let pattern = Regex::new(&format!("^(?P<prefix>{alternatives})(?P<id>.*)$"))
            .map_err(|err| Error::InvalidConfig(format!("selection prefixes: {err}")))?;
        Ok(Self { pattern })
    }

    pub(crate) fn is_selection_name(&self, name: &str) -> bool {
        self.pattern.is_match(name).unwrap_or(false)
    }

    pub(crate) fn kind_of(&self, name: &str) -> SelectionKind {
        let prefix = self
            .pattern
            .captures(name)
            .ok()
            .flatten()
            .and_then(|caps| caps.name("prefix").map(|m| m.as_str().to_string()));
        match prefix.as_deref() {
            Some(prefix) if prefix.starts_with("book") => SelectionKind::Book,
            Some(prefix) if prefix.starts_with("series") => SelectionKind::Series,
            _ => SelectionKind::Other,
        }
    }

    pub(crate) fn field(&self, name: String, value: String) -> SelectionField {
        SelectionField {
            kind: self.kind_of(&name),
            name,
            value,
        }
    }
}

/// Removes selection fields left in the form by an earlier attempt. Fields
/// rendered inside the option controls or the selection panel stay, and so
/// does anything carrying the anti-forgery marker in its name.
pub(crate) fn purge_injected_fields(
    dom: &mut Dom,
    contract: &PageContract,
    names: &SelectionNames,
    form: NodeId,
) -> Result<usize> {
    let mut stale = Vec::new();
    for input in dom.query_selector_all_from(form, &contract.selection_inputs())? {
        let name = dom.attr(input, "name").unwrap_or_default();
        if !names.is_selection_name(&name) || name.contains(&contract.anti_forgery_marker) {
            continue;
        }
        if dom.closest(input, &contract.search_options)?.is_some()
            || dom.closest(input, &contract.book_selections)?.is_some()
        {
            continue;
        }
        stale.push(input);
    }
    for input in &stale {
        dom.remove_node(*input)?;
    }
    Ok(stale.len())
}

/// Selections currently made in the panel: checked checkboxes first, then
/// selected single-book chips, both in document order.
pub(crate) fn collect_selections(
    dom: &Dom,
    contract: &PageContract,
    names: &SelectionNames,
) -> Result<Vec<SelectionField>> {
    let Some(panel) = dom.query_selector(&contract.book_selections)? else {
        log::debug!("no book selections panel found");
        return Ok(Vec::new());
    };

    let mut fields = Vec::new();
    for input in dom.query_selector_all_from(panel, "input[type=\"checkbox\"]:checked")? {
        let name = dom.attr(input, "name").unwrap_or_default();
        if name.is_empty() {
            continue;
        }
        fields.push(names.field(name, dom.value(input)?));
    }

    for chip in dom.query_selector_all_from(panel, &contract.selected_single_book_chips())? {
        let Some(book_id) = dom.dataset_get(chip, "bookId").filter(|id| !id.is_empty()) else {
            continue;
        };
        fields.push(names.field(format!("book_{book_id}"), book_id));
    }
    Ok(fields)
}

fn inject_hidden_field(dom: &mut Dom, form: NodeId, field: &SelectionField) -> Result<NodeId> {
    let input = dom.create_detached_element("input");
    dom.set_attr(input, "type", "hidden")?;
    dom.set_attr(input, "name", &field.name)?;
    dom.set_attr(input, "value", &field.value)?;
    dom.append_child(form, input)?;
    Ok(input)
}

/// Rebuilds the form's selection fields from the panel. Stale fields are
/// always purged; nothing is injected when the scope is `All`.
pub(crate) fn include_book_selections(
    dom: &mut Dom,
    contract: &PageContract,
    names: &SelectionNames,
    form: NodeId,
) -> Result<Vec<SelectionField>> {
    let scope = current_scope(dom, contract)?;
    let purged = purge_injected_fields(dom, contract, names, form)?;
    log::debug!(
        "including book selections: scope={} purged_stale={purged}",
        scope.as_str()
    );

    if scope == SearchScope::All {
        log::debug!("search scope is \"all\", skipping book selections");
        return Ok(Vec::new());
    }

    let fields = collect_selections(dom, contract, names)?;
    for field in &fields {
        inject_hidden_field(dom, form, field)?;
        log::debug!("added hidden input {}={}", field.name, field.value);
    }
    log::info!("added {} book/series selections to form", fields.len());
    Ok(fields)
}
