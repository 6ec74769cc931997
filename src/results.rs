use super::autosize::{AutosizeOutcome, adjust_height};
use super::config::{ControllerConfig, PageContract};
use super::dom::{Dom, NodeId};
use super::runtime_state::OpenedWindow;
use super::*;

/// Flips a result between its excerpt and its full body. Returns whether the
/// content is collapsed afterwards, or `None` when the toggle is not inside a
/// result item with content.
pub(crate) fn toggle_expand(dom: &mut Dom, contract: &PageContract, toggle: NodeId) -> Result<Option<bool>> {
    let Some(item) = dom.closest(toggle, &contract.result_item)? else {
        return Ok(None);
    };
    let Some(content) = dom.query_selector_from(item, &contract.result_content)? else {
        return Ok(None);
    };

    let collapsed = !dom.class_contains(content, &contract.collapsed_class);
    dom.class_set(content, &contract.collapsed_class, collapsed)?;

    let (expand_display, collapse_display) = if collapsed {
        ("inline", "none")
    } else {
        ("none", "inline")
    };
    if let Some(label) = dom.query_selector_from(toggle, &contract.expand_label)? {
        dom.style_set(label, "display", expand_display)?;
    }
    if let Some(label) = dom.query_selector_from(toggle, &contract.collapse_label)? {
        dom.style_set(label, "display", collapse_display)?;
    }
    Ok(Some(collapsed))
}

/// Window to open for a full-text link: `<path>#chunk-<id>` in a new tab.
pub(crate) fn full_text_window(dom: &Dom, link: NodeId) -> Option<OpenedWindow> {
    let path = dom.attr(link, "data-path").filter(|path| !path.is_empty())?;
    let chunk = dom.attr(link, "data-chunk").filter(|chunk| !chunk.is_empty())?;
    Some(OpenedWindow {
        url: format!("{path}#chunk-{chunk}"),
        target: "_blank".into(),
    })
}

/// Empties and hides the results, clears the query and resizes the field.
pub(crate) fn clear_results(
    dom: &mut Dom,
    config: &ControllerConfig,
    query_field: NodeId,
) -> Result<AutosizeOutcome> {
    let contract = &config.contract;
    if let Some(content) = dom.query_selector(&contract.results_content)? {
        dom.set_text_content(content, "")?;
    }
    if let Some(section) = dom.query_selector(&contract.results_section)? {
        dom.style_set(section, "display", "none")?;
    }
    dom.set_value(query_field, "")?;
    adjust_height(dom, config, query_field)
}
