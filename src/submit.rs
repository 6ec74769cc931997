use super::config::ControllerConfig;
use super::dom::{Dom, NodeId};
use super::runtime_state::ScrollRequest;
use super::selection::{SelectionField, SelectionNames, include_book_selections};
use super::text::{EMPTY_QUERY_HELP_HTML, LOADING_HTML};
use super::*;

/// Result of the search form's submit handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SubmitOutcome {
    /// Empty query: the submission was cancelled and help text shown.
    Cancelled { scroll: Option<ScrollRequest> },
    /// The native submission may proceed with these injected selections.
    Proceed {
        selections: Vec<SelectionField>,
        scroll: Option<ScrollRequest>,
        action: Option<String>,
    },
}

/// Unicode whitespace counts as empty.
pub(crate) fn is_blank_query(query: &str) -> bool {
    query.trim().is_empty()
}

/// Hides the count and scope summary and shows the results section.
/// Returns the results content region when the page has one.
fn reveal_results(dom: &mut Dom, config: &ControllerConfig) -> Result<Option<NodeId>> {
    let contract = &config.contract;
    for selector in [&contract.result_count, &contract.scope_info] {
        if let Some(node) = dom.query_selector(selector)? {
            dom.style_set(node, "display", "none")?;
        }
    }
    if let Some(section) = dom.query_selector(&contract.results_section)? {
        dom.style_set(section, "display", "block")?;
    }
    dom.query_selector(&contract.results_content)
}

fn scroll_to(dom: &Dom, selector: &str) -> Result<Option<ScrollRequest>> {
    Ok(dom
        .query_selector(selector)?
        .map(|node| ScrollRequest::smooth_to_start(dom.node_label(node))))
}

pub(crate) fn show_help(dom: &mut Dom, config: &ControllerConfig) -> Result<Option<ScrollRequest>> {
    if let Some(content) = reveal_results(dom, config)? {
        dom.set_inner_html(content, EMPTY_QUERY_HELP_HTML)?;
    }
    scroll_to(dom, &config.contract.hero_section)
}

pub(crate) fn show_loading(dom: &mut Dom, config: &ControllerConfig) -> Result<Option<ScrollRequest>> {
    if let Some(content) = reveal_results(dom, config)? {
        dom.set_inner_html(content, LOADING_HTML)?;
    }
    scroll_to(dom, &config.contract.search_container)
}

/// The action with the results fragment appended, or `None` when it must
/// stay as it is: the page URL already carries a fragment, or the action
/// already ends with the results fragment.
pub(crate) fn action_with_fragment(
    action: &str,
    location_fragment: Option<&str>,
    results_fragment: &str,
) -> Option<String> {
    if location_fragment.is_some() {
        return None;
    }
    let suffix = format!("#{results_fragment}");
    if action.ends_with(&suffix) {
        return None;
    }
    Some(format!("{action}{suffix}"))
}

/// The URL a form submits to: its `action` attribute, or the page URL
/// without its fragment when the attribute is missing or empty.
pub(crate) fn form_action(dom: &Dom, config: &ControllerConfig, form: NodeId) -> String {
    match dom.attr(form, "action") {
        Some(action) if !action.is_empty() => action,
        _ => config
            .location
            .split_once('#')
            .map(|(base, _)| base.to_string())
            .unwrap_or_else(|| config.location.clone()),
    }
}

pub(crate) fn on_submit(
    dom: &mut Dom,
    config: &ControllerConfig,
    names: &SelectionNames,
    form: NodeId,
    query_field: NodeId,
) -> Result<SubmitOutcome> {
    if is_blank_query(&dom.value(query_field)?) {
        log::debug!("empty query submitted, showing instructions");
        let scroll = show_help(dom, config)?;
        return Ok(SubmitOutcome::Cancelled { scroll });
    }

    let scroll = show_loading(dom, config)?;
    let selections = include_book_selections(dom, &config.contract, names, form)?;

    let current = form_action(dom, config, form);
    let action = action_with_fragment(
        &current,
        config.location_fragment(),
        &config.results_fragment,
    );
    if let Some(action) = &action {
        dom.set_attr(form, "action", action)?;
    }

    Ok(SubmitOutcome::Proceed {
        selections,
        scroll,
        action,
    })
}
