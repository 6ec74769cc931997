use unicode_normalization::UnicodeNormalization;

use super::config::ControllerConfig;
use super::dom::{Dom, NodeId};
use super::text::{
    RATE_LIMIT_BODY, RATE_LIMIT_DISMISS, RATE_LIMIT_OVERLAY_STYLE, RATE_LIMIT_POPUP_STYLE,
    RATE_LIMIT_TITLE,
};
use super::*;

pub(crate) const OVERLAY_CLASS: &str = "rate-limit-overlay";
pub(crate) const POPUP_CLASS: &str = "rate-limit-popup";
pub(crate) const DISMISS_CLASS: &str = "rate-limit-dismiss";

/// Nodes of the modal built for a rate-limited session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RateLimitNotice {
    pub(crate) overlay: NodeId,
    pub(crate) dismiss: NodeId,
}

/// Server copy may arrive decomposed, so both sides are compared in NFC.
pub(crate) fn mentions_phrase(text: &str, phrase: &str) -> bool {
    let text = text.nfc().collect::<String>();
    let phrase = phrase.nfc().collect::<String>();
    text.contains(&phrase)
}

pub(crate) fn is_rate_limited(dom: &Dom, config: &ControllerConfig) -> Result<bool> {
    let Some(message) = dom.query_selector(&config.contract.rate_limit_message)? else {
        return Ok(false);
    };
    Ok(mentions_phrase(
        &dom.text_content(message),
        &config.rate_limit_phrase,
    ))
}

fn append_element(dom: &mut Dom, parent: NodeId, tag: &str, class: Option<&str>) -> Result<NodeId> {
    let node = dom.create_detached_element(tag);
    if let Some(class) = class {
        dom.set_attr(node, "class", class)?;
    }
    dom.append_child(parent, node)?;
    Ok(node)
}

/// Hides the results section and appends the modal to the body.
pub(crate) fn show_notice(dom: &mut Dom, config: &ControllerConfig) -> Result<RateLimitNotice> {
    if let Some(section) = dom.query_selector(&config.contract.results_section)? {
        dom.style_set(section, "display", "none")?;
    }
    let host = dom.query_selector("body")?.unwrap_or(dom.root);

    let overlay = append_element(dom, host, "div", Some(OVERLAY_CLASS))?;
    dom.set_attr(overlay, "style", RATE_LIMIT_OVERLAY_STYLE)?;
    let popup = append_element(dom, overlay, "div", Some(POPUP_CLASS))?;
    dom.set_attr(popup, "style", RATE_LIMIT_POPUP_STYLE)?;

    let heading = append_element(dom, popup, "h3", None)?;
    dom.set_text_content(heading, RATE_LIMIT_TITLE)?;
    let body = append_element(dom, popup, "p", None)?;
    dom.set_text_content(body, RATE_LIMIT_BODY)?;
    let dismiss = append_element(dom, popup, "button", Some(DISMISS_CLASS))?;
    dom.set_attr(dismiss, "type", "button")?;
    dom.set_text_content(dismiss, RATE_LIMIT_DISMISS)?;

    log::info!("search rate limit reached, showing notice");
    Ok(RateLimitNotice { overlay, dismiss })
}

pub(crate) fn dismiss(dom: &mut Dom, overlay: NodeId) -> Result<()> {
    dom.remove_node(overlay)
}
