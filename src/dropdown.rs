use super::config::PageContract;
use super::dom::{Dom, NodeId};
use super::*;

/// Removes the open marker from every chip except `keep`.
pub(crate) fn close_all(dom: &mut Dom, contract: &PageContract, keep: Option<NodeId>) -> Result<()> {
    for chip in dom.query_selector_all(&contract.open_chips())? {
        if Some(chip) != keep {
            dom.class_set(chip, &contract.open_class, false)?;
        }
    }
    Ok(())
}

/// What a document-level click did to the dropdowns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ClickEffect {
    Toggled { chip: NodeId, open: bool },
    ClosedAll,
    Ignored,
}

/// Document-level click routing: a click on a dropdown chip (outside its
/// menu) toggles that chip and closes the rest, a click outside every menu
/// closes everything, a click inside a menu changes nothing.
pub(crate) fn on_document_click(
    dom: &mut Dom,
    contract: &PageContract,
    target: NodeId,
) -> Result<ClickEffect> {
    let chip = dom.closest(target, &contract.dropdown_chip)?;
    let inside_menu = dom.closest(target, &contract.dropdown_menu)?.is_some();

    match chip {
        Some(chip) if !inside_menu => {
            close_all(dom, contract, Some(chip))?;
            let open = dom.class_toggle(chip, &contract.open_class)?;
            Ok(ClickEffect::Toggled { chip, open })
        }
        _ if !inside_menu => {
            close_all(dom, contract, None)?;
            Ok(ClickEffect::ClosedAll)
        }
        _ => Ok(ClickEffect::Ignored),
    }
}

pub(crate) fn on_single_book_click(dom: &mut Dom, contract: &PageContract, chip: NodeId) -> Result<bool> {
    let selected = dom.class_toggle(chip, &contract.selected_class)?;
    log::debug!(
        "toggled selection for {:?}: selected={selected}",
        dom.text_content(chip).trim()
    );
    Ok(selected)
}
