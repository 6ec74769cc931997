use super::config::PageContract;
use super::dom::{Dom, NodeId, is_checkbox_input};
use super::*;

/// Visual state of a parent checkbox derived from its items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriState {
    Unchecked,
    Indeterminate,
    Checked,
}

impl TriState {
    /// Checked iff every item is checked, indeterminate iff some but not all.
    /// No items at all counts as unchecked.
    pub fn from_items(items: &[bool]) -> Self {
        let checked = items.iter().filter(|item| **item).count();
        if checked == 0 {
            Self::Unchecked
        } else if checked == items.len() {
            Self::Checked
        } else {
            Self::Indeterminate
        }
    }

    pub fn checked(self) -> bool {
        self == Self::Checked
    }

    pub fn indeterminate(self) -> bool {
        self == Self::Indeterminate
    }
}

/// One dropdown menu's checkboxes: the first is the "all" control, the rest
/// are items, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CheckboxGroup {
    pub(crate) menu: NodeId,
    pub(crate) chip: Option<NodeId>,
    pub(crate) all: NodeId,
    pub(crate) items: Vec<NodeId>,
}

impl CheckboxGroup {
    /// `None` for a menu without checkboxes.
    pub(crate) fn discover(dom: &Dom, contract: &PageContract, menu: NodeId) -> Result<Option<Self>> {
        let checkboxes = checkboxes_under(dom, menu)?;
        let Some((&all, items)) = checkboxes.split_first() else {
            return Ok(None);
        };
        Ok(Some(Self {
            menu,
            chip: dom.closest(menu, &contract.chip)?,
            all,
            items: items.to_vec(),
        }))
    }

    pub(crate) fn item_states(&self, dom: &Dom) -> Result<Vec<bool>> {
        self.items.iter().map(|item| dom.checked(*item)).collect()
    }

    pub(crate) fn on_all_changed(&self, dom: &mut Dom, contract: &PageContract) -> Result<()> {
        let checked = dom.checked(self.all)?;
        for item in &self.items {
            dom.set_checked(*item, checked)?;
        }
        dom.set_indeterminate(self.all, false)?;
        self.sync_chip(dom, contract)
    }

    pub(crate) fn on_item_changed(&self, dom: &mut Dom, contract: &PageContract) -> Result<TriState> {
        let state = TriState::from_items(&self.item_states(dom)?);
        dom.set_checked(self.all, state.checked())?;
        dom.set_indeterminate(self.all, state.indeterminate())?;
        self.sync_chip(dom, contract)?;
        Ok(state)
    }

    fn any_checked(&self, dom: &Dom) -> Result<bool> {
        if dom.checked(self.all)? {
            return Ok(true);
        }
        Ok(self.item_states(dom)?.into_iter().any(|checked| checked))
    }

    /// Chip is selected iff any checkbox in its menu is checked.
    pub(crate) fn sync_chip(&self, dom: &mut Dom, contract: &PageContract) -> Result<()> {
        let Some(chip) = self.chip else {
            return Ok(());
        };
        let any = self.any_checked(dom)?;
        dom.class_set(chip, &contract.selected_class, any)
    }
}

pub(crate) fn discover_all(dom: &Dom, contract: &PageContract) -> Result<Vec<CheckboxGroup>> {
    let mut groups = Vec::new();
    for menu in dom.query_selector_all(&contract.dropdown_menu)? {
        if let Some(group) = CheckboxGroup::discover(dom, contract, menu)? {
            groups.push(group);
        }
    }
    Ok(groups)
}

/// Marks dropdown chips whose server-rendered checkboxes are already
/// checked. Chips are only ever marked here, never cleared.
pub(crate) fn initialize_chip_states(dom: &mut Dom, contract: &PageContract) -> Result<usize> {
    let mut marked = 0usize;
    for chip in dom.query_selector_all(&contract.dropdown_chip)? {
        let mut any_checked = false;
        for checkbox in checkboxes_under(dom, chip)? {
            if dom.checked(checkbox)? {
                any_checked = true;
                break;
            }
        }
        if any_checked {
            dom.class_add(chip, &contract.selected_class)?;
            marked += 1;
        }
    }
    Ok(marked)
}

fn checkboxes_under(dom: &Dom, root: NodeId) -> Result<Vec<NodeId>> {
    Ok(dom
        .query_selector_all_from(root, "input")?
        .into_iter()
        .filter(|node| is_checkbox_input(dom, *node))
        .collect())
}
