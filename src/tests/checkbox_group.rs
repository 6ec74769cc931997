use super::*;
use crate::checkbox_group::{self, CheckboxGroup};
use crate::config::PageContract;

fn group(dom: &Dom, menu: &str) -> Result<CheckboxGroup> {
    let contract = PageContract::default();
    CheckboxGroup::discover(dom, &contract, node(dom, menu)?)?
        .ok_or_else(|| Error::SelectorNotFound(format!("{menu} checkboxes")))
}

#[test]
fn tri_state_from_item_states() {
    assert_eq!(TriState::from_items(&[]), TriState::Unchecked);
    assert_eq!(TriState::from_items(&[false, false]), TriState::Unchecked);
    assert_eq!(TriState::from_items(&[true, false]), TriState::Indeterminate);
    assert_eq!(TriState::from_items(&[true, true]), TriState::Checked);
    assert!(TriState::Checked.checked() && !TriState::Checked.indeterminate());
    assert!(!TriState::Indeterminate.checked() && TriState::Indeterminate.indeterminate());
    assert!(!TriState::Unchecked.checked() && !TriState::Unchecked.indeterminate());
}

#[test]
fn discovery_splits_all_from_items() -> Result<()> {
    let dom = search_dom()?;
    let a = group(&dom, "#menu-a")?;
    assert_eq!(a.all, node(&dom, "#a-all")?);
    assert_eq!(a.items, vec![node(&dom, "#a-1")?, node(&dom, "#a-2")?]);
    assert_eq!(a.chip, Some(node(&dom, "#chip-a")?));

    let b = group(&dom, "#menu-b")?;
    assert!(b.items.is_empty());

    let empty = parse_html(r#"<div class="dropdown-menu" id="m"><p>nothing</p></div>"#)?;
    let contract = PageContract::default();
    assert_eq!(
        CheckboxGroup::discover(&empty, &contract, node(&empty, "#m")?)?,
        None
    );
    assert_eq!(checkbox_group::discover_all(&dom, &contract)?.len(), 2);
    Ok(())
}

#[test]
fn all_toggle_drives_every_item() -> Result<()> {
    let contract = PageContract::default();
    let mut dom = search_dom()?;
    let a = group(&dom, "#menu-a")?;

    dom.set_indeterminate(a.all, true)?;
    dom.set_checked(a.all, true)?;
    a.on_all_changed(&mut dom, &contract)?;
    assert_eq!(a.item_states(&dom)?, vec![true, true]);
    assert!(!dom.indeterminate(a.all)?);
    assert!(dom.class_contains(node(&dom, "#chip-a")?, "selected"));

    dom.set_checked(a.all, false)?;
    a.on_all_changed(&mut dom, &contract)?;
    assert_eq!(a.item_states(&dom)?, vec![false, false]);
    assert!(!dom.class_contains(node(&dom, "#chip-a")?, "selected"));
    Ok(())
}

#[test]
fn item_changes_recompute_parent() -> Result<()> {
    let contract = PageContract::default();
    let mut dom = search_dom()?;
    let a = group(&dom, "#menu-a")?;

    dom.set_checked(a.items[0], true)?;
    assert_eq!(a.on_item_changed(&mut dom, &contract)?, TriState::Indeterminate);
    assert!(!dom.checked(a.all)?);
    assert!(dom.indeterminate(a.all)?);
    assert!(dom.class_contains(node(&dom, "#chip-a")?, "selected"));

    dom.set_checked(a.items[1], true)?;
    assert_eq!(a.on_item_changed(&mut dom, &contract)?, TriState::Checked);
    assert!(dom.checked(a.all)?);
    assert!(!dom.indeterminate(a.all)?);

    dom.set_checked(a.items[0], false)?;
    dom.set_checked(a.items[1], false)?;
    assert_eq!(a.on_item_changed(&mut dom, &contract)?, TriState::Unchecked);
    assert!(!dom.checked(a.all)?);
    assert!(!dom.indeterminate(a.all)?);
    assert!(!dom.class_contains(node(&dom, "#chip-a")?, "selected"));
    Ok(())
}

#[test]
fn chip_states_at_load_only_mark() -> Result<()> {
    let contract = PageContract::default();
    let html = SEARCH_PAGE_HTML
        .replace(r#"value="13">"#, r#"value="13" checked>"#)
        .replace(
            r#"class="suggestion-chip has-dropdown" id="chip-b""#,
            r#"class="suggestion-chip has-dropdown selected" id="chip-b""#,
        );
    let mut dom = parse_html(&html)?;
    assert_eq!(checkbox_group::initialize_chip_states(&mut dom, &contract)?, 1);
    assert!(dom.class_contains(node(&dom, "#chip-a")?, "selected"));
    // Stale server markup is left alone.
    assert!(dom.class_contains(node(&dom, "#chip-b")?, "selected"));
    Ok(())
}

#[test]
fn checkbox_group_through_user_clicks() -> Result<()> {
    let mut page = SearchPage::from_html(SEARCH_PAGE_HTML)?;
    page.click("#scope-specific")?;
    page.click("#chip-a")?;

    page.click("#a-1")?;
    page.assert_checked("#a-all", false)?;
    page.assert_indeterminate("#a-all", true)?;
    page.assert_class("#chip-a", "selected", true)?;

    page.click("#a-2")?;
    page.assert_checked("#a-all", true)?;
    page.assert_indeterminate("#a-all", false)?;

    page.click("#a-all")?;
    page.assert_checked("#a-1", false)?;
    page.assert_checked("#a-2", false)?;
    page.assert_class("#chip-a", "selected", false)?;
    page.assert_class("#chip-a", "dropdown-open", true)?;
    Ok(())
}

#[test]
fn server_checked_item_marks_chip_on_page_load() -> Result<()> {
    let html = SEARCH_PAGE_HTML.replace(r#"value="12">"#, r#"value="12" checked>"#);
    let page = SearchPage::from_html(&html)?;
    page.assert_class("#chip-a", "selected", true)?;
    page.assert_class("#chip-b", "selected", false)?;
    Ok(())
}
