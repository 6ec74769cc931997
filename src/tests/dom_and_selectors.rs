use super::*;

#[test]
fn selector_engine_covers_page_contract() -> Result<()> {
    let dom = search_dom()?;
    assert_eq!(dom.query_selector_all(".suggestion-chip")?.len(), 3);
    assert_eq!(dom.query_selector_all(".suggestion-chip.has-dropdown")?.len(), 2);
    assert_eq!(
        dom.query_selector_all("input[name=\"searchScope\"]:checked")?,
        vec![node(&dom, "#scope-all")?]
    );
    assert_eq!(
        dom.query_selector_all("input[name^=\"book_\"], input[name^=\"series_\"]")?
            .len(),
        4
    );
    assert_eq!(dom.query_selector_all("#menu-a > label > input")?.len(), 3);
    assert_eq!(dom.query_selector_all(".book-selections input")?.len(), 4);
    assert_eq!(
        dom.query_selector_all(".suggestion-chip:not(.has-dropdown)")?,
        vec![node(&dom, "#chip-single")?]
    );
    assert_eq!(dom.query_selector_all("a[data-path*=\"books\"]")?.len(), 2);
    Ok(())
}

#[test]
fn selector_groups_keep_document_order() -> Result<()> {
    let dom = search_dom()?;
    let ids = dom
        .query_selector_all("#b-all, #a-1, #a-all")?
        .into_iter()
        .map(|node| dom.attr(node, "id").unwrap_or_default())
        .collect::<Vec<_>>();
    assert_eq!(ids, vec!["a-all", "a-1", "b-all"]);
    Ok(())
}

#[test]
fn unsupported_selectors_are_rejected() {
    let dom = Dom::new();
    for selector in [
        "",
        "div,",
        "[name",
        "a::before",
        "input:hover",
        "input:indeterminate",
        "button:disabled",
        "*",
        "li + li",
        "#a#b",
    ] {
        assert!(
            matches!(
                dom.query_selector_all(selector),
                Err(Error::UnsupportedSelector(_))
            ),
            "selector {selector:?} should be rejected"
        );
    }
}

#[test]
fn descendant_chain_tries_every_ancestor() -> Result<()> {
    let dom = parse_html(
        r#"<div class="a"><div class="b"><div class="b"><span class="c" id="deep"></span></div></div></div>"#,
    )?;
    let deep = node(&dom, "#deep")?;
    // The nearest `.b` has no `.a` parent; the outer one does.
    assert_eq!(dom.query_selector(".a > .b .c")?, Some(deep));
    assert_eq!(dom.query_selector(".b > .b > .c")?, Some(deep));
    assert_eq!(dom.query_selector(".a > .c")?, None);
    assert_eq!(dom.query_selector("div:not(.a) > span")?, Some(deep));
    Ok(())
}

#[test]
fn duplicate_ids_resolve_to_first_in_document_order() -> Result<()> {
    let mut dom = parse_html(
        r#"<div id="box"><p id="dup">first</p><p id="dup">second</p></div><div id="other"></div>"#,
    )?;
    let first = dom.query_selector("#dup")?.map(|found| dom.text_content(found));
    assert_eq!(first.as_deref(), Some("first"));

    let other = node(&dom, "#other")?;
    dom.set_inner_html(other, "<span>added</span>")?;
    dom.set_attr(other, "class", "changed")?;
    let after = dom.query_selector("#dup")?.map(|found| dom.text_content(found));
    assert_eq!(after.as_deref(), Some("first"));
    assert_eq!(dom.query_selector_all("#dup")?.len(), 2);

    let first = node(&dom, "#dup")?;
    dom.remove_node(first)?;
    let remaining = dom.query_selector("#dup")?.map(|found| dom.text_content(found));
    assert_eq!(remaining.as_deref(), Some("second"));
    Ok(())
}

#[test]
fn closest_walks_inclusive_ancestors() -> Result<()> {
    let dom = search_dom()?;
    let checkbox = node(&dom, "#a-1")?;
    assert_eq!(
        dom.closest(checkbox, ".suggestion-chip.has-dropdown")?,
        Some(node(&dom, "#chip-a")?)
    );
    assert_eq!(dom.closest(checkbox, "#a-1")?, Some(checkbox));
    assert_eq!(dom.closest(checkbox, ".search-results")?, None);
    Ok(())
}

#[test]
fn parser_reads_form_state_and_entities() -> Result<()> {
    let dom = parse_html(
        r#"<p id="t">Tom &amp; Jerry&nbsp;&lt;3</p>
           <input id="c" type="checkbox" checked>
           <input id="d" disabled value="x">
           <textarea id="q">
line one
line two</textarea>"#,
    )?;
    assert_eq!(dom.text_content(node(&dom, "#t")?), "Tom & Jerry\u{a0}<3");
    assert!(dom.checked(node(&dom, "#c")?)?);
    assert!(dom.disabled(node(&dom, "#d")?));
    assert_eq!(dom.value(node(&dom, "#d")?)?, "x");
    assert_eq!(dom.value(node(&dom, "#q")?)?, "line one\nline two");
    Ok(())
}

#[test]
fn parser_rejects_unclosed_markup() {
    assert!(matches!(parse_html("<div><!-- open"), Err(Error::HtmlParse(_))));
    assert!(matches!(parse_html("<div class=\"a"), Err(Error::HtmlParse(_))));
    assert!(matches!(parse_html("<textarea>never closed"), Err(Error::HtmlParse(_))));
}

#[test]
fn class_and_style_helpers_round_through_attributes() -> Result<()> {
    let mut dom = search_dom()?;
    let chip = node(&dom, "#chip-a")?;
    assert!(dom.class_toggle(chip, "dropdown-open")?);
    assert_eq!(
        dom.attr(chip, "class").as_deref(),
        Some("suggestion-chip has-dropdown dropdown-open")
    );
    assert!(!dom.class_toggle(chip, "dropdown-open")?);
    assert!(!dom.class_contains(chip, "dropdown-open"));

    let section = node(&dom, ".search-results")?;
    assert_eq!(dom.style_get(section, "display")?, "none");
    dom.style_set(section, "display", "block")?;
    dom.style_set(section, "maxHeight", "10px")?;
    assert_eq!(
        dom.attr(section, "style").as_deref(),
        Some("display: block; max-height: 10px;")
    );
    dom.style_set(section, "maxHeight", "")?;
    assert_eq!(dom.style_get(section, "max-height")?, "");
    Ok(())
}

#[test]
fn dataset_reads_data_attributes() -> Result<()> {
    let dom = search_dom()?;
    let chip = node(&dom, "#chip-single")?;
    assert_eq!(dom.dataset_get(chip, "bookId").as_deref(), Some("7"));
    assert_eq!(dom.dataset_get(chip, "seriesId"), None);
    Ok(())
}

#[test]
fn removed_nodes_stop_matching_queries() -> Result<()> {
    let mut dom = search_dom()?;
    let item = node(&dom, "#result-1")?;
    dom.remove_node(item)?;
    assert!(!dom.is_connected(item));
    assert_eq!(dom.query_selector("#toggle-1")?, None);
    assert!(matches!(dom.remove_node(dom.root), Err(Error::Dom(_))));
    Ok(())
}

#[test]
fn inner_html_replaces_children() -> Result<()> {
    let mut dom = search_dom()?;
    let content = node(&dom, ".results-content")?;
    dom.set_inner_html(content, "<p class=\"note\">one</p><p>two</p>")?;
    assert_eq!(dom.inner_html(content)?, "<p class=\"note\">one</p><p>two</p>");
    assert_eq!(dom.query_selector("#result-1")?, None);
    assert_eq!(dom.text_content(content), "onetwo");
    Ok(())
}

#[test]
fn node_labels_prefer_id_then_classes() -> Result<()> {
    let dom = search_dom()?;
    assert_eq!(dom.node_label(node(&dom, "#chip-a")?), "#chip-a");
    assert_eq!(
        dom.node_label(node(&dom, ".search-container")?),
        "div.search-container"
    );
    assert_eq!(dom.node_label(dom.root), "document");
    Ok(())
}
