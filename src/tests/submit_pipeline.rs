use super::*;
use crate::config::PageContract;
use crate::selection::{self, SelectionNames};
use crate::submit::{self, SubmitOutcome};

fn specific_page() -> Result<SearchPage> {
    let mut page = SearchPage::from_html(SEARCH_PAGE_HTML)?;
    page.click("#scope-specific")?;
    Ok(page)
}

#[test]
fn blank_queries_include_unicode_whitespace() {
    assert!(submit::is_blank_query(""));
    assert!(submit::is_blank_query(" \t\n"));
    assert!(submit::is_blank_query("\u{3000}\u{a0}"));
    assert!(!submit::is_blank_query(" 人生 "));
}

#[test]
fn action_fragment_rule() {
    assert_eq!(
        submit::action_with_fragment("/search", None, "search-container").as_deref(),
        Some("/search#search-container")
    );
    assert_eq!(
        submit::action_with_fragment("/search#search-container", None, "search-container"),
        None
    );
    assert_eq!(
        submit::action_with_fragment("/search", Some("results"), "search-container"),
        None
    );
}

#[test]
fn selection_names_classify_prefixes() -> Result<()> {
    let names = SelectionNames::new(&PageContract::default())?;
    assert!(names.is_selection_name("book_12"));
    assert!(names.is_selection_name("series_3"));
    assert!(!names.is_selection_name("ebook_1"));
    assert!(!names.is_selection_name("_csrf"));
    assert_eq!(names.kind_of("book_12"), SelectionKind::Book);
    assert_eq!(names.kind_of("series_3"), SelectionKind::Series);
    assert_eq!(names.kind_of("query"), SelectionKind::Other);

    let custom = PageContract {
        selection_prefixes: vec!["vol.".into()],
        ..PageContract::default()
    };
    let names = SelectionNames::new(&custom)?;
    assert!(names.is_selection_name("vol.4"));
    assert!(!names.is_selection_name("volx4"));
    Ok(())
}

#[test]
fn empty_query_shows_help_without_loading() -> Result<()> {
    let mut page = SearchPage::from_html(SEARCH_PAGE_HTML)?;
    page.type_text(".search-input", "  \n\u{3000} ")?;
    assert!(!page.submit("#search-form")?);

    assert!(page.submissions().is_empty());
    page.assert_style(".search-results", "display", "block")?;
    page.assert_style(".result-count", "display", "none")?;
    page.assert_style(".search-scope-info", "display", "none")?;
    let help = page.text(".results-content")?;
    assert!(help.contains("1. "));
    assert!(help.contains("2. "));
    assert!(help.contains("To start a search"));
    assert!(help.contains("検索を開始するには"));
    page.assert_not_exists(".loading-container")?;
    assert_eq!(
        page.take_scroll_requests(),
        vec![ScrollRequest {
            target: "section.hero-section".into(),
            behavior: "smooth".into(),
            block: "start".into(),
        }]
    );
    assert_eq!(page.attr("#search-form", "action")?.as_deref(), Some("/search"));
    Ok(())
}

#[test]
fn query_submission_shows_loading_and_records_submission() -> Result<()> {
    let mut page = SearchPage::from_html(SEARCH_PAGE_HTML)?;
    page.type_text(".search-input", "人生の意味")?;
    page.click("#search-button")?;

    page.assert_exists(".results-content .loading-container .orb-pulse")?;
    page.assert_text(".loading-text", "考察中...")?;
    page.assert_style(".search-results", "display", "block")?;
    page.assert_style(".result-count", "display", "none")?;
    assert_eq!(
        page.take_scroll_requests()
            .into_iter()
            .map(|request| request.target)
            .collect::<Vec<_>>(),
        vec!["div.search-container".to_string()]
    );

    let submissions = page.take_submissions();
    assert_eq!(submissions.len(), 1);
    let submission = &submissions[0];
    assert_eq!(submission.action, "/search#search-container");
    assert_eq!(submission.method, "post");
    assert_eq!(
        submission.entries,
        vec![
            ("_csrf".to_string(), "token-1".to_string()),
            ("query".to_string(), "人生の意味".to_string()),
            ("searchScope".to_string(), "all".to_string()),
        ]
    );
    Ok(())
}

#[test]
fn scope_all_never_injects_selection_fields() -> Result<()> {
    let mut page = SearchPage::from_html(SEARCH_PAGE_HTML)?;
    // Selections made while "specific" was active are ignored after switching back.
    page.click("#scope-specific")?;
    page.click("#a-1")?;
    page.click("#chip-single")?;
    page.click("#scope-all")?;

    page.type_text(".search-input", "query")?;
    page.submit("#search-form")?;
    assert!(page.hidden_selection_fields()?.is_empty());
    let submission = &page.submissions()[0];
    assert!(submission.values_of("book_12").is_empty());
    assert!(submission.values_of("book_7").is_empty());
    Ok(())
}

#[test]
fn specific_scope_injects_exactly_checked_pairs() -> Result<()> {
    let mut page = specific_page()?;
    page.click("#a-1")?;
    page.click("#b-all")?;
    page.type_text(".search-input", "query")?;
    page.submit("#search-form")?;

    let fields = page.hidden_selection_fields()?;
    assert_eq!(
        fields,
        vec![
            SelectionField {
                kind: SelectionKind::Book,
                name: "book_12".into(),
                value: "12".into(),
            },
            SelectionField {
                kind: SelectionKind::Series,
                name: "series_3".into(),
                value: "3".into(),
            },
        ]
    );
    let submission = &page.submissions()[0];
    assert_eq!(submission.values_of("book_12"), vec!["12"]);
    assert_eq!(submission.values_of("series_3"), vec!["3"]);
    assert_eq!(submission.values_of("searchScope"), vec!["specific"]);
    Ok(())
}

#[test]
fn repeated_submissions_do_not_accumulate_stale_fields() -> Result<()> {
    let mut page = specific_page()?;
    page.click("#a-1")?;
    page.click("#chip-single")?;
    page.type_text(".search-input", "first")?;
    page.submit("#search-form")?;
    assert_eq!(page.hidden_selection_fields()?.len(), 2);

    page.click("#chip-single")?;
    page.type_text(".search-input", "second")?;
    page.submit("#search-form")?;

    let names = page
        .hidden_selection_fields()?
        .into_iter()
        .map(|field| field.name)
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["book_12".to_string()]);

    let submissions = page.take_submissions();
    assert_eq!(submissions.len(), 2);
    assert_eq!(submissions[0].values_of("book_7"), vec!["7"]);
    assert!(submissions[1].values_of("book_7").is_empty());
    // The fragment is appended once.
    assert_eq!(submissions[1].action, "/search#search-container");
    Ok(())
}

#[test]
fn single_book_chip_without_id_is_skipped() -> Result<()> {
    let html = SEARCH_PAGE_HTML.replace(r#"data-book-id="7""#, r#"data-book-id="""#);
    let mut page = SearchPage::from_html(&html)?;
    page.click("#scope-specific")?;
    page.click("#chip-single")?;
    page.type_text(".search-input", "query")?;
    page.submit("#search-form")?;
    assert!(page.hidden_selection_fields()?.is_empty());
    Ok(())
}

#[test]
fn purge_keeps_rendered_controls_and_anti_forgery_fields() -> Result<()> {
    let contract = PageContract::default();
    let names = SelectionNames::new(&contract)?;
    let mut dom = parse_html(
        r#"<form id="f">
             <div class="search-options"><input type="checkbox" id="kept-option" name="book_1" value="1"></div>
             <div class="book-selections"><input type="checkbox" id="kept-panel" name="series_2" value="2"></div>
             <input type="hidden" id="token" name="book_csrf" value="t">
             <input type="hidden" id="stale-book" name="book_9" value="9">
             <input type="hidden" id="stale-series" name="series_8" value="8">
             <input type="hidden" id="other" name="page" value="2">
           </form>"#,
    )?;
    let form = node(&dom, "#f")?;
    assert_eq!(selection::purge_injected_fields(&mut dom, &contract, &names, form)?, 2);
    for kept in ["#kept-option", "#kept-panel", "#token", "#other"] {
        assert!(dom.query_selector(kept)?.is_some(), "{kept} should survive");
    }
    assert_eq!(dom.query_selector("#stale-book")?, None);
    assert_eq!(dom.query_selector("#stale-series")?, None);
    Ok(())
}

#[test]
fn purge_runs_even_when_scope_is_all() -> Result<()> {
    let contract = PageContract::default();
    let names = SelectionNames::new(&contract)?;
    let mut dom = parse_html(
        r#"<form id="f">
             <input type="radio" name="searchScope" value="all" checked>
             <input type="hidden" name="book_9" value="9">
           </form>"#,
    )?;
    let form = node(&dom, "#f")?;
    let injected = selection::include_book_selections(&mut dom, &contract, &names, form)?;
    assert!(injected.is_empty());
    assert_eq!(dom.query_selector("input[name=\"book_9\"]")?, None);
    Ok(())
}

#[test]
fn location_fragment_suppresses_action_update() -> Result<()> {
    let config = ControllerConfig::default().with_location("http://localhost/search#search-container");
    let mut page = SearchPage::from_html_with_config(SEARCH_PAGE_HTML, config)?;
    page.type_text(".search-input", "query")?;
    page.submit("#search-form")?;
    assert_eq!(page.submissions()[0].action, "/search");
    Ok(())
}

#[test]
fn missing_action_falls_back_to_page_url() -> Result<()> {
    let html = SEARCH_PAGE_HTML.replace(r#" action="/search""#, "");
    let config = ControllerConfig::default().with_location("http://localhost/home");
    let mut page = SearchPage::from_html_with_config(&html, config)?;
    page.type_text(".search-input", "query")?;
    page.submit("#search-form")?;
    assert_eq!(
        page.submissions()[0].action,
        "http://localhost/home#search-container"
    );
    Ok(())
}

#[test]
fn on_submit_reports_outcome() -> Result<()> {
    let config = ControllerConfig::default();
    let names = SelectionNames::new(&config.contract)?;
    let mut dom = search_dom()?;
    let form = node(&dom, "#search-form")?;
    let query = node(&dom, ".search-input")?;

    match submit::on_submit(&mut dom, &config, &names, form, query)? {
        SubmitOutcome::Cancelled { scroll } => {
            assert_eq!(scroll.map(|s| s.target).as_deref(), Some("section.hero-section"));
        }
        other => panic!("expected cancellation, got {other:?}"),
    }

    dom.set_value(query, "question")?;
    match submit::on_submit(&mut dom, &config, &names, form, query)? {
        SubmitOutcome::Proceed {
            selections, action, ..
        } => {
            assert!(selections.is_empty());
            assert_eq!(action.as_deref(), Some("/search#search-container"));
        }
        other => panic!("expected submission, got {other:?}"),
    }
    Ok(())
}
