use super::selector::SelectorList;
use super::*;

pub const DEFAULT_MAX_QUERY_HEIGHT: i64 = 300;
pub const DEFAULT_RESULTS_FRAGMENT: &str = "search-container";
pub const DEFAULT_RATE_LIMIT_PHRASE: &str = "セッションあたりの検索制限に達しました";
pub const DEFAULT_LOCATION: &str = "http://localhost/";

/// Typed contract between the host template and the controller. Every
/// region the controller touches is named here instead of being spelled as
/// a selector at the call site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContract {
    pub query_field: String,
    pub search_form: String,
    pub scope_radio_name: String,
    pub search_options: String,
    pub book_selections: String,
    pub chip: String,
    pub dropdown_chip: String,
    pub single_book_chip: String,
    pub dropdown_menu: String,
    pub results_section: String,
    pub results_content: String,
    pub result_count: String,
    pub scope_info: String,
    pub hero_section: String,
    pub search_container: String,
    pub clear_button: String,
    pub rate_limit_message: String,
    pub result_item: String,
    pub result_content: String,
    pub expand_toggle: String,
    pub expand_label: String,
    pub collapse_label: String,
    pub full_text_link: String,
    pub open_class: String,
    pub selected_class: String,
    pub overflow_class: String,
    pub collapsed_class: String,
    pub selection_prefixes: Vec<String>,
    pub anti_forgery_marker: String,
}

impl Default for PageContract {
    fn default() -> Self {
        Self {
            query_field: ".search-input".into(),
            search_form: "#search-form".into(),
            scope_radio_name: "searchScope".into(),
            search_options: ".search-options".into(),
            book_selections: ".book-selections".into(),
            chip: ".suggestion-chip".into(),
            dropdown_chip: ".suggestion-chip.has-dropdown".into(),
            single_book_chip: ".suggestion-chip.single-book".into(),
            dropdown_menu: ".dropdown-menu".into(),
            results_section: ".search-results".into(),
            results_content: ".results-content".into(),
            result_count: ".result-count".into(),
            scope_info: ".search-scope-info".into(),
            hero_section: ".hero-section".into(),
            search_container: ".search-container".into(),
            clear_button: ".clear-results".into(),
            rate_limit_message: ".rate-limit-message".into(),
            result_item: ".search-result-item".into(),
            result_content: ".result-content".into(),
            expand_toggle: ".expand-toggle".into(),
            expand_label: ".expand-text".into(),
            collapse_label: ".collapse-text".into(),
            full_text_link: ".full-text-link".into(),
            open_class: "dropdown-open".into(),
            selected_class: "selected".into(),
            overflow_class: "has-scroll".into(),
            collapsed_class: "collapsed".into(),
            selection_prefixes: vec!["book_".into(), "series_".into()],
            anti_forgery_marker: "csrf".into(),
        }
    }
}

impl PageContract {
    pub(crate) fn scope_radios(&self) -> String {
        format!("input[name=\"{}\"]", self.scope_radio_name)
    }

    pub(crate) fn checked_scope_radio(&self) -> String {
        format!("input[name=\"{}\"]:checked", self.scope_radio_name)
    }

    pub(crate) fn specific_scope_radio(&self) -> String {
        format!("input[name=\"{}\"][value=\"specific\"]", self.scope_radio_name)
    }

    pub(crate) fn open_chips(&self) -> String {
        format!("{}.{}", self.chip, self.open_class)
    }

    pub(crate) fn selected_single_book_chips(&self) -> String {
        format!("{}.{}", self.single_book_chip, self.selected_class)
    }

    pub(crate) fn selection_inputs(&self) -> String {
        self.selection_prefixes
            .iter()
            .map(|prefix| format!("input[name^=\"{prefix}\"]"))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn selectors(&self) -> Vec<(&'static str, String)> {
        vec![
            ("query_field", self.query_field.clone()),
            ("search_form", self.search_form.clone()),
            ("scope_radios", self.scope_radios()),
            ("search_options", self.search_options.clone()),
            ("book_selections", self.book_selections.clone()),
            ("chip", self.chip.clone()),
            ("dropdown_chip", self.dropdown_chip.clone()),
            ("single_book_chip", self.single_book_chip.clone()),
            ("dropdown_menu", self.dropdown_menu.clone()),
            ("results_section", self.results_section.clone()),
            ("results_content", self.results_content.clone()),
            ("result_count", self.result_count.clone()),
            ("scope_info", self.scope_info.clone()),
            ("hero_section", self.hero_section.clone()),
            ("search_container", self.search_container.clone()),
            ("clear_button", self.clear_button.clone()),
            ("rate_limit_message", self.rate_limit_message.clone()),
            ("result_item", self.result_item.clone()),
            ("result_content", self.result_content.clone()),
            ("expand_toggle", self.expand_toggle.clone()),
            ("expand_label", self.expand_label.clone()),
            ("collapse_label", self.collapse_label.clone()),
            ("full_text_link", self.full_text_link.clone()),
            ("open_chips", self.open_chips()),
            ("selected_single_book_chips", self.selected_single_book_chips()),
        ]
    }

    pub fn validate(&self) -> Result<()> {
        for (region, selector) in self.selectors() {
            SelectorList::parse(&selector).map_err(|err| {
                Error::InvalidConfig(format!("selector for {region} is invalid: {err}"))
            })?;
        }
        for (name, class) in [
            ("open_class", &self.open_class),
            ("selected_class", &self.selected_class),
            ("overflow_class", &self.overflow_class),
            ("collapsed_class", &self.collapsed_class),
        ] {
            if class.is_empty() || class.contains(char::is_whitespace) {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be a single class token, got {class:?}"
                )));
            }
        }
        if self.selection_prefixes.is_empty()
            || self.selection_prefixes.iter().any(String::is_empty)
        {
            return Err(Error::InvalidConfig(
                "selection_prefixes requires at least one non-empty prefix".into(),
            ));
        }
        SelectorList::parse(&self.selection_inputs())
            .map_err(|err| Error::InvalidConfig(format!("selection prefix is invalid: {err}")))?;
        if self.anti_forgery_marker.is_empty() {
            return Err(Error::InvalidConfig(
                "anti_forgery_marker must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Fixed text metrics standing in for browser layout when the autosizer
/// measures the query field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutMetrics {
    pub line_height: i64,
    pub vertical_padding: i64,
    pub columns: usize,
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self {
            line_height: 24,
            vertical_padding: 12,
            columns: 40,
        }
    }
}

impl LayoutMetrics {
    /// Scroll height of a field holding `text`: padding plus one line box per
    /// visual line. Logical lines wrap every `columns` characters; an empty
    /// field still renders one line.
    pub fn scroll_height(&self, text: &str) -> i64 {
        let columns = self.columns.max(1);
        let visual_lines: usize = text
            .split('\n')
            .map(|line| line.chars().count().div_ceil(columns).max(1))
            .sum();
        self.vertical_padding + self.line_height * visual_lines as i64
    }

    pub fn validate(&self) -> Result<()> {
        if self.line_height <= 0 {
            return Err(Error::InvalidConfig("line_height must be positive".into()));
        }
        if self.vertical_padding < 0 {
            return Err(Error::InvalidConfig(
                "vertical_padding must not be negative".into(),
            ));
        }
        if self.columns == 0 {
            return Err(Error::InvalidConfig("columns must be at least 1".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerConfig {
    pub contract: PageContract,
    pub max_query_height: i64,
    pub layout: LayoutMetrics,
    pub results_fragment: String,
    pub rate_limit_phrase: String,
    pub location: String,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            contract: PageContract::default(),
            max_query_height: DEFAULT_MAX_QUERY_HEIGHT,
            layout: LayoutMetrics::default(),
            results_fragment: DEFAULT_RESULTS_FRAGMENT.into(),
            rate_limit_phrase: DEFAULT_RATE_LIMIT_PHRASE.into(),
            location: DEFAULT_LOCATION.into(),
        }
    }
}

impl ControllerConfig {
    pub fn with_contract(mut self, contract: PageContract) -> Self {
        self.contract = contract;
        self
    }

    pub fn with_max_query_height(mut self, max_query_height: i64) -> Self {
        self.max_query_height = max_query_height;
        self
    }

    pub fn with_layout(mut self, layout: LayoutMetrics) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_results_fragment(mut self, fragment: &str) -> Self {
        self.results_fragment = fragment.to_string();
        self
    }

    pub fn with_rate_limit_phrase(mut self, phrase: &str) -> Self {
        self.rate_limit_phrase = phrase.to_string();
        self
    }

    pub fn with_location(mut self, location: &str) -> Self {
        self.location = location.to_string();
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.contract.validate()?;
        self.layout.validate()?;
        if self.max_query_height <= 0 {
            return Err(Error::InvalidConfig(
                "max_query_height must be positive".into(),
            ));
        }
        if self.results_fragment.is_empty() || self.results_fragment.contains('#') {
            return Err(Error::InvalidConfig(format!(
                "results_fragment must be a bare fragment id, got {:?}",
                self.results_fragment
            )));
        }
        if self.rate_limit_phrase.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "rate_limit_phrase must not be blank".into(),
            ));
        }
        if self.location.is_empty() {
            return Err(Error::InvalidConfig("location must not be empty".into()));
        }
        Ok(())
    }

    /// Fragment of the configured page URL, without the leading `#`.
    pub(crate) fn location_fragment(&self) -> Option<&str> {
        self.location
            .split_once('#')
            .map(|(_, fragment)| fragment)
            .filter(|fragment| !fragment.is_empty())
    }
}
