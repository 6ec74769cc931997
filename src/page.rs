use super::autosize::adjust_height;
use super::checkbox_group::{self, CheckboxGroup};
use super::config::ControllerConfig;
use super::dom::{
    Dom, NodeId, is_checkbox_input, is_form_control, is_radio_input, is_submit_control,
    truncate_chars,
};
use super::dropdown::{self, ClickEffect};
use super::event::{EventState, Handler, KeyPress, Listener, ListenerStore};
use super::html::parse_html;
use super::rate_limit;
use super::results;
use super::runtime_state::{
    FormSubmission, OpenedWindow, PlatformState, ScrollRequest, TraceState,
};
use super::scope::{self, SearchScope};
use super::selection::{SelectionField, SelectionNames};
use super::shortcut;
use super::submit::{self, SubmitOutcome};
use super::*;

mod actions;
mod assertions;

/// A server-rendered search page with its controller attached.
///
/// Construction parses the markup, registers every handler and runs the
/// page-load initialization. User actions dispatch events synchronously;
/// side effects that would leave the page (form submissions, new windows,
/// scrolling) are recorded instead of performed.
#[derive(Debug)]
pub struct SearchPage {
    dom: Dom,
    config: ControllerConfig,
    names: SelectionNames,
    listeners: ListenerStore,
    query_field: NodeId,
    form: NodeId,
    platform: PlatformState,
    trace: TraceState,
}

impl SearchPage {
    pub fn from_html(html: &str) -> Result<Self> {
        Self::from_html_with_config(html, ControllerConfig::default())
    }

    pub fn from_html_with_config(html: &str, config: ControllerConfig) -> Result<Self> {
        config.validate()?;
        let dom = parse_html(html)?;
        let names = SelectionNames::new(&config.contract)?;
        let query_field = dom
            .query_selector(&config.contract.query_field)?
            .ok_or(Error::MissingRegion("query field"))?;
        let form = dom
            .query_selector(&config.contract.search_form)?
            .ok_or(Error::MissingRegion("search form"))?;
        if !dom.is_tag(form, "form") {
            return Err(Error::TypeMismatch {
                selector: config.contract.search_form.clone(),
                expected: "form".into(),
                actual: dom.tag_name(form).unwrap_or_default().to_string(),
            });
        }

        let mut page = Self {
            dom,
            config,
            names,
            listeners: ListenerStore::default(),
            query_field,
            form,
            platform: PlatformState::default(),
            trace: TraceState::default(),
        };
        page.initialize()?;
        Ok(page)
    }

    fn initialize(&mut self) -> Result<()> {
        // Empty submissions must reach the submit handler instead of being
        // stopped by native validation.
        self.dom.remove_attr(self.query_field, "required")?;

        self.register_listeners()?;

        let sized = adjust_height(&mut self.dom, &self.config, self.query_field)?;
        self.trace_controller(format!(
            "[controller] autosize height={} overflowing={}",
            sized.height, sized.overflowing
        ));

        let scope = scope::initialize(&mut self.dom, &self.config.contract)?;
        self.trace_controller(format!("[controller] scope initialized scope={}", scope.as_str()));

        let marked = checkbox_group::initialize_chip_states(&mut self.dom, &self.config.contract)?;
        self.trace_controller(format!("[controller] chips marked selected={marked}"));

        if rate_limit::is_rate_limited(&self.dom, &self.config)? {
            let notice = rate_limit::show_notice(&mut self.dom, &self.config)?;
            self.listen(
                notice.overlay,
                "click",
                Handler::RateLimitBackdrop {
                    overlay: notice.overlay,
                },
            );
            self.listen(
                notice.dismiss,
                "click",
                Handler::RateLimitDismiss {
                    overlay: notice.overlay,
                },
            );
        }
        Ok(())
    }

    fn listen(&mut self, node: NodeId, event: &str, handler: Handler) {
        self.listeners.add(
            node,
            event,
            Listener {
                capture: false,
                handler,
            },
        );
    }

    fn register_listeners(&mut self) -> Result<()> {
        let contract = self.config.contract.clone();

        for radio in self.dom.query_selector_all(&contract.scope_radios())? {
            self.listen(radio, "change", Handler::ScopeChanged);
        }

        self.listen(self.dom.root, "click", Handler::DocumentClick);
        for menu in self.dom.query_selector_all(&contract.dropdown_menu)? {
            self.listen(menu, "click", Handler::MenuClick);
        }

        for group in checkbox_group::discover_all(&self.dom, &contract)? {
            self.listen(group.all, "change", Handler::GroupAllChanged { menu: group.menu });
            for item in &group.items {
                self.listen(*item, "change", Handler::GroupItemChanged { menu: group.menu });
            }
        }

        for chip in self.dom.query_selector_all(&contract.single_book_chip)? {
            self.listen(chip, "click", Handler::SingleBookChipClick);
        }

        self.listen(self.form, "submit", Handler::FormSubmit);
        self.listen(self.query_field, "input", Handler::QueryInput);
        self.listen(self.query_field, "keydown", Handler::QueryKeydown);

        if let Some(button) = self.dom.query_selector(&contract.clear_button)? {
            self.listen(button, "click", Handler::ClearResults);
        }
        for toggle in self.dom.query_selector_all(&contract.expand_toggle)? {
            self.listen(toggle, "click", Handler::ExpandToggle);
        }
        for link in self.dom.query_selector_all(&contract.full_text_link)? {
            self.listen(link, "click", Handler::FullTextLink);
        }

        self.trace_controller(format!(
            "[controller] listeners registered click={} change={} submit={}",
            self.listeners.count("click"),
            self.listeners.count("change"),
            self.listeners.count("submit")
        ));
        Ok(())
    }

    fn execute_handler(&mut self, handler: Handler, event: &mut EventState) -> Result<()> {
        match handler {
            Handler::ScopeChanged => {
                scope::on_scope_changed(&mut self.dom, &self.config.contract, event.current_target)?;
            }
            Handler::DocumentClick => {
                match dropdown::on_document_click(&mut self.dom, &self.config.contract, event.target)? {
                    ClickEffect::Toggled { chip, open } => {
                        event.stop_propagation();
                        let label = self.dom.node_label(chip);
                        self.trace_controller(format!("[controller] dropdown {label} open={open}"));
                    }
                    ClickEffect::ClosedAll | ClickEffect::Ignored => {}
                }
            }
            Handler::MenuClick => event.stop_propagation(),
            Handler::GroupAllChanged { menu } => {
                if let Some(group) = CheckboxGroup::discover(&self.dom, &self.config.contract, menu)? {
                    group.on_all_changed(&mut self.dom, &self.config.contract)?;
                }
            }
            Handler::GroupItemChanged { menu } => {
                if let Some(group) = CheckboxGroup::discover(&self.dom, &self.config.contract, menu)? {
                    let state = group.on_item_changed(&mut self.dom, &self.config.contract)?;
                    self.trace_controller(format!("[controller] group recomputed state={state:?}"));
                }
            }
            Handler::SingleBookChipClick => {
                dropdown::on_single_book_click(
                    &mut self.dom,
                    &self.config.contract,
                    event.current_target,
                )?;
            }
            Handler::FormSubmit => self.handle_submit(event)?,
            Handler::QueryInput => {
                adjust_height(&mut self.dom, &self.config, self.query_field)?;
            }
            Handler::QueryKeydown => {
                let shortcut = event.key.as_ref().is_some_and(shortcut::is_submit_shortcut);
                if shortcut {
                    // Like `form.submit()`: the submit handlers do not run.
                    event.prevent_default();
                    self.trace_controller("[controller] submit shortcut".into());
                    self.submit_form(self.form)?;
                }
            }
            Handler::ClearResults => {
                results::clear_results(&mut self.dom, &self.config, self.query_field)?;
                self.prune_detached_listeners();
            }
            Handler::ExpandToggle => {
                results::toggle_expand(&mut self.dom, &self.config.contract, event.current_target)?;
            }
            Handler::FullTextLink => {
                if let Some(window) = results::full_text_window(&self.dom, event.current_target) {
                    event.prevent_default();
                    self.trace_controller(format!("[controller] open window url={}", window.url));
                    self.platform.opened_windows.push(window);
                }
            }
            Handler::RateLimitBackdrop { overlay } => {
                if event.target == overlay {
                    self.dismiss_rate_limit(overlay)?;
                }
            }
            Handler::RateLimitDismiss { overlay } => self.dismiss_rate_limit(overlay)?,
        }
        Ok(())
    }

    fn handle_submit(&mut self, event: &mut EventState) -> Result<()> {
        let outcome = submit::on_submit(
            &mut self.dom,
            &self.config,
            &self.names,
            event.current_target,
            self.query_field,
        )?;
        match outcome {
            SubmitOutcome::Cancelled { scroll } => {
                event.prevent_default();
                self.trace_controller("[controller] submit cancelled reason=empty_query".into());
                self.platform.scroll_requests.extend(scroll);
            }
            SubmitOutcome::Proceed {
                selections,
                scroll,
                action,
            } => {
                self.trace_controller(format!(
                    "[controller] submit proceeds selections={} action_updated={}",
                    selections.len(),
                    action.is_some()
                ));
                self.platform.scroll_requests.extend(scroll);
            }
        }
        // Help and loading markup replace the result items.
        self.prune_detached_listeners();
        Ok(())
    }

    /// Drops listeners of every node no longer under the document.
    fn prune_detached_listeners(&mut self) {
        let dom = &self.dom;
        self.listeners.retain_nodes(|node| dom.is_connected(node));
    }

    #[cfg(test)]
    pub(crate) fn listener_count(&self, event: &str) -> usize {
        self.listeners.count(event)
    }

    fn dismiss_rate_limit(&mut self, overlay: NodeId) -> Result<()> {
        if !self.dom.is_connected(overlay) {
            return Ok(());
        }
        rate_limit::dismiss(&mut self.dom, overlay)?;
        self.prune_detached_listeners();
        self.trace_controller("[controller] rate limit notice dismissed".into());
        Ok(())
    }

    /// Fires `submit` at the form and records the submission unless a
    /// handler cancelled it.
    fn request_submit(&mut self, form: NodeId) -> Result<bool> {
        let event = self.dispatch_event(EventState::new("submit", form))?;
        if event.default_prevented {
            return Ok(false);
        }
        self.submit_form(form)?;
        Ok(true)
    }

    /// Records the form's current data set without firing `submit`.
    fn submit_form(&mut self, form: NodeId) -> Result<()> {
        let submission = FormSubmission {
            action: submit::form_action(&self.dom, &self.config, form),
            method: self
                .dom
                .attr(form, "method")
                .filter(|method| !method.is_empty())
                .map(|method| method.to_ascii_lowercase())
                .unwrap_or_else(|| "get".into()),
            entries: self.form_data_entries(form)?,
        };
        self.trace_controller(format!(
            "[controller] form submitted action={} entries={}",
            submission.action,
            submission.entries.len()
        ));
        self.platform.submissions.push(submission);
        Ok(())
    }

    fn form_data_entries(&self, form: NodeId) -> Result<Vec<(String, String)>> {
        let mut out = Vec::new();
        for control in self.dom.query_selector_all_from(form, "input, select, textarea, button")? {
            if !self.is_successful_control(control)? {
                continue;
            }
            let name = self.dom.attr(control, "name").unwrap_or_default();
            out.push((name, self.control_value(control)?));
        }
        Ok(out)
    }

    fn is_successful_control(&self, control: NodeId) -> Result<bool> {
        if !is_form_control(&self.dom, control) || self.dom.disabled(control) {
            return Ok(false);
        }
        if self.dom.attr(control, "name").unwrap_or_default().is_empty() {
            return Ok(false);
        }
        if self.dom.is_tag(control, "button") {
            return Ok(false);
        }
        if self.dom.is_tag(control, "input") {
            let kind = self
                .dom
                .attr(control, "type")
                .unwrap_or_default()
                .to_ascii_lowercase();
            if matches!(
                kind.as_str(),
                "button" | "submit" | "reset" | "file" | "image"
            ) {
                return Ok(false);
            }
            if kind == "checkbox" || kind == "radio" {
                return self.dom.checked(control);
            }
        }
        Ok(true)
    }

    fn control_value(&self, control: NodeId) -> Result<String> {
        if self.dom.is_tag(control, "select") {
            let options = self.dom.query_selector_all_from(control, "option")?;
            let chosen = options
                .iter()
                .copied()
                .find(|option| self.dom.attr(*option, "selected").is_some())
                .or_else(|| options.first().copied());
            return Ok(chosen
                .map(|option| {
                    self.dom
                        .attr(option, "value")
                        .unwrap_or_else(|| self.dom.text_content(option).trim().to_string())
                })
                .unwrap_or_default());
        }
        let value = self.dom.value(control)?;
        if value.is_empty()
            && (is_checkbox_input(&self.dom, control) || is_radio_input(&self.dom, control))
        {
            return Ok("on".into());
        }
        Ok(value)
    }

    fn uncheck_other_radios_in_group(&mut self, target: NodeId) -> Result<()> {
        let name = self.dom.attr(target, "name").unwrap_or_default();
        if name.is_empty() {
            return Ok(());
        }
        let owner = self.dom.find_ancestor_by_tag(target, "form");
        for node in self.dom.all_element_nodes() {
            if node == target || !is_radio_input(&self.dom, node) {
                continue;
            }
            if self.dom.attr(node, "name").unwrap_or_default() != name
                || self.dom.find_ancestor_by_tag(node, "form") != owner
            {
                continue;
            }
            if self.dom.checked(node)? {
                self.dom.set_checked(node, false)?;
            }
        }
        Ok(())
    }

    fn dispatch_event(&mut self, mut event: EventState) -> Result<EventState> {
        let target = event.target;
        let mut path = Vec::new();
        let mut cursor = Some(target);
        while let Some(node) = cursor {
            path.push(node);
            cursor = self.dom.parent(node);
        }
        path.reverse();

        // Capture phase, then the target's capture listeners.
        for node in &path {
            event.current_target = *node;
            self.invoke_listeners(*node, &mut event, true)?;
            if event.propagation_stopped {
                self.trace_event_done(&event, "propagation_stopped");
                return Ok(event);
            }
        }

        // Target's bubble listeners, then the bubble phase.
        for node in path.iter().rev() {
            event.current_target = *node;
            self.invoke_listeners(*node, &mut event, false)?;
            if event.propagation_stopped {
                self.trace_event_done(&event, "propagation_stopped");
                return Ok(event);
            }
        }

        self.trace_event_done(&event, "completed");
        Ok(event)
    }

    fn invoke_listeners(&mut self, node: NodeId, event: &mut EventState, capture: bool) -> Result<()> {
        for listener in self.listeners.get(node, &event.event_type, capture) {
            let phase = if capture { "capture" } else { "bubble" };
            let line = format!(
                "[event] {} target={} current={} phase={phase} default_prevented={}",
                event.event_type,
                self.dom.node_label(event.target),
                self.dom.node_label(event.current_target),
                event.default_prevented
            );
            self.trace.push_event(line);
            self.execute_handler(listener.handler, event)?;
        }
        Ok(())
    }

    fn trace_event_done(&mut self, event: &EventState, outcome: &str) {
        let line = format!(
            "[event] done {} target={} current={} outcome={outcome} default_prevented={} propagation_stopped={}",
            event.event_type,
            self.dom.node_label(event.target),
            self.dom.node_label(event.current_target),
            event.default_prevented,
            event.propagation_stopped
        );
        self.trace.push_event(line);
    }

    fn trace_controller(&mut self, line: String) {
        self.trace.push(line);
    }

    fn select_one(&self, selector: &str) -> Result<NodeId> {
        self.dom
            .query_selector(selector)?
            .ok_or_else(|| Error::SelectorNotFound(selector.to_string()))
    }

    fn node_snippet(&self, node: NodeId) -> String {
        truncate_chars(&self.dom.dump_node(node), 200)
    }
}
