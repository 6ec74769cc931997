use super::*;

impl SearchPage {
    pub fn enable_trace(&mut self, enabled: bool) {
        self.trace.enabled = enabled;
    }

    pub fn take_trace_logs(&mut self) -> Vec<String> {
        self.trace.logs.drain(..).collect()
    }

    pub fn set_trace_events(&mut self, enabled: bool) {
        self.trace.events = enabled;
    }

    pub fn set_trace_log_limit(&mut self, max_entries: usize) -> Result<()> {
        self.trace.set_limit(max_entries)
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn click(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        if self.dom.disabled(target) {
            return Ok(());
        }

        let outcome = self.dispatch_event(EventState::new("click", target))?;
        if outcome.default_prevented {
            return Ok(());
        }

        if is_checkbox_input(&self.dom, target) {
            let current = self.dom.checked(target)?;
            self.dom.set_checked(target, !current)?;
            self.dispatch_event(EventState::new("input", target))?;
            self.dispatch_event(EventState::new("change", target))?;
        }

        if is_radio_input(&self.dom, target) && !self.dom.checked(target)? {
            self.uncheck_other_radios_in_group(target)?;
            self.dom.set_checked(target, true)?;
            self.dispatch_event(EventState::new("input", target))?;
            self.dispatch_event(EventState::new("change", target))?;
        }

        if is_submit_control(&self.dom, target) {
            if let Some(form) = self.dom.find_ancestor_by_tag(target, "form") {
                self.request_submit(form)?;
            }
        }
        Ok(())
    }

    pub fn set_checked(&mut self, selector: &str, checked: bool) -> Result<()> {
        let target = self.select_one(selector)?;
        if self.dom.disabled(target) {
            return Ok(());
        }
        let is_checkbox = is_checkbox_input(&self.dom, target);
        let is_radio = is_radio_input(&self.dom, target);
        if !is_checkbox && !is_radio {
            return Err(Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "input[type=checkbox|radio]".into(),
                actual: self.describe_control(target),
            });
        }

        if self.dom.checked(target)? != checked {
            if is_radio && checked {
                self.uncheck_other_radios_in_group(target)?;
            }
            self.dom.set_checked(target, checked)?;
            self.dispatch_event(EventState::new("input", target))?;
            self.dispatch_event(EventState::new("change", target))?;
        }
        Ok(())
    }

    /// Replaces the field's value and fires `input`.
    pub fn type_text(&mut self, selector: &str, text: &str) -> Result<()> {
        let target = self.text_control(selector)?;
        if self.dom.disabled(target) {
            return Ok(());
        }
        self.dom.set_value(target, text)?;
        self.dispatch_event(EventState::new("input", target))?;
        Ok(())
    }

    /// Fires `keydown` and, unless a handler cancelled it, runs the key's
    /// default action: textareas insert the text at the end of the value,
    /// a plain Enter in a single-line input submits its form.
    pub fn press_key(&mut self, selector: &str, key: KeyPress) -> Result<()> {
        let target = self.text_control(selector)?;
        if self.dom.disabled(target) {
            return Ok(());
        }
        let event = self.dispatch_event(EventState::new("keydown", target).with_key(key.clone()))?;
        if event.default_prevented {
            return Ok(());
        }

        if self.dom.is_tag(target, "input") && key.key == "Enter" && !key.has_platform_modifier() {
            if let Some(form) = self.dom.find_ancestor_by_tag(target, "form") {
                self.request_submit(form)?;
            }
            return Ok(());
        }

        if let Some(text) = shortcut::inserted_text(&key) {
            let mut value = self.dom.value(target)?;
            value.push_str(&text);
            self.dom.set_value(target, &value)?;
            self.dispatch_event(EventState::new("input", target))?;
        }
        Ok(())
    }

    /// Submits the form containing `selector` (or the form itself) through
    /// its submit handlers. Returns whether the submission went through.
    pub fn submit(&mut self, selector: &str) -> Result<bool> {
        let target = self.select_one(selector)?;
        let form = if self.dom.is_tag(target, "form") {
            Some(target)
        } else {
            self.dom.find_ancestor_by_tag(target, "form")
        };
        match form {
            Some(form) => self.request_submit(form),
            None => Err(Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "form or form descendant".into(),
                actual: self.describe_control(target),
            }),
        }
    }

    pub fn dispatch(&mut self, selector: &str, event: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        self.dispatch_event(EventState::new(event, target))?;
        Ok(())
    }

    pub fn submissions(&self) -> &[FormSubmission] {
        &self.platform.submissions
    }

    pub fn take_submissions(&mut self) -> Vec<FormSubmission> {
        std::mem::take(&mut self.platform.submissions)
    }

    pub fn opened_windows(&self) -> &[OpenedWindow] {
        &self.platform.opened_windows
    }

    pub fn take_opened_windows(&mut self) -> Vec<OpenedWindow> {
        std::mem::take(&mut self.platform.opened_windows)
    }

    pub fn scroll_requests(&self) -> &[ScrollRequest] {
        &self.platform.scroll_requests
    }

    pub fn take_scroll_requests(&mut self) -> Vec<ScrollRequest> {
        std::mem::take(&mut self.platform.scroll_requests)
    }

    pub fn search_scope(&self) -> Result<SearchScope> {
        scope::current_scope(&self.dom, &self.config.contract)
    }

    /// Selection fields currently injected into the search form.
    pub fn hidden_selection_fields(&self) -> Result<Vec<SelectionField>> {
        let mut fields = Vec::new();
        for input in self.dom.query_selector_all_from(self.form, "input[type=\"hidden\"]")? {
            let name = self.dom.attr(input, "name").unwrap_or_default();
            if !self.names.is_selection_name(&name) {
                continue;
            }
            fields.push(self.names.field(name, self.dom.value(input)?));
        }
        Ok(fields)
    }

    pub fn value(&self, selector: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        self.dom.value(target)
    }

    pub fn text(&self, selector: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        Ok(self.dom.text_content(target))
    }

    pub fn attr(&self, selector: &str, name: &str) -> Result<Option<String>> {
        let target = self.select_one(selector)?;
        Ok(self.dom.attr(target, name))
    }

    pub fn style(&self, selector: &str, property: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        self.dom.style_get(target, property)
    }

    pub fn has_class(&self, selector: &str, class_name: &str) -> Result<bool> {
        let target = self.select_one(selector)?;
        Ok(self.dom.class_contains(target, class_name))
    }

    pub fn count(&self, selector: &str) -> Result<usize> {
        Ok(self.dom.query_selector_all(selector)?.len())
    }

    fn text_control(&self, selector: &str) -> Result<NodeId> {
        let target = self.select_one(selector)?;
        if self.dom.is_tag(target, "textarea") || self.dom.is_tag(target, "input") {
            return Ok(target);
        }
        Err(Error::TypeMismatch {
            selector: selector.to_string(),
            expected: "input or textarea".into(),
            actual: self.describe_control(target),
        })
    }

    fn describe_control(&self, node: NodeId) -> String {
        match (self.dom.tag_name(node), self.dom.attr(node, "type")) {
            (Some(tag), Some(kind)) => format!("{tag}[type={kind}]"),
            (Some(tag), None) => tag.to_string(),
            (None, _) => "non-element".into(),
        }
    }
}
