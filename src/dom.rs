use std::collections::BTreeMap;

use super::html::parse_into;
use super::selector::SelectorList;
use super::*;

// Recursive tree walks grow the stack on deeply nested server markup.
const STACK_RED_ZONE: usize = 64 * 1024;
const STACK_GROW_SIZE: usize = 2 * 1024 * 1024;

/// Handle to a node in the page arena. Stays valid after the node is
/// detached; detached nodes simply stop matching document queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

#[derive(Debug, Clone)]
enum NodeData {
    Document,
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    data: NodeData,
}

/// An element's markup plus the live state of form controls, seeded from
/// the `value` and `checked` attributes when the element is built.
#[derive(Debug, Clone)]
pub(crate) struct Element {
    pub(crate) tag: String,
    pub(crate) attrs: BTreeMap<String, String>,
    pub(crate) value: String,
    pub(crate) checked: bool,
    pub(crate) indeterminate: bool,
}

impl Element {
    pub(crate) fn new(tag: &str, attrs: BTreeMap<String, String>) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            value: attrs.get("value").cloned().unwrap_or_default(),
            checked: attrs.contains_key("checked"),
            indeterminate: false,
            attrs,
        }
    }

    pub(crate) fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub(crate) fn has_class(&self, class_name: &str) -> bool {
        self.attr("class")
            .is_some_and(|classes| classes.split_whitespace().any(|class| class == class_name))
    }

    fn is_input_of_type(&self, kind: &str) -> bool {
        self.tag == "input" && self.attr("type").is_some_and(|value| value.eq_ignore_ascii_case(kind))
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Dom {
    nodes: Vec<Node>,
    pub(crate) root: NodeId,
}

impl Dom {
    pub(crate) fn new() -> Self {
        Self {
            nodes: vec![Node {
                parent: None,
                children: Vec::new(),
                data: NodeData::Document,
            }],
            root: NodeId(0),
        }
    }

    fn push_node(&mut self, parent: Option<NodeId>, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent,
            children: Vec::new(),
            data,
        });
        if let Some(parent) = parent {
            self.nodes[parent.0].children.push(id);
        }
        id
    }

    pub(crate) fn append_element(&mut self, parent: NodeId, element: Element) -> NodeId {
        self.push_node(Some(parent), NodeData::Element(element))
    }

    pub(crate) fn append_text(&mut self, parent: NodeId, text: String) -> NodeId {
        self.push_node(Some(parent), NodeData::Text(text))
    }

    pub(crate) fn create_detached_element(&mut self, tag: &str) -> NodeId {
        self.push_node(None, NodeData::Element(Element::new(tag, BTreeMap::new())))
    }

    pub(crate) fn element(&self, node: NodeId) -> Option<&Element> {
        match &self.nodes.get(node.0)?.data {
            NodeData::Element(element) => Some(element),
            _ => None,
        }
    }

    fn element_or(&self, node: NodeId, operation: &str) -> Result<&Element> {
        self.element(node)
            .ok_or_else(|| Error::Dom(format!("{operation} target is not an element")))
    }

    fn element_mut_or(&mut self, node: NodeId, operation: &str) -> Result<&mut Element> {
        match self.nodes.get_mut(node.0).map(|node| &mut node.data) {
            Some(NodeData::Element(element)) => Ok(element),
            _ => Err(Error::Dom(format!("{operation} target is not an element"))),
        }
    }

    pub(crate) fn tag_name(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|element| element.tag.as_str())
    }

    pub(crate) fn is_tag(&self, node: NodeId, tag: &str) -> bool {
        self.tag_name(node).is_some_and(|name| name.eq_ignore_ascii_case(tag))
    }

    pub(crate) fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0).and_then(|node| node.parent)
    }

    /// Proper ancestors, nearest first.
    fn ancestors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(node), |current| self.parent(*current))
    }

    pub(crate) fn is_connected(&self, node: NodeId) -> bool {
        node == self.root || self.ancestors(node).any(|ancestor| ancestor == self.root)
    }

    pub(crate) fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || {
            match &self.nodes[node.0].data {
                NodeData::Text(text) => out.push_str(text),
                NodeData::Document | NodeData::Element(_) => {
                    for child in &self.nodes[node.0].children {
                        self.collect_text(*child, out);
                    }
                }
            }
        })
    }

    pub(crate) fn set_text_content(&mut self, node: NodeId, text: &str) -> Result<()> {
        self.element_or(node, "textContent")?;
        self.detach_children(node);
        if !text.is_empty() {
            self.append_text(node, text.to_string());
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn inner_html(&self, node: NodeId) -> Result<String> {
        self.element_or(node, "innerHTML")?;
        Ok(self.nodes[node.0]
            .children
            .iter()
            .map(|child| self.dump_node(*child))
            .collect())
    }

    /// Replaces the children of `node` with the parsed markup. On a parse
    /// error the existing children are left in place.
    pub(crate) fn set_inner_html(&mut self, node: NodeId, html: &str) -> Result<()> {
        self.element_or(node, "innerHTML")?;
        let holder = self.create_detached_element("template");
        parse_into(self, holder, html)?;
        self.detach_children(node);
        for child in std::mem::take(&mut self.nodes[holder.0].children) {
            self.nodes[child.0].parent = Some(node);
            self.nodes[node.0].children.push(child);
        }
        Ok(())
    }

    fn detach_children(&mut self, node: NodeId) {
        for child in std::mem::take(&mut self.nodes[node.0].children) {
            self.nodes[child.0].parent = None;
        }
    }

    pub(crate) fn value(&self, node: NodeId) -> Result<String> {
        Ok(self.element_or(node, "value")?.value.clone())
    }

    pub(crate) fn set_value(&mut self, node: NodeId, value: &str) -> Result<()> {
        self.element_mut_or(node, "value")?.value = value.to_string();
        Ok(())
    }

    pub(crate) fn checked(&self, node: NodeId) -> Result<bool> {
        Ok(self.element_or(node, "checked")?.checked)
    }

    pub(crate) fn set_checked(&mut self, node: NodeId, checked: bool) -> Result<()> {
        self.element_mut_or(node, "checked")?.checked = checked;
        Ok(())
    }

    pub(crate) fn indeterminate(&self, node: NodeId) -> Result<bool> {
        Ok(self.element_or(node, "indeterminate")?.indeterminate)
    }

    pub(crate) fn set_indeterminate(&mut self, node: NodeId, indeterminate: bool) -> Result<()> {
        self.element_mut_or(node, "indeterminate")?.indeterminate = indeterminate;
        Ok(())
    }

    pub(crate) fn disabled(&self, node: NodeId) -> bool {
        self.element(node).is_some_and(|element| element.attrs.contains_key("disabled"))
    }

    pub(crate) fn attr(&self, node: NodeId, name: &str) -> Option<String> {
        self.element(node)?.attr(name).map(str::to_string)
    }

    pub(crate) fn set_attr(&mut self, node: NodeId, name: &str, value: &str) -> Result<()> {
        let name = name.to_ascii_lowercase();
        let element = self.element_mut_or(node, "setAttribute")?;
        match name.as_str() {
            "value" => element.value = value.to_string(),
            "checked" => element.checked = true,
            _ => {}
        }
        element.attrs.insert(name, value.to_string());
        Ok(())
    }

    pub(crate) fn remove_attr(&mut self, node: NodeId, name: &str) -> Result<()> {
        let name = name.to_ascii_lowercase();
        let element = self.element_mut_or(node, "removeAttribute")?;
        match name.as_str() {
            "value" => element.value.clear(),
            "checked" => element.checked = false,
            _ => {}
        }
        element.attrs.remove(&name);
        Ok(())
    }

    pub(crate) fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        if matches!(self.nodes.get(parent.0).map(|node| &node.data), None | Some(NodeData::Text(_))) {
            return Err(Error::Dom("appendChild target cannot have children".into()));
        }
        if child == self.root || child.0 >= self.nodes.len() {
            return Err(Error::Dom("invalid appendChild node".into()));
        }
        if parent == child || self.ancestors(parent).any(|ancestor| ancestor == child) {
            return Err(Error::Dom("appendChild would create a cycle".into()));
        }
        self.remove_node(child)?;
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
        Ok(())
    }

    /// Detaches `node` from its parent. Detaching a detached node is a no-op.
    pub(crate) fn remove_node(&mut self, node: NodeId) -> Result<()> {
        if node == self.root {
            return Err(Error::Dom("cannot remove document root".into()));
        }
        if let Some(parent) = self.parent(node) {
            self.nodes[parent.0].children.retain(|child| *child != node);
            self.nodes[node.0].parent = None;
        }
        Ok(())
    }

    /// `dataset` lookup: `bookId` reads `data-book-id`.
    pub(crate) fn dataset_get(&self, node: NodeId, key: &str) -> Option<String> {
        self.attr(node, &format!("data-{}", kebab_case(key)))
    }

    pub(crate) fn style_get(&self, node: NodeId, property: &str) -> Result<String> {
        let property = kebab_case(property);
        Ok(inline_style(self.element_or(node, "style")?)
            .into_iter()
            .find(|(name, _)| *name == property)
            .map(|(_, value)| value)
            .unwrap_or_default())
    }

    /// An empty value removes the declaration.
    pub(crate) fn style_set(&mut self, node: NodeId, property: &str, value: &str) -> Result<()> {
        let property = kebab_case(property);
        let element = self.element_mut_or(node, "style")?;
        let mut declarations = inline_style(element);
        let existing = declarations.iter().position(|(name, _)| *name == property);
        match (existing, value.is_empty()) {
            (Some(index), true) => {
                declarations.remove(index);
            }
            (Some(index), false) => declarations[index].1 = value.to_string(),
            (None, false) => declarations.push((property, value.to_string())),
            (None, true) => {}
        }
        if declarations.is_empty() {
            element.attrs.remove("style");
        } else {
            let serialized = declarations
                .iter()
                .map(|(name, value)| format!("{name}: {value};"))
                .collect::<Vec<_>>()
                .join(" ");
            element.attrs.insert("style".into(), serialized);
        }
        Ok(())
    }

    pub(crate) fn class_contains(&self, node: NodeId, class_name: &str) -> bool {
        self.element(node).is_some_and(|element| element.has_class(class_name))
    }

    /// Adds or removes one class token, keeping the order of the others.
    pub(crate) fn class_set(&mut self, node: NodeId, class_name: &str, on: bool) -> Result<()> {
        let element = self.element_mut_or(node, "classList")?;
        let mut classes = element
            .attr("class")
            .unwrap_or_default()
            .split_whitespace()
            .filter(|class| *class != class_name)
            .map(str::to_string)
            .collect::<Vec<_>>();
        if on {
            classes.push(class_name.to_string());
        }
        if classes.is_empty() {
            element.attrs.remove("class");
        } else {
            element.attrs.insert("class".into(), classes.join(" "));
        }
        Ok(())
    }

    pub(crate) fn class_add(&mut self, node: NodeId, class_name: &str) -> Result<()> {
        if self.class_contains(node, class_name) {
            return Ok(());
        }
        self.class_set(node, class_name, true)
    }

    /// Returns whether the class is present afterwards.
    pub(crate) fn class_toggle(&mut self, node: NodeId, class_name: &str) -> Result<bool> {
        let on = !self.class_contains(node, class_name);
        self.class_set(node, class_name, on)?;
        Ok(on)
    }

    pub(crate) fn query_selector(&self, selector: &str) -> Result<Option<NodeId>> {
        Ok(self.query_selector_all(selector)?.into_iter().next())
    }

    /// Matching elements in document order. Duplicate ids all match; the
    /// first one in document order wins for single lookups.
    pub(crate) fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>> {
        self.query_selector_all_from(self.root, selector)
    }

    pub(crate) fn query_selector_from(&self, scope: NodeId, selector: &str) -> Result<Option<NodeId>> {
        Ok(self.query_selector_all_from(scope, selector)?.into_iter().next())
    }

    /// Like [`Dom::query_selector_all`] but limited to descendants of `scope`.
    pub(crate) fn query_selector_all_from(&self, scope: NodeId, selector: &str) -> Result<Vec<NodeId>> {
        let list = SelectorList::parse(selector)?;
        let mut candidates = Vec::new();
        for child in &self.nodes[scope.0].children {
            self.collect_elements(*child, &mut candidates);
        }
        candidates.retain(|node| list.matches(self, *node));
        Ok(candidates)
    }

    pub(crate) fn closest(&self, node: NodeId, selector: &str) -> Result<Option<NodeId>> {
        let list = SelectorList::parse(selector)?;
        Ok(std::iter::once(node)
            .chain(self.ancestors(node))
            .find(|candidate| list.matches(self, *candidate)))
    }

    pub(crate) fn find_ancestor_by_tag(&self, node: NodeId, tag: &str) -> Option<NodeId> {
        self.ancestors(node).find(|ancestor| self.is_tag(*ancestor, tag))
    }

    pub(crate) fn all_element_nodes(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_elements(self.root, &mut out);
        out
    }

    fn collect_elements(&self, node: NodeId, out: &mut Vec<NodeId>) {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || {
            if matches!(self.nodes[node.0].data, NodeData::Element(_)) {
                out.push(node);
            }
            for child in &self.nodes[node.0].children {
                self.collect_elements(*child, out);
            }
        })
    }

    /// Serializes the subtree with attributes in name order.
    pub(crate) fn dump_node(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_markup(node, &mut out);
        out
    }

    fn write_markup(&self, node: NodeId, out: &mut String) {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || {
            let children = &self.nodes[node.0].children;
            match &self.nodes[node.0].data {
                NodeData::Text(text) => out.push_str(text),
                NodeData::Document => {
                    for child in children {
                        self.write_markup(*child, out);
                    }
                }
                NodeData::Element(element) => {
                    out.push('<');
                    out.push_str(&element.tag);
                    for (name, value) in &element.attrs {
                        out.push_str(&format!(" {name}=\"{value}\""));
                    }
                    out.push('>');
                    if is_void_tag(&element.tag) {
                        return;
                    }
                    for child in children {
                        self.write_markup(*child, out);
                    }
                    out.push_str(&format!("</{}>", element.tag));
                }
            }
        })
    }

    /// Short name for trace lines: `#id`, else `tag.class.list`.
    pub(crate) fn node_label(&self, node: NodeId) -> String {
        let Some(element) = self.element(node) else {
            return if node == self.root {
                "document".into()
            } else {
                format!("node-{}", node.0)
            };
        };
        if let Some(id) = element.attr("id").filter(|id| !id.is_empty()) {
            return format!("#{id}");
        }
        let mut label = element.tag.clone();
        for class in element.attr("class").unwrap_or_default().split_whitespace() {
            label.push('.');
            label.push_str(class);
        }
        label
    }
}

pub(crate) fn is_checkbox_input(dom: &Dom, node: NodeId) -> bool {
    dom.element(node).is_some_and(|element| element.is_input_of_type("checkbox"))
}

pub(crate) fn is_radio_input(dom: &Dom, node: NodeId) -> bool {
    dom.element(node).is_some_and(|element| element.is_input_of_type("radio"))
}

/// `<button>` defaults to submit; `<input>` only with `type=submit`.
pub(crate) fn is_submit_control(dom: &Dom, node: NodeId) -> bool {
    match dom.element(node) {
        Some(element) if element.tag == "button" => element
            .attr("type")
            .is_none_or(|kind| kind.eq_ignore_ascii_case("submit")),
        Some(element) => element.is_input_of_type("submit"),
        None => false,
    }
}

pub(crate) fn is_form_control(dom: &Dom, node: NodeId) -> bool {
    matches!(dom.tag_name(node), Some("input" | "select" | "textarea" | "button"))
}

pub(crate) fn is_void_tag(tag: &str) -> bool {
    matches!(
        tag,
        "area" | "base" | "br" | "col" | "embed" | "hr" | "img" | "input" | "link" | "meta"
            | "source" | "track" | "wbr"
    )
}

fn kebab_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for ch in name.chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
        }
        out.push(ch.to_ascii_lowercase());
    }
    out
}

/// Inline declarations in source order; a repeated property keeps its last
/// value at its first position.
fn inline_style(element: &Element) -> Vec<(String, String)> {
    let mut declarations: Vec<(String, String)> = Vec::new();
    for declaration in element.attr("style").unwrap_or_default().split(';') {
        let Some((name, value)) = declaration.split_once(':') else {
            continue;
        };
        let name = name.trim().to_ascii_lowercase();
        if name.is_empty() {
            continue;
        }
        let value = value.trim().to_string();
        match declarations.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = value,
            None => declarations.push((name, value)),
        }
    }
    declarations
}

pub(crate) fn truncate_chars(value: &str, max_chars: usize) -> String {
    match value.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &value[..cut]),
        None => value.to_string(),
    }
}
