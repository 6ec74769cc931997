use super::dom::NodeId;
use super::*;

/// Key and modifier state carried by a `keydown` event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyPress {
    pub key: String,
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
    pub alt: bool,
}

impl KeyPress {
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            ..Self::default()
        }
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn with_meta(mut self) -> Self {
        self.meta = true;
        self
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    /// Ctrl on most platforms, Cmd on macOS.
    pub fn has_platform_modifier(&self) -> bool {
        self.ctrl || self.meta
    }
}

#[derive(Debug, Clone)]
pub(crate) struct EventState {
    pub(crate) event_type: String,
    pub(crate) target: NodeId,
    pub(crate) current_target: NodeId,
    pub(crate) key: Option<KeyPress>,
    pub(crate) default_prevented: bool,
    pub(crate) propagation_stopped: bool,
}

impl EventState {
    pub(crate) fn new(event_type: &str, target: NodeId) -> Self {
        Self {
            event_type: event_type.to_string(),
            target,
            current_target: target,
            key: None,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    pub(crate) fn with_key(mut self, key: KeyPress) -> Self {
        self.key = Some(key);
        self
    }

    pub(crate) fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub(crate) fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }
}

/// Controller behavior bound to a node/event pair. Each variant is one
/// handler of the page controller; its payload names the nodes the handler
/// was registered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Handler {
    ScopeChanged,
    DocumentClick,
    MenuClick,
    GroupAllChanged { menu: NodeId },
    GroupItemChanged { menu: NodeId },
    SingleBookChipClick,
    FormSubmit,
    QueryInput,
    QueryKeydown,
    ClearResults,
    ExpandToggle,
    FullTextLink,
    RateLimitBackdrop { overlay: NodeId },
    RateLimitDismiss { overlay: NodeId },
}

#[derive(Debug, Clone)]
pub(crate) struct Listener {
    pub(crate) capture: bool,
    pub(crate) handler: Handler,
}

#[derive(Debug, Default, Clone)]
pub(crate) struct ListenerStore {
    map: HashMap<NodeId, HashMap<String, Vec<Listener>>>,
}

impl ListenerStore {
    pub(crate) fn add(&mut self, node_id: NodeId, event: &str, listener: Listener) {
        let listeners = self
            .map
            .entry(node_id)
            .or_default()
            .entry(event.to_string())
            .or_default();
        // Same handler registered twice on one node is a no-op, like addEventListener.
        if listeners
            .iter()
            .any(|existing| existing.capture == listener.capture && existing.handler == listener.handler)
        {
            return;
        }
        listeners.push(listener);
    }

    pub(crate) fn retain_nodes(&mut self, mut keep: impl FnMut(NodeId) -> bool) {
        self.map.retain(|node_id, _| keep(*node_id));
    }

    pub(crate) fn get(&self, node_id: NodeId, event: &str, capture: bool) -> Vec<Listener> {
        self.map
            .get(&node_id)
            .and_then(|events| events.get(event))
            .map(|listeners| {
                listeners
                    .iter()
                    .filter(|listener| listener.capture == capture)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    pub(crate) fn count(&self, event: &str) -> usize {
        self.map
            .values()
            .filter_map(|events| events.get(event))
            .map(Vec::len)
            .sum()
    }
}
