use super::event::KeyPress;

/// Ctrl+Enter (Cmd+Enter on macOS) submits the search from the query field.
pub(crate) fn is_submit_shortcut(key: &KeyPress) -> bool {
    key.key == "Enter" && key.has_platform_modifier()
}

/// Text a textarea inserts for an unhandled key press. Modified presses and
/// named keys other than Enter insert nothing.
pub(crate) fn inserted_text(key: &KeyPress) -> Option<String> {
    if key.has_platform_modifier() || key.alt {
        return None;
    }
    if key.key == "Enter" {
        return Some("\n".into());
    }
    let mut chars = key.key.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Some(ch.to_string()),
        _ => None,
    }
}
