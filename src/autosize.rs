use super::config::{ControllerConfig, LayoutMetrics};
use super::dom::{Dom, NodeId};
use super::*;

/// Height decision for one measurement of the query field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutosizeOutcome {
    pub scroll_height: i64,
    pub height: i64,
    pub overflowing: bool,
}

impl AutosizeOutcome {
    pub fn fit(scroll_height: i64, ceiling: i64) -> Self {
        if scroll_height <= ceiling {
            Self {
                scroll_height,
                height: scroll_height,
                overflowing: false,
            }
        } else {
            Self {
                scroll_height,
                height: ceiling,
                overflowing: true,
            }
        }
    }
}

pub(crate) fn measure_scroll_height(dom: &Dom, layout: &LayoutMetrics, field: NodeId) -> Result<i64> {
    Ok(layout.scroll_height(&dom.value(field)?))
}

/// Resets the field to its intrinsic height, measures it and clamps the
/// rendered height to the ceiling, marking the field when it overflows.
pub(crate) fn adjust_height(
    dom: &mut Dom,
    config: &ControllerConfig,
    field: NodeId,
) -> Result<AutosizeOutcome> {
    dom.style_set(field, "height", "auto")?;
    let scroll_height = measure_scroll_height(dom, &config.layout, field)?;
    let outcome = AutosizeOutcome::fit(scroll_height, config.max_query_height);
    dom.style_set(field, "height", &format!("{}px", outcome.height))?;
    dom.class_set(field, &config.contract.overflow_class, outcome.overflowing)?;
    Ok(outcome)
}
