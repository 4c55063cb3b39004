use crate::model::{ConnectionMode, HandleBounds, NodeHandleBounds};

fn non_empty(handles: &[HandleBounds]) -> Option<&[HandleBounds]> {
    if handles.is_empty() {
        None
    } else {
        Some(handles)
    }
}

/// Picks the handle an edge end attaches to.
///
/// Without a requested id the default (id-less) handle wins, otherwise the
/// first registered one. A requested id must match exactly; a miss yields
/// `None` and the edge waits for a later frame.
pub fn resolve_handle<'a>(handles: Option<&'a [HandleBounds]>, requested: Option<&str>) -> Option<&'a HandleBounds> {
    let handles = handles.and_then(non_empty)?;
    match requested {
        None => handles.iter().find(|h| h.id.is_none()).or_else(|| handles.first()),
        Some(id) => handles.iter().find(|h| h.id.as_deref() == Some(id)),
    }
}

/// Handles eligible as an edge's source end.
pub fn handles_for_source(bounds: &NodeHandleBounds) -> Option<&[HandleBounds]> {
    non_empty(&bounds.source)
}

/// Handles eligible as an edge's target end. Loose mode lets a node with no
/// target handles accept edges on its source handles.
pub fn handles_for_target(bounds: &NodeHandleBounds, mode: ConnectionMode) -> Option<&[HandleBounds]> {
    match mode {
        ConnectionMode::Strict => non_empty(&bounds.target),
        ConnectionMode::Loose => non_empty(&bounds.target).or_else(|| non_empty(&bounds.source)),
    }
}

/// Empty handle ids count as "no id".
pub fn normalize_handle_id(id: Option<&str>) -> Option<&str> {
    id.filter(|s| !s.is_empty())
}
