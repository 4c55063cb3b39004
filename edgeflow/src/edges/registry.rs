use super::components::{BezierEdge, EdgeComponent, SimpleBezierEdge, SmoothStepEdge, StraightEdge};
use std::collections::HashMap;
use std::rc::Rc;

/// Tag used for edges without a type, and for unknown types.
pub const DEFAULT_EDGE_TYPE: &str = "default";

/// Edge type tag -> component.
#[derive(Clone)]
pub struct EdgeTypeRegistry {
    components: HashMap<String, Rc<dyn EdgeComponent>>,
}

impl Default for EdgeTypeRegistry {
    fn default() -> Self {
        let mut r = EdgeTypeRegistry { components: HashMap::new() };
        r.register(DEFAULT_EDGE_TYPE, Rc::new(BezierEdge));
        r.register("bezier", Rc::new(BezierEdge));
        r.register("simplebezier", Rc::new(SimpleBezierEdge));
        r.register("step", Rc::new(SmoothStepEdge { sharp: true }));
        r.register("smoothstep", Rc::new(SmoothStepEdge { sharp: false }));
        r.register("straight", Rc::new(StraightEdge));
        r
    }
}

impl EdgeTypeRegistry {
    /// Registry with the built-in types.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a type or replaces an existing one, built-ins included.
    pub fn register(&mut self, tag: impl Into<String>, component: Rc<dyn EdgeComponent>) {
        self.components.insert(tag.into(), component);
    }

    pub fn get(&self, tag: &str) -> Option<Rc<dyn EdgeComponent>> {
        self.components.get(tag).cloned()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.components.contains_key(tag)
    }

    /// Registered tags, sorted.
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.components.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }
}
