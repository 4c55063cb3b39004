use crate::model::PathOptions;
use crate::paths::{EdgePath, PathParams};
use std::collections::{HashMap, HashSet};

/// Everything a built-in path depends on.
#[derive(Clone, Debug, PartialEq)]
pub struct PathKey {
    pub edge_type: String,
    pub params: PathParams,
    pub options: PathOptions,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MemoStats {
    pub hits: u64,
    pub misses: u64,
}

/// Last computed path per edge id. An entry is reused only while its key
/// compares equal to the current inputs.
#[derive(Debug, Default)]
pub struct PathMemo {
    entries: HashMap<String, (PathKey, EdgePath)>,
    stats: MemoStats,
}

impl PathMemo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_compute(&mut self, edge_id: &str, key: PathKey, compute: impl FnOnce() -> EdgePath) -> EdgePath {
        if let Some((k, path)) = self.entries.get(edge_id) {
            if *k == key {
                self.stats.hits += 1;
                return path.clone();
            }
        }
        self.stats.misses += 1;
        let path = compute();
        self.entries.insert(edge_id.to_string(), (key, path.clone()));
        path
    }

    /// Drop entries for edges not in `live`.
    pub fn retain(&mut self, live: &HashSet<&str>) {
        self.entries.retain(|id, _| live.contains(id.as_str()));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> MemoStats {
        self.stats
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Position;
    use crate::paths::straight_path;

    fn key(tx: f32) -> PathKey {
        PathKey {
            edge_type: "straight".into(),
            params: PathParams::new(0.0, 0.0, Position::Right, tx, 0.0, Position::Left),
            options: PathOptions::default(),
        }
    }

    #[test]
    fn equal_inputs_hit() {
        let mut memo = PathMemo::new();
        let k = key(100.0);
        let a = memo.get_or_compute("e", k.clone(), || straight_path(&k.params));
        let b = memo.get_or_compute("e", k.clone(), || panic!("recomputed"));
        assert_eq!(a, b);
        assert_eq!(memo.stats(), MemoStats { hits: 1, misses: 1 });
    }

    #[test]
    fn changed_inputs_recompute() {
        let mut memo = PathMemo::new();
        let k1 = key(100.0);
        let k2 = key(200.0);
        memo.get_or_compute("e", k1.clone(), || straight_path(&k1.params));
        let p = memo.get_or_compute("e", k2.clone(), || straight_path(&k2.params));
        assert_eq!(p.path, "M0,0 L200,0");
        assert_eq!(memo.stats().misses, 2);
    }

    #[test]
    fn retain_drops_dead_edges() {
        let mut memo = PathMemo::new();
        let k = key(1.0);
        memo.get_or_compute("a", k.clone(), || straight_path(&k.params));
        memo.get_or_compute("b", k.clone(), || straight_path(&k.params));
        memo.retain(&["a"].into_iter().collect());
        assert_eq!(memo.len(), 1);
    }
}
