//! Navigation tuning knobs.

/// Default maximum number of neighbours per graph node (4-connected grid).
pub const DEFAULT_MAX_NEIGHBOURS: usize = 4;
/// Default number of cells the nearest-node search may visit.
pub const DEFAULT_BFS_VISIT_CAP: usize = 20;
/// Default arrival distance, in world units.
pub const DEFAULT_ARRIVAL_THRESHOLD: f32 = 0.1;

/// Configuration shared by graph construction, nearest-node search and
/// path following.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NavConfig {
    /// Neighbour lists longer than this are truncated.
    pub max_neighbours: usize,
    /// Cells the nearest-node BFS may visit before giving up.
    pub bfs_visit_cap: usize,
    /// Distance under which an actor counts as having reached a path point.
    /// Compared squared.
    pub arrival_threshold: f32,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            max_neighbours: DEFAULT_MAX_NEIGHBOURS,
            bfs_visit_cap: DEFAULT_BFS_VISIT_CAP,
            arrival_threshold: DEFAULT_ARRIVAL_THRESHOLD,
        }
    }
}

impl NavConfig {
    pub fn with_max_neighbours(mut self, n: usize) -> Self {
        self.max_neighbours = n;
        self
    }

    pub fn with_bfs_visit_cap(mut self, cap: usize) -> Self {
        self.bfs_visit_cap = cap;
        self
    }

    pub fn with_arrival_threshold(mut self, threshold: f32) -> Self {
        self.arrival_threshold = threshold;
        self
    }

    /// Squared arrival threshold, the quantity actually compared.
    #[inline]
    pub fn arrival_threshold_squared(&self) -> f32 {
        self.arrival_threshold * self.arrival_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = NavConfig::default();
        assert_eq!(c.max_neighbours, 4);
        assert_eq!(c.bfs_visit_cap, 20);
        assert!((c.arrival_threshold_squared() - 0.01).abs() < 1e-6);
    }

    #[test]
    fn builder_overrides() {
        let c = NavConfig::default()
            .with_bfs_visit_cap(2)
            .with_max_neighbours(8)
            .with_arrival_threshold(0.5);
        assert_eq!(c.bfs_visit_cap, 2);
        assert_eq!(c.max_neighbours, 8);
        assert_eq!(c.arrival_threshold, 0.5);
    }
}
