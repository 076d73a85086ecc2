//! In-memory local repository implementation.
//!
//! Points live in a `Vec` behind a `parking_lot::RwLock`. Appends take the
//! write lock for the duration of a single `push`; snapshots take the read lock
//! just long enough to clone the vector, so rendering never holds the lock.

use parking_lot::RwLock;
use std::sync::Arc;

use crate::db::repository::PointRepository;
use crate::models::Point;

/// In-memory point store.
///
/// Cloning is cheap and every clone shares the same underlying sequence.
///
/// # Example
/// ```
/// use demo_server::db::repositories::LocalPointStore;
/// use demo_server::db::repository::PointRepository;
/// use demo_server::models::Point;
///
/// let store = LocalPointStore::new();
/// store.append(Point::new(0.25, -0.25, true));
/// assert_eq!(store.snapshot(), vec![Point::new(0.25, -0.25, true)]);
/// ```
#[derive(Clone, Default)]
pub struct LocalPointStore {
    points: Arc<RwLock<Vec<Point>>>,
}

impl LocalPointStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl PointRepository for LocalPointStore {
    fn append(&self, point: Point) {
        self.points.write().push(point);
    }

    fn snapshot(&self) -> Vec<Point> {
        self.points.read().clone()
    }

    fn len(&self) -> usize {
        self.points.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_store_is_empty() {
        let store = LocalPointStore::new();
        assert!(store.is_empty());
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn test_append_preserves_order_and_duplicates() {
        let store = LocalPointStore::new();
        let a = Point::new(1.0, 2.0, false);
        let b = Point::new(-1.0, 0.5, true);
        store.append(a);
        store.append(b);
        store.append(a);

        assert_eq!(store.snapshot(), vec![a, b, a]);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_snapshot_is_detached_from_later_appends() {
        let store = LocalPointStore::new();
        store.append(Point::new(0.0, 0.0, false));
        let before = store.snapshot();
        store.append(Point::new(1.0, 1.0, true));

        assert_eq!(before.len(), 1);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_clones_share_storage() {
        let store = LocalPointStore::new();
        let other = store.clone();
        other.append(Point::new(0.1, 0.2, true));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_concurrent_appends_are_not_lost() {
        let store = LocalPointStore::new();
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for i in 0..250 {
                        store.append(Point::new(t as f64, i as f64, i % 2 == 0));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = store.snapshot();
        assert_eq!(snapshot.len(), 2000);
        // Each writer's points keep their relative order.
        for t in 0..8 {
            let ys: Vec<f64> = snapshot
                .iter()
                .filter(|p| p.x == t as f64)
                .map(|p| p.y)
                .collect();
            assert!(ys.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
