use std::collections::HashSet;
use tokio::sync::Mutex;

/// URLs already dispatched in this run. Membership only ever grows.
#[derive(Debug, Default)]
pub struct VisitedSet {
    inner: Mutex<HashSet<String>>,
    order: Mutex<Vec<String>>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check-not-present-then-insert as one step. Returns `true` for the
    /// caller that gets to dispatch `url`.
    pub async fn insert(&self, url: &str) -> bool {
        let mut visited = self.inner.lock().await;
        if visited.contains(url) {
            return false;
        }
        visited.insert(url.to_string());
        self.order.lock().await.push(url.to_string());
        true
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }

    /// Every URL in the order it was first inserted.
    pub async fn snapshot(&self) -> Vec<String> {
        self.order.lock().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_insert_is_write_once() {
        let visited = VisitedSet::new();
        assert!(visited.insert("http://x/a").await);
        assert!(!visited.insert("http://x/a").await);
        assert!(visited.insert("http://x/b").await);
        assert_eq!(visited.len().await, 2);
        assert_eq!(visited.snapshot().await, vec!["http://x/a", "http://x/b"]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_inserts_have_single_winner() {
        let visited = Arc::new(VisitedSet::new());
        let mut handles = Vec::new();

        for _ in 0..16 {
            let visited = visited.clone();
            handles.push(tokio::spawn(async move {
                let mut wins = 0;
                for i in 0..50 {
                    if visited.insert(&format!("http://x/{}", i)).await {
                        wins += 1;
                    }
                }
                wins
            }));
        }

        let mut total_wins = 0;
        for handle in handles {
            total_wins += handle.await.unwrap();
        }

        assert_eq!(total_wins, 50);
        assert_eq!(visited.len().await, 50);
        assert_eq!(visited.snapshot().await.len(), 50);
    }
}
