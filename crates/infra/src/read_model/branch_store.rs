use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, RwLock};

use branchdesk_core::{Branch, DomainError, DomainResult};

/// Branch-isolated key/value store abstraction.
///
/// A record is only reachable through the branch it was written under.
pub trait BranchStore<K, V>: Send + Sync {
    fn get(&self, branch: Branch, key: &K) -> DomainResult<Option<V>>;
    fn upsert(&self, branch: Branch, key: K, value: V) -> DomainResult<()>;
    fn list(&self, branch: Branch) -> DomainResult<Vec<V>>;

    /// Every record across all branches (headquarters views).
    fn list_all(&self) -> DomainResult<Vec<V>> {
        let mut all = Vec::new();
        for branch in Branch::ALL {
            all.extend(self.list(branch)?);
        }
        Ok(all)
    }
}

impl<K, V, S> BranchStore<K, V> for Arc<S>
where
    S: BranchStore<K, V> + ?Sized,
{
    fn get(&self, branch: Branch, key: &K) -> DomainResult<Option<V>> {
        (**self).get(branch, key)
    }

    fn upsert(&self, branch: Branch, key: K, value: V) -> DomainResult<()> {
        (**self).upsert(branch, key, value)
    }

    fn list(&self, branch: Branch) -> DomainResult<Vec<V>> {
        (**self).list(branch)
    }
}

/// In-memory branch-isolated store. Last write wins.
#[derive(Debug)]
pub struct InMemoryBranchStore<K, V> {
    inner: RwLock<HashMap<(Branch, K), V>>,
}

impl<K, V> InMemoryBranchStore<K, V> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }
}

impl<K, V> Default for InMemoryBranchStore<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<T>(_: T) -> DomainError {
    DomainError::storage("branch store lock poisoned")
}

impl<K, V> BranchStore<K, V> for InMemoryBranchStore<K, V>
where
    K: Clone + Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn get(&self, branch: Branch, key: &K) -> DomainResult<Option<V>> {
        let map = self.inner.read().map_err(poisoned)?;
        Ok(map.get(&(branch, key.clone())).cloned())
    }

    fn upsert(&self, branch: Branch, key: K, value: V) -> DomainResult<()> {
        let mut map = self.inner.write().map_err(poisoned)?;
        map.insert((branch, key), value);
        Ok(())
    }

    fn list(&self, branch: Branch) -> DomainResult<Vec<V>> {
        let map = self.inner.read().map_err(poisoned)?;
        Ok(map
            .iter()
            .filter_map(|((b, _k), v)| if *b == branch { Some(v.clone()) } else { None })
            .collect())
    }
}
