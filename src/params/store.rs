use std::{
    any::Any,
    collections::HashMap,
    sync::{Arc, Mutex},
};

use crate::utils::lock;

type Object = Arc<dyn Any + Send + Sync>;

/// Process wide side channel for values that cannot travel inside route
/// params, such as callbacks or large models.
#[derive(Clone, Default)]
pub struct ObjectStore {
    objects: Arc<Mutex<HashMap<String, Object>>>,
}

impl ObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put<K: Into<String>, T: Any + Send + Sync>(&self, key: K, value: T) {
        lock(&self.objects).insert(key.into(), Arc::new(value));
    }

    pub fn get(&self, key: &str) -> Option<Object> {
        lock(&self.objects).get(key).cloned()
    }

    pub fn get_as<T: Any + Send + Sync>(&self, key: &str) -> Option<Arc<T>> {
        self.get(key)?.downcast::<T>().ok()
    }

    pub fn remove(&self, key: &str) -> Option<Object> {
        lock(&self.objects).remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        lock(&self.objects).contains_key(key)
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys = lock(&self.objects).keys().cloned().collect::<Vec<_>>();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        lock(&self.objects).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        lock(&self.objects).clear();
    }
}

impl std::fmt::Debug for ObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectStore")
            .field("keys", &self.keys())
            .finish()
    }
}
