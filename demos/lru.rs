use std::collections::HashMap;
use std::hash::Hash;

use slablist::{List, Slot};

/// Least-recently-used cache: a hash map from key to slot, and a list
/// ordered from most to least recently used.
struct Lru<K, V> {
    index: HashMap<K, Slot>,
    order: List<(K, V)>,
}

impl<K: Hash + Eq + Clone, V> Lru<K, V> {
    fn new(capacity: usize) -> Result<Self, slablist::Error> {
        Ok(Self {
            index: HashMap::with_capacity(capacity),
            order: List::with_capacity(capacity)?,
        })
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        let slot = *self.index.get(key)?;
        let entry = self.order.remove(slot).ok()?;
        // The slot just freed is the one handed back, so this can't fail.
        let slot = self.order.push_front(entry).ok()?;
        self.index.insert(key.clone(), slot);
        self.order.get(slot).ok().map(|(_, v)| v)
    }

    fn put(&mut self, key: K, value: V) -> Result<Option<(K, V)>, slablist::Error> {
        let mut evicted = None;
        if let Some(slot) = self.index.remove(&key) {
            self.order.remove(slot)?;
        } else if self.order.is_full() {
            if let Some((old_key, old_value)) = self.order.pop_back() {
                self.index.remove(&old_key);
                evicted = Some((old_key, old_value));
            }
        }
        let slot = self.order.push_front((key.clone(), value))?;
        self.index.insert(key, slot);
        Ok(evicted)
    }

    fn keys(&self) -> impl Iterator<Item = &K> {
        self.order.iter().map(|(k, _)| k)
    }
}

fn main() -> Result<(), slablist::Error> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let mut cache = Lru::new(3)?;
    cache.put("a", 1)?;
    cache.put("b", 2)?;
    cache.put("c", 3)?;
    println!("get a: {:?}", cache.get(&"a"));

    if let Some((key, value)) = cache.put("d", 4)? {
        println!("evicted {} = {}", key, value);
    }
    println!("most to least recent: {:?}", cache.keys().collect::<Vec<_>>());
    Ok(())
}
