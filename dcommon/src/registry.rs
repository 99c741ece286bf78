use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

/// Hash map that remembers the order keys were first inserted in.
///
/// The in-memory stores list sessions in creation order, which a plain `HashMap` loses.
#[derive(Debug, Clone)]
pub struct Registry<K, V> {
    values: HashMap<K, V>,
    arrival: Vec<K>,
}

impl<K, V> Default for Registry<K, V> {
    fn default() -> Self {
        Self {
            values: HashMap::new(),
            arrival: Vec::new(),
        }
    }
}

impl<K, V> Registry<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value`, returning the one it replaced. Replacing keeps the original position.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.values.get_mut(&key) {
            Some(slot) => Some(std::mem::replace(slot, value)),
            None => {
                self.arrival.push(key.clone());
                self.values.insert(key, value);
                None
            }
        }
    }

    pub fn get_or_insert_with(&mut self, key: K, make: impl FnOnce() -> V) -> &mut V {
        if !self.values.contains_key(&key) {
            self.arrival.push(key.clone());
        }
        self.values.entry(key).or_insert_with(make)
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.values.get(key)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.values.get_mut(key)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.values.contains_key(key)
    }

    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        let value = self.values.remove(key)?;
        let position = self
            .arrival
            .iter()
            .position(|known| <K as Borrow<Q>>::borrow(known) == key);
        if let Some(position) = position {
            self.arrival.remove(position);
        }
        Some(value)
    }

    pub fn keys(&self) -> std::slice::Iter<'_, K> {
        self.arrival.iter()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.arrival
            .iter()
            .filter_map(move |key| self.values.get(key).map(|value| (key, value)))
    }

    pub fn len(&self) -> usize {
        self.arrival.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arrival.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::Registry;

    #[test]
    fn iteration_follows_first_insertion() {
        let mut registry = Registry::new();
        registry.insert("z", 1);
        registry.insert("m", 2);
        assert_eq!(registry.insert("z", 3), Some(1));

        let pairs = registry.iter().map(|(k, v)| (*k, *v)).collect::<Vec<_>>();
        assert_eq!(pairs, vec![("z", 3), ("m", 2)]);
    }

    #[test]
    fn lazy_insert_only_runs_for_new_keys() {
        let mut registry: Registry<String, Vec<u8>> = Registry::new();
        registry.get_or_insert_with("a".into(), Vec::new).push(1);
        registry
            .get_or_insert_with("a".into(), || panic!("already present"))
            .push(2);

        assert_eq!(registry.get("a"), Some(&vec![1, 2]));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn removal_forgets_the_position() {
        let mut registry = Registry::new();
        registry.insert("one".to_string(), ());
        registry.insert("two".to_string(), ());

        assert_eq!(registry.remove("one"), Some(()));
        assert_eq!(registry.remove("one"), None);
        assert!(!registry.contains_key("one"));
        assert_eq!(registry.keys().collect::<Vec<_>>(), vec!["two"]);

        registry.insert("one".to_string(), ());
        assert_eq!(registry.keys().collect::<Vec<_>>(), vec!["two", "one"]);
    }
}
