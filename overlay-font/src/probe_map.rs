//! Open-addressing hash map with linear probing.
//!
//! Used for both the per-font glyph table and the font cache. The table grows
//! by a fixed increment once every slot is occupied and rehashes every entry
//! into the new slot array. There is no removal: glyphs and fonts live until
//! the owning table is dropped.

/// Hash used to choose the home slot of a key.
pub trait ProbeHash {
    fn probe_hash(&self) -> u64;
}

impl ProbeHash for u32 {
    #[inline]
    fn probe_hash(&self) -> u64 {
        *self as u64
    }
}

impl ProbeHash for (u16, u16) {
    #[inline]
    fn probe_hash(&self) -> u64 {
        ((self.0 as u64) << 16) | self.1 as u64
    }
}

/// FNV-1a over a byte string.
pub fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf29ce484222325;
    for &b in bytes {
        hash ^= b as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

/// A linear-probing map that grows by `grow_by` slots when full.
#[derive(Debug, Clone)]
pub struct ProbeMap<K, V> {
    slots: Vec<Option<(K, V)>>,
    len: usize,
    grow_by: usize,
}

impl<K: ProbeHash + Eq, V> ProbeMap<K, V> {
    /// Create a map with `capacity` slots that grows by `grow_by` when full.
    pub fn new(capacity: usize, grow_by: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            slots: (0..capacity).map(|_| None).collect(),
            len: 0,
            grow_by: grow_by.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.find(key)
            .and_then(|i| self.slots[i].as_ref())
            .map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let i = self.find(key)?;
        self.slots[i].as_mut().map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Insert a value, returning the previous value for the key if any.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        if let Some(i) = self.find(&key) {
            let slot = self.slots[i].as_mut().map(|(_, v)| v);
            return slot.map(|v| std::mem::replace(v, value));
        }

        if self.len == self.slots.len() {
            self.grow();
        }

        let i = self.free_slot_for(&key);
        self.slots[i] = Some((key, value));
        self.len += 1;
        None
    }

    /// Iterate entries in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.slots
            .iter()
            .filter_map(|s| s.as_ref().map(|(k, v)| (k, v)))
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, v)| v)
    }

    #[inline]
    fn home(&self, key: &K) -> usize {
        (key.probe_hash() % self.slots.len() as u64) as usize
    }

    fn find(&self, key: &K) -> Option<usize> {
        let cap = self.slots.len();
        let start = self.home(key);
        for step in 0..cap {
            let i = (start + step) % cap;
            match &self.slots[i] {
                Some((k, _)) if k == key => return Some(i),
                Some(_) => continue,
                None => return None,
            }
        }
        None
    }

    fn free_slot_for(&self, key: &K) -> usize {
        let cap = self.slots.len();
        let start = self.home(key);
        (0..cap)
            .map(|step| (start + step) % cap)
            .find(|&i| self.slots[i].is_none())
            .unwrap_or(start)
    }

    fn grow(&mut self) {
        let new_cap = self.slots.len() + self.grow_by;
        let old = std::mem::replace(&mut self.slots, (0..new_cap).map(|_| None).collect());
        self.len = 0;
        for (k, v) in old.into_iter().flatten() {
            let i = self.free_slot_for(&k);
            self.slots[i] = Some((k, v));
            self.len += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_get() {
        let mut map: ProbeMap<u32, &str> = ProbeMap::new(4, 2);
        assert!(map.is_empty());
        assert_eq!(map.insert(7, "seven"), None);
        assert_eq!(map.get(&7), Some(&"seven"));
        assert_eq!(map.get(&8), None);
        assert_eq!(map.insert(7, "SEVEN"), Some("seven"));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn colliding_keys_probe_forward() {
        let mut map: ProbeMap<u32, u32> = ProbeMap::new(4, 4);
        // 1, 5 and 9 all hash to slot 1 with capacity 4.
        map.insert(1, 10);
        map.insert(5, 50);
        map.insert(9, 90);
        assert_eq!(map.get(&1), Some(&10));
        assert_eq!(map.get(&5), Some(&50));
        assert_eq!(map.get(&9), Some(&90));
        assert_eq!(map.capacity(), 4);
    }

    #[test]
    fn full_table_grows_by_increment() {
        let mut map: ProbeMap<u32, u32> = ProbeMap::new(3, 2);
        for k in 0..3 {
            map.insert(k, k * 2);
        }
        assert_eq!(map.capacity(), 3);

        map.insert(3, 6);
        assert_eq!(map.capacity(), 5);
        assert_eq!(map.len(), 4);
        for k in 0..4 {
            assert_eq!(map.get(&k), Some(&(k * 2)));
        }
    }

    #[test]
    fn replacing_in_full_table_does_not_grow() {
        let mut map: ProbeMap<u32, u32> = ProbeMap::new(2, 2);
        map.insert(0, 0);
        map.insert(1, 1);
        map.insert(1, 11);
        assert_eq!(map.capacity(), 2);
        assert_eq!(map.get(&1), Some(&11));
    }

    #[test]
    fn get_mut_updates_in_place() {
        let mut map: ProbeMap<(u16, u16), f32> = ProbeMap::new(8, 8);
        map.insert((1, 2), 0.5);
        if let Some(v) = map.get_mut(&(1, 2)) {
            *v = -1.0;
        }
        assert_eq!(map.get(&(1, 2)), Some(&-1.0));
        assert!(!map.contains_key(&(2, 1)));
    }

    #[test]
    fn fnv_is_stable() {
        assert_eq!(fnv1a(b""), 0xcbf29ce484222325);
        assert_ne!(fnv1a(b"a"), fnv1a(b"b"));
    }
}
