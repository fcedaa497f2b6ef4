use std::ops::Index;

use crate::utils::MyHash;

struct Entry<T> {
    value: T,
    hash: u64,
    next: Option<usize>,
}

/// Unique table: stores every distinct value exactly once.
///
/// Values are chained into `2^bits` buckets by their [`MyHash`]. Storage grows
/// on demand; entries are never removed, so indices stay valid for the
/// lifetime of the table.
pub struct Table<T> {
    data: Vec<Entry<T>>,
    buckets: Vec<Option<usize>>,
    bitmask: u64,
}

impl<T> Table<T> {
    /// Create a new table with `2^bits` buckets.
    pub fn new(bits: usize) -> Self {
        assert!(bits <= 24, "Bucket bits should be in the range 0..=24");

        let buckets_size = 1 << bits;
        let bitmask = (buckets_size - 1) as u64;

        Self {
            data: Vec::new(),
            buckets: vec![None; buckets_size],
            bitmask,
        }
    }

    /// Get the number of stored values.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get the number of buckets.
    pub fn buckets(&self) -> usize {
        self.buckets.len()
    }

    /// Get the reference to the value at the given index.
    pub fn value(&self, index: usize) -> &T {
        &self.data[index].value
    }

    /// Get the stored hash of the value at the given index.
    pub fn hash(&self, index: usize) -> u64 {
        self.data[index].hash
    }

    fn bucket_index(&self, hash: u64) -> usize {
        (hash & self.bitmask) as usize
    }
}

impl<T> Table<T>
where
    T: MyHash + Eq,
{
    /// Find the index of a value equal to `value`.
    pub fn find(&self, value: &T) -> Option<usize> {
        let hash = value.hash();
        let mut cursor = self.buckets[self.bucket_index(hash)];
        while let Some(index) = cursor {
            let entry = &self.data[index];
            if entry.hash == hash && &entry.value == value {
                return Some(index);
            }
            cursor = entry.next;
        }
        None
    }

    /// Put a value into the table and return its index.
    ///
    /// If an equal value is already stored, its index is returned and `value`
    /// is dropped. The flag tells whether a new entry was created.
    pub fn put(&mut self, value: T) -> (usize, bool) {
        if let Some(index) = self.find(&value) {
            return (index, false);
        }
        let hash = value.hash();
        let bucket = self.bucket_index(hash);
        let index = self.data.len();
        // New entries go to the front of the chain.
        self.data.push(Entry {
            value,
            hash,
            next: self.buckets[bucket],
        });
        self.buckets[bucket] = Some(index);
        (index, true)
    }
}

impl<T> Index<usize> for Table<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        self.value(index)
    }
}
