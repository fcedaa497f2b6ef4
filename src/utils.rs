use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// [Szudzik pairing function][szudzik-pairing], with wrapping arithmetic.
///
/// ```text
/// (a, b) -> if (a<b) then (b^2 + a) else (a^2 + a + b)
/// ```
///
/// For small arguments this is a perfect pairing; once the squares overflow it
/// degrades into an ordinary (non-injective) mixing function, which is all the
/// node table needs.
///
/// [szudzik-pairing]: https://en.wikipedia.org/wiki/Pairing_function#Other_pairing_functions
pub fn pairing_szudzik(a: u64, b: u64) -> u64 {
    if a < b {
        b.wrapping_mul(b).wrapping_add(a)
    } else {
        a.wrapping_mul(a).wrapping_add(a).wrapping_add(b)
    }
}

/// Pairing function for two `u64` values.
pub fn pairing2(a: u64, b: u64) -> u64 {
    pairing_szudzik(a, b)
}

/// Pairing function for three `u64` values.
pub fn pairing3(a: u64, b: u64, c: u64) -> u64 {
    pairing2(pairing2(a, b), c)
}

/// Fold a sequence of values into one hash, order-sensitive.
pub fn pairing_seq(seed: u64, values: impl IntoIterator<Item = u64>) -> u64 {
    values.into_iter().fold(seed, pairing2)
}

/// Hash a leaf value (names, numbers) with the standard hasher.
pub fn std_hash<T: Hash + ?Sized>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

pub trait MyHash {
    /// Structural hash used to pick a bucket in the node table.
    fn hash(&self) -> u64;
}

impl<T: MyHash + ?Sized> MyHash for std::rc::Rc<T> {
    fn hash(&self) -> u64 {
        (**self).hash()
    }
}
