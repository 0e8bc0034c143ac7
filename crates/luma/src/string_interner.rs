use ahash::RandomState;
use std::collections::HashMap;
use std::hash::{BuildHasher, Hash, Hasher};

use crate::luma_vm::{LumaError, LumaResult};

/// Handle into the run's string storage. Ids are only meaningful against the
/// interner that issued them; equal content always yields equal ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StrId(u32);

/// Complete string interner - every string the run touches lives here: the
/// constant pool's literals, global names, and concat results. Content hash
/// lookup uses ahash. The whole store is released when the run's interner is
/// dropped.
pub struct StringInterner {
    strings: Vec<Box<str>>,

    // content hash -> ids mapping for deduplication
    map: HashMap<u64, Vec<StrId>, RandomState>,

    hashbuilder: RandomState,

    bytes_in_use: usize,
    max_bytes: usize,
}

impl StringInterner {
    pub fn new(max_bytes: usize) -> Self {
        StringInterner {
            strings: Vec::new(),
            map: HashMap::with_capacity_and_hasher(64, RandomState::new()),
            hashbuilder: RandomState::new(),
            bytes_in_use: 0,
            max_bytes,
        }
    }

    /// Intern a string - returns the existing id if already interned,
    /// stores a fresh buffer otherwise. Fails with `OutOfMemory` when the
    /// byte budget would be exceeded.
    pub fn intern(&mut self, s: &str) -> LumaResult<StrId> {
        let hash = self.hash_string(s);

        if let Some(ids) = self.map.get(&hash) {
            for &id in ids {
                if self.strings[id.0 as usize].as_ref() == s {
                    return Ok(id);
                }
            }
        }

        if self.bytes_in_use + s.len() > self.max_bytes {
            return Err(LumaError::OutOfMemory);
        }

        let id = StrId(self.strings.len() as u32);
        self.bytes_in_use += s.len();
        self.strings.push(Box::from(s));
        self.map.entry(hash).or_default().push(id);
        Ok(id)
    }

    pub fn get(&self, id: StrId) -> &str {
        &self.strings[id.0 as usize]
    }

    /// Concatenate two stored strings into a new owned buffer.
    pub fn concat(&mut self, left: StrId, right: StrId) -> LumaResult<StrId> {
        let mut buffer =
            String::with_capacity(self.get(left).len() + self.get(right).len());
        buffer.push_str(self.get(left));
        buffer.push_str(self.get(right));
        self.intern(&buffer)
    }

    #[inline]
    fn hash_string(&self, s: &str) -> u64 {
        let mut hasher = self.hashbuilder.build_hasher();
        s.hash(&mut hasher);
        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_deduplicates() {
        let mut interner = StringInterner::new(1024);
        let a = interner.intern("hello").unwrap();
        let b = interner.intern("hello").unwrap();
        let c = interner.intern("world").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(interner.get(a), "hello");
    }

    #[test]
    fn concat_produces_interned_result() {
        let mut interner = StringInterner::new(1024);
        let a = interner.intern("foo").unwrap();
        let b = interner.intern("bar").unwrap();
        let ab = interner.concat(a, b).unwrap();
        assert_eq!(interner.get(ab), "foobar");
        let direct = interner.intern("foobar").unwrap();
        assert_eq!(ab, direct);
    }

    #[test]
    fn byte_budget_is_enforced() {
        let mut interner = StringInterner::new(8);
        interner.intern("12345678").unwrap();
        assert_eq!(
            interner.intern("x").unwrap_err(),
            LumaError::OutOfMemory
        );
        // already-interned content still resolves
        assert!(interner.intern("12345678").is_ok());
    }
}
