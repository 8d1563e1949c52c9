use std::collections::HashMap;
use std::sync::Arc;

/// Shared, immutable text such as a spell description. Clones are cheap and
/// the text outlives any single spell table that refers to it.
pub type DynamicString = Arc<str>;

/// Deduplicating interner for descriptions read from `spells.dat`.
#[derive(Debug, Default)]
pub struct StringPool {
    strings: HashMap<Box<str>, DynamicString>,
}

impl StringPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the pooled copy of `text`, adding it on first use. The empty
    /// string is never pooled.
    pub fn add(&mut self, text: &str) -> DynamicString {
        if text.is_empty() {
            return Arc::from("");
        }
        if let Some(existing) = self.strings.get(text) {
            return Arc::clone(existing);
        }
        let shared: DynamicString = Arc::from(text);
        self.strings.insert(Box::from(text), Arc::clone(&shared));
        shared
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_empty_string_is_not_pooled() {
        let mut pool = StringPool::new();
        assert_eq!(pool.add("").as_ref(), "");
        assert!(pool.is_empty());
    }

    #[test]
    fn repeated_text_shares_storage() {
        let mut pool = StringPool::new();
        let first = pool.add("Get Item");
        let second = pool.add("Get Item");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn pooled_text_outlives_pool() {
        let text = {
            let mut pool = StringPool::new();
            pool.add("Light Healing")
        };
        assert_eq!(text.as_ref(), "Light Healing");
    }
}
