//! Recency list: doubly-linked MRU → LRU order over an entry arena
//!
//! Entries live in `nodes` and are addressed by `EntryId`. The list is the
//! only owner of entries; the hash index holds ids, never entries.

use strindex::Result;

#[cfg(test)]
thread_local! {
    static FAIL_NEXT_RESERVE: std::cell::Cell<bool> = const { std::cell::Cell::new(false) };
}

/// Make the next `RecencyList::reserve` on this thread fail
#[cfg(test)]
pub(crate) fn fail_next_reserve() {
    FAIL_NEXT_RESERVE.with(|flag| flag.set(true));
}

/// Stable handle to an entry slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct EntryId(usize);

/// One cached mapping plus its links
struct Entry<V> {
    key: String,
    value: V,
    prev: Option<usize>,
    next: Option<usize>,
    linked: bool,
}

/// Arena-backed doubly-linked list, head = most recently used
pub(crate) struct RecencyList<V> {
    nodes: Vec<Option<Entry<V>>>,
    head: Option<usize>,
    tail: Option<usize>,
    free_list: Vec<usize>,
    len: usize,
}

impl<V> RecencyList<V> {
    /// Create a list whose arena holds `slots` entries without growing
    pub fn with_slots(slots: usize) -> Result<Self> {
        let mut nodes = Vec::new();
        nodes.try_reserve_exact(slots)?;
        let mut free_list = Vec::new();
        free_list.try_reserve_exact(slots)?;

        Ok(Self {
            nodes,
            head: None,
            tail: None,
            free_list,
            len: 0,
        })
    }

    /// Make sure one `release` followed by one `alloc` cannot allocate
    pub fn reserve(&mut self) -> Result<()> {
        #[cfg(test)]
        if FAIL_NEXT_RESERVE.with(|flag| flag.replace(false)) {
            if let Err(e) = Vec::<u8>::new().try_reserve(usize::MAX) {
                return Err(e.into());
            }
        }

        self.free_list.try_reserve(1)?;
        if self.free_list.is_empty() {
            self.nodes.try_reserve(1)?;
        }
        Ok(())
    }

    /// Place a new, unlinked entry into a free slot
    pub fn alloc(&mut self, key: String, value: V) -> EntryId {
        let entry = Entry {
            key,
            value,
            prev: None,
            next: None,
            linked: false,
        };

        if let Some(idx) = self.free_list.pop() {
            self.nodes[idx] = Some(entry);
            EntryId(idx)
        } else {
            let idx = self.nodes.len();
            self.nodes.push(Some(entry));
            EntryId(idx)
        }
    }

    /// Free the slot of a detached entry, returning its key and value
    pub fn release(&mut self, id: EntryId) -> (String, V) {
        let entry = self.nodes[id.0].take().expect("release of a free slot");
        debug_assert!(!entry.linked, "release of a linked entry");
        self.free_list.push(id.0);
        (entry.key, entry.value)
    }

    /// Unlink `id` from wherever it sits
    pub fn detach(&mut self, id: EntryId) {
        let (prev, next) = {
            let node = self.node_mut(id.0);
            debug_assert!(node.linked, "detach of an unlinked entry");
            node.linked = false;
            (node.prev.take(), node.next.take())
        };

        match prev {
            Some(prev_idx) => self.node_mut(prev_idx).next = next,
            None => self.head = next,
        }

        match next {
            Some(next_idx) => self.node_mut(next_idx).prev = prev,
            None => self.tail = prev,
        }

        self.len -= 1;
    }

    /// Link an unlinked entry in as the new head
    pub fn push_front(&mut self, id: EntryId) {
        let old_head = self.head;
        {
            let node = self.node_mut(id.0);
            debug_assert!(!node.linked, "push_front of a linked entry");
            node.linked = true;
            node.prev = None;
            node.next = old_head;
        }

        match old_head {
            Some(head_idx) => self.node_mut(head_idx).prev = Some(id.0),
            None => self.tail = Some(id.0),
        }

        self.head = Some(id.0);
        self.len += 1;
    }

    /// Move a linked entry to the head without changing `len`
    pub fn promote(&mut self, id: EntryId) {
        if self.head == Some(id.0) {
            return;
        }
        self.detach(id);
        self.push_front(id);
    }

    pub fn head(&self) -> Option<EntryId> {
        self.head.map(EntryId)
    }

    pub fn tail(&self) -> Option<EntryId> {
        self.tail.map(EntryId)
    }

    pub fn key(&self, id: EntryId) -> &str {
        &self.node(id.0).key
    }

    pub fn value(&self, id: EntryId) -> &V {
        &self.node(id.0).value
    }

    pub fn value_mut(&mut self, id: EntryId) -> &mut V {
        &mut self.node_mut(id.0).value
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// Traverse head → tail
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            list: self,
            cursor: self.head,
            remaining: self.len,
        }
    }

    /// Drop every entry, keeping the arena allocation
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.free_list.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    fn node(&self, idx: usize) -> &Entry<V> {
        self.nodes[idx].as_ref().expect("dangling entry id")
    }

    fn node_mut(&mut self, idx: usize) -> &mut Entry<V> {
        self.nodes[idx].as_mut().expect("dangling entry id")
    }
}

/// Iterator over cache entries from most to least recently used
///
/// Created by [`LruCache::iter`](crate::LruCache::iter). Does not affect
/// recency.
pub struct Iter<'a, V> {
    list: &'a RecencyList<V>,
    cursor: Option<usize>,
    remaining: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.cursor?;
        let node = self.list.node(idx);
        self.cursor = node.next;
        self.remaining -= 1;
        Some((node.key.as_str(), &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys<V>(list: &RecencyList<V>) -> Vec<&str> {
        list.iter().map(|(k, _)| k).collect()
    }

    fn push(list: &mut RecencyList<u32>, key: &str, value: u32) -> EntryId {
        list.reserve().unwrap();
        let id = list.alloc(key.to_string(), value);
        list.push_front(id);
        id
    }

    #[test]
    fn test_list_push_front_order() {
        let mut list = RecencyList::with_slots(4).unwrap();
        push(&mut list, "a", 1);
        push(&mut list, "b", 2);
        push(&mut list, "c", 3);

        assert_eq!(keys(&list), vec!["c", "b", "a"]);
        assert_eq!(list.len(), 3);
        assert_eq!(list.key(list.tail().unwrap()), "a");
        assert_eq!(list.key(list.head().unwrap()), "c");
    }

    #[test]
    fn test_list_detach_positions() {
        let mut list = RecencyList::with_slots(4).unwrap();
        let a = push(&mut list, "a", 1);
        let b = push(&mut list, "b", 2);
        let c = push(&mut list, "c", 3);
        let d = push(&mut list, "d", 4);

        // middle
        list.detach(b);
        assert_eq!(keys(&list), vec!["d", "c", "a"]);

        // tail
        list.detach(a);
        assert_eq!(keys(&list), vec!["d", "c"]);
        assert_eq!(list.tail(), Some(c));

        // head
        list.detach(d);
        assert_eq!(keys(&list), vec!["c"]);
        assert_eq!(list.head(), Some(c));

        list.detach(c);
        assert_eq!(list.len(), 0);
        assert_eq!(list.head(), None);
        assert_eq!(list.tail(), None);
    }

    #[test]
    fn test_list_promote() {
        let mut list = RecencyList::with_slots(3).unwrap();
        let a = push(&mut list, "a", 1);
        push(&mut list, "b", 2);
        push(&mut list, "c", 3);

        list.promote(a);
        assert_eq!(keys(&list), vec!["a", "c", "b"]);
        assert_eq!(list.len(), 3);

        // promoting the head is a no-op
        list.promote(a);
        assert_eq!(keys(&list), vec!["a", "c", "b"]);
    }

    #[test]
    fn test_list_release_reuses_slot() {
        let mut list = RecencyList::with_slots(2).unwrap();
        let a = push(&mut list, "a", 1);
        push(&mut list, "b", 2);

        list.detach(a);
        assert_eq!(list.release(a), ("a".to_string(), 1));

        let c = push(&mut list, "c", 3);
        assert_eq!(c, a);
        assert_eq!(*list.value(c), 3);
        assert_eq!(keys(&list), vec!["c", "b"]);
    }

    #[test]
    fn test_list_iter_exact_size() {
        let mut list = RecencyList::with_slots(3).unwrap();
        push(&mut list, "a", 1);
        push(&mut list, "b", 2);

        let iter = list.iter();
        assert_eq!(iter.len(), 2);
        let values: Vec<_> = iter.map(|(_, v)| *v).collect();
        assert_eq!(values, vec![2, 1]);
    }

    #[test]
    fn test_list_clear() {
        let mut list = RecencyList::with_slots(3).unwrap();
        push(&mut list, "a", 1);
        push(&mut list, "b", 2);
        list.clear();

        assert_eq!(list.len(), 0);
        assert_eq!(list.iter().count(), 0);
        push(&mut list, "c", 3);
        assert_eq!(keys(&list), vec!["c"]);
    }
}
