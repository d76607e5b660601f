//! # Alive Lists
//!
//! Intrusive doubly-linked lists threaded through slot arrays.
//!
//! Each slot embeds a [`ListNode`]; the list itself only stores head, tail
//! and length. Links are slot indices rather than pointers, so a slot can be
//! unlinked in O(1) while the slot array stays a plain `Vec`.

/// Next/previous links embedded in a slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ListNode {
    next: Option<u32>,
    prev: Option<u32>,
}

impl ListNode {
    /// Index of the following slot in the list.
    #[inline]
    #[must_use]
    pub const fn next(&self) -> Option<u32> {
        self.next
    }

    /// Index of the preceding slot in the list.
    #[inline]
    #[must_use]
    pub const fn prev(&self) -> Option<u32> {
        self.prev
    }
}

/// A slot type that embeds a [`ListNode`].
pub trait Linked {
    /// The embedded node.
    fn node(&self) -> &ListNode;
    /// The embedded node, mutably.
    fn node_mut(&mut self) -> &mut ListNode;
}

/// Head/tail bookkeeping for one intrusive list.
///
/// The list does not own the slots; every operation takes the slot array
/// the indices refer to. Callers guarantee an index is linked at most once.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AliveList {
    head: Option<u32>,
    tail: Option<u32>,
    len: usize,
}

impl AliveList {
    /// Creates an empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            head: None,
            tail: None,
            len: 0,
        }
    }

    /// First linked slot.
    #[inline]
    #[must_use]
    pub const fn head(&self) -> Option<u32> {
        self.head
    }

    /// Last linked slot.
    #[inline]
    #[must_use]
    pub const fn tail(&self) -> Option<u32> {
        self.tail
    }

    /// Number of linked slots.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether no slot is linked.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Appends `index` at the tail. O(1).
    pub fn push_back<L: Linked>(&mut self, slots: &mut [L], index: u32) {
        *slots[index as usize].node_mut() = ListNode {
            next: None,
            prev: self.tail,
        };

        match self.tail {
            Some(tail) => slots[tail as usize].node_mut().next = Some(index),
            None => self.head = Some(index),
        }

        self.tail = Some(index);
        self.len += 1;
    }

    /// Removes `index` from the list and clears its links. O(1).
    pub fn unlink<L: Linked>(&mut self, slots: &mut [L], index: u32) {
        let ListNode { next, prev } = *slots[index as usize].node();

        match prev {
            Some(prev) => slots[prev as usize].node_mut().next = next,
            None => self.head = next,
        }
        match next {
            Some(next) => slots[next as usize].node_mut().prev = prev,
            None => self.tail = prev,
        }

        *slots[index as usize].node_mut() = ListNode::default();
        self.len -= 1;
    }

    /// Forgets every link. Slots keep stale nodes until relinked.
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Walks the list from head to tail, yielding slot indices.
    pub fn iter<'a, L: Linked>(&self, slots: &'a [L]) -> Iter<'a, L> {
        Iter {
            slots,
            cursor: self.head,
        }
    }
}

/// Iterator over the slot indices of an [`AliveList`].
pub struct Iter<'a, L> {
    slots: &'a [L],
    cursor: Option<u32>,
}

impl<L: Linked> Iterator for Iter<'_, L> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        let index = self.cursor?;
        self.cursor = self.slots[index as usize].node().next;
        Some(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Slot {
        node: ListNode,
    }

    impl Linked for Slot {
        fn node(&self) -> &ListNode {
            &self.node
        }
        fn node_mut(&mut self) -> &mut ListNode {
            &mut self.node
        }
    }

    fn slots(count: usize) -> Vec<Slot> {
        (0..count).map(|_| Slot::default()).collect()
    }

    #[test]
    fn test_push_preserves_insertion_order() {
        let mut slots = slots(4);
        let mut list = AliveList::new();
        for index in [2, 0, 3] {
            list.push_back(&mut slots, index);
        }

        assert_eq!(list.iter(&slots).collect::<Vec<_>>(), vec![2, 0, 3]);
        assert_eq!(list.head(), Some(2));
        assert_eq!(list.tail(), Some(3));
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_unlink_middle_head_and_tail() {
        let mut slots = slots(5);
        let mut list = AliveList::new();
        for index in 0..5 {
            list.push_back(&mut slots, index);
        }

        list.unlink(&mut slots, 2);
        assert_eq!(list.iter(&slots).collect::<Vec<_>>(), vec![0, 1, 3, 4]);
        assert_eq!(slots[2].node, ListNode::default());

        list.unlink(&mut slots, 0);
        list.unlink(&mut slots, 4);
        assert_eq!(list.iter(&slots).collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(list.head(), Some(1));
        assert_eq!(list.tail(), Some(3));

        list.unlink(&mut slots, 1);
        list.unlink(&mut slots, 3);
        assert!(list.is_empty());
        assert_eq!(list.head(), None);
        assert_eq!(list.tail(), None);
    }

    #[test]
    fn test_relink_after_unlink() {
        let mut slots = slots(2);
        let mut list = AliveList::new();
        list.push_back(&mut slots, 0);
        list.push_back(&mut slots, 1);
        list.unlink(&mut slots, 0);
        list.push_back(&mut slots, 0);

        assert_eq!(list.iter(&slots).collect::<Vec<_>>(), vec![1, 0]);
        assert_eq!(slots[0].node.prev(), Some(1));
        assert_eq!(slots[1].node.next(), Some(0));
    }
}
