//! Recency list
//!
//! Slab-backed doubly-linked list ordered from least-recently-used (front)
//! to most-recently-used (back). Nodes are addressed by slot index so the
//! store's hash index can point straight at them.

/// One entry in the list, carrying its payload and accounted cost
#[derive(Debug)]
pub(crate) struct Node {
    pub key: String,
    pub value: String,
    pub cost: usize,
    prev: Option<usize>,
    next: Option<usize>,
}

#[derive(Debug, Default)]
pub(crate) struct RecencyList {
    slots: Vec<Option<Node>>,
    free: Vec<usize>,
    /// Least recently used
    head: Option<usize>,
    /// Most recently used
    tail: Option<usize>,
    len: usize,
}

impl RecencyList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn get(&self, idx: usize) -> Option<&Node> {
        self.slots.get(idx).and_then(|slot| slot.as_ref())
    }

    pub fn get_mut(&mut self, idx: usize) -> Option<&mut Node> {
        self.slots.get_mut(idx).and_then(|slot| slot.as_mut())
    }

    /// Slot of the least-recently-used node
    pub fn front(&self) -> Option<usize> {
        self.head
    }

    /// Insert at the most-recently-used end, returning the slot index
    pub fn push_back(&mut self, key: String, value: String, cost: usize) -> usize {
        let node = Node {
            key,
            value,
            cost,
            prev: None,
            next: None,
        };

        let idx = match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Some(node);
                idx
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        };

        self.link_back(idx);
        self.len += 1;
        idx
    }

    /// Move an existing node to the most-recently-used end
    pub fn move_to_back(&mut self, idx: usize) {
        if self.tail == Some(idx) {
            return;
        }
        self.unlink(idx);
        self.link_back(idx);
    }

    /// Remove a node and hand back its contents
    pub fn remove(&mut self, idx: usize) -> Option<Node> {
        self.get(idx)?;
        self.unlink(idx);
        let node = self.slots[idx].take();
        self.free.push(idx);
        self.len -= 1;
        node
    }

    /// Remove the least-recently-used node
    pub fn pop_front(&mut self) -> Option<Node> {
        let idx = self.front()?;
        self.remove(idx)
    }

    /// Iterate from most-recently-used to least-recently-used
    pub fn iter_mru(&self) -> MruIter<'_> {
        MruIter {
            list: self,
            cursor: self.tail,
        }
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = match self.get(idx) {
            Some(node) => (node.prev, node.next),
            None => return,
        };

        match prev {
            Some(p) => {
                if let Some(node) = self.get_mut(p) {
                    node.next = next;
                }
            }
            None => self.head = next,
        }
        match next {
            Some(n) => {
                if let Some(node) = self.get_mut(n) {
                    node.prev = prev;
                }
            }
            None => self.tail = prev,
        }

        if let Some(node) = self.get_mut(idx) {
            node.prev = None;
            node.next = None;
        }
    }

    fn link_back(&mut self, idx: usize) {
        let old_tail = self.tail;
        if let Some(node) = self.get_mut(idx) {
            node.prev = old_tail;
            node.next = None;
        }
        match old_tail {
            Some(t) => {
                if let Some(node) = self.get_mut(t) {
                    node.next = Some(idx);
                }
            }
            None => self.head = Some(idx),
        }
        self.tail = Some(idx);
    }
}

pub(crate) struct MruIter<'a> {
    list: &'a RecencyList,
    cursor: Option<usize>,
}

impl<'a> Iterator for MruIter<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.list.get(self.cursor?)?;
        self.cursor = node.prev;
        Some(node)
    }
}
