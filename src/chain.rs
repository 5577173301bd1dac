//! Singly linked list of key-value nodes backing one bucket of a
//! [`SeparateChainingMap`](crate::SeparateChainingMap).

/// A node owned by exactly one chain
#[derive(Debug, Clone)]
struct Node<V> {
    /// The key of the entry
    key: String,
    /// The value associated with the key
    value: V,
    /// The rest of the chain
    next: Option<Box<Node<V>>>,
}

/// An ordered sequence of key-value nodes with unique keys.
///
/// New keys are appended at the tail, so iteration yields entries in insertion
/// order.
#[derive(Debug, Clone)]
pub struct Chain<V> {
    /// First node, if any
    head: Option<Box<Node<V>>>,
    /// Number of nodes
    len: usize,
}

impl<V> Default for Chain<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Chain<V> {
    /// Creates an empty chain
    #[must_use]
    pub fn new() -> Self {
        Self { head: None, len: 0 }
    }

    /// Returns the number of nodes in the chain
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the chain has no nodes
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Returns the value stored under `key`
    #[must_use]
    pub fn contains(&self, key: &str) -> Option<&V> {
        self.iter().find(|(k, _)| *k == key).map(|(_, value)| value)
    }

    /// Returns a mutable reference to the value stored under `key`
    pub fn contains_mut(&mut self, key: &str) -> Option<&mut V> {
        let mut cursor = self.head.as_deref_mut();
        while let Some(node) = cursor {
            if node.key == key {
                return Some(&mut node.value);
            }
            cursor = node.next.as_deref_mut();
        }
        None
    }

    /// Appends a node at the tail without checking for an existing key
    pub fn insert(&mut self, key: String, value: V) {
        let mut tail = &mut self.head;
        while let Some(node) = tail {
            tail = &mut node.next;
        }
        *tail = Some(Box::new(Node { key, value, next: None }));
        self.len = self.len.saturating_add(1);
    }

    /// Unlinks the node holding `key` and returns its value
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let mut cursor = &mut self.head;
        while cursor.as_ref().is_some_and(|node| node.key != key) {
            cursor = &mut cursor.as_mut()?.next;
        }

        let node = cursor.take()?;
        let Node { value, next, .. } = *node;
        *cursor = next;
        self.len = self.len.saturating_sub(1);
        Some(value)
    }

    /// Detaches the first node
    fn pop_front(&mut self) -> Option<(String, V)> {
        let node = self.head.take()?;
        let Node { key, value, next } = *node;
        self.head = next;
        self.len = self.len.saturating_sub(1);
        Some((key, value))
    }

    /// Returns an iterator over the nodes from head to tail
    #[must_use]
    pub fn iter(&self) -> Iter<'_, V> {
        Iter { next: self.head.as_deref() }
    }
}

impl<V> Drop for Chain<V> {
    fn drop(&mut self) {
        // Unlink iteratively so long chains do not recurse through Box drops.
        let mut cursor = self.head.take();
        while let Some(mut node) = cursor {
            cursor = node.next.take();
        }
    }
}

/// Borrowing iterator over a [`Chain`]
#[derive(Debug)]
pub struct Iter<'a, V> {
    /// Node to yield next
    next: Option<&'a Node<V>>,
}

impl<V> Default for Iter<'_, V> {
    fn default() -> Self {
        Self { next: None }
    }
}

impl<V> Clone for Iter<'_, V> {
    fn clone(&self) -> Self {
        Self { next: self.next }
    }
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.next?;
        self.next = node.next.as_deref();
        Some((node.key.as_str(), &node.value))
    }
}

impl<'a, V> IntoIterator for &'a Chain<V> {
    type Item = (&'a str, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Owning iterator that drains a [`Chain`] from head to tail
#[derive(Debug)]
pub struct IntoIter<V> {
    /// Remaining nodes
    chain: Chain<V>,
}

impl<V> Iterator for IntoIter<V> {
    type Item = (String, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.chain.pop_front()
    }
}

impl<V> IntoIterator for Chain<V> {
    type Item = (String, V);
    type IntoIter = IntoIter<V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { chain: self }
    }
}
