//! Slot arena backing a tree.
//!
//! A [`NodeId`] is an index into the arena and is the identity of the node
//! occupying that slot. Replacing a node overwrites its slot in place, so the
//! identity seen by the parent never changes. Freed slots are recycled.

use core::ops::{Index, IndexMut};

use super::{
    NodeId,
    node::{Link, Node, Operation},
};
use crate::Vec;

pub(crate) struct Entry {
    pub node: Node,
    /// The node owning this one as an operand (or, for chain links, the
    /// chain head).
    pub parent: Option<NodeId>,
}

enum Slot {
    Occupied(Entry),
    Vacant,
}

#[derive(Default)]
pub(crate) struct Arena {
    slots: Vec<Slot>,
    free: Vec<NodeId>,
    live: usize,
}

impl Arena {
    pub fn alloc(&mut self, node: Node, parent: Option<NodeId>) -> NodeId {
        let entry = Slot::Occupied(Entry { node, parent });
        self.live += 1;
        match self.free.pop() {
            Some(id) => {
                self.slots[id.index()] = entry;
                id
            }
            None => {
                let id = NodeId::new(self.slots.len());
                self.slots.push(entry);
                id
            }
        }
    }

    /// Release a slot. Returns the entry that occupied it.
    pub fn free(&mut self, id: NodeId) -> Option<Entry> {
        let slot = self.slots.get_mut(id.index())?;
        match core::mem::replace(slot, Slot::Vacant) {
            Slot::Occupied(entry) => {
                self.live -= 1;
                self.free.push(id);
                Some(entry)
            }
            Slot::Vacant => None,
        }
    }

    /// Write `node` into the slot of `id`, returning the superseded node.
    pub fn replace(&mut self, id: NodeId, node: Node) -> Node {
        core::mem::replace(&mut self[id].node, node)
    }

    pub fn get(&self, id: NodeId) -> Option<&Entry> {
        match self.slots.get(id.index())? {
            Slot::Occupied(entry) => Some(entry),
            Slot::Vacant => None,
        }
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Entry> {
        match self.slots.get_mut(id.index())? {
            Slot::Occupied(entry) => Some(entry),
            Slot::Vacant => None,
        }
    }

    /// Number of occupied slots.
    pub fn live(&self) -> usize {
        self.live
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| matches!(slot, Slot::Occupied(_)))
            .map(|(i, _)| NodeId::new(i))
    }

    pub fn operation(&self, id: NodeId) -> &Operation {
        match &self[id].node {
            Node::Operation(op) => op,
            _ => unreachable!("node {} is not an operation", id),
        }
    }

    pub fn operation_mut(&mut self, id: NodeId) -> &mut Operation {
        match &mut self[id].node {
            Node::Operation(op) => op,
            _ => unreachable!("node {} is not an operation", id),
        }
    }

    pub fn link(&self, id: NodeId) -> &Link {
        match &self[id].node {
            Node::Link(link) => link,
            _ => unreachable!("node {} is not a chain link", id),
        }
    }

    pub fn link_mut(&mut self, id: NodeId) -> &mut Link {
        match &mut self[id].node {
            Node::Link(link) => link,
            _ => unreachable!("node {} is not a chain link", id),
        }
    }
}

impl Index<NodeId> for Arena {
    type Output = Entry;

    fn index(&self, id: NodeId) -> &Entry {
        match self.get(id) {
            Some(entry) => entry,
            None => panic!("dangling node id {}", id),
        }
    }
}

impl IndexMut<NodeId> for Arena {
    fn index_mut(&mut self, id: NodeId) -> &mut Entry {
        match self.get_mut(id) {
            Some(entry) => entry,
            None => panic!("dangling node id {}", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values::Value;

    #[test]
    fn test_alloc_and_free_recycles_slots() {
        let mut arena = Arena::default();
        let a = arena.alloc(Node::Literal(Value::Int(1)), None);
        let b = arena.alloc(Node::Literal(Value::Int(2)), None);
        assert_eq!(arena.live(), 2);
        assert_ne!(a, b);

        assert!(arena.free(a).is_some());
        assert!(arena.free(a).is_none());
        assert_eq!(arena.live(), 1);
        assert!(arena.get(a).is_none());

        let c = arena.alloc(Node::Literal(Value::Int(3)), None);
        assert_eq!(c, a);
        assert_eq!(arena.live(), 2);
    }

    #[test]
    fn test_replace_keeps_identity() {
        let mut arena = Arena::default();
        let id = arena.alloc(Node::Literal(Value::Int(1)), None);
        let old = arena.replace(id, Node::Literal(Value::Int(2)));
        assert!(matches!(old, Node::Literal(Value::Int(1))));
        assert!(matches!(arena[id].node, Node::Literal(Value::Int(2))));
        assert_eq!(arena.ids().collect::<Vec<_>>(), [id]);
    }
}
