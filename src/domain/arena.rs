use std::collections::{BTreeMap, HashMap};
use std::fmt;

use generational_arena::{Arena, Index};
use tracing::{debug, instrument};

use crate::domain::codec::{root_entry, TreeDict, WireNode};
use crate::domain::entities::{Topic, TopicPatch};
use crate::domain::error::{DomainError, DomainResult};

/// Tree node in the arena-based hierarchy structure.
#[derive(Debug, Clone)]
pub struct TopicNode {
    /// Topic payload for this node
    pub topic: Topic,
    /// Index of parent node in the arena, None for the root
    pub parent: Option<Index>,
    /// Indices of child nodes in insertion order
    pub children: Vec<Index>,
}

/// Arena-based topic tree with an id index.
///
/// Uses generational arena for memory-safe node references and O(1) lookups.
/// Every node id is unique across the whole tree; the id index maps it to the
/// node's arena slot, so lookups never walk the tree.
#[derive(Debug, Clone)]
pub struct TopicTree {
    /// Arena storage for all tree nodes
    arena: Arena<TopicNode>,
    /// Index of the root node
    root: Index,
    /// Node id to arena slot
    index: HashMap<String, Index>,
}

impl TopicTree {
    pub fn new(root: Topic) -> Self {
        let mut arena = Arena::new();
        let id = root.id.clone();
        let root = arena.insert(TopicNode {
            topic: root,
            parent: None,
            children: Vec::new(),
        });
        let mut index = HashMap::new();
        index.insert(id, root);
        Self { arena, root, index }
    }

    pub fn root(&self) -> Index {
        self.root
    }

    pub fn root_ref(&self) -> NodeRef<'_> {
        NodeRef {
            tree: self,
            idx: self.root,
        }
    }

    pub fn get_node(&self, idx: Index) -> Option<&TopicNode> {
        self.arena.get(idx)
    }

    /// Arena slot of the node with `id`.
    pub fn lookup(&self, id: &str) -> Option<Index> {
        self.index.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Number of nodes, root included.
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    /// Insert `topic` as the last child of `parent_id`.
    #[instrument(level = "debug", skip(self, topic), fields(id = %topic.id))]
    pub fn add_node(&mut self, parent_id: &str, topic: Topic) -> DomainResult<NodeRef<'_>> {
        let parent = self
            .lookup(parent_id)
            .ok_or_else(|| DomainError::ParentNotFound(parent_id.to_string()))?;
        let idx = self.insert_checked(parent, topic)?;
        Ok(NodeRef { tree: self, idx })
    }

    fn insert_checked(&mut self, parent: Index, topic: Topic) -> DomainResult<Index> {
        if self.index.contains_key(&topic.id) {
            return Err(DomainError::DuplicateId(topic.id));
        }
        Ok(self.attach(parent, topic))
    }

    fn attach(&mut self, parent: Index, topic: Topic) -> Index {
        let id = topic.id.clone();
        let idx = self.arena.insert(TopicNode {
            topic,
            parent: Some(parent),
            children: Vec::new(),
        });
        if let Some(parent) = self.arena.get_mut(parent) {
            parent.children.push(idx);
        }
        self.index.insert(id, idx);
        idx
    }

    /// Node with `id`, the root included.
    #[instrument(level = "trace", skip(self))]
    pub fn find_node(&self, id: &str) -> Option<NodeRef<'_>> {
        self.lookup(id).map(|idx| NodeRef { tree: self, idx })
    }

    /// Apply `patch` to the single node with `id`.
    ///
    /// Returns false if no such node exists.
    #[instrument(level = "debug", skip(self))]
    pub fn update_node(&mut self, id: &str, patch: &TopicPatch) -> bool {
        let Some(idx) = self.lookup(id) else {
            return false;
        };
        match self.arena.get_mut(idx) {
            Some(node) => node.topic.change(patch),
            None => false,
        }
    }

    /// Detach the node with `id` together with its subtree.
    ///
    /// Returns the detached subtree as a tree of its own. The root is never a
    /// child of anything, so asking to remove it yields None.
    #[instrument(level = "debug", skip(self))]
    pub fn remove_node(&mut self, id: &str) -> Option<TopicTree> {
        let idx = self.lookup(id)?;
        let parent = self.get_node(idx)?.parent?;
        if let Some(parent) = self.arena.get_mut(parent) {
            parent.children.retain(|&child| child != idx);
        }

        let order: Vec<Index> = self.iter_from(idx).map(|(i, _)| i).collect();
        let mut mapping: HashMap<Index, Index> = HashMap::new();
        let mut detached: Option<TopicTree> = None;

        // Pre-order guarantees a parent is moved before its children
        for old in order {
            let Some(node) = self.arena.remove(old) else {
                continue;
            };
            self.index.remove(&node.topic.id);
            match detached.as_mut() {
                None => {
                    let tree = TopicTree::new(node.topic);
                    mapping.insert(old, tree.root);
                    detached = Some(tree);
                }
                Some(tree) => {
                    if let Some(&new_parent) = node.parent.and_then(|p| mapping.get(&p)) {
                        let new_idx = tree.attach(new_parent, node.topic);
                        mapping.insert(old, new_idx);
                    }
                }
            }
        }

        debug!(removed = mapping.len(), "detached subtree");
        detached
    }

    /// Rebuild a tree from its serialized form.
    #[instrument(level = "debug", skip(dict))]
    pub fn loads(dict: &TreeDict) -> DomainResult<Self> {
        let (key, wire) = root_entry(dict)?;
        let mut tree = Self::new(wire.to_topic(key)?);
        let root = tree.root;
        tree.load_children(root, &wire.children)?;
        Ok(tree)
    }

    fn load_children(&mut self, parent: Index, children: &TreeDict) -> DomainResult<()> {
        for (key, wire) in children {
            let idx = self.insert_checked(parent, wire.to_topic(key)?)?;
            self.load_children(idx, &wire.children)?;
        }
        Ok(())
    }

    pub fn to_dict(&self) -> TreeDict {
        self.root_ref().to_dict()
    }

    pub fn depth(&self) -> usize {
        self.root_ref().depth()
    }

    pub fn level(&self, k: usize) -> Vec<NodeRef<'_>> {
        self.root_ref().level(k)
    }

    pub fn layers(&self) -> BTreeMap<usize, Vec<NodeRef<'_>>> {
        self.root_ref().layers()
    }

    pub fn keys(&self) -> Vec<String> {
        self.root_ref().keys()
    }

    /// Ids from the root down to `id`, both ends included.
    pub fn path_to(&self, id: &str) -> Option<Vec<String>> {
        let mut current = self.lookup(id);
        let mut path = Vec::new();
        while let Some(idx) = current {
            let node = self.get_node(idx)?;
            path.push(node.topic.id.clone());
            current = node.parent;
        }
        if path.is_empty() {
            return None;
        }
        path.reverse();
        Some(path)
    }

    pub fn iter(&self) -> TreeIterator<'_> {
        self.iter_from(self.root)
    }

    fn iter_from(&self, start: Index) -> TreeIterator<'_> {
        TreeIterator {
            tree: self,
            stack: vec![start],
        }
    }
}

/// Borrowed view of one node; every operation works on its subtree.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    tree: &'a TopicTree,
    idx: Index,
}

impl<'a> NodeRef<'a> {
    pub fn index(&self) -> Index {
        self.idx
    }

    fn node(&self) -> &'a TopicNode {
        &self.tree.arena[self.idx]
    }

    pub fn topic(&self) -> &'a Topic {
        &self.node().topic
    }

    pub fn id(&self) -> &'a str {
        &self.topic().id
    }

    pub fn name(&self) -> &'a str {
        &self.topic().name
    }

    pub fn description(&self) -> Option<&'a str> {
        self.topic().description.as_deref()
    }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.node().parent.map(|idx| NodeRef {
            tree: self.tree,
            idx,
        })
    }

    pub fn children(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let tree = self.tree;
        self.node()
            .children
            .iter()
            .map(move |&idx| NodeRef { tree, idx })
    }

    /// Node with `id` inside this subtree, self included.
    pub fn find(&self, id: &str) -> Option<NodeRef<'a>> {
        let found = self.tree.find_node(id)?;
        let mut current = Some(found);
        while let Some(node) = current {
            if node.idx == self.idx {
                return Some(found);
            }
            current = node.parent();
        }
        None
    }

    /// 1 for a leaf, else 1 + the deepest child.
    pub fn depth(&self) -> usize {
        1 + self.children().map(|c| c.depth()).max().unwrap_or(0)
    }

    /// All nodes exactly `k` edges below this one.
    pub fn level(&self, k: usize) -> Vec<NodeRef<'a>> {
        if k == 0 {
            return vec![*self];
        }
        self.children().flat_map(|c| c.level(k - 1)).collect()
    }

    pub fn layers(&self) -> BTreeMap<usize, Vec<NodeRef<'a>>> {
        (0..self.depth()).map(|k| (k, self.level(k))).collect()
    }

    /// Names of this node and all descendants, pre-order.
    pub fn keys(&self) -> Vec<String> {
        self.tree
            .iter_from(self.idx)
            .map(|(_, node)| node.topic.name.clone())
            .collect()
    }

    pub fn to_dict(&self) -> TreeDict {
        let mut dict = TreeDict::new();
        dict.insert(self.id().to_string(), self.to_wire());
        dict
    }

    fn to_wire(&self) -> WireNode {
        let topic = self.topic();
        WireNode {
            id: topic.id.clone(),
            label: Some(topic.name.clone()).filter(|n| !n.is_empty()),
            description: topic.description.clone(),
            children: self.children().flat_map(|c| c.to_dict()).collect(),
        }
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id())
            .field("name", &self.name())
            .finish()
    }
}

/// Pre-order iterator, children visited left to right.
pub struct TreeIterator<'a> {
    tree: &'a TopicTree,
    stack: Vec<Index>,
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a TopicNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}
