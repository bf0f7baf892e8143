// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An arena of property sets with parent/child structure and eager
//! inheritance propagation.
//!
//! Nodes are addressed by generational [`NodeId`] handles, so stale ids
//! never alias a node that reused the slot. Each node carries a
//! [`PropertySet`] plus a caller-chosen payload `D` (the widget layer
//! stores its box-model state there).
//!
//! Mutations that change computed values return the full batch of
//! `(NodeId, Change)` pairs they produced, in dispatch order, after all
//! listeners ran. Callers use the batch to invalidate derived state.

use alloc::string::String;
use alloc::vec::Vec;

use smallvec::SmallVec;

use crate::error::{ListenerError, PropertyError};
use crate::property::PropertyDefault;
use crate::set::{Change, PropertySet};
use crate::value::{Convert, Value};

/// A generational handle to a tree node.
///
/// A slot's generation increments when the slot is reused, so a `NodeId`
/// held across a removal goes stale instead of aliasing the new occupant.
/// `u32` is ample for practical lifetimes; behavior on generation overflow
/// is unspecified.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

/// Changes produced by one tree mutation, in dispatch order.
pub type TreeChanges = Vec<(NodeId, Change)>;

struct Node<D> {
    set: PropertySet,
    data: D,
    parent: Option<NodeId>,
    children: SmallVec<[NodeId; 4]>,
}

struct Slot<D> {
    generation: u32,
    node: Option<Node<D>>,
}

/// A tree of property sets with inheritance flowing parent to child.
///
/// A parent's computed value is pushed into the `inherited` slot of every
/// child that has the property; whether the child's computed value follows
/// is decided by the child property's inherit flag. Propagation is eager
/// and synchronous, so reads never recompute.
pub struct PropertyTree<D> {
    slots: Vec<Slot<D>>,
    free: Vec<u32>,
}

impl<D> Default for PropertyTree<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> PropertyTree<D> {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Inserts a node, optionally under a parent, and seeds its inherited
    /// slots from the parent's computed values. No events fire; the node
    /// has no listeners yet.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::StaleNode`] if `parent` is stale, or a
    /// conversion error from seeding.
    pub fn insert(
        &mut self,
        set: PropertySet,
        data: D,
        parent: Option<NodeId>,
    ) -> Result<NodeId, PropertyError> {
        if let Some(p) = parent {
            self.check(p)?;
        }
        let node = Node {
            set,
            data,
            parent,
            children: SmallVec::new(),
        };
        let id = if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            NodeId {
                index,
                generation: slot.generation,
            }
        } else {
            let index =
                u32::try_from(self.slots.len()).expect("too many nodes for u32 NodeId slots");
            self.slots.push(Slot {
                generation: 1,
                node: Some(node),
            });
            NodeId {
                index,
                generation: 1,
            }
        };
        if let Some(p) = parent {
            if let Some(parent_node) = self.node_mut(p) {
                parent_node.children.push(id);
            }
            let mut seeded = TreeChanges::new();
            self.refresh_inherited(id, &mut seeded)?;
        }
        Ok(id)
    }

    /// Whether `id` still refers to a live node.
    #[must_use]
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    /// The node's parent.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::StaleNode`] if `id` is stale.
    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>, PropertyError> {
        Ok(self.node(id).ok_or(PropertyError::StaleNode)?.parent)
    }

    /// The node's children, in attachment order.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::StaleNode`] if `id` is stale.
    pub fn children(&self, id: NodeId) -> Result<&[NodeId], PropertyError> {
        Ok(&self.node(id).ok_or(PropertyError::StaleNode)?.children)
    }

    /// The node's property set.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::StaleNode`] if `id` is stale.
    pub fn props(&self, id: NodeId) -> Result<&PropertySet, PropertyError> {
        Ok(&self.node(id).ok_or(PropertyError::StaleNode)?.set)
    }

    /// Mutable access to the node's property set.
    ///
    /// Writing values through this bypasses inheritance propagation; use
    /// the tree-level mutators for cascading writes.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::StaleNode`] if `id` is stale.
    pub fn props_mut(&mut self, id: NodeId) -> Result<&mut PropertySet, PropertyError> {
        Ok(&mut self.node_mut(id).ok_or(PropertyError::StaleNode)?.set)
    }

    /// The node's payload.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::StaleNode`] if `id` is stale.
    pub fn data(&self, id: NodeId) -> Result<&D, PropertyError> {
        Ok(&self.node(id).ok_or(PropertyError::StaleNode)?.data)
    }

    /// Mutable access to the node's payload.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::StaleNode`] if `id` is stale.
    pub fn data_mut(&mut self, id: NodeId) -> Result<&mut D, PropertyError> {
        Ok(&mut self.node_mut(id).ok_or(PropertyError::StaleNode)?.data)
    }

    /// Registers a property on a node and seeds its inherited slot from
    /// the parent. No events fire.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::StaleNode`] or a conversion error.
    pub fn add_property(
        &mut self,
        id: NodeId,
        name: &str,
        default: impl Into<PropertyDefault>,
        convert: Option<Convert>,
        inherit: bool,
    ) -> Result<(), PropertyError> {
        self.props_mut(id)?
            .add_property(name, default, convert, inherit)?;
        self.seed_inherited(id, name)?;
        Ok(())
    }

    /// Registers a composite property on a node, seeding each part.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::StaleNode`],
    /// [`PropertyError::DuplicateComposite`], or a conversion error.
    pub fn add_composite(
        &mut self,
        id: NodeId,
        name: &str,
        parts: Vec<String>,
        default: Value,
        convert: Option<Convert>,
        inherit: bool,
    ) -> Result<(), PropertyError> {
        self.props_mut(id)?
            .add_composite(name, parts.clone(), default, convert, inherit)?;
        for part in &parts {
            self.seed_inherited(id, part)?;
        }
        Ok(())
    }

    /// Registers a rect composite on a node, seeding each side.
    ///
    /// # Errors
    ///
    /// Same conditions as [`PropertyTree::add_composite`].
    pub fn add_rect_property(
        &mut self,
        id: NodeId,
        name: &str,
        default: Value,
        convert: Option<Convert>,
        inherit: bool,
    ) -> Result<(), PropertyError> {
        let parts: Vec<String> = crate::convert::rect_part_names(name).into_iter().collect();
        self.add_composite(id, name, parts, default, convert, inherit)
    }

    /// The computed value of a property, vivifying unknown names with
    /// their inherited slot seeded from the parent.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::StaleNode`] or a conversion error.
    pub fn value(&mut self, id: NodeId, name: &str) -> Result<Value, PropertyError> {
        if !self.props(id)?.has_property(name) {
            self.seed_inherited(id, name)?;
        }
        Ok(self.props_mut(id)?.value(name))
    }

    /// Sets the explicit value of a property, fires listeners, and pushes
    /// the computed value into descendants' inherited slots.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::StaleNode`], a conversion error, or the
    /// first listener error (which aborts further dispatch but leaves all
    /// slot writes in place).
    pub fn set_value(
        &mut self,
        id: NodeId,
        name: &str,
        value: Value,
    ) -> Result<TreeChanges, PropertyError> {
        let changes = self.props_mut(id)?.set(name, value)?;
        self.dispatch(id, changes)
    }

    /// Replaces a property's default, cascading as [`PropertyTree::set_value`].
    ///
    /// # Errors
    ///
    /// Same conditions as [`PropertyTree::set_value`].
    pub fn set_default(
        &mut self,
        id: NodeId,
        name: &str,
        default: Value,
    ) -> Result<TreeChanges, PropertyError> {
        let changes = self.props_mut(id)?.set_default(name, default)?;
        self.dispatch(id, changes)
    }

    /// Overrides a property's inherit flag, cascading as
    /// [`PropertyTree::set_value`].
    ///
    /// # Errors
    ///
    /// Same conditions as [`PropertyTree::set_value`].
    pub fn set_inherit(
        &mut self,
        id: NodeId,
        name: &str,
        inherit: bool,
    ) -> Result<TreeChanges, PropertyError> {
        let changes = self.props_mut(id)?.set_inherit(name, inherit)?;
        self.dispatch(id, changes)
    }

    /// Attaches a manual style class, cascading resulting changes.
    ///
    /// # Errors
    ///
    /// Same conditions as [`PropertyTree::set_value`].
    pub fn attach_class(
        &mut self,
        id: NodeId,
        class: crate::set::StyleClass,
    ) -> Result<TreeChanges, PropertyError> {
        let changes = self.props_mut(id)?.attach_class(class)?;
        self.dispatch(id, changes)
    }

    /// Detaches a manual style class, cascading resulting changes.
    ///
    /// # Errors
    ///
    /// Also returns [`PropertyError::ClassNotAttached`] if the class is
    /// not attached.
    pub fn detach_class(&mut self, id: NodeId, name: &str) -> Result<TreeChanges, PropertyError> {
        let changes = self.props_mut(id)?.detach_class(name)?;
        self.dispatch(id, changes)
    }

    /// Replaces the managed classes on a node, cascading resulting changes.
    ///
    /// # Errors
    ///
    /// Same conditions as [`PropertyTree::set_value`].
    pub fn set_auto_classes(
        &mut self,
        id: NodeId,
        classes: Vec<crate::set::StyleClass>,
    ) -> Result<TreeChanges, PropertyError> {
        let changes = self.props_mut(id)?.set_auto_classes(classes)?;
        self.dispatch(id, changes)
    }

    /// Registers a change listener on a node.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::StaleNode`] if `id` is stale.
    pub fn add_listener(
        &mut self,
        id: NodeId,
        event: impl Into<String>,
        listener: impl FnMut(&Change) -> Result<(), ListenerError> + 'static,
    ) -> Result<(), PropertyError> {
        self.props_mut(id)?.add_listener(event, listener);
        Ok(())
    }

    /// Delivers a synthetic event (such as `click`) to a node's listeners.
    /// Synthetic events do not propagate to children.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::StaleNode`] or the failing listener's
    /// error.
    pub fn fire_event(&mut self, id: NodeId, change: &Change) -> Result<(), PropertyError> {
        Ok(self.props_mut(id)?.fire(change)?)
    }

    /// Moves a node (and its subtree) under a new parent, or to the root
    /// level, then refreshes inherited slots across the subtree. Changes
    /// fire listeners and are returned in dispatch order.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::WouldCycle`] if the new parent is the node
    /// itself or one of its descendants, [`PropertyError::StaleNode`], a
    /// conversion error, or a listener error.
    pub fn set_parent(
        &mut self,
        id: NodeId,
        parent: Option<NodeId>,
    ) -> Result<TreeChanges, PropertyError> {
        self.check(id)?;
        if let Some(p) = parent {
            self.check(p)?;
            let mut cursor = Some(p);
            while let Some(c) = cursor {
                if c == id {
                    return Err(PropertyError::WouldCycle);
                }
                cursor = self.node(c).ok_or(PropertyError::StaleNode)?.parent;
            }
        }
        let old_parent = self.node(id).ok_or(PropertyError::StaleNode)?.parent;
        if let Some(old) = old_parent
            && let Some(node) = self.node_mut(old)
        {
            node.children.retain(|c| *c != id);
        }
        if let Some(node) = self.node_mut(id) {
            node.parent = parent;
        }
        if let Some(p) = parent
            && let Some(node) = self.node_mut(p)
        {
            node.children.push(id);
        }
        let mut out = TreeChanges::new();
        self.refresh_inherited(id, &mut out)?;
        Ok(out)
    }

    /// Removes a node and its entire subtree. All their ids go stale.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::StaleNode`] if `id` is stale.
    pub fn remove(&mut self, id: NodeId) -> Result<(), PropertyError> {
        self.check(id)?;
        let parent = self.node(id).ok_or(PropertyError::StaleNode)?.parent;
        if let Some(p) = parent
            && let Some(node) = self.node_mut(p)
        {
            node.children.retain(|c| *c != id);
        }
        let mut stack = alloc::vec![id];
        while let Some(current) = stack.pop() {
            let slot = &mut self.slots[current.index as usize];
            if slot.generation == current.generation
                && let Some(node) = slot.node.take()
            {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(current.index);
                stack.extend(node.children);
            }
        }
        Ok(())
    }

    fn node(&self, id: NodeId) -> Option<&Node<D>> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_ref()
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node<D>> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_mut()
    }

    fn check(&self, id: NodeId) -> Result<(), PropertyError> {
        if self.is_alive(id) {
            Ok(())
        } else {
            Err(PropertyError::StaleNode)
        }
    }

    /// Writes a node's inherited slot for one name from the parent's
    /// computed value, vivifying and without firing.
    fn seed_inherited(&mut self, id: NodeId, name: &str) -> Result<(), PropertyError> {
        let parent = self.node(id).ok_or(PropertyError::StaleNode)?.parent;
        let inherited = match parent {
            Some(p) => self.props(p)?.try_value(name).unwrap_or_default(),
            None => Value::Null,
        };
        self.props_mut(id)?.set_inherited(name, inherited)?;
        Ok(())
    }

    /// Fires a batch of local changes and cascades each into descendants.
    fn dispatch(
        &mut self,
        id: NodeId,
        changes: crate::set::Changes,
    ) -> Result<TreeChanges, PropertyError> {
        let mut out = TreeChanges::new();
        for change in changes {
            self.after_change(id, change, &mut out)?;
        }
        Ok(out)
    }

    /// One computed-value change on `id`: fire its listeners, record it,
    /// then push the new value into each child that has the property and
    /// recurse on the children it actually changed.
    fn after_change(
        &mut self,
        id: NodeId,
        change: Change,
        out: &mut TreeChanges,
    ) -> Result<(), PropertyError> {
        self.props_mut(id)?.fire(&change)?;
        let children: SmallVec<[NodeId; 4]> = self
            .node(id)
            .ok_or(PropertyError::StaleNode)?
            .children
            .clone();
        let name = change.name.clone();
        let new = change.new.clone();
        out.push((id, change));
        for child in children {
            if self.props(child)?.property(&name).is_none() {
                continue;
            }
            if let Some(child_change) = self.props_mut(child)?.set_inherited(&name, new.clone())? {
                self.after_change(child, child_change, out)?;
            }
        }
        Ok(())
    }

    /// Top-down refresh of every inherited slot in the subtree rooted at
    /// `id`, firing and recording changes. Children read their parent's
    /// already-refreshed values.
    fn refresh_inherited(
        &mut self,
        id: NodeId,
        out: &mut TreeChanges,
    ) -> Result<(), PropertyError> {
        let names: Vec<String> = self
            .props(id)?
            .property_names()
            .map(String::from)
            .collect();
        let parent = self.node(id).ok_or(PropertyError::StaleNode)?.parent;
        for name in names {
            let inherited = match parent {
                Some(p) => self.props(p)?.try_value(&name).unwrap_or_default(),
                None => Value::Null,
            };
            if let Some(change) = self.props_mut(id)?.set_inherited(&name, inherited)? {
                self.props_mut(id)?.fire(&change)?;
                out.push((id, change));
            }
        }
        let children: SmallVec<[NodeId; 4]> = self
            .node(id)
            .ok_or(PropertyError::StaleNode)?
            .children
            .clone();
        for child in children {
            self.refresh_inherited(child, out)?;
        }
        Ok(())
    }
}

impl<D: core::fmt::Debug> core::fmt::Debug for PropertyTree<D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut map = f.debug_map();
        for (index, slot) in self.slots.iter().enumerate() {
            if let Some(node) = &slot.node {
                map.entry(&index, &(node.set.id(), &node.data));
            }
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::to_number;
    use crate::error::ListenerError;
    use alloc::rc::Rc;
    use alloc::vec;
    use core::cell::RefCell;

    fn tree_with_root() -> (PropertyTree<()>, NodeId) {
        let mut tree = PropertyTree::new();
        let root = tree.insert(PropertySet::new("root"), (), None).unwrap();
        (tree, root)
    }

    #[test]
    fn insert_seeds_inherited_from_parent() {
        let (mut tree, root) = tree_with_root();
        tree.add_property(root, "fontSize", Value::from(16.0), Some(to_number), true)
            .unwrap();
        tree.set_value(root, "fontSize", 20.into()).unwrap();

        let mut child_set = PropertySet::new("child");
        child_set
            .add_property("fontSize", Value::from(16.0), Some(to_number), true)
            .unwrap();
        let child = tree.insert(child_set, (), Some(root)).unwrap();
        assert_eq!(tree.value(child, "fontSize").unwrap(), Value::Number(20.0));
    }

    #[test]
    fn set_override_clear_on_a_child() {
        let (mut tree, root) = tree_with_root();
        tree.add_property(root, "fontSize", Value::from(16.0), Some(to_number), true)
            .unwrap();
        let mut child_set = PropertySet::new("child");
        child_set
            .add_property("fontSize", Value::from(16.0), Some(to_number), true)
            .unwrap();
        let child = tree.insert(child_set, (), Some(root)).unwrap();

        // Parent write flows down.
        let changes = tree.set_value(root, "fontSize", 24.into()).unwrap();
        let ids: Vec<NodeId> = changes.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![root, child]);
        assert_eq!(tree.value(child, "fontSize").unwrap(), Value::Number(24.0));

        // Child override wins locally and stops reacting to the parent.
        tree.set_value(child, "fontSize", 30.into()).unwrap();
        let changes = tree.set_value(root, "fontSize", 40.into()).unwrap();
        assert_eq!(changes.len(), 1, "override suppresses the child change");
        assert_eq!(tree.value(child, "fontSize").unwrap(), Value::Number(30.0));

        // Clearing the override resumes inheritance.
        tree.set_value(child, "fontSize", Value::Null).unwrap();
        assert_eq!(tree.value(child, "fontSize").unwrap(), Value::Number(40.0));
    }

    #[test]
    fn vivified_reads_inherit_from_the_parent() {
        let (mut tree, root) = tree_with_root();
        tree.set_value(root, "accent", "gold".into()).unwrap();
        let child = tree
            .insert(PropertySet::new("child"), (), Some(root))
            .unwrap();
        assert_eq!(
            tree.value(child, "accent").unwrap(),
            Value::from("gold")
        );
    }

    #[test]
    fn grandchildren_receive_cascaded_changes() {
        let (mut tree, root) = tree_with_root();
        tree.add_property(root, "fontSize", Value::from(16.0), Some(to_number), true)
            .unwrap();
        let mut mid_set = PropertySet::new("mid");
        mid_set
            .add_property("fontSize", Value::from(16.0), Some(to_number), true)
            .unwrap();
        let mid = tree.insert(mid_set, (), Some(root)).unwrap();
        let mut leaf_set = PropertySet::new("leaf");
        leaf_set
            .add_property("fontSize", Value::from(16.0), Some(to_number), true)
            .unwrap();
        let leaf = tree.insert(leaf_set, (), Some(mid)).unwrap();

        let changes = tree.set_value(root, "fontSize", 21.into()).unwrap();
        assert_eq!(changes.len(), 3);
        assert_eq!(tree.value(leaf, "fontSize").unwrap(), Value::Number(21.0));
    }

    #[test]
    fn reparenting_refreshes_the_subtree() {
        let (mut tree, root) = tree_with_root();
        tree.add_property(root, "fontSize", Value::from(16.0), Some(to_number), true)
            .unwrap();
        tree.set_value(root, "fontSize", 12.into()).unwrap();

        let other = tree.insert(PropertySet::new("other"), (), None).unwrap();
        tree.add_property(other, "fontSize", Value::from(16.0), Some(to_number), true)
            .unwrap();
        tree.set_value(other, "fontSize", 48.into()).unwrap();

        let mut child_set = PropertySet::new("child");
        child_set
            .add_property("fontSize", Value::from(16.0), Some(to_number), true)
            .unwrap();
        let child = tree.insert(child_set, (), Some(root)).unwrap();
        assert_eq!(tree.value(child, "fontSize").unwrap(), Value::Number(12.0));

        let changes = tree.set_parent(child, Some(other)).unwrap();
        assert_eq!(changes.len(), 1);
        assert_eq!(tree.value(child, "fontSize").unwrap(), Value::Number(48.0));
        assert_eq!(tree.children(root).unwrap(), &[]);
        assert_eq!(tree.children(other).unwrap(), &[child]);
    }

    #[test]
    fn reparenting_under_a_descendant_is_rejected() {
        let (mut tree, root) = tree_with_root();
        let child = tree
            .insert(PropertySet::new("child"), (), Some(root))
            .unwrap();
        assert!(matches!(
            tree.set_parent(root, Some(child)),
            Err(PropertyError::WouldCycle)
        ));
        assert!(matches!(
            tree.set_parent(root, Some(root)),
            Err(PropertyError::WouldCycle)
        ));
    }

    #[test]
    fn listener_errors_abort_the_cascade() {
        let (mut tree, root) = tree_with_root();
        tree.add_property(root, "width", Value::from(0.0), Some(to_number), true)
            .unwrap();
        let mut child_set = PropertySet::new("child");
        child_set
            .add_property("width", Value::from(0.0), Some(to_number), true)
            .unwrap();
        child_set.add_listener("width", |_: &Change| Err(ListenerError::new("nope")));
        let child = tree.insert(child_set, (), Some(root)).unwrap();

        let err = tree.set_value(root, "width", 10.into()).unwrap_err();
        assert!(matches!(err, PropertyError::Listener(_)));
        // The slot writes happened before dispatch aborted.
        assert_eq!(tree.value(child, "width").unwrap(), Value::Number(10.0));
    }

    #[test]
    fn listeners_observe_old_and_new() {
        let (mut tree, root) = tree_with_root();
        tree.add_property(root, "width", Value::from(0.0), Some(to_number), false)
            .unwrap();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        tree.props_mut(root)
            .unwrap()
            .add_listener("width", move |change: &Change| {
                sink.borrow_mut().push((change.old.clone(), change.new.clone()));
                Ok(())
            });
        tree.set_value(root, "width", 3.into()).unwrap();
        tree.set_value(root, "width", 3.into()).unwrap();
        tree.set_value(root, "width", 4.into()).unwrap();
        assert_eq!(
            *seen.borrow(),
            vec![
                (Value::Number(0.0), Value::Number(3.0)),
                (Value::Number(3.0), Value::Number(4.0)),
            ]
        );
    }

    #[test]
    fn removed_ids_go_stale_and_slots_are_reused() {
        let (mut tree, root) = tree_with_root();
        let child = tree
            .insert(PropertySet::new("child"), (), Some(root))
            .unwrap();
        tree.remove(child).unwrap();
        assert!(!tree.is_alive(child));
        assert!(matches!(
            tree.value(child, "anything"),
            Err(PropertyError::StaleNode)
        ));

        let replacement = tree
            .insert(PropertySet::new("again"), (), Some(root))
            .unwrap();
        assert!(tree.is_alive(replacement));
        assert_ne!(replacement, child);
        assert!(!tree.is_alive(child));
    }

    #[test]
    fn remove_takes_the_subtree() {
        let (mut tree, root) = tree_with_root();
        let mid = tree.insert(PropertySet::new("mid"), (), Some(root)).unwrap();
        let leaf = tree.insert(PropertySet::new("leaf"), (), Some(mid)).unwrap();
        tree.remove(mid).unwrap();
        assert!(!tree.is_alive(mid));
        assert!(!tree.is_alive(leaf));
        assert_eq!(tree.children(root).unwrap(), &[]);
    }

    #[test]
    fn composite_changes_cascade_per_part() {
        let (mut tree, root) = tree_with_root();
        tree.add_rect_property(root, "margin", 0.into(), Some(to_number), true)
            .unwrap();
        let mut child_set = PropertySet::new("child");
        child_set
            .add_rect_property("margin", 0.into(), Some(to_number), true)
            .unwrap();
        let child = tree.insert(child_set, (), Some(root)).unwrap();

        let changes = tree.set_value(root, "margin", "1 2 3 4".into()).unwrap();
        // Four parts, each firing on root and child.
        assert_eq!(changes.len(), 8);
        assert_eq!(
            tree.value(child, "margin").unwrap(),
            Value::List(vec![1.0.into(), 2.0.into(), 3.0.into(), 4.0.into()])
        );
    }
}
