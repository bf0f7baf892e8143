// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The widget tree: nodes, schemas, styled lookup, and size invalidation.

use canopy_property::{
    Change, ListenerError, NodeId, PropertySet, PropertyTree, StyleClass, Value,
};
use kurbo::{Point, Size};

use crate::error::RenderError;
use crate::kind::{Kind, WidgetData};
use crate::schema;

/// A tree of widgets over a property tree.
///
/// All reads of style properties go through [`WidgetTree::value`], which
/// applies the state-qualified override rule: while a node's state is
/// `s ≠ ""`, a lookup of `"X"` first consults `"X#s"` and uses it when
/// non-null, converted by `X`'s converter.
///
/// Any mutation that can change a node's content size (property writes,
/// class changes, state changes, child-list changes) marks the node's
/// cached size invalid and bubbles the invalidation to the root; the next
/// layout pass recomputes from there.
#[derive(Debug)]
pub struct WidgetTree {
    pub(crate) tree: PropertyTree<WidgetData>,
}

impl Default for WidgetTree {
    fn default() -> Self {
        Self::new()
    }
}

impl WidgetTree {
    /// Creates an empty widget tree.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tree: PropertyTree::new(),
        }
    }

    /// Inserts a widget of the given kind and id, registering its schema.
    ///
    /// # Errors
    ///
    /// Returns an error if `parent` is stale or schema registration fails.
    pub fn insert(
        &mut self,
        kind: Kind,
        id: &str,
        parent: Option<NodeId>,
    ) -> Result<NodeId, RenderError> {
        let node = self
            .tree
            .insert(PropertySet::new(id), WidgetData::new(kind), parent)?;
        schema::apply(&mut self.tree, node, kind)?;
        if let Some(p) = parent {
            self.invalidate_size(p);
        }
        Ok(node)
    }

    /// Removes a widget and its subtree.
    ///
    /// # Errors
    ///
    /// Returns an error if `node` is stale.
    pub fn remove(&mut self, node: NodeId) -> Result<(), RenderError> {
        if let Some(parent) = self.tree.parent(node)? {
            self.invalidate_size(parent);
        }
        Ok(self.tree.remove(node)?)
    }

    /// Whether `node` is still alive.
    #[must_use]
    pub fn is_alive(&self, node: NodeId) -> bool {
        self.tree.is_alive(node)
    }

    /// The widget's kind.
    ///
    /// # Errors
    ///
    /// Returns an error if `node` is stale.
    pub fn kind(&self, node: NodeId) -> Result<Kind, RenderError> {
        Ok(self.tree.data(node)?.kind)
    }

    /// The widget's id (the property-set id used for selector matching).
    ///
    /// # Errors
    ///
    /// Returns an error if `node` is stale.
    pub fn id(&self, node: NodeId) -> Result<&str, RenderError> {
        Ok(self.tree.props(node)?.id())
    }

    /// The widget's interaction state tag.
    ///
    /// # Errors
    ///
    /// Returns an error if `node` is stale.
    pub fn state(&self, node: NodeId) -> Result<&str, RenderError> {
        Ok(self.tree.data(node)?.state.as_str())
    }

    /// Sets the interaction state tag, invalidating the size (state
    /// changes can flip state-qualified style values).
    ///
    /// # Errors
    ///
    /// Returns an error if `node` is stale.
    pub fn set_state(&mut self, node: NodeId, state: &str) -> Result<(), RenderError> {
        let data = self.tree.data_mut(node)?;
        if data.state != state {
            data.state = String::from(state);
            self.invalidate_size(node);
        }
        Ok(())
    }

    /// The position assigned by the parent's last layout pass, relative to
    /// the parent's content origin.
    #[must_use]
    pub fn position(&self, node: NodeId) -> Option<Point> {
        self.tree.data(node).ok().and_then(|d| d.position)
    }

    /// The cached box-model size, if the node has been sized since its
    /// last invalidation.
    #[must_use]
    pub fn size(&self, node: NodeId) -> Option<Size> {
        self.tree
            .data(node)
            .ok()
            .filter(|d| d.size_valid)
            .and_then(|d| d.size)
    }

    /// The node's parent.
    ///
    /// # Errors
    ///
    /// Returns an error if `node` is stale.
    pub fn parent(&self, node: NodeId) -> Result<Option<NodeId>, RenderError> {
        Ok(self.tree.parent(node)?)
    }

    /// The node's children, in layout order.
    ///
    /// # Errors
    ///
    /// Returns an error if `node` is stale.
    pub fn children(&self, node: NodeId) -> Result<&[NodeId], RenderError> {
        Ok(self.tree.children(node)?)
    }

    /// Moves a widget under a new parent, cascading inherited values
    /// through the moved subtree and invalidating both old and new
    /// ancestor chains.
    ///
    /// # Errors
    ///
    /// Returns an error on stale ids, cycles, conversion failures, or a
    /// failing listener.
    pub fn set_parent(
        &mut self,
        node: NodeId,
        parent: Option<NodeId>,
    ) -> Result<(), RenderError> {
        if let Some(old) = self.tree.parent(node)? {
            self.invalidate_size(old);
        }
        let changes = self.tree.set_parent(node, parent)?;
        for (id, _) in &changes {
            self.invalidate_size(*id);
        }
        if let Some(p) = parent {
            self.invalidate_size(p);
        }
        Ok(())
    }

    /// Sets a property, firing listeners and cascading inheritance.
    ///
    /// # Errors
    ///
    /// Returns an error on a stale id, conversion failure, or a failing
    /// listener.
    pub fn set(
        &mut self,
        node: NodeId,
        name: &str,
        value: impl Into<Value>,
    ) -> Result<(), RenderError> {
        let changes = self.tree.set_value(node, name, value.into())?;
        self.invalidate_changed(&changes);
        Ok(())
    }

    /// Resolves a property with the state-qualified override rule.
    ///
    /// # Errors
    ///
    /// Returns an error on a stale id or a conversion failure.
    pub fn value(&mut self, node: NodeId, name: &str) -> Result<Value, RenderError> {
        let state = self.tree.data(node)?.state.clone();
        if !state.is_empty() {
            let qualified = format!("{name}#{state}");
            let qualified_value = self
                .tree
                .props(node)?
                .try_value(&qualified)
                .unwrap_or_default();
            if !qualified_value.is_null() {
                let convert = self
                    .tree
                    .props(node)?
                    .property(name)
                    .and_then(|p| p.convert());
                return Ok(match convert {
                    Some(f) => f(&qualified_value)?,
                    None => qualified_value,
                });
            }
        }
        Ok(self.tree.value(node, name)?)
    }

    /// Attaches a manual style class.
    ///
    /// # Errors
    ///
    /// Returns an error on a stale id, conversion failure, or a failing
    /// listener.
    pub fn attach_class(&mut self, node: NodeId, class: StyleClass) -> Result<(), RenderError> {
        let changes = self.tree.attach_class(node, class)?;
        self.invalidate_changed(&changes);
        // State-qualified entries change resolution without a computed
        // change, so the node itself is always invalidated.
        self.invalidate_size(node);
        Ok(())
    }

    /// Detaches a manual style class.
    ///
    /// # Errors
    ///
    /// Also errors if the class was never attached.
    pub fn detach_class(&mut self, node: NodeId, name: &str) -> Result<(), RenderError> {
        let changes = self.tree.detach_class(node, name)?;
        self.invalidate_changed(&changes);
        self.invalidate_size(node);
        Ok(())
    }

    /// Replaces the managed (selector-derived) classes on a node.
    ///
    /// # Errors
    ///
    /// Returns an error on a stale id, conversion failure, or a failing
    /// listener.
    pub fn set_auto_classes(
        &mut self,
        node: NodeId,
        classes: Vec<StyleClass>,
    ) -> Result<(), RenderError> {
        let changes = self.tree.set_auto_classes(node, classes)?;
        self.invalidate_changed(&changes);
        self.invalidate_size(node);
        Ok(())
    }

    /// Registers a listener for a property or synthetic event name.
    ///
    /// # Errors
    ///
    /// Returns an error if `node` is stale.
    pub fn add_listener(
        &mut self,
        node: NodeId,
        event: impl Into<String>,
        listener: impl FnMut(&Change) -> Result<(), ListenerError> + 'static,
    ) -> Result<(), RenderError> {
        Ok(self.tree.add_listener(node, event, listener)?)
    }

    /// Delivers a synthetic event (such as `"click"`) to a node.
    ///
    /// # Errors
    ///
    /// Returns an error if `node` is stale or a listener fails.
    pub fn fire_event(&mut self, node: NodeId, event: &str) -> Result<(), RenderError> {
        Ok(self.tree.fire_event(node, &Change::event(event))?)
    }

    /// Marks a node's cached size invalid and bubbles to the root. Stops
    /// early once it reaches an already-invalid ancestor.
    pub fn invalidate_size(&mut self, node: NodeId) {
        let mut cursor = Some(node);
        while let Some(id) = cursor {
            let Ok(data) = self.tree.data_mut(id) else {
                break;
            };
            if !data.size_valid && data.size.is_none() {
                break;
            }
            data.size_valid = false;
            data.size = None;
            cursor = self.tree.parent(id).ok().flatten();
        }
    }

    fn invalidate_changed(&mut self, changes: &[(NodeId, Change)]) {
        for (id, _) in changes {
            self.invalidate_size(*id);
        }
    }

    /// A scalar style value as a number, defaulting to zero for null or
    /// non-numeric values.
    pub(crate) fn number(&mut self, node: NodeId, name: &str) -> Result<f64, RenderError> {
        Ok(self.value(node, name)?.as_number().unwrap_or(0.0))
    }

    /// A rect property as `[left, top, right, bottom]`, all non-negative.
    pub(crate) fn rect_sides(
        &mut self,
        node: NodeId,
        name: &str,
    ) -> Result<[f64; 4], RenderError> {
        let value = self.tree.value(node, name)?;
        let bad = || RenderError::BadRectValue {
            name: String::from(name),
            value: value.clone(),
        };
        let items = value.as_list().ok_or_else(bad)?;
        if items.len() != 4 {
            return Err(bad());
        }
        let mut sides = [0.0; 4];
        for (side, item) in sides.iter_mut().zip(items) {
            // A null side counts as zero (the property was never set).
            let n = match item {
                Value::Null => 0.0,
                other => other.as_number().ok_or_else(bad)?,
            };
            if n < 0.0 {
                return Err(bad());
            }
            *side = n;
        }
        Ok(sides)
    }

    /// Lenient read-only number for hit testing: unknown or non-numeric
    /// values read as zero, and state qualification is ignored.
    pub(crate) fn number_lenient(&self, node: NodeId, name: &str) -> f64 {
        self.tree
            .props(node)
            .ok()
            .and_then(|set| set.try_value(name))
            .and_then(|v| v.as_number())
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_qualified_lookup_prefers_the_qualified_value() {
        let mut widgets = WidgetTree::new();
        let button = widgets.insert(Kind::Button, "ok", None).unwrap();
        widgets
            .attach_class(
                button,
                StyleClass::new("button-style")
                    .with("backgroundColor", "#FF0000")
                    .with("backgroundColor#down", "#0000FF"),
            )
            .unwrap();

        let red = widgets.value(button, "backgroundColor").unwrap();
        assert_eq!(red.as_color().unwrap().components[0], 1.0);

        widgets.set_state(button, "down").unwrap();
        let blue = widgets.value(button, "backgroundColor").unwrap();
        assert_eq!(blue.as_color().unwrap().components[2], 1.0);
        assert_eq!(blue.as_color().unwrap().components[0], 0.0);

        widgets.set_state(button, "").unwrap();
        let red = widgets.value(button, "backgroundColor").unwrap();
        assert_eq!(red.as_color().unwrap().components[0], 1.0);
    }

    #[test]
    fn margin_round_trip_through_the_widget_layer() {
        let mut widgets = WidgetTree::new();
        let node = widgets.insert(Kind::Blank, "n", None).unwrap();
        widgets.set(node, "margin", "1 2 3 4").unwrap();
        assert_eq!(widgets.rect_sides(node, "margin").unwrap(), [1.0, 2.0, 3.0, 4.0]);
        widgets.set(node, "margin", 5.0).unwrap();
        assert_eq!(widgets.rect_sides(node, "margin").unwrap(), [5.0; 4]);
    }

    #[test]
    fn negative_rect_sides_are_rejected() {
        let mut widgets = WidgetTree::new();
        let node = widgets.insert(Kind::Blank, "n", None).unwrap();
        widgets.set(node, "padding", -1.0).unwrap();
        assert!(matches!(
            widgets.rect_sides(node, "padding"),
            Err(RenderError::BadRectValue { .. })
        ));
    }

    #[test]
    fn property_writes_invalidate_up_the_tree() {
        let mut widgets = WidgetTree::new();
        let root = widgets.insert(Kind::Box, "root", None).unwrap();
        let child = widgets.insert(Kind::Blank, "c", Some(root)).unwrap();

        // Give both nodes cached sizes.
        widgets.tree.data_mut(root).unwrap().size = Some(Size::ZERO);
        widgets.tree.data_mut(root).unwrap().size_valid = true;
        widgets.tree.data_mut(child).unwrap().size = Some(Size::ZERO);
        widgets.tree.data_mut(child).unwrap().size_valid = true;

        widgets.set(child, "width", 10.0).unwrap();
        assert!(widgets.size(child).is_none());
        assert!(widgets.size(root).is_none());
    }

    #[test]
    fn reparenting_cascades_class_styles_to_descendants() {
        let mut widgets = WidgetTree::new();
        let old_root = widgets.insert(Kind::Box, "old", None).unwrap();
        let new_root = widgets.insert(Kind::Box, "new", None).unwrap();
        widgets
            .attach_class(
                new_root,
                StyleClass::new("theme").with("fontColor", "#112233"),
            )
            .unwrap();

        let panel = widgets.insert(Kind::Box, "panel", Some(old_root)).unwrap();
        let label = widgets.insert(Kind::Text, "label", Some(panel)).unwrap();

        widgets.set_parent(panel, Some(new_root)).unwrap();
        let color = widgets.value(label, "fontColor").unwrap();
        let components = color.as_color().unwrap().components;
        assert!((components[0] - 17.0 / 255.0).abs() < 1e-6);
        assert!((components[2] - 51.0 / 255.0).abs() < 1e-6);
    }
}
