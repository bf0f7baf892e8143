// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hit testing and pointer behavior.
//!
//! Hit testing returns components deepest-first so the frontmost
//! interactive element gets the event first. Pointer down/up report
//! whether they consumed the event; a consumed event stops dispatch to
//! the components behind it.

use canopy_property::NodeId;
use kurbo::Point;

use crate::error::RenderError;
use crate::kind::Kind;
use crate::tree::WidgetTree;

impl WidgetTree {
    /// Offset of a node's content origin inside its outer rect, using
    /// lenient read-only property access.
    fn content_origin_lenient(&self, node: NodeId) -> (f64, f64) {
        let x = self.number_lenient(node, "marginLeft")
            + self.number_lenient(node, "borderLeft")
            + self.number_lenient(node, "paddingLeft");
        let y = self.number_lenient(node, "marginTop")
            + self.number_lenient(node, "borderTop")
            + self.number_lenient(node, "paddingTop");
        (x, y)
    }

    /// The widgets under `point` (relative to `node`'s outer origin),
    /// deepest-first. Unsized nodes (never laid out, or invalidated) do
    /// not hit.
    #[must_use]
    pub fn hit_test(&self, node: NodeId, point: Point) -> Vec<NodeId> {
        let Some(size) = self.size(node) else {
            return Vec::new();
        };
        if point.x < 0.0 || point.y < 0.0 || point.x > size.width || point.y > size.height {
            return Vec::new();
        }
        let mut hits = Vec::new();
        if self.kind(node).is_ok_and(Kind::is_container) {
            let (origin_x, origin_y) = self.content_origin_lenient(node);
            if let Ok(children) = self.children(node) {
                for child in children {
                    let position = self.position(*child).unwrap_or(Point::ORIGIN);
                    let local = Point::new(
                        point.x - origin_x - position.x,
                        point.y - origin_y - position.y,
                    );
                    let child_hits = self.hit_test(*child, local);
                    if !child_hits.is_empty() {
                        hits = child_hits;
                        break;
                    }
                }
            }
        }
        hits.push(node);
        hits
    }

    /// The pointer entered the widget.
    ///
    /// # Errors
    ///
    /// Returns an error if `node` is stale.
    pub fn pointer_enter(&mut self, node: NodeId) -> Result<(), RenderError> {
        if self.kind(node)? == Kind::Button && self.state(node)? != "down" {
            self.set_state(node, "mouseOver")?;
        }
        Ok(())
    }

    /// The pointer left the widget. Leaving a pressed button cancels the
    /// press, so a later release outside does not click.
    ///
    /// # Errors
    ///
    /// Returns an error if `node` is stale.
    pub fn pointer_leave(&mut self, node: NodeId) -> Result<(), RenderError> {
        if self.kind(node)? == Kind::Button {
            self.set_state(node, "")?;
        }
        Ok(())
    }

    /// A button press over the widget. Returns whether it was consumed.
    ///
    /// # Errors
    ///
    /// Returns an error if `node` is stale.
    pub fn pointer_down(&mut self, node: NodeId) -> Result<bool, RenderError> {
        if self.kind(node)? == Kind::Button {
            self.set_state(node, "down")?;
            return Ok(true);
        }
        Ok(false)
    }

    /// A button release over the widget. A button that is still in its
    /// `"down"` state fires `"click"` and returns consumed.
    ///
    /// # Errors
    ///
    /// Returns an error if `node` is stale or a `"click"` listener fails.
    pub fn pointer_up(&mut self, node: NodeId) -> Result<bool, RenderError> {
        if self.kind(node)? == Kind::Button && self.state(node)? == "down" {
            self.set_state(node, "mouseOver")?;
            self.fire_event(node, "click")?;
            return Ok(true);
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canopy_imaging::FixedMetrics;
    use canopy_property::{Change, ListenerError};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn sized_tree() -> (WidgetTree, NodeId, NodeId) {
        let mut widgets = WidgetTree::new();
        let parent = widgets.insert(Kind::Box, "parent", None).unwrap();
        let child = widgets.insert(Kind::Blank, "child", Some(parent)).unwrap();
        widgets.set(child, "width", 10.0).unwrap();
        widgets.set(child, "height", 10.0).unwrap();
        let size = widgets.compute_size(parent, &FixedMetrics).unwrap();
        widgets.update_layout(parent, size, &FixedMetrics).unwrap();
        (widgets, parent, child)
    }

    #[test]
    fn hits_are_deepest_first() {
        let (widgets, parent, child) = sized_tree();
        let hits = widgets.hit_test(parent, Point::new(5.0, 5.0));
        assert_eq!(hits, vec![child, parent]);
    }

    #[test]
    fn misses_outside_and_when_unsized() {
        let (mut widgets, parent, child) = sized_tree();
        assert!(widgets.hit_test(parent, Point::new(50.0, 5.0)).is_empty());

        // Invalidation bubbles to the parent, so neither node hits until
        // the next layout.
        widgets.invalidate_size(child);
        assert!(widgets.hit_test(parent, Point::new(5.0, 5.0)).is_empty());
    }

    #[test]
    fn padding_offsets_child_hit_coordinates() {
        let mut widgets = WidgetTree::new();
        let parent = widgets.insert(Kind::Box, "parent", None).unwrap();
        widgets.set(parent, "padding", 4.0).unwrap();
        let child = widgets.insert(Kind::Blank, "child", Some(parent)).unwrap();
        widgets.set(child, "width", 10.0).unwrap();
        widgets.set(child, "height", 10.0).unwrap();
        let size = widgets.compute_size(parent, &FixedMetrics).unwrap();
        widgets.update_layout(parent, size, &FixedMetrics).unwrap();

        // (2,2) lands in the padding, only the parent hits.
        assert_eq!(
            widgets.hit_test(parent, Point::new(2.0, 2.0)),
            vec![parent]
        );
        assert_eq!(
            widgets.hit_test(parent, Point::new(6.0, 6.0)),
            vec![child, parent]
        );
    }

    #[test]
    fn button_click_state_machine() {
        let mut widgets = WidgetTree::new();
        let button = widgets.insert(Kind::Button, "ok", None).unwrap();
        let clicks = Rc::new(RefCell::new(0));
        let sink = clicks.clone();
        widgets
            .add_listener(button, "click", move |_: &Change| {
                *sink.borrow_mut() += 1;
                Ok(())
            })
            .unwrap();

        widgets.pointer_enter(button).unwrap();
        assert_eq!(widgets.state(button).unwrap(), "mouseOver");

        // An up without a prior down does not click.
        assert!(!widgets.pointer_up(button).unwrap());
        assert_eq!(*clicks.borrow(), 0);

        assert!(widgets.pointer_down(button).unwrap());
        assert_eq!(widgets.state(button).unwrap(), "down");
        assert!(widgets.pointer_up(button).unwrap());
        assert_eq!(*clicks.borrow(), 1);
        assert_eq!(widgets.state(button).unwrap(), "mouseOver");
    }

    #[test]
    fn leaving_cancels_a_press() {
        let mut widgets = WidgetTree::new();
        let button = widgets.insert(Kind::Button, "ok", None).unwrap();
        widgets.pointer_enter(button).unwrap();
        widgets.pointer_down(button).unwrap();
        widgets.pointer_leave(button).unwrap();
        assert_eq!(widgets.state(button).unwrap(), "");
        assert!(!widgets.pointer_up(button).unwrap());
    }

    #[test]
    fn click_listener_errors_propagate() {
        let mut widgets = WidgetTree::new();
        let button = widgets.insert(Kind::Button, "ok", None).unwrap();
        widgets
            .add_listener(button, "click", |_: &Change| {
                Err(ListenerError::new("handler failed"))
            })
            .unwrap();
        widgets.pointer_down(button).unwrap();
        assert!(widgets.pointer_up(button).is_err());
    }

    #[test]
    fn blank_widgets_do_not_consume_pointer_events() {
        let (mut widgets, parent, child) = sized_tree();
        assert!(!widgets.pointer_down(child).unwrap());
        assert!(!widgets.pointer_down(parent).unwrap());
    }
}
