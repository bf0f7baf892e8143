// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The interface manager and its frame loop.

use canopy_component::{Kind, RenderError, WidgetTree};
use canopy_imaging::{RasterSurface, TextShaper};
use canopy_property::{NodeId, StyleClass};
use canopy_style::{RuleSet, SelectorInputs, StyleRule};
use kurbo::{Point, Size};

use crate::host::{HostWindow, PointerDevice, TextureConsumer};

/// Owns a widget tree, a style rule set, and the per-frame pipeline
/// (resize, layout, hover tracking, render, present).
///
/// The manager is driven by the embedder: call [`Manager::frame`] once per
/// host frame and forward button transitions to [`Manager::pointer_down`]
/// and [`Manager::pointer_up`]. Nothing is drawn while hidden.
pub struct Manager<S: TextShaper> {
    widgets: WidgetTree,
    root: NodeId,
    rules: RuleSet,
    shaper: S,
    surface: Option<RasterSurface>,
    visible: bool,
    /// The widgets currently under the pointer, deepest-first.
    hover: Vec<NodeId>,
}

impl<S: TextShaper> Manager<S> {
    /// Creates a manager with a root [`Kind::Box`] named `"root"`.
    ///
    /// # Errors
    ///
    /// Returns an error if root schema registration fails.
    pub fn new(shaper: S) -> Result<Self, RenderError> {
        let mut widgets = WidgetTree::new();
        let root = widgets.insert(Kind::Box, "root", None)?;
        Ok(Self {
            widgets,
            root,
            rules: RuleSet::new(),
            shaper,
            surface: None,
            visible: false,
            hover: Vec::new(),
        })
    }

    /// The root container every widget hangs off.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The widget tree, for reads and property access.
    #[must_use]
    pub fn widgets(&self) -> &WidgetTree {
        &self.widgets
    }

    /// The widget tree, for mutation.
    pub fn widgets_mut(&mut self) -> &mut WidgetTree {
        &mut self.widgets
    }

    /// Whether frames are being produced.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Starts producing frames. Idempotent.
    pub fn show(&mut self) {
        self.visible = true;
    }

    /// Stops producing frames and releases the backing surface.
    /// Idempotent.
    pub fn hide(&mut self) {
        self.visible = false;
        self.surface = None;
    }

    /// Inserts a widget and applies the matching style rules. A `None`
    /// parent attaches to the root.
    ///
    /// # Errors
    ///
    /// Returns an error on a stale parent or a failing style conversion.
    pub fn insert(
        &mut self,
        kind: Kind,
        id: &str,
        parent: Option<NodeId>,
    ) -> Result<NodeId, RenderError> {
        let parent = parent.unwrap_or(self.root);
        let node = self.widgets.insert(kind, id, Some(parent))?;
        self.apply_auto_classes(node)?;
        Ok(node)
    }

    /// Appends a style rule and reapplies managed classes to every live
    /// widget, so rules added after construction still take effect.
    ///
    /// # Errors
    ///
    /// Returns an error if a newly matched class value fails conversion or
    /// a listener fails.
    pub fn add_rule(&mut self, rule: StyleRule) -> Result<(), RenderError> {
        self.rules.add(rule);
        let mut stack = vec![self.root];
        while let Some(node) = stack.pop() {
            stack.extend_from_slice(self.widgets.children(node)?);
            self.apply_auto_classes(node)?;
        }
        Ok(())
    }

    fn apply_auto_classes(&mut self, node: NodeId) -> Result<(), RenderError> {
        let id = String::from(self.widgets.id(node)?);
        let inputs = SelectorInputs {
            id: &id,
            type_tags: self.widgets.kind(node)?.type_tags(),
        };
        let classes: Vec<StyleClass> = self.rules.classes_for(&inputs);
        self.widgets.set_auto_classes(node, classes)
    }

    /// Runs one frame: resize against the host window, lay out if
    /// anything invalidated, update hover from the pointer, render, and
    /// hand the pixels to `consumer`. Does nothing while hidden.
    ///
    /// # Errors
    ///
    /// Returns an error if layout or rendering fails; the frame is not
    /// presented in that case.
    pub fn frame(
        &mut self,
        window: &dyn HostWindow,
        pointer: &dyn PointerDevice,
        consumer: &mut dyn TextureConsumer,
    ) -> Result<(), RenderError> {
        if !self.visible {
            return Ok(());
        }

        let (width, height) = window.pixel_size();
        let resized = self
            .surface
            .as_ref()
            .is_none_or(|s| (s.width(), s.height()) != (width, height));
        if resized {
            self.surface = Some(RasterSurface::new(width, height));
            // The root stretches to fill the window.
            self.widgets.set(self.root, "minWidth", f64::from(width))?;
            self.widgets.set(self.root, "minHeight", f64::from(height))?;
        }
        let avail = Size::new(f64::from(width), f64::from(height));

        if self.widgets.size(self.root).is_none() {
            self.widgets.compute_size(self.root, &self.shaper)?;
            // The window size is the root's full box; its children lay out
            // in whatever remains inside the root's own margin, border, and
            // padding.
            let inner = self.widgets.content_area(self.root, avail)?;
            self.widgets.update_layout(self.root, inner, &self.shaper)?;
        }

        self.update_hover(pointer, width, height)?;

        if let Some(surface) = self.surface.as_mut() {
            surface.clear();
            self.widgets.render(self.root, surface, &self.shaper, avail)?;
            consumer.present(width, height, surface.pixels());
        }
        Ok(())
    }

    /// Maps the pointer into pixel space, re-runs the hit test, and
    /// delivers leave events (in old front-to-back order) before enter
    /// events (in new front-to-back order).
    fn update_hover(
        &mut self,
        pointer: &dyn PointerDevice,
        width: u32,
        height: u32,
    ) -> Result<(), RenderError> {
        let hits = match pointer.position() {
            Some(normalized) => {
                let px = (normalized.x + 1.0) / 2.0 * f64::from(width);
                let py = (1.0 - normalized.y) / 2.0 * f64::from(height);
                self.widgets.hit_test(self.root, Point::new(px, py))
            }
            None => Vec::new(),
        };

        let previous = std::mem::replace(&mut self.hover, hits);
        for node in &previous {
            if !self.hover.contains(node) {
                self.widgets.pointer_leave(*node)?;
            }
        }
        for node in self.hover.clone() {
            if !previous.contains(&node) {
                self.widgets.pointer_enter(node)?;
            }
        }
        Ok(())
    }

    /// Delivers a pointer press to the hovered widgets front-to-back,
    /// stopping at the first one that consumes it. Returns whether any
    /// widget consumed the press.
    ///
    /// # Errors
    ///
    /// Returns an error if a widget's press handling fails.
    pub fn pointer_down(&mut self) -> Result<bool, RenderError> {
        for node in self.hover.clone() {
            if self.widgets.pointer_down(node)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Delivers a pointer release to the hovered widgets front-to-back,
    /// stopping at the first one that consumes it (a pressed button fires
    /// its `"click"` event here).
    ///
    /// # Errors
    ///
    /// Returns an error if a widget's release handling or a `"click"`
    /// listener fails.
    pub fn pointer_up(&mut self) -> Result<bool, RenderError> {
        for node in self.hover.clone() {
            if self.widgets.pointer_up(node)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// The widgets currently under the pointer, deepest-first.
    #[must_use]
    pub fn hovered(&self) -> &[NodeId] {
        &self.hover
    }
}

impl<S: TextShaper> std::fmt::Debug for Manager<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Manager")
            .field("root", &self.root)
            .field("visible", &self.visible)
            .field("hover", &self.hover)
            .finish_non_exhaustive()
    }
}
