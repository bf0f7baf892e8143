// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Box-model sizing and box layout.
//!
//! `compute_size` is sealed: every kind's footprint is its content size,
//! clamped to the min/max properties, plus the margin, border, and padding
//! sums per axis. Only the content size dispatches on the kind.
//!
//! Box layout is a single forward pass along the primary axis with
//! `spacing` between children (not after the last), cross-axis placement
//! by `cross_align × (available − child)` clamped at zero, and the whole
//! run shifted by `primary_align × slack` when the children underfill the
//! primary axis.

use canopy_imaging::{FontSpec, TextShaper};
use canopy_property::NodeId;
use kurbo::{Point, Size};
use smallvec::SmallVec;

use crate::error::RenderError;
use crate::kind::Kind;
use crate::tree::WidgetTree;

/// Which axis children flow along.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    pub(crate) fn primary(self, size: Size) -> f64 {
        match self {
            Self::Horizontal => size.width,
            Self::Vertical => size.height,
        }
    }

    pub(crate) fn cross(self, size: Size) -> f64 {
        match self {
            Self::Horizontal => size.height,
            Self::Vertical => size.width,
        }
    }

    pub(crate) fn point(self, primary: f64, cross: f64) -> Point {
        match self {
            Self::Horizontal => Point::new(primary, cross),
            Self::Vertical => Point::new(cross, primary),
        }
    }
}

impl WidgetTree {
    pub(crate) fn axis(&mut self, node: NodeId) -> Result<Axis, RenderError> {
        let orientation = self.value(node, "orientation")?;
        Ok(match orientation.as_str() {
            Some("vertical") => Axis::Vertical,
            _ => Axis::Horizontal,
        })
    }

    /// The font a text node resolves from its (inheriting) properties.
    pub(crate) fn font_spec(&mut self, node: NodeId) -> Result<FontSpec, RenderError> {
        let family = self
            .value(node, "fontFamily")?
            .as_str()
            .map_or_else(|| String::from("sans"), String::from);
        let size = self.number(node, "fontSize")?;
        Ok(FontSpec::new(family, size))
    }

    /// The node's full box-model size: content (clamped to min/max) plus
    /// margin, border, and padding sums. Cached until invalidated.
    ///
    /// # Errors
    ///
    /// Returns an error on stale ids or malformed box-model values.
    pub fn compute_size(
        &mut self,
        node: NodeId,
        shaper: &dyn TextShaper,
    ) -> Result<Size, RenderError> {
        if let Some(size) = self.size(node) {
            return Ok(size);
        }
        let content = self.content_size(node, shaper)?;
        let min_w = self.number(node, "minWidth")?;
        let min_h = self.number(node, "minHeight")?;
        let max_w = self.number(node, "maxWidth")?;
        let max_h = self.number(node, "maxHeight")?;
        // Min wins over max when they conflict.
        let content = Size::new(
            content.width.min(max_w).max(min_w),
            content.height.min(max_h).max(min_h),
        );

        let margin = self.rect_sides(node, "margin")?;
        let border = self.rect_sides(node, "border")?;
        let padding = self.rect_sides(node, "padding")?;
        let size = Size::new(
            content.width + margin[0] + margin[2] + border[0] + border[2] + padding[0] + padding[2],
            content.height
                + margin[1]
                + margin[3]
                + border[1]
                + border[3]
                + padding[1]
                + padding[3],
        );

        let data = self.tree.data_mut(node)?;
        data.size = Some(size);
        data.size_valid = true;
        Ok(size)
    }

    /// The kind-specific content size, before clamping and box sums.
    fn content_size(&mut self, node: NodeId, shaper: &dyn TextShaper) -> Result<Size, RenderError> {
        match self.kind(node)? {
            Kind::Blank => Ok(Size::new(
                self.number(node, "width")?,
                self.number(node, "height")?,
            )),
            Kind::Text | Kind::Button => {
                let font = self.font_spec(node)?;
                let text = self
                    .value(node, "text")?
                    .as_str()
                    .map_or_else(String::new, String::from);
                Ok(shaper.measure(&font, &text))
            }
            Kind::Box | Kind::HBox | Kind::VBox => {
                let children: Vec<NodeId> = self.children(node)?.to_vec();
                if children.is_empty() {
                    return Ok(Size::ZERO);
                }
                let axis = self.axis(node)?;
                let spacing = self.number(node, "spacing")?;
                let mut primary = 0.0_f64;
                let mut cross = 0.0_f64;
                for (i, child) in children.iter().enumerate() {
                    let child_size = self.compute_size(*child, shaper)?;
                    if i > 0 {
                        primary += spacing;
                    }
                    primary += axis.primary(child_size);
                    cross = cross.max(axis.cross(child_size));
                }
                Ok(match axis {
                    Axis::Horizontal => Size::new(primary.max(0.0), cross),
                    Axis::Vertical => Size::new(cross, primary.max(0.0)),
                })
            }
        }
    }

    /// The content-area size inside a node's margin, border, and padding,
    /// given its full size. This is the size to hand to
    /// [`WidgetTree::update_layout`] when the node's full box is known.
    ///
    /// # Errors
    ///
    /// Returns an error on a stale id or malformed box-model values.
    pub fn content_area(&mut self, node: NodeId, size: Size) -> Result<Size, RenderError> {
        let margin = self.rect_sides(node, "margin")?;
        let border = self.rect_sides(node, "border")?;
        let padding = self.rect_sides(node, "padding")?;
        Ok(Size::new(
            (size.width
                - margin[0]
                - margin[2]
                - border[0]
                - border[2]
                - padding[0]
                - padding[2])
                .max(0.0),
            (size.height
                - margin[1]
                - margin[3]
                - border[1]
                - border[3]
                - padding[1]
                - padding[3])
                .max(0.0),
        ))
    }

    /// Positions a container's children within `avail` (the container's
    /// content-area size) and recurses into child containers with their
    /// own content areas. Non-containers are a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error on stale ids or malformed box-model values.
    pub fn update_layout(
        &mut self,
        node: NodeId,
        avail: Size,
        shaper: &dyn TextShaper,
    ) -> Result<(), RenderError> {
        if !self.kind(node)?.is_container() {
            return Ok(());
        }
        let children: Vec<NodeId> = self.children(node)?.to_vec();
        if children.is_empty() {
            return Ok(());
        }
        let axis = self.axis(node)?;
        let spacing = self.number(node, "spacing")?;
        let h_align = self.number(node, "horizontalAlign")?;
        let v_align = self.number(node, "verticalAlign")?;
        let (primary_align, cross_align) = match axis {
            Axis::Horizontal => (h_align, v_align),
            Axis::Vertical => (v_align, h_align),
        };

        let mut sizes: SmallVec<[Size; 4]> = SmallVec::with_capacity(children.len());
        let mut total = 0.0_f64;
        for (i, child) in children.iter().enumerate() {
            let child_size = self.compute_size(*child, shaper)?;
            if i > 0 {
                total += spacing;
            }
            total += axis.primary(child_size);
            sizes.push(child_size);
        }
        let slack = (axis.primary(avail) - total).max(0.0);
        let mut cursor = primary_align * slack;

        for (child, child_size) in children.iter().zip(sizes) {
            let cross_offset =
                (cross_align * (axis.cross(avail) - axis.cross(child_size))).max(0.0);
            let position = axis.point(cursor, cross_offset);
            self.tree.data_mut(*child)?.position = Some(position);
            if self.kind(*child)?.is_container() {
                let inner = self.content_area(*child, child_size)?;
                self.update_layout(*child, inner, shaper)?;
            }
            cursor += axis.primary(child_size) + spacing;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canopy_imaging::FixedMetrics;

    #[test]
    fn box_model_sums_around_content() {
        let mut widgets = WidgetTree::new();
        let node = widgets.insert(Kind::Blank, "n", None).unwrap();
        widgets.set(node, "width", 50.0).unwrap();
        widgets.set(node, "height", 20.0).unwrap();
        widgets.set(node, "padding", 2.0).unwrap();
        let size = widgets.compute_size(node, &FixedMetrics).unwrap();
        assert_eq!(size, Size::new(54.0, 24.0));
    }

    #[test]
    fn min_and_max_clamp_content() {
        let mut widgets = WidgetTree::new();
        let node = widgets.insert(Kind::Blank, "n", None).unwrap();
        widgets.set(node, "width", 100.0).unwrap();
        widgets.set(node, "maxWidth", 60.0).unwrap();
        widgets.set(node, "minHeight", 10.0).unwrap();
        let size = widgets.compute_size(node, &FixedMetrics).unwrap();
        assert_eq!(size, Size::new(60.0, 10.0));
    }

    #[test]
    fn text_sizes_from_measurement() {
        let mut widgets = WidgetTree::new();
        let label = widgets.insert(Kind::Text, "t", None).unwrap();
        widgets.set(label, "text", "hello").unwrap();
        widgets.set(label, "fontSize", 10.0).unwrap();
        let size = widgets.compute_size(label, &FixedMetrics).unwrap();
        assert_eq!(size, Size::new(30.0, 12.0));
    }

    #[test]
    fn empty_box_is_zero_even_with_spacing() {
        let mut widgets = WidgetTree::new();
        let empty = widgets.insert(Kind::HBox, "e", None).unwrap();
        widgets.set(empty, "spacing", 50.0).unwrap();
        let size = widgets.compute_size(empty, &FixedMetrics).unwrap();
        assert_eq!(size, Size::ZERO);
    }

    #[test]
    fn hbox_content_is_sum_plus_spacing_and_max_cross() {
        let mut widgets = WidgetTree::new();
        let hbox = widgets.insert(Kind::HBox, "h", None).unwrap();
        for (id, w, h) in [("a", 10.0, 8.0), ("b", 20.0, 12.0)] {
            let child = widgets.insert(Kind::Blank, id, Some(hbox)).unwrap();
            widgets.set(child, "width", w).unwrap();
            widgets.set(child, "height", h).unwrap();
        }
        let size = widgets.compute_size(hbox, &FixedMetrics).unwrap();
        assert_eq!(size, Size::new(35.0, 12.0));
    }

    #[test]
    fn centered_hbox_distributes_slack_to_the_run() {
        let mut widgets = WidgetTree::new();
        let hbox = widgets.insert(Kind::HBox, "h", None).unwrap();
        widgets.set(hbox, "horizontalAlign", "center").unwrap();
        let a = widgets.insert(Kind::Blank, "a", Some(hbox)).unwrap();
        widgets.set(a, "width", 10.0).unwrap();
        widgets.set(a, "height", 5.0).unwrap();
        let b = widgets.insert(Kind::Blank, "b", Some(hbox)).unwrap();
        widgets.set(b, "width", 20.0).unwrap();
        widgets.set(b, "height", 5.0).unwrap();

        widgets.compute_size(hbox, &FixedMetrics).unwrap();
        widgets
            .update_layout(hbox, Size::new(50.0, 5.0), &FixedMetrics)
            .unwrap();
        assert_eq!(widgets.position(a).unwrap(), Point::new(7.5, 0.0));
        assert_eq!(widgets.position(b).unwrap(), Point::new(22.5, 0.0));
    }

    #[test]
    fn cross_alignment_clamps_at_zero_for_oversized_children() {
        let mut widgets = WidgetTree::new();
        let hbox = widgets.insert(Kind::HBox, "h", None).unwrap();
        widgets.set(hbox, "verticalAlign", "bottom").unwrap();
        let tall = widgets.insert(Kind::Blank, "tall", Some(hbox)).unwrap();
        widgets.set(tall, "width", 10.0).unwrap();
        widgets.set(tall, "height", 30.0).unwrap();

        widgets
            .update_layout(hbox, Size::new(40.0, 20.0), &FixedMetrics)
            .unwrap();
        // 20 - 30 is negative; the child pins to the top, not off-canvas.
        assert_eq!(widgets.position(tall).unwrap(), Point::new(0.0, 0.0));
    }

    #[test]
    fn vbox_flows_down_and_aligns_across() {
        let mut widgets = WidgetTree::new();
        let vbox = widgets.insert(Kind::VBox, "v", None).unwrap();
        widgets.set(vbox, "spacing", 2.0).unwrap();
        widgets.set(vbox, "horizontalAlign", "right").unwrap();
        let a = widgets.insert(Kind::Blank, "a", Some(vbox)).unwrap();
        widgets.set(a, "width", 10.0).unwrap();
        widgets.set(a, "height", 4.0).unwrap();
        let b = widgets.insert(Kind::Blank, "b", Some(vbox)).unwrap();
        widgets.set(b, "width", 20.0).unwrap();
        widgets.set(b, "height", 6.0).unwrap();

        widgets
            .update_layout(vbox, Size::new(20.0, 12.0), &FixedMetrics)
            .unwrap();
        assert_eq!(widgets.position(a).unwrap(), Point::new(10.0, 0.0));
        assert_eq!(widgets.position(b).unwrap(), Point::new(0.0, 6.0));
    }

    #[test]
    fn layout_recurses_into_nested_containers() {
        let mut widgets = WidgetTree::new();
        let outer = widgets.insert(Kind::HBox, "outer", None).unwrap();
        widgets.set(outer, "spacing", 0.0).unwrap();
        let inner = widgets.insert(Kind::VBox, "inner", Some(outer)).unwrap();
        widgets.set(inner, "spacing", 0.0).unwrap();
        let leaf = widgets.insert(Kind::Blank, "leaf", Some(inner)).unwrap();
        widgets.set(leaf, "width", 5.0).unwrap();
        widgets.set(leaf, "height", 5.0).unwrap();

        let size = widgets.compute_size(outer, &FixedMetrics).unwrap();
        widgets.update_layout(outer, size, &FixedMetrics).unwrap();
        assert_eq!(widgets.position(inner).unwrap(), Point::new(0.0, 0.0));
        assert_eq!(widgets.position(leaf).unwrap(), Point::new(0.0, 0.0));
    }

    #[test]
    fn invalidation_forces_resize_on_next_compute() {
        let mut widgets = WidgetTree::new();
        let hbox = widgets.insert(Kind::HBox, "h", None).unwrap();
        widgets.set(hbox, "spacing", 0.0).unwrap();
        let child = widgets.insert(Kind::Blank, "c", Some(hbox)).unwrap();
        widgets.set(child, "width", 10.0).unwrap();
        widgets.set(child, "height", 10.0).unwrap();

        assert_eq!(
            widgets.compute_size(hbox, &FixedMetrics).unwrap(),
            Size::new(10.0, 10.0)
        );
        widgets.set(child, "width", 25.0).unwrap();
        assert_eq!(
            widgets.compute_size(hbox, &FixedMetrics).unwrap(),
            Size::new(25.0, 10.0)
        );
    }
}
