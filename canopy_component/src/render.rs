// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The sealed render pass.
//!
//! Every widget renders the same shell: clip to the available region,
//! move past the margin, stroke the (uniform) border and move inside it,
//! fill the background when it has any alpha, move past the padding, then
//! hand the remaining region to the kind-specific content. Surface state
//! is saved around the whole sequence so a failing step cannot leak
//! translation or clip into siblings.

use canopy_imaging::{Surface, TextShaper};
use canopy_property::NodeId;
use kurbo::{Point, Rect, Size};
use peniko::Color;

use crate::error::RenderError;
use crate::kind::Kind;
use crate::tree::WidgetTree;

impl WidgetTree {
    /// Renders a widget into `avail`, the region its parent assigned
    /// (normally the widget's own computed size).
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::NonUniformBorder`] for unequal border sides,
    /// or an error on stale ids and malformed box-model values. The
    /// surface state is restored either way.
    pub fn render(
        &mut self,
        node: NodeId,
        surface: &mut dyn Surface,
        shaper: &dyn TextShaper,
        avail: Size,
    ) -> Result<(), RenderError> {
        surface.save();
        let result = self.render_shell(node, surface, shaper, avail);
        surface.restore();
        result
    }

    fn render_shell(
        &mut self,
        node: NodeId,
        surface: &mut dyn Surface,
        shaper: &dyn TextShaper,
        avail: Size,
    ) -> Result<(), RenderError> {
        surface.clip_rect(Rect::new(0.0, 0.0, avail.width, avail.height));

        let margin = self.rect_sides(node, "margin")?;
        surface.translate(margin[0], margin[1]);
        let mut region = Size::new(
            (avail.width - margin[0] - margin[2]).max(0.0),
            (avail.height - margin[1] - margin[3]).max(0.0),
        );

        let border = self.rect_sides(node, "border")?;
        if border.iter().any(|side| *side > 0.0) {
            if border.iter().any(|side| *side != border[0]) {
                return Err(RenderError::NonUniformBorder);
            }
            let width = border[0];
            let color = self
                .value(node, "borderColor")?
                .as_color()
                .unwrap_or(Color::TRANSPARENT);
            surface.set_stroke_color(color);
            surface.set_stroke_width(width);
            surface.stroke_rect(Rect::new(0.0, 0.0, region.width, region.height));
            surface.translate(width, width);
            region = Size::new(
                (region.width - 2.0 * width).max(0.0),
                (region.height - 2.0 * width).max(0.0),
            );
        }

        if let Some(background) = self.value(node, "backgroundColor")?.as_color()
            && background.components[3] > 0.0
        {
            surface.set_fill_color(background);
            surface.fill_rect(Rect::new(0.0, 0.0, region.width, region.height));
        }

        let padding = self.rect_sides(node, "padding")?;
        surface.translate(padding[0], padding[1]);
        region = Size::new(
            (region.width - padding[0] - padding[2]).max(0.0),
            (region.height - padding[1] - padding[3]).max(0.0),
        );

        self.render_content(node, surface, shaper, region)
    }

    /// Kind-specific drawing into the content region. Children clip and
    /// translate themselves, so containers only need the layout positions.
    fn render_content(
        &mut self,
        node: NodeId,
        surface: &mut dyn Surface,
        shaper: &dyn TextShaper,
        _region: Size,
    ) -> Result<(), RenderError> {
        match self.kind(node)? {
            Kind::Blank => Ok(()),
            Kind::Text | Kind::Button => {
                let font = self.font_spec(node)?;
                let text = self
                    .value(node, "text")?
                    .as_str()
                    .map_or_else(String::new, String::from);
                if text.is_empty() {
                    return Ok(());
                }
                let color = self
                    .value(node, "fontColor")?
                    .as_color()
                    .unwrap_or(Color::TRANSPARENT);
                surface.set_fill_color(color);
                surface.fill_text(&font, &text, Point::ORIGIN);
                Ok(())
            }
            Kind::Box | Kind::HBox | Kind::VBox => {
                let children: Vec<NodeId> = self.children(node)?.to_vec();
                for child in children {
                    let position = self.position(child).unwrap_or(Point::ORIGIN);
                    let child_size = self.compute_size(child, shaper)?;
                    surface.save();
                    surface.translate(position.x, position.y);
                    let result = self.render(child, surface, shaper, child_size);
                    surface.restore();
                    result?;
                }
                Ok(())
            }
        }
    }
}
