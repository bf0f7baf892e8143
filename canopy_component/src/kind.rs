// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Widget kinds and per-node widget state.

use kurbo::{Point, Size};

/// The concrete kind of a widget node.
///
/// Behavior (content sizing, layout, rendering, pointer handling) is
/// dispatched by matching on the kind; there is no inheritance chain.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Kind {
    /// A plain, empty component sized by its `width`/`height` properties.
    Blank,
    /// A container flowing children along one axis.
    Box,
    /// A [`Kind::Box`] defaulting to horizontal flow.
    HBox,
    /// A [`Kind::Box`] defaulting to vertical flow.
    VBox,
    /// A text label sized by measuring its `text` property.
    Text,
    /// An interactive text component with a press/click state machine.
    Button,
}

impl Kind {
    /// The type tags this kind matches in style selectors, most general
    /// first. Tags accumulate through the conceptual is-a chain, so a
    /// button matches `Component`, `Text`, and `Button` selectors.
    #[must_use]
    pub fn type_tags(self) -> &'static [&'static str] {
        match self {
            Self::Blank => &["Component"],
            Self::Box => &["Component", "Box"],
            Self::HBox => &["Component", "Box", "HBox"],
            Self::VBox => &["Component", "Box", "VBox"],
            Self::Text => &["Component", "Text"],
            Self::Button => &["Component", "Text", "Button"],
        }
    }

    /// Whether this kind lays out children.
    #[must_use]
    pub fn is_container(self) -> bool {
        matches!(self, Self::Box | Self::HBox | Self::VBox)
    }

    /// Whether this kind draws a text run.
    #[must_use]
    pub fn is_text(self) -> bool {
        matches!(self, Self::Text | Self::Button)
    }

    /// The default `orientation` property value for container kinds.
    #[must_use]
    pub(crate) fn default_orientation(self) -> &'static str {
        match self {
            Self::VBox => "vertical",
            _ => "horizontal",
        }
    }
}

/// Per-node widget state carried as the property tree's payload.
#[derive(Clone, Debug)]
pub struct WidgetData {
    pub(crate) kind: Kind,
    /// Interaction state tag: `""`, `"mouseOver"`, or `"down"`.
    pub(crate) state: String,
    /// Position assigned by the parent's layout, relative to the parent's
    /// content origin.
    pub(crate) position: Option<Point>,
    /// Cached box-model size from the last `compute_size`.
    pub(crate) size: Option<Size>,
    pub(crate) size_valid: bool,
}

impl WidgetData {
    pub(crate) fn new(kind: Kind) -> Self {
        Self {
            kind,
            state: String::new(),
            position: None,
            size: None,
            size_valid: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_accumulate_through_the_kind_chain() {
        assert_eq!(Kind::Blank.type_tags(), ["Component"]);
        assert_eq!(Kind::Button.type_tags(), ["Component", "Text", "Button"]);
        assert_eq!(Kind::VBox.type_tags(), ["Component", "Box", "VBox"]);
    }

    #[test]
    fn capability_predicates() {
        assert!(Kind::HBox.is_container());
        assert!(!Kind::Text.is_container());
        assert!(Kind::Button.is_text());
        assert!(!Kind::Box.is_text());
    }
}
