// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-kind property schemas.
//!
//! Every kind registers its property names, defaults, converters, and
//! inheritance flags at construction. Unknown names stay permitted (the
//! lenient extension path), but everything layout and rendering read is
//! declared here.

use canopy_property::convert::{to_alignment, to_color, to_number};
use canopy_property::{NodeId, PropertyDefault, PropertyError, PropertyTree, Value};

use crate::kind::{Kind, WidgetData};

fn infinity() -> Value {
    Value::Number(f64::INFINITY)
}

/// Registers the schema for `kind` on a freshly inserted node.
pub(crate) fn apply(
    tree: &mut PropertyTree<WidgetData>,
    node: NodeId,
    kind: Kind,
) -> Result<(), PropertyError> {
    // Box model, common to every kind.
    tree.add_property(node, "width", Value::from(0.0), Some(to_number), false)?;
    tree.add_property(node, "height", Value::from(0.0), Some(to_number), false)?;
    tree.add_property(node, "minWidth", Value::from(0.0), Some(to_number), false)?;
    tree.add_property(node, "minHeight", Value::from(0.0), Some(to_number), false)?;
    tree.add_property(
        node,
        "maxWidth",
        PropertyDefault::Lazy(infinity),
        Some(to_number),
        false,
    )?;
    tree.add_property(
        node,
        "maxHeight",
        PropertyDefault::Lazy(infinity),
        Some(to_number),
        false,
    )?;
    tree.add_rect_property(node, "margin", 0.into(), Some(to_number), false)?;
    tree.add_rect_property(node, "padding", 0.into(), Some(to_number), false)?;
    tree.add_rect_property(node, "border", 0.into(), Some(to_number), false)?;
    tree.add_property(
        node,
        "borderColor",
        Value::from("#000000"),
        Some(to_color),
        false,
    )?;
    tree.add_property(
        node,
        "backgroundColor",
        Value::from("#00000000"),
        Some(to_color),
        false,
    )?;
    tree.add_property(
        node,
        "horizontalAlign",
        Value::from("left"),
        Some(to_alignment),
        false,
    )?;
    tree.add_property(
        node,
        "verticalAlign",
        Value::from("top"),
        Some(to_alignment),
        false,
    )?;

    // Text styling inherits down the tree regardless of kind, so a Box can
    // carry the font for the labels inside it.
    tree.add_property(node, "fontSize", Value::from(16.0), Some(to_number), true)?;
    tree.add_property(
        node,
        "fontColor",
        Value::from("#00FF00"),
        Some(to_color),
        true,
    )?;
    tree.add_property(node, "fontFamily", Value::from("sans"), None, true)?;

    if kind.is_container() {
        tree.add_property(node, "spacing", Value::from(5.0), Some(to_number), false)?;
        tree.add_property(
            node,
            "orientation",
            Value::from(kind.default_orientation()),
            None,
            false,
        )?;
    }
    if kind.is_text() {
        tree.add_property(node, "text", Value::from(""), None, false)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use canopy_property::PropertySet;

    #[test]
    fn blank_schema_defaults() {
        let mut tree: PropertyTree<WidgetData> = PropertyTree::new();
        let node = tree
            .insert(PropertySet::new("n"), WidgetData::new(Kind::Blank), None)
            .unwrap();
        apply(&mut tree, node, Kind::Blank).unwrap();

        assert_eq!(tree.value(node, "width").unwrap(), Value::Number(0.0));
        assert_eq!(
            tree.value(node, "maxWidth").unwrap(),
            Value::Number(f64::INFINITY)
        );
        assert_eq!(tree.value(node, "fontSize").unwrap(), Value::Number(16.0));
        assert!(matches!(
            tree.value(node, "backgroundColor").unwrap(),
            Value::Color(_)
        ));
        // Blank is not a container and carries no text run.
        assert!(!tree.props(node).unwrap().has_property("spacing"));
        assert!(!tree.props(node).unwrap().has_property("text"));
    }

    #[test]
    fn orientation_defaults_per_kind() {
        let mut tree: PropertyTree<WidgetData> = PropertyTree::new();
        let hbox = tree
            .insert(PropertySet::new("h"), WidgetData::new(Kind::HBox), None)
            .unwrap();
        apply(&mut tree, hbox, Kind::HBox).unwrap();
        let vbox = tree
            .insert(PropertySet::new("v"), WidgetData::new(Kind::VBox), None)
            .unwrap();
        apply(&mut tree, vbox, Kind::VBox).unwrap();

        assert_eq!(
            tree.value(hbox, "orientation").unwrap(),
            Value::from("horizontal")
        );
        assert_eq!(
            tree.value(vbox, "orientation").unwrap(),
            Value::from("vertical")
        );
    }

    #[test]
    fn rect_properties_read_as_four_zeroes() {
        let mut tree: PropertyTree<WidgetData> = PropertyTree::new();
        let node = tree
            .insert(PropertySet::new("n"), WidgetData::new(Kind::Box), None)
            .unwrap();
        apply(&mut tree, node, Kind::Box).unwrap();
        assert_eq!(
            tree.value(node, "margin").unwrap(),
            Value::List(vec![Value::Number(0.0); 4])
        );
    }
}
