// SPDX-License-Identifier: MIT OR Apache-2.0
//! The dynamic-children transform.
//!
//! Keeps the persisted document format decoupled from presentation-only
//! sub-elements: node and edge labels are derived from the parent's own
//! `text` field on load ([`TreeMode::Expand`]) and folded back into it on
//! save ([`TreeMode::Retract`]). Elements whose tag has no registration, or
//! an inert one, are left unchanged.

use crate::element::{tags, EdgePlacement, Element};
use crate::registry::{DynamicChildren, ElementRegistry};

/// Fraction along an edge where the derived label is placed.
const EDGE_LABEL_POSITION: f64 = 0.5;

/// Direction of the dynamic-children transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeMode {
    /// Derive presentation-only children from the element's attributes.
    Expand,
    /// Fold derived children back into the element and discard them.
    Retract,
}

/// Apply the transform to an element tree, in place.
///
/// Elements are visited parent before children; traversal recurses into
/// whatever children are present at the time of the call, so it covers the
/// freshly synthesized children after an expand and the original children
/// before a retract.
pub fn process_tree(element: &mut Element, mode: TreeMode, registry: &ElementRegistry) {
    if let Some(registration) = registry.get(&element.type_tag) {
        match registration.dynamic {
            DynamicChildren::Inert => {}
            DynamicChildren::Node { expand, retract } => match mode {
                TreeMode::Expand => expand(element),
                TreeMode::Retract => retract(element),
            },
            DynamicChildren::Edge { expand, retract } => {
                // The edge pair only applies to elements that actually carry
                // a source reference, mirroring the structural check of the
                // original format.
                if element.source_id.is_some() {
                    match mode {
                        TreeMode::Expand => expand(element),
                        TreeMode::Retract => retract(element),
                    }
                }
            }
        }
    }

    for child in &mut element.children {
        process_tree(child, mode, registry);
    }
}

/// Expand for node-like elements: one label child carrying the node's text.
pub fn expand_node_label(element: &mut Element) {
    let text = element.text.clone().unwrap_or_default();
    element.children = vec![Element::label(format!("{}-label", element.id), text)];
}

/// Expand for edge-like elements: one label child placed halfway along the
/// edge.
pub fn expand_edge_label(element: &mut Element) {
    let text = element.text.clone().unwrap_or_default();
    let mut label = Element::label(format!("{}-label", element.id), text);
    label.edge_placement = Some(EdgePlacement::on_edge(EDGE_LABEL_POSITION));
    element.children = vec![label];
}

/// Retract for both kinds: copy the label child's text back onto the
/// element (empty string if there is none) and drop all children.
pub fn retract_label(element: &mut Element) {
    let text = element
        .label_child()
        .and_then(|label| label.text.clone())
        .unwrap_or_default();
    element.text = Some(text);
    element.children.clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::LabelSide;
    use crate::registry::{default_registry, ElementKind, Registration};

    #[test]
    fn node_expand_synthesizes_a_centered_label_child() {
        let registry = default_registry();
        let mut node = Element::new(tags::STORAGE, "n1").with_text("Database");

        process_tree(&mut node, TreeMode::Expand, &registry);

        assert_eq!(node.text.as_deref(), Some("Database"));
        assert_eq!(node.children.len(), 1);
        let label = &node.children[0];
        assert_eq!(label.type_tag, tags::LABEL);
        assert_eq!(label.id, "n1-label");
        assert_eq!(label.text.as_deref(), Some("Database"));
        assert!(label.edge_placement.is_none());
    }

    #[test]
    fn node_expand_then_retract_restores_text_and_empties_children() {
        let registry = default_registry();
        let mut node = Element::new(tags::STORAGE, "n1").with_text("Database");

        process_tree(&mut node, TreeMode::Expand, &registry);
        process_tree(&mut node, TreeMode::Retract, &registry);

        assert_eq!(node.text.as_deref(), Some("Database"));
        assert!(node.children.is_empty());
    }

    #[test]
    fn edge_label_is_placed_halfway_along_the_edge() {
        let registry = default_registry();
        let mut edge = Element::edge(tags::ARROW_EDGE, "e1", "n1", "n2").with_text("Read");

        process_tree(&mut edge, TreeMode::Expand, &registry);

        assert_eq!(edge.children.len(), 1);
        let label = &edge.children[0];
        assert_eq!(label.type_tag, tags::LABEL);
        assert_eq!(label.text.as_deref(), Some("Read"));
        let placement = label.edge_placement.expect("edge label has a placement");
        assert_eq!(placement.position, 0.5);
        assert_eq!(placement.side, LabelSide::On);
        assert!(!placement.rotate);

        process_tree(&mut edge, TreeMode::Retract, &registry);
        assert_eq!(edge.text.as_deref(), Some("Read"));
        assert!(edge.children.is_empty());
    }

    #[test]
    fn edge_pair_is_skipped_without_a_source_reference() {
        let registry = default_registry();
        // Same tag as an edge, but structurally not an edge.
        let mut element = Element::new(tags::ARROW_EDGE, "e1").with_text("Read");

        process_tree(&mut element, TreeMode::Expand, &registry);

        assert!(element.children.is_empty());
        assert_eq!(element.text.as_deref(), Some("Read"));
    }

    #[test]
    fn unregistered_tags_are_left_unchanged_but_traversal_continues() {
        let registry = default_registry();
        let mut parent = Element::new("node:custom", "c1").with_text("Custom");
        parent
            .children
            .push(Element::new(tags::STORAGE, "n1").with_text("Inner"));

        process_tree(&mut parent, TreeMode::Expand, &registry);

        // The unregistered parent keeps its own fields and child list, while
        // the registered child below it was expanded.
        assert_eq!(parent.text.as_deref(), Some("Custom"));
        assert_eq!(parent.children.len(), 1);
        assert_eq!(parent.children[0].children.len(), 1);
        assert_eq!(parent.children[0].children[0].id, "n1-label");
    }

    #[test]
    fn retract_defaults_to_empty_text_when_the_label_is_missing() {
        let registry = default_registry();
        let mut node = Element::new(tags::FUNCTION, "f1");

        process_tree(&mut node, TreeMode::Retract, &registry);

        assert_eq!(node.text.as_deref(), Some(""));
        assert!(node.children.is_empty());
    }

    #[test]
    fn expand_walks_the_whole_tree_from_the_root() {
        let registry = default_registry();
        let mut root = Element::new(tags::GRAPH, "root");
        root.children
            .push(Element::new(tags::STORAGE, "n1").with_text("Database"));
        root.children
            .push(Element::edge(tags::ARROW_EDGE, "e1", "n1", "n2").with_text("Read"));

        process_tree(&mut root, TreeMode::Expand, &registry);

        assert_eq!(root.children[0].children.len(), 1);
        assert_eq!(root.children[1].children.len(), 1);
    }

    #[test]
    fn expand_is_driven_by_the_registry_not_the_tag_names() {
        // A custom registry can mark any tag as node-like.
        let mut registry = ElementRegistry::new();
        registry.register("widget", Registration::node(expand_node_label, retract_label));
        registry.register(tags::LABEL, Registration::inert(ElementKind::Label));

        let mut widget = Element::new("widget", "w1").with_text("hi");
        process_tree(&mut widget, TreeMode::Expand, &registry);
        assert_eq!(widget.children.len(), 1);
    }
}
