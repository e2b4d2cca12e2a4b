// SPDX-License-Identifier: MIT OR Apache-2.0
//! The diagram element tree and its JSON schema.
//!
//! Field names mirror the persisted document format (camelCase, optional
//! fields omitted when absent). Unknown fields in saved files - such as the
//! runtime-only `features` field older editors wrote - are ignored on load.

use crate::label_types::LabelAssignment;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Type tags of the data-flow diagram document format.
///
/// These are the contract between the document format and the
/// [`ElementRegistry`](crate::registry::ElementRegistry) lookup.
pub mod tags {
    /// The diagram root.
    pub const GRAPH: &str = "graph";
    /// Storage node (database, file store).
    pub const STORAGE: &str = "node:storage";
    /// Function node (process, system).
    pub const FUNCTION: &str = "node:function";
    /// Input/output node (external entity).
    pub const INPUT_OUTPUT: &str = "node:input-output";
    /// Directed data-flow edge with an arrowhead.
    pub const ARROW_EDGE: &str = "edge:arrow";
    /// Text label, usually a derived child of a node or edge.
    pub const LABEL: &str = "label";
    /// Persisted routing point of an edge.
    pub const ROUTING_POINT: &str = "routing-point";
    /// Transient routing point shown while an edge is being edited.
    pub const VOLATILE_ROUTING_POINT: &str = "volatile-routing-point";
}

/// A point in diagram coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

/// Width and height of an element.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    /// Width in diagram units.
    pub width: f64,
    /// Height in diagram units.
    pub height: f64,
}

/// Which side of an edge a label is placed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelSide {
    /// Directly on the edge line.
    On,
    /// Above the edge.
    Top,
    /// Below the edge.
    Bottom,
    /// Left of the edge.
    Left,
    /// Right of the edge.
    Right,
}

/// Placement of a label along its parent edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgePlacement {
    /// Position along the edge as a fraction in `0.0..=1.0`.
    pub position: f64,
    /// Side of the edge the label sits on.
    pub side: LabelSide,
    /// Whether the label rotates with the edge direction.
    pub rotate: bool,
}

impl EdgePlacement {
    /// Placement directly on the edge at the given fraction.
    pub fn on_edge(position: f64) -> Self {
        Self {
            position,
            side: LabelSide::On,
            rotate: false,
        }
    }
}

/// A single element in the diagram tree.
///
/// One struct covers every element kind; which optional fields are populated
/// depends on the type tag (nodes carry `position`/`size`, edges carry
/// `source_id`/`target_id`, labels carry `text` and maybe `edge_placement`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Type tag, resolved against the element registry.
    #[serde(rename = "type")]
    pub type_tag: String,
    /// Identifier, unique within a document.
    pub id: String,
    /// Display text of the element.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Top-left position of node-like elements.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Point>,
    /// Size of node-like elements.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    /// Source element id of edge-like elements.
    #[serde(default, rename = "sourceId", skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    /// Target element id of edge-like elements.
    #[serde(default, rename = "targetId", skip_serializing_if = "Option::is_none")]
    pub target_id: Option<String>,
    /// Placement of label elements that sit on an edge.
    #[serde(
        default,
        rename = "edgePlacement",
        skip_serializing_if = "Option::is_none"
    )]
    pub edge_placement: Option<EdgePlacement>,
    /// Child elements.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Element>,
    /// Label-type values assigned to this element.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<LabelAssignment>,
}

impl Element {
    /// Create a bare element with the given tag and id.
    pub fn new(type_tag: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            type_tag: type_tag.into(),
            id: id.into(),
            text: None,
            position: None,
            size: None,
            source_id: None,
            target_id: None,
            edge_placement: None,
            children: Vec::new(),
            labels: Vec::new(),
        }
    }

    /// Create a label element.
    pub fn label(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(tags::LABEL, id).with_text(text)
    }

    /// Create an edge element between two existing elements.
    pub fn edge(
        type_tag: impl Into<String>,
        id: impl Into<String>,
        source_id: impl Into<String>,
        target_id: impl Into<String>,
    ) -> Self {
        let mut element = Self::new(type_tag, id);
        element.source_id = Some(source_id.into());
        element.target_id = Some(target_id.into());
        element
    }

    /// Set the display text.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Set the position.
    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.position = Some(Point { x, y });
        self
    }

    /// Set the size.
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.size = Some(Size { width, height });
        self
    }

    /// First child carrying the `label` tag, if any.
    pub fn label_child(&self) -> Option<&Element> {
        self.children.iter().find(|child| child.type_tag == tags::LABEL)
    }
}

/// Generate a random element id with a type-specific prefix.
pub fn generate_id(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_fields_are_omitted_when_absent() {
        let node = Element::new(tags::STORAGE, "n1").with_text("Database");
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "type": "node:storage", "id": "n1", "text": "Database" })
        );
    }

    #[test]
    fn unknown_fields_are_ignored_on_load() {
        // Older editors persisted a runtime-only `features` object.
        let json = r#"{ "type": "graph", "id": "root", "features": {}, "zoom": 1.0 }"#;
        let element: Element = serde_json::from_str(json).unwrap();
        assert_eq!(element.type_tag, tags::GRAPH);
        assert_eq!(element.id, "root");
    }

    #[test]
    fn camel_case_edge_fields_round_trip() {
        let edge = Element::edge(tags::ARROW_EDGE, "e1", "n1", "n2").with_text("Read");
        let json = serde_json::to_value(&edge).unwrap();
        assert_eq!(json["sourceId"], "n1");
        assert_eq!(json["targetId"], "n2");
        let back: Element = serde_json::from_value(json).unwrap();
        assert_eq!(back, edge);
    }

    #[test]
    fn generated_ids_carry_the_prefix_and_differ() {
        let a = generate_id("storage");
        let b = generate_id("storage");
        assert!(a.starts_with("storage-"));
        assert_ne!(a, b);
    }
}
