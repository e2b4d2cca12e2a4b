// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editing tools: node creation, edge creation, selection.

use dfd_editor_model::{generate_id, tags, Document, Element, Point, Size};

/// Node kinds creatable from the tool palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Storage node (database, file store).
    Storage,
    /// Function node (process).
    Function,
    /// Input/output node (external entity).
    InputOutput,
}

impl NodeKind {
    /// All kinds in palette order.
    pub const ALL: [Self; 3] = [Self::Storage, Self::InputOutput, Self::Function];

    /// The document type tag of this kind.
    pub fn type_tag(self) -> &'static str {
        match self {
            Self::Storage => tags::STORAGE,
            Self::Function => tags::FUNCTION,
            Self::InputOutput => tags::INPUT_OUTPUT,
        }
    }

    /// Palette display name.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Storage => "Storage node",
            Self::Function => "Function node",
            Self::InputOutput => "Input/Output node",
        }
    }

    /// Text a freshly created node starts with.
    pub fn default_text(self) -> &'static str {
        match self {
            Self::Storage => "Storage",
            Self::Function => "Function",
            Self::InputOutput => "IO",
        }
    }

    /// Size a freshly created node starts with.
    pub fn default_size(self) -> Size {
        match self {
            Self::Storage => Size {
                width: 60.0,
                height: 30.0,
            },
            Self::Function => Size {
                width: 50.0,
                height: 50.0,
            },
            Self::InputOutput => Size {
                width: 70.0,
                height: 40.0,
            },
        }
    }

    /// Kind matching a document type tag, if any.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.type_tag() == tag)
    }
}

/// The active editing tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    /// Click selects, drag moves.
    #[default]
    Select,
    /// Next click on empty canvas creates a node of this kind.
    AddNode(NodeKind),
    /// Two clicks on nodes create an arrow edge.
    AddEdge,
}

impl Tool {
    /// Palette display name.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Select => "Select",
            Self::AddNode(kind) => kind.display_name(),
            Self::AddEdge => "Edge with an arrowhead",
        }
    }
}

/// Two-click state machine for edge creation: the first click picks the
/// source, the second a different target.
#[derive(Debug, Default)]
pub struct EdgeDraft {
    source: Option<String>,
}

impl EdgeDraft {
    /// The picked source id, if the first click happened.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Abandon the draft.
    pub fn reset(&mut self) {
        self.source = None;
    }

    /// Feed a clicked element id. Returns the `(source, target)` pair once
    /// the draft is complete; a click on the source itself is ignored.
    pub fn click(&mut self, element_id: &str) -> Option<(String, String)> {
        match self.source.take() {
            None => {
                self.source = Some(element_id.to_string());
                None
            }
            Some(source) if source == element_id => {
                // Self-edges are rejected; keep waiting for a target.
                self.source = Some(source);
                None
            }
            Some(source) => Some((source, element_id.to_string())),
        }
    }
}

/// Build a new node of the given kind centered on a point.
pub fn make_node(kind: NodeKind, center: Point) -> Element {
    let size = kind.default_size();
    Element::new(kind.type_tag(), generate_id(kind.type_tag()))
        .with_text(kind.default_text())
        .with_position(center.x - size.width / 2.0, center.y - size.height / 2.0)
        .with_size(size.width, size.height)
}

/// Build a new arrow edge between two elements.
pub fn make_edge(source_id: &str, target_id: &str) -> Element {
    Element::edge(tags::ARROW_EDGE, generate_id("edge"), source_id, target_id)
}

/// Write new display text to an element.
///
/// The text goes to the derived label child when the element is expanded,
/// so the retract on save folds it back into the element's own `text`.
/// Returns whether anything changed.
pub fn set_label_text(document: &mut Document, id: &str, text: &str) -> bool {
    let Some(element) = document.find_mut(id) else {
        return false;
    };
    let target = match element
        .children
        .iter_mut()
        .find(|child| child.type_tag == tags::LABEL)
    {
        Some(label) => &mut label.text,
        None => &mut element.text,
    };
    if target.as_deref() == Some(text) {
        return false;
    }
    *target = Some(text.to_string());
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_draft_completes_on_the_second_distinct_click() {
        let mut draft = EdgeDraft::default();
        assert_eq!(draft.click("n1"), None);
        assert_eq!(draft.source(), Some("n1"));
        assert_eq!(
            draft.click("n2"),
            Some(("n1".to_string(), "n2".to_string()))
        );
        assert_eq!(draft.source(), None);
    }

    #[test]
    fn edge_draft_rejects_self_edges() {
        let mut draft = EdgeDraft::default();
        draft.click("n1");
        assert_eq!(draft.click("n1"), None);
        // The source survives the rejected click.
        assert_eq!(draft.source(), Some("n1"));
    }

    #[test]
    fn edge_draft_reset_abandons_the_source() {
        let mut draft = EdgeDraft::default();
        draft.click("n1");
        draft.reset();
        assert_eq!(draft.source(), None);
        assert_eq!(draft.click("n2"), None);
    }

    #[test]
    fn created_nodes_are_centered_on_the_click_point() {
        let node = make_node(NodeKind::Storage, Point { x: 100.0, y: 50.0 });
        assert_eq!(node.type_tag, tags::STORAGE);
        let position = node.position.unwrap();
        assert_eq!(position.x, 70.0);
        assert_eq!(position.y, 35.0);
        assert_eq!(node.size.unwrap().width, 60.0);
    }

    #[test]
    fn edited_label_text_survives_the_retract_on_save() {
        use dfd_editor_model::{default_registry, process_tree, TreeMode};

        let registry = default_registry();
        let mut node = make_node(NodeKind::Storage, Point { x: 0.0, y: 0.0 });
        process_tree(&mut node, TreeMode::Expand, &registry);
        let id = node.id.clone();

        let mut document = Document::new();
        document.add_child(node).unwrap();
        assert!(set_label_text(&mut document, &id, "Orders"));

        // The edit lands on the derived label child.
        let label = document.find(&id).unwrap().label_child().unwrap();
        assert_eq!(label.text.as_deref(), Some("Orders"));

        // Retract folds it back into the element itself.
        process_tree(document.root_mut(), TreeMode::Retract, &registry);
        let element = document.find(&id).unwrap();
        assert_eq!(element.text.as_deref(), Some("Orders"));
        assert!(element.children.is_empty());
    }

    #[test]
    fn set_label_text_reports_whether_anything_changed() {
        let mut document = Document::new();
        document
            .add_child(Element::new(tags::STORAGE, "n1").with_text("Database"))
            .unwrap();

        // No label child: the element's own text is edited.
        assert!(set_label_text(&mut document, "n1", "Archive"));
        assert_eq!(document.find("n1").unwrap().text.as_deref(), Some("Archive"));

        // Identical text and unknown ids are no-ops.
        assert!(!set_label_text(&mut document, "n1", "Archive"));
        assert!(!set_label_text(&mut document, "ghost", "x"));
    }

    #[test]
    fn kind_and_tag_map_both_ways() {
        for kind in NodeKind::ALL {
            assert_eq!(NodeKind::from_tag(kind.type_tag()), Some(kind));
        }
        assert_eq!(NodeKind::from_tag("edge:arrow"), None);
    }
}
