// SPDX-License-Identifier: MIT OR Apache-2.0
//! Save/load of diagram files.
//!
//! The saved form is the retracted tree (derived children stripped) wrapped
//! in an envelope that also carries the session's label types. For
//! compatibility with files written by older editor versions, the loader
//! also accepts a bare root element without the envelope.

use crate::document::{Document, DocumentError};
use crate::dynamic::{process_tree, TreeMode};
use crate::element::Element;
use crate::label_types::LabelType;
use crate::registry::ElementRegistry;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The envelope written to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedDiagram {
    /// The retracted document tree.
    pub model: Element,
    /// Label types of the editing session.
    #[serde(default, rename = "labelTypes", skip_serializing_if = "Vec::is_empty")]
    pub label_types: Vec<LabelType>,
}

/// Both accepted on-disk forms. The envelope is tried first; a file that is
/// just a root element (older editor versions) parses as `Bare`.
#[derive(Deserialize)]
#[serde(untagged)]
enum DiagramFile {
    Envelope(SavedDiagram),
    Bare(Element),
}

/// Error raised while saving or loading a diagram file.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    /// File could not be read or written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File is not valid JSON for either accepted form.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File parsed but violates the document invariants.
    #[error("invalid document: {0}")]
    Document(#[from] DocumentError),
}

/// Serialize a document to its storage form, pretty-printed with the
/// four-space indentation established files use.
///
/// The document itself is untouched; retraction runs on a copy.
pub fn to_json(
    document: &Document,
    label_types: &[LabelType],
    registry: &ElementRegistry,
) -> Result<String, PersistError> {
    let mut root = document.root().clone();
    process_tree(&mut root, TreeMode::Retract, registry);
    let saved = SavedDiagram {
        model: root,
        label_types: label_types.to_vec(),
    };

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    saved.serialize(&mut serializer)?;
    Ok(String::from_utf8(buf).expect("serde_json emits UTF-8"))
}

/// Parse a diagram from JSON, validate it, and expand derived children.
pub fn from_json(
    json: &str,
    registry: &ElementRegistry,
) -> Result<(Document, Vec<LabelType>), PersistError> {
    let file: DiagramFile = serde_json::from_str(json)?;
    let (root, label_types) = match file {
        DiagramFile::Envelope(saved) => (saved.model, saved.label_types),
        DiagramFile::Bare(root) => (root, Vec::new()),
    };

    let mut document = Document::from_root(root);
    document.validate()?;
    process_tree(document.root_mut(), TreeMode::Expand, registry);
    Ok((document, label_types))
}

/// Save a document to a file.
pub fn save_file(
    path: &Path,
    document: &Document,
    label_types: &[LabelType],
    registry: &ElementRegistry,
) -> Result<(), PersistError> {
    let json = to_json(document, label_types, registry)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Load a document from a file.
pub fn load_file(
    path: &Path,
    registry: &ElementRegistry,
) -> Result<(Document, Vec<LabelType>), PersistError> {
    let json = std::fs::read_to_string(path)?;
    from_json(&json, registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::tags;
    use crate::label_types::LabelTypeValue;
    use crate::registry::default_registry;

    fn sample_label_types() -> Vec<LabelType> {
        vec![LabelType {
            id: "t1".to_string(),
            name: "Sensitivity".to_string(),
            values: vec![
                LabelTypeValue {
                    id: "v1".to_string(),
                    text: "Public".to_string(),
                },
                LabelTypeValue {
                    id: "v2".to_string(),
                    text: "Confidential".to_string(),
                },
            ],
        }]
    }

    #[test]
    fn envelope_round_trip_preserves_document_and_label_types() {
        let registry = default_registry();
        let mut document = Document::default_diagram();
        process_tree(document.root_mut(), TreeMode::Expand, &registry);

        let json = to_json(&document, &sample_label_types(), &registry).unwrap();
        let (loaded, label_types) = from_json(&json, &registry).unwrap();

        assert_eq!(label_types, sample_label_types());
        // Both sides went through retract+expand, so text fields are
        // normalized to Some("") where they were absent.
        let mut expected = document.clone();
        process_tree(expected.root_mut(), TreeMode::Retract, &registry);
        process_tree(expected.root_mut(), TreeMode::Expand, &registry);
        assert_eq!(loaded, expected);
    }

    #[test]
    fn saved_form_has_no_derived_children() {
        let registry = default_registry();
        let mut document = Document::default_diagram();
        process_tree(document.root_mut(), TreeMode::Expand, &registry);

        let json = to_json(&document, &[], &registry).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        for child in value["model"]["children"].as_array().unwrap() {
            assert!(child.get("children").is_none(), "child still expanded: {child}");
        }
    }

    #[test]
    fn saved_files_use_four_space_indentation() {
        let registry = default_registry();
        let document = Document::default_diagram();
        let json = to_json(&document, &[], &registry).unwrap();
        assert!(json.contains("\n    \"model\""));
        assert!(!json.contains("\n  \""));
    }

    #[test]
    fn bare_root_form_is_accepted() {
        let registry = default_registry();
        let json = r#"{
            "type": "graph",
            "id": "root",
            "children": [
                { "type": "node:storage", "id": "n1", "text": "Database" }
            ]
        }"#;

        let (document, label_types) = from_json(json, &registry).unwrap();

        assert!(label_types.is_empty());
        let node = document.find("n1").unwrap();
        assert_eq!(node.children.len(), 1);
        assert_eq!(node.children[0].id, "n1-label");
    }

    #[test]
    fn retract_all_then_expand_all_matches_loading_the_retracted_form() {
        let registry = default_registry();
        let mut document = Document::default_diagram();
        process_tree(document.root_mut(), TreeMode::Expand, &registry);

        // Path one: retract a copy, serialize, load it back.
        let json = to_json(&document, &[], &registry).unwrap();
        let (loaded, _) = from_json(&json, &registry).unwrap();

        // Path two: retract then expand in memory.
        process_tree(document.root_mut(), TreeMode::Retract, &registry);
        process_tree(document.root_mut(), TreeMode::Expand, &registry);

        assert_eq!(loaded, document);
    }

    #[test]
    fn malformed_json_is_an_error() {
        let registry = default_registry();
        assert!(matches!(
            from_json("{ not json", &registry),
            Err(PersistError::Json(_))
        ));
    }

    #[test]
    fn invalid_documents_are_rejected_on_load() {
        let registry = default_registry();
        let json = r#"{
            "type": "graph",
            "id": "root",
            "children": [
                { "type": "edge:arrow", "id": "e1", "sourceId": "n1", "targetId": "n2" }
            ]
        }"#;
        assert!(matches!(
            from_json(json, &registry),
            Err(PersistError::Document(DocumentError::DanglingEdge { .. }))
        ));
    }

    #[test]
    fn file_round_trip() {
        let registry = default_registry();
        let mut document = Document::default_diagram();
        process_tree(document.root_mut(), TreeMode::Expand, &registry);

        let dir = std::env::temp_dir().join(format!("dfd-editor-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("diagram.json");

        save_file(&path, &document, &sample_label_types(), &registry).unwrap();
        let (loaded, label_types) = load_file(&path, &registry).unwrap();
        std::fs::remove_dir_all(&dir).unwrap();

        assert_eq!(label_types, sample_label_types());
        assert_eq!(
            loaded.root().children.len(),
            document.root().children.len()
        );
    }

    #[test]
    fn runtime_only_fields_in_old_files_are_dropped() {
        let registry = default_registry();
        let json = r#"{
            "type": "graph",
            "id": "root",
            "features": {},
            "children": [
                { "type": "node:function", "id": "f1", "text": "System", "features": {} }
            ]
        }"#;
        let (document, _) = from_json(json, &registry).unwrap();
        assert!(document.find("f1").is_some());
    }

    #[test]
    fn storage_node_expands_on_load_and_retracts_back() {
        let registry = default_registry();
        let json = r#"{ "type": "graph", "id": "root", "children": [
            { "type": "node:storage", "id": "n1", "text": "Database" }
        ]}"#;
        let (mut document, _) = from_json(json, &registry).unwrap();

        let node = document.find("n1").unwrap();
        assert_eq!(node.text.as_deref(), Some("Database"));
        assert_eq!(node.children.len(), 1);
        assert_eq!(node.children[0].type_tag, tags::LABEL);
        assert_eq!(node.children[0].text.as_deref(), Some("Database"));

        process_tree(document.root_mut(), TreeMode::Retract, &registry);
        let node = document.find("n1").unwrap();
        assert_eq!(node.text.as_deref(), Some("Database"));
        assert!(node.children.is_empty());
    }
}
