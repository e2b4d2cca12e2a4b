// SPDX-License-Identifier: MIT OR Apache-2.0
//! The diagram document: a tree of elements rooted at a `graph` element.

use crate::element::{generate_id, tags, Element};
use std::collections::HashSet;

/// A diagram document.
///
/// Constructed at load time from a file or [`Document::default_diagram`],
/// mutated in place by the editing tools, and serialized back to its
/// attribute-only storage form on save.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    root: Element,
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self {
            root: Element::new(tags::GRAPH, "root"),
        }
    }

    /// Wrap an existing root element.
    pub fn from_root(root: Element) -> Self {
        Self { root }
    }

    /// The root element.
    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Mutable access to the root element.
    pub fn root_mut(&mut self) -> &mut Element {
        &mut self.root
    }

    /// Find an element anywhere in the tree by id.
    pub fn find(&self, id: &str) -> Option<&Element> {
        find_in(&self.root, id)
    }

    /// Find an element anywhere in the tree by id, mutably.
    pub fn find_mut(&mut self, id: &str) -> Option<&mut Element> {
        find_in_mut(&mut self.root, id)
    }

    /// Append a top-level element, rejecting duplicate ids.
    pub fn add_child(&mut self, element: Element) -> Result<(), DocumentError> {
        if self.find(&element.id).is_some() {
            return Err(DocumentError::DuplicateId(element.id));
        }
        self.root.children.push(element);
        Ok(())
    }

    /// Remove the top-level elements with the given ids, together with every
    /// edge referencing one of them. Returns the number of removed elements.
    pub fn remove_elements(&mut self, ids: &HashSet<String>) -> usize {
        let before = self.root.children.len();
        self.root.children.retain(|child| {
            !(ids.contains(&child.id)
                || child.source_id.as_ref().is_some_and(|source| ids.contains(source))
                || child.target_id.as_ref().is_some_and(|target| ids.contains(target)))
        });
        before - self.root.children.len()
    }

    /// Remove one element (and its incident edges) by id.
    pub fn remove_element(&mut self, id: &str) -> usize {
        let mut ids = HashSet::new();
        ids.insert(id.to_string());
        self.remove_elements(&ids)
    }

    /// Check the document invariants: ids are unique and every edge
    /// references existing elements.
    pub fn validate(&self) -> Result<(), DocumentError> {
        let mut seen = HashSet::new();
        check_unique_ids(&self.root, &mut seen)?;
        check_edge_endpoints(&self.root, &seen)?;
        Ok(())
    }

    /// The hard-coded default diagram: a database read by a system that
    /// serves a customer.
    pub fn default_diagram() -> Self {
        let storage_id = generate_id("storage");
        let function_id = generate_id("function");
        let output_id = generate_id("io");

        let mut document = Self::new();
        document.root.children = vec![
            Element::new(tags::STORAGE, &storage_id)
                .with_text("Database")
                .with_position(100.0, 100.0),
            Element::new(tags::FUNCTION, &function_id)
                .with_text("System")
                .with_position(200.0, 200.0),
            Element::new(tags::INPUT_OUTPUT, &output_id)
                .with_text("Customer")
                .with_position(325.0, 206.0),
            Element::edge(tags::ARROW_EDGE, generate_id("edge"), &storage_id, &function_id)
                .with_text("Read"),
            Element::edge(tags::ARROW_EDGE, generate_id("edge"), &function_id, &output_id),
        ];
        document
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

fn find_in<'a>(element: &'a Element, id: &str) -> Option<&'a Element> {
    if element.id == id {
        return Some(element);
    }
    element.children.iter().find_map(|child| find_in(child, id))
}

fn find_in_mut<'a>(element: &'a mut Element, id: &str) -> Option<&'a mut Element> {
    if element.id == id {
        return Some(element);
    }
    element
        .children
        .iter_mut()
        .find_map(|child| find_in_mut(child, id))
}

fn check_unique_ids(element: &Element, seen: &mut HashSet<String>) -> Result<(), DocumentError> {
    if !seen.insert(element.id.clone()) {
        return Err(DocumentError::DuplicateId(element.id.clone()));
    }
    for child in &element.children {
        check_unique_ids(child, seen)?;
    }
    Ok(())
}

fn check_edge_endpoints(element: &Element, ids: &HashSet<String>) -> Result<(), DocumentError> {
    for endpoint in [&element.source_id, &element.target_id].into_iter().flatten() {
        if !ids.contains(endpoint) {
            return Err(DocumentError::DanglingEdge {
                edge: element.id.clone(),
                endpoint: endpoint.clone(),
            });
        }
    }
    for child in &element.children {
        check_edge_endpoints(child, ids)?;
    }
    Ok(())
}

/// Error raised by document validation and mutation.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// Two elements share an id.
    #[error("duplicate element id: {0}")]
    DuplicateId(String),

    /// An edge references an element that does not exist.
    #[error("edge {edge} references missing element {endpoint}")]
    DanglingEdge {
        /// Id of the offending edge.
        edge: String,
        /// The missing endpoint id.
        endpoint: String,
    },
}
