// SPDX-License-Identifier: MIT OR Apache-2.0
//! The element-type registration table.
//!
//! Maps each type tag of the document format to the behavior implementing
//! that type. The table is built once at startup ([`default_registry`]) and
//! passed by reference to whatever needs it; there is no hidden global
//! registry.

use crate::dynamic::{expand_edge_label, expand_node_label, retract_label};
use crate::element::{tags, Element};
use indexmap::IndexMap;

/// Broad category of an element type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// The diagram root.
    Graph,
    /// Node-like element with position and size.
    Node,
    /// Edge-like element with source and target references.
    Edge,
    /// Text label.
    Label,
    /// Routing helper for edges.
    RoutingPoint,
}

/// Pure transform applied to a single element.
pub type ChildFn = fn(&mut Element);

/// Derived-children behavior of an element type.
#[derive(Debug, Clone, Copy)]
pub enum DynamicChildren {
    /// The element has no derived children and is persisted as-is.
    Inert,
    /// Node-like: a label child is derived from the element's own text.
    Node {
        /// Synthesizes the derived children.
        expand: ChildFn,
        /// Folds the derived children back into the element.
        retract: ChildFn,
    },
    /// Edge-like: like [`DynamicChildren::Node`], but only applied to
    /// elements that actually carry a source reference.
    Edge {
        /// Synthesizes the derived children.
        expand: ChildFn,
        /// Folds the derived children back into the element.
        retract: ChildFn,
    },
}

/// Behavior registered for one type tag.
#[derive(Debug, Clone, Copy)]
pub struct Registration {
    /// Category of the element type.
    pub kind: ElementKind,
    /// Derived-children behavior.
    pub dynamic: DynamicChildren,
}

impl Registration {
    /// A registration without derived children.
    pub fn inert(kind: ElementKind) -> Self {
        Self {
            kind,
            dynamic: DynamicChildren::Inert,
        }
    }

    /// A node-like registration with an expand/retract pair.
    pub fn node(expand: ChildFn, retract: ChildFn) -> Self {
        Self {
            kind: ElementKind::Node,
            dynamic: DynamicChildren::Node { expand, retract },
        }
    }

    /// An edge-like registration with an expand/retract pair.
    pub fn edge(expand: ChildFn, retract: ChildFn) -> Self {
        Self {
            kind: ElementKind::Edge,
            dynamic: DynamicChildren::Edge { expand, retract },
        }
    }
}

/// Lookup table from type tag to element behavior.
#[derive(Debug, Default)]
pub struct ElementRegistry {
    entries: IndexMap<String, Registration>,
}

impl ElementRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Register a behavior for a type tag. A later registration for the
    /// same tag replaces the earlier one.
    pub fn register(&mut self, tag: impl Into<String>, registration: Registration) {
        self.entries.insert(tag.into(), registration);
    }

    /// Look up the registration for a type tag.
    pub fn get(&self, tag: &str) -> Option<&Registration> {
        self.entries.get(tag)
    }

    /// All registered tags in registration order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of registered tags.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Build the registration table for the data-flow diagram format.
pub fn default_registry() -> ElementRegistry {
    let mut registry = ElementRegistry::new();
    registry.register(tags::GRAPH, Registration::inert(ElementKind::Graph));
    registry.register(tags::STORAGE, Registration::node(expand_node_label, retract_label));
    registry.register(tags::FUNCTION, Registration::node(expand_node_label, retract_label));
    registry.register(
        tags::INPUT_OUTPUT,
        Registration::node(expand_node_label, retract_label),
    );
    registry.register(
        tags::ARROW_EDGE,
        Registration::edge(expand_edge_label, retract_label),
    );
    registry.register(tags::LABEL, Registration::inert(ElementKind::Label));
    registry.register(tags::ROUTING_POINT, Registration::inert(ElementKind::RoutingPoint));
    registry.register(
        tags::VOLATILE_ROUTING_POINT,
        Registration::inert(ElementKind::RoutingPoint),
    );
    registry
}
