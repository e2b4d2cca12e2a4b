// SPDX-License-Identifier: MIT OR Apache-2.0
//! Diagram model for the DFD editor.
//!
//! This crate holds everything about data-flow diagrams that is independent
//! of the UI:
//! - The element tree and its JSON schema
//! - The element-type registration table
//! - The dynamic-children transform (expand/retract of derived labels)
//! - The label-type registry
//! - Save/load of diagram files
//!
//! ## Architecture
//!
//! A diagram is a tree of [`Element`]s rooted at a `graph` element. Each
//! element carries a type tag that is resolved against an [`ElementRegistry`]
//! built once at startup. The registry decides, per tag, whether an element
//! derives presentation-only label children on load ([`TreeMode::Expand`])
//! and folds them back into its own attributes on save
//! ([`TreeMode::Retract`]).

pub mod document;
pub mod dynamic;
pub mod element;
pub mod label_types;
pub mod persist;
pub mod registry;

pub use document::{Document, DocumentError};
pub use dynamic::{process_tree, TreeMode};
pub use element::{generate_id, tags, EdgePlacement, Element, LabelSide, Point, Size};
pub use label_types::{LabelAssignment, LabelType, LabelTypeRegistry, LabelTypeValue, Subscription};
pub use persist::{PersistError, SavedDiagram};
pub use registry::{default_registry, DynamicChildren, ElementKind, ElementRegistry, Registration};
