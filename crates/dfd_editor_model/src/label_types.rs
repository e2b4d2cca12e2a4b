// SPDX-License-Identifier: MIT OR Apache-2.0
//! The label-type registry.
//!
//! Label types are user-defined enumerations of permissible values that can
//! be attached to diagram elements. The registry lives for the whole editor
//! session, independent of any single document; documents only carry
//! [`LabelAssignment`]s referencing it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One permissible value of a label type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelTypeValue {
    /// Identifier of the value.
    pub id: String,
    /// Display text of the value.
    pub text: String,
}

/// A named, user-defined enumeration of permissible values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelType {
    /// Identifier of the label type.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Permissible values, in display order.
    pub values: Vec<LabelTypeValue>,
}

/// Assignment of one label-type value to a diagram element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelAssignment {
    /// Id of the assigned label type.
    pub label_type_id: String,
    /// Id of the assigned value within that type.
    pub label_type_value_id: String,
}

/// Handle returned from [`LabelTypeRegistry::on_update`], used to remove the
/// callback again.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

type UpdateCallback = Box<dyn FnMut()>;

/// Session-scoped collection of label types with change notification.
///
/// Duplicate ids are not rejected: registration appends, and lookup returns
/// the first match, so a duplicate shadows nothing until the earlier entry
/// is removed.
#[derive(Default)]
pub struct LabelTypeRegistry {
    label_types: Vec<LabelType>,
    observers: Vec<(u64, UpdateCallback)>,
    next_token: u64,
}

impl LabelTypeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a label type and notify observers.
    pub fn register_label_type(&mut self, label_type: LabelType) {
        self.label_types.push(label_type);
        self.notify();
    }

    /// Remove all label types with the given id and notify observers.
    /// A no-op removal still notifies.
    pub fn unregister_label_type(&mut self, id: &str) {
        self.label_types.retain(|label_type| label_type.id != id);
        self.notify();
    }

    /// Remove all label types and notify observers.
    pub fn clear_label_types(&mut self) {
        self.label_types.clear();
        self.notify();
    }

    /// Notify observers of an in-place edit to a label type.
    pub fn notify_changed(&mut self) {
        self.notify();
    }

    /// All label types in insertion order.
    pub fn label_types(&self) -> &[LabelType] {
        &self.label_types
    }

    /// The first label type with the given id, if any.
    pub fn label_type(&self, id: &str) -> Option<&LabelType> {
        self.label_types.iter().find(|label_type| label_type.id == id)
    }

    /// Mutable access to the first label type with the given id. Callers
    /// must follow in-place edits with [`Self::notify_changed`].
    pub fn label_type_mut(&mut self, id: &str) -> Option<&mut LabelType> {
        self.label_types.iter_mut().find(|label_type| label_type.id == id)
    }

    /// Register a callback invoked after every mutating operation. The
    /// returned handle can be passed to [`Self::unsubscribe`].
    pub fn on_update(&mut self, callback: impl FnMut() + 'static) -> Subscription {
        let token = self.next_token;
        self.next_token += 1;
        self.observers.push((token, Box::new(callback)));
        Subscription(token)
    }

    /// Remove a previously registered callback.
    pub fn unsubscribe(&mut self, subscription: Subscription) {
        self.observers.retain(|(token, _)| *token != subscription.0);
    }

    fn notify(&mut self) {
        for (_, callback) in &mut self.observers {
            callback();
        }
    }
}

impl fmt::Debug for LabelTypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LabelTypeRegistry")
            .field("label_types", &self.label_types)
            .field("observers", &self.observers.len())
            .finish()
    }
}
