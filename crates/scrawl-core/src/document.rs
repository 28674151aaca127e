//! Document model: the ordered element store and its persistence records.

use crate::app_state::AppState;
use crate::elements::{Element, ElementId};
use kurbo::Point;
use log::warn;
use serde::{Deserialize, Serialize};

/// Ordered sequence of elements; insertion order is z-order (back to front).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementStore {
    elements: Vec<Element>,
}

impl ElementStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an element at the top of the z-order.
    ///
    /// A duplicate id is rejected (the store keeps ids unique for the
    /// lifetime of the session). Returns whether the element was appended.
    pub fn append(&mut self, element: Element) -> bool {
        if self.get(element.id()).is_some() {
            warn!("ignoring append of duplicate element id {}", element.id());
            return false;
        }
        self.elements.push(element);
        true
    }

    /// Remove an element by id. Removing a non-existent id is a no-op.
    pub fn remove_by_id(&mut self, id: &ElementId) -> Option<Element> {
        let pos = self.elements.iter().position(|e| e.id() == id)?;
        Some(self.elements.remove(pos))
    }

    /// Apply a patch to the element with the given id. Returns whether an
    /// element was found.
    pub fn update_by_id(&mut self, id: &ElementId, patch: impl FnOnce(&mut Element)) -> bool {
        match self.elements.iter_mut().find(|e| e.id() == id) {
            Some(element) => {
                patch(element);
                true
            }
            None => false,
        }
    }

    /// Replace the whole sequence.
    pub fn replace_all(&mut self, elements: Vec<Element>) {
        self.elements = elements;
    }

    /// Structurally independent deep copy of the sequence, for history.
    pub fn snapshot(&self) -> Vec<Element> {
        self.elements.clone()
    }

    pub fn get(&self, id: &ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn clear(&mut self) {
        self.elements.clear();
    }

    /// Find the topmost element containing the point.
    ///
    /// Scans in reverse document order so that of two overlapping elements
    /// the most recently drawn one wins. Malformed elements are skipped with
    /// a diagnostic.
    pub fn find_topmost_at(&self, point: Point) -> Option<&Element> {
        self.elements.iter().rev().find(|element| {
            if let Err(err) = element.validate() {
                warn!("skipping element during hit-test: {err}");
                return false;
            }
            element.contains_point(point)
        })
    }
}

/// A document being edited: the element sequence plus style state and
/// identity.
#[derive(Debug, Clone, Default)]
pub struct Document {
    /// Canonical id; absent until the first save assigns one.
    pub drawing_id: Option<String>,
    /// Display name; derived from the save time if empty.
    pub name: String,
    pub store: ElementStore,
    pub app_state: AppState,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the persistence record for this document.
    pub fn to_record(&self) -> DrawingRecord {
        let time = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let name = if self.name.is_empty() {
            format!("Drawing {time}")
        } else {
            self.name.clone()
        };
        DrawingRecord {
            id: self.drawing_id.clone(),
            name,
            elements: self.store.snapshot(),
            app_state: self.app_state.clone(),
            time,
        }
    }

    /// Adopt a loaded record as the current document.
    pub fn from_record(record: DrawingRecord) -> Self {
        let mut store = ElementStore::new();
        store.replace_all(record.elements);
        Self {
            drawing_id: record.id,
            name: record.name,
            store,
            app_state: record.app_state,
        }
    }
}

/// The JSON unit of persistence, shared by the remote store body and the
/// local cache entries: `{id?, name, elements, appState, time}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawingRecord {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub id: Option<String>,
    pub name: String,
    pub elements: Vec<Element>,
    #[serde(default)]
    pub app_state: AppState,
    #[serde(default)]
    pub time: String,
}

/// Listing entry for the saved-drawings index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DrawingSummary {
    pub id: String,
    pub name: String,
    pub time: String,
}
