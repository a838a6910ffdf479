//! Active elements on screen and their pairwise combination.

use std::collections::BTreeMap;

use nalgebra::Point2;
use serde::Serialize;

use marker_elements_detect::MarkerDetection;
use marker_elements_patterns::Rotation;

use crate::driver::DetectionSink;
use crate::elements::{Element, RecipeBook};

/// First id handed out to combined elements.
pub const FIRST_COMBINED_ID: u32 = 10_000;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TrackedElement {
    /// Marker id, or a synthetic id for combined elements.
    pub id: u32,
    pub element: Element,
    /// Screen position (marker centroid, or midpoint of the combined pair).
    pub position: Point2<f32>,
    pub rotation: Rotation,
}

/// Two active elements replaced by their combination.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CombineEvent {
    pub consumed: [TrackedElement; 2],
    pub produced: TrackedElement,
}

/// Keeps one entry per active id and merges pairs that have a recipe.
///
/// After every registration at most one merge happens: the first
/// combinable pair in ascending-id order. Unknown elements are tracked but
/// never combine.
#[derive(Clone, Debug)]
pub struct ElementTracker {
    book: RecipeBook,
    active: BTreeMap<u32, TrackedElement>,
    next_id: u32,
    events: Vec<CombineEvent>,
}

impl ElementTracker {
    pub fn new(book: RecipeBook) -> Self {
        Self {
            book,
            active: BTreeMap::new(),
            next_id: FIRST_COMBINED_ID,
            events: Vec::new(),
        }
    }

    pub fn book(&self) -> &RecipeBook {
        &self.book
    }

    /// Insert or refresh the entry for `marker_id`, then try one merge.
    pub fn register(
        &mut self,
        marker_id: u32,
        position: Point2<f32>,
        rotation: Rotation,
    ) -> Option<CombineEvent> {
        let element = Element::from_marker_id(marker_id);
        self.active.insert(
            marker_id,
            TrackedElement {
                id: marker_id,
                element,
                position,
                rotation,
            },
        );
        log::debug!("tracking {element} as {marker_id}");
        self.merge_first_pair()
    }

    pub fn remove(&mut self, id: u32) -> Option<TrackedElement> {
        self.active.remove(&id)
    }

    pub fn get(&self, id: u32) -> Option<&TrackedElement> {
        self.active.get(&id)
    }

    /// Active entries in ascending-id order.
    pub fn active(&self) -> impl Iterator<Item = &TrackedElement> {
        self.active.values()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Take all combination events recorded so far.
    pub fn drain_events(&mut self) -> Vec<CombineEvent> {
        std::mem::take(&mut self.events)
    }

    fn merge_first_pair(&mut self) -> Option<CombineEvent> {
        let (a, b, result) = self.first_combinable_pair()?;
        let first = self.active.remove(&a)?;
        let second = self.active.remove(&b)?;

        let id = self.allocate_id();
        let produced = TrackedElement {
            id,
            element: result,
            position: nalgebra::center(&first.position, &second.position),
            rotation: Rotation::Deg0,
        };
        self.active.insert(id, produced);
        log::info!(
            "{} ({}) + {} ({}) -> {} ({})",
            first.element,
            first.id,
            second.element,
            second.id,
            result,
            id
        );

        let event = CombineEvent {
            consumed: [first, second],
            produced,
        };
        self.events.push(event);
        Some(event)
    }

    fn first_combinable_pair(&self) -> Option<(u32, u32, Element)> {
        let entries: Vec<&TrackedElement> = self.active.values().collect();
        for (i, a) in entries.iter().enumerate() {
            for b in &entries[i + 1..] {
                if let Some(result) = self.book.combine(a.element, b.element) {
                    return Some((a.id, b.id, result));
                }
            }
        }
        None
    }

    fn allocate_id(&mut self) -> u32 {
        while self.active.contains_key(&self.next_id) {
            self.next_id = self.next_id.wrapping_add(1);
        }
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }
}

impl Default for ElementTracker {
    fn default() -> Self {
        Self::new(RecipeBook::standard())
    }
}

impl DetectionSink for ElementTracker {
    fn on_detection(&mut self, detection: &MarkerDetection) {
        self.register(detection.marker_id, detection.centroid, detection.rotation);
    }
}
