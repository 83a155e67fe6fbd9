// SPDX-License-Identifier: MIT OR Apache-2.0
//! Item selection and box selection.

use crate::binding::Binding;
use crate::geometry::{ItemBox, Rect};
use crate::item::{Item, ItemId};
use std::collections::BTreeSet;

/// Set of selected item IDs
pub type ItemSet = BTreeSet<ItemId>;

/// Selected items, controlled by the caller or owned by the engine
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionModel {
    binding: Binding<ItemSet>,
}

impl Default for SelectionModel {
    fn default() -> Self {
        Self::new(Binding::uncontrolled(ItemSet::new()))
    }
}

impl SelectionModel {
    /// Wrap a binding; its mode is fixed from here on
    pub fn new(binding: Binding<ItemSet>) -> Self {
        Self { binding }
    }

    /// Current selection (may reference deleted items; see [`Self::revalidated`])
    pub fn get(&self) -> &ItemSet {
        self.binding.get()
    }

    /// Whether the caller owns the selection
    pub fn is_controlled(&self) -> bool {
        self.binding.is_controlled()
    }

    /// Whether an item is selected
    pub fn contains(&self, id: ItemId) -> bool {
        self.get().contains(&id)
    }

    /// Selection filtered to items that still exist
    pub fn revalidated(&self, items: &[Item]) -> ItemSet {
        let selected = self.get();
        items
            .iter()
            .filter(|item| selected.contains(&item.id))
            .map(|item| item.id)
            .collect()
    }

    /// Request a new selection; returns the value to report, if it changed
    pub fn request(&mut self, next: ItemSet) -> Option<ItemSet> {
        self.binding.request(next)
    }

    /// Accept the caller's value (controlled mode)
    pub fn sync(&mut self, value: ItemSet) {
        self.binding.sync(value);
    }

    /// Drop IDs that no longer exist
    pub fn revalidate(&mut self, items: &[Item]) -> Option<ItemSet> {
        let valid = self.revalidated(items);
        self.request(valid)
    }

    /// Click selection: replace, or toggle membership when `additive`
    pub fn select_item(&mut self, id: ItemId, additive: bool) -> Option<ItemSet> {
        let mut next = if additive { self.get().clone() } else { ItemSet::new() };
        if additive && next.contains(&id) {
            next.remove(&id);
        } else {
            next.insert(id);
        }
        self.request(next)
    }

    /// Select every item
    pub fn select_all(&mut self, items: &[Item]) -> Option<ItemSet> {
        self.request(items.iter().map(|item| item.id).collect())
    }

    /// Clear the selection
    pub fn clear(&mut self) -> Option<ItemSet> {
        self.request(ItemSet::new())
    }
}

/// In-flight rubber-band selection
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSelection {
    /// Press point
    pub origin: (f64, f64),
    /// Current pointer point
    pub current: (f64, f64),
    /// Union with `prior` instead of replacing it
    pub additive: bool,
    /// Selection when the box started
    pub prior: ItemSet,
}

impl BoxSelection {
    /// Start a box at the press point
    pub fn new(origin: (f64, f64), additive: bool, prior: ItemSet) -> Self {
        Self {
            origin,
            current: origin,
            additive,
            prior,
        }
    }

    /// Box bounds
    pub fn rect(&self) -> Rect {
        Rect::from_points(self.origin, self.current)
    }

    /// Full selection for the current box.
    ///
    /// `boxes` must already be offset by the vertical scroll.
    pub fn compute(&self, boxes: &[ItemBox]) -> ItemSet {
        let rect = self.rect();
        let hits = boxes
            .iter()
            .filter(|b| b.rect.intersects(&rect))
            .map(|b| b.item_id);
        if self.additive {
            self.prior.iter().copied().chain(hits).collect()
        } else {
            hits.collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::TrackId;

    fn boxed(id: ItemId, x0: f64, y0: f64, x1: f64, y1: f64) -> ItemBox {
        ItemBox {
            item_id: id,
            track_id: TrackId::new(),
            rect: Rect { x0, y0, x1, y1 },
        }
    }

    #[test]
    fn test_revalidate_drops_missing() {
        let track = TrackId::new();
        let kept = Item::new(track, 0.0, 100.0);
        let gone = ItemId::new();
        let mut model = SelectionModel::default();
        model.request([kept.id, gone].into_iter().collect());

        let reported = model.revalidate(std::slice::from_ref(&kept)).unwrap();
        assert_eq!(reported.len(), 1);
        assert!(model.contains(kept.id));
        assert!(!model.contains(gone));
    }

    #[test]
    fn test_select_item_toggles_when_additive() {
        let a = ItemId::new();
        let b = ItemId::new();
        let mut model = SelectionModel::default();
        model.select_item(a, false);
        model.select_item(b, true);
        assert_eq!(model.get().len(), 2);
        model.select_item(a, true);
        assert_eq!(model.get().iter().copied().collect::<Vec<_>>(), vec![b]);
        model.select_item(a, false);
        assert_eq!(model.get().iter().copied().collect::<Vec<_>>(), vec![a]);
    }

    #[test]
    fn test_controlled_selection_only_reports() {
        let a = ItemId::new();
        let mut model = SelectionModel::new(Binding::controlled(ItemSet::new()));
        let reported = model.select_item(a, false);
        assert_eq!(reported.map(|s| s.len()), Some(1));
        assert!(model.get().is_empty());
        model.sync([a].into_iter().collect());
        assert!(model.contains(a));
    }

    #[test]
    fn test_box_selection_replace_and_union() {
        let a = ItemId::new();
        let b = ItemId::new();
        let c = ItemId::new();
        let boxes = [boxed(a, 0.0, 0.0, 100.0, 30.0), boxed(b, 200.0, 0.0, 300.0, 30.0)];

        let mut sel = BoxSelection::new((50.0, 10.0), false, [c].into_iter().collect());
        sel.current = (150.0, 20.0);
        assert_eq!(sel.compute(&boxes), [a].into_iter().collect());

        sel.current = (250.0, 40.0);
        assert_eq!(sel.compute(&boxes), [a, b].into_iter().collect());

        sel.additive = true;
        sel.current = (-10.0, 5.0);
        assert_eq!(sel.compute(&boxes), [a, c].into_iter().collect());
    }
}
