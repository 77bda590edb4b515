//! Catalog items and the style/budget/room-size filter (spec.md §4.3).

use serde::{Deserialize, Serialize};

use crate::error::InputError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Seating,
    Table,
    Storage,
    Work,
    Lighting,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementRule {
    AgainstWall,
    AwayFromDoor,
    NeedsFloorSpace,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StyleTag {
    Modern,
    Traditional,
    Minimalist,
    Industrial,
    Scandinavian,
    Bohemian,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Clearances {
    pub front_cm: Option<u32>,
    pub back_cm: Option<u32>,
    pub sides_cm: Option<u32>,
    pub all_cm: Option<u32>,
}

impl Clearances {
    /// The clearance used by the solver's Manhattan constraint: `all`,
    /// falling back to 0 when unset (an item with no declared clearance
    /// imposes none beyond non-overlap).
    pub fn solver_all_cm(&self) -> u32 {
        self.all_cm.unwrap_or(0)
    }

    /// The clearance used by the validator's Euclidean check: `all`,
    /// falling back to 40cm per spec.md §4.8.
    pub fn validator_all_m(&self) -> f64 {
        self.all_cm.unwrap_or(40) as f64 / 100.0
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub width_cm: u32,
    pub depth_cm: u32,
    pub height_cm: u32,
    pub clearances: Clearances,
    pub placement_rules: Vec<PlacementRule>,
    pub priority: i32,
    pub price_cents: i64,
    pub style_tags: Vec<StyleTag>,
}

impl CatalogItem {
    pub fn validated(self) -> Result<Self, InputError> {
        if self.width_cm == 0 || self.depth_cm == 0 || self.height_cm == 0 {
            return Err(InputError::InvalidItemDimensions { item_id: self.id });
        }
        if self.price_cents < 0 {
            return Err(InputError::NegativePrice {
                item_id: self.id,
                price_cents: self.price_cents,
            });
        }
        Ok(self)
    }
}

/// Filters `catalog` per spec.md §4.3 and returns the feasible set,
/// stable-sorted by `priority` ascending.
pub fn filter_catalog(
    catalog: Vec<CatalogItem>,
    style_prefs: &[StyleTag],
    budget_cents: Option<i64>,
    area_sqm: f64,
) -> Vec<CatalogItem> {
    let mut items = catalog;

    if !style_prefs.is_empty() {
        let style_filtered: Vec<CatalogItem> = items
            .iter()
            .filter(|item| item.style_tags.iter().any(|t| style_prefs.contains(t)))
            .cloned()
            .collect();
        if !style_filtered.is_empty() {
            items = style_filtered;
        }
    }

    if let Some(budget) = budget_cents {
        let threshold = (budget as f64 * 0.4) as i64;
        items.retain(|item| item.price_cents <= threshold);
    }

    if area_sqm < 15.0 {
        items.retain(|item| (item.width_cm as u64) * (item.depth_cm as u64) <= 20_000);
    }

    items.sort_by_key(|item| item.priority);
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, price_cents: i64, priority: i32, w: u32, d: u32) -> CatalogItem {
        CatalogItem {
            id: id.to_string(),
            name: id.to_string(),
            category: Category::Seating,
            width_cm: w,
            depth_cm: d,
            height_cm: 80,
            clearances: Clearances::default(),
            placement_rules: vec![],
            priority,
            price_cents,
            style_tags: vec![StyleTag::Modern],
        }
    }

    #[test]
    fn budget_zero_empties_catalog() {
        let catalog = vec![item("a", 1, 0, 50, 50)];
        let filtered = filter_catalog(catalog, &[], Some(0), 30.0);
        assert!(filtered.is_empty());
    }

    #[test]
    fn small_room_drops_large_items() {
        let catalog = vec![item("big", 100, 0, 300, 300), item("small", 100, 1, 50, 50)];
        let filtered = filter_catalog(catalog, &[], None, 10.0);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "small");
    }

    #[test]
    fn style_filter_falls_back_to_all_when_it_would_empty_the_set() {
        let catalog = vec![item("a", 100, 0, 50, 50)];
        let filtered = filter_catalog(catalog, &[StyleTag::Industrial], None, 30.0);
        assert_eq!(filtered.len(), 1, "empty-after-style-filter should ignore style");
    }

    #[test]
    fn result_is_sorted_by_priority_ascending() {
        let catalog = vec![item("b", 100, 5, 50, 50), item("a", 100, 1, 50, 50)];
        let filtered = filter_catalog(catalog, &[], None, 30.0);
        assert_eq!(filtered.iter().map(|i| i.id.as_str()).collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn invalid_dimensions_are_rejected() {
        let bad = item("bad", 0, 0, 0, 50);
        assert!(bad.validated().is_err());
    }
}
