//! Proximity interaction resolution and infusable objects.

use std::collections::{HashMap, HashSet};

/// A world object the character can exchange stormlight with.
///
/// `interact` returns the signed stormlight yield for the character:
/// positive while the object feeds the ledger, negative when an un-lash
/// reversal charges it back.
pub trait Interactable {
    fn interact(&mut self) -> f32;
    fn release(&mut self);
    fn on_enter_range(&mut self);
    fn on_exit_range(&mut self);
    /// Whether the object currently holds an infusion or attachment.
    fn is_active(&self) -> bool;
}

/// An object that can be infused with stormlight and lashed upward.
#[derive(Debug, Clone)]
pub struct Infusable {
    active: bool,
    in_range: bool,
    charged_stormlight: f32,
    lash_force: f32,
    base_cost: f32,
    lash_cost: f32,
}

impl Infusable {
    pub fn new(base_cost: f32, lash_cost: f32) -> Self {
        Self {
            active: false,
            in_range: false,
            charged_stormlight: 0.0,
            lash_force: 0.0,
            base_cost,
            lash_cost,
        }
    }

    pub fn charged_stormlight(&self) -> f32 {
        self.charged_stormlight
    }

    pub fn lash_force(&self) -> f32 {
        self.lash_force
    }

    /// Stack one more lash on an already infused object.
    pub fn add_lash(&mut self) -> f32 {
        self.charged_stormlight += self.lash_cost;
        self.lash_force += 1.0;
        self.lash_cost
    }

    /// Remove one lash, charging its cost back. Does nothing below one
    /// lash.
    pub fn un_lash(&mut self) -> f32 {
        if self.lash_force <= 1.0 {
            return 0.0;
        }
        self.charged_stormlight -= self.lash_cost;
        self.lash_force -= 1.0;
        -self.lash_cost
    }
}

impl Interactable for Infusable {
    fn interact(&mut self) -> f32 {
        if self.active {
            self.add_lash()
        } else {
            self.active = true;
            self.charged_stormlight = self.base_cost;
            self.lash_force = 1.0;
            self.base_cost
        }
    }

    fn release(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        self.charged_stormlight = 0.0;
        self.lash_force = 0.0;
    }

    fn on_enter_range(&mut self) {
        self.in_range = true;
    }

    fn on_exit_range(&mut self) {
        self.in_range = false;
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

/// Registry of interactable objects keyed by their world id.
#[derive(Default)]
pub struct InteractableSet {
    items: HashMap<u64, Box<dyn Interactable>>,
    in_range: HashSet<u64>,
}

impl InteractableSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: u64, item: Box<dyn Interactable>) {
        self.items.insert(id, item);
    }

    pub fn get(&self, id: u64) -> Option<&dyn Interactable> {
        self.items.get(&id).map(|b| b.as_ref())
    }

    /// True if any registered object currently holds an infusion.
    pub fn any_active(&self) -> bool {
        self.items.values().any(|item| item.is_active())
    }

    /// Fires range edges against the candidate list, then interacts once
    /// with every in-range candidate. Returns the aggregate signed
    /// stormlight delta for the character.
    pub fn resolve(&mut self, candidates: &[u64]) -> f32 {
        let current: HashSet<u64> = candidates
            .iter()
            .copied()
            .filter(|id| self.items.contains_key(id))
            .collect();

        for id in self.in_range.difference(&current) {
            if let Some(item) = self.items.get_mut(id) {
                item.on_exit_range();
            }
        }
        for id in current.difference(&self.in_range) {
            if let Some(item) = self.items.get_mut(id) {
                item.on_enter_range();
            }
        }
        self.in_range = current;

        let mut delta = 0.0;
        for id in &self.in_range {
            if let Some(item) = self.items.get_mut(id) {
                delta += item.interact();
            }
        }
        delta
    }

    /// Releases every registered object, active or not.
    pub fn release_all(&mut self) {
        for item in self.items.values_mut() {
            item.release();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_interact_yields_base_cost() {
        let mut set = InteractableSet::new();
        set.insert(7, Box::new(Infusable::new(10.0, 5.0)));
        let delta = set.resolve(&[7]);
        assert_eq!(delta, 10.0);
        assert!(set.any_active());
    }

    #[test]
    fn test_repeat_interact_stacks_lashes() {
        let mut set = InteractableSet::new();
        set.insert(1, Box::new(Infusable::new(10.0, 5.0)));
        set.resolve(&[1]);
        let delta = set.resolve(&[1]);
        assert_eq!(delta, 5.0);
    }

    #[test]
    fn test_unknown_candidates_are_ignored() {
        let mut set = InteractableSet::new();
        set.insert(1, Box::new(Infusable::new(10.0, 5.0)));
        let delta = set.resolve(&[99]);
        assert_eq!(delta, 0.0);
        assert!(!set.any_active());
    }

    #[test]
    fn test_release_all_clears_activity() {
        let mut set = InteractableSet::new();
        set.insert(1, Box::new(Infusable::new(10.0, 5.0)));
        set.insert(2, Box::new(Infusable::new(10.0, 5.0)));
        set.resolve(&[1, 2]);
        assert!(set.any_active());
        set.release_all();
        assert!(!set.any_active());
    }

    #[test]
    fn test_un_lash_charges_back_down_to_one_lash() {
        let mut obj = Infusable::new(10.0, 5.0);
        obj.interact();
        obj.add_lash();
        assert_eq!(obj.lash_force(), 2.0);
        assert_eq!(obj.un_lash(), -5.0);
        assert_eq!(obj.lash_force(), 1.0);
        assert_eq!(obj.un_lash(), 0.0);
        assert_eq!(obj.lash_force(), 1.0);
    }
}
