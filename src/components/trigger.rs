//! Effect trigger: bonuses and hazards.
//!
//! A trigger applies `(live, coin)` to whatever touches it, once per
//! uninterrupted contact. Destroyable triggers are spent after the first
//! application and get removed at the end of the tick.

use bevy_ecs::prelude::{Component, Entity};
use rustc_hash::FxHashSet;

#[derive(Component, Debug, Clone, Default)]
pub struct Trigger {
    pub live: i32,
    pub coin: i32,
    pub destroyable: bool,
    spent: bool,
    contacts: FxHashSet<Entity>,
}

impl Trigger {
    pub fn new(live: i32, coin: i32, destroyable: bool) -> Self {
        Self {
            live,
            coin,
            destroyable,
            ..Default::default()
        }
    }

    /// Record a contact start with `other`. Returns true when the effect must
    /// be applied to it now.
    pub fn touch(&mut self, other: Entity) -> bool {
        if self.spent || !self.contacts.insert(other) {
            return false;
        }
        if self.destroyable {
            self.spent = true;
        }
        true
    }

    /// Forget `other` so a later contact triggers again.
    pub fn release(&mut self, other: Entity) {
        self.contacts.remove(&other);
    }

    /// True once a destroyable trigger has fired.
    pub fn wants_destroy(&self) -> bool {
        self.spent
    }

    pub fn is_touching(&self, other: Entity) -> bool {
        self.contacts.contains(&other)
    }
}
