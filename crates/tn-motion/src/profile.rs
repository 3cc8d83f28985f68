//! Which persistent movement ability the executor keeps switched on.

use tn_world::{Ability, WorldSnapshot};

/// Preferred walking abilities, in order.  Chosen once per executor.
///
/// While the agent can teleport the profile is ignored and
/// [`Ability::Teleport`] is used instead.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LocomotionProfile {
    pub walk_abilities: Vec<Ability>,
}

impl Default for LocomotionProfile {
    fn default() -> Self {
        Self { walk_abilities: vec![Ability::Vigor] }
    }
}

impl LocomotionProfile {
    /// Keep an offensive aura up while walking, falling back to vigor.
    pub fn aura_walker() -> Self {
        Self { walk_abilities: vec![Ability::Conviction, Ability::Vigor] }
    }

    /// The ability this profile wants for the given snapshot, if any is
    /// available.
    pub fn select(&self, snap: &WorldSnapshot) -> Option<Ability> {
        if snap.can_teleport {
            return Some(Ability::Teleport);
        }
        self.walk_abilities.iter().copied().find(|a| snap.is_bound(*a))
    }
}
