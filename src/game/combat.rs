//! Combat and mitigation resolution
//!
//! Maneuvers never deal damage or heal when played. They bump per-turn
//! counters, and the Combat and Repair phases turn those counters into
//! totals here.

use crate::core::{Card, Player};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Per-turn maneuver counters, reset at the start of every player-turn
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnCounters {
    pub attack: u32,
    pub repair: u32,
    /// Immediate draws resolved this turn (informational)
    pub draws: u32,
    /// Pool searches resolved this turn (informational)
    pub searches: u32,
    pub purchases: u32,
}

impl TurnCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attack_total(&self) -> u32 {
        attack_total(self.attack)
    }

    pub fn heal_total(&self) -> u32 {
        heal_total(self.repair)
    }
}

/// Triangular combo: 1 → 1, 2 → 3, 3 → 6, 4 → 10
pub fn attack_total(k: u32) -> u32 {
    k * (k + 1) / 2
}

/// First counter heals 1, each additional one heals 2 more
pub fn heal_total(k: u32) -> u32 {
    if k == 0 {
        0
    } else {
        1 + (k - 1) * 2
    }
}

/// How one defender took a hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageReport {
    pub incoming: u32,
    /// Soaked up by mitigation
    pub absorbed: u32,
    /// Taken off the primary resource
    pub to_primary: u32,
}

/// Apply damage, mitigation first
///
/// The primary resource may go negative; defeat is checked by the turn
/// loop, not here.
pub fn apply_damage(defender: &mut Player, damage: u32) -> DamageReport {
    let absorbed = defender.mitigation.min(damage);
    defender.mitigation -= absorbed;
    let to_primary = damage - absorbed;
    let hit = i32::try_from(to_primary).unwrap_or(i32::MAX);
    defender.primary = defender.primary.saturating_sub(hit);

    DamageReport {
        incoming: damage,
        absorbed,
        to_primary,
    }
}

/// Apply the same damage to every defender, each against its own mitigation
pub fn apply_damage_to_all<'p>(
    defenders: impl IntoIterator<Item = &'p mut Player>,
    damage: u32,
) -> SmallVec<[DamageReport; 2]> {
    defenders
        .into_iter()
        .map(|defender| apply_damage(defender, damage))
        .collect()
}

/// A pool card acting as a monster that strikes both players
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HazardState {
    pub card: Card,
    /// Remaining health; starts at the card's face value
    pub health: i32,
    /// Damage dealt to each player per strike
    pub damage: u32,
}

impl HazardState {
    pub fn new(card: Card, face_value: u32) -> Self {
        HazardState {
            card,
            health: i32::try_from(face_value).unwrap_or(i32::MAX),
            damage: face_value,
        }
    }

    /// Take damage; returns true once the hazard is defeated
    pub fn take_damage(&mut self, amount: u32) -> bool {
        let hit = i32::try_from(amount).unwrap_or(i32::MAX);
        self.health = self.health.saturating_sub(hit);
        self.is_defeated()
    }

    pub fn is_defeated(&self) -> bool {
        self.health <= 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{PlayerId, Rank, Suit};
    use crate::zones::PlayerZones;

    fn defender(primary: i32, mitigation: u32) -> Player {
        let mut p = Player::new(PlayerId::new(1), "Bob", primary, primary, PlayerZones::default());
        p.mitigation = mitigation;
        p
    }

    #[test]
    fn test_attack_formula() {
        let totals: Vec<u32> = (0..=4).map(attack_total).collect();
        assert_eq!(totals, vec![0, 1, 3, 6, 10]);
    }

    #[test]
    fn test_heal_formula() {
        let totals: Vec<u32> = (0..=3).map(heal_total).collect();
        assert_eq!(totals, vec![0, 1, 3, 5]);
    }

    #[test]
    fn test_counters_feed_formulas() {
        let counters = TurnCounters {
            attack: 3,
            repair: 2,
            ..TurnCounters::new()
        };
        assert_eq!(counters.attack_total(), 6);
        assert_eq!(counters.heal_total(), 3);
    }

    #[test]
    fn test_mitigation_partially_absorbs() {
        let mut p = defender(15, 4);
        let report = apply_damage(&mut p, 6);
        assert_eq!(p.mitigation, 0);
        assert_eq!(p.primary, 13);
        assert_eq!(report.absorbed, 4);
        assert_eq!(report.to_primary, 2);
    }

    #[test]
    fn test_mitigation_fully_absorbs() {
        let mut p = defender(15, 10);
        let report = apply_damage(&mut p, 6);
        assert_eq!(p.mitigation, 4);
        assert_eq!(p.primary, 15);
        assert_eq!(report.to_primary, 0);
    }

    #[test]
    fn test_damage_can_go_negative() {
        let mut p = defender(2, 0);
        apply_damage(&mut p, 6);
        assert_eq!(p.primary, -4);
        assert!(p.is_defeated());
    }

    #[test]
    fn test_damage_to_all_is_independent() {
        let mut a = defender(20, 5);
        let mut b = defender(20, 0);
        let reports = apply_damage_to_all([&mut a, &mut b], 7);

        assert_eq!(reports.len(), 2);
        assert_eq!(a.primary, 18);
        assert_eq!(a.mitigation, 0);
        // The first defender's shield does not shrink the second hit
        assert_eq!(b.primary, 13);
    }

    #[test]
    fn test_hazard_health() {
        let mut hazard = HazardState::new(Card::new(Suit::Spades, Rank::Nine), 9);
        assert_eq!(hazard.damage, 9);
        assert!(!hazard.take_damage(6));
        assert_eq!(hazard.health, 3);
        assert!(hazard.take_damage(3));
    }
}
