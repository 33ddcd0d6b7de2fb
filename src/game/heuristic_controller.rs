//! Heuristic AI controller and the engine's fallback picks
//!
//! The controller plays attack cards as maneuvers, repairs when damaged,
//! spends cheap cards on pool searches and banks everything else as
//! currency, biggest first. It then buys the most expensive card it can
//! afford.
//!
//! The `fallback_*` functions are what the turn loop substitutes when a
//! controller fails or keeps answering out of range. They only look at the
//! view, so they can never fail themselves.

use crate::core::{Card, ManeuverEffect, PlayerId};
use crate::game::controller::{ActionChoice, GameStateView, PlayerController, PurchaseChoice};
use crate::rules::AttackTarget;
use crate::Result;

/// Cards at or below this value are spent on searches rather than banked
const SEARCH_THRESHOLD: u32 = 4;

/// Highest-face-value hand card as a resource, or end the phase
pub fn fallback_action(view: &GameStateView) -> ActionChoice {
    view.hand()
        .iter()
        .enumerate()
        .max_by_key(|&(i, card)| (view.face_value(*card), std::cmp::Reverse(i)))
        .map(|(i, _)| ActionChoice::PlayResource(i))
        .unwrap_or(ActionChoice::EndPhase)
}

/// Cheapest affordable market slot, or skip
pub fn fallback_purchase(view: &GameStateView) -> PurchaseChoice {
    let cheapest = view
        .market()
        .iter()
        .enumerate()
        .filter_map(|(i, slot)| slot.map(|card| (i, view.face_value(card))))
        .min_by_key(|&(i, cost)| (cost, i));
    match cheapest {
        Some((slot, cost)) if cost <= view.currency() => PurchaseChoice::Purchase(slot),
        _ => PurchaseChoice::Skip,
    }
}

/// Highest-face-value revealed card; 0 for an empty reveal
pub fn fallback_search_pick(view: &GameStateView, revealed: &[Card]) -> usize {
    revealed
        .iter()
        .enumerate()
        .max_by_key(|&(i, card)| (view.face_value(*card), std::cmp::Reverse(i)))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Deterministic rule-of-thumb controller
pub struct HeuristicController {
    player_id: PlayerId,
}

impl HeuristicController {
    pub fn new(player_id: PlayerId) -> Self {
        HeuristicController { player_id }
    }

    /// Whether an attack maneuver would hit anything this turn
    fn has_attack_target(view: &GameStateView) -> bool {
        match view.rules().attack_target {
            AttackTarget::Opponent => true,
            AttackTarget::Hazard => view.hazard().is_some(),
        }
    }

    fn wants_maneuver(view: &GameStateView, card: Card) -> bool {
        match view.maneuver_for(card) {
            Some(ManeuverEffect::Attack) => Self::has_attack_target(view),
            Some(ManeuverEffect::Repair) => {
                // Heal already banked this turn counts toward the gap
                let pending = i64::from(crate::game::combat::heal_total(view.counters().repair));
                i64::from(view.primary()) + pending < i64::from(view.max_primary())
            }
            Some(ManeuverEffect::PoolSearch) => {
                view.face_value(card) <= SEARCH_THRESHOLD && view.pool_deck_len() > 0
            }
            Some(ManeuverEffect::DrawCard) | None => false,
        }
    }
}

impl PlayerController for HeuristicController {
    fn player_id(&self) -> PlayerId {
        self.player_id
    }

    fn controller_name(&self) -> &str {
        "heuristic"
    }

    fn choose_action(&mut self, view: &GameStateView) -> Result<ActionChoice> {
        let hand = view.hand();
        if let Some(index) = hand.iter().position(|card| Self::wants_maneuver(view, *card)) {
            return Ok(ActionChoice::PlayManeuver(index));
        }
        Ok(fallback_action(view))
    }

    fn choose_purchase(&mut self, view: &GameStateView) -> Result<PurchaseChoice> {
        let currency = view.currency();
        let best = view
            .market()
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.map(|card| (i, view.face_value(card))))
            .filter(|&(_, cost)| cost <= currency)
            .max_by_key(|&(i, cost)| (cost, std::cmp::Reverse(i)));
        Ok(best
            .map(|(slot, _)| PurchaseChoice::Purchase(slot))
            .unwrap_or(PurchaseChoice::Skip))
    }

    fn choose_search_card(&mut self, view: &GameStateView, revealed: &[Card]) -> Result<usize> {
        // Attack cards first, then value
        let attack = revealed
            .iter()
            .enumerate()
            .filter(|(_, card)| view.maneuver_for(**card) == Some(ManeuverEffect::Attack))
            .max_by_key(|&(i, card)| (view.face_value(*card), std::cmp::Reverse(i)))
            .map(|(i, _)| i);
        Ok(attack.unwrap_or_else(|| fallback_search_pick(view, revealed)))
    }
}
