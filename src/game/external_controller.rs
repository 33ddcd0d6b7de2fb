//! External decision agent over newline-delimited JSON
//!
//! Each decision is one request line written to `output` and one reply line
//! read from `input`. Whatever is on the other end (a script, a remote model
//! behind a bridge process) only has to speak this protocol:
//!
//! ```text
//! -> {"decision":"action","state":{..},"hand":[{"card":"7♠","value":7,"maneuver":"Attack"}]}
//! <- {"card_index":0,"action_type":"maneuver"}
//! -> {"decision":"purchase","state":{..},"market":[{"slot":0,"card":"K♦","cost":7}],"currency":9}
//! <- {"purchase":true,"tech_bay_index":0}
//! -> {"decision":"search","state":{..},"revealed":[{"card":"3♣","value":3}]}
//! <- {"card_index":0}
//! ```
//!
//! A null `card_index` ends the phase. Anything that does not parse is a
//! `StrategyFailure`; the engine then uses its fallback pick.

use crate::core::{Card, ManeuverEffect, PlayerId};
use crate::game::controller::{ActionChoice, GameStateView, PlayerController, PurchaseChoice};
use crate::{DuelError, Result};
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Write};

#[derive(Debug, Serialize)]
struct PublicState {
    round: u32,
    primary: i32,
    mitigation: u32,
    currency: u32,
    opponent_primary: i32,
    opponent_mitigation: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    hazard_health: Option<i32>,
}

#[derive(Debug, Serialize)]
struct HandEntry {
    card: String,
    value: u32,
    maneuver: Option<ManeuverEffect>,
}

#[derive(Debug, Serialize)]
struct MarketEntry {
    slot: usize,
    card: String,
    cost: u32,
}

#[derive(Debug, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
enum Request {
    Action {
        state: PublicState,
        hand: Vec<HandEntry>,
    },
    Purchase {
        state: PublicState,
        market: Vec<MarketEntry>,
        currency: u32,
    },
    Search {
        state: PublicState,
        revealed: Vec<HandEntry>,
    },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum ActionType {
    Resource,
    Maneuver,
}

#[derive(Debug, Deserialize)]
struct ActionReply {
    card_index: Option<usize>,
    action_type: Option<ActionType>,
}

#[derive(Debug, Deserialize)]
struct PurchaseReply {
    #[serde(default)]
    purchase: bool,
    tech_bay_index: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct SearchReply {
    card_index: usize,
}

/// Controller that forwards every decision to an external process
pub struct ExternalController<R, W> {
    player_id: PlayerId,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ExternalController<R, W> {
    pub fn new(player_id: PlayerId, input: R, output: W) -> Self {
        ExternalController {
            player_id,
            input,
            output,
        }
    }

    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }

    fn exchange<T: for<'de> Deserialize<'de>>(&mut self, request: &Request) -> Result<T> {
        serde_json::to_writer(&mut self.output, request)?;
        self.output.write_all(b"\n")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(DuelError::StrategyFailure("agent closed its output".to_string()));
        }
        serde_json::from_str(line.trim())
            .map_err(|e| DuelError::StrategyFailure(format!("malformed reply {:?}: {}", line.trim(), e)))
    }
}

fn public_state(view: &GameStateView) -> PublicState {
    PublicState {
        round: view.round(),
        primary: view.primary(),
        mitigation: view.mitigation(),
        currency: view.currency(),
        opponent_primary: view.opponent_primary(),
        opponent_mitigation: view.opponent_mitigation(),
        hazard_health: view.hazard().map(|h| h.health),
    }
}

fn describe_cards(view: &GameStateView, cards: &[Card]) -> Vec<HandEntry> {
    cards
        .iter()
        .map(|card| HandEntry {
            card: card.to_string(),
            value: view.face_value(*card),
            maneuver: view.maneuver_for(*card),
        })
        .collect()
}

impl<R: BufRead, W: Write> PlayerController for ExternalController<R, W> {
    fn player_id(&self) -> PlayerId {
        self.player_id
    }

    fn controller_name(&self) -> &str {
        "external"
    }

    fn choose_action(&mut self, view: &GameStateView) -> Result<ActionChoice> {
        let request = Request::Action {
            state: public_state(view),
            hand: describe_cards(view, &view.hand()),
        };
        let reply: ActionReply = self.exchange(&request)?;
        match (reply.card_index, reply.action_type) {
            (None, _) => Ok(ActionChoice::EndPhase),
            (Some(i), Some(ActionType::Resource)) => Ok(ActionChoice::PlayResource(i)),
            (Some(i), Some(ActionType::Maneuver)) => Ok(ActionChoice::PlayManeuver(i)),
            (Some(i), None) => Err(DuelError::StrategyFailure(format!(
                "card_index {} given without action_type",
                i
            ))),
        }
    }

    fn choose_purchase(&mut self, view: &GameStateView) -> Result<PurchaseChoice> {
        let market = view
            .market()
            .iter()
            .enumerate()
            .filter_map(|(slot, card)| {
                card.map(|card| MarketEntry {
                    slot,
                    card: card.to_string(),
                    cost: view.face_value(card),
                })
            })
            .collect();
        let request = Request::Purchase {
            state: public_state(view),
            market,
            currency: view.currency(),
        };
        let reply: PurchaseReply = self.exchange(&request)?;
        match (reply.purchase, reply.tech_bay_index) {
            (true, Some(slot)) => Ok(PurchaseChoice::Purchase(slot)),
            (true, None) => Err(DuelError::StrategyFailure(
                "purchase requested without tech_bay_index".to_string(),
            )),
            (false, _) => Ok(PurchaseChoice::Skip),
        }
    }

    fn choose_search_card(&mut self, view: &GameStateView, revealed: &[Card]) -> Result<usize> {
        let request = Request::Search {
            state: public_state(view),
            revealed: describe_cards(view, revealed),
        };
        let reply: SearchReply = self.exchange(&request)?;
        Ok(reply.card_index)
    }
}
