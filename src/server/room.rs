//! One table: a game, the two seats playing it, and the negotiation
//! that gets them from deck submission to the first turn.
//!
//! A room is a message-driven state machine. Each inbound frame is
//! dispatched against the current [`RoomPhase`]; anything out of phase
//! or malformed is answered with an error and logged, never crashed on.
//! All outbound payloads are built while the game lock is held and sent
//! only after it drops.

use serde::Serialize;
use tokio::sync::{mpsc, Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::core::{Action, PlayerId};
use crate::game::Game;
use crate::piles::Movement;

use super::message::{
    CoinChoice, CoinContent, Envelope, ErrorContent, Inbound, MessageType, SetupContent,
    SetupResponse, TurnOrderChoice, TurnOrderContent,
};

const SEATS: [PlayerId; 2] = [PlayerId::new(0), PlayerId::new(1)];

/// What a connection is allowed to do in its room.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    /// One of the two players.
    Seat(PlayerId),
    /// Watching only; never addressed, inbound frames dropped.
    Spectator,
}

/// Where the room stands between first join and live play.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RoomPhase {
    AwaitingSetup,
    AwaitingCoinChoice,
    AwaitingTurnOrder { chooser: PlayerId },
    Playing,
    Closed,
}

struct RoomState {
    game: Game,
    phase: RoomPhase,
}

#[derive(Default)]
struct SeatTable {
    seats: [Option<mpsc::Sender<String>>; 2],
    spectators: usize,
}

impl SeatTable {
    fn free_seat(&self) -> Option<usize> {
        self.seats.iter().position(Option::is_none)
    }

    fn sender(&self, player: PlayerId) -> Option<mpsc::Sender<String>> {
        self.seats.get(player.index()).and_then(Clone::clone)
    }
}

/// A pre-encoded payload addressed to one seat.
type Outgoing = (PlayerId, String);

/// A game plus the connections seated at it.
///
/// Lock order where both are held: `seats` before `state`.
pub struct Room {
    number: u8,
    state: Mutex<RoomState>,
    seats: RwLock<SeatTable>,
}

impl Room {
    /// Wrap a freshly created game in an empty room.
    #[must_use]
    pub fn new(number: u8, game: Game) -> Self {
        Self {
            number,
            state: Mutex::new(RoomState {
                game,
                phase: RoomPhase::AwaitingSetup,
            }),
            seats: RwLock::new(SeatTable::default()),
        }
    }

    /// The room number clients join by.
    #[must_use]
    pub fn number(&self) -> u8 {
        self.number
    }

    /// Register a connection. The first two joiners take seats 0 and 1;
    /// everyone after that watches.
    pub async fn join(&self, sender: mpsc::Sender<String>) -> Role {
        let mut table = self.seats.write().await;
        let mut state = self.state.lock().await;

        let slot = match table.free_seat() {
            Some(slot) if state.phase != RoomPhase::Closed => slot,
            _ => {
                table.spectators += 1;
                info!(room = self.number, "spectator joined");
                return Role::Spectator;
            }
        };
        match state.game.add_player() {
            Ok(player) => {
                table.seats[slot] = Some(sender);
                info!(room = self.number, %player, "seat taken");
                Role::Seat(player)
            }
            Err(err) => {
                warn!(room = self.number, error = %err, "no free seat in game, joining as spectator");
                table.spectators += 1;
                Role::Spectator
            }
        }
    }

    /// Process one inbound frame from a connection.
    pub async fn handle_message(&self, role: Role, text: &str) {
        let Role::Seat(player) = role else {
            debug!(room = self.number, "dropping spectator message");
            return;
        };

        let outgoing = match Inbound::decode(text) {
            Ok(inbound) => {
                let mut state = self.state.lock().await;
                self.dispatch(&mut state, player, inbound)
            }
            Err(err) => {
                warn!(room = self.number, %player, error = %err, "unparseable message");
                let mut out = Vec::new();
                push_error(&mut out, player, "unparseable message".to_string(), None);
                out
            }
        };
        self.deliver(outgoing).await;
    }

    /// Tear down after a connection drops. Returns whether the room is
    /// finished and should be forgotten.
    ///
    /// A seat leaving abandons the game: the room closes, and the other
    /// seat is told why. Spectators come and go freely.
    pub async fn handle_disconnect(&self, role: Role) -> bool {
        let player = match role {
            Role::Seat(player) => player,
            Role::Spectator => {
                let mut table = self.seats.write().await;
                table.spectators = table.spectators.saturating_sub(1);
                debug!(room = self.number, "spectator left");
                return false;
            }
        };

        {
            let mut table = self.seats.write().await;
            let mut state = self.state.lock().await;
            if state.phase == RoomPhase::Closed {
                return true;
            }
            state.phase = RoomPhase::Closed;
            table.seats[player.index()] = None;
        }
        info!(room = self.number, %player, "seat disconnected, closing room");

        let mut out = Vec::new();
        push_error(
            &mut out,
            player.opponent(),
            "opponent disconnected, room closed".to_string(),
            None,
        );
        self.deliver(out).await;
        true
    }

    fn dispatch(&self, state: &mut RoomState, player: PlayerId, inbound: Inbound) -> Vec<Outgoing> {
        let mut out = Vec::new();
        let phase = state.phase;
        match (phase, inbound.message_type) {
            (RoomPhase::AwaitingSetup, MessageType::Setup) => {
                self.handle_setup(state, player, inbound, &mut out);
            }
            (RoomPhase::AwaitingCoinChoice, MessageType::CoinChoice) => {
                self.handle_coin_choice(state, player, inbound, &mut out);
            }
            (RoomPhase::AwaitingTurnOrder { chooser }, MessageType::FirstOrSecondChoice) => {
                self.handle_turn_order(state, player, chooser, inbound, &mut out);
            }
            (RoomPhase::Playing, MessageType::Gameplay) => {
                self.handle_action(state, player, inbound, &mut out);
            }
            (RoomPhase::Closed, _) => {
                push_error(&mut out, player, "room is closed".to_string(), None);
            }
            (_, unexpected) => {
                warn!(room = self.number, %player, %unexpected, "out-of-phase message");
                push_error(
                    &mut out,
                    player,
                    format!("unexpected {unexpected} message"),
                    None,
                );
            }
        }
        out
    }

    fn handle_setup(
        &self,
        state: &mut RoomState,
        player: PlayerId,
        inbound: Inbound,
        out: &mut Vec<Outgoing>,
    ) {
        let Some(content) = self.decode_content::<SetupContent>(player, inbound, out) else {
            return;
        };
        if let Err(err) = state.game.setup_player(player, &content.deck) {
            warn!(room = self.number, %player, error = %err, "deck rejected");
            push_error(out, player, err.to_string(), None);
            return;
        }
        if !state.game.decks_ready() {
            return;
        }

        // Both decks are in: echo the assigned instance ids, then offer
        // the coin call to seat 0.
        for seat in SEATS {
            if let Ok((deck, opp_deck)) = state.game.setup_data(seat) {
                push_message(out, seat, MessageType::Setup, &SetupResponse { deck, opp_deck });
            }
            push_message(
                out,
                seat,
                MessageType::HeadsOrTails,
                &CoinContent {
                    is_choosing_flip: seat == SEATS[0],
                },
            );
        }
        state.phase = RoomPhase::AwaitingCoinChoice;
        info!(room = self.number, "both decks in, coin call offered");
    }

    fn handle_coin_choice(
        &self,
        state: &mut RoomState,
        player: PlayerId,
        inbound: Inbound,
        out: &mut Vec<Outgoing>,
    ) {
        if player != SEATS[0] {
            push_error(out, player, "the first seat calls the coin".to_string(), None);
            return;
        }
        let Some(choice) = self.decode_content::<CoinChoice>(player, inbound, out) else {
            return;
        };

        let heads = state.game.flip_coin();
        let chooser = if choice.heads == heads {
            SEATS[0]
        } else {
            SEATS[1]
        };
        info!(room = self.number, heads, %chooser, "coin flipped");

        for seat in SEATS {
            push_message(
                out,
                seat,
                MessageType::FirstOrSecond,
                &TurnOrderContent {
                    is_choosing_turn_order: seat == chooser,
                },
            );
        }
        state.phase = RoomPhase::AwaitingTurnOrder { chooser };
    }

    fn handle_turn_order(
        &self,
        state: &mut RoomState,
        player: PlayerId,
        chooser: PlayerId,
        inbound: Inbound,
        out: &mut Vec<Outgoing>,
    ) {
        if player != chooser {
            push_error(out, player, "the other seat picks the turn order".to_string(), None);
            return;
        }
        let Some(choice) = self.decode_content::<TurnOrderChoice>(player, inbound, out) else {
            return;
        };

        let going_first = (chooser == SEATS[0]) == choice.first;
        match state.game.start_game(going_first) {
            Ok(updates) => {
                for (seat, update) in SEATS.into_iter().zip(updates) {
                    push_message(out, seat, MessageType::Gameplay, &update);
                }
                state.phase = RoomPhase::Playing;
                info!(room = self.number, going_first, "game started");
            }
            Err(err) => {
                warn!(room = self.number, error = %err, "failed to start game");
                push_error(out, player, err.to_string(), None);
            }
        }
    }

    fn handle_action(
        &self,
        state: &mut RoomState,
        player: PlayerId,
        inbound: Inbound,
        out: &mut Vec<Outgoing>,
    ) {
        let Some(action) = self.decode_content::<Action>(player, inbound, out) else {
            return;
        };
        match state.game.process_action(player, &action) {
            Ok(update) => {
                push_message(out, player, MessageType::Gameplay, &update.actor);
                push_message(out, player.opponent(), MessageType::Gameplay, &update.opponent);
            }
            Err(rejection) => {
                // The dispatcher already logged the rejection. Movements
                // that happened before the failure go to the actor inside
                // the error, and to the opponent as a normal update so the
                // boards stay in step.
                let movements = rejection
                    .partial
                    .as_ref()
                    .map(|partial| partial.actor.movements.clone());
                push_error(out, player, rejection.error.to_string(), movements);
                if let Some(partial) = rejection.partial {
                    push_message(out, player.opponent(), MessageType::Gameplay, &partial.opponent);
                }
            }
        }
    }

    fn decode_content<T: serde::de::DeserializeOwned>(
        &self,
        player: PlayerId,
        inbound: Inbound,
        out: &mut Vec<Outgoing>,
    ) -> Option<T> {
        match inbound.into_content() {
            Ok(content) => Some(content),
            Err(err) => {
                warn!(room = self.number, %player, error = %err, "malformed message content");
                push_error(out, player, "malformed message content".to_string(), None);
                None
            }
        }
    }

    async fn deliver(&self, outgoing: Vec<Outgoing>) {
        if outgoing.is_empty() {
            return;
        }
        let senders: Vec<_> = {
            let table = self.seats.read().await;
            outgoing.iter().map(|(to, _)| table.sender(*to)).collect()
        };
        for ((to, payload), sender) in outgoing.into_iter().zip(senders) {
            let Some(sender) = sender else { continue };
            if sender.send(payload).await.is_err() {
                debug!(room = self.number, player = %to, "connection gone, dropping message");
            }
        }
    }
}

fn push_message<T: Serialize>(out: &mut Vec<Outgoing>, to: PlayerId, kind: MessageType, content: &T) {
    match Envelope::new(kind, content).encode() {
        Ok(payload) => out.push((to, payload)),
        Err(err) => warn!(error = %err, "failed to encode outbound message"),
    }
}

fn push_error(out: &mut Vec<Outgoing>, to: PlayerId, message: String, movements: Option<Vec<Movement>>) {
    push_message(out, to, MessageType::Error, &ErrorContent { message, movements });
}
