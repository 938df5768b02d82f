//! The room: connected players plus the turn/vote state machine.
//!
//! Two locks guard a room. `players` covers the player registry and is held
//! while a broadcast enumerates recipients; `game` covers turn, clue, grid
//! and the vote timer. The only place both are held at once is role
//! assignment during `start_game`, which nests `players` inside `game`.
//! Everywhere else a caller reads what it needs under one lock, releases
//! it, and only then takes the other. The shared RNG lock is a leaf: nothing
//! else is ever acquired while it is held.
//!
//! Because a role is read under `players` and acted on under `game`, every
//! game start bumps a deal number that is stored on both sides. A command
//! whose role was read under an older deal is rejected.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use susnames_core::clock::Clock;
use susnames_core::error::DomainError;
use susnames_core::names::two_part_name;
use susnames_core::rng::DeterministicRng;
use susnames_core::sampling::{sample_indices, sample_one};
use susnames_grid::words::deal_words;
use susnames_grid::{GRID_SIZE, GridError, WordGrid};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::broadcast::{broadcast, send_to};
use super::render::RoomRenderer;
use super::timer::DeferredAction;
use crate::domain::command::{Command, CommandError, RawCommand};
use crate::domain::game::{Clue, GameSnapshot, GameState, Turn, end_voting_threshold};
use crate::domain::player::{Delivery, Message, Player, Role};
use crate::domain::view::{ClueView, GameView, PlayerSummary, player_list_for};

/// Per-room game parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomSettings {
    /// SPY_TARGET cards dealt per grid.
    pub spy_target_count: usize,
    /// COUNTERSPY_TARGET cards dealt per grid.
    pub counterspy_target_count: usize,
    /// How long guessers have to vote on a clue.
    pub vote_duration: Duration,
    /// Capacity of each player's outbound queue.
    pub outbound_capacity: usize,
    /// Fixed early-end quorum; derived from the table at the first game
    /// when unset.
    pub end_voting_threshold: Option<usize>,
}

impl Default for RoomSettings {
    fn default() -> Self {
        Self {
            spy_target_count: 9,
            counterspy_target_count: 3,
            vote_duration: Duration::from_secs(30),
            outbound_capacity: 16,
            end_voting_threshold: None,
        }
    }
}

impl RoomSettings {
    /// Checks the settings describe a playable room.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the target counts exceed the grid,
    /// or the queue capacity, vote duration or fixed threshold is zero.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.spy_target_count + self.counterspy_target_count > GRID_SIZE {
            return Err(DomainError::Validation(format!(
                "{} spy and {} counterspy targets do not fit a {GRID_SIZE}-card grid",
                self.spy_target_count, self.counterspy_target_count
            )));
        }
        if self.outbound_capacity == 0 {
            return Err(DomainError::Validation(
                "outbound queue capacity must be positive".to_owned(),
            ));
        }
        if self.vote_duration.is_zero() {
            return Err(DomainError::Validation(
                "vote duration must be positive".to_owned(),
            ));
        }
        if self.end_voting_threshold == Some(0) {
            return Err(DomainError::Validation(
                "end voting threshold must be positive".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Collaborators shared by every room in a registry.
#[derive(Clone)]
pub struct RoomServices {
    /// Formats outbound payloads.
    pub renderer: Arc<dyn RoomRenderer>,
    /// Source of randomness for grids, roles and names.
    pub rng: Arc<Mutex<dyn DeterministicRng>>,
    /// Wall clock, used to reseed the RNG before every deal.
    pub clock: Arc<dyn Clock>,
}

impl RoomServices {
    pub fn new(
        renderer: Arc<dyn RoomRenderer>,
        rng: impl DeterministicRng + 'static,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let rng: Arc<Mutex<dyn DeterministicRng>> = Arc::new(Mutex::new(rng));
        Self {
            renderer,
            rng,
            clock,
        }
    }
}

/// Handles returned to the transport when a player connects.
#[derive(Debug)]
pub struct PlayerConnection {
    /// Session id the player is registered under.
    pub player_id: String,
    /// Identifies this connection, for removal.
    pub connection_id: Uuid,
    /// Messages to write to the transport, in order.
    pub outbound: mpsc::Receiver<Message>,
    /// Cancelled when the room evicts the player.
    pub closed: CancellationToken,
}

/// A player's role together with the deal it was assigned under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Seat {
    role: Role,
    deal: u64,
}

/// One isolated game session.
pub struct Room {
    name: String,
    settings: RoomSettings,
    services: RoomServices,
    players: Mutex<BTreeMap<String, Player>>,
    /// Deal number of the roles players currently hold; zero until the first
    /// game. Only written with `players` held.
    dealt: AtomicU64,
    game: Mutex<GameState>,
    this: Weak<Room>,
}

impl std::fmt::Debug for Room {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Room")
            .field("name", &self.name)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl Room {
    /// Creates an empty room in the lobby.
    #[must_use]
    pub fn new(name: String, settings: RoomSettings, services: RoomServices) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            name,
            settings,
            services,
            players: Mutex::new(BTreeMap::new()),
            dealt: AtomicU64::new(0),
            game: Mutex::new(GameState::default()),
            this: this.clone(),
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// A random `opinion-noun` display name.
    #[must_use]
    pub fn generate_name(&self) -> String {
        two_part_name(&mut *self.services.rng.lock())
    }

    // ------------------------------------------------------------------
    // Players
    // ------------------------------------------------------------------

    /// Attaches a live connection for session `player_id`.
    ///
    /// A blank `name_hint` gets a generated name. If the session is already
    /// connected, the older connection is asked to close and replaced; the
    /// new one keeps the session's role. The new player receives the player
    /// list and, once a game has started, the current game state.
    pub fn connect_player(&self, player_id: &str, name_hint: Option<&str>) -> PlayerConnection {
        let name = match name_hint.map(str::trim) {
            Some(hint) if !hint.is_empty() => hint.to_owned(),
            _ => self.generate_name(),
        };
        let (tx, rx) = mpsc::channel(self.settings.outbound_capacity.max(1));
        let closed = CancellationToken::new();
        let mut player = Player::new(player_id.to_owned(), name, tx, closed.clone());
        let connection_id = player.connection_id();

        {
            let mut players = self.players.lock();
            if let Some(previous) = players.remove(player_id) {
                player.role = previous.role;
                player.claimed_role = previous.claimed_role;
                previous.request_close();
                info!(room = %self.name, player_id, "replacing existing connection");
            }
            players.insert(player_id.to_owned(), player);
        }
        info!(room = %self.name, player_id, %connection_id, "player connected");

        self.broadcast_player_list();
        self.replay_game_state(player_id, connection_id);

        PlayerConnection {
            player_id: player_id.to_owned(),
            connection_id,
            outbound: rx,
            closed,
        }
    }

    /// Removes the given connection of `player_id`. Returns `false` if that
    /// connection is already gone, so racing removals are harmless.
    pub fn remove_player(&self, player_id: &str, connection_id: Uuid) -> bool {
        let removed = {
            let mut players = self.players.lock();
            let current = players
                .get(player_id)
                .is_some_and(|p| p.connection_id() == connection_id);
            if current {
                players.remove(player_id);
            }
            current
        };

        if removed {
            info!(room = %self.name, player_id, %connection_id, "player disconnected");
            self.broadcast_player_list();
        }
        removed
    }

    /// Renames a player; an empty name picks a random one. Returns the name
    /// now in effect.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` if the player is not in the room.
    pub fn set_player_name(&self, player_id: &str, name: &str) -> Result<String, DomainError> {
        let name = match name.trim() {
            "" => self.generate_name(),
            trimmed => trimmed.to_owned(),
        };

        {
            let mut players = self.players.lock();
            let player = players
                .get_mut(player_id)
                .ok_or_else(|| DomainError::NotFound(format!("player {player_id}")))?;
            if player.name == name {
                return Ok(name);
            }
            player.name.clone_from(&name);
        }

        info!(room = %self.name, player_id, %name, "player renamed");
        self.broadcast_player_list();
        Ok(name)
    }

    /// Pins the role a player wants at game start. Claiming `Spy` clears the
    /// pin. Until the first game is dealt the role also applies straight away.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` for `Counterspy`, which is never
    /// self-assigned, `DomainError::Conflict` if another player already
    /// claimed the spymaster seat, and `DomainError::NotFound` for an
    /// unknown player.
    pub fn claim_role(&self, player_id: &str, role: Role) -> Result<(), DomainError> {
        if role == Role::Counterspy {
            return Err(DomainError::Validation(
                "the counterspy role cannot be claimed".to_owned(),
            ));
        }
        {
            let mut players = self.players.lock();
            let in_lobby = self.dealt.load(Ordering::Relaxed) == 0;
            if role == Role::Spymaster
                && players
                    .values()
                    .any(|p| p.id() != player_id && p.claimed_role == Some(Role::Spymaster))
            {
                return Err(DomainError::Conflict(
                    "another player has already claimed the spymaster role".to_owned(),
                ));
            }
            let player = players
                .get_mut(player_id)
                .ok_or_else(|| DomainError::NotFound(format!("player {player_id}")))?;
            player.claimed_role = (role != Role::Spy).then_some(role);
            if in_lobby {
                player.role = role;
            }
        }

        info!(room = %self.name, player_id, %role, "role claimed");
        self.broadcast_player_list();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Game
    // ------------------------------------------------------------------

    /// Deals a fresh grid, re-derives roles and broadcasts the new game.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the configured target counts
    /// cannot be dealt.
    pub fn start_game(&self) -> Result<(), DomainError> {
        let grid = {
            let mut rng = self.services.rng.lock();
            rng.reseed(self.services.clock.seed());
            let words = deal_words(&mut *rng);
            WordGrid::create(
                words,
                self.settings.spy_target_count,
                self.settings.counterspy_target_count,
                &mut *rng,
            )?
        };

        {
            let mut game = self.game.lock();
            game.disarm_timer();
            let mut next = game.restarted(grid);
            self.assign_roles(&mut next);
            *game = next;
            info!(
                room = %self.name,
                counterspies = ?game.counterspy_count,
                threshold = ?game.end_voting_threshold,
                "game started"
            );
        }

        self.broadcast_player_list();
        self.broadcast_game_state();
        Ok(())
    }

    /// Re-derives every player's role for a new game and fixes the room's
    /// counterspy count and early-end quorum the first time round.
    ///
    /// Called with the game lock held; takes the player lock inside it.
    fn assign_roles(&self, game: &mut GameState) {
        let mut players = self.players.lock();
        for player in players.values_mut() {
            player.role = player.claimed_role.unwrap_or(Role::Spy);
        }

        let mut roster: Vec<&mut Player> = players.values_mut().collect();
        let candidates = roster.iter().filter(|p| p.role == Role::Spy).count();
        let counterspies = *game
            .counterspy_count
            .get_or_insert(candidates.saturating_sub(1) / 2);

        {
            let mut rng = self.services.rng.lock();
            if !roster.iter().any(|p| p.role == Role::Spymaster)
                && let Some(index) = sample_one(&roster, &mut *rng, |p| p.role == Role::Spy)
            {
                roster[index].role = Role::Spymaster;
            }
            for index in sample_indices(&roster, counterspies, &mut *rng, |p| p.role == Role::Spy) {
                roster[index].role = Role::Counterspy;
            }
        }

        self.dealt.store(game.deal, Ordering::Relaxed);

        let guessers = roster.iter().filter(|p| p.role.is_guesser()).count();
        if game.end_voting_threshold.is_none() {
            game.end_voting_threshold = Some(
                self.settings
                    .end_voting_threshold
                    .unwrap_or_else(|| end_voting_threshold(counterspies, guessers)),
            );
        }
        debug!(room = %self.name, candidates, guessers, "roles assigned");
    }

    /// The spymaster gives a clue: guessers get the floor and the vote timer
    /// starts.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Conflict` unless the caller is the spymaster and
    /// it is the spymaster's turn, and `DomainError::Validation` for an empty
    /// clue.
    pub fn suggest_clue(
        &self,
        player_id: &str,
        clue: &str,
        match_count: u32,
    ) -> Result<(), DomainError> {
        let seat = self.seat_of(player_id)?;
        self.give_clue(player_id, seat, clue, match_count)
    }

    fn give_clue(
        &self,
        player_id: &str,
        seat: Seat,
        clue: &str,
        match_count: u32,
    ) -> Result<(), DomainError> {
        if seat.role != Role::Spymaster {
            return Err(DomainError::Conflict(
                "only the spymaster can suggest a clue".to_owned(),
            ));
        }
        let word = clue.trim();
        if word.is_empty() {
            return Err(DomainError::Validation("clue must not be empty".to_owned()));
        }

        let clue = Clue {
            word: word.to_owned(),
            match_count,
        };
        {
            let mut game = self.game.lock();
            Self::require_deal(&game, seat)?;
            if !game.started || game.turn != Turn::Spymaster {
                return Err(DomainError::Conflict(
                    "clues can only be given on the spymaster's turn".to_owned(),
                ));
            }
            game.turn = Turn::Spy;
            game.clue = Some(clue.clone());
            game.end_voting_votes.clear();
            if let Some(grid) = game.grid.as_mut() {
                grid.reset_votes();
            }
            game.voting_round += 1;

            let round = game.voting_round;
            let room = self.this.clone();
            game.disarm_timer();
            game.vote_timer = Some(DeferredAction::schedule(
                self.settings.vote_duration,
                move || {
                    if let Some(room) = room.upgrade() {
                        room.end_voting(round);
                    }
                },
            ));
            info!(room = %self.name, player_id, clue = %clue.word, match_count, round, "clue given");
        }

        self.broadcast_clue(&clue);
        self.broadcast_game_state();
        Ok(())
    }

    /// Records a guesser's vote for a card. Returns whether the vote is new.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Conflict` outside the guessers' turn or for a
    /// non-guesser, and `DomainError::Validation` for a bad or revealed card.
    pub fn vote_card(&self, player_id: &str, index: usize) -> Result<bool, DomainError> {
        let seat = self.seat_of(player_id)?;
        self.change_vote(player_id, seat, index, WordGrid::vote_card)
    }

    /// Withdraws a guesser's vote. Returns whether a vote was removed.
    ///
    /// # Errors
    ///
    /// Same as [`Room::vote_card`].
    pub fn unvote_card(&self, player_id: &str, index: usize) -> Result<bool, DomainError> {
        let seat = self.seat_of(player_id)?;
        self.change_vote(player_id, seat, index, WordGrid::unvote_card)
    }

    fn change_vote(
        &self,
        player_id: &str,
        seat: Seat,
        index: usize,
        apply: impl FnOnce(&mut WordGrid, usize, &str) -> Result<bool, GridError>,
    ) -> Result<bool, DomainError> {
        Self::require_guesser(seat)?;
        let changed = {
            let mut game = self.game.lock();
            Self::require_deal(&game, seat)?;
            Self::require_guessing(&game)?;
            let grid = game
                .grid
                .as_mut()
                .ok_or_else(|| DomainError::Conflict("no grid has been dealt".to_owned()))?;
            apply(grid, index, player_id)?
        };

        if changed {
            self.broadcast_game_state();
        }
        Ok(changed)
    }

    /// Counts a guesser's request to end the round early; reaching the
    /// quorum ends it on the spot.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Conflict` outside the guessers' turn or for a
    /// non-guesser.
    pub fn end_clue_guessing_early(&self, player_id: &str) -> Result<(), DomainError> {
        let seat = self.seat_of(player_id)?;
        self.request_early_end(player_id, seat)
    }

    fn request_early_end(&self, player_id: &str, seat: Seat) -> Result<(), DomainError> {
        Self::require_guesser(seat)?;
        {
            let mut game = self.game.lock();
            Self::require_deal(&game, seat)?;
            Self::require_guessing(&game)?;
            if !game.end_voting_votes.insert(player_id.to_owned()) {
                return Ok(());
            }
            let threshold = game.end_voting_threshold.unwrap_or(1);
            info!(
                room = %self.name,
                player_id,
                votes = game.end_voting_votes.len(),
                threshold,
                "early end requested"
            );
            if game.end_voting_votes.len() >= threshold {
                self.close_round(&mut game);
            }
        }

        self.broadcast_game_state();
        Ok(())
    }

    /// Ends clue round `round`: reveals the most-voted card and hands the
    /// turn back to the spymaster. Returns `false`, doing nothing, if that
    /// round is no longer open.
    pub fn end_voting(&self, round: u64) -> bool {
        {
            let mut game = self.game.lock();
            if !game.started || game.turn != Turn::Spy || game.voting_round != round {
                debug!(room = %self.name, round, "voting round already closed");
                return false;
            }
            self.close_round(&mut game);
        }

        self.broadcast_game_state();
        true
    }

    fn close_round(&self, game: &mut GameState) {
        game.disarm_timer();
        match game.grid.as_mut().map(WordGrid::evaluate_vote) {
            Some(Ok((index, role))) => {
                info!(room = %self.name, round = game.voting_round, index, ?role, "card revealed");
            }
            Some(Err(err)) => {
                info!(room = %self.name, round = game.voting_round, %err, "round closed without a reveal");
            }
            None => {}
        }
        game.turn = Turn::Spymaster;
        game.clue = None;
        game.end_voting_votes.clear();
    }

    /// Decodes and runs a command from `player_id`. Failures are logged and
    /// go no further.
    #[instrument(skip(self, raw), fields(room = %self.name, cmd = %raw.cmd))]
    pub fn process_command(&self, player_id: &str, raw: &RawCommand) {
        let command = match Command::try_from(raw) {
            Ok(command) => command,
            Err(CommandError::UnknownTag(tag)) => {
                warn!(%tag, "unknown command ignored");
                return;
            }
            Err(err) => {
                warn!(error = %err, "malformed command ignored");
                return;
            }
        };

        let result = match command {
            Command::StartGame => self.start_game(),
            Command::SuggestClue { clue, match_count } => {
                self.suggest_clue(player_id, &clue, match_count)
            }
            Command::VoteCard { index } => self.vote_card(player_id, index).map(drop),
            Command::UnvoteCard { index } => self.unvote_card(player_id, index).map(drop),
            Command::EndClueGuessing => self.end_clue_guessing_early(player_id),
            Command::ChangeName { name } => self.set_player_name(player_id, &name).map(drop),
            Command::ClaimRole { role } => self.claim_role(player_id, role),
        };

        if let Err(err) = result {
            warn!(error = %err, "command rejected");
        }
    }

    // ------------------------------------------------------------------
    // Snapshots
    // ------------------------------------------------------------------

    /// Copy of the current grid, if a game has started.
    #[must_use]
    pub fn current_grid(&self) -> Option<WordGrid> {
        self.game.lock().grid.clone()
    }

    /// Whose move it is, if a game has started.
    #[must_use]
    pub fn current_turn(&self) -> Option<Turn> {
        let game = self.game.lock();
        game.started.then_some(game.turn)
    }

    /// All players with their true roles, ordered by id.
    #[must_use]
    pub fn player_list(&self) -> Vec<PlayerSummary> {
        self.players.lock().values().map(PlayerSummary::of).collect()
    }

    /// The game as a holder of `viewer` sees it, if a game has started.
    #[must_use]
    pub fn game_view(&self, viewer: Role) -> Option<GameView> {
        let snapshot = self.game.lock().snapshot();
        let grid = snapshot.grid.as_ref()?;
        Some(GameView::for_role(&snapshot, grid, viewer))
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    fn seat_of(&self, player_id: &str) -> Result<Seat, DomainError> {
        let players = self.players.lock();
        let role = players
            .get(player_id)
            .map(Player::role)
            .ok_or_else(|| DomainError::NotFound(format!("player {player_id}")))?;
        Ok(Seat {
            role,
            deal: self.dealt.load(Ordering::Relaxed),
        })
    }

    fn require_guesser(seat: Seat) -> Result<(), DomainError> {
        if seat.role.is_guesser() {
            Ok(())
        } else {
            Err(DomainError::Conflict(format!("a {} cannot vote", seat.role)))
        }
    }

    /// Rejects a command whose role was read before the latest game start.
    fn require_deal(game: &GameState, seat: Seat) -> Result<(), DomainError> {
        if game.deal == seat.deal {
            Ok(())
        } else {
            Err(DomainError::Conflict(
                "roles were dealt again before the command ran".to_owned(),
            ))
        }
    }

    fn require_guessing(game: &GameState) -> Result<(), DomainError> {
        if game.started && game.turn == Turn::Spy {
            Ok(())
        } else {
            Err(DomainError::Conflict(
                "voting is only open on the guessers' turn".to_owned(),
            ))
        }
    }

    fn render_game(&self, player: &Player, snapshot: &GameSnapshot, grid: &WordGrid) -> Message {
        let viewer = PlayerSummary::of(player);
        let view = GameView::for_role(snapshot, grid, viewer.role);
        Message::text(self.services.renderer.render_game_state(&viewer, &view))
    }

    fn broadcast_player_list(&self) {
        let evicted = self.send_player_list();
        self.drop_evicted(evicted);
    }

    fn send_player_list(&self) -> Vec<String> {
        let players = self.players.lock();
        let summaries: Vec<PlayerSummary> = players.values().map(PlayerSummary::of).collect();
        broadcast(&players, |player| {
            let viewer = PlayerSummary::of(player);
            let list = player_list_for(&viewer, &summaries);
            Message::text(self.services.renderer.render_player_list(&viewer, &list))
        })
    }

    fn broadcast_game_state(&self) {
        let snapshot = self.game.lock().snapshot();
        let Some(grid) = snapshot.grid.as_ref() else {
            return;
        };
        let evicted = {
            let players = self.players.lock();
            broadcast(&players, |player| self.render_game(player, &snapshot, grid))
        };
        self.drop_evicted(evicted);
    }

    fn broadcast_clue(&self, clue: &Clue) {
        let evicted = {
            let players = self.players.lock();
            broadcast(&players, |player| {
                let viewer = PlayerSummary::of(player);
                let view = ClueView::for_role(clue, viewer.role);
                Message::text(self.services.renderer.render_clue(&viewer, &view))
            })
        };
        self.drop_evicted(evicted);
    }

    fn replay_game_state(&self, player_id: &str, connection_id: Uuid) {
        let snapshot = self.game.lock().snapshot();
        let Some(grid) = snapshot.grid.as_ref() else {
            return;
        };
        let evicted = {
            let players = self.players.lock();
            match players.get(player_id) {
                Some(player) if player.connection_id() == connection_id => {
                    let message = self.render_game(player, &snapshot, grid);
                    send_to(player, message) == Delivery::Evicted
                }
                _ => false,
            }
        };
        if evicted {
            self.drop_evicted(vec![player_id.to_owned()]);
        }
    }

    /// Unregisters players whose connections were force-closed for a full
    /// queue, then tells everyone else. Repeats while that notice itself
    /// evicts someone.
    fn drop_evicted(&self, mut evicted: Vec<String>) {
        while !evicted.is_empty() {
            {
                let mut players = self.players.lock();
                for id in &evicted {
                    if players.get(id).is_some_and(Player::is_closed) {
                        players.remove(id);
                        warn!(room = %self.name, player_id = %id, "slow player evicted");
                    }
                }
            }

            evicted = self.send_player_list();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{drain, room, room_with, room_with_rng};
    use susnames_test_support::FixedClock;

    /// Connects `ids` in order and drains their queues.
    fn seat(room: &Room, ids: &[&str]) -> Vec<PlayerConnection> {
        let mut connections: Vec<PlayerConnection> =
            ids.iter().map(|id| room.connect_player(id, None)).collect();
        for connection in &mut connections {
            drain(&mut connection.outbound);
        }
        connections
    }

    fn role(room: &Room, id: &str) -> Role {
        room.player_list()
            .into_iter()
            .find(|p| p.id == id)
            .map(|p| p.role)
            .unwrap()
    }

    fn revealed(room: &Room) -> usize {
        room.current_grid()
            .unwrap()
            .cards()
            .iter()
            .filter(|card| card.is_revealed())
            .count()
    }

    #[tokio::test]
    async fn test_connect_sends_player_list_and_defaults_role() {
        // Arrange
        let room = room();

        // Act
        let mut conn = room.connect_player("a", Some("  witty-otter "));

        // Assert
        assert_eq!(drain(&mut conn.outbound), vec!["players a=spy"]);
        let players = room.player_list();
        assert_eq!(players[0].name, "witty-otter");
        assert_eq!(players[0].role, Role::Spy);
        assert_eq!(room.current_turn(), None);
    }

    #[tokio::test]
    async fn test_connect_without_name_generates_one() {
        let room = room();
        let _conn = room.connect_player("a", Some(""));
        assert!(room.player_list()[0].name.contains('-'));
    }

    #[tokio::test]
    async fn test_start_game_assigns_spymaster_and_counterspies() {
        // Arrange
        let room = room();
        let _conns = seat(&room, &["a", "b", "c", "d"]);

        // Act
        room.start_game().unwrap();

        // Assert: the first-drawn candidate becomes spymaster, the next
        // remaining spy the single counterspy ((4 - 1) / 2 = 1).
        assert_eq!(role(&room, "a"), Role::Spymaster);
        assert_eq!(role(&room, "b"), Role::Counterspy);
        assert_eq!(role(&room, "c"), Role::Spy);
        assert_eq!(role(&room, "d"), Role::Spy);
        assert_eq!(room.current_turn(), Some(Turn::Spymaster));
        let view = room.game_view(Role::Spy).unwrap();
        assert_eq!(view.end_voting_threshold, 3);
        assert_eq!(view.grid.len(), GRID_SIZE);
    }

    #[tokio::test]
    async fn test_start_game_deals_configured_targets() {
        let room = room_with(RoomSettings {
            spy_target_count: 12,
            counterspy_target_count: 6,
            ..RoomSettings::default()
        });
        let _conns = seat(&room, &["a"]);

        room.start_game().unwrap();

        let grid = room.current_grid().unwrap();
        assert_eq!(grid.count_role(susnames_grid::CardRole::SpyTarget), 12);
        assert_eq!(grid.count_role(susnames_grid::CardRole::CounterspyTarget), 6);
        assert_eq!(grid.count_role(susnames_grid::CardRole::Civilian), 7);
    }

    #[tokio::test]
    async fn test_claimed_spymaster_is_honoured() {
        let room = room();
        let _conns = seat(&room, &["a", "b", "c", "d"]);
        room.claim_role("c", Role::Spymaster).unwrap();

        room.start_game().unwrap();

        assert_eq!(role(&room, "c"), Role::Spymaster);
        assert_eq!(role(&room, "a"), Role::Counterspy);
        assert_eq!(role(&room, "b"), Role::Spy);
        assert_eq!(role(&room, "d"), Role::Spy);
    }

    #[tokio::test]
    async fn test_restart_rederives_roles_and_keeps_quorum() {
        let room = room();
        let _conns = seat(&room, &["a", "b", "c", "d"]);
        room.start_game().unwrap();

        let _late = room.connect_player("e", None);
        room.start_game().unwrap();

        assert_eq!(role(&room, "a"), Role::Spymaster);
        assert_eq!(role(&room, "b"), Role::Counterspy);
        assert_eq!(role(&room, "e"), Role::Spy);
        assert_eq!(room.game_view(Role::Spy).unwrap().end_voting_threshold, 3);
    }

    #[tokio::test]
    async fn test_second_spymaster_claim_conflicts() {
        let room = room();
        let _conns = seat(&room, &["a", "b"]);
        room.claim_role("a", Role::Spymaster).unwrap();

        let result = room.claim_role("b", Role::Spymaster);

        assert!(matches!(result, Err(DomainError::Conflict(_))));
        assert_eq!(role(&room, "b"), Role::Spy);
    }

    #[tokio::test]
    async fn test_counterspy_cannot_be_claimed() {
        let room = room();
        let _conns = seat(&room, &["a"]);
        assert!(matches!(
            room.claim_role("a", Role::Counterspy),
            Err(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_counterspy_is_masked_in_other_players_lists() {
        let room = room();
        let mut conns = seat(&room, &["a", "b", "c", "d"]);

        room.start_game().unwrap();

        let a = drain(&mut conns[0].outbound);
        let b = drain(&mut conns[1].outbound);
        assert_eq!(a[0], "players a=spymaster,b=spy,c=spy,d=spy");
        assert_eq!(b[0], "players a=spymaster,b=counterspy,c=spy,d=spy");
        assert!(a[1].starts_with("game spymaster round=0"));
    }

    #[tokio::test]
    async fn test_start_game_reseeds_from_clock_every_deal() {
        // Arrange
        let (room, rng) = room_with_rng();
        let _conns = seat(&room, &["a", "b"]);

        // Act
        room.start_game().unwrap();
        room.start_game().unwrap();

        // Assert
        let rng = rng.lock();
        assert_eq!(rng.reseed_count(), 2);
        assert_eq!(rng.last_seed(), Some(FixedClock::standard().seed()));
    }

    #[tokio::test]
    async fn test_claim_after_start_waits_for_next_game() {
        let room = room();
        let _conns = seat(&room, &["a", "b", "c"]);
        room.start_game().unwrap();

        room.claim_role("c", Role::Spymaster).unwrap();

        assert_eq!(role(&room, "c"), Role::Spy);
        room.start_game().unwrap();
        assert_eq!(role(&room, "c"), Role::Spymaster);
    }

    #[tokio::test]
    async fn test_clue_from_role_read_before_restart_is_rejected() {
        // Arrange: a is spymaster of the first deal, c of the second.
        let room = room();
        let _conns = seat(&room, &["a", "b", "c", "d"]);
        room.start_game().unwrap();
        let stale = room.seat_of("a").unwrap();
        room.claim_role("c", Role::Spymaster).unwrap();
        room.start_game().unwrap();
        assert_ne!(role(&room, "a"), Role::Spymaster);

        // Act
        let result = room.give_clue("a", stale, "ocean", 2);

        // Assert
        assert!(matches!(result, Err(DomainError::Conflict(_))));
        assert_eq!(room.current_turn(), Some(Turn::Spymaster));
        let view = room.game_view(Role::Spy).unwrap();
        assert!(view.clue.is_none());
        assert_eq!(view.voting_round, 0);
    }

    #[tokio::test]
    async fn test_vote_from_role_read_before_restart_is_rejected() {
        // Arrange
        let room = room();
        let _conns = seat(&room, &["a", "b", "c", "d"]);
        room.start_game().unwrap();
        room.suggest_clue("a", "ocean", 2).unwrap();
        let stale = room.seat_of("c").unwrap();
        room.start_game().unwrap();
        room.suggest_clue("a", "river", 1).unwrap();

        // Act
        let voted = room.change_vote("c", stale, 3, WordGrid::vote_card);
        let ended = room.request_early_end("c", stale);

        // Assert
        assert!(matches!(voted, Err(DomainError::Conflict(_))));
        assert!(matches!(ended, Err(DomainError::Conflict(_))));
        assert_eq!(room.current_grid().unwrap().card(3).unwrap().vote_count(), 0);
        assert_eq!(room.game_view(Role::Spy).unwrap().end_voting_votes, 0);

        // A fresh read goes through.
        assert!(room.vote_card("c", 3).unwrap());
    }

    #[tokio::test]
    async fn test_suggest_clue_opens_voting_round() {
        // Arrange
        let room = room();
        let mut conns = seat(&room, &["a", "b", "c", "d"]);
        room.start_game().unwrap();
        for conn in &mut conns {
            drain(&mut conn.outbound);
        }

        // Act
        room.suggest_clue("a", "ocean", 3).unwrap();

        // Assert
        assert_eq!(room.current_turn(), Some(Turn::Spy));
        let spy_view = room.game_view(Role::Spy).unwrap();
        let clue = spy_view.clue.unwrap();
        assert_eq!(clue.word, "ocean");
        assert_eq!(clue.match_count, Some(3));
        assert_eq!(spy_view.voting_round, 1);

        let spymaster = drain(&mut conns[0].outbound);
        let spy = drain(&mut conns[2].outbound);
        assert_eq!(spymaster[0], "clue ocean ?");
        assert_eq!(spy[0], "clue ocean 3");
        assert!(spy[1].starts_with("game spy round=1"));
    }

    #[tokio::test]
    async fn test_suggest_clue_on_spy_turn_is_rejected_without_change() {
        let room = room();
        let _conns = seat(&room, &["a", "b", "c"]);
        room.start_game().unwrap();
        room.suggest_clue("a", "ocean", 3).unwrap();

        let result = room.suggest_clue("a", "river", 1);

        assert!(matches!(result, Err(DomainError::Conflict(_))));
        let view = room.game_view(Role::Spy).unwrap();
        assert_eq!(view.clue.unwrap().word, "ocean");
        assert_eq!(view.voting_round, 1);
        assert_eq!(room.current_turn(), Some(Turn::Spy));
    }

    #[tokio::test]
    async fn test_suggest_clue_by_non_spymaster_is_rejected() {
        let room = room();
        let _conns = seat(&room, &["a", "b", "c"]);
        room.start_game().unwrap();

        let result = room.suggest_clue("b", "ocean", 3);

        assert!(matches!(result, Err(DomainError::Conflict(_))));
        assert_eq!(room.current_turn(), Some(Turn::Spymaster));
    }

    #[tokio::test]
    async fn test_suggest_clue_in_lobby_is_rejected() {
        let room = room();
        let _conns = seat(&room, &["a"]);
        room.claim_role("a", Role::Spymaster).unwrap();

        assert!(room.suggest_clue("a", "ocean", 3).is_err());
        assert_eq!(room.current_turn(), None);
    }

    #[tokio::test]
    async fn test_vote_guards_turn_and_role() {
        let room = room();
        let _conns = seat(&room, &["a", "b", "c"]);
        room.start_game().unwrap();

        // Guessers cannot vote on the spymaster's turn.
        assert!(room.vote_card("c", 4).is_err());

        room.suggest_clue("a", "ocean", 3).unwrap();

        // The spymaster never votes.
        assert!(room.vote_card("a", 4).is_err());
        assert_eq!(room.vote_card("c", 4), Ok(true));
        assert_eq!(room.vote_card("c", 4), Ok(false));
        assert_eq!(room.unvote_card("c", 4), Ok(true));
        assert_eq!(room.unvote_card("c", 4), Ok(false));
        assert!(matches!(
            room.vote_card("c", 25),
            Err(DomainError::Validation(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_vote_timer_expiry_reveals_most_voted_card() {
        let room = room();
        let _conns = seat(&room, &["a", "b", "c", "d"]);
        room.start_game().unwrap();
        room.suggest_clue("a", "ocean", 1).unwrap();
        room.vote_card("c", 7).unwrap();
        room.vote_card("d", 7).unwrap();
        room.vote_card("b", 3).unwrap();

        tokio::time::sleep(Duration::from_secs(29)).await;
        assert_eq!(room.current_turn(), Some(Turn::Spy));

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(room.current_turn(), Some(Turn::Spymaster));
        let grid = room.current_grid().unwrap();
        assert!(grid.card(7).unwrap().is_revealed());
        assert!(!grid.card(3).unwrap().is_revealed());
        assert!(room.game_view(Role::Spy).unwrap().clue.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_vote_timer_without_votes_still_returns_turn() {
        let room = room();
        let _conns = seat(&room, &["a", "b", "c"]);
        room.start_game().unwrap();
        room.suggest_clue("a", "ocean", 1).unwrap();

        tokio::time::sleep(Duration::from_secs(31)).await;

        assert_eq!(room.current_turn(), Some(Turn::Spymaster));
        assert_eq!(revealed(&room), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_quorum_ends_round_exactly_once() {
        // Arrange: 3 guessers, quorum 3.
        let room = room();
        let _conns = seat(&room, &["a", "b", "c", "d"]);
        room.start_game().unwrap();
        room.suggest_clue("a", "ocean", 1).unwrap();
        room.vote_card("c", 5).unwrap();

        // Act
        room.end_clue_guessing_early("b").unwrap();
        room.end_clue_guessing_early("b").unwrap();
        room.end_clue_guessing_early("c").unwrap();
        assert_eq!(room.current_turn(), Some(Turn::Spy));
        room.end_clue_guessing_early("d").unwrap();

        // Assert
        assert_eq!(room.current_turn(), Some(Turn::Spymaster));
        assert_eq!(revealed(&room), 1);
        assert!(!room.end_voting(1));

        // A second round opens before the first round's deadline passes.
        tokio::time::sleep(Duration::from_secs(10)).await;
        room.suggest_clue("a", "river", 1).unwrap();
        room.vote_card("d", 6).unwrap();
        tokio::time::sleep(Duration::from_secs(25)).await;

        assert_eq!(room.current_turn(), Some(Turn::Spy));
        assert_eq!(revealed(&room), 1);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(room.current_turn(), Some(Turn::Spymaster));
        assert_eq!(revealed(&room), 2);
    }

    #[tokio::test]
    async fn test_early_end_by_spymaster_is_rejected() {
        let room = room();
        let _conns = seat(&room, &["a", "b"]);
        room.start_game().unwrap();
        room.suggest_clue("a", "ocean", 1).unwrap();

        assert!(room.end_clue_guessing_early("a").is_err());
        assert_eq!(
            room.game_view(Role::Spy).unwrap().end_voting_votes,
            0
        );
    }

    #[tokio::test]
    async fn test_fixed_threshold_overrides_formula() {
        let room = room_with(RoomSettings {
            end_voting_threshold: Some(1),
            ..RoomSettings::default()
        });
        let _conns = seat(&room, &["a", "b", "c", "d"]);
        room.start_game().unwrap();
        room.suggest_clue("a", "ocean", 1).unwrap();

        room.end_clue_guessing_early("c").unwrap();

        assert_eq!(room.current_turn(), Some(Turn::Spymaster));
    }

    #[tokio::test]
    async fn test_full_queue_evicts_and_removes_player() {
        // Arrange: a's queue fills because nobody drains it.
        let room = room_with(RoomSettings {
            outbound_capacity: 2,
            ..RoomSettings::default()
        });
        let slow = room.connect_player("a", None);
        let mut fast = room.connect_player("b", None);
        drain(&mut fast.outbound);

        // Act
        room.set_player_name("b", "quick-hare").unwrap();

        // Assert
        assert!(slow.closed.is_cancelled());
        let ids: Vec<String> = room.player_list().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["b".to_owned()]);
        assert_eq!(
            drain(&mut fast.outbound),
            vec!["players a=spy,b=spy", "players b=spy"]
        );
        assert!(!room.remove_player("a", slow.connection_id));
    }

    #[tokio::test]
    async fn test_remove_player_is_idempotent() {
        let room = room();
        let conns = seat(&room, &["a", "b"]);

        assert!(room.remove_player("a", conns[0].connection_id));
        assert!(!room.remove_player("a", conns[0].connection_id));
        assert_eq!(room.player_list().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_session_replaces_old_connection() {
        let room = room();
        let mut old = room.connect_player("a", Some("first"));
        drain(&mut old.outbound);
        room.claim_role("a", Role::Spymaster).unwrap();
        drain(&mut old.outbound);

        let new = room.connect_player("a", Some("second"));

        assert_eq!(old.outbound.recv().await, Some(Message::Close));
        assert!(!room.remove_player("a", old.connection_id));
        let players = room.player_list();
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].name, "second");
        assert_eq!(players[0].role, Role::Spymaster);
        assert_ne!(new.connection_id, old.connection_id);
    }

    #[tokio::test]
    async fn test_late_joiner_receives_game_state() {
        let room = room();
        let _conns = seat(&room, &["a", "b"]);
        room.start_game().unwrap();

        let mut late = room.connect_player("c", None);

        let received = drain(&mut late.outbound);
        assert_eq!(received.len(), 2);
        assert!(received[0].starts_with("players "));
        assert!(received[1].starts_with("game spymaster"));
    }

    #[tokio::test]
    async fn test_set_player_name() {
        let room = room();
        let mut conns = seat(&room, &["a"]);

        assert_eq!(room.set_player_name("a", "bold-heron").unwrap(), "bold-heron");
        assert_eq!(drain(&mut conns[0].outbound).len(), 1);

        // Unchanged name: nothing broadcast.
        room.set_player_name("a", "bold-heron").unwrap();
        assert!(drain(&mut conns[0].outbound).is_empty());

        let generated = room.set_player_name("a", "   ").unwrap();
        assert!(generated.contains('-'));
        assert!(matches!(
            room.set_player_name("zz", "x"),
            Err(DomainError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_process_command_dispatches_and_ignores_bad_frames() {
        let room = room();
        let _conns = seat(&room, &["a", "b", "c"]);

        room.process_command("a", &RawCommand::new("fly-away", []));
        room.process_command("a", &RawCommand::new("vote-card", [("index", "x")]));
        assert_eq!(room.current_turn(), None);

        room.process_command("b", &RawCommand::new("start-game", []));
        room.process_command(
            "a",
            &RawCommand::new("suggest-clue", [("clue", "ocean"), ("matchCount", "2")]),
        );
        room.process_command("c", &RawCommand::new("vote-card", [("index", "9")]));

        assert_eq!(room.current_turn(), Some(Turn::Spy));
        assert_eq!(room.current_grid().unwrap().card(9).unwrap().vote_count(), 1);
    }

    #[test]
    fn test_settings_validation() {
        assert!(RoomSettings::default().validate().is_ok());
        let crowded = RoomSettings {
            spy_target_count: 20,
            counterspy_target_count: 6,
            ..RoomSettings::default()
        };
        assert!(matches!(crowded.validate(), Err(DomainError::Validation(_))));
        let no_queue = RoomSettings {
            outbound_capacity: 0,
            ..RoomSettings::default()
        };
        assert!(no_queue.validate().is_err());
    }
}
