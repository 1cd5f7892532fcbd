//! The game engine — command dispatch for one or more sessions.
//!
//! EXECUTION MODEL:
//!   - A command loads its session, mutates an owned copy to completion
//!     (including round resolution or a full year advance), and only then
//!     persists. A rejection leaves nothing behind — no partial mutation
//!     is ever visible.
//!   - Sessions are independent; the engine holds no cross-session state
//!     beyond the store handle and the master seed.
//!   - After every successful mutation the broadcaster receives the
//!     updated session and the emitted events.

use crate::{
    agreement,
    broadcast::{Broadcaster, NullBroadcaster},
    command::{Caller, GameCommand},
    config::GameData,
    country::Country,
    deployment,
    economy::{self, YearlySnapshot},
    error::{GameError, GameResult},
    event::GameEvent,
    policy::PolicyDraft,
    rng::GameRng,
    round::{self, VoteChoice},
    scoring,
    session::{
        GamePhase, Player, Session, FINAL_ROUND, MAX_PLAYERS, PHASE2_FINAL_YEAR,
        PHASE2_START_YEAR,
    },
    store::{SessionStore, SessionSummary},
    types::PlayerId,
};
use chrono::Utc;
use std::collections::BTreeMap;

pub struct GameEngine {
    store: SessionStore,
    data: GameData,
    master_seed: u64,
    broadcaster: Box<dyn Broadcaster>,
}

impl GameEngine {
    pub fn new(store: SessionStore, data: GameData, master_seed: u64) -> Self {
        Self {
            store,
            data,
            master_seed,
            broadcaster: Box::new(NullBroadcaster),
        }
    }

    pub fn with_broadcaster(mut self, broadcaster: Box<dyn Broadcaster>) -> Self {
        self.broadcaster = broadcaster;
        self
    }

    pub fn data(&self) -> &GameData {
        &self.data
    }

    // ── Session lifecycle (delegated to the store) ─────────────────

    pub fn create_session(&self, name: &str, host_id: Option<&str>) -> GameResult<Session> {
        self.store.create(name, host_id)
    }

    pub fn session(&self, session_id: &str) -> GameResult<Session> {
        self.store
            .load(session_id)?
            .ok_or_else(|| GameError::NotFound(format!("room {session_id}")))
    }

    pub fn delete_session(&self, session_id: &str) -> GameResult<bool> {
        self.store.delete(session_id)
    }

    pub fn list_sessions(&self) -> GameResult<Vec<SessionSummary>> {
        self.store.list()
    }

    // ── Command dispatch ───────────────────────────────────────────

    /// Apply one command to one session, run to completion.
    pub fn apply(
        &self,
        session_id: &str,
        caller: &Caller,
        command: GameCommand,
    ) -> GameResult<Vec<GameEvent>> {
        let mut session = self.session(session_id)?;
        let events = self.dispatch(&mut session, caller, command)?;
        self.store.save(&session)?;
        self.broadcaster.session_updated(&session, &events);
        Ok(events)
    }

    fn dispatch(
        &self,
        session: &mut Session,
        caller: &Caller,
        command: GameCommand,
    ) -> GameResult<Vec<GameEvent>> {
        match command {
            GameCommand::JoinGame { country } => self.join_game(session, caller, country),
            GameCommand::RejoinGame { country } => self.rejoin_game(session, caller, country),
            GameCommand::LeaveGame => self.leave_game(session, caller),
            GameCommand::SetReady { ready } => self.set_ready(session, caller, ready),
            GameCommand::MarkDisconnected { player_id } => {
                self.mark_disconnected(session, &player_id)
            }
            GameCommand::StartGame => self.start_game(session, caller),
            GameCommand::CastVote { choice } => self.cast_vote(session, caller, &choice),
            GameCommand::AdvanceRound => self.advance_round(session, caller),
            GameCommand::SubmitPolicy { policy } => self.submit_policy(session, caller, policy),
            GameCommand::DeployTroops {
                country,
                region,
                troops,
            } => self.deploy_troops(session, caller, country, region, troops),
            GameCommand::AdvanceYear => self.advance_year(session, caller),
            GameCommand::ResetRoom => self.reset_room(session, caller),
        }
    }

    // ── Seat management ────────────────────────────────────────────

    fn join_game(
        &self,
        session: &mut Session,
        caller: &Caller,
        country: Country,
    ) -> GameResult<Vec<GameEvent>> {
        let player_id = match caller {
            Caller::Player { player_id } => player_id.clone(),
            Caller::Admin => {
                return Err(GameError::Forbidden(
                    "administrator cannot join as a player".into(),
                ))
            }
        };

        if session.players.contains_key(&player_id) {
            return Err(GameError::Conflict("player already seated".into()));
        }
        if session.players.len() >= MAX_PLAYERS {
            return Err(GameError::Conflict("session is full".into()));
        }
        if session.country_taken(country) {
            return Err(GameError::Conflict(format!("{country} already taken")));
        }

        session.players.insert(
            player_id.clone(),
            Player {
                id: player_id.clone(),
                country,
                connected: true,
                joined_at: Utc::now(),
            },
        );
        log::info!("session {}: {player_id} joined as {country}", session.id);
        Ok(vec![GameEvent::PlayerJoined { player_id, country }])
    }

    fn rejoin_game(
        &self,
        session: &mut Session,
        caller: &Caller,
        country: Country,
    ) -> GameResult<Vec<GameEvent>> {
        let player_id = caller.player_id()?.clone();

        let Some(player) = session.players.get_mut(&player_id) else {
            return Err(GameError::NotFound(
                "you were not in this game; select a country and join".into(),
            ));
        };
        if player.country != country {
            return Err(GameError::Conflict(format!(
                "you were playing as {}; cannot switch countries mid-game",
                player.country
            )));
        }

        player.connected = true;
        log::info!("session {}: {player_id} reconnected as {country}", session.id);
        Ok(vec![GameEvent::PlayerRejoined { player_id, country }])
    }

    fn leave_game(&self, session: &mut Session, caller: &Caller) -> GameResult<Vec<GameEvent>> {
        let player_id = caller.player_id()?.clone();

        if session.players.remove(&player_id).is_none() {
            return Err(GameError::NotFound(format!("player {player_id}")));
        }
        session.votes.remove(&player_id);
        session.ready.remove(&player_id);

        let mut events = vec![GameEvent::PlayerLeft { player_id }];

        // The departed player may have been the last holdout.
        if session.phase == GamePhase::Voting && session.all_voted() {
            events.push(self.resolve_round(session)?);
        }
        Ok(events)
    }

    fn set_ready(
        &self,
        session: &mut Session,
        caller: &Caller,
        ready: bool,
    ) -> GameResult<Vec<GameEvent>> {
        let player_id = caller.player_id()?.clone();
        if !session.players.contains_key(&player_id) {
            return Err(GameError::NotFound(format!("player {player_id}")));
        }
        if ready {
            session.ready.insert(player_id.clone());
        } else {
            session.ready.remove(&player_id);
        }
        Ok(vec![GameEvent::ReadyChanged { player_id, ready }])
    }

    fn mark_disconnected(
        &self,
        session: &mut Session,
        player_id: &PlayerId,
    ) -> GameResult<Vec<GameEvent>> {
        let Some(player) = session.players.get_mut(player_id) else {
            return Err(GameError::NotFound(format!("player {player_id}")));
        };
        // Connection loss never removes a player — the economic model
        // keeps simulating their country.
        player.connected = false;
        session.ready.remove(player_id);
        log::info!(
            "session {}: {player_id} disconnected, keeping seat",
            session.id
        );
        Ok(vec![GameEvent::PlayerDisconnected {
            player_id: player_id.clone(),
        }])
    }

    // ── Phase 1 ────────────────────────────────────────────────────

    fn start_game(&self, session: &mut Session, caller: &Caller) -> GameResult<Vec<GameEvent>> {
        caller.require_admin()?;
        if session.phase != GamePhase::Lobby {
            return Err(GameError::Forbidden("game already started".into()));
        }
        if session.players.len() < 2 {
            return Err(GameError::InvalidInput(
                "need at least 2 players to start".into(),
            ));
        }

        session.started = true;
        session.phase = GamePhase::Voting;
        session.current_round = 1;
        log::info!(
            "session {}: game started with {} players",
            session.id,
            session.players.len()
        );
        Ok(vec![GameEvent::GameStarted { round: 1 }])
    }

    fn cast_vote(
        &self,
        session: &mut Session,
        caller: &Caller,
        choice: &str,
    ) -> GameResult<Vec<GameEvent>> {
        let player_id = caller.player_id()?.clone();
        if session.phase != GamePhase::Voting {
            // A straggler re-vote for the round that just resolved is a
            // duplicate, not a phase violation.
            if session.phase == GamePhase::Results
                && session
                    .round_history
                    .last()
                    .is_some_and(|record| record.votes.contains_key(&player_id))
            {
                return Err(GameError::Conflict(
                    "round already resolved; vote not accepted".into(),
                ));
            }
            return Err(GameError::Forbidden("voting is not open".into()));
        }
        if !session.players.contains_key(&player_id) {
            return Err(GameError::NotFound(format!("player {player_id}")));
        }
        let choice = VoteChoice::parse(choice).ok_or_else(|| {
            GameError::InvalidInput(format!("choice must be A, B, or C, got {choice:?}"))
        })?;

        session.votes.insert(player_id.clone(), choice);
        let mut events = vec![GameEvent::VoteRecorded { player_id }];

        if session.all_voted() {
            events.push(self.resolve_round(session)?);
        }
        Ok(events)
    }

    /// Resolve the current round: tally, winner, scores, history, results
    /// phase. Callers guarantee every current player has voted.
    fn resolve_round(&self, session: &mut Session) -> GameResult<GameEvent> {
        let issue = self
            .data
            .issue_for_round(session.current_round)
            .ok_or_else(|| {
                GameError::NotFound(format!("no issue for round {}", session.current_round))
            })?;

        let record = round::resolve(
            session.current_round,
            issue,
            &session.votes,
            &session.players,
        );
        for (&country, &points) in &record.round_scores {
            session.add_score(country, points);
        }

        log::info!(
            "session {}: round {} resolved, option {} wins ({} votes)",
            session.id,
            record.round,
            record.winning_option.letter(),
            record.tally.votes_for(record.winning_option)
        );

        let event = GameEvent::RoundResolved {
            round: record.round,
            winning_option: record.winning_option,
            tally: record.tally,
            round_scores: record.round_scores.clone(),
        };
        session.round_history.push(record);
        session.phase = GamePhase::Results;
        Ok(event)
    }

    fn advance_round(&self, session: &mut Session, caller: &Caller) -> GameResult<Vec<GameEvent>> {
        caller.require_admin()?;
        if session.phase != GamePhase::Results {
            return Err(GameError::Forbidden(
                "no round results to advance from".into(),
            ));
        }

        session.current_round += 1;

        if session.current_round > FINAL_ROUND {
            let event = self.initialize_phase2(session)?;
            log::info!(
                "session {}: phase 1 complete, economic management begins",
                session.id
            );
            Ok(vec![event])
        } else {
            session.votes.clear();
            session.phase = GamePhase::Voting;
            Ok(vec![GameEvent::RoundAdvanced {
                round: session.current_round,
            }])
        }
    }

    // ── Phase 2 ────────────────────────────────────────────────────

    /// Seed the 1946 snapshots and open the ledger.
    fn initialize_phase2(&self, session: &mut Session) -> GameResult<GameEvent> {
        let mut seed = BTreeMap::new();
        for player in session.players.values() {
            let init = self
                .data
                .initial_conditions
                .get(&player.country)
                .ok_or_else(|| {
                    GameError::NotFound(format!("no initial conditions for {}", player.country))
                })?;
            seed.insert(player.country, YearlySnapshot::seed(player.country, init));
        }

        session.votes.clear();
        session.ready.clear();
        session.phase = GamePhase::Phase2;
        session.phase2.active = true;
        session.phase2.current_year = PHASE2_START_YEAR;
        session.phase2.policies.clear();
        session.phase2.yearly_data.insert(PHASE2_START_YEAR, seed);

        Ok(GameEvent::PhaseTwoInitialized {
            year: PHASE2_START_YEAR,
        })
    }

    fn submit_policy(
        &self,
        session: &mut Session,
        caller: &Caller,
        draft: PolicyDraft,
    ) -> GameResult<Vec<GameEvent>> {
        let player_id = caller.player_id()?.clone();
        if !session.phase2.active {
            return Err(GameError::Forbidden("phase 2 is not active".into()));
        }
        let Some(player) = session.players.get(&player_id) else {
            return Err(GameError::NotFound(format!("player {player_id}")));
        };
        let country = player.country;
        let year = session.phase2.current_year;

        session
            .phase2
            .policies
            .entry(year)
            .or_default()
            .insert(country, draft.normalize());
        session.ready.insert(player_id);

        log::info!("session {}: {country} submitted policy for {year}", session.id);
        Ok(vec![GameEvent::PolicySubmitted { country, year }])
    }

    fn deploy_troops(
        &self,
        session: &mut Session,
        caller: &Caller,
        country: Country,
        region: String,
        troops: u32,
    ) -> GameResult<Vec<GameEvent>> {
        let player_id = caller.player_id()?.clone();
        let Some(player) = session.players.get(&player_id) else {
            return Err(GameError::NotFound(format!("player {player_id}")));
        };
        if player.country != country {
            return Err(GameError::Forbidden(format!(
                "deployment declared for {country} but you play {}",
                player.country
            )));
        }

        let conflict = deployment::record(
            &mut session.phase2,
            country,
            region.clone(),
            troops,
            &self.data.conflict_zones,
        );
        let year = session.phase2.current_year;

        let mut events = vec![GameEvent::TroopsDeployed {
            country,
            region,
            troops,
            year,
        }];
        if let Some(conflict) = conflict {
            log::warn!(
                "session {}: conflict in {} ({:?}), year {}",
                session.id,
                conflict.region,
                conflict.countries,
                conflict.year
            );
            events.push(GameEvent::ConflictDetected {
                region: conflict.region,
                countries: conflict.countries,
                year: conflict.year,
            });
        }
        Ok(events)
    }

    fn advance_year(&self, session: &mut Session, caller: &Caller) -> GameResult<Vec<GameEvent>> {
        caller.require_admin()?;
        if !session.phase2.active {
            return Err(GameError::Forbidden("phase 2 is not active".into()));
        }

        // At the final year there is nothing left to simulate — the next
        // advance closes the books.
        if session.phase2.current_year >= PHASE2_FINAL_YEAR {
            return self.finalize_phase2(session);
        }

        let year = session.phase2.current_year;
        let policies = session
            .phase2
            .policies
            .get(&year)
            .cloned()
            .unwrap_or_default();
        let prev = session
            .phase2
            .yearly_data
            .get(&year)
            .ok_or_else(|| GameError::NotFound(format!("no economic data for year {year}")))?;

        let bonuses = agreement::calculate(
            &session.round_history,
            &session.players,
            &self.data.agreement_keywords,
        );
        let mut rng = GameRng::for_year(self.master_seed, &session.id, year);
        let next = economy::advance_year(year, &policies, prev, &bonuses, &mut rng);

        session.phase2.yearly_data.insert(year + 1, next);
        session.phase2.current_year = year + 1;
        session.ready.clear();

        log::info!("session {}: advanced to year {}", session.id, year + 1);
        Ok(vec![GameEvent::YearAdvanced { year: year + 1 }])
    }

    fn finalize_phase2(&self, session: &mut Session) -> GameResult<Vec<GameEvent>> {
        let bonuses = agreement::calculate(
            &session.round_history,
            &session.players,
            &self.data.agreement_keywords,
        );

        let mut breakdowns = BTreeMap::new();
        for player in session.players.values() {
            let breakdown = scoring::score_country(
                &session.phase2.yearly_data,
                player.country,
                bonuses.get(&player.country),
            );
            breakdowns.insert(player.country, breakdown);
        }
        for (&country, breakdown) in &breakdowns {
            session.add_score(country, breakdown.total());
        }

        session.phase2.score_breakdowns = breakdowns.clone();
        session.phase2.active = false;
        session.phase = GamePhase::Complete;

        log::info!("session {}: phase 2 complete, final scores posted", session.id);
        Ok(vec![GameEvent::PhaseTwoCompleted { breakdowns }])
    }

    // ── Administration ─────────────────────────────────────────────

    fn reset_room(&self, session: &mut Session, caller: &Caller) -> GameResult<Vec<GameEvent>> {
        caller.require_admin()?;
        session.reset();
        log::info!("session {}: reset to lobby, players retained", session.id);
        Ok(vec![GameEvent::RoomReset])
    }
}
