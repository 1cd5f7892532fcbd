//! Round Engine — Phase 1 vote tallying and scoring.
//!
//! A round resolves atomically once every current player has voted: tally,
//! plurality winner with the fixed tie-break A > B > C, per-country scores,
//! and an immutable `RoundRecord` appended to the session history.

use crate::{
    config::Issue,
    country::Country,
    session::Player,
    types::{PlayerId, Round},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum VoteChoice {
    A,
    B,
    C,
}

impl VoteChoice {
    /// Parse a transport-supplied choice, case-insensitively.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "a" => Some(VoteChoice::A),
            "b" => Some(VoteChoice::B),
            "c" => Some(VoteChoice::C),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        match self {
            VoteChoice::A => 0,
            VoteChoice::B => 1,
            VoteChoice::C => 2,
        }
    }

    pub fn letter(self) -> &'static str {
        match self {
            VoteChoice::A => "A",
            VoteChoice::B => "B",
            VoteChoice::C => "C",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    pub a: u32,
    pub b: u32,
    pub c: u32,
}

impl VoteTally {
    pub fn count<I: IntoIterator<Item = VoteChoice>>(votes: I) -> Self {
        let mut tally = VoteTally::default();
        for vote in votes {
            match vote {
                VoteChoice::A => tally.a += 1,
                VoteChoice::B => tally.b += 1,
                VoteChoice::C => tally.c += 1,
            }
        }
        tally
    }

    pub fn votes_for(&self, choice: VoteChoice) -> u32 {
        match choice {
            VoteChoice::A => self.a,
            VoteChoice::B => self.b,
            VoteChoice::C => self.c,
        }
    }

    /// Plurality winner. Ties resolve in the fixed order A > B > C:
    /// a later option must strictly beat the running maximum.
    pub fn winner(&self) -> VoteChoice {
        let mut winner = VoteChoice::A;
        let mut max = self.a;
        if self.b > max {
            winner = VoteChoice::B;
            max = self.b;
        }
        if self.c > max {
            winner = VoteChoice::C;
        }
        winner
    }
}

/// One resolved round. Immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundRecord {
    pub round: Round,
    pub issue_id: String,
    pub issue_title: String,
    pub votes: BTreeMap<PlayerId, VoteChoice>,
    pub tally: VoteTally,
    pub winning_option: VoteChoice,
    pub round_scores: BTreeMap<Country, i64>,
}

/// Score one player's round:
///   +10 participation
///   +20 voted with the winning option
///   +40 winning option favors the player's country
///   -10 winning option opposes the player's country
///   +15 the player's own choice favors their country, win or lose
pub fn score_vote(issue: &Issue, country: Country, vote: VoteChoice, winner: VoteChoice) -> i64 {
    let mut points = 10;

    if vote == winner {
        points += 20;
    }

    if let Some(winning) = issue.option(winner) {
        if winning.favors.contains(&country) {
            points += 40;
        }
        if winning.opposes.contains(&country) {
            points -= 10;
        }
    }

    if let Some(own) = issue.option(vote) {
        if own.favors.contains(&country) {
            points += 15;
        }
    }

    points
}

/// Resolve a complete vote set into a `RoundRecord`.
/// Callers guarantee `votes` covers every current player.
pub fn resolve(
    round: Round,
    issue: &Issue,
    votes: &BTreeMap<PlayerId, VoteChoice>,
    players: &BTreeMap<PlayerId, Player>,
) -> RoundRecord {
    let tally = VoteTally::count(votes.values().copied());
    let winner = tally.winner();

    let mut round_scores = BTreeMap::new();
    for (player_id, player) in players {
        if let Some(&vote) = votes.get(player_id) {
            let points = score_vote(issue, player.country, vote, winner);
            round_scores.insert(player.country, points);
        }
    }

    RoundRecord {
        round,
        issue_id: issue.id.clone(),
        issue_title: issue.title.clone(),
        votes: votes.clone(),
        tally,
        winning_option: winner,
        round_scores,
    }
}
