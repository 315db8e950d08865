use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// A user's reaction to an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionAction {
    Like,
    Dislike,
}

impl ReactionAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReactionAction::Like => "like",
            ReactionAction::Dislike => "dislike",
        }
    }

    fn other(&self) -> Self {
        match self {
            ReactionAction::Like => ReactionAction::Dislike,
            ReactionAction::Dislike => ReactionAction::Like,
        }
    }
}

impl FromStr for ReactionAction {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "like" => Ok(ReactionAction::Like),
            "dislike" => Ok(ReactionAction::Dislike),
            _ => Err(()),
        }
    }
}

impl Display for ReactionAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The ledger mutation a vote requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerOp {
    /// Create the (user, entry) ledger row with the desired action.
    Insert,
    /// Delete the ledger row (the user un-voted).
    Remove,
    /// Flip the existing ledger row to the desired action.
    Replace,
}

/// The planned outcome of applying one vote to one (user, entry) pair.
///
/// Each pair moves through three states (no-reaction, liked, disliked)
/// and a vote for `like` or `dislike` is the only transition trigger.
/// The deltas keep the entry's aggregate counters in lockstep with the
/// ledger, provided both are applied in the same transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteTransition {
    pub op: LedgerOp,
    pub like_delta: i64,
    pub dislike_delta: i64,
    /// The user's reaction after the vote; `None` means un-voted.
    pub resulting: Option<ReactionAction>,
}

impl VoteTransition {
    /// Plans the transition from the user's current reaction under a vote
    /// for `desired`.
    pub fn plan(current: Option<ReactionAction>, desired: ReactionAction) -> Self {
        match current {
            None => Self {
                op: LedgerOp::Insert,
                like_delta: delta(desired, ReactionAction::Like, 1),
                dislike_delta: delta(desired, ReactionAction::Dislike, 1),
                resulting: Some(desired),
            },
            Some(current) if current == desired => Self {
                op: LedgerOp::Remove,
                like_delta: delta(desired, ReactionAction::Like, -1),
                dislike_delta: delta(desired, ReactionAction::Dislike, -1),
                resulting: None,
            },
            Some(current) => Self {
                op: LedgerOp::Replace,
                like_delta: delta(desired, ReactionAction::Like, 1)
                    + delta(current, ReactionAction::Like, -1),
                dislike_delta: delta(desired, ReactionAction::Dislike, 1)
                    + delta(current, ReactionAction::Dislike, -1),
                resulting: Some(desired),
            },
        }
    }
}

fn delta(action: ReactionAction, counter: ReactionAction, amount: i64) -> i64 {
    if action == counter {
        amount
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ReactionAction::{Dislike, Like};

    #[test]
    fn first_like_inserts() {
        let t = VoteTransition::plan(None, Like);
        assert_eq!(t.op, LedgerOp::Insert);
        assert_eq!((t.like_delta, t.dislike_delta), (1, 0));
        assert_eq!(t.resulting, Some(Like));
    }

    #[test]
    fn first_dislike_inserts() {
        let t = VoteTransition::plan(None, Dislike);
        assert_eq!(t.op, LedgerOp::Insert);
        assert_eq!((t.like_delta, t.dislike_delta), (0, 1));
        assert_eq!(t.resulting, Some(Dislike));
    }

    #[test]
    fn repeated_like_removes() {
        let t = VoteTransition::plan(Some(Like), Like);
        assert_eq!(t.op, LedgerOp::Remove);
        assert_eq!((t.like_delta, t.dislike_delta), (-1, 0));
        assert_eq!(t.resulting, None);
    }

    #[test]
    fn repeated_dislike_removes() {
        let t = VoteTransition::plan(Some(Dislike), Dislike);
        assert_eq!(t.op, LedgerOp::Remove);
        assert_eq!((t.like_delta, t.dislike_delta), (0, -1));
        assert_eq!(t.resulting, None);
    }

    #[test]
    fn like_over_dislike_replaces() {
        let t = VoteTransition::plan(Some(Dislike), Like);
        assert_eq!(t.op, LedgerOp::Replace);
        assert_eq!((t.like_delta, t.dislike_delta), (1, -1));
        assert_eq!(t.resulting, Some(Like));
    }

    #[test]
    fn dislike_over_like_replaces() {
        let t = VoteTransition::plan(Some(Like), Dislike);
        assert_eq!(t.op, LedgerOp::Replace);
        assert_eq!((t.like_delta, t.dislike_delta), (-1, 1));
        assert_eq!(t.resulting, Some(Dislike));
    }

    /// Replays arbitrary vote sequences against simulated counters and a
    /// simulated ledger; the two must stay in lockstep and the counters
    /// must never go negative.
    #[test]
    fn counters_track_ledger_over_any_sequence() {
        let sequences: &[&[ReactionAction]] = &[
            &[Like, Like],
            &[Like, Dislike],
            &[Dislike, Dislike, Dislike],
            &[Like, Dislike, Like, Like, Dislike],
            &[Dislike, Like, Like, Dislike, Dislike, Like],
        ];

        for sequence in sequences {
            let mut state: Option<ReactionAction> = None;
            let mut likes: i64 = 0;
            let mut dislikes: i64 = 0;

            for &vote in *sequence {
                let t = VoteTransition::plan(state, vote);
                likes += t.like_delta;
                dislikes += t.dislike_delta;
                state = t.resulting;

                assert!(likes >= 0, "likes went negative in {sequence:?}");
                assert!(dislikes >= 0, "dislikes went negative in {sequence:?}");
                assert_eq!(likes, i64::from(state == Some(Like)));
                assert_eq!(dislikes, i64::from(state == Some(Dislike)));
            }
        }
    }

    #[test]
    fn double_vote_returns_to_baseline() {
        let first = VoteTransition::plan(None, Like);
        let second = VoteTransition::plan(first.resulting, Like);

        assert_eq!(first.like_delta + second.like_delta, 0);
        assert_eq!(first.dislike_delta + second.dislike_delta, 0);
        assert_eq!(second.resulting, None);
    }
}
