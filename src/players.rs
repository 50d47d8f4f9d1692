//! Automated players.

use crate::client::{GameClient, PlaceResult};
use crate::games::reversi::{Board, Color, Position, rules};
use crate::session::SessionError;
use crate::sync::RoomView;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

/// Chooses a placement for the side to move.
pub trait MoveSelector: Send + Sync {
    /// Returns a legal placement, or `None` to pass.
    fn select_move(&self, board: &Board, color: Color) -> Option<Position>;
}

/// Picks the first legal cell in row-major order.
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstLegalMove;

impl MoveSelector for FirstLegalMove {
    fn select_move(&self, board: &Board, color: Color) -> Option<Position> {
        rules::legal_moves(board, color).into_iter().next()
    }
}

/// Action budget shared by every side driven in one match.
///
/// Each placement or pass takes one unit. When the budget runs dry, or
/// a side fails, every side sharing it is stopped.
#[derive(Debug)]
pub struct MatchBudget {
    remaining: AtomicUsize,
    stop: watch::Sender<bool>,
}

impl MatchBudget {
    /// Creates a budget of `max_actions` moves and passes in total.
    pub fn new(max_actions: usize) -> Self {
        let (stop, _rx) = watch::channel(false);
        Self {
            remaining: AtomicUsize::new(max_actions),
            stop,
        }
    }

    /// Actions not yet taken.
    pub fn remaining(&self) -> usize {
        self.remaining.load(Ordering::SeqCst)
    }

    /// Returns true once any side has stopped the match.
    pub fn is_stopped(&self) -> bool {
        *self.stop.borrow()
    }

    /// Stops every side sharing this budget.
    pub fn stop(&self) {
        self.stop.send_replace(true);
    }

    /// Takes one action, stopping the match if none are left.
    fn take(&self) -> bool {
        let taken = self
            .remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if !taken {
            warn!("Action budget exhausted");
            self.stop();
        }
        taken
    }

    async fn stopped(&self) {
        let mut rx = self.stop.subscribe();
        // The sender lives as long as `self`, so this only returns on stop.
        let _ = rx.wait_for(|stopped| *stopped).await;
    }
}

/// Plays `client`'s side until the room ends, neither color can place
/// any more, or the shared `budget` stops the match.
///
/// Sides driven against the same budget stop together when it runs dry
/// or when one of them fails. Returns the last view seen.
///
/// # Errors
///
/// Propagates [`SessionError`] from the client.
#[instrument(
    skip(client, selector, budget),
    fields(room_id = %client.room_id(), color = %client.color())
)]
pub async fn play_out<S>(
    client: &GameClient,
    selector: &S,
    budget: &MatchBudget,
) -> Result<RoomView, SessionError>
where
    S: MoveSelector + ?Sized,
{
    let result = drive(client, selector, budget).await;
    if let Err(e) = &result {
        warn!(error = %e, "Side failed, stopping the match");
        budget.stop();
    }
    result
}

async fn drive<S>(
    client: &GameClient,
    selector: &S,
    budget: &MatchBudget,
) -> Result<RoomView, SessionError>
where
    S: MoveSelector + ?Sized,
{
    let me = client.color();
    let mut acted_at: Option<u64> = None;

    loop {
        // Skip snapshots up to the one we last acted on; our own write
        // arrives after it through the sync channel like any other.
        let wait = client.wait_until(|view| {
            acted_at.is_none_or(|seq| *view.seq() > seq)
                && (view.is_over() || view.is_turn_of(me) || view.is_stalled())
        });
        let view = tokio::select! {
            biased;
            view = wait => view?,
            () = budget.stopped() => {
                debug!("Stopped by a sibling side");
                return latest_view(client);
            }
        };

        if view.is_over() {
            info!(outcome = ?view.outcome(), "Room finished");
            return Ok(view);
        }
        if view.is_stalled() {
            warn!("Neither color can place; stopping");
            return Ok(view);
        }
        if !budget.take() {
            return Ok(view);
        }

        match selector.select_move(view.room().board(), me) {
            Some(position) => match client.place(position).await? {
                PlaceResult::Placed { .. } => debug!(%position, "Placed"),
                PlaceResult::Rejected(reason) => {
                    warn!(%reason, "Selector chose an illegal move, passing instead");
                    client.pass().await?;
                }
            },
            None => client.pass().await?,
        }
        acted_at = Some(*view.seq());
    }
}

fn latest_view(client: &GameClient) -> Result<RoomView, SessionError> {
    client
        .view()
        .ok_or_else(|| SessionError::NotSynced(client.room_id().clone()))
}
