//! Async driver for a [`GameSession`].
//!
//! The runner is an actor: one task owns the session and processes
//! [`Command`]s strictly one at a time. The opponent's thinking delay is a
//! single deferred task that sleeps and then posts
//! [`Command::OpponentTurn`] back to the actor. Resetting aborts that task,
//! and the ticket check in the session drops it if it fires anyway.
//!
//! After every command the runner publishes a fresh [`Snapshot`] on a
//! `watch` channel; the UI subscribes to it through [`SessionHandle`].

use std::time::Duration;

use anyhow::Result;
use luffarschack_engine::{Effect, StatsStore, Ticket};
use rand::Rng;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

use crate::session::{GameSession, SessionError, Snapshot};

/// Attempts made by [`shutdown`] to write unsaved stats.
const FLUSH_ATTEMPTS: u32 = 3;

/// Base delay between flush attempts; doubles each retry.
const FLUSH_BACKOFF: Duration = Duration::from_millis(50);

/// Messages processed by the session actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// The player clicked a cell.
    PlayerMove(usize),
    /// Start a new game.
    Reset,
    /// The thinking delay for this ticket elapsed.
    OpponentTurn(Ticket),
    /// Flush stats and stop.
    Shutdown,
}

/// Cloneable front door to a running session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    commands: mpsc::UnboundedSender<Command>,
    snapshots: watch::Receiver<Snapshot>,
}

impl SessionHandle {
    /// Requests a player move. Illegal moves are dropped by the session.
    ///
    /// # Errors
    ///
    /// Fails only if the session has stopped.
    pub fn handle_player_move(&self, cell: usize) -> Result<()> {
        self.send(Command::PlayerMove(cell))
    }

    /// Requests a new game.
    ///
    /// # Errors
    ///
    /// Fails only if the session has stopped.
    pub fn reset_game(&self) -> Result<()> {
        self.send(Command::Reset)
    }

    /// Latest published state.
    pub fn snapshot(&self) -> Snapshot {
        self.snapshots.borrow().clone()
    }

    /// A receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.clone()
    }

    fn send(&self, command: Command) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|_| anyhow::anyhow!("Session has stopped"))
    }
}

/// Owns the session and the pending opponent timer.
struct SessionRunner<S, R> {
    session: GameSession<S, R>,
    delay: Duration,
    commands: mpsc::UnboundedReceiver<Command>,
    loopback: mpsc::UnboundedSender<Command>,
    snapshots: watch::Sender<Snapshot>,
    pending: Option<(Ticket, JoinHandle<()>)>,
}

/// Starts the actor for `session`.
///
/// Returns the handle for the UI and the actor's join handle. The actor
/// runs until [`shutdown`] is called.
pub fn spawn<S, R>(session: GameSession<S, R>, delay: Duration) -> (SessionHandle, JoinHandle<()>)
where
    S: StatsStore + 'static,
    R: Rng + Send + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();
    let (snapshot_tx, snapshot_rx) = watch::channel(session.snapshot());

    let runner = SessionRunner {
        session,
        delay,
        commands: rx,
        loopback: tx.clone(),
        snapshots: snapshot_tx,
        pending: None,
    };
    let task = tokio::spawn(runner.run());

    let handle = SessionHandle {
        commands: tx,
        snapshots: snapshot_rx,
    };
    (handle, task)
}

/// Stops the actor behind `handle` and waits for it to flush.
///
/// # Errors
///
/// Fails if the actor task panicked.
#[instrument(skip_all)]
pub async fn shutdown(handle: SessionHandle, task: JoinHandle<()>) -> Result<()> {
    // Already stopped is fine; the join below reports panics.
    let _ = handle.send(Command::Shutdown);
    drop(handle);
    task.await?;
    Ok(())
}

impl<S, R> SessionRunner<S, R>
where
    S: StatsStore + 'static,
    R: Rng + Send + 'static,
{
    async fn run(mut self) {
        info!(delay_ms = self.delay.as_millis() as u64, "Session runner started");

        // `loopback` keeps the channel open, so Shutdown is the normal exit.
        while let Some(command) = self.commands.recv().await {
            if command == Command::Shutdown {
                break;
            }
            self.handle(command);
            self.snapshots.send_replace(self.session.snapshot());
        }

        self.cancel_pending();
        self.flush_with_backoff().await;
        self.snapshots.send_replace(self.session.snapshot());
        info!("Session runner stopped");
    }

    #[instrument(skip(self))]
    fn handle(&mut self, command: Command) {
        let result: Result<Vec<Effect>, SessionError> = match command {
            Command::PlayerMove(cell) => self.session.handle_player_move(cell).map_err(Into::into),
            Command::Reset => Ok(self.session.reset_game()),
            Command::OpponentTurn(ticket) => {
                if matches!(self.pending, Some((pending, _)) if pending == ticket) {
                    self.pending = None;
                }
                self.session.play_opponent(ticket)
            }
            Command::Shutdown => Ok(Vec::new()),
        };

        match result {
            Ok(effects) => effects.into_iter().for_each(|effect| self.apply(effect)),
            Err(SessionError::Move(e)) => debug!(error = %e, "Ignoring rejected move"),
            Err(e) => error!(error = %e, "Session fault"),
        }
    }

    fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::ScheduleOpponent(ticket) => self.schedule(ticket),
            Effect::CancelOpponent(ticket) => {
                if matches!(self.pending, Some((pending, _)) if pending == ticket) {
                    self.cancel_pending();
                }
            }
            // The session persists stats itself.
            Effect::PersistStats(_) => {}
        }
    }

    fn schedule(&mut self, ticket: Ticket) {
        if let Some((stale, _)) = &self.pending {
            error!(%stale, %ticket, "Opponent already scheduled, replacing");
            self.cancel_pending();
        }

        let loopback = self.loopback.clone();
        let delay = self.delay;
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // The actor may be gone by now.
            let _ = loopback.send(Command::OpponentTurn(ticket));
        });
        debug!(%ticket, "Opponent turn scheduled");
        self.pending = Some((ticket, task));
    }

    fn cancel_pending(&mut self) {
        if let Some((ticket, task)) = self.pending.take() {
            task.abort();
            debug!(%ticket, "Opponent turn cancelled");
        }
    }

    async fn flush_with_backoff(&mut self) {
        let mut backoff = FLUSH_BACKOFF;
        for attempt in 1..=FLUSH_ATTEMPTS {
            match self.session.flush() {
                Ok(()) => return,
                Err(e) => {
                    warn!(attempt, error = %e, "Flushing stats failed");
                    if attempt < FLUSH_ATTEMPTS {
                        tokio::time::sleep(backoff).await;
                        backoff *= 2;
                    }
                }
            }
        }
        error!("Giving up on unsaved stats");
    }
}
