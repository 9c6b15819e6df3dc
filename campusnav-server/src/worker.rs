//! One tokio task per navigation session
//!
//! Position samples go through a `watch` channel, so a burst of samples
//! collapses into the latest one while a reroute is running. Route
//! recomputation runs on the blocking pool; stopping the session while it
//! runs makes the session discard the result.
//!
//! Session timers run on the client's sample timestamps. Ticks translate the
//! server clock with the skew seen when the latest sample was received. The
//! task ends once the session is back at idle.

use std::{sync::Arc, time::Duration};

use campusnav_core::{
    CampusGraph, NavState, NavigationSession, SessionEvent, SessionSnapshot,
    session::{PositionUpdate, RerouteOutcome},
    source::LocationError,
    tracking::{HeadingReading, PositionSample},
};
use chrono::{DateTime, TimeDelta, Utc};
use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
    time::MissedTickBehavior,
};
use tracing::{debug, info, warn};

#[derive(Debug)]
pub enum Command {
    Heading(HeadingReading),
    LocationError(LocationError),
    ReplaceGraph(Arc<CampusGraph>),
    Stop,
}

/// Sample together with the server time it arrived
type Received = (PositionSample, DateTime<Utc>);

/// Sending side of a running session
#[derive(Debug, Clone)]
pub struct SessionHandle {
    positions: watch::Sender<Option<Received>>,
    commands: mpsc::UnboundedSender<Command>,
    snapshots: watch::Receiver<Arc<SessionSnapshot>>,
}

impl SessionHandle {
    pub fn snapshot(&self) -> Arc<SessionSnapshot> {
        Arc::clone(&self.snapshots.borrow())
    }

    /// Receiver that sees every published snapshot from now on
    pub fn subscribe(&self) -> watch::Receiver<Arc<SessionSnapshot>> {
        self.snapshots.clone()
    }

    /// Queues a sample, replacing one not yet picked up
    pub fn submit_position(&self, sample: PositionSample) -> bool {
        self.positions.send(Some((sample, Utc::now()))).is_ok()
    }

    pub fn send(&self, command: Command) -> bool {
        self.commands.send(command).is_ok()
    }
}

/// Maps the server clock onto the client's sample clock
#[derive(Debug, Clone, Copy)]
struct SampleClock {
    skew: TimeDelta,
}

impl SampleClock {
    fn new() -> Self {
        Self {
            skew: TimeDelta::zero(),
        }
    }

    fn observe(&mut self, sample: &PositionSample, received: DateTime<Utc>) {
        self.skew = sample.timestamp - received;
    }

    fn now(&self) -> DateTime<Utc> {
        Utc::now() + self.skew
    }
}

/// Moves `session` onto its own task
///
/// `on_exit` runs once the task is done with the session.
pub fn spawn_session<F>(
    id: u64,
    session: NavigationSession,
    poll_interval: Duration,
    on_exit: F,
) -> SessionHandle
where
    F: FnOnce() + Send + 'static,
{
    let (positions_tx, positions_rx) = watch::channel(None);
    let (commands_tx, commands_rx) = mpsc::unbounded_channel();
    let (snapshots_tx, snapshots_rx) = watch::channel(session.snapshot());

    let mut clock = SampleClock::new();
    if let Some(sample) = session.last_fix() {
        clock.observe(sample, Utc::now());
    }

    tokio::spawn(async move {
        run(
            id,
            session,
            clock,
            positions_rx,
            commands_rx,
            snapshots_tx,
            poll_interval,
        )
        .await;
        on_exit();
    });

    SessionHandle {
        positions: positions_tx,
        commands: commands_tx,
        snapshots: snapshots_rx,
    }
}

async fn run(
    id: u64,
    mut session: NavigationSession,
    mut clock: SampleClock,
    mut positions: watch::Receiver<Option<Received>>,
    mut commands: mpsc::UnboundedReceiver<Command>,
    snapshots: watch::Sender<Arc<SessionSnapshot>>,
    poll_interval: Duration,
) {
    let mut ticker = tokio::time::interval(poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut pending: Option<JoinHandle<RerouteOutcome>> = None;

    info!(session = id, "Session worker started");
    loop {
        tokio::select! {
            changed = positions.changed(), if pending.is_none() => {
                if changed.is_err() {
                    break;
                }
                let received = positions.borrow_and_update().clone();
                if let Some((sample, at)) = received {
                    clock.observe(&sample, at);
                    pending = apply_position(id, &mut session, sample);
                }
            }
            finished = async {
                match pending.as_mut() {
                    Some(handle) => handle.await,
                    None => std::future::pending().await,
                }
            } => {
                pending = None;
                match finished {
                    Ok(outcome) => {
                        session.finish_reroute(outcome);
                    }
                    Err(err) => warn!(session = id, "Reroute task failed: {err}"),
                }
            }
            command = commands.recv() => {
                let Some(command) = command else {
                    break;
                };
                apply_command(id, &mut session, command);
            }
            _ = ticker.tick() => {
                session.poll(clock.now());
            }
        }

        publish(id, &mut session, &snapshots);
        if session.state() == NavState::Idle {
            break;
        }
    }
    session.stop();
    info!(session = id, "Session worker finished");
}

fn apply_position(
    id: u64,
    session: &mut NavigationSession,
    sample: PositionSample,
) -> Option<JoinHandle<RerouteOutcome>> {
    match session.begin_position(sample) {
        PositionUpdate::Applied(_) => {
            if session.state() == NavState::DestinationSelected
                && let Err(err) = session.start()
            {
                debug!(session = id, "Navigation not started yet: {err}");
            }
            None
        }
        PositionUpdate::Reroute(job) => {
            debug!(session = id, "Recomputing route to {}", job.destination());
            Some(tokio::task::spawn_blocking(move || job.run()))
        }
    }
}

fn apply_command(id: u64, session: &mut NavigationSession, command: Command) {
    match command {
        Command::Heading(reading) => {
            session.submit_heading(reading);
        }
        Command::LocationError(err) => {
            warn!(session = id, "Position source failed: {err}");
            session.report_location_error(err);
        }
        Command::ReplaceGraph(graph) => {
            if let Err(err) = session.replace_graph(graph) {
                warn!(session = id, "Navigation stopped by graph update: {err}");
            }
        }
        Command::Stop => session.stop(),
    }
}

fn publish(id: u64, session: &mut NavigationSession, snapshots: &watch::Sender<Arc<SessionSnapshot>>) {
    for event in session.take_events() {
        match &event {
            SessionEvent::Progress { .. } => debug!(session = id, ?event),
            _ => info!(session = id, ?event),
        }
    }
    let snapshot = session.snapshot();
    snapshots.send_if_modified(|current| {
        if current.version == snapshot.version {
            false
        } else {
            *current = snapshot;
            true
        }
    });
}
