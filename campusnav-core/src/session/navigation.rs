use std::{collections::VecDeque, sync::Arc};

use chrono::{DateTime, Utc};
use log::{debug, info, trace, warn};

use super::{
    NavState, PositionUpdate, RerouteJob, RerouteOutcome, SessionError, SessionEvent,
    SessionSnapshot,
};
use crate::{
    Error,
    config::NavigationConfig,
    geodesy::relative_bearing,
    model::CampusGraph,
    routing::{Route, route_with},
    source::LocationError,
    tracking::{
        GpsQuality, HeadingReading, HeadingTracker, Instruction, PositionSample, Progress,
        is_debounced, measure, needs_reroute,
    },
};

/// Events kept until drained; older ones are dropped first
const MAX_PENDING_EVENTS: usize = 256;

/// Navigation state for one visitor
///
/// Every call runs to completion and publishes a new snapshot. Route
/// recomputation can be split off with [`begin_position`] and
/// [`finish_reroute`] so it runs outside whatever lock guards the session.
///
/// [`begin_position`]: NavigationSession::begin_position
/// [`finish_reroute`]: NavigationSession::finish_reroute
#[derive(Debug)]
pub struct NavigationSession {
    graph: Arc<CampusGraph>,
    config: NavigationConfig,
    state: NavState,
    destination: Option<String>,
    route: Option<Arc<Route>>,
    progress: Option<Progress>,
    last_sample: Option<PositionSample>,
    heading: HeadingTracker,
    error: Option<SessionError>,
    arrived_at: Option<DateTime<Utc>>,
    final_approach_announced: bool,
    /// Start of the wait for a first fix, set by `poll`
    waiting_since: Option<DateTime<Utc>>,
    timeout_reported: bool,
    /// Bumped whenever in-flight reroutes must no longer apply
    epoch: u64,
    snapshot: Arc<SessionSnapshot>,
    events: VecDeque<SessionEvent>,
}

impl NavigationSession {
    pub fn new(graph: Arc<CampusGraph>, config: NavigationConfig) -> Self {
        Self {
            graph,
            config,
            state: NavState::Idle,
            destination: None,
            route: None,
            progress: None,
            last_sample: None,
            heading: HeadingTracker::default(),
            error: None,
            arrived_at: None,
            final_approach_announced: false,
            waiting_since: None,
            timeout_reported: false,
            epoch: 0,
            snapshot: Arc::new(SessionSnapshot::idle()),
            events: VecDeque::new(),
        }
    }

    pub fn state(&self) -> NavState {
        self.state
    }

    pub fn graph(&self) -> &Arc<CampusGraph> {
        &self.graph
    }

    pub fn config(&self) -> &NavigationConfig {
        &self.config
    }

    pub fn route(&self) -> Option<&Arc<Route>> {
        self.route.as_ref()
    }

    /// Most recent accepted sample
    pub fn last_fix(&self) -> Option<&PositionSample> {
        self.last_sample.as_ref()
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> Arc<SessionSnapshot> {
        Arc::clone(&self.snapshot)
    }

    /// Drains pending events, oldest first
    pub fn take_events(&mut self) -> Vec<SessionEvent> {
        self.events.drain(..).collect()
    }

    /// Picks the node to navigate to
    ///
    /// # Errors
    ///
    /// `Error::InvalidDestination` when the node is not in the graph,
    /// `Error::InvalidTransition` while navigating or arrived. The session
    /// state is unchanged on error.
    pub fn select_destination(&mut self, destination: &str) -> Result<(), Error> {
        if !matches!(self.state, NavState::Idle | NavState::DestinationSelected) {
            return Err(Error::InvalidTransition {
                action: "select a destination",
                state: self.state,
            });
        }
        if !self.graph.contains(destination) {
            let err = Error::InvalidDestination(destination.to_string());
            self.fail(&err);
            return Err(err);
        }

        self.epoch += 1;
        self.state = NavState::DestinationSelected;
        self.destination = Some(destination.to_string());
        self.error = None;
        self.push_event(SessionEvent::DestinationSelected {
            destination: destination.to_string(),
        });
        self.publish();
        Ok(())
    }

    /// Computes the initial route from the last fix and starts navigating
    ///
    /// # Errors
    ///
    /// `Error::NoPositionFix` without any accepted sample, and any routing
    /// error. The session stays in `DestinationSelected` on error.
    pub fn start(&mut self) -> Result<(), Error> {
        if self.state != NavState::DestinationSelected {
            return Err(Error::InvalidTransition {
                action: "start navigation",
                state: self.state,
            });
        }
        let (Some(destination), Some(sample)) = (self.destination.clone(), self.last_sample.clone())
        else {
            let err = Error::NoPositionFix;
            self.fail(&err);
            return Err(err);
        };

        let route = match route_with(
            &self.graph,
            &sample.position,
            &destination,
            &self.config.routing,
        ) {
            Ok(route) => Arc::new(route),
            Err(err) => {
                self.fail(&err);
                return Err(err);
            }
        };
        let (anchor, anchor_distance) = self.graph.anchor(&sample.position)?;

        info!(
            "Navigation to {destination} started: {} legs, {:.0} m",
            route.legs.len(),
            route.total_distance
        );
        self.epoch += 1;
        self.state = NavState::Navigating;
        self.error = None;
        self.route = Some(Arc::clone(&route));
        self.push_event(SessionEvent::NavigationStarted {
            route: Arc::clone(&route),
        });

        let heading = self.heading.current().map(|(h, _)| h);
        let progress = measure(
            &self.graph,
            &route,
            anchor,
            anchor_distance,
            &sample,
            heading,
            &self.config,
        );
        self.apply_progress(progress, sample.timestamp);
        self.publish();
        Ok(())
    }

    /// Applies a sample, recomputing the route inline when needed
    ///
    /// Errors that a later sample may clear (no anchor on this floor, no
    /// route from here) are reported in the snapshot.
    pub fn submit_position(&mut self, sample: PositionSample) -> Arc<SessionSnapshot> {
        match self.begin_position(sample) {
            PositionUpdate::Applied(snapshot) => snapshot,
            PositionUpdate::Reroute(job) => self.finish_reroute(job.run()),
        }
    }

    /// First half of [`submit_position`](Self::submit_position)
    ///
    /// Returns a job instead of blocking when the route has to be
    /// recomputed.
    pub fn begin_position(&mut self, sample: PositionSample) -> PositionUpdate {
        let last_accepted = self.last_sample.as_ref().map(|s| s.timestamp);
        if is_debounced(last_accepted, &sample, &self.config) {
            trace!("Sample at {} debounced", sample.timestamp);
            return PositionUpdate::Applied(self.snapshot());
        }

        let previous = self.last_sample.take();
        let heading = self.heading.resolve(&sample, previous.as_ref(), &self.config);
        self.last_sample = Some(sample.clone());
        self.timeout_reported = false;
        if self.error.as_ref().is_some_and(|err| {
            matches!(
                err.kind.as_str(),
                "LocationTimeoutError" | "LocationPermissionError" | "NoPositionFixError"
            )
        }) {
            self.error = None;
        }

        if self.state != NavState::Navigating {
            self.publish();
            return PositionUpdate::Applied(self.snapshot());
        }
        let Some(route) = self.route.clone() else {
            self.publish();
            return PositionUpdate::Applied(self.snapshot());
        };

        let (anchor, anchor_distance) = match self.graph.anchor(&sample.position) {
            Ok(found) => found,
            Err(err) => {
                self.fail(&err);
                return PositionUpdate::Applied(self.snapshot());
            }
        };

        if needs_reroute(&self.graph, &route, anchor, self.config.recompute) {
            debug!("Rerouting from anchor {}", anchor.index());
            return PositionUpdate::Reroute(RerouteJob {
                epoch: self.epoch,
                graph: Arc::clone(&self.graph),
                anchor,
                anchor_distance,
                destination: route.destination().to_string(),
                options: self.config.routing.clone(),
                sample,
                heading,
            });
        }

        let progress = measure(
            &self.graph,
            &route,
            anchor,
            anchor_distance,
            &sample,
            heading,
            &self.config,
        );
        self.apply_progress(progress, sample.timestamp);
        self.publish();
        PositionUpdate::Applied(self.snapshot())
    }

    /// Second half of [`submit_position`](Self::submit_position)
    ///
    /// Outcomes started before a `stop`, a new destination or a graph swap
    /// are discarded.
    pub fn finish_reroute(&mut self, outcome: RerouteOutcome) -> Arc<SessionSnapshot> {
        if outcome.epoch != self.epoch
            || outcome.generation != self.graph.generation()
            || self.state != NavState::Navigating
        {
            warn!(
                "Discarding stale reroute (epoch {} vs {}, state {})",
                outcome.epoch, self.epoch, self.state
            );
            return self.snapshot();
        }

        let route = match outcome.result {
            Ok(route) => Arc::new(route),
            Err(err) => {
                self.fail(&err);
                return self.snapshot();
            }
        };
        self.route = Some(Arc::clone(&route));
        self.push_event(SessionEvent::RouteChanged {
            route: Arc::clone(&route),
        });

        let progress = measure(
            &self.graph,
            &route,
            outcome.anchor,
            outcome.anchor_distance,
            &outcome.sample,
            outcome.heading,
            &self.config,
        );
        self.apply_progress(progress, outcome.sample.timestamp);
        self.publish();
        self.snapshot()
    }

    /// Records an orientation sensor reading
    pub fn submit_heading(&mut self, reading: HeadingReading) -> Arc<SessionSnapshot> {
        if !reading.degrees.is_finite() {
            return self.snapshot();
        }
        self.heading.update_sensor(reading);
        let heading = reading.degrees.rem_euclid(360.0);

        if let Some(progress) = self.progress.as_mut() {
            progress.heading = Some(heading);
            progress.relative_bearing = progress.bearing.map(|b| relative_bearing(heading, b));
            self.publish();
        }
        self.snapshot()
    }

    /// Records a failure reported by the position source
    ///
    /// The state is unchanged; the error shows up in the snapshot until the
    /// next accepted sample.
    pub fn report_location_error(&mut self, error: LocationError) -> Arc<SessionSnapshot> {
        let err = Error::from(error);
        self.fail(&err);
        self.snapshot()
    }

    /// Cancels navigation
    ///
    /// Idempotent: stopping an idle session does nothing and emits nothing.
    pub fn stop(&mut self) {
        if self.state == NavState::Idle {
            return;
        }
        info!("Navigation stopped while {}", self.state);
        self.teardown();
        self.push_event(SessionEvent::Stopped);
        self.publish();
    }

    /// Acknowledges arrival; stops navigation in any other state
    pub fn reset(&mut self) {
        if self.state == NavState::Arrived {
            self.finish();
        } else {
            self.stop();
        }
    }

    /// Advances timers: the arrival grace period and the location timeout
    pub fn poll(&mut self, now: DateTime<Utc>) -> Arc<SessionSnapshot> {
        match self.state {
            NavState::Arrived => {
                let grace = millis(self.config.arrival_grace_ms);
                if self
                    .arrived_at
                    .is_some_and(|at| (now - at).num_milliseconds() >= grace)
                {
                    self.finish();
                }
            }
            NavState::DestinationSelected | NavState::Navigating => {
                let since = match &self.last_sample {
                    Some(sample) => sample.timestamp,
                    None => *self.waiting_since.get_or_insert(now),
                };
                let timeout = millis(self.config.location_timeout_ms);
                if !self.timeout_reported && (now - since).num_milliseconds() >= timeout {
                    warn!("No position fix for {timeout} ms");
                    self.timeout_reported = true;
                    self.fail(&Error::LocationTimeout);
                    self.push_event(SessionEvent::LocationTimeout);
                    self.publish();
                }
            }
            NavState::Idle => {}
        }
        self.snapshot()
    }

    /// Swaps in a rebuilt graph
    ///
    /// The active route is recomputed on the next sample.
    ///
    /// # Errors
    ///
    /// `Error::InvalidDestination` when the destination no longer exists;
    /// navigation is stopped in that case.
    pub fn replace_graph(&mut self, graph: Arc<CampusGraph>) -> Result<(), Error> {
        info!(
            "Session graph replaced: generation {} -> {}",
            self.graph.generation(),
            graph.generation()
        );
        self.graph = graph;
        self.epoch += 1;
        self.push_event(SessionEvent::GraphReplaced {
            generation: self.graph.generation(),
        });

        if let Some(destination) = self.destination.clone()
            && !self.graph.contains(&destination)
        {
            self.stop();
            let err = Error::InvalidDestination(destination);
            self.fail(&err);
            return Err(err);
        }
        self.publish();
        Ok(())
    }

    fn apply_progress(&mut self, progress: Progress, at: DateTime<Utc>) {
        self.error = None;
        if progress.arrived {
            let destination = self.destination.clone().unwrap_or_default();
            info!("Arrived at {destination}");
            self.state = NavState::Arrived;
            self.arrived_at = Some(at);
            self.push_event(SessionEvent::Arrived { destination });
        } else {
            let approaching = matches!(progress.instruction, Instruction::FinalApproach { .. });
            if approaching && !self.final_approach_announced {
                self.final_approach_announced = true;
                self.push_event(SessionEvent::FinalApproach {
                    distance_to_destination: progress.distance_to_destination,
                });
            } else if !approaching {
                // Announce again if the visitor walks back in
                self.final_approach_announced = false;
            }
            self.push_event(SessionEvent::Progress {
                leg_index: progress.leg_index,
                distance_to_destination: progress.distance_to_destination,
            });
        }
        self.progress = Some(progress);
    }

    fn finish(&mut self) {
        self.teardown();
        self.push_event(SessionEvent::Finished);
        self.publish();
    }

    fn teardown(&mut self) {
        self.epoch += 1;
        self.state = NavState::Idle;
        self.destination = None;
        self.route = None;
        self.progress = None;
        self.error = None;
        self.arrived_at = None;
        self.final_approach_announced = false;
        self.waiting_since = None;
        self.timeout_reported = false;
    }

    fn fail(&mut self, err: &Error) {
        debug!("Session error while {}: {err}", self.state);
        self.error = Some(SessionError::from(err));
        self.publish();
    }

    fn push_event(&mut self, event: SessionEvent) {
        if self.events.len() == MAX_PENDING_EVENTS {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    fn publish(&mut self) {
        let progress = self.progress.as_ref();
        let instruction = progress.map(|p| p.instruction);
        let gps_quality = self
            .last_sample
            .as_ref()
            .map(|s| GpsQuality::from_accuracy(s.accuracy_m));

        self.snapshot = Arc::new(SessionSnapshot {
            version: self.snapshot.version + 1,
            state: self.state,
            destination: self.destination.clone(),
            route: self.route.clone(),
            leg_index: progress.map_or(0, |p| p.leg_index),
            anchor: progress.map(|p| p.anchor.clone()),
            distance_to_waypoint: progress.and_then(|p| p.distance_to_waypoint),
            distance_to_destination: progress.map(|p| p.distance_to_destination),
            distance_remaining: progress.map(|p| p.distance_remaining),
            bearing: progress.and_then(|p| p.bearing),
            cardinal: progress.and_then(|p| p.cardinal),
            relative_bearing: progress.and_then(|p| p.relative_bearing),
            heading: progress
                .and_then(|p| p.heading)
                .or_else(|| self.heading.current().map(|(h, _)| h)),
            heading_source: self.heading.current().map(|(_, origin)| origin),
            instruction,
            instruction_text: instruction.map(|i| i.to_string()),
            gps_quality,
            arrived: self.state == NavState::Arrived,
            error: self.error.clone(),
        });
    }
}

fn millis(ms: u64) -> i64 {
    i64::try_from(ms).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        loading::{EdgeRecord, NodeRecord, build_graph},
        model::{Category, Position},
        session::start_session,
        tracking::HeadingOrigin,
    };

    fn at(ms: i64) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(ms).unwrap()
    }

    fn abc() -> Arc<CampusGraph> {
        let nodes = [
            NodeRecord::outdoor("A", "Gate", 0.0, 0.0, Category::Landmark),
            NodeRecord::outdoor("B", "Fountain", 0.0, 0.001, Category::Landmark),
            NodeRecord::outdoor("C", "Library", 0.0, 0.002, Category::Library),
        ];
        let edges = [
            EdgeRecord::new("A", "B", 111.0),
            EdgeRecord::new("B", "C", 111.0),
        ];
        Arc::new(build_graph(&nodes, &edges).unwrap())
    }

    fn fix(lng: f64, ms: i64) -> PositionSample {
        PositionSample::new(Position::outdoor(0.0, lng), 5.0, at(ms))
    }

    fn navigating_from(lng: f64) -> NavigationSession {
        let mut session = NavigationSession::new(abc(), NavigationConfig::default());
        session.select_destination("C").unwrap();
        session.submit_position(fix(lng, 0));
        session.start().unwrap();
        session
    }

    #[test]
    fn walk_to_arrival_and_reset() {
        let mut session = navigating_from(0.0);
        let snapshot = session.snapshot();
        assert_eq!(snapshot.state, NavState::Navigating);
        assert_eq!(snapshot.route_node_ids(), ["A", "B", "C"]);
        assert_eq!(snapshot.leg_index, 0);
        assert_eq!(snapshot.instruction.map(|i| i.category()), Some("head"));
        let events = session.take_events();
        assert!(matches!(events[0], SessionEvent::DestinationSelected { .. }));
        assert!(matches!(events[1], SessionEvent::NavigationStarted { .. }));

        let snapshot = session.submit_position(fix(0.00095, 2000));
        assert_eq!(snapshot.leg_index, 1);
        assert_eq!(snapshot.anchor.as_deref(), Some("B"));

        let snapshot = session.submit_position(fix(0.00193, 4000));
        assert_eq!(snapshot.state, NavState::Arrived);
        assert!(snapshot.arrived);
        assert_eq!(snapshot.instruction_text.as_deref(), Some("You have arrived"));
        assert!(
            session
                .take_events()
                .iter()
                .any(|e| matches!(e, SessionEvent::Arrived { destination } if destination == "C"))
        );

        // Grace period still running
        assert_eq!(session.poll(at(6000)).state, NavState::Arrived);
        let snapshot = session.poll(at(7000));
        assert_eq!(snapshot.state, NavState::Idle);
        assert!(snapshot.route.is_none());
        assert_eq!(session.take_events(), vec![SessionEvent::Finished]);
    }

    #[test]
    fn unknown_destination_keeps_session_idle() {
        let mut session = NavigationSession::new(abc(), NavigationConfig::default());
        let err = session.select_destination("Z").unwrap_err();
        assert!(matches!(err, Error::InvalidDestination(ref id) if id == "Z"));
        assert_eq!(session.state(), NavState::Idle);
        assert_eq!(session.snapshot().error_kind(), Some("InvalidDestinationError"));
        assert!(session.take_events().is_empty());
    }

    #[test]
    fn start_needs_a_fix() {
        let mut session = NavigationSession::new(abc(), NavigationConfig::default());
        session.select_destination("C").unwrap();
        assert!(matches!(session.start(), Err(Error::NoPositionFix)));
        assert_eq!(session.state(), NavState::DestinationSelected);
        assert_eq!(session.snapshot().error_kind(), Some("NoPositionFixError"));

        // A fix clears the error and lets navigation start
        session.submit_position(fix(0.0, 0));
        assert_eq!(session.snapshot().error, None);
        session.start().unwrap();
        assert_eq!(session.state(), NavState::Navigating);
    }

    #[test]
    fn destination_cannot_change_while_navigating() {
        let mut session = navigating_from(0.0);
        assert!(matches!(
            session.select_destination("B"),
            Err(Error::InvalidTransition {
                state: NavState::Navigating,
                ..
            })
        ));
    }

    #[test]
    fn stop_is_idempotent() {
        let mut session = navigating_from(0.0);
        session.take_events();

        session.stop();
        let snapshot = session.snapshot();
        assert_eq!(snapshot.state, NavState::Idle);
        assert!(snapshot.route.is_none());
        assert_eq!(snapshot.destination, None);
        assert_eq!(session.take_events(), vec![SessionEvent::Stopped]);

        let version = session.snapshot().version;
        session.stop();
        assert!(session.take_events().is_empty());
        assert_eq!(session.snapshot().version, version);
    }

    #[test]
    fn leaving_the_route_recomputes_it() {
        let mut session = navigating_from(0.001);
        assert_eq!(session.snapshot().route_node_ids(), ["B", "C"]);
        session.take_events();

        let PositionUpdate::Reroute(job) = session.begin_position(fix(0.0, 2000)) else {
            panic!("expected a reroute");
        };
        assert_eq!(job.destination(), "C");
        let snapshot = session.finish_reroute(job.run());
        assert_eq!(snapshot.route_node_ids(), ["A", "B", "C"]);
        assert!(
            session
                .take_events()
                .iter()
                .any(|e| matches!(e, SessionEvent::RouteChanged { .. }))
        );
    }

    #[test]
    fn reroute_after_stop_is_discarded() {
        let mut session = navigating_from(0.001);
        let PositionUpdate::Reroute(job) = session.begin_position(fix(0.0, 2000)) else {
            panic!("expected a reroute");
        };
        session.stop();
        let snapshot = session.finish_reroute(job.run());
        assert_eq!(snapshot.state, NavState::Idle);
        assert!(snapshot.route.is_none());
    }

    #[test]
    fn final_approach_is_announced_on_every_entry() {
        let mut session = navigating_from(0.0);
        let approaches = |events: Vec<SessionEvent>| {
            events
                .iter()
                .filter(|e| matches!(e, SessionEvent::FinalApproach { .. }))
                .count()
        };

        // 44 m out, back to 89 m, then 33 m
        session.submit_position(fix(0.0016, 2000));
        session.submit_position(fix(0.0016, 4000));
        assert_eq!(approaches(session.take_events()), 1);

        session.submit_position(fix(0.0012, 6000));
        assert_eq!(approaches(session.take_events()), 0);

        let snapshot = session.submit_position(fix(0.0017, 8000));
        assert_eq!(snapshot.state, NavState::Navigating);
        assert_eq!(approaches(session.take_events()), 1);
    }

    #[test]
    fn samples_inside_the_update_interval_are_ignored() {
        let mut session = navigating_from(0.0);
        let version = session.snapshot().version;
        let snapshot = session.submit_position(fix(0.00095, 500));
        assert_eq!(snapshot.version, version);
        assert_eq!(snapshot.leg_index, 0);
    }

    #[test]
    fn location_timeout_is_reported_once() {
        let mut session = NavigationSession::new(abc(), NavigationConfig::default());
        session.select_destination("C").unwrap();
        session.take_events();

        session.poll(at(0));
        assert_eq!(session.poll(at(14_999)).error, None);
        let snapshot = session.poll(at(15_000));
        assert_eq!(snapshot.error_kind(), Some("LocationTimeoutError"));
        assert_eq!(snapshot.state, NavState::DestinationSelected);
        session.poll(at(20_000));
        assert_eq!(session.take_events(), vec![SessionEvent::LocationTimeout]);

        assert_eq!(session.submit_position(fix(0.0, 21_000)).error, None);
    }

    #[test]
    fn permission_error_keeps_state() {
        let mut session = navigating_from(0.0);
        let snapshot = session.report_location_error(LocationError::PermissionDenied);
        assert_eq!(snapshot.state, NavState::Navigating);
        assert_eq!(snapshot.error_kind(), Some("LocationPermissionError"));
    }

    #[test]
    fn heading_updates_relative_bearing() {
        let mut session = navigating_from(0.0);
        assert_eq!(session.snapshot().heading_source, None);
        let snapshot = session.submit_heading(HeadingReading::new(45.0, at(100)));
        assert_eq!(snapshot.heading, Some(45.0));
        assert_eq!(snapshot.heading_source, Some(HeadingOrigin::Sensor));
        let relative = snapshot.relative_bearing.unwrap();
        assert!((relative - 45.0).abs() < 1e-6, "got {relative}");

        // Sensor reading is stale by now; walking east gives the heading
        let snapshot = session.submit_position(fix(0.0005, 5000));
        assert_eq!(snapshot.heading_source, Some(HeadingOrigin::Movement));
        assert!((snapshot.heading.unwrap() - 90.0).abs() < 1e-6);
    }

    #[test]
    fn graph_without_destination_stops_navigation() {
        let mut session = navigating_from(0.0);
        let nodes = [
            NodeRecord::outdoor("A", "Gate", 0.0, 0.0, Category::Landmark),
            NodeRecord::outdoor("B", "Fountain", 0.0, 0.001, Category::Landmark),
        ];
        let edges = [EdgeRecord::new("A", "B", 111.0)];
        let smaller = Arc::new(build_graph(&nodes, &edges).unwrap());

        assert!(matches!(
            session.replace_graph(smaller),
            Err(Error::InvalidDestination(_))
        ));
        assert_eq!(session.state(), NavState::Idle);
        assert_eq!(session.snapshot().error_kind(), Some("InvalidDestinationError"));
    }

    #[test]
    fn start_session_runs_the_whole_setup() {
        let session =
            start_session(abc(), "C", fix(0.0, 0), NavigationConfig::default()).unwrap();
        assert_eq!(session.state(), NavState::Navigating);
        assert!(matches!(
            start_session(abc(), "nowhere", fix(0.0, 0), NavigationConfig::default()),
            Err(Error::InvalidDestination(_))
        ));
    }
}
