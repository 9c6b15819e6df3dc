//! Position and heading feeds
//!
//! A [`PositionSource`] yields fixes (or failures) one at a time; a
//! [`HeadingSource`] is asked for the latest compass reading before each
//! fix is applied. Any iterator of `Result<PositionSample, LocationError>`
//! is a position source, and any `FnMut() -> Option<HeadingReading>` is a
//! heading source.

use std::sync::Arc;

use log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    Error,
    session::{NavState, NavigationSession, SessionSnapshot},
    tracking::{HeadingReading, PositionSample},
};

/// Failure reported by a position source
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LocationError {
    #[error("location request timed out")]
    Timeout,
    #[error("location permission denied")]
    PermissionDenied,
    #[error("location unavailable: {reason}")]
    Unavailable { reason: String },
}

impl From<LocationError> for Error {
    fn from(err: LocationError) -> Self {
        match err {
            LocationError::PermissionDenied => Error::LocationPermission,
            LocationError::Timeout | LocationError::Unavailable { .. } => Error::LocationTimeout,
        }
    }
}

pub trait PositionSource {
    /// Next fix, `None` once the source is exhausted
    fn next_sample(&mut self) -> Option<Result<PositionSample, LocationError>>;
}

impl<I> PositionSource for I
where
    I: Iterator<Item = Result<PositionSample, LocationError>>,
{
    fn next_sample(&mut self) -> Option<Result<PositionSample, LocationError>> {
        self.next()
    }
}

pub trait HeadingSource {
    /// Latest reading, `None` when the sensor has nothing new
    fn latest(&mut self) -> Option<HeadingReading>;
}

/// Heading source for devices without an orientation sensor
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHeadingSensor;

impl HeadingSource for NoHeadingSensor {
    fn latest(&mut self) -> Option<HeadingReading> {
        None
    }
}

impl<F> HeadingSource for F
where
    F: FnMut() -> Option<HeadingReading>,
{
    fn latest(&mut self) -> Option<HeadingReading> {
        self()
    }
}

/// Feeds a session from its sources until the position source runs dry or
/// the session goes back to idle
///
/// The session clock follows sample timestamps: after each fix the session
/// is polled at that fix's time, so arrival grace is measured in source
/// time. Returns every distinct snapshot published, oldest first.
pub fn drive<P, H>(
    session: &mut NavigationSession,
    positions: &mut P,
    headings: &mut H,
) -> Vec<Arc<SessionSnapshot>>
where
    P: PositionSource + ?Sized,
    H: HeadingSource + ?Sized,
{
    let mut published = Vec::new();
    let mut record = |snapshot: Arc<SessionSnapshot>| {
        if published
            .last()
            .is_none_or(|last: &Arc<SessionSnapshot>| last.version != snapshot.version)
        {
            published.push(snapshot);
        }
    };

    info!("Driving session while {}", session.state());
    while let Some(next) = positions.next_sample() {
        if let Some(reading) = headings.latest() {
            record(session.submit_heading(reading));
        }
        match next {
            Ok(sample) => {
                let now = sample.timestamp;
                record(session.submit_position(sample));
                record(session.poll(now));
            }
            Err(err) => {
                debug!("Position source failed: {err}");
                record(session.report_location_error(err));
            }
        }
        if session.state() == NavState::Idle {
            break;
        }
    }
    published
}
