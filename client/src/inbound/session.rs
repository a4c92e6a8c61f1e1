//! Session event loop.
//!
//! Events are consumed on one task in arrival order, so each event's
//! synchronous part (generation bump, optimistic clear) runs before the next
//! event is looked at. Backend queries started by earlier events keep running
//! concurrently and may complete in any order.

use futures_util::StreamExt;
use futures_util::stream::FuturesUnordered;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info};

use crate::domain::{EventOutcome, RefreshController, ViewerEvent};

/// Outcomes collected over one session, in completion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSummary {
    /// Every outcome, in the order the work settled.
    pub outcomes: Vec<EventOutcome>,
}

impl SessionSummary {
    fn record(&mut self, outcome: EventOutcome) {
        debug!(?outcome, "event settled");
        self.outcomes.push(outcome);
    }

    /// Refreshes whose markers were rendered.
    #[must_use]
    pub fn refreshed(&self) -> usize {
        self.count(|outcome| matches!(outcome, EventOutcome::Refreshed { .. }))
    }

    /// Refreshes that were current when they failed.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(|outcome| matches!(outcome, EventOutcome::RefreshFailed { .. }))
    }

    /// Refreshes discarded because a newer focus arrived first.
    #[must_use]
    pub fn superseded(&self) -> usize {
        self.count(|outcome| matches!(outcome, EventOutcome::Superseded { .. }))
    }

    fn count(&self, predicate: impl Fn(&EventOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|outcome| predicate(outcome)).count()
    }
}

/// Drive `controller` with `events` until the channel closes and every
/// in-flight refresh has settled.
pub async fn run_session(
    controller: &RefreshController,
    mut events: UnboundedReceiver<ViewerEvent>,
) -> SessionSummary {
    let mut summary = SessionSummary::default();
    let mut in_flight = FuturesUnordered::new();
    let mut accepting = true;

    loop {
        tokio::select! {
            biased;
            event = events.recv(), if accepting => match event {
                Some(event) => {
                    debug!(?event, in_flight = in_flight.len(), "event received");
                    in_flight.push(controller.handle_event(event));
                }
                None => {
                    debug!(in_flight = in_flight.len(), "event channel closed; draining");
                    accepting = false;
                }
            },
            Some(outcome) = in_flight.next(), if !in_flight.is_empty() => summary.record(outcome),
            else => break,
        }
    }

    info!(
        refreshed = summary.refreshed(),
        failed = summary.failed(),
        superseded = summary.superseded(),
        "session finished"
    );
    summary
}

#[cfg(test)]
mod tests {
    //! Ordering behaviour of the event loop.

    use rstest::{fixture, rstest};
    use tokio::sync::mpsc;

    use super::*;
    use crate::domain::ports::MapEvent;
    use crate::domain::{RefreshControllerConfig, RefreshPhase};
    use crate::test_support::{TestViewer, coordinate, sample_trucks};

    #[fixture]
    fn viewer() -> TestViewer {
        TestViewer::located_at(coordinate(37.7758, -122.4205))
    }

    #[rstest]
    #[tokio::test]
    async fn slow_older_refresh_does_not_overwrite_newer_markers(viewer: TestViewer) {
        let first = coordinate(10.0, 10.0);
        let second = coordinate(20.0, 20.0);
        viewer.api.respond(first, Ok(sample_trucks(first, 3)));
        viewer.api.respond(second, Ok(sample_trucks(second, 7)));
        let release_first = viewer.api.hold(first);
        let controller = viewer.controller(RefreshControllerConfig::default());
        controller.handle_event(MapEvent::Ready.into()).await;
        let (tx, rx) = mpsc::unbounded_channel();

        tx.send(ViewerEvent::Map(MapEvent::Click(first))).expect("send click");
        tx.send(ViewerEvent::Map(MapEvent::Click(second))).expect("send click");
        drop(tx);
        let session = run_session(&controller, rx);
        let (summary, ()) = tokio::join!(session, async move {
            tokio::task::yield_now().await;
            let _ = release_first.send(());
        });

        assert_eq!(summary.superseded(), 1);
        assert_eq!(summary.refreshed(), 1);
        assert_eq!(viewer.map.markers().len(), 7);
        assert_eq!(controller.snapshot().focus, Some(second));
        assert_eq!(controller.snapshot().phase, RefreshPhase::Ready);
    }

    #[rstest]
    #[tokio::test]
    async fn closed_channel_without_events_finishes_immediately(viewer: TestViewer) {
        let controller = viewer.controller(RefreshControllerConfig::default());
        let (tx, rx) = mpsc::unbounded_channel::<ViewerEvent>();
        drop(tx);

        let summary = run_session(&controller, rx).await;

        assert!(summary.outcomes.is_empty());
    }
}
