//! Dispatch ordering, failure isolation, and halt semantics through the
//! public client API.

use std::time::Duration;

use beacon::testing::{FailingExtension, HaltingExtension, RecordingExtension, SlowExtension};
use beacon::{Analytics, Outcome, Settings};

mod common;
use common::SlowTrackExtension;

#[tokio::test]
async fn hooks_run_in_registration_order() {
    let a = RecordingExtension::new("a");
    let b = RecordingExtension::new("b");
    let c = RecordingExtension::new("c");

    let analytics = Analytics::load(
        Settings::new("abc")
            .skip_primary_destination()
            .with_extension(a.clone())
            .with_extension(b.clone())
            .with_extension(c.clone()),
    )
    .await;

    let ctx = analytics.track("ordered", None, None).await;

    let names: Vec<_> = ctx.log().iter().map(|e| e.extension.as_str()).collect();
    assert_eq!(
        names,
        ["validation", "a", "b", "c"],
        "hooks should run in registration order"
    );
    assert!(
        ctx.log().iter().all(|e| e.outcome == Outcome::Success),
        "every hook should have succeeded"
    );
    // Each extension saw this context exactly once.
    assert_eq!(a.seen(), vec![(ctx.id(), ctx.event().kind())]);
    assert_eq!(b.count(), 1);
    assert_eq!(c.count(), 1);
}

#[tokio::test]
async fn hook_failure_is_isolated() {
    let after = RecordingExtension::new("after");

    let analytics = Analytics::load(
        Settings::new("abc")
            .skip_primary_destination()
            .with_extension(FailingExtension::hook_failure("flaky"))
            .with_extension(after.clone()),
    )
    .await;

    let ctx = analytics.track("isolated", None, None).await;

    let outcomes: Vec<_> = ctx
        .log()
        .iter()
        .map(|e| (e.extension.as_str(), &e.outcome))
        .collect();
    assert_eq!(outcomes.len(), 3);
    assert_eq!(outcomes[0].0, "validation");
    assert_eq!(outcomes[1].0, "flaky");
    assert!(matches!(outcomes[1].1, Outcome::Failure(_)));
    assert_eq!(
        outcomes[2],
        ("after", &Outcome::Success),
        "extensions after a failing one should still run"
    );
    assert_eq!(after.count(), 1);
    assert!(!ctx.succeeded());
}

#[tokio::test]
async fn halt_blocks_later_extensions() {
    let after = RecordingExtension::new("after");

    let analytics = Analytics::load(
        Settings::new("abc")
            .skip_primary_destination()
            .with_extension(HaltingExtension::new("gate"))
            .with_extension(after.clone()),
    )
    .await;

    let ctx = analytics.track("halted", None, None).await;

    let names: Vec<_> = ctx.log().iter().map(|e| e.extension.as_str()).collect();
    assert_eq!(names, ["validation", "gate"]);
    assert_eq!(ctx.log()[1].outcome, Outcome::Halted);
    assert_eq!(after.count(), 0, "halt should stop delivery");
}

#[tokio::test]
async fn malformed_event_never_reaches_extensions() {
    let downstream = RecordingExtension::new("downstream");

    let analytics = Analytics::load(
        Settings::new("abc")
            .skip_primary_destination()
            .with_extension(downstream.clone()),
    )
    .await;

    // Empty track name is structurally malformed.
    let ctx = analytics.track("", None, None).await;

    assert_eq!(ctx.log().len(), 1);
    assert_eq!(ctx.log()[0].extension, "validation");
    assert_eq!(ctx.log()[0].outcome, Outcome::Halted);
    assert_eq!(downstream.count(), 0);
}

#[tokio::test]
async fn dispatches_are_independent() {
    let recorder = RecordingExtension::new("recorder");

    let analytics = Analytics::load(
        Settings::new("abc")
            .skip_primary_destination()
            .with_extension(recorder.clone()),
    )
    .await;

    let (first, second) = tokio::join!(
        analytics.track("first", None, None),
        analytics.page("second", None, None),
    );

    assert_ne!(first.id(), second.id());
    assert_eq!(first.log().len(), 2);
    assert_eq!(second.log().len(), 2);
    assert_eq!(recorder.count(), 2);
}

#[tokio::test(start_paused = true)]
async fn hung_hook_stalls_only_its_own_context() {
    let analytics = Analytics::load(
        Settings::new("abc")
            .skip_primary_destination()
            .with_extension(SlowTrackExtension {
                delay: Duration::from_secs(3600),
            }),
    )
    .await;

    // The track dispatch is stuck inside its hook; a page dispatch through
    // the same queue completes regardless.
    tokio::select! {
        _ = analytics.track("stuck", None, None) => {
            panic!("the stalled dispatch should not settle first")
        }
        ctx = analytics.page("quick", None, None) => {
            assert_eq!(ctx.event().name(), Some("quick"));
            assert!(ctx.succeeded());
        }
    }
}

#[tokio::test(start_paused = true)]
async fn dispatch_waits_for_slow_hooks() {
    // There is no cancellation inside dispatch; the callback timeout bounds
    // only the callback.
    let analytics = Analytics::load(
        Settings::new("abc")
            .skip_primary_destination()
            .with_timeout(Duration::from_millis(50))
            .with_extension(SlowExtension::new("sluggish", Duration::from_millis(100))),
    )
    .await;

    let started = tokio::time::Instant::now();
    let ctx = analytics.track("patient", None, None).await;

    assert_eq!(started.elapsed(), Duration::from_millis(100));
    assert!(ctx.succeeded());
    assert_eq!(ctx.log().len(), 2);
}
