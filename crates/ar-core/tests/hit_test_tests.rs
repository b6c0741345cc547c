// Host-side tests for the hit-test source lifecycle and reticle updates.

mod common;

use ar_core::*;
use common::*;
use glam::{Mat4, Quat, Vec3};

fn scene_with_reticle() -> (SceneGraph, Reticle) {
    let mut g = SceneGraph::new();
    let root = g.root();
    let reticle = Reticle::create(&mut g, root);
    (g, reticle)
}

#[test]
fn source_is_requested_once_per_session() {
    let mut tracker: HitTestTracker<u32> = HitTestTracker::new();
    let ticket = tracker.poll_request().expect("first frame arms a request");
    for _ in 0..10 {
        assert!(tracker.poll_request().is_none(), "pending request is reused");
    }
    tracker.resolve(ticket, 7).expect("ticket is current");
    for _ in 0..10 {
        assert!(tracker.poll_request().is_none(), "resolved source is reused");
        assert_eq!(tracker.source(), Some(&7));
    }
    assert_eq!(tracker.requests_issued(), 1);
}

#[test]
fn session_end_rearms_and_returns_source() {
    let mut tracker: HitTestTracker<&'static str> = HitTestTracker::new();
    let t = tracker.poll_request().unwrap();
    tracker.resolve(t, "source-a").unwrap();
    assert_eq!(tracker.session_ended(), Some("source-a"));
    assert!(tracker.source().is_none());

    let t2 = tracker.poll_request().expect("re-armed for the next session");
    tracker.resolve(t2, "source-b").unwrap();
    assert_eq!(tracker.source(), Some(&"source-b"));
    assert_eq!(tracker.requests_issued(), 2);
}

#[test]
fn late_resolution_after_session_end_is_discarded() {
    let mut tracker: HitTestTracker<u32> = HitTestTracker::new();
    let stale = tracker.poll_request().unwrap();
    assert_eq!(tracker.session_ended(), None);
    assert_eq!(tracker.resolve(stale, 1), Err(1));
    assert!(tracker.source().is_none());

    let fresh = tracker.poll_request().unwrap();
    assert_ne!(stale, fresh);
    assert_eq!(tracker.resolve(stale, 2), Err(2));
    assert!(tracker.resolve(fresh, 3).is_ok());
    assert_eq!(tracker.source(), Some(&3));
}

#[test]
fn rejected_request_is_not_retried_until_session_ends() {
    let mut tracker: HitTestTracker<u32> = HitTestTracker::new();
    let t = tracker.poll_request().unwrap();
    tracker.reject(t);
    assert!(matches!(tracker.state(), SourceState::Unavailable));
    assert!(tracker.poll_request().is_none());
    tracker.session_ended();
    assert!(tracker.poll_request().is_some());
}

#[test]
fn reticle_hidden_without_source() {
    let (mut g, reticle) = scene_with_reticle();
    let tracker: HitTestTracker<u32> = HitTestTracker::new();
    let ran = tracker.update_reticle(&mut g, &reticle, |_| vec![Mat4::IDENTITY]);
    assert!(!ran);
    assert!(!reticle.is_visible(&g));
}

#[test]
fn reticle_follows_first_hit_and_hides_on_empty() {
    let (mut g, reticle) = scene_with_reticle();
    let mut tracker: HitTestTracker<u32> = HitTestTracker::new();
    let t = tracker.poll_request().unwrap();
    tracker.resolve(t, 0).unwrap();

    let first = Mat4::from_rotation_translation(Quat::from_rotation_y(0.4), Vec3::new(0.5, 0.0, -1.5));
    let second = Mat4::from_translation(Vec3::new(3.0, 0.0, -3.0));
    assert!(tracker.update_reticle(&mut g, &reticle, |_| vec![first, second]));
    assert!(reticle.is_visible(&g));
    let pose = reticle.pose(&g);
    assert!(approx_vec(pose.transform_point3(Vec3::ZERO), Vec3::new(0.5, 0.0, -1.5)));

    // No hysteresis: one empty frame hides it, one hit shows it again.
    tracker.update_reticle(&mut g, &reticle, |_| Vec::new());
    assert!(!reticle.is_visible(&g));
    tracker.update_reticle(&mut g, &reticle, |_| vec![second]);
    assert!(reticle.is_visible(&g));
    assert!(approx_vec(
        reticle.pose(&g).transform_point3(Vec3::ZERO),
        Vec3::new(3.0, 0.0, -3.0)
    ));
}
