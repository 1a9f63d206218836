mod common;

use common::{gray, snapshot_of, target};
use finch::coordination::{session, ControlFlags};
use std::sync::Arc;
use std::thread;

#[test]
fn reader_never_sees_mixed_evaluations() {
    let goal = target("black", gray(16, 16, 0));
    let (mut publisher, mut subscriber) = session();
    let rounds = 400u64;

    let writer_goal = Arc::clone(&goal);
    let writer = thread::spawn(move || {
        for gen in 0..rounds {
            let value = if gen % 2 == 0 { 10 } else { 200 };
            if !publisher.publish(snapshot_of(&writer_goal, gray(16, 16, value), gen)) {
                break;
            }
        }
        publisher.flags().request_stop();
    });

    let mut observed = 0u64;
    let mut last_gen = None;
    loop {
        let stopping = subscriber.flags().should_stop();
        subscriber.refresh();
        if let Some(snap) = subscriber.latest() {
            let cached = snap.specimen.cached_image().samples()[0];
            let diff = snap.specimen.diff_image().unwrap().samples()[0];
            assert_eq!(cached, diff, "diff from another evaluation");
            assert_eq!(snap.score, cached as f64 / 255.0);
            assert_eq!(cached, if snap.generation % 2 == 0 { 10 } else { 200 });
            assert!(last_gen.map_or(true, |g| snap.generation >= g));
            last_gen = Some(snap.generation);
            observed += 1;
        }
        if stopping {
            break;
        }
    }
    writer.join().unwrap();

    assert!(observed > 0);
    assert_eq!(last_gen, Some(rounds - 1));
}

#[test]
fn refresh_keeps_only_the_newest() {
    let goal = target("t", gray(2, 2, 0));
    let (mut publisher, mut subscriber) = session();
    for gen in 0..5 {
        assert!(publisher.publish(snapshot_of(&goal, gray(2, 2, gen as u8), gen)));
    }
    assert_eq!(publisher.published(), 5);

    assert!(subscriber.refresh());
    assert_eq!(subscriber.latest().unwrap().generation, 4);
    assert!(!subscriber.refresh());
    assert!(subscriber.image_available());
}

#[test]
fn publishing_to_a_closed_display_raises_stop() {
    let goal = target("t", gray(2, 2, 0));
    let (mut publisher, subscriber) = session();
    let flags = Arc::clone(subscriber.flags());
    drop(subscriber);

    assert!(!publisher.publish(snapshot_of(&goal, gray(2, 2, 1), 0)));
    assert!(flags.should_stop());
}

#[test]
fn flags_are_shared_by_both_ends() {
    let (publisher, subscriber) = session();
    assert!(Arc::ptr_eq(publisher.flags(), subscriber.flags()));

    subscriber.flags().request_next_image();
    assert!(publisher.flags().take_next_image_request());

    publisher.flags().request_stop();
    assert!(subscriber.flags().should_stop());
}

#[test]
fn flags_start_cleared() {
    let flags = ControlFlags::default();
    assert!(!flags.should_stop());
    assert!(!flags.is_locked());
    assert!(!flags.next_image_requested());
}
