//! Re-entrant and multi-threaded use of a shared mediator.

use courier::{BoxError, Context, Mediator, testing::CallLog};
use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    thread,
};

mod common;
use common::{BarEvent, FooCmd, FooEvent, Lookup, init_tracing};

#[test]
fn test_handler_publishes_from_inside_dispatch() {
    init_tracing();
    let log = CallLog::new();
    let mediator = Mediator::new();

    let inner = mediator.clone();
    let outer_log = log.clone();
    mediator
        .subscribe(move |ctx: Context, _e: FooEvent| -> Result<(), BoxError> {
            outer_log.record("foo");
            inner.publish(&ctx, BarEvent)?;
            Ok(())
        })
        .unwrap();
    mediator.subscribe(log.recording::<BarEvent>("bar")).unwrap();

    mediator.publish(&Context::background(), FooEvent).unwrap();
    assert_eq!(log.entries(), vec!["foo", "bar"]);
}

#[test]
fn test_handler_registers_from_inside_dispatch() {
    let mediator = Mediator::new();
    let inner = mediator.clone();
    mediator
        .register(move |_c: FooCmd| -> Result<(), BoxError> {
            inner.register(|cmd: Lookup| cmd.id + 1)?;
            Ok(())
        })
        .unwrap();

    let ctx = Context::background();
    mediator.send(&ctx, FooCmd).unwrap();
    assert_eq!(
        mediator.send(&ctx, Lookup { id: 1 }).unwrap().take::<u32>(),
        Some(2)
    );

    // The nested registration now collides.
    let err = mediator.send(&ctx, FooCmd).unwrap_err();
    assert!(err.is_handler_error());
}

#[test]
fn test_shared_across_threads() {
    let mediator = Mediator::builder()
        .label("threads")
        .register(|cmd: Lookup| cmd.id * 10)
        .build()
        .unwrap();
    let published = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&published);
    mediator
        .subscribe(move |_e: FooEvent| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();

    let handles: Vec<_> = (0..8u32)
        .map(|id| {
            let mediator = mediator.clone();
            thread::spawn(move || {
                let ctx = Context::background();
                for _ in 0..25 {
                    mediator.publish(&ctx, FooEvent).unwrap();
                }
                mediator
                    .send(&ctx, Lookup { id })
                    .unwrap()
                    .take::<u32>()
            })
        })
        .collect();

    let mut replies: Vec<u32> = handles
        .into_iter()
        .map(|handle| handle.join().unwrap().unwrap())
        .collect();
    replies.sort_unstable();

    assert_eq!(replies, (0..8).map(|id| id * 10).collect::<Vec<_>>());
    assert_eq!(published.load(Ordering::SeqCst), 8 * 25);
}

#[test]
fn test_subscribe_while_publishing_from_threads() {
    let mediator = Mediator::new();
    let writer = {
        let mediator = mediator.clone();
        thread::spawn(move || {
            for _ in 0..50 {
                mediator.subscribe(|_e: BarEvent| ()).unwrap();
            }
        })
    };
    let reader = {
        let mediator = mediator.clone();
        thread::spawn(move || {
            for _ in 0..50 {
                mediator.publish(&Context::background(), BarEvent).unwrap();
            }
        })
    };

    writer.join().unwrap();
    reader.join().unwrap();
    assert_eq!(mediator.subscriber_count::<BarEvent>(), 50);
}
