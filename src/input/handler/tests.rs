use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Semaphore;

use super::*;
use crate::input::{
    EventRecorder, EventType, InteractionBase, InteractionError, ManualClock, MouseButton,
    PointerKeyType, WindowPosition,
};

fn settings() -> InputSettings {
    InputSettings {
        click_duration: Duration::from_millis(400),
        drag_duration: Duration::from_millis(100),
        click_distance: 3.0,
    }
}

struct Fixture {
    handler: EventHandler,
    clock: Arc<ManualClock>,
    recorder: Arc<EventRecorder>,
}

fn fixture() -> Fixture {
    let clock = Arc::new(ManualClock::new());
    let handler = EventHandler::with_clock(settings(), &Handle::current(), clock.clone());
    let recorder = Arc::new(EventRecorder::new());
    let _ = handler.add_persistent_interaction(recorder.clone(), None);
    Fixture {
        handler,
        clock,
        recorder,
    }
}

fn left(x: f64, y: f64) -> PointerInput {
    PointerInput::new(MouseButton::Left, x, y)
}

fn click(handler: &EventHandler, x: f64, y: f64) {
    handler.pointer_down(left(x, y));
    handler.pointer_up(left(x, y));
}

/// Does nothing; stands in for a tool in registration tests.
struct Tool {
    base: InteractionBase,
    modifiers: Mutex<Vec<ModificationKeyType>>,
}

impl Tool {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            base: InteractionBase::new(EventType::ALL),
            modifiers: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl Interaction for Tool {
    fn base(&self) -> &InteractionBase {
        &self.base
    }

    async fn pipe(&self, _event: &mut InteractionEvent) -> Result<(), InteractionError> {
        Ok(())
    }

    fn modifier_changed(&self, modifier: ModificationKeyType) {
        self.modifiers.lock().unwrap().push(modifier);
    }
}

fn counter() -> (Arc<AtomicUsize>, impl Fn() + Send + Sync + 'static) {
    let count = Arc::new(AtomicUsize::new(0));
    let inner = count.clone();
    (count, move || {
        inner.fetch_add(1, Ordering::SeqCst);
    })
}

// ---------------------------------------------------------------------------
// Gesture classification
// ---------------------------------------------------------------------------

#[tokio::test]
async fn down_up_emits_click_at_window_position() {
    let f = fixture();
    click(&f.handler, 1.0, 1.0);
    f.handler.wait_idle().await;

    let events = f.recorder.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, EventType::CLICK);
    assert_eq!(events[0].window_position, WindowPosition::new(1.0, 1.0));
    assert_eq!(events[0].pointer, PointerKeyType::LEFT);
}

#[tokio::test]
async fn second_click_far_from_previous_is_single_click() {
    let f = fixture();
    click(&f.handler, 1.0, 1.0);
    f.handler.wait_idle().await;

    f.clock.advance(Duration::from_millis(1));
    if let Some(last_click) = lock(&f.handler.inner.gesture).last_click.as_mut() {
        last_click.window_position = WindowPosition::new(10.0, 10.0);
    }
    click(&f.handler, 1.0, 1.0);
    f.handler.wait_idle().await;

    assert_eq!(f.recorder.kinds(), vec![EventType::CLICK, EventType::CLICK]);
}

#[tokio::test]
async fn rapid_clicks_pair_into_double_clicks() {
    let f = fixture();
    for _ in 0..3 {
        click(&f.handler, 4.0, 4.0);
        f.clock.advance(Duration::from_millis(50));
    }
    f.handler.wait_idle().await;

    assert_eq!(
        f.recorder.kinds(),
        vec![EventType::CLICK, EventType::DBLCLICK, EventType::CLICK]
    );
}

#[tokio::test]
async fn drag_carries_pointer_and_key_of_initiating_down() {
    let f = fixture();
    let down = left(1.0, 1.0)
        .with_pointer(PointerKeyType::MIDDLE)
        .with_key(ModificationKeyType::CTRL);

    f.handler.pointer_down(down);
    f.handler.pointer_move(left(2.0, 2.0));
    f.handler.wait_idle().await;
    assert!(f.recorder.events().is_empty());

    f.clock.advance(Duration::from_millis(101));
    f.handler.pointer_move(left(3.0, 3.0));
    f.handler.key_down(Key::Shift);
    f.handler.pointer_move(left(4.0, 4.0));
    f.handler.pointer_up(left(5.0, 5.0));
    f.handler.wait_idle().await;

    let events = f.recorder.events();
    let kinds: Vec<EventType> = events.iter().map(|event| event.kind).collect();
    assert_eq!(
        kinds,
        vec![EventType::DRAGSTART, EventType::DRAG, EventType::DRAGEND]
    );
    for event in &events {
        assert_eq!(event.pointer, PointerKeyType::MIDDLE);
        assert_eq!(event.key, ModificationKeyType::CTRL);
    }
}

#[tokio::test]
async fn multiple_downs_emit_nothing_and_recover() {
    let f = fixture();
    f.handler.pointer_down(left(1.0, 1.0));
    f.handler.pointer_down(PointerInput::new(MouseButton::Right, 1.0, 1.0));
    f.handler.pointer_up(left(1.0, 1.0));
    f.handler.pointer_up(PointerInput::new(MouseButton::Right, 1.0, 1.0));
    f.handler.wait_idle().await;
    assert!(f.recorder.events().is_empty());

    click(&f.handler, 1.0, 1.0);
    f.handler.wait_idle().await;
    assert_eq!(f.recorder.kinds(), vec![EventType::CLICK]);
}

#[tokio::test]
async fn pointer_inherits_tracked_modifier() {
    let f = fixture();
    f.handler.key_down(Key::Shift);
    click(&f.handler, 0.0, 0.0);
    f.handler.wait_idle().await;

    assert_eq!(f.recorder.events()[0].key, ModificationKeyType::SHIFT);
}

#[tokio::test]
async fn handlers_keep_independent_click_state() {
    let first = fixture();
    let second = fixture();

    click(&first.handler, 1.0, 1.0);
    click(&second.handler, 1.0, 1.0);
    click(&first.handler, 1.0, 1.0);
    first.handler.wait_idle().await;
    second.handler.wait_idle().await;

    assert_eq!(first.recorder.kinds(), vec![EventType::CLICK, EventType::DBLCLICK]);
    assert_eq!(second.recorder.kinds(), vec![EventType::CLICK]);
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

#[tokio::test]
async fn persistent_remover_is_one_shot() {
    let f = fixture();
    let tool = Tool::new();
    let remove = f.handler.add_persistent_interaction(tool.clone(), None);
    let _ = f.handler.add_persistent_interaction(tool.clone(), Some(0));
    assert_eq!(f.handler.chain().len(), 2);

    assert_eq!(remove(), 1);
    assert!(!f.handler.chain().contains(tool.id()));
    assert_eq!(remove(), 0);
}

#[tokio::test]
async fn exclusive_group_members_leave_independently() {
    let f = fixture();
    let removed_events = Arc::new(AtomicUsize::new(0));
    let seen = removed_events.clone();
    let _ = f.handler.exclusive_removed().add_listener(move |_| {
        seen.fetch_add(1, Ordering::SeqCst);
    });

    let (a_calls, cb_a) = counter();
    let (b_calls, cb_b) = counter();
    let a = Tool::new();
    let b = Tool::new();
    let remove_a = f
        .handler
        .add_exclusive_interaction(a.clone(), cb_a, 0, Some("g".into()));
    let remove_b = f
        .handler
        .add_exclusive_interaction(b.clone(), cb_b, 0, Some("g".into()));
    assert!(f.handler.chain().contains(a.id()));
    assert!(f.handler.chain().contains(b.id()));

    assert_eq!(remove_a(), 1);
    assert_eq!(a_calls.load(Ordering::SeqCst), 0);
    assert!(!f.handler.chain().contains(a.id()));
    assert!(f.handler.chain().contains(b.id()));
    assert_eq!(removed_events.load(Ordering::SeqCst), 0);

    assert_eq!(remove_b(), 1);
    assert!(!f.handler.has_exclusive());
    assert_eq!(b_calls.load(Ordering::SeqCst), 0);
    assert_eq!(removed_events.load(Ordering::SeqCst), 1);

    assert_eq!(remove_a(), 0);
    assert_eq!(remove_b(), 0);
    assert_eq!(removed_events.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn other_group_evicts_whole_slot() {
    let f = fixture();
    let added = Arc::new(Mutex::new(Vec::new()));
    let sink = added.clone();
    let _ = f.handler.exclusive_added().add_listener(move |change: &ExclusiveAdded| {
        sink.lock().unwrap().push(change.interaction);
    });

    let (a_calls, cb_a) = counter();
    let (b_calls, cb_b) = counter();
    let (c_calls, cb_c) = counter();
    let a = Tool::new();
    let b = Tool::new();
    let c = Tool::new();
    let remove_a = f
        .handler
        .add_exclusive_interaction(a.clone(), cb_a, 1, Some("g1".into()));
    let _ = f
        .handler
        .add_exclusive_interaction(b.clone(), cb_b, 1, Some("g1".into()));
    let _ = f
        .handler
        .add_exclusive_interaction(c.clone(), cb_c, 2, Some("h".into()));

    assert_eq!(a_calls.load(Ordering::SeqCst), 1);
    assert_eq!(b_calls.load(Ordering::SeqCst), 1);
    assert_eq!(c_calls.load(Ordering::SeqCst), 0);
    assert!(!f.handler.chain().contains(a.id()));
    assert!(!f.handler.chain().contains(b.id()));
    assert!(f.handler.chain().contains(c.id()));

    let added = added.lock().unwrap().clone();
    assert_eq!(added.iter().filter(|id| **id == c.id()).count(), 1);

    // Evicted registrations are gone for good.
    assert_eq!(remove_a(), 0);
}

#[tokio::test]
async fn default_group_ids_never_collide() {
    let f = fixture();
    let (a_calls, cb_a) = counter();
    let (_, cb_b) = counter();
    let _ = f.handler.add_exclusive_interaction(Tool::new(), cb_a, 0, None);
    let _ = f.handler.add_exclusive_interaction(Tool::new(), cb_b, 0, None);

    assert_eq!(a_calls.load(Ordering::SeqCst), 1);
    assert_eq!(f.handler.exclusive_interactions().len(), 1);
}

#[tokio::test]
async fn remove_exclusive_evicts_everything_once() {
    let f = fixture();
    let removed_events = Arc::new(AtomicUsize::new(0));
    let seen = removed_events.clone();
    let _ = f.handler.exclusive_removed().add_listener(move |_| {
        seen.fetch_add(1, Ordering::SeqCst);
    });

    let (a_calls, cb_a) = counter();
    let (b_calls, cb_b) = counter();
    let _ = f
        .handler
        .add_exclusive_interaction(Tool::new(), cb_a, 0, Some("g".into()));
    let _ = f
        .handler
        .add_exclusive_interaction(Tool::new(), cb_b, 0, Some("g".into()));

    f.handler.remove_exclusive();
    f.handler.remove_exclusive();

    assert_eq!(a_calls.load(Ordering::SeqCst), 1);
    assert_eq!(b_calls.load(Ordering::SeqCst), 1);
    assert_eq!(removed_events.load(Ordering::SeqCst), 1);
    assert_eq!(f.handler.chain().member_ids(), vec![f.recorder.id()]);
}

#[tokio::test]
async fn exclusive_members_are_ordered_by_priority() {
    let f = fixture();
    let low = Tool::new();
    let high = Tool::new();
    let tie = Tool::new();
    let group = || Some("edit".to_string());

    let _ = f.handler.add_exclusive_interaction(low.clone(), || {}, 0, group());
    let _ = f.handler.add_exclusive_interaction(high.clone(), || {}, 5, group());
    let _ = f.handler.add_exclusive_interaction(tie.clone(), || {}, 5, group());

    assert_eq!(
        f.handler.chain().member_ids(),
        vec![f.recorder.id(), high.id(), tie.id(), low.id()]
    );
    let priorities: Vec<i32> = f
        .handler
        .exclusive_interactions()
        .iter()
        .map(|entry| entry.priority)
        .collect();
    assert_eq!(priorities, vec![5, 5, 0]);
}

#[tokio::test]
async fn evicted_tool_may_reregister_from_callback() {
    let f = fixture();
    let handler = f.handler.clone();
    let fallback = Tool::new();
    let fallback_id = fallback.id();
    let _ = f.handler.add_exclusive_interaction(
        Tool::new(),
        move || {
            let _ = handler.add_persistent_interaction(fallback.clone(), None);
        },
        0,
        None,
    );
    let _ = f.handler.add_exclusive_interaction(Tool::new(), || {}, 0, None);

    assert!(f.handler.chain().contains(fallback_id));
}

#[tokio::test]
async fn registration_from_eviction_callback_is_evicted_by_newer_group() {
    let f = fixture();
    let handler = f.handler.clone();
    let late = Tool::new();
    let late_id = late.id();
    let late_calls = Arc::new(AtomicUsize::new(0));
    let late_seen = late_calls.clone();
    let _ = f.handler.add_exclusive_interaction(
        Tool::new(),
        move || {
            let late_seen = late_seen.clone();
            let _ = handler.add_exclusive_interaction(
                late.clone(),
                move || {
                    late_seen.fetch_add(1, Ordering::SeqCst);
                },
                0,
                Some("x".into()),
            );
        },
        0,
        Some("a".into()),
    );

    let newest = Tool::new();
    let _ = f
        .handler
        .add_exclusive_interaction(newest.clone(), || {}, 0, Some("h".into()));

    let groups: Vec<String> = f
        .handler
        .exclusive_interactions()
        .into_iter()
        .map(|entry| entry.group_id)
        .collect();
    assert_eq!(groups, vec!["h".to_string()]);
    assert_eq!(late_calls.load(Ordering::SeqCst), 1);
    assert!(!f.handler.chain().contains(late_id));
    assert!(f.handler.chain().contains(newest.id()));
}

#[tokio::test]
async fn leaving_the_slot_keeps_persistent_registration() {
    let f = fixture();
    let tool = Tool::new();
    let _ = f.handler.add_persistent_interaction(tool.clone(), None);

    let remove = f
        .handler
        .add_exclusive_interaction(tool.clone(), || {}, 0, Some("g".into()));
    assert_eq!(f.handler.chain().member_ids(), vec![f.recorder.id(), tool.id()]);
    assert_eq!(remove(), 1);
    assert!(!f.handler.has_exclusive());
    assert!(f.handler.chain().contains(tool.id()));

    let (calls, cb) = counter();
    let _ = f
        .handler
        .add_exclusive_interaction(tool.clone(), cb, 0, Some("g".into()));
    let _ = f
        .handler
        .add_exclusive_interaction(Tool::new(), || {}, 0, Some("h".into()));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(f.handler.chain().contains(tool.id()));
}

#[tokio::test]
async fn reregistering_same_instance_replaces_its_entry() {
    let f = fixture();
    let tool = Tool::new();
    let other = Tool::new();
    let group = || Some("g".to_string());

    let first = f.handler.add_exclusive_interaction(tool.clone(), || {}, 0, group());
    let _ = f.handler.add_exclusive_interaction(other.clone(), || {}, 1, group());
    let second = f.handler.add_exclusive_interaction(tool.clone(), || {}, 3, group());

    let entries = f.handler.exclusive_interactions();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].interaction, tool.id());
    assert_eq!(entries[0].priority, 3);
    assert_eq!(
        f.handler.chain().member_ids(),
        vec![f.recorder.id(), tool.id(), other.id()]
    );

    assert_eq!(first(), 0);
    assert!(f.handler.chain().contains(tool.id()));

    assert_eq!(second(), 1);
    assert!(!f.handler.chain().contains(tool.id()));
    assert_eq!(f.handler.exclusive_interactions().len(), 1);
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Blocks every run until the test releases permits.
struct Gate {
    base: InteractionBase,
    permits: Arc<Semaphore>,
}

#[async_trait]
impl Interaction for Gate {
    fn base(&self) -> &InteractionBase {
        &self.base
    }

    async fn pipe(&self, _event: &mut InteractionEvent) -> Result<(), InteractionError> {
        self.permits
            .acquire()
            .await
            .map_err(|err| InteractionError::Failed(err.to_string()))?
            .forget();
        Ok(())
    }
}

#[tokio::test]
async fn busy_chain_queues_clicks_and_drops_moves() {
    let f = fixture();
    let permits = Arc::new(Semaphore::new(0));
    let gate = Arc::new(Gate {
        base: InteractionBase::passthrough(),
        permits: permits.clone(),
    });
    let _ = f.handler.add_persistent_interaction(gate, Some(0));

    click(&f.handler, 1.0, 1.0);
    assert!(f.handler.is_running());

    f.handler.pointer_move(left(8.0, 8.0));
    click(&f.handler, 1.0, 1.0);
    f.handler.pointer_move(left(9.0, 9.0));
    assert_eq!(f.handler.queued_events(), 1);

    permits.add_permits(10);
    f.handler.wait_idle().await;

    assert!(!f.handler.is_running());
    assert_eq!(f.recorder.kinds(), vec![EventType::CLICK, EventType::DBLCLICK]);

    f.handler.pointer_move(left(9.0, 9.0));
    f.handler.wait_idle().await;
    assert_eq!(f.recorder.kinds().last(), Some(&EventType::MOVE));
}

#[tokio::test]
async fn queued_drag_runs_in_arrival_order() {
    let f = fixture();
    let permits = Arc::new(Semaphore::new(0));
    let gate = Arc::new(Gate {
        base: InteractionBase::passthrough(),
        permits: permits.clone(),
    });
    let _ = f.handler.add_persistent_interaction(gate, Some(0));

    click(&f.handler, 1.0, 1.0);
    assert!(f.handler.is_running());

    f.handler.pointer_move(left(15.0, 15.0));
    f.handler.pointer_down(left(20.0, 20.0));
    f.clock.advance(Duration::from_millis(101));
    f.handler.pointer_move(left(21.0, 21.0));
    f.handler.pointer_move(left(22.0, 22.0));
    f.handler.pointer_move(left(23.0, 23.0));
    f.handler.pointer_up(left(24.0, 24.0));
    f.handler.pointer_move(left(25.0, 25.0));
    assert_eq!(f.handler.queued_events(), 4);

    permits.add_permits(10);
    f.handler.wait_idle().await;

    let events = f.recorder.events();
    let kinds: Vec<EventType> = events.iter().map(|event| event.kind).collect();
    assert_eq!(
        kinds,
        vec![
            EventType::CLICK,
            EventType::DRAGSTART,
            EventType::DRAG,
            EventType::DRAG,
            EventType::DRAGEND,
        ]
    );
    let positions: Vec<WindowPosition> = events[1..]
        .iter()
        .map(|event| event.window_position)
        .collect();
    assert_eq!(
        positions,
        vec![
            WindowPosition::new(20.0, 20.0),
            WindowPosition::new(22.0, 22.0),
            WindowPosition::new(23.0, 23.0),
            WindowPosition::new(24.0, 24.0),
        ]
    );
}

/// Rejects or panics on clicks and counts `chain_ended` notifications.
struct Faulty {
    base: InteractionBase,
    panic: bool,
    ended: Arc<AtomicUsize>,
}

#[async_trait]
impl Interaction for Faulty {
    fn base(&self) -> &InteractionBase {
        &self.base
    }

    async fn pipe(&self, event: &mut InteractionEvent) -> Result<(), InteractionError> {
        let ended = self.ended.clone();
        let _ = event.chain_ended.add_listener(move |_| {
            ended.fetch_add(1, Ordering::SeqCst);
        });
        if event.kind != EventType::CLICK {
            return Ok(());
        }
        if self.panic {
            panic!("tool exploded");
        }
        Err(InteractionError::Failed("picking failed".into()))
    }
}

async fn assert_failure_does_not_lock(panic: bool) {
    let f = fixture();
    let ended = Arc::new(AtomicUsize::new(0));
    let faulty = Arc::new(Faulty {
        base: InteractionBase::passthrough(),
        panic,
        ended: ended.clone(),
    });
    let _ = f.handler.add_persistent_interaction(faulty, Some(0));

    click(&f.handler, 1.0, 1.0);
    f.handler.wait_idle().await;
    f.clock.advance(Duration::from_secs(1));
    f.handler.pointer_move(left(2.0, 2.0));
    click(&f.handler, 30.0, 30.0);
    f.handler.wait_idle().await;
    assert!(!f.handler.is_running());

    // Only the move reached the recorder; both clicks stopped at the faulty tool.
    assert_eq!(f.recorder.kinds(), vec![EventType::MOVE]);
    assert_eq!(ended.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn rejected_run_releases_the_pipeline() {
    assert_failure_does_not_lock(false).await;
}

#[tokio::test]
async fn panicking_run_releases_the_pipeline() {
    assert_failure_does_not_lock(true).await;
}

/// Stops propagation of everything it sees.
struct Stopper {
    base: InteractionBase,
}

#[async_trait]
impl Interaction for Stopper {
    fn base(&self) -> &InteractionBase {
        &self.base
    }

    async fn pipe(&self, event: &mut InteractionEvent) -> Result<(), InteractionError> {
        event.stop_propagation = true;
        Ok(())
    }
}

#[tokio::test]
async fn stop_propagation_hides_event_from_later_tools() {
    let f = fixture();
    let stopper = Arc::new(Stopper {
        base: InteractionBase::new(EventType::CLICK),
    });
    let _ = f.handler.add_persistent_interaction(stopper, Some(0));

    click(&f.handler, 1.0, 1.0);
    f.handler.wait_idle().await;
    f.clock.advance(Duration::from_secs(1));
    f.handler.pointer_move(left(1.0, 1.0));
    f.handler.wait_idle().await;

    assert_eq!(f.recorder.kinds(), vec![EventType::MOVE]);
}

// ---------------------------------------------------------------------------
// Modifiers
// ---------------------------------------------------------------------------

#[tokio::test]
async fn modifier_changes_notify_once_per_derived_change() {
    let f = fixture();
    let persistent = Tool::new();
    let exclusive = Tool::new();
    let _ = f.handler.add_persistent_interaction(persistent.clone(), None);
    let _ = f
        .handler
        .add_exclusive_interaction(exclusive.clone(), || {}, 0, None);

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let _ = f
        .handler
        .modifier_changed()
        .add_listener(move |modifier: &ModificationKeyType| {
            sink.lock().unwrap().push(*modifier);
        });

    f.handler.key_down(Key::Alt);
    f.handler.key_down(Key::Shift);
    f.handler.key_down(Key::Ctrl);
    f.handler.key_up(Key::Ctrl);
    f.handler.key_up(Key::Shift);
    f.handler.key_down(Key::Char('x'));
    f.handler.key_up(Key::Alt);

    let expected = vec![
        ModificationKeyType::ALT,
        ModificationKeyType::SHIFT,
        ModificationKeyType::ALT,
        ModificationKeyType::NONE,
    ];
    assert_eq!(*seen.lock().unwrap(), expected);
    assert_eq!(*persistent.modifiers.lock().unwrap(), expected);
    assert_eq!(*exclusive.modifiers.lock().unwrap(), expected);
}

#[tokio::test]
async fn focus_loss_releases_modifiers() {
    let f = fixture();
    f.handler.sync_modifiers(Modifiers {
        shift: true,
        ctrl: true,
        ..Modifiers::new()
    });
    assert_eq!(f.handler.current_modifier(), ModificationKeyType::SHIFT);

    f.handler.focus_lost();
    assert_eq!(f.handler.current_modifier(), ModificationKeyType::NONE);
    assert_eq!(f.handler.pressed_modifiers(), Modifiers::new());
}

#[tokio::test]
async fn destroy_evicts_and_clears() {
    let f = fixture();
    let (calls, cb) = counter();
    let _ = f.handler.add_exclusive_interaction(Tool::new(), cb, 0, None);

    f.handler.destroy();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(f.handler.chain().is_empty());
    assert_eq!(f.handler.exclusive_removed().listener_count(), 0);

    click(&f.handler, 1.0, 1.0);
    f.handler.wait_idle().await;
    assert!(f.recorder.events().is_empty());
}
