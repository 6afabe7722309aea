#![forbid(unsafe_code)]

//! Structured log events emitted along the delete path.
//!
//! Every event uses a `taskdeck.*` target, carries structured fields, and
//! the degraded no-surface path is reported at WARN.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use taskdeck_core::event::PointerEvent;
use taskdeck_core::geometry::RectF;
use taskdeck_core::item::ItemId;
use taskdeck_core::measure::MeasureMap;
use taskdeck_core::{Duration, Instant};
use taskdeck_fx::{DissolveEngine, NoSurface};
use taskdeck_runtime::{Task, TaskPanel};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;

#[derive(Debug, Clone)]
struct CapturedEvent {
    level: tracing::Level,
    target: String,
    fields: HashMap<String, String>,
}

impl CapturedEvent {
    fn message(&self) -> &str {
        self.fields.get("message").map_or("", String::as_str)
    }
}

struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

struct EventCapture(Arc<Mutex<Vec<CapturedEvent>>>);

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for EventCapture {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        let captured = CapturedEvent {
            level: *event.metadata().level(),
            target: event.metadata().target().to_string(),
            fields: visitor.0.into_iter().collect(),
        };
        if let Ok(mut events) = self.0.lock() {
            events.push(captured);
        }
    }
}

fn with_captured_events(f: impl FnOnce()) -> Vec<CapturedEvent> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::registry()
        .with(LevelFilter::TRACE)
        .with(EventCapture(Arc::clone(&events)));
    tracing::subscriber::with_default(subscriber, f);
    let out = events.lock().expect("capture lock").clone();
    out
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn delete_second_card(engine: DissolveEngine<ItemId>) -> Vec<ItemId> {
    let mut panel = TaskPanel::default().with_engine(engine);
    panel.set_tasks(vec![Task::new("1", "one"), Task::new("2", "two")]);
    let measure = MeasureMap::new()
        .with_panel(RectF::new(0.0, 0.0, 300.0, 400.0))
        .with_item("1", RectF::new(10.0, 40.0, 280.0, 60.0))
        .with_item("2", RectF::new(10.0, 106.0, 280.0, 60.0));
    let t = Instant::now();
    let mut removed = Vec::new();
    panel.expand(t);
    panel.pointer_down(&ItemId::new("2"), &PointerEvent::down(150.0, 130.0, t), &measure);
    panel.pointer_event(&PointerEvent::moved(150.0, 300.0, t + ms(16)), &measure);
    panel.pointer_event(&PointerEvent::moved(150.0, 500.0, t + ms(32)), &measure);
    panel.pointer_event(&PointerEvent::up(150.0, 500.0, t + ms(48)), &measure);
    let mut now = t + ms(48);
    while now <= t + ms(1000) {
        panel.frame(now, &measure, &mut |id: &ItemId| removed.push(id.clone()));
        now += ms(16);
    }
    removed
}

#[test]
fn delete_path_logs_under_taskdeck_targets() {
    let mut removed = Vec::new();
    let events = with_captured_events(|| {
        removed = delete_second_card(DissolveEngine::with_seed(Default::default(), 3));
    });
    assert_eq!(removed, vec![ItemId::new("2")]);
    assert!(!events.is_empty());
    assert!(events.iter().all(|e| e.target.starts_with("taskdeck.")), "{events:#?}");

    let has = |target: &str, message: &str| {
        events
            .iter()
            .any(|e| e.target == target && e.message() == message)
    };
    assert!(has("taskdeck.drag", "drag started"));
    assert!(has("taskdeck.drag", "released outside, deleting"));
    assert!(has("taskdeck.dissolve", "dissolve started"));
    assert!(has("taskdeck.dissolve", "dissolve complete"));
    assert!(has("taskdeck.panel", "task removed"));

    let removal = events
        .iter()
        .find(|e| e.message() == "task removed")
        .expect("removal event");
    assert_eq!(removal.level, tracing::Level::DEBUG);
    assert_eq!(removal.fields.get("id").map(String::as_str), Some("2"));
}

#[test]
fn missing_surface_warns() {
    let events = with_captured_events(|| {
        delete_second_card(DissolveEngine::with_seed(Default::default(), 3).surfaces(NoSurface));
    });
    let warns: Vec<_> = events
        .iter()
        .filter(|e| e.level == tracing::Level::WARN)
        .collect();
    assert_eq!(warns.len(), 1, "{warns:#?}");
    assert_eq!(warns[0].target, "taskdeck.dissolve");
}

#[test]
fn hot_path_frames_stay_at_trace() {
    let events = with_captured_events(|| {
        delete_second_card(DissolveEngine::with_seed(Default::default(), 9));
    });
    let frames: Vec<_> = events
        .iter()
        .filter(|e| e.message() == "dissolve frame")
        .collect();
    assert!(frames.len() > 10);
    assert!(frames.iter().all(|e| e.level == tracing::Level::TRACE));
    assert!(frames.iter().all(|e| e.fields.contains_key("progress")));
}
