use buffered_producer::bus::{InMemoryBroker, Message, PublishError, Publisher};
use buffered_producer::{
    BufferedProducer, Encoding, LogTransport, NoopTransport, ProducerConfig, ProducerError,
    PublisherTransport, RecordingTransport, Route, Transport, TransportError,
};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct UserEvent {
    id: String,
    kind: String,
}

fn user(id: &str, kind: &str) -> UserEvent {
    UserEvent {
        id: id.to_string(),
        kind: kind.to_string(),
    }
}

#[test]
fn log_transport_writes_one_line_per_event() {
    let buffer = Arc::new(Mutex::new(Vec::new()));
    let producer = BufferedProducer::new(LogTransport::with_buffer(buffer.clone()));
    let mut ctx = producer.context();

    producer
        .send(&mut ctx, user("1", "created"), Route::queue("users"))
        .unwrap();
    producer
        .send(&mut ctx, user("1", "renamed"), Route::queue("users"))
        .unwrap();
    assert!(buffer.lock().unwrap().is_empty());

    producer.flush(&mut ctx).unwrap();

    let logs = buffer.lock().unwrap();
    assert_eq!(
        *logs,
        vec![
            r#"[PRODUCER] /users {"id":"1","kind":"created"}"#.to_string(),
            r#"[PRODUCER] /users {"id":"1","kind":"renamed"}"#.to_string(),
        ]
    );
}

#[test]
fn publisher_transport_encodes_per_configured_encoding() {
    let broker = InMemoryBroker::new();
    let encoding: Encoding = serde_json::from_str(r#""bitcode""#).unwrap();
    let producer =
        BufferedProducer::new(PublisherTransport::new(broker.clone()).with_encoding(encoding));
    let mut ctx = producer.context();

    let route = Route::new("users", "events");
    producer.send(&mut ctx, user("7", "created"), route.clone()).unwrap();
    producer.flush(&mut ctx).unwrap();

    let messages = broker.messages(&route);
    assert_eq!(messages.len(), 1);
    assert_eq!(
        messages[0].metadata_value("content-type"),
        Some("application/x-bitcode")
    );
    assert_eq!(
        messages[0].decode_bitcode::<UserEvent>().unwrap(),
        user("7", "created")
    );
}

#[test]
fn failing_destination_stops_the_flush_but_still_clears() {
    // publishes to `users` fail, everything else is accepted
    struct Picky {
        accepted: Mutex<Vec<String>>,
    }

    impl Publisher<&'static str> for Picky {
        fn publish(&self, destination: &&'static str, message: Message) -> Result<(), PublishError> {
            if *destination == "users" {
                return Err(PublishError::ConnectionFailed("users cluster down".into()));
            }
            self.accepted.lock().unwrap().push(message.id);
            Ok(())
        }
    }

    let transport = Arc::new(PublisherTransport::new(Picky {
        accepted: Mutex::new(Vec::new()),
    }));
    let producer = BufferedProducer::new(Arc::clone(&transport));
    let mut ctx = producer.context();

    producer.send(&mut ctx, user("1", "created"), "users").unwrap();
    let err = producer.flush(&mut ctx).unwrap_err();

    assert!(matches!(
        err,
        ProducerError::Flush {
            source: TransportError::Publish(PublishError::ConnectionFailed(_)),
            ..
        }
    ));
    assert!(!ctx.is_active());
    assert!(transport.publisher().accepted.lock().unwrap().is_empty());

    producer.send(&mut ctx, user("2", "created"), "audit").unwrap();
    producer.flush(&mut ctx).unwrap();
    assert_eq!(transport.publisher().accepted.lock().unwrap().len(), 1);
}

#[test]
fn boxed_transport_can_be_chosen_at_runtime() {
    let recording = RecordingTransport::new();
    let transports: Vec<Box<dyn Transport<Route, UserEvent>>> =
        vec![Box::new(NoopTransport), Box::new(recording.clone())];

    for transport in transports {
        let producer = BufferedProducer::new(transport);
        let mut ctx = producer.context();
        producer
            .send(&mut ctx, user("1", "created"), Route::queue("users"))
            .unwrap();
        producer.flush(&mut ctx).unwrap();
    }

    assert_eq!(recording.flush_count(), 1);
    assert_eq!(
        recording.events_for(&Route::queue("users")),
        vec![user("1", "created")]
    );
}

#[test]
fn producer_config_from_json() {
    let config: ProducerConfig = serde_json::from_str(
        r#"{"name": "billing", "pending_warn_threshold": 2, "warn_on_discard": false}"#,
    )
    .unwrap();
    let producer = BufferedProducer::with_config(NoopTransport, config);
    assert_eq!(producer.config().name, "billing");

    // crossing the warning threshold never refuses a send
    let mut ctx = producer.context();
    for i in 0..5 {
        producer.send(&mut ctx, i, "numbers").unwrap();
    }
    assert_eq!(ctx.pending(), 5);
}

#[cfg(feature = "emitter")]
#[test]
fn emitter_transport_fires_listeners_after_flush() {
    use buffered_producer::{EmitterTransport, EventEmitter};
    use std::thread;
    use std::time::Duration;

    let received = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&received);
    let mut emitter = EventEmitter::new();
    emitter.on("users/created", move |payload: String| {
        sink.lock().unwrap().push(payload);
    });

    let producer = BufferedProducer::new(EmitterTransport::new(emitter));
    let mut ctx = producer.context();
    producer
        .send(&mut ctx, user("3", "created"), Route::new("users", "created"))
        .unwrap();

    thread::sleep(Duration::from_millis(20));
    assert!(received.lock().unwrap().is_empty());

    producer.flush(&mut ctx).unwrap();

    // EventEmitter is async, give it time
    thread::sleep(Duration::from_millis(50));
    assert_eq!(
        *received.lock().unwrap(),
        vec![r#"{"id":"3","kind":"created"}"#.to_string()]
    );
}
