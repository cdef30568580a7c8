use disruptor_rs::{
    Alerted, BusySpinWaitStrategy, ConsumerBarrier, ForceFillProducerBarrier, ProducerBarrier,
    RingBuffer, Sequence, SequencedEntry, SingleThreadedClaimStrategy,
};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Default, Clone, Copy)]
struct Event {
    sequence: i64,
    payload: u64,
}

impl SequencedEntry for Event {
    fn sequence(&self) -> i64 {
        self.sequence
    }
    fn set_sequence(&mut self, sequence: i64) {
        self.sequence = sequence;
    }
}

#[test]
fn claim_publish_and_read_a_single_entry() {
    let ring: RingBuffer<Event> = RingBuffer::new(8, Event::default);
    let consumer = ConsumerBarrier::new(&ring, BusySpinWaitStrategy, vec![]);
    let producer = ProducerBarrier::new(
        &ring,
        Arc::new(SingleThreadedClaimStrategy::new()),
        BusySpinWaitStrategy,
        vec![consumer.own_sequence()],
    )
    .unwrap();

    let seq = producer.next_entry(|e| e.payload = 123).unwrap();
    assert_eq!(seq, 0);

    let available = consumer.wait_for_next().unwrap();
    assert_eq!(available, 0);
    assert_eq!(consumer.read(available, |e| e.payload), 123);
    consumer.processed_through(available);
}

#[test]
fn timeout_returns_current_cursor_when_nothing_published() {
    let ring: RingBuffer<Event> = RingBuffer::new(8, Event::default);
    let consumer = ConsumerBarrier::new(&ring, BusySpinWaitStrategy, vec![]);

    let result = consumer.wait_for_next_timeout(Duration::from_millis(10));
    assert_eq!(result, Ok(-1));
}

#[test]
fn fills_ring_to_capacity_without_blocking() {
    let ring: RingBuffer<Event> = RingBuffer::new(4, Event::default);
    let consumer = ConsumerBarrier::new(&ring, BusySpinWaitStrategy, vec![]);
    let producer = ProducerBarrier::new(
        &ring,
        Arc::new(SingleThreadedClaimStrategy::new()),
        BusySpinWaitStrategy,
        vec![consumer.own_sequence()],
    )
    .unwrap();

    for i in 0..4 {
        producer.next_entry(|e| e.payload = i).unwrap();
    }
    assert_eq!(ring.cursor(), 3);

    let available = consumer.wait_for_next().unwrap();
    assert_eq!(available, 3);
    for seq in 0..=3 {
        assert_eq!(consumer.read(seq, |e| e.payload), seq as u64);
    }
}

#[test]
fn wraps_around_once_consumer_frees_slots() {
    let ring: RingBuffer<Event> = RingBuffer::new(4, Event::default);
    let consumer = ConsumerBarrier::new(&ring, BusySpinWaitStrategy, vec![]);
    let producer = ProducerBarrier::new(
        &ring,
        Arc::new(SingleThreadedClaimStrategy::new()),
        BusySpinWaitStrategy,
        vec![consumer.own_sequence()],
    )
    .unwrap();

    for i in 0..4 {
        producer.next_entry(|e| e.payload = i).unwrap();
    }
    let available = consumer.wait_for_next().unwrap();
    consumer.processed_through(available);

    // Slot 0 is now free; this claim (sequence 4) reuses it.
    let seq = producer.next_entry(|e| e.payload = 999).unwrap();
    assert_eq!(seq, 4);
    assert_eq!(consumer.read(4, |e| e.payload), 999);
}

#[test]
fn force_fill_at_a_named_sequence_resyncs_the_normal_producer() {
    let ring: RingBuffer<Event> = RingBuffer::new(16, Event::default);
    let consumer_sequence = Arc::new(Sequence::default());
    let dependency: Arc<dyn disruptor_rs::Consumer> = consumer_sequence.clone();
    let claim = Arc::new(SingleThreadedClaimStrategy::new());

    let force_fill = ForceFillProducerBarrier::new(
        &ring,
        Arc::clone(&claim),
        BusySpinWaitStrategy,
        vec![dependency.clone()],
    )
    .unwrap();
    let published = force_fill.force_fill(5, |e| e.payload = 77).unwrap();
    assert_eq!(published, 5);
    assert_eq!(ring.cursor(), 5);
    assert_eq!(read_payload(&ring, 5), 77);

    // The normal producer barrier shares the same claim strategy instance,
    // so its next claim resumes right after the forced sequence.
    let producer =
        ProducerBarrier::new(&ring, claim, BusySpinWaitStrategy, vec![dependency]).unwrap();
    let seq = producer.next_entry(|e| e.payload = 78).unwrap();
    assert_eq!(seq, 6);
    assert_eq!(ring.cursor(), 6);
}

fn read_payload(ring: &RingBuffer<Event>, seq: i64) -> u64 {
    let consumer = ConsumerBarrier::new(ring, BusySpinWaitStrategy, vec![]);
    consumer.read(seq, |e| e.payload)
}

#[test]
fn spinning_consumer_is_interrupted_by_an_alert() {
    let ring: RingBuffer<Event> = RingBuffer::new(8, Event::default);
    let consumer = Arc::new(ConsumerBarrier::new(&ring, BusySpinWaitStrategy, vec![]));

    let c2 = Arc::clone(&consumer);
    let handle = thread::spawn(move || c2.wait_for_next());

    thread::sleep(Duration::from_millis(20));
    consumer.alert();

    let result = handle.join().unwrap();
    assert_eq!(result, Err(Alerted));
}

#[test]
fn alert_toggles_idempotently() {
    let ring: RingBuffer<Event> = RingBuffer::new(8, Event::default);
    let consumer = ConsumerBarrier::new(&ring, BusySpinWaitStrategy, vec![]);

    assert!(!consumer.is_alerted());
    consumer.alert();
    consumer.alert();
    assert!(consumer.is_alerted());

    consumer.clear_alert();
    consumer.clear_alert();
    assert!(!consumer.is_alerted());

    // Waiting works normally again once cleared.
    assert_eq!(
        consumer.wait_for_next_timeout(Duration::from_millis(5)),
        Ok(-1)
    );
}

#[test]
fn producer_rejects_construction_with_no_tracked_consumers() {
    let ring: RingBuffer<Event> = RingBuffer::new(8, Event::default);
    let result = ProducerBarrier::new(
        &ring,
        Arc::new(SingleThreadedClaimStrategy::new()),
        BusySpinWaitStrategy,
        vec![],
    );
    assert!(result.is_err());
}

#[test]
fn multiple_consumers_each_see_every_published_entry() {
    let ring: RingBuffer<Event> = RingBuffer::new(8, Event::default);
    let fast = ConsumerBarrier::new(&ring, BusySpinWaitStrategy, vec![]);
    let slow = ConsumerBarrier::new(&ring, BusySpinWaitStrategy, vec![]);
    let producer = ProducerBarrier::new(
        &ring,
        Arc::new(SingleThreadedClaimStrategy::new()),
        BusySpinWaitStrategy,
        vec![fast.own_sequence(), slow.own_sequence()],
    )
    .unwrap();

    for i in 0..5 {
        producer.next_entry(|e| e.payload = i).unwrap();
    }

    let fast_available = fast.wait_for_next().unwrap();
    assert_eq!(fast_available, 4);
    fast.processed_through(fast_available);

    let slow_available = slow.wait_for_next().unwrap();
    assert_eq!(slow_available, 4);
    for seq in 0..=4 {
        assert_eq!(slow.read(seq, |e| e.payload), seq as u64);
    }
    slow.processed_through(slow_available);
}
