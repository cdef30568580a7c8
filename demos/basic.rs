use disruptor_rs::{
    BusySpinWaitStrategy, ConsumerBarrier, ProducerBarrier, RingBuffer, SequencedEntry,
    SingleThreadedClaimStrategy,
};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

#[derive(Default, Clone, Copy)]
struct Event {
    sequence: i64,
    value: u64,
}

impl SequencedEntry for Event {
    fn sequence(&self) -> i64 {
        self.sequence
    }
    fn set_sequence(&mut self, sequence: i64) {
        self.sequence = sequence;
    }
}

fn main() {
    println!("disruptor-rs Basic Example");
    println!("==========================\n");

    const ITEMS: u64 = 5_000_000;
    const RING_SIZE: usize = 1 << 12;

    println!("Configuration:");
    println!("  Ring size: {}", RING_SIZE);
    println!("  Items: {}\n", ITEMS);

    let ring: RingBuffer<Event> = RingBuffer::new(RING_SIZE, Event::default);
    let consumer = ConsumerBarrier::new(&ring, BusySpinWaitStrategy, vec![]);
    let producer = ProducerBarrier::new(
        &ring,
        Arc::new(SingleThreadedClaimStrategy::new()),
        BusySpinWaitStrategy,
        vec![consumer.own_sequence()],
    )
    .unwrap();

    let start = Instant::now();

    thread::scope(|s| {
        s.spawn(|| {
            for i in 0..ITEMS {
                producer.next_entry(|e| e.value = i).unwrap();
            }
            println!("Producer finished");
        });

        s.spawn(|| {
            let mut total = 0u64;
            let mut sum = 0u64;
            while total < ITEMS {
                let available = consumer.wait_for_next().unwrap();
                let mut next = consumer.own_sequence().get() + 1;
                while next <= available {
                    sum += consumer.read(next, |e| e.value);
                    next += 1;
                    total += 1;
                }
                consumer.processed_through(available);
            }
            println!("Consumer finished");
            (total, sum)
        });
    });

    let duration = start.elapsed();

    println!("\nResults:");
    println!("  Duration: {:.2?}", duration);
    println!(
        "  Throughput: {:.2} million items/sec",
        ITEMS as f64 / duration.as_secs_f64() / 1_000_000.0
    );
}
