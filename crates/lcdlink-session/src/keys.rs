use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};
use std::sync::Arc;

/// Slots in the keypad ring buffer. One slot stays unused to tell full
/// from empty, so at most `KEY_QUEUE_CAPACITY - 1` keys are buffered.
pub const KEY_QUEUE_CAPACITY: usize = 32;

struct Inner {
    slots: [AtomicU8; KEY_QUEUE_CAPACITY],
    read_idx: AtomicUsize,
    write_idx: AtomicUsize,
}

/// Create a single-producer/single-consumer keypad queue.
///
/// The producer half goes to the connection supervisor, the consumer
/// half stays with the session holder. Neither side ever blocks: the
/// producer drops keys when the buffer is full (the consumer is not
/// draining fast enough, an acceptable-loss condition) and the consumer
/// returns `None` when the buffer is empty.
pub fn key_queue() -> (KeyProducer, KeyConsumer) {
    let inner = Arc::new(Inner {
        slots: std::array::from_fn(|_| AtomicU8::new(0)),
        read_idx: AtomicUsize::new(0),
        write_idx: AtomicUsize::new(0),
    });
    (
        KeyProducer {
            inner: Arc::clone(&inner),
        },
        KeyConsumer { inner },
    )
}

/// Producer half of the keypad queue.
pub struct KeyProducer {
    inner: Arc<Inner>,
}

impl KeyProducer {
    /// Push one key. Returns `false` if the queue is full and the key
    /// was dropped.
    pub fn push(&mut self, key: u8) -> bool {
        let write = self.inner.write_idx.load(Ordering::Relaxed);
        let next = (write + 1) % KEY_QUEUE_CAPACITY;
        // Acquire pairs with the consumer's Release on read_idx: the slot
        // at `write` is free for reuse once that index is visible here.
        if next == self.inner.read_idx.load(Ordering::Acquire) {
            return false;
        }
        self.inner.slots[write].store(key, Ordering::Relaxed);
        // Release publishes the slot write before the index moves.
        self.inner.write_idx.store(next, Ordering::Release);
        true
    }
}

/// Consumer half of the keypad queue.
pub struct KeyConsumer {
    inner: Arc<Inner>,
}

impl KeyConsumer {
    /// Pop the oldest pending key, if any.
    pub fn pop(&mut self) -> Option<u8> {
        let read = self.inner.read_idx.load(Ordering::Relaxed);
        // Acquire pairs with the producer's Release on write_idx.
        if read == self.inner.write_idx.load(Ordering::Acquire) {
            return None;
        }
        let key = self.inner.slots[read].load(Ordering::Relaxed);
        // Release hands the slot back to the producer.
        self.inner
            .read_idx
            .store((read + 1) % KEY_QUEUE_CAPACITY, Ordering::Release);
        Some(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_queue_pops_none() {
        let (_producer, mut consumer) = key_queue();
        assert_eq!(consumer.pop(), None);
    }

    #[test]
    fn fifo_order_below_capacity() {
        let (mut producer, mut consumer) = key_queue();
        for key in 0..31u8 {
            assert!(producer.push(key));
        }
        for key in 0..31u8 {
            assert_eq!(consumer.pop(), Some(key));
        }
        assert_eq!(consumer.pop(), None);
    }

    #[test]
    fn drops_newest_keys_when_full() {
        let (mut producer, mut consumer) = key_queue();
        let mut accepted = 0;
        for key in 0..40u8 {
            if producer.push(key) {
                accepted += 1;
            }
        }
        assert_eq!(accepted, KEY_QUEUE_CAPACITY - 1);

        let mut drained = Vec::new();
        while let Some(key) = consumer.pop() {
            drained.push(key);
        }
        // Oldest keys survive; the overflow was discarded.
        let expected: Vec<u8> = (0..31u8).collect();
        assert_eq!(drained, expected);
    }

    #[test]
    fn interleaved_push_pop_wraps_indices() {
        let (mut producer, mut consumer) = key_queue();
        for round in 0..100u32 {
            let key = (round % 251) as u8;
            assert!(producer.push(key));
            assert_eq!(consumer.pop(), Some(key));
        }
        assert_eq!(consumer.pop(), None);
    }

    #[test]
    fn producer_and_consumer_run_on_separate_threads() {
        let (mut producer, mut consumer) = key_queue();
        let handle = std::thread::spawn(move || {
            let mut sent = 0u32;
            for key in 0..200u8 {
                // Retry until accepted so every key arrives in order.
                while !producer.push(key) {
                    std::thread::yield_now();
                }
                sent += 1;
            }
            sent
        });

        let mut received = Vec::new();
        while received.len() < 200 {
            if let Some(key) = consumer.pop() {
                received.push(key);
            } else {
                std::thread::yield_now();
            }
        }

        assert_eq!(handle.join().unwrap(), 200);
        let expected: Vec<u8> = (0..200u8).collect();
        assert_eq!(received, expected);
    }
}
