//! Per-consumer request queues with round-robin dequeue.
//!
//! Every consumer with pending work has one [`ConsumerQueue`]. The
//! scheduler takes one request from each active queue in turn, so a burst
//! from one consumer waits behind at most one request per other consumer.
//!
//! Dictionary mutations go to the [`ConsumerId::BROADCAST`] queue, which
//! stays out of the rotation and is always served first. A spell check can
//! therefore never overtake a mutation queued before it.
//!
//! The scheduler is not synchronized by itself; the engine keeps it behind
//! the same lock that guards the worker's wake condition.
use std::collections::VecDeque;

use hashbrown::HashMap;

use crate::consumer::ConsumerId;
use crate::request::Request;

#[derive(Debug)]
pub struct ConsumerQueue {
    consumer: ConsumerId,
    requests: VecDeque<Request>,
}

impl ConsumerQueue {
    fn new(consumer: ConsumerId) -> ConsumerQueue {
        ConsumerQueue {
            consumer,
            requests: VecDeque::new(),
        }
    }

    pub fn consumer(&self) -> ConsumerId {
        self.consumer
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct RequestScheduler {
    queues: HashMap<ConsumerId, ConsumerQueue>,
    // Service order of the live consumer queues; the front is the cursor.
    // Never holds the broadcast id.
    rotation: VecDeque<ConsumerId>,
    pending: usize,
}

impl RequestScheduler {
    pub fn new() -> RequestScheduler {
        RequestScheduler::default()
    }

    /// Appends `request` to the tail of `consumer`'s queue, creating the
    /// queue if this consumer has nothing pending.
    pub fn enqueue(&mut self, consumer: ConsumerId, request: Request) {
        let rotation = &mut self.rotation;
        let queue = self.queues.entry(consumer).or_insert_with(|| {
            if !consumer.is_broadcast() {
                rotation.push_back(consumer);
            }
            ConsumerQueue::new(consumer)
        });

        queue.requests.push_back(request);
        self.pending += 1;
    }

    /// Drops everything pending for `consumer`. Returns the number of
    /// discarded requests.
    pub fn cancel(&mut self, consumer: ConsumerId) -> usize {
        let queue = match self.queues.remove(&consumer) {
            Some(v) => v,
            None => return 0,
        };

        if let Some(index) = self.rotation.iter().position(|x| *x == consumer) {
            self.rotation.remove(index);
        }

        self.pending -= queue.len();
        queue.len()
    }

    /// Pops the oldest broadcast request if there is one. Otherwise pops
    /// the front request of the queue under the cursor and moves the cursor
    /// on. Exhausted queues leave the rotation immediately.
    pub fn try_dequeue(&mut self) -> Option<(ConsumerId, Request)> {
        if let Some(request) = self.pop_broadcast() {
            self.pending -= 1;
            return Some((ConsumerId::BROADCAST, request));
        }

        while let Some(consumer) = self.rotation.pop_front() {
            let queue = match self.queues.get_mut(&consumer) {
                Some(v) => v,
                None => continue,
            };

            let request = match queue.requests.pop_front() {
                Some(v) => v,
                None => {
                    self.queues.remove(&consumer);
                    continue;
                }
            };

            self.pending -= 1;

            if queue.is_empty() {
                self.queues.remove(&consumer);
            } else {
                self.rotation.push_back(consumer);
            }

            return Some((consumer, request));
        }

        None
    }

    fn pop_broadcast(&mut self) -> Option<Request> {
        let queue = self.queues.get_mut(&ConsumerId::BROADCAST)?;
        let request = queue.requests.pop_front();

        if queue.is_empty() {
            self.queues.remove(&ConsumerId::BROADCAST);
        }

        request
    }

    /// Discards all pending work. Returns the number of discarded requests.
    pub fn clear(&mut self) -> usize {
        let discarded = self.pending;
        self.queues.clear();
        self.rotation.clear();
        self.pending = 0;
        discarded
    }

    /// Total number of pending requests.
    pub fn len(&self) -> usize {
        self.pending
    }

    pub fn is_empty(&self) -> bool {
        self.pending == 0
    }

    pub fn active_consumers(&self) -> usize {
        self.queues.len()
    }

    pub fn queue(&self, consumer: ConsumerId) -> Option<&ConsumerQueue> {
        self.queues.get(&consumer)
    }
}
