//! Property: for any tick trace, the relay sends exactly once for every
//! tick that exceeds all ticks seen before it, and never otherwise.

use link::consts::PAYLOAD_SIZE;
use link_relay::{DatagramSink, LinkSource, RelayLoop, Step};
use proptest::prelude::*;
use std::cell::Cell;
use std::io;
use std::time::Duration;

struct TraceSource {
    ticks: Vec<u32>,
    pos: Cell<usize>,
}

impl LinkSource for TraceSource {
    fn tick(&self) -> u32 {
        let i = self.pos.get();
        self.pos.set(i + 1);
        self.ticks[i]
    }

    fn snapshot(&self, buf: &mut [u8; PAYLOAD_SIZE]) {
        buf.fill(0);
        let tick = self.ticks[self.pos.get() - 1];
        buf[4..8].copy_from_slice(&tick.to_ne_bytes());
    }
}

#[derive(Default)]
struct CountingSink {
    lengths: Vec<usize>,
}

impl DatagramSink for CountingSink {
    fn send(&mut self, payload: &[u8]) -> io::Result<usize> {
        self.lengths.push(payload.len());
        Ok(payload.len())
    }
}

/// Reference model: running maximum starting at 0.
fn expected_sends(ticks: &[u32]) -> Vec<u32> {
    let mut last = 0;
    let mut out = Vec::new();
    for &t in ticks {
        if t > last {
            out.push(t);
            last = t;
        }
    }
    out
}

proptest! {
    #[test]
    fn sends_match_running_maximum(ticks in prop::collection::vec(0u32..50, 0..64)) {
        let source = TraceSource { ticks: ticks.clone(), pos: Cell::new(0) };
        let mut relay = RelayLoop::new(source, CountingSink::default(), Duration::ZERO);

        let sent: Vec<u32> = (0..ticks.len())
            .filter_map(|_| match relay.step() {
                Step::Sent { tick, .. } => Some(tick),
                Step::Idle => None,
            })
            .collect();

        prop_assert_eq!(&sent, &expected_sends(&ticks));
        let (_, sink) = relay.into_parts();
        prop_assert!(sink.lengths.iter().all(|&len| len == PAYLOAD_SIZE));
    }

    #[test]
    fn strictly_increasing_trace_sends_every_tick(start in 1u32..1000, steps in 1usize..32) {
        let ticks: Vec<u32> = (0..steps as u32).map(|i| start + i).collect();
        let source = TraceSource { ticks: ticks.clone(), pos: Cell::new(0) };
        let mut relay = RelayLoop::new(source, CountingSink::default(), Duration::ZERO);

        for _ in 0..steps {
            relay.step();
        }
        prop_assert_eq!(relay.stats().frames_sent, steps as u64);
        prop_assert_eq!(relay.last_tick(), *ticks.last().unwrap());
    }
}
