//! Tick-driven relay loop.
//!
//! Polls the segment's tick and, whenever it has advanced past the last
//! relayed value, sends the first [`PAYLOAD_SIZE`] bytes of the segment as
//! one datagram. Unchanged ticks cost one 4-byte read per poll.
//!
//! The loop only sees its two collaborators through [`LinkSource`] and
//! [`DatagramSink`], so tests drive it with scripted fakes.

use link::consts::PAYLOAD_SIZE;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{MappingError, RelayResult, SocketError};
use crate::segment::SharedSegment;
use crate::udp::UdpChannel;

/// Read side of the relay: where ticks and snapshots come from.
pub trait LinkSource {
    /// Current tick.
    fn tick(&self) -> u32;

    /// Copy the relayed prefix into `buf`.
    fn snapshot(&self, buf: &mut [u8; PAYLOAD_SIZE]);
}

/// Write side of the relay: where snapshots go.
pub trait DatagramSink {
    /// Send one datagram, fire-and-forget.
    fn send(&mut self, payload: &[u8]) -> io::Result<usize>;
}

impl LinkSource for SharedSegment {
    fn tick(&self) -> u32 {
        SharedSegment::tick(self)
    }

    fn snapshot(&self, buf: &mut [u8; PAYLOAD_SIZE]) {
        SharedSegment::snapshot(self, buf)
    }
}

impl DatagramSink for UdpChannel {
    fn send(&mut self, payload: &[u8]) -> io::Result<usize> {
        UdpChannel::send(self, payload)
    }
}

/// Outcome of one loop iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Tick not newer than the last relayed one.
    Idle,
    /// Snapshot sent (or attempted) for this tick.
    Sent {
        /// Tick that triggered the send.
        tick: u32,
        /// Whether the socket accepted the datagram.
        delivered: bool,
    },
}

/// Relay counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelayStats {
    /// Loop iterations executed.
    pub iterations: u64,
    /// Datagrams handed to the socket.
    pub frames_sent: u64,
    /// Sends the socket rejected.
    pub send_failures: u64,
}

/// Change-detecting relay from a [`LinkSource`] to a [`DatagramSink`].
pub struct RelayLoop<S, D> {
    source: S,
    sink: D,
    poll_interval: Duration,
    last_tick: u32,
    regressed: bool,
    stats: RelayStats,
    buffer: [u8; PAYLOAD_SIZE],
}

impl<S: LinkSource, D: DatagramSink> RelayLoop<S, D> {
    /// Create a relay with `last_tick = 0`.
    pub fn new(source: S, sink: D, poll_interval: Duration) -> Self {
        Self {
            source,
            sink,
            poll_interval,
            last_tick: 0,
            regressed: false,
            stats: RelayStats::default(),
            buffer: [0u8; PAYLOAD_SIZE],
        }
    }

    /// Run one iteration without sleeping.
    ///
    /// A send failure still advances `last_tick`: the frame is dropped and
    /// the next tick supersedes it.
    pub fn step(&mut self) -> Step {
        self.stats.iterations += 1;
        let tick = self.source.tick();

        if tick <= self.last_tick {
            if tick < self.last_tick && !self.regressed {
                self.regressed = true;
                warn!(
                    "Tick moved backwards ({} -> {}); waiting until it passes {}",
                    self.last_tick, tick, self.last_tick
                );
            }
            return Step::Idle;
        }

        self.source.snapshot(&mut self.buffer);
        let delivered = match self.sink.send(&self.buffer) {
            Ok(_) => {
                self.stats.frames_sent += 1;
                if self.stats.frames_sent % 1000 == 0 {
                    debug!(
                        "Relay: {} frames sent, {} send failures, last tick {}",
                        self.stats.frames_sent, self.stats.send_failures, tick
                    );
                }
                true
            }
            Err(e) => {
                self.stats.send_failures += 1;
                if self.stats.send_failures <= 10 || self.stats.send_failures % 1000 == 0 {
                    debug!(
                        "Send failure #{} at tick {}: {}",
                        self.stats.send_failures, tick, e
                    );
                }
                false
            }
        };

        self.last_tick = tick;
        self.regressed = false;
        Step::Sent { tick, delivered }
    }

    /// Poll until `running` is cleared.
    pub fn run(&mut self, running: &AtomicBool) {
        info!(
            "Starting relay loop (poll_interval={}ms, payload={} bytes)",
            self.poll_interval.as_millis(),
            PAYLOAD_SIZE
        );
        if self.source.tick() == 0 {
            info!("Tick is 0. If it stays at 0, make sure the publishing application is running");
        }

        while running.load(Ordering::SeqCst) {
            self.step();
            std::thread::sleep(self.poll_interval);
        }

        info!(
            "Relay loop stopped after {} iterations ({} frames sent, {} send failures)",
            self.stats.iterations, self.stats.frames_sent, self.stats.send_failures
        );
    }

    /// Last relayed tick.
    pub fn last_tick(&self) -> u32 {
        self.last_tick
    }

    /// Counters so far.
    pub fn stats(&self) -> &RelayStats {
        &self.stats
    }

    /// Configured delay between polls.
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Give back the source and sink.
    pub fn into_parts(self) -> (S, D) {
        (self.source, self.sink)
    }
}

/// Initialize the segment, then the channel.
///
/// The channel is only opened once the segment is mapped; a mapping failure
/// returns before any socket exists.
pub fn bootstrap<S, D>(
    open_segment: impl FnOnce() -> Result<S, MappingError>,
    open_channel: impl FnOnce() -> Result<D, SocketError>,
) -> RelayResult<(S, D)> {
    let segment = open_segment()?;
    let channel = open_channel()?;
    Ok((segment, channel))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Source that returns one scripted tick per call, repeating the last.
    struct ScriptedSource {
        ticks: Vec<u32>,
        pos: Cell<usize>,
    }

    impl ScriptedSource {
        fn new(ticks: &[u32]) -> Self {
            Self {
                ticks: ticks.to_vec(),
                pos: Cell::new(0),
            }
        }
    }

    impl LinkSource for ScriptedSource {
        fn tick(&self) -> u32 {
            let i = self.pos.get();
            self.pos.set(i + 1);
            self.ticks[i.min(self.ticks.len() - 1)]
        }

        fn snapshot(&self, buf: &mut [u8; PAYLOAD_SIZE]) {
            let i = self.pos.get().saturating_sub(1).min(self.ticks.len() - 1);
            buf.fill(0);
            buf[4..8].copy_from_slice(&self.ticks[i].to_ne_bytes());
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        sent: Vec<Vec<u8>>,
        fail: bool,
    }

    impl DatagramSink for RecordingSink {
        fn send(&mut self, payload: &[u8]) -> io::Result<usize> {
            if self.fail {
                return Err(io::Error::from(io::ErrorKind::WouldBlock));
            }
            self.sent.push(payload.to_vec());
            Ok(payload.len())
        }
    }

    fn sent_ticks(sink: &RecordingSink) -> Vec<u32> {
        sink.sent
            .iter()
            .map(|p| u32::from_ne_bytes([p[4], p[5], p[6], p[7]]))
            .collect()
    }

    #[test]
    fn sends_once_per_tick_change() {
        let source = ScriptedSource::new(&[0, 0, 5, 5, 5, 9]);
        let mut relay = RelayLoop::new(source, RecordingSink::default(), Duration::ZERO);

        let steps: Vec<Step> = (0..6).map(|_| relay.step()).collect();
        assert_eq!(steps[0], Step::Idle);
        assert_eq!(steps[1], Step::Idle);
        assert_eq!(steps[2], Step::Sent { tick: 5, delivered: true });
        assert_eq!(steps[3], Step::Idle);
        assert_eq!(steps[4], Step::Idle);
        assert_eq!(steps[5], Step::Sent { tick: 9, delivered: true });

        assert_eq!(relay.stats().frames_sent, 2);
        assert_eq!(relay.stats().iterations, 6);
        let (_, sink) = relay.into_parts();
        assert_eq!(sent_ticks(&sink), vec![5, 9]);
    }

    #[test]
    fn every_datagram_is_payload_sized() {
        let source = ScriptedSource::new(&[1, 2, 3]);
        let mut relay = RelayLoop::new(source, RecordingSink::default(), Duration::ZERO);
        for _ in 0..3 {
            relay.step();
        }
        let (_, sink) = relay.into_parts();
        assert_eq!(sink.sent.len(), 3);
        assert!(sink.sent.iter().all(|p| p.len() == PAYLOAD_SIZE));
    }

    #[test]
    fn zero_tick_never_sends() {
        let source = ScriptedSource::new(&[0]);
        let mut relay = RelayLoop::new(source, RecordingSink::default(), Duration::ZERO);
        for _ in 0..10 {
            assert_eq!(relay.step(), Step::Idle);
        }
        assert_eq!(relay.last_tick(), 0);
    }

    #[test]
    fn backwards_tick_is_ignored_until_it_passes_last() {
        let source = ScriptedSource::new(&[10, 3, 4, 10, 11]);
        let mut relay = RelayLoop::new(source, RecordingSink::default(), Duration::ZERO);
        for _ in 0..5 {
            relay.step();
        }
        let (_, sink) = relay.into_parts();
        assert_eq!(sent_ticks(&sink), vec![10, 11]);
    }

    #[test]
    fn send_failure_still_advances_tick() {
        let source = ScriptedSource::new(&[1, 1, 2]);
        let sink = RecordingSink {
            fail: true,
            ..Default::default()
        };
        let mut relay = RelayLoop::new(source, sink, Duration::ZERO);

        assert_eq!(relay.step(), Step::Sent { tick: 1, delivered: false });
        assert_eq!(relay.step(), Step::Idle);
        assert_eq!(relay.step(), Step::Sent { tick: 2, delivered: false });
        assert_eq!(relay.stats().send_failures, 2);
        assert_eq!(relay.stats().frames_sent, 0);
        assert_eq!(relay.last_tick(), 2);
    }

    #[test]
    fn run_returns_immediately_when_not_running() {
        let source = ScriptedSource::new(&[1]);
        let mut relay = RelayLoop::new(source, RecordingSink::default(), Duration::ZERO);
        let running = AtomicBool::new(false);
        relay.run(&running);
        assert_eq!(relay.stats().iterations, 0);
    }

    #[test]
    fn bootstrap_skips_socket_when_mapping_fails() {
        let socket_opened = Cell::new(false);
        let result = bootstrap::<(), ()>(
            || {
                Err(MappingError::TooSmall {
                    name: "/test".to_string(),
                    actual: 0,
                    expected: 5460,
                    source: io::Error::from(io::ErrorKind::PermissionDenied),
                })
            },
            || {
                socket_opened.set(true);
                Ok(())
            },
        );

        let err = result.unwrap_err();
        assert_eq!(err.exit_code(), 1);
        assert!(!socket_opened.get());
    }

    #[test]
    fn bootstrap_reports_socket_failure() {
        let result = bootstrap::<(), ()>(
            || Ok(()),
            || {
                Err(SocketError::NonBlocking {
                    source: io::Error::other("no sockets"),
                })
            },
        );
        assert_eq!(result.unwrap_err().exit_code(), 2);
    }
}
