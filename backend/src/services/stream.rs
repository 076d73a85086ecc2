//! Synthetic data stream.
//!
//! Each stream request gets its own [`StreamSession`], running on its own
//! tokio task. The session sleeps for a random interval, appends one sample
//! line to a pending buffer, and now and then flushes a random prefix of that
//! buffer into a channel that feeds the HTTP response body. The session ends
//! when its deadline passes (after flushing whatever is still pending) or as
//! soon as the receiving side goes away.
//!
//! # Flush policy
//!
//! After every sample the session flushes with probability
//! `pending / (pending + saturation_bytes)`, so a growing buffer becomes ever
//! more likely to be written. The flushed share of the buffer is the product of
//! three independent uniform integers in `[0, 100]`, scaled to `[0, 1]`. Small
//! flushes are common and whole-buffer flushes rare. All randomness comes from
//! the session's `Rng`, so a seeded generator reproduces a session exactly
//! (up to wall-clock sample values).

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::ingest::lenient_f64;

pub const STREAM_CONTENT_TYPE: &str = "application/json; charset=utf-8";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StreamError {
    #[error("stream receiver disconnected")]
    Disconnected,
    #[error("failed to encode sample: {0}")]
    Encode(String),
}

/// Tunables shared by every session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamSettings {
    /// `k` in `y = sin(k * elapsed_ms)`.
    pub angular_frequency: f64,
    pub min_sleep_ms: u64,
    /// Inclusive upper bound of the sleep between samples.
    pub max_sleep_ms: u64,
    /// Pending size at which a flush becomes a coin toss.
    pub flush_saturation_bytes: usize,
    /// Chunks buffered between the session task and the response body.
    pub channel_capacity: usize,
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            angular_frequency: 5e-3,
            min_sleep_ms: 100,
            max_sleep_ms: 199,
            flush_saturation_bytes: 256,
            channel_capacity: 16,
        }
    }
}

/// Session length from the raw `t` parameter, in seconds.
///
/// Missing, unparsable, non-positive or out-of-range values mean the session
/// runs until the peer disconnects.
pub fn session_duration(t: Option<&str>) -> Option<Duration> {
    let seconds = lenient_f64(t?);
    if seconds > 0.0 {
        Duration::try_from_secs_f64(seconds).ok()
    } else {
        None
    }
}

/// One synthetic data point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Wall clock, milliseconds since the Unix epoch.
    pub x: f64,
    pub y: f64,
}

impl Sample {
    pub fn new(now_ms: f64, elapsed_ms: f64, angular_frequency: f64) -> Self {
        Self {
            x: now_ms,
            y: (angular_frequency * elapsed_ms).sin(),
        }
    }

    /// Single-line JSON followed by `\n`.
    pub fn to_line(&self) -> Result<String, StreamError> {
        let mut line =
            serde_json::to_string(self).map_err(|e| StreamError::Encode(e.to_string()))?;
        line.push('\n');
        Ok(line)
    }
}

/// Decides when, and how much of, the pending buffer gets written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlushPolicy {
    pub saturation_bytes: usize,
}

impl FlushPolicy {
    pub fn new(saturation_bytes: usize) -> Self {
        Self { saturation_bytes }
    }

    /// Product of three uniform picks over `[0, 100]`, scaled to `[0, 1]`.
    pub fn fraction<R: Rng>(rng: &mut R) -> f64 {
        let a: u32 = rng.gen_range(0..=100);
        let b: u32 = rng.gen_range(0..=100);
        let c: u32 = rng.gen_range(0..=100);
        f64::from(a * b * c) / 1e6
    }

    /// Number of leading bytes of a `pending`-byte buffer to write now.
    pub fn flush_len<R: Rng>(&self, pending: usize, rng: &mut R) -> usize {
        if pending == 0 {
            return 0;
        }
        let probability = pending as f64 / (pending + self.saturation_bytes) as f64;
        if !rng.gen_bool(probability) {
            return 0;
        }
        let share = (pending as f64 * Self::fraction(rng)).ceil() as usize;
        share.min(pending)
    }
}

/// What a finished session did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub samples: usize,
    pub bytes_sent: usize,
    pub flushes: usize,
    pub elapsed: Duration,
}

/// Per-request stream state. Never shared between requests.
pub struct StreamSession<R> {
    id: String,
    settings: StreamSettings,
    policy: FlushPolicy,
    rng: R,
    started: Instant,
    deadline: Option<Instant>,
    pending: String,
    last_x: f64,
    samples: usize,
    bytes_sent: usize,
    flushes: usize,
}

impl<R: Rng + Send> StreamSession<R> {
    /// `duration` of `None` means no deadline.
    pub fn new(
        id: impl Into<String>,
        settings: StreamSettings,
        duration: Option<Duration>,
        rng: R,
    ) -> Self {
        let started = Instant::now();
        Self {
            id: id.into(),
            policy: FlushPolicy::new(settings.flush_saturation_bytes),
            settings,
            rng,
            started,
            deadline: duration.and_then(|d| started.checked_add(d)),
            pending: String::new(),
            last_x: f64::MIN,
            samples: 0,
            bytes_sent: 0,
            flushes: 0,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    fn expired(&self) -> bool {
        self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }

    fn next_sleep(&mut self) -> Duration {
        let low = self.settings.min_sleep_ms;
        let high = self.settings.max_sleep_ms.max(low);
        Duration::from_millis(self.rng.gen_range(low..=high))
    }

    fn next_sample(&mut self) -> Sample {
        let now_ms = chrono::Utc::now().timestamp_micros() as f64 / 1000.0;
        // Wall clock may step backwards; samples never do.
        let x = now_ms.max(self.last_x);
        self.last_x = x;
        let elapsed_ms = self.started.elapsed().as_secs_f64() * 1000.0;
        Sample::new(x, elapsed_ms, self.settings.angular_frequency)
    }

    async fn flush(&mut self, len: usize, tx: &mpsc::Sender<String>) -> Result<(), StreamError> {
        let chunk: String = self.pending.drain(..len).collect();
        let size = chunk.len();
        tx.send(chunk).await.map_err(|_| StreamError::Disconnected)?;
        self.bytes_sent += size;
        self.flushes += 1;
        Ok(())
    }

    /// Emit samples into `tx` until the deadline passes or `tx` is closed.
    pub async fn run(mut self, tx: mpsc::Sender<String>) -> Result<SessionSummary, StreamError> {
        while !self.expired() {
            if tx.is_closed() {
                return Err(StreamError::Disconnected);
            }
            let pause = self.next_sleep();
            tokio::time::sleep(pause).await;

            let line = self.next_sample().to_line()?;
            self.pending.push_str(&line);
            self.samples += 1;

            // Sample lines are ASCII, so any byte count is a char boundary.
            let len = self.policy.flush_len(self.pending.len(), &mut self.rng);
            if len > 0 {
                self.flush(len, &tx).await?;
            }
        }

        if !self.pending.is_empty() {
            self.flush(self.pending.len(), &tx).await?;
        }

        Ok(SessionSummary {
            samples: self.samples,
            bytes_sent: self.bytes_sent,
            flushes: self.flushes,
            elapsed: self.started.elapsed(),
        })
    }
}

/// Start `session` on its own task and return the receiving end of its output.
///
/// The task logs how the session ended; errors never leave the task.
pub fn spawn_session<R>(session: StreamSession<R>, capacity: usize) -> mpsc::Receiver<String>
where
    R: Rng + Send + 'static,
{
    start_session(session, capacity).0
}

/// Like [`spawn_session`], also returning the handle of the session task.
pub fn start_session<R>(
    session: StreamSession<R>,
    capacity: usize,
) -> (mpsc::Receiver<String>, JoinHandle<()>)
where
    R: Rng + Send + 'static,
{
    let (tx, rx) = mpsc::channel(capacity.max(1));
    let handle = tokio::spawn(async move {
        let id = session.id().to_string();
        match session.run(tx).await {
            Ok(summary) => log::info!(
                "stream session {} finished: {} samples, {} bytes in {} flushes over {:?}",
                id,
                summary.samples,
                summary.bytes_sent,
                summary.flushes,
                summary.elapsed
            ),
            Err(e) => log::warn!("stream session {} aborted: {}", id, e),
        }
    });
    (rx, handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_session_duration() {
        assert_eq!(session_duration(Some("0.2")), Some(Duration::from_millis(200)));
        assert_eq!(session_duration(Some("3")), Some(Duration::from_secs(3)));
        assert_eq!(session_duration(Some("0")), None);
        assert_eq!(session_duration(Some("-1")), None);
        assert_eq!(session_duration(Some("soon")), None);
        assert_eq!(session_duration(None), None);
    }

    #[test]
    fn test_sample_line_shape() {
        let line = Sample::new(1000.0, 0.0, 5e-3).to_line().unwrap();
        assert_eq!(line, "{\"x\":1000.0,\"y\":0.0}\n");

        // Non-finite values still make one JSON object per line.
        let line = Sample::new(f64::NAN, 0.0, 5e-3).to_line().unwrap();
        assert_eq!(line.matches('\n').count(), 1);
        let value: serde_json::Value = serde_json::from_str(line.trim_end()).unwrap();
        assert!(value.is_object());
    }

    #[test]
    fn test_sample_follows_sine() {
        let elapsed = std::f64::consts::PI / 2.0 / 5e-3;
        let sample = Sample::new(0.0, elapsed, 5e-3);
        assert!((sample.y - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_fraction_is_product_of_three_uniforms() {
        let mut rng = StdRng::seed_from_u64(7);
        let n = 20_000;
        let draws: Vec<f64> = (0..n).map(|_| FlushPolicy::fraction(&mut rng)).collect();
        assert!(draws.iter().all(|f| (0.0..=1.0).contains(f)));

        // E[abc] = 0.5^3; a single uniform would sit near 0.5.
        let mean = draws.iter().sum::<f64>() / n as f64;
        assert!((0.11..0.14).contains(&mean), "mean {}", mean);
        let small = draws.iter().filter(|f| **f < 0.1).count() as f64 / n as f64;
        assert!(small > 0.4, "share of small flushes {}", small);
    }

    #[test]
    fn test_flush_len_bounds() {
        let mut rng = StdRng::seed_from_u64(11);
        let policy = FlushPolicy::new(256);
        assert_eq!(policy.flush_len(0, &mut rng), 0);
        for pending in [1usize, 10, 100, 1000, 10_000] {
            for _ in 0..200 {
                assert!(policy.flush_len(pending, &mut rng) <= pending);
            }
        }
    }

    #[test]
    fn test_flush_probability_grows_with_buffer() {
        let mut rng = StdRng::seed_from_u64(3);
        let policy = FlushPolicy::new(256);
        let flushed = |pending: usize, rng: &mut StdRng| {
            (0..2000).filter(|_| policy.flush_len(pending, rng) > 0).count()
        };
        let small = flushed(16, &mut rng);
        let large = flushed(4096, &mut rng);
        assert!(small < large, "{} vs {}", small, large);
    }

    #[test]
    fn test_seeded_policy_is_reproducible() {
        let policy = FlushPolicy::new(64);
        let run = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            (1..200).map(|p| policy.flush_len(p, &mut rng)).collect::<Vec<_>>()
        };
        assert_eq!(run(42), run(42));
    }

    #[tokio::test]
    async fn test_bounded_session_terminates_and_sends_everything() {
        let started = Instant::now();
        let session = StreamSession::new(
            "bounded",
            StreamSettings::default(),
            Some(Duration::from_millis(200)),
            StdRng::seed_from_u64(1),
        );
        let (tx, mut rx) = mpsc::channel(4);
        let handle = tokio::spawn(session.run(tx));

        let mut received = String::new();
        while let Some(chunk) = rx.recv().await {
            received.push_str(&chunk);
        }
        let summary = handle.await.unwrap().unwrap();
        let elapsed = started.elapsed();

        assert!(elapsed >= Duration::from_millis(200));
        // One in-flight sleep of at most 199ms, plus scheduling slack.
        assert!(elapsed < Duration::from_millis(550), "took {:?}", elapsed);

        assert_eq!(received.len(), summary.bytes_sent);
        assert!(received.ends_with('\n'));
        let samples: Vec<Sample> = received
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(samples.len(), summary.samples);
        assert!(!samples.is_empty());
        assert!(samples.windows(2).all(|w| w[0].x <= w[1].x));
        assert!(samples.iter().all(|s| (-1.0..=1.0).contains(&s.y)));
    }

    #[tokio::test]
    async fn test_session_stops_when_receiver_is_dropped() {
        let session = StreamSession::new(
            "unbounded",
            StreamSettings::default(),
            None,
            StdRng::seed_from_u64(5),
        );
        let (tx, rx) = mpsc::channel(1);
        drop(rx);

        let result = tokio::time::timeout(Duration::from_secs(2), session.run(tx)).await;
        assert_eq!(result.unwrap().unwrap_err(), StreamError::Disconnected);
    }

    #[tokio::test]
    async fn test_spawned_session_stops_after_client_hangs_up() {
        let settings = StreamSettings {
            flush_saturation_bytes: 0,
            ..StreamSettings::default()
        };
        let session = StreamSession::new("spawned", settings, None, StdRng::seed_from_u64(9));
        let (mut rx, handle) = start_session(session, 1);

        let first = tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                match rx.recv().await {
                    Some(chunk) if !chunk.is_empty() => break chunk,
                    Some(_) => continue,
                    None => panic!("session ended early"),
                }
            }
        })
        .await
        .unwrap();
        assert!(!first.is_empty());
        drop(rx);

        // At most one sleep of max_sleep_ms before the closed channel is noticed.
        tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .expect("session task should stop after the receiver is dropped")
            .unwrap();
    }
}
