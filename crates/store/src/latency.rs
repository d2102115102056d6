use std::time::Duration;

/// Artificial delay applied before every store operation.
///
/// Reads and writes have separate delays. The delay is awaited before the
/// collection lock is taken, so it never holds a lock while sleeping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimulatedLatency {
    read: Duration,
    write: Duration,
}

impl SimulatedLatency {
    /// No delay at all.
    pub const fn none() -> Self {
        Self {
            read: Duration::ZERO,
            write: Duration::ZERO,
        }
    }

    /// Creates a latency profile with explicit read and write delays.
    pub const fn new(read: Duration, write: Duration) -> Self {
        Self { read, write }
    }

    /// Creates a latency profile from millisecond values.
    pub const fn from_millis(read_ms: u64, write_ms: u64) -> Self {
        Self::new(Duration::from_millis(read_ms), Duration::from_millis(write_ms))
    }

    /// Returns the read delay.
    pub fn read(&self) -> Duration {
        self.read
    }

    /// Returns the write delay.
    pub fn write(&self) -> Duration {
        self.write
    }

    /// Returns true if neither reads nor writes are delayed.
    pub fn is_none(&self) -> bool {
        self.read.is_zero() && self.write.is_zero()
    }

    /// Waits for the read delay.
    pub async fn before_read(&self) {
        if !self.read.is_zero() {
            tokio::time::sleep(self.read).await;
        }
    }

    /// Waits for the write delay.
    pub async fn before_write(&self) {
        if !self.write.is_zero() {
            tokio::time::sleep(self.write).await;
        }
    }
}
