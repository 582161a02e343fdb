use std::ops::{Deref, DerefMut};
use std::sync::OnceLock;

use parking_lot::Mutex;

/// Idle buffers kept by the process-wide pool.
const GLOBAL_MAX_BUFFERS: usize = 64;
/// Returned buffers are shrunk to this capacity (1 MiB).
const GLOBAL_TRIM_CAPACITY: usize = 1 << 20;

static GLOBAL_POOL: OnceLock<BufferPool> = OnceLock::new();

/// Thread-safe store of reusable byte buffers for feed rendering.
///
/// Buffers are cleared when they come back to the pool and again when they
/// are handed out, so a borrower never sees a previous document. A pool can
/// be shared by reference across threads; use [`BufferPool::global`] for the
/// process-wide instance or create a private one for isolation.
///
/// ## Memory Management
///
/// - `max_buffers`: idle buffers beyond this count are dropped on return
/// - `trim_capacity`: returned buffers are shrunk to this capacity
pub struct BufferPool {
    buffers: Mutex<Vec<Vec<u8>>>,
    max_buffers: usize,
    trim_capacity: usize,
}

impl BufferPool {
    /// Create an empty pool.
    ///
    /// # Example
    ///
    /// ```
    /// use podcast_feed::feed::BufferPool;
    ///
    /// // Keep up to 8 idle buffers, trimmed to 256 KiB each
    /// let pool = BufferPool::new(8, 256 * 1024);
    /// let mut buf = pool.get();
    /// buf.extend_from_slice(b"<rss/>");
    /// drop(buf);
    /// assert_eq!(pool.available(), 1);
    /// ```
    #[must_use]
    pub fn new(max_buffers: usize, trim_capacity: usize) -> Self {
        Self {
            buffers: Mutex::new(Vec::with_capacity(max_buffers.min(16))),
            max_buffers,
            trim_capacity,
        }
    }

    /// Process-wide pool, lazily initialized on first call.
    pub fn global() -> &'static BufferPool {
        GLOBAL_POOL.get_or_init(|| BufferPool::new(GLOBAL_MAX_BUFFERS, GLOBAL_TRIM_CAPACITY))
    }

    /// Borrow a cleared buffer. It returns to the pool when the guard drops.
    pub fn get(&self) -> PooledBuffer<'_> {
        let reused = self.buffers.lock().pop();
        let mut buf = match reused {
            Some(buf) => {
                tracing::trace!(capacity = buf.capacity(), "Reusing pooled buffer");
                buf
            }
            None => {
                tracing::trace!("Pool empty, allocating buffer");
                Vec::new()
            }
        };
        buf.clear();
        PooledBuffer { pool: self, buf }
    }

    /// Clear `buf` and keep it for reuse if there is room.
    ///
    /// Buffers that end up with no capacity after trimming, or that arrive
    /// while the pool is full, are dropped.
    pub fn recycle(&self, mut buf: Vec<u8>) {
        buf.clear();
        buf.shrink_to(self.trim_capacity);
        if buf.capacity() == 0 {
            return;
        }

        let mut buffers = self.buffers.lock();
        if buffers.len() < self.max_buffers {
            buffers.push(buf);
        }
    }

    /// Number of idle buffers currently held.
    pub fn available(&self) -> usize {
        self.buffers.lock().len()
    }
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new(GLOBAL_MAX_BUFFERS, GLOBAL_TRIM_CAPACITY)
    }
}

impl std::fmt::Debug for BufferPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BufferPool")
            .field("available", &self.available())
            .field("max_buffers", &self.max_buffers)
            .field("trim_capacity", &self.trim_capacity)
            .finish()
    }
}

/// Buffer borrowed from a [`BufferPool`]; derefs to `Vec<u8>`.
pub struct PooledBuffer<'a> {
    pool: &'a BufferPool,
    buf: Vec<u8>,
}

impl Deref for PooledBuffer<'_> {
    type Target = Vec<u8>;

    fn deref(&self) -> &Self::Target {
        &self.buf
    }
}

impl DerefMut for PooledBuffer<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.buf
    }
}

impl Drop for PooledBuffer<'_> {
    fn drop(&mut self) {
        self.pool.recycle(std::mem::take(&mut self.buf));
    }
}
