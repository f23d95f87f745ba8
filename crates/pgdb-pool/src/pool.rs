//! Session pool implementation.

use parking_lot::{Condvar, Mutex, MutexGuard};

use pgdb_client::backend::{Connector, Session};

use crate::config::PoolConfig;
use crate::error::PoolError;

/// A fixed-capacity pool of long-lived database sessions.
///
/// All sessions are opened eagerly by [`Pool::new`]; the pool never opens,
/// closes, or replaces a session afterwards. Free slots are tracked as a
/// LIFO stack of slot ids guarded by a single lock, which doubles as the
/// mutual-exclusion permit set: an id is either on the stack or held by
/// exactly one [`PooledSession`] guard.
pub struct Pool<S> {
    /// One session per slot. The checkout protocol hands each slot to at
    /// most one caller, so these locks are never contended; they exist to
    /// hand out `&mut` access without unsafe code.
    slots: Box<[Mutex<S>]>,
    free: Mutex<Vec<usize>>,
    released: Condvar,
    capacity: usize,
}

impl<S: Session> Pool<S> {
    /// Open `config.capacity` sessions against `conninfo` and build the
    /// pool.
    ///
    /// Fails on the first session that cannot be opened; there is no
    /// degraded-capacity mode. Sessions opened before the failing slot are
    /// closed when the error is returned.
    pub fn new<C>(connector: &C, conninfo: &str, config: PoolConfig) -> Result<Self, PoolError>
    where
        C: Connector<Session = S>,
    {
        config.validate()?;
        let capacity = config.capacity;

        let mut slots = Vec::with_capacity(capacity);
        for slot in 0..capacity {
            let session = connector
                .connect(conninfo)
                .map_err(|source| PoolError::Setup { slot, source })?;
            slots.push(Mutex::new(session));
        }

        tracing::info!(capacity, "session pool initialized");
        Ok(Self {
            slots: slots.into_boxed_slice(),
            free: Mutex::new((0..capacity).collect()),
            released: Condvar::new(),
            capacity,
        })
    }

    /// Check out a session, blocking until one is free.
    ///
    /// There is no timeout and no cancellation: a caller that enters while
    /// every slot is checked out waits until some other caller releases
    /// one. Waiters are not served in arrival order, and the most recently
    /// released slot is reused first.
    ///
    /// The returned guard gives exclusive access to the session and puts
    /// the slot back when dropped.
    pub fn acquire(&self) -> PooledSession<'_, S> {
        let id = {
            let mut free = self.free.lock();
            loop {
                if let Some(id) = free.pop() {
                    break id;
                }
                self.released.wait(&mut free);
            }
        };
        tracing::debug!(slot = id, "session checked out");

        // Uncontended: the id came off the free stack, so no guard for
        // this slot exists.
        PooledSession {
            pool: self,
            id,
            session: Some(self.slots[id].lock()),
        }
    }

    /// Execute one fire-and-forget statement on a pooled session.
    ///
    /// Blocks until a session is free, runs `sql` expecting no rows, and
    /// returns the slot unconditionally. A statement failure is logged and
    /// swallowed — pooled writes never surface errors and are not retried.
    pub fn write(&self, sql: &str) {
        let mut session = self.acquire();
        match session.execute(sql, false) {
            Ok(raw) => drop(raw),
            Err(error) => tracing::error!(%error, sql, "pooled write failed"),
        }
    }

    /// Number of slots in the pool.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get the current pool status.
    #[must_use]
    pub fn status(&self) -> PoolStatus {
        let available = self.free.lock().len();
        PoolStatus {
            available,
            in_use: self.capacity - available,
            capacity: self.capacity,
        }
    }
}

/// Status information about the pool.
#[derive(Debug, Clone, Copy)]
pub struct PoolStatus {
    /// Number of free slots.
    pub available: usize,
    /// Number of slots currently checked out.
    pub in_use: usize,
    /// Total number of slots.
    pub capacity: usize,
}

/// A session checked out from the pool.
///
/// Dereferences to the underlying [`Session`]. When dropped, the slot goes
/// back on the free stack and one waiter is woken, so release happens
/// exactly once per checkout — on failure paths included.
pub struct PooledSession<'a, S: Session> {
    pool: &'a Pool<S>,
    id: usize,
    /// Present from construction until drop.
    session: Option<MutexGuard<'a, S>>,
}

impl<S: Session> PooledSession<'_, S> {
    /// The slot id this guard holds.
    #[must_use]
    pub fn slot(&self) -> usize {
        self.id
    }
}

impl<S: Session> std::ops::Deref for PooledSession<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        match &self.session {
            Some(guard) => guard,
            None => unreachable!("slot guard alive until drop"),
        }
    }
}

impl<S: Session> std::ops::DerefMut for PooledSession<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        match &mut self.session {
            Some(guard) => guard,
            None => unreachable!("slot guard alive until drop"),
        }
    }
}

impl<S: Session> Drop for PooledSession<'_, S> {
    fn drop(&mut self) {
        // Release the slot lock before publishing the id.
        self.session = None;
        self.pool.free.lock().push(self.id);
        self.pool.released.notify_one();
        tracing::debug!(slot = self.id, "session returned");
    }
}
