use std::time::Duration;
use thiserror::Error;

/// The ways in which taking or releasing a `PriorityLock` can fail.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockError {
    /// `unlock` was called by a thread which doesn't hold the lock.
    #[error("the current thread does not hold the lock")]
    NotHeld,

    /// The lock is held by another thread.
    #[error("the lock is held by another thread")]
    WouldBlock,

    /// A timed acquisition gave up before the lock was granted.
    #[error("timed out after {0:?} waiting for the lock")]
    TimedOut(Duration),
}
