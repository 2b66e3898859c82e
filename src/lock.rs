use crate::error::LockError;
use crate::priority::Priority;
use crate::token::*;
use log::{debug, error, trace};
use std::collections::VecDeque;
use std::marker::PhantomData;
use std::mem;
use std::sync::{self, MutexGuard, PoisonError};
use std::thread::{self, ThreadId};
use std::time::{Duration, Instant};

/// A reentrant lock where waiting threads specify a priority class.
///
/// When the lock is released, the longest-waiting `High` thread takes it; only if no `High` thread
/// is waiting does the longest-waiting `Low` thread take it.  A thread which already holds the lock
/// may take it again without blocking, and must release it once per acquisition.
#[derive(Debug, Default)]
pub struct PriorityLock {
    bookkeeping: sync::Mutex<Bookkeeping>,
}

// All state lives behind the bookkeeping mutex, and no critical section can panic halfway through
// an update.  So a poisoned bookkeeping mutex still holds consistent state and we just carry on.
//
// Ownership is handed off directly on release: the releasing thread installs the next waiter as
// holder before waking it.  Hence `holder == None` implies both queues are empty.
#[derive(Debug, Default)]
struct Bookkeeping {
    holder: Option<ThreadId>,
    hold_count: usize,
    high: VecDeque<Waiter>,
    low: VecDeque<Waiter>,
    next_ticket: u64,
}

#[derive(Debug)]
struct Waiter {
    ticket: u64,
    thread: ThreadId,
    wake: WakeToken,
}

impl Bookkeeping {
    /// Take the lock if it's free or already ours.
    fn try_acquire(&mut self, me: ThreadId) -> bool {
        match self.holder {
            Some(holder) if holder == me => {
                self.hold_count += 1;
                true
            }
            Some(_) => false,
            None => {
                self.holder = Some(me);
                self.hold_count = 1;
                true
            }
        }
    }

    fn queue(&mut self, prio: Priority) -> &mut VecDeque<Waiter> {
        match prio {
            Priority::High => &mut self.high,
            Priority::Low => &mut self.low,
        }
    }

    fn enqueue(&mut self, me: ThreadId, prio: Priority) -> (SleepToken, u64) {
        let (sleep_token, wake_token) = create_tokens();
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        self.queue(prio).push_back(Waiter { ticket, thread: me, wake: wake_token });
        (sleep_token, ticket)
    }

    /// Forget a waiter which has given up.  Returns false if it wasn't queued.
    fn remove(&mut self, prio: Priority, ticket: u64) -> bool {
        let queue = self.queue(prio);
        match queue.iter().position(|w| w.ticket == ticket) {
            Some(idx) => {
                queue.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Pass the lock to the next waiter, or free it if there's nobody waiting.
    fn hand_off(&mut self) {
        let next = match self.high.pop_front() {
            Some(w) => Some((w, Priority::High)),
            None => self.low.pop_front().map(|w| (w, Priority::Low)),
        };
        match next {
            Some((waiter, prio)) => {
                debug!("handing lock to {:?} ({}, ticket {})", waiter.thread, prio, waiter.ticket);
                self.holder = Some(waiter.thread);
                self.hold_count = 1;
                waiter.wake.wake();
            }
            None => {
                self.holder = None;
                self.hold_count = 0;
            }
        }
    }
}

impl PriorityLock {
    /// Creates a new lock in an unlocked state ready for use.
    pub fn new() -> PriorityLock {
        PriorityLock { bookkeeping: sync::Mutex::new(Bookkeeping::default()) }
    }

    fn bookkeeping(&self) -> MutexGuard<'_, Bookkeeping> {
        self.bookkeeping.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Takes the lock.  If another thread is holding it, this function will block until the lock
    /// is handed to us.
    ///
    /// If the current thread already holds the lock, this returns immediately whatever `prio` is.
    pub fn lock(&self, prio: Priority) {
        let me = thread::current().id();
        let mut bk = self.bookkeeping();
        if bk.try_acquire(me) {
            trace!("{:?} took the lock ({}), depth {}", me, prio, bk.hold_count);
            return;
        }
        let (sleep_token, ticket) = bk.enqueue(me, prio);
        trace!("{:?} waiting for the lock ({}, ticket {})", me, prio, ticket);
        mem::drop(bk);
        // We're only woken once the lock is ours.
        sleep_token.sleep();
    }

    /// Attempts to take the lock without blocking.  Succeeds if the lock is free or already held
    /// by the current thread.
    pub fn try_lock(&self) -> Result<(), LockError> {
        let me = thread::current().id();
        if self.bookkeeping().try_acquire(me) {
            Ok(())
        } else {
            Err(LockError::WouldBlock)
        }
    }

    /// Like `lock`, but give up after `timeout`.
    ///
    /// A thread which gives up is removed from the queue, leaving the lock as if it had never
    /// asked.  If the lock is handed over just as the timeout expires, we keep it.
    pub fn try_lock_for(&self, prio: Priority, timeout: Duration) -> Result<(), LockError> {
        let deadline = match Instant::now().checked_add(timeout) {
            Some(deadline) => deadline,
            None => {
                self.lock(prio);
                return Ok(());
            }
        };
        let me = thread::current().id();
        let mut bk = self.bookkeeping();
        if bk.try_acquire(me) {
            return Ok(());
        }
        if timeout.is_zero() {
            return Err(LockError::TimedOut(timeout));
        }
        let (sleep_token, ticket) = bk.enqueue(me, prio);
        mem::drop(bk);
        if sleep_token.sleep_until(deadline) {
            return Ok(());
        }
        // Tokens are only signalled under the bookkeeping lock, so this check can't race.
        let mut bk = self.bookkeeping();
        if sleep_token.is_woken() {
            return Ok(());
        }
        let removed = bk.remove(prio, ticket);
        debug_assert!(removed, "an unsignalled waiter must still be queued");
        debug!("{:?} gave up waiting after {:?} ({}, ticket {})", me, timeout, prio, ticket);
        Err(LockError::TimedOut(timeout))
    }

    /// Releases one level of the current thread's hold on the lock.
    ///
    /// When the last level is released, the highest-priority, longest-waiting thread (if any)
    /// receives the lock.  Calling this from a thread which doesn't hold the lock returns
    /// `LockError::NotHeld` and changes nothing.
    pub fn unlock(&self) -> Result<(), LockError> {
        let me = thread::current().id();
        let mut bk = self.bookkeeping();
        if bk.holder != Some(me) {
            return Err(LockError::NotHeld);
        }
        bk.hold_count -= 1;
        if bk.hold_count == 0 {
            bk.hand_off();
        }
        Ok(())
    }

    /// Takes the lock and returns a guard which releases it when dropped.
    pub fn guard(&self, prio: Priority) -> PriorityGuard<'_> {
        self.lock(prio);
        PriorityGuard::new(self)
    }

    /// Like `guard`, but give up after `timeout`.
    pub fn try_guard_for(
        &self,
        prio: Priority,
        timeout: Duration,
    ) -> Result<PriorityGuard<'_>, LockError> {
        self.try_lock_for(prio, timeout).map(|()| PriorityGuard::new(self))
    }

    /// Is any thread holding the lock?
    pub fn is_locked(&self) -> bool {
        self.bookkeeping().holder.is_some()
    }

    /// Does the current thread hold the lock?
    pub fn is_held_by_current_thread(&self) -> bool {
        self.bookkeeping().holder == Some(thread::current().id())
    }

    /// How many times the current thread has taken the lock without releasing it.
    pub fn hold_count(&self) -> usize {
        let bk = self.bookkeeping();
        if bk.holder == Some(thread::current().id()) {
            bk.hold_count
        } else {
            0
        }
    }

    /// The number of threads blocked waiting for the lock.
    pub fn waiting(&self) -> usize {
        let bk = self.bookkeeping();
        bk.high.len() + bk.low.len()
    }

    /// The number of threads of class `prio` blocked waiting for the lock.
    pub fn waiting_with(&self, prio: Priority) -> usize {
        self.bookkeeping().queue(prio).len()
    }
}

/// An RAII guard.  Releases one level of the lock when dropped.
///
/// The guard is tied to the thread which took the lock, so it is not `Send`.
#[derive(Debug)]
pub struct PriorityGuard<'a> {
    lock: &'a PriorityLock,
    _not_send: PhantomData<*const ()>,
}

impl<'a> PriorityGuard<'a> {
    fn new(lock: &'a PriorityLock) -> PriorityGuard<'a> {
        PriorityGuard { lock, _not_send: PhantomData }
    }
}

impl<'a> Drop for PriorityGuard<'a> {
    fn drop(&mut self) {
        if let Err(e) = self.lock.unlock() {
            error!("dropping priority guard: {}", e);
        }
    }
}
