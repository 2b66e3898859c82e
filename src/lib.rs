/*!
A reentrant lock where waiting threads specify a priority class.

The lock has no data of its own: it guards whatever resource its callers agree it guards.  `lock`
takes a `Priority`.  If threads are waiting when the lock is released, the one which has waited
longest among the `High` waiters receives it; `Low` waiters only get a look-in when no `High`
waiter is queued.  The thread holding the lock may take it again without blocking.

```
# extern crate priolock;
# extern crate rand;
# fn main() {
use priolock::{Priority, PriorityLock};
use rand::{thread_rng, Rng};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

const N: usize = 10;

let lock = Arc::new(PriorityLock::new());
let order = Arc::new(Mutex::new(Vec::new()));
lock.lock(Priority::Low);

let mut tids = Vec::new();
for _ in 0..N {
    let (lock, order) = (lock.clone(), order.clone());
    tids.push(thread::spawn(move || {
        let prio = Priority::from(thread_rng().gen::<bool>());
        let _guard = lock.guard(prio);            // wait on the lock
        order.lock().unwrap().push(prio);         // record our class
    }));
}

// Give the threads time to spawn and wait on the lock
while lock.waiting() < N { thread::sleep(Duration::from_millis(1)); }

lock.unlock().unwrap();          // go go go!
for t in tids { t.join().unwrap(); }

// Every high-priority thread went before every low-priority one
let order = order.lock().unwrap();
assert_eq!(order.len(), N);
let first_low = order.iter().position(|p| !p.is_high()).unwrap_or(N);
assert!(order[first_low..].iter().all(|p| !p.is_high()));
# }
```

## Releasing

`unlock` must be called once per successful `lock` by the same thread.  Unlocking from a thread
which doesn't hold the lock is reported as `LockError::NotHeld` and leaves the lock untouched.
`guard` returns an RAII guard which does this for you.

## Poisoning

Priority locks don't support poisoning; they are *not* poisoned if the thread holding the lock
panics.

*/

mod error;
mod lock;
mod priority;
mod token;

pub use error::LockError;
pub use lock::{PriorityGuard, PriorityLock};
pub use priority::Priority;
