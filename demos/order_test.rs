extern crate env_logger;
extern crate priolock;
extern crate rand;

use priolock::{Priority, PriorityLock};
use rand::{thread_rng, Rng};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn main() {
    env_logger::init();
    let lock = Arc::new(PriorityLock::new());
    lock.lock(Priority::Low);  // take the lock
    let mut tids = vec![];
    for n in 0..20 {
        let lock = lock.clone();
        tids.push(thread::spawn(move || {
            let p = Priority::from(thread_rng().gen::<bool>());
            println!("thread {:>2}: blocking with priority {}", n, p);
            let _guard = lock.guard(p);  // block until we take the lock
            println!("thread {:>2}: took the lock with priority {}", n, p);
            // lock is released here
        }));
    }
    while lock.waiting() < 20 {
        thread::sleep(Duration::from_millis(1));  // wait for the threads to queue
    }
    if let Err(e) = lock.unlock() {  // go go go!
        eprintln!("{}", e);
    }
    for tid in tids {
        let _ = tid.join();
    }
}
