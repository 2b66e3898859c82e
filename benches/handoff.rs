extern crate env_logger;
extern crate priolock;
extern crate rand;

use priolock::{Priority, PriorityLock};
use rand::*;
use std::sync::Arc;
use std::thread;
use std::time::*;

const ITERS: u32 = 100_000;

fn uncontended() {
    let lock = PriorityLock::new();
    let start = Instant::now();
    for _ in 0..ITERS {
        lock.lock(Priority::Low);
        lock.unlock().unwrap();
    }
    println!("uncontended: {:>5} ns per lock/unlock", start.elapsed().as_nanos() / ITERS as u128);

    lock.lock(Priority::Low);
    let start = Instant::now();
    for _ in 0..ITERS {
        lock.lock(Priority::High);
        lock.unlock().unwrap();
    }
    println!("reentrant:   {:>5} ns per lock/unlock", start.elapsed().as_nanos() / ITERS as u128);
    lock.unlock().unwrap();
}

fn contended() {
    let lock = Arc::new(PriorityLock::new());
    let mut tids = vec![];
    for n in 1..10 {
        let lock = lock.clone();
        tids.push(thread::spawn(move || {
            let mut rng = thread_rng();
            let prio = Priority::from(n % 3 == 0);
            for i in 0..10 {
                let ts1 = Instant::now();
                let ts = {
                    let _guard = lock.guard(prio);
                    println!("thread {} ({}): LOCK    #{:<2} {:>8} ns", n, prio, i, ts1.elapsed().as_nanos());
                    thread::sleep(Duration::from_millis(rng.gen::<u64>() % 32));
                    Instant::now()
                };
                println!("thread {} ({}): RELEASE #{:<2} {:>8} ns", n, prio, i, ts.elapsed().as_nanos());
                thread::sleep(Duration::from_millis(rng.gen::<u64>() % 32));
            }
        }));
    }
    for t in tids {
        t.join().unwrap();
    }
}

fn main() {
    env_logger::init();
    uncontended();
    contended();
}
