extern crate env_logger;
extern crate priolock;

use priolock::{Priority, PriorityLock};
use std::io::{stdin, BufRead};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::*;

fn next_line(rx: &Mutex<mpsc::Receiver<()>>) -> bool {
    match rx.lock() {
        Ok(rx) => rx.recv().is_ok(),
        Err(_) => false,
    }
}

// Three background workers and one interactive request handler share a resource.  Each line on
// stdin lets one holder finish; the interactive handler always gets the resource next.
fn main() {
    env_logger::init();
    let (tx, rx) = mpsc::channel::<()>();
    let rx = Arc::new(Mutex::new(rx));
    let lock = Arc::new(PriorityLock::new());
    for n in 0..3 {
        let (lock, rx) = (lock.clone(), rx.clone());
        thread::spawn(move || loop {
            println!("background {:>3}: WAIT", n);
            let ts = Instant::now();
            let guard = lock.guard(Priority::Low);
            println!("background {:>3}: LOCK ({} us)", n, ts.elapsed().as_micros());
            if !next_line(&rx) { return; }
            drop(guard);
            println!("background {:>3}: RELEASE", n);
            thread::sleep(Duration::from_millis(1000));
        });
    }
    {
        let lock = lock.clone();
        thread::spawn(move || loop {
            println!("interactive: WAIT");
            let ts = Instant::now();
            let guard = lock.guard(Priority::High);
            println!("interactive: LOCK ({} us)", ts.elapsed().as_micros());
            if !next_line(&rx) { return; }
            drop(guard);
            println!("interactive: RELEASE");
        });
    }
    thread::sleep(Duration::from_millis(10));
    let stdin = stdin();
    for _ in stdin.lock().lines() {
        if tx.send(()).is_err() { break; }
    }
}
