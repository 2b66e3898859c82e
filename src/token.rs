use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, Thread};
use std::time::Instant;

/// Create a linked pair of tokens.
///
/// Note that the `SleepToken` is valid for the current thread only.  Don't send it to another
/// thread!
pub fn create_tokens() -> (SleepToken, WakeToken) {
    let token = Arc::new(Token {
        thread: thread::current(),
        is_woken: AtomicBool::new(false),
    });
    (SleepToken(token.clone()), WakeToken(token))
}

#[derive(Debug)]
struct Token {
    thread: Thread,
    is_woken: AtomicBool,
}

/// A token for putting the current thread to sleep.
#[derive(Debug)]
pub struct SleepToken(Arc<Token>);

/// A token for waking a thread.
#[derive(Debug)]
pub struct WakeToken(Arc<Token>);

impl SleepToken {
    /// Sleep the current thread until the corresponding `WakeToken` is signalled.  If the
    /// `WakeToken` has *already* been signalled, this function returns immediately.
    pub fn sleep(self) {
        while !self.is_woken() {
            thread::park();
        }
    }

    /// Like `sleep`, but give up at `deadline`.  Returns whether the token was signalled.
    pub fn sleep_until(&self, deadline: Instant) -> bool {
        loop {
            if self.is_woken() {
                return true;
            }
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            thread::park_timeout(deadline - now);
        }
    }

    pub fn is_woken(&self) -> bool {
        self.0.is_woken.load(Ordering::SeqCst)
    }
}

impl WakeToken {
    /// Prevent threads from sleeping on the corresponding `SleepToken`, waking a thread if
    /// currently doing so.
    pub fn wake(self) {
        let already_woken = self.0.is_woken.swap(true, Ordering::SeqCst);
        assert!(!already_woken, "this token was signalled twice!");
        self.0.thread.unpark();
    }
}
