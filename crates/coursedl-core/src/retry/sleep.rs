use std::time::Duration;

/// Blocking delay between retry attempts; injectable so tests never sleep.
pub trait Sleeper: Send + Sync {
    fn sleep(&self, d: Duration);
}

/// Real sleeper backed by `std::thread::sleep`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, d: Duration) {
        if !d.is_zero() {
            std::thread::sleep(d);
        }
    }
}
