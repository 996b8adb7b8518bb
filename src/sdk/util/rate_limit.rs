use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;

pub type Limiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// A limiter admitting `per_second` requests each second.
pub fn limiter(per_second: NonZeroU32) -> Limiter {
    Arc::new(RateLimiter::direct(Quota::per_second(per_second)))
}
