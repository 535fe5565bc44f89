use std::time::{Duration, Instant};

/// Logs the time spent since the previous stage and returns the new total.
pub(crate) fn trace(is_test: bool, l_type: &str, l_step: &str, start: Instant, prev_elapsed: Duration) -> Duration {
    let elapsed = start.elapsed();
    if is_test {
        println!("{} | Total={}ms | {}={:.2?}", l_type, elapsed.as_millis(), l_step, elapsed - prev_elapsed);
    }
    else {
        log::trace!("{} | Total={:.2?} | {}={:.2?}", l_type, elapsed, l_step, elapsed - prev_elapsed);
    }
    elapsed
}
