use std::time::Duration;

/// Accumulated per-stage durations over repeated pipeline runs.
#[derive(Debug, Default)]
pub struct TimeCalc {
    n: usize,
    duration: Vec<Duration>,
}

impl TimeCalc {
    pub fn total(&self) -> Duration {
        self.duration.iter().sum::<Duration>()
    }

    /// Number of complete runs recorded.
    pub fn runs(&self) -> usize {
        if self.duration.is_empty() {
            0
        } else {
            self.n / self.duration.len()
        }
    }

    /// Average duration of a whole run.
    pub fn avg(&self) -> Duration {
        match self.runs() {
            0 => Duration::ZERO,
            n => self.total() / n as u32,
        }
    }

    /// Average duration of stage `i`, `None` if the stage was never recorded.
    pub fn avg_stage(&self, i: usize) -> Option<Duration> {
        let runs = self.runs().max(1);
        self.duration.get(i).map(|d| *d / runs as u32)
    }

    pub fn stages(&self) -> &[Duration] {
        &self.duration
    }

    pub fn add_or_push(&mut self, i: usize, x: Duration) {
        match self.duration.get_mut(i) {
            Some(elem) => *elem += x,
            None => self.duration.push(x),
        }
        self.n += 1;
    }

    pub fn clear(&mut self) {
        self.n = Default::default();
        self.duration = Default::default();
    }
}
