use std::time::Duration;

/// How many times a [`ValueAnimator`] plays its period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repeat {
    Once,
    Forever,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Running,
    Finished,
    Cancelled,
}

/// Linearly interpolates a value from `from` to `to` over `duration`.
///
/// The animator owns no timer of its own: the owning thread advances it with
/// [`ValueAnimator::tick`] and receives each interpolated value through the
/// per-tick callback. Once cancelled or finished it never calls back again.
#[derive(Debug, Clone)]
pub struct ValueAnimator {
    from: f32,
    to: f32,
    duration: Duration,
    repeat: Repeat,
    elapsed: Duration,
    status: Status,
}

impl ValueAnimator {
    pub fn new(from: f32, to: f32, duration: Duration, repeat: Repeat) -> Self {
        Self {
            from,
            to,
            duration,
            repeat,
            elapsed: Duration::ZERO,
            status: Status::Running,
        }
    }

    pub fn is_running(&self) -> bool {
        self.status == Status::Running
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == Status::Cancelled
    }

    /// Stops the animator. No further ticks fire for this instance.
    pub fn cancel(&mut self) {
        if self.status == Status::Running {
            self.status = Status::Cancelled;
        }
    }

    /// Advances the clock by `dt` and reports the new value to `on_update`.
    ///
    /// Returns the value that was reported, or `None` if the animator is no
    /// longer running.
    pub fn tick(&mut self, dt: Duration, mut on_update: impl FnMut(f32)) -> Option<f32> {
        if self.status != Status::Running {
            return None;
        }

        self.elapsed += dt;
        let fraction = if self.duration.is_zero() {
            1.0
        } else if self.elapsed >= self.duration {
            match self.repeat {
                Repeat::Once => 1.0,
                Repeat::Forever => {
                    let period = self.duration.as_nanos();
                    self.elapsed = Duration::from_nanos((self.elapsed.as_nanos() % period) as u64);
                    self.elapsed.as_secs_f32() / self.duration.as_secs_f32()
                }
            }
        } else {
            self.elapsed.as_secs_f32() / self.duration.as_secs_f32()
        };

        if self.repeat == Repeat::Once && fraction >= 1.0 {
            self.status = Status::Finished;
        }

        let value = self.from + (self.to - self.from) * fraction;
        log::trace!("animator tick: fraction={fraction:.3} value={value:.3}");
        on_update(value);
        Some(value)
    }
}
