//! Rotating input placeholders.
//!
//! `PlaceholderRotator` is the pure state: which example is showing and
//! whether the user has started typing. `AnimatedPlaceholder` drives it from a
//! tokio interval task that lives exactly as long as the field does.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};
use tracing::trace;

pub const ROTATION_INTERVAL: Duration = Duration::from_secs(3);

const DISPLAY_PREFIX: &str = "e.g., ";

#[derive(Debug, Clone)]
pub struct PlaceholderRotator {
    examples: Vec<String>,
    index: usize,
    typing: bool,
}

impl PlaceholderRotator {
    pub fn new<I, S>(examples: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            examples: examples.into_iter().map(Into::into).collect(),
            index: 0,
            typing: false,
        }
    }

    /// Rotation needs at least two examples and an untouched field.
    pub fn rotates(&self) -> bool {
        self.examples.len() > 1 && !self.typing
    }

    /// Advances to the next example. Returns `false` once rotation is over.
    pub fn tick(&mut self) -> bool {
        if !self.rotates() {
            return false;
        }
        self.index = (self.index + 1) % self.examples.len();
        true
    }

    /// Freezes the current example for the rest of the field's lifetime.
    pub fn mark_typing(&mut self) {
        self.typing = true;
    }

    #[cfg(test)]
    pub fn is_frozen(&self) -> bool {
        self.typing
    }

    pub fn current(&self) -> &str {
        self.examples
            .get(self.index)
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Text shown inside the input. Blank examples show nothing.
    pub fn display(&self) -> String {
        match self.current() {
            "" => String::new(),
            example => format!("{DISPLAY_PREFIX}{example}"),
        }
    }
}

/// A rotator plus the timer task animating it. Dropping it cancels the timer.
#[derive(Debug)]
pub struct AnimatedPlaceholder {
    rotator: Arc<Mutex<PlaceholderRotator>>,
    task: Option<JoinHandle<()>>,
}

impl AnimatedPlaceholder {
    /// Starts animating. Must be called inside a tokio runtime when the list
    /// has more than one example; shorter lists never spawn a timer.
    pub fn spawn(rotator: PlaceholderRotator) -> Self {
        let needs_timer = rotator.rotates();
        let rotator = Arc::new(Mutex::new(rotator));
        let task = needs_timer.then(|| {
            tokio::spawn(rotate(Arc::clone(&rotator), ROTATION_INTERVAL))
        });

        Self { rotator, task }
    }

    #[cfg(test)]
    pub fn current(&self) -> String {
        lock(&self.rotator).current().to_string()
    }

    pub fn display(&self) -> String {
        lock(&self.rotator).display()
    }

    pub fn mark_typing(&mut self) {
        lock(&self.rotator).mark_typing();
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    #[cfg(test)]
    pub fn is_animating(&self) -> bool {
        self.task.is_some()
    }
}

impl Drop for AnimatedPlaceholder {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn rotate(rotator: Arc<Mutex<PlaceholderRotator>>, period: Duration) {
    let mut interval = interval_at(Instant::now() + period, period);
    loop {
        interval.tick().await;
        let mut rotator = lock(&rotator);
        if !rotator.tick() {
            trace!("Placeholder frozen on {:?}", rotator.current());
            break;
        }
    }
}

// A panic while holding the lock cannot leave the rotator half-updated.
fn lock(rotator: &Mutex<PlaceholderRotator>) -> MutexGuard<'_, PlaceholderRotator> {
    rotator.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
