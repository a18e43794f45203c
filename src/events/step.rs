use std::time::Duration;

#[derive(Debug, Clone)]
pub enum StepEvent {
    /// Start timestamp in milliseconds.
    Running(i64),
    Succeeded(Duration),
    Failed {
        error: String,
        duration: Duration,
    },
}

impl StepEvent {
    pub fn str(&self) -> &str {
        match self {
            StepEvent::Running(_) => "Running",
            StepEvent::Succeeded(_) => "Succeeded",
            StepEvent::Failed {
                ..
            } => "Failed",
        }
    }

    pub fn duration(&self) -> Option<Duration> {
        match self {
            StepEvent::Running(_) => None,
            StepEvent::Succeeded(duration)
            | StepEvent::Failed {
                duration,
                ..
            } => Some(*duration),
        }
    }
}
