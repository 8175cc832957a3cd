/// Events emitted while a run makes progress.
#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    PhaseStart { name: &'static str },
    PhaseFinish,

    TaskStart { total_steps: u64 },
    TaskIncrement,
    TaskFinish,

    /// Periodic energy report of the Metropolis loop.
    Status { step: usize, energy: f64 },
    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }

    pub fn message(&self, text: impl Into<String>) {
        if self.callback.is_some() {
            self.report(Progress::Message(text.into()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn reporter_without_callback_ignores_events() {
        let reporter = ProgressReporter::new();
        reporter.report(Progress::TaskIncrement);
        reporter.message("nothing listens");
    }

    #[test]
    fn reporter_forwards_events_in_order() {
        let events = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|e: Progress| events.lock().unwrap().push(e)));

        reporter.report(Progress::TaskStart { total_steps: 2 });
        reporter.report(Progress::Status {
            step: 1,
            energy: -3.5,
        });
        reporter.message("done");
        drop(reporter);

        assert_eq!(
            events.into_inner().unwrap(),
            vec![
                Progress::TaskStart { total_steps: 2 },
                Progress::Status {
                    step: 1,
                    energy: -3.5
                },
                Progress::Message("done".to_string()),
            ]
        );
    }
}
