#[derive(Debug, Clone)]
pub enum Progress {
    /// A batch of `total_steps` sequences is about to be built.
    TaskStart { total_steps: u64 },
    /// Generation for one sequence is starting.
    SequenceStart { sequence: String },
    /// One sequence finished.
    TaskIncrement,
    /// The whole batch finished.
    TaskFinish,

    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

/// Forwards progress events from a running build to an optional callback.
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
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn reporter_without_callback_is_silent() {
        let reporter = ProgressReporter::new();

        reporter.report(Progress::TaskStart { total_steps: 3 });
        reporter.report(Progress::TaskFinish);
    }

    #[test]
    fn events_reach_the_callback_in_order() {
        let seen: Mutex<Vec<String>> = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            seen.lock().unwrap().push(format!("{event:?}"));
        }));

        reporter.report(Progress::TaskStart { total_steps: 1 });
        reporter.report(Progress::SequenceStart {
            sequence: "AAA".to_string(),
        });
        reporter.report(Progress::TaskIncrement);
        reporter.report(Progress::TaskFinish);
        drop(reporter);

        let seen = seen.into_inner().unwrap();
        assert_eq!(seen.len(), 4);
        assert!(seen[0].contains("TaskStart"));
        assert!(seen[1].contains("AAA"));
    }
}
