use intlog_core::ClientError;

/// Receives remote-call failures that a recorder absorbed.
///
/// Called synchronously, once per failed call, before the recorder method
/// returns. Any `Fn(&ClientError) + Send` closure is an observer.
pub trait FailureObserver: Send {
    fn on_failure(&self, error: &ClientError);
}

impl<F> FailureObserver for F
where
    F: Fn(&ClientError) + Send,
{
    fn on_failure(&self, error: &ClientError) {
        self(error)
    }
}
