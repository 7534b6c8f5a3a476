use log::error;

/// Sink for user-visible notices.
pub trait Notifier: Send + Sync {
    fn error(&self, message: &str);
}

/// Writes notices to the log only.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn error(&self, message: &str) {
        error!("{message}");
    }
}

impl<T: Notifier + ?Sized> Notifier for &T {
    fn error(&self, message: &str) {
        (**self).error(message);
    }
}
