use console_core::guard::Notifier;

use log::info;

/// Prints guard notices to stderr, where a browser UI would pop a toast.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn error(&self, message: &str) {
        info!("Notice shown: {message}");
        eprintln!("{message}");
    }
}
