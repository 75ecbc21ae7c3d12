use async_trait::async_trait;

use trolley_core::notice::{Notice, Notifier};

/// Prints shopper-facing notices to stderr so stdout stays reserved for
/// the structured command output.
#[derive(Default)]
pub struct StderrNotifier;

#[async_trait]
impl Notifier for StderrNotifier {
    async fn notify(&self, notice: Notice) {
        eprintln!("warning: {notice}");
    }
}
