use async_trait::async_trait;
use tokio::sync::RwLock;

/// The four fixed user-facing messages. No structured error codes cross
/// this boundary; consumers only ever see these.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Notice {
    AddFailed,
    RemoveFailed,
    UpdateFailed,
    OutOfStock,
}

impl Notice {
    pub fn message(self) -> &'static str {
        match self {
            Self::AddFailed => "Could not add the product to the cart",
            Self::RemoveFailed => "Could not remove the product from the cart",
            Self::UpdateFailed => "Could not change the product quantity",
            Self::OutOfStock => "Requested quantity is out of stock",
        }
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Fire-and-forget delivery of a [`Notice`] to the shopper. Infallible
/// from the caller's perspective; implementations swallow their own
/// transport problems.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notice: Notice);
}

/// Test double that records every delivered notice in order.
#[derive(Default)]
pub struct RecordingNotifier {
    delivered: RwLock<Vec<Notice>>,
}

impl RecordingNotifier {
    pub async fn delivered(&self) -> Vec<Notice> {
        self.delivered.read().await.clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, notice: Notice) {
        self.delivered.write().await.push(notice);
    }
}
