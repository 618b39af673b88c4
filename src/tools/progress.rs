//! Progress notifications for long-running tool calls

use serde_json::{json, Value};
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

/// Sends `notifications/progress` for one call when the client asked for it
#[derive(Debug, Clone, Default)]
pub struct Progress {
    token: Option<Value>,
    outbound: Option<UnboundedSender<String>>,
}

impl Progress {
    /// Reporter for a call carrying `_meta.progressToken`
    pub fn new(token: Option<Value>, outbound: UnboundedSender<String>) -> Self {
        Self {
            token: token.filter(|t| !t.is_null()),
            outbound: Some(outbound),
        }
    }

    /// Reporter that drops everything
    pub fn disabled() -> Self {
        Self::default()
    }

    pub async fn report(&self, progress: u32, total: u32, message: &str) {
        let (Some(token), Some(outbound)) = (&self.token, &self.outbound) else {
            return;
        };
        let notification = json!({
            "jsonrpc": "2.0",
            "method": "notifications/progress",
            "params": {
                "progressToken": token,
                "progress": progress,
                "total": total,
                "message": message
            }
        });
        if outbound.send(notification.to_string()).is_err() {
            debug!("Progress dropped, writer closed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_reports_with_token() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let progress = Progress::new(Some(json!("tok-1")), tx);
        progress.report(0, 100, "Starting job search").await;

        let sent: Value = serde_json::from_str(&rx.recv().await.unwrap()).unwrap();
        assert_eq!(sent["method"], "notifications/progress");
        assert_eq!(sent["params"]["progressToken"], "tok-1");
        assert_eq!(sent["params"]["progress"], 0);
        assert_eq!(sent["params"]["total"], 100);
        assert_eq!(sent["params"]["message"], "Starting job search");
        assert!(sent.get("id").is_none());
    }

    #[tokio::test]
    async fn test_silent_without_token() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        Progress::new(None, tx.clone()).report(100, 100, "Complete").await;
        Progress::disabled().report(100, 100, "Complete").await;
        drop(tx);
        assert!(rx.recv().await.is_none());
    }
}
