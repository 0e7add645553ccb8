//! Channels the UI listens to
//!
//! A session publishes every [`NotificationEvent`] on an unbounded channel, so that none is lost,
//! and the latest [`StatisticsSnapshot`] on a watch channel.

use tokio::sync::{mpsc, watch};

use crate::notification::NotificationEvent;
use crate::statistics::StatisticsSnapshot;

/// See [`feedback_channels`]
pub type NotificationSender = mpsc::UnboundedSender<NotificationEvent>;
/// See [`feedback_channels`]
pub type NotificationReceiver = mpsc::UnboundedReceiver<NotificationEvent>;
/// See [`feedback_channels`]
pub type StatisticsSender = watch::Sender<StatisticsSnapshot>;
/// See [`feedback_channels`]
pub type StatisticsReceiver = watch::Receiver<StatisticsSnapshot>;

/// Create the feedback channels of a session.
///
/// The receivers are what a UI subscribes to: toasts for notifications, and a statistics panel that always shows the latest snapshot.
pub fn feedback_channels() -> (FeedbackSenders, NotificationReceiver, StatisticsReceiver) {
    let (notif_tx, notif_rx) = mpsc::unbounded_channel();
    let (stats_tx, stats_rx) = watch::channel(StatisticsSnapshot::default());
    let senders = FeedbackSenders {
        notifications: Some(notif_tx),
        statistics: Some(stats_tx),
    };
    (senders, notif_rx, stats_rx)
}



/// The sending halves of the feedback channels. Any of them may be missing, in which case feedback is only logged
#[derive(Debug, Default)]
pub struct FeedbackSenders {
    notifications: Option<NotificationSender>,
    statistics: Option<StatisticsSender>,
}

impl FeedbackSenders {
    /// Senders that go nowhere
    pub fn none() -> Self {
        Self::default()
    }

    /// Publish a notification. Returns `false` when nobody listens anymore
    pub fn notify(&self, event: NotificationEvent) -> bool {
        log::info!("{}", event);
        match &self.notifications {
            None => false,
            Some(sender) => sender.send(event).is_ok(),
        }
    }

    /// Publish a new statistics snapshot. Returns `false` when nobody listens anymore
    pub fn statistics_updated(&self, snapshot: StatisticsSnapshot) -> bool {
        log::debug!("Statistics updated: {:?}", snapshot);
        match &self.statistics {
            None => false,
            Some(sender) => sender.send(snapshot).is_ok(),
        }
    }

    /// Whether a notification listener is still connected
    pub fn has_notification_listener(&self) -> bool {
        self.notifications.as_ref()
            .map(|sender| sender.is_closed() == false)
            .unwrap_or(false)
    }

    /// Whether there used to be a notification listener, that has gone away since
    pub fn notification_listener_gone(&self) -> bool {
        self.notifications.as_ref()
            .map(|sender| sender.is_closed())
            .unwrap_or(false)
    }
}
