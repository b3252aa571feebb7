//! # Notifications
//!
//! Terminal steps of the list workflow (load failed, record created, ...)
//! are surfaced as [`Notice`]s through a [`Notifier`]. Reporting is
//! fire-and-forget: a notifier keeps no state the workflow depends on.
//!
//! The library never prints. The CLI installs a notifier that writes colored
//! lines; a GUI would show toasts; tests use [`CollectingNotifier`].

use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub content: String,
}

impl Notice {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            content: content.into(),
        }
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

impl<F> Notifier for F
where
    F: Fn(Notice) + Send + Sync,
{
    fn notify(&self, notice: Notice) {
        self(notice)
    }
}

/// Forwards notices to the `tracing` subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Info | NoticeLevel::Success => tracing::info!("{}", notice.content),
            NoticeLevel::Warning => tracing::warn!("{}", notice.content),
            NoticeLevel::Error => tracing::error!("{}", notice.content),
        }
    }
}

/// Buffers notices in arrival order.
#[derive(Debug, Default)]
pub struct CollectingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl CollectingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns everything collected so far.
    pub fn take(&self) -> Vec<Notice> {
        match self.notices.lock() {
            Ok(mut notices) => std::mem::take(&mut *notices),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }

    pub fn len(&self) -> usize {
        self.notices.lock().map(|n| n.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Notifier for CollectingNotifier {
    fn notify(&self, notice: Notice) {
        if let Ok(mut notices) = self.notices.lock() {
            notices.push(notice);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn collects_in_order_and_drains() {
        let notifier = CollectingNotifier::new();
        notifier.notify(Notice::success("Customer created successfully"));
        notifier.notify(Notice::error("Failed to load customers"));

        let notices = notifier.take();
        assert_eq!(notices.len(), 2);
        assert_eq!(notices[0].level, NoticeLevel::Success);
        assert_eq!(notices[1].content, "Failed to load customers");
        assert!(notifier.is_empty());
    }

    #[test]
    fn closures_are_notifiers() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let notifier = move |notice: Notice| sink.lock().unwrap().push(notice.level);

        notifier.notify(Notice::warning("careful"));
        assert_eq!(*seen.lock().unwrap(), vec![NoticeLevel::Warning]);
    }

    #[test]
    fn tracing_notifier_accepts_every_level() {
        let notifier = TracingNotifier;
        notifier.notify(Notice::info("loaded"));
        notifier.notify(Notice::success("Lead created successfully"));
        notifier.notify(Notice::warning("careful"));
        notifier.notify(Notice::error("Failed to load leads"));
    }

    #[test]
    fn shared_notifiers_forward() {
        let inner = Arc::new(CollectingNotifier::new());
        let shared: Arc<dyn Notifier> = inner.clone();
        shared.notify(Notice::info("hello"));
        assert_eq!(inner.len(), 1);
    }
}
