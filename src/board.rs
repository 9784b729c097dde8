//! The message board component.
//!
//! `MessageBoard` owns everything the rendering layer binds to: the compose
//! form, the current page of messages, pagination, two busy flags and the
//! transient submit status. State lives in a `tokio::sync::watch` channel so
//! a UI can either poll `state()` or await changes on `subscribe()`.

use crate::api::{HttpMessageApi, MessageApi};
use crate::config::BoardConfig;
use crate::storage::{EMAIL_KEY, FileStore, KeyValueStore, USERNAME_KEY};
use crate::time_format::format_local_time;
use crate::types::{FormState, Message, NewMessage, Pagination, StatusKind, SubmitStatus};
use crate::validation::validate_form;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::AbortHandle;
use tracing::{debug, error, info, warn};

pub const SUBMIT_SUCCEEDED: &str = "留言发布成功！";
pub const SUBMIT_FAILED: &str = "发布失败，请稍后重试";
pub const NETWORK_ERROR: &str = "网络错误，请稍后重试";

/// Everything the rendering layer displays.
#[derive(Clone, Debug, PartialEq)]
pub struct BoardState {
    pub form: FormState,
    pub messages: Vec<Message>,
    pub pagination: Pagination,
    pub loading_messages: bool,
    pub submitting: bool,
    pub submit_status: Option<SubmitStatus>,
}

/// Cheap, cloneable handle to one board.
#[derive(Clone)]
pub struct MessageBoard {
    inner: Arc<Inner>,
}

struct Inner {
    api: Arc<dyn MessageApi>,
    store: Arc<dyn KeyValueStore>,
    page_size: u32,
    status_ttl: Duration,
    state: watch::Sender<BoardState>,
    load_generation: AtomicU64,
    status_timer: Mutex<StatusTimer>,
}

/// Pending clear for the status on screen. `shown` counts statuses written
/// so a timer that already woke up can tell it has been superseded.
#[derive(Default)]
struct StatusTimer {
    shown: u64,
    pending: Option<AbortHandle>,
}

impl StatusTimer {
    fn cancel(&mut self) {
        self.shown += 1;
        if let Some(timer) = self.pending.take() {
            timer.abort();
        }
    }
}

impl Inner {
    fn status_timer(&self) -> MutexGuard<'_, StatusTimer> {
        self.status_timer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn is_latest_load(&self, generation: u64) -> bool {
        self.load_generation.load(Ordering::SeqCst) == generation
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        self.status_timer().cancel();
    }
}

/// Resets a busy flag however the owning future ends.
enum BusyGuard<'a> {
    Loading { inner: &'a Inner, generation: u64 },
    Submitting { inner: &'a Inner },
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        match self {
            BusyGuard::Loading { inner, generation } => {
                // A newer load owns the flag now
                if inner.is_latest_load(*generation) {
                    inner.state.send_modify(|s| s.loading_messages = false);
                }
            }
            BusyGuard::Submitting { inner } => {
                inner.state.send_modify(|s| s.submitting = false);
            }
        }
    }
}

impl MessageBoard {
    /// Build a board over the given API and store. The form's identity
    /// fields are seeded from the store.
    pub fn new(
        api: Arc<dyn MessageApi>,
        store: Arc<dyn KeyValueStore>,
        config: &BoardConfig,
    ) -> Self {
        let form = FormState {
            username: store.get(USERNAME_KEY).unwrap_or_default(),
            email: store.get(EMAIL_KEY).unwrap_or_default(),
            content: String::new(),
        };
        let (state, _) = watch::channel(BoardState {
            form,
            messages: Vec::new(),
            pagination: Pagination::first(config.page_size),
            loading_messages: true,
            submitting: false,
            submit_status: None,
        });

        Self {
            inner: Arc::new(Inner {
                api,
                store,
                page_size: config.page_size,
                status_ttl: config.status_ttl,
                state,
                load_generation: AtomicU64::new(0),
                status_timer: Mutex::new(StatusTimer::default()),
            }),
        }
    }

    /// Board wired to the HTTP API and on-disk storage named by `config`.
    pub fn from_config(config: &BoardConfig) -> Self {
        Self::new(
            Arc::new(HttpMessageApi::new(config.api_base.clone())),
            Arc::new(FileStore::new(config.storage_dir.clone())),
            config,
        )
    }

    /// Load the first page. Hosts call this once the board is on screen.
    pub async fn initialize(&self) {
        self.load_messages(1).await;
    }

    pub fn state(&self) -> BoardState {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<BoardState> {
        self.inner.state.subscribe()
    }

    pub fn form(&self) -> FormState {
        self.inner.state.borrow().form.clone()
    }

    pub fn set_username(&self, username: impl Into<String>) {
        let username = username.into();
        self.inner.state.send_modify(|s| s.form.username = username);
    }

    pub fn set_email(&self, email: impl Into<String>) {
        let email = email.into();
        self.inner.state.send_modify(|s| s.form.email = email);
    }

    pub fn set_content(&self, content: impl Into<String>) {
        let content = content.into();
        self.inner.state.send_modify(|s| s.form.content = content);
    }

    /// Fetch `page` and make it the displayed page.
    ///
    /// Page 0 is ignored. Failures are logged and leave the current page in
    /// place. If another load starts before this one finishes, this one's
    /// response is dropped.
    pub async fn load_messages(&self, page: u32) {
        if page < 1 {
            debug!(page, "ignoring load of invalid page");
            return;
        }

        let inner = &*self.inner;
        let generation = inner.load_generation.fetch_add(1, Ordering::SeqCst) + 1;
        inner.state.send_modify(|s| s.loading_messages = true);
        let _busy = BusyGuard::Loading { inner, generation };

        let result = inner.api.list_messages(page, inner.page_size).await;
        if !inner.is_latest_load(generation) {
            debug!(page, "discarding superseded page response");
            return;
        }

        let envelope = match result {
            Ok(envelope) => envelope,
            Err(err) => {
                error!(%err, page, "message list request failed");
                return;
            }
        };
        if !envelope.success {
            error!(
                error = envelope.error.as_deref().unwrap_or("unknown error"),
                page, "failed to load messages"
            );
            return;
        }
        let Some(data) = envelope.data else {
            error!(page, "message list response has no data");
            return;
        };

        let messages: Vec<Message> = data.messages.into_iter().map(localize_timestamp).collect();
        debug!(
            page = data.pagination.page,
            count = messages.len(),
            total = data.pagination.total,
            "loaded messages"
        );
        inner.state.send_modify(|s| {
            s.messages = messages;
            s.pagination = data.pagination;
        });
    }

    /// Validate the form and post it.
    ///
    /// On success the remembered identity is saved, the content field is
    /// cleared and page 1 is reloaded before this returns.
    pub async fn submit_message(&self) {
        let form = self.form();
        if let Err(err) = validate_form(&form) {
            self.show_status(StatusKind::Error, err.to_string());
            return;
        }

        let inner = &*self.inner;
        inner.state.send_modify(|s| s.submitting = true);
        self.clear_status();

        let accepted = {
            let _busy = BusyGuard::Submitting { inner };
            let payload = NewMessage::from_form(&form);

            match inner.api.create_message(&payload).await {
                Ok(ack) if ack.success => {
                    self.remember_identity();
                    inner.state.send_modify(|s| s.form.content.clear());
                    info!(username = %payload.username, "message posted");
                    self.show_status(StatusKind::Success, SUBMIT_SUCCEEDED);
                    true
                }
                Ok(ack) => {
                    let message = ack
                        .error
                        .filter(|e| !e.is_empty())
                        .unwrap_or_else(|| SUBMIT_FAILED.to_string());
                    warn!(error = %message, "message rejected");
                    self.show_status(StatusKind::Error, message);
                    false
                }
                Err(err) => {
                    error!(%err, "failed to submit message");
                    self.show_status(StatusKind::Error, NETWORK_ERROR);
                    false
                }
            }
        };

        if accepted {
            self.load_messages(1).await;
        }
    }

    /// Show `message` and clear it after the configured lifetime.
    ///
    /// Replaces any status already showing along with its pending clear.
    /// Must be called from within a Tokio runtime.
    pub fn show_status(&self, kind: StatusKind, message: impl Into<String>) {
        let status = SubmitStatus {
            kind,
            message: message.into(),
        };
        let inner = &*self.inner;
        // Held until the new timer is pending so no timer is orphaned
        let mut timer = inner.status_timer();
        timer.cancel();
        let shown = timer.shown;
        inner.state.send_modify(|s| s.submit_status = Some(status));

        let board: Weak<Inner> = Arc::downgrade(&self.inner);
        let ttl = inner.status_ttl;
        let task = tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            let Some(inner) = board.upgrade() else {
                return;
            };
            let mut timer = inner.status_timer();
            if timer.shown == shown {
                timer.pending = None;
                inner.state.send_modify(|s| s.submit_status = None);
            }
        });
        timer.pending = Some(task.abort_handle());
    }

    pub fn clear_status(&self) {
        let mut timer = self.inner.status_timer();
        timer.cancel();
        self.inner.state.send_modify(|s| s.submit_status = None);
    }

    fn remember_identity(&self) {
        // Whatever the fields hold when the post is accepted, untrimmed
        let form = self.form();
        let store = &self.inner.store;
        for (key, value) in [(USERNAME_KEY, &form.username), (EMAIL_KEY, &form.email)] {
            if let Err(err) = store.set(key, value) {
                warn!(%err, key, "failed to remember identity");
            }
        }
    }
}

fn localize_timestamp(mut message: Message) -> Message {
    match format_local_time(&message.created_at) {
        Ok(local) => message.created_at = local,
        Err(err) => warn!(%err, "keeping server timestamp"),
    }
    message
}
