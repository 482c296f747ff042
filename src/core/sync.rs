//! # Synchronizer
//!
//! Runs the `Effect`s produced by `update()` and keeps the timer-driven
//! refetches in step with the active view:
//!
//! - chat open → messages for that peer, immediately and every 3 s
//! - conversation list showing → chat list, immediately and every 5 s
//! - search typing → one user search 300 ms after the last keystroke
//!
//! Every fetch is its own task that reports back with an `Action`. Aborting
//! a poller or a debounce timer stops future fetches only; a request that is
//! already in flight still completes and its result is delivered.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{Instant, interval_at};

use crate::api::MessengerApi;
use crate::core::action::{Action, Effect};
use crate::core::attachment;
use crate::core::session::SessionStore;
use crate::core::state::{App, View};

pub const CHAT_POLL_INTERVAL: Duration = Duration::from_secs(3);
pub const CHAT_LIST_POLL_INTERVAL: Duration = Duration::from_secs(5);
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollIntervals {
    pub chat: Duration,
    pub chat_list: Duration,
    pub search_debounce: Duration,
}

impl Default for PollIntervals {
    fn default() -> Self {
        Self {
            chat: CHAT_POLL_INTERVAL,
            chat_list: CHAT_LIST_POLL_INTERVAL,
            search_debounce: SEARCH_DEBOUNCE,
        }
    }
}

/// A running interval task and the (user, peer) pair it polls for.
struct Poller {
    key: (i64, i64),
    handle: JoinHandle<()>,
}

impl Poller {
    fn stop(self) {
        self.handle.abort();
    }
}

pub struct Synchronizer {
    api: Arc<dyn MessengerApi>,
    store: SessionStore,
    tx: UnboundedSender<Action>,
    intervals: PollIntervals,
    chat_poller: Option<Poller>,
    list_poller: Option<Poller>,
    pending_search: Option<JoinHandle<()>>,
}

impl Synchronizer {
    pub fn new(
        api: Arc<dyn MessengerApi>,
        store: SessionStore,
        tx: UnboundedSender<Action>,
        intervals: PollIntervals,
    ) -> Self {
        Self {
            api,
            store,
            tx,
            intervals,
            chat_poller: None,
            list_poller: None,
            pending_search: None,
        }
    }

    /// Starts the pollers owned by the active view and stops the rest.
    /// Call after every `update()`.
    pub fn reconcile(&mut self, app: &App) {
        let user_id = app.user_id();

        let want_chat = match (&app.view, user_id) {
            (View::Chat(peer), Some(uid)) => Some((uid, peer.id)),
            _ => None,
        };
        if self.chat_poller.as_ref().map(|p| p.key) != want_chat {
            if let Some(poller) = self.chat_poller.take() {
                debug!("Stopping message poller for {:?}", poller.key);
                poller.stop();
            }
            self.chat_poller = want_chat.map(|key| self.spawn_chat_poller(key));
        }

        let want_list = match (&app.view, user_id) {
            (View::Chats, Some(uid)) => Some((uid, 0)),
            _ => None,
        };
        if self.list_poller.as_ref().map(|p| p.key) != want_list {
            if let Some(poller) = self.list_poller.take() {
                debug!("Stopping chat list poller");
                poller.stop();
            }
            self.list_poller = want_list.map(|key| self.spawn_list_poller(key));
        }

        if app.view != View::Search
            && let Some(pending) = self.pending_search.take()
        {
            pending.abort();
        }
    }

    /// Aborts every timer. In-flight requests are left to finish.
    pub fn shutdown(&mut self) {
        if let Some(poller) = self.chat_poller.take() {
            poller.stop();
        }
        if let Some(poller) = self.list_poller.take() {
            poller.stop();
        }
        if let Some(pending) = self.pending_search.take() {
            pending.abort();
        }
    }

    pub fn is_polling_messages(&self) -> bool {
        self.chat_poller.is_some()
    }

    pub fn is_polling_chats(&self) -> bool {
        self.list_poller.is_some()
    }

    pub fn execute(&mut self, effect: Effect) {
        match effect {
            Effect::Authenticate(request) => {
                let api = self.api.clone();
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let result = api.authenticate(&request).await;
                    send(&tx, Action::AuthCompleted(result));
                });
            }
            Effect::PersistSession(user) => {
                if let Err(e) = self.store.save(&user) {
                    warn!("Failed to persist session: {}", e);
                }
            }
            Effect::ClearSession => {
                self.shutdown();
                if let Err(e) = self.store.clear() {
                    warn!("Failed to clear session: {}", e);
                }
            }
            Effect::FetchChats { user_id } => {
                spawn_fetch_chats(self.api.clone(), self.tx.clone(), user_id);
            }
            Effect::FetchMessages { user_id, peer_id } => {
                spawn_fetch_messages(self.api.clone(), self.tx.clone(), user_id, peer_id);
            }
            Effect::SearchUsers(query) => self.debounce_search(query),
            Effect::SendMessage { user_id, request } => {
                let api = self.api.clone();
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let result = api.send_message(user_id, &request).await;
                    send(
                        &tx,
                        Action::MessageSent {
                            peer_id: request.receiver_id,
                            result,
                        },
                    );
                });
            }
            Effect::DeleteMessage {
                user_id,
                peer_id,
                message_id,
            } => {
                let api = self.api.clone();
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let result = api.delete_message(user_id, message_id).await;
                    send(&tx, Action::MessageDeleted { peer_id, result });
                });
            }
            Effect::UpdateProfile { user_id, update } => {
                let api = self.api.clone();
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let result = api.update_profile(user_id, &update).await;
                    send(&tx, Action::ProfileSaved { update, result });
                });
            }
            Effect::LoadAttachment { path, target } => {
                let result = attachment::to_data_url(std::path::Path::new(&path))
                    .map_err(|e| e.to_string());
                send(&self.tx, Action::AttachmentLoaded { target, result });
            }
            Effect::Quit => {}
        }
    }

    /// Replaces the pending search timer. The previous timer is cancelled,
    /// but a search it already started keeps running.
    fn debounce_search(&mut self, query: String) {
        if let Some(pending) = self.pending_search.take() {
            pending.abort();
        }
        let api = self.api.clone();
        let tx = self.tx.clone();
        let deadline = Instant::now() + self.intervals.search_debounce;
        self.pending_search = Some(tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            debug!("Search debounce elapsed for '{}'", query);
            tokio::spawn(async move {
                let result = api.search_users(&query).await;
                send(&tx, Action::SearchLoaded { query, result });
            });
        }));
    }

    fn spawn_chat_poller(&self, key: (i64, i64)) -> Poller {
        let (user_id, peer_id) = key;
        info!("Polling messages with {} every {:?}", peer_id, self.intervals.chat);
        let api = self.api.clone();
        let tx = self.tx.clone();
        let mut ticker = interval_at(Instant::now(), self.intervals.chat);
        let handle = tokio::spawn(async move {
            loop {
                ticker.tick().await;
                if tx.is_closed() {
                    break;
                }
                spawn_fetch_messages(api.clone(), tx.clone(), user_id, peer_id);
            }
        });
        Poller { key, handle }
    }

    fn spawn_list_poller(&self, key: (i64, i64)) -> Poller {
        let (user_id, _) = key;
        info!("Polling chat list every {:?}", self.intervals.chat_list);
        let api = self.api.clone();
        let tx = self.tx.clone();
        let mut ticker = interval_at(Instant::now(), self.intervals.chat_list);
        let handle = tokio::spawn(async move {
            loop {
                ticker.tick().await;
                if tx.is_closed() {
                    break;
                }
                spawn_fetch_chats(api.clone(), tx.clone(), user_id);
            }
        });
        Poller { key, handle }
    }
}

impl Drop for Synchronizer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn spawn_fetch_chats(api: Arc<dyn MessengerApi>, tx: UnboundedSender<Action>, user_id: i64) {
    tokio::spawn(async move {
        let result = api.fetch_chats(user_id).await;
        send(&tx, Action::ChatsLoaded { user_id, result });
    });
}

fn spawn_fetch_messages(
    api: Arc<dyn MessengerApi>,
    tx: UnboundedSender<Action>,
    user_id: i64,
    peer_id: i64,
) {
    tokio::spawn(async move {
        let result = api.fetch_messages(user_id, peer_id).await;
        send(
            &tx,
            Action::MessagesLoaded {
                user_id,
                peer_id,
                result,
            },
        );
    });
}

fn send(tx: &UnboundedSender<Action>, action: Action) {
    if tx.send(action).is_err() {
        warn!("Failed to deliver action: receiver dropped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::action::update;
    use crate::core::state::FieldEdit;
    use crate::test_support::{ApiCall, RecordingApi, logged_in_app, peer, settle, temp_session_store};
    use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};
    use tokio::time::advance;

    fn test_sync() -> (Synchronizer, Arc<RecordingApi>, UnboundedReceiver<Action>) {
        let api = Arc::new(RecordingApi::default());
        let (tx, rx) = unbounded_channel();
        let sync = Synchronizer::new(
            api.clone(),
            temp_session_store(),
            tx,
            PollIntervals::default(),
        );
        (sync, api, rx)
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_chat_polls_once_per_interval() {
        let (mut sync, api, _rx) = test_sync();
        let mut app = logged_in_app();
        update(&mut app, Action::OpenChat(peer(2)));
        sync.reconcile(&app);
        settle().await;
        assert_eq!(api.count(|c| matches!(c, ApiCall::FetchMessages { peer_id: 2, .. })), 1);

        for elapsed in 1..=4 {
            advance(CHAT_POLL_INTERVAL).await;
            settle().await;
            assert_eq!(api.count(|c| matches!(c, ApiCall::FetchMessages { .. })), 1 + elapsed);
        }
        assert_eq!(api.count(|c| matches!(c, ApiCall::FetchChats { .. })), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_leaving_chat_stops_message_polling() {
        let (mut sync, api, _rx) = test_sync();
        let mut app = logged_in_app();
        update(&mut app, Action::OpenChat(peer(2)));
        sync.reconcile(&app);
        settle().await;

        update(&mut app, Action::Navigate(crate::core::state::Tab::Settings));
        sync.reconcile(&app);
        assert!(!sync.is_polling_messages());

        for _ in 0..3 {
            advance(CHAT_POLL_INTERVAL).await;
            settle().await;
        }
        assert_eq!(api.count(|c| matches!(c, ApiCall::FetchMessages { .. })), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_switching_peer_restarts_poller_for_new_peer() {
        let (mut sync, api, _rx) = test_sync();
        let mut app = logged_in_app();
        update(&mut app, Action::OpenChat(peer(2)));
        sync.reconcile(&app);
        settle().await;
        update(&mut app, Action::OpenChat(peer(3)));
        sync.reconcile(&app);
        settle().await;
        advance(CHAT_POLL_INTERVAL).await;
        settle().await;

        assert_eq!(api.count(|c| matches!(c, ApiCall::FetchMessages { peer_id: 2, .. })), 1);
        assert_eq!(api.count(|c| matches!(c, ApiCall::FetchMessages { peer_id: 3, .. })), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_chat_list_polls_only_while_list_is_showing() {
        let (mut sync, api, _rx) = test_sync();
        let mut app = logged_in_app();
        sync.reconcile(&app);
        settle().await;
        assert!(sync.is_polling_chats());
        advance(CHAT_LIST_POLL_INTERVAL).await;
        settle().await;
        assert_eq!(api.count(|c| matches!(c, ApiCall::FetchChats { .. })), 2);

        update(&mut app, Action::OpenChat(peer(2)));
        sync.reconcile(&app);
        assert!(!sync.is_polling_chats());
        advance(CHAT_LIST_POLL_INTERVAL * 2).await;
        settle().await;
        assert_eq!(api.count(|c| matches!(c, ApiCall::FetchChats { .. })), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_polling_without_session() {
        let (mut sync, api, _rx) = test_sync();
        let app = App::bootstrap(None, Default::default());
        sync.reconcile(&app);
        advance(CHAT_LIST_POLL_INTERVAL).await;
        settle().await;
        assert!(api.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_debounce_fetches_final_query_once() {
        let (mut sync, api, _rx) = test_sync();
        let mut app = logged_in_app();
        update(&mut app, Action::Navigate(crate::core::state::Tab::Search));
        sync.reconcile(&app);

        for c in "ann".chars() {
            for effect in update(&mut app, Action::SearchInput(FieldEdit::Insert(c))) {
                sync.execute(effect);
            }
            advance(Duration::from_millis(100)).await;
            settle().await;
        }
        assert!(api.calls().is_empty());

        advance(SEARCH_DEBOUNCE - Duration::from_millis(101)).await;
        settle().await;
        assert!(api.calls().is_empty());

        advance(Duration::from_millis(1)).await;
        settle().await;
        assert_eq!(api.calls(), vec![ApiCall::SearchUsers("ann".to_string())]);

        advance(SEARCH_DEBOUNCE * 3).await;
        settle().await;
        assert_eq!(api.calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_leaving_search_cancels_pending_timer() {
        let (mut sync, api, _rx) = test_sync();
        let mut app = logged_in_app();
        update(&mut app, Action::Navigate(crate::core::state::Tab::Search));
        sync.execute(Effect::SearchUsers("max".to_string()));
        update(&mut app, Action::Navigate(crate::core::state::Tab::Profile));
        sync.reconcile(&app);

        advance(SEARCH_DEBOUNCE * 2).await;
        settle().await;
        assert!(api.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_refetches_messages_and_chats_exactly_once() {
        let (mut sync, api, mut rx) = test_sync();
        let mut app = logged_in_app();
        update(&mut app, Action::OpenChat(peer(2)));
        for c in "hi".chars() {
            update(&mut app, Action::ComposerInput(FieldEdit::Insert(c)));
        }
        // Pollers are deliberately not started so only the send path fetches.
        for effect in update(&mut app, Action::SendMessage) {
            sync.execute(effect);
        }
        let action = rx.recv().await.unwrap();
        assert!(matches!(action, Action::MessageSent { peer_id: 2, result: Ok(()) }));
        for effect in update(&mut app, action) {
            sync.execute(effect);
        }
        settle().await;

        assert!(app.composer.text.is_empty());
        assert_eq!(api.count(|c| matches!(c, ApiCall::SendMessage { .. })), 1);
        assert_eq!(api.count(|c| matches!(c, ApiCall::FetchMessages { .. })), 1);
        assert_eq!(api.count(|c| matches!(c, ApiCall::FetchChats { .. })), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_login_persists_returned_user() {
        let (mut sync, api, mut rx) = test_sync();
        let mut app = App::bootstrap(None, Default::default());
        for c in "anna".chars() {
            update(&mut app, Action::AuthInput(FieldEdit::Insert(c)));
        }
        update(&mut app, Action::AuthFocus(1));
        for c in "pw".chars() {
            update(&mut app, Action::AuthInput(FieldEdit::Insert(c)));
        }
        for effect in update(&mut app, Action::SubmitAuth) {
            sync.execute(effect);
        }

        let action = rx.recv().await.unwrap();
        assert!(matches!(action, Action::AuthCompleted(Ok(_))));
        for effect in update(&mut app, action) {
            sync.execute(effect);
        }

        assert_eq!(api.count(|c| matches!(c, ApiCall::Authenticate(_))), 1);
        assert_eq!(app.view, View::Chats);
        let stored = sync.store.load();
        assert!(stored.is_some());
        assert_eq!(stored, app.session);
        assert_eq!(stored.map(|u| u.username), Some("anna".to_string()));
    }

    #[tokio::test]
    async fn test_persist_and_clear_session_effects() {
        let (mut sync, _api, _rx) = test_sync();
        let user = crate::test_support::sample_user();
        sync.execute(Effect::PersistSession(user.clone()));
        assert_eq!(sync.store.load(), Some(user));
        sync.execute(Effect::ClearSession);
        assert!(sync.store.load().is_none());
    }

    #[tokio::test]
    async fn test_load_attachment_reports_error_for_missing_file() {
        let (mut sync, _api, mut rx) = test_sync();
        sync.execute(Effect::LoadAttachment {
            path: "/definitely/not/here.png".to_string(),
            target: crate::core::action::AttachTarget::Composer,
        });
        let action = rx.recv().await.unwrap();
        assert!(matches!(action, Action::AttachmentLoaded { result: Err(_), .. }));
    }
}
