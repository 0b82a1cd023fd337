//! In-memory notification state with optimistic mutations.
//!
//! Every local write (a user action or a pushed event) stamps the id it
//! touched with a monotonic sequence number. A fetch records the sequence at
//! which it started and, when its page arrives, keeps the local version of
//! any id written after that point. This lets fetches, pushes and optimistic
//! updates interleave freely without the slower one clobbering the newer
//! state.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use seedlab_bridge::{
    notification::{Notification, NotificationSnapshot},
    page::Page,
};
use tokio::sync::watch;

use super::NotificationApi;
use crate::error::ApiError;

/// Change to the unread counter announced by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountUpdate {
    Delta(i64),
    /// Authoritative value; replaces whatever the client computed.
    Value(u64),
}

#[derive(Debug, Clone, Copy)]
struct FetchTicket {
    id: u64,
    start: u64,
    page: u32,
}

#[derive(Debug)]
struct State {
    notifications: Vec<Notification>,
    unread_count: u64,
    page: u32,
    /// Page the most recent navigation asked for; refreshes fetch this one.
    requested_page: u32,
    total_pages: u32,
    total_elements: u64,
    page_size: u32,
    error: Option<String>,

    seq: u64,
    touched: HashMap<i64, u64>,
    count_changed: u64,
    count_set: u64,

    next_ticket: u64,
    applied_ticket: u64,
    fetches: Vec<FetchTicket>,
    mutations: Vec<u64>,
}

impl State {
    fn new(page_size: u32) -> Self {
        Self {
            notifications: Vec::new(),
            unread_count: 0,
            page: 0,
            requested_page: 0,
            total_pages: 0,
            total_elements: 0,
            page_size: page_size.max(1),
            error: None,
            seq: 0,
            touched: HashMap::new(),
            count_changed: 0,
            count_set: 0,
            next_ticket: 0,
            applied_ticket: 0,
            fetches: Vec::new(),
            mutations: Vec::new(),
        }
    }

    fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    fn touch(&mut self, id: i64) -> u64 {
        let stamp = self.next_seq();
        self.touched.insert(id, stamp);
        stamp
    }

    fn written_since(&self, id: i64, start: u64) -> bool {
        self.touched.get(&id).is_some_and(|stamp| *stamp > start)
    }

    fn is_latest_write(&self, id: i64, stamp: u64) -> bool {
        self.touched.get(&id) == Some(&stamp)
    }

    fn position(&self, id: i64) -> Option<usize> {
        self.notifications.iter().position(|n| n.id == id)
    }

    fn adjust_count(&mut self, delta: i64, stamp: u64) {
        self.unread_count = self.unread_count.saturating_add_signed(delta);
        self.count_changed = stamp;
    }

    fn set_count(&mut self, value: u64, stamp: u64) {
        self.unread_count = value;
        self.count_changed = stamp;
        self.count_set = stamp;
    }

    fn begin_fetch(&mut self, page: u32) -> FetchTicket {
        self.next_ticket += 1;
        let ticket = FetchTicket {
            id: self.next_ticket,
            start: self.seq,
            page,
        };
        self.fetches.push(ticket);
        ticket
    }

    fn end_fetch(&mut self, ticket: &FetchTicket) {
        self.fetches.retain(|pending| pending.id != ticket.id);
    }

    fn end_mutation(&mut self, stamp: u64) {
        self.mutations.retain(|pending| *pending != stamp);
    }

    /// Forgets stamps no in-flight fetch or mutation can still compare
    /// against.
    fn prune(&mut self) {
        let floor = self
            .fetches
            .iter()
            .map(|ticket| ticket.start)
            .chain(self.mutations.iter().map(|stamp| stamp - 1))
            .min();
        match floor {
            Some(floor) => self.touched.retain(|_, stamp| *stamp > floor),
            None => self.touched.clear(),
        }
    }

    fn is_current(&self, ticket: &FetchTicket) -> bool {
        ticket.page == self.requested_page && ticket.id > self.applied_ticket
    }

    fn merge_page(&mut self, ticket: &FetchTicket, page: Page<Notification>) {
        let mut merged = Vec::with_capacity(page.content.len());

        // Pushed while the fetch was in flight and unknown to the server page.
        if ticket.page == 0 && self.page == 0 {
            merged.extend(
                self.notifications
                    .iter()
                    .filter(|local| self.written_since(local.id, ticket.start))
                    .filter(|local| page.content.iter().all(|remote| remote.id != local.id))
                    .cloned(),
            );
        }

        for remote in page.content {
            if !self.written_since(remote.id, ticket.start) {
                merged.push(remote);
            } else if let Some(index) = self.position(remote.id) {
                merged.push(self.notifications[index].clone());
            }
        }

        if ticket.page == 0 {
            merged.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            merged.truncate(self.page_size as usize);
        }

        self.notifications = merged;
        self.page = ticket.page;
        self.total_pages = page.total_pages;
        self.total_elements = page.total_elements;
        self.applied_ticket = ticket.id;
    }

    fn snapshot(&self) -> NotificationSnapshot {
        NotificationSnapshot {
            notifications: self.notifications.clone(),
            unread_count: self.unread_count,
            page: self.page,
            total_pages: self.total_pages,
            total_elements: self.total_elements,
            loading: !self.fetches.is_empty(),
            error: self.error.clone(),
            ..Default::default()
        }
    }
}

struct Inner {
    state: Mutex<State>,
    snapshot: watch::Sender<NotificationSnapshot>,
}

/// Owner of the notification list, unread counter and paging cursor.
///
/// Cloning is cheap; all clones share the same state. The connection and
/// dropdown fields of the published snapshots are left at their defaults for
/// the hub to fill in.
#[derive(Clone)]
pub struct NotificationStore {
    api: Arc<dyn NotificationApi>,
    inner: Arc<Inner>,
}

impl NotificationStore {
    pub fn new(api: Arc<dyn NotificationApi>, page_size: u32) -> Self {
        let state = State::new(page_size);
        let (snapshot, _) = watch::channel(state.snapshot());
        Self {
            api,
            inner: Arc::new(Inner {
                state: Mutex::new(state),
                snapshot,
            }),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<NotificationSnapshot> {
        self.inner.snapshot.subscribe()
    }

    pub fn snapshot(&self) -> NotificationSnapshot {
        self.lock().snapshot()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, state: &State) {
        self.inner.snapshot.send_replace(state.snapshot());
    }

    /// Refetches the current page together with the server's unread count.
    pub async fn refresh(&self) -> Result<(), ApiError> {
        let page = self.lock().requested_page;
        self.fetch(page).await
    }

    /// Fetches page `page` and makes it the current one.
    pub async fn go_to_page(&self, page: u32) -> Result<(), ApiError> {
        let page = {
            let mut state = self.lock();
            let last = state.total_pages.saturating_sub(1);
            let page = if state.total_pages > 0 {
                page.min(last)
            } else {
                page
            };
            state.requested_page = page;
            page
        };
        self.fetch(page).await
    }

    async fn fetch(&self, page: u32) -> Result<(), ApiError> {
        let (ticket, page_size) = {
            let mut state = self.lock();
            let ticket = state.begin_fetch(page);
            self.publish(&state);
            (ticket, state.page_size)
        };

        let (page_result, count_result) = tokio::join!(
            self.api.fetch_page(ticket.page, page_size),
            self.api.unread_count()
        );

        let mut state = self.lock();
        state.end_fetch(&ticket);

        let page_result = match page_result {
            Ok(page) => {
                if state.is_current(&ticket) {
                    state.merge_page(&ticket, page);
                }
                Ok(())
            }
            Err(e) => {
                if ticket.page == state.requested_page && ticket.page != state.page {
                    state.requested_page = state.page;
                }
                Err(e)
            }
        };
        let count_result = count_result.map(|count| {
            if state.count_changed <= ticket.start {
                state.unread_count = count;
            }
        });

        let result = page_result.and(count_result);
        match &result {
            Ok(()) => state.error = None,
            Err(e) => {
                log::warn!("Failed to fetch notifications page {}: {e}", ticket.page);
                state.error = Some(e.user_message());
            }
        }
        state.prune();
        self.publish(&state);
        result
    }

    /// Marks one notification as read. Does nothing when it already is.
    pub async fn mark_as_read(&self, id: i64) -> Result<(), ApiError> {
        let stamp = {
            let mut state = self.lock();
            match state.position(id) {
                Some(index) if state.notifications[index].read => return Ok(()),
                Some(index) => {
                    let stamp = state.touch(id);
                    state.notifications[index].read = true;
                    state.adjust_count(-1, stamp);
                    state.mutations.push(stamp);
                    self.publish(&state);
                    Some(stamp)
                }
                None => None,
            }
        };

        let result = self.api.mark_as_read(id).await;

        let mut state = self.lock();
        if let Err(e) = &result {
            log::warn!("Failed to mark notification {id} as read: {e}");
            if let Some(stamp) = stamp {
                if state.is_latest_write(id, stamp) {
                    let revert = state.touch(id);
                    if let Some(index) = state.position(id) {
                        state.notifications[index].read = false;
                    }
                    if state.count_set < stamp {
                        state.adjust_count(1, revert);
                    }
                }
            }
            state.error = Some(e.user_message());
        } else {
            state.error = None;
        }
        if let Some(stamp) = stamp {
            state.end_mutation(stamp);
        }
        state.prune();
        self.publish(&state);
        result
    }

    pub async fn mark_all_as_read(&self) -> Result<(), ApiError> {
        let (stamp, flipped, previous_count) = {
            let mut state = self.lock();
            let stamp = state.next_seq();
            let mut flipped = Vec::new();
            for notification in state.notifications.iter_mut().filter(|n| !n.read) {
                notification.read = true;
                flipped.push(notification.id);
            }
            for id in &flipped {
                state.touched.insert(*id, stamp);
            }
            let previous_count = state.unread_count;
            state.set_count(0, stamp);
            state.mutations.push(stamp);
            self.publish(&state);
            (stamp, flipped, previous_count)
        };

        let result = self.api.mark_all_as_read().await;

        let mut state = self.lock();
        if let Err(e) = &result {
            log::warn!("Failed to mark all notifications as read: {e}");
            let revert = state.next_seq();
            for id in flipped {
                if !state.is_latest_write(id, stamp) {
                    continue;
                }
                state.touched.insert(id, revert);
                if let Some(index) = state.position(id) {
                    state.notifications[index].read = false;
                }
            }
            if state.count_set == stamp {
                let restored = previous_count + state.unread_count;
                state.set_count(restored, revert);
            }
            state.error = Some(e.user_message());
        } else {
            state.error = None;
        }
        state.end_mutation(stamp);
        state.prune();
        self.publish(&state);
        result
    }

    pub async fn delete_notification(&self, id: i64) -> Result<(), ApiError> {
        let removed = {
            let mut state = self.lock();
            let stamp = state.touch(id);
            state.mutations.push(stamp);
            let removed = state.position(id).map(|index| {
                let notification = state.notifications.remove(index);
                if !notification.read {
                    state.adjust_count(-1, stamp);
                }
                state.total_elements = state.total_elements.saturating_sub(1);
                (index, notification)
            });
            self.publish(&state);
            (stamp, removed)
        };
        let (stamp, removed) = removed;

        let result = self.api.delete(id).await;

        let mut state = self.lock();
        if let Err(e) = &result {
            log::warn!("Failed to delete notification {id}: {e}");
            if let Some((index, notification)) = removed {
                if state.is_latest_write(id, stamp) && state.position(id).is_none() {
                    let revert = state.touch(id);
                    if !notification.read && state.count_set < stamp {
                        state.adjust_count(1, revert);
                    }
                    let index = index.min(state.notifications.len());
                    state.notifications.insert(index, notification);
                    state.total_elements += 1;
                }
            }
            state.error = Some(e.user_message());
        } else {
            state.error = None;
        }
        state.end_mutation(stamp);
        state.prune();
        self.publish(&state);
        result
    }

    /// Injects a notification pushed by the server. On the first page it
    /// becomes the newest entry and the oldest one is evicted; on later pages
    /// only the counters move.
    pub fn add_notification(&self, notification: Notification) {
        let mut state = self.lock();
        let stamp = state.touch(notification.id);

        if let Some(index) = state.position(notification.id) {
            state.notifications[index] = notification;
        } else {
            state.total_elements += 1;
            let page_size = u64::from(state.page_size);
            let pages = state.total_elements.div_ceil(page_size);
            state.total_pages = state
                .total_pages
                .max(u32::try_from(pages).unwrap_or(u32::MAX));
            if !notification.read {
                state.adjust_count(1, stamp);
            }
            if state.page == 0 {
                state.notifications.insert(0, notification);
                let limit = state.page_size as usize;
                state.notifications.truncate(limit);
            }
        }
        state.prune();
        self.publish(&state);
    }

    pub fn update_unread_count(&self, update: CountUpdate) {
        let mut state = self.lock();
        let stamp = state.next_seq();
        match update {
            CountUpdate::Delta(delta) => state.adjust_count(delta, stamp),
            CountUpdate::Value(value) => state.set_count(value, stamp),
        }
        self.publish(&state);
    }

    /// Applies a deletion announced by the server. Deleting an id this
    /// client already removed changes nothing.
    pub fn remove_notification(&self, id: i64) {
        let mut state = self.lock();
        let stamp = state.touch(id);
        if let Some(index) = state.position(id) {
            let notification = state.notifications.remove(index);
            if !notification.read {
                state.adjust_count(-1, stamp);
            }
            state.total_elements = state.total_elements.saturating_sub(1);
        }
        state.prune();
        self.publish(&state);
    }

    /// Applies a read receipt announced by the server.
    pub fn apply_read_echo(&self, id: i64) {
        let mut state = self.lock();
        let stamp = state.touch(id);
        if let Some(index) = state.position(id) {
            if !state.notifications[index].read {
                state.notifications[index].read = true;
                state.adjust_count(-1, stamp);
            }
        }
        state.prune();
        self.publish(&state);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::DateTime;
    use pretty_assertions::assert_eq;
    use seedlab_bridge::notification::NotificationKind;
    use tokio::sync::{Notify, oneshot};

    use super::*;

    pub(crate) fn notification(id: i64, read: bool) -> Notification {
        Notification {
            id,
            title: format!("Notificación {id}"),
            message: String::new(),
            kind: NotificationKind::AnalysisFinalized,
            read,
            created_at: DateTime::from_timestamp(1_740_830_400 + id * 60, 0).unwrap(),
            analysis_id: None,
        }
    }

    pub(crate) fn page_of(
        mut content: Vec<Notification>,
        number: u32,
        total: u64,
        size: u32,
    ) -> Page<Notification> {
        content.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total_pages = total.div_ceil(u64::from(size)) as u32;
        Page {
            content,
            total_elements: total,
            total_pages,
            number,
            first: number == 0,
            last: number + 1 >= total_pages,
        }
    }

    #[derive(Default)]
    pub(crate) struct FakeApi {
        pub pages: Mutex<HashMap<u32, Page<Notification>>>,
        pub unread: Mutex<u64>,
        pub fail: AtomicBool,
        pub fetches: AtomicUsize,
        pub mark_calls: AtomicUsize,
        pub entered: Notify,
        pub hold: Mutex<Option<oneshot::Receiver<()>>>,
    }

    impl FakeApi {
        fn check(&self) -> Result<(), ApiError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(ApiError::Status {
                    status: 500,
                    message: Some("Servicio no disponible".to_owned()),
                });
            }
            Ok(())
        }
    }

    #[async_trait]
    impl NotificationApi for FakeApi {
        async fn fetch_page(&self, page: u32, _size: u32) -> Result<Page<Notification>, ApiError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.entered.notify_one();
            let hold = self.hold.lock().unwrap().take();
            if let Some(hold) = hold {
                let _ = hold.await;
            }
            self.check()?;
            Ok(self
                .pages
                .lock()
                .unwrap()
                .get(&page)
                .cloned()
                .unwrap_or_default())
        }

        async fn unread_count(&self) -> Result<u64, ApiError> {
            self.check()?;
            Ok(*self.unread.lock().unwrap())
        }

        async fn mark_as_read(&self, _id: i64) -> Result<(), ApiError> {
            self.mark_calls.fetch_add(1, Ordering::SeqCst);
            self.check()
        }

        async fn mark_all_as_read(&self) -> Result<(), ApiError> {
            self.check()
        }

        async fn delete(&self, _id: i64) -> Result<(), ApiError> {
            self.check()
        }
    }

    fn store_with(first_page: Vec<Notification>, total: u64, unread: u64) -> (NotificationStore, Arc<FakeApi>) {
        let api = Arc::new(FakeApi::default());
        api.pages
            .lock()
            .unwrap()
            .insert(0, page_of(first_page, 0, total, 3));
        *api.unread.lock().unwrap() = unread;
        (NotificationStore::new(api.clone(), 3), api)
    }

    #[tokio::test]
    async fn unread_count_comes_from_the_server_when_paginated() {
        let (store, _api) = store_with(
            vec![notification(1, false), notification(2, true), notification(3, true)],
            45,
            17,
        );
        store.refresh().await.unwrap();

        let snapshot = store.snapshot();
        assert_eq!(snapshot.notifications.len(), 3);
        assert_eq!(snapshot.unread_count, 17);
        assert_eq!(snapshot.total_pages, 15);
        assert!(!snapshot.loading);
    }

    #[tokio::test]
    async fn mark_as_read_is_idempotent() {
        let (store, api) = store_with(vec![notification(1, false), notification(2, false)], 2, 2);
        store.refresh().await.unwrap();

        store.mark_as_read(1).await.unwrap();
        store.mark_as_read(1).await.unwrap();

        let snapshot = store.snapshot();
        assert_eq!(snapshot.unread_count, 1);
        assert_eq!(api.mark_calls.load(Ordering::SeqCst), 1);
        assert!(snapshot.notifications.iter().find(|n| n.id == 1).unwrap().read);
    }

    #[tokio::test]
    async fn failed_mark_as_read_is_reverted() {
        let (store, api) = store_with(vec![notification(1, false)], 1, 1);
        store.refresh().await.unwrap();
        api.fail.store(true, Ordering::SeqCst);

        assert!(store.mark_as_read(1).await.is_err());

        let snapshot = store.snapshot();
        assert_eq!(snapshot.unread_count, 1);
        assert!(!snapshot.notifications[0].read);
        assert_eq!(snapshot.error.as_deref(), Some("Servicio no disponible"));
    }

    #[tokio::test]
    async fn failed_delete_restores_position() {
        let (store, api) = store_with(
            vec![notification(1, true), notification(2, false), notification(3, true)],
            3,
            1,
        );
        store.refresh().await.unwrap();
        api.fail.store(true, Ordering::SeqCst);

        assert!(store.delete_notification(2).await.is_err());

        let snapshot = store.snapshot();
        let ids: Vec<i64> = snapshot.notifications.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
        assert_eq!(snapshot.unread_count, 1);
        assert_eq!(snapshot.total_elements, 3);
    }

    #[tokio::test]
    async fn mark_all_as_read_reverts_on_failure() {
        let (store, api) = store_with(vec![notification(1, false), notification(2, false)], 8, 6);
        store.refresh().await.unwrap();

        api.fail.store(true, Ordering::SeqCst);
        assert!(store.mark_all_as_read().await.is_err());
        let snapshot = store.snapshot();
        assert_eq!(snapshot.unread_count, 6);
        assert!(snapshot.notifications.iter().all(|n| !n.read));

        api.fail.store(false, Ordering::SeqCst);
        store.mark_all_as_read().await.unwrap();
        let snapshot = store.snapshot();
        assert_eq!(snapshot.unread_count, 0);
        assert!(snapshot.notifications.iter().all(|n| n.read));
        assert_eq!(snapshot.error, None);
    }

    #[tokio::test]
    async fn push_on_first_page_evicts_the_oldest() {
        let (store, _api) = store_with(
            vec![notification(1, true), notification(2, true), notification(3, true)],
            3,
            0,
        );
        store.refresh().await.unwrap();

        store.add_notification(notification(4, false));

        let snapshot = store.snapshot();
        let ids: Vec<i64> = snapshot.notifications.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![4, 3, 2]);
        assert_eq!(snapshot.unread_count, 1);
        assert_eq!(snapshot.total_elements, 4);
        assert_eq!(snapshot.total_pages, 2);
    }

    #[tokio::test]
    async fn push_on_later_page_only_moves_counters() {
        let (store, api) = store_with(vec![notification(5, true), notification(4, true), notification(3, true)], 5, 0);
        api.pages
            .lock()
            .unwrap()
            .insert(1, page_of(vec![notification(1, true), notification(2, true)], 1, 5, 3));
        store.refresh().await.unwrap();
        store.go_to_page(1).await.unwrap();

        store.add_notification(notification(6, false));

        let snapshot = store.snapshot();
        assert_eq!(snapshot.page, 1);
        assert_eq!(snapshot.notifications.len(), 2);
        assert_eq!(snapshot.unread_count, 1);
        assert_eq!(snapshot.total_elements, 6);
    }

    #[tokio::test]
    async fn read_echo_is_idempotent() {
        let (store, _api) = store_with(vec![notification(1, false)], 1, 1);
        store.refresh().await.unwrap();

        store.apply_read_echo(1);
        store.apply_read_echo(1);
        store.remove_notification(1);
        store.remove_notification(1);

        let snapshot = store.snapshot();
        assert_eq!(snapshot.unread_count, 0);
        assert_eq!(snapshot.total_elements, 0);
    }

    #[tokio::test]
    async fn push_during_fetch_survives_the_merge() {
        let (store, api) = store_with(vec![notification(1, false), notification(2, true)], 2, 1);
        let (release, hold) = oneshot::channel();
        *api.hold.lock().unwrap() = Some(hold);

        let fetching = tokio::spawn({
            let store = store.clone();
            async move { store.refresh().await }
        });
        api.entered.notified().await;
        assert!(store.snapshot().loading);

        store.add_notification(notification(7, false));
        store.remove_notification(1);
        release.send(()).unwrap();
        fetching.await.unwrap().unwrap();

        let snapshot = store.snapshot();
        let ids: Vec<i64> = snapshot.notifications.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![7, 2]);
        // The count changed locally after the fetch started, so the stale
        // server value is ignored.
        assert_eq!(snapshot.unread_count, 1);
    }

    #[tokio::test]
    async fn server_count_events_are_authoritative() {
        let (store, _api) = store_with(vec![notification(1, false)], 1, 1);
        store.refresh().await.unwrap();

        store.update_unread_count(CountUpdate::Delta(-5));
        assert_eq!(store.snapshot().unread_count, 0);
        store.update_unread_count(CountUpdate::Value(12));
        assert_eq!(store.snapshot().unread_count, 12);
    }

    #[tokio::test]
    async fn failed_fetch_keeps_the_list() {
        let (store, api) = store_with(vec![notification(1, false)], 1, 1);
        store.refresh().await.unwrap();
        api.fail.store(true, Ordering::SeqCst);

        assert!(store.go_to_page(1).await.is_err());

        let snapshot = store.snapshot();
        assert_eq!(snapshot.page, 0);
        assert_eq!(snapshot.notifications.len(), 1);
        assert!(snapshot.error.is_some());
    }
}
