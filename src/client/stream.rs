//! Incremental polling of "new" listings into a duplicate-free stream.
//!
//! A stream starts by fetching the single newest item and using its id as the
//! cursor. A background task then repeatedly asks for items newer than the
//! cursor, emits the ones it has not emitted recently (oldest first), moves
//! the cursor and sleeps. The task runs until the stream is closed or
//! dropped, or a fetch fails; the failure is delivered as the last item.

use super::listing::{Sort, TimeWindow, LISTABLE, MAX_LIMIT};
use super::{RedditClient, Result, Target};
use crate::models::{Comment, Post, RedditThing, ThingId};
use async_trait::async_trait;
use futures::Stream;
use log::{debug, info, warn};
use std::collections::{HashSet, VecDeque};
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// How many recently emitted ids are remembered for deduplication.
pub const DEDUP_WINDOW: usize = 100;

/// Items buffered between the poll task and the consumer.
pub const STREAM_BUFFER: usize = 100;

/// Where a stream gets its items from.
#[async_trait]
pub trait ListingSource<T>: Send + Sync + 'static {
    /// The newest items, newest first, used to anchor the cursor.
    async fn newest(&self, limit: u32) -> Result<Vec<T>>;

    /// Items newer than `cursor`, newest first. An empty cursor means no
    /// lower bound.
    async fn newer_than(&self, cursor: &ThingId, limit: u32) -> Result<Vec<T>>;
}

/// Posts of a subreddit or redditor.
pub struct PostSource(pub Target);

/// Comments of a subreddit or redditor.
pub struct CommentSource(pub Target);

#[async_trait]
impl ListingSource<Post> for PostSource {
    async fn newest(&self, limit: u32) -> Result<Vec<Post>> {
        Ok(self.0.posts(Sort::New, TimeWindow::All, limit).await?.items)
    }

    async fn newer_than(&self, cursor: &ThingId, limit: u32) -> Result<Vec<Post>> {
        Ok(self.0.posts_newer_than(cursor, limit).await?.items)
    }
}

#[async_trait]
impl ListingSource<Comment> for CommentSource {
    async fn newest(&self, limit: u32) -> Result<Vec<Comment>> {
        Ok(self.0.comments(Sort::New, TimeWindow::All, limit).await?.items)
    }

    async fn newer_than(&self, cursor: &ThingId, limit: u32) -> Result<Vec<Comment>> {
        Ok(self.0.comments_newer_than(cursor, limit).await?.items)
    }
}

/// Poll position and the window of recently emitted ids.
#[derive(Debug, Clone)]
pub struct PollCursor {
    last_seen: ThingId,
    order: VecDeque<ThingId>,
    seen: HashSet<ThingId>,
    capacity: usize,
}

impl PollCursor {
    pub fn new(last_seen: ThingId) -> Self {
        Self::with_capacity(last_seen, DEDUP_WINDOW)
    }

    pub fn with_capacity(last_seen: ThingId, capacity: usize) -> Self {
        Self {
            last_seen,
            order: VecDeque::with_capacity(capacity),
            seen: HashSet::with_capacity(capacity),
            capacity,
        }
    }

    pub fn last_seen(&self) -> &ThingId {
        &self.last_seen
    }

    pub fn has_emitted(&self, id: &ThingId) -> bool {
        self.seen.contains(id)
    }

    pub fn window_len(&self) -> usize {
        self.order.len()
    }

    /// Record `id` as emitted. Returns false if it already was.
    fn remember(&mut self, id: ThingId) -> bool {
        if self.seen.contains(&id) {
            return false;
        }
        if self.order.len() == self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.seen.remove(&oldest);
            }
        }
        self.seen.insert(id.clone());
        self.order.push_back(id);
        true
    }

    /// Consume one poll result (newest first) and return the items to emit,
    /// oldest first.
    ///
    /// The cursor moves to the second-newest id when more than two items came
    /// back, resets when none did, and is otherwise left alone.
    pub fn absorb<T: RedditThing>(&mut self, items: Vec<T>) -> Vec<T> {
        match items.len() {
            0 => self.last_seen = ThingId::default(),
            1 | 2 => {}
            _ => self.last_seen = items[1].id(),
        }
        items
            .into_iter()
            .rev()
            .filter(|item| self.remember(item.id()))
            .collect()
    }
}

/// A live stream of items. Dropping it stops the poll task.
pub struct SubmissionStream<T> {
    rx: mpsc::Receiver<Result<T>>,
    cancel: CancellationToken,
}

impl<T> SubmissionStream<T> {
    /// Stop polling. Items already buffered can still be read.
    pub fn close(&self) {
        self.cancel.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl<T> Stream for SubmissionStream<T> {
    type Item = Result<T>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

impl<T> Drop for SubmissionStream<T> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Anchor on the newest item of `source` and start polling it.
///
/// Anchor failures are returned here rather than through the stream.
pub async fn spawn_stream<T, S>(source: S, interval: Duration) -> Result<SubmissionStream<T>>
where
    T: RedditThing + Send + 'static,
    S: ListingSource<T>,
{
    let anchor = source.newest(1).await?;
    let cursor = PollCursor::new(anchor.first().map(|item| item.id()).unwrap_or_default());
    info!("Starting stream at {:?}", cursor.last_seen().as_str());

    let (tx, rx) = mpsc::channel(STREAM_BUFFER);
    let cancel = CancellationToken::new();
    tokio::spawn(poll(source, cursor, interval, tx, cancel.clone()));
    Ok(SubmissionStream { rx, cancel })
}

async fn poll<T, S>(
    source: S,
    mut cursor: PollCursor,
    interval: Duration,
    tx: mpsc::Sender<Result<T>>,
    cancel: CancellationToken,
) where
    T: RedditThing + Send + 'static,
    S: ListingSource<T>,
{
    loop {
        if cancel.is_cancelled() || tx.is_closed() {
            break;
        }

        let items = match source.newer_than(cursor.last_seen(), MAX_LIMIT).await {
            Ok(items) => items,
            Err(e) => {
                warn!("Stream stopped: {}", e);
                tokio::select! {
                    _ = cancel.cancelled() => {}
                    _ = tx.send(Err(e)) => {}
                }
                break;
            }
        };

        let fetched = items.len();
        let fresh = cursor.absorb(items);
        debug!(
            "Polled {} items, {} new, cursor now {:?}",
            fetched,
            fresh.len(),
            cursor.last_seen().as_str()
        );

        for item in fresh {
            tokio::select! {
                _ = cancel.cancelled() => return,
                sent = tx.send(Ok(item)) => {
                    if sent.is_err() {
                        return;
                    }
                }
            }
        }

        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(interval) => {}
        }
    }
    info!("Stream closed");
}

impl Target {
    /// Stream new posts using the configured post interval.
    pub async fn stream_posts(&self) -> Result<SubmissionStream<Post>> {
        let interval = self.client.config().post_stream_interval;
        self.stream_posts_every(interval).await
    }

    pub async fn stream_posts_every(&self, interval: Duration) -> Result<SubmissionStream<Post>> {
        self.check("stream_posts", LISTABLE)?;
        spawn_stream(PostSource(self.clone()), interval).await
    }

    /// Stream new comments using the configured comment interval.
    pub async fn stream_comments(&self) -> Result<SubmissionStream<Comment>> {
        let interval = self.client.config().comment_stream_interval;
        self.stream_comments_every(interval).await
    }

    pub async fn stream_comments_every(
        &self,
        interval: Duration,
    ) -> Result<SubmissionStream<Comment>> {
        self.check("stream_comments", LISTABLE)?;
        spawn_stream(CommentSource(self.clone()), interval).await
    }
}

impl RedditClient {
    /// Stream new posts of the next queued subreddit or redditor.
    pub async fn stream_posts(&self) -> Result<SubmissionStream<Post>> {
        self.selected_for("stream_posts", LISTABLE)
            .await?
            .stream_posts()
            .await
    }

    /// Stream new comments of the next queued subreddit or redditor.
    pub async fn stream_comments(&self) -> Result<SubmissionStream<Comment>> {
        self.selected_for("stream_comments", LISTABLE)
            .await?
            .stream_comments()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::RedditClientError;
    use chrono::{DateTime, Utc};
    use futures::StreamExt;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, PartialEq)]
    struct Item(&'static str);

    impl RedditThing for Item {
        fn id(&self) -> ThingId {
            ThingId::from(self.0)
        }

        fn created_at(&self) -> DateTime<Utc> {
            DateTime::default()
        }

        fn url(&self) -> String {
            String::new()
        }
    }

    fn items(ids: &[&'static str]) -> Vec<Item> {
        ids.iter().map(|id| Item(*id)).collect()
    }

    /// Replays scripted poll results and records the cursors it was asked for.
    #[derive(Clone, Default)]
    struct Scripted {
        anchor: Vec<Item>,
        polls: Arc<Mutex<VecDeque<Result<Vec<Item>>>>>,
        cursors: Arc<Mutex<Vec<String>>>,
        fetches: Arc<AtomicUsize>,
    }

    impl Scripted {
        fn new(anchor: &[&'static str], polls: Vec<Result<Vec<Item>>>) -> Self {
            Self {
                anchor: items(anchor),
                polls: Arc::new(Mutex::new(polls.into())),
                ..Self::default()
            }
        }
    }

    #[async_trait]
    impl ListingSource<Item> for Scripted {
        async fn newest(&self, _limit: u32) -> Result<Vec<Item>> {
            Ok(self.anchor.clone())
        }

        async fn newer_than(&self, cursor: &ThingId, _limit: u32) -> Result<Vec<Item>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.cursors.lock().unwrap().push(cursor.to_string());
            self.polls.lock().unwrap().pop_front().unwrap_or_else(|| Ok(Vec::new()))
        }
    }

    struct FailingAnchor;

    #[async_trait]
    impl ListingSource<Item> for FailingAnchor {
        async fn newest(&self, _limit: u32) -> Result<Vec<Item>> {
            Err(RedditClientError::Status {
                status: 500,
                body: String::new(),
            })
        }

        async fn newer_than(&self, _cursor: &ThingId, _limit: u32) -> Result<Vec<Item>> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn cursor_rules() {
        let mut cursor = PollCursor::new(ThingId::from("t3_x"));

        cursor.absorb(items(&["t3_a"]));
        assert_eq!(cursor.last_seen(), "t3_x");
        cursor.absorb(items(&["t3_c", "t3_b"]));
        assert_eq!(cursor.last_seen(), "t3_x");

        cursor.absorb(items(&["t3_f", "t3_e", "t3_d"]));
        assert_eq!(cursor.last_seen(), "t3_e");

        cursor.absorb(Vec::<Item>::new());
        assert!(cursor.last_seen().is_empty());
    }

    #[test]
    fn emits_oldest_first_and_skips_recent() {
        let mut cursor = PollCursor::new(ThingId::default());
        let first = cursor.absorb(items(&["t3_c", "t3_b", "t3_a"]));
        assert_eq!(first, items(&["t3_a", "t3_b", "t3_c"]));

        let second = cursor.absorb(items(&["t3_e", "t3_d", "t3_c"]));
        assert_eq!(second, items(&["t3_d", "t3_e"]));
    }

    #[test]
    fn quiet_target_replays_the_window_once() {
        let mut cursor = PollCursor::new(ThingId::from("t3_c"));

        // Nothing newer than the anchor, so the cursor resets.
        assert!(cursor.absorb(Vec::<Item>::new()).is_empty());
        assert!(cursor.last_seen().is_empty());

        // The unbounded poll returns items older than the stream, anchor
        // included. They were never emitted, so they go out once.
        let replay = cursor.absorb(items(&["t3_c", "t3_b", "t3_a"]));
        assert_eq!(replay, items(&["t3_a", "t3_b", "t3_c"]));
        assert_eq!(cursor.last_seen(), "t3_b");

        assert!(cursor.absorb(Vec::<Item>::new()).is_empty());
        assert!(cursor.absorb(items(&["t3_c", "t3_b", "t3_a"])).is_empty());
    }

    #[test]
    fn dedup_window_evicts_oldest() {
        let mut cursor = PollCursor::with_capacity(ThingId::default(), 3);
        for id in ["t1_a", "t1_b", "t1_c", "t1_d"] {
            assert!(cursor.remember(ThingId::from(id)));
        }
        assert_eq!(cursor.window_len(), 3);
        assert!(!cursor.has_emitted(&ThingId::from("t1_a")));
        assert!(cursor.has_emitted(&ThingId::from("t1_d")));
        assert!(!cursor.remember(ThingId::from("t1_b")));
        // Evicted ids can be emitted again.
        assert!(cursor.remember(ThingId::from("t1_a")));
    }

    #[test]
    fn default_window_holds_one_hundred() {
        let mut cursor = PollCursor::new(ThingId::default());
        for i in 0..150 {
            cursor.remember(ThingId::from(format!("t3_{}", i)));
        }
        assert_eq!(cursor.window_len(), DEDUP_WINDOW);
        assert!(!cursor.has_emitted(&ThingId::from("t3_49")));
        assert!(cursor.has_emitted(&ThingId::from("t3_50")));
    }

    #[tokio::test]
    async fn emits_each_item_once_across_polls() {
        let source = Scripted::new(
            &["t3_c"],
            vec![
                Ok(items(&["t3_c", "t3_b", "t3_a"])),
                Ok(items(&["t3_e", "t3_d", "t3_c"])),
                Ok(Vec::new()),
            ],
        );
        let mut stream = spawn_stream(source.clone(), Duration::from_millis(5))
            .await
            .unwrap();

        let mut got = Vec::new();
        for _ in 0..5 {
            got.push(stream.next().await.unwrap().unwrap().0);
        }
        assert_eq!(got, vec!["t3_a", "t3_b", "t3_c", "t3_d", "t3_e"]);

        // Wait for the empty poll and the one after it.
        while source.fetches.load(Ordering::SeqCst) < 4 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        let cursors = source.cursors.lock().unwrap().clone();
        assert_eq!(&cursors[..4], &["t3_c", "t3_b", "t3_d", ""]);
        assert!(!stream.is_closed());
    }

    #[tokio::test]
    async fn fetch_error_is_last_item() {
        let source = Scripted::new(
            &[],
            vec![
                Ok(items(&["t3_a"])),
                Err(RedditClientError::Status {
                    status: 503,
                    body: "busy".into(),
                }),
            ],
        );
        let mut stream = spawn_stream(source.clone(), Duration::from_millis(1))
            .await
            .unwrap();

        assert_eq!(stream.next().await.unwrap().unwrap().0, "t3_a");
        assert!(matches!(
            stream.next().await,
            Some(Err(RedditClientError::Status { status: 503, .. }))
        ));
        assert!(stream.next().await.is_none());
        assert_eq!(source.fetches.load(Ordering::SeqCst), 2);
        assert_eq!(source.cursors.lock().unwrap()[0], "");
    }

    #[tokio::test]
    async fn anchor_failure_is_returned_synchronously() {
        let result = spawn_stream(FailingAnchor, Duration::from_millis(1)).await;
        assert!(matches!(
            result,
            Err(RedditClientError::Status { status: 500, .. })
        ));
    }

    #[tokio::test]
    async fn close_interrupts_sleep() {
        let source = Scripted::new(&["t3_a"], vec![Ok(Vec::new())]);
        let mut stream = spawn_stream(source.clone(), Duration::from_secs(3600))
            .await
            .unwrap();

        while source.fetches.load(Ordering::SeqCst) < 1 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        stream.close();
        let ended = tokio::time::timeout(Duration::from_secs(1), stream.next()).await;
        assert!(matches!(ended, Ok(None)));
        assert_eq!(source.fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn dropping_stream_stops_polling() {
        let source = Scripted::new(&[], Vec::new());
        let stream = spawn_stream(source.clone(), Duration::from_millis(5))
            .await
            .unwrap();
        while source.fetches.load(Ordering::SeqCst) < 1 {
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
        drop(stream);
        tokio::time::sleep(Duration::from_millis(30)).await;
        let after_drop = source.fetches.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(source.fetches.load(Ordering::SeqCst), after_drop);
    }
}
