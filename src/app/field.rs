//! Async driver for one suggestion field.
//!
//! [`SuggestionField`] owns a [`SuggestionState`], feeds events through
//! [`handle_event`] and performs the returned actions: it arms and disarms
//! the debounce timer, runs article searches and notifies the embedding form
//! of selections.
//!
//! Timer and search tasks report back through a channel owned by the field.
//! Dropping the field aborts both tasks and closes the channel, so nothing
//! is applied after the field is gone.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::Instrument;

use super::{handle_event, Action, Event, SuggestionSettings, SuggestionState};
use crate::access::ApiClient;
use crate::domain::error::Result;
use crate::domain::Article;
use crate::ui::viewmodel::SuggestionViewModel;

/// Source of article suggestions.
#[async_trait]
pub trait ArticleSearch: Send + Sync {
    async fn search(&self, query: &str, limit: u32) -> Result<Vec<Article>>;
}

#[async_trait]
impl ArticleSearch for ApiClient {
    async fn search(&self, query: &str, limit: u32) -> Result<Vec<Article>> {
        Ok(self.search_articles(query, limit).await?.articles)
    }
}

/// Spawned task that is aborted when the handle is dropped or replaced.
#[derive(Debug)]
struct ScopedTask(JoinHandle<()>);

impl Drop for ScopedTask {
    fn drop(&mut self) {
        self.0.abort();
    }
}

type SelectCallback = Box<dyn FnMut(&Article) + Send>;

pub struct SuggestionField {
    state: SuggestionState,
    search: Arc<dyn ArticleSearch>,
    tx: mpsc::UnboundedSender<Event>,
    rx: mpsc::UnboundedReceiver<Event>,
    timer: Option<ScopedTask>,
    query_task: Option<ScopedTask>,
    on_select: Option<SelectCallback>,
}

impl SuggestionField {
    pub fn new(search: Arc<dyn ArticleSearch>, settings: SuggestionSettings) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            state: SuggestionState::new(settings),
            search,
            tx,
            rx,
            timer: None,
            query_task: None,
            on_select: None,
        }
    }

    /// Registers the callback invoked with each selected article.
    #[must_use]
    pub fn on_select(mut self, callback: impl FnMut(&Article) + Send + 'static) -> Self {
        self.on_select = Some(Box::new(callback));
        self
    }

    #[must_use]
    pub const fn state(&self) -> &SuggestionState {
        &self.state
    }

    #[must_use]
    pub fn viewmodel(&self) -> SuggestionViewModel {
        self.state.compute_viewmodel()
    }

    /// Whether a timer or a search is still outstanding.
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        self.state.pending.is_some() || self.state.in_flight.is_some()
    }

    /// Handles one event and performs its actions. Must run inside a tokio
    /// runtime. Returns whether the view changed.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`handle_event`].
    pub fn dispatch(&mut self, event: Event) -> Result<bool> {
        let mut render = false;
        let mut queue = vec![event];

        while let Some(event) = queue.pop() {
            let (changed, actions) = handle_event(&mut self.state, &event)?;
            render |= changed;

            for action in actions {
                match action {
                    Action::ScheduleSearch {
                        query,
                        delay,
                        generation,
                    } => self.arm_timer(query, delay, generation),
                    Action::CancelScheduledSearch => self.timer = None,
                    Action::IssueSearch { query, limit } => self.issue_search(query, limit),
                    Action::CancelSearch => self.query_task = None,
                    Action::ReplaceText(text) => queue.push(Event::TextReplaced(text)),
                    Action::NotifySelected(article) => {
                        if let Some(callback) = self.on_select.as_mut() {
                            callback(&article);
                        }
                    }
                }
            }
        }

        tracing::debug!(phase = self.state.phase().label(), render, "field updated");
        Ok(render)
    }

    fn arm_timer(&mut self, query: String, delay: Duration, generation: u64) {
        let tx = self.tx.clone();
        self.timer = Some(ScopedTask(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(Event::DebounceElapsed { query, generation });
        })));
    }

    fn issue_search(&mut self, query: String, limit: u32) {
        self.timer = None;
        let tx = self.tx.clone();
        let search = Arc::clone(&self.search);
        let span = tracing::debug_span!("article_search", query = %query, limit);

        self.query_task = Some(ScopedTask(tokio::spawn(
            async move {
                let event = match search.search(&query, limit).await {
                    Ok(articles) => Event::SearchCompleted { query, articles },
                    Err(e) => Event::SearchFailed {
                        query,
                        message: e.to_string(),
                    },
                };
                let _ = tx.send(event);
            }
            .instrument(span),
        )));
    }

    /// Waits for the next timer or search outcome and handles it.
    ///
    /// Returns `Ok(None)` when nothing is outstanding.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`handle_event`].
    pub async fn next(&mut self) -> Result<Option<bool>> {
        if !self.is_busy() {
            return Ok(None);
        }
        match self.rx.recv().await {
            Some(event) => self.dispatch(event).map(Some),
            None => Ok(None),
        }
    }

    /// Handles timer and search outcomes until nothing is outstanding.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`handle_event`].
    pub async fn settle(&mut self) -> Result<()> {
        while self.next().await?.is_some() {}
        Ok(())
    }
}

impl std::fmt::Debug for SuggestionField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuggestionField")
            .field("state", &self.state)
            .field("timer", &self.timer.is_some())
            .field("query_task", &self.query_task.is_some())
            .finish_non_exhaustive()
    }
}
