//! Browse controller: the search box, the category selector, and the
//! result list they drive.
//!
//! Typing goes through the [`Debouncer`]; pressing Enter (or a final
//! voice transcript) runs the filter right away, cancels any pending
//! typed request, and logs the keyword in the background.

use anyhow::Result;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;

use quickknowledge_core::models::FaqRecord;
use quickknowledge_core::search::FilterQuery;
use quickknowledge_core::store::{FaqStore, SearchLogStore};
use quickknowledge_core::view::ViewState;

use crate::context::AppContext;
use crate::debounce::Debouncer;
use crate::get;
use crate::search::{log_search, print_faqs};

#[derive(Debug, Clone, Default)]
pub struct BrowseState {
    pub query: FilterQuery,
    pub results: ViewState<Vec<FaqRecord>>,
}

pub struct BrowseController<S> {
    store: Arc<S>,
    debouncer: Debouncer,
    state: Arc<Mutex<BrowseState>>,
}

fn lock(state: &Mutex<BrowseState>) -> MutexGuard<'_, BrowseState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl<S> BrowseController<S>
where
    S: FaqStore + SearchLogStore + 'static,
{
    pub fn new(store: Arc<S>, debounce_ms: u64) -> Self {
        Self {
            store,
            debouncer: Debouncer::from_millis(debounce_ms),
            state: Arc::new(Mutex::new(BrowseState::default())),
        }
    }

    pub fn snapshot(&self) -> BrowseState {
        lock(&self.state).clone()
    }

    /// A keystroke. The filter runs once typing pauses.
    pub fn on_input(&self, text: &str) -> JoinHandle<bool> {
        lock(&self.state).query.keyword = Some(text.to_string());
        let store = Arc::clone(&self.store);
        let state = Arc::clone(&self.state);
        self.debouncer
            .call(move || async move { refresh(store.as_ref(), &state).await })
    }

    /// Enter in the search box. Returns the background log task, if a
    /// keyword was logged.
    pub async fn submit(&self, text: &str) -> Option<JoinHandle<()>> {
        self.debouncer.cancel();
        let keyword = {
            let mut state = lock(&self.state);
            state.query.keyword = Some(text.to_string());
            state.query.keyword().map(str::to_string)
        };

        let log_task = keyword.map(|keyword| {
            let store = Arc::clone(&self.store);
            tokio::spawn(async move { log_search(store.as_ref(), &keyword).await })
        });

        refresh(self.store.as_ref(), &self.state).await;
        log_task
    }

    /// A final speech-to-text transcript counts as a submit.
    pub async fn on_transcript(&self, transcript: &str) -> Option<JoinHandle<()>> {
        self.submit(transcript).await
    }

    /// Pick a category (`None` for all). Applies immediately.
    pub async fn select_category(&self, category: Option<&str>) {
        lock(&self.state).query.category = category.map(str::to_string);
        refresh(self.store.as_ref(), &self.state).await;
    }

    /// Reload from the store with the current query.
    pub async fn reload(&self) {
        refresh(self.store.as_ref(), &self.state).await;
    }
}

async fn refresh<S: FaqStore + ?Sized>(store: &S, state: &Mutex<BrowseState>) {
    let query = {
        let mut state = lock(state);
        state.results.begin();
        state.query.clone()
    };
    let outcome = store.get_all().await.map(|records| query.apply(&records));
    lock(state).results.finish(outcome);
}

const BROWSE_HELP: &str = "\
Type a search and press Enter. Other commands:
  :type <text>   preview results as if typing (debounced)
  :cat <name>    filter by category      :all   all categories
  :open <n>      open the n-th result    :quit  leave";

/// Interactive loop over stdin.
pub async fn run_browse(ctx: &AppContext) -> Result<()> {
    let controller = BrowseController::new(Arc::clone(&ctx.store), ctx.config.search.debounce_ms);
    controller.reload().await;

    println!("{}", BROWSE_HELP);
    println!();
    render(&controller.snapshot());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line == ":quit" || line == ":q" {
            break;
        } else if line == ":all" {
            controller.select_category(None).await;
        } else if let Some(name) = line.strip_prefix(":cat ") {
            controller.select_category(Some(name.trim())).await;
        } else if let Some(text) = line.strip_prefix(":type ") {
            if !controller.on_input(text).await? {
                continue;
            }
        } else if let Some(n) = line.strip_prefix(":open ") {
            open_nth(ctx, &controller.snapshot(), n.trim()).await;
            continue;
        } else if line == ":help" {
            println!("{}", BROWSE_HELP);
            continue;
        } else {
            controller.submit(line).await;
        }
        render(&controller.snapshot());
    }

    Ok(())
}

async fn open_nth(ctx: &AppContext, state: &BrowseState, n: &str) {
    let Some(record) = n
        .parse::<usize>()
        .ok()
        .and_then(|i| i.checked_sub(1))
        .and_then(|i| state.results.data().and_then(|r| r.get(i)))
    else {
        println!("No result #{}.", n);
        return;
    };
    if let Err(e) = get::run_show(ctx, &record.id, false).await {
        eprintln!("Error: {:#}", e);
    }
}

fn render(state: &BrowseState) {
    match &state.results {
        ViewState::Idle | ViewState::Loading => println!("Loading..."),
        ViewState::Failed(msg) => println!("Could not load FAQs: {}", msg),
        ViewState::Loaded(records) => {
            let scope = state.query.category().unwrap_or("all categories");
            match state.query.keyword() {
                Some(k) => println!("{} result(s) for \"{}\" in {}", records.len(), k, scope),
                None => println!("{} FAQ(s) in {}", records.len(), scope),
            }
            println!();
            print_faqs(records);
        }
    }
}
