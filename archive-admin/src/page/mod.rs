//! Admin list pages
//!
//! A [`ListPage`] is the parent of one selectable table. It loads rows
//! through the query cache, keeps the selected ids reported by the table,
//! and runs bulk actions over them. After a successful action the
//! controller resets the selection through the page and invalidates the
//! page's query, which refetches the rows once.

mod columns;
mod query;

pub use columns::*;
pub use query::*;

use std::fmt;
use std::sync::Arc;
use std::sync::RwLock;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use archive_lib::CacheStatus;
use archive_lib::api::BulkApi;
use archive_lib::api::ListApi;
use archive_lib::cache::QueryCache;
use archive_lib::cache::QueryKey;
use archive_lib::model::Document;
use archive_lib::model::TenantId;
use archive_lib::model::User;
use archive_table::RowId;
use archive_table::SelectionCallback;
use archive_table::Table;
use archive_table::TableError;
use archive_table::TableOptions;
use archive_table::TableView;
use archive_table::render_text;
use async_trait::async_trait;
use log::debug;
use log::warn;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::bulk::BulkAction;
use crate::bulk::BulkActionController;
use crate::bulk::BulkError;
use crate::bulk::BulkHooks;
use crate::bulk::BulkOutcome;
use crate::bulk::BulkScope;
use crate::bulk::BulkToolbar;
use crate::bulk::Confirmation;
use crate::bulk::QueryInvalidator;
use crate::bulk::SelectionSink;
use crate::notify::Notifier;

/// Page error type.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("cannot load rows: {0}")]
    Fetch(#[from] archive_lib::error::Error),

    #[error(transparent)]
    Table(#[from] TableError),
}

/// Rows a page can show and cache.
pub trait PageRow: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {}

impl<T> PageRow for T where T: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {}

// =============================================================================
// Shared state
// =============================================================================

struct PageShared<T: PageRow> {
    table: Table<T>,
    query: Arc<dyn RowQuery<T>>,
    cache: QueryCache,
    selected: Arc<RwLock<Vec<RowId>>>,
    fetches: AtomicUsize,
}

impl<T: PageRow> PageShared<T> {
    /// Loads rows through the cache and hands them to the table.
    async fn reload(&self) -> Result<CacheStatus, PageError> {
        let key = self.query.key();
        let response = self
            .cache
            .fetch(&key, || async {
                self.fetches.fetch_add(1, Ordering::SeqCst);
                self.query.fetch().await
            })
            .await?;
        let status = response.cache;
        let rows = response.into_inner();
        debug!("Loaded {} rows for {} ({:?})", rows.len(), key, status);
        self.table.set_rows(rows)?;
        Ok(status)
    }
}

impl<T: PageRow> SelectionSink for PageShared<T> {
    fn reset_selection(&self) {
        self.table.reset_selection();
    }
}

#[async_trait]
impl<T: PageRow> QueryInvalidator for PageShared<T> {
    async fn invalidate(&self, key: &QueryKey) {
        self.cache.invalidate(key).await;
        if *key != self.query.key() {
            return;
        }
        if let Err(e) = self.reload().await {
            warn!("Refetch of {} failed: {}", key, e);
        }
    }
}

// =============================================================================
// ListPage
// =============================================================================

/// One admin list: table, row query, selected ids and bulk actions.
///
/// # Example
///
/// ```ignore
/// let page = ListPage::documents(client, tenant, cache, toasts, config.table_options())?;
/// page.load().await?;
/// page.table().toggle_row("d1");
/// page.open_bulk(BulkAction::DeleteDocuments)?;
/// page.confirm_bulk().await;
/// ```
pub struct ListPage<T: PageRow> {
    shared: Arc<PageShared<T>>,
    listener: Arc<RwLock<Option<SelectionCallback>>>,
    controller: BulkActionController,
    actions: Vec<BulkAction>,
}

impl<T: PageRow> ListPage<T> {
    /// Wires `table` to a query and a bulk controller for `scope`.
    ///
    /// Replaces the table's selection callback. Rows already selected in
    /// `table` count as the page's selection.
    pub fn new(
        table: Table<T>,
        query: impl RowQuery<T> + 'static,
        cache: QueryCache,
        api: Arc<dyn BulkApi>,
        scope: BulkScope,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        if !table.selection_enabled() {
            warn!("{} has selection disabled; bulk actions stay unavailable", table.id());
        }
        if scope.query_key() != query.key() {
            warn!(
                "Bulk scope {} does not refresh query {}",
                scope,
                query.key()
            );
        }

        let selected = Arc::new(RwLock::new(table.selected_ids()));
        let listener: Arc<RwLock<Option<SelectionCallback>>> = Arc::default();
        {
            let selected = Arc::clone(&selected);
            let listener = Arc::clone(&listener);
            table.on_selection_change(move |ids| {
                if let Ok(mut guard) = selected.write() {
                    *guard = ids.to_vec();
                }
                let callback = listener.read().ok().and_then(|guard| guard.as_ref().cloned());
                if let Some(callback) = callback {
                    callback(ids);
                }
            });
        }

        let shared = Arc::new(PageShared {
            table,
            query: Arc::new(query),
            cache,
            selected,
            fetches: AtomicUsize::new(0),
        });
        let hooks = BulkHooks::new(
            Arc::clone(&shared) as Arc<dyn SelectionSink>,
            Arc::clone(&shared) as Arc<dyn QueryInvalidator>,
            notifier,
        );
        let actions = match &scope {
            BulkScope::Documents(_) => BulkAction::document_actions(),
            BulkScope::Users => BulkAction::user_actions(),
        };
        let controller = BulkActionController::new(api, scope, hooks);

        Self {
            shared,
            listener,
            controller,
            actions,
        }
    }

    /// Replaces the actions offered in the toolbar.
    pub fn with_actions(mut self, actions: Vec<BulkAction>) -> Self {
        self.actions = actions;
        self
    }

    /// Also reports selection changes to `callback`.
    pub fn on_selection_change<F>(&self, callback: F)
    where
        F: Fn(&[RowId]) + Send + Sync + 'static,
    {
        if let Ok(mut guard) = self.listener.write() {
            *guard = Some(Arc::new(callback));
        }
    }

    pub fn table(&self) -> &Table<T> {
        &self.shared.table
    }

    pub fn controller(&self) -> &BulkActionController {
        &self.controller
    }

    /// Cache key of this page's rows.
    pub fn query_key(&self) -> QueryKey {
        self.shared.query.key()
    }

    /// Loads rows, from the cache when fresh.
    pub async fn load(&self) -> Result<CacheStatus, PageError> {
        self.shared.reload().await
    }

    /// Drops cached rows and fetches them again.
    pub async fn refetch(&self) -> Result<CacheStatus, PageError> {
        self.shared.cache.invalidate(&self.query_key()).await;
        self.shared.reload().await
    }

    /// Number of requests sent for row data.
    pub fn fetch_count(&self) -> usize {
        self.shared.fetches.load(Ordering::SeqCst)
    }

    /// Selected ids as last reported by the table.
    pub fn selected(&self) -> Vec<RowId> {
        self.shared
            .selected
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    /// Bulk actions for the current selection.
    pub fn toolbar(&self) -> BulkToolbar {
        BulkToolbar::new(&self.controller, self.actions.iter().cloned(), &self.selected())
    }

    /// Asks for confirmation of `action` over the current selection.
    pub fn open_bulk(&self, action: BulkAction) -> Result<Confirmation, BulkError> {
        self.controller.open(action, &self.selected())
    }

    /// Runs the pending action.
    pub async fn confirm_bulk(&self) -> BulkOutcome {
        self.controller.confirm().await
    }

    pub fn cancel_bulk(&self) {
        self.controller.cancel();
    }

    pub fn view(&self) -> TableView {
        self.shared.table.view()
    }

    /// The table as text.
    pub fn render(&self) -> String {
        render_text(&self.view())
    }
}

impl ListPage<Document> {
    /// Documents of `tenant`.
    pub fn documents<C>(
        client: Arc<C>,
        tenant: TenantId,
        cache: QueryCache,
        notifier: Arc<dyn Notifier>,
        options: TableOptions,
    ) -> Result<Self, TableError>
    where
        C: BulkApi + ListApi + 'static,
    {
        let table = Table::new(document_columns(), document_identity(), options)?;
        let query = DocumentsQuery::new(Arc::clone(&client) as Arc<dyn ListApi>, tenant.clone());
        Ok(Self::new(
            table,
            query,
            cache,
            client,
            BulkScope::Documents(tenant),
            notifier,
        ))
    }
}

impl ListPage<User> {
    /// All users.
    pub fn users<C>(
        client: Arc<C>,
        cache: QueryCache,
        notifier: Arc<dyn Notifier>,
        options: TableOptions,
    ) -> Result<Self, TableError>
    where
        C: BulkApi + ListApi + 'static,
    {
        let table = Table::new(user_columns(), user_identity(), options)?;
        let query = UsersQuery::new(Arc::clone(&client) as Arc<dyn ListApi>);
        Ok(Self::new(table, query, cache, client, BulkScope::Users, notifier))
    }
}

impl<T: PageRow> fmt::Debug for ListPage<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListPage")
            .field("query", &self.query_key())
            .field("selected", &self.selected())
            .field("controller", &self.controller)
            .finish_non_exhaustive()
    }
}
