//! Confirm-then-dispatch controller for bulk actions

use std::fmt;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use archive_lib::api::BulkApi;
use archive_lib::cache::QueryKey;
use archive_table::RowId;
use async_trait::async_trait;
use log::debug;
use log::info;
use log::warn;

use super::BulkAction;
use super::BulkError;
use super::BulkScope;
use crate::notify::Notification;
use crate::notify::Notifier;

/// Label of the confirm button while idle.
pub const CONFIRM_LABEL: &str = "Confirm";

/// Label of the confirm button while a request is in flight.
pub const WORKING_LABEL: &str = "Working…";

// =============================================================================
// Hooks
// =============================================================================

/// Owner of the selected ids. Cleared after a successful action.
pub trait SelectionSink: Send + Sync {
    fn reset_selection(&self);
}

/// Marks a row-data query stale so the list refetches it.
#[async_trait]
pub trait QueryInvalidator: Send + Sync {
    async fn invalidate(&self, key: &QueryKey);
}

/// Side effects of a finished action.
#[derive(Clone)]
pub struct BulkHooks {
    pub selection: Arc<dyn SelectionSink>,
    pub invalidator: Arc<dyn QueryInvalidator>,
    pub notifier: Arc<dyn Notifier>,
}

impl BulkHooks {
    pub fn new(
        selection: Arc<dyn SelectionSink>,
        invalidator: Arc<dyn QueryInvalidator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            selection,
            invalidator,
            notifier,
        }
    }
}

impl fmt::Debug for BulkHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BulkHooks").finish_non_exhaustive()
    }
}

// =============================================================================
// State
// =============================================================================

/// An action waiting for the user to confirm it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub action: BulkAction,
    /// Ids captured when the dialog opened.
    pub ids: Vec<RowId>,
    /// Question shown to the user.
    pub message: String,
}

impl Confirmation {
    /// Number of rows the action will touch.
    pub fn count(&self) -> usize {
        self.ids.len()
    }
}

/// Where the controller is in the confirm-then-dispatch cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum BulkState {
    #[default]
    Idle,
    /// Dialog open, nothing sent yet.
    Confirming(Confirmation),
    /// Request in flight.
    Busy(Confirmation),
}

/// Result of [`BulkActionController::confirm`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BulkOutcome {
    /// The server applied the action.
    Succeeded { count: u64 },
    /// The request failed. Nothing was reset or refreshed.
    Failed { message: String },
    /// Nothing was sent.
    Rejected(BulkError),
}

impl BulkOutcome {
    /// Check if the action was applied.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }
}

#[derive(Debug, Default)]
struct ControllerInner {
    state: BulkState,
    dialog_open: bool,
}

// =============================================================================
// Controller
// =============================================================================

/// Runs bulk actions over a selection: one confirmation at a time, one
/// request per confirmation, and a busy gate against double submits.
///
/// The controller never holds its lock across an await or while calling
/// hooks. Clones share state.
///
/// # Example
///
/// ```ignore
/// let controller = BulkActionController::new(api, BulkScope::Users, hooks);
/// let confirmation = controller.open(BulkAction::DeleteUsers, &selected)?;
/// show_dialog(&confirmation.message, controller.confirm_label());
/// match controller.confirm().await {
///     BulkOutcome::Succeeded { count } => { /* selection cleared, list refreshed */ }
///     _ => {}
/// }
/// ```
#[derive(Clone)]
pub struct BulkActionController {
    api: Arc<dyn BulkApi>,
    scope: BulkScope,
    hooks: BulkHooks,
    inner: Arc<Mutex<ControllerInner>>,
}

impl BulkActionController {
    pub fn new(api: Arc<dyn BulkApi>, scope: BulkScope, hooks: BulkHooks) -> Self {
        Self {
            api,
            scope,
            hooks,
            inner: Arc::new(Mutex::new(ControllerInner::default())),
        }
    }

    /// The list this controller acts on.
    pub fn scope(&self) -> &BulkScope {
        &self.scope
    }

    fn lock(&self) -> MutexGuard<'_, ControllerInner> {
        // State stays consistent between statements, so a poisoned lock is usable.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Current state.
    pub fn state(&self) -> BulkState {
        self.lock().state.clone()
    }

    /// Check if a request is in flight.
    pub fn is_busy(&self) -> bool {
        matches!(self.lock().state, BulkState::Busy(_))
    }

    /// Check if the confirmation dialog is showing.
    pub fn dialog_open(&self) -> bool {
        self.lock().dialog_open
    }

    /// Label for the dialog's confirm button.
    pub fn confirm_label(&self) -> &'static str {
        if self.is_busy() {
            WORKING_LABEL
        } else {
            CONFIRM_LABEL
        }
    }

    /// Check if actions can be started for `selection`.
    pub fn is_enabled(&self, selection: &[RowId]) -> bool {
        !selection.is_empty() && !self.is_busy()
    }

    /// Opens a confirmation for `action` over `selection`.
    ///
    /// A pending confirmation is replaced.
    pub fn open(&self, action: BulkAction, selection: &[RowId]) -> Result<Confirmation, BulkError> {
        if selection.is_empty() {
            debug!("Ignoring {} with no selection", action);
            return Err(BulkError::EmptySelection);
        }
        if !action.applies_to(&self.scope) {
            return Err(BulkError::UnsupportedAction {
                action: action.label(),
                scope: self.scope.to_string(),
            });
        }
        if matches!(&action, BulkAction::AssignCollections(c) if c.is_empty()) {
            return Err(BulkError::NoCollections);
        }

        let confirmation = Confirmation {
            message: action.confirm_message(&self.scope, selection.len()),
            ids: selection.to_vec(),
            action,
        };

        let mut inner = self.lock();
        if matches!(inner.state, BulkState::Busy(_)) {
            return Err(BulkError::Busy);
        }
        debug!(
            "Confirming {} for {} rows",
            confirmation.action,
            confirmation.count()
        );
        inner.state = BulkState::Confirming(confirmation.clone());
        inner.dialog_open = true;
        Ok(confirmation)
    }

    /// Closes the dialog. An in-flight request keeps running.
    pub fn cancel(&self) {
        let mut inner = self.lock();
        inner.dialog_open = false;
        if matches!(inner.state, BulkState::Confirming(_)) {
            debug!("Bulk action cancelled");
            inner.state = BulkState::Idle;
        }
    }

    /// Sends the pending action.
    ///
    /// On success the selection is reset, the row-data query is invalidated
    /// once and a success notification is sent. On failure only an error
    /// notification is sent. Either way the controller returns to idle.
    pub async fn confirm(&self) -> BulkOutcome {
        let confirmation = {
            let mut inner = self.lock();
            match std::mem::take(&mut inner.state) {
                BulkState::Confirming(confirmation) => {
                    inner.state = BulkState::Busy(confirmation.clone());
                    confirmation
                }
                busy @ BulkState::Busy(_) => {
                    inner.state = busy;
                    debug!("Ignoring confirm while busy");
                    return BulkOutcome::Rejected(BulkError::Busy);
                }
                BulkState::Idle => return BulkOutcome::Rejected(BulkError::NoConfirmation),
            }
        };

        info!(
            "Running {} on {} rows ({})",
            confirmation.action,
            confirmation.count(),
            self.scope
        );
        let result = confirmation
            .action
            .dispatch(self.api.as_ref(), &self.scope, &confirmation.ids)
            .await;

        {
            let mut inner = self.lock();
            inner.state = BulkState::Idle;
            inner.dialog_open = false;
        }

        match result {
            Ok(count) => {
                info!("{} applied to {} rows", confirmation.action, count);
                self.hooks.selection.reset_selection();
                self.hooks
                    .invalidator
                    .invalidate(&self.scope.query_key())
                    .await;
                self.hooks.notifier.notify(Notification::success(
                    confirmation.action.success_message(&self.scope, count),
                ));
                BulkOutcome::Succeeded { count }
            }
            Err(e) => {
                warn!("{} failed: {}", confirmation.action, e);
                let message = e.to_string();
                self.hooks
                    .notifier
                    .notify(Notification::error(message.clone()));
                BulkOutcome::Failed { message }
            }
        }
    }
}

impl fmt::Debug for BulkActionController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BulkActionController")
            .field("scope", &self.scope)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;

    use archive_lib::error::ApiError;
    use archive_lib::error::Error;
    use archive_lib::model::AccessLevel;
    use archive_lib::model::CollectionId;
    use archive_lib::model::Role;
    use archive_lib::model::TenantId;

    use super::*;
    use crate::notify::ToastQueue;

    #[derive(Default)]
    struct Api {
        calls: AtomicUsize,
        fail: bool,
    }

    impl Api {
        fn result(&self, ids: &[String]) -> Result<u64, Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(ApiError::http(500, "boom").into())
            } else {
                Ok(ids.len() as u64)
            }
        }
    }

    #[async_trait]
    impl BulkApi for Api {
        async fn bulk_delete(&self, _: &TenantId, ids: &[String]) -> Result<u64, Error> {
            self.result(ids)
        }
        async fn bulk_update_access(
            &self,
            _: &TenantId,
            ids: &[String],
            _: AccessLevel,
        ) -> Result<u64, Error> {
            self.result(ids)
        }
        async fn bulk_assign_to_collections(
            &self,
            _: &TenantId,
            ids: &[String],
            _: &[CollectionId],
        ) -> Result<u64, Error> {
            self.result(ids)
        }
        async fn bulk_update_roles(&self, ids: &[String], _: Role) -> Result<(), Error> {
            self.result(ids).map(|_| ())
        }
        async fn bulk_delete_users(&self, ids: &[String]) -> Result<(), Error> {
            self.result(ids).map(|_| ())
        }
    }

    struct Noop;

    impl SelectionSink for Noop {
        fn reset_selection(&self) {}
    }

    #[async_trait]
    impl QueryInvalidator for Noop {
        async fn invalidate(&self, _: &QueryKey) {}
    }

    fn controller(api: Arc<Api>) -> BulkActionController {
        let hooks = BulkHooks::new(Arc::new(Noop), Arc::new(Noop), Arc::new(ToastQueue::new()));
        BulkActionController::new(api, BulkScope::Users, hooks)
    }

    fn ids(values: &[&str]) -> Vec<RowId> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_open_replaces_pending_confirmation() {
        let controller = controller(Arc::new(Api::default()));
        controller.open(BulkAction::DeleteUsers, &ids(&["u1"])).unwrap();
        let second = controller
            .open(BulkAction::UpdateRoles(Role::Admin), &ids(&["u1", "u2"]))
            .unwrap();
        assert_eq!(controller.state(), BulkState::Confirming(second));
    }

    #[test]
    fn test_open_rejects_other_scope() {
        let controller = controller(Arc::new(Api::default()));
        let err = controller
            .open(BulkAction::DeleteDocuments, &ids(&["d1"]))
            .unwrap_err();
        assert!(matches!(err, BulkError::UnsupportedAction { .. }));
        assert!(!controller.dialog_open());
    }

    #[test]
    fn test_cancel_returns_to_idle() {
        let controller = controller(Arc::new(Api::default()));
        controller.open(BulkAction::DeleteUsers, &ids(&["u1"])).unwrap();
        controller.cancel();
        assert_eq!(controller.state(), BulkState::Idle);
        assert!(!controller.dialog_open());
        assert_eq!(controller.confirm_label(), CONFIRM_LABEL);
    }

    #[tokio::test]
    async fn test_confirm_without_open_sends_nothing() {
        let api = Arc::new(Api::default());
        let controller = controller(Arc::clone(&api));
        assert_eq!(
            controller.confirm().await,
            BulkOutcome::Rejected(BulkError::NoConfirmation)
        );
        assert_eq!(api.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_user_actions_report_ids_sent() {
        let api = Arc::new(Api::default());
        let controller = controller(Arc::clone(&api));
        controller
            .open(BulkAction::UpdateRoles(Role::Reviewer), &ids(&["u1", "u2"]))
            .unwrap();
        assert_eq!(controller.confirm().await, BulkOutcome::Succeeded { count: 2 });
        assert_eq!(controller.state(), BulkState::Idle);
    }

    #[tokio::test]
    async fn test_failure_returns_to_idle() {
        let api = Arc::new(Api {
            fail: true,
            ..Default::default()
        });
        let controller = controller(Arc::clone(&api));
        controller.open(BulkAction::DeleteUsers, &ids(&["u1"])).unwrap();
        let outcome = controller.confirm().await;
        assert!(matches!(outcome, BulkOutcome::Failed { ref message } if message.contains("boom")));
        assert!(!controller.is_busy());
        assert!(!controller.dialog_open());
        assert_eq!(api.calls.load(Ordering::SeqCst), 1);
    }
}
