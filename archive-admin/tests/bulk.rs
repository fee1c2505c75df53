//! Tests for the bulk action controller with hand-written fakes.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use archive_admin::bulk::BulkAction;
use archive_admin::bulk::BulkActionController;
use archive_admin::bulk::BulkError;
use archive_admin::bulk::BulkHooks;
use archive_admin::bulk::BulkOutcome;
use archive_admin::bulk::BulkScope;
use archive_admin::bulk::BulkState;
use archive_admin::bulk::BulkToolbar;
use archive_admin::bulk::QueryInvalidator;
use archive_admin::bulk::SelectionSink;
use archive_admin::bulk::WORKING_LABEL;
use archive_admin::notify::NotificationLevel;
use archive_admin::notify::ToastQueue;
use archive_lib::api::BulkApi;
use archive_lib::cache::QueryKey;
use archive_lib::error::ApiError;
use archive_lib::error::Error;
use archive_lib::model::AccessLevel;
use archive_lib::model::CollectionId;
use archive_lib::model::Role;
use archive_lib::model::TenantId;
use async_trait::async_trait;
use tokio::sync::Notify;

/// Records every request; answers with `deleted` or fails with `error`.
#[derive(Default)]
struct FakeApi {
    requests: Mutex<Vec<(&'static str, Vec<String>)>>,
    error: Option<(u16, &'static str)>,
    gate: Option<Arc<Notify>>,
}

impl FakeApi {
    fn failing(status: u16, message: &'static str) -> Self {
        Self {
            error: Some((status, message)),
            ..Default::default()
        }
    }

    fn gated(gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Default::default()
        }
    }

    fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    async fn answer(&self, endpoint: &'static str, ids: &[String]) -> Result<u64, Error> {
        self.requests
            .lock()
            .unwrap()
            .push((endpoint, ids.to_vec()));
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        match self.error {
            Some((status, message)) => Err(ApiError::http(status, message).into()),
            None => Ok(ids.len() as u64),
        }
    }
}

#[async_trait]
impl BulkApi for FakeApi {
    async fn bulk_delete(&self, _: &TenantId, ids: &[String]) -> Result<u64, Error> {
        self.answer("bulk-delete", ids).await
    }

    async fn bulk_update_access(
        &self,
        _: &TenantId,
        ids: &[String],
        _: AccessLevel,
    ) -> Result<u64, Error> {
        self.answer("bulk-access", ids).await
    }

    async fn bulk_assign_to_collections(
        &self,
        _: &TenantId,
        ids: &[String],
        _: &[CollectionId],
    ) -> Result<u64, Error> {
        self.answer("bulk-collections", ids).await
    }

    async fn bulk_update_roles(&self, ids: &[String], _: Role) -> Result<(), Error> {
        self.answer("bulk-role", ids).await.map(|_| ())
    }

    async fn bulk_delete_users(&self, ids: &[String]) -> Result<(), Error> {
        self.answer("bulk-delete-users", ids).await.map(|_| ())
    }
}

/// Counts resets and invalidations.
#[derive(Default)]
struct Parent {
    resets: AtomicUsize,
    invalidated: Mutex<Vec<QueryKey>>,
}

impl SelectionSink for Parent {
    fn reset_selection(&self) {
        self.resets.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl QueryInvalidator for Parent {
    async fn invalidate(&self, key: &QueryKey) {
        self.invalidated.lock().unwrap().push(key.clone());
    }
}

struct Harness {
    api: Arc<FakeApi>,
    parent: Arc<Parent>,
    toasts: ToastQueue,
    controller: BulkActionController,
}

fn harness(api: FakeApi) -> Harness {
    let api = Arc::new(api);
    let parent = Arc::new(Parent::default());
    let toasts = ToastQueue::new();
    let hooks = BulkHooks::new(
        Arc::clone(&parent) as Arc<dyn SelectionSink>,
        Arc::clone(&parent) as Arc<dyn QueryInvalidator>,
        Arc::new(toasts.clone()),
    );
    let controller = BulkActionController::new(
        Arc::clone(&api) as Arc<dyn BulkApi>,
        BulkScope::Documents(TenantId::new("uni")),
        hooks,
    );
    Harness {
        api,
        parent,
        toasts,
        controller,
    }
}

fn ids(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[tokio::test]
async fn test_empty_selection_disables_everything() {
    let h = harness(FakeApi::default());

    assert!(!h.controller.is_enabled(&[]));
    let toolbar = BulkToolbar::new(&h.controller, BulkAction::document_actions(), &[]);
    assert!(!toolbar.entries.is_empty());
    assert!(!toolbar.any_enabled());
    assert_eq!(toolbar.selection_label, "");

    assert_eq!(
        h.controller.open(BulkAction::DeleteDocuments, &[]),
        Err(BulkError::EmptySelection)
    );
    assert!(!h.controller.dialog_open());
    assert_eq!(
        h.controller.confirm().await,
        BulkOutcome::Rejected(BulkError::NoConfirmation)
    );
    assert_eq!(h.api.request_count(), 0);
}

#[tokio::test]
async fn test_success_resets_invalidates_and_notifies() {
    let h = harness(FakeApi::default());
    let selected = ids(&["d1", "d2", "d3"]);

    let confirmation = h
        .controller
        .open(BulkAction::DeleteDocuments, &selected)
        .unwrap();
    assert_eq!(confirmation.count(), 3);
    assert!(confirmation.message.contains('3'));
    assert!(h.controller.dialog_open());

    let outcome = h.controller.confirm().await;
    assert_eq!(outcome, BulkOutcome::Succeeded { count: 3 });

    let requests = h.api.requests.lock().unwrap().clone();
    assert_eq!(requests, vec![("bulk-delete", selected)]);
    assert_eq!(h.parent.resets.load(Ordering::SeqCst), 1);
    assert_eq!(
        *h.parent.invalidated.lock().unwrap(),
        vec![QueryKey::documents("uni")]
    );

    let toasts = h.toasts.take();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].level, NotificationLevel::Success);
    assert!(toasts[0].message.contains('3'));

    assert_eq!(h.controller.state(), BulkState::Idle);
    assert!(!h.controller.dialog_open());
}

#[tokio::test]
async fn test_failure_keeps_selection_and_skips_invalidation() {
    let h = harness(FakeApi::failing(409, "Documents are under review"));

    h.controller
        .open(
            BulkAction::UpdateAccess(AccessLevel::Private),
            &ids(&["d1", "d2"]),
        )
        .unwrap();
    let outcome = h.controller.confirm().await;
    assert!(matches!(outcome, BulkOutcome::Failed { .. }));

    assert_eq!(h.api.request_count(), 1);
    assert_eq!(h.parent.resets.load(Ordering::SeqCst), 0);
    assert!(h.parent.invalidated.lock().unwrap().is_empty());

    let toasts = h.toasts.take();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].level, NotificationLevel::Error);
    assert!(toasts[0].message.contains("Documents are under review"));

    // Back to idle; the user may try again by hand.
    assert_eq!(h.controller.state(), BulkState::Idle);
    assert!(h.controller.is_enabled(&ids(&["d1"])));
}

#[tokio::test]
async fn test_busy_gate_rejects_second_confirm() {
    let gate = Arc::new(Notify::new());
    let h = harness(FakeApi::gated(Arc::clone(&gate)));

    h.controller
        .open(BulkAction::DeleteDocuments, &ids(&["d1"]))
        .unwrap();
    let running = h.controller.clone();
    let first = tokio::spawn(async move { running.confirm().await });

    while !h.controller.is_busy() {
        tokio::task::yield_now().await;
    }
    assert_eq!(h.controller.confirm_label(), WORKING_LABEL);
    assert!(!h.controller.is_enabled(&ids(&["d1"])));
    assert_eq!(
        h.controller.confirm().await,
        BulkOutcome::Rejected(BulkError::Busy)
    );
    assert_eq!(
        h.controller.open(BulkAction::DeleteDocuments, &ids(&["d2"])),
        Err(BulkError::Busy)
    );

    // Closing the dialog does not stop the request.
    h.controller.cancel();
    assert!(!h.controller.dialog_open());
    assert!(h.controller.is_busy());

    gate.notify_one();
    assert_eq!(first.await.unwrap(), BulkOutcome::Succeeded { count: 1 });
    assert_eq!(h.api.request_count(), 1);
    assert_eq!(h.parent.resets.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_assign_without_collections_is_refused() {
    let h = harness(FakeApi::default());

    assert_eq!(
        h.controller
            .open(BulkAction::AssignCollections(vec![]), &ids(&["d1", "d2"])),
        Err(BulkError::NoCollections)
    );
    assert!(!h.controller.dialog_open());
    assert_eq!(h.controller.state(), BulkState::Idle);
    assert_eq!(
        h.controller.confirm().await,
        BulkOutcome::Rejected(BulkError::NoConfirmation)
    );
    assert_eq!(h.api.request_count(), 0);
    assert!(h.toasts.is_empty());

    let confirmation = h
        .controller
        .open(
            BulkAction::AssignCollections(vec![CollectionId::new("theses")]),
            &ids(&["d1"]),
        )
        .unwrap();
    assert_eq!(confirmation.count(), 1);
}
