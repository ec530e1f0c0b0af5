use super::state::AppState;
use crate::inventory::{InventoryError, InventoryGateway};
use crate::model::{InventoryItem, Session};
use crate::session::{SessionGate, Subscription};
use cloud_framework::account::AuthError;
use tokio::sync::mpsc;
use tracing::{debug, instrument, warn};

/// Turns user intents into gateway and session calls and keeps [`AppState`] current.
///
/// Session notifications are queued by the subscription and applied by
/// [`poll_session`](Self::poll_session) or [`wait_session_change`](Self::wait_session_change),
/// so the state only changes inside `&mut self` calls.
pub struct InventoryView {
    state: AppState,
    gateway: InventoryGateway,
    sessions: SessionGate,
    subscription: Option<Subscription>,
    events: Option<mpsc::UnboundedReceiver<()>>,
}

impl InventoryView {
    pub fn new(gateway: InventoryGateway, sessions: SessionGate) -> Self {
        Self {
            state: AppState::new(),
            gateway,
            sessions,
            subscription: None,
            events: None,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Fetches the inventory and starts following the session.
    ///
    /// The subscription reports the current session immediately, so the loading flag is
    /// cleared before this returns.
    #[instrument(skip(self))]
    pub async fn load(&mut self) -> Result<(), InventoryError> {
        if self.subscription.is_none() {
            let (sender, receiver) = mpsc::unbounded_channel();
            let subscription = self.sessions.subscribe(move |_| {
                let _ = sender.send(());
            });
            self.subscription = Some(subscription);
            self.events = Some(receiver);
            self.poll_session();
        }
        self.refresh().await
    }

    /// Replaces the cached inventory with a fresh `list()`.
    pub async fn refresh(&mut self) -> Result<(), InventoryError> {
        self.state.inventory = self.gateway.list().await?;
        Ok(())
    }

    /// Applies queued session notifications. Returns how many were queued.
    ///
    /// Notifications only say that the session changed; the state takes the gate's latest
    /// session, so a notification older than a direct sign-in can never undo it.
    pub fn poll_session(&mut self) -> usize {
        let mut count = 0;
        if let Some(events) = self.events.as_mut() {
            while events.try_recv().is_ok() {
                count += 1;
            }
        }
        if count > 0 {
            self.apply_session(self.sessions.current());
        }
        count
    }

    /// Waits for the next session notification and applies it.
    ///
    /// Returns `false` when there is no active subscription left to wait on.
    pub async fn wait_session_change(&mut self) -> bool {
        let next = match self.events.as_mut() {
            Some(events) => events.recv().await,
            None => None,
        };
        if next.is_none() {
            return false;
        }
        self.poll_session();
        self.apply_session(self.sessions.current());
        true
    }

    fn apply_session(&mut self, session: Option<Session>) {
        debug!(signed_in = session.is_some(), "Session changed");
        self.state.session = session;
        self.state.is_loading = false;
    }

    #[instrument(skip(self))]
    pub async fn add_item(&mut self, name: &str) -> Result<(), InventoryError> {
        self.poll_session();
        let result = self.gateway.add(self.state.session.as_ref(), name).await;
        self.absorb(result)
    }

    #[instrument(skip(self))]
    pub async fn remove_item(&mut self, name: &str) -> Result<(), InventoryError> {
        self.poll_session();
        let result = self.gateway.remove(self.state.session.as_ref(), name).await;
        self.absorb(result)
    }

    /// Stores a refreshed list, or turns a missing session into the user message.
    fn absorb(
        &mut self,
        result: Result<Vec<InventoryItem>, InventoryError>,
    ) -> Result<(), InventoryError> {
        match result {
            Ok(items) => {
                self.state.inventory = items;
                Ok(())
            }
            Err(e) if e.is_unauthorized() => {
                warn!(error = %e, "Mutation refused");
                self.state.auth_error = Some(e.to_string());
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    pub fn open_add_dialog(&mut self) {
        self.state.add_dialog_open = true;
    }

    pub fn close_add_dialog(&mut self) {
        self.state.add_dialog_open = false;
    }

    pub fn set_draft_name(&mut self, name: impl Into<String>) {
        self.state.draft_name = name.into();
    }

    /// Adds the drafted name, then clears the draft and closes the dialog.
    pub async fn submit_draft(&mut self) -> Result<(), InventoryError> {
        let name = std::mem::take(&mut self.state.draft_name);
        self.state.add_dialog_open = false;
        self.add_item(&name).await
    }

    pub fn select_item(&mut self, item: InventoryItem) {
        self.state.selected_item = Some(item);
        self.state.edit_mode = false;
    }

    pub fn begin_edit(&mut self) {
        self.state.edit_mode = true;
    }

    pub fn cancel_edit(&mut self) {
        self.state.edit_mode = false;
    }

    /// Closes the details panel. Ignored while editing.
    pub fn close_details(&mut self) {
        if !self.state.edit_mode {
            self.state.selected_item = None;
        }
    }

    /// Changes the working copy of the selected item. Returns `false` if nothing is selected.
    pub fn edit_selected(&mut self, change: impl FnOnce(&mut InventoryItem)) -> bool {
        match self.state.selected_item.as_mut() {
            Some(item) => {
                change(item);
                true
            }
            None => false,
        }
    }

    /// Writes the selected item back. Without a selection this does nothing.
    ///
    /// Validation errors leave edit mode on so the user can correct the fields.
    #[instrument(skip(self))]
    pub async fn save_edit(&mut self) -> Result<(), InventoryError> {
        let Some(item) = self.state.selected_item.clone() else {
            return Ok(());
        };
        self.poll_session();
        let result = self.gateway.edit(self.state.session.as_ref(), &item).await;
        if result.is_ok() {
            self.state.edit_mode = false;
        }
        self.absorb(result)
    }

    pub async fn sign_up(&mut self, email: &str, password: &str) {
        let result = self.sessions.sign_up(email, password).await;
        self.signed_in(result);
    }

    pub async fn sign_in(&mut self, email: &str, password: &str) {
        let result = self.sessions.sign_in(email, password).await;
        self.signed_in(result);
    }

    fn signed_in(&mut self, result: Result<Session, AuthError>) {
        match result {
            Ok(session) => {
                self.state.session = Some(session);
                self.state.auth_error = None;
            }
            Err(e) => self.state.auth_error = Some(e.to_string()),
        }
    }

    pub async fn sign_out(&mut self) {
        match self.sessions.sign_out().await {
            Ok(()) => {
                self.state.session = None;
                self.state.auth_error = None;
            }
            Err(e) => self.state.auth_error = Some(e.to_string()),
        }
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.state.search_term = term.into();
    }

    pub fn set_filter_category(&mut self, category: impl Into<String>) {
        self.state.filter_category = category.into();
    }

    pub fn visible_items(&self) -> Vec<InventoryItem> {
        self.state.visible_items()
    }

    pub fn categories(&self) -> Vec<String> {
        self.state.categories()
    }

    /// Stops following the session. Queued notifications are discarded.
    pub fn teardown(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
        self.events = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::UpdateMode;
    use crate::model::{ItemFields, UserId};
    use crate::session;
    use cloud_framework::mock::MockCollection;

    fn gate() -> SessionGate {
        let (actor, gate) = session::new(8);
        tokio::spawn(actor.run());
        gate
    }

    #[tokio::test]
    async fn load_clears_loading_and_fetches() {
        let mut mock = MockCollection::<ItemFields>::new();
        mock.expect_scan()
            .return_ok(vec![("Widget".into(), ItemFields::with_quantity(2))]);
        let gateway = InventoryGateway::new(mock.client(), UpdateMode::Atomic);

        let mut view = InventoryView::new(gateway, gate());
        assert!(view.state().is_loading);
        view.load().await.unwrap();

        assert!(!view.state().is_loading);
        assert_eq!(view.state().session, None);
        assert_eq!(view.state().inventory, vec![InventoryItem::new("Widget", 2)]);
        mock.verify();
    }

    #[tokio::test]
    async fn unauthorized_add_becomes_message() {
        let mock = MockCollection::<ItemFields>::new();
        let gateway = InventoryGateway::new(mock.client(), UpdateMode::Atomic);
        let mut view = InventoryView::new(gateway, gate());

        view.add_item("Widget").await.unwrap();
        assert_eq!(
            view.state().auth_error.as_deref(),
            Some("You must be logged in to add items.")
        );
        view.remove_item("Widget").await.unwrap();
        assert_eq!(
            view.state().auth_error.as_deref(),
            Some("You must be logged in to remove items.")
        );
        mock.verify();
    }

    #[tokio::test]
    async fn store_errors_are_returned() {
        let mut mock = MockCollection::<ItemFields>::new();
        mock.expect_scan()
            .return_err(cloud_framework::StoreError::ServiceClosed);
        let gateway = InventoryGateway::new(mock.client(), UpdateMode::Atomic);
        let mut view = InventoryView::new(gateway, gate());

        assert!(view.refresh().await.is_err());
        assert_eq!(view.state().auth_error, None);
    }

    #[tokio::test]
    async fn selection_and_edit_mode() {
        let mock = MockCollection::<ItemFields>::new();
        let gateway = InventoryGateway::new(mock.client(), UpdateMode::Atomic);
        let mut view = InventoryView::new(gateway, gate());

        // Nothing selected: save is a no-op and no request is sent.
        view.save_edit().await.unwrap();
        assert!(!view.edit_selected(|item| item.quantity = 9));

        view.select_item(InventoryItem::new("Widget", 1));
        view.begin_edit();
        view.close_details();
        assert!(view.state().selected_item.is_some());

        view.cancel_edit();
        view.close_details();
        assert_eq!(view.state().selected_item, None);
        mock.verify();
    }

    #[tokio::test]
    async fn save_edit_writes_selection() {
        let mut mock = MockCollection::<ItemFields>::new();
        mock.expect_set("Widget").return_ok(());
        mock.expect_scan()
            .return_ok(vec![("Widget".into(), ItemFields::with_quantity(5))]);
        let gateway = InventoryGateway::new(mock.client(), UpdateMode::Atomic);
        let mut view = InventoryView::new(gateway, gate());
        view.state.session = Some(Session {
            uid: UserId(7),
            email: "ada@example.com".into(),
        });

        view.select_item(InventoryItem::new("Widget", 1));
        view.begin_edit();
        assert!(view.edit_selected(|item| item.quantity = 5));
        view.save_edit().await.unwrap();

        assert!(!view.state().edit_mode);
        assert_eq!(view.state().inventory[0].quantity, 5);
        mock.verify();
    }

    #[tokio::test]
    async fn sign_in_failure_sets_and_success_clears_message() {
        let mock = MockCollection::<ItemFields>::new();
        let gateway = InventoryGateway::new(mock.client(), UpdateMode::Atomic);
        let mut view = InventoryView::new(gateway, gate());

        view.sign_in("ada@example.com", "analytical").await;
        assert_eq!(
            view.state().auth_error.as_deref(),
            Some("Invalid email or password.")
        );

        view.sign_up("ada@example.com", "analytical").await;
        assert_eq!(view.state().auth_error, None);
        assert!(view.state().is_signed_in());

        view.sign_out().await;
        assert!(!view.state().is_signed_in());
    }
}
