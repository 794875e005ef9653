//! Dashboard controller: session-gated fetch / submit / sign-out cycle.
//!
//! The controller owns the render state and is driven from a single-threaded
//! event loop. Every mutation re-derives the chart from the store; there is no
//! local append and no request sequencing, so when two fetches overlap the one
//! that completes last wins.

use crate::auth::{IdentityProvider, SessionSubscription, SignUpOutcome};
use crate::backend::Backend;
use crate::core::projector::project;
use crate::errors::AppResult;
use crate::models::{Credentials, LogEntry, ProjectionPoint, Session};
use crate::store::LogStore;
use crate::utils::date::parse_date_arg;
use std::fmt;

/// Raw contents of the "Log Study Hours" form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogForm {
    pub date: String,
    pub hours: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    MissingFields,
    InvalidDate(String),
    InvalidHours(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::MissingFields => write!(f, "Please fill in both fields!"),
            ValidationError::InvalidDate(d) => {
                write!(f, "Invalid date '{}': expected YYYY-MM-DD", d)
            }
            ValidationError::InvalidHours(h) => {
                write!(f, "Invalid hours '{}': expected a non-negative number", h)
            }
        }
    }
}

impl LogForm {
    pub fn new(date: impl Into<String>, hours: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            hours: hours.into(),
        }
    }

    pub fn clear(&mut self) {
        self.date.clear();
        self.hours.clear();
    }

    /// Both fields must be present; then the date must be a calendar date and
    /// the hours a finite, non-negative number.
    pub fn validate(&self) -> Result<LogEntry, ValidationError> {
        let date = self.date.trim();
        let hours = self.hours.trim();

        if date.is_empty() || hours.is_empty() {
            return Err(ValidationError::MissingFields);
        }

        let date = parse_date_arg(date).map_err(|_| ValidationError::InvalidDate(date.into()))?;

        let hours_spent: f64 = hours
            .parse()
            .map_err(|_| ValidationError::InvalidHours(hours.into()))?;
        if !hours_spent.is_finite() || hours_spent < 0.0 {
            return Err(ValidationError::InvalidHours(hours.into()));
        }

        Ok(LogEntry::new(date, hours_spent))
    }
}

/// Failures the controller absorbs instead of propagating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardError {
    Fetch(String),
    Insert(String),
    SignOut(String),
}

impl fmt::Display for DashboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DashboardError::Fetch(m) => write!(f, "fetch failed: {}", m),
            DashboardError::Insert(m) => write!(f, "insert failed: {}", m),
            DashboardError::SignOut(m) => write!(f, "sign-out failed: {}", m),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardView {
    Unauthenticated,
    Loading,
    Ready,
}

#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub session: Option<Session>,
    pub chart: Vec<ProjectionPoint>,
    pub loading: bool,
    pub form: LogForm,
    /// Last absorbed failure. Fetch failures leave `loading` set and insert
    /// failures leave the form filled; this is the only trace they leave.
    pub last_error: Option<DashboardError>,
}

impl DashboardState {
    pub fn view(&self) -> DashboardView {
        match (&self.session, self.loading) {
            (None, _) => DashboardView::Unauthenticated,
            (Some(_), true) => DashboardView::Loading,
            (Some(_), false) => DashboardView::Ready,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Inserted and re-fetched.
    Saved,
    /// Rejected before any network call.
    Invalid(ValidationError),
    /// No session: the form is not available.
    NotSignedIn,
    /// The store refused the insert; the form keeps its values.
    Failed(DashboardError),
}

pub struct DashboardController {
    store: Box<dyn LogStore>,
    identity: Box<dyn IdentityProvider>,
    subscription: Option<SessionSubscription>,
    state: DashboardState,
}

impl DashboardController {
    pub fn new(store: Box<dyn LogStore>, identity: Box<dyn IdentityProvider>) -> Self {
        let subscription = Some(identity.subscribe());
        Self {
            store,
            identity,
            subscription,
            state: DashboardState::default(),
        }
    }

    pub fn from_backend(backend: Backend) -> Self {
        Self::new(backend.store, backend.identity)
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn identity(&self) -> &dyn IdentityProvider {
        self.identity.as_ref()
    }

    /// Ask the identity provider for the startup session and act on it.
    pub async fn start(&mut self) -> DashboardView {
        let session = self.identity.current_session().await;
        self.apply_session(session).await;
        self.state.view()
    }

    /// React to a session value reported by the identity provider.
    ///
    /// - none → some (or a different user): one fetch-and-project cycle
    /// - some → some, same user (token refresh): keep the chart
    /// - anything → none: back to the unauthenticated view
    pub async fn apply_session(&mut self, session: Option<Session>) {
        match session {
            Some(new) => {
                let same_user = self
                    .state
                    .session
                    .as_ref()
                    .is_some_and(|cur| cur.user.id == new.user.id);

                self.state.session = Some(new);
                if !same_user {
                    self.state.chart.clear();
                    self.state.last_error = None;
                    self.refresh().await;
                }
            }
            None => {
                self.state = DashboardState::default();
            }
        }
    }

    /// Apply a pending session change, if the provider published one.
    pub async fn poll_session(&mut self) {
        let change = self.subscription.as_mut().and_then(|s| s.take_change());
        if let Some(session) = change {
            self.apply_session(session).await;
        }
    }

    /// Wait for the next session change. `None` when nothing can change any more.
    pub async fn next_session_change(&mut self) -> Option<Option<Session>> {
        match self.subscription.as_mut() {
            Some(sub) => sub.changed().await,
            None => None,
        }
    }

    /// Fetch all rows, project them, update the chart, clear the loading flag
    /// and any earlier error. On failure only `last_error` changes and
    /// `loading` stays set.
    pub async fn refresh(&mut self) {
        let Some(session) = self.state.session.clone() else {
            return;
        };

        self.state.loading = true;

        match self.store.fetch_logs(&session).await {
            Ok(entries) => {
                self.state.chart = project(&entries);
                self.state.loading = false;
                self.state.last_error = None;
            }
            Err(e) => {
                self.state.last_error = Some(DashboardError::Fetch(e.to_string()));
            }
        }
    }

    /// Submit the current form contents.
    pub async fn submit(&mut self) -> SubmitOutcome {
        let Some(session) = self.state.session.clone() else {
            return SubmitOutcome::NotSignedIn;
        };

        let entry = match self.state.form.validate() {
            Ok(entry) => entry,
            Err(v) => return SubmitOutcome::Invalid(v),
        };

        match self.store.insert_log(&session, &entry).await {
            Ok(()) => {
                self.state.form.clear();
                self.state.last_error = None;
                self.refresh().await;
                SubmitOutcome::Saved
            }
            Err(e) => {
                let err = DashboardError::Insert(e.to_string());
                self.state.last_error = Some(err.clone());
                SubmitOutcome::Failed(err)
            }
        }
    }

    /// Fill the form and submit it.
    pub async fn submit_form(&mut self, date: &str, hours: &str) -> SubmitOutcome {
        self.state.form = LogForm::new(date, hours);
        self.submit().await
    }

    pub async fn sign_in(&mut self, credentials: &Credentials) -> AppResult<()> {
        self.identity.sign_in(credentials).await?;
        self.poll_session().await;
        Ok(())
    }

    pub async fn sign_up(&mut self, credentials: &Credentials) -> AppResult<SignUpOutcome> {
        let outcome = self.identity.sign_up(credentials).await?;
        self.poll_session().await;
        Ok(outcome)
    }

    /// Delegate to the identity provider; the published session change (not
    /// this call) moves the view back to unauthenticated.
    pub async fn sign_out(&mut self) -> AppResult<()> {
        match self.identity.sign_out().await {
            Ok(()) => {
                self.poll_session().await;
                Ok(())
            }
            Err(e) => {
                self.state.last_error = Some(DashboardError::SignOut(e.to_string()));
                Err(e)
            }
        }
    }

    /// Unregister the session listener.
    pub fn shutdown(mut self) {
        if let Some(sub) = self.subscription.take() {
            sub.unsubscribe();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::SessionBroadcast;
    use crate::errors::AppError;
    use crate::models::SessionUser;
    use async_trait::async_trait;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[derive(Default)]
    struct StoreProbe {
        rows: RefCell<Vec<LogEntry>>,
        fetches: Cell<usize>,
        inserts: Cell<usize>,
        fail_fetch: Cell<bool>,
        fail_insert: Cell<bool>,
    }

    struct FakeStore(Rc<StoreProbe>);

    #[async_trait(?Send)]
    impl LogStore for FakeStore {
        async fn fetch_logs(&self, _session: &Session) -> AppResult<Vec<LogEntry>> {
            self.0.fetches.set(self.0.fetches.get() + 1);
            if self.0.fail_fetch.get() {
                return Err(AppError::Store("boom".into()));
            }
            let mut rows = self.0.rows.borrow().clone();
            rows.sort_by_key(|e| e.date);
            Ok(rows)
        }

        async fn insert_log(&self, _session: &Session, entry: &LogEntry) -> AppResult<()> {
            self.0.inserts.set(self.0.inserts.get() + 1);
            if self.0.fail_insert.get() {
                return Err(AppError::Store("rejected".into()));
            }
            self.0.rows.borrow_mut().push(entry.clone());
            Ok(())
        }
    }

    #[derive(Default)]
    struct IdentityProbe {
        stored: RefCell<Option<Session>>,
        broadcast: SessionBroadcast,
        fail_sign_out: Cell<bool>,
    }

    struct FakeIdentity(Rc<IdentityProbe>);

    #[async_trait(?Send)]
    impl IdentityProvider for FakeIdentity {
        fn backend_name(&self) -> &'static str {
            "fake"
        }

        async fn current_session(&self) -> Option<Session> {
            let s = self.0.stored.borrow().clone();
            self.0.broadcast.publish(s.clone());
            s
        }

        fn subscribe(&self) -> SessionSubscription {
            self.0.broadcast.subscribe()
        }

        async fn sign_in(&self, credentials: &Credentials) -> AppResult<Session> {
            let s = session_for(&credentials.email, "t1");
            *self.0.stored.borrow_mut() = Some(s.clone());
            self.0.broadcast.publish(Some(s.clone()));
            Ok(s)
        }

        async fn sign_up(&self, credentials: &Credentials) -> AppResult<SignUpOutcome> {
            Ok(SignUpOutcome::SignedIn(self.sign_in(credentials).await?))
        }

        async fn sign_out(&self) -> AppResult<()> {
            if self.0.fail_sign_out.get() {
                return Err(AppError::Auth("network down".into()));
            }
            *self.0.stored.borrow_mut() = None;
            self.0.broadcast.publish(None);
            Ok(())
        }
    }

    fn session_for(user: &str, token: &str) -> Session {
        Session {
            access_token: token.into(),
            refresh_token: "r".into(),
            expires_at: None,
            user: SessionUser {
                id: user.into(),
                email: Some(user.into()),
            },
        }
    }

    fn entry(date: &str, hours: f64) -> LogEntry {
        LogEntry::new(crate::utils::date::parse_date(date).unwrap(), hours)
    }

    fn setup(
        signed_in: bool,
        rows: Vec<LogEntry>,
    ) -> (DashboardController, Rc<StoreProbe>, Rc<IdentityProbe>) {
        let store = Rc::new(StoreProbe::default());
        *store.rows.borrow_mut() = rows;
        let ident = Rc::new(IdentityProbe::default());
        if signed_in {
            *ident.stored.borrow_mut() = Some(session_for("me@example.com", "t0"));
        }
        let ctl = DashboardController::new(
            Box::new(FakeStore(store.clone())),
            Box::new(FakeIdentity(ident.clone())),
        );
        (ctl, store, ident)
    }

    fn creds() -> Credentials {
        Credentials {
            email: "me@example.com".into(),
            password: "secret1".into(),
        }
    }

    #[tokio::test]
    async fn no_session_means_no_fetch() {
        let (mut ctl, store, _) = setup(false, vec![entry("2024-01-01", 2.0)]);

        assert_eq!(ctl.start().await, DashboardView::Unauthenticated);
        assert_eq!(store.fetches.get(), 0);
        assert!(ctl.state().chart.is_empty());
    }

    #[tokio::test]
    async fn startup_session_triggers_exactly_one_fetch() {
        let (mut ctl, store, _) = setup(
            true,
            vec![entry("2024-01-02", 4.0), entry("2024-01-01", 2.0)],
        );

        assert_eq!(ctl.start().await, DashboardView::Ready);
        assert_eq!(store.fetches.get(), 1);

        // the publish done by current_session is the same session: no refetch
        ctl.poll_session().await;
        assert_eq!(store.fetches.get(), 1);

        let chart = &ctl.state().chart;
        assert_eq!(chart.len(), 2);
        assert_eq!(chart[0].ideal_remaining, 96.5);
        assert_eq!(chart[0].actual_remaining, 98.0);
        assert_eq!(chart[1].ideal_remaining, 93.0);
        assert_eq!(chart[1].actual_remaining, 94.0);
        assert!(!ctl.state().loading);
    }

    #[tokio::test]
    async fn token_refresh_does_not_refetch() {
        let (mut ctl, store, _) = setup(true, vec![]);
        ctl.start().await;

        ctl.apply_session(Some(session_for("me@example.com", "t-new")))
            .await;

        assert_eq!(store.fetches.get(), 1);
        assert_eq!(
            ctl.state().session.as_ref().map(|s| s.access_token.as_str()),
            Some("t-new")
        );
    }

    #[tokio::test]
    async fn empty_date_never_reaches_the_store() {
        let (mut ctl, store, _) = setup(true, vec![]);
        ctl.start().await;

        let outcome = ctl.submit_form("", "2").await;

        assert_eq!(
            outcome,
            SubmitOutcome::Invalid(ValidationError::MissingFields)
        );
        assert_eq!(store.inserts.get(), 0);
        assert_eq!(store.fetches.get(), 1);
        assert_eq!(ctl.state().form, LogForm::new("", "2"));
    }

    #[tokio::test]
    async fn malformed_values_are_rejected_locally() {
        let (mut ctl, store, _) = setup(true, vec![]);
        ctl.start().await;

        assert!(matches!(
            ctl.submit_form("2024-13-01", "2").await,
            SubmitOutcome::Invalid(ValidationError::InvalidDate(_))
        ));
        assert!(matches!(
            ctl.submit_form("2024-01-01", "abc").await,
            SubmitOutcome::Invalid(ValidationError::InvalidHours(_))
        ));
        assert!(matches!(
            ctl.submit_form("2024-01-01", "-1").await,
            SubmitOutcome::Invalid(ValidationError::InvalidHours(_))
        ));
        assert_eq!(store.inserts.get(), 0);
    }

    #[tokio::test]
    async fn successful_insert_refetches_and_clears_form() {
        let (mut ctl, store, _) = setup(true, vec![entry("2024-01-02", 4.0)]);
        ctl.start().await;

        // inserted before the existing row: a local append would misplace it
        let outcome = ctl.submit_form("2024-01-01", "2").await;

        assert_eq!(outcome, SubmitOutcome::Saved);
        assert_eq!(store.inserts.get(), 1);
        assert_eq!(store.fetches.get(), 2);
        assert_eq!(ctl.state().form, LogForm::default());

        let chart = &ctl.state().chart;
        assert_eq!(chart.len(), 2);
        assert_eq!(chart[0].date, entry("2024-01-01", 0.0).date);
        assert_eq!(chart[0].actual_remaining, 98.0);
        assert_eq!(chart[1].actual_remaining, 94.0);
        assert_eq!(chart[1].ideal_remaining, 93.0);
    }

    #[tokio::test]
    async fn failed_insert_keeps_form_and_reports() {
        let (mut ctl, store, _) = setup(true, vec![]);
        ctl.start().await;
        store.fail_insert.set(true);

        let outcome = ctl.submit_form("2024-01-01", "2").await;

        assert!(matches!(outcome, SubmitOutcome::Failed(DashboardError::Insert(_))));
        assert_eq!(ctl.state().form, LogForm::new("2024-01-01", "2"));
        assert!(matches!(
            ctl.state().last_error,
            Some(DashboardError::Insert(_))
        ));
        assert_eq!(store.fetches.get(), 1);
    }

    #[tokio::test]
    async fn failed_fetch_leaves_loading_set() {
        let (mut ctl, store, _) = setup(true, vec![entry("2024-01-01", 1.0)]);
        store.fail_fetch.set(true);

        assert_eq!(ctl.start().await, DashboardView::Loading);
        assert!(ctl.state().chart.is_empty());
        assert!(matches!(
            ctl.state().last_error,
            Some(DashboardError::Fetch(_))
        ));

        store.fail_fetch.set(false);
        ctl.refresh().await;
        assert_eq!(ctl.state().view(), DashboardView::Ready);
        assert_eq!(ctl.state().chart.len(), 1);
    }

    #[tokio::test]
    async fn successful_submit_after_failed_startup_clears_the_error() {
        let (mut ctl, store, _) = setup(true, vec![entry("2024-01-01", 1.0)]);
        store.fail_fetch.set(true);
        assert_eq!(ctl.start().await, DashboardView::Loading);

        store.fail_fetch.set(false);
        let outcome = ctl.submit_form("2024-01-02", "2").await;

        assert_eq!(outcome, SubmitOutcome::Saved);
        assert_eq!(ctl.state().view(), DashboardView::Ready);
        assert_eq!(ctl.state().chart.len(), 2);
        assert!(ctl.state().last_error.is_none());
    }

    #[tokio::test]
    async fn successful_refresh_drops_a_stale_fetch_error() {
        let (mut ctl, store, _) = setup(true, vec![entry("2024-01-01", 1.0)]);
        store.fail_fetch.set(true);
        ctl.start().await;

        store.fail_fetch.set(false);
        ctl.refresh().await;
        assert!(ctl.state().last_error.is_none());
    }

    #[tokio::test]
    async fn submit_without_session_is_refused() {
        let (mut ctl, store, _) = setup(false, vec![]);
        ctl.start().await;

        assert_eq!(
            ctl.submit_form("2024-01-01", "2").await,
            SubmitOutcome::NotSignedIn
        );
        assert_eq!(store.inserts.get(), 0);
    }

    #[tokio::test]
    async fn sign_in_then_sign_out_cycles_views() {
        let (mut ctl, store, _) = setup(false, vec![entry("2024-01-01", 3.0)]);
        assert_eq!(ctl.start().await, DashboardView::Unauthenticated);

        ctl.sign_in(&creds()).await.unwrap();
        assert_eq!(ctl.state().view(), DashboardView::Ready);
        assert_eq!(store.fetches.get(), 1);
        assert_eq!(ctl.state().chart[0].actual_remaining, 97.0);

        ctl.sign_out().await.unwrap();
        assert_eq!(ctl.state().view(), DashboardView::Unauthenticated);
        assert!(ctl.state().chart.is_empty());

        // signing in again is a fresh none → some transition
        ctl.sign_in(&creds()).await.unwrap();
        assert_eq!(store.fetches.get(), 2);
    }

    #[tokio::test]
    async fn failed_sign_out_keeps_session() {
        let (mut ctl, _, ident) = setup(true, vec![]);
        ctl.start().await;
        ident.fail_sign_out.set(true);

        assert!(ctl.sign_out().await.is_err());
        assert_eq!(ctl.state().view(), DashboardView::Ready);
        assert!(matches!(
            ctl.state().last_error,
            Some(DashboardError::SignOut(_))
        ));
    }

    #[tokio::test]
    async fn external_session_loss_is_picked_up() {
        let (mut ctl, _, ident) = setup(true, vec![]);
        ctl.start().await;
        ctl.poll_session().await;

        ident.broadcast.publish(None);
        let change = ctl.next_session_change().await;
        assert_eq!(change, Some(None));

        ctl.apply_session(None).await;
        assert_eq!(ctl.state().view(), DashboardView::Unauthenticated);
    }

    #[test]
    fn validation_message_matches_form_alert() {
        assert_eq!(
            ValidationError::MissingFields.to_string(),
            "Please fill in both fields!"
        );
        assert_eq!(
            LogForm::new(" ", "1").validate(),
            Err(ValidationError::MissingFields)
        );
        assert_eq!(
            LogForm::new("2024-01-01", "2.5").validate().unwrap().hours_spent,
            2.5
        );
    }
}
