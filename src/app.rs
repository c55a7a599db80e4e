//! Application state management for esgdesk.
//!
//! This module contains the core `App` struct that owns the entity store,
//! the UI state (tabs, overlays, table views, the open form) and the channel
//! that background network tasks report through.

use std::cmp::Ordering;
use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::{Local, NaiveDate};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::api::{ApiClient, Resource};
use crate::config::Config;
use crate::forms::{ActiveForm, BusinessUnitForm, CompanyForm, MetricForm};
use crate::models::{
    BusinessUnit, BusinessUnitSortColumn, Company, CompanySortColumn, EntityId, Metric,
    MetricSortColumn, NewRecord,
};
use crate::store::summary::shift_months;
use crate::store::{tasks, AuditAction, EntityStore, FetchOutcome, StoreEvent};
use crate::utils::cmp_ignore_case;

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background task message channel.
const CHANNEL_BUFFER_SIZE: usize = 32;

/// How long a transient notification stays in the status bar.
pub const NOTIFICATION_DURATION: Duration = Duration::from_secs(3);

// ============================================================================
// UI State Types
// ============================================================================

/// Main navigation tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Dashboard,
    Calendar,
    Companies,
    BusinessUnits,
    Metrics,
    AuditLog,
}

impl Tab {
    pub const ALL: [Tab; 6] = [
        Tab::Dashboard,
        Tab::Calendar,
        Tab::Companies,
        Tab::BusinessUnits,
        Tab::Metrics,
        Tab::AuditLog,
    ];

    /// Get the display title for this tab.
    pub fn title(&self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Calendar => "Calendar",
            Tab::Companies => "Companies",
            Tab::BusinessUnits => "Business Units",
            Tab::Metrics => "Metrics",
            Tab::AuditLog => "Audit Log",
        }
    }

    /// Get the next tab (wrapping around)
    pub fn next(&self) -> Self {
        match self {
            Tab::Dashboard => Tab::Calendar,
            Tab::Calendar => Tab::Companies,
            Tab::Companies => Tab::BusinessUnits,
            Tab::BusinessUnits => Tab::Metrics,
            Tab::Metrics => Tab::AuditLog,
            Tab::AuditLog => Tab::Dashboard,
        }
    }

    /// Get the previous tab (wrapping around)
    pub fn prev(&self) -> Self {
        match self {
            Tab::Dashboard => Tab::AuditLog,
            Tab::Calendar => Tab::Dashboard,
            Tab::Companies => Tab::Calendar,
            Tab::BusinessUnits => Tab::Companies,
            Tab::Metrics => Tab::BusinessUnits,
            Tab::AuditLog => Tab::Metrics,
        }
    }

    /// The collection shown by a table tab.
    pub fn resource(&self) -> Option<Resource> {
        match self {
            Tab::Companies => Some(Resource::Companies),
            Tab::BusinessUnits => Some(Resource::BusinessUnits),
            Tab::Metrics => Some(Resource::Metrics),
            _ => None,
        }
    }
}

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    ShowingHelp,
    ConfirmingQuit,
    ConfirmingDelete { resource: Resource, id: EntityId },
    EditingForm,
    Quitting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

/// Transient message shown in the status bar.
#[derive(Debug, Clone)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub created_at: Instant,
}

impl Notification {
    pub fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.created_at) >= NOTIFICATION_DURATION
    }
}

/// Sort order and selection of one paginated table.
///
/// `selection` indexes the sorted rows; the visible page is derived from it.
#[derive(Debug, Clone, Copy)]
pub struct TableView<C> {
    pub sort_column: C,
    pub sort_ascending: bool,
    pub selection: usize,
}

impl<C: Copy + PartialEq> TableView<C> {
    pub fn new(sort_column: C) -> Self {
        Self {
            sort_column,
            sort_ascending: true,
            selection: 0,
        }
    }

    /// Toggle sort column - if already sorting by this column, flip direction;
    /// otherwise switch to this column with ascending=true. Resets selection to 0.
    pub fn toggle_sort(&mut self, column: C) {
        if self.sort_column == column {
            self.sort_ascending = !self.sort_ascending;
        } else {
            self.sort_column = column;
            self.sort_ascending = true;
        }
        self.selection = 0;
    }

    fn apply(&self, ordering: Ordering) -> Ordering {
        if self.sort_ascending {
            ordering
        } else {
            ordering.reverse()
        }
    }
}

impl<C> TableView<C> {
    /// Zero-based page holding the selection.
    pub fn page(&self, page_size: usize) -> usize {
        self.selection / page_size.max(1)
    }

    pub fn page_count(total: usize, page_size: usize) -> usize {
        total.div_ceil(page_size.max(1)).max(1)
    }

    /// Row range of the current page, clamped to `total`.
    pub fn page_range(&self, total: usize, page_size: usize) -> std::ops::Range<usize> {
        let start = (self.page(page_size) * page_size).min(total);
        start..(start + page_size).min(total)
    }

    pub fn select_next(&mut self, total: usize) {
        if self.selection + 1 < total {
            self.selection += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selection = self.selection.saturating_sub(1);
    }

    /// Move to the first row of the next page, if there is one.
    pub fn next_page(&mut self, total: usize, page_size: usize) {
        let next = (self.page(page_size) + 1) * page_size;
        if next < total {
            self.selection = next;
        }
    }

    pub fn prev_page(&mut self, page_size: usize) {
        let page = self.page(page_size);
        self.selection = page.saturating_sub(1) * page_size;
    }

    /// Keep the selection inside the table after rows disappear.
    pub fn clamp(&mut self, total: usize) {
        self.selection = self.selection.min(total.saturating_sub(1));
    }
}

// ============================================================================
// Main Application Struct
// ============================================================================

/// Main application state container
pub struct App {
    // Core services
    pub api: ApiClient,
    pub store: EntityStore,

    // UI State
    pub state: AppState,
    pub current_tab: Tab,
    pub form: Option<ActiveForm>,
    /// A validated form payload is in flight.
    pub submitting: bool,
    pub company_view: TableView<CompanySortColumn>,
    pub business_unit_view: TableView<BusinessUnitSortColumn>,
    pub metric_view: TableView<MetricSortColumn>,
    pub audit_selection: usize,
    /// Selected day on the calendar tab.
    pub calendar_date: NaiveDate,
    pub page_size: usize,

    // Status message
    pub notification: Option<Notification>,

    // Background task channel
    event_rx: mpsc::Receiver<StoreEvent>,
    event_tx: mpsc::Sender<StoreEvent>,
}

impl App {
    /// Create a new application instance
    pub fn new(config: &Config) -> Result<Self> {
        debug!("App::new() starting");
        let mut api = ApiClient::new(config.api_base_url(), config.request_timeout())?;
        if let Some(token) = config.api_token.clone() {
            api = api.with_token(token);
        }
        let (event_tx, event_rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);
        let page_size = config.page_size();

        info!(base_url = api.base_url(), page_size, "App initialized");

        Ok(Self {
            api,
            store: EntityStore::new(),
            state: AppState::Normal,
            current_tab: Tab::Dashboard,
            form: None,
            submitting: false,
            company_view: TableView::new(CompanySortColumn::Name),
            business_unit_view: TableView::new(BusinessUnitSortColumn::Name),
            metric_view: TableView::new(MetricSortColumn::Name),
            audit_selection: 0,
            calendar_date: Local::now().date_naive(),
            page_size,
            notification: None,
            event_rx,
            event_tx,
        })
    }

    // =========================================================================
    // Store operations
    // =========================================================================

    /// Issue a fetch of the full collection in the background.
    pub fn fetch_all(&mut self, resource: Resource) {
        let seq = self.store.begin_fetch(resource);
        debug!(resource = resource.path(), seq, "Fetch issued");
        tokio::spawn(tasks::fetch_collection(
            self.api.clone(),
            resource,
            seq,
            self.event_tx.clone(),
        ));
    }

    pub fn refresh_all(&mut self) {
        for resource in Resource::ALL {
            self.fetch_all(resource);
        }
    }

    /// Submit a record in the background. The collection is re-fetched once
    /// the server accepts it.
    pub fn create(&mut self, record: NewRecord) {
        debug!(resource = record.resource().path(), name = record.name(), "Create issued");
        tokio::spawn(tasks::create_record(
            self.api.clone(),
            record,
            self.event_tx.clone(),
        ));
    }

    /// Delete a record in the background. The display name is captured now,
    /// while the record is still in the store.
    pub fn delete(&mut self, resource: Resource, id: EntityId) {
        let details = self.store.display_name(resource, id);
        debug!(resource = resource.path(), id, "Delete issued");
        tokio::spawn(tasks::delete_record(
            self.api.clone(),
            resource,
            id,
            details,
            self.event_tx.clone(),
        ));
    }

    /// Check for completed background tasks and process results
    pub fn check_background_tasks(&mut self) {
        let mut events = Vec::new();
        while let Ok(event) = self.event_rx.try_recv() {
            events.push(event);
        }
        for event in events {
            self.process_event(event);
        }

        if self
            .notification
            .as_ref()
            .is_some_and(|n| n.is_expired(Instant::now()))
        {
            self.notification = None;
        }
    }

    /// Apply one task result to the store and UI state.
    fn process_event(&mut self, event: StoreEvent) {
        match event {
            StoreEvent::Fetched {
                resource,
                seq,
                result,
            } => {
                if self.store.apply_fetch(resource, seq, result) == FetchOutcome::Applied {
                    self.clamp_selections();
                    self.refresh_form_options();
                }
            }
            StoreEvent::Created { resource, name } => {
                self.store.audit.record(AuditAction::Added, resource, &name);
                self.notify(
                    NotificationKind::Success,
                    format!("{} Added", resource.entity_name()),
                    format!(
                        "A new {} has been successfully added.",
                        resource.entity_name().to_lowercase()
                    ),
                );
                if self.submitting && self.form.as_ref().map(|f| f.resource()) == Some(resource) {
                    self.close_form();
                }
                self.submitting = false;
                self.fetch_all(resource);
            }
            StoreEvent::CreateFailed { resource, error } => {
                warn!(resource = resource.path(), error = %error, "Create rejected");
                self.submitting = false;
                self.notify(
                    NotificationKind::Error,
                    format!("Failed to Add {}", resource.entity_name()),
                    "Please check your input and try again.".to_string(),
                );
            }
            StoreEvent::Deleted {
                resource,
                id,
                details,
            } => {
                debug!(resource = resource.path(), id, "Delete confirmed");
                self.store.audit.record(AuditAction::Deleted, resource, &details);
                self.notify(
                    NotificationKind::Success,
                    format!("{} deleted!", resource.entity_name()),
                    String::new(),
                );
                self.fetch_all(resource);
            }
            StoreEvent::DeleteFailed {
                resource,
                id,
                error,
            } => {
                warn!(resource = resource.path(), id, error = %error, "Delete rejected");
                self.notify(
                    NotificationKind::Error,
                    "Error".to_string(),
                    format!(
                        "Failed to delete {}.",
                        resource.entity_name().to_lowercase()
                    ),
                );
            }
        }
    }

    fn notify(&mut self, kind: NotificationKind, title: String, message: String) {
        self.notification = Some(Notification {
            kind,
            title,
            message,
            created_at: Instant::now(),
        });
    }

    fn clamp_selections(&mut self) {
        self.company_view.clamp(self.store.companies.items.len());
        self.business_unit_view
            .clamp(self.store.business_units.items.len());
        self.metric_view.clamp(self.store.metrics.items.len());
        self.audit_selection = self
            .audit_selection
            .min(self.store.audit.len().saturating_sub(1));
    }

    // =========================================================================
    // Forms
    // =========================================================================

    /// Open the add form for `resource` with choices from the current store.
    pub fn open_form(&mut self, resource: Resource) {
        let store = &self.store;
        self.form = Some(match resource {
            Resource::Companies => ActiveForm::Company(CompanyForm::new()),
            Resource::BusinessUnits => {
                ActiveForm::BusinessUnit(BusinessUnitForm::new(&store.companies.items))
            }
            Resource::Metrics => ActiveForm::Metric(MetricForm::new(
                &store.business_units.items,
                &store.companies.items,
            )),
        });
        self.submitting = false;
        self.state = AppState::EditingForm;
    }

    pub fn close_form(&mut self) {
        self.form = None;
        self.submitting = false;
        if self.state == AppState::EditingForm {
            self.state = AppState::Normal;
        }
    }

    /// Validate the open form and submit it. Validation failures stay in the
    /// form with focus on the offending field.
    pub fn submit_form(&mut self) {
        if self.submitting {
            return;
        }
        let Some(form) = self.form.as_mut() else {
            return;
        };
        match form.build() {
            Ok(record) => {
                form.form_mut().error = None;
                self.submitting = true;
                self.create(record);
            }
            Err(e) => {
                debug!(field = e.field(), error = %e, "Form validation failed");
                form.form_mut().show_error(&e);
            }
        }
    }

    /// Keep reference choices of an open form in step with the store.
    fn refresh_form_options(&mut self) {
        let store = &self.store;
        match self.form.as_mut() {
            Some(ActiveForm::BusinessUnit(f)) => f.set_companies(&store.companies.items),
            Some(ActiveForm::Metric(f)) => {
                f.set_business_units(&store.business_units.items, &store.companies.items)
            }
            _ => {}
        }
    }

    // =========================================================================
    // Delete confirmation
    // =========================================================================

    /// Ask for confirmation before deleting the selected row.
    pub fn request_delete(&mut self) {
        if let Some((resource, id)) = self.selected_record() {
            self.state = AppState::ConfirmingDelete { resource, id };
        }
    }

    pub fn confirm_delete(&mut self) {
        if let AppState::ConfirmingDelete { resource, id } = self.state {
            self.state = AppState::Normal;
            self.delete(resource, id);
        }
    }

    pub fn cancel_delete(&mut self) {
        if matches!(self.state, AppState::ConfirmingDelete { .. }) {
            self.state = AppState::Normal;
        }
    }

    /// The record under the cursor on the current table tab.
    pub fn selected_record(&self) -> Option<(Resource, EntityId)> {
        match self.current_tab {
            Tab::Companies => self
                .sorted_companies()
                .get(self.company_view.selection)
                .map(|c| (Resource::Companies, c.id)),
            Tab::BusinessUnits => self
                .sorted_business_units()
                .get(self.business_unit_view.selection)
                .map(|b| (Resource::BusinessUnits, b.id)),
            Tab::Metrics => self
                .sorted_metrics()
                .get(self.metric_view.selection)
                .map(|m| (Resource::Metrics, m.id)),
            _ => None,
        }
    }

    // =========================================================================
    // Sorted views
    // =========================================================================

    /// Get companies sorted by current sort settings
    pub fn sorted_companies(&self) -> Vec<&Company> {
        let view = &self.company_view;
        let mut sorted: Vec<&Company> = self.store.companies.items.iter().collect();
        sorted.sort_by(|a, b| {
            let cmp = match view.sort_column {
                CompanySortColumn::Name => cmp_ignore_case(&a.name, &b.name),
                CompanySortColumn::Sector => a.sector.code().cmp(b.sector.code())
                    .then_with(|| cmp_ignore_case(&a.name, &b.name)),
                CompanySortColumn::Location => cmp_ignore_case(&a.location, &b.location)
                    .then_with(|| cmp_ignore_case(&a.name, &b.name)),
                CompanySortColumn::Start => a
                    .reporting_period_start
                    .cmp(&b.reporting_period_start)
                    .then_with(|| cmp_ignore_case(&a.name, &b.name)),
                CompanySortColumn::End => a
                    .reporting_period_end
                    .cmp(&b.reporting_period_end)
                    .then_with(|| cmp_ignore_case(&a.name, &b.name)),
            };
            view.apply(cmp)
        });
        sorted
    }

    /// Get business units sorted by current sort settings
    pub fn sorted_business_units(&self) -> Vec<&BusinessUnit> {
        let view = &self.business_unit_view;
        let mut sorted: Vec<&BusinessUnit> = self.store.business_units.items.iter().collect();
        sorted.sort_by(|a, b| {
            let cmp = match view.sort_column {
                BusinessUnitSortColumn::Company => cmp_ignore_case(
                    &self.store.company_name(a.company),
                    &self.store.company_name(b.company),
                )
                .then_with(|| cmp_ignore_case(&a.name, &b.name)),
                BusinessUnitSortColumn::Name => cmp_ignore_case(&a.name, &b.name),
                BusinessUnitSortColumn::Type => {
                    a.unit_type.code().cmp(b.unit_type.code())
                        .then_with(|| cmp_ignore_case(&a.name, &b.name))
                }
                BusinessUnitSortColumn::Location => cmp_ignore_case(&a.location, &b.location)
                    .then_with(|| cmp_ignore_case(&a.name, &b.name)),
                // Active first when ascending
                BusinessUnitSortColumn::Active => b
                    .is_active
                    .cmp(&a.is_active)
                    .then_with(|| cmp_ignore_case(&a.name, &b.name)),
            };
            view.apply(cmp)
        });
        sorted
    }

    /// Get metrics sorted by current sort settings
    pub fn sorted_metrics(&self) -> Vec<&Metric> {
        let view = &self.metric_view;
        let mut sorted: Vec<&Metric> = self.store.metrics.items.iter().collect();
        sorted.sort_by(|a, b| {
            let cmp = match view.sort_column {
                MetricSortColumn::BusinessUnit => cmp_ignore_case(
                    &self.store.business_unit_label(a.business_unit),
                    &self.store.business_unit_label(b.business_unit),
                )
                .then_with(|| cmp_ignore_case(&a.name, &b.name)),
                MetricSortColumn::Name => cmp_ignore_case(&a.name, &b.name),
                MetricSortColumn::Category => {
                    a.esg_category.code().cmp(b.esg_category.code())
                        .then_with(|| cmp_ignore_case(&a.name, &b.name))
                }
                MetricSortColumn::Value => a
                    .value
                    .total_cmp(&b.value)
                    .then_with(|| cmp_ignore_case(&a.name, &b.name)),
                MetricSortColumn::Unit => a
                    .unit_of_measurement
                    .code()
                    .cmp(b.unit_of_measurement.code())
                    .then_with(|| cmp_ignore_case(&a.name, &b.name)),
                MetricSortColumn::Year => a
                    .reporting_year
                    .cmp(&b.reporting_year)
                    .then_with(|| cmp_ignore_case(&a.name, &b.name)),
                // Verified first when ascending
                MetricSortColumn::Verified => b
                    .is_verified
                    .cmp(&a.is_verified)
                    .then_with(|| cmp_ignore_case(&a.name, &b.name)),
            };
            view.apply(cmp)
        });
        sorted
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    fn current_total(&self) -> usize {
        match self.current_tab {
            Tab::Companies => self.store.companies.items.len(),
            Tab::BusinessUnits => self.store.business_units.items.len(),
            Tab::Metrics => self.store.metrics.items.len(),
            Tab::AuditLog => self.store.audit.len(),
            Tab::Dashboard | Tab::Calendar => 0,
        }
    }

    pub fn select_next(&mut self) {
        let total = self.current_total();
        match self.current_tab {
            Tab::Companies => self.company_view.select_next(total),
            Tab::BusinessUnits => self.business_unit_view.select_next(total),
            Tab::Metrics => self.metric_view.select_next(total),
            Tab::AuditLog => {
                if self.audit_selection + 1 < total {
                    self.audit_selection += 1;
                }
            }
            Tab::Dashboard | Tab::Calendar => {}
        }
    }

    pub fn select_prev(&mut self) {
        match self.current_tab {
            Tab::Companies => self.company_view.select_prev(),
            Tab::BusinessUnits => self.business_unit_view.select_prev(),
            Tab::Metrics => self.metric_view.select_prev(),
            Tab::AuditLog => self.audit_selection = self.audit_selection.saturating_sub(1),
            Tab::Dashboard | Tab::Calendar => {}
        }
    }

    pub fn next_page(&mut self) {
        let (total, size) = (self.current_total(), self.page_size);
        match self.current_tab {
            Tab::Companies => self.company_view.next_page(total, size),
            Tab::BusinessUnits => self.business_unit_view.next_page(total, size),
            Tab::Metrics => self.metric_view.next_page(total, size),
            _ => {}
        }
    }

    pub fn prev_page(&mut self) {
        let size = self.page_size;
        match self.current_tab {
            Tab::Companies => self.company_view.prev_page(size),
            Tab::BusinessUnits => self.business_unit_view.prev_page(size),
            Tab::Metrics => self.metric_view.prev_page(size),
            _ => {}
        }
    }

    /// Move the calendar cursor by whole days.
    pub fn shift_calendar_days(&mut self, days: i64) {
        if let Some(date) = self
            .calendar_date
            .checked_add_signed(chrono::Duration::days(days))
        {
            self.calendar_date = date;
        }
    }

    pub fn shift_calendar_months(&mut self, months: i32) {
        self.calendar_date = shift_months(self.calendar_date, months);
    }

    pub fn calendar_today(&mut self) {
        self.calendar_date = Local::now().date_naive();
    }

    // =========================================================================
    // Sort toggles
    // =========================================================================

    pub fn toggle_company_sort(&mut self, column: CompanySortColumn) {
        self.company_view.toggle_sort(column);
    }

    pub fn toggle_business_unit_sort(&mut self, column: BusinessUnitSortColumn) {
        self.business_unit_view.toggle_sort(column);
    }

    pub fn toggle_metric_sort(&mut self, column: MetricSortColumn) {
        self.metric_view.toggle_sort(column);
    }

    /// Wait for the next task result and apply it.
    #[cfg(test)]
    pub(crate) async fn process_next_event(&mut self) {
        let event = self
            .event_rx
            .recv()
            .await
            .expect("event channel closed");
        self.process_event(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EsgCategory, MeasurementUnit, NewCompany, Sector};
    use crate::ui::tabs::{companies, render_to_text};
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn app_for(server: &MockServer) -> App {
        let config = Config {
            api_base_url: Some(format!("{}/api", server.uri())),
            ..Default::default()
        };
        App::new(&config).unwrap()
    }

    fn acme_json() -> serde_json::Value {
        json!({
            "id": 1,
            "name": "Acme",
            "sector": "TECHNOLOGY",
            "location": "Berlin",
            "reporting_period_start": "2024-01-01",
            "reporting_period_end": "2024-12-31",
            "description": null
        })
    }

    fn company(id: EntityId, name: &str, end: &str) -> Company {
        Company {
            id,
            name: name.to_string(),
            sector: Sector::Technology,
            location: "Berlin".to_string(),
            reporting_period_start: "2024-01-01".to_string(),
            reporting_period_end: end.to_string(),
            description: None,
        }
    }

    // -------------------------------------------------------------------------
    // Tab Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_tab_next() {
        assert_eq!(Tab::Dashboard.next(), Tab::Calendar);
        assert_eq!(Tab::Calendar.next(), Tab::Companies);
        assert_eq!(Tab::Companies.next(), Tab::BusinessUnits);
        assert_eq!(Tab::BusinessUnits.next(), Tab::Metrics);
        assert_eq!(Tab::Metrics.next(), Tab::AuditLog);
        assert_eq!(Tab::AuditLog.next(), Tab::Dashboard); // Wraps around
    }

    #[test]
    fn test_tab_prev() {
        assert_eq!(Tab::Dashboard.prev(), Tab::AuditLog); // Wraps around
        assert_eq!(Tab::AuditLog.prev(), Tab::Metrics);
        assert_eq!(Tab::Metrics.prev(), Tab::BusinessUnits);
        assert_eq!(Tab::BusinessUnits.prev(), Tab::Companies);
        assert_eq!(Tab::Companies.prev(), Tab::Calendar);
        assert_eq!(Tab::Calendar.prev(), Tab::Dashboard);
    }

    // -------------------------------------------------------------------------
    // Table View Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_toggle_sort() {
        let mut view = TableView::new(CompanySortColumn::Name);
        view.selection = 4;
        view.toggle_sort(CompanySortColumn::Name);
        assert!(!view.sort_ascending);
        assert_eq!(view.selection, 0);
        view.toggle_sort(CompanySortColumn::End);
        assert_eq!(view.sort_column, CompanySortColumn::End);
        assert!(view.sort_ascending);
    }

    #[test]
    fn test_paging() {
        let mut view = TableView::new(CompanySortColumn::Name);
        assert_eq!(TableView::<CompanySortColumn>::page_count(0, 10), 1);
        assert_eq!(TableView::<CompanySortColumn>::page_count(21, 10), 3);
        assert_eq!(view.page_range(21, 10), 0..10);

        view.next_page(21, 10);
        view.next_page(21, 10);
        assert_eq!(view.selection, 20);
        assert_eq!(view.page_range(21, 10), 20..21);
        view.next_page(21, 10);
        assert_eq!(view.selection, 20);

        view.prev_page(10);
        assert_eq!(view.selection, 10);
        view.clamp(5);
        assert_eq!(view.selection, 4);
    }

    #[test]
    fn test_companies_sorted_by_end_descending() {
        let mut app = App::new(&Config::default()).unwrap();
        app.store.companies.items = vec![
            company(1, "A", "2024-01-01"),
            company(2, "B", "2023-06-01"),
            company(3, "C", "2025-03-01"),
        ];
        app.toggle_company_sort(CompanySortColumn::End);
        app.toggle_company_sort(CompanySortColumn::End);
        let ends: Vec<&str> = app
            .sorted_companies()
            .iter()
            .map(|c| c.reporting_period_end.as_str())
            .collect();
        assert_eq!(ends, ["2025-03-01", "2024-01-01", "2023-06-01"]);
    }

    #[test]
    fn test_metrics_sorted_by_unit() {
        let metric = |id: EntityId, unit: MeasurementUnit| Metric {
            id,
            business_unit: 1,
            name: format!("m{}", id),
            esg_category: EsgCategory::Environmental,
            metric_type: "Energy".to_string(),
            unit_of_measurement: unit,
            value: 1.0,
            reporting_year: 2024,
            reporting_period: "ANNUAL".to_string(),
            is_verified: false,
            description: None,
            data_source: None,
        };
        let mut app = App::new(&Config::default()).unwrap();
        app.store.metrics.items = vec![
            metric(1, MeasurementUnit::Tonnes),
            metric(2, MeasurementUnit::Kwh),
            metric(3, MeasurementUnit::Liters),
        ];
        app.toggle_metric_sort(MetricSortColumn::Unit);
        let units: Vec<&str> = app
            .sorted_metrics()
            .iter()
            .map(|m| m.unit_of_measurement.code())
            .collect();
        assert_eq!(units, ["KWH", "LITERS", "TONNES"]);
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let mut app = App::new(&Config::default()).unwrap();
        app.store.companies.items = vec![company(7, "Acme", "2024-12-31")];
        app.current_tab = Tab::Companies;
        app.request_delete();
        assert_eq!(
            app.state,
            AppState::ConfirmingDelete {
                resource: Resource::Companies,
                id: 7
            }
        );
        app.cancel_delete();
        assert_eq!(app.state, AppState::Normal);
        assert_eq!(app.store.companies.items.len(), 1);
    }

    #[test]
    fn test_invalid_form_stays_open() {
        let mut app = App::new(&Config::default()).unwrap();
        app.open_form(Resource::Companies);
        app.submit_form();
        assert_eq!(app.state, AppState::EditingForm);
        assert!(!app.submitting);
        let form = app.form.as_ref().unwrap().form();
        assert_eq!(form.error.as_deref(), Some("Please enter company name"));
    }

    #[test]
    fn test_reopened_form_starts_from_defaults() {
        let mut app = App::new(&Config::default()).unwrap();
        app.open_form(Resource::Companies);
        if let Some(ActiveForm::Company(f)) = app.form.as_mut() {
            f.form.set_text("name", "Acme");
        }
        app.close_form();
        app.open_form(Resource::Companies);
        let form = app.form.as_ref().unwrap().form();
        assert_eq!(form.text("name"), "");
        assert_eq!(form.selected("sector"), None);
    }

    #[test]
    fn test_notification_expiry() {
        let created_at = Instant::now();
        let n = Notification {
            kind: NotificationKind::Success,
            title: "Company Added".to_string(),
            message: String::new(),
            created_at,
        };
        assert!(!n.is_expired(created_at + Duration::from_secs(2)));
        assert!(n.is_expired(created_at + NOTIFICATION_DURATION));
    }

    // -------------------------------------------------------------------------
    // End-to-end flows against a mock server
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_create_company_through_form() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/companies/"))
            .respond_with(ResponseTemplate::new(201).set_body_json(acme_json()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/companies/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([acme_json()])))
            .mount(&server)
            .await;

        let mut app = app_for(&server);
        app.open_form(Resource::Companies);
        if let Some(ActiveForm::Company(f)) = app.form.as_mut() {
            let technology = Sector::ALL
                .iter()
                .position(|s| *s == Sector::Technology)
                .unwrap();
            f.form.set_text("name", "Acme");
            f.form.select("sector", technology);
            f.form.set_text("location", "Berlin");
            f.form.set_text("reporting_period_start", "2024-01-01");
            f.form.set_text("reporting_period_end", "2024-12-31");
        }
        app.submit_form();
        assert!(app.submitting);

        app.process_next_event().await; // Created
        assert!(app.form.is_none());
        assert_eq!(app.state, AppState::Normal);
        let note = app.notification.as_ref().unwrap();
        assert_eq!(note.title, "Company Added");
        assert!(app.store.is_loading(Resource::Companies));

        app.process_next_event().await; // Fetched
        assert!(!app.store.is_loading(Resource::Companies));
        let names: Vec<&str> = app.sorted_companies().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Acme"]);

        // The table row carries the values exactly as submitted
        let text = render_to_text(&app, 160, 8, companies::render);
        let row = text
            .lines()
            .find(|line| line.contains("Acme"))
            .expect("Acme row rendered");
        for expected in ["TECHNOLOGY", "Berlin", "2024-01-01", "2024-12-31"] {
            assert!(row.contains(expected), "missing {:?} in row {:?}", expected, row);
        }

        let entries = app.store.audit.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].summary(), "Added Company: Acme");
    }

    #[tokio::test]
    async fn test_create_failure_keeps_form_open() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/companies/"))
            .respond_with(ResponseTemplate::new(400).set_body_string(r#"{"name":["exists"]}"#))
            .mount(&server)
            .await;

        let mut app = app_for(&server);
        app.open_form(Resource::Companies);
        app.create(NewRecord::Company(NewCompany {
            name: "Acme".to_string(),
            sector: Sector::Technology,
            location: "Berlin".to_string(),
            reporting_period_start: "2024-01-01".to_string(),
            reporting_period_end: "2024-12-31".to_string(),
            description: None,
        }));
        app.submitting = true;

        app.process_next_event().await;
        assert!(app.form.is_some());
        assert!(!app.submitting);
        let note = app.notification.as_ref().unwrap();
        assert_eq!(note.kind, NotificationKind::Error);
        assert_eq!(note.title, "Failed to Add Company");
        assert!(app.store.audit.is_empty());
    }

    #[tokio::test]
    async fn test_delete_removes_record_after_refetch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/companies/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([acme_json()])))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/companies/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/companies/1/"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let mut app = app_for(&server);
        app.fetch_all(Resource::Companies);
        app.process_next_event().await;
        assert!(app.store.contains(Resource::Companies, 1));

        app.current_tab = Tab::Companies;
        app.request_delete();
        app.confirm_delete();
        assert_eq!(app.state, AppState::Normal);

        app.process_next_event().await; // Deleted
        assert_eq!(app.notification.as_ref().unwrap().title, "Company deleted!");
        assert_eq!(app.store.audit.entries()[0].summary(), "Deleted Company: Acme");

        app.process_next_event().await; // Fetched
        assert!(!app.store.contains(Resource::Companies, 1));
    }

    #[tokio::test]
    async fn test_fetch_failure_flags_collection() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/metrics/"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let mut app = app_for(&server);
        app.fetch_all(Resource::Metrics);
        app.process_next_event().await;
        assert_eq!(
            app.store.fetch_error(Resource::Metrics),
            Some("Failed to fetch metrics")
        );
    }
}
