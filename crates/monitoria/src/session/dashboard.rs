use crate::api::{ApiTransport, CredentialStore, MonitoriaClient};
use crate::dashboard::{DashboardSummary, OperatorPerformance, OperatorPerformanceRow, RecentActivity};
use crate::users::User;

use super::scope::ViewScope;
use super::state::ViewState;

pub const DEFAULT_PERIOD_DAYS: u32 = 30;
pub const DEFAULT_RECENT_LIMIT: u32 = 10;

/// Dashboard panels. Operator performance is only requested for roles allowed to see it.
#[derive(Debug)]
pub struct DashboardView {
    period_days: u32,
    recent_limit: u32,
    stats: ViewState<DashboardSummary>,
    recent: ViewState<RecentActivity>,
    performance: ViewState<Vec<OperatorPerformanceRow>>,
    scope: ViewScope,
}

impl Default for DashboardView {
    fn default() -> Self {
        Self::new(DEFAULT_PERIOD_DAYS, DEFAULT_RECENT_LIMIT)
    }
}

impl DashboardView {
    pub fn new(period_days: u32, recent_limit: u32) -> Self {
        Self {
            period_days,
            recent_limit,
            stats: ViewState::Idle,
            recent: ViewState::Idle,
            performance: ViewState::Idle,
            scope: ViewScope::new(),
        }
    }

    pub fn period_days(&self) -> u32 {
        self.period_days
    }

    pub fn stats(&self) -> &ViewState<DashboardSummary> {
        &self.stats
    }

    pub fn recent(&self) -> &ViewState<RecentActivity> {
        &self.recent
    }

    pub fn performance(&self) -> &ViewState<Vec<OperatorPerformanceRow>> {
        &self.performance
    }

    pub fn scope(&self) -> &ViewScope {
        &self.scope
    }

    pub async fn load<T, S>(&mut self, client: &MonitoriaClient<T, S>, user: &User)
    where
        T: ApiTransport + 'static,
        S: CredentialStore + 'static,
    {
        self.stats = ViewState::Loading;
        self.recent = ViewState::Loading;
        let (stats, recent) = tokio::join!(
            self.scope.run(client.dashboard_stats(self.period_days)),
            self.scope.run(client.recent_activity(self.recent_limit)),
        );
        self.stats = ViewState::settle(stats.map(|stats| stats.summary()), "dashboard stats");
        self.recent = ViewState::settle(recent, "recent activity");

        if !user.can_view_operator_performance() {
            self.performance = ViewState::Idle;
            return;
        }
        self.performance = ViewState::Loading;
        let rows = self
            .scope
            .run(client.operator_performance(self.period_days))
            .await
            .map(|operators| operators.iter().map(OperatorPerformance::to_row).collect());
        self.performance = ViewState::settle(rows, "operator performance");
    }
}
