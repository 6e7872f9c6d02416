use serde::Serialize;

use crate::domain::lead::Lead;

/// One month of paid revenue for the dashboard chart.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MonthlyRevenue {
    /// `YYYY-MM` month key.
    pub month: String,
    pub total: i64,
}

/// Counters and series rendered on the dashboard.
pub struct DashboardData {
    pub client_count: usize,
    pub project_count: usize,
    pub active_project_count: usize,
    pub invoice_count: usize,
    pub outstanding_total: i64,
    pub new_lead_count: usize,
    pub monthly_revenue: Vec<MonthlyRevenue>,
    pub recent_leads: Vec<Lead>,
}
