use chrono::{Datelike, NaiveDate, Utc};

use crate::auth::{AuthenticatedUser, SERVICE_ACCESS_ROLE};
use crate::domain::lead::LeadStatus;
use crate::dto::dashboard::{DashboardData, MonthlyRevenue};
use crate::listing::SortOrder;
use crate::repository::{
    ClientListQuery, ClientReader, InvoiceListQuery, InvoiceReader, LeadListQuery, LeadReader,
    ProjectListQuery, ProjectReader,
};
use crate::services::{ServiceResult, ensure_role};

const REVENUE_MONTHS: u32 = 12;
const RECENT_LEADS: usize = 5;

/// First day of the month `offset` months before `today`.
fn month_start(today: NaiveDate, offset: u32) -> NaiveDate {
    let months = today.year() as i64 * 12 + today.month0() as i64 - offset as i64;
    let year = months.div_euclid(12) as i32;
    let month = months.rem_euclid(12) as u32 + 1;
    // The first of any month always exists.
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(today)
}

/// Buckets paid invoice totals into `YYYY-MM` keys, filling empty months with
/// zero so the chart has a continuous axis.
fn monthly_revenue(today: NaiveDate, totals: &[(NaiveDate, i64)]) -> Vec<MonthlyRevenue> {
    (0..REVENUE_MONTHS)
        .rev()
        .map(|offset| {
            let start = month_start(today, offset);
            let month = start.format("%Y-%m").to_string();
            let total = totals
                .iter()
                .filter(|(date, _)| date.year() == start.year() && date.month() == start.month())
                .map(|(_, total)| total)
                .sum();
            MonthlyRevenue { month, total }
        })
        .collect()
}

/// Loads the dashboard counters, the revenue series and the recent leads.
pub fn load_dashboard<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<DashboardData>
where
    R: ClientReader + ProjectReader + InvoiceReader + LeadReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let (client_count, _) = repo.list_clients(ClientListQuery::new().paginate(1, 1))?;
    let (project_count, _) = repo.list_projects(ProjectListQuery::new().paginate(1, 1))?;
    let (active_project_count, _) =
        repo.list_projects(ProjectListQuery::new().status("in_progress").paginate(1, 1))?;
    let (invoice_count, _) = repo.list_invoices(InvoiceListQuery::new().paginate(1, 1))?;
    let outstanding_total = repo.outstanding_total()?;
    let new_lead_count = repo.count_leads_with_status(LeadStatus::New)?;

    let today = Utc::now().date_naive();
    let since = month_start(today, REVENUE_MONTHS - 1);
    let totals = repo.paid_invoice_totals(since)?;
    let monthly_revenue = monthly_revenue(today, &totals);

    let (_, recent_leads) =
        repo.list_leads(LeadListQuery::new().sort(SortOrder::Newest).paginate(1, RECENT_LEADS))?;

    Ok(DashboardData {
        client_count,
        project_count,
        active_project_count,
        invoice_count,
        outstanding_total,
        new_lead_count,
        monthly_revenue,
        recent_leads,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_start_walks_backwards_across_years() {
        let today = NaiveDate::from_ymd_opt(2026, 2, 15).unwrap();
        assert_eq!(
            month_start(today, 0),
            NaiveDate::from_ymd_opt(2026, 2, 1).unwrap()
        );
        assert_eq!(
            month_start(today, 3),
            NaiveDate::from_ymd_opt(2025, 11, 1).unwrap()
        );
    }

    #[test]
    fn revenue_series_fills_empty_months() {
        let today = NaiveDate::from_ymd_opt(2026, 6, 10).unwrap();
        let totals = vec![
            (NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(), 100),
            (NaiveDate::from_ymd_opt(2026, 6, 20).unwrap(), 50),
            (NaiveDate::from_ymd_opt(2026, 4, 2).unwrap(), 7),
        ];
        let series = monthly_revenue(today, &totals);
        assert_eq!(series.len(), REVENUE_MONTHS as usize);
        assert_eq!(series.last().unwrap().month, "2026-06");
        assert_eq!(series.last().unwrap().total, 150);
        assert_eq!(series[9].month, "2026-04");
        assert_eq!(series[9].total, 7);
        assert_eq!(series[8].total, 0);
        assert_eq!(series[0].month, "2025-07");
    }
}
