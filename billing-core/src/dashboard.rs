//! Dashboard aggregation.
//!
//! Read-only derivations over a single snapshot, rebuilt on every request.
//! Nothing here writes or errors; a store read failure already degraded to
//! an empty snapshot before these functions run.

use crate::ledger::enrich_invoice;
use crate::models::{EnrichedInvoice, InvoiceStatus};
use crate::money::{invoice_total, line_item_total, round_cents};
use crate::store::Snapshot;
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// Month names for the Spanish-language dashboard labels.
const MONTHS_ES: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardOverview {
    pub total_invoices: usize,
    pub total_clients: usize,
    pub total_services: usize,
    pub total_revenue: Decimal,
    pub pending_invoices: usize,
    pub paid_invoices: usize,
    pub overdue_invoices: usize,
    pub cancelled_invoices: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct TopService {
    pub service_name: String,
    pub total_usage: Decimal,
    pub total_revenue: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthlyRevenue {
    pub month: String,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub overview: DashboardOverview,
    pub recent_invoices: Vec<EnrichedInvoice>,
    pub top_services: Vec<TopService>,
    pub monthly_revenues: Vec<MonthlyRevenue>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClientStats {
    pub client_name: String,
    pub total_invoices: usize,
    pub total_revenue: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceStats {
    pub service_name: String,
    pub total_quantity: Decimal,
    pub total_revenue: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct PeriodRevenue {
    pub period: String,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PeriodGranularity {
    #[default]
    Month,
    Quarter,
}

impl PeriodGranularity {
    /// Anything other than `"month"` buckets quarterly; an absent parameter
    /// uses the `Month` default instead of this parse.
    pub fn from_string(s: &str) -> Self {
        match s {
            "month" => PeriodGranularity::Month,
            _ => PeriodGranularity::Quarter,
        }
    }
}

/// Build the full dashboard for the given snapshot. `today` anchors the
/// trailing six-month revenue window.
pub fn build_dashboard(snapshot: &Snapshot, today: NaiveDate) -> Dashboard {
    let count_status = |status: InvoiceStatus| {
        snapshot
            .invoices
            .iter()
            .filter(|i| i.status == status)
            .count()
    };

    let total_revenue: Decimal = snapshot.invoices.iter().map(invoice_total).sum();

    let overview = DashboardOverview {
        total_invoices: snapshot.invoices.len(),
        total_clients: snapshot.clients.len(),
        total_services: snapshot.services.len(),
        total_revenue: round_cents(total_revenue),
        pending_invoices: count_status(InvoiceStatus::Pending),
        paid_invoices: count_status(InvoiceStatus::Paid),
        overdue_invoices: count_status(InvoiceStatus::Overdue),
        cancelled_invoices: count_status(InvoiceStatus::Cancelled),
    };

    // Last five invoices by insertion order, newest first.
    let recent_invoices = snapshot
        .invoices
        .iter()
        .rev()
        .take(5)
        .map(|invoice| enrich_invoice(invoice.clone(), snapshot))
        .collect();

    Dashboard {
        overview,
        recent_invoices,
        top_services: top_services(snapshot),
        monthly_revenues: monthly_revenues(snapshot, today),
    }
}

/// Top five services by revenue contribution, descending; ties keep the
/// order of first appearance. Line items referencing a deleted service are
/// skipped entirely.
fn top_services(snapshot: &Snapshot) -> Vec<TopService> {
    struct Accumulator {
        service_id: u64,
        name: String,
        usage: Decimal,
        revenue: Decimal,
    }

    let mut accumulators: Vec<Accumulator> = Vec::new();
    for invoice in &snapshot.invoices {
        for item in &invoice.items {
            let Some(service) = snapshot.services.iter().find(|s| s.id == item.service_id) else {
                continue;
            };
            let entry = match accumulators
                .iter_mut()
                .find(|a| a.service_id == service.id)
            {
                Some(entry) => entry,
                None => {
                    accumulators.push(Accumulator {
                        service_id: service.id,
                        name: service.name.clone(),
                        usage: Decimal::ZERO,
                        revenue: Decimal::ZERO,
                    });
                    accumulators.last_mut().unwrap()
                }
            };
            entry.usage += item.quantity.unwrap_or(Decimal::ONE);
            entry.revenue += line_item_total(item);
        }
    }

    // Stable sort keeps first-appearance order for equal revenues.
    accumulators.sort_by(|a, b| b.revenue.cmp(&a.revenue));
    accumulators
        .into_iter()
        .take(5)
        .map(|a| TopService {
            service_name: a.name,
            total_usage: a.usage,
            total_revenue: round_cents(a.revenue),
        })
        .collect()
}

/// Revenue per calendar month for the trailing six months including the
/// current one. Months without issued invoices report 0.00 rather than
/// being omitted.
fn monthly_revenues(snapshot: &Snapshot, today: NaiveDate) -> Vec<MonthlyRevenue> {
    (0..6)
        .rev()
        .map(|back| {
            let (year, month) = months_back(today, back);
            let revenue: Decimal = snapshot
                .invoices
                .iter()
                .filter(|invoice| {
                    invoice.issue_date.is_some_and(|date| {
                        date.year() == year && date.month() == month
                    })
                })
                .map(invoice_total)
                .sum();
            MonthlyRevenue {
                month: format!("{} de {}", MONTHS_ES[(month - 1) as usize], year),
                revenue: round_cents(revenue),
            }
        })
        .collect()
}

fn months_back(date: NaiveDate, back: u32) -> (i32, u32) {
    let total = date.year() * 12 + date.month0() as i32 - back as i32;
    (total.div_euclid(12), total.rem_euclid(12) as u32 + 1)
}

/// Per-client invoice count and revenue, one row per stored client.
pub fn client_stats(snapshot: &Snapshot) -> Vec<ClientStats> {
    snapshot
        .clients
        .iter()
        .map(|client| {
            let invoices: Vec<_> = snapshot
                .invoices
                .iter()
                .filter(|i| i.client_id == client.id)
                .collect();
            let revenue: Decimal = invoices.iter().map(|i| invoice_total(i)).sum();
            ClientStats {
                client_name: client.name.clone(),
                total_invoices: invoices.len(),
                total_revenue: round_cents(revenue),
            }
        })
        .collect()
}

/// Per-service quantity and revenue, one row per stored service.
pub fn service_stats(snapshot: &Snapshot) -> Vec<ServiceStats> {
    snapshot
        .services
        .iter()
        .map(|service| {
            let mut quantity = Decimal::ZERO;
            let mut revenue = Decimal::ZERO;
            for invoice in &snapshot.invoices {
                for item in &invoice.items {
                    if item.service_id == service.id {
                        quantity += item.quantity.unwrap_or(Decimal::ONE);
                        revenue += line_item_total(item);
                    }
                }
            }
            ServiceStats {
                service_name: service.name.clone(),
                total_quantity: quantity,
                total_revenue: round_cents(revenue),
            }
        })
        .collect()
}

/// Revenue bucketed by month (`YYYY-MM`) or quarter (`YYYY-Qn`) for
/// invoices issued in the given year. Only buckets with revenue appear.
pub fn revenue_by_period(
    snapshot: &Snapshot,
    year: i32,
    granularity: PeriodGranularity,
) -> Vec<PeriodRevenue> {
    let mut buckets: BTreeMap<String, Decimal> = BTreeMap::new();

    for invoice in &snapshot.invoices {
        let Some(date) = invoice.issue_date else {
            continue;
        };
        if date.year() != year {
            continue;
        }
        let key = match granularity {
            PeriodGranularity::Month => format!("{}-{:02}", year, date.month()),
            PeriodGranularity::Quarter => format!("{}-Q{}", year, date.month().div_ceil(3)),
        };
        *buckets.entry(key).or_insert(Decimal::ZERO) += invoice_total(invoice);
    }

    buckets
        .into_iter()
        .map(|(period, revenue)| PeriodRevenue {
            period,
            revenue: round_cents(revenue),
        })
        .collect()
}
