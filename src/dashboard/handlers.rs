//! Dashboard HTTP handlers and view rendering.

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

use crate::{
    AppState, Error,
    dashboard::{
        aggregation::{DashboardStats, GroupSummary, compute_stats, summarize_by_group},
        cards::stat_cards_view,
        item::get_item_records,
        pie::{PieSegment, compute_pie_segments, pie_chart_view},
        tables::group_summary_table,
    },
    endpoints,
    html::{base, link},
    navigation::NavBar,
};

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading items.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Holds all the data needed to render the dashboard.
struct DashboardData {
    stats: DashboardStats,
    summaries: Vec<GroupSummary>,
    segments: Vec<PieSegment>,
}

/// Display a page with an overview of the household's list.
pub async fn get_dashboard_page(State(state): State<DashboardState>) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW);

    match build_dashboard_data(&connection)? {
        Some(data) => Ok(dashboard_view(nav_bar, &data).into_response()),
        None => Ok(dashboard_no_data_view(nav_bar).into_response()),
    }
}

/// Fetches items and computes all derived dashboard data.
///
/// Everything is recomputed from a fresh snapshot on every call; nothing is
/// cached between requests.
///
/// # Returns
/// All dashboard data ready for rendering, or `None` if no items exist.
///
/// # Errors
/// Returns an error if the item query fails.
fn build_dashboard_data(connection: &Connection) -> Result<Option<DashboardData>, Error> {
    let items = get_item_records(connection)
        .inspect_err(|error| tracing::error!("could not get items: {error}"))?;

    if items.is_empty() {
        return Ok(None);
    }

    let stats = compute_stats(&items);
    let summaries = summarize_by_group(&items);
    let segments = compute_pie_segments(&summaries, stats.total_estimated);

    Ok(Some(DashboardData {
        stats,
        summaries,
        segments,
    }))
}

/// Renders the dashboard page when no items exist.
fn dashboard_no_data_view(nav_bar: NavBar) -> Markup {
    let nav_bar = nav_bar.into_html();
    let new_item_link = link(endpoints::NEW_ITEM_VIEW, "adding an item");

    let content = html!(
        (nav_bar)

        div class="flex flex-col items-center px-6 py-8 mx-auto text-gray-900 dark:text-white"
        {
            h2 class="text-xl font-bold"
            {
                "Nothing here yet..."
            }

            p
            {
                "Totals and charts will show up here once the list has some
                items. Get started by " (new_item_link) "."
            }
        }
    );

    base("Dashboard", &[], &content)
}

/// Renders the main dashboard page with stat cards, the pie chart and the
/// group summary table.
fn dashboard_view(nav_bar: NavBar, data: &DashboardData) -> Markup {
    let nav_bar = nav_bar.into_html();

    let content = html!(
        (nav_bar)

        div
            id="dashboard-content"
            class="flex flex-col items-center px-2 lg:px-6 lg:py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white"
        {
            (stat_cards_view(&data.stats))

            div class="grid grid-cols-1 xl:grid-cols-2 gap-4 w-full items-start"
            {
                @if data.segments.is_empty() {
                    div
                        class="flex items-center justify-center h-64 text-gray-500
                            rounded bg-white shadow-sm dark:bg-gray-800 dark:text-gray-400"
                    {
                        "No data available"
                    }
                } @else {
                    (pie_chart_view(&data.segments))
                }

                (group_summary_table(&data.summaries))
            }
        }
    );

    base("Dashboard", &[], &content)
}
