use std::time::Duration;

use chrono::Local;
use futures::future::join_all;
use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use uuid::Uuid;

use frontdesk_core::client::ApiClient;
use frontdesk_core::errors::ApiError;
use frontdesk_core::types::{
    item_count, Booking, Collection, Customer, Hotel, Listing, Payment, Room,
};

use crate::render::{render_dashboard, RenderOptions};
use crate::view::{
    booking_section, customer_section, hotel_section, payment_section, room_section, summary_card,
    DashboardView,
};

/// Rows shown per recent-items section
pub const RECENT_LIMIT: usize = 5;

/// Why a watch loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchOutcome {
    Interrupted,
    SessionExpired,
}

/// Loads one full dashboard view.
///
/// The six counters and five recent tables are fetched concurrently and
/// every loader carries its own error boundary: one failing endpoint
/// degrades its own card or section and never aborts the batch.
pub async fn load_dashboard(client: &ApiClient) -> DashboardView {
    let counters = join_all(
        Collection::ALL
            .iter()
            .map(|collection| load_count(client, *collection)),
    );

    let (counters, hotels, rooms, bookings, customers, payments) = tokio::join!(
        counters,
        fetch_recent::<Hotel>(client, Collection::Hotels),
        fetch_recent::<Room>(client, Collection::Rooms),
        fetch_recent::<Booking>(client, Collection::Bookings),
        fetch_recent::<Customer>(client, Collection::Customers),
        fetch_recent::<Payment>(client, Collection::Payments),
    );

    let mut session_expired = counters
        .iter()
        .any(|outcome| matches!(outcome, Err(ApiError::Unauthorized)));
    session_expired |= is_unauthorized(&hotels)
        || is_unauthorized(&rooms)
        || is_unauthorized(&bookings)
        || is_unauthorized(&customers)
        || is_unauthorized(&payments);

    let cards = Collection::ALL
        .iter()
        .zip(counters)
        .map(|(collection, outcome)| summary_card(*collection, outcome))
        .collect();

    let sections = vec![
        hotel_section(hotels),
        room_section(rooms),
        booking_section(bookings),
        customer_section(customers),
        payment_section(payments),
    ];

    DashboardView {
        generated_at: Local::now(),
        cards,
        sections,
        session_expired,
    }
}

/// Counter loader: first page of the collection reduced to a count
async fn load_count(client: &ApiClient, collection: Collection) -> Result<u64, ApiError> {
    match client.collection_page(collection).await {
        Ok(body) => Ok(item_count(&body)),
        Err(e) => {
            warn!("Failed to load the {} counter: {}", collection.name(), e);
            Err(e)
        }
    }
}

/// Recent-items loader: the first page of the collection, capped at
/// [`RECENT_LIMIT`] records in served order
async fn fetch_recent<T>(client: &ApiClient, collection: Collection) -> Result<Vec<T>, ApiError>
where
    T: DeserializeOwned + Default,
{
    let result: Result<Vec<T>, ApiError> = async {
        let body = client.collection_page(collection).await?;
        let listing = Listing::<T>::from_value(body)?;
        Ok(listing.items.into_iter().take(RECENT_LIMIT).collect())
    }
    .await;

    if let Err(e) = &result {
        warn!("Failed to load recent {}: {}", collection.name(), e);
    }
    result
}

fn is_unauthorized<T>(outcome: &Result<Vec<T>, ApiError>) -> bool {
    matches!(outcome, Err(ApiError::Unauthorized))
}

/// Tracks the single refresh task allowed in flight at a time.
///
/// Generations count up from one; registering a new cycle retires the
/// previous one, aborting it when it has not finished.
struct CycleGuard {
    generation: u64,
    inflight: Option<(u64, JoinHandle<()>)>,
}

impl CycleGuard {
    fn new() -> Self {
        Self {
            generation: 0,
            inflight: None,
        }
    }

    /// Registers the next cycle's task and returns its generation number
    fn begin(&mut self, handle: JoinHandle<()>) -> u64 {
        if let Some((generation, previous)) = self.inflight.take() {
            if previous.is_finished() {
                debug!("Refresh cycle {} completed", generation);
            } else {
                warn!("Refresh cycle {} superseded before completion", generation);
                previous.abort();
            }
        }
        self.generation += 1;
        self.inflight = Some((self.generation, handle));
        self.generation
    }

    /// Aborts whatever is still in flight
    fn shutdown(self) {
        if let Some((_, handle)) = self.inflight {
            handle.abort();
        }
    }
}

/// Re-renders the dashboard on a fixed interval until interrupted or the
/// session expires.
///
/// Each tick starts a new generation; a previous cycle still in flight is
/// aborted so overlapping cycles cannot interleave their output. The
/// first tick fires immediately.
pub async fn run_watch(
    client: ApiClient,
    options: RenderOptions,
    refresh_secs: u64,
) -> WatchOutcome {
    let mut ticker = tokio::time::interval(Duration::from_secs(refresh_secs.max(1)));
    let (expired_tx, mut expired_rx) = mpsc::channel::<()>(1);
    let mut cycles = CycleGuard::new();

    let outcome = loop {
        tokio::select! {
            _ = ticker.tick() => {
                let cycle_id = Uuid::new_v4();
                let task_client = client.clone();
                let task_options = options.clone();
                let task_expired = expired_tx.clone();
                let generation = cycles.begin(tokio::spawn(async move {
                    let view = load_dashboard(&task_client).await;
                    let expired = view.session_expired;
                    // One write per cycle so a superseding render never interleaves
                    if !task_options.plain {
                        print!("\x1b[2J\x1b[1;1H");
                    }
                    println!("{}", render_dashboard(&view, &task_options));
                    if expired {
                        let _ = task_expired.send(()).await;
                    }
                }));
                debug!("Starting refresh cycle {} ({})", generation, cycle_id);
            }
            _ = expired_rx.recv() => {
                break WatchOutcome::SessionExpired;
            }
            result = tokio::signal::ctrl_c() => {
                if let Err(e) = result {
                    warn!("Failed to listen for the shutdown signal: {}", e);
                }
                info!("Stopping the dashboard watch");
                break WatchOutcome::Interrupted;
            }
        }
    };

    cycles.shutdown();
    outcome
}
