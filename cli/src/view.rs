use chrono::{DateTime, Local};

use frontdesk_core::errors::ApiError;
use frontdesk_core::types::{Booking, Collection, Customer, Hotel, Payment, Room};

use crate::format::{format_currency, format_date, full_name, stars, text_or_na, value_text};

/// Admin route for creating a hotel, shown as the dashboard footer hint
pub const ADD_HOTEL_ROUTE: &str = "/admin/hotel/hotel/add/";

/// Color tone of a rendered cell, mirroring the status palette of the
/// admin UI (success, danger, primary, warning)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Strong,
    Muted,
    Success,
    Danger,
    Primary,
    Warning,
}

/// One table cell of the dashboard view-model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub text: String,
    pub tone: Tone,
}

impl Cell {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: Tone::Plain,
        }
    }

    pub fn strong(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: Tone::Strong,
        }
    }

    pub fn toned(text: impl Into<String>, tone: Tone) -> Self {
        Self { text: text.into(), tone }
    }
}

pub type Row = Vec<Cell>;

/// One summary counter card.
///
/// `trend` carries the fixed presentation value of the original UI; the
/// dashboard keeps no history to derive a real delta from, so it is
/// decorative and rendered dimmed.
#[derive(Debug, Clone)]
pub struct SummaryCard {
    pub label: &'static str,
    pub count: Option<u64>,
    pub trend: &'static str,
    pub error: Option<String>,
}

/// Result of one recent-items loader
#[derive(Debug, Clone)]
pub enum SectionOutcome {
    Rows(Vec<Row>),
    Empty(&'static str),
    Failed(String),
}

/// One recent-items table of the dashboard
#[derive(Debug, Clone)]
pub struct SectionView {
    pub title: &'static str,
    pub columns: &'static [&'static str],
    pub widths: &'static [usize],
    pub outcome: SectionOutcome,
}

/// Everything one refresh cycle produced, decoupled from rendering
#[derive(Debug, Clone)]
pub struct DashboardView {
    pub generated_at: DateTime<Local>,
    pub cards: Vec<SummaryCard>,
    pub sections: Vec<SectionView>,
    pub session_expired: bool,
}

/// Card label and decorative trend value per collection
pub fn card_meta(collection: Collection) -> (&'static str, &'static str) {
    match collection {
        Collection::Hotels => ("Total Hotels", "100%"),
        Collection::Bookings => ("Total Bookings", "85%"),
        Collection::Rooms => ("Total Rooms", "70%"),
        Collection::Accounts => ("Total Users", "+12%"),
        Collection::Customers => ("Total Customers", "+8%"),
        Collection::Payments => ("Total Payments", "+15%"),
    }
}

/// Builds the summary card for one counter outcome
pub fn summary_card(collection: Collection, outcome: Result<u64, ApiError>) -> SummaryCard {
    let (label, trend) = card_meta(collection);
    match outcome {
        Ok(count) => SummaryCard {
            label,
            count: Some(count),
            trend,
            error: None,
        },
        Err(e) => SummaryCard {
            label,
            count: None,
            trend,
            error: Some(e.to_string()),
        },
    }
}

const HOTEL_COLUMNS: &[&str] = &[
    "Name", "City", "Country", "Landlord", "Rating", "Phone", "Status", "Admin",
];
const HOTEL_WIDTHS: &[usize] = &[16, 10, 10, 20, 5, 13, 8, 30];

const ROOM_COLUMNS: &[&str] = &["Hotel", "Room", "Floor", "Capacity", "Price", "Available", "Admin"];
const ROOM_WIDTHS: &[usize] = &[16, 8, 5, 8, 10, 9, 28];

const BOOKING_COLUMNS: &[&str] = &[
    "ID", "Customer Phone", "Room", "Check In", "Check Out", "Price", "Discounted", "Admin",
];
const BOOKING_WIDTHS: &[usize] = &[6, 14, 10, 12, 12, 10, 10, 34];

const CUSTOMER_COLUMNS: &[&str] = &[
    "Name", "Phone", "Email", "Gender", "Country", "Occupation", "Admin",
];
const CUSTOMER_WIDTHS: &[usize] = &[18, 14, 22, 8, 12, 12, 36];

const PAYMENT_COLUMNS: &[&str] = &["ID", "Booking", "Amount", "Method", "Date", "Admin"];
const PAYMENT_WIDTHS: &[usize] = &[6, 8, 10, 8, 12, 34];

fn section(
    title: &'static str,
    columns: &'static [&'static str],
    widths: &'static [usize],
    empty_message: &'static str,
    rows: Result<Vec<Row>, ApiError>,
) -> SectionView {
    let outcome = match rows {
        Ok(rows) if rows.is_empty() => SectionOutcome::Empty(empty_message),
        Ok(rows) => SectionOutcome::Rows(rows),
        Err(e) => SectionOutcome::Failed(e.to_string()),
    };
    SectionView {
        title,
        columns,
        widths,
        outcome,
    }
}

pub fn hotel_section(result: Result<Vec<Hotel>, ApiError>) -> SectionView {
    section(
        "Recent Hotels",
        HOTEL_COLUMNS,
        HOTEL_WIDTHS,
        "No hotels found",
        result.map(|items| items.iter().map(hotel_row).collect()),
    )
}

pub fn room_section(result: Result<Vec<Room>, ApiError>) -> SectionView {
    section(
        "Recent Rooms",
        ROOM_COLUMNS,
        ROOM_WIDTHS,
        "No rooms found",
        result.map(|items| items.iter().map(room_row).collect()),
    )
}

pub fn booking_section(result: Result<Vec<Booking>, ApiError>) -> SectionView {
    section(
        "Recent Bookings",
        BOOKING_COLUMNS,
        BOOKING_WIDTHS,
        "No bookings found",
        result.map(|items| items.iter().map(booking_row).collect()),
    )
}

pub fn customer_section(result: Result<Vec<Customer>, ApiError>) -> SectionView {
    section(
        "Recent Customers",
        CUSTOMER_COLUMNS,
        CUSTOMER_WIDTHS,
        "No customers found",
        result.map(|items| items.iter().map(customer_row).collect()),
    )
}

pub fn payment_section(result: Result<Vec<Payment>, ApiError>) -> SectionView {
    section(
        "Recent Payments",
        PAYMENT_COLUMNS,
        PAYMENT_WIDTHS,
        "No payments found",
        result.map(|items| items.iter().map(payment_row).collect()),
    )
}

pub fn hotel_row(hotel: &Hotel) -> Row {
    let landlord = hotel
        .landlord_email
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .or(hotel.landlord_name.as_deref());
    let status = if hotel.is_active.unwrap_or(false) {
        Cell::toned("Active", Tone::Success)
    } else {
        Cell::toned("Inactive", Tone::Danger)
    };

    vec![
        Cell::strong(text_or_na(hotel.name.as_deref())),
        Cell::plain(text_or_na(hotel.city.as_deref())),
        Cell::plain(text_or_na(hotel.country.as_deref())),
        Cell::plain(text_or_na(landlord)),
        Cell::toned(stars(hotel.star_rating), Tone::Warning),
        Cell::plain(text_or_na(hotel.phone_no.as_deref())),
        status,
        admin_edit_cell("hotel", "hotel", hotel.id),
    ]
}

pub fn room_row(room: &Room) -> Row {
    let availability = if room.is_available.unwrap_or(false) {
        Cell::toned("Yes", Tone::Success)
    } else {
        Cell::toned("No", Tone::Danger)
    };

    vec![
        Cell::plain(text_or_na(room.hotel_name.as_deref())),
        Cell::strong(value_text(room.room_no.as_ref())),
        Cell::plain(value_text(room.floor_no.as_ref())),
        Cell::plain(value_text(room.capacity.as_ref())),
        Cell::plain(format_currency(room.price)),
        availability,
        admin_edit_cell("room", "room", room.id),
    ]
}

pub fn booking_row(booking: &Booking) -> Row {
    let room = booking.room_no.as_ref().or(booking.room.as_ref());

    vec![
        Cell::strong(id_text(booking.id)),
        Cell::plain(text_or_na(booking.customer_phone_no.as_deref())),
        Cell::plain(format!("Room {}", value_text(room))),
        Cell::plain(format_date(booking.booking_start_time.as_deref())),
        Cell::plain(format_date(booking.booking_end_time.as_deref())),
        Cell::plain(format_currency(booking.price)),
        Cell::plain(format_currency(booking.discounted_price)),
        admin_edit_cell("booking", "booking", booking.id),
    ]
}

pub fn customer_row(customer: &Customer) -> Row {
    let gender_tone = match customer.gender.as_deref() {
        Some("male") => Tone::Primary,
        Some("female") => Tone::Danger,
        _ => Tone::Warning,
    };

    vec![
        Cell::strong(full_name(
            customer.first_name.as_deref(),
            customer.last_name.as_deref(),
        )),
        Cell::plain(text_or_na(customer.phone_no.as_deref())),
        Cell::plain(text_or_na(customer.email.as_deref())),
        Cell::toned(text_or_na(customer.gender.as_deref()), gender_tone),
        Cell::plain(text_or_na(customer.country.as_deref())),
        Cell::plain(text_or_na(customer.occupation.as_deref())),
        admin_edit_cell("customer", "customer", customer.id),
    ]
}

pub fn payment_row(payment: &Payment) -> Row {
    let booking = payment
        .booking
        .as_ref()
        .cloned()
        .or_else(|| payment.booking_id.map(serde_json::Value::from));
    let method_tone = match payment.payment_method.as_deref() {
        Some("cash") => Tone::Success,
        _ => Tone::Primary,
    };

    vec![
        Cell::strong(id_text(payment.id)),
        Cell::plain(reference_text(booking.as_ref())),
        Cell::plain(format_currency(payment.amount)),
        Cell::toned(text_or_na(payment.payment_method.as_deref()), method_tone),
        Cell::plain(format_date(payment.created_at.as_deref())),
        admin_edit_cell("payment", "payment", payment.id),
    ]
}

fn id_text(id: Option<i64>) -> String {
    match id {
        Some(id) => format!("#{}", id),
        None => "N/A".to_string(),
    }
}

/// `#`-prefixed reference in the [`id_text`] style, for fields served as
/// either strings or numbers
fn reference_text(value: Option<&serde_json::Value>) -> String {
    let text = value_text(value);
    if text == "N/A" {
        text
    } else {
        format!("#{}", text)
    }
}

/// Link to the admin change page for a record, or `N/A` without an id
fn admin_edit_cell(app: &str, model: &str, id: Option<i64>) -> Cell {
    match id {
        Some(id) => Cell::toned(
            format!("/admin/{}/{}/{}/change/", app, model, id),
            Tone::Muted,
        ),
        None => Cell::plain("N/A"),
    }
}
