use colored::*;

use crate::view::{Cell, DashboardView, SectionOutcome, SectionView, SummaryCard, Tone, ADD_HOTEL_ROUTE};

/// Rendering switches shared by every draw call
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Suppress color and emphasis codes entirely
    pub plain: bool,
}

/// Renders a full dashboard view into one string so the caller can emit
/// it atomically
pub fn render_dashboard(view: &DashboardView, options: &RenderOptions) -> String {
    let mut out = String::new();

    out.push_str(&toned("FRONTDESK ADMIN DASHBOARD", Tone::Strong, options));
    out.push('\n');
    out.push_str(&format!(
        "Updated {}\n\n",
        view.generated_at.format("%b %-d, %Y %H:%M:%S")
    ));

    for card in &view.cards {
        out.push_str(&render_card(card, options));
    }
    out.push('\n');

    for section in &view.sections {
        out.push_str(&render_section(section, options));
    }

    if view.session_expired {
        out.push_str(&toned(
            "Session expired: the API rejected the stored token.\n",
            Tone::Danger,
            options,
        ));
    }

    out.push_str(&toned(
        &format!("Add hotels at {}\n", ADD_HOTEL_ROUTE),
        Tone::Muted,
        options,
    ));

    out
}

fn render_card(card: &SummaryCard, options: &RenderOptions) -> String {
    let count = match card.count {
        Some(count) => count.to_string(),
        None => "N/A".to_string(),
    };

    let mut line = format!(
        "{:<16} {}   {}",
        card.label,
        toned(&format!("{:>8}", count), Tone::Strong, options),
        toned(&format!("({})", card.trend), Tone::Muted, options),
    );

    if let Some(error) = &card.error {
        line.push_str("   ");
        line.push_str(&toned(
            &format!("unavailable: {}", truncate(error, 48)),
            Tone::Warning,
            options,
        ));
    }

    line.push('\n');
    line
}

fn render_section(section: &SectionView, options: &RenderOptions) -> String {
    let mut out = String::new();
    out.push_str(&toned(section.title, Tone::Strong, options));
    out.push('\n');

    match &section.outcome {
        SectionOutcome::Rows(rows) => {
            out.push_str(&render_table(section.columns, section.widths, rows, options));
        }
        SectionOutcome::Empty(message) => {
            out.push_str(&toned(message, Tone::Muted, options));
            out.push('\n');
        }
        SectionOutcome::Failed(error) => {
            out.push_str(&toned(
                &format!("unavailable: {}", truncate(error, 80)),
                Tone::Warning,
                options,
            ));
            out.push('\n');
        }
    }

    out.push('\n');
    out
}

fn render_table(
    columns: &[&str],
    widths: &[usize],
    rows: &[Vec<Cell>],
    options: &RenderOptions,
) -> String {
    let mut out = String::new();

    out.push_str(&border_row(widths, '┌', '┬', '┐'));
    out.push_str(&header_row(columns, widths));
    out.push_str(&border_row(widths, '├', '┼', '┤'));
    for row in rows {
        out.push_str(&data_row(row, widths, options));
    }
    out.push_str(&border_row(widths, '└', '┴', '┘'));

    out
}

fn border_row(widths: &[usize], left: char, mid: char, right: char) -> String {
    let mut line = String::new();
    line.push(left);
    for (i, width) in widths.iter().enumerate() {
        if i > 0 {
            line.push(mid);
        }
        line.push_str(&"─".repeat(width + 2));
    }
    line.push(right);
    line.push('\n');
    line
}

fn header_row(columns: &[&str], widths: &[usize]) -> String {
    let mut line = String::new();
    line.push('│');
    for (column, width) in columns.iter().zip(widths.iter().copied()) {
        line.push_str(&format!(" {:<width$} │", truncate(column, width), width = width));
    }
    line.push('\n');
    line
}

fn data_row(row: &[Cell], widths: &[usize], options: &RenderOptions) -> String {
    let mut line = String::new();
    line.push('│');
    for (cell, width) in row.iter().zip(widths.iter().copied()) {
        // Pad before coloring so the escape codes stay out of the width math
        let padded = format!("{:<width$}", truncate(&cell.text, width), width = width);
        line.push_str(&format!(" {} │", toned(&padded, cell.tone, options)));
    }
    line.push('\n');
    line
}

fn toned(text: &str, tone: Tone, options: &RenderOptions) -> String {
    if options.plain {
        return text.to_string();
    }

    match tone {
        Tone::Plain => text.to_string(),
        Tone::Strong => text.bold().to_string(),
        Tone::Muted => text.dimmed().to_string(),
        Tone::Success => text.green().to_string(),
        Tone::Danger => text.red().to_string(),
        Tone::Primary => text.blue().to_string(),
        Tone::Warning => text.yellow().to_string(),
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::{booking_section, hotel_section, summary_card};
    use chrono::Local;
    use frontdesk_core::errors::ApiError;
    use frontdesk_core::types::{Booking, Collection, Hotel};

    fn plain() -> RenderOptions {
        RenderOptions { plain: true }
    }

    fn sample_hotel(id: i64, name: &str) -> Hotel {
        Hotel {
            id: Some(id),
            name: Some(name.to_string()),
            is_active: Some(true),
            ..Hotel::default()
        }
    }

    #[test]
    fn truncate_is_char_safe() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly-ten", 11), "exactly-ten");
        assert_eq!(truncate("a very long hotel name", 10), "a very ...");
        assert_eq!(truncate("★★★★★★★★", 5), "★★...");
    }

    #[test]
    fn renders_one_row_per_item() {
        let hotels = vec![sample_hotel(1, "Alpha"), sample_hotel(2, "Beta")];
        let output = render_section(&hotel_section(Ok(hotels)), &plain());

        assert_eq!(output.matches("Alpha").count(), 1);
        assert_eq!(output.matches("Beta").count(), 1);
        // Header, separator, two data rows, two borders
        assert_eq!(output.matches('┌').count(), 1);
        assert_eq!(output.lines().filter(|l| l.starts_with('│')).count(), 3);
    }

    #[test]
    fn empty_sections_render_the_placeholder_text() {
        let output = render_section(&hotel_section(Ok(vec![])), &plain());
        assert!(output.contains("No hotels found"));
        assert!(!output.contains('┌'));
    }

    #[test]
    fn failed_sections_render_a_degraded_marker() {
        let section = booking_section(Err(ApiError::RequestError("refused".to_string())));
        let output = render_section(&section, &plain());
        assert!(output.contains("unavailable"));
        assert!(output.contains("refused"));
    }

    #[test]
    fn cards_show_counts_trends_and_failures() {
        let ok = render_card(&summary_card(Collection::Hotels, Ok(3)), &plain());
        assert!(ok.contains("Total Hotels"));
        assert!(ok.contains('3'));
        assert!(ok.contains("(100%)"));

        let failed = render_card(
            &summary_card(
                Collection::Rooms,
                Err(ApiError::RequestError("timed out".to_string())),
            ),
            &plain(),
        );
        assert!(failed.contains("N/A"));
        assert!(failed.contains("unavailable"));
    }

    #[test]
    fn full_dashboard_lists_every_card_and_section() {
        let view = DashboardView {
            generated_at: Local::now(),
            cards: Collection::ALL
                .iter()
                .map(|c| summary_card(*c, Ok(1)))
                .collect(),
            sections: vec![
                hotel_section(Ok(vec![sample_hotel(1, "Alpha")])),
                booking_section(Ok(vec![Booking::default()])),
            ],
            session_expired: false,
        };

        let output = render_dashboard(&view, &plain());
        assert!(output.contains("FRONTDESK ADMIN DASHBOARD"));
        assert!(output.contains("Total Hotels"));
        assert!(output.contains("Total Payments"));
        assert!(output.contains("Recent Hotels"));
        assert!(output.contains("Recent Bookings"));
        assert!(output.contains(ADD_HOTEL_ROUTE));
        assert!(!output.contains("Session expired"));
    }

    #[test]
    fn expired_sessions_render_a_banner() {
        let view = DashboardView {
            generated_at: Local::now(),
            cards: vec![],
            sections: vec![],
            session_expired: true,
        };
        let output = render_dashboard(&view, &plain());
        assert!(output.contains("Session expired"));
    }

    #[test]
    fn plain_mode_emits_no_escape_codes() {
        let view = DashboardView {
            generated_at: Local::now(),
            cards: vec![summary_card(Collection::Hotels, Ok(2))],
            sections: vec![hotel_section(Ok(vec![sample_hotel(1, "Alpha")]))],
            session_expired: false,
        };
        let output = render_dashboard(&view, &plain());
        assert!(!output.contains('\u{1b}'));
    }
}
