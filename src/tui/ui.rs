use crate::core::Sentiment;
use crate::tui::app::{App, AppState};
use crate::tui::components::chart::{
    render_keyword_bars, render_sentiment_chart, render_word_cloud,
};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

pub fn draw(f: &mut Frame, app: &mut App) {
    match &app.state {
        AppState::Home => draw_home(f, app),
        AppState::NewAnalysis => draw_new_analysis(f, app),
        AppState::Processing { video_id } => {
            let video_id = video_id.clone();
            draw_processing(f, app, &video_id);
        }
        AppState::Dashboard => draw_dashboard(f, app),
        AppState::Segments | AppState::Viewer => draw_viewer(f, app),
    }
}

fn draw_home(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(1),    // Menu
            Constraint::Length(3), // Help
        ])
        .split(f.area());

    let title = Paragraph::new("revu - YouTube Product Review Analyzer")
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let options = [
        "● New Analysis",
        "○ Dashboard",
        "○ Browse Segments",
        "○ Quit",
    ];

    let menu_items: Vec<ListItem> = options
        .iter()
        .enumerate()
        .map(|(i, option)| {
            let style = if i == app.selected_option {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };

            let text = if i == app.selected_option {
                option.replace("○", "●")
            } else {
                option.replace("●", "○")
            };

            ListItem::new(Line::from(Span::styled(text, style)))
        })
        .collect();

    let menu = List::new(menu_items)
        .block(Block::default().borders(Borders::ALL).title("Mode"))
        .style(Style::default().fg(Color::White));
    f.render_widget(menu, chunks[1]);

    let help = Paragraph::new("[↑↓] Navigate  [Enter] Select  [q] Exit")
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);
}

fn draw_new_analysis(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Length(3), // URL input
            Constraint::Length(3), // Product input
            Constraint::Length(3), // Languages input
            Constraint::Length(2), // Status
            Constraint::Min(0),
            Constraint::Length(3), // Help
        ])
        .split(f.area());

    let title = Paragraph::new("New Analysis")
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    app.url_input.render(f, chunks[1]);
    app.product_input.render(f, chunks[2]);
    app.languages_input.render(f, chunks[3]);

    if let Some(message) = &app.status_message {
        let status = Paragraph::new(message.as_str())
            .style(Style::default().fg(Color::Red))
            .alignment(Alignment::Center);
        f.render_widget(status, chunks[4]);
    }

    let help = Paragraph::new("[Enter] Analyze  [Tab] Next Field  [Esc] Back")
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[6]);
}

fn draw_processing(f: &mut Frame, app: &App, video_id: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(1),    // Progress area
            Constraint::Length(3), // Help
        ])
        .split(f.area());

    let title = Paragraph::new("Analyzing...")
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    app.progress_bar.render(f, chunks[1], video_id);

    let help = Paragraph::new("[Esc] Cancel")
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);
}

fn draw_dashboard(f: &mut Frame, app: &mut App) {
    let outer = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(26), Constraint::Min(1)])
        .split(f.area());

    app.product_list.render(f, outer[0], "Products");

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Header
            Constraint::Length(10), // Sentiment chart
            Constraint::Min(6),     // Keyword charts
            Constraint::Length(6),  // Word clouds
            Constraint::Length(3),  // Help
        ])
        .split(outer[1]);

    let filter_label = app.current_filter_label();
    let Some(dashboard) = &app.dashboard else {
        let info = Paragraph::new("No product reviews analyzed yet.")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(info, right[0]);
        return;
    };

    let header_text = format!(
        "Reviews for: {filter_label}   Segments: {}   Overall: {}",
        dashboard.summary.total_segments, dashboard.summary.overall_sentiment
    );
    let header = Paragraph::new(header_text)
        .style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, right[0]);

    // The chart shows positive and negative only; neutral chatter would
    // dwarf both on most transcripts.
    let polarized: Vec<(Sentiment, usize)> = dashboard
        .summary
        .sentiment_distribution
        .iter()
        .filter(|(sentiment, _)| *sentiment != Sentiment::Neutral)
        .cloned()
        .collect();
    render_sentiment_chart(f, right[1], &polarized);

    let keyword_row = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(right[2]);
    render_keyword_bars(
        f,
        keyword_row[0],
        "Top Positive Keywords",
        &dashboard.positive_keywords,
        Color::Green,
    );
    render_keyword_bars(
        f,
        keyword_row[1],
        "Top Negative Keywords",
        &dashboard.negative_keywords,
        Color::Red,
    );

    let cloud_row = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(right[3]);
    render_word_cloud(
        f,
        cloud_row[0],
        "Positive Word Cloud",
        &dashboard.positive_keywords,
        Color::Green,
    );
    render_word_cloud(
        f,
        cloud_row[1],
        "Negative Word Cloud",
        &dashboard.negative_keywords,
        Color::Red,
    );

    let help_text = match &app.status_message {
        Some(message) => message.clone(),
        None => "[↑↓] Product  [Enter] Segments  [s] Summary  [r] Refresh  [Esc] Back".to_string(),
    };
    let help_style = if app.status_message.is_some() {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::Gray)
    };
    let help = Paragraph::new(help_text)
        .style(help_style)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, right[4]);
}

fn draw_viewer(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(3)])
        .split(f.area());

    if let Some(viewer) = &mut app.content_viewer {
        app.viewer_height = chunks[0].height;
        viewer.render(f, chunks[0]);
    }

    let help = Paragraph::new("[↑↓] Scroll  [PgUp/PgDn] Page  [Home/End] Jump  [Esc] Back")
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[1]);
}
