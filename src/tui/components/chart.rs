use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph, Wrap},
};

use crate::core::sentiment::Sentiment;
use crate::tui::components::list::truncate_label;

pub fn sentiment_color(sentiment: Sentiment) -> Color {
    match sentiment {
        Sentiment::Positive => Color::Green,
        Sentiment::Negative => Color::Red,
        Sentiment::Neutral => Color::DarkGray,
    }
}

/// Bar chart over the filtered sentiment counts. The caller decides
/// which sentiments to include (the dashboard shows positive and
/// negative only).
pub fn render_sentiment_chart(f: &mut Frame, area: Rect, distribution: &[(Sentiment, usize)]) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Sentiment Distribution");

    if distribution.is_empty() {
        let info = Paragraph::new("No positive or negative sentiment found.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(info, area);
        return;
    }

    let bars: Vec<Bar> = distribution
        .iter()
        .map(|(sentiment, count)| {
            let color = sentiment_color(*sentiment);
            Bar::default()
                .value(*count as u64)
                .label(Line::from(sentiment.as_str()))
                .style(Style::default().fg(color))
                .value_style(Style::default().fg(Color::Black).bg(color))
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .bar_width(10)
        .bar_gap(2);
    f.render_widget(chart, area);
}

/// Horizontal frequency bars, one keyword per row.
pub fn render_keyword_bars(
    f: &mut Frame,
    area: Rect,
    title: &str,
    keywords: &[(String, usize)],
    color: Color,
) {
    let block = Block::default().borders(Borders::ALL).title(title);

    if keywords.is_empty() {
        let info = Paragraph::new("No keywords found.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(info, area);
        return;
    }

    let max = keywords.iter().map(|(_, count)| *count).max().unwrap_or(1);
    let inner_width = area.width.saturating_sub(2) as usize;
    let label_width = 14.min(inner_width / 2).max(1);
    let bar_space = inner_width.saturating_sub(label_width + 6);

    let lines: Vec<Line> = keywords
        .iter()
        .map(|(word, count)| {
            let bar_len = (count * bar_space) / max.max(1);
            Line::from(vec![
                Span::raw(format!(
                    "{:<width$} ",
                    truncate_label(word, label_width),
                    width = label_width
                )),
                Span::styled("▇".repeat(bar_len.max(1)), Style::default().fg(color)),
                Span::styled(format!(" {count}"), Style::default().fg(Color::DarkGray)),
            ])
        })
        .collect();

    f.render_widget(Paragraph::new(lines).block(block), area);
}

/// Frequency-weighted styled words, wrapped into the panel; the terminal
/// stand-in for the original word-cloud images.
pub fn render_word_cloud(
    f: &mut Frame,
    area: Rect,
    title: &str,
    words: &[(String, usize)],
    color: Color,
) {
    let block = Block::default().borders(Borders::ALL).title(title);

    if words.is_empty() {
        let info = Paragraph::new("No keywords found.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(info, area);
        return;
    }

    let max = words.iter().map(|(_, count)| *count).max().unwrap_or(1).max(1);
    let mut spans: Vec<Span> = Vec::new();
    for (word, count) in words {
        let style = if count * 3 >= max * 2 {
            Style::default().fg(color).add_modifier(Modifier::BOLD)
        } else if count * 3 >= max {
            Style::default().fg(color)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(word.clone(), style));
        spans.push(Span::raw("  "));
    }

    let paragraph = Paragraph::new(Line::from(spans))
        .wrap(Wrap { trim: true })
        .block(block);
    f.render_widget(paragraph, area);
}
