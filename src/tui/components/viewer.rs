use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

/// Scrollable text panel for summaries, reports and raw segment dumps.
pub struct ContentViewer {
    pub content: String,
    pub scroll: usize,
    pub title: String,
}

impl ContentViewer {
    pub fn new(content: String, title: String) -> Self {
        Self {
            content,
            scroll: 0,
            title,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, area_height: usize) -> bool {
        match key.code {
            KeyCode::Up => {
                if self.scroll > 0 {
                    self.scroll -= 1;
                }
                true
            }
            KeyCode::Down => {
                let lines = self.content.lines().count();
                if self.scroll < lines.saturating_sub(area_height.saturating_sub(2)) {
                    self.scroll += 1;
                }
                true
            }
            KeyCode::PageUp => {
                self.scroll = self.scroll.saturating_sub(area_height.saturating_sub(2));
                true
            }
            KeyCode::PageDown => {
                let lines = self.content.lines().count();
                let page_size = area_height.saturating_sub(2);
                self.scroll = (self.scroll + page_size).min(lines.saturating_sub(page_size));
                true
            }
            KeyCode::Home => {
                self.scroll = 0;
                true
            }
            KeyCode::End => {
                let lines = self.content.lines().count();
                let page_size = area_height.saturating_sub(2);
                self.scroll = lines.saturating_sub(page_size);
                true
            }
            _ => false,
        }
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let lines: Vec<Line> = self
            .content
            .lines()
            .skip(self.scroll)
            .take(area.height.saturating_sub(2) as usize)
            .map(style_line)
            .collect();

        let total_lines = self.content.lines().count();
        let visible_lines = area.height.saturating_sub(2) as usize;
        let scroll_info = if total_lines > visible_lines {
            format!(
                " (Line {}-{} of {})",
                self.scroll + 1,
                (self.scroll + visible_lines).min(total_lines),
                total_lines
            )
        } else {
            String::new()
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!("{}{scroll_info}", self.title));

        let paragraph = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false });

        f.render_widget(paragraph, area);
    }
}

fn style_line(line: &str) -> Line<'_> {
    if line.starts_with('#') {
        // Report headings
        Line::from(Span::styled(line, Style::default().fg(Color::Yellow)))
    } else if line.contains("(positive)") {
        Line::from(Span::styled(line, Style::default().fg(Color::Green)))
    } else if line.contains("(negative)") {
        Line::from(Span::styled(line, Style::default().fg(Color::Red)))
    } else if line.contains("(neutral)") {
        Line::from(Span::styled(line, Style::default().fg(Color::DarkGray)))
    } else if line.starts_with('-') || line.starts_with('*') {
        Line::from(Span::styled(line, Style::default().fg(Color::Cyan)))
    } else {
        Line::from(Span::raw(line))
    }
}
