use crossterm::event::{KeyCode, KeyEvent, MouseEvent, MouseEventKind};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
};
use unicode_width::UnicodeWidthStr;

/// One selectable row of the dashboard product filter. `name == None`
/// is the "All Products" row.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductEntry {
    pub name: Option<String>,
    pub segment_count: usize,
}

impl ProductEntry {
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("All Products")
    }
}

pub struct ProductList {
    pub items: Vec<ProductEntry>,
    pub state: ListState,
    viewport_size: usize,
}

impl ProductList {
    pub fn new(items: Vec<ProductEntry>) -> Self {
        let mut state = ListState::default();
        if !items.is_empty() {
            state.select(Some(0));
        }

        Self {
            items,
            state,
            viewport_size: 0,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Up => {
                self.previous();
                true
            }
            KeyCode::Down => {
                self.next();
                true
            }
            KeyCode::PageDown => {
                self.page_down();
                true
            }
            KeyCode::PageUp => {
                self.page_up();
                true
            }
            KeyCode::Home => {
                self.go_home();
                true
            }
            KeyCode::End => {
                self.go_end();
                true
            }
            _ => false,
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) -> bool {
        match mouse.kind {
            MouseEventKind::ScrollUp => {
                self.previous();
                true
            }
            MouseEventKind::ScrollDown => {
                self.next();
                true
            }
            _ => false,
        }
    }

    pub fn next(&mut self) {
        if self.items.is_empty() {
            return;
        }

        let i = match self.state.selected() {
            Some(i) => (i + 1) % self.items.len(),
            None => 0,
        };
        self.state.select(Some(i));
        self.adjust_offset();
    }

    pub fn previous(&mut self) {
        if self.items.is_empty() {
            return;
        }

        let i = match self.state.selected() {
            Some(i) => {
                if i == 0 {
                    self.items.len() - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
        self.adjust_offset();
    }

    fn page_down(&mut self) {
        if self.items.is_empty() {
            return;
        }

        let step = self.viewport_size.max(1);
        let current = self.state.selected().unwrap_or(0);
        let new_index = (current + step).min(self.items.len() - 1);
        self.state.select(Some(new_index));
        self.adjust_offset();
    }

    fn page_up(&mut self) {
        if self.items.is_empty() {
            return;
        }

        let step = self.viewport_size.max(1);
        let current = self.state.selected().unwrap_or(0);
        let new_index = current.saturating_sub(step);
        self.state.select(Some(new_index));
        self.adjust_offset();
    }

    fn go_home(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.state.select(Some(0));
        self.adjust_offset();
    }

    fn go_end(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.state.select(Some(self.items.len() - 1));
        self.adjust_offset();
    }

    pub fn selected(&self) -> Option<&ProductEntry> {
        self.state.selected().and_then(|i| self.items.get(i))
    }

    /// The product filter for the current selection; `None` means all.
    pub fn selected_filter(&self) -> Option<String> {
        self.selected().and_then(|entry| entry.name.clone())
    }

    pub fn select_product(&mut self, name: &str) {
        if let Some(index) = self
            .items
            .iter()
            .position(|entry| entry.name.as_deref() == Some(name))
        {
            self.state.select(Some(index));
            self.adjust_offset();
        }
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect, title: &str) {
        self.viewport_size = area.height.saturating_sub(2) as usize;
        if self.viewport_size == 0 {
            self.viewport_size = 1;
        }
        self.adjust_offset();

        let label_width = area.width.saturating_sub(10) as usize;
        let items: Vec<ListItem> = self
            .items
            .iter()
            .map(|entry| {
                let line = Line::from(vec![
                    Span::styled(
                        truncate_label(entry.label(), label_width),
                        Style::default().fg(Color::White),
                    ),
                    Span::styled(
                        format!(" ({})", entry.segment_count),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]);
                ListItem::new(line)
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            );

        f.render_stateful_widget(list, area, &mut self.state);
    }

    pub fn update_items(&mut self, new_items: Vec<ProductEntry>) {
        let current_selected = self.state.selected();
        self.items = new_items;

        if self.items.is_empty() {
            self.state.select(None);
        } else if let Some(selected) = current_selected {
            if selected >= self.items.len() {
                self.state.select(Some(self.items.len() - 1));
            }
        } else {
            self.state.select(Some(0));
        }

        self.adjust_offset();
    }

    fn adjust_offset(&mut self) {
        if self.items.is_empty() {
            *self.state.offset_mut() = 0;
            return;
        }

        let viewport = self.viewport_size.max(1);
        let max_index = self.items.len() - 1;
        let selected = self
            .state
            .selected()
            .map(|idx| idx.min(max_index))
            .unwrap_or(0);
        self.state.select(Some(selected));

        let max_offset = self.items.len().saturating_sub(viewport);
        let offset = self.state.offset().min(max_offset);
        *self.state.offset_mut() = offset;

        if selected < offset {
            *self.state.offset_mut() = selected;
        } else if selected >= offset + viewport {
            *self.state.offset_mut() = selected + 1 - viewport;
        }
    }
}

pub fn truncate_label(label: &str, max_width: usize) -> String {
    if label.width() <= max_width {
        return label.to_string();
    }

    let mut truncated = String::new();
    for c in label.chars() {
        if truncated.width() + 1 >= max_width {
            break;
        }
        truncated.push(c);
    }
    truncated.push('…');
    truncated
}

#[cfg(test)]
mod tests {
    use super::{ProductEntry, ProductList, truncate_label};

    fn entries() -> Vec<ProductEntry> {
        vec![
            ProductEntry {
                name: None,
                segment_count: 5,
            },
            ProductEntry {
                name: Some("Widget".to_string()),
                segment_count: 3,
            },
            ProductEntry {
                name: Some("Gadget".to_string()),
                segment_count: 2,
            },
        ]
    }

    #[test]
    fn all_products_row_has_no_filter() {
        let list = ProductList::new(entries());
        assert_eq!(list.selected_filter(), None);
        assert_eq!(list.selected().unwrap().label(), "All Products");
    }

    #[test]
    fn navigation_wraps() {
        let mut list = ProductList::new(entries());
        list.previous();
        assert_eq!(list.selected_filter(), Some("Gadget".to_string()));
        list.next();
        assert_eq!(list.selected_filter(), None);
    }

    #[test]
    fn select_product_by_name() {
        let mut list = ProductList::new(entries());
        list.select_product("Widget");
        assert_eq!(list.selected_filter(), Some("Widget".to_string()));
    }

    #[test]
    fn truncates_wide_labels() {
        assert_eq!(truncate_label("short", 10), "short");
        let truncated = truncate_label("a very long product name", 8);
        assert!(truncated.ends_with('…'));
    }
}
