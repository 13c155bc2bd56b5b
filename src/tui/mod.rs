//! Terminal UI for formbuilder using ratatui
//!
//! Provides the interactive form builder: add fields, edit them with live
//! validation, submit to show the preview, clear everything.

use anyhow::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io;
use std::panic;

use crate::controller::{Action, FormController};
use crate::models::FieldType;
use crate::persistence::Persistence;
use crate::preview::EMPTY_PLACEHOLDER;

/// Sends panic reports to the log instead of stderr while alive
///
/// `validate_guarded` recovers from validator panics, but the default hook
/// would still print over the alternate screen. Dropping restores the
/// default hook.
pub struct QuietPanics {
    _private: (),
}

impl QuietPanics {
    pub fn install() -> Self {
        panic::set_hook(Box::new(|info| {
            tracing::error!("panic: {}", info);
        }));
        Self { _private: () }
    }
}

impl Drop for QuietPanics {
    fn drop(&mut self) {
        let _ = panic::take_hook();
    }
}

/// Main TUI application state
pub struct TuiApp<P: Persistence> {
    controller: FormController<P>,
    list_state: ListState,
    should_quit: bool,
    status_message: Option<String>,
}

impl<P: Persistence> TuiApp<P> {
    /// Create a new TUI application around a loaded controller
    pub fn new(controller: FormController<P>) -> Self {
        let mut list_state = ListState::default();
        if !controller.fields().is_empty() {
            list_state.select(Some(0));
        }

        Self {
            controller,
            list_state,
            should_quit: false,
            status_message: None,
        }
    }

    /// Run the TUI application
    pub fn run(&mut self) -> Result<()> {
        let _quiet = QuietPanics::install();

        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        // Run event loop
        let res = self.run_app(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        res
    }

    /// Main event loop
    fn run_app<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        loop {
            terminal.draw(|f| self.ui(f))?;

            if event::poll(std::time::Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key);
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Translate one key press into controller actions
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if ctrl => self.should_quit = true,
            KeyCode::Char('t') if ctrl => self.add_field(FieldType::Text),
            KeyCode::Char('e') if ctrl => self.add_field(FieldType::Email),
            KeyCode::Char('n') if ctrl => self.add_field(FieldType::Number),
            KeyCode::Char('d') if ctrl => self.remove_selected(),
            KeyCode::Char('s') if ctrl => {
                self.controller.dispatch(Action::Submit);
                self.status_message = Some("Submitted".to_string());
            }
            KeyCode::Char('l') if ctrl => {
                self.controller.dispatch(Action::Clear);
                self.list_state.select(None);
                self.status_message = Some("Form cleared".to_string());
            }
            KeyCode::Down | KeyCode::Tab => self.next_field(),
            KeyCode::Up | KeyCode::BackTab => self.previous_field(),
            KeyCode::Backspace => {
                if let Some(id) = self.selected_id() {
                    self.controller.backspace(&id);
                }
            }
            KeyCode::Char(c) if !ctrl && !key.modifiers.contains(KeyModifiers::ALT) => {
                if let Some(id) = self.selected_id() {
                    self.controller.type_char(&id, c);
                }
            }
            _ => {}
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn controller(&self) -> &FormController<P> {
        &self.controller
    }

    pub fn selected(&self) -> Option<usize> {
        self.list_state.selected()
    }

    fn selected_id(&self) -> Option<String> {
        self.list_state
            .selected()
            .and_then(|i| self.controller.fields().get(i))
            .map(|f| f.id().to_string())
    }

    fn add_field(&mut self, field_type: FieldType) {
        self.controller.dispatch(Action::AddField(field_type));
        self.list_state.select(Some(self.controller.fields().len() - 1));
        self.status_message = Some(format!("Added {} field", field_type));
    }

    fn remove_selected(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };
        self.controller.dispatch(Action::RemoveField(id));

        let len = self.controller.fields().len();
        let selected = match self.list_state.selected() {
            _ if len == 0 => None,
            Some(i) if i >= len => Some(len - 1),
            other => other,
        };
        self.list_state.select(selected);
        self.status_message = Some("Field removed".to_string());
    }

    /// Navigate to next field
    fn next_field(&mut self) {
        let len = self.controller.fields().len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.list_state.select(Some(i));
    }

    /// Navigate to previous field
    fn previous_field(&mut self) {
        let len = self.controller.fields().len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.list_state.select(Some(i));
    }

    /// Draw the UI
    pub fn ui(&mut self, f: &mut Frame) {
        let preview_height = if self.controller.preview_visible() {
            self.controller.fields().len().max(1) as u16 + 2
        } else {
            0
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),              // Header
                Constraint::Length(3),              // Add-field bar
                Constraint::Min(3),                 // Fields
                Constraint::Length(preview_height), // Preview
                Constraint::Length(3),              // Footer
            ])
            .split(f.area());

        self.render_header(f, chunks[0]);
        self.render_add_bar(f, chunks[1]);
        self.render_fields(f, chunks[2]);
        if self.controller.preview_visible() {
            self.render_preview(f, chunks[3]);
        }
        self.render_footer(f, chunks[4]);
    }

    fn render_header(&self, f: &mut Frame, area: Rect) {
        let title = Paragraph::new("Dynamic Form Builder")
            .block(Block::default().borders(Borders::ALL))
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
        f.render_widget(title, area);
    }

    fn render_add_bar(&self, f: &mut Frame, area: Rect) {
        let keys = ['T', 'E', 'N'];
        let mut spans = Vec::new();
        for (field_type, key) in FieldType::ALL.iter().zip(keys) {
            spans.push(Span::styled(
                format!(" Add {} ", field_type.label()),
                Style::default().fg(Color::White).bg(Color::Blue),
            ));
            spans.push(Span::styled(
                format!(" ^{}  ", key),
                Style::default().fg(Color::DarkGray),
            ));
        }

        let bar = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
        f.render_widget(bar, area);
    }

    fn render_fields(&mut self, f: &mut Frame, area: Rect) {
        if self.controller.fields().is_empty() {
            let empty = Paragraph::new("No fields yet. Add one with ^T, ^E or ^N.")
                .block(Block::default().borders(Borders::ALL).title("Fields"))
                .style(Style::default().fg(Color::DarkGray));
            f.render_widget(empty, area);
            return;
        }

        let selected = self.list_state.selected();
        let items: Vec<ListItem> = self
            .controller
            .fields()
            .iter()
            .enumerate()
            .map(|(i, field)| {
                let input = if field.value().is_empty() && selected != Some(i) {
                    Span::styled(
                        format!("Enter {}", field.field_type()),
                        Style::default().fg(Color::DarkGray),
                    )
                } else {
                    Span::raw(field.value().to_string())
                };
                let cursor = if selected == Some(i) { "▏" } else { "" };

                let mut lines = vec![Line::from(vec![
                    Span::styled(
                        format!("{:<8}", field.field_type().to_string()),
                        Style::default().fg(Color::Yellow),
                    ),
                    input,
                    Span::raw(cursor),
                ])];
                if let Some(error) = field.error() {
                    lines.push(Line::from(Span::styled(
                        format!("        {}", error),
                        Style::default().fg(Color::Red),
                    )));
                }
                ListItem::new(lines)
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!("Fields ({})", self.controller.fields().len())),
            )
            .highlight_style(Style::default().add_modifier(Modifier::BOLD))
            .highlight_symbol(">> ");

        f.render_stateful_widget(list, area, &mut self.list_state);
    }

    fn render_preview(&self, f: &mut Frame, area: Rect) {
        let entries = self.controller.preview().unwrap_or_default();
        let lines: Vec<Line> = if entries.is_empty() {
            vec![Line::from(Span::styled(
                "No fields",
                Style::default().fg(Color::DarkGray),
            ))]
        } else {
            entries
                .iter()
                .map(|entry| {
                    let value = if entry.is_empty() {
                        Span::styled(
                            EMPTY_PLACEHOLDER,
                            Style::default().add_modifier(Modifier::ITALIC),
                        )
                    } else {
                        Span::raw(entry.value.clone())
                    };
                    Line::from(vec![
                        Span::styled(
                            format!("{}: ", entry.field_type),
                            Style::default().add_modifier(Modifier::BOLD),
                        ),
                        value,
                    ])
                })
                .collect()
        };

        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Form Preview")
                    .border_style(Style::default().fg(Color::Green)),
            )
            .wrap(Wrap { trim: false });
        f.render_widget(paragraph, area);
    }

    /// Render footer with keybindings
    fn render_footer(&self, f: &mut Frame, area: Rect) {
        let mut footer_text =
            "  ↑/↓: Select  type: Edit  ^D: Remove  ^S: Submit  ^L: Clear  Esc: Quit".to_string();
        if let Some(msg) = &self.status_message {
            footer_text.push_str(&format!("  │  {}", msg));
        }

        let footer = Paragraph::new(footer_text)
            .style(Style::default().fg(Color::White).bg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL));

        f.render_widget(footer, area);
    }
}
