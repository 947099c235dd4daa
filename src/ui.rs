use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{debug, info};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};
use std::{io, time::Duration};
use textwrap::wrap;
use tui_input::{backend::crossterm::EventHandler, Input};

use murmur::models::{initials, CallDirection, CallKind, DeliveryStatus, Message};
use murmur::shell::notification_setup::{INTEGRATION_FEATURES, NEXT_STEPS};
use murmur::shell::{PermissionState, Shell, SidebarTab, Toast};
use murmur::sim::{CallSession, CallStatus, StatusPlayback};

// Export types needed by main module
pub use ratatui::backend::CrosstermBackend;
pub use ratatui::Terminal;

pub struct ChatUI {
    pub shell: Shell,
    input: Input,
    search: Input,
    focus: Focus,
    help_dialog: bool,
    poll_interval: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Sidebar,
    Conversation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    Continue,
    Quit,
}

impl ChatUI {
    pub fn new(shell: Shell, poll_interval: Duration) -> Self {
        let focus = if shell.selected_chat().is_some() {
            Focus::Conversation
        } else {
            Focus::Sidebar
        };
        ChatUI {
            shell,
            input: Input::default(),
            search: Input::default(),
            focus,
            help_dialog: false,
            poll_interval,
        }
    }

    /// Waits up to one poll interval for a key press and applies it.
    pub fn handle_input(&mut self) -> Result<UiAction> {
        if event::poll(self.poll_interval)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(self.handle_key(key));
                }
            }
        }
        Ok(UiAction::Continue)
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> UiAction {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        if ctrl && key.code == KeyCode::Char('c') {
            return UiAction::Quit;
        }

        // Any key closes the help dialog
        if self.help_dialog {
            self.help_dialog = false;
            return UiAction::Continue;
        }

        // The call overlay sits on top of everything else
        if let Some(call) = self.shell.active_call_mut() {
            match key.code {
                KeyCode::Char('m') => {
                    let muted = call.toggle_mute();
                    debug!("Microphone {}", if muted { "muted" } else { "unmuted" });
                }
                KeyCode::Char('v') => {
                    call.toggle_video();
                }
                KeyCode::Char('e') | KeyCode::Enter | KeyCode::Esc => {
                    info!("Hanging up");
                    self.shell.end_call();
                }
                _ => {}
            }
            return UiAction::Continue;
        }

        if self.shell.status_feed().viewer().is_some() {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
                self.shell.close_status();
            }
            return UiAction::Continue;
        }

        if self.shell.is_notification_panel_open() {
            match key.code {
                KeyCode::Esc => self.shell.set_notification_panel_open(false),
                KeyCode::Enter => {
                    if self.shell.notifications().is_enabled() {
                        self.shell.test_notification();
                    } else {
                        self.shell.request_notifications();
                    }
                }
                _ => {}
            }
            return UiAction::Continue;
        }

        if ctrl {
            match key.code {
                KeyCode::Char('h') => self.help_dialog = true,
                KeyCode::Char('s') => self.shell.set_notification_panel_open(true),
                KeyCode::Char('p') => {
                    self.shell.call_selected_chat(CallKind::Audio);
                }
                KeyCode::Char('v') => {
                    self.shell.call_selected_chat(CallKind::Video);
                }
                _ => {}
            }
            return UiAction::Continue;
        }

        match key.code {
            KeyCode::Esc => return UiAction::Quit,
            KeyCode::Tab => {
                self.focus = match self.focus {
                    Focus::Sidebar => Focus::Conversation,
                    Focus::Conversation => Focus::Sidebar,
                };
                return UiAction::Continue;
            }
            _ => {}
        }

        match self.focus {
            Focus::Sidebar => self.handle_sidebar_key(key),
            Focus::Conversation => self.handle_conversation_key(key),
        }
        UiAction::Continue
    }

    fn handle_sidebar_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Left => self.shell.sidebar.prev_tab(),
            KeyCode::Right => self.shell.sidebar.next_tab(),
            KeyCode::Up => self.shell.move_cursor(-1),
            KeyCode::Down => self.shell.move_cursor(1),
            KeyCode::Enter => {
                let on_chats = self.shell.sidebar.active_tab() == SidebarTab::Chats;
                if self.shell.activate_highlighted() && on_chats {
                    self.input.reset();
                    self.focus = Focus::Conversation;
                }
            }
            _ => match self.shell.sidebar.active_tab() {
                SidebarTab::Chats => {
                    self.search.handle_event(&Event::Key(key));
                    self.shell.sidebar.set_search(self.search.value());
                }
                SidebarTab::Calls => match key.code {
                    KeyCode::Char('a') => {
                        self.shell.call_highlighted(CallKind::Audio);
                    }
                    KeyCode::Char('v') => {
                        self.shell.call_highlighted(CallKind::Video);
                    }
                    _ => {}
                },
                SidebarTab::Status => {
                    if key.code == KeyCode::Char('+') {
                        self.shell.add_status();
                    }
                }
            },
        }
    }

    fn handle_conversation_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Enter {
            if self.shell.send_message(self.input.value()) {
                self.input.reset();
            }
            return;
        }
        self.input.handle_event(&Event::Key(key));
    }

    pub fn draw<B: Backend>(&self, frame: &mut Frame<B>) {
        let size = frame.size();

        if let Some(call) = self.shell.active_call() {
            draw_call_overlay(frame, call, size);
        } else if let Some(viewer) = self.shell.status_feed().viewer() {
            draw_status_viewer(frame, viewer, size);
        } else {
            self.draw_main(frame, size);
        }

        if let Some(toast) = self.shell.toast() {
            draw_toast(frame, toast, size);
        }

        if self.help_dialog {
            draw_help_dialog(frame, size);
        }
    }

    fn draw_main<B: Backend>(&self, frame: &mut Frame<B>, size: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(5),    // Panels
                Constraint::Length(1), // Help line
            ])
            .split(size);

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(32), // Sidebar
                Constraint::Percentage(68), // Conversation
            ])
            .split(rows[0]);

        if self.shell.is_notification_panel_open() {
            self.draw_notification_panel(frame, chunks[0]);
        } else {
            self.draw_sidebar(frame, chunks[0]);
        }
        self.draw_conversation(frame, chunks[1]);

        let help = match (self.focus, self.shell.sidebar.active_tab()) {
            (Focus::Conversation, _) => "ESC quit | TAB sidebar | Enter send | Ctrl+P call | Ctrl+V video | Ctrl+S notifications | Ctrl+H help",
            (Focus::Sidebar, SidebarTab::Chats) => "ESC quit | TAB chat | ←/→ tabs | ↑/↓ move | Enter open | type to search | Ctrl+H help",
            (Focus::Sidebar, SidebarTab::Calls) => "ESC quit | TAB chat | ←/→ tabs | ↑/↓ move | Enter/a call | v video call | Ctrl+H help",
            (Focus::Sidebar, SidebarTab::Status) => "ESC quit | TAB chat | ←/→ tabs | ↑/↓ move | Enter view | + add status | Ctrl+H help",
        };
        frame.render_widget(
            Paragraph::new(Span::styled(help, Style::default().fg(Color::Gray))),
            rows[1],
        );
    }

    fn draw_sidebar<B: Backend>(&self, frame: &mut Frame<B>, area: Rect) {
        let tab = self.shell.sidebar.active_tab();
        let border_style = match self.focus {
            Focus::Sidebar => Style::default().fg(Color::Yellow),
            Focus::Conversation => Style::default(),
        };

        let mut constraints = vec![Constraint::Length(1)]; // Tab bar
        if tab == SidebarTab::Chats {
            constraints.push(Constraint::Length(3)); // Search
        }
        constraints.push(Constraint::Min(3));

        let block = Block::default()
            .title(tab.title())
            .borders(Borders::ALL)
            .border_style(border_style);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(inner);

        let tab_spans: Vec<Span> = SidebarTab::ALL
            .iter()
            .flat_map(|t| {
                let style = if *t == tab {
                    Style::default().fg(Color::Black).bg(Color::Green).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::Gray)
                };
                vec![Span::styled(format!(" {} ", t.title()), style), Span::raw(" ")]
            })
            .collect();
        frame.render_widget(Paragraph::new(Line::from(tab_spans)), chunks[0]);

        let list_area = *chunks.last().unwrap_or(&inner);
        match tab {
            SidebarTab::Chats => {
                let search_block = Block::default().borders(Borders::ALL).title("Search or start new chat");
                let search = Paragraph::new(self.search.value()).block(search_block);
                frame.render_widget(search, chunks[1]);
                if self.focus == Focus::Sidebar {
                    frame.set_cursor(chunks[1].x + self.search.cursor() as u16 + 1, chunks[1].y + 1);
                }
                self.draw_chat_list(frame, list_area);
            }
            SidebarTab::Calls => self.draw_call_history(frame, list_area),
            SidebarTab::Status => self.draw_status_feed(frame, list_area),
        }
    }

    fn draw_chat_list<B: Backend>(&self, frame: &mut Frame<B>, area: Rect) {
        let selected = self.shell.selected_chat();
        let items: Vec<ListItem> = self
            .shell
            .filtered_contacts()
            .into_iter()
            .map(|c| {
                let online = if c.is_online {
                    Span::styled("● ", Style::default().fg(Color::Green))
                } else {
                    Span::raw("  ")
                };
                let name_style = if selected == Some(c.id.as_str()) {
                    Style::default().add_modifier(Modifier::BOLD).fg(Color::Cyan)
                } else {
                    Style::default().add_modifier(Modifier::BOLD)
                };
                let mut first = vec![
                    online,
                    Span::styled(format!("{:<3}", initials(&c.name)), Style::default().fg(Color::Magenta)),
                    Span::styled(c.name.clone(), name_style),
                    Span::styled(format!("  {}", c.timestamp), Style::default().fg(Color::Gray)),
                ];
                if c.unread > 0 {
                    first.push(Span::styled(
                        format!(" ({})", c.unread),
                        Style::default().fg(Color::Black).bg(Color::Green),
                    ));
                }
                let second = Line::from(Span::styled(
                    format!("     {}", c.last_message),
                    Style::default().fg(Color::Gray),
                ));
                ListItem::new(Text::from(vec![Line::from(first), second]))
            })
            .collect();

        if items.is_empty() {
            frame.render_widget(
                Paragraph::new("No chats match your search").style(Style::default().fg(Color::Gray)),
                area,
            );
            return;
        }

        render_cursor_list(frame, items, area, self.cursor_for(SidebarTab::Chats));
    }

    fn draw_call_history<B: Backend>(&self, frame: &mut Frame<B>, area: Rect) {
        let items: Vec<ListItem> = self
            .shell
            .data()
            .calls
            .iter()
            .map(|record| {
                let (arrow, arrow_style) = match record.direction {
                    CallDirection::Missed => ("↙ ", Style::default().fg(Color::Red)),
                    CallDirection::Incoming => ("↙ ", Style::default().fg(Color::Green)),
                    CallDirection::Outgoing => ("↗ ", Style::default().fg(Color::Gray)),
                };
                let name_style = if record.direction == CallDirection::Missed {
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().add_modifier(Modifier::BOLD)
                };
                let first = Line::from(vec![
                    Span::styled(arrow, arrow_style),
                    Span::styled(format!("{:<3}", initials(&record.contact)), Style::default().fg(Color::Magenta)),
                    Span::styled(record.contact.clone(), name_style),
                ]);

                let kind = match record.kind {
                    CallKind::Audio => "voice",
                    CallKind::Video => "video",
                };
                let mut details = format!("     {} · {}", kind, record.timestamp);
                if let Some(duration) = &record.duration {
                    details.push_str(&format!(" · {}", duration));
                }
                let second = Line::from(Span::styled(details, Style::default().fg(Color::Gray)));
                ListItem::new(Text::from(vec![first, second]))
            })
            .collect();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(1)])
            .split(area);
        frame.render_widget(
            Paragraph::new(Span::styled("Recent Calls", Style::default().add_modifier(Modifier::BOLD))),
            chunks[0],
        );
        render_cursor_list(frame, items, chunks[1], self.cursor_for(SidebarTab::Calls));
    }

    fn draw_status_feed<B: Backend>(&self, frame: &mut Frame<B>, area: Rect) {
        let own: Vec<Line> = self
            .shell
            .data()
            .own_statuses()
            .map(|s| {
                Line::from(vec![
                    Span::styled("Me ", Style::default().fg(Color::Magenta)),
                    Span::styled(s.contact.clone(), Style::default().add_modifier(Modifier::BOLD)),
                    Span::styled(format!("  {}", s.timestamp), Style::default().fg(Color::Gray)),
                    Span::styled("  [+]", Style::default().fg(Color::Green)),
                ])
            })
            .collect();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(own.len() as u16 + 2), // My Status
                Constraint::Min(1),                       // Recent Updates
            ])
            .split(area);

        let mut own_lines = vec![
            Line::from(Span::styled("My Status", Style::default().fg(Color::Gray))),
        ];
        own_lines.extend(own);
        frame.render_widget(Paragraph::new(own_lines), chunks[0]);

        let items: Vec<ListItem> = self
            .shell
            .recent_statuses()
            .into_iter()
            .map(|s| {
                let ring = if s.viewed {
                    Span::styled("○ ", Style::default().fg(Color::Gray))
                } else {
                    Span::styled("◉ ", Style::default().fg(Color::Green))
                };
                ListItem::new(Line::from(vec![
                    ring,
                    Span::styled(format!("{:<3}", initials(&s.contact)), Style::default().fg(Color::Magenta)),
                    Span::styled(s.contact.clone(), Style::default().add_modifier(Modifier::BOLD)),
                    Span::styled(format!("  {}", s.timestamp), Style::default().fg(Color::Gray)),
                ]))
            })
            .collect();

        let recent = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(1)])
            .split(chunks[1]);
        frame.render_widget(
            Paragraph::new(Span::styled("Recent Updates", Style::default().fg(Color::Gray))),
            recent[0],
        );
        render_cursor_list(frame, items, recent[1], self.cursor_for(SidebarTab::Status));
    }

    fn draw_notification_panel<B: Backend>(&self, frame: &mut Frame<B>, area: Rect) {
        let back = format!("← Back to {} (Esc)", self.shell.sidebar.active_tab().title());
        let block = Block::default()
            .title(back)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow));

        let bold = Style::default().add_modifier(Modifier::BOLD);
        let gray = Style::default().fg(Color::Gray);
        let mut lines = vec![
            Line::from(Span::styled("Push Notifications Setup", bold.fg(Color::Cyan))),
            Line::from(Span::styled("Configure real-time notifications for murmur", gray)),
            Line::from(""),
        ];

        match self.shell.notifications().state() {
            PermissionState::Disabled => {
                lines.push(Line::from(Span::styled("Enable Push Notifications", bold)));
                lines.push(Line::from(Span::styled(
                    "Get notified instantly when you receive new messages, even when the app is closed.",
                    gray,
                )));
                lines.push(Line::from(Span::styled("[Enter] Enable Notifications", Style::default().fg(Color::Green))));
            }
            PermissionState::Requesting(_) => {
                lines.push(Line::from(Span::styled("Requesting permission...", bold.fg(Color::Yellow))));
            }
            PermissionState::Enabled => {
                lines.push(Line::from(Span::styled("Notifications Active", bold.fg(Color::Green))));
                lines.push(Line::from(Span::styled(
                    "You're all set! You'll receive notifications for new messages.",
                    gray,
                )));
                lines.push(Line::from(Span::styled("[Enter] Test Notification", Style::default().fg(Color::Green))));
            }
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Native Integration Ready", bold)));
        lines.extend(INTEGRATION_FEATURES.iter().map(|f| Line::from(Span::styled(format!("  • {}", f), gray))));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Next Steps:", bold)));
        lines.extend(NEXT_STEPS.iter().map(|s| Line::from(Span::styled(*s, gray))));

        let panel = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
        frame.render_widget(panel, area);
    }

    fn draw_conversation<B: Backend>(&self, frame: &mut Frame<B>, area: Rect) {
        let border_style = match self.focus {
            Focus::Conversation => Style::default().fg(Color::Yellow),
            Focus::Sidebar => Style::default(),
        };

        let contact = match self.shell.selected_contact() {
            Some(contact) => contact,
            None => {
                let welcome = Paragraph::new(vec![
                    Line::from(""),
                    Line::from(Span::styled("Welcome to murmur", Style::default().add_modifier(Modifier::BOLD))),
                    Line::from(Span::styled("Select a chat to start messaging", Style::default().fg(Color::Gray))),
                ])
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).border_style(border_style));
                frame.render_widget(welcome, area);
                return;
            }
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(3),    // Messages
                Constraint::Length(3), // Input box
            ])
            .split(area);

        let presence = if contact.is_online {
            Span::styled("Online", Style::default().fg(Color::Green))
        } else {
            Span::styled("Offline", Style::default().fg(Color::Gray))
        };
        let header = Paragraph::new(Line::from(vec![
            Span::styled(format!("{} ", initials(&contact.name)), Style::default().fg(Color::Magenta)),
            Span::styled(contact.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            presence,
            Span::styled("    Ctrl+P voice · Ctrl+V video", Style::default().fg(Color::Gray)),
        ]))
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(header, chunks[0]);

        draw_messages(frame, self.shell.messages(), chunks[1]);

        let input_widget = Paragraph::new(self.input.value()).block(
            Block::default()
                .title("Type a message...")
                .borders(Borders::ALL)
                .border_style(border_style),
        );
        frame.render_widget(input_widget, chunks[2]);

        if self.focus == Focus::Conversation {
            frame.set_cursor(
                // Put cursor past the end of the input text
                chunks[2].x + self.input.cursor() as u16 + 1,
                chunks[2].y + 1,
            );
        }
    }

    fn cursor_for(&self, tab: SidebarTab) -> Option<usize> {
        if self.shell.sidebar.active_tab() == tab && self.focus == Focus::Sidebar {
            Some(self.shell.sidebar.cursor())
        } else {
            None
        }
    }
}

fn render_cursor_list<B: Backend>(frame: &mut Frame<B>, items: Vec<ListItem>, area: Rect, cursor: Option<usize>) {
    let mut state = ListState::default();
    state.select(cursor);
    let list = List::new(items)
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("> ");
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_messages<B: Backend>(frame: &mut Frame<B>, messages: &[Message], area: Rect) {
    let inner_width = area.width.saturating_sub(2) as usize; // Account for borders
    let bubble_width = (inner_width * 3 / 4).max(10);

    let items: Vec<ListItem> = messages
        .iter()
        .flat_map(|m| {
            let ticks = if m.is_sent {
                match m.status {
                    Some(DeliveryStatus::Sent) => " ✓",
                    Some(DeliveryStatus::Delivered) | Some(DeliveryStatus::Read) => " ✓✓",
                    None => "",
                }
            } else {
                ""
            };
            let tick_style = match m.status {
                Some(DeliveryStatus::Read) => Style::default().fg(Color::Blue),
                _ => Style::default().fg(Color::Gray),
            };
            let text_style = if m.is_sent {
                Style::default().fg(Color::Green)
            } else {
                Style::default()
            };

            let mut lines: Vec<Line> = wrap(&m.text, bubble_width)
                .into_iter()
                .map(|l| Line::from(Span::styled(l.into_owned(), text_style)))
                .collect();
            lines.push(Line::from(vec![
                Span::styled(m.timestamp.clone(), Style::default().fg(Color::Gray)),
                Span::styled(ticks, tick_style),
            ]));
            lines.push(Line::from(""));

            let sent = m.is_sent;
            lines.into_iter().map(move |line| {
                if sent {
                    ListItem::new(pad_right_aligned(line, inner_width))
                } else {
                    ListItem::new(line)
                }
            })
        })
        .collect();

    // Select the last line so the list scrolls to the newest message
    let mut list_state = ListState::default();
    if !items.is_empty() {
        list_state.select(Some(items.len() - 1));
    }

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL))
        .highlight_style(Style::default());
    frame.render_stateful_widget(list, area, &mut list_state);
}

/// Shifts a line right so it ends at `width`, used for outgoing bubbles.
fn pad_right_aligned(line: Line<'static>, width: usize) -> Line<'static> {
    let used = line.width();
    if used >= width {
        return line;
    }
    let mut spans = vec![Span::raw(" ".repeat(width - used))];
    spans.extend(line.spans);
    Line::from(spans)
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(4));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

fn draw_call_overlay<B: Backend>(frame: &mut Frame<B>, call: &CallSession, area: Rect) {
    frame.render_widget(Clear, area);
    let block = Block::default()
        .title(call.kind().label())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Name and status
            Constraint::Min(5),    // Video / avatar area
            Constraint::Length(3), // Controls
        ])
        .split(inner);

    let status_style = match call.status() {
        CallStatus::Connected => Style::default().fg(Color::Green),
        _ => Style::default().fg(Color::Yellow),
    };
    let header = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(call.peer().name.clone(), Style::default().add_modifier(Modifier::BOLD))),
        Line::from(Span::styled(call.status_text(), status_style)),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(header, chunks[0]);

    let avatar = Line::from(Span::styled(
        format!("[ {} ]", initials(&call.peer().name)),
        Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
    ));
    let caption = match call.kind() {
        CallKind::Audio => "🔊 Audio call in progress",
        CallKind::Video if call.shows_live_video() => {
            "Video simulation - a live feed would be shown here"
        }
        CallKind::Video if call.is_video_off() => "Video is off",
        CallKind::Video => "",
    };
    let stage = Paragraph::new(vec![
        Line::from(""),
        avatar,
        Line::from(""),
        Line::from(Span::styled(caption, Style::default().fg(Color::Gray))),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(stage, chunks[1]);

    let toggle_style = |on: bool| {
        if on {
            Style::default().fg(Color::White).bg(Color::Red)
        } else {
            Style::default().fg(Color::Black).bg(Color::Gray)
        }
    };
    let mut controls = vec![
        Span::styled(
            if call.is_muted() { " [m] Unmute " } else { " [m] Mute " },
            toggle_style(call.is_muted()),
        ),
        Span::raw("   "),
    ];
    if call.kind() == CallKind::Video {
        controls.push(Span::styled(
            if call.is_video_off() { " [v] Video on " } else { " [v] Video off " },
            toggle_style(call.is_video_off()),
        ));
        controls.push(Span::raw("   "));
    }
    controls.push(Span::styled(" [e] End call ", Style::default().fg(Color::White).bg(Color::Red)));

    let controls = Paragraph::new(Line::from(controls))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(controls, chunks[2]);
}

fn draw_status_viewer<B: Backend>(frame: &mut Frame<B>, viewer: &StatusPlayback, area: Rect) {
    frame.render_widget(Clear, area);
    let item = viewer.item();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Progress
            Constraint::Length(2), // Who and when
            Constraint::Min(3),    // Content
            Constraint::Length(1), // Close hint
        ])
        .split(area);

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::White).bg(Color::DarkGray))
        .percent(viewer.progress() as u16);
    frame.render_widget(gauge, chunks[0]);

    let who = Paragraph::new(vec![
        Line::from(vec![
            Span::styled(format!("{} ", initials(&item.contact)), Style::default().fg(Color::Magenta)),
            Span::styled(item.contact.clone(), Style::default().add_modifier(Modifier::BOLD)),
        ]),
        Line::from(Span::styled(item.timestamp.clone(), Style::default().fg(Color::Gray))),
    ]);
    frame.render_widget(who, chunks[1]);

    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled("Status Content", Style::default().add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from(Span::styled(
            "This is a simulated status view. A real client would show images or videos here.",
            Style::default().fg(Color::Gray),
        )),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(content, chunks[2]);

    frame.render_widget(
        Paragraph::new(Span::styled("Esc close", Style::default().fg(Color::Gray))).alignment(Alignment::Center),
        chunks[3],
    );
}

fn draw_toast<B: Backend>(frame: &mut Frame<B>, toast: &Toast, area: Rect) {
    // Top-right corner with some margin
    let popup_width = 46.min(area.width.saturating_sub(4));
    let popup_height = 4.min(area.height.saturating_sub(2));
    let popup_x = area.width.saturating_sub(popup_width + 2);
    let popup_area = Rect::new(popup_x, 1, popup_width, popup_height);

    let color = if toast.destructive { Color::Red } else { Color::Green };
    let popup = Paragraph::new(Span::styled(toast.description.clone(), Style::default().fg(color)))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(toast.title.clone())
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        );

    frame.render_widget(Clear, popup_area); // Clear the area first
    frame.render_widget(popup, popup_area);
}

fn draw_help_dialog<B: Backend>(frame: &mut Frame<B>, area: Rect) {
    let popup_area = centered_rect(70, 28, area);

    let popup_block = Block::default()
        .title("Keyboard Shortcuts")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    frame.render_widget(Clear, popup_area);
    frame.render_widget(popup_block, popup_area);

    let inner_area = popup_area.inner(&Margin {
        vertical: 1,
        horizontal: 2,
    });

    let shortcuts = vec![
        ("General", ""),
        ("ESC", "Close overlay, or quit"),
        ("Ctrl+C", "Quit"),
        ("Tab", "Switch between sidebar and conversation"),
        ("", ""),
        ("Sidebar", ""),
        ("←/→", "Switch between Chats, Calls and Status"),
        ("↑/↓", "Move through the list"),
        ("Enter", "Open chat / call back / view status"),
        ("v", "Video call back (Calls)"),
        ("+", "Add status (Status)"),
        ("", ""),
        ("Conversation", ""),
        ("Enter", "Send message"),
        ("Ctrl+P", "Voice call the open chat"),
        ("Ctrl+V", "Video call the open chat"),
        ("", ""),
        ("During a call", ""),
        ("m", "Mute / unmute"),
        ("v", "Video on / off"),
        ("e", "End call"),
        ("", ""),
        ("Ctrl+S", "Notification setup"),
        ("Ctrl+H", "Show this help dialog"),
        ("", ""),
        ("Press any key to close this dialog", ""),
    ];

    let items: Vec<ListItem> = shortcuts
        .iter()
        .map(|(key, desc)| {
            if desc.is_empty() {
                if key.is_empty() {
                    ListItem::new("")
                } else {
                    // Category header
                    ListItem::new(Text::styled(
                        key.to_string(),
                        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                    ))
                }
            } else {
                let line = Line::from(vec![
                    Span::styled(format!("{:<10}", key), Style::default().fg(Color::Green)),
                    Span::raw(desc.to_string()),
                ]);
                ListItem::new(line)
            }
        })
        .collect();

    frame.render_widget(List::new(items), inner_area);
}

pub fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

pub fn restore_terminal(mut terminal: Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use murmur::MockData;
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;

    fn new_ui() -> ChatUI {
        let (shell, _rx) = Shell::new(MockData::builtin().unwrap(), Some("1"));
        ChatUI::new(shell, Duration::from_millis(10))
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn type_text(ui: &mut ChatUI, text: &str) {
        for c in text.chars() {
            ui.handle_key(key(KeyCode::Char(c)));
        }
    }

    fn buffer_text(buffer: &Buffer) -> String {
        buffer.content.iter().map(|cell| cell.symbol.as_str()).collect()
    }

    fn render(ui: &ChatUI) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| ui.draw(f)).unwrap();
        buffer_text(terminal.backend().buffer())
    }

    #[tokio::test]
    async fn test_typing_and_sending() {
        let mut ui = new_ui();
        assert_eq!(ui.focus, Focus::Conversation);

        type_text(&mut ui, "hello there");
        assert_eq!(ui.input.value(), "hello there");

        ui.handle_key(key(KeyCode::Enter));
        assert_eq!(ui.input.value(), "");
        assert_eq!(ui.shell.messages().last().unwrap().text, "hello there");
    }

    #[tokio::test]
    async fn test_search_and_open_from_sidebar() {
        let mut ui = new_ui();
        ui.handle_key(key(KeyCode::Tab));
        assert_eq!(ui.focus, Focus::Sidebar);

        type_text(&mut ui, "john");
        assert_eq!(ui.shell.sidebar.search(), "john");
        assert_eq!(ui.shell.filtered_contacts().len(), 1);

        ui.handle_key(key(KeyCode::Enter));
        assert_eq!(ui.shell.selected_chat(), Some("2"));
        assert_eq!(ui.focus, Focus::Conversation);
    }

    #[tokio::test]
    async fn test_call_keys() {
        let mut ui = new_ui();
        ui.handle_key(ctrl('v'));
        assert_eq!(ui.shell.active_call().unwrap().kind(), CallKind::Video);

        ui.handle_key(key(KeyCode::Char('m')));
        ui.handle_key(key(KeyCode::Char('v')));
        let call = ui.shell.active_call().unwrap();
        assert!(call.is_muted());
        assert!(call.is_video_off());

        // Esc hangs up rather than quitting while in a call
        assert_eq!(ui.handle_key(key(KeyCode::Esc)), UiAction::Continue);
        assert!(ui.shell.active_call().is_none());
        assert_eq!(ui.handle_key(key(KeyCode::Esc)), UiAction::Quit);
    }

    #[tokio::test]
    async fn test_calls_tab_video_callback() {
        let mut ui = new_ui();
        ui.handle_key(key(KeyCode::Tab));
        ui.handle_key(key(KeyCode::Right));
        assert_eq!(ui.shell.sidebar.active_tab(), SidebarTab::Calls);

        ui.handle_key(key(KeyCode::Down));
        ui.handle_key(key(KeyCode::Char('v')));
        let call = ui.shell.active_call().unwrap();
        assert_eq!(call.peer().name, "John Davis");
        assert_eq!(call.kind(), CallKind::Video);
    }

    #[tokio::test]
    async fn test_notification_panel_keys() {
        let mut ui = new_ui();
        ui.handle_key(ctrl('s'));
        assert!(ui.shell.is_notification_panel_open());

        ui.handle_key(key(KeyCode::Enter));
        assert!(matches!(ui.shell.notifications().state(), PermissionState::Requesting(_)));

        ui.handle_key(key(KeyCode::Esc));
        assert!(!ui.shell.is_notification_panel_open());
    }

    #[tokio::test]
    async fn test_help_dialog_closes_on_any_key() {
        let mut ui = new_ui();
        ui.handle_key(ctrl('h'));
        assert!(ui.help_dialog);
        assert!(render(&ui).contains("Keyboard Shortcuts"));

        ui.handle_key(key(KeyCode::Char('x')));
        assert!(!ui.help_dialog);
        assert_eq!(ui.input.value(), "", "Closing key must not be typed");
    }

    #[tokio::test]
    async fn test_render_main_screen() {
        let ui = new_ui();
        let screen = render(&ui);

        assert!(screen.contains("Chats"));
        assert!(screen.contains("Sarah Wilson"));
        assert!(screen.contains("Team Chat"));
        assert!(screen.contains("Hey! How are you doing today?"));
    }

    #[tokio::test]
    async fn test_render_call_overlay() {
        let mut ui = new_ui();
        ui.handle_key(ctrl('p'));
        let screen = render(&ui);

        assert!(screen.contains("Voice Call"));
        assert!(screen.contains("Connecting..."));
        assert!(screen.contains("End call"));
    }

    #[tokio::test]
    async fn test_render_welcome_without_selection() {
        let (shell, _rx) = Shell::new(MockData::builtin().unwrap(), None);
        let ui = ChatUI::new(shell, Duration::from_millis(10));
        assert_eq!(ui.focus, Focus::Sidebar);
        assert!(render(&ui).contains("Select a chat to start messaging"));
    }
}
