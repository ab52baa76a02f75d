use anyhow::Result;
use crossterm::{
    event::{Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{debug, error, info};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};
use std::{collections::HashMap, io, path::Path};
use textwrap::wrap;
use tui_input::{backend::crossterm::EventHandler, Input};

use mockchat::controller::ChatController;
use mockchat::models::{format_file_size, ClearStats, Contact, Message, MessageBody, Sender, Wallpaper};
use mockchat::simulator::SimulatorEvent;
use mockchat::storage::settings::WallpaperScope;
use mockchat::storage::StoreResult;

use ratatui::{backend::CrosstermBackend, Terminal};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    Landing,
    List,
    Conversation,
}

const SETTINGS_ITEMS: usize = 4;

enum Dialog {
    Settings { selected: usize },
    Wallpaper { scope: WallpaperScope, selected: usize },
    ConfirmDelete { contact_id: String, name: String },
    ConfirmClearAll { stats: ClearStats },
    ConfirmClearChat,
    Attach { input: Input },
    Info { title: String, lines: Vec<String> },
}

pub struct ChatUI {
    view: View,
    contacts: Vec<Contact>,
    list_state: ListState,
    search: Option<Input>,
    input: Input,
    current: Option<Contact>,
    history: Vec<Message>,
    typing: HashMap<String, usize>, // Contact -> visible typing placeholders
    dialog: Option<Dialog>,
    notice: Option<(String, chrono::DateTime<chrono::Utc>)>,
    dark_mode: bool,
    online_visible: bool,
    list_wallpaper: Wallpaper,
    interface_wallpaper: Wallpaper,
    should_quit: bool,
}

impl ChatUI {
    pub fn new() -> Self {
        ChatUI {
            view: View::Landing,
            contacts: Vec::new(),
            list_state: ListState::default(),
            search: None,
            input: Input::default(),
            current: None,
            history: Vec::new(),
            typing: HashMap::new(),
            dialog: None,
            notice: None,
            dark_mode: false,
            online_visible: true,
            list_wallpaper: Wallpaper::Default,
            interface_wallpaper: Wallpaper::Default,
            should_quit: false,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn show_notice(&mut self, text: &str) {
        debug!("UI notice: {}", text);
        self.notice = Some((text.to_string(), chrono::Utc::now()));
    }

    /// Drop the status line after `timeout_secs`
    pub fn clean_notice(&mut self, timeout_secs: i64) {
        if let Some((_, shown_at)) = &self.notice {
            if chrono::Utc::now().signed_duration_since(*shown_at).num_seconds() >= timeout_secs {
                self.notice = None;
            }
        }
    }

    /// Re-read everything the current view shows from the store
    pub fn refresh(&mut self, controller: &ChatController) -> StoreResult<()> {
        self.dark_mode = controller.dark_mode()?;
        self.online_visible = controller.online_status_visible()?;
        self.list_wallpaper = controller.wallpaper(WallpaperScope::List)?;
        self.interface_wallpaper = controller.wallpaper(WallpaperScope::Interface)?;

        self.contacts = match &self.search {
            Some(query) => controller.search(query.value())?,
            None => controller.contacts()?,
        };
        let selected = match self.list_state.selected() {
            Some(_) if self.contacts.is_empty() => None,
            Some(idx) => Some(idx.min(self.contacts.len() - 1)),
            None if !self.contacts.is_empty() => Some(0),
            None => None,
        };
        self.list_state.select(selected);

        if self.view == View::Conversation {
            self.current = controller.current_contact()?;
            self.history = controller.current_history()?;
            if self.current.is_none() {
                // The open contact went away underneath us
                self.view = View::List;
            }
        }
        Ok(())
    }

    /// Apply typing/reply notifications from the auto-reply simulator
    pub fn apply_simulator_event(&mut self, controller: &ChatController, event: SimulatorEvent) -> StoreResult<()> {
        match event {
            SimulatorEvent::Typing { contact_id } => {
                *self.typing.entry(contact_id).or_insert(0) += 1;
            }
            SimulatorEvent::TypingStopped { contact_id } => {
                if let Some(count) = self.typing.get_mut(&contact_id) {
                    *count = count.saturating_sub(1);
                }
            }
            SimulatorEvent::Replied { contact_id, .. } => {
                debug!("Reply arrived for {}", contact_id);
                self.refresh(controller)?;
            }
            SimulatorEvent::Cancelled { contact_id } => {
                debug!("Reply for {} cancelled", contact_id);
            }
        }
        Ok(())
    }

    pub fn enter_list(&mut self, controller: &ChatController) -> StoreResult<()> {
        self.view = View::List;
        self.refresh(controller)
    }

    fn open_selected(&mut self, controller: &ChatController) -> StoreResult<()> {
        let Some(contact) = self.list_state.selected().and_then(|idx| self.contacts.get(idx)) else {
            return Ok(());
        };
        let contact_id = contact.id.clone();
        self.history = controller.open_contact(&contact_id)?;
        self.current = controller.current_contact()?;
        self.input.reset();
        self.view = View::Conversation;
        info!("Opened conversation with {}", contact_id);
        Ok(())
    }

    fn move_selection(&mut self, delta: isize) {
        if self.contacts.is_empty() {
            return;
        }
        let len = self.contacts.len() as isize;
        let current = self.list_state.selected().unwrap_or(0) as isize;
        let next = (current + delta).rem_euclid(len);
        self.list_state.select(Some(next as usize));
    }

    pub fn handle_key(&mut self, controller: &ChatController, key: KeyEvent) -> StoreResult<()> {
        if self.dialog.is_some() {
            return self.handle_dialog_key(controller, key);
        }
        match self.view {
            View::Landing => match key.code {
                KeyCode::Enter => self.enter_list(controller)?,
                KeyCode::Esc | KeyCode::Char('q') => self.should_quit = true,
                _ => {}
            },
            View::List => self.handle_list_key(controller, key)?,
            View::Conversation => self.handle_conversation_key(controller, key)?,
        }
        Ok(())
    }

    fn handle_list_key(&mut self, controller: &ChatController, key: KeyEvent) -> StoreResult<()> {
        if let Some(search) = self.search.as_mut() {
            match key.code {
                KeyCode::Esc => {
                    self.search = None;
                    self.refresh(controller)?;
                }
                KeyCode::Enter => self.open_selected(controller)?,
                KeyCode::Up => self.move_selection(-1),
                KeyCode::Down => self.move_selection(1),
                _ => {
                    search.handle_event(&Event::Key(key));
                    self.list_state.select(None);
                    self.refresh(controller)?;
                }
            }
            return Ok(());
        }

        let selected_id = self
            .list_state
            .selected()
            .and_then(|idx| self.contacts.get(idx))
            .map(|c| (c.id.clone(), c.name.clone()));

        match key.code {
            KeyCode::Esc => self.view = View::Landing,
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            KeyCode::Enter => self.open_selected(controller)?,
            KeyCode::Char('/') => self.search = Some(Input::default()),
            KeyCode::Char('m') => {
                if let Some((id, name)) = selected_id {
                    if let Some(muted) = controller.toggle_mute(&id)? {
                        self.show_notice(&format!("{} {}", name, if muted { "muted" } else { "unmuted" }));
                    }
                    self.refresh(controller)?;
                }
            }
            KeyCode::Char('d') => {
                if let Some((contact_id, name)) = selected_id {
                    self.dialog = Some(Dialog::ConfirmDelete { contact_id, name });
                }
            }
            KeyCode::Char('s') => self.dialog = Some(Dialog::Settings { selected: 0 }),
            _ => {}
        }
        Ok(())
    }

    fn handle_conversation_key(&mut self, controller: &ChatController, key: KeyEvent) -> StoreResult<()> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('a') if controller.features().attachments => {
                    self.dialog = Some(Dialog::Attach { input: Input::default() });
                }
                KeyCode::Char('l') => self.dialog = Some(Dialog::ConfirmClearChat),
                KeyCode::Char('t') => {
                    if let Some(contact) = &self.current {
                        let name = contact.name.clone();
                        if let Some(muted) = controller.toggle_mute(&contact.id)? {
                            self.show_notice(&format!(
                                "Notifications {} for {}",
                                if muted { "muted" } else { "unmuted" },
                                name
                            ));
                        }
                        self.refresh(controller)?;
                    }
                }
                KeyCode::Char('o') => self.show_chat_info(controller)?,
                KeyCode::Char('w') => {
                    let current = Wallpaper::ALL
                        .iter()
                        .position(|w| *w == self.interface_wallpaper)
                        .unwrap_or(0);
                    self.dialog = Some(Dialog::Wallpaper {
                        scope: WallpaperScope::Interface,
                        selected: current,
                    });
                }
                _ => {}
            }
            return Ok(());
        }

        match key.code {
            KeyCode::Esc => {
                controller.close_contact()?;
                self.current = None;
                self.history.clear();
                self.enter_list(controller)?;
            }
            KeyCode::Enter => {
                let text = self.input.value().to_string();
                if let Some(message) = controller.send_message(&text)? {
                    self.history.push(message);
                    self.input.reset();
                    self.refresh(controller)?;
                }
            }
            _ => {
                self.input.handle_event(&Event::Key(key));
            }
        }
        Ok(())
    }

    fn show_chat_info(&mut self, controller: &ChatController) -> StoreResult<()> {
        let lines = match &self.current {
            Some(contact) => match controller.chat_info(&contact.id)? {
                Some(info) => vec![
                    format!("Name: {}", info.name),
                    format!("Status: {}", if info.online { "Online" } else { "Offline" }),
                    format!("Muted: {}", if info.muted { "Yes" } else { "No" }),
                ],
                None => vec!["No contact information available.".to_string()],
            },
            None => vec!["No contact information available.".to_string()],
        };
        self.dialog = Some(Dialog::Info {
            title: "Chat Info".to_string(),
            lines,
        });
        Ok(())
    }

    fn handle_dialog_key(&mut self, controller: &ChatController, key: KeyEvent) -> StoreResult<()> {
        let Some(dialog) = self.dialog.take() else {
            return Ok(());
        };

        match dialog {
            Dialog::Settings { selected } => match key.code {
                KeyCode::Esc => self.refresh(controller)?,
                KeyCode::Up => {
                    self.dialog = Some(Dialog::Settings {
                        selected: (selected + SETTINGS_ITEMS - 1) % SETTINGS_ITEMS,
                    })
                }
                KeyCode::Down => {
                    self.dialog = Some(Dialog::Settings {
                        selected: (selected + 1) % SETTINGS_ITEMS,
                    })
                }
                KeyCode::Enter | KeyCode::Char(' ') => match selected {
                    0 => {
                        let enabled = !self.dark_mode;
                        controller.set_dark_mode(enabled)?;
                        self.show_notice(if enabled { "Dark mode activated" } else { "Light mode activated" });
                        self.refresh(controller)?;
                        self.dialog = Some(Dialog::Settings { selected });
                    }
                    1 => {
                        controller.set_online_status_visible(!self.online_visible)?;
                        self.refresh(controller)?;
                        self.dialog = Some(Dialog::Settings { selected });
                    }
                    2 => {
                        let current = Wallpaper::ALL
                            .iter()
                            .position(|w| *w == self.list_wallpaper)
                            .unwrap_or(0);
                        self.dialog = Some(Dialog::Wallpaper {
                            scope: WallpaperScope::List,
                            selected: current,
                        });
                    }
                    _ => {
                        let stats = controller.chat_stats()?;
                        self.dialog = Some(Dialog::ConfirmClearAll { stats });
                    }
                },
                _ => self.dialog = Some(Dialog::Settings { selected }),
            },
            Dialog::Wallpaper { scope, selected } => match key.code {
                KeyCode::Esc => {}
                KeyCode::Up => {
                    self.dialog = Some(Dialog::Wallpaper {
                        scope,
                        selected: (selected + Wallpaper::ALL.len() - 1) % Wallpaper::ALL.len(),
                    })
                }
                KeyCode::Down => {
                    self.dialog = Some(Dialog::Wallpaper {
                        scope,
                        selected: (selected + 1) % Wallpaper::ALL.len(),
                    })
                }
                KeyCode::Enter => {
                    let wallpaper = Wallpaper::ALL[selected % Wallpaper::ALL.len()];
                    controller.set_wallpaper(scope, wallpaper)?;
                    self.show_notice(&format!("Wallpaper set to {}", wallpaper));
                    self.refresh(controller)?;
                }
                _ => self.dialog = Some(Dialog::Wallpaper { scope, selected }),
            },
            Dialog::ConfirmDelete { contact_id, name } => match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => {
                    controller.delete_contact(&contact_id)?;
                    self.show_notice(&format!("Conversation with {} deleted", name));
                    self.refresh(controller)?;
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {}
                _ => self.dialog = Some(Dialog::ConfirmDelete { contact_id, name }),
            },
            Dialog::ConfirmClearAll { stats } => match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => match controller.clear_all_history() {
                    Ok(cleared) => {
                        self.typing.clear();
                        self.show_notice(&format!(
                            "Successfully cleared {} messages from {} conversations.",
                            cleared.messages, cleared.contacts
                        ));
                        self.refresh(controller)?;
                    }
                    Err(e) => {
                        error!("Error clearing chat history: {}", e);
                        self.show_notice("An error occurred while clearing chat history. Please try again.");
                    }
                },
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {}
                _ => self.dialog = Some(Dialog::ConfirmClearAll { stats }),
            },
            Dialog::ConfirmClearChat => match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => match controller.clear_current_chat() {
                    Ok(true) => {
                        self.show_notice("Chat cleared successfully!");
                        self.refresh(controller)?;
                    }
                    Ok(false) => self.show_notice("No active chat to clear."),
                    Err(e) => {
                        error!("Error clearing chat: {}", e);
                        self.show_notice("An error occurred while clearing the chat. Please try again.");
                    }
                },
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {}
                _ => self.dialog = Some(Dialog::ConfirmClearChat),
            },
            Dialog::Attach { mut input } => match key.code {
                KeyCode::Esc => {}
                KeyCode::Enter => {
                    let path = input.value().trim().to_string();
                    self.attach_path(controller, &path)?;
                }
                _ => {
                    input.handle_event(&Event::Key(key));
                    self.dialog = Some(Dialog::Attach { input });
                }
            },
            Dialog::Info { .. } => {}
        }
        Ok(())
    }

    /// Attach the file at `path`. Only its name, size and type are stored.
    fn attach_path(&mut self, controller: &ChatController, path: &str) -> StoreResult<()> {
        if path.is_empty() {
            return Ok(());
        }
        let path = Path::new(path);
        let metadata = match std::fs::metadata(path) {
            Ok(metadata) if metadata.is_file() => metadata,
            Ok(_) => {
                self.show_notice("Not a regular file");
                return Ok(());
            }
            Err(e) => {
                self.show_notice(&format!("Cannot read file: {}", e));
                return Ok(());
            }
        };
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        if let Some(message) = controller.attach_file(&file_name, metadata.len(), guess_mime_type(path))? {
            self.history.push(message);
            self.refresh(controller)?;
        }
        Ok(())
    }

    fn base_style(&self) -> Style {
        if self.dark_mode {
            Style::default().bg(Color::Black).fg(Color::White)
        } else {
            Style::default()
        }
    }

    pub fn draw<B: Backend>(&self, frame: &mut Frame<B>) {
        let size = frame.size();
        frame.render_widget(Block::default().style(self.base_style()), size);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),    // Page body
                Constraint::Length(1), // Help / status line
            ])
            .split(size);

        match self.view {
            View::Landing => draw_landing(frame, chunks[0]),
            View::List => self.draw_list(frame, chunks[0]),
            View::Conversation => self.draw_conversation(frame, chunks[0]),
        }

        let status = match &self.notice {
            Some((text, _)) => Line::from(Span::styled(text.clone(), Style::default().fg(Color::Yellow))),
            None => Line::from(Span::styled(self.help_text(), Style::default().fg(Color::Gray))),
        };
        frame.render_widget(Paragraph::new(status), chunks[1]);

        if let Some(dialog) = &self.dialog {
            self.draw_dialog(frame, dialog, size);
        }
    }

    fn help_text(&self) -> &'static str {
        match self.view {
            View::Landing => "ENTER start | ESC quit",
            View::List if self.search.is_some() => "type to search | ENTER open | ESC close search",
            View::List => "ENTER open | / search | m mute | d delete | s settings | q quit",
            View::Conversation => "ENTER send | Ctrl+A attach | Ctrl+L clear | Ctrl+T mute | Ctrl+O info | Ctrl+W wallpaper | ESC back",
        }
    }

    fn draw_list<B: Backend>(&self, frame: &mut Frame<B>, area: Rect) {
        let (list_area, search_area) = if self.search.is_some() {
            let parts = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(3), Constraint::Min(1)])
                .split(area);
            (parts[1], Some(parts[0]))
        } else {
            (area, None)
        };

        if let (Some(search), Some(search_area)) = (&self.search, search_area) {
            let search_widget = Paragraph::new(search.value())
                .block(Block::default().title("Search").borders(Borders::ALL));
            frame.render_widget(search_widget, search_area);
            frame.set_cursor(
                search_area.x + search.cursor() as u16 + 1,
                search_area.y + 1,
            );
        }

        let block = Block::default()
            .title("Messages")
            .borders(Borders::ALL)
            .style(wallpaper_style(self.list_wallpaper));

        if self.contacts.is_empty() {
            let empty = Paragraph::new("No conversations found")
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(empty, list_area);
            return;
        }

        let items: Vec<ListItem> = self
            .contacts
            .iter()
            .map(|contact| {
                let mut header = Vec::new();
                if self.online_visible {
                    let (dot, color) = if contact.is_online { ("● ", Color::Green) } else { ("○ ", Color::DarkGray) };
                    header.push(Span::styled(dot, Style::default().fg(color)));
                }
                header.push(Span::styled(contact.name.clone(), Style::default().add_modifier(Modifier::BOLD)));
                if !contact.last_message_time.is_empty() {
                    header.push(Span::styled(
                        format!("  {}", contact.last_message_time),
                        Style::default().fg(Color::Gray),
                    ));
                }
                if contact.unread_count > 0 {
                    header.push(Span::styled(
                        format!("  ({})", contact.unread_count),
                        Style::default().fg(Color::Cyan),
                    ));
                }

                let muted = if contact.is_muted { "[muted] " } else { "" };
                let preview = Line::from(Span::styled(
                    format!("  {}{}", muted, contact.last_message),
                    Style::default().fg(Color::Gray),
                ));
                ListItem::new(vec![Line::from(header), preview])
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = self.list_state.clone();
        frame.render_stateful_widget(list, list_area, &mut state);
    }

    fn draw_conversation<B: Backend>(&self, frame: &mut Frame<B>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),    // Messages
                Constraint::Length(1), // Typing indicator
                Constraint::Length(3), // Input box
            ])
            .split(area);

        let (title, contact_name) = match &self.current {
            Some(contact) => {
                let status = if contact.is_online { "Active now" } else { "Last seen recently" };
                (format!("{} - {}", contact.name, status), contact.name.clone())
            }
            None => ("Conversation".to_string(), "Contact".to_string()),
        };

        let wrap_width = chunks[0].width.saturating_sub(2).max(1) as usize;
        let items: Vec<ListItem> = if self.history.is_empty() {
            vec![ListItem::new("No messages yet. Start chatting!").style(Style::default().fg(Color::Gray))]
        } else {
            self.history
                .iter()
                .flat_map(|m| {
                    let (who, style) = match m.sender {
                        Sender::User => ("You".to_string(), Style::default().fg(Color::Green)),
                        Sender::Contact => (contact_name.clone(), Style::default()),
                    };
                    let content = match &m.body {
                        MessageBody::Text { text } => text.clone(),
                        MessageBody::File { file_name, file_size, .. } => {
                            format!("[file] {} ({})", file_name, format_file_size(*file_size))
                        }
                    };
                    let full_content = format!("[{}] {}: {}", m.time, who, content);

                    let wrapped_lines: Vec<String> = wrap(&full_content, wrap_width)
                        .into_iter()
                        .map(|l| l.into_owned())
                        .collect();
                    wrapped_lines
                        .into_iter()
                        .map(move |line| ListItem::new(Text::from(line)).style(style))
                })
                .collect()
        };

        // Keep the newest message in view
        let mut list_state = ListState::default();
        if !items.is_empty() {
            list_state.select(Some(items.len() - 1));
        }
        let messages_list = List::new(items)
            .block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .style(wallpaper_style(self.interface_wallpaper)),
            )
            .highlight_style(Style::default());
        frame.render_stateful_widget(messages_list, chunks[0], &mut list_state);

        let typing = self
            .current
            .as_ref()
            .and_then(|c| self.typing.get(&c.id))
            .copied()
            .unwrap_or(0);
        if typing > 0 {
            let indicator = Paragraph::new(Line::from(Span::styled(
                format!("{} is typing...", contact_name),
                Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
            )));
            frame.render_widget(indicator, chunks[1]);
        }

        let input_widget = Paragraph::new(self.input.value())
            .block(Block::default().title("Message").borders(Borders::ALL));
        frame.render_widget(input_widget, chunks[2]);
        if self.dialog.is_none() {
            frame.set_cursor(
                chunks[2].x + self.input.cursor() as u16 + 1,
                chunks[2].y + 1,
            );
        }
    }

    fn draw_dialog<B: Backend>(&self, frame: &mut Frame<B>, dialog: &Dialog, area: Rect) {
        let (title, lines): (String, Vec<Line>) = match dialog {
            Dialog::Settings { selected } => {
                let entries = [
                    format!("Dark mode: {}", on_off(self.dark_mode)),
                    format!("Show online status: {}", on_off(self.online_visible)),
                    format!("Wallpaper: {}", self.list_wallpaper),
                    "Clear all chat history".to_string(),
                ];
                let lines = entries
                    .iter()
                    .enumerate()
                    .map(|(i, entry)| selectable_line(entry, i == *selected))
                    .chain(std::iter::once(Line::from("")))
                    .chain(std::iter::once(Line::from("UP/DOWN move | ENTER toggle | ESC close")))
                    .collect();
                ("Settings".to_string(), lines)
            }
            Dialog::Wallpaper { selected, .. } => {
                let lines = Wallpaper::ALL
                    .iter()
                    .enumerate()
                    .map(|(i, wallpaper)| {
                        Line::from(vec![
                            Span::styled("■ ", wallpaper_style(*wallpaper).fg(wallpaper_color(*wallpaper))),
                            Span::styled(
                                wallpaper.to_string(),
                                if i == *selected {
                                    Style::default().add_modifier(Modifier::REVERSED)
                                } else {
                                    Style::default()
                                },
                            ),
                        ])
                    })
                    .collect();
                ("Choose Wallpaper".to_string(), lines)
            }
            Dialog::ConfirmDelete { name, .. } => (
                "Delete Conversation".to_string(),
                vec![
                    Line::from(format!("Are you sure you want to delete the conversation with {}?", name)),
                    Line::from(""),
                    Line::from("y = delete, n = cancel"),
                ],
            ),
            Dialog::ConfirmClearAll { stats } => (
                "Clear All Chat History?".to_string(),
                vec![
                    Line::from("This will permanently delete all your conversations and messages."),
                    Line::from("This cannot be undone."),
                    Line::from(""),
                    Line::from(format!("{} Conversations   {} Messages", stats.contacts, stats.messages)),
                    Line::from(""),
                    Line::from("y = clear all, n = cancel"),
                ],
            ),
            Dialog::ConfirmClearChat => (
                "Clear Chat".to_string(),
                vec![
                    Line::from("Delete all messages in this conversation?"),
                    Line::from("This action cannot be undone."),
                    Line::from(""),
                    Line::from("y = clear, n = cancel"),
                ],
            ),
            Dialog::Attach { input } => (
                "Attach File".to_string(),
                vec![
                    Line::from("Path to file:"),
                    Line::from(Span::styled(input.value().to_string(), Style::default().fg(Color::Yellow))),
                    Line::from(""),
                    Line::from("ENTER attach | ESC cancel"),
                ],
            ),
            Dialog::Info { title, lines } => (
                title.clone(),
                lines
                    .iter()
                    .map(|l| Line::from(l.clone()))
                    .chain(std::iter::once(Line::from("")))
                    .chain(std::iter::once(Line::from("Press any key to close")))
                    .collect(),
            ),
        };

        let popup_width = 64.min(area.width.saturating_sub(4));
        let popup_height = (lines.len() as u16 + 2).min(area.height.saturating_sub(2));
        let popup_area = Rect::new(
            (area.width.saturating_sub(popup_width)) / 2,
            (area.height.saturating_sub(popup_height)) / 2,
            popup_width,
            popup_height,
        );

        let popup = Paragraph::new(lines)
            .block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Yellow)),
            )
            .style(self.base_style())
            .wrap(Wrap { trim: true });
        frame.render_widget(Clear, popup_area);
        frame.render_widget(popup, popup_area);
    }
}

fn draw_landing<B: Backend>(frame: &mut Frame<B>, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("mockchat", Style::default().add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from("Chat with your favourite characters."),
        Line::from("Everything stays on this machine."),
        Line::from(""),
        Line::from(Span::styled("Press ENTER to start", Style::default().fg(Color::Green))),
    ];
    let landing = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(landing, area);
}

fn selectable_line(text: &str, selected: bool) -> Line<'static> {
    let style = if selected {
        Style::default().add_modifier(Modifier::REVERSED)
    } else {
        Style::default()
    };
    Line::from(Span::styled(text.to_string(), style))
}

fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}

fn wallpaper_color(wallpaper: Wallpaper) -> Color {
    match wallpaper {
        Wallpaper::Default => Color::Reset,
        Wallpaper::Dark => Color::DarkGray,
        Wallpaper::Blue => Color::Blue,
        Wallpaper::Green => Color::Green,
    }
}

fn wallpaper_style(wallpaper: Wallpaper) -> Style {
    match wallpaper {
        Wallpaper::Default => Style::default(),
        other => Style::default().bg(wallpaper_color(other)),
    }
}

fn guess_mime_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
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
