use anyhow::Result;
use blockpress_config::Config;
use blockpress_engine::editing::{BlockUpdate, Cmd, DEFAULT_DEBOUNCE, EditSession};
use blockpress_engine::html::render_block;
use blockpress_engine::{BlockId, BlockProps, BlockType, InsertFallback, Property, io};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use std::io::{Stdout, stdout};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use std::{env, process};

const TICK: Duration = Duration::from_millis(100);

/// What an edit line writes back to
#[derive(Clone, Copy)]
enum EditTarget {
    Content,
    Url,
}

enum Mode {
    Browse,
    Edit { target: EditTarget, buffer: String },
}

#[derive(Debug, PartialEq)]
enum EditOutcome {
    Continue,
    Commit,
    Cancel,
}

/// Applies a key to the edit buffer. Alt+Enter inserts a newline, plain Enter commits.
fn edit_buffer(buffer: &mut String, key: KeyEvent) -> EditOutcome {
    match key.code {
        KeyCode::Enter if key.modifiers.contains(KeyModifiers::ALT) => buffer.push('\n'),
        KeyCode::Enter => return EditOutcome::Commit,
        KeyCode::Esc => return EditOutcome::Cancel,
        KeyCode::Backspace => {
            buffer.pop();
        }
        KeyCode::Char(c) => buffer.push(c),
        _ => {}
    }
    EditOutcome::Continue
}

struct App {
    path: PathBuf,
    session: EditSession,
    list_state: ListState,
    mode: Mode,
    status: String,
}

impl App {
    fn new(path: PathBuf, session: EditSession) -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self {
            path,
            session,
            list_state,
            mode: Mode::Browse,
            status: String::new(),
        }
    }

    fn selected_index(&self) -> usize {
        self.list_state
            .selected()
            .unwrap_or_default()
            .min(self.session.document().len().saturating_sub(1))
    }

    fn selected_id(&self) -> BlockId {
        self.session.document().blocks()[self.selected_index()].id
    }

    fn select(&mut self, index: usize) {
        let last = self.session.document().len().saturating_sub(1);
        let index = index.min(last);
        self.list_state.select(Some(index));
        let id = self.session.document().blocks()[index].id;
        self.apply(Cmd::SetActive { id: Some(id) });
    }

    fn apply(&mut self, cmd: Cmd) {
        let patch = self.session.apply(cmd, Instant::now());
        if patch.changed {
            self.status = format!("modified (v{})", patch.version);
        }
    }

    fn next_block(&mut self) {
        self.select(self.selected_index() + 1);
    }

    fn previous_block(&mut self) {
        self.select(self.selected_index().saturating_sub(1));
    }

    fn insert(&mut self, block_type: BlockType) {
        let after = self.selected_id();
        self.apply(Cmd::Insert { after, block_type });
        if let Some(index) = self
            .session
            .document()
            .active()
            .and_then(|id| self.session.document().position(id))
        {
            self.list_state.select(Some(index));
        }
    }

    fn delete(&mut self) {
        let index = self.selected_index();
        self.apply(Cmd::Delete {
            id: self.selected_id(),
        });
        self.select(index);
    }

    fn move_up(&mut self) {
        let index = self.selected_index();
        if index == 0 {
            return;
        }
        let blocks = self.session.document().blocks();
        let (dragged, target) = (blocks[index].id, blocks[index - 1].id);
        self.apply(Cmd::Reorder { dragged, target });
        self.select(index - 1);
    }

    fn move_down(&mut self) {
        let index = self.selected_index();
        let blocks = self.session.document().blocks();
        if index + 1 >= blocks.len() {
            return;
        }
        // Moving the next block above this one moves this one down.
        let (dragged, target) = (blocks[index + 1].id, blocks[index].id);
        self.apply(Cmd::Reorder { dragged, target });
        self.select(index + 1);
    }

    fn begin_edit(&mut self) {
        let block = &self.session.document().blocks()[self.selected_index()];
        let (target, buffer) = match &block.props {
            BlockProps::Image { url, .. } | BlockProps::Video { url, .. } => {
                (EditTarget::Url, url.clone())
            }
            BlockProps::Paragraph { .. }
            | BlockProps::Heading { .. }
            | BlockProps::List { .. }
            | BlockProps::Quote
            | BlockProps::Code { .. } => (EditTarget::Content, block.content.clone()),
            _ => {
                self.status = format!("{} blocks have no text to edit", block.block_type());
                return;
            }
        };
        self.mode = Mode::Edit { target, buffer };
    }

    fn commit_edit(&mut self) {
        let Mode::Edit { target, buffer } = std::mem::replace(&mut self.mode, Mode::Browse) else {
            return;
        };
        let update = match target {
            EditTarget::Content => BlockUpdate::content(buffer),
            EditTarget::Url => BlockUpdate::properties([Property::Url(buffer)]),
        };
        self.apply(Cmd::Update {
            id: self.selected_id(),
            update,
        });
    }

    fn save(&mut self, html: &str) {
        self.status = match io::write_fragment(&self.path, html) {
            Ok(()) => format!("saved {}", self.path.display()),
            Err(e) => format!("save failed: {e}"),
        };
    }

    fn save_now(&mut self) {
        let html = self.session.flush();
        self.save(&html);
    }

    fn autosave(&mut self, now: Instant) {
        if let Some(html) = self.session.poll(now) {
            self.save(&html);
        }
    }

    /// Returns false when the user asked to quit.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        if let Mode::Edit { buffer, .. } = &mut self.mode {
            match edit_buffer(buffer, key) {
                EditOutcome::Commit => self.commit_edit(),
                EditOutcome::Cancel => self.mode = Mode::Browse,
                EditOutcome::Continue => {}
            }
            return true;
        }

        match key.code {
            KeyCode::Esc => return false,
            KeyCode::Down | KeyCode::Char('j') => self.next_block(),
            KeyCode::Up | KeyCode::Char('k') => self.previous_block(),
            KeyCode::Char('J') => self.move_down(),
            KeyCode::Char('K') => self.move_up(),
            KeyCode::Char('p') => self.insert(BlockType::Paragraph),
            KeyCode::Char('h') => self.insert(BlockType::Heading),
            KeyCode::Char('l') => self.insert(BlockType::List),
            KeyCode::Char('q') => self.insert(BlockType::Quote),
            KeyCode::Char('c') => self.insert(BlockType::Code),
            KeyCode::Char('-') => self.insert(BlockType::Divider),
            KeyCode::Char('t') => self.insert(BlockType::Table),
            KeyCode::Char('d') => self.delete(),
            KeyCode::Char('s') => self.save_now(),
            KeyCode::Enter | KeyCode::Char('e') => self.begin_edit(),
            _ => {}
        }
        true
    }
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or_default()
}

fn describe(block: &blockpress_engine::Block) -> String {
    let detail = match &block.props {
        BlockProps::Heading { level, .. } => format!("h{level} {}", first_line(&block.content)),
        BlockProps::Code { language } => format!("[{language}] {}", first_line(&block.content)),
        BlockProps::Image { url, .. } | BlockProps::Video { url, .. } => url.clone(),
        BlockProps::Table { rows, cols, .. } => format!("{rows}x{cols}"),
        BlockProps::Columns { count, .. } => format!("{count} columns"),
        BlockProps::Spacer { height } => format!("{height}px"),
        BlockProps::Divider => String::new(),
        _ => first_line(&block.content).to_string(),
    };
    format!("{:<9} {detail}", block.block_type().as_str())
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args: Vec<String> = env::args().collect();
    let config_path = Config::config_path();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };

    let path = match (args.len(), &config) {
        (2, Some(config)) => config.resolve_fragment(&args[1]),
        (2, None) => PathBuf::from(&args[1]),
        (1, Some(config)) => {
            if !config.posts_path.is_dir() {
                eprintln!(
                    "Error: Posts path '{}' from config file '{}' is not a directory",
                    config.posts_path.display(),
                    config_path.display()
                );
                process::exit(1);
            }
            config.resolve_fragment("index.html")
        }
        (1, None) => {
            eprintln!("Error: No fragment provided and no config file found");
            eprintln!("Usage: {} <fragment.html>", args[0]);
            eprintln!("Or create a config file at {}", config_path.display());
            process::exit(1);
        }
        _ => {
            eprintln!("Usage: {} [fragment.html]", args[0]);
            process::exit(1);
        }
    };

    let debounce = config.as_ref().map_or(DEFAULT_DEBOUNCE, Config::debounce);
    let fallback = config
        .as_ref()
        .map_or(InsertFallback::default(), |config| config.insert_fallback);

    log::info!("opening {}", path.display());
    let document = io::open_document(&path)?.with_insert_fallback(fallback);
    let mut app = App::new(path, EditSession::new(document, debounce));

    // The terminal belongs to the TUI until it is restored.
    let log_level = log::max_level();
    log::set_max_level(log::LevelFilter::Off);

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);
    if app.session.is_dirty() {
        app.save_now();
    }

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    log::set_max_level(log_level);

    log::info!("{}", app.status);
    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if event::poll(TICK)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && !app.handle_key(key)
        {
            return Ok(());
        }
        app.autosave(Instant::now());
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Min(0), Constraint::Length(3)].as_ref())
        .split(f.area());
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)].as_ref())
        .split(rows[0]);

    let document = app.session.document();
    let items: Vec<ListItem> = document
        .blocks()
        .iter()
        .map(|block| ListItem::new(vec![Line::from(vec![Span::raw(describe(block))])]))
        .collect();

    let title = format!("Blocks - {}", app.path.display());
    let blocks_list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().bg(Color::Yellow).fg(Color::Black));

    let selected = &document.blocks()[app.selected_index()];
    let preview_title = match &app.mode {
        Mode::Browse => "HTML",
        Mode::Edit { .. } => "Editing (Enter: commit, Alt+Enter: newline, Esc: cancel)",
    };
    let preview_text = match &app.mode {
        Mode::Browse => render_block(selected),
        Mode::Edit { buffer, .. } => format!("{}▏", buffer.replace('\n', " ⏎ ")),
    };
    let preview = Paragraph::new(preview_text)
        .block(Block::default().borders(Borders::ALL).title(preview_title))
        .wrap(Wrap { trim: false });

    let help_text = Line::from(vec![
        Span::raw("Esc: Quit | j/k: Select | J/K: Move | Enter/e: Edit | "),
        Span::raw("p/h/l/q/c/-/t: Insert | d: Delete | s: Save | "),
        Span::styled(app.status.clone(), Style::default().fg(Color::Cyan)),
    ]);
    let help = Paragraph::new(vec![help_text]).block(Block::default());

    f.render_stateful_widget(blocks_list, chunks[0], &mut app.list_state);
    f.render_widget(preview, chunks[1]);
    f.render_widget(help, rows[1]);
}
