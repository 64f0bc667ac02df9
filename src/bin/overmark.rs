use std::{
    env, fs, io,
    path::PathBuf,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::Style,
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};
use tracing::{debug, info};

use overmark::engine::{Annotation, AnnotationKind, ChangeEvent, OverlayEngine};
use overmark::logging;
use overmark::render::{RenderResult, render_surface};
use overmark::surface::{CharRange, Fragment, MarkSurface, TextSurface};
use overmark::theme::Theme;

const STATUS_TIMEOUT: Duration = Duration::from_secs(4);
const MOUSE_SCROLL_LINES: usize = 3;
const LIST_PANEL_WIDTH: u16 = 28;

fn main() -> Result<()> {
    run()
}

fn run() -> Result<()> {
    let _guard = logging::init()?;

    let mut args = env::args().skip(1);
    let (surface, title) = match args.next() {
        Some(path_arg) => {
            let path = PathBuf::from(path_arg);
            let content = fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let title = path
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or("document")
                .to_string();
            (TextSurface::from_text(content), title)
        }
        None => (sample_document(), "sample".to_string()),
    };
    info!(title = %title, "starting");

    let mut app = App::new(surface, title);

    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("failed to initialize terminal")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal backend")?;
    terminal.clear().ok();

    let res = run_app(&mut terminal, &mut app).context("application error");

    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .ok();
    terminal.show_cursor().ok();

    res
}

/// The document used when no file is given: a lorem paragraph with two
/// pre-highlighted passages.
fn sample_document() -> TextSurface {
    TextSurface::from_fragments([
        Fragment::plain(
            "Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do eiusmod \
             tempor incididunt ut ",
        ),
        Fragment::marked("labore et dolore magna aliqua.", vec!["a".into()]),
        Fragment::plain(" Ut enim ad minim veniam, "),
        Fragment::marked("quis nostrud exercitation", vec!["b".into()]),
        Fragment::plain(
            " ullamco laboris nisi ut aliquip ex ea commodo consequat. Duis aute irure \
             dolor in reprehenderit in voluptate velit esse cillum dolore eu fugiat \
             nulla pariatur. Excepteur sint occaecat cupidatat non proident, sunt in \
             culpa qui officia deserunt mollit anim id est laborum.",
        ),
    ])
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();
    let mut needs_redraw = true;

    while !app.should_quit() {
        if needs_redraw {
            terminal
                .draw(|frame| app.draw(frame))
                .context("failed to draw frame")?;
            needs_redraw = false;
        }

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout).context("event poll failed")? {
            let evt = event::read().context("failed to read event")?;

            if let Event::Resize(_, _) = evt {
                needs_redraw = true;
                continue;
            }

            app.handle_event(evt)?;
            needs_redraw = true;
        }

        if last_tick.elapsed() >= tick_rate {
            let had_message_before = app.has_status_message();
            app.on_tick();
            last_tick = Instant::now();
            if had_message_before && !app.has_status_message() {
                needs_redraw = true;
            }
        }
    }

    Ok(())
}

struct App {
    engine: OverlayEngine<TextSurface>,
    theme: Theme,
    title: String,
    scroll_top: usize,
    should_quit: bool,
    status_message: Option<(String, Instant)>,
    drag_anchor: Option<usize>,
    last_render: Option<RenderResult>,
    last_text_area: Rect,
    last_list_inner: Rect,
}

impl App {
    fn new(surface: TextSurface, title: String) -> Self {
        Self {
            engine: OverlayEngine::new(surface),
            theme: Theme::default(),
            title,
            scroll_top: 0,
            should_quit: false,
            status_message: None,
            drag_anchor: None,
            last_render: None,
            last_text_area: Rect::default(),
            last_list_inner: Rect::default(),
        }
    }

    fn should_quit(&self) -> bool {
        self.should_quit
    }

    fn has_status_message(&self) -> bool {
        self.status_message.is_some()
    }

    fn set_status(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    fn on_tick(&mut self) {
        if let Some((_, since)) = &self.status_message
            && since.elapsed() >= STATUS_TIMEOUT
        {
            self.status_message = None;
        }
    }

    fn handle_event(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Key(key)
                if matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) =>
            {
                self.handle_key_event(key);
            }
            Event::Mouse(mouse) => self.handle_mouse_event(mouse),
            _ => {}
        }
        self.drain_engine_events();
        Ok(())
    }

    fn drain_engine_events(&mut self) {
        for event in self.engine.take_events() {
            match event {
                ChangeEvent::Created { annotation } => {
                    info!(id = %annotation.id, "highlight created");
                }
                ChangeEvent::Hover { id, hover } => {
                    debug!(id = %id, hover, "hover changed");
                }
            }
        }
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('h') | KeyCode::Enter => self.add_highlight(),
            KeyCode::Esc => self.clear_selection(),
            KeyCode::Up => self.scroll_by(-1),
            KeyCode::Down => self.scroll_by(1),
            KeyCode::PageUp => self.scroll_by(-(self.viewport_height() as isize)),
            KeyCode::PageDown => self.scroll_by(self.viewport_height() as isize),
            _ => {}
        }
    }

    fn add_highlight(&mut self) {
        match self.engine.create_from_selection(AnnotationKind::Claim) {
            Some(id) => {
                self.engine.surface_mut().set_selection(None);
                self.drag_anchor = None;
                self.set_status(format!("Added highlight {id}"));
            }
            None => self.set_status("Select some text to highlight first".to_string()),
        }
    }

    fn clear_selection(&mut self) {
        self.engine.surface_mut().set_selection(None);
        self.drag_anchor = None;
    }

    fn viewport_height(&self) -> usize {
        (self.last_text_area.height as usize).max(1)
    }

    fn scroll_by(&mut self, delta: isize) {
        let total = self
            .last_render
            .as_ref()
            .map(|render| render.total_lines)
            .unwrap_or(0);
        let max_scroll = total.saturating_sub(self.viewport_height());
        self.scroll_top = if delta < 0 {
            self.scroll_top.saturating_sub(delta.unsigned_abs())
        } else {
            (self.scroll_top + delta as usize).min(max_scroll)
        };
    }

    fn handle_mouse_event(&mut self, event: MouseEvent) {
        match event.kind {
            MouseEventKind::Moved => self.handle_pointer_moved(event.column, event.row),
            MouseEventKind::Down(MouseButton::Left) => {
                self.handle_mouse_down(event.column, event.row)
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                self.handle_mouse_drag(event.column, event.row)
            }
            MouseEventKind::ScrollUp => self.scroll_by(-(MOUSE_SCROLL_LINES as isize)),
            MouseEventKind::ScrollDown => self.scroll_by(MOUSE_SCROLL_LINES as isize),
            _ => {}
        }
    }

    /// Resolve a terminal position to a document offset. The outer `None`
    /// means the position is not over the text area at all; the inner one
    /// that it is over the area but not over any text.
    fn text_position(&self, column: u16, row: u16) -> Option<Option<usize>> {
        if !self.last_text_area.contains(Position::new(column, row)) {
            return None;
        }
        let Some(render) = &self.last_render else {
            return Some(None);
        };
        let line = (row - self.last_text_area.y) as usize + self.scroll_top;
        let col = column - self.last_text_area.x;
        Some(render.offset_at(line, col))
    }

    fn handle_pointer_moved(&mut self, column: u16, row: u16) {
        match self.text_position(column, row) {
            Some(offset) => self.engine.pointer_at(offset),
            None => self.engine.pointer_left(),
        }
    }

    fn handle_mouse_down(&mut self, column: u16, row: u16) {
        if self.last_list_inner.contains(Position::new(column, row)) {
            self.handle_list_click(row);
            return;
        }
        match self.text_position(column, row) {
            Some(Some(offset)) => {
                self.drag_anchor = Some(offset);
                self.engine.surface_mut().set_selection(None);
            }
            _ => self.clear_selection(),
        }
    }

    fn handle_mouse_drag(&mut self, column: u16, row: u16) {
        let Some(anchor) = self.drag_anchor else {
            return;
        };
        let Some(Some(offset)) = self.text_position(column, row) else {
            return;
        };
        let range = if offset >= anchor {
            CharRange::new(anchor, offset - anchor + 1)
        } else {
            CharRange::new(offset, anchor - offset)
        };
        self.engine.surface_mut().set_selection(Some(range));
    }

    /// Clicking a list entry toggles its hover flag, exactly like pointing
    /// at the highlighted text would.
    fn handle_list_click(&mut self, row: u16) {
        let index = (row - self.last_list_inner.y) as usize;
        let Some(annotation) = self.engine.annotations().get(index).cloned() else {
            return;
        };
        self.engine.toggle_hover(&annotation.id);
    }

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        if area.height == 0 || area.width == 0 {
            return;
        }

        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(area);
        let main_area = vertical[0];
        let status_area = vertical[1];

        let horizontal = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(1), Constraint::Length(LIST_PANEL_WIDTH)])
            .split(main_area);
        let text_area = horizontal[0];
        let list_area = horizontal[1];

        let width = text_area.width.max(1) as usize;
        let selection = self.engine.surface().selection();
        let render = render_surface(
            self.engine.surface(),
            width,
            selection,
            &self.theme,
            |offset| self.engine.color_at(offset),
        );

        let viewport = text_area.height as usize;
        let max_scroll = render.total_lines.saturating_sub(viewport);
        if self.scroll_top > max_scroll {
            self.scroll_top = max_scroll;
        }

        let paragraph = Paragraph::new(Text::from(render.lines.clone()))
            .style(self.theme.text_style())
            .scroll((self.scroll_top as u16, 0));
        frame.render_widget(paragraph, text_area);

        self.draw_list(frame, list_area);
        self.draw_status_bar(frame, status_area);

        self.last_render = Some(render);
        self.last_text_area = text_area;
    }

    fn draw_list(&mut self, frame: &mut Frame, list_area: Rect) {
        let annotations: Vec<Annotation> = self.engine.annotations().to_vec();
        let items: Vec<ListItem> = annotations
            .iter()
            .map(|annotation| {
                let swatch = self
                    .engine
                    .base_color(&annotation.id)
                    .blend_onto(self.theme.background_rgb);
                let label_style = if annotation.hover {
                    self.theme.list_hover_style()
                } else {
                    self.theme.list_style()
                };
                ListItem::new(Line::from(vec![
                    Span::styled("■ ", Style::default().fg(swatch).bg(self.theme.background)),
                    Span::styled(annotation.id.to_string(), label_style),
                ]))
            })
            .collect();

        let block = Block::default()
            .title("Highlights")
            .borders(Borders::ALL)
            .border_style(self.theme.list_border_style())
            .style(self.theme.list_style());
        self.last_list_inner = block.inner(list_area);
        frame.render_widget(List::new(items).block(block), list_area);
    }

    fn draw_status_bar(&self, frame: &mut Frame, status_area: Rect) {
        let hint = "mouse: select/hover  h: highlight  q: quit";
        let message = self
            .status_message
            .as_ref()
            .map(|(message, _)| message.as_str())
            .unwrap_or(hint);
        let count = self.engine.annotations().len();
        let right = format!("{count} highlighted ");

        let title = format!(" {} ", self.title);
        let left = format!(" {message}");
        let used = title.chars().count() + left.chars().count() + right.chars().count();
        let pad = (status_area.width as usize).saturating_sub(used);

        let line = Line::from(vec![
            Span::styled(title, self.theme.title_style()),
            Span::raw(left),
            Span::raw(" ".repeat(pad)),
            Span::raw(right),
        ]);
        frame.render_widget(
            Paragraph::new(line).style(self.theme.status_bar_style()),
            status_area,
        );
    }
}
