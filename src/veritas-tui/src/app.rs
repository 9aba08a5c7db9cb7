//! Analysis screen - Full-screen TUI
//!
//! Draws the form held by a [`FormController`] and feeds it keyboard input.
//! The classification request runs on a Tokio task; its outcome comes back
//! through an mpsc channel that the loop drains every frame.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap};
use tokio::sync::mpsc;

use veritas_client::{AnalysisResult, AnalyzeError, Analyzer};
use veritas_core::{FormController, FormView, Submission, ThemeStore};

use crate::input::InputState;
use crate::palette::Palette;
use crate::terminal::VeritasTerminal;
use crate::widgets::{ConfidenceGauge, LoadingSpinner};

const PLACEHOLDER: &str = "Type or paste a comment to analyze...";
const HINTS: &str = "Enter analyze · Ctrl+T theme · Ctrl+U clear · Esc quit";
const MODEL_NOTICE: &str = "Model not loaded on the server. Analysis is disabled.";

// ============================================================================
// Async Messages
// ============================================================================

#[derive(Debug)]
pub enum AsyncMessage {
    AnalysisFinished(std::result::Result<AnalysisResult, AnalyzeError>),
}

// ============================================================================
// App
// ============================================================================

pub struct App<S> {
    form: FormController<S>,
    input: InputState,
    analyzer: Arc<dyn Analyzer>,
    server_url: String,
    frame_count: u64,
    async_rx: Option<mpsc::Receiver<AsyncMessage>>,
    should_quit: bool,
}

impl<S: ThemeStore> App<S> {
    pub fn new(
        form: FormController<S>,
        analyzer: Arc<dyn Analyzer>,
        server_url: impl Into<String>,
    ) -> Self {
        Self {
            form,
            input: InputState::new(),
            analyzer,
            server_url: server_url.into(),
            frame_count: 0,
            async_rx: None,
            should_quit: false,
        }
    }

    pub fn form(&self) -> &FormController<S> {
        &self.form
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Take over the terminal and run until the user quits.
    pub async fn run(&mut self) -> Result<()> {
        let (mut terminal, _guard) = crate::terminal::init("Veritas")?;
        self.run_loop(&mut terminal).await
    }

    async fn run_loop(&mut self, terminal: &mut VeritasTerminal) -> Result<()> {
        // Flush any pending input events to prevent stale keypresses
        while event::poll(Duration::from_millis(0))? {
            let _ = event::read()?;
        }

        while !self.should_quit {
            self.frame_count = self.frame_count.wrapping_add(1);

            self.form.on_frame(Instant::now());
            terminal.draw(|f| self.render(f))?;

            self.process_async_messages();

            if event::poll(Duration::from_millis(80))? {
                match event::read()? {
                    // Only process KeyPress, not KeyRelease or KeyRepeat
                    Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
                    Event::Paste(text) => self.handle_paste(&text),
                    _ => {}
                }
            }

            // Let the spawned request make progress between frames.
            tokio::task::yield_now().await;
        }

        tracing::info!("Exiting terminal UI");
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------------

    pub fn handle_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') if ctrl => self.should_quit = true,
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('t') if ctrl => {
                self.form.toggle_theme();
            }
            KeyCode::Enter if key.modifiers.contains(KeyModifiers::ALT) => {
                self.edit(|input| input.insert('\n'));
            }
            KeyCode::Enter => self.submit(),
            KeyCode::Char('u') if ctrl => self.edit(InputState::clear),
            KeyCode::Backspace => self.edit(InputState::backspace),
            KeyCode::Delete => self.edit(InputState::delete),
            KeyCode::Left => self.input.move_left(),
            KeyCode::Right => self.input.move_right(),
            KeyCode::Home => self.input.move_home(),
            KeyCode::End => self.input.move_end(),
            KeyCode::Char(c) if !ctrl && !key.modifiers.contains(KeyModifiers::ALT) => {
                self.edit(|input| input.insert(c));
            }
            _ => {}
        }
    }

    pub fn handle_paste(&mut self, text: &str) {
        self.edit(|input| input.insert_str(text));
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    fn edit(&mut self, f: impl FnOnce(&mut InputState)) {
        if self.form.view().input_disabled {
            return;
        }
        f(&mut self.input);
    }

    fn submit(&mut self) {
        let text = match self.form.begin_submit(&self.input.value) {
            Submission::Dispatch(text) => text,
            Submission::Ignored | Submission::Rejected(_) => return,
        };

        tracing::info!(chars = text.chars().count(), "Sending analysis request");
        let analyzer = Arc::clone(&self.analyzer);
        let tx = self.create_async_channel();
        tokio::spawn(async move {
            let outcome = analyzer.analyze(&text).await;
            let _ = tx.send(AsyncMessage::AnalysisFinished(outcome)).await;
        });
    }

    fn create_async_channel(&mut self) -> mpsc::Sender<AsyncMessage> {
        let (tx, rx) = mpsc::channel(1);
        self.async_rx = Some(rx);
        tx
    }

    fn process_async_messages(&mut self) {
        let messages: Vec<AsyncMessage> = if let Some(ref mut rx) = self.async_rx {
            let mut msgs = Vec::new();
            while let Ok(msg) = rx.try_recv() {
                msgs.push(msg);
            }
            msgs
        } else {
            Vec::new()
        };

        for msg in messages {
            self.handle_async_message(msg, Instant::now());
        }
    }

    fn handle_async_message(&mut self, msg: AsyncMessage, now: Instant) {
        match msg {
            AsyncMessage::AnalysisFinished(outcome) => {
                self.async_rx = None;
                // Already rendered into the view; the returned copy is not needed.
                let _ = self.form.finish_submit(outcome, now);
            }
        }
    }

    // ------------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------------

    pub fn render(&self, f: &mut Frame) {
        let view = self.form.view();
        let palette = Palette::for_theme(view.theme);
        let area = f.area();

        f.render_widget(Clear, area);
        f.render_widget(
            Block::default().style(Style::default().bg(palette.background)),
            area,
        );

        let content_width = 76.min(area.width.saturating_sub(4));
        let content_x = area.x + (area.width.saturating_sub(content_width)) / 2;
        let content = Rect::new(
            content_x,
            area.y + 1,
            content_width,
            area.height.saturating_sub(2),
        );

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Title
                Constraint::Length(1), // Model notice
                Constraint::Length(1), // Empty
                Constraint::Min(5),    // Input
                Constraint::Length(1), // Status: spinner or error
                Constraint::Length(1), // Empty
                Constraint::Length(5), // Result
                Constraint::Length(1), // Hints
            ])
            .split(content);

        self.render_title(f, chunks[0], &palette);

        if !self.form.model_available() {
            let notice = Paragraph::new(MODEL_NOTICE).style(Style::default().fg(palette.warning));
            f.render_widget(notice, chunks[1]);
        }

        self.render_input(f, chunks[3], view, &palette);
        self.render_status(f, chunks[4], view, &palette);

        if view.result.shown {
            render_result(f, chunks[6], view, &palette);
        }

        let hints = Paragraph::new(HINTS).style(Style::default().fg(palette.text_muted));
        f.render_widget(hints, chunks[7]);
    }

    fn render_title(&self, f: &mut Frame, area: Rect, palette: &Palette) {
        let title = Paragraph::new(Line::from(vec![
            Span::styled(
                "Veritas",
                Style::default().fg(palette.accent).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(" v{}", veritas_core::VERSION),
                Style::default().fg(palette.text_dim),
            ),
            Span::styled(
                format!("  {}", self.server_url),
                Style::default().fg(palette.text_muted),
            ),
        ]));
        f.render_widget(title, area);

        let theme = Paragraph::new(format!("◐ {}", self.form.theme()))
            .style(Style::default().fg(palette.text_dim))
            .alignment(Alignment::Right);
        f.render_widget(theme, area);
    }

    fn render_input(&self, f: &mut Frame, area: Rect, view: &FormView, palette: &Palette) {
        let enabled = !view.input_disabled;
        let border = if enabled { palette.accent } else { palette.border };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border))
            .title(Span::styled(" Comment ", Style::default().fg(palette.text_dim)))
            .style(Style::default().bg(palette.surface));

        let text_style = if enabled {
            Style::default().fg(palette.text)
        } else {
            Style::default().fg(palette.text_muted)
        };

        let lines = if self.input.is_empty() && enabled {
            vec![Line::from(vec![
                Span::styled(" ", Style::default().bg(palette.accent)),
                Span::styled(PLACEHOLDER, Style::default().fg(palette.text_muted)),
            ])]
        } else {
            self.input.lines(
                text_style,
                Style::default().fg(palette.background).bg(palette.accent),
                enabled,
            )
        };

        let paragraph = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false });
        f.render_widget(paragraph, area);
    }

    fn render_status(&self, f: &mut Frame, area: Rect, view: &FormView, palette: &Palette) {
        if view.loading {
            let spinner = LoadingSpinner::new(self.frame_count, "Analyzing...")
                .colors(palette.accent, palette.text_dim);
            f.render_widget(spinner, area);
        } else if let Some(error) = &view.error {
            let error = Paragraph::new(error.as_str()).style(Style::default().fg(palette.danger));
            f.render_widget(error, area);
        }
    }
}

fn render_result(f: &mut Frame, area: Rect, view: &FormView, palette: &Palette) {
    let result = &view.result;

    // Until the reveal transition lands everything is drawn muted.
    let (verdict_color, sentiment_color, label_color) = if result.visible {
        (
            palette.verdict_color(result.verdict_class),
            palette.sentiment_color(result.sentiment_class),
            palette.text_dim,
        )
    } else {
        (palette.text_muted, palette.text_muted, palette.text_muted)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.border))
        .title(Span::styled(" Result ", Style::default().fg(palette.text_dim)));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    let label = |text: &'static str| Span::styled(text, Style::default().fg(label_color));

    let verdict = Paragraph::new(Line::from(vec![
        label("Verdict     "),
        Span::styled(
            result.verdict_text.as_str(),
            Style::default().fg(verdict_color).add_modifier(Modifier::BOLD),
        ),
    ]));
    f.render_widget(verdict, rows[0]);

    let sentiment = Paragraph::new(Line::from(vec![
        label("Sentiment   "),
        Span::styled(result.sentiment_text.as_str(), Style::default().fg(sentiment_color)),
    ]));
    f.render_widget(sentiment, rows[1]);

    let gauge_row = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(12), Constraint::Min(1)])
        .split(rows[2]);
    f.render_widget(Paragraph::new(Line::from(label("Confidence  "))), gauge_row[0]);

    let fill = if result.visible {
        palette.bar_color(result.bar.tone)
    } else {
        palette.text_muted
    };
    let gauge = ConfidenceGauge::new(result.bar.width, &result.confidence_text)
        .fill(fill)
        .track(palette.border)
        .label_color(verdict_color);
    f.render_widget(gauge, gauge_row[1]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use std::sync::Mutex;
    use veritas_client::decode_response;
    use veritas_core::{EMPTY_INPUT_MESSAGE, MemoryThemeStore, REVEAL_DELAY, SubmitState, Theme};

    struct ScriptedAnalyzer {
        status: u16,
        body: &'static str,
        requests: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Analyzer for ScriptedAnalyzer {
        async fn analyze(&self, text: &str) -> veritas_client::Result<AnalysisResult> {
            self.requests.lock().unwrap().push(text.to_string());
            decode_response(self.status, self.body)
        }
    }

    fn analyzer(status: u16, body: &'static str) -> Arc<ScriptedAnalyzer> {
        Arc::new(ScriptedAnalyzer {
            status,
            body,
            requests: Mutex::new(Vec::new()),
        })
    }

    fn app_with(model_loaded: bool, analyzer: Arc<ScriptedAnalyzer>) -> App<MemoryThemeStore> {
        let form = FormController::new(Some(model_loaded), MemoryThemeStore::new());
        App::new(form, analyzer, "http://127.0.0.1:5000")
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn type_text(app: &mut App<MemoryThemeStore>, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
    }

    /// Wait for the spawned request and feed its outcome back.
    async fn complete_request(app: &mut App<MemoryThemeStore>, now: Instant) {
        let msg = app
            .async_rx
            .as_mut()
            .expect("request in flight")
            .recv()
            .await
            .expect("analysis outcome");
        app.handle_async_message(msg, now);
    }

    fn screen(app: &App<MemoryThemeStore>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer.cell((x, y)).map(|c| c.symbol()).unwrap_or(" "));
            }
            out.push('\n');
        }
        out
    }

    #[tokio::test]
    async fn test_enter_on_empty_input_shows_validation_error() {
        let analyzer = analyzer(200, r#"{"verdict":"fake"}"#);
        let mut app = app_with(true, analyzer.clone());

        type_text(&mut app, "   ");
        app.handle_key(key(KeyCode::Enter));

        assert!(app.async_rx.is_none());
        assert!(analyzer.requests.lock().unwrap().is_empty());
        assert!(screen(&app).contains(EMPTY_INPUT_MESSAGE));
    }

    #[tokio::test]
    async fn test_successful_analysis_is_drawn() {
        let analyzer = analyzer(
            200,
            r#"{"verdict":"genuine","sentiment":"positive","confidence":87.3}"#,
        );
        let mut app = app_with(true, analyzer.clone());

        type_text(&mut app, "  great product ");
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.form().state(), SubmitState::Loading);
        assert!(screen(&app).contains("Analyzing..."));

        // Typing is ignored while the request is in flight.
        type_text(&mut app, "x");
        assert_eq!(app.input().value, "  great product ");

        let now = Instant::now();
        complete_request(&mut app, now).await;
        app.form.on_frame(now + REVEAL_DELAY);

        assert_eq!(
            analyzer.requests.lock().unwrap().as_slice(),
            ["great product".to_string()]
        );
        let text = screen(&app);
        assert!(text.contains("GENUINE"));
        assert!(text.contains("Positive"));
        assert!(text.contains("87.3%"));
        assert!(!app.form().view().input_disabled);
    }

    #[tokio::test]
    async fn test_server_error_is_drawn() {
        let analyzer = analyzer(503, r#"{"error":"model unavailable"}"#);
        let mut app = app_with(true, analyzer);

        type_text(&mut app, "hello");
        app.handle_key(key(KeyCode::Enter));
        complete_request(&mut app, Instant::now()).await;

        let text = screen(&app);
        assert!(text.contains("model unavailable"));
        assert!(!text.contains("Verdict"));
    }

    #[tokio::test]
    async fn test_model_unavailable_blocks_everything() {
        let analyzer = analyzer(200, r#"{"verdict":"fake"}"#);
        let mut app = app_with(false, analyzer.clone());

        type_text(&mut app, "hello");
        app.handle_paste("pasted");
        app.handle_key(key(KeyCode::Enter));

        assert!(app.input().is_empty());
        assert!(app.async_rx.is_none());
        assert!(analyzer.requests.lock().unwrap().is_empty());
        assert!(screen(&app).contains(MODEL_NOTICE));
    }

    #[test]
    fn test_theme_toggle_and_quit_keys() {
        let mut app = app_with(true, analyzer(200, "{}"));
        assert_eq!(app.form().theme(), Theme::Dark);

        app.handle_key(ctrl('t'));
        assert_eq!(app.form().theme(), Theme::Light);
        assert_eq!(app.form().store().value(), Some("light"));

        assert!(!app.should_quit());
        app.handle_key(key(KeyCode::Esc));
        assert!(app.should_quit());
    }

    #[test]
    fn test_editing_keys() {
        let mut app = app_with(true, analyzer(200, "{}"));
        type_text(&mut app, "abc");
        app.handle_key(key(KeyCode::Backspace));
        app.handle_key(key(KeyCode::Home));
        app.handle_key(key(KeyCode::Delete));
        assert_eq!(app.input().value, "b");

        app.handle_paste("line\r\nnext");
        assert_eq!(app.input().value, "line\nnextb");

        app.handle_key(ctrl('u'));
        assert!(app.input().is_empty());
    }
}
