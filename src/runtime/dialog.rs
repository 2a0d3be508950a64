//! A single modal dialog: sizing, escape sequencing, delegation, composition.

use std::rc::Rc;
use std::time::Duration;

use crate::core::command::Command;
use crate::core::component::{Capabilities, Content, KeyHint};
use crate::core::input_event::InputEvent;
use crate::core::text::utils::fit_to_width;
use crate::render::chrome::{footer_line, framed, normalize_block, title_rule, DOUBLE, ROUNDED};
use crate::render::overlay::{composite_window, window_placement, WindowPlacement};
use crate::runtime::next_event_token;
use crate::runtime::sequencer::{
    EscapeSequencer, SequencerAction, SharedClock, SystemClock, DEFAULT_ESCAPE_TIMEOUT,
};

pub const DEFAULT_REDRAW_INTERVAL: Duration = Duration::from_millis(100);

type CloseCallback = Box<dyn FnMut() -> Command>;
type BackgroundProvider = Box<dyn FnMut() -> String>;

/// Timing constants for a dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialogTiming {
    /// How long an armed Escape waits for a second key.
    pub escape_timeout: Duration,
    /// Cadence of backdrop refreshes when a background provider is set.
    pub redraw_interval: Duration,
}

impl Default for DialogTiming {
    fn default() -> Self {
        Self {
            escape_timeout: DEFAULT_ESCAPE_TIMEOUT,
            redraw_interval: DEFAULT_REDRAW_INTERVAL,
        }
    }
}

/// Result of routing one event through a dialog.
#[derive(Debug, Default)]
pub struct DialogUpdate {
    pub command: Command,
    /// The dialog closed itself; its owner must stop showing it.
    pub close_requested: bool,
}

impl DialogUpdate {
    fn command(command: Command) -> Self {
        Self {
            command,
            close_requested: false,
        }
    }
}

/// Requested window size; the placement is recomputed on every render.
#[derive(Debug, Clone, Copy)]
struct Window {
    width: usize,
    height: usize,
}

/// Geometry of one render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialogLayout {
    pub interior_width: usize,
    pub interior_height: usize,
    pub content_offset: (usize, usize),
    pub window: Option<WindowPlacement>,
}

pub struct Dialog {
    title: String,
    content: Box<dyn Content>,
    capabilities: Capabilities,
    width: usize,
    height: usize,
    sequencer: EscapeSequencer,
    window: Option<Window>,
    static_background: String,
    background_provider: Option<BackgroundProvider>,
    on_close: Option<CloseCallback>,
    content_offset: (usize, usize),
    redraw_interval: Duration,
    redraw_token: Option<u64>,
}

impl Dialog {
    pub fn new(title: impl Into<String>, content: impl Content + 'static) -> Self {
        Self::from_boxed(title, Box::new(content))
    }

    pub fn from_boxed(title: impl Into<String>, mut content: Box<dyn Content>) -> Self {
        let capabilities = Capabilities::detect(content.as_mut());
        let timing = DialogTiming::default();
        Self {
            title: title.into(),
            content,
            capabilities,
            width: 1,
            height: 1,
            sequencer: EscapeSequencer::new(false, timing.escape_timeout, Rc::new(SystemClock)),
            window: None,
            static_background: String::new(),
            background_provider: None,
            on_close: None,
            content_offset: (0, 0),
            redraw_interval: timing.redraw_interval,
            redraw_token: None,
        }
    }

    pub fn close_on_single_esc(mut self, value: bool) -> Self {
        self.sequencer.set_close_on_single_esc(value);
        self
    }

    /// Render as a `width` x `height` window floating over a backdrop.
    pub fn windowed(mut self, width: usize, height: usize) -> Self {
        self.set_windowed(width, height);
        self
    }

    pub fn static_background(mut self, background: impl Into<String>) -> Self {
        self.set_static_background(background);
        self
    }

    pub fn background_provider(mut self, provider: impl FnMut() -> String + 'static) -> Self {
        self.set_background_provider(provider);
        self
    }

    pub fn on_close(mut self, callback: impl FnMut() -> Command + 'static) -> Self {
        self.on_close = Some(Box::new(callback));
        self
    }

    pub fn with_timing(mut self, timing: DialogTiming) -> Self {
        self.sequencer.set_timeout(timing.escape_timeout);
        self.redraw_interval = timing.redraw_interval;
        self
    }

    pub fn with_clock(mut self, clock: SharedClock) -> Self {
        self.sequencer.set_clock(clock);
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_size(&mut self, width: usize, height: usize) {
        self.width = width.max(1);
        self.height = height.max(1);
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Replaces the content; the previous content is dropped.
    pub fn set_content(&mut self, content: impl Content + 'static) {
        self.set_boxed_content(Box::new(content));
    }

    pub fn set_boxed_content(&mut self, mut content: Box<dyn Content>) {
        self.capabilities = Capabilities::detect(content.as_mut());
        self.content = content;
        self.sequencer.reset();
    }

    pub fn content_mut(&mut self) -> &mut dyn Content {
        self.content.as_mut()
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn set_windowed(&mut self, width: usize, height: usize) {
        self.window = Some(Window { width, height });
    }

    pub fn set_full_screen(&mut self) {
        self.window = None;
        self.redraw_token = None;
    }

    pub fn is_windowed(&self) -> bool {
        self.window.is_some()
    }

    /// Static backdrop, drawn only while windowed. Kept across mode switches.
    pub fn set_static_background(&mut self, background: impl Into<String>) {
        self.static_background = background.into();
    }

    /// Live backdrop, drawn only while windowed. Kept across mode switches.
    ///
    /// Takes effect for redraw scheduling on the next `open` or `resume`.
    pub fn set_background_provider(&mut self, provider: impl FnMut() -> String + 'static) {
        self.background_provider = Some(Box::new(provider));
    }

    pub fn is_escape_armed(&self) -> bool {
        self.sequencer.is_armed()
    }

    pub fn close_on_single_escape(&self) -> bool {
        self.sequencer.close_on_single_esc()
    }

    /// Translation applied to pointer events, as of the latest render.
    pub fn content_offset(&self) -> (usize, usize) {
        self.content_offset
    }

    /// Called when the dialog is shown: content initialization plus the first
    /// backdrop refresh.
    pub fn open(&mut self) -> Command {
        self.sequencer.reset();
        let init = self.content.init();
        Command::batch([init, self.start_redraw()])
    }

    /// Called when the dialog becomes topmost again after the one above it closed.
    pub fn resume(&mut self) -> Command {
        self.sequencer.reset();
        self.start_redraw()
    }

    pub fn update(&mut self, event: &InputEvent) -> DialogUpdate {
        if let InputEvent::RedrawTick { token } = event {
            return DialogUpdate::command(self.continue_redraw(*token));
        }

        match self.sequencer.process(event, self.capabilities.theme) {
            SequencerAction::Close => self.close(),
            SequencerAction::RequestTheme => {
                tracing::debug!(title = %self.title, "theme requested");
                let command = self
                    .content
                    .as_theme_request()
                    .map(|content| content.request_theme())
                    .unwrap_or_default();
                DialogUpdate::command(command)
            }
            SequencerAction::Consumed(command) => DialogUpdate::command(command),
            SequencerAction::PassThrough => DialogUpdate::command(self.forward(event)),
        }
    }

    pub fn view(&mut self) -> String {
        let layout = self.layout();
        self.content_offset = layout.content_offset;

        let (inner_width, inner_height) = (layout.interior_width, layout.interior_height);
        if self.capabilities.sizable {
            if let Some(content) = self.content.as_sizable() {
                content.set_dimensions(inner_width, inner_height);
            }
        }
        let body = normalize_block(&self.content.render(inner_width, inner_height), inner_width, inner_height);

        let lines = match layout.window {
            Some(placement) => {
                let window = framed(&self.title, body, placement.width, &DOUBLE);
                let backdrop = self.backdrop();
                composite_window(&backdrop, &window, placement, self.width, self.height)
            }
            None if self.capabilities.viewer => {
                let mut lines = Vec::with_capacity(body.len() + 1);
                lines.push(title_rule(&self.title, self.width, &ROUNDED, false));
                lines.extend(body);
                lines
            }
            None => framed(&self.title, body, self.width, &ROUNDED),
        };

        let footer = footer_line(&self.footer_hints(), self.width);
        let mut frame: Vec<String> = lines
            .into_iter()
            .take(self.height - 1)
            .map(|line| fit_to_width(&line, self.width))
            .collect();
        while frame.len() < self.height - 1 {
            frame.push(" ".repeat(self.width));
        }
        frame.push(footer);
        frame.join("\n")
    }

    /// Geometry for the current size and mode.
    pub fn layout(&self) -> DialogLayout {
        match self.window.as_ref() {
            Some(window) => {
                let placement = window_placement(self.width, self.height, window.width, window.height);
                let (interior_width, interior_height) = placement.interior_size();
                DialogLayout {
                    interior_width,
                    interior_height,
                    content_offset: placement.interior_origin(),
                    window: Some(placement),
                }
            }
            None if self.capabilities.viewer => DialogLayout {
                interior_width: self.width.max(1),
                interior_height: self.height.saturating_sub(2).max(1),
                content_offset: (0, 0),
                window: None,
            },
            None => DialogLayout {
                interior_width: self.width.saturating_sub(2).max(1),
                interior_height: self.height.saturating_sub(3).max(1),
                content_offset: (0, 0),
                window: None,
            },
        }
    }

    pub fn footer_hints(&self) -> Vec<KeyHint> {
        let mut hints = Vec::new();
        if self.sequencer.close_on_single_esc() {
            hints.push(KeyHint::new("Esc", "Close"));
        }
        if self.capabilities.footer_hints {
            if let Some(content) = self.content.as_footer_hints() {
                hints.extend(content.footer_hints());
            }
        }
        hints
    }

    fn close(&mut self) -> DialogUpdate {
        tracing::debug!(title = %self.title, "dialog closed by escape sequence");
        self.sequencer.reset();
        self.redraw_token = None;
        let command = self.on_close.as_mut().map(|callback| callback()).unwrap_or_default();
        DialogUpdate {
            command,
            close_requested: true,
        }
    }

    fn forward(&mut self, event: &InputEvent) -> Command {
        match event {
            InputEvent::Mouse(mouse) => {
                // Size may have changed since the last render.
                self.content_offset = self.layout().content_offset;
                let (dx, dy) = self.content_offset;
                let local = mouse.translated(dx as i32, dy as i32);
                self.content.handle_event(&InputEvent::Mouse(local))
            }
            InputEvent::Resize { columns, rows } => {
                self.set_size(usize::from(*columns), usize::from(*rows));
                self.content.handle_event(event)
            }
            _ => self.content.handle_event(event),
        }
    }

    fn has_background_provider(&self) -> bool {
        self.window.is_some() && self.background_provider.is_some()
    }

    fn start_redraw(&mut self) -> Command {
        if !self.has_background_provider() {
            self.redraw_token = None;
            return Command::None;
        }
        let token = next_event_token();
        self.redraw_token = Some(token);
        Command::schedule(self.redraw_interval, InputEvent::RedrawTick { token })
    }

    fn continue_redraw(&mut self, token: u64) -> Command {
        if self.redraw_token != Some(token) || !self.has_background_provider() {
            return Command::None;
        }
        Command::schedule(self.redraw_interval, InputEvent::RedrawTick { token })
    }

    fn backdrop(&mut self) -> String {
        if let Some(provider) = self.background_provider.as_mut() {
            let live = provider();
            if !live.is_empty() {
                return live;
            }
        }
        if !self.static_background.is_empty() {
            return self.static_background.clone();
        }
        vec![" ".repeat(self.width); self.height].join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::component::{FooterHints, Sizable, ThemeRequest};
    use crate::core::input_event::{MouseEvent, MouseKind};
    use crate::core::text::ansi::strip_ansi;
    use crate::core::text::width::visible_width;
    use crate::runtime::sequencer::tests::ManualClock;
    use std::cell::{Cell, RefCell};

    #[derive(Default)]
    struct Stub {
        events: Rc<RefCell<Vec<InputEvent>>>,
        dims: Rc<Cell<(usize, usize)>>,
        viewer: bool,
    }

    impl Content for Stub {
        fn render(&mut self, width: usize, height: usize) -> String {
            self.dims.set((width, height));
            "body".to_string()
        }

        fn handle_event(&mut self, event: &InputEvent) -> Command {
            self.events.borrow_mut().push(event.clone());
            Command::None
        }

        fn as_footer_hints(&self) -> Option<&dyn FooterHints> {
            Some(self)
        }

        fn as_theme_request(&mut self) -> Option<&mut dyn ThemeRequest> {
            Some(self)
        }

        fn as_sizable(&mut self) -> Option<&mut dyn Sizable> {
            Some(self)
        }

        fn is_viewer(&self) -> bool {
            self.viewer
        }
    }

    impl FooterHints for Stub {
        fn footer_hints(&self) -> Vec<KeyHint> {
            vec![KeyHint::new("↑↓", "Move")]
        }
    }

    impl ThemeRequest for Stub {
        fn request_theme(&mut self) -> Command {
            Command::emit("theme")
        }
    }

    impl Sizable for Stub {
        fn set_dimensions(&mut self, width: usize, height: usize) {
            self.dims.set((width + 1000, height + 1000));
        }
    }

    fn lines(view: &str) -> Vec<String> {
        view.split('\n').map(strip_ansi).collect()
    }

    #[test]
    fn full_screen_interior_reserves_borders_and_footer() {
        let stub = Stub::default();
        let dims = Rc::clone(&stub.dims);
        let mut dialog = Dialog::new("Settings", stub);
        dialog.set_size(80, 24);
        let view = dialog.view();
        assert_eq!(dims.get(), (78, 21));
        let rows = lines(&view);
        assert_eq!(rows.len(), 24);
        assert!(rows[0].starts_with('╭'));
        assert!(rows[1].starts_with("│body"));
        assert!(rows[22].starts_with('╰'));
        assert!(rows.iter().all(|row| visible_width(row) == 80));
    }

    #[test]
    fn viewer_content_is_borderless_and_full_width() {
        let stub = Stub {
            viewer: true,
            ..Stub::default()
        };
        let dims = Rc::clone(&stub.dims);
        let mut dialog = Dialog::new("Log", stub);
        dialog.set_size(40, 10);
        let rows = lines(&dialog.view());
        assert_eq!(dims.get(), (40, 8));
        assert_eq!(rows.len(), 10);
        assert!(rows[1].starts_with("body"));
        assert!(!rows.iter().any(|row| row.contains('╰')));
        assert_eq!(dialog.content_offset(), (0, 0));
    }

    #[test]
    fn footer_lists_close_hint_then_content_hints() {
        let mut dialog = Dialog::new("S", Stub::default()).close_on_single_esc(true);
        dialog.set_size(40, 6);
        let rows = lines(&dialog.view());
        assert_eq!(rows[5].trim_end(), "Esc Close ↑↓ Move");

        let mut confirm = Dialog::new("S", Stub::default());
        confirm.set_size(40, 6);
        let rows = lines(&confirm.view());
        assert_eq!(rows[5].trim_end(), "↑↓ Move");
    }

    #[test]
    fn tiny_sizes_still_render() {
        let mut dialog = Dialog::new("Title", Stub::default());
        dialog.set_size(0, 0);
        let view = dialog.view();
        assert_eq!(view.split('\n').count(), 1);

        dialog.set_size(3, 2);
        assert_eq!(dialog.view().split('\n').count(), 2);
    }

    #[test]
    fn windowed_dialog_composites_over_static_background() {
        let background = vec!["#".repeat(20); 10].join("\n");
        let mut dialog = Dialog::new("W", Stub::default())
            .windowed(8, 4)
            .static_background(background);
        dialog.set_size(20, 10);
        let rows = lines(&dialog.view());
        assert_eq!(rows.len(), 10);
        assert_eq!(rows[0], "#".repeat(20));
        assert_eq!(&rows[2], "######╔═ W ══╗######");
        assert_eq!(&rows[3], "######║body  ║######");
        assert_eq!(&rows[5], "######╚══════╝######");
        assert_eq!(dialog.content_offset(), (7, 3));
    }

    #[test]
    fn live_background_wins_unless_empty() {
        let frame = Rc::new(RefCell::new(String::from("live")));
        let source = Rc::clone(&frame);
        let mut dialog = Dialog::new("W", Stub::default())
            .windowed(4, 3)
            .static_background("static")
            .background_provider(move || source.borrow().clone());
        dialog.set_size(12, 8);
        assert!(lines(&dialog.view())[0].starts_with("live"));

        frame.borrow_mut().clear();
        assert!(lines(&dialog.view())[0].starts_with("static"));
    }

    #[test]
    fn background_survives_builder_order_and_mode_switches() {
        let background = vec!["#".repeat(20); 10].join("\n");
        let mut dialog = Dialog::new("W", Stub::default())
            .static_background(background)
            .background_provider(String::new)
            .windowed(8, 4);
        dialog.set_size(20, 10);
        assert_eq!(lines(&dialog.view())[0], "#".repeat(20));
        assert!(matches!(dialog.open(), Command::Schedule { .. }));

        dialog.set_full_screen();
        assert!(dialog.open().is_none());
        dialog.set_windowed(8, 4);
        assert_eq!(lines(&dialog.view())[0], "#".repeat(20));
        assert!(matches!(dialog.resume(), Command::Schedule { .. }));
    }

    #[test]
    fn mouse_events_are_translated_into_window_space() {
        let stub = Stub::default();
        let events = Rc::clone(&stub.events);
        let mut dialog = Dialog::new("W", stub).windowed(8, 4);
        dialog.set_size(20, 10);
        dialog.update(&InputEvent::Mouse(MouseEvent {
            column: 9,
            row: 4,
            kind: MouseKind::Move,
        }));
        assert_eq!(
            events.borrow().as_slice(),
            &[InputEvent::Mouse(MouseEvent {
                column: 2,
                row: 1,
                kind: MouseKind::Move,
            })]
        );
    }

    #[test]
    fn set_dimensions_runs_before_render() {
        let stub = Stub::default();
        let dims = Rc::clone(&stub.dims);
        let mut dialog = Dialog::new("S", stub);
        dialog.set_size(10, 10);
        dialog.view();
        // render() overwrites what set_dimensions stored, so it ran second.
        assert_eq!(dims.get(), (8, 7));
    }

    #[test]
    fn escape_then_two_requests_theme_without_closing() {
        let clock = ManualClock::new();
        let mut dialog = Dialog::new("S", Stub::default()).with_clock(clock);
        let armed = dialog.update(&InputEvent::key("escape"));
        assert!(!armed.close_requested);
        assert!(dialog.is_escape_armed());
        let theme = dialog.update(&InputEvent::key("2"));
        assert!(!theme.close_requested);
        assert!(matches!(theme.command, Command::Emit(_)));
        assert!(!dialog.is_escape_armed());
    }

    #[test]
    fn close_callback_fires_once_per_close() {
        let closes = Rc::new(Cell::new(0));
        let counter = Rc::clone(&closes);
        let mut dialog = Dialog::new("S", Stub::default()).on_close(move || {
            counter.set(counter.get() + 1);
            Command::None
        });
        dialog.update(&InputEvent::key("escape"));
        let update = dialog.update(&InputEvent::key("escape"));
        assert!(update.close_requested);
        assert_eq!(closes.get(), 1);
    }

    #[test]
    fn redraw_ticks_only_with_live_background() {
        let mut plain = Dialog::new("S", Stub::default()).windowed(4, 4);
        assert!(plain.open().is_none());

        let mut live = Dialog::new("S", Stub::default())
            .windowed(4, 4)
            .background_provider(String::new);
        let token = match live.open() {
            Command::Schedule {
                after,
                event: InputEvent::RedrawTick { token },
            } => {
                assert_eq!(after, DEFAULT_REDRAW_INTERVAL);
                token
            }
            other => panic!("expected redraw schedule, got {other:?}"),
        };
        let next = live.update(&InputEvent::RedrawTick { token });
        assert!(matches!(next.command, Command::Schedule { .. }));
        let stale = live.update(&InputEvent::RedrawTick { token: token + 1 });
        assert!(stale.command.is_none());
    }

    #[test]
    fn replacing_content_redetects_capabilities() {
        struct Bare;
        impl Content for Bare {
            fn render(&mut self, _width: usize, _height: usize) -> String {
                String::new()
            }
        }

        let mut dialog = Dialog::new("S", Stub::default());
        assert!(dialog.capabilities().theme);
        dialog.set_content(Bare);
        assert_eq!(dialog.capabilities(), Capabilities::default());
    }
}
