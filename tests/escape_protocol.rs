use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use modal_tui::{Clock, Command, Content, Dialog, DialogStack, DialogTiming, Host, InputEvent, ThemeRequest};

struct FixedClock {
    now: Cell<Instant>,
}

impl Clock for FixedClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

#[derive(Debug, PartialEq, Eq)]
struct ThemeChanged;

struct Themed;

impl Content for Themed {
    fn render(&mut self, _width: usize, _height: usize) -> String {
        "themed".to_string()
    }

    fn as_theme_request(&mut self) -> Option<&mut dyn ThemeRequest> {
        Some(self)
    }
}

impl ThemeRequest for Themed {
    fn request_theme(&mut self) -> Command {
        Command::emit(ThemeChanged)
    }
}

struct Rig {
    host: Host,
    closes: Rc<Cell<usize>>,
    clock: Rc<FixedClock>,
    start: Instant,
}

impl Rig {
    fn new(close_on_single_esc: bool) -> Self {
        let start = Instant::now();
        let clock = Rc::new(FixedClock { now: Cell::new(start) });
        let closes = Rc::new(Cell::new(0));
        let counter = Rc::clone(&closes);
        let dialog = Dialog::new("Settings", Themed)
            .close_on_single_esc(close_on_single_esc)
            .with_clock(clock.clone())
            .on_close(move || {
                counter.set(counter.get() + 1);
                Command::None
            });

        let mut stack = DialogStack::new();
        stack.set_size(80, 24);
        stack.register("settings", dialog);
        let mut host = Host::new(stack);
        host.show("settings", start);
        Self {
            host,
            closes,
            clock,
            start,
        }
    }

    fn at(&self, ms: u64) -> Instant {
        let now = self.start + Duration::from_millis(ms);
        self.clock.now.set(now);
        now
    }

    fn visible(&self) -> bool {
        self.host.stack().is_open("settings")
    }
}

#[test]
fn single_escape_closes_80x24_dialog_before_next_render() {
    let mut rig = Rig::new(true);
    let now = rig.at(0);
    rig.host.feed_raw("\x1b", now);
    assert!(!rig.visible());
    assert_eq!(rig.closes.get(), 1);
    assert_eq!(rig.host.frame(), "");
}

#[test]
fn double_escape_closes_once() {
    let mut rig = Rig::new(false);
    let now = rig.at(0);
    rig.host.feed_raw("\x1b", now);
    assert!(rig.visible());
    assert!(rig.host.stack().active().is_some_and(Dialog::is_escape_armed));

    let now = rig.at(120);
    rig.host.feed_raw("\x1b", now);
    assert!(!rig.visible());
    assert_eq!(rig.closes.get(), 1);

    // The armed timeout still fires later and must be harmless.
    let now = rig.at(300);
    rig.host.pump(now);
    assert_eq!(rig.closes.get(), 1);
}

#[test]
fn escape_then_timeout_disarms_and_next_escape_is_a_fresh_first() {
    let mut rig = Rig::new(false);
    let now = rig.at(0);
    rig.host.feed_raw("\x1b", now);
    assert_eq!(rig.host.next_deadline(), Some(now + Duration::from_millis(300)));

    let now = rig.at(300);
    assert_eq!(rig.host.pump(now), 1);
    assert!(rig.visible());
    assert!(rig.host.stack().active().is_some_and(|dialog| !dialog.is_escape_armed()));

    let now = rig.at(310);
    rig.host.feed_raw("\x1b", now);
    assert!(rig.visible());
    assert_eq!(rig.closes.get(), 0);
}

#[test]
fn escape_zero_closes_and_escape_two_requests_theme() {
    let mut rig = Rig::new(false);
    let now = rig.at(0);
    rig.host.feed_raw("\x1b", now);
    rig.host.feed_raw("2", now);
    assert!(rig.visible());
    let emitted = rig.host.take_emitted();
    assert_eq!(emitted.len(), 1);
    assert_eq!(emitted[0].downcast_ref::<ThemeChanged>(), Some(&ThemeChanged));

    rig.host.feed_raw("\x1b", now);
    rig.host.feed_raw("5", now);
    assert!(rig.visible());
    assert!(rig.host.take_emitted().is_empty());

    rig.host.feed_raw("\x1b", now);
    rig.host.feed_raw("0", now);
    assert!(!rig.visible());
    assert_eq!(rig.closes.get(), 1);
}

#[test]
fn escape_and_digit_in_one_chunk() {
    let mut rig = Rig::new(false);
    let now = rig.at(0);
    rig.host.feed_raw("\x1b0", now);
    assert!(!rig.visible());
    assert_eq!(rig.closes.get(), 1);
}

#[test]
fn late_second_escape_only_rearms() {
    let mut rig = Rig::new(false);
    let now = rig.at(0);
    rig.host.feed_raw("\x1b", now);
    // Timeout event not yet pumped, but the deadline has passed.
    let now = rig.at(450);
    rig.host.enqueue(InputEvent::key("escape"));
    rig.host.pump(now);
    assert!(rig.visible());
    assert_eq!(rig.closes.get(), 0);
}

#[test]
fn timing_is_configurable() {
    let start = Instant::now();
    let timing = DialogTiming {
        escape_timeout: Duration::from_millis(50),
        ..DialogTiming::default()
    };
    let mut stack = DialogStack::new();
    stack.register("d", Dialog::new("D", Themed).with_timing(timing));
    let mut host = Host::new(stack);
    host.show("d", start);
    host.feed_raw("\x1b", start);
    assert_eq!(host.next_deadline(), Some(start + Duration::from_millis(50)));
}
