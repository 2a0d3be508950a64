use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use modal_tui::{Command, Content, Dialog, DialogStack, Host, InputEvent, StackError};
use pretty_assertions::assert_eq;

struct Named {
    name: &'static str,
    seen: Rc<RefCell<Vec<String>>>,
}

impl Content for Named {
    fn render(&mut self, _width: usize, _height: usize) -> String {
        self.name.to_string()
    }

    fn handle_event(&mut self, event: &InputEvent) -> Command {
        if let InputEvent::Key { key_id, .. } = event {
            self.seen.borrow_mut().push(format!("{}:{key_id}", self.name));
        }
        Command::None
    }
}

fn host_with(names: &[&'static str]) -> (Host, Rc<RefCell<Vec<String>>>) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut stack = DialogStack::new();
    stack.set_size(40, 8);
    for name in names {
        let content = Named {
            name,
            seen: Rc::clone(&seen),
        };
        stack.register(*name, Dialog::new(name.to_uppercase(), content).close_on_single_esc(true));
    }
    (Host::new(stack), seen)
}

#[test]
fn stack_is_lifo_and_only_top_sees_keys() {
    let now = Instant::now();
    let (mut host, seen) = host_with(&["files", "confirm"]);
    host.show("files", now);
    host.show("confirm", now);
    assert_eq!(host.stack().depth(), 2);

    host.feed_raw("y", now);
    host.hide(now);
    host.feed_raw("j", now);

    assert_eq!(seen.borrow().clone(), vec!["confirm:y".to_string(), "files:j".to_string()]);
    assert_eq!(host.stack().active_name(), Some("files"));
}

#[test]
fn showing_the_top_dialog_again_changes_nothing() {
    let now = Instant::now();
    let (mut host, _) = host_with(&["files"]);
    host.show("files", now);
    host.show("files", now);
    assert_eq!(host.stack().depth(), 1);
    assert!(host.stack().is_visible());
}

#[test]
fn self_closed_dialog_is_never_left_on_the_stack() {
    let now = Instant::now();
    let (mut host, _) = host_with(&["files", "confirm"]);
    host.show("files", now);
    host.show("confirm", now);

    host.feed_raw("\x1b", now);
    assert_eq!(host.stack().active_name(), Some("files"));
    assert!(!host.stack().is_open("confirm"));
    assert!(host.frame().contains("FILES"));

    host.feed_raw("\x1b", now);
    assert!(!host.stack().is_visible());
    assert_eq!(host.frame(), "");
}

#[test]
fn unknown_dialog_names_are_reported() {
    let (mut host, _) = host_with(&["files"]);
    assert_eq!(
        host.stack_mut().try_show("nope").err(),
        Some(StackError::UnknownDialog("nope".to_string()))
    );
    assert_eq!(StackError::UnknownDialog("nope".to_string()).to_string(), "no dialog registered under 'nope'");
}

#[test]
fn hide_all_empties_the_stack() {
    let now = Instant::now();
    let (mut host, _) = host_with(&["a", "b", "c"]);
    for name in ["a", "b", "c"] {
        host.show(name, now);
    }
    host.stack_mut().hide_all();
    assert_eq!(host.stack().depth(), 0);
    assert!(host.stack().is_registered("b"));
}

/// Small deterministic generator so the sequence is reproducible.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        self.0 >> 33
    }
}

#[test]
fn generated_show_hide_sequences_keep_stack_discipline() {
    const NAMES: [&str; 5] = ["a", "b", "c", "d", "e"];
    let now = Instant::now();

    for seed in 1..=20u64 {
        let (mut host, _) = host_with(&NAMES);
        let mut rng = Lcg(seed);
        let mut expected_depth: usize = 0;
        let mut shown: Vec<&str> = Vec::new();

        for step in 0..60 {
            if rng.next() % 3 == 0 {
                host.hide(now);
                expected_depth = expected_depth.saturating_sub(1);
                shown.pop();
            } else {
                let name = NAMES[(rng.next() % NAMES.len() as u64) as usize];
                if !shown.contains(&name) {
                    expected_depth += 1;
                }
                shown.retain(|entry| *entry != name);
                shown.push(name);
                host.show(name, now);
                assert_eq!(host.stack().active_name(), Some(name), "seed {seed} step {step}");
            }

            assert_eq!(host.stack().depth(), expected_depth, "seed {seed} step {step}");
            assert_eq!(host.stack().active_name(), shown.last().copied(), "seed {seed} step {step}");
        }
    }
}
