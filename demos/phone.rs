//!
//! Runs a scripted edit session against a phone number mask
//! and prints the field after each step.
//!
//! Log output goes to mask.log.
//!

use log::debug;
use rat_mask::{MaskEngine, MaskOptions};
use std::fs;
use std::path::PathBuf;

#[derive(Debug)]
enum Step {
    Type(&'static str),
    Backspace(usize),
    Select(u32, u32),
    Paste(&'static str),
    Undo,
    Redo,
}

fn main() -> Result<(), anyhow::Error> {
    setup_logging()?;

    let mut m = MaskEngine::new(MaskOptions::new("\\+\\1 (111) 111-1111"))?;
    show(&m, "start");

    let script = [
        Step::Type("55512"),
        Step::Backspace(2),
        Step::Type("x"),
        Step::Type("5551234567"),
        Step::Select(0, 17),
        Step::Paste("+1 (800) 555-0199"),
        Step::Paste("80a"),
        Step::Undo,
        Step::Undo,
        Step::Redo,
        Step::Redo,
    ];

    for step in script {
        let ok = match &step {
            Step::Type(s) => s.chars().fold(true, |ok, c| m.input(c) && ok),
            Step::Backspace(n) => (0..*n).fold(true, |ok, _| m.backspace() && ok),
            Step::Select(start, end) => {
                m.set_selection(*start..*end);
                true
            }
            Step::Paste(s) => m.paste(s),
            Step::Undo => m.undo(),
            Step::Redo => m.redo(),
        };
        debug!("{:?} -> {}", step, ok);
        show(&m, &format!("{:?} {}", step, if ok { "ok" } else { "rejected" }));
    }

    Ok(())
}

fn show(m: &MaskEngine, label: &str) {
    let sel = m.selection();
    println!(
        "{:<40} {:<20} raw={:<12} sel={}..{}",
        label,
        m.value(),
        m.raw_value(),
        sel.start,
        sel.end
    );
}

fn setup_logging() -> Result<(), anyhow::Error> {
    let log = PathBuf::from("mask.log");
    if log.exists() {
        fs::remove_file(&log)?;
    }
    fern::Dispatch::new()
        .format(|out, message, _record| out.finish(format_args!("{}", message)))
        .level(log::LevelFilter::Debug)
        .chain(fern::log_file(&log)?)
        .apply()?;
    Ok(())
}
