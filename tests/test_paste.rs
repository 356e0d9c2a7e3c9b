use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rat_mask::undo_buffer::UndoEntry;
use rat_mask::MaskEngine;
use std::ops::Range;

const PHONE: &str = "(111) 111-1111";

fn state(m: &MaskEngine) -> (String, Range<u32>, Option<Vec<UndoEntry>>, Option<usize>) {
    (
        m.value(),
        m.selection(),
        m.undo_buffer().map(|v| v.entries().to_vec()),
        m.undo_buffer().map(|v| v.open_undo()),
    )
}

#[test]
fn test_paste_separators() -> Result<(), anyhow::Error> {
    let mut m = MaskEngine::with_pattern(PHONE)?;
    assert!(m.paste("555-1234567"));
    assert_eq!(m.value(), "(555) 123-4567");
    assert_eq!(m.raw_value(), "5551234567");
    assert_eq!(m.selection(), 14..14);

    let mut m = MaskEngine::with_pattern(PHONE)?;
    assert!(m.paste("(555) 123-4567"));
    assert_eq!(m.value(), "(555) 123-4567");

    let mut m = MaskEngine::with_pattern(PHONE)?;
    assert!(m.paste("5551234567"));
    assert_eq!(m.value(), "(555) 123-4567");
    Ok(())
}

#[test]
fn test_paste_stray_separator() -> Result<(), anyhow::Error> {
    let mut m = MaskEngine::with_pattern(PHONE)?;
    m.input('9');
    let before = state(&m);

    // a separator inside a digit group is not skipped
    assert!(!m.paste("5(5-5"));
    assert_eq!(state(&m), before);
    assert!(!m.paste("5-5"));
    assert_eq!(state(&m), before);

    // the one just passed and the next one ahead are
    let mut m = MaskEngine::with_pattern(PHONE)?;
    assert!(m.paste("555 123"));
    assert_eq!(m.value(), "(555) 123-____");
    let mut m = MaskEngine::with_pattern(PHONE)?;
    assert!(m.paste("555--123"));
    assert_eq!(m.value(), "(555) 123-____");
    Ok(())
}

#[test]
fn test_paste_rejected() -> Result<(), anyhow::Error> {
    let mut m = MaskEngine::with_pattern(PHONE)?;
    assert!(!m.paste("55a1234567"));
    assert_eq!(m.value(), "(___) ___-____");
    assert_eq!(m.selection(), 0..0);

    let mut m = MaskEngine::with_pattern(PHONE)?;
    m.input('9');
    let before = state(&m);
    assert!(!m.paste("55a1234567"));
    assert_eq!(state(&m), before);

    // typing still continues the same history entry
    m.input('8');
    assert_eq!(m.value(), "(98_) ___-____");
    assert_eq!(m.undo_buffer().expect("undo").entries().len(), 1);
    Ok(())
}

#[test]
fn test_paste_prefix() -> Result<(), anyhow::Error> {
    let mut m = MaskEngine::with_pattern("ID-1111")?;
    assert_eq!(m.pattern().first_editable(), 3);

    // the prefix is either complete or missing
    assert!(!m.paste("IX1234"));
    assert!(!m.paste("ID1234"));
    assert_eq!(m.value(), "ID-____");
    assert_eq!(m.selection(), 0..0);

    assert!(m.paste("ID-1234"));
    assert_eq!(m.value(), "ID-1234");

    let mut m = MaskEngine::with_pattern("ID-1111")?;
    assert!(m.paste("1234"));
    assert_eq!(m.value(), "ID-1234");

    // from inside the prefix only the rest is needed
    let mut m = MaskEngine::with_pattern("ID-1111")?;
    m.set_selection(1..1);
    assert_eq!(m.selection(), 3..3);
    m.move_left();
    m.move_left();
    assert_eq!(m.selection(), 1..1);
    assert!(m.paste("D-12"));
    assert_eq!(m.value(), "ID-12__");
    assert_eq!(m.selection(), 5..5);
    Ok(())
}

#[test]
fn test_paste_selection() -> Result<(), anyhow::Error> {
    let mut m = MaskEngine::with_pattern(PHONE)?;
    m.paste("5551234567");
    m.set_selection(6..14);
    assert!(m.paste("999"));
    assert_eq!(m.value(), "(555) 999-____");
    assert_eq!(m.selection(), 10..10);
    Ok(())
}

#[test]
fn test_paste_overflow() -> Result<(), anyhow::Error> {
    let mut m = MaskEngine::with_pattern(PHONE)?;
    assert!(m.paste("55512345678999"));
    assert_eq!(m.value(), "(555) 123-4567");
    assert_eq!(m.selection(), 14..14);

    // nothing left to fill
    assert!(m.paste("1"));
    assert_eq!(m.value(), "(555) 123-4567");
    Ok(())
}

#[test]
fn test_paste_undo() -> Result<(), anyhow::Error> {
    let mut m = MaskEngine::with_pattern(PHONE)?;
    assert!(m.paste("555-1234567"));
    assert_eq!(m.undo_buffer().expect("undo").entries().len(), 1);

    assert!(m.undo());
    assert!(m.is_empty());
    // the paste moved the cursor to the first slot before typing
    assert_eq!(m.selection(), 1..1);

    assert!(m.redo());
    assert_eq!(m.value(), "(555) 123-4567");
    assert_eq!(m.selection(), 14..14);
    assert!(!m.redo());
    Ok(())
}

#[test]
fn test_paste_atomic_random() -> Result<(), anyhow::Error> {
    let mut rng = StdRng::seed_from_u64(4711);
    let alphabet = "0123456789()- x".chars().collect::<Vec<_>>();

    for _ in 0..500 {
        let mut m = MaskEngine::with_pattern(PHONE)?;
        for _ in 0..rng.gen_range(0..5) {
            m.input(alphabet[rng.gen_range(0..10)]);
        }
        let a = rng.gen_range(0..=14);
        let b = rng.gen_range(0..=14);
        m.set_selection(a..b);

        let len = rng.gen_range(1..12);
        let text = (0..len)
            .map(|_| alphabet[rng.gen_range(0..alphabet.len())])
            .collect::<String>();

        let before = state(&m);
        if !m.paste(&text) {
            assert_eq!(state(&m), before, "paste {:?}", text);
        }
    }
    Ok(())
}
