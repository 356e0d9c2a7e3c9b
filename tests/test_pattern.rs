use rat_mask::{
    FormatCharacters, FormatClass, MaskEngine, MaskError, MaskOptions, Pattern, PatternError, Slot,
};

fn compile(source: &str) -> Result<Pattern, PatternError> {
    Pattern::compile(source, &FormatCharacters::default(), '_', false)
}

#[test]
fn test_slots() {
    let p = compile("(111) 111-1111").expect("ok");
    assert_eq!(p.len(), 14);
    assert_eq!(p.first_editable(), 1);
    assert_eq!(p.last_editable(), 13);
    assert_eq!(p.slot(0), Some(&Slot::Static('(')));
    assert!(p.is_editable(1));
    assert!(!p.is_editable(4));
    assert!(p.is_literal('-'));
    assert!(!p.is_literal('1'));
    assert_eq!(p.slots().iter().filter(|v| v.is_editable()).count(), 10);
}

#[test]
fn test_escape() {
    let p = compile("\\1-11").expect("ok");
    assert_eq!(p.len(), 4);
    assert_eq!(p.literal_at(0), Some('1'));
    assert_eq!(p.literal_at(1), Some('-'));
    assert_eq!(p.first_editable(), 2);
    assert_eq!(p.last_editable(), 3);
    assert_eq!(p.empty_value(), "1-__");

    let p = compile("\\\\1").expect("ok");
    assert_eq!(p.len(), 2);
    assert_eq!(p.literal_at(0), Some('\\'));
    assert_eq!(p.empty_value(), "\\_");
}

#[test]
fn test_errors() {
    assert_eq!(
        compile("11\\").err(),
        Some(PatternError::DanglingEscape("11\\".into()))
    );
    assert_eq!(
        compile("---").err(),
        Some(PatternError::NoEditableSlots("---".into()))
    );
    assert_eq!(
        compile("\\1\\a").err(),
        Some(PatternError::NoEditableSlots("\\1\\a".into()))
    );
    assert_eq!(
        compile("").err(),
        Some(PatternError::NoEditableSlots("".into()))
    );
    assert!(Pattern::compile("111", &FormatCharacters::empty(), '_', false).is_err());

    assert_eq!(
        MaskEngine::new("11\\").err(),
        Some(MaskError::Pattern(PatternError::DanglingEscape(
            "11\\".into()
        )))
    );
}

#[test]
fn test_format_value() {
    let p = compile("(111) 111-1111").expect("ok");

    let buf = p.format_value(&"5551234567".chars().collect::<Vec<_>>());
    assert_eq!(p.render(&buf), "(555) 123-4567");
    assert_eq!(p.raw_value(&buf), "5551234567");

    // static chars in the raw value are taken as they are
    let buf = p.format_value(&"(555) 12".chars().collect::<Vec<_>>());
    assert_eq!(p.render(&buf), "(555) 12_-____");
    assert_eq!(p.raw_value(&buf), "55512_____");
}

#[test]
fn test_format_idempotent() {
    let p = compile("(111) 111-1111").expect("ok");

    let empty = p.format_value(&[]);
    assert_eq!(empty.len(), 14);
    assert_eq!(p.format_value(&empty), empty);

    let partial = "(5_5) 1__-__67".chars().collect::<Vec<_>>();
    assert_eq!(p.format_value(&partial), partial);
}

#[test]
fn test_revealing() {
    let p = Pattern::compile("11/11", &FormatCharacters::default(), '_', true).expect("ok");
    assert!(p.is_revealing());
    assert_eq!(p.empty_value(), "");

    let buf = p.format_value(&['1']);
    assert_eq!(buf.iter().collect::<String>(), "1_/__");
    assert_eq!(p.render(&buf), "1");

    let buf = p.format_value(&['1', '2']);
    assert_eq!(p.render(&buf), "12/");
    assert_eq!(p.raw_value(&buf), "12");

    // stops at the first invalid char
    let buf = p.format_value(&['1', 'x', '3']);
    assert_eq!(p.render(&buf), "1");

    let mut m = MaskEngine::new(MaskOptions::new("11/11").revealing_mask(true)).expect("ok");
    assert_eq!(m.value(), "");
    assert!(m.is_empty());
    m.input('1');
    assert_eq!(m.value(), "1");
    m.input('2');
    assert_eq!(m.value(), "12/");
    assert_eq!(m.selection(), 3..3);
    m.input('3');
    assert_eq!(m.value(), "12/3");
    assert_eq!(m.raw_value(), "123");
}

#[test]
fn test_format_overrides() {
    let m = MaskEngine::new(MaskOptions::new("xx-11").format_char('x', FormatClass::any()))
        .expect("ok");
    assert_eq!(m.value(), "__-__");
    assert!(m.pattern().is_editable(0));
    assert!(m.format_characters().contains('x'));

    let m = MaskEngine::new(MaskOptions::new("a-1").remove_format_char('a')).expect("ok");
    assert_eq!(m.value(), "a-_");
    assert_eq!(m.pattern().first_editable(), 2);

    let r = MaskEngine::new(MaskOptions::new("aaa").remove_format_char('a'));
    assert_eq!(
        r.err(),
        Some(MaskError::Pattern(PatternError::NoEditableSlots(
            "aaa".into()
        )))
    );
}

#[test]
fn test_placeholder() {
    let m = MaskEngine::new(MaskOptions::new("11-11").placeholder(" ")).expect("ok");
    assert_eq!(m.placeholder(), ' ');
    assert_eq!(m.value(), "  -  ");
    assert_eq!(m.empty_value(), "  -  ");

    assert_eq!(
        MaskEngine::new(MaskOptions::new("111").placeholder("")).err(),
        Some(MaskError::InvalidPlaceholder("".into()))
    );
    assert_eq!(
        MaskEngine::new(MaskOptions::new("111").placeholder("ab")).err(),
        Some(MaskError::InvalidPlaceholder("ab".into()))
    );
}
