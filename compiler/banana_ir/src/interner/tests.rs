use super::*;

#[test]
fn test_intern_and_lookup() {
    let interner = StringInterner::new();

    let fac = interner.intern("fac");
    let print = interner.intern("print");
    let fac2 = interner.intern("fac");

    assert_eq!(fac, fac2);
    assert_ne!(fac, print);

    assert_eq!(interner.lookup(fac), "fac");
    assert_eq!(interner.lookup(print), "print");
}

#[test]
fn test_empty_string() {
    let interner = StringInterner::new();
    assert_eq!(interner.intern(""), Name::EMPTY);
    assert_eq!(interner.lookup(Name::EMPTY), "");
    assert!(interner.is_empty());
}

#[test]
fn test_special_forms_pre_interned() {
    let interner = StringInterner::new();

    assert_eq!(interner.intern("if"), well_known::IF);
    assert_eq!(interner.intern("define"), well_known::DEFINE);
    assert_eq!(interner.intern("lambda"), well_known::LAMBDA);
    assert_eq!(interner.lookup(well_known::LAMBDA), "lambda");
}

#[test]
fn test_foreign_name_resolves_empty() {
    let interner = StringInterner::new();
    assert_eq!(interner.lookup(Name::from_raw(10_000)), "");
}

#[test]
fn test_shared_interner() {
    let interner = SharedInterner::new();
    let interner2 = interner.clone();

    let name1 = interner.intern("shared");
    let name2 = interner2.intern("shared");

    assert_eq!(name1, name2);
    assert!(!interner.is_empty());
    assert_eq!(interner2.lookup(name1), "shared");
}
