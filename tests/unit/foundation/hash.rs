use super::*;

#[test]
fn incremental_hash_is_stable_across_splits() {
    let mut a = StableHasher::new();
    a.write_bytes(b"design");
    let mut b = StableHasher::new();
    b.write_u8(b'd');
    b.write_bytes(b"esign");
    assert_eq!(a.finish(), b.finish());
}

#[test]
fn encoded_strings_do_not_collide_on_concatenation() {
    let mut a = StableHasher::new();
    a.put(&"ab".to_owned());
    a.put(&"c".to_owned());
    let mut b = StableHasher::new();
    b.put(&"a".to_owned());
    b.put(&"bc".to_owned());
    assert_ne!(a.finish(), b.finish());
}

#[test]
fn absent_and_zero_options_differ() {
    let mut a = StableHasher::new();
    a.write_opt_f32(None);
    a.write_f32(0.0);
    let mut b = StableHasher::new();
    b.write_opt_f32(Some(0.0));
    assert_ne!(a.finish(), b.finish());
}

#[test]
fn one_shot_hash_distinguishes_inputs() {
    assert_eq!(hash_bytes(b"shader"), hash_bytes(b"shader"));
    assert_ne!(hash_bytes(b"shader a"), hash_bytes(b"shader b"));
}
