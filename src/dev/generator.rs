// src/dev/generator.rs
// Random-but-valid source for the standard rule set. Shared by fuzz_lex and
// the size-sweep tests.

use rand::Rng;

const DATATYPES: &[&str] = &["int", "float", "char", "bool"];
const BOOLEANS: &[&str] = &["true", "false"];
const OPERATORS: &[char] = &['=', '+', '-', '*', '/', '%', '^'];
const DELIMITERS: &[char] = &[';', ',', '(', ')', '{', '}'];
const SEPARATORS: &[&str] = &[" ", " ", " ", "\n", "\t", "  "];

fn pick<'a, T, R: Rng + ?Sized>(rng: &mut R, items: &'a [T]) -> &'a T {
    &items[rng.random_range(0..items.len())]
}

fn ident<R: Rng + ?Sized>(rng: &mut R) -> String {
    let len = rng.random_range(1..=8);
    (0..len)
        .map(|_| char::from(b'a' + rng.random_range(0..26u8)))
        .collect()
}

fn digits<R: Rng + ?Sized>(rng: &mut R) -> String {
    let len = rng.random_range(1..=6);
    (0..len)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect()
}

/// Printable ASCII, minus chars that would end or confuse the comment.
fn comment_body<R: Rng + ?Sized>(rng: &mut R) -> String {
    let len = rng.random_range(0..24);
    (0..len)
        .map(|_| loop {
            let c = char::from(rng.random_range(b' '..=b'~'));
            if c != '*' && c != '/' {
                break c;
            }
        })
        .collect()
}

fn piece<R: Rng + ?Sized>(rng: &mut R) -> String {
    match rng.random_range(0..100) {
        0..=7 => pick(rng, DATATYPES).to_string(),
        8..=11 => pick(rng, BOOLEANS).to_string(),
        12..=39 => ident(rng),
        40..=44 => format!("'{}'", char::from(rng.random_range(b'a'..=b'z'))),
        45..=59 => digits(rng),
        60..=66 => format!("{}.{}", digits(rng), digits(rng)),
        67..=79 => pick(rng, OPERATORS).to_string(),
        80..=93 => pick(rng, DELIMITERS).to_string(),
        94..=96 => format!("// {}\n", comment_body(rng)),
        _ => format!("/* {} */", comment_body(rng)),
    }
}

/// Produces at least `target_len` chars of input that the standard lexer
/// accepts without error, always ending in a safe `;\n` trailer.
pub fn gen_valid_source<R: Rng + ?Sized>(rng: &mut R, target_len: usize) -> String {
    let mut out = String::with_capacity(target_len + 64);
    while out.len() < target_len {
        out.push_str(&piece(rng));
        out.push_str(*pick(rng, SEPARATORS));
    }
    out.push_str(";\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn respects_target_and_trailer() {
        let mut rng = StdRng::seed_from_u64(7);
        for target in [0, 1, 17, 300] {
            let s = gen_valid_source(&mut rng, target);
            assert!(s.len() >= target);
            assert!(s.ends_with(";\n"));
            assert!(s.is_ascii());
        }
    }

    #[test]
    fn pieces_are_whitespace_separated() {
        let mut rng = StdRng::seed_from_u64(11);
        let s = gen_valid_source(&mut rng, 200);
        let body = s.trim_end_matches(";\n");
        assert!(body.chars().filter(|c| c.is_whitespace()).count() >= 2);
        assert!(body.ends_with(|c: char| c.is_whitespace()));
    }
}
