// src/bin/fuzz_lex.rs
// Generate random-but-valid inputs and tokenize them three ways: Moore-minimized
// DFAs, target-identity-minimized DFAs and unminimized DFAs. All three must agree.
//   - FUZZ_LEN / FUZZ_ITERS / FUZZ_SEED   size, count and seed
//   - FUZZ_SAVE=1 and FUZZ_DIR=...        save generated cases
//   - FUZZ_INPUT=path                     replay a saved case
//   - FUZZ_EX_DIR=<dir>                   handcrafted cases (default: "lexer_tests");
//                                         a sidecar <case>.tokens.json golden is checked
//                                         when present: {"tokens":[{"tag":"..","text":".."}]}

use std::{
    fs,
    path::{Path, PathBuf},
    time::Instant,
};

use anyhow::{Context, Result, anyhow};
use rand::{SeedableRng, rngs::StdRng};
use relex::{
    dev::generator::gen_valid_source,
    lexer::{Lexer, LexerConfig, Token, automata::Refinement},
};

#[derive(serde::Deserialize)]
struct Golden {
    tokens: Vec<GoldenTok>,
}

#[derive(serde::Deserialize)]
struct GoldenTok {
    tag: String,
    text: String,
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

struct Lexers {
    moore: Lexer,
    identity: Lexer,
    raw: Lexer,
}

impl Lexers {
    fn build() -> Result<Self> {
        let base = LexerConfig::default();
        Ok(Self {
            moore: Lexer::new(&base.clone().with_minimize(Some(Refinement::Partition)))?,
            identity: Lexer::new(&base.clone().with_minimize(Some(Refinement::TargetIdentity)))?,
            raw: Lexer::new(&base.with_minimize(None))?,
        })
    }
}

fn first_divergence(a: &[Token], b: &[Token]) -> usize {
    a.iter()
        .zip(b.iter())
        .position(|(x, y)| x != y)
        .unwrap_or(a.len().min(b.len()))
}

fn dump_near(label: &str, a: &[Token], b: &[Token], from: usize) {
    let lo = from.saturating_sub(1);
    let hi = (from + 3).min(a.len().max(b.len()));
    eprintln!("--- {label} context tokens [{lo}..{hi}) ---");
    for i in lo..hi {
        let x = a.get(i).map(Token::pair);
        let y = b.get(i).map(Token::pair);
        let mark = if x == y { "ok " } else { "BAD" };
        eprintln!("{mark} #{i:06} moore={x:?}  other={y:?}");
    }
}

fn check_against_golden(src_label: &str, toks: &[Token], golden: &Golden) -> bool {
    if toks.len() != golden.tokens.len() {
        eprintln!(
            "[golden:{src_label}] count mismatch: got={} expected={}",
            toks.len(),
            golden.tokens.len()
        );
        return false;
    }
    for (i, (got, want)) in toks.iter().zip(golden.tokens.iter()).enumerate() {
        if got.tag != want.tag || got.text != want.text {
            eprintln!(
                "[golden:{src_label}] mismatch at {i}:\n  got:  {:?}\n  want: ({:?}, {:?})",
                got.pair(),
                want.tag,
                want.text
            );
            return false;
        }
    }
    true
}

fn load_golden_for(case: &Path) -> Result<Option<Golden>> {
    let p = case.with_extension("tokens.json");
    if !p.exists() {
        return Ok(None);
    }
    let s = fs::read_to_string(&p).with_context(|| format!("reading {}", p.display()))?;
    let g = serde_json::from_str(&s).with_context(|| format!("parsing {}", p.display()))?;
    Ok(Some(g))
}

/// Tokenizes `src` with all three lexers; returns false on any disagreement.
fn run_once(lexers: &mut Lexers, src: &str, golden: Option<&Golden>) -> bool {
    let t0 = Instant::now();
    let moore = match lexers.moore.tokenize(src) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("[moore] {e}");
            return false;
        }
    };
    let elapsed = t0.elapsed();

    for (label, lexer) in [("identity", &mut lexers.identity), ("raw", &mut lexers.raw)] {
        let other = match lexer.tokenize(src) {
            Ok(t) => t,
            Err(e) => {
                eprintln!("[{label}] {e}");
                return false;
            }
        };
        if other != moore {
            let i = first_divergence(&moore, &other);
            eprintln!(
                "[{label}] diverged at token {i} (moore={} other={})",
                moore.len(),
                other.len()
            );
            dump_near(label, &moore, &other, i);
            return false;
        }
    }

    if let Some(g) = golden {
        if !check_against_golden("case", &moore, g) {
            return false;
        }
    }

    eprintln!(
        "[run] {} chars -> {} tokens in {:?}",
        src.chars().count(),
        moore.len(),
        elapsed
    );
    true
}

fn collect_examples() -> Vec<PathBuf> {
    let dir = std::env::var("FUZZ_EX_DIR").unwrap_or_else(|_| "lexer_tests".to_string());
    let Ok(rd) = fs::read_dir(&dir) else {
        return Vec::new();
    };
    let mut v: Vec<PathBuf> = rd
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("src"))
        .collect();
    v.sort();
    v
}

fn main() -> Result<()> {
    let mut lexers = Lexers::build()?;

    // --- REPLAY A SINGLE CASE ---
    if let Ok(path) = std::env::var("FUZZ_INPUT") {
        eprintln!("[replay] reading {path}");
        let s = fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
        let golden = load_golden_for(Path::new(&path))?;
        if !run_once(&mut lexers, &s, golden.as_ref()) {
            return Err(anyhow!("replay of {path} failed"));
        }
        return Ok(());
    }

    // --- HANDCRAFTED EXAMPLES ---
    let examples = collect_examples();
    if !examples.is_empty() {
        eprintln!("[ex] running {} handcrafted example(s)", examples.len());
        for p in &examples {
            let s = fs::read_to_string(p).with_context(|| format!("reading {}", p.display()))?;
            let golden = load_golden_for(p)?;
            eprintln!("[ex] {}", p.display());
            if !run_once(&mut lexers, &s, golden.as_ref()) {
                return Err(anyhow!("example {} failed", p.display()));
            }
        }
    }

    // --- FUZZ MODE ---
    let save_cases = std::env::var("FUZZ_SAVE").ok().as_deref() == Some("1");
    let out_dir = std::env::var("FUZZ_DIR").unwrap_or_else(|_| "fuzz-cases".to_string());
    let len: usize = env_or("FUZZ_LEN", 100_000);
    let iters: usize = env_or("FUZZ_ITERS", 3);
    let seed: u64 = env_or("FUZZ_SEED", 42);

    eprintln!("[fuzz] len={len} iters={iters} seed={seed}");
    let mut rng = StdRng::seed_from_u64(seed);
    if save_cases {
        fs::create_dir_all(&out_dir).with_context(|| format!("creating {out_dir}"))?;
    }

    for i in 0..iters {
        let s = gen_valid_source(&mut rng, len);
        eprintln!("[fuzz] iter {i}: generated {} bytes", s.len());

        if save_cases {
            let path = Path::new(&out_dir).join(format!("seed{seed}_iter{i}_n{}.src", s.len()));
            fs::write(&path, &s).with_context(|| format!("writing {}", path.display()))?;
            let meta = serde_json::json!({
                "target_len": len,
                "actual_bytes": s.len(),
                "seed": seed,
                "iter": i,
                "replay": format!("FUZZ_INPUT={} cargo run --bin fuzz_lex", path.display()),
            });
            fs::write(path.with_extension("json"), serde_json::to_string_pretty(&meta)?)?;
            eprintln!("[save] wrote {}", path.display());
        }

        if !run_once(&mut lexers, &s, None) {
            return Err(anyhow!("iteration {i} (seed {seed}) diverged"));
        }
    }
    eprintln!("[fuzz] all iterations matched");
    Ok(())
}
