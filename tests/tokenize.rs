//! End-to-end tokenization with the standard rules and custom rule files.

use std::io::Write;

use relex::lexer::{
    DELIMITER_TAG, Lexer, LexerConfig, LexerError, LexicalError, PatternError, RuleSpec,
    SymbolTable, Token,
};

fn pairs(tokens: &[Token]) -> Vec<(&str, &str)> {
    tokens.iter().map(Token::pair).collect()
}

fn lex(src: &str) -> Vec<Token> {
    Lexer::standard().unwrap().tokenize(src).unwrap()
}

fn custom(rules: &[(&str, &str)]) -> Lexer {
    let config = LexerConfig {
        rules: rules.iter().map(|(p, t)| RuleSpec::new(p, t)).collect(),
        ..LexerConfig::default()
    };
    Lexer::new(&config).unwrap()
}

#[test]
fn simple_declaration() {
    let toks = lex("int x = 5;");
    assert_eq!(
        pairs(&toks),
        vec![
            ("DATATYPE", "int"),
            ("IDENTIFIER", "x"),
            ("OPERATOR", "="),
            ("NUMBER", "5"),
            (DELIMITER_TAG, ";"),
        ]
    );
    let spans: Vec<(usize, usize)> = toks.iter().map(|t| (t.start, t.len)).collect();
    assert_eq!(spans, vec![(0, 3), (4, 1), (6, 1), (8, 1), (9, 1)]);
}

#[test]
fn mixed_program_and_symbol_table() {
    let src = "int x      = (5); bool y = true; char x = 'y'; // This is a comment int x\n \
               int al = 5.5; /* multi line comment */";
    let mut lexer = Lexer::standard().unwrap();
    let toks = lexer.tokenize(src).unwrap();
    assert_eq!(
        pairs(&toks),
        vec![
            ("DATATYPE", "int"),
            ("IDENTIFIER", "x"),
            ("OPERATOR", "="),
            (DELIMITER_TAG, "("),
            ("NUMBER", "5"),
            (DELIMITER_TAG, ")"),
            (DELIMITER_TAG, ";"),
            ("DATATYPE", "bool"),
            ("IDENTIFIER", "y"),
            ("OPERATOR", "="),
            ("BOOLEAN_LITERAL", "true"),
            (DELIMITER_TAG, ";"),
            ("DATATYPE", "char"),
            ("IDENTIFIER", "x"),
            ("OPERATOR", "="),
            ("CHARACTER", "'y'"),
            (DELIMITER_TAG, ";"),
            ("COMMENT", "// This is a comment int x"),
            ("DATATYPE", "int"),
            ("IDENTIFIER", "al"),
            ("OPERATOR", "="),
            ("DECIMAL", "5.5"),
            (DELIMITER_TAG, ";"),
            ("MULTI_COMMENT", "/* multi line comment */"),
        ]
    );

    let table: Vec<(&str, &str)> = lexer
        .symbols()
        .iter()
        .map(|e| (e.name.as_str(), e.ty.as_str()))
        .collect();
    assert_eq!(
        table,
        vec![
            ("int", "DATATYPE"),
            ("x", "IDENTIFIER"),
            ("=", "OPERATOR"),
            ("(", DELIMITER_TAG),
            ("5", "NUMBER"),
            (")", DELIMITER_TAG),
            (";", DELIMITER_TAG),
            ("bool", "DATATYPE"),
            ("y", "IDENTIFIER"),
            ("true", "BOOLEAN_LITERAL"),
            ("char", "DATATYPE"),
            ("'y'", "CHARACTER"),
            ("al", "IDENTIFIER"),
            ("5.5", "DECIMAL"),
        ]
    );
    assert!(!lexer.symbols().contains("/* multi line comment */"));
}

#[test]
fn longest_match_beats_rule_order() {
    assert_eq!(pairs(&lex("integer")), vec![("IDENTIFIER", "integer")]);
    assert_eq!(pairs(&lex("12.75")), vec![("DECIMAL", "12.75")]);
    assert_eq!(pairs(&lex("falsey")), vec![("IDENTIFIER", "falsey")]);

    let mut lexer = custom(&[("^a$", "A"), ("^ab$", "AB")]);
    assert_eq!(pairs(&lexer.tokenize("ab").unwrap()), vec![("AB", "ab")]);
}

#[test]
fn equal_length_goes_to_the_earlier_rule() {
    let mut first = custom(&[("^[a-z]+$", "WORD"), ("^abc$", "ABC")]);
    assert_eq!(pairs(&first.tokenize("abc").unwrap()), vec![("WORD", "abc")]);

    let mut second = custom(&[("^abc$", "ABC"), ("^[a-z]+$", "WORD")]);
    assert_eq!(pairs(&second.tokenize("abc").unwrap()), vec![("ABC", "abc")]);
    assert_eq!(pairs(&second.tokenize("abcd").unwrap()), vec![("WORD", "abcd")]);
}

#[test]
fn match_at_reports_the_winning_rule() {
    let lexer = Lexer::standard().unwrap();
    let chars: Vec<char> = "x = true".chars().collect();
    let (rule, m) = lexer.match_at(&chars, 4).unwrap();
    assert_eq!(lexer.rules()[rule].tag(), "BOOLEAN_LITERAL");
    assert_eq!(m.length, 4);
    assert!(lexer.match_at(&chars, 1).is_none());
}

#[test]
fn operators_and_comments() {
    assert_eq!(
        pairs(&lex("a / b * c")),
        vec![
            ("IDENTIFIER", "a"),
            ("OPERATOR", "/"),
            ("IDENTIFIER", "b"),
            ("OPERATOR", "*"),
            ("IDENTIFIER", "c"),
        ]
    );
    assert_eq!(
        pairs(&lex("x // note\ny")),
        vec![("IDENTIFIER", "x"), ("COMMENT", "// note"), ("IDENTIFIER", "y")]
    );
    // `.*` is greedy, so a block comment runs to the last `*/` on its line.
    assert_eq!(
        pairs(&lex("/* a */ x /* b */")),
        vec![("MULTI_COMMENT", "/* a */ x /* b */")]
    );
    // Without a closing `*/` the pieces fall back to operators.
    assert_eq!(
        pairs(&lex("/* a")),
        vec![("OPERATOR", "/"), ("OPERATOR", "*"), ("IDENTIFIER", "a")]
    );
}

#[test]
fn whitespace_only_and_empty_inputs() {
    assert!(lex("").is_empty());
    assert!(lex(" \t\r\n  ").is_empty());
}

#[test]
fn delimiters_are_recorded_in_the_symbol_table() {
    let mut lexer = Lexer::standard().unwrap();
    let toks = lexer.tokenize("{(,)}").unwrap();
    assert!(toks.iter().all(|t| t.tag == DELIMITER_TAG && t.len == 1));
    assert_eq!(lexer.symbols().len(), 5);
    assert_eq!(lexer.symbols().lookup("{").unwrap().ty, DELIMITER_TAG);
}

#[test]
fn lexical_error_reports_offset_and_char() {
    let mut lexer = Lexer::standard().unwrap();
    assert_eq!(
        lexer.tokenize("int X = 5;"),
        Err(LexicalError { offset: 4, ch: 'X' })
    );
    assert_eq!(
        lexer.tokenize("x = 5 @"),
        Err(LexicalError { offset: 6, ch: '@' })
    );
    // offsets count chars, not bytes
    assert_eq!(
        lexer.tokenize("é é"),
        Err(LexicalError { offset: 0, ch: 'é' })
    );
    assert_eq!(
        lexer.tokenize("x = é").unwrap_err().to_string(),
        "lexical error at offset 4: unexpected character 'é'"
    );
}

#[test]
fn symbol_table_keeps_the_first_type() {
    let mut table = SymbolTable::new();
    assert!(table.is_empty());
    assert!(table.insert("x", "IDENTIFIER"));
    assert!(!table.insert("x", "NUMBER"));
    assert_eq!(table.len(), 1);
    assert_eq!(table.lookup("x").unwrap().ty, "IDENTIFIER");
    assert!(table.lookup("y").is_none());

    let rendered = table.to_string();
    assert!(rendered.contains("Symbol Table"));
    assert!(rendered.contains("x               IDENTIFIER"));

    table.clear();
    assert!(table.is_empty() && !table.contains("x"));
}

#[test]
fn symbols_accumulate_across_calls() {
    let mut lexer = Lexer::standard().unwrap();
    lexer.tokenize("x = 1;").unwrap();
    lexer.tokenize("x = y;").unwrap();
    let names: Vec<&str> = lexer.symbols().iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["x", "=", "1", ";", "y"]);
    lexer.symbols_mut().clear();
    assert!(lexer.symbols().is_empty());
}

#[test]
fn config_from_json() {
    let cfg = LexerConfig::from_json_str(
        r#"{
            "rules": [
                {"pattern": "^[a-z]+$", "tag": "WORD"},
                {"pattern": "^#.*$", "tag": "NOTE", "comment": true}
            ],
            "delimiters": "|",
            "minimize": "target_identity"
        }"#,
    )
    .unwrap();
    assert_eq!(cfg.rules.len(), 2);
    assert!(cfg.rules[1].comment);

    let mut lexer = Lexer::new(&cfg).unwrap();
    let toks = lexer.tokenize("ab|cd #rest").unwrap();
    assert_eq!(
        pairs(&toks),
        vec![
            ("WORD", "ab"),
            (DELIMITER_TAG, "|"),
            ("WORD", "cd"),
            ("NOTE", "#rest"),
        ]
    );
    assert!(!lexer.symbols().contains("#rest"));
    // `;` is not a delimiter here
    assert!(lexer.tokenize(";").is_err());
}

#[test]
fn config_defaults_and_unminimized() {
    let cfg = LexerConfig::from_json_str(r#"{"rules": [{"pattern": "^[0-9]+$", "tag": "N"}]}"#)
        .unwrap();
    assert_eq!(cfg.delimiters, ";,(){}");
    let expected = LexerConfig {
        rules: vec![RuleSpec::new("^[0-9]+$", "N")],
        ..LexerConfig::default()
    };
    assert_eq!(cfg, expected);

    let raw = LexerConfig::from_json_str(
        r#"{"rules": [{"pattern": "^[0-9]+$", "tag": "N"}], "minimize": null}"#,
    )
    .unwrap();
    assert_eq!(raw.minimize, None);
    let mut lexer = Lexer::new(&raw).unwrap();
    assert_eq!(
        pairs(&lexer.tokenize("12;3").unwrap()),
        vec![("N", "12"), (DELIMITER_TAG, ";"), ("N", "3")]
    );
}

#[test]
fn config_from_file() {
    let dir = std::env::temp_dir().join(format!("relex-config-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("rules.json");
    let mut f = std::fs::File::create(&path).unwrap();
    writeln!(f, r#"{{"rules": [{{"pattern": "^[a-z]+$", "tag": "W"}}]}}"#).unwrap();
    drop(f);

    let cfg = LexerConfig::from_json_path(&path).unwrap();
    assert_eq!(cfg.rules[0].tag, "W");

    let missing = LexerConfig::from_json_path(&dir.join("nope.json"));
    assert!(matches!(missing, Err(LexerError::Io(_))));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn config_errors() {
    assert!(matches!(
        LexerConfig::from_json_str(r#"{"delimiters": ";"}"#),
        Err(LexerError::Json(_))
    ));
    assert!(matches!(
        LexerConfig::from_json_str(r#"{"rules": [{"pattern": "a", "tag": " "}]}"#),
        Err(LexerError::Config(_))
    ));
    assert!(matches!(
        LexerConfig::from_json_str(r#"{"rules": [], "delimiters": "; "}"#),
        Err(LexerError::Config(_))
    ));
}

#[test]
fn malformed_rule_names_the_earliest_offender() {
    let config = LexerConfig {
        rules: vec![
            RuleSpec::new("^[a-z]+$", "OK"),
            RuleSpec::new("(ab", "BROKEN"),
            RuleSpec::new("[]", "ALSO_BROKEN"),
        ],
        ..LexerConfig::default()
    };
    match Lexer::new(&config) {
        Err(LexerError::Pattern {
            tag,
            pattern,
            source,
        }) => {
            assert_eq!(tag, "BROKEN");
            assert_eq!(pattern, "(ab");
            assert_eq!(source, PatternError::UnmatchedParen { position: 0 });
        }
        Err(other) => panic!("unexpected error {other}"),
        Ok(_) => panic!("malformed rule accepted"),
    }
}

#[test]
fn tokens_serialize_to_json() {
    let toks = lex("x;");
    let v = serde_json::to_value(&toks).unwrap();
    assert_eq!(
        v,
        serde_json::json!([
            {"tag": "IDENTIFIER", "text": "x", "start": 0, "len": 1},
            {"tag": "DELIMITER", "text": ";", "start": 1, "len": 1},
        ])
    );
}
