use fleet_log::Level;

#[test]
fn parse_is_case_insensitive_and_round_trips() {
    let cases = [
        ("debug", Level::Debug),
        ("DEBUG", Level::Debug),
        ("Info", Level::Info),
        ("iNfO", Level::Info),
        ("warn", Level::Warn),
        ("WARN", Level::Warn),
        ("error", Level::Error),
        ("Error", Level::Error),
    ];
    for (text, expected) in cases {
        let level: Level = text.parse().expect(text);
        assert_eq!(level, expected);
        assert_eq!(level.to_string(), text.to_ascii_lowercase());
        assert_eq!(level.as_str().parse::<Level>().unwrap(), level);
    }
}

#[test]
fn parse_rejects_unknown_text() {
    for text in ["", "trace", "warning", "fatal", " info", "info ", "err", "1"] {
        assert!(text.parse::<Level>().is_err(), "{text:?} should not parse");
    }
}

#[test]
fn is_at_least_matches_fixed_order_exhaustively() {
    let rank = |l: Level| match l {
        Level::Debug => 0,
        Level::Info => 1,
        Level::Warn => 2,
        Level::Error => 3,
    };
    let mut checked = 0;
    for candidate in Level::ALL {
        for threshold in Level::ALL {
            assert_eq!(
                candidate.is_at_least(threshold),
                rank(candidate) >= rank(threshold),
                "{candidate} vs {threshold}"
            );
            checked += 1;
        }
    }
    assert_eq!(checked, 16);
    assert!(Level::Debug < Level::Info && Level::Info < Level::Warn && Level::Warn < Level::Error);
}

#[test]
fn default_level_is_info() {
    assert_eq!(Level::default(), Level::Info);
}
