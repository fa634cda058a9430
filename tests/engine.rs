use eca::prelude::*;
use eca::render::{render_automaton, Palette};
use eca::session::Session;

#[test]
fn codec_round_trips_every_code() {
    for c in 0..=255i64 {
        let rule = decode_rule(c).unwrap();
        assert_eq!(i64::from(encode_rule(rule.bits()).unwrap()), c);
    }
}

#[test]
fn sierpinski_from_text_input() {
    let initial = fit_to_width(&parse_bit_string("1"), 7).unwrap();
    assert_eq!(initial.to_bit_string(), "0001000");

    let gens = run_automaton(&initial, &decode_rule(90).unwrap(), 4, Boundary::Fixed).unwrap();
    let rows: Vec<String> = gens.iter().map(Row::to_bit_string).collect();
    assert_eq!(rows, ["0001000", "0010100", "0100010", "1010101"]);
}

#[test]
fn rule_30_center_column_is_not_constant() {
    let initial = fit_to_width(&[], 101).unwrap();
    let gens = run_automaton(&initial, &Rule::from_code(30), 50, Boundary::Periodic).unwrap();
    let center: Vec<u8> = gens.iter().map(|r| r[50]).collect();
    assert!(center.contains(&0));
    assert!(center.contains(&1));
}

#[test]
fn malformed_inputs_fail_with_invalid_argument() {
    let row = fit_to_width(&[], 5).unwrap();
    let rule = Rule::from_code(90);
    assert!(decode_rule(256).unwrap_err().is_invalid_argument());
    assert!(encode_rule(&[1; 7]).unwrap_err().is_invalid_argument());
    assert!(fit_to_width(&[1], 0).unwrap_err().is_invalid_argument());
    assert!(run_automaton(&row, &rule, 0, Boundary::Fixed).unwrap_err().is_invalid_argument());
    assert!(random_row(0).unwrap_err().is_invalid_argument());
}

#[test]
fn history_does_not_alias_initial_row() {
    let initial = fit_to_width(&[1, 1, 0, 1], 9).unwrap();
    let before = initial.clone();
    let gens = run_automaton(&initial, &Rule::from_code(110), 5, Boundary::Periodic).unwrap();
    assert_eq!(initial, before);
    assert_eq!(gens[0], initial);
}

#[test]
fn session_render_matches_direct_render() {
    let cfg = EcaConfig::default().with_size(21, 10).with_boundary(Boundary::Periodic);
    let session = Session::new(cfg.clone()).unwrap();
    let gens = cfg.run().unwrap();
    let direct = render_automaton(&gens, &cfg.rule, &Palette::default(), 4, cfg.boundary).unwrap();
    assert_eq!(session.render().unwrap().pixels(), direct.pixels());
}
