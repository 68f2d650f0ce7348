use gestrokey::config::ParserConfig;
use gestrokey::direction::Direction8;
use gestrokey::library::{
    ActionId, GestureEntry, GestureKind, GestureLibrarySnapshot, PatternSpec,
};
use gestrokey::parser::parse_trail;
use gestrokey::types::Point;

fn simple_entry(name: &str, directions: Vec<Direction8>, action: &str) -> GestureEntry {
    GestureEntry {
        name: name.into(),
        pattern: PatternSpec::Sequence(directions),
        action: ActionId::from(action),
        kind: GestureKind::Simple,
        enabled: true,
    }
}

/// A long rightward drag with hand wobble: the wobble amplitude sits
/// above the simplifier tolerance, so the reduced polyline keeps enough
/// points for the stride walk while the heading stays solidly East.
fn wobbly_horizontal_trail() -> Vec<Point> {
    (0..=100)
        .map(|i| {
            let i = i as f64;
            Point::new(i * 3.0, 6.0 * (i * 0.35).sin())
        })
        .collect()
}

#[test]
fn too_few_samples_never_match() {
    let library =
        GestureLibrarySnapshot::from_entries(vec![simple_entry("east", vec![Direction8::East], "a")]);
    let trail: Vec<Point> = (0..4).map(|i| Point::new(i as f64 * 50.0, 0.0)).collect();

    let parsed = parse_trail(&trail, &ParserConfig::default(), &library);
    assert!(parsed.directions.is_empty());
    assert_eq!(parsed.action, None);

    // Deterministic: the same input skips the same way every time.
    let again = parse_trail(&trail, &ParserConfig::default(), &library);
    assert_eq!(parsed, again);
}

#[test]
fn wobbly_horizontal_stroke_matches_east_gesture() {
    let library = GestureLibrarySnapshot::from_entries(vec![
        simple_entry("wrong", vec![Direction8::West], "wrong-action"),
        simple_entry("east", vec![Direction8::East], "east-action"),
    ]);

    let parsed = parse_trail(&wobbly_horizontal_trail(), &ParserConfig::default(), &library);
    assert_eq!(parsed.directions, vec![Direction8::East]);
    assert_eq!(parsed.action, Some(ActionId::from("east-action")));
}

#[test]
fn pipeline_is_idempotent() {
    let library =
        GestureLibrarySnapshot::from_entries(vec![simple_entry("east", vec![Direction8::East], "a")]);
    let trail = wobbly_horizontal_trail();

    let first = parse_trail(&trail, &ParserConfig::default(), &library);
    let second = parse_trail(&trail, &ParserConfig::default(), &library);
    assert_eq!(first, second);
}

#[test]
fn unmatched_stroke_returns_directions_without_action() {
    let library = GestureLibrarySnapshot::from_entries(vec![simple_entry(
        "north",
        vec![Direction8::North],
        "north-action",
    )]);

    let parsed = parse_trail(&wobbly_horizontal_trail(), &ParserConfig::default(), &library);
    assert_eq!(parsed.directions, vec![Direction8::East]);
    assert_eq!(parsed.action, None);
}

#[test]
fn empty_library_matches_nothing() {
    let parsed = parse_trail(
        &wobbly_horizontal_trail(),
        &ParserConfig::default(),
        &GestureLibrarySnapshot::default(),
    );
    assert_eq!(parsed.action, None);
}
