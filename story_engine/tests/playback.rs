//! End-to-end playback over loaded documents.

use std::cell::RefCell;
use std::rc::Rc;

use story_engine::{PlaybackState, StoryEngine, StoryLoader};
use story_model::Story;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Seen {
    Node(String),
    Ended,
}

fn load(json: &str) -> Story {
    StoryLoader::with_defaults().parse_json(json).unwrap()
}

fn engine_with_log(story: Story) -> (StoryEngine, Rc<RefCell<Vec<Seen>>>) {
    let mut engine = StoryEngine::with_story(story);
    let log = Rc::new(RefCell::new(Vec::new()));

    let nodes = log.clone();
    engine.subscribe_node_changed(Box::new(move |node| {
        nodes.borrow_mut().push(Seen::Node(node.id.to_string()))
    }));
    let ended = log.clone();
    engine.subscribe_story_ended(Box::new(move || ended.borrow_mut().push(Seen::Ended)));

    (engine, log)
}

fn node(id: &str) -> Seen {
    Seen::Node(id.to_string())
}

#[test]
fn test_option_jump_then_trigger_back() {
    let story = load(
        r#"{
            "nodes": [
                {
                    "id": "A",
                    "text": "Do you like me?",
                    "options": [{ "text": "Yes", "goto": "B", "affect": "like:+2" }]
                },
                {
                    "id": "B",
                    "counterTriggers": [{ "counter": "like", "operator": ">=", "value": "2", "goto": "A" }]
                }
            ]
        }"#,
    );
    let (mut engine, log) = engine_with_log(story);

    engine.start();
    let option = engine.current_node().unwrap().options[0].clone();
    engine.apply_option(&option);

    assert_eq!(engine.counter("like"), 2);
    assert_eq!(engine.position(), Some(0));
    assert_eq!(*log.borrow(), vec![node("A"), node("B"), node("A")]);
}

#[test]
fn test_single_node_story_ends_once() {
    let story = load(r#"{ "nodes": [{ "id": "only", "text": "Fin." }] }"#);
    let (mut engine, log) = engine_with_log(story);

    engine.start();
    engine.next();
    engine.next();

    assert_eq!(engine.state(), PlaybackState::Ended);
    assert_eq!(*log.borrow(), vec![node("only"), Seen::Ended]);
}

#[test]
fn test_next_before_start_matches_start() {
    let json = r#"{ "nodes": [
        { "id": "a", "changes": [{ "counter": "seen", "delta": 1 }] },
        { "id": "b" }
    ] }"#;

    let (mut started, started_log) = engine_with_log(load(json));
    started.start();
    let (mut advanced, advanced_log) = engine_with_log(load(json));
    advanced.next();

    assert_eq!(started.state(), advanced.state());
    assert_eq!(started.counters(), advanced.counters());
    assert_eq!(*started_log.borrow(), *advanced_log.borrow());
}

#[test]
fn test_unresolvable_option_goto_matches_next() {
    let json = r#"{ "nodes": [
        { "id": "a", "options": [{ "text": "?", "goto": "nowhere" }] },
        { "id": "b" }
    ] }"#;

    let (mut chosen, chosen_log) = engine_with_log(load(json));
    chosen.start();
    let option = chosen.current_node().unwrap().options[0].clone();
    chosen.apply_option(&option);

    let (mut advanced, advanced_log) = engine_with_log(load(json));
    advanced.start();
    advanced.next();

    assert_eq!(chosen.position(), advanced.position());
    assert_eq!(*chosen_log.borrow(), *advanced_log.borrow());
}

#[test]
fn test_malformed_affect_entries_are_skipped() {
    let story = load(
        r#"{ "nodes": [
            { "id": "a", "options": [{ "text": "Hm", "affect": "bad,like:3,trust:many" }] },
            { "id": "b" }
        ] }"#,
    );
    let (mut engine, _) = engine_with_log(story);

    engine.start();
    assert!(engine.choose(0));

    assert_eq!(engine.counter("like"), 3);
    assert_eq!(engine.counter("trust"), 0);
    assert!(!engine.counters().contains("trust"));
    assert!(!engine.counters().contains("bad"));
}

#[test]
fn test_first_holding_trigger_is_taken() {
    let story = load(
        r#"{ "nodes": [
            {
                "id": "gate",
                "changes": [{ "counter": "like", "delta": 4 }],
                "counterTriggers": [
                    { "counter": "like", "operator": ">", "value": 10, "goto": "adore" },
                    { "counter": "like", "operator": ">=", "value": 3, "goto": "fond" },
                    { "counter": "like", "operator": ">=", "value": 0, "goto": "neutral" }
                ]
            },
            { "id": "adore" },
            { "id": "fond" },
            { "id": "neutral" }
        ] }"#,
    );
    let (mut engine, log) = engine_with_log(story);

    engine.start();
    assert_eq!(*log.borrow(), vec![node("gate"), node("fond")]);
}

#[test]
fn test_trigger_sees_counters_from_earlier_nodes() {
    let story = load(
        r#"{ "nodes": [
            { "id": "a", "options": [{ "text": "Tease", "affect": "like:-1" }] },
            { "id": "b", "counterTriggers": [{ "counter": "like", "operator": "<", "value": 0, "goto": "sulk" }] },
            { "id": "c" },
            { "id": "sulk" }
        ] }"#,
    );
    let (mut engine, log) = engine_with_log(story);

    engine.start();
    engine.choose(0);

    assert_eq!(engine.current_node().map(|n| n.id.as_str()), Some("sulk"));
    assert_eq!(*log.borrow(), vec![node("a"), node("b"), node("sulk")]);
}

#[test]
fn test_reload_resets_counters() {
    let json = r#"{ "nodes": [{ "id": "a", "changes": [{ "counter": "x", "delta": 5 }] }] }"#;
    let (mut engine, _) = engine_with_log(load(json));

    engine.start();
    assert_eq!(engine.counter("x"), 5);

    engine.load(load(json));
    assert_eq!(engine.counter("x"), 0);
    assert_eq!(engine.state(), PlaybackState::Unstarted);
}

#[test]
fn test_inherited_scene_reaches_listener() {
    let story = load(
        r#"{ "nodes": [
            { "id": "a", "bg": "school.png", "music": "theme.ogg", "speaker": "Mio", "text": "Hi." },
            { "id": "b", "text": "..." },
            { "id": "c", "music": "" }
        ] }"#,
    );
    let mut engine = StoryEngine::with_story(story);
    let scenes = Rc::new(RefCell::new(Vec::new()));
    let sink = scenes.clone();
    engine.subscribe_node_changed(Box::new(move |node| {
        sink.borrow_mut().push((
            node.background.value.clone(),
            node.music.is_cleared(),
            node.speaker.clone(),
            node.text.clone(),
        ))
    }));

    engine.start();
    engine.next();
    engine.next();

    let scenes = scenes.borrow();
    assert_eq!(scenes[1].0.as_deref(), Some("school.png"));
    assert_eq!(scenes[1].2.as_deref(), Some("Mio"));
    assert_eq!(scenes[2].3, "");
    assert!(scenes[2].1);
    assert!(!scenes[1].1);
}

#[test]
fn test_demo_story_good_route() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../demos/story.json");
    let mut engine = StoryEngine::new();
    engine.load_path(path).unwrap();
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = log.clone();
    engine.subscribe_node_changed(Box::new(move |node| sink.borrow_mut().push(node.id.to_string())));

    engine.start();
    assert!(engine.choose(0));
    engine.next();
    engine.next();
    engine.next();

    assert!(engine.is_ended());
    assert_eq!(engine.counter("like"), 2);
    assert_eq!(engine.counter("remembered"), 1);
    assert_eq!(*log.borrow(), vec!["intro", "gift", "walk", "good_end", "fin"]);
}
