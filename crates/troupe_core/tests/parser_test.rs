use troupe_core::{
    Line, ParserConfig, RoleName, ScriptParser, count_by_role, dialogue_sequence, extract_roles,
    parse_script,
};

fn names(text: &str) -> Vec<String> {
    extract_roles(text).iter().map(|r| r.to_string()).collect()
}

#[test]
fn classifies_dialogue_and_other_lines() {
    let script = parse_script(
        "Scene 1: The park\n(Birds sing.)\nMina: Hi!\n민지： 안녕\nThis is a very long prose sentence: with a colon\nJoon:",
    );
    let kinds: Vec<bool> = script.lines().iter().map(Line::is_dialogue).collect();
    assert_eq!(kinds, vec![false, false, true, true, false, false]);
    assert_eq!(script.lines()[3].speaker(), Some(&RoleName::new("민지")));
    assert_eq!(script.lines()[3].utterance(), Some("안녕"));
}

#[test]
fn wrapped_direction_with_colon_is_not_dialogue() {
    let script = parse_script("(Mina: whispering to herself)\n[Joon: offstage]");
    assert_eq!(script.dialogue_len(), 0);
}

#[test]
fn speaker_markup_is_normalized() {
    assert_eq!(names("**Mina**: Hi.\nMina.: Again.\n[Joon]: Hello."), vec!["Mina", "Joon"]);
}

#[test]
fn keeps_raw_indices_and_blank_lines() {
    let script = parse_script("A: first\r\n\r\nB: second\r\n");
    assert_eq!(script.len(), 3);
    assert_eq!(script.lines()[1], Line::Other { text: String::new(), raw_index: Some(1) });
    assert_eq!(script.lines()[2].raw_index(), Some(2));
    assert_eq!(script.render(), "A: first\n\nB: second");
}

#[test]
fn empty_text_is_an_empty_script() {
    assert!(parse_script("").is_empty());
    assert!(parse_script("  \n \r\n").is_empty());
}

#[test]
fn banned_labels_are_configurable() {
    let parser = ScriptParser::new(ParserConfig {
        banned_labels: vec!["Narrator".to_string()],
        ..ParserConfig::default()
    });
    let script = parser.parse("Narrator: Once upon a time.\nScene: Forest");
    assert!(!script.lines()[0].is_dialogue());
    assert_eq!(script.lines()[1].speaker(), Some(&RoleName::new("Scene")));
}

#[test]
fn generated_text_drops_code_fences() {
    let parser = ScriptParser::default();
    let script = parser.parse_generated("```text\nMina: Found it!\nJoon: Great.\n```");
    assert_eq!(script.len(), 2);
    assert_eq!(script.dialogue_len(), 2);
}

#[test]
fn counts_follow_first_appearance_role_set() {
    let counts = count_by_role("Mina: One.\nJoon: Two.\n(Pause.)\nMina: Three.");
    assert_eq!(counts[&RoleName::new("Mina")], 2);
    assert_eq!(counts[&RoleName::new("Joon")], 1);
    assert_eq!(counts.len(), 2);
}

#[test]
fn dialogue_sequence_keeps_order() {
    let sequence = dialogue_sequence("Mina: One.\n(Pause.)\nJoon: Two.");
    assert_eq!(
        sequence,
        vec![
            (RoleName::new("Mina"), "One.".to_string()),
            (RoleName::new("Joon"), "Two.".to_string()),
        ]
    );
}

#[test]
fn parser_config_deserializes_with_defaults() {
    let config: ParserConfig = serde_json::from_str(r#"{"max_speaker_words": 2}"#).expect("parse");
    assert_eq!(config.max_speaker_words, 2);
    assert_eq!(config.banned_labels, ParserConfig::default().banned_labels);

    let parser = ScriptParser::new(config);
    assert!(!parser.parse_line("Old Man Kim: Hello.", None).is_dialogue());
    assert!(parser.parse_line("Old Kim: Hello.", None).is_dialogue());
}
