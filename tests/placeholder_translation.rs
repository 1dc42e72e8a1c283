use mssql_adapter::{SqlValue, translate_qmarks};

#[test]
fn each_placeholder_gets_a_distinct_named_parameter() {
    let params = vec![
        SqlValue::Int(1),
        SqlValue::Text("alice".into()),
        SqlValue::Bool(true),
    ];
    let sql = "INSERT INTO users (id, name, active) VALUES (?, ?, ?)";
    let translated = translate_qmarks(sql);

    assert_eq!(
        translated,
        "INSERT INTO users (id, name, active) VALUES (@P1, @P2, @P3)"
    );

    // One numbered name per supplied parameter, in order
    for n in 1..=params.len() {
        assert!(translated.contains(&format!("@P{n}")));
    }
    assert!(!translated.contains('?'));
}

#[test]
fn literal_question_marks_survive_translation() {
    let sql = "SELECT 'any ? here' AS q, [col?umn] FROM t WHERE a = ? AND b = ?";
    let translated = translate_qmarks(sql);
    assert_eq!(
        translated,
        "SELECT 'any ? here' AS q, [col?umn] FROM t WHERE a = @P1 AND b = @P2"
    );
}

#[test]
fn placeholder_free_text_passes_through_unchanged() {
    let sql = "SELECT TABLE_NAME FROM INFORMATION_SCHEMA.TABLES";
    assert_eq!(translate_qmarks(sql), sql);
}
