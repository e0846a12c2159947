#![cfg(feature = "sqlite")]

use sql_bindexec::prelude::*;
use tempfile::tempdir;

fn fruit_table() -> Result<Connector<SqliteBackend>, Box<dyn std::error::Error>> {
    let mut conn = Connector::open(&SqliteOptions::in_memory())?;
    conn.execute_script("CREATE TABLE fruit (a varchar(40), b integer)")?;
    Ok(conn)
}

fn fruit_rows(
    conn: &mut Connector<SqliteBackend>,
) -> Result<Vec<(String, i64)>, Box<dyn std::error::Error>> {
    let result = conn.execute_raw("SELECT a, b FROM fruit ORDER BY rowid").into_result()?;
    let rs = result.result_set.ok_or("select produced no result set")?;
    Ok(rs
        .results
        .iter()
        .map(|row| {
            (
                row.get("a").and_then(SqlValue::as_text).unwrap_or_default().to_string(),
                row.get("b").and_then(SqlValue::as_int).unwrap_or_default(),
            )
        })
        .collect())
}

#[test]
fn mixed_literal_and_parameter_rows() -> Result<(), Box<dyn std::error::Error>> {
    let mut conn = fruit_table()?;

    let insert = Statement::insert(
        "fruit",
        &["a", "b"],
        vec![
            vec![Field::param(), 10.into()],
            vec!["apricot".into(), Field::param()],
            vec![Field::param(), Field::param()],
        ],
    );
    assert_eq!(insert.positional_count(), 4);

    let outcome = conn.execute_with(&insert, &params!["apple\u{FF9D}0FF9D", 3, "banana€euro", -8]);
    assert!(outcome.success(), "{:?}", outcome.as_error());
    assert_eq!(outcome.rows_affected(), 3);

    assert_eq!(
        fruit_rows(&mut conn)?,
        vec![
            ("apple\u{FF9D}0FF9D".to_string(), 10),
            ("apricot".to_string(), 3),
            ("banana€euro".to_string(), -8),
        ]
    );
    Ok(())
}

#[test]
fn updates_bind_by_position() -> Result<(), Box<dyn std::error::Error>> {
    let mut conn = fruit_table()?;
    conn.execute_raw_batch(
        "INSERT INTO fruit (a, b) VALUES (?, ?)",
        &[params!["apple", 10], params!["apricot", 3], params!["banana€euro", -8]],
    )
    .into_result()?;

    let update = Statement::builder()
        .sql("UPDATE fruit SET a = ")
        .param()
        .sql(", b = ")
        .param()
        .sql(" WHERE a = ")
        .literal("banana€euro")
        .build();
    assert_eq!(
        update.describe(),
        "UPDATE fruit SET a = ?, b = ? WHERE a = 'banana€euro'"
    );
    let outcome = conn.execute_with(&update, &params!["peach", 2]);
    assert!(outcome.success(), "{:?}", outcome.as_error());
    assert_eq!(outcome.rows_affected(), 1);
    assert_eq!(fruit_rows(&mut conn)?[2], ("peach".to_string(), 2));

    let outcome = conn.execute_raw_with(
        "UPDATE fruit SET a='banana', b=? WHERE a=?",
        &params![4, "peach"],
    );
    assert!(outcome.success());
    assert_eq!(outcome.rows_affected(), 1);

    assert_eq!(
        fruit_rows(&mut conn)?,
        vec![
            ("apple".to_string(), 10),
            ("apricot".to_string(), 3),
            ("banana".to_string(), 4),
        ]
    );
    Ok(())
}

#[test]
fn astral_text_round_trips_through_file() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("roundtrip.db");
    let opts = SqliteOptions::builder(path.to_string_lossy())
        .encoding(TextEncoding::Utf16le)
        .finish();

    let original = "mixed \u{1F34E} apple \u{10348} é 漢字";
    {
        let mut conn = Connector::open(&opts)?;
        conn.execute_script("CREATE TABLE fruit (a varchar(40), b integer)")?;
        conn.execute_raw_with("INSERT INTO fruit VALUES (?, ?)", &params![original, 1])
            .into_result()?;
    }

    let mut conn = Connector::open(&opts)?;
    let outcome = conn.execute_raw_with("SELECT a FROM fruit WHERE b = ?", &params![1]);
    let rows = outcome.rows().ok_or("no rows")?;
    assert_eq!(rows.len(), 1);
    let text = rows[0].get("a").and_then(SqlValue::as_text).ok_or("not text")?;
    assert_eq!(text.as_bytes(), original.as_bytes());
    Ok(())
}

#[test]
fn typed_values_decode_by_column() -> Result<(), Box<dyn std::error::Error>> {
    let mut conn = Connector::open(&SqliteOptions::in_memory())?;
    conn.execute_script(
        "CREATE TABLE kinds (i integer, f real, t text, b blob, flag boolean, n integer)",
    )?;
    conn.execute_raw_with(
        "INSERT INTO kinds VALUES (?, ?, ?, ?, ?, ?)",
        &params![7, 2.5, "seven", vec![0u8, 255], true, None::<i64>],
    )
    .into_result()?;

    let result = conn.execute_raw("SELECT * FROM kinds").into_result()?;
    let rs = result.result_set.ok_or("no result set")?;
    assert_eq!(rs.column_names(), ["i", "f", "t", "b", "flag", "n"]);
    let row = &rs.results[0];
    assert_eq!(row[0], SqlValue::Int(7));
    assert_eq!(row[1], SqlValue::Float(2.5));
    assert_eq!(row[2], SqlValue::Text("seven".into()));
    assert_eq!(row[3], SqlValue::Blob(vec![0, 255]));
    assert_eq!(row[4], SqlValue::Bool(true));
    assert!(row[5].is_null());
    Ok(())
}
