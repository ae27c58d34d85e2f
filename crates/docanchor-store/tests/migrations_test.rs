// Integration tests for the records ledger migrations

use rusqlite::Connection;

fn setup_test_db() -> Connection {
    Connection::open_in_memory().expect("Failed to create in-memory database")
}

fn get_table_names(conn: &Connection) -> Vec<String> {
    let mut stmt = conn
        .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
        .unwrap();
    stmt.query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<Vec<String>, _>>()
        .unwrap()
}

#[test]
fn test_apply_migrations_on_empty_db() {
    // Given: An empty SQLite database
    let mut conn = setup_test_db();

    // When: Migrations are applied
    let result = docanchor_store::migrations::apply_migrations(&mut conn);

    // Then: The records table and version table exist
    assert!(result.is_ok(), "Migrations should succeed: {:?}", result.err());
    assert_eq!(get_table_names(&conn), vec!["records", "schema_version"]);
}

#[test]
fn test_records_digest_is_primary_key() {
    let mut conn = setup_test_db();
    docanchor_store::migrations::apply_migrations(&mut conn).unwrap();
    let digest = "a".repeat(64);

    conn.execute(
        "INSERT INTO records (digest, owner, tx_id, recorded_at) VALUES (?1, 'issuer-a', 'tx-1', 0)",
        [&digest],
    )
    .unwrap();
    let second = conn.execute(
        "INSERT INTO records (digest, owner, tx_id, recorded_at) VALUES (?1, 'issuer-b', 'tx-2', 0)",
        [&digest],
    );

    assert!(second.is_err(), "Second owner for one digest must be refused");
}

#[test]
fn test_records_rejects_short_digest() {
    let mut conn = setup_test_db();
    docanchor_store::migrations::apply_migrations(&mut conn).unwrap();

    let result = conn.execute(
        "INSERT INTO records (digest, owner, tx_id, recorded_at) VALUES ('abc', 'issuer-a', 'tx-1', 0)",
        [],
    );

    assert!(result.is_err());
}

#[test]
fn test_migrations_survive_reopen() {
    // Given: A file database that has been migrated once
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.db");
    {
        let mut conn = Connection::open(&path).unwrap();
        docanchor_store::migrations::apply_migrations(&mut conn).unwrap();
    }

    // When: It is reopened and migrated again
    let mut conn = Connection::open(&path).unwrap();
    docanchor_store::migrations::apply_migrations(&mut conn).unwrap();

    // Then: Each migration is recorded exactly once
    let applied = docanchor_store::migrations::applied_migrations(&conn).unwrap();
    assert_eq!(applied, vec!["001_records"]);
}
