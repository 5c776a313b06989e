use sqlgate_core::db::open_db_in_memory;
use sqlgate_core::{
    affected_rows_message, sample_employees, CellValue, Employee, ExecuteMode, ExecuteOutcome, SqliteStatementStore,
    StatementStore, StoreError,
};

#[test]
fn seed_twice_leaves_exactly_the_sample_rows() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStatementStore::new(&conn);

    assert_eq!(store.seed().unwrap(), 5);
    assert_eq!(store.seed().unwrap(), 5);

    assert_eq!(store.count().unwrap(), 5);
    assert_eq!(store.read_all().unwrap(), sample_employees());
}

#[test]
fn seed_restores_modified_sample_rows_but_keeps_extra_rows() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStatementStore::new(&conn);
    store.seed().unwrap();

    store
        .execute("UPDATE employees SET salary = 1 WHERE id = 1", ExecuteMode::Mutate)
        .unwrap();
    store
        .execute(
            "INSERT INTO employees VALUES (6, 'Alice Johnson', 'Marketing', 72000)",
            ExecuteMode::Mutate,
        )
        .unwrap();
    store.seed().unwrap();

    let employees = store.read_all().unwrap();
    assert_eq!(employees.len(), 6);
    assert_eq!(employees[0].salary, Some(75000.0));
    assert_eq!(
        employees[5],
        Employee::new(6, "Alice Johnson", "Marketing", 72000.0)
    );
}

#[test]
fn reset_matches_a_fresh_seed() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStatementStore::new(&conn);
    store.seed().unwrap();
    let fresh = store.read_all().unwrap();

    store
        .execute("DELETE FROM employees WHERE department = 'IT'", ExecuteMode::Mutate)
        .unwrap();
    store
        .execute(
            "INSERT INTO employees VALUES (42, 'Temp', 'Ops', 1)",
            ExecuteMode::Mutate,
        )
        .unwrap();

    assert_eq!(store.reset().unwrap(), 5);
    assert_eq!(store.read_all().unwrap(), fresh);
}

#[test]
fn fetch_returns_column_names_and_ordered_rows() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStatementStore::new(&conn);
    store.seed().unwrap();

    let outcome = store
        .execute(
            "SELECT name, salary FROM employees WHERE department = 'IT' ORDER BY id",
            ExecuteMode::Fetch,
        )
        .unwrap();
    let ExecuteOutcome::Rows(set) = outcome else {
        panic!("fetch must return rows");
    };

    assert_eq!(set.columns, vec!["name", "salary"]);
    assert_eq!(
        set.rows,
        vec![
            vec![
                CellValue::Text("John Doe".to_string()),
                CellValue::Real(75000.0)
            ],
            vec![
                CellValue::Text("David Lee".to_string()),
                CellValue::Real(78000.0)
            ],
        ]
    );
}

#[test]
fn fetch_with_no_matches_returns_empty_set_with_columns() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStatementStore::new(&conn);

    let outcome = store
        .execute("SELECT * FROM employees;", ExecuteMode::Fetch)
        .unwrap();
    let ExecuteOutcome::Rows(set) = outcome else {
        panic!("fetch must return rows");
    };
    assert!(set.is_empty());
    assert_eq!(set.columns.len(), 4);
}

#[test]
fn mutate_reports_affected_rows() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStatementStore::new(&conn);
    store.seed().unwrap();

    let outcome = store
        .execute(
            "UPDATE employees SET salary = salary + 1000 WHERE department = 'IT'",
            ExecuteMode::Mutate,
        )
        .unwrap();
    assert_eq!(outcome, ExecuteOutcome::Affected { rows_affected: 2 });
    assert_eq!(
        affected_rows_message(2),
        "Query executed successfully. Rows affected: 2"
    );
}

#[test]
fn trailing_statement_is_refused_in_both_modes_and_nothing_runs() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStatementStore::new(&conn);
    store.seed().unwrap();

    let err = store
        .execute(
            "DELETE FROM employees WHERE id = 1; DELETE FROM employees",
            ExecuteMode::Mutate,
        )
        .unwrap_err();
    assert!(matches!(err, StoreError::MultipleStatements));
    assert_eq!(
        err.to_string(),
        "You can only execute one statement at a time."
    );

    let err = store
        .execute(
            "SELECT * FROM employees; DROP TABLE employees",
            ExecuteMode::Fetch,
        )
        .unwrap_err();
    assert!(matches!(err, StoreError::MultipleStatements));

    assert_eq!(store.read_all().unwrap(), sample_employees());
}

#[test]
fn mutate_with_returning_clause_commits_and_counts() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStatementStore::new(&conn);
    store.seed().unwrap();

    let outcome = store
        .execute(
            "DELETE FROM employees WHERE department = 'IT' RETURNING id",
            ExecuteMode::Mutate,
        )
        .unwrap();
    assert_eq!(outcome, ExecuteOutcome::Affected { rows_affected: 2 });
    assert_eq!(store.count().unwrap(), 3);
}

#[test]
fn store_errors_are_returned_and_connection_survives() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStatementStore::new(&conn);
    store.seed().unwrap();

    let err = store
        .execute(
            "INSERT INTO employees VALUES (1, 'Dup', 'IT', 1)",
            ExecuteMode::Mutate,
        )
        .unwrap_err();
    assert!(matches!(err, StoreError::Db(_)));
    assert!(err.to_string().contains("UNIQUE"));

    let err = store
        .execute("SELECT nope FROM employees", ExecuteMode::Fetch)
        .unwrap_err();
    assert!(err.to_string().contains("nope"));

    assert_eq!(store.count().unwrap(), 5);
}

#[test]
fn snapshot_tolerates_values_the_typed_read_rejects() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStatementStore::new(&conn);
    store
        .execute(
            "INSERT INTO employees VALUES (9, 'Odd', 'IT', 'lots')",
            ExecuteMode::Mutate,
        )
        .unwrap();

    let err = store.read_all().unwrap_err();
    assert!(matches!(err, StoreError::InvalidData(_)));

    let snapshot = store.snapshot().unwrap();
    assert_eq!(
        snapshot.value(0, "salary"),
        Some(&CellValue::Text("lots".to_string()))
    );
}

#[test]
fn null_columns_read_as_none() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStatementStore::new(&conn);
    store
        .execute("INSERT INTO employees (id) VALUES (10)", ExecuteMode::Mutate)
        .unwrap();

    let employees = store.read_all().unwrap();
    assert_eq!(
        employees,
        vec![Employee {
            id: 10,
            name: None,
            department: None,
            salary: None,
        }]
    );

    let json = serde_json::to_value(&employees[0]).unwrap();
    assert!(json["salary"].is_null());
}
