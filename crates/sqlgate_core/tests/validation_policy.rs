use sqlgate_core::{check_statement, validate_statement, StatementKind, ValidationError};

const KIND_REASON: &str = "Only SELECT, INSERT, UPDATE, or DELETE statements are allowed";
const TABLE_REASON: &str = "Only the 'employees' table is allowed in the query";

#[test]
fn documented_examples_hold() {
    let report = check_statement("select * FROM employees;");
    assert!(report.is_valid);
    assert_eq!(report.reason, "Valid SQL query");

    let report = check_statement("DROP TABLE employees;");
    assert!(!report.is_valid);
    assert_eq!(report.reason, KIND_REASON);

    let report = check_statement("UPDATE users SET salary=1 WHERE id=1;");
    assert!(!report.is_valid);
    assert_eq!(report.reason, TABLE_REASON);

    let report =
        check_statement("INSERT INTO employees VALUES (6,'Alice Johnson','Marketing',72000);");
    assert!(report.is_valid);
}

#[test]
fn any_other_leading_keyword_fails_the_kind_check() {
    let keywords = [
        "DROP", "CREATE", "ALTER", "ATTACH", "DETACH", "PRAGMA", "VACUUM", "REPLACE", "WITH",
        "EXPLAIN", "BEGIN", "COMMIT", "ROLLBACK", "REINDEX", "ANALYZE",
    ];
    for keyword in keywords {
        for padding in ["", " ", "\n\t "] {
            for spelled in [keyword.to_string(), keyword.to_ascii_lowercase()] {
                let sql = format!("{padding}{spelled} employees");
                let report = check_statement(&sql);
                assert!(!report.is_valid, "{sql:?}");
                assert_eq!(report.reason, KIND_REASON, "{sql:?}");
            }
        }
    }
}

#[test]
fn foreign_tables_fail_for_every_allowed_kind() {
    let statements = [
        "SELECT * FROM {t}",
        "select id from {t} where id = 1",
        "INSERT INTO {t} VALUES (1)",
        "insert into {t} (id) values (1)",
        "UPDATE {t} SET salary = 1",
        "DELETE FROM {t}",
        "SELECT * FROM employees WHERE id IN (SELECT id FROM {t})",
    ];
    for table in ["users", "sqlite_master", "employees2", "staff"] {
        for template in statements {
            let sql = template.replace("{t}", table);
            let err = validate_statement(&sql).expect_err(&sql);
            assert_eq!(
                err,
                ValidationError::DisallowedTable {
                    tables: vec![table.to_string()]
                },
                "{sql}"
            );
            assert_eq!(err.reason(), TABLE_REASON);
        }
    }
}

#[test]
fn employees_only_statements_pass_regardless_of_case() {
    let cases = [
        ("SELECT * FROM employees", StatementKind::Select),
        ("select count(*) from EMPLOYEES", StatementKind::Select),
        ("Insert Into Employees VALUES (7, 'x', 'y', 1)", StatementKind::Insert),
        ("update employees set name = 'z' where id = 1", StatementKind::Update),
        ("DELETE FROM employees WHERE salary  1", StatementKind::Delete),
        ("DELETE employees", StatementKind::Delete),
        ("SELECT 1", StatementKind::Select),
    ];
    for (sql, kind) in cases {
        assert_eq!(validate_statement(sql), Ok(kind), "{sql}");
        assert!(check_statement(sql).is_valid, "{sql}");
    }
}
