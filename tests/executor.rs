use chrono::NaiveDateTime;
use sqlmapper::{
    ConnectionConfig, Error, Executor, MappingError, RowMapperError, SqlExecutor, SqlMapping,
    errors::{
        connection::SqlitePrepareErrors,
        statement::{BindErrors, StatementStepErrors},
    },
};
use tempfile::TempDir;

#[derive(Debug, Default, PartialEq, SqlMapping)]
struct Employee {
    seq: i64,
    name: String,
    age: i32,
    reg_date: Option<NaiveDateTime>,
}

const CREATE_EMPLOYEE: &str = "CREATE TABLE IF NOT EXISTS employee (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    name VARCHAR(50) NOT NULL,
    age INT NOT NULL,
    reg_date DATETIME NULL,
    CONSTRAINT employee_name_uindex UNIQUE (name)
)";

// keep the TempDir alive for as long as the executor is used
fn employees() -> (TempDir, SqlExecutor<Employee>) {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let url = format!("jdbc:sqlite:{}", dir.path().join("test.db").display());

    let executor =
        SqlExecutor::<Employee>::new("sqlite", &url, "sa", "").expect("failed to build executor");
    executor
        .execute(CREATE_EMPLOYEE)
        .expect("failed to create employee table");

    (dir, executor)
}

#[test]
fn test_insert_returns_generated_key() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, employees) = employees();

    let sql = "INSERT INTO employee (name, age, reg_date) VALUES (?, ?, CURRENT_TIMESTAMP)";
    let first = employees.insert(sql, &[&"sam", &31])?;
    let second = employees.insert(sql, &[&"alex", &28])?;

    assert_eq!(first, Some(1));
    assert_eq!(second, Some(2));
    Ok(())
}

#[test]
fn test_insert_without_new_row_has_no_key() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, employees) = employees();
    employees.insert("INSERT INTO employee (name, age) VALUES (?, ?)", &[&"sam", &31])?;

    let ignored =
        employees.insert("INSERT OR IGNORE INTO employee (name, age) VALUES (?, ?)", &[&"sam", &40])?;
    assert_eq!(ignored, None);
    Ok(())
}

#[test]
fn test_insert_without_rowid_has_no_key() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, employees) = employees();
    employees.execute("CREATE TABLE kv (k TEXT PRIMARY KEY, v INTEGER) WITHOUT ROWID")?;

    let inserted = employees.insert("INSERT INTO kv (k, v) VALUES (?, ?)", &[&"a", &1])?;
    assert_eq!(inserted, None);

    let updated = employees.insert("UPDATE kv SET v = ?", &[&2])?;
    assert_eq!(updated, None);

    assert_eq!(employees.select_count("SELECT v FROM kv WHERE k = ?", &[&"a"])?, 2);
    Ok(())
}

#[test]
fn test_empty_table_reads() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, employees) = employees();

    assert!(employees.select_list("SELECT * FROM employee", &[])?.is_empty());
    assert_eq!(employees.select_one("SELECT * FROM employee", &[])?, None);
    assert_eq!(employees.select_count("SELECT COUNT(*) FROM employee", &[])?, 0);
    Ok(())
}

#[test]
fn test_select_one_maps_every_column() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, employees) = employees();
    let registered = NaiveDateTime::parse_from_str("2024-03-01 09:15:30", "%Y-%m-%d %H:%M:%S")?;

    let seq = employees.insert(
        "INSERT INTO employee (name, age, reg_date) VALUES (?, ?, ?)",
        &[&"sam", &31, &registered],
    )?;

    let sam = employees.select_one("SELECT * FROM employee WHERE seq = ?", &[&seq])?;
    assert_eq!(
        sam,
        Some(Employee {
            seq: 1,
            name: "sam".to_string(),
            age: 31,
            reg_date: Some(registered),
        })
    );
    Ok(())
}

#[test]
fn test_current_timestamp_maps_into_datetime() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, employees) = employees();
    employees.insert(
        "INSERT INTO employee (name, age, reg_date) VALUES (?, ?, CURRENT_TIMESTAMP)",
        &[&"sam", &31],
    )?;

    let sam = employees
        .select_one("SELECT * FROM employee", &[])?
        .ok_or("expected a row")?;
    assert!(sam.reg_date.is_some());
    Ok(())
}

#[test]
fn test_select_list_keeps_result_order() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, employees) = employees();
    for (name, age) in [("carol", 45), ("alice", 30), ("bob", 38)] {
        employees.insert("INSERT INTO employee (name, age) VALUES (?, ?)", &[&name, &age])?;
    }

    let names: Vec<String> = employees
        .select_list("SELECT * FROM employee WHERE age > ? ORDER BY name", &[&31])?
        .into_iter()
        .map(|e| e.name)
        .collect();
    assert_eq!(names, vec!["bob", "carol"]);

    let by_age = employees.select_list("SELECT name, age FROM employee ORDER BY age DESC", &[])?;
    assert_eq!(by_age.iter().map(|e| e.age).collect::<Vec<_>>(), vec![45, 38, 30]);
    // columns that were not selected keep their default
    assert!(by_age.iter().all(|e| e.seq == 0 && e.reg_date.is_none()));
    Ok(())
}

#[test]
fn test_unknown_columns_are_skipped() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, employees) = employees();
    employees.insert("INSERT INTO employee (name, age) VALUES (?, ?)", &[&"sam", &31])?;

    let sam = employees
        .select_one("SELECT name, age, 'x' AS nickname, age * 2 AS double_age FROM employee", &[])?
        .ok_or("expected a row")?;
    assert_eq!(sam.name, "sam");
    assert_eq!(sam.age, 31);
    Ok(())
}

#[test]
fn test_update_or_delete_counts() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, employees) = employees();
    employees.insert("INSERT INTO employee (name, age) VALUES (?, ?)", &[&"sam", &31])?;
    employees.insert("INSERT INTO employee (name, age) VALUES (?, ?)", &[&"kim", &31])?;

    assert_eq!(
        employees.update_or_delete("UPDATE employee SET age = ? WHERE name = ?", &[&32, &"nobody"])?,
        0
    );
    assert_eq!(
        employees.update_or_delete("UPDATE employee SET age = age + 1 WHERE age = ?", &[&31])?,
        2
    );
    assert_eq!(
        employees.update_or_delete("DELETE FROM employee WHERE name = ?", &[&"kim"])?,
        1
    );
    assert_eq!(employees.select_count("SELECT COUNT(*) FROM employee", &[])?, 1);
    Ok(())
}

#[test]
fn test_select_count_reads_first_column() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, employees) = employees();
    for (name, age) in [("a", 20), ("b", 30), ("c", 40)] {
        employees.insert("INSERT INTO employee (name, age) VALUES (?, ?)", &[&name, &age])?;
    }

    assert_eq!(
        employees.select_count("SELECT COUNT(*) FROM employee WHERE age >= ?", &[&30])?,
        2
    );
    assert_eq!(employees.select_count("SELECT MAX(age), 'ignored' FROM employee", &[])?, 40);
    assert_eq!(
        employees.select_count("SELECT MAX(age) FROM employee WHERE age > ?", &[&100])?,
        0
    );
    Ok(())
}

#[test]
fn test_select_count_truncates_real() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, employees) = employees();
    employees.execute("CREATE TABLE payment (amount REAL NOT NULL)")?;
    employees.insert("INSERT INTO payment (amount) VALUES (?), (?)", &[&1.25, &2.5])?;

    assert_eq!(employees.select_count("SELECT SUM(amount) FROM payment", &[])?, 3);
    assert_eq!(employees.select_count("SELECT -SUM(amount) FROM payment", &[])?, -3);
    Ok(())
}

#[test]
fn test_invalid_utf8_is_reported() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, employees) = employees();
    employees.insert(
        "INSERT INTO employee (name, age) VALUES (CAST(x'73FF6D' AS TEXT), ?)",
        &[&31],
    )?;

    let result = employees.select_one("SELECT * FROM employee", &[]);
    assert!(matches!(
        result,
        Err(Error::Row(RowMapperError::InvalidUtf8 { ref column, valid_up_to: 1 })) if column == "name"
    ));
    Ok(())
}

#[test]
fn test_numeric_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, employees) = employees();
    employees.insert("INSERT INTO employee (name, age) VALUES (?, ?)", &[&"sam", &31])?;

    let sam = employees
        .select_one("SELECT * FROM employee WHERE name = ?", &[&"sam"])?
        .ok_or("expected a row")?;
    assert_eq!(sam.age, 31);
    Ok(())
}

#[test]
fn test_failures_are_reported_not_swallowed() {
    let (_dir, employees) = employees();

    let bad_sql = employees.select_list("SELEC * FROM employee", &[]);
    assert!(matches!(
        bad_sql,
        Err(Error::Prepare(SqlitePrepareErrors::SqliteFailure { .. }))
    ));

    let missing_arg = employees.insert("INSERT INTO employee (name, age) VALUES (?, ?)", &[&"sam"]);
    assert!(matches!(
        missing_arg,
        Err(Error::Bind(BindErrors::InvalidParameterCount {
            expected: 2,
            actual: 1
        }))
    ));

    let missing_table = employees.execute("DROP TABLE no_such_table");
    assert!(matches!(missing_table, Err(Error::Db(_))));
}

#[test]
fn test_unique_violation() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, employees) = employees();
    employees.insert("INSERT INTO employee (name, age) VALUES (?, ?)", &[&"sam", &31])?;

    let duplicate = employees.insert("INSERT INTO employee (name, age) VALUES (?, ?)", &[&"sam", &31]);
    assert!(matches!(
        duplicate,
        Err(Error::Step(StatementStepErrors::UniqueConstraint { .. }))
    ));
    Ok(())
}

#[test]
fn test_type_mismatch_names_the_column() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, employees) = employees();
    employees.insert("INSERT INTO employee (name, age) VALUES (?, ?)", &[&"sam", &31])?;

    let result = employees.select_one("SELECT 'old' AS age FROM employee", &[]);
    match result {
        Err(Error::Row(RowMapperError::Mapping {
            column,
            mutator,
            source,
        })) => {
            assert_eq!(column, "age");
            assert_eq!(mutator, "setAge");
            assert!(matches!(source, MappingError::TypeMismatch { .. }));
        }
        other => panic!("expected a mapping error, got {other:?}"),
    }
    Ok(())
}

#[test]
fn test_unsupported_driver() {
    let result = SqlExecutor::<Employee>::new("org.h2.Driver", "jdbc:h2:~/test", "sa", "");
    assert!(matches!(result, Err(Error::UnsupportedDriver { .. })));
}

#[test]
fn test_from_config() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let mut config = ConnectionConfig::new(
        "sqlite3",
        dir.path().join("config.db").display().to_string(),
        "",
        "",
    );
    config.busy_timeout_ms = 250;

    let employees = SqlExecutor::<Employee>::from_config(config)?;
    assert_eq!(employees.config().busy_timeout_ms, 250);
    employees.execute(CREATE_EMPLOYEE)?;
    assert_eq!(employees.insert("INSERT INTO employee (name, age) VALUES ('z', 1)", &[])?, Some(1));
    Ok(())
}

#[test]
fn test_executor_is_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<SqlExecutor<Employee>>();
}
