//! Employee record and sample data.

use serde::Serialize;

/// Primary key type of the `employees` table.
pub type EmployeeId = i64;

/// Name of the only table statements may target.
pub const EMPLOYEES_TABLE: &str = "employees";

/// One row of the `employees` table.
///
/// Non-key columns are optional because generated statements can write
/// `NULL` into any of them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub name: Option<String>,
    pub department: Option<String>,
    pub salary: Option<f64>,
}

impl Employee {
    /// Creates a fully populated employee row.
    pub fn new(
        id: EmployeeId,
        name: impl Into<String>,
        department: impl Into<String>,
        salary: f64,
    ) -> Self {
        Self {
            id,
            name: Some(name.into()),
            department: Some(department.into()),
            salary: Some(salary),
        }
    }
}

const SAMPLE_ROWS: &[(EmployeeId, &str, &str, f64)] = &[
    (1, "John Doe", "IT", 75000.0),
    (2, "Jane Smith", "HR", 65000.0),
    (3, "Mike Johnson", "Sales", 80000.0),
    (4, "Emily Brown", "Marketing", 70000.0),
    (5, "David Lee", "IT", 78000.0),
];

/// Returns the fixed sample row set written by seed and reset.
///
/// Rows are ordered by ascending `id`.
pub fn sample_employees() -> Vec<Employee> {
    SAMPLE_ROWS
        .iter()
        .map(|&(id, name, department, salary)| Employee::new(id, name, department, salary))
        .collect()
}

/// Human-readable schema description shown next to the query panel.
pub fn schema_description() -> String {
    format!(
        "Table: {EMPLOYEES_TABLE}\nColumns:\n- id (INTEGER, PRIMARY KEY)\n- name (TEXT)\n- department (TEXT)\n- salary (REAL)"
    )
}
