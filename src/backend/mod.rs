//! The seam between the parser and whatever executes statements.
//!
//! Sprig does not store tables. A downstream crate implements [`Backend`] and
//! [`execute`] walks a parsed [`Ast`], handing each statement to the backend
//! in source order.

use tracing::debug;

use crate::sql::ast::{Ast, CreateTableStatement, InsertStatement, SelectStatement, Statement};
use crate::types::{ColumnType, Value};

/// One column of a result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultColumn {
    pub name: String,
    pub column_type: ColumnType,
}

impl ResultColumn {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        ResultColumn {
            name: name.into(),
            column_type,
        }
    }
}

/// Rows produced by a `SELECT`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Results {
    pub columns: Vec<ResultColumn>,
    pub rows: Vec<Vec<Value>>,
}

impl Results {
    pub fn new(columns: Vec<ResultColumn>) -> Self {
        Results {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the column called `name`, compared case-insensitively.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Value of column `name` in row `row`.
    pub fn get(&self, row: usize, name: &str) -> Option<&Value> {
        let index = self.column_index(name)?;
        self.rows.get(row)?.get(index)
    }
}

impl IntoIterator for Results {
    type Item = Vec<Value>;
    type IntoIter = std::vec::IntoIter<Vec<Value>>;
    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

/// An executor for parsed statements.
///
/// Implementations own their storage and error type. Statements arrive
/// exactly as parsed; resolving names, checking arity and evaluating
/// expressions is the backend's job.
pub trait Backend {
    type Error;

    fn create_table(&mut self, statement: &CreateTableStatement) -> Result<(), Self::Error>;

    fn insert(&mut self, statement: &InsertStatement) -> Result<(), Self::Error>;

    fn select(&mut self, statement: &SelectStatement) -> Result<Results, Self::Error>;
}

/// What one statement did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Created,
    Inserted,
    Selected(Results),
}

/// Run every statement of `ast` against `backend`, in order.
///
/// Stops at the first backend error; statements before it have already been
/// applied.
pub fn execute<B: Backend>(backend: &mut B, ast: &Ast) -> Result<Vec<Outcome>, B::Error> {
    let mut outcomes = Vec::with_capacity(ast.len());
    for (index, statement) in ast.statements.iter().enumerate() {
        let outcome = match statement {
            Statement::CreateTable(create) => {
                debug!(index, table = %create.name.value, "create table");
                backend.create_table(create)?;
                Outcome::Created
            }
            Statement::Insert(insert) => {
                debug!(index, table = %insert.table.value, values = insert.values.len(), "insert");
                backend.insert(insert)?;
                Outcome::Inserted
            }
            Statement::Select(select) => {
                debug!(index, items = select.items.len(), "select");
                Outcome::Selected(backend.select(select)?)
            }
        };
        outcomes.push(outcome);
    }
    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::parser::Parser;

    /// Records table names and fails inserts into unknown tables.
    #[derive(Default)]
    struct Recorder {
        tables: Vec<String>,
        inserts: usize,
    }

    impl Backend for Recorder {
        type Error = String;

        fn create_table(&mut self, statement: &CreateTableStatement) -> Result<(), String> {
            self.tables.push(statement.name.value.clone());
            Ok(())
        }

        fn insert(&mut self, statement: &InsertStatement) -> Result<(), String> {
            if !self.tables.contains(&statement.table.value) {
                return Err(format!("no such table: {}", statement.table.value));
            }
            self.inserts += 1;
            Ok(())
        }

        fn select(&mut self, _statement: &SelectStatement) -> Result<Results, String> {
            let mut results = Results::new(vec![ResultColumn::new("inserts", ColumnType::Int)]);
            results.rows.push(vec![Value::Int(self.inserts as i64)]);
            Ok(results)
        }
    }

    #[test]
    fn execute_dispatches_in_order() {
        let sql = "CREATE TABLE t (x INT); INSERT INTO t VALUES (1); SELECT x FROM t;";
        let ast = Parser::parse(sql).unwrap();
        let mut backend = Recorder::default();
        let outcomes = execute(&mut backend, &ast).unwrap();

        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[0], Outcome::Created);
        assert_eq!(outcomes[1], Outcome::Inserted);
        let Outcome::Selected(results) = &outcomes[2] else {
            panic!("expected Selected");
        };
        assert_eq!(results.get(0, "INSERTS"), Some(&Value::Int(1)));
    }

    #[test]
    fn execute_stops_at_first_error() {
        let ast = Parser::parse("INSERT INTO missing VALUES (1); CREATE TABLE t (x INT);").unwrap();
        let mut backend = Recorder::default();
        let err = execute(&mut backend, &ast).unwrap_err();
        assert_eq!(err, "no such table: missing");
        assert!(backend.tables.is_empty());
    }

    #[test]
    fn execute_empty_ast() {
        let mut backend = Recorder::default();
        assert!(execute(&mut backend, &Ast::default()).unwrap().is_empty());
    }

    #[test]
    fn results_lookup() {
        let mut results = Results::new(vec![
            ResultColumn::new("id", ColumnType::Int),
            ResultColumn::new("name", ColumnType::Text),
        ]);
        assert!(results.is_empty());
        results.rows.push(vec![Value::Int(1), Value::from("ada")]);

        assert_eq!(results.len(), 1);
        assert_eq!(results.column_index("Name"), Some(1));
        assert_eq!(results.get(0, "name"), Some(&Value::from("ada")));
        assert_eq!(results.get(1, "name"), None);
        assert_eq!(results.get(0, "missing"), None);
        assert_eq!(results.into_iter().count(), 1);
    }
}
