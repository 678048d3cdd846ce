//! Statements and the units of work built from them.
//!
//! A `Statement` is SQL text with `$N` placeholders plus the ordered values
//! bound to them. Values never reach the SQL text; the store binds them
//! positionally.

use chrono::NaiveDate;

/// A scalar value bound to a `$N` placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Int(i32),
    BigInt(i64),
    Text(String),
    Bool(bool),
    Double(f64),
    Date(NaiveDate),
}

impl From<i32> for SqlParam {
    fn from(value: i32) -> Self {
        SqlParam::Int(value)
    }
}

impl From<i64> for SqlParam {
    fn from(value: i64) -> Self {
        SqlParam::BigInt(value)
    }
}

impl From<String> for SqlParam {
    fn from(value: String) -> Self {
        SqlParam::Text(value)
    }
}

impl From<&str> for SqlParam {
    fn from(value: &str) -> Self {
        SqlParam::Text(value.to_owned())
    }
}

impl From<bool> for SqlParam {
    fn from(value: bool) -> Self {
        SqlParam::Bool(value)
    }
}

impl From<f64> for SqlParam {
    fn from(value: f64) -> Self {
        SqlParam::Double(value)
    }
}

impl From<NaiveDate> for SqlParam {
    fn from(value: NaiveDate) -> Self {
        SqlParam::Date(value)
    }
}

/// How many rows a step has to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Fetch {
    /// At least one row; the first is reported as an object.
    #[default]
    One,
    /// Any number of rows, reported as an array.
    All,
}

/// Transaction isolation requested on `BEGIN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IsolationLevel {
    #[default]
    ReadCommitted,
    RepeatableRead,
    Serializable,
}

impl IsolationLevel {
    /// The `BEGIN` command that opens a transaction at this level.
    pub fn begin_sql(self) -> &'static str {
        match self {
            IsolationLevel::ReadCommitted => "BEGIN ISOLATION LEVEL READ COMMITTED",
            IsolationLevel::RepeatableRead => "BEGIN ISOLATION LEVEL REPEATABLE READ",
            IsolationLevel::Serializable => "BEGIN ISOLATION LEVEL SERIALIZABLE",
        }
    }
}

/// One parameterized SQL statement inside a unit of work.
///
/// ```ignore
/// let step = Statement::new("customer", "INSERT INTO customers (cust_id, cust_name) VALUES ($1, $2) RETURNING *")
///     .bind(10)
///     .bind("Asha");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    name: String,
    sql: String,
    params: Vec<SqlParam>,
    fetch: Fetch,
}

impl Statement {
    pub fn new(name: impl Into<String>, sql: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sql: sql.into(),
            params: Vec::new(),
            fetch: Fetch::One,
        }
    }

    /// Append the value for the next placeholder.
    pub fn bind(mut self, value: impl Into<SqlParam>) -> Self {
        self.params.push(value.into());
        self
    }

    /// Accept any number of rows instead of requiring one.
    pub fn fetch_all(mut self) -> Self {
        self.fetch = Fetch::All;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[SqlParam] {
        &self.params
    }

    pub fn fetch(&self) -> Fetch {
        self.fetch
    }

    /// Check that every placeholder has exactly one bound value.
    pub fn validate(&self) -> Result<(), String> {
        let expected = placeholder_count(&self.sql);
        if expected != self.params.len() {
            return Err(format!(
                "step '{}' binds {} parameter(s) but its SQL uses {}",
                self.name,
                self.params.len(),
                expected
            ));
        }
        Ok(())
    }
}

/// An ordered list of dependent statements run in one transaction.
#[derive(Debug, Clone, Default)]
pub struct UnitOfWork {
    label: String,
    steps: Vec<Statement>,
    isolation: IsolationLevel,
}

impl UnitOfWork {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            steps: Vec::new(),
            isolation: IsolationLevel::default(),
        }
    }

    pub fn step(mut self, statement: Statement) -> Self {
        self.steps.push(statement);
        self
    }

    pub fn with_isolation(mut self, isolation: IsolationLevel) -> Self {
        self.isolation = isolation;
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn steps(&self) -> &[Statement] {
        &self.steps
    }

    pub fn isolation(&self) -> IsolationLevel {
        self.isolation
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Structural checks that need no database: named, uniquely named,
    /// and with matching placeholder/parameter counts.
    pub fn validate(&self) -> Result<(), String> {
        for (index, step) in self.steps.iter().enumerate() {
            if step.name.trim().is_empty() {
                return Err(format!("step {index} has no name"));
            }
            if self.steps[..index].iter().any(|s| s.name == step.name) {
                return Err(format!("step name '{}' is used more than once", step.name));
            }
            step.validate()?;
        }
        Ok(())
    }
}

/// Highest `$N` placeholder index in `sql`.
///
/// String literals, quoted identifiers, comments and dollar-quoted bodies
/// are skipped.
pub fn placeholder_count(sql: &str) -> usize {
    let bytes = sql.as_bytes();
    let mut highest = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            quote @ (b'\'' | b'"') => {
                i += 1;
                while i < bytes.len() {
                    if bytes[i] == quote {
                        // doubled quote is an escape
                        if bytes.get(i + 1) == Some(&quote) {
                            i += 2;
                            continue;
                        }
                        break;
                    }
                    i += 1;
                }
                i += 1;
            }
            b'-' if bytes.get(i + 1) == Some(&b'-') => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i += 2;
                while i < bytes.len() && !(bytes[i] == b'*' && bytes.get(i + 1) == Some(&b'/')) {
                    i += 1;
                }
                i += 2;
            }
            b'$' => {
                let start = i + 1;
                let mut end = start;
                while end < bytes.len() && bytes[end].is_ascii_digit() {
                    end += 1;
                }
                if end > start {
                    if let Ok(index) = sql[start..end].parse::<usize>() {
                        highest = highest.max(index);
                    }
                    i = end;
                    continue;
                }

                // $tag$ ... $tag$
                let mut tag_end = start;
                while tag_end < bytes.len()
                    && (bytes[tag_end].is_ascii_alphanumeric() || bytes[tag_end] == b'_')
                {
                    tag_end += 1;
                }
                if tag_end < bytes.len() && bytes[tag_end] == b'$' {
                    let tag = &sql[i..=tag_end];
                    let body_start = tag_end + 1;
                    i = match sql[body_start..].find(tag) {
                        Some(offset) => body_start + offset + tag.len(),
                        None => bytes.len(),
                    };
                    continue;
                }
                i += 1;
            }
            _ => i += 1,
        }
    }

    highest
}
