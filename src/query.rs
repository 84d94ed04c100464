/// A bind parameter collected by [`SqlQueryBuilder`]
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Text(String),
    Float(f64),
}

/// SQL query builder for constructing parameterized queries
/// Builds a single SELECT with filters and ordering; placeholders are numbered in push order
#[derive(Debug, Clone)]
pub struct SqlQueryBuilder {
    base_query: String,
    where_clauses: Vec<String>,
    params: Vec<SqlParam>,
    order_clause: Option<String>,
}

impl SqlQueryBuilder {
    /// Creates a new builder around a base SELECT (no WHERE clause)
    pub fn new(base_query: impl Into<String>) -> Self {
        Self {
            base_query: base_query.into(),
            where_clauses: Vec::new(),
            params: Vec::new(),
            order_clause: None,
        }
    }

    /// Adds a clause without parameters
    pub fn add_condition(&mut self, clause: &str) -> &mut Self {
        self.where_clauses.push(clause.to_string());
        self
    }

    /// Adds a clause with one bound parameter
    /// Every `{}` in `clause` is replaced by the same placeholder
    pub fn add_filter(&mut self, clause: &str, param: SqlParam) -> &mut Self {
        let placeholder = format!("${}", self.params.len() + 1);
        self.where_clauses.push(clause.replace("{}", &placeholder));
        self.params.push(param);
        self
    }

    /// Adds a case-insensitive substring match over one or more columns
    /// LIKE metacharacters in `needle` are matched literally
    pub fn add_contains_any(&mut self, columns: &[&str], needle: &str) -> &mut Self {
        let clause = columns
            .iter()
            .map(|column| format!("{} ILIKE {{}}", column))
            .collect::<Vec<_>>()
            .join(" OR ");
        self.add_filter(
            &format!("({})", clause),
            SqlParam::Text(format!("%{}%", escape_like(needle))),
        )
    }

    /// Sets the ORDER BY clause
    pub fn set_order(&mut self, order: &str) -> &mut Self {
        self.order_clause = Some(order.to_string());
        self
    }

    /// Builds the final SQL query string with all parameters
    pub fn build(&self) -> (String, Vec<SqlParam>) {
        let mut query = self.base_query.clone();

        if !self.where_clauses.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&self.where_clauses.join(" AND "));
        }

        if let Some(ref order) = self.order_clause {
            query.push_str(" ORDER BY ");
            query.push_str(order);
        }

        (query, self.params.clone())
    }
}

/// Escapes `\`, `%` and `_` for use inside a LIKE pattern
pub fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
