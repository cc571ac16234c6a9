use std::fmt;
use std::marker::PhantomData;

use crate::error::TableKitError;
use crate::results::{DbRow, ExecOutcome, ResultSet};
use crate::row::FromRow;
use crate::runner::Runner;
use crate::statement::{Expr, FromSource, SelectStatement};
use crate::types::{Dialect, RowValues};

/// SELECT builder whose rows map into `T`.
pub struct SelectBuilder<T = DbRow> {
    stmt: SelectStatement,
    dialect: Option<Dialect>,
    _row: PhantomData<fn() -> T>,
}

impl<T> Clone for SelectBuilder<T> {
    fn clone(&self) -> Self {
        Self {
            stmt: self.stmt.clone(),
            dialect: self.dialect,
            _row: PhantomData,
        }
    }
}

impl<T> fmt::Debug for SelectBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectBuilder")
            .field("stmt", &self.stmt)
            .field("dialect", &self.dialect)
            .finish()
    }
}

impl<T> SelectBuilder<T> {
    #[must_use]
    pub fn new(columns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self::from_statement(SelectStatement::new(columns))
    }

    #[must_use]
    pub fn from_statement(stmt: SelectStatement) -> Self {
        Self {
            stmt,
            dialect: None,
            _row: PhantomData,
        }
    }

    /// Keep the query, change the row type.
    #[must_use]
    pub fn cast<U>(self) -> SelectBuilder<U> {
        SelectBuilder {
            stmt: self.stmt,
            dialect: self.dialect,
            _row: PhantomData,
        }
    }

    #[must_use]
    pub fn statement(&self) -> &SelectStatement {
        &self.stmt
    }

    #[must_use]
    pub fn into_statement(self) -> SelectStatement {
        self.stmt
    }

    /// Render with `$n` or `?` placeholders regardless of the runner's default.
    #[must_use]
    pub fn placeholder_format(mut self, dialect: Dialect) -> Self {
        self.dialect = Some(dialect);
        self
    }

    #[must_use]
    pub fn prefix(mut self, expr: impl Into<Expr>) -> Self {
        self.stmt.prefixes.push(expr.into());
        self
    }

    #[must_use]
    pub fn distinct(mut self) -> Self {
        self.stmt.distinct = true;
        self
    }

    /// Keywords between `SELECT` and the column list, e.g. `SQL_NO_CACHE`.
    #[must_use]
    pub fn options(mut self, options: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.stmt
            .options
            .extend(options.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn columns(mut self, columns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.stmt
            .columns
            .extend(columns.into_iter().map(|c| Expr::from(Into::<String>::into(c))));
        self
    }

    /// Add a result column, possibly with arguments (`("? AS tag", "x")`).
    #[must_use]
    pub fn column(mut self, column: impl Into<Expr>) -> Self {
        self.stmt.columns.push(column.into());
        self
    }

    #[must_use]
    pub fn from(mut self, table: impl Into<String>) -> Self {
        self.stmt.from = Some(FromSource::Table(table.into()));
        self
    }

    /// `FROM (subquery) AS alias`
    #[must_use]
    pub fn from_select<U>(mut self, subquery: SelectBuilder<U>, alias: impl Into<String>) -> Self {
        self.stmt.from = Some(FromSource::Subquery(
            Box::new(subquery.into_statement()),
            alias.into(),
        ));
        self
    }

    /// A complete join clause, e.g. `"NATURAL JOIN u"`.
    #[must_use]
    pub fn join_clause(mut self, clause: impl Into<Expr>) -> Self {
        self.stmt.joins.push(clause.into());
        self
    }

    #[must_use]
    pub fn join(self, join: impl Into<Expr>) -> Self {
        self.join_kind("JOIN", join)
    }

    #[must_use]
    pub fn left_join(self, join: impl Into<Expr>) -> Self {
        self.join_kind("LEFT JOIN", join)
    }

    #[must_use]
    pub fn right_join(self, join: impl Into<Expr>) -> Self {
        self.join_kind("RIGHT JOIN", join)
    }

    #[must_use]
    pub fn inner_join(self, join: impl Into<Expr>) -> Self {
        self.join_kind("INNER JOIN", join)
    }

    #[must_use]
    pub fn cross_join(self, join: impl Into<Expr>) -> Self {
        self.join_kind("CROSS JOIN", join)
    }

    fn join_kind(mut self, keyword: &str, join: impl Into<Expr>) -> Self {
        self.stmt.joins.push(join.into().with_keyword(keyword));
        self
    }

    /// Add a WHERE predicate; predicates are joined with `AND`.
    #[must_use]
    pub fn filter(mut self, pred: impl Into<Expr>) -> Self {
        self.stmt.wheres.push(pred.into());
        self
    }

    #[must_use]
    pub fn group_by(mut self, columns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.stmt
            .group_by
            .extend(columns.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn having(mut self, pred: impl Into<Expr>) -> Self {
        self.stmt.havings.push(pred.into());
        self
    }

    #[must_use]
    pub fn order_by(mut self, columns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.stmt
            .order_by
            .extend(columns.into_iter().map(|c| Expr::from(Into::<String>::into(c))));
        self
    }

    /// An ORDER BY term with arguments.
    #[must_use]
    pub fn order_by_clause(mut self, clause: impl Into<Expr>) -> Self {
        self.stmt.order_by.push(clause.into());
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: u64) -> Self {
        self.stmt.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn remove_limit(mut self) -> Self {
        self.stmt.limit = None;
        self
    }

    #[must_use]
    pub fn offset(mut self, offset: u64) -> Self {
        self.stmt.offset = Some(offset);
        self
    }

    #[must_use]
    pub fn remove_offset(mut self) -> Self {
        self.stmt.offset = None;
        self
    }

    #[must_use]
    pub fn suffix(mut self, expr: impl Into<Expr>) -> Self {
        self.stmt.suffixes.push(expr.into());
        self
    }

    /// Render for `dialect`; an explicit [`placeholder_format`](Self::placeholder_format)
    /// takes precedence.
    ///
    /// # Errors
    /// Returns `TableKitError::BuildError` when the statement has no result columns.
    pub fn to_sql(&self, dialect: Dialect) -> Result<(String, Vec<RowValues>), TableKitError> {
        self.stmt.to_sql(Dialect::resolve(self.dialect, dialect))
    }

    fn render_for<R: Runner>(&self, runner: &R) -> Result<(String, Vec<RowValues>), TableKitError> {
        self.to_sql(runner.dialect())
    }

    /// Run the query and return the undecoded result set.
    ///
    /// # Errors
    /// Returns build or execution errors.
    pub async fn rows<R: Runner>(&self, runner: &mut R) -> Result<ResultSet, TableKitError> {
        let (sql, args) = self.render_for(runner)?;
        runner.select(&sql, &args).await
    }

    /// Run the statement without reading rows.
    ///
    /// # Errors
    /// Returns build or execution errors.
    pub async fn exec<R: Runner>(&self, runner: &mut R) -> Result<ExecOutcome, TableKitError> {
        let (sql, args) = self.render_for(runner)?;
        runner.execute(&sql, &args).await
    }
}

impl<T: FromRow> SelectBuilder<T> {
    /// Every matching row; an empty vector when nothing matches.
    ///
    /// # Errors
    /// Returns build, execution or row-mapping errors.
    pub async fn all<R: Runner>(&self, runner: &mut R) -> Result<Vec<T>, TableKitError> {
        let (sql, args) = self.render_for(runner)?;
        runner.select_into(&sql, &args).await
    }

    /// Exactly one matching row.
    ///
    /// # Errors
    /// Returns `TableKitError::NotFound` for zero rows, `TableKitError::Ambiguous` for more
    /// than one, and build, execution or row-mapping errors otherwise.
    pub async fn only<R: Runner>(&self, runner: &mut R) -> Result<T, TableKitError> {
        let mut rows = self.all(runner).await?;
        match rows.len() {
            0 => Err(TableKitError::NotFound),
            1 => rows.pop().ok_or(TableKitError::NotFound),
            n => Err(TableKitError::Ambiguous(n)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_get_their_keyword() -> Result<(), TableKitError> {
        let q = SelectBuilder::<DbRow>::new(["t.id", "u.name"])
            .from("t")
            .left_join(("u ON u.id = t.u_id AND u.kind = ?", "admin"))
            .cross_join("z")
            .filter(Expr::eq("t.id", 1));
        let (sql, args) = q.to_sql(Dialect::Postgres)?;
        assert_eq!(
            sql,
            "SELECT t.id, u.name FROM t LEFT JOIN u ON u.id = t.u_id AND u.kind = $1 CROSS JOIN z WHERE t.id = $2"
        );
        assert_eq!(args, vec![RowValues::Text("admin".into()), RowValues::Int(1)]);
        Ok(())
    }

    #[test]
    fn builders_are_independent_values() -> Result<(), TableKitError> {
        let base = SelectBuilder::<DbRow>::new(["id"]).from("todos").limit(3);
        let a = base.clone().filter(("id > ?", 1)).remove_limit();
        let b = base.offset(6);
        assert_eq!(a.to_sql(Dialect::Standard)?.0, "SELECT id FROM todos WHERE id > ?");
        assert_eq!(b.to_sql(Dialect::Standard)?.0, "SELECT id FROM todos LIMIT 3 OFFSET 6");
        Ok(())
    }

    #[test]
    fn placeholder_format_overrides_requested_dialect() -> Result<(), TableKitError> {
        let q = SelectBuilder::<DbRow>::new(["id"])
            .from("t")
            .filter(Expr::eq_any("id", [1, 2]))
            .placeholder_format(Dialect::Postgres);
        assert_eq!(
            q.to_sql(Dialect::Standard)?.0,
            "SELECT id FROM t WHERE id IN ($1, $2)"
        );
        Ok(())
    }

    #[test]
    fn subquery_columns_and_options() -> Result<(), TableKitError> {
        let inner = SelectBuilder::<DbRow>::new(["id"]).from("a").filter(("x = ?", 1));
        let q = SelectBuilder::<DbRow>::new(Vec::<String>::new())
            .options(["SQL_NO_CACHE"])
            .column(("? AS tag", "t"))
            .columns(["s.id"])
            .from_select(inner, "s")
            .group_by(["s.id"])
            .having("count(*) > 1")
            .order_by_clause(("s.id = ? DESC", 7));
        let (sql, args) = q.to_sql(Dialect::Standard)?;
        assert_eq!(
            sql,
            "SELECT SQL_NO_CACHE ? AS tag, s.id FROM (SELECT id FROM a WHERE x = ?) AS s \
             GROUP BY s.id HAVING count(*) > 1 ORDER BY s.id = ? DESC"
        );
        assert_eq!(
            args,
            vec![RowValues::Text("t".into()), RowValues::Int(1), RowValues::Int(7)]
        );
        Ok(())
    }
}
