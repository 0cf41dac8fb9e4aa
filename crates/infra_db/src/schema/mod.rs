//! Declarative table definitions
//!
//! Every survey table is described once as a [`TableDef`]: its columns, the
//! path of each column inside the serialized domain record, and its keys.
//! The same definition drives `CREATE TABLE`, bulk inserts and row decoding,
//! so the DDL and the mapping cannot drift apart.
//!
//! ```text
//!   Household ──serde──► {"home": {"geocode": {"latitude": ..}}}
//!                                         │  path home.geocode.latitude
//!                                         ▼
//!                          hhtbs2016.households.home_lat DOUBLE PRECISION
//! ```

pub mod tables;

use core_kernel::{Categorical, SRID};
use domain_ingest::SCHEMA;

pub use tables::{
    all_tables, table, BORDER_TRIPS, DAY, HOUSEHOLDS, INTERCEPT, LOCATION_LINES, LOCATION_POINTS,
    PERSONS, TRIPS, VEHICLES,
};

/// Storage type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    /// Bounded free text
    Text(usize),
    /// A closed categorical set, stored as its label
    Category(&'static [&'static str]),
    SmallInt,
    Int,
    BigInt,
    Float,
    /// Dollar amount with cents
    Money,
    Date,
    Timestamp,
    /// `geometry(Point, 4326)`
    Point,
    /// `geometry(Geometry, 4326)`: a line, or a point for a one-fix trace
    Geometry,
}

impl SqlType {
    pub fn text(width: usize) -> Self {
        SqlType::Text(width)
    }

    pub fn category<C: Categorical>() -> Self {
        SqlType::Category(C::labels())
    }

    /// Column type as written in DDL
    pub fn ddl(&self) -> String {
        match self {
            SqlType::Text(width) => format!("VARCHAR({})", width),
            SqlType::Category(labels) => {
                let width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(1);
                format!("VARCHAR({})", width)
            }
            SqlType::SmallInt => "SMALLINT".to_string(),
            SqlType::Int => "INTEGER".to_string(),
            SqlType::BigInt => "BIGINT".to_string(),
            SqlType::Float => "DOUBLE PRECISION".to_string(),
            SqlType::Money => "NUMERIC(10, 2)".to_string(),
            SqlType::Date => "DATE".to_string(),
            SqlType::Timestamp => "TIMESTAMP".to_string(),
            SqlType::Point => format!("geometry(Point, {})", SRID),
            SqlType::Geometry => format!("geometry(Geometry, {})", SRID),
        }
    }

    pub fn is_geometry(&self) -> bool {
        matches!(self, SqlType::Point | SqlType::Geometry)
    }
}

/// One column of a survey table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    /// Location of the value in the serialized record; `None` for surrogate
    /// ids and parent keys that the repository supplies itself
    pub path: Option<Vec<String>>,
    pub sql_type: SqlType,
    pub nullable: bool,
    /// Allocated by the database sequence
    pub identity: bool,
}

impl Column {
    /// Dotted record path, for messages and tests
    pub fn path_text(&self) -> Option<String> {
        self.path.as_ref().map(|segments| segments.join("."))
    }

    fn ddl(&self) -> String {
        let mut ddl = format!("{} {}", quote(&self.name), self.sql_type.ddl());
        if self.identity {
            ddl.push_str(" GENERATED BY DEFAULT AS IDENTITY");
        }
        if !self.nullable {
            ddl.push_str(" NOT NULL");
        }
        ddl
    }

    /// Expression used in a SELECT list
    pub fn select_expr(&self) -> String {
        if self.sql_type.is_geometry() {
            format!("ST_AsText({0}) AS {0}", quote(&self.name))
        } else {
            quote(&self.name)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    pub columns: Vec<&'static str>,
    pub parent: &'static str,
    pub parent_columns: Vec<&'static str>,
}

/// A survey table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDef {
    pub name: &'static str,
    pub columns: Vec<Column>,
    pub primary_key: Vec<&'static str>,
    pub unique: Vec<Vec<&'static str>>,
    pub foreign_keys: Vec<ForeignKey>,
    pub checks: Vec<String>,
    pub indexes: Vec<Vec<&'static str>>,
    /// Record paths of optional sub-records (a place's geocode); all of
    /// their columns are null together
    pub optional_groups: Vec<Vec<String>>,
}

impl TableDef {
    pub fn builder(name: &'static str) -> TableBuilder {
        TableBuilder::new(name)
    }

    /// Schema-qualified name
    pub fn qualified(&self) -> String {
        format!("{}.{}", SCHEMA, self.name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Columns written by an insert
    pub fn insert_columns(&self, with_identity: bool) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(move |c| with_identity || !c.identity)
    }

    /// Comma separated SELECT list with geometry rendered as WKT
    pub fn select_list(&self) -> String {
        self.columns
            .iter()
            .map(Column::select_expr)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// `SELECT ... FROM schema.table` followed by `tail`
    pub fn select_sql(&self, tail: &str) -> String {
        format!("SELECT {} FROM {} {}", self.select_list(), self.qualified(), tail)
    }

    /// The `CREATE TABLE` statement
    pub fn create_sql(&self) -> String {
        let mut lines: Vec<String> = self.columns.iter().map(Column::ddl).collect();

        lines.push(format!(
            "CONSTRAINT {} PRIMARY KEY ({})",
            quote(&format!("{}_pkey", self.name)),
            quote_list(&self.primary_key)
        ));
        for unique in &self.unique {
            lines.push(format!(
                "CONSTRAINT {} UNIQUE ({})",
                quote(&format!("{}_{}_key", self.name, unique.join("_"))),
                quote_list(unique)
            ));
        }
        for fk in &self.foreign_keys {
            lines.push(format!(
                "CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {}.{} ({})",
                quote(&format!("{}_{}_fkey", self.name, fk.columns.join("_"))),
                quote_list(&fk.columns),
                SCHEMA,
                fk.parent,
                quote_list(&fk.parent_columns)
            ));
        }
        for column in &self.columns {
            match column.sql_type {
                SqlType::Category(labels) => lines.push(format!(
                    "CHECK ({} IN ({}))",
                    quote(&column.name),
                    labels.iter().map(|l| literal(l)).collect::<Vec<_>>().join(", ")
                )),
                SqlType::Money => lines.push(format!("CHECK ({} >= 0)", quote(&column.name))),
                _ => {}
            }
        }
        for check in &self.checks {
            lines.push(format!("CHECK ({})", check));
        }

        format!(
            "CREATE TABLE IF NOT EXISTS {} (\n    {}\n)",
            self.qualified(),
            lines.join(",\n    ")
        )
    }

    /// `CREATE INDEX` statements for the secondary indexes
    pub fn index_sql(&self) -> Vec<String> {
        self.indexes
            .iter()
            .map(|columns| {
                format!(
                    "CREATE INDEX IF NOT EXISTS {} ON {} ({})",
                    quote(&format!("{}_{}_idx", self.name, columns.join("_"))),
                    self.qualified(),
                    quote_list(columns)
                )
            })
            .collect()
    }
}

/// Double-quotes an identifier
pub fn quote(identifier: &str) -> String {
    format!("\"{}\"", identifier.replace('"', "\"\""))
}

fn quote_list(identifiers: &[&str]) -> String {
    identifiers.iter().map(|i| quote(i)).collect::<Vec<_>>().join(", ")
}

/// Single-quotes a string literal
fn literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Builds a [`TableDef`] by walking the record's structure
///
/// `nested` descends into a sub-record: the segment extends the record path
/// and the prefix extends the column name.
#[derive(Debug)]
pub struct TableBuilder {
    table: TableDef,
    scope: Vec<(String, String)>,
}

impl TableBuilder {
    fn new(name: &'static str) -> Self {
        Self {
            table: TableDef {
                name,
                columns: Vec::new(),
                primary_key: Vec::new(),
                unique: Vec::new(),
                foreign_keys: Vec::new(),
                checks: Vec::new(),
                indexes: Vec::new(),
                optional_groups: Vec::new(),
            },
            scope: Vec::new(),
        }
    }

    fn path(&self, field: &str) -> Vec<String> {
        self.scope
            .iter()
            .map(|(segment, _)| segment.clone())
            .chain(std::iter::once(field.to_string()))
            .collect()
    }

    fn prefixed(&self, field: &str) -> String {
        let mut name: String = self.scope.iter().map(|(_, prefix)| prefix.as_str()).collect();
        name.push_str(field);
        name
    }

    fn push(mut self, name: String, path: Option<Vec<String>>, sql_type: SqlType, nullable: bool) -> Self {
        self.table.columns.push(Column {
            name,
            path,
            sql_type,
            nullable,
            identity: false,
        });
        self
    }

    /// A NOT NULL column named after its field
    pub fn col(self, field: &str, sql_type: SqlType) -> Self {
        let name = self.prefixed(field);
        let path = self.path(field);
        self.push(name, Some(path), sql_type, false)
    }

    /// A nullable column named after its field
    pub fn opt(self, field: &str, sql_type: SqlType) -> Self {
        let name = self.prefixed(field);
        let path = self.path(field);
        self.push(name, Some(path), sql_type, true)
    }

    /// A NOT NULL column with an explicit name
    pub fn col_as(self, name: &str, field: &str, sql_type: SqlType) -> Self {
        let path = self.path(field);
        self.push(name.to_string(), Some(path), sql_type, false)
    }

    /// A fixed-size array field stored as `{stem}_1 .. {stem}_n`
    pub fn array(self, field: &str, stem: &str, len: usize, sql_type: SqlType) -> Self {
        (0..len).fold(self, |builder, index| {
            let name = format!("{}_{}", builder.prefixed(stem), index + 1);
            let mut path = builder.path(field);
            path.push(index.to_string());
            builder.push(name, Some(path), sql_type, false)
        })
    }

    /// A column the repository fills in itself
    pub fn key(self, name: &str, sql_type: SqlType) -> Self {
        self.push(name.to_string(), None, sql_type, false)
    }

    /// A surrogate id allocated by the database
    pub fn identity(mut self, name: &str) -> Self {
        self.table.columns.push(Column {
            name: name.to_string(),
            path: None,
            sql_type: SqlType::BigInt,
            nullable: false,
            identity: true,
        });
        self
    }

    /// Descends into a sub-record
    pub fn nested(mut self, segment: &str, prefix: &str, build: impl FnOnce(Self) -> Self) -> Self {
        self.scope.push((segment.to_string(), prefix.to_string()));
        let mut builder = build(self);
        builder.scope.pop();
        builder
    }

    /// A geocoded place: address plus the optional lat/long, shape and zone
    pub fn place(self, segment: &str, prefix: &str) -> Self {
        self.nested(segment, prefix, |t| {
            let t = t.col("address", SqlType::text(150));
            let lat = t.prefixed("lat");
            let lng = t.prefixed("lng");
            let shape = t.prefixed("shape");
            let mut t = t.nested("geocode", "", |t| {
                let (lat_path, lng_path, shape_path) =
                    (t.path("latitude"), t.path("longitude"), t.path("shape"));
                t.push(lat.clone(), Some(lat_path), SqlType::Float, true)
                    .push(lng.clone(), Some(lng_path), SqlType::Float, true)
                    .push(shape.clone(), Some(shape_path), SqlType::Point, true)
                    .opt("mgra_13", SqlType::Int)
            });
            let group = t.path("geocode");
            t.table.optional_groups.push(group);
            t.table.checks.push(format!(
                "num_nulls({}, {}, {}) IN (0, 3)",
                quote(&lat),
                quote(&lng),
                quote(&shape)
            ));
            t
        })
    }

    pub fn primary_key(mut self, columns: &[&'static str]) -> Self {
        self.table.primary_key = columns.to_vec();
        self
    }

    pub fn unique(mut self, columns: &[&'static str]) -> Self {
        self.table.unique.push(columns.to_vec());
        self
    }

    pub fn foreign_key(mut self, columns: &[&'static str], parent: &'static str, parent_columns: &[&'static str]) -> Self {
        self.table.foreign_keys.push(ForeignKey {
            columns: columns.to_vec(),
            parent,
            parent_columns: parent_columns.to_vec(),
        });
        self
    }

    pub fn check(mut self, expression: impl Into<String>) -> Self {
        self.table.checks.push(expression.into());
        self
    }

    pub fn index(mut self, columns: &[&'static str]) -> Self {
        self.table.indexes.push(columns.to_vec());
        self
    }

    pub fn build(self) -> TableDef {
        self.table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::Response;

    fn sample() -> TableDef {
        TableDef::builder("sample")
            .col("sample_id", SqlType::Int)
            .col("answer", SqlType::category::<Response>())
            .place("home", "home_")
            .nested("weights", "weight_", |t| t.opt("initial", SqlType::Float))
            .array("completed_day", "completed_day", 2, SqlType::category::<Response>())
            .identity("row_id")
            .primary_key(&["sample_id"])
            .build()
    }

    #[test]
    fn test_nested_names_and_paths() {
        let table = sample();
        let weight = table.column("weight_initial").unwrap();
        assert_eq!(weight.path_text().as_deref(), Some("weights.initial"));
        assert!(weight.nullable);

        let lat = table.column("home_lat").unwrap();
        assert_eq!(lat.path_text().as_deref(), Some("home.geocode.latitude"));
        assert_eq!(table.optional_groups, vec![vec!["home".to_string(), "geocode".to_string()]]);

        let day = table.column("completed_day_2").unwrap();
        assert_eq!(day.path_text().as_deref(), Some("completed_day.1"));
    }

    #[test]
    fn test_create_sql() {
        let sql = sample().create_sql();
        assert!(sql.starts_with("CREATE TABLE IF NOT EXISTS hhtbs2016.sample"));
        assert!(sql.contains("\"home_shape\" geometry(Point, 4326)"));
        assert!(sql.contains("\"row_id\" BIGINT GENERATED BY DEFAULT AS IDENTITY NOT NULL"));
        assert!(sql.contains("CHECK (\"answer\" IN ('Yes', 'No'"));
        assert!(sql.contains("'Don''t know'"));
        assert!(sql.contains("num_nulls(\"home_lat\", \"home_lng\", \"home_shape\") IN (0, 3)"));
        assert!(sql.contains("PRIMARY KEY (\"sample_id\")"));
    }

    #[test]
    fn test_identity_excluded_from_inserts() {
        let table = sample();
        assert!(table.insert_columns(false).all(|c| c.name != "row_id"));
        assert!(table.insert_columns(true).any(|c| c.name == "row_id"));
    }

    #[test]
    fn test_geometry_selected_as_text() {
        let select = sample().select_list();
        assert!(select.contains("ST_AsText(\"home_shape\") AS \"home_shape\""));
    }
}
