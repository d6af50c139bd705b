// Table definitions for customers, items and reviews.
// DDL is generated from these definitions so constraint names follow one convention.

/// Column storage class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Text,
    Real,
}

impl ColumnType {
    pub fn as_sql(&self) -> &'static str {
        match self {
            ColumnType::Integer => "INTEGER",
            ColumnType::Text => "TEXT",
            ColumnType::Real => "REAL",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDefinition {
    pub name: &'static str,
    pub column_type: ColumnType,
    pub nullable: bool,
    pub primary_key: bool,
}

impl ColumnDefinition {
    pub fn new(name: &'static str, column_type: ColumnType) -> Self {
        Self {
            name,
            column_type,
            nullable: false,
            primary_key: false,
        }
    }

    /// Auto-assigned integer primary key
    pub fn id() -> Self {
        Self {
            primary_key: true,
            ..Self::new("id", ColumnType::Integer)
        }
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    fn to_sql(&self) -> String {
        let mut sql = format!("{} {}", self.name, self.column_type.as_sql());
        if self.primary_key {
            sql.push_str(" PRIMARY KEY AUTOINCREMENT");
        } else if !self.nullable {
            sql.push_str(" NOT NULL");
        }
        sql
    }
}

/// What happens to referencing rows when the referenced row is deleted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForeignKeyAction {
    Cascade,
    SetNull,
}

impl ForeignKeyAction {
    pub fn as_sql(&self) -> &'static str {
        match self {
            ForeignKeyAction::Cascade => "CASCADE",
            ForeignKeyAction::SetNull => "SET NULL",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForeignKey {
    pub column: &'static str,
    pub referred_table: &'static str,
    pub on_delete: ForeignKeyAction,
}

impl ForeignKey {
    pub fn new(column: &'static str, referred_table: &'static str, on_delete: ForeignKeyAction) -> Self {
        Self {
            column,
            referred_table,
            on_delete,
        }
    }

    /// `fk_<table>_<column>_<referred table>`
    pub fn constraint_name(&self, table: &str) -> String {
        format!("fk_{}_{}_{}", table, self.column, self.referred_table)
    }

    fn to_sql(&self, table: &str) -> String {
        format!(
            "CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {}(id) ON DELETE {}",
            self.constraint_name(table),
            self.column,
            self.referred_table,
            self.on_delete.as_sql()
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableDefinition {
    pub name: &'static str,
    pub columns: Vec<ColumnDefinition>,
    pub foreign_keys: Vec<ForeignKey>,
}

impl TableDefinition {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            columns: vec![ColumnDefinition::id()],
            foreign_keys: Vec::new(),
        }
    }

    pub fn column(mut self, column: ColumnDefinition) -> Self {
        self.columns.push(column);
        self
    }

    pub fn foreign_key(mut self, foreign_key: ForeignKey) -> Self {
        self.foreign_keys.push(foreign_key);
        self
    }

    pub fn create_table_sql(&self) -> String {
        let mut parts: Vec<String> = self.columns.iter().map(ColumnDefinition::to_sql).collect();
        parts.extend(self.foreign_keys.iter().map(|fk| fk.to_sql(self.name)));
        format!("CREATE TABLE IF NOT EXISTS {} ({})", self.name, parts.join(", "))
    }

    /// One index per foreign key column, used by the by-customer / by-item lookups
    pub fn create_index_sql(&self) -> Vec<String> {
        self.foreign_keys
            .iter()
            .map(|fk| {
                format!(
                    "CREATE INDEX IF NOT EXISTS idx_{}_{} ON {}({})",
                    self.name, fk.column, self.name, fk.column
                )
            })
            .collect()
    }
}

pub const CUSTOMERS: &str = "customers";
pub const ITEMS: &str = "items";
pub const REVIEWS: &str = "reviews";

pub fn customers_table() -> TableDefinition {
    TableDefinition::new(CUSTOMERS).column(ColumnDefinition::new("name", ColumnType::Text))
}

pub fn items_table() -> TableDefinition {
    TableDefinition::new(ITEMS)
        .column(ColumnDefinition::new("name", ColumnType::Text))
        .column(ColumnDefinition::new("price", ColumnType::Real))
}

/// Deleting a customer removes its reviews; deleting an item detaches them.
pub fn reviews_table() -> TableDefinition {
    TableDefinition::new(REVIEWS)
        .column(ColumnDefinition::new("comment", ColumnType::Text).nullable())
        .column(ColumnDefinition::new("customer_id", ColumnType::Integer))
        .column(ColumnDefinition::new("item_id", ColumnType::Integer).nullable())
        .foreign_key(ForeignKey::new("customer_id", CUSTOMERS, ForeignKeyAction::Cascade))
        .foreign_key(ForeignKey::new("item_id", ITEMS, ForeignKeyAction::SetNull))
}

/// Tables in dependency order
pub fn tables() -> Vec<TableDefinition> {
    vec![customers_table(), items_table(), reviews_table()]
}

/// All statements needed to bring an empty database up to the current schema
pub fn create_statements() -> Vec<String> {
    let mut statements = Vec::new();
    for table in tables() {
        statements.push(table.create_table_sql());
        statements.extend(table.create_index_sql());
    }
    statements
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_naming_convention() {
        let reviews = reviews_table();
        let names: Vec<String> = reviews
            .foreign_keys
            .iter()
            .map(|fk| fk.constraint_name(reviews.name))
            .collect();
        assert_eq!(
            names,
            vec!["fk_reviews_customer_id_customers", "fk_reviews_item_id_items"]
        );
    }

    #[test]
    fn test_reviews_ddl() {
        let sql = reviews_table().create_table_sql();
        assert!(sql.starts_with("CREATE TABLE IF NOT EXISTS reviews ("));
        assert!(sql.contains("id INTEGER PRIMARY KEY AUTOINCREMENT"));
        assert!(sql.contains("comment TEXT, "));
        assert!(sql.contains("customer_id INTEGER NOT NULL"));
        assert!(!sql.contains("item_id INTEGER NOT NULL"));
        assert!(sql.contains(
            "CONSTRAINT fk_reviews_customer_id_customers FOREIGN KEY (customer_id) REFERENCES customers(id) ON DELETE CASCADE"
        ));
        assert!(sql.contains(
            "CONSTRAINT fk_reviews_item_id_items FOREIGN KEY (item_id) REFERENCES items(id) ON DELETE SET NULL"
        ));
    }

    #[test]
    fn test_statement_order() {
        let statements = create_statements();
        let position = |needle: &str| statements.iter().position(|s| s.contains(needle)).unwrap();
        assert!(position("TABLE IF NOT EXISTS customers") < position("TABLE IF NOT EXISTS reviews"));
        assert!(position("TABLE IF NOT EXISTS items") < position("TABLE IF NOT EXISTS reviews"));
        assert!(statements.iter().any(|s| s.contains("idx_reviews_customer_id")));
        assert!(statements.iter().any(|s| s.contains("idx_reviews_item_id")));
    }
}
