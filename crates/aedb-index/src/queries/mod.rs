pub mod globalinfo;
pub mod params;
pub mod rows;
pub mod schema;

/// Quote a table or column name for interpolation into SQL.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
