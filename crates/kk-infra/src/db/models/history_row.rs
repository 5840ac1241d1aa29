use diesel::prelude::*;

use crate::db::schema::history_record;

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Insertable)]
#[diesel(table_name = history_record)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct HistoryRow {
    pub id: String,
    pub input_text: String,
    pub output_text: String,
    pub total_cm: f64,
    pub created_at_ms: i64,
    pub is_favorite: bool,
}
