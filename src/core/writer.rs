use crate::domain::model::Table;
use crate::utils::error::{EtlError, Result};
use serde_json::Value;
use std::io::Write;

/// CSV 輸出：一列 header，無 index 欄
pub fn write_table<W: Write>(table: &Table, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(table.columns())?;
    for row in &table.rows {
        let fields: Vec<String> = row.values(table.schema).iter().map(cell_to_field).collect();
        csv_writer.write_record(&fields)?;
    }

    csv_writer.flush()?;
    Ok(())
}

pub fn table_to_csv_string(table: &Table) -> Result<String> {
    let mut buffer = Vec::new();
    write_table(table, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| EtlError::ProcessingError {
        message: format!("CSV output is not valid UTF-8: {}", e),
    })
}

/// null 寫成空字串，字串不加引號，其他值用 JSON 文字表示
pub fn cell_to_field(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
