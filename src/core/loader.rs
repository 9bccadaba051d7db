use crate::domain::model::Record;
use crate::utils::error::{EtlError, Result};
use serde_json::Value;
use std::io::BufRead;
use std::path::Path;

/// 逐行解析 line-delimited JSON；任何一行壞掉就整批失敗
pub fn load_records<R: BufRead>(reader: R) -> Result<Vec<Record>> {
    let mut records = Vec::new();

    for (index, line) in reader.split(b'\n').enumerate() {
        let line_number = index + 1;
        let mut bytes = line?;
        if bytes.last() == Some(&b'\r') {
            bytes.pop();
        }
        let line = String::from_utf8(bytes).map_err(|e| EtlError::ParseError {
            line: line_number,
            reason: format!("invalid UTF-8: {}", e.utf8_error()),
        })?;
        records.push(parse_line(&line, line_number)?);
    }

    tracing::debug!("Parsed {} records", records.len());
    Ok(records)
}

pub fn parse_records(input: &str) -> Result<Vec<Record>> {
    load_records(input.as_bytes())
}

/// Returns the record count alongside the records.
pub fn read_json<P: AsRef<Path>>(path: P) -> Result<(usize, Vec<Record>)> {
    let file = std::fs::File::open(path.as_ref())?;
    let records = load_records(std::io::BufReader::new(file))?;
    Ok((records.len(), records))
}

fn parse_line(line: &str, line_number: usize) -> Result<Record> {
    let value: Value = serde_json::from_str(line).map_err(|e| EtlError::ParseError {
        line: line_number,
        reason: e.to_string(),
    })?;

    match value {
        Value::Object(obj) => Ok(Record::from(obj)),
        other => Err(EtlError::ParseError {
            line: line_number,
            reason: format!("expected a JSON object, found {}", json_type_name(&other)),
        }),
    }
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
