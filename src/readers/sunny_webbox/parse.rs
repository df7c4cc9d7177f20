use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("field '{0}' not found on status page")]
    MissingField(&'static str),
    #[error("field '{0}' is not terminated")]
    Unterminated(&'static str),
    #[error("field '{field}' value '{text}' is not a number")]
    Number { field: &'static str, text: String },
}

/// Status page fields in label order
pub const FIELDS: [&str; 3] = ["Power", "DailyYield", "TotalYield"];

/// Extract the three yield figures from the `home.htm` markup
///
/// Each field is located by its `id`, after the previous one; the cell text is a number
/// optionally followed by a unit.
pub fn parse_status_page(text: &str) -> Result<Vec<f64>, ParseError> {
    let mut rest = text;
    let mut values = Vec::with_capacity(FIELDS.len());
    for field in FIELDS {
        let start = rest
            .find(&format!("{field}\""))
            .ok_or(ParseError::MissingField(field))?;
        rest = &rest[start..];
        let open = rest.find('>').ok_or(ParseError::Unterminated(field))?;
        rest = &rest[open + 1..];
        let close = rest.find('<').ok_or(ParseError::Unterminated(field))?;
        values.push(parse_cell(field, &rest[..close])?);
        rest = &rest[close..];
    }
    Ok(values)
}

fn parse_cell(field: &'static str, cell: &str) -> Result<f64, ParseError> {
    let cell = cell.trim();
    let (number, unit) = cell.split_once(' ').unwrap_or((cell, ""));
    let value: f64 = number.parse().map_err(|_| ParseError::Number {
        field,
        text: cell.to_string(),
    })?;
    Ok(match unit.trim() {
        "kW" => value * 1000.0,
        "Wh" => value / 1000.0,
        "MWh" => value * 1000.0,
        _ => value,
    })
}
