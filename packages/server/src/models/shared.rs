use serde::{Deserialize, Deserializer};

/// Accept a JSON string or integer and keep it as text.
///
/// HTML forms post the selected option as a string while API clients tend
/// to send a number. Parsing into an answer option happens later so bad input
/// is reported as `INVALID_ANSWER_FORMAT` rather than a body error.
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Int(n) => n.to_string(),
        Raw::Float(f) => f.to_string(),
    })
}
