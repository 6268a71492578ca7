//! Conversion of response elements into generic records.
//!
//! The service schema is owned by the vendor and changes without notice, so
//! the converter is best effort: it never fails on an unexpected shape and
//! falls back to the raw text of whatever it could not interpret.

use quick_xml::events::{BytesStart, BytesText, Event};
use quick_xml::Reader;
use serde_json::Value;

/// Converts the element that `reader` is currently inside of into a value.
///
/// Elements with child elements become objects (repeated child names collapse
/// into an array), text-only elements become guessed scalars and empty or
/// `xsi:nil` elements become `Null`.
pub(crate) fn element_to_value<'a>(
    reader: &mut Reader<&'a [u8]>,
    element: &BytesStart<'a>,
) -> Result<Value, quick_xml::Error> {
    let nil = is_nil(element);
    let mut children: Vec<(String, Value)> = Vec::new();
    let mut text = String::new();

    loop {
        match reader.read_event()? {
            Event::Start(child) => {
                let name = local_name(&child);
                let value = element_to_value(reader, &child)?;
                children.push((name, value));
            }
            Event::Empty(child) => children.push((local_name(&child), Value::Null)),
            Event::Text(content) => text.push_str(&text_content(&content)),
            Event::CData(content) => text.push_str(&String::from_utf8_lossy(&content)),
            Event::End(_) => break,
            Event::Eof => break,
            _ => {}
        }
    }

    if nil {
        return Ok(Value::Null);
    }

    if !children.is_empty() {
        Ok(group_children(children))
    } else if text.is_empty() {
        Ok(Value::Null)
    } else {
        Ok(scalar(&text))
    }
}

/// The element name without its namespace prefix.
pub(crate) fn local_name(element: &BytesStart) -> String {
    String::from_utf8_lossy(element.local_name().as_ref()).into_owned()
}

pub(crate) fn text_content(text: &BytesText) -> String {
    match text.xml_content() {
        Ok(unescaped) => unescaped.into_owned(),
        Err(_) => String::from_utf8_lossy(text).into_owned(),
    }
}

fn is_nil(element: &BytesStart) -> bool {
    element.attributes().flatten().any(|attribute| {
        attribute.key.local_name().as_ref() == b"nil"
            && matches!(attribute.value.as_ref(), b"true" | b"1")
    })
}

/// Builds an object from named child values, collapsing repeated names into
/// an array in first-seen order.
fn group_children(children: Vec<(String, Value)>) -> Value {
    let mut object = serde_json::Map::new();

    for (name, value) in children {
        match object.get_mut(&name) {
            Some(Value::Array(items)) => items.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                object.insert(name, value);
            }
        }
    }

    Value::Object(object)
}

/// Guesses the type of a text leaf.
pub(crate) fn scalar(text: &str) -> Value {
    match text {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }

    // A leading zero marks an identifier (plates, serials), not a number.
    if !has_leading_zero(text) {
        if let Ok(integer) = text.parse::<i64>() {
            return Value::Number(integer.into());
        }
        if let Ok(float) = text.parse::<f64>() {
            if let Some(number) = serde_json::Number::from_f64(float) {
                return Value::Number(number);
            }
        }
    }

    if let Some(formatted) = normalize_datetime(text) {
        return Value::String(formatted);
    }

    Value::String(text.to_string())
}

fn has_leading_zero(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    digits.len() > 1
        && digits.starts_with('0')
        && digits.chars().all(|c| c.is_ascii_digit())
}

/// Normalizes `xsd:dateTime` values to `YYYY-MM-DD HH:MM:SS`.
pub(crate) fn normalize_datetime(text: &str) -> Option<String> {
    const OUTPUT: &str = "%Y-%m-%d %H:%M:%S";

    if let Ok(datetime) = chrono::DateTime::parse_from_rfc3339(text) {
        return Some(datetime.naive_local().format(OUTPUT).to_string());
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(datetime) = chrono::NaiveDateTime::parse_from_str(text, format) {
            return Some(datetime.format(OUTPUT).to_string());
        }
    }

    None
}
