//! Parsing of SasIntegra response envelopes.

use quick_xml::events::Event;
use quick_xml::Reader;
use serde_json::Value;

use crate::error::SascarError;
use crate::record::{element_to_value, scalar, text_content};
use crate::SascarResult;

/// Parses a response envelope into the values of the operation response
/// element, normally one per `return` element.
///
/// A SOAP fault in the body is returned as [`SascarError::Fault`].
pub fn parse_response(xml: &str) -> SascarResult<Vec<Value>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    loop {
        match reader.read_event().map_err(SascarError::from)? {
            Event::Start(element) if element.local_name().as_ref() == b"Body" => {
                return read_body(&mut reader);
            }
            Event::Eof => return Err(SascarError::MissingBody),
            _ => {}
        }
    }
}

fn read_body(reader: &mut Reader<&[u8]>) -> SascarResult<Vec<Value>> {
    loop {
        match reader.read_event().map_err(SascarError::from)? {
            Event::Start(element) if element.local_name().as_ref() == b"Fault" => {
                let fault = element_to_value(reader, &element)?;
                return Err(SascarError::Fault {
                    code: fault_field(&fault, "faultcode"),
                    message: fault_field(&fault, "faultstring"),
                });
            }
            Event::Start(_) => return read_operation_payload(reader),
            Event::Empty(_) | Event::End(_) | Event::Eof => return Ok(Vec::new()),
            _ => {}
        }
    }
}

/// Reads the children of the operation response element. List results repeat
/// the `return` element, scalar results carry a single text node.
fn read_operation_payload(reader: &mut Reader<&[u8]>) -> SascarResult<Vec<Value>> {
    let mut values = Vec::new();

    loop {
        match reader.read_event().map_err(SascarError::from)? {
            Event::Start(child) => values.push(element_to_value(reader, &child)?),
            Event::Empty(_) => values.push(Value::Null),
            Event::Text(content) => {
                let text = text_content(&content);
                if !text.is_empty() {
                    values.push(scalar(&text));
                }
            }
            Event::End(_) | Event::Eof => break,
            _ => {}
        }
    }

    Ok(values)
}

fn fault_field(fault: &Value, name: &str) -> String {
    match fault.get(name) {
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}
