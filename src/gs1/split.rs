use super::builder::{AiField, validate_field};
use super::registry::AiRegistry;
use crate::code128::Marker;
use crate::error::{BarcodeError, Result};

/// Split decoded GS1-128 text into its AI fields.
///
/// `[FNC1]` markers separate groups; inside a group, fixed length AIs are
/// cut by their declared size and a variable length AI takes the rest.
pub fn parse_elements(text: &str, registry: &AiRegistry) -> Result<Vec<AiField>> {
    let mut fields = Vec::new();
    for segment in text.split(Marker::Fnc1.as_str()).filter(|s| !s.is_empty()) {
        let mut rest = segment;
        while !rest.is_empty() {
            let spec = registry.match_prefix(rest).ok_or_else(|| {
                let head: String = rest.chars().take(4).collect();
                BarcodeError::field(head, "unknown application identifier")
            })?;
            let body = &rest[spec.ai.len()..];
            let take = if spec.length.is_fixed() {
                spec.length.max_len()
            } else {
                body.len()
            };
            let data = body.get(..take).ok_or_else(|| {
                BarcodeError::field(
                    spec.ai.as_str(),
                    format!("truncated: expected {take} characters"),
                )
            })?;
            if data.len() > spec.length.max_len() {
                return Err(BarcodeError::field(
                    spec.ai.as_str(),
                    format!(
                        "{} characters exceed the maximum of {}",
                        data.len(),
                        spec.length.max_len()
                    ),
                ));
            }
            tracing::trace!(ai = %spec.ai, data, "split GS1 element");
            fields.push(AiField {
                ai: spec.ai.clone(),
                data: data.to_string(),
            });
            rest = &body[take..];
        }
    }
    Ok(fields)
}

/// Element strings (AI digits plus data) found in `text`.
pub fn get_ai_data(text: &str, registry: &AiRegistry) -> Result<Vec<String>> {
    Ok(parse_elements(text, registry)?
        .iter()
        .map(AiField::element)
        .collect())
}

/// Like [`parse_elements`], additionally validating every field's content.
pub fn parse_validated(text: &str, registry: &AiRegistry) -> Result<Vec<AiField>> {
    parse_elements(text, registry)?
        .into_iter()
        .map(|field| {
            let spec = registry.get(&field.ai)?;
            let data = validate_field(spec, &field.data)?;
            Ok(AiField { data, ..field })
        })
        .collect()
}
