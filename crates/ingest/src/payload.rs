use strip_core::{Result, Sample, StripError};

/// Validate one wire message into a [`Sample`].
///
/// The message must be a JSON object carrying numeric `memory`, `cpu`,
/// `read` and `write` fields; anything else is an ingest error and the
/// message is dropped by the caller.
pub fn parse_payload(text: &str) -> Result<Sample> {
    let value: serde_json::Value = serde_json::from_str(text.trim())
        .map_err(|e| StripError::Ingest(format!("malformed payload: {e}")))?;
    if !value.is_object() {
        return Err(StripError::Ingest("payload is not a JSON object".into()));
    }

    let sample: Sample = serde_json::from_value(value)
        .map_err(|e| StripError::Ingest(format!("incomplete payload: {e}")))?;

    if !(sample.memory.is_finite()
        && sample.cpu.is_finite()
        && sample.read.is_finite()
        && sample.write.is_finite())
    {
        return Err(StripError::Ingest("non-finite value in payload".into()));
    }

    Ok(sample)
}
