use serde::Serialize;
use serde_json::Value;
use stockcast_core::UtcDateTime;
use uuid::Uuid;

use crate::error::CliError;

/// Standard response envelope for every `stockcast` output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope<T> {
    pub meta: EnvelopeMeta,
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn new(meta: EnvelopeMeta, data: T) -> Self {
        Self { meta, data }
    }
}

/// Metadata attached to every envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvelopeMeta {
    pub request_id: String,
    pub generated_at: UtcDateTime,
    pub source: String,
    pub latency_ms: u64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl EnvelopeMeta {
    pub fn new(source: impl Into<String>, latency_ms: u64) -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
            generated_at: UtcDateTime::now(),
            source: source.into(),
            latency_ms,
            warnings: Vec::new(),
        }
    }

    pub fn push_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }
}

pub fn render(envelope: &Envelope<Value>, pretty: bool) -> Result<(), CliError> {
    println!("{}", to_json(envelope, pretty)?);
    Ok(())
}

fn to_json(envelope: &Envelope<Value>, pretty: bool) -> Result<String, CliError> {
    let payload = if pretty {
        serde_json::to_string_pretty(envelope)?
    } else {
        serde_json::to_string(envelope)?
    };
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_id_is_uuid_v4() {
        let meta = EnvelopeMeta::new("backend", 12);
        let parsed = Uuid::parse_str(&meta.request_id).expect("request id is a uuid");
        assert_eq!(parsed.get_version_num(), 4);
    }

    #[test]
    fn warnings_are_omitted_when_empty() {
        let envelope = Envelope::new(EnvelopeMeta::new("backend", 7), json!({"ok": true}));
        let rendered: Value =
            serde_json::from_str(&to_json(&envelope, false).expect("serializes")).expect("json");

        assert!(rendered["meta"].get("warnings").is_none());
        assert_eq!(rendered["meta"]["latency_ms"], 7);
        assert_eq!(rendered["data"]["ok"], true);
    }

    #[test]
    fn pretty_output_is_multiline() {
        let mut meta = EnvelopeMeta::new("backend", 0);
        meta.push_warning("offline");
        let envelope = Envelope::new(meta, json!([1, 2]));

        let rendered = to_json(&envelope, true).expect("serializes");
        assert!(rendered.contains('\n'));
        assert!(rendered.contains("\"offline\""));
    }
}
