//! Payloads of the URL arbiter's registration endpoint.

use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

/// Body sent to `PUT /paths{base_path}`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct UrlArbiterRequest {
    pub publishing_app: String,
}

/// What the arbiter says about a path reservation, kept as the exact JSON
/// text it sent. On conflict and validation failure it is relayed to the
/// caller unchanged.
pub type UrlArbiterResponse = Box<RawValue>;

#[derive(Deserialize)]
struct Reservation {
    publishing_app: Option<String>,
}

/// Application the payload names as the path's owner, if any.
pub fn reserved_by(payload: &RawValue) -> Option<String> {
    serde_json::from_str::<Reservation>(payload.get())
        .ok()
        .and_then(|r| r.publishing_app)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_text_is_kept_verbatim() {
        let text = r#"{"path":"/vat-rates","publishing_app":"hmrc","owner_contact":"x@y","created_at":"2014-10-01 09:30:00 +0100"}"#;
        let payload: UrlArbiterResponse = serde_json::from_str(text).unwrap();
        assert_eq!(payload.get(), text);
        assert_eq!(serde_json::to_string(&payload).unwrap(), text);
    }

    #[test]
    fn reads_owner_from_payload() {
        let payload: UrlArbiterResponse = serde_json::from_str(
            r#"{"publishing_app":"hmrc","errors":{"path":["is already reserved"]}}"#,
        )
        .unwrap();
        assert_eq!(reserved_by(&payload).as_deref(), Some("hmrc"));

        let payload: UrlArbiterResponse =
            serde_json::from_str(r#"{"errors":{"path":["is not valid"]}}"#).unwrap();
        assert_eq!(reserved_by(&payload), None);
    }
}
