//! Wire message shapes.
//!
//! All traffic is small JSON objects. The field names (`lvlUP`,
//! `lvlDOWN`) are part of the dashboard contract and must not change.
//! Unknown sensor readings serialize as `null` so the dashboard can
//! distinguish "empty tank" from "sensor saw nothing".

use serde::Serialize;

/// Broadcast payload: both tank levels, pushed to every client each
/// sampling cycle. Derived fresh every cycle; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TankStatus {
    #[serde(rename = "lvlUP")]
    pub lvl_up: Option<u8>,
    #[serde(rename = "lvlDOWN")]
    pub lvl_down: Option<u8>,
}

/// Unicast reply to a `Get` request. `status` is `null` for ids that
/// were never set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GetResponse {
    pub id: u16,
    pub status: Option<bool>,
}

/// Unicast reply to a rejected request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tank_status_wire_shape() {
        let s = TankStatus {
            lvl_up: Some(73),
            lvl_down: Some(0),
        };
        assert_eq!(
            serde_json::to_string(&s).unwrap(),
            r#"{"lvlUP":73,"lvlDOWN":0}"#
        );
    }

    #[test]
    fn unknown_reading_is_null_not_zero() {
        let s = TankStatus {
            lvl_up: None,
            lvl_down: Some(40),
        };
        assert_eq!(
            serde_json::to_string(&s).unwrap(),
            r#"{"lvlUP":null,"lvlDOWN":40}"#
        );
    }

    #[test]
    fn get_response_wire_shape() {
        let r = GetResponse {
            id: 5,
            status: Some(true),
        };
        assert_eq!(serde_json::to_string(&r).unwrap(), r#"{"id":5,"status":true}"#);

        let unknown = GetResponse { id: 9, status: None };
        assert_eq!(
            serde_json::to_string(&unknown).unwrap(),
            r#"{"id":9,"status":null}"#
        );
    }

    #[test]
    fn error_response_wire_shape() {
        let e = ErrorResponse {
            error: "malformed request",
        };
        assert_eq!(
            serde_json::to_string(&e).unwrap(),
            r#"{"error":"malformed request"}"#
        );
    }
}
