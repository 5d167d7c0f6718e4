//! Call records as served by the monitoring API.

pub mod domain;

pub use domain::{Call, CallCategory, CallId, CallPriority, CallStatus, Operator};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::UserId;

    const DETAIL: &str = r#"{
        "id": 12,
        "protocol": "ATD-2025-0012",
        "operator_id": 4,
        "operator_name": "Ana Souza",
        "customer_name": "Paulo Lima",
        "customer_phone": null,
        "subject": "Billing question",
        "description": "Customer asked about a duplicate charge",
        "category": "question",
        "priority": "high",
        "status": "in_progress",
        "duration_seconds": 410,
        "created_at": "2025-03-01T10:15:00.123456",
        "updated_at": "2025-03-01T10:30:00",
        "closed_at": null,
        "evaluations": []
    }"#;

    #[test]
    fn decodes_call_detail_with_flat_operator() {
        let call: Call = serde_json::from_str(DETAIL).expect("call decodes");
        assert_eq!(call.id, CallId(12));
        assert_eq!(call.status, CallStatus::InProgress);
        assert_eq!(call.priority, CallPriority::High);
        assert_eq!(call.category, Some(CallCategory::Question));
        assert_eq!(call.operator_display_name(), Some("Ana Souza"));
        assert_eq!(call.operator_id, Some(UserId(4)));
        assert_eq!(call.duration_in_minutes(), Some(7));
        assert!(call.accepts_new_evaluation());
    }

    #[test]
    fn nested_operator_takes_precedence() {
        let mut call: Call = serde_json::from_str(DETAIL).expect("call decodes");
        call.operator = Some(Operator {
            id: UserId(4),
            full_name: "Ana M. Souza".to_string(),
        });
        call.duration_minutes = Some(9);
        assert_eq!(call.operator_display_name(), Some("Ana M. Souza"));
        assert_eq!(call.duration_in_minutes(), Some(9));
    }

    #[test]
    fn unknown_enum_values_round_trip_verbatim() {
        let status = CallStatus::from("escalated".to_string());
        assert_eq!(status, CallStatus::Other("escalated".to_string()));
        assert_eq!(status.label(), "escalated");
        let encoded = serde_json::to_string(&status).expect("encodes");
        assert_eq!(encoded, "\"escalated\"");
        assert_eq!(
            serde_json::to_string(&CallPriority::Urgent).expect("encodes"),
            "\"urgent\""
        );
    }
}
