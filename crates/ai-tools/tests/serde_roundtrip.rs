#![cfg(feature = "serde")]

use ai_tools::{TraceEvent, TraceLog};

#[test]
fn trace_log_roundtrips_via_serde() {
    let mut log = TraceLog::default();
    log.push(TraceEvent::new(3, "goap.action.start").with_agent(2).with_subject("GetCart"));
    log.push(TraceEvent::new(9, "goap.action.complete").with_agent(2).with_value(1.5));

    let json = serde_json::to_string(&log).expect("serialize trace log");
    let back: TraceLog = serde_json::from_str(&json).expect("deserialize trace log");

    assert_eq!(back, log);
}
