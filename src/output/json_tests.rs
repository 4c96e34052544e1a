use std::collections::HashMap;

use serde_json::Value;

use super::*;
use crate::batch::SkipReason;

#[test]
fn json_report_structure() {
    let report = UserReport {
        username: "octo".to_string(),
        loc: 5,
        comments: 1,
        blanks: 2,
        loc_by_language: HashMap::from([(".js".to_string(), 3), (".css".to_string(), 2)]),
        analyzed: vec!["hello".to_string()],
        skipped: vec![SkippedRepository {
            name: "fork".to_string(),
            reason: SkipReason::Fork,
        }],
        ..UserReport::default()
    };

    let output = JsonFormatter.format(&report).unwrap();
    let json: Value = serde_json::from_str(&output).unwrap();

    assert_eq!(json["username"], "octo");
    assert_eq!(json["summary"]["repositories"], 1);
    assert_eq!(json["summary"]["loc"], 5);
    assert_eq!(json["by_language"][0]["extension"], ".js");
    assert_eq!(json["by_language"][1]["loc"], 2);
    assert_eq!(json["skipped"][0]["reason"]["kind"], "fork");
    assert_eq!(json["failures"].as_array().unwrap().len(), 0);
    assert_eq!(json["cancelled"], false);
}

#[test]
fn empty_extension_kept_verbatim() {
    let report = UserReport {
        loc_by_language: HashMap::from([(String::new(), 4)]),
        ..UserReport::new("octo")
    };

    let json: Value = serde_json::from_str(&JsonFormatter.format(&report).unwrap()).unwrap();
    assert_eq!(json["by_language"][0]["extension"], "");
}
