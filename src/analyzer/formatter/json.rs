//! JSON output formatter.

use serde_json::json;

use crate::analyzer::report::{FileReport, Summary};

/// Format reports as JSON.
pub fn format(reports: &[FileReport]) -> String {
    let files: Vec<serde_json::Value> = reports
        .iter()
        .map(|report| {
            let violations: Vec<serde_json::Value> = report
                .violations
                .iter()
                .map(|v| {
                    json!({
                        "type": v.kind.as_str(),
                        "service": v.service,
                        "field": v.field,
                        "message": v.message,
                        "expected": v.expected,
                        "actual": v.actual,
                        "line": v.position.map(|p| p.line),
                        "column": v.position.map(|p| p.column)
                    })
                })
                .collect();

            let changes: Vec<String> = report.changes.iter().map(ToString::to_string).collect();

            json!({
                "filePath": report.file_path,
                "valid": report.is_valid(),
                "violations": violations,
                "changes": changes,
                "fixed": report.written,
                "error": report.error
            })
        })
        .collect();

    let summary = Summary::from_reports(reports);
    let output = json!({
        "files": files,
        "summary": {
            "files": summary.files,
            "valid": summary.valid,
            "fixed": summary.fixed,
            "errors": summary.errors,
            "violations": summary.violations
        }
    });

    serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::check::ValidationResult;
    use crate::analyzer::types::{Position, Violation, ViolationKind};

    #[test]
    fn test_json_format() {
        let violation = Violation::new(ViolationKind::Order, "web", "image", "field 'image' is out of order")
            .with_mismatch("container_name", "image")
            .with_position(Some(Position::new(4, 5)));
        let reports = vec![
            FileReport::checked(ValidationResult::new("docker-compose.yml", vec![violation])),
            FileReport::failed("missing.yml", "failed to read file"),
        ];

        let output = format(&reports);
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();

        let files = parsed["files"].as_array().unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0]["filePath"], "docker-compose.yml");
        assert_eq!(files[0]["valid"], false);
        assert_eq!(files[0]["violations"][0]["type"], "order");
        assert_eq!(files[0]["violations"][0]["expected"], "container_name");
        assert_eq!(files[0]["violations"][0]["line"], 4);
        assert_eq!(files[1]["error"], "failed to read file");
        assert_eq!(parsed["summary"]["violations"], 1);
        assert_eq!(parsed["summary"]["errors"], 1);
    }
}
