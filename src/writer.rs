use crate::Result;
use crate::models::JobRecord;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// 기존 JSON 배열을 읽어 레코드를 이어 붙이고 전체를 다시 쓴다.
/// 저장 실패는 로그만 남기고 이후 미션 진행을 막지 않는다.
pub fn append_to_json(path: &Path, records: &[JobRecord]) {
    match try_append(path, records) {
        Ok(total) => println!("✅ 저장 완료: {} (총 {}건)", path.display(), total),
        Err(e) => eprintln!("❌ 저장 실패 ({}): {}", path.display(), e),
    }
}

fn try_append(path: &Path, records: &[JobRecord]) -> Result<usize> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    // 스키마가 다른 기존 항목도 배열이기만 하면 보존한다
    let mut existing: Vec<Value> = if path.exists() {
        serde_json::from_str(&fs::read_to_string(path)?)?
    } else {
        Vec::new()
    };

    for record in records {
        existing.push(serde_json::to_value(record)?);
    }

    fs::write(path, serde_json::to_string_pretty(&existing)?)?;
    Ok(existing.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::JobRecord;
    use chrono::Utc;
    use tempfile::tempdir;

    fn record(title: &str) -> JobRecord {
        JobRecord {
            title: title.to_string(),
            company: "Acme".to_string(),
            location: String::new(),
            job_type: String::new(),
            description: String::new(),
            posted_time: String::new(),
            job_url: String::new(),
            detail_content: None,
            source: "test".to_string(),
            scraped_at: Utc::now(),
        }
    }

    #[test]
    fn appends_preserve_order_across_calls() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ca_job_listings.json");

        append_to_json(&path, &[record("first"), record("second")]);
        append_to_json(&path, &[record("third")]);

        let parsed: Vec<JobRecord> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let titles: Vec<_> = parsed.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["first", "second", "third"]);
    }

    #[test]
    fn creates_missing_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("out.json");

        append_to_json(&path, &[record("only")]);

        let parsed: Vec<JobRecord> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed.len(), 1);
    }

    #[test]
    fn leaves_file_untouched_when_existing_content_is_invalid() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        append_to_json(&path, &[record("ignored")]);

        assert_eq!(fs::read_to_string(&path).unwrap(), "{ not json");
    }

    #[test]
    fn leaves_file_untouched_when_existing_content_is_not_an_array() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("object.json");
        fs::write(&path, r#"{"jobs": []}"#).unwrap();

        append_to_json(&path, &[record("ignored")]);

        assert_eq!(fs::read_to_string(&path).unwrap(), r#"{"jobs": []}"#);
    }

    #[test]
    fn writes_pretty_printed_two_space_indent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pretty.json");

        append_to_json(&path, &[record("only")]);

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("[\n  {\n"));
    }

    #[test]
    fn keeps_foreign_entries_already_in_the_array() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mixed.json");
        fs::write(&path, r#"[{"legacy": true}]"#).unwrap();

        append_to_json(&path, &[record("new")]);

        let parsed: Vec<Value> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0]["legacy"], true);
        assert_eq!(parsed[1]["title"], "new");
    }
}
