use super::*;

#[test]
fn content_disposition_extracts_quoted_filename() {
    let value = r#"attachment; filename="release-1.2.3.tar.gz""#;
    assert_eq!(
        filename_from_content_disposition(value),
        Some("release-1.2.3.tar.gz".to_string())
    );
}

#[test]
fn content_disposition_extracts_unquoted_filename() {
    let value = "attachment; filename=build.zip";
    assert_eq!(filename_from_content_disposition(value), Some("build.zip".to_string()));
}

#[test]
fn content_disposition_without_filename_param_returns_none() {
    assert_eq!(filename_from_content_disposition("attachment"), None);
}

#[test]
fn filename_from_url_takes_last_path_segment() {
    assert_eq!(
        filename_from_url("https://example.com/releases/tool-1.2.3.tar.gz"),
        "tool-1.2.3.tar.gz"
    );
}

#[test]
fn filename_from_url_strips_query_and_fragment() {
    assert_eq!(
        filename_from_url("https://example.com/download/asset.zip?token=abc#frag"),
        "asset.zip"
    );
}

#[test]
fn filename_from_url_falls_back_when_path_is_empty() {
    assert_eq!(filename_from_url("https://example.com/"), "download");
}

#[test]
fn filename_from_url_uses_host_when_there_is_no_path_segment() {
    assert_eq!(filename_from_url("https://example.com"), "example.com");
}
