use super::*;

use chrono::NaiveDateTime;

#[test]
fn parses_long_file_flag() {
    let cli = Cli::try_parse_from(["lstr", "--file", "config/bba_weekly.json"])
        .expect("expected valid cli args");
    assert_eq!(cli.file, PathBuf::from("config/bba_weekly.json"));
    assert!(cli.log_level.is_none());
}

#[test]
fn parses_short_file_flag_and_log_level() {
    let cli = Cli::try_parse_from(["lstr", "-f", "dls.yaml", "--log-level", "debug"])
        .expect("expected valid cli args");
    assert_eq!(cli.file, PathBuf::from("dls.yaml"));
    assert_eq!(cli.log_level.as_deref(), Some("debug"));
}

#[test]
fn file_flag_is_required() {
    assert!(Cli::try_parse_from(["lstr"]).is_err());
}

#[test]
fn log_file_name_is_unpadded() {
    let started =
        NaiveDateTime::parse_from_str("2026-10-09 08:05:03", "%Y-%m-%d %H:%M:%S").unwrap();
    assert_eq!(
        logging::log_file_path(Path::new("logs"), started),
        PathBuf::from("logs/periodic_reporter_10-9-2026_8-5-3.log")
    );
}

#[tokio::test]
async fn missing_config_file_fails_before_any_work() {
    let dir = tempfile::tempdir().unwrap();
    let settings = RuntimeSettings {
        log_level: "info".to_string(),
        log_dir: dir.path().to_path_buf(),
        http_timeout_secs: 5,
        poll_interval_secs: 0,
        poll_max_attempts: 3,
        zoom_max_pages: 5,
    };
    let run_date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
    let err = run(
        &dir.path().join("absent.json"),
        &settings,
        run_date,
        &dir.path().join("run.log"),
    )
    .await
    .unwrap_err();
    assert!(format!("{err:#}").contains("loading report configuration"));
}
