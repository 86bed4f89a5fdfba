use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use iis_report_batch::error::GeneratorError;
use iis_report_batch::utils::logging;
use iis_report_batch::{
    run_batch, App, BatchRequest, Config, EventSink, FailureKind, ProcessOutput, ReportFlow,
    ReportGenerator, ReportJob, ReportOutcome,
};

/// 工具对某个应用的固定行为
#[derive(Clone, Copy)]
enum Behavior {
    /// 生成文件，stderr 为空
    Report,
    /// 生成文件，同时写 stderr
    ReportWithWarning,
    /// 不生成文件
    Nothing,
    /// 只写 stderr
    Error,
    /// 无法启动
    Unlaunchable,
}

/// 行为确定的测试生成器
#[derive(Default)]
struct ScriptedGenerator {
    behaviors: HashMap<String, Behavior>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    fn new(behaviors: &[(&str, Behavior)]) -> Self {
        Self {
            behaviors: behaviors
                .iter()
                .map(|(id, b)| (id.to_string(), *b))
                .collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReportGenerator for ScriptedGenerator {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, job: &ReportJob) -> Result<ProcessOutput, GeneratorError> {
        self.calls.lock().unwrap().push(job.identifier.clone());

        let behavior = self
            .behaviors
            .get(&job.identifier)
            .copied()
            .unwrap_or(Behavior::Report);

        let write_report = || std::fs::write(&job.destination, "Fecha,Hora,Ruta\n").unwrap();

        match behavior {
            Behavior::Report => {
                write_report();
                Ok(ProcessOutput {
                    stdout: "Elements output: 1".to_string(),
                    exit_code: Some(0),
                    ..Default::default()
                })
            }
            Behavior::ReportWithWarning => {
                write_report();
                Ok(ProcessOutput {
                    stderr: "WARNING: some lines were skipped".to_string(),
                    exit_code: Some(0),
                    ..Default::default()
                })
            }
            Behavior::Nothing => Ok(ProcessOutput::default()),
            Behavior::Error => Ok(ProcessOutput {
                stderr: "Error: log file not found".to_string(),
                exit_code: Some(1),
                ..Default::default()
            }),
            Behavior::Unlaunchable => Err(GeneratorError::Launch {
                program: "LogParser.exe".to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
            }),
        }
    }
}

fn quiet_config() -> Config {
    Config {
        step_delay_ms: 0,
        ..Config::default()
    }
}

fn request(output_dir: &Path, identifiers: &str) -> BatchRequest {
    BatchRequest::from_raw("C:\\inetpub\\logs", identifiers, &output_dir.to_string_lossy()).unwrap()
}

fn failure_kind(outcome: &ReportOutcome) -> Option<FailureKind> {
    match outcome {
        ReportOutcome::Failure { kind, .. } => Some(*kind),
        ReportOutcome::Success { .. } => None,
    }
}

#[tokio::test]
async fn test_one_outcome_per_identifier_in_input_order() {
    logging::init(false);

    let dir = tempfile::tempdir().unwrap();
    let generator = Arc::new(ScriptedGenerator::new(&[
        ("warn", Behavior::ReportWithWarning),
        ("missing", Behavior::Nothing),
        ("broken", Behavior::Error),
        ("nolaunch", Behavior::Unlaunchable),
    ]));
    let flow = ReportFlow::new(&quiet_config(), generator.clone());
    let request = request(
        dir.path(),
        "Café App\nwarn\nmissing\nbroken\nnolaunch\nportal",
    );

    let result = run_batch(&request, &flow, Duration::ZERO, &EventSink::disabled())
        .await
        .unwrap();

    let ids: Vec<&str> = result.outcomes().iter().map(|o| o.identifier()).collect();
    assert_eq!(
        ids,
        vec!["Café App", "warn", "missing", "broken", "nolaunch", "portal"]
    );

    let kinds: Vec<Option<FailureKind>> = result.outcomes().iter().map(failure_kind).collect();
    assert_eq!(
        kinds,
        vec![
            None,
            Some(FailureKind::ToolReported),
            Some(FailureKind::MissingOutput),
            Some(FailureKind::ToolReported),
            Some(FailureKind::ProcessLaunch),
            None,
        ]
    );

    assert_eq!(
        result.outcomes()[0],
        ReportOutcome::Success {
            identifier: "Café App".to_string(),
            output_file: dir.path().join("resultados_Cafe_App.csv"),
        }
    );
    assert_eq!(generator.calls().len(), 6);
}

#[tokio::test]
async fn test_all_failures_still_complete_and_are_named() {
    let dir = tempfile::tempdir().unwrap();
    let generator = Arc::new(ScriptedGenerator::new(&[
        ("c", Behavior::Error),
        ("a", Behavior::Nothing),
        ("b", Behavior::Unlaunchable),
    ]));
    let flow = ReportFlow::new(&quiet_config(), generator.clone());

    let result = run_batch(
        &request(dir.path(), "c\na\nb"),
        &flow,
        Duration::ZERO,
        &EventSink::disabled(),
    )
    .await
    .unwrap();

    assert_eq!(generator.calls(), vec!["c", "a", "b"]);
    assert_eq!(result.failed_identifiers(), vec!["c", "a", "b"]);
    assert_eq!(result.summary_message(), "以下应用的报表生成失败: c, a, b。");
}

#[tokio::test]
async fn test_unsafe_identifier_fails_without_calling_generator() {
    let dir = tempfile::tempdir().unwrap();
    let generator = Arc::new(ScriptedGenerator::default());
    let flow = ReportFlow::new(&quiet_config(), generator.clone());

    let result = run_batch(
        &request(dir.path(), "api\nx' OR '1'='1\nportal & del *"),
        &flow,
        Duration::ZERO,
        &EventSink::disabled(),
    )
    .await
    .unwrap();

    assert_eq!(generator.calls(), vec!["api"]);
    assert_eq!(
        result.outcomes().iter().map(failure_kind).collect::<Vec<_>>(),
        vec![
            None,
            Some(FailureKind::UnsafeIdentifier),
            Some(FailureKind::UnsafeIdentifier)
        ]
    );
}

#[tokio::test]
async fn test_identical_runs_give_identical_outcomes() {
    let dir = tempfile::tempdir().unwrap();
    let generator = Arc::new(ScriptedGenerator::new(&[("legacy", Behavior::Nothing)]));
    let flow = ReportFlow::new(&quiet_config(), generator);
    let request = request(dir.path(), "api\nlegacy\nportal\napi");

    let first = run_batch(&request, &flow, Duration::ZERO, &EventSink::disabled())
        .await
        .unwrap();
    let second = run_batch(&request, &flow, Duration::ZERO, &EventSink::disabled())
        .await
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(first.outcomes().len(), 4);
    assert_eq!(first.failed_identifiers(), vec!["legacy"]);
}

/// 用 shell 脚本模拟 LogParser，走完整的 App 流程
#[cfg(unix)]
#[tokio::test]
async fn test_end_to_end_with_fake_logparser() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("LogParser.sh");
    // 从 INTO '<file>' 中取出目标路径；查询里带 "legacy" 时只写 stderr
    std::fs::write(
        &script,
        r#"#!/bin/sh
query="$1"
case "$query" in
  *legacy*) echo "Error: no log files matched" 1>&2; exit 1 ;;
esac
dest=$(printf '%s' "$query" | sed -n "s/.* INTO '\([^']*\)' FROM .*/\1/p")
printf 'Fecha,Hora\n' > "$dest"
echo "Elements output: 1"
"#,
    )
    .unwrap();
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

    let output_dir = dir.path().join("reports");
    let transcript = dir.path().join("transcript.txt");
    let config = Config {
        tool_path: Some(script),
        transcript_file: Some(transcript.to_string_lossy().into_owned()),
        ..quiet_config()
    };
    let app = App::initialize(config).unwrap();
    let request = BatchRequest::from_raw(
        &dir.path().join("logs").to_string_lossy(),
        "Gestión Nómina\nlegacy",
        &output_dir.to_string_lossy(),
    )
    .unwrap();

    let result = app.run(&request).await.unwrap();

    assert!(output_dir.join("resultados_Gestion_Nomina.csv").exists());
    assert_eq!(result.failed_identifiers(), vec!["legacy"]);
    assert_eq!(failure_kind(&result.outcomes()[1]), Some(FailureKind::ToolReported));

    let content = std::fs::read_to_string(&transcript).unwrap();
    assert!(content.contains("Elements output: 1"));
    assert!(content.contains("Error: no log files matched"));
}
