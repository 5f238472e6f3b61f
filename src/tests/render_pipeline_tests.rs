#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use base64::Engine as _;
    use std::path::{ Path, PathBuf };
    use std::sync::{ Arc, Mutex };
    use std::time::Duration;
    use tempfile::TempDir;
    use tokio::io::{ AsyncReadExt, AsyncWriteExt };
    use tokio::net::TcpListener;

    use crate::config::PipelineConfig;
    use crate::errors::{ FlowscribeError, FlowscribeResult };
    use crate::implementations::config::RenderConfig;
    use crate::implementations::image_pipeline::{ resolve_strategy, ImagePipeline };
    use crate::implementations::persistence::ArtifactWriter;
    use crate::implementations::pipeline::PipelineRunner;
    use crate::implementations::renderer::MermaidInkRenderer;
    use crate::models::common::{ ImageFormat, RenderStrategy, RenderTier };
    use crate::models::diagram::DiagramKind;
    use crate::models::report::PersistedArtifact;
    use crate::models::requirements::RequirementsSource;
    use crate::traits::diagram_pipeline::DiagramPipeline;
    use crate::traits::image_renderer::{ ImageRenderer, ToolLocator };

    /// Locator answering from fixed values and recording which lookups ran
    #[derive(Default, Clone)]
    struct StubLocator {
        global: Option<PathBuf>,
        project: Option<PathBuf>,
        installed: Option<PathBuf>,
        calls: Arc<Mutex<Vec<&'static str>>>,
    }

    impl StubLocator {
        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ToolLocator for StubLocator {
        async fn probe_global(&self) -> Option<PathBuf> {
            self.calls.lock().unwrap().push("global");
            self.global.clone()
        }

        async fn probe_project(&self) -> Option<PathBuf> {
            self.calls.lock().unwrap().push("project");
            self.project.clone()
        }

        async fn install(&self) -> FlowscribeResult<PathBuf> {
            self.calls.lock().unwrap().push("install");
            self.installed
                .clone()
                .ok_or_else(|| FlowscribeError::InstallFailure("npm not found".to_string()))
        }
    }

    async fn serve_http(status: &'static str, body: &'static [u8]) -> (String, Arc<Mutex<Vec<String>>>) {
        serve_http_sequence(vec![(status, body)]).await
    }

    /// Answers the n-th request with the n-th canned response, repeating the
    /// last one; returns the base URL and the request lines it has seen.
    async fn serve_http_sequence(
        responses: Vec<(&'static str, &'static [u8])>
    ) -> (String, Arc<Mutex<Vec<String>>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = seen.clone();

        tokio::spawn(async move {
            for served in 0.. {
                let (status, body) = responses[served.min(responses.len() - 1)];
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }
                let text = String::from_utf8_lossy(&request);
                if let Some(line) = text.lines().next() {
                    log.lock().unwrap().push(line.to_string());
                }
                let head = format!(
                    "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    status,
                    body.len()
                );
                let _ = socket.write_all(head.as_bytes()).await;
                let _ = socket.write_all(body).await;
                let _ = socket.shutdown().await;
            }
        });

        (format!("http://{}", addr), seen)
    }

    fn direct_client() -> reqwest::Client {
        reqwest::Client::builder().no_proxy().timeout(Duration::from_secs(5)).build().unwrap()
    }

    fn persist_source(dir: &Path, name: &str, source: &str) -> PersistedArtifact {
        ArtifactWriter::create(dir)
            .unwrap()
            .write_verified(&format!("{}.mmd", name), source.as_bytes())
            .unwrap()
    }

    #[tokio::test]
    async fn test_resolution_follows_tier_order() {
        let locator = StubLocator {
            global: Some(PathBuf::from("/usr/bin/mmdc")),
            ..Default::default()
        };
        let strategy = resolve_strategy(&RenderTier::default_order(), &locator, true).await;
        assert_eq!(strategy, RenderStrategy::LocalGlobal(PathBuf::from("/usr/bin/mmdc")));
        assert_eq!(locator.calls(), vec!["global"]);

        let locator = StubLocator {
            global: Some(PathBuf::from("/usr/bin/mmdc")),
            ..Default::default()
        };
        let strategy = resolve_strategy(&[RenderTier::Remote, RenderTier::Global], &locator, true).await;
        assert_eq!(strategy, RenderStrategy::Remote);
        assert!(locator.calls().is_empty());
    }

    #[tokio::test]
    async fn test_project_tier_before_install() {
        let locator = StubLocator {
            project: Some(PathBuf::from("node_modules/.bin/mmdc")),
            installed: Some(PathBuf::from("unused")),
            ..Default::default()
        };
        let strategy = resolve_strategy(&RenderTier::default_order(), &locator, false).await;

        assert_eq!(strategy, RenderStrategy::LocalProject(PathBuf::from("node_modules/.bin/mmdc")));
        assert_eq!(locator.calls(), vec!["global", "project"]);
    }

    #[tokio::test]
    async fn test_successful_install_resolves_to_project_tool() {
        let locator = StubLocator {
            installed: Some(PathBuf::from("node_modules/.bin/mmdc")),
            ..Default::default()
        };
        let strategy = resolve_strategy(&RenderTier::default_order(), &locator, true).await;

        assert_eq!(strategy, RenderStrategy::LocalProject(PathBuf::from("node_modules/.bin/mmdc")));
        assert_eq!(locator.calls(), vec!["global", "project", "install"]);
    }

    #[tokio::test]
    async fn test_failed_install_falls_through_to_remote() {
        let locator = StubLocator::default();

        let strategy = resolve_strategy(&RenderTier::default_order(), &locator, true).await;
        assert_eq!(strategy, RenderStrategy::Remote);

        let strategy = resolve_strategy(&RenderTier::default_order(), &locator, false).await;
        assert_eq!(strategy, RenderStrategy::Unavailable);
    }

    #[tokio::test]
    async fn test_no_renderer_keeps_text_artifacts() {
        let temp = TempDir::new().unwrap();
        let mut config = PipelineConfig::new(RequirementsSource::Text("User can login.".to_string()), temp.path());
        config.render.remote_endpoint = None;

        let stub = StubLocator::default();
        let lookups = stub.clone();
        let runner = PipelineRunner::new().with_locator_factory(
            Box::new(move |_config: &PipelineConfig| Box::new(stub.clone()) as Box<dyn ToolLocator>)
        );

        let report = runner.run(&config).await.unwrap();

        let images = report.images.as_ref().unwrap();
        assert_eq!(images.strategy, RenderStrategy::Unavailable);
        assert_eq!(report.image_counts().succeeded, 0);
        assert_eq!(report.image_counts().attempted, DiagramKind::ALL.len());
        assert_eq!(report.text_artifacts().succeeded, DiagramKind::ALL.len() + 1);
        assert!(report.is_success());
        assert_eq!(lookups.calls(), vec!["global", "project", "install"]);
        assert!(!temp.path().join("images").exists());
    }

    #[test]
    fn test_remote_url_encodes_source() {
        let source = "graph TD\n    A[Start] --> B{Ok?}\n";
        let png = MermaidInkRenderer::new("https://mermaid.ink/", ImageFormat::Png, Duration::from_secs(5)).unwrap();
        let url = png.request_url(source);

        let encoded = url
            .strip_prefix("https://mermaid.ink/img/")
            .and_then(|rest| rest.strip_suffix("?type=png"))
            .unwrap();
        let decoded = base64::engine::general_purpose::URL_SAFE.decode(encoded).unwrap();
        assert_eq!(decoded, source.as_bytes());

        let svg = MermaidInkRenderer::new("https://mermaid.ink", ImageFormat::Svg, Duration::from_secs(5)).unwrap();
        assert!(svg.request_url(source).starts_with("https://mermaid.ink/svg/"));
    }

    #[tokio::test]
    async fn test_remote_render_writes_response_body() {
        let (base, seen) = serve_http("200 OK", b"\x89PNG fake image").await;
        let temp = TempDir::new().unwrap();
        let artifact = persist_source(temp.path(), "api_flow", "graph TD\n    A --> B\n");
        let output = temp.path().join("api_flow.png");

        let renderer = MermaidInkRenderer::with_client(direct_client(), &base, ImageFormat::Png, Duration::from_secs(5));
        renderer.render(&artifact.path, &output).await.unwrap();

        assert_eq!(std::fs::read(&output).unwrap(), b"\x89PNG fake image");
        let requests = seen.lock().unwrap().clone();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].starts_with("GET /img/"));
        assert!(requests[0].contains("?type=png"));
    }

    #[tokio::test]
    async fn test_remote_non_200_is_an_artifact_failure() {
        let (base, _) = serve_http("500 Internal Server Error", b"boom").await;
        let temp = TempDir::new().unwrap();
        let artifact = persist_source(temp.path(), "data_flow", "graph TD\n    A --> B\n");
        let output = temp.path().join("data_flow.png");

        let renderer = MermaidInkRenderer::with_client(direct_client(), &base, ImageFormat::Png, Duration::from_secs(5));
        let err = renderer.render(&artifact.path, &output).await.unwrap_err();

        assert!(matches!(err, FlowscribeError::RemoteRenderFailure { status: 500, .. }));
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn test_remote_accepted_is_not_success() {
        let (base, _) = serve_http("202 Accepted", b"queued").await;
        let temp = TempDir::new().unwrap();
        let artifact = persist_source(temp.path(), "api_flow", "graph TD\n    A --> B\n");

        let renderer = MermaidInkRenderer::with_client(direct_client(), &base, ImageFormat::Png, Duration::from_secs(5));
        let err = renderer.render(&artifact.path, &temp.path().join("api_flow.png")).await.unwrap_err();

        assert!(matches!(err, FlowscribeError::RemoteRenderFailure { status: 202, .. }));
    }

    #[tokio::test]
    async fn test_remote_render_all_continues_after_failure() {
        let (base, seen) = serve_http_sequence(
            vec![("200 OK", &b"\x89PNG first"[..]), ("500 Internal Server Error", &b"boom"[..])]
        ).await;
        let temp = TempDir::new().unwrap();
        let artifacts = vec![
            persist_source(temp.path(), "user_journey", "graph TD\n    A[Login]\n"),
            persist_source(temp.path(), "data_flow", "graph TD\n    A --> B\n")
        ];
        let config = RenderConfig {
            remote_endpoint: Some(base),
            ..RenderConfig::default()
        };

        let pipeline = ImagePipeline::with_locator(
            config,
            vec![RenderTier::Global, RenderTier::Remote],
            Box::new(StubLocator::default())
        ).with_http_client(direct_client());
        let report = pipeline.render_all(&artifacts, temp.path()).await;

        assert_eq!(report.strategy, RenderStrategy::Remote);
        assert_eq!(report.counts.attempted, 2);
        assert_eq!(report.counts.succeeded, 1);
        assert_eq!(report.images.len(), 1);
        assert_eq!(report.images[0].artifact, "user_journey");
        assert_eq!(seen.lock().unwrap().len(), 2);

        let written: Vec<_> = std::fs::read_dir(temp.path().join("images")).unwrap().collect();
        assert_eq!(written.len(), 1);
        assert_eq!(std::fs::read(temp.path().join("images").join("user_journey.png")).unwrap(), b"\x89PNG first");
    }

    #[cfg(unix)]
    mod local_cli {
        use std::fs;
        use std::os::unix::fs::PermissionsExt;
        use std::path::{ Path, PathBuf };
        use tempfile::TempDir;

        use super::persist_source;
        use crate::errors::FlowscribeError;
        use crate::implementations::config::RenderConfig;
        use crate::implementations::image_pipeline::ImagePipeline;
        use crate::implementations::renderer::MermaidCliRenderer;
        use crate::implementations::tool_locator::SystemToolLocator;
        use crate::models::common::{ RenderStrategy, RenderTier };
        use crate::traits::image_renderer::{ ImageRenderer, ToolLocator };

        const FAKE_MMDC: &str = r#"#!/bin/sh
if [ "$1" = "--version" ]; then
    echo "10.9.1"
    exit 0
fi
out=""
while [ $# -gt 0 ]; do
    if [ "$1" = "-o" ]; then
        out="$2"
    fi
    shift
done
printf 'rendered' > "$out"
"#;

        const BROKEN_MMDC: &str = "#!/bin/sh\necho 'parse error on line 2' >&2\nexit 3\n";

        const SLOW_MMDC: &str = "#!/bin/sh\nsleep 5\n";

        fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
            let path = dir.join(name);
            fs::write(&path, body).unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
            path
        }

        fn config_for(program: &Path, project_dir: &Path) -> RenderConfig {
            RenderConfig {
                renderer_command: program.display().to_string(),
                project_dir: project_dir.to_path_buf(),
                remote_endpoint: None,
                timeout_secs: 10,
                ..RenderConfig::default()
            }
        }

        #[tokio::test]
        async fn test_global_renderer_renders_every_artifact() {
            let temp = TempDir::new().unwrap();
            let program = script(temp.path(), "mmdc", FAKE_MMDC);
            let out = temp.path().join("diagrams");
            let artifacts = vec![
                persist_source(&out, "user_journey", "graph TD\n    A[Login]\n"),
                persist_source(&out, "data_flow", "graph TD\n    A --> B\n")
            ];

            let pipeline = ImagePipeline::new(config_for(&program, temp.path()), vec![RenderTier::Global]);
            let report = pipeline.render_all(&artifacts, &out).await;

            assert_eq!(report.strategy, RenderStrategy::LocalGlobal(program.clone()));
            assert_eq!(report.counts.succeeded, 2);
            assert_eq!(fs::read_to_string(out.join("images").join("user_journey.png")).unwrap(), "rendered");
            assert!(out.join("images").join("data_flow.png").is_file());
        }

        #[tokio::test]
        async fn test_renderer_failure_is_counted_per_artifact() {
            let temp = TempDir::new().unwrap();
            let program = script(temp.path(), "mmdc", BROKEN_MMDC);
            let out = temp.path().join("diagrams");
            let artifacts = vec![persist_source(&out, "decision_tree", "graph TD\n    A -->\n")];

            let renderer = MermaidCliRenderer::new(
                program.clone(),
                "default",
                "white",
                std::time::Duration::from_secs(10)
            );
            let err = renderer.render(&artifacts[0].path, &out.join("decision_tree.png")).await.unwrap_err();
            match err {
                FlowscribeError::LocalRenderFailure { stderr, .. } => {
                    assert!(stderr.contains("parse error"));
                }
                other => panic!("unexpected error: {}", other),
            }

            // same script resolved through the project tier
            let bin = temp.path().join("node_modules").join(".bin");
            fs::create_dir_all(&bin).unwrap();
            script(&bin, "mmdc", BROKEN_MMDC);
            let pipeline = ImagePipeline::new(config_for(&program, temp.path()), vec![RenderTier::Project]);
            let report = pipeline.render_all(&artifacts, &out).await;

            assert!(report.strategy.is_available());
            assert_eq!(report.counts.attempted, 1);
            assert_eq!(report.counts.succeeded, 0);
            assert!(report.images.is_empty());
        }

        #[tokio::test]
        async fn test_slow_renderer_times_out() {
            let temp = TempDir::new().unwrap();
            let program = script(temp.path(), "mmdc", SLOW_MMDC);
            let source = temp.path().join("api_flow.mmd");
            fs::write(&source, "graph TD\n").unwrap();

            let renderer = MermaidCliRenderer::new(program, "default", "white", std::time::Duration::from_secs(1));
            let err = renderer.render(&source, &temp.path().join("api_flow.png")).await.unwrap_err();

            assert!(matches!(err, FlowscribeError::RenderTimeout { seconds: 1, .. }));
        }

        #[tokio::test]
        async fn test_locator_finds_and_installs() {
            let temp = TempDir::new().unwrap();
            let missing = temp.path().join("no-such-mmdc");

            let mut config = config_for(&missing, temp.path());
            config.install_command = vec![
                "sh".to_string(),
                "-c".to_string(),
                "mkdir -p node_modules/.bin && touch node_modules/.bin/mmdc".to_string()
            ];
            let locator = SystemToolLocator::new(config.clone());

            assert_eq!(locator.probe_global().await, None);
            assert_eq!(locator.probe_project().await, None);

            let installed = locator.install().await.unwrap();
            assert_eq!(installed, config.project_renderer_path());
            assert_eq!(locator.probe_project().await, Some(installed));
        }

        #[tokio::test]
        async fn test_install_outlives_render_timeout() {
            let temp = TempDir::new().unwrap();
            let mut config = config_for(&temp.path().join("mmdc"), temp.path());
            config.timeout_secs = 1;
            config.install_timeout_secs = 20;
            config.install_command = vec![
                "sh".to_string(),
                "-c".to_string(),
                "sleep 2 && mkdir -p node_modules/.bin && touch node_modules/.bin/mmdc".to_string()
            ];

            let installed = SystemToolLocator::new(config.clone()).install().await.unwrap();
            assert_eq!(installed, config.project_renderer_path());
        }

        #[tokio::test]
        async fn test_install_is_bounded_by_install_timeout() {
            let temp = TempDir::new().unwrap();
            let mut config = config_for(&temp.path().join("mmdc"), temp.path());
            config.timeout_secs = 30;
            config.install_timeout_secs = 1;
            config.install_command = vec!["sh".to_string(), "-c".to_string(), "sleep 5".to_string()];

            let err = SystemToolLocator::new(config).install().await.unwrap_err();
            match err {
                FlowscribeError::InstallFailure(message) => assert!(message.contains("timed out after 1s")),
                other => panic!("unexpected error: {}", other),
            }
        }

        #[tokio::test]
        async fn test_failed_install_reports_install_failure() {
            let temp = TempDir::new().unwrap();
            let mut config = config_for(&temp.path().join("mmdc"), temp.path());
            config.install_command = vec!["sh".to_string(), "-c".to_string(), "exit 1".to_string()];

            let err = SystemToolLocator::new(config).install().await.unwrap_err();
            assert!(matches!(err, FlowscribeError::InstallFailure(_)));
        }
    }

    #[tokio::test]
    async fn test_unavailable_strategy_renders_nothing() {
        let temp = TempDir::new().unwrap();
        let artifact = persist_source(temp.path(), "gantt_chart", "gantt\n");
        let config = RenderConfig {
            remote_endpoint: None,
            ..RenderConfig::default()
        };

        let pipeline = ImagePipeline::with_locator(
            config,
            vec![RenderTier::Global, RenderTier::Remote],
            Box::new(StubLocator::default())
        );
        let report = pipeline.render_all(&[artifact], temp.path()).await;

        assert_eq!(report.strategy, RenderStrategy::Unavailable);
        assert_eq!(report.counts.attempted, 1);
        assert_eq!(report.counts.succeeded, 0);
    }
}
