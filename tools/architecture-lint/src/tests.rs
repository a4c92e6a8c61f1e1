//! Unit tests for the architecture lint.

use std::path::PathBuf;

use rstest::fixture;
use rstest::rstest;

use super::*;

#[derive(Clone, Copy)]
struct LintSingle;

impl LintSingle {
    fn lint(self, file: &str, contents: &str) -> Result<(), ArchitectureLintError> {
        lint_sources(&[LintSource {
            file: PathBuf::from(file),
            contents: contents.to_owned(),
        }])
    }
}

#[fixture]
fn lint_single() -> LintSingle {
    LintSingle
}

#[rstest]
#[case(
    "inbound/session.rs",
    "use crate::domain::ViewerEvent; fn forward() { let _ = ViewerEvent::Teleport; }",
    true
)]
#[case(
    "inbound/session.rs",
    "use crate::outbound::http::HttpTruckApi; fn forward() { let _ = HttpTruckApi::base; }",
    false
)]
#[case(
    "inbound/cli.rs",
    "use outbound::map::HeadlessMapSurface; fn forward() {}",
    false
)]
#[case(
    "inbound/cli.rs",
    "use client::outbound::notify::TracingNotificationSink; fn forward() {}",
    false
)]
#[case("inbound/cli.rs", "use clap::Parser; fn forward() {}", true)]
#[case("inbound/cli.rs", "use reqwest::Client; fn forward() {}", false)]
#[case(
    "domain/refresh_controller/mod.rs",
    "use crate::inbound::session; fn refresh() { let _ = 1; }",
    false
)]
#[case(
    "domain/startup.rs",
    "fn start() { let _ = reqwest::Client::new(); }",
    false
)]
#[case(
    "domain/config.rs",
    "use serde_json::Value; pub struct RemoteConfig { extra: Value }",
    true
)]
#[case(
    "domain/config.rs",
    "use ortho_config::OrthoConfig; #[derive(OrthoConfig)] struct Settings;",
    false
)]
#[case(
    "outbound/map/headless.rs",
    "use crate::inbound::cli; fn thing() { let _ = 1; }",
    false
)]
#[case(
    "outbound/http/endpoint.rs",
    "use mockable::Env; use url::Url; fn resolve(_env: &dyn Env) -> Option<Url> { None }",
    true
)]
#[case("outbound/notify/tracing_sink.rs", "use clap::Parser; fn thing() {}", false)]
fn detects_boundary_violations(
    lint_single: LintSingle,
    #[case] file: &str,
    #[case] contents: &str,
    #[case] ok: bool,
) {
    let result = lint_single.lint(file, contents);
    assert_eq!(result.is_ok(), ok, "result: {result:?}");
}

#[rstest]
fn files_outside_the_layers_are_rejected(lint_single: LintSingle) {
    let result = lint_single.lint("settings.rs", "fn load() {}");
    assert!(matches!(result, Err(ArchitectureLintError::Parse { .. })));
}

#[rstest]
fn duplicate_offences_in_one_file_are_reported_once(lint_single: LintSingle) {
    let result = lint_single.lint(
        "domain/startup.rs",
        "use reqwest::Client; fn a() { let _ = reqwest::Client::new(); }",
    );
    let Err(ArchitectureLintError::Violations(violations)) = result else {
        panic!("expected violations, got {result:?}");
    };
    assert_eq!(violations.len(), 1);
    assert_eq!(
        violations.first().map(|violation| violation.message.as_str()),
        Some("domain module must not depend on external crate `reqwest`")
    );
}
