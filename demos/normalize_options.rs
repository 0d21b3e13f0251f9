use cdp_options::error::OptionsResult;
use cdp_options::expression::{call_function_command, evaluate_command, EvaluateOptions};
use cdp_options::normalize::{normalize_with, OptionsBuilder};
use cdp_options::option_record;
use cdp_options::protocol::{Command, Response};
use serde_json::json;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

option_record! {
    #[derive(Debug, Clone, Default)]
    struct ScreenshotOptions {
        format: Option<String>,
        quality: Option<u8>,
        capture_beyond_viewport: bool => "captureBeyondViewport",
    }
}

option_record! {
    #[derive(Debug, Clone, Default)]
    struct LayoutMetrics {
        width: i64,
        height: i64,
        zoom: Option<String>,
    }
}

fn main() -> OptionsResult<()> {
    fmt()
        .pretty()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let screenshot = ScreenshotOptions {
        format: Some("jpeg".to_string()),
        quality: Some(80),
        ..Default::default()
    };
    let cmd = Command::new(
        "Page.captureScreenshot",
        normalize_with(&json!({"fromSurface": true}), &screenshot),
    )
    .with_id(1);
    info!("Outbound: {}", cmd.to_json()?);

    let navigate = Command::new(
        "Page.navigate",
        OptionsBuilder::new()
            .insert("url", "https://www.rust-lang.org")
            .merge(&Option::<ScreenshotOptions>::None)
            .build(),
    )
    .with_id(2);
    info!("Outbound: {}", navigate.to_json()?);

    let evaluate = evaluate_command(
        "() => document.title",
        &EvaluateOptions {
            return_by_value: Some(true),
            ..Default::default()
        },
    )
    .with_id(3);
    info!("Outbound: {}", evaluate.to_json()?);

    let count = call_function_command(
        "(selector) => document.querySelectorAll(selector).length",
        &[json!("a[href]")],
        &EvaluateOptions {
            return_by_value: Some(true),
            ..Default::default()
        },
    )
    .with_id(4);
    info!("Outbound: {}", count.to_json()?);

    let reply = Response::from_json(r#"{"id":4,"result":{"width":1280,"height":720}}"#)?;
    let metrics: LayoutMetrics = reply.rehydrate_result()?;
    info!("Layout: {:?}", metrics);

    Ok(())
}
