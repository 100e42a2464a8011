use anyhow::{Context, Result, bail};

use agent_overlay::config::{OverlayConfig, SourceKind};
use agent_overlay::demo_feed::DemoSource;
use agent_overlay::feed::{self, FeedError, HttpSource, PollOutcome, SnapshotSource};
use agent_overlay::ui::plain_text;
use agent_overlay::view::Renderer;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let config = OverlayConfig::from_env();
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let url = parse_url_arg(&args).unwrap_or_else(|| config.state_url.clone());
    let as_json = args.iter().any(|arg| arg == "--json");

    let mut source: Box<dyn SnapshotSource> = match config.source {
        SourceKind::Demo if !args.iter().any(|a| a.starts_with("--url")) => {
            let mut demo = DemoSource::new();
            // Skip the initial "not published yet" answer.
            let _ = demo.fetch();
            Box::new(demo)
        }
        _ => Box::new(HttpSource::new(url, config.http_timeout)),
    };

    println!("Probing {}", source.describe());
    match feed::poll_once(source.as_mut()) {
        PollOutcome::Pending => {
            println!("Endpoint has no snapshot yet");
            Ok(())
        }
        PollOutcome::Ready(snapshot) => {
            if as_json {
                let json = serde_json::to_string_pretty(&snapshot)
                    .context("serialize validated snapshot")?;
                println!("{json}");
            } else {
                let mut renderer = Renderer::new(config.asset_root.clone());
                println!("{}", plain_text(renderer.render(&snapshot)));
            }
            Ok(())
        }
        PollOutcome::Failed(FeedError::Validation(err)) => {
            println!("{}", err.report());
            bail!("snapshot does not match the expected shape");
        }
        PollOutcome::Failed(err) => Err(err).context("probe failed"),
    }
}

fn parse_url_arg(args: &[String]) -> Option<String> {
    for (idx, arg) in args.iter().enumerate() {
        if let Some(url) = arg.strip_prefix("--url=") {
            let trimmed = url.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == "--url" {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() {
                return Some(next.trim().to_string());
            }
        }
    }
    None
}
