use std::io::Write;

use anyhow::Context;
use anyhow::Result;
use anyhow::anyhow;
use clap::Parser;
use pmmap_core::ChartSpec;
use pmmap_core::ContentModel;
use pmmap_core::DetailBody;
use pmmap_core::PanelController;
use pmmap_core::RendererKind;
use pmmap_core::chart::ChartEvent;
use pmmap_core::chart::RecordingBackend;
use pmmap_core::special::quality_chart_spec;
use serde::Serialize;

/// Print a topic's rendered detail body as JSON, without a terminal.
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// List topic identifiers instead of rendering one.
    #[arg(long, conflicts_with = "topic")]
    list: bool,

    /// Identifier of the topic to render.
    #[arg(value_name = "TOPIC_ID", required_unless_present = "list")]
    topic: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let model = ContentModel::builtin().context("loading built-in content")?;

    let mut stdout = std::io::stdout().lock();
    if args.list {
        let payload: Vec<TopicEntry> = model
            .topics()
            .iter()
            .map(|topic| TopicEntry {
                id: topic.id().to_string(),
                title: topic.title(),
                renderer: topic.renderer(),
            })
            .collect();
        serde_json::to_writer_pretty(&mut stdout, &payload).context("writing JSON")?;
    } else {
        let id = args.topic.as_deref().unwrap_or_default();
        let topic = model
            .topic(id)
            .ok_or_else(|| anyhow!("unknown topic `{id}`; try --list"))?;

        let backend = RecordingBackend::new();
        let mut panel = PanelController::new(backend.clone());
        let chart_error = panel.show(topic).err().map(|err| err.to_string());
        let body = panel.body().context("panel mounted no body")?.clone();
        let chart = (topic.renderer() == RendererKind::GenericPlusChart).then(quality_chart_spec);
        panel.close();

        let payload = DumpPayload {
            schema_version: "1.0",
            topic: id.to_string(),
            renderer: topic.renderer(),
            body,
            chart,
            chart_error,
            chart_events: backend.events(),
        };
        serde_json::to_writer_pretty(&mut stdout, &payload).context("writing JSON")?;
    }
    writeln!(stdout).context("writing JSON")?;
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TopicEntry<'a> {
    id: String,
    title: &'a str,
    renderer: RendererKind,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DumpPayload {
    schema_version: &'static str,
    topic: String,
    renderer: RendererKind,
    body: DetailBody,
    chart: Option<ChartSpec>,
    chart_error: Option<String>,
    /// Create/dispose calls made while rendering and closing the panel.
    chart_events: Vec<ChartEvent>,
}
