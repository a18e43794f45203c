use std::sync::Arc;

use devtoolkit::{ChannelEvent, ChannelOptions, Config, EngineBuilder, Workflow, WorkflowResult, analyzer};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::try_from_env("DEVTOOLKIT_LOG").unwrap_or_else(|_| EnvFilter::new("info"))).init();

    let config = Config::load_from_str(include_str!("./config.toml")).unwrap();

    let engine = EngineBuilder::from_config(&config).build().unwrap();

    engine.launch();

    let workflow = Workflow::from_json(include_str!("./workflow.json")).unwrap();

    engine.deploy(&workflow).unwrap();

    ChannelEvent::channel(engine.channel(), ChannelOptions::with_wid(workflow.id.to_owned())).unwrap().on_complete(move |eid| {
        println!("Workflow completed, eid: {}", eid);
    });

    ChannelEvent::channel(engine.channel(), ChannelOptions::with_wid(workflow.id.to_owned())).unwrap().on_error(move |e| {
        println!("Workflow failed: {:?}", e.event);
    });

    let input = r#"{"users":[{"id":1,"name":"Ada"},{"id":2,"email":"grace@example.com"}],"page":1}"#;

    let execution = engine
        .run_with_progress(
            &workflow.id,
            input,
            Arc::new(|index: usize, total: usize, result: &WorkflowResult| {
                let status = if result.success { "ok" } else { "failed" };
                println!("[{}/{}] {} {} ({:.2} ms)", index + 1, total, result.tool_id, status, result.duration.as_secs_f64() * 1000.0);
            }),
        )
        .unwrap();

    match &execution.output {
        Some(output) => println!("Output:\n{}", output),
        None => println!("Failed: {}", execution.error().unwrap_or_default()),
    }

    let report = analyzer::analyze(execution.output.as_deref().unwrap_or_default());
    println!("Analysis: {:?}, score {}", report.language, report.score);

    println!("Run count: {}", engine.workflow(&workflow.id).unwrap().run_count);
    println!("History: {} entries", engine.history().len());

    engine.shutdown();
}
