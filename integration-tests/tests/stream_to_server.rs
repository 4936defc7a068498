use ec_core::conf::DecodeMode;
use ec_core::plugin::PluginPipeline;
use ec_core::plugin::builtin::{LogPassthroughPlugin, SubstitutePlugin};
use ec_core::shutdown::Shutdown;
use ec_core::sink::LogSink;
use ec_core::stream::{StreamEnd, StreamOptions, StreamProcessor};
use integration_tests::harness::TestServer;
use pretty_assertions::assert_eq;
use reqwest::StatusCode;
use std::io::Write;
use std::sync::Arc;

/// stderr captured by `ec run` is readable through `ec serve`
#[test]
fn logged_stream_is_served_back() {
    let srv = TestServer::start_with(|cfg| cfg.server.suffix = ".log".to_string());
    let sink = Arc::new(LogSink::new(srv.log_dir().join("stderr.log")));

    let (input, mut writer) = std::io::pipe().unwrap();
    writer
        .write_all(b"Traceback (most recent call last):\nerror: boom\n")
        .unwrap();
    drop(writer);

    let mut processor = StreamProcessor::new(
        input,
        Vec::new(),
        PluginPipeline::new(vec![Arc::new(LogPassthroughPlugin::new(sink))]),
        StreamOptions {
            poll_interval_ms: 10,
            chunk_size: 4096,
            decode: DecodeMode::Strict,
        },
    );

    let summary = processor.run(&Shutdown::new()).unwrap();
    assert_eq!(summary.end, StreamEnd::EndOfInput);

    let res = srv.get("/stderr").send().unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.text().unwrap(),
        "<p>You accessed path: stderr</p><pre>Traceback (most recent call last):\nerror: boom\n</pre>"
    );
}

/// Plugins after `log` do not change what lands in the log file
#[test]
fn log_records_input_before_substitution() {
    let srv = TestServer::start_with(|cfg| cfg.server.suffix = ".log".to_string());
    let sink = Arc::new(LogSink::new(srv.log_dir().join("stderr.log")));

    let (input, mut writer) = std::io::pipe().unwrap();
    writer.write_all(b"see here\n").unwrap();
    drop(writer);

    let mut processor = StreamProcessor::new(
        input,
        Vec::new(),
        PluginPipeline::new(vec![
            Arc::new(LogPassthroughPlugin::new(sink)),
            Arc::new(SubstitutePlugin),
        ]),
        StreamOptions::default(),
    );

    processor.run(&Shutdown::new()).unwrap();
    let stdout = processor.into_output();

    let body = srv.get("/stderr").send().unwrap().text().unwrap();

    assert_eq!(stdout, b"sXX hXrX <<\n");
    assert_eq!(body, "<p>You accessed path: stderr</p><pre>see here\n</pre>");
}
