use crate::conf::DecodeMode;
use crate::plugin::builtin::{LogPassthroughPlugin, SubstitutePlugin};
use crate::plugin::{Plugin, PluginPipeline};
use crate::shutdown::Shutdown;
use crate::sink::LogSink;
use crate::stream::{DecodeError, StreamEnd, StreamError, StreamOptions, StreamProcessor};
use pretty_assertions::assert_eq;
use std::fs;
use std::io::{PipeReader, Write};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn options(chunk_size: usize, decode: DecodeMode) -> StreamOptions {
    StreamOptions {
        poll_interval_ms: 10,
        chunk_size,
        decode,
    }
}

/// A pipe already holding `input` whose write end is closed.
fn closed_pipe(input: &[u8]) -> PipeReader {
    let (reader, mut writer) = std::io::pipe().unwrap();
    writer.write_all(input).unwrap();
    reader
}

fn pipeline(plugins: Vec<Arc<dyn Plugin>>) -> PluginPipeline {
    PluginPipeline::new(plugins)
}

#[test]
fn demo_plugin_transforms_stream() {
    // Arrange
    let input = closed_pipe(b"hello\n");
    let mut processor = StreamProcessor::new(
        input,
        Vec::new(),
        pipeline(vec![Arc::new(SubstitutePlugin)]),
        StreamOptions::default(),
    );

    // Act
    let summary = processor.run(&Shutdown::new()).unwrap();

    // Assert
    assert_eq!(summary.end, StreamEnd::EndOfInput);
    assert_eq!(summary.bytes_in, 6);
    assert_eq!(summary.bytes_out, 9);
    assert_eq!(processor.into_output(), b"hXllo <<\n");
}

#[test]
fn empty_input_terminates_without_output() {
    let mut processor = StreamProcessor::new(
        closed_pipe(b""),
        Vec::new(),
        pipeline(vec![Arc::new(SubstitutePlugin)]),
        StreamOptions::default(),
    );

    let summary = processor.run(&Shutdown::new()).unwrap();

    assert_eq!(summary.chunks, 0);
    assert_eq!(summary.end, StreamEnd::EndOfInput);
    assert!(processor.into_output().is_empty());
}

#[test]
fn chunks_are_emitted_in_order() {
    // Arrange
    let input = closed_pipe(b"abcdef");
    let mut processor = StreamProcessor::new(
        input,
        Vec::new(),
        PluginPipeline::default(),
        options(2, DecodeMode::Strict),
    );

    // Act
    let summary = processor.run(&Shutdown::new()).unwrap();

    // Assert
    assert_eq!(summary.chunks, 3);
    assert_eq!(processor.into_output(), b"abcdef");
}

#[test]
fn keystrokes_pass_through_without_logging() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("stderr.log");
    let plugin = LogPassthroughPlugin::new(Arc::new(LogSink::new(&log_path)));
    let (input, mut writer) = std::io::pipe().unwrap();
    let typist = thread::spawn(move || {
        for key in [b"a", b"b", b"c"] {
            writer.write_all(key).unwrap();
            thread::sleep(Duration::from_millis(50));
        }
        writer.write_all(b"err\n").unwrap();
    });
    let mut processor = StreamProcessor::new(
        input,
        Vec::new(),
        pipeline(vec![Arc::new(plugin)]),
        StreamOptions::default(),
    );

    // Act
    let summary = processor.run(&Shutdown::new()).unwrap();
    typist.join().unwrap();

    // Assert
    assert_eq!(summary.chunks, 4);
    assert_eq!(processor.into_output(), b"abcerr\n");
    assert_eq!(fs::read_to_string(&log_path).unwrap(), "err\n");
}

#[test]
fn program_output_is_logged_verbatim() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("ec/stderr.log");
    let plugin = LogPassthroughPlugin::new(Arc::new(LogSink::new(&log_path)));
    let mut processor = StreamProcessor::new(
        closed_pipe(b"ls: cannot access 'x'\n"),
        Vec::new(),
        pipeline(vec![Arc::new(plugin)]),
        StreamOptions::default(),
    );

    // Act
    processor.run(&Shutdown::new()).unwrap();

    // Assert
    assert_eq!(processor.into_output(), b"ls: cannot access 'x'\n");
    assert_eq!(
        fs::read_to_string(&log_path).unwrap(),
        "ls: cannot access 'x'\n"
    );
}

#[test]
fn character_split_across_reads_is_emitted_intact() {
    let mut processor = StreamProcessor::new(
        closed_pipe("né\n".as_bytes()),
        Vec::new(),
        PluginPipeline::default(),
        options(1, DecodeMode::Strict),
    );

    processor.run(&Shutdown::new()).unwrap();

    assert_eq!(String::from_utf8(processor.into_output()).unwrap(), "né\n");
}

#[test]
fn strict_decoding_fails_on_malformed_input() {
    let mut processor = StreamProcessor::new(
        closed_pipe(b"ok\xffno"),
        Vec::new(),
        PluginPipeline::default(),
        StreamOptions::default(),
    );

    let err = processor.run(&Shutdown::new()).unwrap_err();

    assert!(
        matches!(err, StreamError::Decode(DecodeError::Invalid { offset: 2 })),
        "got {err:?}"
    );
}

#[test]
fn lossy_decoding_replaces_malformed_input() {
    let mut processor = StreamProcessor::new(
        closed_pipe(b"ok\xffgo"),
        Vec::new(),
        PluginPipeline::default(),
        options(4096, DecodeMode::Lossy),
    );

    processor.run(&Shutdown::new()).unwrap();

    assert_eq!(
        String::from_utf8(processor.into_output()).unwrap(),
        "ok\u{FFFD}go"
    );
}

#[test]
fn shutdown_stops_loop_before_reading() {
    // Arrange
    let (reader, mut writer) = std::io::pipe().unwrap();
    writer.write_all(b"never read").unwrap();
    let shutdown = Shutdown::new();
    shutdown.request();
    let mut processor = StreamProcessor::new(
        reader,
        Vec::new(),
        PluginPipeline::default(),
        StreamOptions::default(),
    );

    // Act
    let summary = processor.run(&shutdown).unwrap();

    // Assert
    assert_eq!(summary.end, StreamEnd::Shutdown);
    assert_eq!(summary.bytes_in, 0);
    assert!(processor.into_output().is_empty());
    drop(writer);
}

#[test]
fn shutdown_interrupts_idle_poll() {
    // Arrange
    let (reader, writer) = std::io::pipe().unwrap();
    let shutdown = Shutdown::new();
    let trigger = shutdown.clone();
    let handle = thread::spawn(move || {
        thread::sleep(Duration::from_millis(50));
        trigger.request();
    });
    let mut processor = StreamProcessor::new(
        reader,
        Vec::new(),
        PluginPipeline::default(),
        options(4096, DecodeMode::Strict),
    );

    // Act
    let summary = processor.run(&shutdown).unwrap();

    // Assert
    handle.join().unwrap();
    assert_eq!(summary.end, StreamEnd::Shutdown);
    drop(writer);
}

#[test]
fn plugin_failure_is_fatal() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("file");
    fs::write(&blocker, "").unwrap();
    let plugin = LogPassthroughPlugin::new(Arc::new(LogSink::new(blocker.join("stderr.log"))));
    let mut processor = StreamProcessor::new(
        closed_pipe(b"first chunk\n"),
        Vec::new(),
        pipeline(vec![Arc::new(plugin)]),
        StreamOptions::default(),
    );

    // Act
    let err = processor.run(&Shutdown::new()).unwrap_err();

    // Assert
    assert!(matches!(err, StreamError::Plugin(_)), "got {err:?}");
    assert!(processor.into_output().is_empty());
}
