//! # Printer Session Tests
//!
//! End-to-end exercises of the session against the emulator sink: block
//! printing, blank-line preservation, word wrap, and vertical margin
//! behavior across page boundaries. These mirror what used to be checked
//! by hand against real paper.

use pretty_assertions::assert_eq;

use microline::MicrolineError;
use microline::job::PrintJob;
use microline::printer::Printer;
use microline::transport::EmulatorSink;

/// A hand-test block: a handful of real lines separated by
/// long runs of intentional blank lines.
fn spaced_block() -> String {
    let mut block = String::new();
    block.push_str("This is line one of test block. It should be at the top of a page.\n");
    block.push_str("This is line two of test block\n");
    block.push_str("These should all be on different lines\n\n");
    block.push_str("There should be an empty line above this.\n");
    for _ in 0..4 {
        block.push_str("Now for 20 empty lines\n");
        block.push_str(&"\n".repeat(20));
    }
    block.push_str("Last line...");
    block
}

#[test]
fn block_printing_tracks_pages() {
    let mut printer = Printer::new(EmulatorSink::new()).unwrap();

    // 90 output lines per block: 60 fill page N's body, the rest spill
    // onto page N+1, and the closing page-top seek starts page N+2.
    printer.print_block(&spaced_block()).unwrap();
    assert_eq!(printer.position().line_number(), 0);
    assert_eq!(printer.position().page_number(), 2);

    printer.print_block(&spaced_block()).unwrap();
    assert_eq!(printer.position().line_number(), 0);
    assert_eq!(printer.position().page_number(), 4);
}

#[test]
fn consecutive_lines_stay_consecutive() {
    let ((), sink) = Printer::with_session(EmulatorSink::new(), |printer| {
        let mut block = String::new();
        for _ in 0..5 {
            block.push_str("Each line should have another right below it.\n");
        }
        block.push('\n');
        block.push_str("Except for this, which should have an empty line above.\n");
        printer.print_block(&block)
    })
    .unwrap();

    let text = sink.printed_text();
    let body: Vec<&str> = text
        .lines()
        .filter(|line| line.contains("line"))
        .collect();
    assert_eq!(body.len(), 6);
    // The blank separator survives between lines 5 and 6
    assert!(text.contains("below it.\n\nExcept"));
}

#[test]
fn long_text_wraps_without_splitting_words() {
    let mut printer = Printer::new(EmulatorSink::new()).unwrap();
    let width = printer.line_width_chars() as usize;

    let text = "Ensure that none of these words is split across lines. ".repeat(20);
    printer.print_block(text.trim()).unwrap();

    let printed = printer.position().page_number();
    assert!(printed >= 1, "a 20x repeat should fill at least one page");

    // Every source word must survive wrapping intact
    let (_, sink) =
        Printer::with_session(EmulatorSink::new(), |p| p.print_block(text.trim())).unwrap();
    let output = sink.printed_text();
    for word in ["Ensure", "that", "none", "words", "split", "across"] {
        assert!(output.contains(word));
    }
    // Block output starts at the first carriage return; everything before
    // it is session configuration codes
    let body = output.split_once('\r').expect("no line_return emitted").1;
    for line in body.lines() {
        // A line may begin with a margin-skip code; its digits and control
        // bytes precede the first letter of text
        let textual: String = line
            .chars()
            .skip_while(|c| !c.is_ascii_alphabetic())
            .collect();
        assert!(textual.chars().count() <= width, "overlong line: {textual:?}");
    }
}

#[test]
fn vertical_margins_are_never_printed_into() {
    let mut printer = Printer::new(EmulatorSink::new()).unwrap();
    let page_lines = printer.page_line_count();
    let vmargin = 3; // half an inch at 6 lpi

    // A page and a half of numbered lines
    for x in 0..(page_lines * 3 / 2) {
        printer.write_line(&format!("Line {}", x)).unwrap();
        // The line just written sits one above the current position and
        // must be inside the printable body
        let written = printer.position().line_number() - 1;
        assert!(
            written >= vmargin && written < page_lines - vmargin,
            "line {} landed at {}, inside a margin zone",
            x,
            written
        );
    }
}

#[test]
fn job_blocks_print_in_order() {
    let job = PrintJob {
        name: "integration".to_string(),
        blocks: vec!["first block".to_string(), "second block".to_string()],
    };

    let ((), sink) = Printer::with_session(EmulatorSink::new(), |printer| {
        printer.print_job(&job)
    })
    .unwrap();

    let text = sink.printed_text();
    let first = text.find("first block").expect("first block missing");
    let second = text.find("second block").expect("second block missing");
    assert!(first < second);
}

#[test]
fn session_survives_failing_job_and_finishes_page() {
    // A block whose single word cannot fit the printable width
    let job = PrintJob {
        name: "bad".to_string(),
        blocks: vec!["x".repeat(200)],
    };

    let result = Printer::with_session(EmulatorSink::new(), |printer| printer.print_job(&job));
    assert!(matches!(result, Err(MicrolineError::LineTooWide { .. })));
}
