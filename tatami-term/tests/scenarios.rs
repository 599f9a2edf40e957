//! End-to-end scenarios: byte streams in, screen state out.
//!
//! Each test drives a fresh terminal with raw bytes and checks the
//! resulting grid, cursor, and reply queue.

use tatami_core::{Color, Style};
use tatami_term::Terminal;

fn term() -> Terminal {
    Terminal::new(80, 24)
}

fn screen_text(term: &Terminal) -> Vec<String> {
    term.buffer().lines().map(|l| l.text()).collect()
}

#[test]
fn plain_text_lands_in_row_zero() {
    let mut term = term();
    term.feed(b"Hello");

    let line = term.buffer().line(0);
    for (i, c) in "Hello".chars().enumerate() {
        assert_eq!(line.cell(i).display_char(), c);
    }
    assert_eq!(term.buffer().cursor.row, 0);
    assert_eq!(term.buffer().cursor.col, 5);
    assert!(line.cell(5).is_blank());
    assert!(term.buffer().lines().skip(1).all(|l| l.is_blank()));
}

#[test]
fn sgr_applies_to_following_cells_only() {
    let mut term = term();
    term.feed(b"\x1b[31;1mX\x1b[0mY");

    let x = term.buffer().line(0).cell(0);
    assert_eq!(x.display_char(), 'X');
    assert_eq!(x.style.fg, Color::Indexed(1));
    assert!(x.style.bold);

    let y = term.buffer().line(0).cell(1);
    assert_eq!(y.display_char(), 'Y');
    assert_eq!(y.style, Style::default());
}

#[test]
fn absolute_cursor_positioning() {
    let mut term = term();
    term.feed(b"A\x1b[5;10HB");

    assert_eq!(term.buffer().line(0).cell(0).display_char(), 'A');
    assert_eq!(term.buffer().line(4).cell(9).display_char(), 'B');
    assert_eq!(term.buffer().cursor.row, 4);
    assert_eq!(term.buffer().cursor.col, 10);
}

#[test]
fn clear_screen_then_home() {
    let mut term = term();
    term.feed(b"some\x1b[8;8Hgarbage");
    term.feed(b"\x1b[2J\x1b[HDone");

    assert_eq!(screen_text(&term)[0], "Done");
    assert!(term.buffer().lines().skip(1).all(|l| l.is_blank()));
    assert_eq!(term.buffer().cursor.row, 0);
    assert_eq!(term.buffer().cursor.col, 4);
}

#[test]
fn linefeeds_scroll_a_short_buffer() {
    let mut term = Terminal::new(20, 3);
    term.feed(b"1\r\n2\r\n3");
    assert_eq!(screen_text(&term), vec!["1", "2", "3"]);
    assert_eq!(term.buffer().cursor.row, 2);

    term.feed(b"\r\n4");
    assert_eq!(screen_text(&term), vec!["2", "3", "4"]);
}

#[test]
fn alternate_screen_round_trip() {
    let mut term = term();
    term.feed(b"primary text");
    let cursor_before = (term.buffer().cursor.row, term.buffer().cursor.col);

    term.feed(b"\x1b[?1049h");
    assert!(term.modes().alternate_screen);
    assert!(term.buffer().lines().all(|l| l.is_blank()));

    term.feed(b"alt");
    assert_eq!(screen_text(&term)[0], "alt");

    term.feed(b"\x1b[?1049l");
    assert!(!term.modes().alternate_screen);
    assert_eq!(screen_text(&term)[0], "primary text");
    assert_eq!(
        (term.buffer().cursor.row, term.buffer().cursor.col),
        cursor_before
    );
}

#[test]
fn cursor_position_report() {
    let mut term = term();
    term.feed(b"\x1b[3;7H\x1b[6n");
    assert_eq!(term.take_output(), b"\x1b[3;7R");
}

#[test]
fn utf8_split_across_feeds_prints_once() {
    let mut term = term();
    term.feed(&[0xC3]);
    assert_eq!(term.buffer().cursor.col, 0);

    term.feed(&[0xA9]);
    assert_eq!(term.buffer().cursor.col, 1);
    assert_eq!(term.buffer().line(0).cell(0).glyph(), "é");
}

#[test]
fn origin_mode_homes_to_region_top() {
    let mut term = term();
    term.feed(b"\x1b[5;10r\x1b[?6h\x1b[1;1H");
    assert_eq!(term.buffer().cursor.row, 4);
    assert_eq!(term.buffer().cursor.col, 0);
}

#[test]
fn wide_glyphs_occupy_two_cells() {
    let mut term = term();
    term.feed("世世".as_bytes());

    let line = term.buffer().line(0);
    assert_eq!(line.cell(0).display_char(), '世');
    assert_eq!(line.cell(0).width(), 2);
    assert!(line.cell(1).is_wide_spacer());
    assert_eq!(line.cell(2).display_char(), '世');
    assert_eq!(line.cell(2).width(), 2);
    assert!(line.cell(3).is_wide_spacer());
    assert_eq!(term.buffer().cursor.col, 4);
}

// --- universal properties, concrete instances ---

#[test]
fn split_feeding_matches_whole_feeding() {
    let input: &[u8] =
        "ab\x1b[31;1mc\r\nd\x1b[5;10He\x1b]2;title\x07世\x1b[?1049halt\x1b[?1049l\x1b[6n"
            .as_bytes();

    let mut whole = Terminal::new(40, 10);
    whole.feed(input);
    let whole_text = screen_text(&whole);
    let whole_cursor = (whole.buffer().cursor.row, whole.buffer().cursor.col);

    for split in 1..input.len() {
        let mut parts = Terminal::new(40, 10);
        parts.feed(&input[..split]);
        parts.feed(&input[split..]);
        assert_eq!(screen_text(&parts), whole_text, "split at {}", split);
        assert_eq!(
            (parts.buffer().cursor.row, parts.buffer().cursor.col),
            whole_cursor,
            "split at {}",
            split
        );
        assert_eq!(parts.take_output(), b"\x1b[5;13R", "split at {}", split);
    }
}

#[test]
fn wrap_arithmetic_for_ascii_runs() {
    let mut term = Terminal::new(10, 24);
    term.feed(&vec![b'x'; 25]);
    // 25 chars on width 10 starting at (0,0): two full rows, 5 on the third
    assert_eq!(term.buffer().cursor.row, 2);
    assert_eq!(term.buffer().cursor.col, 5);
}

#[test]
fn save_restore_round_trips_through_edits() {
    let mut term = term();
    term.feed(b"\x1b[10;20H\x1b[1;33m\x1b7");
    term.feed(b"\x1b[HX\x1b[0m\x1b[24;1Hmore text");
    term.feed(b"\x1b8");

    assert_eq!(term.buffer().cursor.row, 9);
    assert_eq!(term.buffer().cursor.col, 19);
    assert!(term.buffer().cursor.style.bold);
    assert_eq!(term.buffer().cursor.style.fg, Color::Indexed(3));
}

#[test]
fn mode_set_then_reset_restores_observable_state() {
    let mut term = term();
    let before = (
        term.modes().bracketed_paste,
        term.modes().mouse_mode,
        term.buffer().auto_wrap,
        term.buffer().origin_mode,
    );

    term.feed(b"\x1b[?2004h\x1b[?1000h\x1b[?7l\x1b[?6h");
    term.feed(b"\x1b[?2004l\x1b[?1000l\x1b[?7h\x1b[?6l");

    let after = (
        term.modes().bracketed_paste,
        term.modes().mouse_mode,
        term.buffer().auto_wrap,
        term.buffer().origin_mode,
    );
    assert_eq!(before, after);
}

#[test]
fn scroll_up_then_down_restores_region_content() {
    let mut term = Terminal::new(10, 6);
    term.feed(b"a\r\nb\r\nc\r\nd\r\ne\r\nf");
    term.feed(b"\x1b[2;5r");
    let before = screen_text(&term);

    // One line (b) is pushed out of the region and lost
    term.feed(b"\x1b[S\x1b[T");
    let after = screen_text(&term);

    assert_eq!(after[0], before[0]);
    assert_eq!(after[5], before[5]);
    assert_eq!(after[1], "");
    assert_eq!(after[2], before[2]);
    assert_eq!(after[3], before[3]);
    assert_eq!(after[4], before[4]);
}

#[test]
fn erase_scrollback_mode_degrades_to_full_clear() {
    let mut term = term();
    term.feed(b"text\x1b[3J");
    assert!(term.buffer().lines().all(|l| l.is_blank()));
}

#[test]
fn tui_style_box_drawing() {
    let mut term = Terminal::new(10, 5);
    // The way ncurses draws a corner: designate graphics on G0, draw, undo
    term.feed(b"\x1b(0lqqk\x1b(B done");
    assert_eq!(screen_text(&term)[0], "┌──┐ done");
}

#[test]
fn replies_accumulate_in_trigger_order() {
    let mut term = term();
    term.feed(b"\x1b[5n\x1b[2;2H\x1b[6n\x1b[c");
    assert_eq!(term.take_output(), b"\x1b[0n\x1b[2;2R\x1b[?62;22c");
}

#[test]
fn malformed_input_never_derails_printing() {
    let mut term = term();
    term.feed(b"\x1b[999;999;;;H");
    assert_eq!(term.buffer().cursor.row, 23);
    assert_eq!(term.buffer().cursor.col, 79);

    term.feed(b"\x1b[H\x1b[\x01mok");
    // The malformed CSI is consumed; printing resumes
    assert!(screen_text(&term)[0].contains("ok"));

    term.feed(&[0xFF, 0xFE, b'!']);
    let row0 = &screen_text(&term)[0];
    assert!(row0.contains('\u{FFFD}'));
    assert!(row0.contains('!'));
}

#[test]
fn resize_preserves_and_clamps() {
    let mut term = Terminal::new(20, 5);
    term.feed(b"keep me\x1b[5;20H");
    term.resize(10, 3);

    assert_eq!(term.buffer().cols(), 10);
    assert_eq!(term.buffer().rows(), 3);
    assert_eq!(screen_text(&term)[0], "keep me");
    assert!(term.buffer().cursor.row < 3);
    assert!(term.buffer().cursor.col < 10);
}
