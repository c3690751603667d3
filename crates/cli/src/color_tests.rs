// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;

fn force_color(on: bool) {
    if on {
        std::env::set_var("COLOR", "1");
        std::env::remove_var("NO_COLOR");
    } else {
        std::env::set_var("NO_COLOR", "1");
        std::env::remove_var("COLOR");
    }
}

#[test]
#[serial]
fn styles_returns_styled_when_color_forced() {
    force_color(true);
    let debug = format!("{:?}", styles());
    assert_ne!(debug, format!("{:?}", Styles::plain()));
}

#[test]
#[serial]
fn styles_returns_plain_when_no_color() {
    force_color(false);
    let debug = format!("{:?}", styles());
    assert_eq!(debug, format!("{:?}", Styles::plain()));
}

#[yare::parameterized(
    header  = { super::header,  "\x1b[38;5;74m" },
    literal = { super::literal, "\x1b[38;5;250m" },
    error   = { super::error,   "\x1b[38;5;167m" },
)]
#[serial]
fn paints_with_palette_when_color_forced(paint: fn(&str) -> String, prefix: &str) {
    force_color(true);
    let result = paint("text");
    assert!(result.starts_with(prefix), "got {result:?}");
    assert!(result.ends_with("text\x1b[0m"));
}

#[test]
#[serial]
fn plain_text_when_no_color() {
    force_color(false);
    assert_eq!(header("chromeos-base/codelab"), "chromeos-base/codelab");
    assert_eq!(error("failed"), "failed");
}
