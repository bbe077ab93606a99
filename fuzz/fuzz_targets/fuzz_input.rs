// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use vault::analyzers::{classify_filename, text::summarize_text};
use vault::db::{FileField, Sensitivity, Status};

#[derive(Debug, Arbitrary)]
struct Input<'a> {
    content: &'a str,
    filename: &'a str,
    token: &'a str,
}

fuzz_target!(|input: Input<'_>| {
    let (title, preview) = summarize_text(input.content);
    assert!(title.chars().count() <= input.content.chars().count());
    assert!(preview.is_empty() || preview.ends_with("..."));

    let _ = classify_filename(input.filename);

    if let Ok(field) = input.token.parse::<FileField>() {
        let _ = field.validate(input.content);
    }
    let _ = input.token.parse::<Status>();
    let _ = input.token.parse::<Sensitivity>();
});
