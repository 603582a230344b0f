// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

mod address;
mod errors;
mod headers;
mod params;
mod words;

use super::*;

fn parse(line: &str) -> Operation {
    match parse_operation(line) {
        Ok(op) => op,
        Err(e) => panic!("failed to parse {line:?}: {e}"),
    }
}
