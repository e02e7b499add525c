// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use crate::demo;
use crate::error::Result;

/// Execute `syncbridge methods`: list registered demo calls, one per line.
pub fn run() -> Result<()> {
    for method in demo::registry().methods() {
        println!("{}", method);
    }
    Ok(())
}
