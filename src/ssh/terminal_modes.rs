// Copyright 2025 Lablup Inc. and Jeongkyu Shin
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Terminal mode configuration for the remote pseudo terminal

use russh::Pty;

pub const TERM_TYPE: &str = "xterm";
pub const TERM_COLUMNS: u32 = 180;
pub const TERM_ROWS: u32 = 100;

/// Terminal modes requested with every PTY
///
/// Echo is off so the commands written into an interactive shell do not
/// come back mixed into the captured output.
pub fn configure_terminal_modes() -> Vec<(Pty, u32)> {
    vec![
        (Pty::ECHO, 0),              // Disable echo of typed commands
        (Pty::TTY_OP_ISPEED, 14400), // Input baud rate
        (Pty::TTY_OP_OSPEED, 14400), // Output baud rate
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find_mode(modes: &[(Pty, u32)], target: Pty) -> Option<u32> {
        modes.iter().find(|(k, _)| *k == target).map(|(_, v)| *v)
    }

    #[test]
    fn test_echo_disabled() {
        let modes = configure_terminal_modes();
        assert_eq!(find_mode(&modes, Pty::ECHO), Some(0));
    }

    #[test]
    fn test_baud_rates() {
        let modes = configure_terminal_modes();
        assert_eq!(find_mode(&modes, Pty::TTY_OP_ISPEED), Some(14400));
        assert_eq!(find_mode(&modes, Pty::TTY_OP_OSPEED), Some(14400));
    }
}
