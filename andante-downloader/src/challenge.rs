//! Interactive-challenge handling.
//!
//! Solving is an opaque capability: attempt to clear the challenge,
//! succeed or signal failure. The shipped fallback is the manual gate:
//! a human clears it in the visible browser window while pacing is
//! paused.

use std::io::{BufRead, Write};

use log::info;

use crate::error::DownloadError;
use crate::webdriver::{Browser, Element};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeOutcome {
    Solved,
    Unsolved,
}

/// An automatic challenge-clearing capability.
pub trait ChallengeSolver {
    fn solve(
        &mut self,
        browser: &mut Browser,
        frame: &Element,
    ) -> Result<ChallengeOutcome, DownloadError>;
}

/// Block until a human reports the challenge cleared.
///
/// Returns `Unsolved` only when stdin is closed, which means nobody is
/// there to solve it.
pub fn manual_gate() -> ChallengeOutcome {
    info!("Interactive challenge detected; waiting for a human");
    print!("Solve the challenge in the browser window, then press Enter... ");
    let _ = std::io::stdout().flush();

    let mut line = String::new();
    match std::io::stdin().lock().read_line(&mut line) {
        Ok(0) | Err(_) => ChallengeOutcome::Unsolved,
        Ok(_) => ChallengeOutcome::Solved,
    }
}
