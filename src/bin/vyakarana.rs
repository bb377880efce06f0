//! `vyakarana`: check command lines against a grammar document.
//!
//! ## Usage
//! ```bash
//! vyakarana check --grammar signal.yaml -- -b -2 123 level
//! vyakarana outline --grammar signal.yaml
//! ```

fn main() {
    vyakarana::cli::run();
}
