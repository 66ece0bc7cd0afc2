//! Thin binary: the sliding flag window.
//!
//! Run:
//! - `cargo run`
//! - `RUST_LOG=info cargo run` to see playback transitions

fn main() -> anyhow::Result<()> {
    // Keep logging setup in the binary so the library remains unopinionated.
    env_logger::init();

    stars::run_app()
}
