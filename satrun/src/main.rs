//! SatRun command line

fn main() -> anyhow::Result<()> {
    satrun::run()
}
