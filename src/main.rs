use clap::Parser;

mod cmd;

use cmd::Cmd;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    colog::init();

    Cmd::parse().run().await
}
