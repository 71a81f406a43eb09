//! netswitch binary.

#[tokio::main(flavor = "current_thread")]
async fn main() -> eyre::Result<()> {
    netswitch_node_commands::run().await
}
