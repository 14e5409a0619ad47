//! Demonstration: build the degree-2 tree for keys 1..=9 and print its shape.
//!
//! ```bash
//! RUST_LOG=leafchain=trace cargo run
//! ```

use leafchain::{BPlusTree, RowId};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> leafchain::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut tree = BPlusTree::new(leafchain::DEFAULT_DEGREE)?;
    tree.init_root();
    for i in 1..=9u32 {
        tree.insert(i, RowId::new(i as u64))?;
    }
    tree.validate()?;

    info!(height = tree.height(), len = tree.len(), "built tree");
    println!("root:   {:?}", tree.root_keys());
    println!("leaves: {:?}", tree.leaf_keys());
    println!("{}", tree.stats());

    // Deleting an absent key is a logged no-op.
    tree.delete(&42)?;
    Ok(())
}
