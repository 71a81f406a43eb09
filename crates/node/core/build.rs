use std::error::Error;
use vergen_gitcl::{BuildBuilder, CargoBuilder, Emitter, GitclBuilder};

fn main() -> Result<(), Box<dyn Error>> {
    // Git metadata is optional: source tarballs build without a repository.
    Emitter::default()
        .add_instructions(&BuildBuilder::default().build_timestamp(true).build()?)?
        .add_instructions(&CargoBuilder::default().features(true).build()?)?
        .add_instructions(&GitclBuilder::default().sha(true).build()?)?
        .emit()?;

    Ok(())
}
