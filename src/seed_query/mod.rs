mod compiler;
mod filter;

#[cfg(test)]
pub use compiler::MockSeedQueryCompiler;
pub use compiler::{
    FilterCompiler, SeedCompileError, SeedQuery, SeedQueryCompiler, DIAGNOSTIC_MARKER,
};
pub use filter::Filter;
