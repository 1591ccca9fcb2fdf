// Package identity baked in at build time, printed by `ecotrace --version`

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const NAME: &str = env!("CARGO_PKG_NAME");
