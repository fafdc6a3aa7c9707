//! Build Script for Stock Market Server
//!
//! The `stock_market.v1` protobuf stubs are checked in under
//! `src/infrastructure/grpc/proto/`, generated from
//! `packages/proto/stock_market/v1/stock_market.proto`, so the build does not
//! need `protoc` or `buf`. This script only tracks the proto source and emits
//! the coverage cfg.

use std::env;

fn main() {
    // Rerun build script if it changes
    println!("cargo:rerun-if-changed=build.rs");

    // Rerun if the proto source changes so stale stubs are noticed
    println!("cargo:rerun-if-changed=../../packages/proto/stock_market/");

    // Emit cfg for coverage detection
    if env::var("CARGO_LLVM_COV").is_ok()
        || env::var("LLVM_PROFILE_FILE").is_ok()
        || env::var("RUSTFLAGS")
            .map(|f| f.contains("instrument-coverage"))
            .unwrap_or(false)
    {
        println!("cargo:rustc-cfg=coverage");
    }
}
