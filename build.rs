//! Build script for co2-monitor
//!
//! Puts `memory.x` on the linker search path and adds the cortex-m-rt and
//! defmt linker scripts for the firmware binary.

use std::path::PathBuf;
use std::{env, fs};

fn main() {
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");

    // Host test builds link against std only
    if env::var("CARGO_CFG_TARGET_ARCH").unwrap_or_default() != "arm" {
        return;
    }

    let out = PathBuf::from(env::var("OUT_DIR").unwrap());
    fs::write(out.join("memory.x"), include_bytes!("memory.x")).unwrap();
    println!("cargo:rustc-link-search={}", out.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
}
